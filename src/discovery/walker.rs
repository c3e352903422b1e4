//! Field path extraction from a single JSON record

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value};

use super::config::DiscoveryConfig;
use super::types::{ARRAY_MARKER, FieldInfo, JsonType, display_value, opaque_object_sample};

/// Walks one record and collects every field path it contains
///
/// Paths are built as `parent.child`; the elements of an array live under
/// `parent.child[]`. Objects whose keys look like data (all numeric, or more
/// than `dynamic_key_threshold` keys) are recorded as opaque `object` leaves
/// instead of being expanded key by key.
pub struct PathWalker<'a> {
    config: &'a DiscoveryConfig,
    fields: BTreeMap<String, FieldInfo>,
}

impl<'a> PathWalker<'a> {
    /// Create a walker for the given configuration
    pub fn new(config: &'a DiscoveryConfig) -> Self {
        Self {
            config,
            fields: BTreeMap::new(),
        }
    }

    /// Walk a record and return its field table
    ///
    /// Non-object records have no field paths and yield an empty table.
    pub fn walk(config: &DiscoveryConfig, record: &Value) -> BTreeMap<String, FieldInfo> {
        let mut walker = PathWalker::new(config);
        if let Value::Object(map) = record {
            walker.walk_object(map, "", 0);
        }
        walker.finish()
    }

    /// Consume the walker and return the collected fields
    pub fn finish(self) -> BTreeMap<String, FieldInfo> {
        self.fields
    }

    /// Walk the keys of one object
    pub fn walk_object(&mut self, object: &Map<String, Value>, prefix: &str, depth: usize) {
        for (key, value) in object {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{}.{}", prefix, key)
            };
            self.visit(&path, value, depth);
        }
    }

    fn visit(&mut self, path: &str, value: &Value, depth: usize) {
        let max_sample_len = self.config.max_sample_len;
        {
            let field = self.field(path);
            field.observe(JsonType::of(value));
            if JsonType::of(value).is_scalar() {
                field.samples.insert(display_value(value, max_sample_len));
            }
        }

        match value {
            Value::Object(map) => self.visit_object(path, map, depth),
            Value::Array(items) if !items.is_empty() => self.visit_array(path, items, depth),
            _ => {}
        }
    }

    fn visit_object(&mut self, path: &str, map: &Map<String, Value>, depth: usize) {
        if self.is_opaque(map, depth) {
            self.field(path).samples.insert(opaque_object_sample(map.len()));
        } else {
            self.walk_object(map, path, depth + 1);
        }
    }

    fn visit_array(&mut self, path: &str, items: &[Value], depth: usize) {
        let element_path = format!("{}{}", path, ARRAY_MARKER);
        let max_sample_len = self.config.max_sample_len;
        let sample_limit = self.config.array_sample_limit;

        {
            let kinds: BTreeSet<JsonType> = items.iter().map(JsonType::of).collect();
            let element = self.field(&element_path);
            element.observe_many(kinds);
            for item in items.iter().take(sample_limit) {
                if JsonType::of(item).is_scalar() {
                    element.samples.insert(display_value(item, max_sample_len));
                }
            }
        }

        for item in items {
            if let Value::Object(map) = item {
                self.visit_object(&element_path, map, depth);
            }
        }
    }

    /// Dynamic-key maps and objects at the depth cutoff are not expanded
    fn is_opaque(&self, map: &Map<String, Value>, depth: usize) -> bool {
        depth + 1 >= self.config.max_depth
            || is_dynamic_keys_object(map, self.config.dynamic_key_threshold)
    }

    fn field(&mut self, path: &str) -> &mut FieldInfo {
        let max_samples = self.config.max_samples;
        self.fields
            .entry(path.to_string())
            .or_insert_with(|| FieldInfo::new(path, max_samples))
    }
}

/// Check whether an object's keys are data rather than a field vocabulary
///
/// True when every key is a non-empty run of ASCII digits (tick indexes and
/// the like), or when the object has more than `threshold` keys.
pub fn is_dynamic_keys_object(map: &Map<String, Value>, threshold: usize) -> bool {
    if map.is_empty() {
        return false;
    }

    let all_numeric = map
        .keys()
        .all(|k| !k.is_empty() && k.bytes().all(|b| b.is_ascii_digit()));

    all_numeric || map.len() > threshold
}

/// Walk one record with the given configuration
pub fn discover_fields(record: &Value, config: &DiscoveryConfig) -> BTreeMap<String, FieldInfo> {
    PathWalker::walk(config, record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::types::InferredType;
    use serde_json::json;

    fn walk(record: Value) -> BTreeMap<String, FieldInfo> {
        discover_fields(&record, &DiscoveryConfig::default())
    }

    fn single(t: JsonType) -> InferredType {
        InferredType::Single(t)
    }

    #[test]
    fn test_walk_simple_event() {
        let fields = walk(json!({"event": "tick", "data": {"price": 1.5, "tags": ["a", "b"]}}));

        let paths: Vec<&str> = fields.keys().map(|k| k.as_str()).collect();
        assert_eq!(paths, vec!["data", "data.price", "data.tags", "data.tags[]", "event"]);

        assert_eq!(fields["event"].inferred_type(), single(JsonType::String));
        assert_eq!(fields["data"].inferred_type(), single(JsonType::Object));
        assert_eq!(fields["data.price"].inferred_type(), single(JsonType::Number));
        assert_eq!(fields["data.tags"].inferred_type(), single(JsonType::Array));
        assert_eq!(fields["data.tags[]"].inferred_type(), single(JsonType::String));
        assert_eq!(fields["data.tags[]"].samples.values(), &[json!("a"), json!("b")]);

        for info in fields.values() {
            assert_eq!(info.count, 1);
        }
    }

    #[test]
    fn test_walk_array_of_objects_visits_every_element() {
        let fields = walk(json!({
            "event": "gameStateUpdate",
            "data": {
                "leaderboard": [
                    {"id": "p1", "pnl": 0.5},
                    {"id": "p2", "pnl": -0.1, "badge": "gold"}
                ]
            }
        }));

        assert_eq!(fields["data.leaderboard[]"].count, 1);
        assert_eq!(
            fields["data.leaderboard[]"].inferred_type(),
            single(JsonType::Object)
        );
        assert_eq!(fields["data.leaderboard[].id"].count, 2);
        assert_eq!(fields["data.leaderboard[].pnl"].count, 2);
        // Only in the second element
        assert_eq!(fields["data.leaderboard[].badge"].count, 1);
    }

    #[test]
    fn test_walk_nested_arrays_and_objects() {
        let fields = walk(json!({
            "data": {
                "gameHistory": [{
                    "id": "20251215-abc123",
                    "rugged": true,
                    "prices": [1.0, 1.05, 1.1, 1.2],
                    "provablyFair": {"serverSeedHash": "abc123"}
                }]
            }
        }));

        assert!(fields.contains_key("data.gameHistory[].id"));
        assert!(fields.contains_key("data.gameHistory[].prices[]"));
        assert!(fields.contains_key("data.gameHistory[].provablyFair.serverSeedHash"));

        // Only the first three scalar elements are sampled
        assert_eq!(fields["data.gameHistory[].prices[]"].samples.len(), 3);
    }

    #[test]
    fn test_walk_null_values() {
        let fields = walk(json!({"data": {"activeEventId": null, "status": "waiting"}}));
        assert_eq!(fields["data.activeEventId"].inferred_type(), single(JsonType::Null));
        assert_eq!(fields["data.activeEventId"].samples.values(), &[json!(null)]);
    }

    #[test]
    fn test_numeric_keys_are_opaque() {
        let fields = walk(json!({
            "data": {"partialPrices": {"startTick": 40, "values": {"1": 1.1, "2": 1.15, "3": 1.2}}}
        }));

        let values = &fields["data.partialPrices.values"];
        assert_eq!(values.inferred_type(), single(JsonType::Object));
        assert_eq!(values.samples.values(), &[json!("<object with 3 keys>")]);
        assert!(
            !fields
                .keys()
                .any(|k| k.starts_with("data.partialPrices.values."))
        );
        assert!(fields.contains_key("data.partialPrices.startTick"));
    }

    #[test]
    fn test_many_keys_are_opaque() {
        let wide: Map<String, Value> = (0..25)
            .map(|i| (format!("player_{}", i), json!(i)))
            .collect();
        let fields = walk(json!({"data": {"balances": Value::Object(wide)}}));

        assert_eq!(
            fields["data.balances"].inferred_type(),
            single(JsonType::Object)
        );
        assert!(!fields.keys().any(|k| k.starts_with("data.balances.")));
    }

    #[test]
    fn test_twenty_keys_are_expanded() {
        let map: Map<String, Value> = (0..20).map(|i| (format!("k{}", i), json!(i))).collect();
        let fields = walk(json!({"data": Value::Object(map)}));
        assert!(fields.contains_key("data.k0"));
        assert!(fields.contains_key("data.k19"));
    }

    #[test]
    fn test_empty_object_is_not_dynamic() {
        let fields = walk(json!({"data": {}}));
        assert_eq!(fields.len(), 1);
        assert!(fields["data"].samples.is_empty());
    }

    #[test]
    fn test_empty_array_has_no_element_path() {
        let fields = walk(json!({"data": {"entries": []}}));
        assert!(fields.contains_key("data.entries"));
        assert!(!fields.contains_key("data.entries[]"));
    }

    #[test]
    fn test_depth_guard() {
        let config = DiscoveryConfig::builder().max_depth(2).build();
        let record = json!({"a": {"b": {"c": {"d": 1}}}});
        let fields = discover_fields(&record, &config);

        assert!(fields.contains_key("a"));
        assert!(fields.contains_key("a.b"));
        assert!(!fields.contains_key("a.b.c"));
        assert_eq!(fields["a.b"].samples.values(), &[json!("<object with 1 keys>")]);
    }

    #[test]
    fn test_heterogeneous_array_is_mixed() {
        let fields = walk(json!({"data": ["trace-1", {"gameId": "g1"}]}));

        assert_eq!(
            fields["data[]"].inferred_type(),
            InferredType::Mixed(vec![JsonType::String, JsonType::Object])
        );
        assert!(fields.contains_key("data[].gameId"));
        assert_eq!(fields["data[]"].samples.values(), &[json!("trace-1")]);
    }

    #[test]
    fn test_non_object_record_has_no_fields() {
        assert!(walk(json!([1, 2, 3])).is_empty());
    }

    #[test]
    fn test_dynamic_key_detection() {
        let numeric: Map<String, Value> =
            [("1".to_string(), json!(1)), ("22".to_string(), json!(2))].into_iter().collect();
        assert!(is_dynamic_keys_object(&numeric, 20));

        let named: Map<String, Value> =
            [("1".to_string(), json!(1)), ("b".to_string(), json!(2))].into_iter().collect();
        assert!(!is_dynamic_keys_object(&named, 20));
    }
}
