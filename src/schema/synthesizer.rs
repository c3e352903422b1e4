//! Nested schema synthesis from flat field tables

use std::collections::{BTreeMap, BTreeSet};

use serde_json::{Map, Value, json};

use super::formats::{Format, common_format};
use crate::discovery::{ARRAY_MARKER, DiscoveryResult, EventInfo, FieldInfo, InferredType, JsonType};

/// JSON Schema dialect of synthesized documents
pub const SCHEMA_DIALECT: &str = "http://json-schema.org/draft-07/schema#";

/// One node of a synthesized schema tree
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaNode {
    /// Observed types; empty for purely structural nodes
    pub types: BTreeSet<JsonType>,
    /// Occurrences of the path this node stands for
    pub frequency: usize,
    /// Sample values
    pub examples: Vec<Value>,
    /// Shared string format of the samples
    pub format: Option<Format>,
    /// Child nodes of an object
    pub properties: BTreeMap<String, SchemaNode>,
    /// Element node of an array
    pub items: Option<Box<SchemaNode>>,
}

impl SchemaNode {
    /// Whether a field path ended at this node
    pub fn is_observed(&self) -> bool {
        !self.types.is_empty()
    }

    /// Observed type, widened to `Mixed` on conflict
    ///
    /// Structural nodes that were never observed directly are typed by
    /// their shape.
    pub fn inferred_type(&self) -> InferredType {
        if self.is_observed() {
            InferredType::from_types(&self.types)
        } else if self.items.is_some() {
            InferredType::Single(JsonType::Array)
        } else {
            InferredType::Single(JsonType::Object)
        }
    }

    fn annotate(&mut self, field: &FieldInfo) {
        self.types.extend(field.types.iter().copied());
        self.frequency += field.count;
        for sample in field.samples.iter() {
            if !self.examples.contains(sample) {
                self.examples.push(sample.clone());
            }
        }
        self.format = if self.types.len() == 1 && self.types.contains(&JsonType::String) {
            common_format(&self.examples)
        } else {
            None
        };
    }

    fn child_mut(&mut self, segment: &str) -> &mut SchemaNode {
        let (name, depth) = split_array_segment(segment);
        let mut node = self.properties.entry(name.to_string()).or_default();
        for _ in 0..depth {
            node = &mut **node.items.get_or_insert_with(Box::default);
        }
        node
    }

    fn child(&self, segment: &str) -> Option<&SchemaNode> {
        let (name, depth) = split_array_segment(segment);
        let mut node = self.properties.get(name)?;
        for _ in 0..depth {
            node = node.items.as_deref()?;
        }
        Some(node)
    }

    /// Render this node as a JSON Schema fragment
    pub fn to_json(&self) -> Value {
        let mut schema = Map::new();

        match self.inferred_type() {
            InferredType::Single(t) => {
                schema.insert("type".to_string(), json!(t.name()));
            }
            InferredType::Mixed(types) => {
                schema.insert("type".to_string(), json!("mixed"));
                let one_of: Vec<Value> = types.iter().map(|t| json!({"type": t.name()})).collect();
                schema.insert("oneOf".to_string(), Value::Array(one_of));
            }
        }

        if self.frequency > 0 {
            schema.insert("x-frequency".to_string(), json!(self.frequency));
        }
        if !self.examples.is_empty() {
            schema.insert("examples".to_string(), Value::Array(self.examples.clone()));
        }
        if let Some(format) = self.format {
            schema.insert("format".to_string(), json!(format.as_str()));
        }
        if !self.properties.is_empty() {
            schema.insert("properties".to_string(), properties_to_json(&self.properties));
        }
        if let Some(items) = &self.items {
            schema.insert("items".to_string(), items.to_json());
        }

        Value::Object(schema)
    }

    fn collect_paths(&self, path: &str, out: &mut Vec<String>) {
        if self.is_observed() && !path.is_empty() {
            out.push(path.to_string());
        }
        for (name, child) in &self.properties {
            let child_path = if path.is_empty() {
                name.clone()
            } else {
                format!("{}.{}", path, name)
            };
            child.collect_paths(&child_path, out);
        }
        if let Some(items) = &self.items {
            items.collect_paths(&format!("{}{}", path, ARRAY_MARKER), out);
        }
    }
}

/// Split `name[]` into `("name", 1)`
fn split_array_segment(segment: &str) -> (&str, usize) {
    let mut name = segment;
    let mut depth = 0;
    while let Some(stripped) = name.strip_suffix(ARRAY_MARKER) {
        name = stripped;
        depth += 1;
    }
    (name, depth)
}

fn properties_to_json(properties: &BTreeMap<String, SchemaNode>) -> Value {
    Value::Object(
        properties
            .iter()
            .map(|(name, node)| (name.clone(), node.to_json()))
            .collect(),
    )
}

/// Synthesized schema of one event type
#[derive(Debug, Clone, PartialEq)]
pub struct EventSchema {
    /// Event type name
    pub name: String,
    /// Number of records of this event type
    pub frequency: usize,
    /// Top-level object node
    pub root: SchemaNode,
}

impl EventSchema {
    /// Create an empty schema
    pub fn new(name: impl Into<String>, frequency: usize) -> Self {
        Self {
            name: name.into(),
            frequency,
            root: SchemaNode::default(),
        }
    }

    /// Place one field path into the tree
    pub fn insert(&mut self, field: &FieldInfo) {
        let mut node = &mut self.root;
        for segment in field.path.split('.') {
            node = node.child_mut(segment);
        }
        node.annotate(field);
    }

    /// Find the node a field path points at
    pub fn resolve(&self, path: &str) -> Option<&SchemaNode> {
        let mut node = &self.root;
        for segment in path.split('.') {
            node = node.child(segment)?;
        }
        Some(node)
    }

    /// Every observed field path in the tree, in tree order
    pub fn paths(&self) -> Vec<String> {
        let mut paths = Vec::new();
        self.root.collect_paths("", &mut paths);
        paths
    }

    /// Render as a draft-07 JSON Schema document
    pub fn to_json(&self) -> Value {
        json!({
            "$schema": SCHEMA_DIALECT,
            "title": self.name,
            "type": "object",
            "x-frequency": self.frequency,
            "properties": properties_to_json(&self.root.properties),
        })
    }
}

/// Build the schema of one event type
///
/// Every path of the field table is placed exactly once, so the result does
/// not depend on the order fields are visited in.
pub fn synthesize(event: &EventInfo) -> EventSchema {
    let mut schema = EventSchema::new(&event.name, event.count);
    for field in event.fields.values() {
        schema.insert(field);
    }
    schema
}

/// Build the schema of every event type in a result
pub fn synthesize_all(result: &DiscoveryResult) -> BTreeMap<String, EventSchema> {
    result
        .events
        .iter()
        .map(|(name, event)| (name.clone(), synthesize(event)))
        .collect()
}

/// Render a set of schemas as one `event -> schema` document
pub fn schemas_to_json(schemas: &BTreeMap<String, EventSchema>) -> Value {
    Value::Object(
        schemas
            .iter()
            .map(|(name, schema)| (name.clone(), schema.to_json()))
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::{DiscoveryConfig, discover_fields, event_from_fields};

    fn event_of(record: Value) -> EventInfo {
        let mut event = EventInfo::new("tick");
        event.absorb_record(discover_fields(&record, &DiscoveryConfig::default()));
        event
    }

    fn field(path: &str, types: &[JsonType], count: usize, samples: &[Value]) -> FieldInfo {
        let mut info = FieldInfo::new(path, 5);
        info.types.extend(types.iter().copied());
        info.count = count;
        for s in samples {
            info.samples.insert(s.clone());
        }
        info
    }

    #[test]
    fn test_synthesize_nested_paths() {
        let schema = synthesize(&event_of(json!({
            "event": "tick",
            "data": {"price": 1.5, "tags": ["a", "b"], "leaderboard": [{"id": "p1"}]}
        })));
        let doc = schema.to_json();

        assert_eq!(doc["$schema"], json!(SCHEMA_DIALECT));
        assert_eq!(doc["title"], json!("tick"));
        assert_eq!(doc["x-frequency"], json!(1));

        let data = &doc["properties"]["data"];
        assert_eq!(data["type"], json!("object"));
        assert_eq!(data["properties"]["price"]["type"], json!("number"));
        assert_eq!(data["properties"]["price"]["examples"], json!([1.5]));
        assert_eq!(data["properties"]["tags"]["type"], json!("array"));
        assert_eq!(data["properties"]["tags"]["items"]["type"], json!("string"));
        assert_eq!(
            data["properties"]["leaderboard"]["items"]["properties"]["id"]["type"],
            json!("string")
        );
    }

    #[test]
    fn test_mixed_types_are_explicit() {
        let event = event_from_fields(
            "chat",
            3,
            [field("message", &[JsonType::Null, JsonType::String], 3, &[json!(null), json!("hi")])],
        );
        let doc = synthesize(&event).to_json();
        let message = &doc["properties"]["message"];

        assert_eq!(message["type"], json!("mixed"));
        assert_eq!(
            message["oneOf"],
            json!([{"type": "null"}, {"type": "string"}])
        );
    }

    #[test]
    fn test_structural_nodes_without_own_field() {
        let event = event_from_fields(
            "e",
            1,
            [field("a.items[].id", &[JsonType::Number], 2, &[json!(1)])],
        );
        let schema = synthesize(&event);

        let a = schema.resolve("a").unwrap();
        assert!(!a.is_observed());
        assert_eq!(a.inferred_type(), InferredType::Single(JsonType::Object));
        assert_eq!(
            schema.resolve("a.items").unwrap().inferred_type(),
            InferredType::Single(JsonType::Array)
        );
        assert_eq!(schema.paths(), vec!["a.items[].id".to_string()]);
    }

    #[test]
    fn test_resolve_and_paths_round_trip() {
        let event = event_of(json!({
            "event": "gameStateUpdate",
            "data": [
                "trace-1",
                {"gameId": "g1", "players": [{"id": 1, "bets": [1, 2]}]}
            ]
        }));
        let schema = synthesize(&event);

        let mut paths = schema.paths();
        paths.sort();
        let expected: Vec<String> = event.fields.keys().cloned().collect();
        assert_eq!(paths, expected);

        for path in event.fields.keys() {
            assert!(schema.resolve(path).is_some(), "unresolved {}", path);
        }
        assert!(schema.resolve("data[].missing").is_none());
    }

    #[test]
    fn test_format_annotation() {
        let event = event_from_fields(
            "e",
            2,
            [
                field(
                    "createdAt",
                    &[JsonType::String],
                    2,
                    &[json!("2024-01-01T00:00:00Z"), json!("2024-01-02T10:00:00Z")],
                ),
                field("name", &[JsonType::String], 2, &[json!("alice")]),
            ],
        );
        let doc = synthesize(&event).to_json();

        assert_eq!(doc["properties"]["createdAt"]["format"], json!("date-time"));
        assert!(doc["properties"]["name"].get("format").is_none());
    }

    #[test]
    fn test_synthesize_is_order_independent() {
        let fields = [
            field("data", &[JsonType::Object], 2, &[]),
            field("data.items", &[JsonType::Array], 2, &[]),
            field("data.items[]", &[JsonType::Object], 2, &[]),
            field("data.items[].x", &[JsonType::Number], 3, &[json!(1)]),
        ];
        let mut schema_a = EventSchema::new("e", 2);
        for f in fields.iter() {
            schema_a.insert(f);
        }
        let mut schema_b = EventSchema::new("e", 2);
        for f in fields.iter().rev() {
            schema_b.insert(f);
        }
        assert_eq!(schema_a, schema_b);
    }

    #[test]
    fn test_synthesize_all() {
        let mut result = DiscoveryResult::new();
        result.events.insert("a".to_string(), event_from_fields("a", 1, Vec::<FieldInfo>::new()));
        result.events.insert("b".to_string(), event_from_fields("b", 2, Vec::<FieldInfo>::new()));

        let schemas = synthesize_all(&result);
        assert_eq!(schemas.len(), 2);
        assert_eq!(schemas["b"].frequency, 2);
        assert_eq!(schemas_to_json(&schemas)["a"]["properties"], json!({}));
    }
}
