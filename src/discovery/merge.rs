//! Merging of discovery results
//!
//! All merges consume both sides and return a new aggregate, so per-file
//! results produced on worker threads can be reduced without locks.
//! Counts are commutative and associative; samples keep left-hand values
//! first, so reducing in file order reproduces a serial scan exactly.

use std::collections::BTreeMap;

use super::types::{DiscoveryResult, EventInfo, FieldInfo};

/// Union two field tables by path, summing counts and merging samples
pub fn merge_field_maps(
    mut left: BTreeMap<String, FieldInfo>,
    right: BTreeMap<String, FieldInfo>,
) -> BTreeMap<String, FieldInfo> {
    for (path, info) in right {
        match left.remove(&path) {
            Some(existing) => {
                left.insert(path, existing.merge_with(info));
            }
            None => {
                left.insert(path, info);
            }
        }
    }
    left
}

/// Merge two discovery results
pub fn merge_results(mut left: DiscoveryResult, right: DiscoveryResult) -> DiscoveryResult {
    left.total_records += right.total_records;
    left.files_scanned += right.files_scanned;
    left.errors.extend(right.errors);

    for (name, event) in right.events {
        match left.events.remove(&name) {
            Some(existing) => {
                left.events.insert(name, existing.merge_with(event));
            }
            None => {
                left.events.insert(name, event);
            }
        }
    }

    left
}

/// Reduce any number of results in iteration order
pub fn merge_all(results: impl IntoIterator<Item = DiscoveryResult>) -> DiscoveryResult {
    results
        .into_iter()
        .fold(DiscoveryResult::new(), merge_results)
}

/// Counts-only view used to compare aggregates independent of sample order
pub fn count_signature(result: &DiscoveryResult) -> BTreeMap<(String, String), usize> {
    let mut signature = BTreeMap::new();
    for (name, event) in &result.events {
        signature.insert((name.clone(), String::new()), event.count);
        for (path, field) in &event.fields {
            signature.insert((name.clone(), path.clone()), field.count);
        }
    }
    signature
}

/// Build an event table from already-collected fields
pub fn event_from_fields(
    name: &str,
    count: usize,
    fields: impl IntoIterator<Item = FieldInfo>,
) -> EventInfo {
    let mut event = EventInfo::new(name);
    event.count = count;
    for field in fields {
        let single = BTreeMap::from([(field.path.clone(), field)]);
        event.fields = merge_field_maps(std::mem::take(&mut event.fields), single);
    }
    event
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::types::JsonType;
    use serde_json::json;

    fn field(path: &str, json_type: JsonType, count: usize, samples: &[serde_json::Value]) -> FieldInfo {
        let mut info = FieldInfo::new(path, 5);
        for _ in 0..count {
            info.observe(json_type);
        }
        for s in samples {
            info.samples.insert(s.clone());
        }
        info
    }

    fn result(files: usize, records: usize, events: Vec<EventInfo>, errors: &[&str]) -> DiscoveryResult {
        DiscoveryResult {
            events: events.into_iter().map(|e| (e.name.clone(), e)).collect(),
            total_records: records,
            files_scanned: files,
            errors: errors.iter().map(|e| e.to_string()).collect(),
        }
    }

    fn sample_results() -> (DiscoveryResult, DiscoveryResult, DiscoveryResult) {
        let a = result(
            1,
            3,
            vec![event_from_fields(
                "trade",
                2,
                [field("price", JsonType::Number, 2, &[json!(1.0), json!(2.0)])],
            )],
            &["a.jsonl:3: bad"],
        );
        let b = result(
            1,
            2,
            vec![
                event_from_fields(
                    "trade",
                    1,
                    [field("price", JsonType::Number, 1, &[json!(3.0)])],
                ),
                event_from_fields("chat", 1, [field("message", JsonType::String, 1, &[json!("hi")])]),
            ],
            &[],
        );
        let c = result(
            1,
            1,
            vec![event_from_fields(
                "chat",
                1,
                [field("message", JsonType::Null, 1, &[json!(null)])],
            )],
            &["c.jsonl:1: bad"],
        );
        (a, b, c)
    }

    #[test]
    fn test_merge_sums_totals() {
        let (a, b, _) = sample_results();
        let merged = merge_results(a, b);

        assert_eq!(merged.files_scanned, 2);
        assert_eq!(merged.total_records, 5);
        assert_eq!(merged.events["trade"].count, 3);
        assert_eq!(merged.events["trade"].fields["price"].count, 3);
        assert_eq!(merged.events["chat"].count, 1);
        assert_eq!(merged.errors, vec!["a.jsonl:3: bad".to_string()]);
    }

    #[test]
    fn test_merge_commutative_counts() {
        let (a, b, _) = sample_results();
        let ab = merge_results(a.clone(), b.clone());
        let ba = merge_results(b, a);
        assert_eq!(count_signature(&ab), count_signature(&ba));
        assert_eq!(ab.total_records, ba.total_records);
    }

    #[test]
    fn test_merge_associative() {
        let (a, b, c) = sample_results();
        let left = merge_results(merge_results(a.clone(), b.clone()), c.clone());
        let right = merge_results(a, merge_results(b, c));
        assert_eq!(left, right);
    }

    #[test]
    fn test_merge_widens_conflicting_types() {
        let (_, b, c) = sample_results();
        let merged = merge_results(b, c);
        let message = &merged.events["chat"].fields["message"];
        assert_eq!(message.count, 2);
        assert!(message.inferred_type().is_mixed());
        assert_eq!(message.samples.values(), &[json!("hi"), json!(null)]);
    }

    #[test]
    fn test_merge_all_empty() {
        let merged = merge_all(Vec::<DiscoveryResult>::new());
        assert_eq!(merged, DiscoveryResult::new());
    }

    #[test]
    fn test_merge_self_doubles_counts() {
        let (a, _, _) = sample_results();
        let doubled = merge_results(a.clone(), a.clone());
        for ((event, path), count) in count_signature(&doubled) {
            let original = count_signature(&a)[&(event, path)];
            assert_eq!(count, original * 2);
        }
    }
}
