//! Flat cross-event field index

use std::collections::{BTreeMap, BTreeSet};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::discovery::{DiscoveryResult, FieldInfo, InferredType, JsonType, SampleSet};

/// Everything known about one field path across all event types
#[derive(Debug, Clone, PartialEq)]
pub struct FieldIndexEntry {
    /// Field path
    pub path: String,
    /// Types observed under any event
    pub types: BTreeSet<JsonType>,
    /// Occurrences summed over events
    pub frequency: usize,
    /// Events the path appears in
    pub events: BTreeSet<String>,
    /// Samples merged across events, capped
    pub samples: SampleSet,
}

impl FieldIndexEntry {
    /// Create an empty entry
    pub fn new(path: impl Into<String>, max_samples: usize) -> Self {
        Self {
            path: path.into(),
            types: BTreeSet::new(),
            frequency: 0,
            events: BTreeSet::new(),
            samples: SampleSet::new(max_samples),
        }
    }

    /// Fold one event's view of this path into the entry
    pub fn absorb(&mut self, event: &str, field: &FieldInfo) {
        self.events.insert(event.to_string());
        self.frequency += field.count;
        self.types.extend(field.types.iter().copied());
        for sample in field.samples.iter() {
            if self.samples.is_full() {
                break;
            }
            self.samples.insert(sample.clone());
        }
    }

    /// Type over all events, `Mixed` on conflict
    pub fn inferred_type(&self) -> InferredType {
        InferredType::from_types(&self.types)
    }
}

impl Serialize for FieldIndexEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let inferred = self.inferred_type();
        let mut map = serializer.serialize_map(None)?;

        if self.events.len() == 1 {
            if let Some(event) = self.events.iter().next() {
                map.serialize_entry("event", event)?;
            }
        } else {
            map.serialize_entry("events", &self.events)?;
        }
        map.serialize_entry("type", inferred.type_name())?;
        if let InferredType::Mixed(types) = &inferred {
            map.serialize_entry("types", types)?;
        }
        map.serialize_entry("frequency", &self.frequency)?;
        map.serialize_entry("samples", &self.samples)?;

        map.end()
    }
}

/// Path → entry, ordered by path
pub type FieldIndex = BTreeMap<String, FieldIndexEntry>;

/// Build the flat field index of a discovery result
///
/// Events are visited in name order, which fixes the sample selection.
pub fn build_field_index(result: &DiscoveryResult, max_samples: usize) -> FieldIndex {
    let mut index = FieldIndex::new();
    for (event_name, event) in &result.events {
        for (path, field) in &event.fields {
            index
                .entry(path.clone())
                .or_insert_with(|| FieldIndexEntry::new(path.clone(), max_samples))
                .absorb(event_name, field);
        }
    }
    index
}
