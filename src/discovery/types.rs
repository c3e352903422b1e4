//! Discovered field, event and corpus types

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Marker appended to a path segment to address the elements of an array
pub const ARRAY_MARKER: &str = "[]";

/// Event name used when a record carries no event discriminator
pub const UNKNOWN_EVENT: &str = "unknown";

/// JSON type tag of an observed value
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JsonType {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl JsonType {
    /// Classify a JSON value
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => JsonType::Null,
            Value::Bool(_) => JsonType::Boolean,
            Value::Number(_) => JsonType::Number,
            Value::String(_) => JsonType::String,
            Value::Array(_) => JsonType::Array,
            Value::Object(_) => JsonType::Object,
        }
    }

    /// Get the JSON type name
    pub fn name(&self) -> &'static str {
        match self {
            JsonType::Null => "null",
            JsonType::Boolean => "boolean",
            JsonType::Number => "number",
            JsonType::String => "string",
            JsonType::Array => "array",
            JsonType::Object => "object",
        }
    }

    /// Scalars are sampled, containers are described structurally
    pub fn is_scalar(&self) -> bool {
        !matches!(self, JsonType::Array | JsonType::Object)
    }
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Type of a field path after all its observations
///
/// A path that was seen with more than one JSON type is widened to
/// `Mixed`, listing every observed type in a stable order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InferredType {
    /// Every observation had the same type
    Single(JsonType),
    /// Conflicting observations
    Mixed(Vec<JsonType>),
}

impl InferredType {
    /// Build from a set of observed types
    pub fn from_types<'a>(types: impl IntoIterator<Item = &'a JsonType>) -> Self {
        let mut types: Vec<JsonType> = types.into_iter().copied().collect();
        types.sort();
        types.dedup();
        if types.len() == 1 {
            InferredType::Single(types[0])
        } else {
            InferredType::Mixed(types)
        }
    }

    /// Get the type name (`"mixed"` for conflicting observations)
    pub fn type_name(&self) -> &'static str {
        match self {
            InferredType::Single(t) => t.name(),
            InferredType::Mixed(_) => "mixed",
        }
    }

    /// Whether observations conflicted
    pub fn is_mixed(&self) -> bool {
        matches!(self, InferredType::Mixed(_))
    }

    /// All observed types
    pub fn types(&self) -> Vec<JsonType> {
        match self {
            InferredType::Single(t) => vec![*t],
            InferredType::Mixed(types) => types.clone(),
        }
    }
}

impl fmt::Display for InferredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferredType::Single(t) => f.write_str(t.name()),
            InferredType::Mixed(types) => {
                let names: Vec<&str> = types.iter().map(|t| t.name()).collect();
                write!(f, "mixed({})", names.join("|"))
            }
        }
    }
}

impl Serialize for InferredType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.type_name())
    }
}

fn default_sample_cap() -> usize {
    5
}

/// Bounded, ordered list of distinct sample values
///
/// Keeps the first `cap` distinct values it is offered; later values are
/// dropped once the cap is reached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SampleSet {
    values: Vec<Value>,
    #[serde(skip, default = "default_sample_cap")]
    cap: usize,
}

impl SampleSet {
    /// Create an empty sample set holding at most `cap` values
    pub fn new(cap: usize) -> Self {
        Self {
            values: Vec::new(),
            cap,
        }
    }

    /// Offer a display value. Returns true if it was kept.
    pub fn insert(&mut self, value: Value) -> bool {
        if self.values.len() >= self.cap || self.values.contains(&value) {
            return false;
        }
        self.values.push(value);
        true
    }

    /// Merge with another sample set, keeping this set's values first
    pub fn merge_with(mut self, other: SampleSet) -> SampleSet {
        for value in other.values {
            if self.is_full() {
                break;
            }
            self.insert(value);
        }
        self
    }

    /// Whether the cap has been reached
    pub fn is_full(&self) -> bool {
        self.values.len() >= self.cap
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.values.iter()
    }
}

impl Default for SampleSet {
    fn default() -> Self {
        Self::new(default_sample_cap())
    }
}

/// Convert a raw value into the form stored as a sample
///
/// Strings longer than `max_len` characters are cut to `max_len`
/// characters followed by `...`; other values are kept as they are.
pub fn display_value(value: &Value, max_len: usize) -> Value {
    match value {
        Value::String(s) if s.chars().count() > max_len => {
            let mut truncated: String = s.chars().take(max_len).collect();
            truncated.push_str("...");
            Value::String(truncated)
        }
        other => other.clone(),
    }
}

/// Sample recorded for objects that are not descended into
pub fn opaque_object_sample(key_count: usize) -> Value {
    Value::String(format!("<object with {} keys>", key_count))
}

/// Information about a discovered field path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldInfo {
    /// Full path (e.g. `data.leaderboard[].pnl`)
    pub path: String,
    /// Every JSON type observed at this path
    pub types: BTreeSet<JsonType>,
    /// Number of times this path was observed
    pub count: usize,
    /// Distinct example values
    pub samples: SampleSet,
}

impl FieldInfo {
    /// Create a field with no observations yet
    pub fn new(path: impl Into<String>, max_samples: usize) -> Self {
        Self {
            path: path.into(),
            types: BTreeSet::new(),
            count: 0,
            samples: SampleSet::new(max_samples),
        }
    }

    /// Record one observation of the given type
    pub fn observe(&mut self, json_type: JsonType) {
        self.types.insert(json_type);
        self.count += 1;
    }

    /// Record one occurrence that carried several types at once
    /// (the element path of a heterogeneous array)
    pub fn observe_many(&mut self, types: impl IntoIterator<Item = JsonType>) {
        self.types.extend(types);
        self.count += 1;
    }

    /// The single observed type, or `Mixed` on conflict
    pub fn inferred_type(&self) -> InferredType {
        InferredType::from_types(&self.types)
    }

    /// Merge with another observation of the same path
    pub fn merge_with(mut self, other: FieldInfo) -> FieldInfo {
        self.count += other.count;
        self.types.extend(other.types);
        self.samples = self.samples.merge_with(other.samples);
        self
    }
}

/// Information about a discovered event type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventInfo {
    /// Event type name
    pub name: String,
    /// Number of records of this type
    pub count: usize,
    /// Field paths observed in this event type
    pub fields: BTreeMap<String, FieldInfo>,
}

impl EventInfo {
    /// Create an empty event
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            count: 0,
            fields: BTreeMap::new(),
        }
    }

    /// Fold one record's walker output into this event
    pub fn absorb_record(&mut self, fields: BTreeMap<String, FieldInfo>) {
        self.count += 1;
        self.fields = super::merge::merge_field_maps(std::mem::take(&mut self.fields), fields);
    }

    /// Merge with another event table of the same name
    pub fn merge_with(self, other: EventInfo) -> EventInfo {
        EventInfo {
            name: self.name,
            count: self.count + other.count,
            fields: super::merge::merge_field_maps(self.fields, other.fields),
        }
    }
}

/// Complete discovery results from scanning captures
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryResult {
    /// Events keyed by name
    pub events: BTreeMap<String, EventInfo>,
    /// Non-blank lines attempted, malformed ones included
    pub total_records: usize,
    /// Number of capture files scanned
    pub files_scanned: usize,
    /// Per-line parse errors as `file:line: message`
    pub errors: Vec<String>,
}

impl DiscoveryResult {
    /// Create an empty result
    pub fn new() -> Self {
        Self::default()
    }

    /// Every field path seen in any event
    pub fn all_field_paths(&self) -> BTreeSet<String> {
        self.events
            .values()
            .flat_map(|event| event.fields.keys().cloned())
            .collect()
    }

    /// Field paths summed per event (a path shared by two events counts twice)
    pub fn total_field_paths(&self) -> usize {
        self.events.values().map(|e| e.fields.len()).sum()
    }

    /// Number of records that parsed successfully
    pub fn parsed_records(&self) -> usize {
        self.events.values().map(|e| e.count).sum()
    }

    /// Merge with another result, keeping this result's errors and samples first
    pub fn merge_with(self, other: DiscoveryResult) -> DiscoveryResult {
        super::merge::merge_results(self, other)
    }
}
