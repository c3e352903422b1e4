//! Text chunks for downstream embedding
//!
//! Renders synthesized schemas and field index entries as short plain-text
//! records. No discovery happens here; the input is whatever the schema
//! module produced.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::discovery::DiscoveryResult;
use crate::report::format_count;
use crate::schema::{EventSchema, FieldIndex, SchemaNode, synthesize_all};

/// Examples quoted per chunk
const CHUNK_EXAMPLE_LIMIT: usize = 3;

/// What a chunk documents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkKind {
    /// Event overview
    Schema,
    /// One field path
    Field,
}

/// A short text record describing an event or a field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaChunk {
    pub text: String,
    /// Locator such as `schemas/trade.json#data.price`
    pub source: String,
    pub event_type: String,
    pub doc_type: ChunkKind,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub field_path: Option<String>,
}

/// Formats schemas and index entries into chunks
#[derive(Debug, Clone, Default)]
pub struct ChunkFormatter {
    protocol: Option<String>,
}

impl ChunkFormatter {
    /// Create a formatter
    pub fn new() -> Self {
        Self::default()
    }

    /// Name the protocol in event overview chunks
    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    /// One overview chunk for the event plus one chunk per field path
    pub fn chunk_event_schema(&self, schema: &EventSchema) -> Vec<SchemaChunk> {
        let mut text = format!(
            "Event: {}\nType: event stream message\nFrequency: {} occurrences in captures",
            schema.name,
            format_count(schema.frequency)
        );
        if let Some(protocol) = &self.protocol {
            text.push_str(&format!("\n\nThis event is part of the {} protocol.", protocol));
        }

        let mut chunks = vec![SchemaChunk {
            text,
            source: format!("schemas/{}.json", schema.name),
            event_type: schema.name.clone(),
            doc_type: ChunkKind::Schema,
            field_path: None,
        }];
        push_field_chunks(&mut chunks, &schema.name, &schema.root, "");
        chunks
    }

    /// One chunk per field index entry, in path order
    pub fn chunk_field_index(&self, index: &FieldIndex) -> Vec<SchemaChunk> {
        index
            .values()
            .map(|entry| {
                let events: Vec<&str> = entry.events.iter().map(String::as_str).collect();
                let mut text = format!(
                    "Field Path: {}\nType: {}\nEvents: {}\nFrequency: {} occurrences",
                    entry.path,
                    entry.inferred_type(),
                    events.join(", "),
                    format_count(entry.frequency)
                );
                if !entry.samples.is_empty() {
                    text.push_str(&format!(
                        "\nSample values: {}",
                        examples_text(entry.samples.values())
                    ));
                }

                SchemaChunk {
                    text,
                    source: format!("field_index.json#{}", entry.path),
                    event_type: events.first().copied().unwrap_or_default().to_string(),
                    doc_type: ChunkKind::Field,
                    field_path: Some(entry.path.clone()),
                }
            })
            .collect()
    }

    /// Synthesize every event schema of a result and chunk it
    pub fn chunk_discovery_result(&self, result: &DiscoveryResult) -> Vec<SchemaChunk> {
        synthesize_all(result)
            .values()
            .flat_map(|schema| self.chunk_event_schema(schema))
            .collect()
    }
}

fn push_field_chunks(chunks: &mut Vec<SchemaChunk>, event: &str, node: &SchemaNode, prefix: &str) {
    for (name, child) in &node.properties {
        let path = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", prefix, name)
        };

        let mut text = format!(
            "Field: {}\nEvent: {}\nType: {}",
            path,
            event,
            child.inferred_type()
        );
        if child.frequency > 0 {
            text.push_str(&format!(
                "\nFrequency: {} occurrences",
                format_count(child.frequency)
            ));
        }
        if !child.examples.is_empty() {
            text.push_str(&format!("\nExample values: {}", examples_text(&child.examples)));
        }

        chunks.push(SchemaChunk {
            text,
            source: format!("schemas/{}.json#{}", event, path),
            event_type: event.to_string(),
            doc_type: ChunkKind::Field,
            field_path: Some(path.clone()),
        });

        push_field_chunks(chunks, event, child, &path);
        if let Some(items) = &child.items {
            push_field_chunks(chunks, event, items, &format!("{}[]", path));
        }
    }
}

fn examples_text(values: &[Value]) -> String {
    let shown = &values[..values.len().min(CHUNK_EXAMPLE_LIMIT)];
    Value::Array(shown.to_vec()).to_string()
}
