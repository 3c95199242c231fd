/*!
 * Block and document data model.
 *
 * A document is the flat, ordered block sequence the extraction service
 * emits for one source file. Each block carries an open-ended `kind` tag,
 * a page index, an opaque bounding box, and a kind-dependent set of named
 * fields whose values are either a single string or a list of strings.
 *
 * Which field names matter for a given kind is decided entirely by the
 * registry (`crate::registry`); this model never branches on field values.
 */

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::registry::Registry;

/// One content unit on one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    /// Kind tag from an open, extensible set ("text", "table", "list", ...)
    #[serde(rename = "type")]
    pub kind: String,

    /// Zero-based page index, non-decreasing across the sequence
    #[serde(rename = "page_idx", default)]
    pub page_index: usize,

    /// Bounding box, opaque to this library and passed through unchanged
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bbox: Option<Vec<f64>>,

    /// Kind-dependent fields (string or string-list values)
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Block {
    /// Create a block with the given kind and no fields.
    pub fn new(kind: impl Into<String>, page_index: usize) -> Self {
        Self {
            kind: kind.into(),
            page_index,
            bbox: None,
            fields: Map::new(),
        }
    }

    /// Read a field as a single string. Returns `None` when the field is
    /// absent or not a string.
    pub fn field_text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).and_then(Value::as_str)
    }

    /// Read a field as an ordered list of strings. Non-string items are
    /// skipped rather than failing the whole read.
    pub fn field_list(&self, name: &str) -> Option<Vec<&str>> {
        self.fields.get(name).and_then(Value::as_array).map(|items| {
            items.iter().filter_map(Value::as_str).collect()
        })
    }

    /// Read a field as text, joining list values with spaces. This is how
    /// captions given as a list of lines are flattened for translation.
    pub fn field_joined(&self, name: &str) -> Option<String> {
        match self.fields.get(name)? {
            Value::String(s) => Some(s.clone()),
            Value::Array(items) => {
                let parts: Vec<&str> = items.iter().filter_map(Value::as_str).collect();
                if parts.is_empty() {
                    None
                } else {
                    Some(parts.join(" "))
                }
            }
            _ => None,
        }
    }

    /// Write a field value. Used only by result reattachment.
    pub fn set_field(&mut self, name: &str, value: Value) {
        self.fields.insert(name.to_string(), value);
    }

    /// Whether the block carries any human-readable text under the given
    /// registry entry's source fields. Used by the context builder.
    pub fn has_text(&self) -> bool {
        self.field_text("text").is_some_and(|t| !t.trim().is_empty())
    }
}

/// An ordered sequence of blocks for one source document.
///
/// Order is significant and preserved end-to-end: output consumers see
/// blocks in exactly the input order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    pub blocks: Vec<Block>,
}

impl Document {
    /// Construct a document from a block sequence.
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Parse the extraction service's content-list JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Ordered view of the blocks a renderer should emit: every block in
    /// original order whose kind the registry marks output-eligible.
    /// Unknown kinds use the registry default and are therefore included.
    pub fn output_blocks<'a>(&'a self, registry: &'a Registry) -> impl Iterator<Item = &'a Block> {
        self.blocks
            .iter()
            .filter(|block| registry.classify(&block.kind).output_eligible)
    }
}
