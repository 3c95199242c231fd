/*!
 * Per-kind translation capability table.
 *
 * The registry maps each block kind to the fields worth translating, how
 * to extract them, and whether blocks of that kind reach the output at
 * all. Kinds the registry has never seen get a default entry that is
 * output-eligible with no translatable fields, so new extractor block
 * types degrade to safe pass-through instead of being dropped.
 */

use once_cell::sync::Lazy;
use std::collections::HashMap;

/// How a translatable field's value is turned into translation tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionMode {
    /// The field holds one string; one task.
    SingleString,
    /// The field holds a list; one independent task per item, results
    /// reassembled positionally.
    ListItemByItem,
    /// The field holds a list that reads as one text (caption lines);
    /// joined with spaces into a single task.
    JoinedList,
}

/// One translatable field of a block kind.
#[derive(Debug, Clone)]
pub struct FieldRule {
    /// Field read from the block
    pub source_field: &'static str,
    /// Field the translation is written to
    pub output_field: &'static str,
    /// Extraction mode for the field value
    pub mode: ExtractionMode,
}

impl FieldRule {
    pub const fn new(
        source_field: &'static str,
        output_field: &'static str,
        mode: ExtractionMode,
    ) -> Self {
        Self {
            source_field,
            output_field,
            mode,
        }
    }
}

/// Capability entry for one block kind.
#[derive(Debug, Clone)]
pub struct KindEntry {
    /// Fields the task collector extracts, in order
    pub translatable_fields: Vec<FieldRule>,
    /// Whether blocks of this kind reach the output sequence
    pub output_eligible: bool,
}

impl KindEntry {
    /// Pass-through entry: eligible for output, nothing to translate.
    pub fn passthrough() -> Self {
        Self {
            translatable_fields: Vec::new(),
            output_eligible: true,
        }
    }

    /// Suppressed entry: excluded from output entirely.
    pub fn suppressed() -> Self {
        Self {
            translatable_fields: Vec::new(),
            output_eligible: false,
        }
    }

    fn translating(fields: Vec<FieldRule>) -> Self {
        Self {
            translatable_fields: fields,
            output_eligible: true,
        }
    }
}

/// Shared default for kinds not present in the table. Eligible and empty:
/// unknown kinds must still pass through to output unmodified.
static DEFAULT_ENTRY: Lazy<KindEntry> = Lazy::new(KindEntry::passthrough);

/// Capability table mapping kind tags to their entries.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    entries: HashMap<String, KindEntry>,
}

impl Registry {
    /// Empty registry: every kind passes through untranslated.
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock policy for the MinerU-style block vocabulary.
    ///
    /// Translation eligibility is an explicit opt-in per kind; everything
    /// else, known or not, passes through. Callers wanting a different
    /// policy (e.g. suppressing page-number stamps) build their own table
    /// with [`Registry::insert`].
    pub fn standard() -> Self {
        use ExtractionMode::{JoinedList, ListItemByItem, SingleString};

        let mut registry = Self::new();
        registry.insert(
            "text",
            KindEntry::translating(vec![FieldRule::new("text", "text_translated", SingleString)]),
        );
        registry.insert(
            "page_footnote",
            KindEntry::translating(vec![FieldRule::new("text", "text_translated", SingleString)]),
        );
        registry.insert(
            "list",
            KindEntry::translating(vec![FieldRule::new(
                "list_items",
                "list_items_translated",
                ListItemByItem,
            )]),
        );
        registry.insert(
            "table",
            KindEntry::translating(vec![
                FieldRule::new("table_caption", "table_caption_translated", JoinedList),
                FieldRule::new("table_body", "table_body_translated", SingleString),
            ]),
        );
        registry.insert(
            "image",
            KindEntry::translating(vec![
                FieldRule::new("image_caption", "image_caption_translated", JoinedList),
                FieldRule::new("image_footnote", "image_footnote_translated", JoinedList),
            ]),
        );

        // Known kinds with nothing to translate still get explicit entries
        // so the stock policy is visible in one place.
        for kind in ["header", "footer", "page_number", "reference", "code"] {
            registry.insert(kind, KindEntry::passthrough());
        }

        registry
    }

    /// Insert or replace the entry for a kind.
    pub fn insert(&mut self, kind: impl Into<String>, entry: KindEntry) {
        self.entries.insert(kind.into(), entry);
    }

    /// Look up the entry for a kind, falling back to the shared default
    /// for kinds the table has never seen.
    pub fn classify(&self, kind: &str) -> &KindEntry {
        self.entries.get(kind).unwrap_or(&DEFAULT_ENTRY)
    }

    /// Whether the registry has an explicit entry for a kind.
    pub fn knows(&self, kind: &str) -> bool {
        self.entries.contains_key(kind)
    }
}
