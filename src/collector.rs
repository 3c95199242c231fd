/*!
 * Translation task collection.
 *
 * The collector walks the ordered block sequence once, consults the
 * registry for each block's kind, and produces a flat, ordered list of
 * translation tasks. Blocks never leave the document: a block that yields
 * no tasks simply passes through untouched, and blocks that did yield
 * tasks are mutated in place later by result reattachment.
 */

use log::debug;

use crate::context::build_context;
use crate::document::Document;
use crate::registry::{ExtractionMode, Registry};

/// Control-character ratio above which text is treated as OCR garbage.
const GARBAGE_RATIO: f64 = 0.8;

/// One unit of translatable text derived from a block field.
///
/// Created once by the collector, read-only afterward; the only write
/// tied to a task is the one reattachment performs on its block.
#[derive(Debug, Clone)]
pub struct TranslationTask {
    /// Index of the originating block in the document
    pub block_index: usize,
    /// Page the originating block sits on
    pub page_index: usize,
    /// Field the text was read from
    pub source_field: &'static str,
    /// Field the translation is written to
    pub output_field: &'static str,
    /// Extraction mode the field rule declared
    pub mode: ExtractionMode,
    /// Position within the source list for `ListItemByItem` fields
    pub item_index: usize,
    /// Total item count of the source list (1 for non-list tasks)
    pub item_count: usize,
    /// The raw text to translate
    pub text: String,
    /// Neighboring-text context (may be empty)
    pub context: String,
}

/// Walks a document and derives its translation tasks.
pub struct TaskCollector<'a> {
    registry: &'a Registry,
}

impl<'a> TaskCollector<'a> {
    pub fn new(registry: &'a Registry) -> Self {
        Self { registry }
    }

    /// Produce the ordered task list for a document.
    ///
    /// For each block, each translatable field present and non-empty
    /// yields one task, except item-by-item list fields which yield one
    /// task per item so each item gets independent context and retry.
    pub fn collect(&self, document: &Document) -> Vec<TranslationTask> {
        let mut tasks = Vec::new();

        for (block_index, block) in document.blocks.iter().enumerate() {
            let entry = self.registry.classify(&block.kind);
            if entry.translatable_fields.is_empty() {
                continue;
            }

            let context = build_context(&document.blocks, block_index);
            let page_index = block.page_index;

            for rule in &entry.translatable_fields {
                match rule.mode {
                    ExtractionMode::SingleString => {
                        if let Some(text) = block.field_text(rule.source_field) {
                            self.push_task(&mut tasks, block_index, page_index, rule, 0, 1, text, &context);
                        }
                    }
                    ExtractionMode::JoinedList => {
                        if let Some(text) = block.field_joined(rule.source_field) {
                            self.push_task(&mut tasks, block_index, page_index, rule, 0, 1, &text, &context);
                        }
                    }
                    ExtractionMode::ListItemByItem => {
                        if let Some(items) = block.field_list(rule.source_field) {
                            let count = items.len();
                            for (item_index, item) in items.into_iter().enumerate() {
                                self.push_task(
                                    &mut tasks,
                                    block_index,
                                    page_index,
                                    rule,
                                    item_index,
                                    count,
                                    item,
                                    &context,
                                );
                            }
                        }
                    }
                }
            }
        }

        debug!("collected {} translation tasks from {} blocks", tasks.len(), document.len());
        tasks
    }

    #[allow(clippy::too_many_arguments)]
    fn push_task(
        &self,
        tasks: &mut Vec<TranslationTask>,
        block_index: usize,
        page_index: usize,
        rule: &crate::registry::FieldRule,
        item_index: usize,
        item_count: usize,
        text: &str,
        context: &str,
    ) {
        if text.trim().is_empty() {
            return;
        }
        if is_garbage_text(text) {
            debug!(
                "skipping garbage text on block {} field {}",
                block_index, rule.source_field
            );
            return;
        }
        tasks.push(TranslationTask {
            block_index,
            page_index,
            source_field: rule.source_field,
            output_field: rule.output_field,
            mode: rule.mode,
            item_index,
            item_count,
            text: text.to_string(),
            context: context.to_string(),
        });
    }
}

/// Detect OCR control-character garbage. Short strings are never flagged;
/// newlines, tabs and carriage returns do not count as control characters.
pub fn is_garbage_text(text: &str) -> bool {
    let count = text.chars().count();
    if count < 10 {
        return false;
    }
    let control = text
        .chars()
        .filter(|c| (*c as u32) < 32 && !matches!(c, '\n' | '\t' | '\r'))
        .count();
    control as f64 / count as f64 > GARBAGE_RATIO
}
