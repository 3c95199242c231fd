/*!
 * Order-preserving result write-back.
 *
 * Reattachment runs strictly after all concurrent translation work has
 * settled, so it works on a plain `&mut Document` with no locking. Each
 * result is written into its originating block's output field by index;
 * item-by-item list results are reformed positionally so the output list
 * always has exactly as many entries as the source list, with failed
 * positions holding an explicit marker instead of vanishing.
 *
 * Writes are assignments, never appends, so reapplying the same results
 * produces identical output.
 */

use serde_json::Value;

use crate::collector::TranslationTask;
use crate::document::Document;
use crate::registry::ExtractionMode;
use crate::translate::TaskOutcome;

/// Marker prefixed to fragments whose translation failed. Visible to
/// reviewers and downstream consumers; the original text follows it.
pub const FAILURE_MARKER: &str = "[[untranslated]]";

/// The value written for a failed fragment.
pub fn failure_placeholder(original: &str) -> String {
    format!("{} {}", FAILURE_MARKER, original)
}

/// Whether a written value is the failure placeholder.
pub fn is_failure_placeholder(value: &str) -> bool {
    value.starts_with(FAILURE_MARKER)
}

/// Write each task's outcome onto its originating block.
///
/// Tasks and outcomes correspond by position; outcomes beyond the task
/// list are ignored. Blocks that produced no tasks are left untouched.
pub fn reattach(document: &mut Document, tasks: &[TranslationTask], outcomes: &[TaskOutcome]) {
    for (task, outcome) in tasks.iter().zip(outcomes) {
        let Some(block) = document.blocks.get_mut(task.block_index) else {
            continue;
        };

        let text = match outcome {
            TaskOutcome::Translated(text) => text.clone(),
            TaskOutcome::Failed(_) => failure_placeholder(&task.text),
        };

        match task.mode {
            ExtractionMode::ListItemByItem => {
                // Seed the output list from the source list so positions
                // without a task keep their original text, then assign
                // this item's slot.
                let seed = block
                    .fields
                    .get(task.source_field)
                    .and_then(Value::as_array)
                    .cloned()
                    .unwrap_or_default();

                let entry = block
                    .fields
                    .entry(task.output_field.to_string())
                    .or_insert_with(|| {
                        let mut items = seed;
                        items.resize(task.item_count, Value::Null);
                        Value::Array(items)
                    });

                if let Value::Array(items) = entry {
                    if items.len() != task.item_count {
                        items.resize(task.item_count, Value::Null);
                    }
                    items[task.item_index] = Value::String(text);
                }
            }
            ExtractionMode::SingleString | ExtractionMode::JoinedList => {
                block.set_field(task.output_field, Value::String(text));
            }
        }
    }
}
