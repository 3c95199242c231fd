/*!
 * Neighboring-text context windows.
 *
 * Translation quality improves when the provider sees a little of the
 * surrounding document (pronoun resolution, section continuation). The
 * context builder derives a bounded plain-text window from the nearest
 * text-bearing blocks before and after a position. It only biases
 * translation; it never changes which tasks exist and it cannot fail.
 */

use crate::document::Block;

/// Maximum characters taken from each direction.
const CONTEXT_CHARS: usize = 500;

/// Maximum blocks scanned in each direction looking for text.
const CONTEXT_SCAN_BLOCKS: usize = 3;

/// Build the context string for the block at `index`.
///
/// Returns the tail of the nearest preceding text and the head of the
/// nearest following text, labelled and joined. Empty at document edges
/// or when no neighboring block carries text.
pub fn build_context(blocks: &[Block], index: usize) -> String {
    let prev = preceding_text(blocks, index);
    let next = following_text(blocks, index);

    match (prev, next) {
        (None, None) => String::new(),
        (Some(p), None) => format!("[preceding] {}", p),
        (None, Some(n)) => format!("[following] {}", n),
        (Some(p), Some(n)) => format!("[preceding] {}\n[following] {}", p, n),
    }
}

fn preceding_text(blocks: &[Block], index: usize) -> Option<String> {
    blocks[..index]
        .iter()
        .rev()
        .take(CONTEXT_SCAN_BLOCKS)
        .find(|b| b.has_text())
        .and_then(|b| b.field_text("text"))
        .map(|t| tail_chars(t, CONTEXT_CHARS))
}

fn following_text(blocks: &[Block], index: usize) -> Option<String> {
    blocks
        .iter()
        .skip(index + 1)
        .take(CONTEXT_SCAN_BLOCKS)
        .find(|b| b.has_text())
        .and_then(|b| b.field_text("text"))
        .map(|t| head_chars(t, CONTEXT_CHARS))
}

/// Last `limit` characters of `text`, on char boundaries.
fn tail_chars(text: &str, limit: usize) -> String {
    let count = text.chars().count();
    if count <= limit {
        text.to_string()
    } else {
        text.chars().skip(count - limit).collect()
    }
}

/// First `limit` characters of `text`, on char boundaries.
fn head_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}
