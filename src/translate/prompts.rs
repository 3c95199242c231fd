/*!
 * Prompt assembly and response cleanup.
 *
 * Chat models sometimes wrap translations in prefixes ("Translation:")
 * or quotes despite instructions. The cleanup here strips the common
 * decorations so downstream fields hold only the translated text.
 */

use once_cell::sync::Lazy;
use regex::Regex;

static PREFIX_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?i)^translation[:\s]+",
        r"(?i)^translated text[:\s]+",
        r"(?i)^here is the translation[:\s]+",
        r"^译文[：:]\s*",
        r"^翻译[：:]\s*",
        r"^【译文】\s*",
        r"^\[译文\]\s*",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("static regex"))
    .collect()
});

/// Fill the language placeholders of a system prompt template.
pub fn render_system_prompt(template: &str, source_language: &str, target_language: &str) -> String {
    template
        .replace("{source_language}", source_language)
        .replace("{target_language}", target_language)
}

/// Build the user message for one fragment. Context, when present, is
/// clearly fenced off so the model does not translate it.
pub fn build_user_prompt(text: &str, context: &str) -> String {
    if context.is_empty() {
        format!("Translate the following text:\n\n{}", text)
    } else {
        format!(
            "Surrounding document text, for reference only (do not translate it):\n{}\n\nTranslate the following text:\n\n{}",
            context, text
        )
    }
}

/// Strip prefix markers and wrapping quotes from a model response.
pub fn clean_output(text: &str) -> String {
    let mut cleaned = text.trim().to_string();

    for pattern in PREFIX_PATTERNS.iter() {
        cleaned = pattern.replace(&cleaned, "").into_owned();
    }

    for (open, close) in [('"', '"'), ('「', '」'), ('『', '』'), ('《', '》')] {
        if cleaned.len() >= 2 && cleaned.starts_with(open) && cleaned.ends_with(close) {
            cleaned = cleaned[open.len_utf8()..cleaned.len() - close.len_utf8()].to_string();
        }
    }

    cleaned.trim().to_string()
}
