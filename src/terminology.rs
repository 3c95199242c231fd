/*!
 * Terminology map loading and substitution.
 *
 * The terminology map is an immutable source-term to target-term table,
 * loaded once per run and consulted read-only by the batch translator as
 * a pre-processing step before each provider call.
 *
 * Substitution policy (deterministic): terms are applied longest source
 * term first so short terms never clobber longer ones that contain them;
 * matching is case-insensitive on whole-word boundaries; the configured
 * target term is inserted verbatim and the matched source casing is
 * discarded. URLs are masked with placeholders before substitution and
 * restored afterward so terms never rewrite link text.
 */

use log::{info, warn};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::collections::HashMap;
use std::path::Path;
use walkdir::WalkDir;

use crate::errors::TerminologyError;

static URL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"https?://[^\s<>"]+"#).expect("static regex"));

/// One compiled term: source pattern plus target replacement.
#[derive(Debug)]
struct Term {
    source: String,
    target: String,
    pattern: Regex,
}

/// Immutable terminology map with longest-match-first substitution.
#[derive(Debug, Default)]
pub struct Terminology {
    terms: Vec<Term>,
}

impl Terminology {
    /// Build from a source-to-target map.
    pub fn from_map(map: HashMap<String, String>) -> Self {
        let mut pairs: Vec<(String, String)> = map
            .into_iter()
            .filter(|(source, target)| !source.trim().is_empty() && !target.trim().is_empty())
            .collect();
        // Longest source first; ties broken lexically for determinism
        pairs.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

        let terms = pairs
            .into_iter()
            .filter_map(|(source, target)| {
                let pattern = format!(r"\b{}\b", regex::escape(&source));
                match RegexBuilder::new(&pattern).case_insensitive(true).build() {
                    Ok(pattern) => Some(Term {
                        source,
                        target,
                        pattern,
                    }),
                    Err(e) => {
                        warn!("skipping unusable term {:?}: {}", source, e);
                        None
                    }
                }
            })
            .collect();

        Self { terms }
    }

    /// Load and merge every terminology file under a directory.
    ///
    /// `.json` files hold a flat object of source to target strings;
    /// `.tsv` files hold one tab-separated pair per line (lines starting
    /// with `#` are ignored). Files are visited in path order and later
    /// files override earlier entries for the same source term.
    pub fn from_dir(dir: impl AsRef<Path>) -> Result<Self, TerminologyError> {
        let mut merged: HashMap<String, String> = HashMap::new();
        let mut file_count = 0usize;

        let mut paths: Vec<_> = WalkDir::new(dir.as_ref())
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_file())
            .map(|e| e.into_path())
            .collect();
        paths.sort();

        for path in paths {
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .map(str::to_ascii_lowercase);
            match ext.as_deref() {
                Some("json") => {
                    let content = read_file(&path)?;
                    let map: HashMap<String, String> =
                        serde_json::from_str(&content).map_err(|source| {
                            TerminologyError::Parse {
                                path: path.display().to_string(),
                                source,
                            }
                        })?;
                    merged.extend(map);
                    file_count += 1;
                }
                Some("tsv") => {
                    let content = read_file(&path)?;
                    for line in content.lines() {
                        let line = line.trim();
                        if line.is_empty() || line.starts_with('#') {
                            continue;
                        }
                        if let Some((source, target)) = line.split_once('\t') {
                            merged.insert(source.trim().to_string(), target.trim().to_string());
                        }
                    }
                    file_count += 1;
                }
                _ => {}
            }
        }

        info!(
            "loaded {} terminology entries from {} files",
            merged.len(),
            file_count
        );
        Ok(Self::from_map(merged))
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Apply every term to `text`, returning the substituted text and the
    /// number of replacements made.
    pub fn apply(&self, text: &str) -> (String, usize) {
        if self.terms.is_empty() || text.is_empty() {
            return (text.to_string(), 0);
        }

        // Mask URLs so term matches inside links are never rewritten
        let mut masked = text.to_string();
        let mut placeholders: Vec<(String, String)> = Vec::new();
        let mut urls: Vec<&str> = URL_PATTERN.find_iter(text).map(|m| m.as_str()).collect();
        urls.sort_by_key(|u| std::cmp::Reverse(u.len()));
        urls.dedup();
        for (i, url) in urls.into_iter().enumerate() {
            let placeholder = format!("\u{E000}URL{}\u{E001}", i);
            masked = masked.replace(url, &placeholder);
            placeholders.push((placeholder, url.to_string()));
        }

        let mut replaced = 0usize;
        for term in &self.terms {
            let count = term.pattern.find_iter(&masked).count();
            if count == 0 {
                continue;
            }
            masked = term
                .pattern
                .replace_all(&masked, regex::NoExpand(term.target.as_str()))
                .into_owned();
            replaced += count;
        }

        for (placeholder, url) in placeholders {
            masked = masked.replace(&placeholder, &url);
        }

        (masked, replaced)
    }

    /// Look up the exact target for a source term, if present.
    pub fn get(&self, source: &str) -> Option<&str> {
        self.terms
            .iter()
            .find(|t| t.source.eq_ignore_ascii_case(source))
            .map(|t| t.target.as_str())
    }
}

fn read_file(path: &Path) -> Result<String, TerminologyError> {
    std::fs::read_to_string(path).map_err(|source| TerminologyError::Io {
        path: path.display().to_string(),
        source,
    })
}
