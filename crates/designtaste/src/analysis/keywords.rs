use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

static RE_NON_LETTERS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^a-z]+").unwrap());

const STOP_WORDS: &[&str] = &["the", "and", "this", "that", "with", "for"];

/// Generic terms appended to every search.
pub const DESIGN_TERMS: &[&str] = &["modern", "clean", "minimal", "ui", "design", "interface"];

/// Builds the inspiration search keywords, deduplicated in first-seen order.
pub fn search_keywords(component: &str, user_prompt: &str, characteristics: &[String]) -> Vec<String> {
    let prompt = user_prompt.to_lowercase();
    let prompt_words = RE_NON_LETTERS
        .split(&prompt)
        .filter(|w| w.len() > 2 && !STOP_WORDS.contains(w));

    let candidates = std::iter::once(component)
        .chain(characteristics.iter().map(String::as_str))
        .chain(prompt_words)
        .chain(DESIGN_TERMS.iter().copied());

    let mut seen = HashSet::new();
    candidates
        .filter(|w| !w.is_empty() && seen.insert(*w))
        .map(str::to_string)
        .collect()
}
