//! Glossary term detection and highlighting.

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::html::{escape_attr, map_text, strip_tags};

/// Words must be longer than this to count as terms.
const MIN_TERM_CHARS: usize = 3;

/// A capitalized word with a placeholder definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GlossaryTerm {
    /// The word as it appears in the text, punctuation included.
    pub term: String,
    /// Placeholder definition shown on hover.
    pub definition: String,
}

impl GlossaryTerm {
    fn new(term: &str) -> Self {
        Self {
            term: term.to_string(),
            definition: format!("Definition for {term}"),
        }
    }
}

/// Find glossary terms in plain text.
///
/// Every whitespace-separated word longer than three characters that starts
/// with an ASCII capital letter is a term. Repeated words are reported once,
/// in order of first appearance.
///
/// The result is a set of terms, not a list of occurrences: a word that
/// appears three times yields one [`GlossaryTerm`].
#[must_use]
pub fn identify_key_terms(content: &str) -> Vec<GlossaryTerm> {
    let mut terms: Vec<GlossaryTerm> = Vec::new();
    for word in content.split_whitespace() {
        let capitalized = word.chars().next().is_some_and(|c| c.is_ascii_uppercase());
        if capitalized
            && word.chars().count() > MIN_TERM_CHARS
            && !terms.iter().any(|t| t.term == word)
        {
            terms.push(GlossaryTerm::new(word));
        }
    }
    trace!(count = terms.len(), "Identified glossary terms");
    terms
}

/// Wrap every whole-word occurrence of a glossary term in a highlight span.
///
/// Terms are found in the tag-stripped text; only text outside tags is
/// rewritten.
#[must_use]
pub fn highlight_glossary(html: &str) -> String {
    let terms = identify_key_terms(&strip_tags(html));
    let Some(pattern) = terms_pattern(&terms) else {
        return html.to_string();
    };

    map_text(html, |text| {
        pattern
            .replace_all(text, |caps: &regex::Captures<'_>| {
                let term = &caps[0];
                format!(
                    r#"<span class="glossary-term" title="{}">{term}</span>"#,
                    escape_attr(&format!("Definition for {term}"))
                )
            })
            .into_owned()
    })
}

fn terms_pattern(terms: &[GlossaryTerm]) -> Option<Regex> {
    if terms.is_empty() {
        return None;
    }
    let mut escaped: Vec<String> = terms.iter().map(|t| regex::escape(&t.term)).collect();
    // Longest first so "Rustacean" wins over "Rust"
    escaped.sort_by_key(|t| std::cmp::Reverse(t.len()));
    Regex::new(&format!(r"\b(?:{})\b", escaped.join("|"))).ok()
}
