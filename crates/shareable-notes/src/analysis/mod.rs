//! Heuristic analysis of note content.
//!
//! Everything here is local string matching on the note's HTML:
//!
//! - **Insights**: rule-based suggestions (length, action items, questions,
//!   sentiment, programming themes).
//! - **Glossary**: capitalized words annotated with a placeholder definition.
//! - **Grammar**: simple hints such as a possible "it's".
//!
//! # Example
//!
//! ```
//! use shareable_notes::analysis::{analyze, highlight_glossary};
//!
//! let report = analyze("<p>todo: read about Tokio?</p>");
//! assert!(!report.insights.is_empty());
//! assert_eq!(report.glossary[0].term, "Tokio?");
//!
//! let html = highlight_glossary("<p>Tokio rocks</p>");
//! assert!(html.contains("glossary-term"));
//! ```

mod glossary;
mod grammar;
mod html;
mod insights;

use serde::{Deserialize, Serialize};

pub use glossary::{highlight_glossary, identify_key_terms, GlossaryTerm};
pub use grammar::{check_grammar, highlight_grammar, GrammarIssue};
pub use html::{map_text, strip_tags};
pub use insights::{generate_insights, Insight, InsightKind, LENGTHY_NOTE_CHARS, PROGRAMMING_KEYWORDS};

/// All heuristic results for one piece of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Analysis {
    /// Rule-based suggestions, in rule order.
    pub insights: Vec<Insight>,
    /// Glossary terms in order of first appearance.
    pub glossary: Vec<GlossaryTerm>,
    /// Grammar hints.
    pub grammar: Vec<GrammarIssue>,
}

impl Analysis {
    /// Whether no rule produced anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.insights.is_empty() && self.glossary.is_empty() && self.grammar.is_empty()
    }
}

/// Run every heuristic over HTML content.
#[must_use]
pub fn analyze(content: &str) -> Analysis {
    let plain = strip_tags(content);
    Analysis {
        insights: generate_insights(content),
        glossary: identify_key_terms(&plain),
        grammar: check_grammar(&plain),
    }
}
