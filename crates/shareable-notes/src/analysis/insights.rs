//! Rule-based note insights.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::html::strip_tags;

/// Notes with more plain-text characters than this get a summary hint.
pub const LENGTHY_NOTE_CHARS: usize = 300;

/// Keywords counted towards the programming themes insight.
pub const PROGRAMMING_KEYWORDS: &[&str] = &[
    "react",
    "javascript",
    "typescript",
    "css",
    "html",
    "frontend",
    "backend",
    "database",
];

/// More than this many keywords must be present for the themes insight.
const MIN_THEME_KEYWORDS: usize = 2;

/// Which rule produced an insight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InsightKind {
    /// The note is long enough to deserve a summary.
    Summarize,
    /// The note mentions todos or action items.
    ActionItems,
    /// The note asks questions.
    Questions,
    /// Positive words were found.
    PositiveSentiment,
    /// Problem words were found.
    Challenges,
    /// Several programming keywords were found.
    ProgrammingThemes,
    /// Closing suggestion added after any other insight.
    RelatedTopics,
}

/// A single suggestion about a note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insight {
    /// The rule that fired.
    pub kind: InsightKind,
    /// Text shown to the user.
    pub message: String,
}

impl Insight {
    fn new(kind: InsightKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Insight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Generate insights for HTML note content.
///
/// Rules run on the tag-stripped text in a fixed order. The closing
/// "related topics" suggestion is only added when another rule fired.
#[must_use]
pub fn generate_insights(content: &str) -> Vec<Insight> {
    let plain = strip_tags(content);
    let lower = plain.to_lowercase();
    let mut insights = Vec::new();

    if plain.chars().count() > LENGTHY_NOTE_CHARS {
        insights.push(Insight::new(
            InsightKind::Summarize,
            "This note is quite lengthy. Consider generating a summary to quickly grasp key points.",
        ));
    }

    if lower.contains("todo") || lower.contains("action item") {
        insights.push(Insight::new(
            InsightKind::ActionItems,
            "This note appears to contain actionable items. Review them for follow-up.",
        ));
    }

    if plain.contains('?') {
        insights.push(Insight::new(
            InsightKind::Questions,
            "This note contains questions. You might want to add answers or follow up on these points.",
        ));
    }

    if lower.contains("great") || lower.contains("excellent") {
        insights.push(Insight::new(
            InsightKind::PositiveSentiment,
            "Positive sentiment detected. Consider what made this experience successful.",
        ));
    } else if ["problem", "issue", "error"].iter().any(|w| lower.contains(w)) {
        insights.push(Insight::new(
            InsightKind::Challenges,
            "Potential challenges identified. Focus on solutions or next steps.",
        ));
    }

    let keywords: Vec<&str> = PROGRAMMING_KEYWORDS
        .iter()
        .copied()
        .filter(|k| lower.contains(k))
        .collect();
    if keywords.len() > MIN_THEME_KEYWORDS {
        insights.push(Insight::new(
            InsightKind::ProgrammingThemes,
            format!(
                "Key themes related to programming ({}) are prominent.",
                keywords.join(", ")
            ),
        ));
    }

    if !insights.is_empty() {
        insights.push(Insight::new(
            InsightKind::RelatedTopics,
            "Consider linking this note to other related topics for better organization.",
        ));
    }

    debug!(count = insights.len(), "Generated insights");
    insights
}
