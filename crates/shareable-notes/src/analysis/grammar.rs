//! Grammar hints.
//!
//! A single rule: a lone " its " with no " it's " anywhere in the text is
//! flagged as a possible "it's".

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::html::{escape_attr, map_text, strip_tags};

const ITS_MESSAGE: &str = r#"Consider using "it's" if you mean "it is""#;

/// A flagged word and the hint to show for it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrammarIssue {
    /// The flagged word.
    pub text: String,
    /// Human-readable hint.
    pub error: String,
}

/// Check plain text for grammar hints.
#[must_use]
pub fn check_grammar(content: &str) -> Vec<GrammarIssue> {
    let mut issues = Vec::new();
    if content.contains(" its ") && !content.contains(" it's ") {
        issues.push(GrammarIssue {
            text: "its".to_string(),
            error: ITS_MESSAGE.to_string(),
        });
    }
    trace!(count = issues.len(), "Checked grammar");
    issues
}

/// Wrap each flagged word of `html` in a grammar-error span.
///
/// Issues are computed on the tag-stripped text; every whole-word occurrence
/// outside tags is wrapped.
#[must_use]
pub fn highlight_grammar(html: &str) -> String {
    let issues = check_grammar(&strip_tags(html));
    let mut out = html.to_string();
    for issue in &issues {
        let Ok(pattern) = Regex::new(&format!(r"\b{}\b", regex::escape(&issue.text))) else {
            continue;
        };
        let replacement = format!(
            r#"<span class='grammar-error' data-error="{}">{}</span>"#,
            escape_attr(&issue.error),
            issue.text
        );
        out = map_text(&out, |text| {
            pattern
                .replace_all(text, regex::NoExpand(&replacement))
                .into_owned()
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_its() {
        let issues = check_grammar("The dog wagged its tail");
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].text, "its");
        assert_eq!(issues[0].error, r#"Consider using "it's" if you mean "it is""#);
    }

    #[test]
    fn test_its_with_its_contraction_elsewhere_is_ignored() {
        assert!(check_grammar("I think it's fine and its color is nice").is_empty());
    }

    #[test]
    fn test_its_needs_surrounding_spaces() {
        assert!(check_grammar("its start").is_empty());
        assert!(check_grammar("ends with its").is_empty());
        assert!(check_grammar("").is_empty());
    }

    #[test]
    fn test_highlight_wraps_word() {
        let out = highlight_grammar("<p>the cat licked its paw</p>");
        assert_eq!(
            out,
            "<p>the cat licked <span class='grammar-error' data-error=\"Consider using &quot;it&#39;s&quot; if you mean &quot;it is&quot;\">its</span> paw</p>"
        );
    }

    #[test]
    fn test_highlight_whole_words_only() {
        let out = highlight_grammar("a bit its sits here");
        assert_eq!(out.matches("grammar-error").count(), 1);
        assert!(out.contains("sits"));
    }

    #[test]
    fn test_highlight_without_issues_is_identity() {
        let html = "<p>all good</p>";
        assert_eq!(highlight_grammar(html), html);
    }
}
