//! Minimal HTML handling for note content.
//!
//! Note bodies are small HTML fragments. Analysis only ever needs two things
//! from them: the text with tags removed, and a way to rewrite text while
//! leaving tags (and their attributes) alone.

use std::sync::OnceLock;

use regex::Regex;

fn tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| Regex::new(r"<[^>]+>").expect("tag pattern is valid"))
}

/// Remove every `<...>` tag, keeping the text between them.
#[must_use]
pub fn strip_tags(html: &str) -> String {
    tag_regex().replace_all(html, "").into_owned()
}

/// Rewrite the text segments of `html` with `f`, copying tags through untouched.
pub fn map_text(html: &str, mut f: impl FnMut(&str) -> String) -> String {
    let mut out = String::with_capacity(html.len());
    let mut last = 0;
    for tag in tag_regex().find_iter(html) {
        if tag.start() > last {
            out.push_str(&f(&html[last..tag.start()]));
        }
        out.push_str(tag.as_str());
        last = tag.end();
    }
    if last < html.len() {
        out.push_str(&f(&html[last..]));
    }
    out
}

/// Escape a value for use inside a double- or single-quoted attribute.
#[must_use]
pub fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_tags() {
        assert_eq!(strip_tags("<p>Hello <b>world</b></p>"), "Hello world");
        assert_eq!(strip_tags("no markup"), "no markup");
        assert_eq!(strip_tags(""), "");
    }

    #[test]
    fn test_strip_tags_with_attributes() {
        assert_eq!(
            strip_tags(r#"<span class="x" title="a">hi</span>"#),
            "hi"
        );
    }

    #[test]
    fn test_map_text_skips_tags() {
        let html = r#"<p title="upper me">upper me</p> too"#;
        let out = map_text(html, str::to_uppercase);
        assert_eq!(out, r#"<p title="upper me">UPPER ME</p> TOO"#);
    }

    #[test]
    fn test_map_text_plain_input() {
        assert_eq!(map_text("abc", |s| format!("[{s}]")), "[abc]");
        assert_eq!(map_text("", |s| format!("[{s}]")), "");
    }

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr(r#"say "it's""#), "say &quot;it&#39;s&quot;");
    }
}
