//! Rich-text editing surface.
//!
//! Notes are edited as HTML fragments. [`Format`] covers the toolbar
//! commands (bold, italic, underline, alignment, font size) and
//! [`EditorSession`] holds the buffer being edited.

use std::fmt;
use std::str::FromStr;

use tracing::{debug, trace};

use crate::analysis::{highlight_grammar, map_text};
use crate::error::{Error, Result};

/// Font sizes offered by the toolbar, in pixels.
pub const FONT_SIZES: [u8; 5] = [12, 14, 16, 18, 20];

/// Text alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Alignment {
    /// `text-align: left`
    Left,
    /// `text-align: center`
    Center,
    /// `text-align: right`
    Right,
}

impl Alignment {
    fn css(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Center => "center",
            Self::Right => "right",
        }
    }
}

/// One of the toolbar font sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontSize(u8);

impl FontSize {
    /// Validate a pixel size against [`FONT_SIZES`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidFormat`] for any other size.
    pub fn new(px: u8) -> Result<Self> {
        if FONT_SIZES.contains(&px) {
            Ok(Self(px))
        } else {
            Err(Error::invalid_format(
                format!("{px}px"),
                format!("font size must be one of {FONT_SIZES:?}"),
            ))
        }
    }

    /// Size in pixels.
    #[must_use]
    pub fn px(self) -> u8 {
        self.0
    }
}

impl Default for FontSize {
    fn default() -> Self {
        Self(16)
    }
}

/// A formatting command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// `<b>`
    Bold,
    /// `<i>`
    Italic,
    /// `<u>`
    Underline,
    /// A block with `text-align` set.
    Align(Alignment),
    /// A span with `font-size` set.
    FontSize(FontSize),
}

impl Format {
    /// Wrap an HTML fragment in the markup for this format.
    #[must_use]
    pub fn wrap(self, inner: &str) -> String {
        match self {
            Self::Bold => format!("<b>{inner}</b>"),
            Self::Italic => format!("<i>{inner}</i>"),
            Self::Underline => format!("<u>{inner}</u>"),
            Self::Align(align) => {
                format!(r#"<div style="text-align: {};">{inner}</div>"#, align.css())
            }
            Self::FontSize(size) => {
                format!(r#"<span style="font-size: {}px;">{inner}</span>"#, size.px())
            }
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bold => f.write_str("bold"),
            Self::Italic => f.write_str("italic"),
            Self::Underline => f.write_str("underline"),
            Self::Align(align) => f.write_str(align.css()),
            Self::FontSize(size) => write!(f, "{}px", size.px()),
        }
    }
}

impl FromStr for Format {
    type Err = Error;

    /// Parses `bold`, `italic`, `underline`, `left`, `center`, `right`, or a
    /// font size such as `14px` or `14`.
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        let format = match lower.as_str() {
            "bold" | "b" => Self::Bold,
            "italic" | "i" => Self::Italic,
            "underline" | "u" => Self::Underline,
            "left" | "align-left" => Self::Align(Alignment::Left),
            "center" | "centre" | "align-center" => Self::Align(Alignment::Center),
            "right" | "align-right" => Self::Align(Alignment::Right),
            other => {
                let digits = other.strip_suffix("px").unwrap_or(other);
                let px: u8 = digits.parse().map_err(|_| {
                    Error::invalid_format(
                        s,
                        "expected bold, italic, underline, left, center, right or a font size",
                    )
                })?;
                Self::FontSize(FontSize::new(px)?)
            }
        };
        Ok(format)
    }
}

/// An HTML buffer being edited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorSession {
    content: String,
    font_size: FontSize,
    focused: bool,
}

impl EditorSession {
    /// Start editing `content`.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            ..Self::default()
        }
    }

    /// The raw HTML buffer.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Consume the session, returning the HTML buffer.
    #[must_use]
    pub fn into_content(self) -> String {
        self.content
    }

    /// The last font size chosen.
    #[must_use]
    pub fn font_size(&self) -> FontSize {
        self.font_size
    }

    /// Replace the buffer (typed input). Returns the new HTML.
    pub fn set_content(&mut self, html: impl Into<String>) -> &str {
        self.content = html.into();
        trace!(bytes = self.content.len(), "Editor content replaced");
        &self.content
    }

    /// Apply a format to the whole buffer. Returns the new HTML.
    ///
    /// An empty buffer is left unchanged.
    pub fn apply(&mut self, format: Format) -> &str {
        self.remember(format);
        if !self.content.is_empty() {
            self.content = format.wrap(&self.content);
            debug!(%format, "Applied format to buffer");
        }
        &self.content
    }

    /// Apply a format to the first occurrence of `selection` in the text.
    ///
    /// Only text outside tags is searched. Returns `None` if the selection
    /// was not found.
    pub fn apply_to(&mut self, format: Format, selection: &str) -> Option<&str> {
        if selection.is_empty() {
            return None;
        }
        let mut found = false;
        let updated = map_text(&self.content, |text| {
            if found {
                return text.to_string();
            }
            match text.find(selection) {
                Some(at) => {
                    found = true;
                    let end = at + selection.len();
                    format!("{}{}{}", &text[..at], format.wrap(selection), &text[end..])
                }
                None => text.to_string(),
            }
        });
        if !found {
            return None;
        }
        self.remember(format);
        self.content = updated;
        debug!(%format, selection, "Applied format to selection");
        Some(&self.content)
    }

    /// Mark the editor as focused; [`rendered`](Self::rendered) then shows raw HTML.
    pub fn focus(&mut self) {
        self.focused = true;
    }

    /// Mark the editor as unfocused.
    pub fn blur(&mut self) {
        self.focused = false;
    }

    /// Whether the editor is focused.
    #[must_use]
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// HTML to display: raw while focused, grammar-highlighted otherwise.
    #[must_use]
    pub fn rendered(&self) -> String {
        if self.focused {
            self.content.clone()
        } else {
            highlight_grammar(&self.content)
        }
    }

    fn remember(&mut self, format: Format) {
        if let Format::FontSize(size) = format {
            self.font_size = size;
        }
    }
}
