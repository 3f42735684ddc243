//! Sharing notes outside the app.
//!
//! A note is shared as plain text (title, blank line, tag-stripped content),
//! either copied to the system clipboard or handed to a messaging service
//! through a prefilled URL.

use clipboard_rs::{Clipboard, ClipboardContext};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use tracing::{debug, info};

use crate::analysis::strip_tags;
use crate::error::{Error, Result};
use crate::note::Note;

/// Characters left unescaped by JavaScript's `encodeURIComponent`.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

const WHATSAPP_BASE: &str = "https://wa.me/";
const GMAIL_COMPOSE_BASE: &str = "https://mail.google.com/mail/";

/// Where a note is being shared to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShareTarget {
    /// The system clipboard.
    Clipboard,
    /// A `wa.me` link.
    WhatsApp,
    /// A Gmail compose link.
    Email,
}

/// Percent-encode a URL component the way browsers' `encodeURIComponent` does.
#[must_use]
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT).to_string()
}

/// The plain-text form of a note used by every share target.
#[must_use]
pub fn share_text(note: &Note) -> String {
    format!("{}\n\n{}", note.title, strip_tags(&note.content))
}

/// A `wa.me` link that opens WhatsApp with the note prefilled.
#[must_use]
pub fn whatsapp_url(note: &Note) -> String {
    format!(
        "{WHATSAPP_BASE}?text={}",
        encode_component(&share_text(note))
    )
}

/// A Gmail compose link with the note title as subject and the share text as body.
#[must_use]
pub fn email_url(note: &Note) -> String {
    format!(
        "{GMAIL_COMPOSE_BASE}?view=cm&fs=1&to=&su={}&body={}",
        encode_component(&note.title),
        encode_component(&share_text(note))
    )
}

/// The URL for a link-based target, or `None` for the clipboard.
#[must_use]
pub fn share_url(note: &Note, target: ShareTarget) -> Option<String> {
    match target {
        ShareTarget::Clipboard => None,
        ShareTarget::WhatsApp => Some(whatsapp_url(note)),
        ShareTarget::Email => Some(email_url(note)),
    }
}

/// Something that accepts copied text.
pub trait ClipboardSink {
    /// Replace the clipboard contents with `text`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Clipboard`] if the clipboard cannot be written.
    fn set_text(&mut self, text: &str) -> Result<()>;
}

/// The operating system clipboard.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClipboard;

impl ClipboardSink for SystemClipboard {
    fn set_text(&mut self, text: &str) -> Result<()> {
        let ctx = ClipboardContext::new()
            .map_err(|e| Error::clipboard(format!("failed to open clipboard: {e}")))?;
        ctx.set_text(text.to_string())
            .map_err(|e| Error::clipboard(format!("failed to write clipboard: {e}")))
    }
}

/// Copy a note's share text to `sink`. Returns the copied text.
///
/// # Errors
///
/// Returns an error if the clipboard write fails.
pub fn copy_to_clipboard(note: &Note, sink: &mut impl ClipboardSink) -> Result<String> {
    let text = share_text(note);
    sink.set_text(&text)?;
    info!(id = %note.id, bytes = text.len(), "Copied note to clipboard");
    Ok(text)
}

/// Log and return the link for a link-based share.
#[must_use]
pub fn prepare_link(note: &Note, target: ShareTarget) -> Option<String> {
    let url = share_url(note, target)?;
    debug!(id = %note.id, ?target, "Prepared share link");
    Some(url)
}
