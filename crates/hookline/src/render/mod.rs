//! Reply rendering
//!
//! Turns a [`ReplyPayload`] into display-safe markup. Shape detection runs
//! in a fixed order and the first match wins:
//!
//! 1. user messages are escaped and never formatted
//! 2. replies that look like JSON (`{` or `[`) and parse are shown as tables
//! 3. replies with both `|` and `-` are treated as markdown tables
//! 4. everything else is escaped text with `**bold**` emphasis
//!
//! Rendering never fails. Anything that cannot be classified falls back to
//! escaped plain text.

mod escape;
mod table;

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;

use crate::chat::Sender;
use crate::payload::ReplyPayload;

pub use escape::escape_html;
pub use table::{NO_DATA, display_string, render_markdown_table, render_value};

/// Markup that is safe to inject into a page
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RenderedContent(String);

impl RenderedContent {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl std::fmt::Display for RenderedContent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RenderedContent {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Outcome of trying to read a reply as JSON
#[derive(Debug, Clone, PartialEq)]
pub enum Classified {
    /// The reply is (or parsed into) a JSON value
    Parsed(Value),
    /// The reply is text that is not valid JSON
    NotJson,
}

/// Interpret a payload as JSON: text is parsed, structured values are used
/// as they are.
pub fn classify(payload: &ReplyPayload) -> Classified {
    let text = match payload {
        ReplyPayload::Text(text) | ReplyPayload::Structured(Value::String(text)) => text,
        ReplyPayload::Structured(value) => return Classified::Parsed(value.clone()),
    };

    match serde_json::from_str::<Value>(text.trim()) {
        Ok(value) => Classified::Parsed(value),
        Err(_) => Classified::NotJson,
    }
}

fn bold_regex() -> &'static Regex {
    static CACHED: OnceLock<Regex> = OnceLock::new();
    CACHED.get_or_init(|| {
        // Leftmost, shortest, non-overlapping; never spans a line break.
        Regex::new(r"\*\*(.+?)\*\*").expect("bold pattern is valid")
    })
}

/// Wrap every `**text**` span in `<strong>`.
///
/// Expects already-escaped input; the asterisks survive escaping untouched.
pub fn apply_bold(escaped: &str) -> String {
    bold_regex()
        .replace_all(escaped, "<strong>$1</strong>")
        .into_owned()
}

/// Render a message for display
pub fn render(sender: Sender, payload: &ReplyPayload) -> RenderedContent {
    let text = payload.to_text();

    if sender == Sender::User {
        return RenderedContent(escape_html(&text));
    }

    if text.contains('{') || text.contains('[') {
        if let Classified::Parsed(value) = classify(payload) {
            return RenderedContent(render_value(&value));
        }
        tracing::trace!("Reply looked like JSON but did not parse, rendering as text");
    } else if text.contains('|') && text.contains('-') {
        return RenderedContent(render_markdown_table(&text));
    }

    RenderedContent(apply_bold(&escape_html(&text)))
}

/// Convenience wrapper for rendering a bot reply
pub fn render_reply(payload: &ReplyPayload) -> RenderedContent {
    render(Sender::Bot, payload)
}
