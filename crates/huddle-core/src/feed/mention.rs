//! `@name` mention detection.

use std::sync::LazyLock;

use regex::Regex;

static MENTION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@[A-Za-z0-9_]+").expect("valid mention regex"));

/// A piece of activity text: either plain text or a single `@name` mention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Span<'a> {
    Text(&'a str),
    Mention(&'a str),
}

impl<'a> Span<'a> {
    #[must_use]
    pub const fn as_str(&self) -> &'a str {
        match self {
            Self::Text(s) | Self::Mention(s) => s,
        }
    }

    #[must_use]
    pub const fn is_mention(&self) -> bool {
        matches!(self, Self::Mention(_))
    }
}

/// Split `text` into plain and mention spans, in order.
///
/// Concatenating the spans reproduces `text` exactly. Back-to-back mentions
/// such as `@a@b` are reported as separate spans.
#[must_use]
pub fn highlight_mentions(text: &str) -> Vec<Span<'_>> {
    let mut spans = Vec::new();
    let mut cursor = 0;
    for found in MENTION_RE.find_iter(text) {
        if found.start() > cursor {
            spans.push(Span::Text(&text[cursor..found.start()]));
        }
        spans.push(Span::Mention(found.as_str()));
        cursor = found.end();
    }
    if cursor < text.len() {
        spans.push(Span::Text(&text[cursor..]));
    }
    spans
}

/// Wrap every mention in `open`/`close` markers, leaving other text as is.
#[must_use]
pub fn render_marked(text: &str, open: &str, close: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for span in highlight_mentions(text) {
        match span {
            Span::Text(s) => out.push_str(s),
            Span::Mention(s) => {
                out.push_str(open);
                out.push_str(s);
                out.push_str(close);
            }
        }
    }
    out
}

/// Names mentioned in `text`, without the leading `@`.
#[must_use]
pub fn mentioned_names(text: &str) -> Vec<&str> {
    MENTION_RE
        .find_iter(text)
        .map(|m| &m.as_str()[1..])
        .collect()
}
