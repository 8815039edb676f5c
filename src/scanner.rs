//! Comment scanner for block delimiters
//!
//! Locates the marker comments that delimit blocks and classifies each one
//! as an opener, a closer, or a void (self-closing) block. Only comments
//! whose whole body matches the delimiter grammar are recognized; every
//! other HTML comment is ordinary text to the parser.
//!
//! The name grammar is one or more lowercase segments of
//! `[a-z][a-z0-9]*(-[a-z0-9]+)*` separated by `/`. A comment such as
//! `<!-- wp:Not-A-Block -->` fails the grammar and passes through
//! untouched, so unrelated comments never break a parse.

use once_cell::sync::Lazy;
use regex::Regex;

/// Delimiter pattern, compiled once.
///
/// Dotall mode lets attribute payloads span lines. The `{...}` run is
/// matched lazily up to the first `}` that is followed by whitespace and
/// the comment tail, so braces inside JSON string values do not terminate
/// the match early.
static DELIMITER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?xs)
        <!--\s+
        (?P<closer>/)?
        wp:(?P<name>
            [a-z][a-z0-9]*(?:-[a-z0-9]+)*
            (?:/[a-z][a-z0-9]*(?:-[a-z0-9]+)*)*
        )
        (?:\s+(?P<attrs>\{.*?\}))?
        \s+
        (?P<void>/)?
        -->",
    )
    .expect("delimiter pattern compiles")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum DelimiterKind {
    /// `<!-- wp:name {...} /-->`
    Void,
    /// `<!-- wp:name {...} -->`
    Opener,
    /// `<!-- /wp:name -->`
    Closer,
}

/// A recognized delimiter comment within the document.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Delimiter<'d> {
    pub kind: DelimiterKind,
    /// Block name with the `wp:` prefix attached, e.g. `"wp:ns/widget"`.
    pub name: String,
    /// Raw `{...}` payload text, untrimmed, if the delimiter carried one.
    pub attrs_json: Option<&'d str>,
    /// Byte offset of `<!--`.
    pub start: usize,
    /// Byte offset one past `-->`.
    pub end: usize,
}

/// Find the next delimiter at or after `offset`.
///
/// Returns `None` when no further delimiter exists; the remaining text is
/// terminal freeform content.
pub(crate) fn scan(document: &str, offset: usize) -> Option<Delimiter<'_>> {
    let caps = DELIMITER.captures_at(document, offset)?;
    let whole = caps.get(0)?;

    // A comment marked both `/wp:` and `/-->` counts as void, matching the
    // reference behavior of the format.
    let kind = if caps.name("void").is_some() {
        DelimiterKind::Void
    } else if caps.name("closer").is_some() {
        DelimiterKind::Closer
    } else {
        DelimiterKind::Opener
    };

    Some(Delimiter {
        kind,
        name: format!("wp:{}", &caps["name"]),
        attrs_json: caps.name("attrs").map(|m| m.as_str()),
        start: whole.start(),
        end: whole.end(),
    })
}
