//! Final SQL text cleanup.
//!
//! Resolution keeps text exactly as written in the fragment, which
//! means XML entity references (`&gt;=` for `>=`) survive until this
//! stage. Decoding runs once, on the fully resolved string, followed
//! by a whitespace cleanup around `AND`/`OR` so that conditionally
//! assembled clauses read as if written by hand.

use std::sync::OnceLock;

use regex::Regex;

/// The five XML entity references and their replacements.
const ENTITY_TABLE: [(&str, &str); 5] = [
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&amp;", "&"),
    ("&apos;", "'"),
    ("&quot;", "\""),
];

/// Decodes the fixed XML entity table by literal substitution.
///
/// Idempotent on already-decoded text as long as it contains no
/// entity-shaped substrings.
#[must_use]
pub fn decode_entities(text: &str) -> String {
    let mut decoded = text.to_string();
    for (entity, replacement) in ENTITY_TABLE {
        decoded = decoded.replace(entity, replacement);
    }
    decoded
}

/// Strips at most one leading `AND` or `OR` (any case) together with
/// the whitespace that follows it.
#[must_use]
pub fn strip_leading_connector(body: &str) -> &str {
    for connector in ["AND", "OR"] {
        let Some(rest) = strip_prefix_ignore_case(body, connector) else {
            continue;
        };
        if rest.starts_with(char::is_whitespace) {
            return rest.trim_start();
        }
    }
    body
}

fn strip_prefix_ignore_case<'a>(s: &'a str, prefix: &str) -> Option<&'a str> {
    let head = s.get(..prefix.len())?;
    head.eq_ignore_ascii_case(prefix).then(|| &s[prefix.len()..])
}

/// Collapses runs of spaces and tabs around a standalone `AND`/`OR`
/// into single spaces, outside quoted literals. Newlines are left
/// alone so multi-line templates keep their shape.
#[must_use]
pub fn collapse_connector_spacing(sql: &str) -> String {
    static CONNECTOR: OnceLock<Regex> = OnceLock::new();
    let pattern = CONNECTOR.get_or_init(|| {
        Regex::new(r"(?i)[ \t]+\b(and|or)\b[ \t]+").expect("connector pattern is valid")
    });

    let mut out = String::with_capacity(sql.len());
    for segment in split_quoted(sql) {
        match segment {
            Segment::Quoted(text) => out.push_str(text),
            Segment::Plain(text) => out.push_str(&pattern.replace_all(text, " $1 ")),
        }
    }
    out
}

/// Runs the full cleanup: entity decoding, then connector spacing.
#[must_use]
pub fn normalize(sql: &str) -> String {
    collapse_connector_spacing(&decode_entities(sql))
}

enum Segment<'a> {
    /// A quoted literal, quotes included. Left untouched.
    Quoted(&'a str),
    /// Text outside quotes.
    Plain(&'a str),
}

/// Splits SQL into quoted and unquoted segments. A doubled quote
/// inside a literal does not terminate it. An unterminated literal
/// runs to the end of the string and stays untouched.
fn split_quoted(sql: &str) -> Vec<Segment<'_>> {
    let mut segments = Vec::new();
    let mut chars = sql.char_indices().peekable();
    let mut start = 0;
    let mut quote: Option<char> = None;

    while let Some((i, c)) = chars.next() {
        match quote {
            None => {
                if c == '\'' || c == '"' {
                    if i > start {
                        segments.push(Segment::Plain(&sql[start..i]));
                    }
                    start = i;
                    quote = Some(c);
                }
            }
            Some(q) if c == q => {
                if chars.peek().is_some_and(|&(_, next)| next == q) {
                    chars.next();
                } else {
                    let end = i + c.len_utf8();
                    segments.push(Segment::Quoted(&sql[start..end]));
                    start = end;
                    quote = None;
                }
            }
            Some(_) => {}
        }
    }

    if start < sql.len() {
        let tail = &sql[start..];
        if quote.is_some() {
            segments.push(Segment::Quoted(tail));
        } else {
            segments.push(Segment::Plain(tail));
        }
    }

    segments
}
