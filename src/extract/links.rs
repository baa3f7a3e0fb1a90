//! Link discovery in comment text.
//!
//! Recognizes markdown links (`[title](https://...)`) and bare `http(s)://`
//! URLs in a single left-to-right pass. Inside a title a backslash escapes the
//! next character, so `\]` never closes the title.

use once_cell::sync::Lazy;
use regex::Regex;

// URL body stops at whitespace or a closing parenthesis.
static URL_AT_START: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^https?://[^)\s]+").expect("Invalid URL regex"));

/// A link found in text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkMatch<'a> {
    /// Byte range of the whole match (including any markdown syntax).
    pub span: (usize, usize),
    /// Character offset of the match from the start of the text.
    pub offset: usize,
    /// Unescaped markdown title, if the link had one.
    pub title: Option<String>,
    pub url: &'a str,
}

impl LinkMatch<'_> {
    /// The source text with this match removed.
    #[must_use]
    pub fn remove_from(&self, text: &str) -> String {
        let (start, end) = self.span;
        let mut remaining = String::with_capacity(text.len() - (end - start));
        remaining.push_str(&text[..start]);
        remaining.push_str(&text[end..]);
        remaining
    }
}

/// Iterator over the links in a piece of text, in text order.
pub struct Links<'a> {
    text: &'a str,
    pos: usize,
    // Character count of `text[..counted_to]`, for offsets.
    counted_to: usize,
    chars_before: usize,
}

/// Find all links in `text`.
#[must_use]
pub fn find_links(text: &str) -> Links<'_> {
    Links {
        text,
        pos: 0,
        counted_to: 0,
        chars_before: 0,
    }
}

/// Whether `text` contains anything that would be picked up as a link.
#[must_use]
pub fn contains_link(text: &str) -> bool {
    find_links(text).next().is_some()
}

impl<'a> Iterator for Links<'a> {
    type Item = LinkMatch<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let text = self.text;
        while self.pos < text.len() {
            let start = self.pos;
            let found = if text.as_bytes()[start] == b'[' {
                markdown_link_at(text, start).or_else(|| bare_link_at(text, start))
            } else {
                bare_link_at(text, start)
            };

            if let Some((end, title, url)) = found {
                self.chars_before += text[self.counted_to..start].chars().count();
                self.counted_to = start;
                self.pos = end;
                return Some(LinkMatch {
                    span: (start, end),
                    offset: self.chars_before,
                    title,
                    url,
                });
            }

            let step = text[start..].chars().next().map_or(1, char::len_utf8);
            self.pos += step;
        }
        None
    }
}

/// Try to match `[title](url)` starting at `start`, which holds a `[`.
fn markdown_link_at(text: &str, start: usize) -> Option<(usize, Option<String>, &str)> {
    let bytes = text.as_bytes();
    let mut run_end = start;
    while bytes.get(run_end) == Some(&b'[') {
        run_end += 1;
    }

    let close = find_title_end(bytes, run_end)?;
    // An empty title borrows the last opening bracket, as long as there is one to spare.
    let title_start = if close > run_end {
        run_end
    } else if run_end - start > 1 {
        run_end - 1
    } else {
        return None;
    };

    let after_close = close + 1;
    let open = text.len() - text[after_close..].trim_start().len();
    if bytes.get(open) != Some(&b'(') {
        return None;
    }

    let url_start = open + 1;
    let url = URL_AT_START.find(&text[url_start..])?;
    let url_end = url_start + url.end();
    let end = skip_close_paren(bytes, url_end);

    Some((
        end,
        Some(unescape(&text[title_start..close])),
        &text[url_start..url_end],
    ))
}

/// Try to match a bare URL starting at `start`.
fn bare_link_at(text: &str, start: usize) -> Option<(usize, Option<String>, &str)> {
    if !matches!(text.as_bytes()[start], b'h' | b'H') {
        return None;
    }
    let url = URL_AT_START.find(&text[start..])?;
    let url_end = start + url.end();
    let end = skip_close_paren(text.as_bytes(), url_end);
    Some((end, None, &text[start..url_end]))
}

/// Index of the first `]` at or after `from` that is not escaped by a backslash.
fn find_title_end(bytes: &[u8], from: usize) -> Option<usize> {
    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate().skip(from) {
        if escaped {
            escaped = false;
        } else if b == b'\\' {
            escaped = true;
        } else if b == b']' {
            return Some(i);
        }
    }
    None
}

fn skip_close_paren(bytes: &[u8], at: usize) -> usize {
    if bytes.get(at) == Some(&b')') {
        at + 1
    } else {
        at
    }
}

/// Replace every backslash escape `\x` with `x`. Line breaks are never escaped.
fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(&next) = chars.peek() {
                if !is_line_break(next) {
                    out.push(next);
                    chars.next();
                    continue;
                }
            }
        }
        out.push(c);
    }
    out
}

pub(crate) fn is_line_break(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}
