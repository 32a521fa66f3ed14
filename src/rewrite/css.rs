//! CSS `url(...)` pass.

use url::Url;

use crate::rewrite::html::{is_quote, Scan};
use crate::rewrite::resolve::resolve_and_wrap;

const OPEN: &str = "url(";

/// Match `["']?[^"')]+["']?\)` at byte offset `start`, yielding the value and the offset past `)`.
fn url_argument(input: &str, start: usize) -> Scan<(&str, usize)> {
    let bytes = input.as_bytes();
    let mut at = start;
    if bytes.get(at).copied().is_some_and(is_quote) {
        at += 1;
    }
    let Some(len) = bytes[at..].iter().position(|&b| is_quote(b) || b == b')') else {
        return Scan::Exhausted;
    };
    if len == 0 {
        return Scan::Miss;
    }
    let value = &input[at..at + len];

    let mut close = at + len;
    if bytes.get(close).copied().is_some_and(is_quote) {
        close += 1;
    }
    if bytes.get(close) == Some(&b')') {
        Scan::Match((value, close + 1))
    } else {
        Scan::Miss
    }
}

/// Rewrite every `url(...)`, always emitting `url("...")`.
pub fn rewrite_css_urls(input: &str, base: &Url) -> String {
    let mut out = String::with_capacity(input.len());
    let mut copied = 0;
    let mut search = 0;

    while let Some(offset) = input[search..].find(OPEN) {
        let at = search + offset;
        match url_argument(input, at + OPEN.len()) {
            Scan::Match((value, end)) => {
                out.push_str(&input[copied..at]);
                out.push_str("url(\"");
                out.push_str(&resolve_and_wrap(value, base));
                out.push_str("\")");
                copied = end;
                search = end;
            }
            Scan::Miss => search = at + 1,
            Scan::Exhausted => break,
        }
    }

    out.push_str(&input[copied..]);
    out
}
