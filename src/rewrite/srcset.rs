//! Responsive image `srcset="..."` pass.
//!
//! Each comma-separated candidate is split on whitespace into a URL and
//! an optional descriptor (`1x`, `480w`). Candidates are rejoined as
//! `"<url> <descriptor>"`, which leaves a trailing space when there is no
//! descriptor. Output is always double-quoted.

use url::Url;

use crate::rewrite::html::{quoted_value, Scan};
use crate::rewrite::resolve::resolve_and_wrap;

const ATTRIBUTE: &str = "srcset=";

fn rewrite_candidates(value: &str, base: &Url) -> String {
    value
        .split(',')
        .map(|candidate| {
            let mut parts = candidate.split_whitespace();
            match parts.next() {
                Some(url) => format!("{} {}", resolve_and_wrap(url, base), parts.next().unwrap_or("")),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn rewrite_srcset(input: &str, base: &Url) -> String {
    let mut out = String::with_capacity(input.len());
    let mut copied = 0;
    let mut search = 0;

    while let Some(offset) = input[search..].find(ATTRIBUTE) {
        let at = search + offset;
        match quoted_value(input, at + ATTRIBUTE.len()) {
            Scan::Match(quoted) => {
                out.push_str(&input[copied..at]);
                out.push_str(ATTRIBUTE);
                out.push('"');
                out.push_str(&rewrite_candidates(quoted.value, base));
                out.push('"');
                copied = quoted.end;
                search = quoted.end;
            }
            Scan::Miss => search = at + 1,
            Scan::Exhausted => break,
        }
    }

    out.push_str(&input[copied..]);
    out
}
