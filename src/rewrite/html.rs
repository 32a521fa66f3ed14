//! `href=`, `src=` and `action=` attribute pass.
//!
//! Attribute names are matched anywhere in the text, so `data-src="..."`
//! gets its `src=` part rewritten too. A value is one or more characters
//! up to the next quote of either kind; the opening quote is written on
//! both sides.

use url::Url;

use crate::rewrite::resolve::resolve_and_wrap;

const ATTRIBUTES: [&str; 3] = ["href=", "src=", "action="];

pub(crate) fn is_quote(b: u8) -> bool {
    b == b'"' || b == b'\''
}

/// A quoted attribute value found by [`quoted_value`].
pub(crate) struct Quoted<'a> {
    pub quote: char,
    pub value: &'a str,
    /// Byte offset just past the closing quote.
    pub end: usize,
}

/// Outcome of matching a delimited value at one candidate offset.
pub(crate) enum Scan<T> {
    Match(T),
    /// No match here; a later offset may still match.
    Miss,
    /// No closing delimiter anywhere past this offset, so no later offset can match.
    Exhausted,
}

/// Match `["'][^"']+["']` at byte offset `start`.
pub(crate) fn quoted_value(input: &str, start: usize) -> Scan<Quoted<'_>> {
    let bytes = input.as_bytes();
    let quote = match bytes.get(start) {
        Some(&b) if is_quote(b) => b,
        _ => return Scan::Miss,
    };
    let value_start = start + 1;
    let Some(len) = bytes[value_start..].iter().position(|&b| is_quote(b)) else {
        return Scan::Exhausted;
    };
    if len == 0 {
        return Scan::Miss;
    }
    let close = value_start + len;
    Scan::Match(Quoted {
        quote: quote as char,
        value: &input[value_start..close],
        end: close + 1,
    })
}

fn attribute_at(bytes: &[u8], at: usize) -> Option<&'static str> {
    ATTRIBUTES
        .iter()
        .copied()
        .find(|name| bytes[at..].starts_with(name.as_bytes()))
}

pub fn rewrite_attributes(input: &str, base: &Url) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut copied = 0;
    let mut at = 0;

    while at < bytes.len() {
        if let Some(name) = attribute_at(bytes, at) {
            match quoted_value(input, at + name.len()) {
                Scan::Match(quoted) => {
                    out.push_str(&input[copied..at]);
                    out.push_str(name);
                    out.push(quoted.quote);
                    out.push_str(&resolve_and_wrap(quoted.value, base));
                    out.push(quoted.quote);
                    copied = quoted.end;
                    at = quoted.end;
                    continue;
                }
                Scan::Exhausted => break,
                Scan::Miss => {}
            }
        }
        at += 1;
    }

    out.push_str(&input[copied..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Url {
        Url::parse("https://example.com/page").unwrap()
    }

    #[test]
    fn test_anchor_href() {
        assert_eq!(
            rewrite_attributes(r#"<a href="/about">About</a>"#, &page()),
            r#"<a href="/proxy?url=https%3A%2F%2Fexample.com%2Fabout">About</a>"#
        );
    }

    #[test]
    fn test_single_quotes_preserved() {
        assert_eq!(
            rewrite_attributes("<img src='a.png'>", &page()),
            "<img src='/proxy?url=https%3A%2F%2Fexample.com%2Fa.png'>"
        );
    }

    #[test]
    fn test_form_action_and_script_src() {
        let html = r#"<form action="/search"><script src="app.js"></script>"#;
        assert_eq!(
            rewrite_attributes(html, &page()),
            concat!(
                r#"<form action="/proxy?url=https%3A%2F%2Fexample.com%2Fsearch">"#,
                r#"<script src="/proxy?url=https%3A%2F%2Fexample.com%2Fapp.js"></script>"#
            )
        );
    }

    #[test]
    fn test_mismatched_closing_quote_takes_opening_quote() {
        assert_eq!(
            rewrite_attributes(r#"<a href="/x'>"#, &page()),
            r#"<a href="/proxy?url=https%3A%2F%2Fexample.com%2Fx">"#
        );
    }

    #[test]
    fn test_suffix_match_inside_longer_name() {
        assert_eq!(
            rewrite_attributes(r#"<img data-src="/lazy.png">"#, &page()),
            r#"<img data-src="/proxy?url=https%3A%2F%2Fexample.com%2Flazy.png">"#
        );
    }

    #[test]
    fn test_left_alone() {
        for html in [
            r#"<a href="">empty</a>"#,
            "<a href=/bare>unquoted</a>",
            r#"<a href = "/spaced">"#,
            r#"<a HREF="/upper">"#,
            r#"<img srcset="a.jpg 1x">"#,
            r#"<a href="javascript:void(0)">"#,
            r#"<a href="/unterminated"#,
        ] {
            assert_eq!(rewrite_attributes(html, &page()), html);
        }
    }

    #[test]
    fn test_multibyte_text_around_matches() {
        assert_eq!(
            rewrite_attributes(r#"日本<a href="/ü">ß</a>語"#, &page()),
            r#"日本<a href="/proxy?url=https%3A%2F%2Fexample.com%2F%25C3%25BC">ß</a>語"#
        );
    }

    #[test]
    fn test_unterminated_value_ends_scan() {
        assert_eq!(
            rewrite_attributes(r#"<a href="/x">x</a><img src="broken"#, &page()),
            r#"<a href="/proxy?url=https%3A%2F%2Fexample.com%2Fx">x</a><img src="broken"#
        );
    }
}
