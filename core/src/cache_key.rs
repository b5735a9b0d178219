//! Cache-key templates for redirect-following.
//!
//! A [`PathnameIdMatch`](crate::PathnameIdMatch) may carry a `cache_key`
//! template. Placeholders:
//!
//! | Placeholder | Expands to |
//! |-------------|------------|
//! | `{hostname}` | lowercased hostname of the URL |
//! | `{pathname}` | pathname of the URL |
//! | `{query.<name>}` | decoded query value, `""` if absent |
//! | `{<n>}` | n-th regex capture (1-based), `""` if absent |
//!
//! Unknown placeholders expand to `""`. A `{` without a closing `}` is literal.

use crate::UrlParts;

/// Render a cache-key template against a parsed URL and its pathname captures.
///
/// ```
/// use linkwise::{render_cache_key, UrlParts};
///
/// let parts = UrlParts::parse("https://go.aff.example/r/abc?sub=7");
/// let key = render_cache_key("aff:{1}:{query.sub}", &parts, &["abc".to_string()]);
/// assert_eq!(key, "aff:abc:7");
/// ```
#[must_use]
pub fn render_cache_key(template: &str, parts: &UrlParts, captures: &[String]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let Some(close) = after.find('}') else {
            out.push_str(&rest[open..]);
            return out;
        };
        out.push_str(&expand(&after[..close], parts, captures));
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    out
}

fn expand(name: &str, parts: &UrlParts, captures: &[String]) -> String {
    match name {
        "hostname" => parts.host().to_owned(),
        "pathname" => parts.path().to_owned(),
        _ => {
            if let Some(key) = name.strip_prefix("query.") {
                return parts.query.get(key).cloned().unwrap_or_default();
            }
            name.parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| captures.get(i))
                .cloned()
                .unwrap_or_default()
        }
    }
}

/// Default cache key: hostname followed by pathname.
pub(crate) fn default_cache_key(parts: &UrlParts) -> String {
    format!("{}{}", parts.host(), parts.path())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts() -> UrlParts {
        UrlParts::parse("https://GO.aff.example/r/abc/9?sub=7")
    }

    #[test]
    fn literal_template() {
        assert_eq!(render_cache_key("static", &parts(), &[]), "static");
    }

    #[test]
    fn hostname_and_pathname() {
        assert_eq!(
            render_cache_key("{hostname}|{pathname}", &parts(), &[]),
            "go.aff.example|/r/abc/9"
        );
    }

    #[test]
    fn captures_are_one_based() {
        let caps = vec!["abc".to_string(), "9".to_string()];
        assert_eq!(render_cache_key("{2}-{1}-{0}-{3}", &parts(), &caps), "9-abc--");
    }

    #[test]
    fn missing_query_is_empty() {
        assert_eq!(render_cache_key("{query.nope}", &parts(), &[]), "");
        assert_eq!(render_cache_key("{query.sub}", &parts(), &[]), "7");
    }

    #[test]
    fn unclosed_brace_is_literal() {
        assert_eq!(render_cache_key("a{hostname", &parts(), &[]), "a{hostname");
    }

    #[test]
    fn default_key() {
        assert_eq!(default_cache_key(&parts()), "go.aff.example/r/abc/9");
        assert_eq!(default_cache_key(&UrlParts::parse("")), "");
    }
}
