//! `UrlParts`: Decomposition of a raw URL
//!
//! Every component of the engine reads URLs through [`UrlParts::parse`]. Parsing
//! is total: blank or malformed input decomposes to [`UrlParts::default`] rather
//! than failing.

use std::collections::BTreeMap;
use url::Url;

/// A URL split into the pieces the resolvers and builders care about.
///
/// # Example
///
/// ```
/// use linkwise::UrlParts;
///
/// let parts = UrlParts::parse("https://Shop.example/cart?b=2&a=1#top");
/// assert_eq!(parts.hostname.as_deref(), Some("shop.example"));
/// assert_eq!(parts.pathname.as_deref(), Some("/cart"));
/// assert_eq!(parts.query.get("a").map(String::as_str), Some("1"));
/// assert_eq!(parts.raw_query.as_deref(), Some("b=2&a=1"));
/// assert_eq!(parts.hash.as_deref(), Some("top"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParts {
    /// Scheme without the trailing `:` (`https`, `merchant`).
    pub scheme: Option<String>,
    /// Lowercased host, `None` when absent or empty.
    pub hostname: Option<String>,
    /// Path as it appears in the URL (still percent-encoded).
    pub pathname: Option<String>,
    /// Decoded query pairs. A repeated key keeps its last value.
    pub query: BTreeMap<String, String>,
    /// Raw query string without the leading `?`.
    pub raw_query: Option<String>,
    /// Fragment without the leading `#`.
    pub hash: Option<String>,
}

impl UrlParts {
    /// Parse a raw URL.
    ///
    /// Inputs without a scheme (`shop.example/item`) are retried as `http://`.
    /// Anything that still fails to parse yields the empty decomposition.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() {
            return Self::default();
        }

        let parsed = Url::parse(raw).ok().or_else(|| {
            if raw.contains("://") {
                None
            } else {
                Url::parse(&format!("http://{raw}")).ok()
            }
        });

        parsed.map_or_else(Self::default, |url| Self::from_url(&url))
    }

    fn from_url(url: &Url) -> Self {
        let query = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        Self {
            scheme: Some(url.scheme().to_owned()),
            hostname: url
                .host_str()
                .filter(|h| !h.is_empty())
                .map(str::to_ascii_lowercase),
            pathname: Some(url.path())
                .filter(|p| !p.is_empty())
                .map(str::to_owned),
            query,
            raw_query: url.query().map(str::to_owned),
            hash: url.fragment().filter(|f| !f.is_empty()).map(str::to_owned),
        }
    }

    /// Returns `true` if nothing was recovered from the input.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scheme.is_none() && self.hostname.is_none() && self.pathname.is_none()
    }

    /// Hostname or `""`.
    #[must_use]
    pub fn host(&self) -> &str {
        self.hostname.as_deref().unwrap_or("")
    }

    /// Pathname or `""`.
    #[must_use]
    pub fn path(&self) -> &str {
        self.pathname.as_deref().unwrap_or("")
    }

    /// Raw query or `""`.
    #[must_use]
    pub fn query_string(&self) -> &str {
        self.raw_query.as_deref().unwrap_or("")
    }

    /// First path segment, if any (`/bloop/1` → `bloop`).
    #[must_use]
    pub fn first_segment(&self) -> Option<&str> {
        self.path()
            .trim_start_matches('/')
            .split('/')
            .next()
            .filter(|s| !s.is_empty())
    }
}

/// Canonical form used for hostname comparison.
///
/// ASCII-lowercased, surrounding whitespace trimmed, one leading `www.` removed.
///
/// ```
/// use linkwise::normalize_hostname;
///
/// assert_eq!(normalize_hostname("WWW.Shop.example"), "shop.example");
/// assert_eq!(normalize_hostname("m.shop.example"), "m.shop.example");
/// ```
#[must_use]
pub fn normalize_hostname(hostname: &str) -> String {
    let lower = hostname.trim().to_ascii_lowercase();
    match lower.strip_prefix("www.") {
        Some(rest) => rest.to_owned(),
        None => lower,
    }
}

/// Hostname equality: case-insensitive, `www.` ignored on both sides.
///
/// Subdomains are distinct: `m.shop.example` does not match `shop.example`.
#[must_use]
pub fn hostnames_match(a: &str, b: &str) -> bool {
    !a.trim().is_empty() && normalize_hostname(a) == normalize_hostname(b)
}
