//! `Destination`: builder-agnostic decomposition of a target URL
//!
//! Strategies receive a `Destination` and render it back into merchant URL
//! templates. The base fields come straight from [`UrlParts`]; the extension
//! fields (`hostname`, `region`, `url`) are filled only by strategies that need
//! them.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

use crate::UrlParts;

/// Canonical decomposition of a destination URL.
///
/// Query keys are kept sorted so rendered links are deterministic; a
/// `Destination` carries no notion of the original key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    /// Path of the destination, `None` for the empty destination.
    #[serde(default)]
    pub pathname: Option<String>,

    /// Decoded query parameters.
    #[serde(default)]
    pub query: BTreeMap<String, String>,

    /// Fragment without `#`.
    #[serde(default)]
    pub hash: Option<String>,

    /// Merchant host the destination was parsed from (multi-host merchants).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,

    /// Merchant region derived from the host (multi-region merchants).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,

    /// The raw URL, kept by strategies that forward it verbatim.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Destination {
    /// The canonical empty destination: no pathname, empty query, no hash.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Default decomposition used by
    /// [`LinkBuilder::destination_from_url`](crate::LinkBuilder::destination_from_url).
    ///
    /// A blank or unparseable `url` yields [`Destination::empty`].
    #[must_use]
    pub fn from_url(url: &str) -> Self {
        Self::from_parts(UrlParts::parse(url))
    }

    /// Build from an already parsed URL.
    #[must_use]
    pub fn from_parts(parts: UrlParts) -> Self {
        if parts.is_empty() {
            return Self::empty();
        }
        Self {
            pathname: parts.pathname,
            query: parts.query,
            hash: parts.hash,
            ..Self::default()
        }
    }

    /// Returns `true` for the canonical empty destination.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pathname.is_none() && self.query.is_empty() && self.hash.is_none()
    }

    /// Pathname, `/` when absent.
    #[must_use]
    pub fn path(&self) -> &str {
        match self.pathname.as_deref() {
            None | Some("") => "/",
            Some(p) => p,
        }
    }

    /// Look up a query value.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }

    /// Set a query parameter (builder pattern).
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    /// Set the pathname (builder pattern).
    #[must_use]
    pub fn with_pathname(mut self, pathname: impl Into<String>) -> Self {
        self.pathname = Some(pathname.into());
        self
    }

    /// Query serialized as `application/x-www-form-urlencoded`, `None` if empty.
    #[must_use]
    pub fn query_string(&self) -> Option<String> {
        encode_query(&self.query)
    }

    /// Render `<prefix><path>[?query][#hash]`.
    ///
    /// ```
    /// use linkwise::Destination;
    ///
    /// let d = Destination::from_url("https://x.example/1?product=123#anchor");
    /// assert_eq!(d.render("https://shop.example"), "https://shop.example/1?product=123#anchor");
    /// assert_eq!(d.render("merchant://"), "merchant:///1?product=123#anchor");
    /// ```
    #[must_use]
    pub fn render(&self, prefix: &str) -> String {
        self.render_with(prefix, self.path(), &self.query)
    }

    /// Render with an explicit path and query, keeping this destination's hash.
    #[must_use]
    pub fn render_with(
        &self,
        prefix: &str,
        path: &str,
        query: &BTreeMap<String, String>,
    ) -> String {
        let mut out = String::with_capacity(prefix.len() + path.len() + 16);
        out.push_str(prefix);
        out.push_str(path);
        if let Some(q) = encode_query(query) {
            out.push('?');
            out.push_str(&q);
        }
        if let Some(hash) = &self.hash {
            out.push('#');
            out.push_str(hash);
        }
        out
    }
}

/// Form-encode a query map, `None` if it is empty.
pub(crate) fn encode_query(query: &BTreeMap<String, String>) -> Option<String> {
    if query.is_empty() {
        return None;
    }
    Some(
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(query.iter())
            .finish(),
    )
}

/// Append `key=value` to a link's query string, before any fragment.
///
/// The value is form-encoded; the rest of the link is left byte-for-byte as is.
///
/// ```
/// use linkwise::append_query_param;
///
/// assert_eq!(
///     append_query_param("merchant:///1?product=123#anchor", "btn_ref", "srctok-XXX"),
///     "merchant:///1?product=123&btn_ref=srctok-XXX#anchor",
/// );
/// assert_eq!(
///     append_query_param("https://shop.example/", "btn_ref", "a b"),
///     "https://shop.example/?btn_ref=a+b",
/// );
/// ```
#[must_use]
pub fn append_query_param(link: &str, key: &str, value: &str) -> String {
    let (base, fragment) = match link.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (link, None),
    };

    let separator = match base.find('?') {
        None => "?",
        Some(_) if base.ends_with('?') || base.ends_with('&') => "",
        Some(_) => "&",
    };

    let mut out = String::with_capacity(link.len() + key.len() + value.len() + 2);
    out.push_str(base);
    out.push_str(separator);
    out.extend(form_urlencoded::byte_serialize(key.as_bytes()));
    out.push('=');
    out.extend(form_urlencoded::byte_serialize(value.as_bytes()));
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_url_is_canonical_empty() {
        let d = Destination::from_url("");
        assert_eq!(d, Destination::empty());
        assert_eq!(d.pathname, None);
        assert!(d.query.is_empty());
        assert_eq!(d.hash, None);
        assert!(d.is_empty());
    }

    #[test]
    fn from_url_keeps_path_query_hash() {
        let d = Destination::from_url("https://shop.example/a/b?z=1&y=2#h");
        assert_eq!(d.pathname.as_deref(), Some("/a/b"));
        assert_eq!(d.param("z"), Some("1"));
        assert_eq!(d.param("y"), Some("2"));
        assert_eq!(d.hash.as_deref(), Some("h"));
        assert_eq!(d.hostname, None);
    }

    #[test]
    fn render_sorts_query_keys() {
        let d = Destination::from_url("https://shop.example/p?z=1&a=2");
        assert_eq!(d.render("https://m.shop.example"), "https://m.shop.example/p?a=2&z=1");
    }

    #[test]
    fn render_empty_destination_uses_root() {
        assert_eq!(Destination::empty().render("https://shop.example"), "https://shop.example/");
    }

    #[test]
    fn append_after_existing_query() {
        assert_eq!(
            append_query_param(
                "https://shop.example/1?product=123#anchor",
                "btn_ref",
                "srctok-XXX"
            ),
            "https://shop.example/1?product=123&btn_ref=srctok-XXX#anchor"
        );
    }

    #[test]
    fn append_to_dangling_separator() {
        assert_eq!(append_query_param("uber://?", "k", "v"), "uber://?k=v");
        assert_eq!(append_query_param("uber://?a=1&", "k", "v"), "uber://?a=1&k=v");
    }

    #[test]
    fn append_encodes_value() {
        assert_eq!(
            append_query_param("app://x", "btn_ref", "a&b=c"),
            "app://x?btn_ref=a%26b%3Dc"
        );
    }

    #[test]
    fn append_does_not_touch_input() {
        let link = String::from("merchant:///1#frag");
        let out = append_query_param(&link, "btn_ref", "t");
        assert_eq!(link, "merchant:///1#frag");
        assert_eq!(out, "merchant:///1?btn_ref=t#frag");
    }
}
