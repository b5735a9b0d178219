//! Merchant matcher and redirect signals
//!
//! [`Config::supported_merchant_by_url`] maps a destination to the merchant
//! record that owns it. The redirect functions inspect only pathname entries
//! flagged `redirect: true` and tell the caller whether a live fetch is needed
//! (and under which cache key). No fetch happens here.

use regex::Regex;

use crate::cache_key::{default_cache_key, render_cache_key};
use crate::{
    hostnames_match, Config, PathnameIdMatch, SupportedAffiliatePathnameId, SupportedMerchant,
    UrlParts,
};

/// A redirect entry together with the row and captures that matched it.
struct RedirectHit<'a> {
    entry: &'a SupportedAffiliatePathnameId,
    row: &'a PathnameIdMatch,
    captures: Vec<String>,
}

impl Config {
    /// The merchant record owning `url`, after unwinding.
    ///
    /// Hostname must match; records with a `query_regex` additionally require
    /// it to match the raw query string. Plain records rank ahead of regex
    /// records, otherwise config order holds.
    #[must_use]
    pub fn supported_merchant_by_url(&self, url: &str) -> Option<&SupportedMerchant> {
        let destination = self.destination_url(url)?;
        let parts = UrlParts::parse(&destination);
        let hostname = parts.hostname.as_deref()?;
        let query = parts.query_string();

        let mut hits: Vec<&SupportedMerchant> = self
            .data
            .supported_merchants
            .iter()
            .zip(&self.merchants)
            .filter(|(record, _)| hostnames_match(&record.hostname, hostname))
            .filter(|(_, compiled)| {
                compiled
                    .query_regex
                    .as_ref()
                    .map_or(true, |re| re.is_match(query))
            })
            .map(|(record, _)| record)
            .collect();

        // Stable: ties keep config order.
        hits.sort_by_key(|record| record.query_regex.is_some());
        hits.first().copied()
    }

    /// The first `redirect: true` pathname entry matching `url`.
    ///
    /// Runs on `url` as given; wrappers are not unwound first.
    #[must_use]
    pub fn redirect_affiliate_pathname_id_by_url(
        &self,
        url: &str,
    ) -> Option<&SupportedAffiliatePathnameId> {
        self.redirect_hit(&UrlParts::parse(url)).map(|hit| hit.entry)
    }

    /// Whether `url` needs an external fetch-and-follow.
    #[must_use]
    pub fn should_redirect_by_url(&self, url: &str) -> bool {
        self.redirect_affiliate_pathname_id_by_url(url).is_some()
    }

    /// Cache key for following `url`.
    ///
    /// The matched row's `cache_key` template when it renders non-empty, else
    /// `<hostname><pathname>`.
    #[must_use]
    pub fn redirect_cache_key(&self, url: &str) -> String {
        let parts = UrlParts::parse(url);
        self.redirect_hit(&parts)
            .and_then(|hit| {
                let template = hit.row.cache_key.as_deref()?;
                let key = render_cache_key(template, &parts, &hit.captures);
                tracing::trace!(hostname = %hit.entry.hostname, key = %key, "custom cache key");
                Some(key).filter(|k| !k.is_empty())
            })
            .unwrap_or_else(|| default_cache_key(&parts))
    }

    fn redirect_hit<'s>(&'s self, parts: &UrlParts) -> Option<RedirectHit<'s>> {
        self.pathname_id_hits(parts)
            .filter(|(entry, _)| entry.redirect)
            .find_map(|(entry, captures)| {
                let row = entry.matches.iter().find(|r| r.matches_captures(&captures))?;
                Some(RedirectHit {
                    entry,
                    row,
                    captures,
                })
            })
    }

    /// Pathname entries whose hostname and regex match, with their captures.
    pub(crate) fn pathname_id_hits<'s, 'p>(
        &'s self,
        parts: &'p UrlParts,
    ) -> impl Iterator<Item = (&'s SupportedAffiliatePathnameId, Vec<String>)> + 'p
    where
        's: 'p,
    {
        let hostname = parts.host();
        self.data
            .supported_affiliate_pathname_ids
            .iter()
            .zip(&self.pathname_regexes)
            .filter(move |(entry, _)| hostnames_match(&entry.hostname, hostname))
            .filter_map(move |(entry, re)| Some((entry, captures(re, parts.path())?)))
    }
}

/// Capture groups 1..n; an unmatched optional group is `""`.
fn captures(re: &Regex, haystack: &str) -> Option<Vec<String>> {
    let caps = re.captures(haystack)?;
    Some(
        caps.iter()
            .skip(1)
            .map(|m| m.map_or_else(String::new, |m| m.as_str().to_owned()))
            .collect(),
    )
}
