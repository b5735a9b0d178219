//! Redirect/affiliate unwinder
//!
//! Recovers the real destination hidden behind a `bttn.io` tracking URL or an
//! affiliate-network wrapper. Resolvers are plain functions held in ordered
//! slices; the first non-`None` result wins.
//!
//! | Order | Resolver | Recognizes |
//! |-------|----------|------------|
//! | 1 | `bttnio` | `track.bttn.io/<partner>/…`, `<partner>.bttn.io/…` |
//! | 2a | `affiliate_query_url` | destination URL embedded in a declared query key |
//! | 2b | `affiliate_query_id` | fixed `key=value` → URL |
//! | 2c | `affiliate_pathname_id` | pathname regex captures → URL |

use crate::{Config, UrlParts, BTTNIO_DOMAIN, BTTNIO_TRACK_HOST};

type Resolver = fn(&Config, &UrlParts) -> Option<String>;

/// Top-level resolver order.
const RESOLVERS: &[(&str, Resolver)] = &[
    ("bttnio", bttnio),
    ("affiliate", affiliate),
];

/// Affiliate sub-stage order.
const AFFILIATE_STAGES: &[(&str, Resolver)] = &[
    ("affiliate_query_url", affiliate_query_url),
    ("affiliate_query_id", affiliate_query_id),
    ("affiliate_pathname_id", affiliate_pathname_id),
];

impl Config {
    /// The real destination behind `url`.
    ///
    /// `None` for blank input. Otherwise the first resolver hit, or `url`
    /// unchanged when no resolver recognizes it.
    #[must_use]
    pub fn destination_url(&self, url: &str) -> Option<String> {
        if url.trim().is_empty() {
            return None;
        }
        let parts = UrlParts::parse(url);
        first_hit(self, &parts, RESOLVERS).or_else(|| Some(url.to_owned()))
    }

    /// The destination behind a `bttn.io` tracking URL, if it is one.
    ///
    /// Protocol is forced to `http`; pathname (minus the `/<partner>` prefix for
    /// the `track.bttn.io` form), query and hash are preserved.
    #[must_use]
    pub fn destination_url_from_bttnio_url(&self, url: &str) -> Option<String> {
        bttnio(self, &UrlParts::parse(url))
    }

    /// The destination behind an affiliate-network wrapper, if it is one.
    #[must_use]
    pub fn destination_url_from_affiliate_url(&self, url: &str) -> Option<String> {
        affiliate(self, &UrlParts::parse(url))
    }
}

fn first_hit(config: &Config, parts: &UrlParts, resolvers: &[(&str, Resolver)]) -> Option<String> {
    resolvers.iter().find_map(|(name, resolve)| {
        let hit = resolve(config, parts)?;
        tracing::debug!(resolver = name, destination = %hit, "resolver hit");
        Some(hit)
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// bttn.io
// ═══════════════════════════════════════════════════════════════════════════════

fn bttnio(config: &Config, parts: &UrlParts) -> Option<String> {
    let hostname = parts.hostname.as_deref()?;

    let (subdomain, pathname) = if hostname == BTTNIO_TRACK_HOST {
        let partner = parts.first_segment()?;
        let rest = parts.path().trim_start_matches('/').strip_prefix(partner)?;
        let rest = if rest.is_empty() { "/" } else { rest };
        (partner, rest)
    } else {
        let partner = hostname
            .strip_suffix(BTTNIO_DOMAIN)
            .and_then(|h| h.strip_suffix('.'))
            .filter(|p| !p.is_empty() && !p.contains('.'))?;
        (partner, parts.path())
    };

    let mapping = config.web_to_app_mapping_by_subdomain(subdomain)?;
    let external = UrlParts::parse(&mapping.external_host);
    let external_host = external.hostname.as_deref()?;

    let mut out = format!("http://{external_host}{pathname}");
    if let Some(query) = parts.raw_query.as_deref().filter(|q| !q.is_empty()) {
        out.push('?');
        out.push_str(query);
    }
    if let Some(hash) = &parts.hash {
        out.push('#');
        out.push_str(hash);
    }
    Some(out)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Affiliate networks
// ═══════════════════════════════════════════════════════════════════════════════

fn affiliate(config: &Config, parts: &UrlParts) -> Option<String> {
    parts.hostname.as_ref()?;
    first_hit(config, parts, AFFILIATE_STAGES)
}

fn affiliate_query_url(config: &Config, parts: &UrlParts) -> Option<String> {
    let hostname = parts.host();
    let hits: Vec<&String> = config
        .supported_affiliates()
        .iter()
        .filter(|a| crate::hostnames_match(&a.hostname, hostname))
        .flat_map(|a| a.query_url_keys.iter())
        .filter_map(|key| parts.query.get(key))
        .filter(|value| !value.trim().is_empty())
        .collect();
    hits.first().map(|v| (*v).clone())
}

fn affiliate_query_id(config: &Config, parts: &UrlParts) -> Option<String> {
    let hostname = parts.host();
    config
        .supported_affiliate_query_ids()
        .iter()
        .find(|q| {
            crate::hostnames_match(&q.hostname, hostname)
                && parts.query.get(&q.key).is_some_and(|v| *v == q.value)
        })
        .map(|q| q.url.clone())
}

fn affiliate_pathname_id(config: &Config, parts: &UrlParts) -> Option<String> {
    config
        .pathname_id_hits(parts)
        .find_map(|(entry, captures)| {
            entry
                .matches
                .iter()
                .find(|row| row.matches_captures(&captures))
        })
        .map(|row| row.url.clone())
}
