//! Configuration records.
//!
//! Field names are a compatibility contract with every service that hydrates
//! from the module projection, so they are spelled out here and never renamed.

use serde::{Deserialize, Serialize};

/// Maps a web hostname, optionally narrowed by a regex over the raw query
/// string, to a merchant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedMerchant {
    pub hostname: String,
    pub organization_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub query_regex: Option<String>,
}

impl SupportedMerchant {
    /// A plain hostname record.
    pub fn new(hostname: impl Into<String>, organization_id: impl Into<String>) -> Self {
        Self {
            hostname: hostname.into(),
            organization_id: organization_id.into(),
            query_regex: None,
        }
    }

    /// Narrow this record to query strings matching `pattern`.
    #[must_use]
    pub fn with_query_regex(mut self, pattern: impl Into<String>) -> Self {
        self.query_regex = Some(pattern.into());
        self
    }
}

/// Lifecycle of an [`Approval`]. Only `Approved` authorizes link building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApprovalStatus {
    Pending,
    Approved,
    Declined,
    Revoked,
}

/// Authorization for a publisher (`audience`) to monetize a merchant
/// (`organization`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    pub status: ApprovalStatus,
    pub audience: String,
    pub organization: String,
}

impl Approval {
    /// An approved record.
    pub fn approved(audience: impl Into<String>, organization: impl Into<String>) -> Self {
        Self::with_status(ApprovalStatus::Approved, audience, organization)
    }

    /// A record with an explicit status.
    pub fn with_status(
        status: ApprovalStatus,
        audience: impl Into<String>,
        organization: impl Into<String>,
    ) -> Self {
        Self {
            status,
            audience: audience.into(),
            organization: organization.into(),
        }
    }

    #[must_use]
    pub fn is_approved(&self) -> bool {
        self.status == ApprovalStatus::Approved
    }
}

/// Associates a merchant with its `<subdomain>.bttn.io` tracking subdomain and
/// its canonical website.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WebToAppMapping {
    pub organization: String,
    pub subdomain_name: String,
    pub external_host: String,
}

impl WebToAppMapping {
    pub fn new(
        organization: impl Into<String>,
        subdomain_name: impl Into<String>,
        external_host: impl Into<String>,
    ) -> Self {
        Self {
            organization: organization.into(),
            subdomain_name: subdomain_name.into(),
            external_host: external_host.into(),
        }
    }
}

/// An affiliate-network hostname whose query parameters embed a destination URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedAffiliate {
    pub hostname: String,
    #[serde(default)]
    pub query_url_keys: Vec<String>,
}

impl SupportedAffiliate {
    pub fn new<I, S>(hostname: impl Into<String>, query_url_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            hostname: hostname.into(),
            query_url_keys: query_url_keys.into_iter().map(Into::into).collect(),
        }
    }
}

/// A fixed `key=value` on an affiliate hostname that stands for a destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedAffiliateQueryId {
    pub hostname: String,
    pub key: String,
    pub value: String,
    pub organization_id: String,
    pub url: String,
}

/// A regex over an affiliate pathname whose captures select a destination.
///
/// `redirect: true` entries need a live fetch-and-follow rather than static
/// substitution; the engine only signals that (see
/// [`Config::should_redirect_by_url`](crate::Config::should_redirect_by_url)).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportedAffiliatePathnameId {
    pub hostname: String,
    pub regex: String,
    #[serde(default)]
    pub redirect: bool,
    #[serde(default)]
    pub matches: Vec<PathnameIdMatch>,
}

/// One row of a [`SupportedAffiliatePathnameId`] lookup table.
///
/// `values` is compared element-wise against the regex capture groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathnameIdMatch {
    pub values: Vec<String>,
    pub organization_id: String,
    pub url: String,
    /// Cache-key template for redirect entries, see [`render_cache_key`](crate::render_cache_key).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_key: Option<String>,
}

impl PathnameIdMatch {
    pub fn new<I, S>(values: I, organization_id: impl Into<String>, url: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            organization_id: organization_id.into(),
            url: url.into(),
            cache_key: None,
        }
    }

    #[must_use]
    pub fn with_cache_key(mut self, template: impl Into<String>) -> Self {
        self.cache_key = Some(template.into());
        self
    }

    /// Element-wise exact equality with a capture list.
    #[must_use]
    pub fn matches_captures(&self, captures: &[String]) -> bool {
        self.values.as_slice() == captures
    }
}

/// A named, merchant-owned configurable slot with a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerParameter {
    pub id: String,
    pub organization: String,
    pub name: String,
    pub default_value: String,
}

/// A publisher's override for a [`PartnerParameter`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerValue {
    /// The [`PartnerParameter::id`] this value overrides.
    pub partner_parameter: String,
    pub audience: String,
    pub value: String,
}
