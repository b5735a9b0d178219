//! linkwise - URL resolution and attributed link building
//!
//! Resolves an inbound URL to a canonical merchant destination and builds
//! attributed, platform-specific action links for a publisher that is approved
//! to monetize that merchant.
//!
//! # Architecture
//!
//! The engine is a pipeline over one immutable [`Config`]:
//!
//! - [`UrlParts`]: Decomposition of a raw URL (never fails)
//! - [`Config::destination_url`]: Unwinds tracking-domain and affiliate wrappers
//! - [`Config::supported_merchant_by_url`]: Maps a destination to a merchant record
//! - [`Config::approvals`]: O(1) publisher → approved merchant index
//! - [`Config::create_builder`]: Instantiates the merchant's [`LinkBuilder`]
//! - [`LinkBuilder`]: Turns a [`Destination`] into app, browser and universal links
//!
//! The wire projections ([`ModuleConfig`], [`SdkConfig`]) snapshot and restore
//! the same data for lighter remote copies of the engine.
//!
//! # Key invariants
//!
//! 1. **Approval gates everything**: no builder exists and no approval-scoped
//!    projection exposes a merchant without an `approved` [`Approval`].
//!
//! 2. **First resolver wins**: the unwinder tries resolvers in a fixed order and
//!    stops at the first hit.
//!
//! 3. **Plain beats regex**: a [`SupportedMerchant`] without `query_regex` ranks
//!    ahead of a regex-qualified record for the same hostname.
//!
//! # Example
//!
//! ```
//! use linkwise::prelude::*;
//!
//! let config = Config::builder()
//!     .web_to_app_mapping(WebToAppMapping::new("org-bloop", "bloop", "http://bloop.com"))
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(
//!     config.destination_url("https://bloop.bttn.io/1/2?q=2#anchor").as_deref(),
//!     Some("http://bloop.com/1/2?q=2#anchor"),
//! );
//! ```

// ═══════════════════════════════════════════════════════════════════════════════
// Modules
// ═══════════════════════════════════════════════════════════════════════════════

mod approvals;
mod builder;
mod cache_key;
mod config;
mod destination;
mod entities;
mod merchant_match;
pub mod merchants;
mod projection;
mod registry;
mod resolve;
mod unwind;
mod url_parts;

// ═══════════════════════════════════════════════════════════════════════════════
// Public API
// ═══════════════════════════════════════════════════════════════════════════════

pub use approvals::ApprovedMerchants;
pub use builder::{
    Action, Affiliation, BuilderContext, LinkBuilder, Platform, ATTRIBUTION_PARAM,
    INTERNAL_ATTRIBUTION_PARAM,
};
pub use cache_key::render_cache_key;
pub use config::{Config, ConfigBuilder, WarningFn};
pub use destination::{append_query_param, Destination};
pub use entities::{
    Approval, ApprovalStatus, PartnerParameter, PartnerValue, PathnameIdMatch,
    SupportedAffiliate, SupportedAffiliatePathnameId, SupportedAffiliateQueryId,
    SupportedMerchant, WebToAppMapping,
};
pub use projection::{
    ModuleConfig, SdkAffiliate, SdkConfig, SdkHostname, SdkPathnameId, SdkQueryId, SdkSubdomain,
};
pub use registry::{BuilderRegistry, BuilderRegistryBuilder, IntoLinkBuilder};
pub use resolve::LinkSet;
pub use url_parts::{hostnames_match, normalize_hostname, UrlParts};

// ═══════════════════════════════════════════════════════════════════════════════
// Prelude
// ═══════════════════════════════════════════════════════════════════════════════

/// Prelude module for convenient imports.
///
/// ```
/// use linkwise::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        Action, Affiliation, Approval, ApprovalStatus, BuilderContext, Config, ConfigBuilder,
        ConfigError, Destination, LinkBuilder, LinkSet, ModuleConfig, PartnerParameter,
        PartnerValue, PathnameIdMatch, Platform, SdkConfig, SupportedAffiliate,
        SupportedAffiliatePathnameId, SupportedAffiliateQueryId, SupportedMerchant, UrlParts,
        WebToAppMapping,
    };
}

// ═══════════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════════

/// The platform's own tracking domain.
pub const BTTNIO_DOMAIN: &str = "bttn.io";

/// Hostname of the path-based tracking form (`track.bttn.io/<partner>/...`).
pub const BTTNIO_TRACK_HOST: &str = "track.bttn.io";

/// Maximum length for regex patterns in configuration.
///
/// Longer patterns fail [`Config::new`] with [`ConfigError::InvalidPattern`].
pub const MAX_REGEX_PATTERN_LENGTH: usize = 4096;

// ═══════════════════════════════════════════════════════════════════════════════
// Errors
// ═══════════════════════════════════════════════════════════════════════════════

/// Errors from configuration loading and builder creation.
///
/// All of these are deterministic: retrying with the same input fails the same
/// way. Fix the configuration or the caller's ids instead.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A builder was requested without a publisher id.
    #[error("publisher id is empty; every link builder is scoped to a publisher")]
    EmptyPublisherId,

    /// A builder was requested without a merchant id.
    #[error("merchant id is empty; every link builder is scoped to a merchant")]
    EmptyMerchantId,

    /// No approved approval links the publisher to the merchant.
    #[error(
        "publisher \"{publisher_id}\" is not approved for merchant \"{merchant_id}\"; \
         add an approval with status=approved, audience={publisher_id}, organization={merchant_id}"
    )]
    NotApproved {
        /// The requesting publisher.
        publisher_id: String,
        /// The merchant the publisher asked for.
        merchant_id: String,
    },

    /// The merchant has no registered strategy and a mapped one was required.
    #[error("merchant \"{merchant_id}\" has no registered link builder ({registered} registered)")]
    UnmappedMerchant {
        /// The unmapped merchant.
        merchant_id: String,
        /// Number of merchants the registry knows about.
        registered: usize,
    },

    /// A regex in the configuration failed to compile or is too long.
    #[error("invalid pattern \"{pattern}\": {reason}")]
    InvalidPattern {
        /// The offending pattern.
        pattern: String,
        /// Why it was rejected.
        reason: String,
    },

    /// Configuration could not be deserialized.
    #[error("invalid config: {source}")]
    InvalidConfig {
        /// The underlying deserialization error.
        #[from]
        source: serde_json::Error,
    },

    /// A platform string outside the supported set.
    #[error("unknown platform \"{value}\"; expected one of ios, android, web, browser")]
    UnknownPlatform {
        /// The rejected value.
        value: String,
    },
}
