//! `LinkBuilder`: the shared contract every merchant strategy implements
//!
//! A strategy turns a [`Destination`] into three kinds of links:
//!
//! - **app action**: native deep link plus a browser fallback
//! - **web action**: browser link only
//! - **universal link**: `https://<subdomain>.bttn.io/...` tracking link
//!
//! Strategies hold a [`BuilderContext`], a borrowed, read-only view of the
//! [`Config`] scoped to one (publisher, merchant) pair. The context owns the
//! attribution rules shared by every strategy (see [`BuilderContext::action`]).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::destination::append_query_param;
use crate::{Config, ConfigError, Destination, WebToAppMapping, BTTNIO_DOMAIN};

/// Query parameter carrying the public attribution token.
pub const ATTRIBUTION_PARAM: &str = "btn_ref";

/// Query parameter carrying the token when the merchant does not accept
/// platform affiliation on that link type.
pub const INTERNAL_ATTRIBUTION_PARAM: &str = "btn_tkn";

// ═══════════════════════════════════════════════════════════════════════════════
// Value types
// ═══════════════════════════════════════════════════════════════════════════════

/// Platform a link is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
    Web,
    Browser,
}

impl Platform {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Android => "android",
            Self::Web => "web",
            Self::Browser => "browser",
        }
    }

    /// `true` for platforms that can open a native app.
    #[must_use]
    pub fn is_app(&self) -> bool {
        matches!(self, Self::Ios | Self::Android)
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Platform {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ios" => Ok(Self::Ios),
            "android" => Ok(Self::Android),
            "web" => Ok(Self::Web),
            "browser" => Ok(Self::Browser),
            _ => Err(ConfigError::UnknownPlatform { value: s.to_owned() }),
        }
    }
}

/// An action link pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub app_link: Option<String>,
    pub browser_link: Option<String>,
}

impl Action {
    /// Neither link.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_none(&self) -> bool {
        self.app_link.is_none() && self.browser_link.is_none()
    }
}

/// Whether a merchant accepts platform affiliation on each link type.
///
/// Fixed per strategy at construction. When a flag is `false`, the token is
/// still propagated but under [`INTERNAL_ATTRIBUTION_PARAM`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Affiliation {
    pub app: bool,
    pub web: bool,
}

impl Affiliation {
    pub const FULL: Self = Self { app: true, web: true };
    pub const APP_ONLY: Self = Self { app: true, web: false };
    pub const WEB_ONLY: Self = Self { app: false, web: true };
    pub const NONE: Self = Self { app: false, web: false };
}

impl Default for Affiliation {
    fn default() -> Self {
        Self::FULL
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// BuilderContext
// ═══════════════════════════════════════════════════════════════════════════════

/// Read-only view a strategy is bound to.
///
/// Only [`Config`] creates contexts, and only after the approval check passed.
#[derive(Clone, Copy)]
pub struct BuilderContext<'a> {
    config: &'a Config,
    publisher_id: &'a str,
    merchant_id: &'a str,
    affiliation: Affiliation,
}

impl<'a> BuilderContext<'a> {
    pub(crate) fn new(config: &'a Config, publisher_id: &'a str, merchant_id: &'a str) -> Self {
        Self {
            config,
            publisher_id,
            merchant_id,
            affiliation: Affiliation::FULL,
        }
    }

    /// Same context with different affiliation flags (strategy construction).
    #[must_use]
    pub fn with_affiliation(mut self, affiliation: Affiliation) -> Self {
        self.affiliation = affiliation;
        self
    }

    #[must_use]
    pub fn config(&self) -> &'a Config {
        self.config
    }

    #[must_use]
    pub fn publisher_id(&self) -> &'a str {
        self.publisher_id
    }

    #[must_use]
    pub fn merchant_id(&self) -> &'a str {
        self.merchant_id
    }

    #[must_use]
    pub fn affiliation(&self) -> Affiliation {
        self.affiliation
    }

    /// The token to attribute with: the caller's, else the publisher id.
    #[must_use]
    pub fn token<'t>(&'t self, attribution_token: Option<&'t str>) -> &'t str {
        attribution_token
            .filter(|t| !t.is_empty())
            .unwrap_or(self.publisher_id)
    }

    /// Attach the attribution token to an app/browser link pair.
    ///
    /// Each present link gets `btn_ref=<token>`, or `btn_tkn=<token>` when the
    /// matching affiliation flag is off. Inputs are borrowed and never changed.
    ///
    /// ```ignore
    /// let action = ctx.action(
    ///     Some("merchant:///1?product=123#anchor"),
    ///     Some("https://merchant.com/1?product=123#anchor"),
    ///     Some("srctok-XXX"),
    /// );
    /// assert_eq!(
    ///     action.app_link.as_deref(),
    ///     Some("merchant:///1?product=123&btn_ref=srctok-XXX#anchor")
    /// );
    /// ```
    #[must_use]
    pub fn action(
        &self,
        app_link: Option<&str>,
        browser_link: Option<&str>,
        attribution_token: Option<&str>,
    ) -> Action {
        let token = self.token(attribution_token);
        Action {
            app_link: app_link.map(|l| append_query_param(l, param(self.affiliation.app), token)),
            browser_link: browser_link
                .map(|l| append_query_param(l, param(self.affiliation.web), token)),
        }
    }

    /// Attribute a single web-side link (universal links, web actions).
    #[must_use]
    pub fn attribute_web(&self, link: &str, attribution_token: Option<&str>) -> String {
        append_query_param(
            link,
            param(self.affiliation.web),
            self.token(attribution_token),
        )
    }

    /// [`Config::get_partner_value`] for this merchant and publisher.
    #[must_use]
    pub fn partner_value(&self, name: &str, fallback: &str) -> String {
        self.config
            .get_partner_value(name, self.merchant_id, self.publisher_id, fallback)
    }

    /// This merchant's web-to-app mapping.
    #[must_use]
    pub fn web_to_app_mapping(&self) -> Option<&'a WebToAppMapping> {
        self.config.web_to_app_mapping_by_organization(self.merchant_id)
    }

    /// The mapped subdomain for this merchant, if any.
    #[must_use]
    pub fn default_partner_subdomain(&self) -> Option<String> {
        self.web_to_app_mapping()
            .map(|m| m.subdomain_name.clone())
            .filter(|s| !s.is_empty())
    }

    /// `https://<subdomain>.bttn.io<path>[?query]` with attribution and hash.
    #[must_use]
    pub fn universal_link_for(
        &self,
        subdomain: &str,
        destination: &Destination,
        attribution_token: Option<&str>,
    ) -> String {
        let base = destination.render(&format!("https://{subdomain}.{BTTNIO_DOMAIN}"));
        self.attribute_web(&base, attribution_token)
    }
}

fn param(affiliated: bool) -> &'static str {
    if affiliated {
        ATTRIBUTION_PARAM
    } else {
        INTERNAL_ATTRIBUTION_PARAM
    }
}

impl fmt::Debug for BuilderContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BuilderContext")
            .field("publisher_id", &self.publisher_id)
            .field("merchant_id", &self.merchant_id)
            .field("affiliation", &self.affiliation)
            .finish_non_exhaustive()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// LinkBuilder
// ═══════════════════════════════════════════════════════════════════════════════

/// A merchant's link-building strategy.
///
/// Implementations encode merchant-specific URL templates: which pathnames
/// have app support (no match means no app link), platform-conditional
/// formatting, and which query parameters are protected (always overwritten
/// with merchant-mandated values).
pub trait LinkBuilder: Send + Sync {
    /// The context this strategy is bound to.
    fn context(&self) -> &BuilderContext<'_>;

    /// Parse a raw URL into a [`Destination`].
    ///
    /// Default: `{pathname, query, hash}`; blank input is the empty destination.
    fn destination_from_url(&self, url: &str) -> Destination {
        Destination::from_url(url)
    }

    /// Native deep link plus browser fallback.
    fn app_action(
        &self,
        destination: &Destination,
        platform: Platform,
        attribution_token: Option<&str>,
    ) -> Action;

    /// Browser-only action.
    fn web_action(
        &self,
        destination: &Destination,
        platform: Platform,
        attribution_token: Option<&str>,
    ) -> Action;

    /// Cross-platform tracking link, `None` if the merchant has no subdomain.
    fn universal_link(
        &self,
        destination: &Destination,
        attribution_token: Option<&str>,
    ) -> Option<String> {
        let subdomain = self.partner_subdomain(destination)?;
        Some(
            self.context()
                .universal_link_for(&subdomain, destination, attribution_token),
        )
    }

    /// The `bttn.io` subdomain for universal links.
    fn partner_subdomain(&self, _destination: &Destination) -> Option<String> {
        self.context().default_partner_subdomain()
    }

    /// `app_action(destination_from_url(url), ..)`.
    fn app_action_from_url(
        &self,
        url: &str,
        platform: Platform,
        attribution_token: Option<&str>,
    ) -> Action {
        self.app_action(&self.destination_from_url(url), platform, attribution_token)
    }

    /// `web_action(destination_from_url(url), ..)`.
    fn web_action_from_url(
        &self,
        url: &str,
        platform: Platform,
        attribution_token: Option<&str>,
    ) -> Action {
        self.web_action(&self.destination_from_url(url), platform, attribution_token)
    }
}
