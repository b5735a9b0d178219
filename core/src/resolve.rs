//! End-to-end resolution: inbound URL → attributed link set.

use serde::Serialize;

use crate::{Action, Config, ConfigError, Platform};

/// Every link the engine produces for one URL and publisher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkSet {
    pub merchant_id: String,
    pub destination_url: String,
    pub app_action: Action,
    pub universal_link: Option<String>,
}

impl Config {
    /// Unwind `url`, match its merchant, and build links for `publisher_id`.
    ///
    /// `Ok(None)` when the URL does not belong to a supported merchant.
    ///
    /// # Errors
    ///
    /// Propagates [`Config::create_builder`] failures, most commonly
    /// [`ConfigError::NotApproved`].
    pub fn links_for_url(
        &self,
        publisher_id: &str,
        url: &str,
        platform: Platform,
        attribution_token: Option<&str>,
    ) -> Result<Option<LinkSet>, ConfigError> {
        let Some(destination_url) = self.destination_url(url) else {
            return Ok(None);
        };
        let Some(merchant) = self.supported_merchant_by_url(url) else {
            tracing::debug!(url, "no supported merchant");
            return Ok(None);
        };

        let builder = self.create_builder(publisher_id, &merchant.organization_id)?;
        let destination = builder.destination_from_url(&destination_url);
        let app_action = builder.app_action(&destination, platform, attribution_token);
        let universal_link = builder.universal_link(&destination, attribution_token);

        tracing::debug!(
            publisher_id,
            merchant_id = %merchant.organization_id,
            %platform,
            has_app_link = app_action.app_link.is_some(),
            "links built"
        );

        Ok(Some(LinkSet {
            merchant_id: merchant.organization_id.clone(),
            destination_url,
            app_action,
            universal_link,
        }))
    }
}
