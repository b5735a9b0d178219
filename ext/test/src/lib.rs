//! linkwise-test: conformance tooling for the resolution engine
//!
//! Provides a small, realistic configuration world and a warning recorder for
//! tests, plus (behind the `fixtures` feature) a YAML fixture runner that
//! drives [`Config`] through URL cases.
//!
//! # Example
//!
//! ```
//! use linkwise_test::prelude::*;
//!
//! let log = WarningLog::new();
//! let config = shop_world().on_warning(log.callback()).build().unwrap();
//!
//! assert_eq!(
//!     config.destination_url("https://shop.bttn.io/p/1").as_deref(),
//!     Some("http://shop.example/p/1"),
//! );
//! assert!(log.is_empty());
//! ```

use std::sync::{Arc, Mutex};

use linkwise::prelude::*;

#[cfg(feature = "fixtures")]
pub mod fixture;

/// Publisher id used throughout [`shop_world`].
pub const PUBLISHER: &str = "org-pub";

/// Merchant id used throughout [`shop_world`].
pub const SHOP: &str = "org-shop";

/// A config builder holding one approved merchant behind one affiliate network.
///
/// - `shop.example` belongs to [`SHOP`], mapped to the `shop` subdomain
/// - `click.aff.example` wraps destinations in `u` or `murl`
/// - [`PUBLISHER`] is approved for [`SHOP`]
#[must_use]
pub fn shop_world() -> ConfigBuilder {
    Config::builder()
        .supported_merchant(SupportedMerchant::new("shop.example", SHOP))
        .supported_affiliate(SupportedAffiliate::new("click.aff.example", ["u", "murl"]))
        .web_to_app_mapping(WebToAppMapping::new(SHOP, "shop", "http://shop.example"))
        .approval(Approval::approved(PUBLISHER, SHOP))
}

/// Records warnings emitted through [`ConfigBuilder::on_warning`].
#[derive(Debug, Clone, Default)]
pub struct WarningLog {
    messages: Arc<Mutex<Vec<String>>>,
}

impl WarningLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A callback that appends to this log.
    pub fn callback(&self) -> impl Fn(&str) + Send + Sync + 'static {
        let messages = Arc::clone(&self.messages);
        move |message: &str| {
            if let Ok(mut messages) = messages.lock() {
                messages.push(message.to_owned());
            }
        }
    }

    /// Warnings recorded so far, oldest first.
    #[must_use]
    pub fn messages(&self) -> Vec<String> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages().is_empty()
    }
}

/// Prelude for convenient imports.
pub mod prelude {
    pub use super::{shop_world, WarningLog, PUBLISHER, SHOP};
    pub use linkwise::prelude::*;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shop_world_resolves_affiliate_links() {
        let config = shop_world().build().unwrap();
        let merchant = config
            .supported_merchant_by_url(
                "https://click.aff.example/?u=https%3A%2F%2Fshop.example%2Fp",
            )
            .unwrap();
        assert_eq!(merchant.organization_id, SHOP);
        assert!(config.is_approved(PUBLISHER, SHOP));
    }

    #[test]
    fn warning_log_records_in_order() {
        let log = WarningLog::new();
        let config = shop_world().on_warning(log.callback()).build().unwrap();
        config.warn("first");
        config.warn("second");
        assert_eq!(log.messages(), vec!["first".to_owned(), "second".to_owned()]);
    }
}
