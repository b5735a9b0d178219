//! Built-in merchant strategies
//!
//! Two families:
//!
//! - **Template merchants** ([`AppTemplate`]): the app mirrors the website's
//!   paths under its own scheme. One static table row each, see [`catalog`].
//! - **Bespoke merchants**: one type per merchant implementing
//!   [`LinkBuilder`](crate::LinkBuilder) directly (multi-region hosts,
//!   platform-conditional formats, wrapped referrers, partner-value tags).
//!
//! Merchants without a registered strategy get [`GenericBuilder`].

pub mod catalog;
mod delivery;
mod generic;
mod regional;
mod retail;
mod rides;
mod template;
mod tickets;
mod travel;

pub use delivery::PostmatesBuilder;
pub use generic::GenericBuilder;
pub use regional::{AmazonBuilder, EbayBuilder};
pub use retail::{EtsyBuilder, MacysBuilder, TargetBuilder, WalmartBuilder, WishBuilder};
pub use rides::{LyftBuilder, UberBuilder};
pub use template::{AppTemplate, TemplateBuilder};
pub use tickets::TicketmasterBuilder;
pub use travel::{AirbnbBuilder, BookingBuilder, ExpediaBuilder, HotelTonightBuilder};

use std::collections::BTreeMap;

use crate::{BuilderRegistryBuilder, Destination};

/// Merchant organization ids of the built-in strategies.
pub mod ids {
    pub const AIRBNB: &str = "org-3b8e1f0c52a7d914";
    pub const AMAZON: &str = "org-0d5c7a19e3f2b486";
    pub const ASOS: &str = "org-6f21c9d0a4e7b358";
    pub const BEST_BUY: &str = "org-1a9d4e7c0b52f368";
    pub const BOOKING: &str = "org-7e0b3c95d1a2f846";
    pub const BOXED: &str = "org-4c6a2e81f9d05b37";
    pub const CHEWY: &str = "org-2f7d0a6c94e1b853";
    pub const DOORDASH: &str = "org-5b3e9c17a0d4f286";
    pub const EBAY: &str = "org-0a4f6e2d8c1b9357";
    pub const ETSY: &str = "org-6d2a8f04c7e1b935";
    pub const EVENTBRITE: &str = "org-3e9f1b6d0a7c2548";
    pub const EXPEDIA: &str = "org-1c5e7b93f0a2d684";
    pub const FANDANGO: &str = "org-7a3d5f0e2c9b1846";
    pub const GAP: &str = "org-2b8c4e6a1f0d9375";
    pub const GROUPON: &str = "org-5e1a7c3f9b0d2648";
    pub const GRUBHUB: &str = "org-0f6b2d8e4a1c7359";
    pub const HOME_DEPOT: &str = "org-4a0e8c2f6d1b9573";
    pub const HOTELS_COM: &str = "org-6c4f0a2e8b1d7395";
    pub const HOTELTONIGHT: &str = "org-2d9b5f1a7e3c0864";
    pub const HOTWIRE: &str = "org-1f3a9d5c7e0b2846";
    pub const INSTACART: &str = "org-7b5d1e9a3f0c2468";
    pub const JCPENNEY: &str = "org-3a7c1e5f9b0d4286";
    pub const JET: &str = "org-5d0f2b4a6c8e1937";
    pub const KAYAK: &str = "org-0e2a4c6f8b1d3579";
    pub const KOHLS: &str = "org-4f8b0d2a6e1c9357";
    pub const LOWES: &str = "org-6a2e4c8f0b1d5793";
    pub const LYFT: &str = "org-1e7c3a9f5b0d2468";
    pub const MACYS: &str = "org-3c1e7a5f9d0b2486";
    pub const MERCARI: &str = "org-5f9d3b1a7e0c4268";
    pub const NEWEGG: &str = "org-7c9e1a3f5d0b2864";
    pub const NORDSTROM: &str = "org-2a6e0c4f8d1b3957";
    pub const OLD_NAVY: &str = "org-4e0a6c2f8b1d7539";
    pub const OPENTABLE: &str = "org-6e8a0c2f4d1b9375";
    pub const OVERSTOCK: &str = "org-0c8e2a4f6b1d5379";
    pub const PETCO: &str = "org-2c0e8a6f4b1d3597";
    pub const POSHMARK: &str = "org-5a3c7e1f9d0b6248";
    pub const POSTMATES: &str = "org-7d1f3b5a9e0c6842";
    pub const PRICELINE: &str = "org-1b7d3f9a5e0c2684";
    pub const SAMS_CLUB: &str = "org-3f5b9d1a7e0c4826";
    pub const SEAMLESS: &str = "org-5c7e3a9f1b0d2486";
    pub const SEATGEEK: &str = "org-7f3b5d9a1e0c8264";
    pub const SEPHORA: &str = "org-1d3f7b9a5e0c6248";
    pub const STUBHUB: &str = "org-3b5d9f1a7e0c2846";
    pub const TARGET: &str = "org-5e7a1c3f9b0d4628";
    pub const TICKETMASTER: &str = "org-7a9c3e5f1b0d2468";
    pub const UBER: &str = "org-1a3c5e7f9b0d2846";
    pub const ULTA: &str = "org-3d5f9b1a7e0c6284";
    pub const WALMART: &str = "org-5b7d1f3a9e0c8426";
    pub const WAYFAIR: &str = "org-7e1a3c5f9d0b2648";
    pub const WISH: &str = "org-1c5a7e9f3b0d4286";
    pub const ZAPPOS: &str = "org-3e7c9a1f5b0d2864";
}

/// Register every built-in strategy.
#[must_use]
pub fn register(builder: BuilderRegistryBuilder) -> BuilderRegistryBuilder {
    let builder = builder
        .strategy::<AmazonBuilder<'static>>(ids::AMAZON)
        .strategy::<EbayBuilder<'static>>(ids::EBAY)
        .strategy::<UberBuilder<'static>>(ids::UBER)
        .strategy::<LyftBuilder<'static>>(ids::LYFT)
        .strategy::<HotelTonightBuilder<'static>>(ids::HOTELTONIGHT)
        .strategy::<BookingBuilder<'static>>(ids::BOOKING)
        .strategy::<ExpediaBuilder<'static>>(ids::EXPEDIA)
        .strategy::<AirbnbBuilder<'static>>(ids::AIRBNB)
        .strategy::<TargetBuilder<'static>>(ids::TARGET)
        .strategy::<WalmartBuilder<'static>>(ids::WALMART)
        .strategy::<EtsyBuilder<'static>>(ids::ETSY)
        .strategy::<MacysBuilder<'static>>(ids::MACYS)
        .strategy::<WishBuilder<'static>>(ids::WISH)
        .strategy::<TicketmasterBuilder<'static>>(ids::TICKETMASTER)
        .strategy::<PostmatesBuilder<'static>>(ids::POSTMATES);

    catalog::TEMPLATES
        .iter()
        .fold(builder, |b, (id, template)| b.template(id, template))
}

/// The destination's query with merchant-mandated values forced in.
fn protected_query<'p>(
    destination: &Destination,
    protected: impl IntoIterator<Item = (&'p str, String)>,
) -> BTreeMap<String, String> {
    let mut query = destination.query.clone();
    for (key, value) in protected {
        query.insert(key.to_owned(), value);
    }
    query
}
