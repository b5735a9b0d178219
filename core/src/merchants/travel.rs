//! Travel merchants.

use once_cell::sync::Lazy;
use regex::Regex;

use super::protected_query;
use crate::destination::encode_query;
use crate::{Action, BuilderContext, Destination, IntoLinkBuilder, LinkBuilder, Platform};

// ═══════════════════════════════════════════════════════════════════════════════
// HotelTonight
// ═══════════════════════════════════════════════════════════════════════════════

/// The iOS and Android apps disagree on the hotel route (`hotel/` vs `hotels/`).
pub struct HotelTonightBuilder<'a> {
    ctx: BuilderContext<'a>,
}

impl IntoLinkBuilder for HotelTonightBuilder<'static> {
    fn into_builder<'a>(ctx: BuilderContext<'a>) -> Box<dyn LinkBuilder + 'a> {
        Box::new(HotelTonightBuilder { ctx })
    }
}

impl HotelTonightBuilder<'_> {
    fn app_link(destination: &Destination, platform: Platform) -> Option<String> {
        let path = destination.path();
        if path == "/" {
            return Some(destination.render_with("hoteltonight://", "", &destination.query));
        }
        let slug = path
            .strip_prefix("/hotels/")?
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())?;
        let route = match platform {
            Platform::Ios => "hotel",
            Platform::Android => "hotels",
            Platform::Web | Platform::Browser => return None,
        };
        Some(destination.render_with(
            "hoteltonight://",
            &format!("{route}/{slug}"),
            &destination.query,
        ))
    }
}

impl LinkBuilder for HotelTonightBuilder<'_> {
    fn context(&self) -> &BuilderContext<'_> {
        &self.ctx
    }

    fn app_action(
        &self,
        destination: &Destination,
        platform: Platform,
        token: Option<&str>,
    ) -> Action {
        let app = platform
            .is_app()
            .then(|| Self::app_link(destination, platform))
            .flatten();
        let browser = destination.render("https://www.hoteltonight.com");
        self.ctx.action(app.as_deref(), Some(&browser), token)
    }

    fn web_action(
        &self,
        destination: &Destination,
        _platform: Platform,
        token: Option<&str>,
    ) -> Action {
        let browser = destination.render("https://www.hoteltonight.com");
        self.ctx.action(None, Some(&browser), token)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Booking.com
// ═══════════════════════════════════════════════════════════════════════════════

const BOOKING_DEFAULT_AID: &str = "304142";

/// Android gets an intent URL; the partner `aid` is forced everywhere.
pub struct BookingBuilder<'a> {
    ctx: BuilderContext<'a>,
}

impl IntoLinkBuilder for BookingBuilder<'static> {
    fn into_builder<'a>(ctx: BuilderContext<'a>) -> Box<dyn LinkBuilder + 'a> {
        Box::new(BookingBuilder { ctx })
    }
}

impl BookingBuilder<'_> {
    fn browser_link(&self, destination: &Destination) -> String {
        destination.render_with(
            "https://www.booking.com",
            destination.path(),
            &self.query(destination),
        )
    }

    fn query(&self, destination: &Destination) -> std::collections::BTreeMap<String, String> {
        protected_query(
            destination,
            [("aid", self.ctx.partner_value("aid", BOOKING_DEFAULT_AID))],
        )
    }

    fn app_link(&self, destination: &Destination, platform: Platform) -> Option<String> {
        let hotel = destination
            .path()
            .strip_prefix("/hotel/")?
            .trim_end_matches(".html");
        let query = encode_query(&self.query(destination)).unwrap_or_default();
        match platform {
            Platform::Ios => Some(format!("booking://hotel/{hotel}?{query}")),
            Platform::Android => Some(format!(
                "intent://hotel/{hotel}?{query}#Intent;scheme=booking;package=com.booking;end"
            )),
            Platform::Web | Platform::Browser => None,
        }
    }
}

impl LinkBuilder for BookingBuilder<'_> {
    fn context(&self) -> &BuilderContext<'_> {
        &self.ctx
    }

    fn app_action(
        &self,
        destination: &Destination,
        platform: Platform,
        token: Option<&str>,
    ) -> Action {
        let app = self.app_link(destination, platform);
        self.ctx
            .action(app.as_deref(), Some(&self.browser_link(destination)), token)
    }

    fn web_action(
        &self,
        destination: &Destination,
        _platform: Platform,
        token: Option<&str>,
    ) -> Action {
        self.ctx
            .action(None, Some(&self.browser_link(destination)), token)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Expedia
// ═══════════════════════════════════════════════════════════════════════════════

static EXPEDIA_HOTEL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\.h(\d+)\.Hotel-Information").expect("hard-coded regular expression to be valid")
});

const EXPEDIA_DEFAULT_AFFCID: &str = "US.DIRECT.BUTTON";

/// Only hotel information pages open in the app.
pub struct ExpediaBuilder<'a> {
    ctx: BuilderContext<'a>,
}

impl IntoLinkBuilder for ExpediaBuilder<'static> {
    fn into_builder<'a>(ctx: BuilderContext<'a>) -> Box<dyn LinkBuilder + 'a> {
        Box::new(ExpediaBuilder { ctx })
    }
}

impl ExpediaBuilder<'_> {
    fn hotel_id(path: &str) -> Option<&str> {
        EXPEDIA_HOTEL
            .captures(path)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }

    fn browser_link(&self, destination: &Destination) -> String {
        let affcid = self.ctx.partner_value("affcid", EXPEDIA_DEFAULT_AFFCID);
        destination.render_with(
            "https://www.expedia.com",
            destination.path(),
            &protected_query(destination, [("affcid", affcid)]),
        )
    }
}

impl LinkBuilder for ExpediaBuilder<'_> {
    fn context(&self) -> &BuilderContext<'_> {
        &self.ctx
    }

    fn app_action(
        &self,
        destination: &Destination,
        platform: Platform,
        token: Option<&str>,
    ) -> Action {
        let app = Self::hotel_id(destination.path())
            .filter(|_| platform.is_app())
            .map(|id| format!("expda://hotelSearch?hotelId={id}"));
        self.ctx
            .action(app.as_deref(), Some(&self.browser_link(destination)), token)
    }

    fn web_action(
        &self,
        destination: &Destination,
        _platform: Platform,
        token: Option<&str>,
    ) -> Action {
        self.ctx
            .action(None, Some(&self.browser_link(destination)), token)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Airbnb
// ═══════════════════════════════════════════════════════════════════════════════

pub struct AirbnbBuilder<'a> {
    ctx: BuilderContext<'a>,
}

impl IntoLinkBuilder for AirbnbBuilder<'static> {
    fn into_builder<'a>(ctx: BuilderContext<'a>) -> Box<dyn LinkBuilder + 'a> {
        Box::new(AirbnbBuilder { ctx })
    }
}

impl LinkBuilder for AirbnbBuilder<'_> {
    fn context(&self) -> &BuilderContext<'_> {
        &self.ctx
    }

    fn app_action(
        &self,
        destination: &Destination,
        platform: Platform,
        token: Option<&str>,
    ) -> Action {
        let path = destination.path();
        let app = (platform.is_app() && (path.starts_with("/rooms/") || path.starts_with("/s/")))
            .then(|| {
                let route = path.trim_start_matches('/');
                destination.render_with("airbnb://", route, &destination.query)
            });
        let browser = destination.render("https://www.airbnb.com");
        self.ctx.action(app.as_deref(), Some(&browser), token)
    }

    fn web_action(
        &self,
        destination: &Destination,
        _platform: Platform,
        token: Option<&str>,
    ) -> Action {
        let browser = destination.render("https://www.airbnb.com");
        self.ctx.action(None, Some(&browser), token)
    }
}
