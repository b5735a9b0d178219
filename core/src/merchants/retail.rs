//! Retail merchants with bespoke app routes.

use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine;
use once_cell::sync::Lazy;
use regex::Regex;
use url::form_urlencoded;

use super::protected_query;
use crate::{Action, BuilderContext, Destination, IntoLinkBuilder, LinkBuilder, Platform, UrlParts};

/// Last path segment, if it is all digits.
fn trailing_id(path: &str) -> Option<&str> {
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()))
}

// ═══════════════════════════════════════════════════════════════════════════════
// Target
// ═══════════════════════════════════════════════════════════════════════════════

static TARGET_TCIN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/A-(\d+)").expect("hard-coded regular expression to be valid"));

/// Product pages carry the TCIN as `/-/A-<tcin>`.
pub struct TargetBuilder<'a> {
    ctx: BuilderContext<'a>,
}

impl IntoLinkBuilder for TargetBuilder<'static> {
    fn into_builder<'a>(ctx: BuilderContext<'a>) -> Box<dyn LinkBuilder + 'a> {
        Box::new(TargetBuilder { ctx })
    }
}

impl TargetBuilder<'_> {
    fn tcin(path: &str) -> Option<&str> {
        TARGET_TCIN
            .captures(path)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str())
    }

    fn browser_link(&self, destination: &Destination) -> String {
        let afid = self.ctx.partner_value("afid", "Button");
        destination.render_with(
            "https://www.target.com",
            destination.path(),
            &protected_query(destination, [("afid", afid)]),
        )
    }
}

impl LinkBuilder for TargetBuilder<'_> {
    fn context(&self) -> &BuilderContext<'_> {
        &self.ctx
    }

    fn app_action(
        &self,
        destination: &Destination,
        platform: Platform,
        token: Option<&str>,
    ) -> Action {
        let app = Self::tcin(destination.path())
            .filter(|_| platform.is_app())
            .map(|tcin| format!("target://product/{tcin}"));
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
// Walmart
// ═══════════════════════════════════════════════════════════════════════════════

/// iOS takes the item id in the path, Android in the query.
pub struct WalmartBuilder<'a> {
    ctx: BuilderContext<'a>,
}

impl IntoLinkBuilder for WalmartBuilder<'static> {
    fn into_builder<'a>(ctx: BuilderContext<'a>) -> Box<dyn LinkBuilder + 'a> {
        Box::new(WalmartBuilder { ctx })
    }
}

impl WalmartBuilder<'_> {
    fn item_id(path: &str) -> Option<&str> {
        path.starts_with("/ip/").then(|| trailing_id(path)).flatten()
    }

    fn browser_link(&self, destination: &Destination) -> String {
        let partner = self.ctx.partner_value("wmlspartner", "button");
        destination.render_with(
            "https://www.walmart.com",
            destination.path(),
            &protected_query(destination, [("wmlspartner", partner)]),
        )
    }
}

impl LinkBuilder for WalmartBuilder<'_> {
    fn context(&self) -> &BuilderContext<'_> {
        &self.ctx
    }

    fn app_action(
        &self,
        destination: &Destination,
        platform: Platform,
        token: Option<&str>,
    ) -> Action {
        let app = Self::item_id(destination.path()).and_then(|id| match platform {
            Platform::Ios => Some(format!("walmart://ip/{id}")),
            Platform::Android => Some(format!("walmart://ip?id={id}")),
            Platform::Web | Platform::Browser => None,
        });
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
// Etsy
// ═══════════════════════════════════════════════════════════════════════════════

pub struct EtsyBuilder<'a> {
    ctx: BuilderContext<'a>,
}

impl IntoLinkBuilder for EtsyBuilder<'static> {
    fn into_builder<'a>(ctx: BuilderContext<'a>) -> Box<dyn LinkBuilder + 'a> {
        Box::new(EtsyBuilder { ctx })
    }
}

impl EtsyBuilder<'_> {
    /// `listing/<id>` or `shop/<name>`.
    fn app_route(path: &str) -> Option<String> {
        let mut segments = path.trim_start_matches('/').split('/');
        match (segments.next()?, segments.next()?) {
            ("listing", id) if !id.is_empty() => Some(format!("listing/{id}")),
            ("shop", name) if !name.is_empty() => Some(format!("shop/{name}")),
            _ => None,
        }
    }
}

impl LinkBuilder for EtsyBuilder<'_> {
    fn context(&self) -> &BuilderContext<'_> {
        &self.ctx
    }

    fn app_action(
        &self,
        destination: &Destination,
        platform: Platform,
        token: Option<&str>,
    ) -> Action {
        let app = Self::app_route(destination.path())
            .filter(|_| platform.is_app())
            .map(|route| destination.render_with("etsy://", &route, &destination.query));
        let browser = destination.render("https://www.etsy.com");
        self.ctx.action(app.as_deref(), Some(&browser), token)
    }

    fn web_action(
        &self,
        destination: &Destination,
        _platform: Platform,
        token: Option<&str>,
    ) -> Action {
        self.ctx
            .action(None, Some(&destination.render("https://www.etsy.com")), token)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Macy's
// ═══════════════════════════════════════════════════════════════════════════════

/// The app opens products by the `ID` query parameter only.
pub struct MacysBuilder<'a> {
    ctx: BuilderContext<'a>,
}

impl IntoLinkBuilder for MacysBuilder<'static> {
    fn into_builder<'a>(ctx: BuilderContext<'a>) -> Box<dyn LinkBuilder + 'a> {
        Box::new(MacysBuilder { ctx })
    }
}

impl LinkBuilder for MacysBuilder<'_> {
    fn context(&self) -> &BuilderContext<'_> {
        &self.ctx
    }

    fn app_action(
        &self,
        destination: &Destination,
        platform: Platform,
        token: Option<&str>,
    ) -> Action {
        let app = destination
            .param("ID")
            .filter(|_| platform.is_app() && destination.path().starts_with("/shop/product/"))
            .map(|id| {
                let id: String = form_urlencoded::byte_serialize(id.as_bytes()).collect();
                format!("macys://product?ID={id}")
            });
        let browser = destination.render("https://www.macys.com");
        self.ctx.action(app.as_deref(), Some(&browser), token)
    }

    fn web_action(
        &self,
        destination: &Destination,
        _platform: Platform,
        token: Option<&str>,
    ) -> Action {
        self.ctx
            .action(None, Some(&destination.render("https://www.macys.com")), token)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Wish
// ═══════════════════════════════════════════════════════════════════════════════

/// Shared links wrap the real URL base64-encoded in `d`.
pub struct WishBuilder<'a> {
    ctx: BuilderContext<'a>,
}

impl IntoLinkBuilder for WishBuilder<'static> {
    fn into_builder<'a>(ctx: BuilderContext<'a>) -> Box<dyn LinkBuilder + 'a> {
        Box::new(WishBuilder { ctx })
    }
}

impl WishBuilder<'_> {
    fn decode_referrer(encoded: &str) -> Option<String> {
        let encoded = encoded.trim();
        let bytes = STANDARD
            .decode(encoded)
            .or_else(|_| URL_SAFE_NO_PAD.decode(encoded.trim_end_matches('=')))
            .ok()?;
        String::from_utf8(bytes).ok().filter(|s| !s.trim().is_empty())
    }
}

impl LinkBuilder for WishBuilder<'_> {
    fn context(&self) -> &BuilderContext<'_> {
        &self.ctx
    }

    fn destination_from_url(&self, url: &str) -> Destination {
        let parts = UrlParts::parse(url);
        let inner = parts.query.get("d").and_then(|d| Self::decode_referrer(d));
        match inner {
            Some(inner) => {
                tracing::trace!(inner = %inner, "unwrapped wish referrer");
                Destination::from_url(&inner)
            }
            None => Destination::from_parts(parts),
        }
    }

    fn app_action(
        &self,
        destination: &Destination,
        platform: Platform,
        token: Option<&str>,
    ) -> Action {
        let app = destination
            .path()
            .strip_prefix("/product/")
            .filter(|id| !id.is_empty() && platform.is_app())
            .map(|id| {
                destination.render_with("wish://", &format!("product/{id}"), &destination.query)
            });
        let browser = destination.render("https://www.wish.com");
        self.ctx.action(app.as_deref(), Some(&browser), token)
    }

    fn web_action(
        &self,
        destination: &Destination,
        _platform: Platform,
        token: Option<&str>,
    ) -> Action {
        self.ctx
            .action(None, Some(&destination.render("https://www.wish.com")), token)
    }
}
