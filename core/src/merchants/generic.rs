//! Fallback strategy for merchants without a registered one.
//!
//! There is no app knowledge here, so it never produces an app link. The
//! browser link points back at the destination's own host, or the merchant's
//! mapped `external_host` when the destination carries none.

use crate::{
    Action, BuilderContext, Destination, IntoLinkBuilder, LinkBuilder, Platform, UrlParts,
};

pub struct GenericBuilder<'a> {
    ctx: BuilderContext<'a>,
}

impl IntoLinkBuilder for GenericBuilder<'static> {
    fn into_builder<'a>(ctx: BuilderContext<'a>) -> Box<dyn LinkBuilder + 'a> {
        Box::new(GenericBuilder { ctx })
    }
}

impl GenericBuilder<'_> {
    fn browser_link(&self, destination: &Destination) -> Option<String> {
        let origin = match destination.hostname.as_deref() {
            Some(host) => format!("https://{host}"),
            None => {
                let mapping = self.ctx.web_to_app_mapping()?;
                let parts = UrlParts::parse(&mapping.external_host);
                let host = parts.hostname.as_deref()?;
                let scheme = parts.scheme.as_deref().unwrap_or("https");
                format!("{scheme}://{host}")
            }
        };
        Some(destination.render(&origin))
    }
}

impl LinkBuilder for GenericBuilder<'_> {
    fn context(&self) -> &BuilderContext<'_> {
        &self.ctx
    }

    fn destination_from_url(&self, url: &str) -> Destination {
        let parts = UrlParts::parse(url);
        let hostname = parts.hostname.clone();
        let destination = Destination::from_parts(parts);
        if destination.is_empty() {
            return destination;
        }
        Destination {
            hostname,
            ..destination
        }
    }

    fn app_action(
        &self,
        destination: &Destination,
        _platform: Platform,
        token: Option<&str>,
    ) -> Action {
        self.ctx
            .action(None, self.browser_link(destination).as_deref(), token)
    }

    fn web_action(
        &self,
        destination: &Destination,
        _platform: Platform,
        token: Option<&str>,
    ) -> Action {
        self.ctx
            .action(None, self.browser_link(destination).as_deref(), token)
    }
}
