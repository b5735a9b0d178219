//! Ride hailing. Destinations are query-only (pickup/dropoff coordinates), so
//! path is ignored and the query is forwarded into the app's own format.

use std::collections::BTreeMap;

use super::protected_query;
use crate::{
    Action, Affiliation, BuilderContext, Destination, IntoLinkBuilder, LinkBuilder, Platform,
};

/// Protected `client_id` pair, empty when the publisher has none configured.
fn client_id(ctx: &BuilderContext<'_>, key: &'static str) -> Vec<(&'static str, String)> {
    let id = ctx.partner_value("client_id", "");
    if id.is_empty() {
        Vec::new()
    } else {
        vec![(key, id)]
    }
}

fn with_default(
    mut query: BTreeMap<String, String>,
    key: &str,
    value: &str,
) -> BTreeMap<String, String> {
    query
        .entry(key.to_owned())
        .or_insert_with(|| value.to_owned());
    query
}

// ═══════════════════════════════════════════════════════════════════════════════
// Uber
// ═══════════════════════════════════════════════════════════════════════════════

/// Uber accepts platform affiliation in-app only; web links carry `btn_tkn`.
pub struct UberBuilder<'a> {
    ctx: BuilderContext<'a>,
}

impl IntoLinkBuilder for UberBuilder<'static> {
    fn into_builder<'a>(ctx: BuilderContext<'a>) -> Box<dyn LinkBuilder + 'a> {
        Box::new(UberBuilder {
            ctx: ctx.with_affiliation(Affiliation::APP_ONLY),
        })
    }
}

impl UberBuilder<'_> {
    fn query(&self, destination: &Destination) -> BTreeMap<String, String> {
        with_default(
            protected_query(destination, client_id(&self.ctx, "client_id")),
            "action",
            "setPickup",
        )
    }

    fn browser_link(&self, destination: &Destination) -> String {
        destination.render_with("https://m.uber.com", "/ul/", &self.query(destination))
    }
}

impl LinkBuilder for UberBuilder<'_> {
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
            .then(|| destination.render_with("uber://", "", &self.query(destination)));
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
// Lyft
// ═══════════════════════════════════════════════════════════════════════════════

pub struct LyftBuilder<'a> {
    ctx: BuilderContext<'a>,
}

impl IntoLinkBuilder for LyftBuilder<'static> {
    fn into_builder<'a>(ctx: BuilderContext<'a>) -> Box<dyn LinkBuilder + 'a> {
        Box::new(LyftBuilder { ctx })
    }
}

impl LyftBuilder<'_> {
    fn query(&self, destination: &Destination) -> BTreeMap<String, String> {
        with_default(
            protected_query(destination, client_id(&self.ctx, "partner")),
            "id",
            "lyft",
        )
    }
}

impl LinkBuilder for LyftBuilder<'_> {
    fn context(&self) -> &BuilderContext<'_> {
        &self.ctx
    }

    fn app_action(
        &self,
        destination: &Destination,
        platform: Platform,
        token: Option<&str>,
    ) -> Action {
        let query = self.query(destination);
        let app = platform
            .is_app()
            .then(|| destination.render_with("lyft://", "ridetype", &query));
        let browser = destination.render_with("https://ride.lyft.com", "/ridetype", &query);
        self.ctx.action(app.as_deref(), Some(&browser), token)
    }

    fn web_action(
        &self,
        destination: &Destination,
        _platform: Platform,
        token: Option<&str>,
    ) -> Action {
        let browser =
            destination.render_with("https://ride.lyft.com", "/ridetype", &self.query(destination));
        self.ctx.action(None, Some(&browser), token)
    }
}
