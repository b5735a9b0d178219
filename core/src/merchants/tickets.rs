//! Ticketmaster.
//!
//! Partner-tracked links arrive as `/tm-redirect/<real path>`; the prefix is
//! stripped before anything else looks at the path.

use super::protected_query;
use crate::{Action, BuilderContext, Destination, IntoLinkBuilder, LinkBuilder, Platform};

const TRACKING_PREFIX: &str = "/tm-redirect";
const DEFAULT_CAMEFROM: &str = "CFC_BUTTON";

pub struct TicketmasterBuilder<'a> {
    ctx: BuilderContext<'a>,
}

impl IntoLinkBuilder for TicketmasterBuilder<'static> {
    fn into_builder<'a>(ctx: BuilderContext<'a>) -> Box<dyn LinkBuilder + 'a> {
        Box::new(TicketmasterBuilder { ctx })
    }
}

impl TicketmasterBuilder<'_> {
    /// `/event/<id>` or `/<slug>/event/<id>`.
    fn event_id(path: &str) -> Option<&str> {
        let mut segments = path.split('/').skip_while(|s| *s != "event").skip(1);
        segments.next().filter(|id| !id.is_empty())
    }

    fn browser_link(&self, destination: &Destination) -> String {
        let camefrom = self.ctx.partner_value("camefrom", DEFAULT_CAMEFROM);
        destination.render_with(
            "https://www.ticketmaster.com",
            destination.path(),
            &protected_query(destination, [("camefrom", camefrom)]),
        )
    }
}

impl LinkBuilder for TicketmasterBuilder<'_> {
    fn context(&self) -> &BuilderContext<'_> {
        &self.ctx
    }

    fn destination_from_url(&self, url: &str) -> Destination {
        let mut destination = Destination::from_url(url);
        let stripped = destination
            .pathname
            .as_deref()
            .and_then(|p| p.strip_prefix(TRACKING_PREFIX))
            .filter(|rest| rest.is_empty() || rest.starts_with('/'))
            .map(|rest| if rest.is_empty() { "/".to_owned() } else { rest.to_owned() });
        if stripped.is_some() {
            destination.pathname = stripped;
        }
        destination
    }

    fn app_action(
        &self,
        destination: &Destination,
        platform: Platform,
        token: Option<&str>,
    ) -> Action {
        let app = Self::event_id(destination.path())
            .filter(|_| platform.is_app())
            .map(|id| format!("ticketmaster://event/{id}"));
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
