//! Postmates. The merchant does not accept platform affiliation in-app, so
//! app links carry the token as `btn_tkn`.

use crate::{
    Action, Affiliation, BuilderContext, Destination, IntoLinkBuilder, LinkBuilder, Platform,
};

pub struct PostmatesBuilder<'a> {
    ctx: BuilderContext<'a>,
}

impl IntoLinkBuilder for PostmatesBuilder<'static> {
    fn into_builder<'a>(ctx: BuilderContext<'a>) -> Box<dyn LinkBuilder + 'a> {
        Box::new(PostmatesBuilder {
            ctx: ctx.with_affiliation(Affiliation::WEB_ONLY),
        })
    }
}

impl LinkBuilder for PostmatesBuilder<'_> {
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
        let app = path
            .strip_prefix("/merchant/")
            .filter(|slug| !slug.is_empty() && platform.is_app())
            .map(|slug| {
                let path = format!("merchant/{slug}");
                destination.render_with("postmates://", &path, &destination.query)
            });
        let browser = destination.render("https://postmates.com");
        self.ctx.action(app.as_deref(), Some(&browser), token)
    }

    fn web_action(
        &self,
        destination: &Destination,
        _platform: Platform,
        token: Option<&str>,
    ) -> Action {
        self.ctx
            .action(None, Some(&destination.render("https://postmates.com")), token)
    }
}
