//! Table-driven strategy for merchants whose app mirrors the website.

use std::collections::BTreeMap;

use crate::{Action, Affiliation, BuilderContext, Destination, LinkBuilder, Platform};

/// One merchant's link templates.
///
/// App link: `<scheme><path>[?query][#hash]`. Browser link:
/// `https://<web_host><path>[?query][#hash]`. `protected` pairs overwrite
/// whatever the destination carried under those keys, on both links.
#[derive(Debug, Clone, Copy)]
pub struct AppTemplate {
    pub scheme: &'static str,
    pub web_host: &'static str,
    /// Path prefixes the app can open. Empty means every path.
    pub app_paths: &'static [&'static str],
    pub protected: &'static [(&'static str, &'static str)],
    pub affiliation: Affiliation,
}

impl AppTemplate {
    /// Whether the app can open `path`.
    #[must_use]
    pub fn supports_app(&self, path: &str) -> bool {
        self.app_paths.is_empty() || self.app_paths.iter().any(|p| path.starts_with(p))
    }

    fn query(&self, destination: &Destination) -> BTreeMap<String, String> {
        let protected = self.protected.iter().map(|(k, v)| (*k, (*v).to_owned()));
        super::protected_query(destination, protected)
    }

    /// The deep link, `None` if the app cannot open the destination's path.
    #[must_use]
    pub fn app_link(&self, destination: &Destination) -> Option<String> {
        let path = destination.path();
        self.supports_app(path)
            .then(|| destination.render_with(self.scheme, path, &self.query(destination)))
    }

    #[must_use]
    pub fn browser_link(&self, destination: &Destination) -> String {
        destination.render_with(
            &format!("https://{}", self.web_host),
            destination.path(),
            &self.query(destination),
        )
    }
}

/// [`LinkBuilder`] over an [`AppTemplate`].
pub struct TemplateBuilder<'a> {
    ctx: BuilderContext<'a>,
    template: &'static AppTemplate,
}

impl<'a> TemplateBuilder<'a> {
    #[must_use]
    pub fn new(ctx: BuilderContext<'a>, template: &'static AppTemplate) -> Self {
        Self {
            ctx: ctx.with_affiliation(template.affiliation),
            template,
        }
    }

    /// Boxed constructor used as the registry factory.
    #[must_use]
    pub fn boxed(
        ctx: BuilderContext<'a>,
        template: &'static AppTemplate,
    ) -> Box<dyn LinkBuilder + 'a> {
        Box::new(Self::new(ctx, template))
    }
}

impl LinkBuilder for TemplateBuilder<'_> {
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
            .then(|| self.template.app_link(destination))
            .flatten();
        let browser = self.template.browser_link(destination);
        self.ctx.action(app.as_deref(), Some(&browser), token)
    }

    fn web_action(
        &self,
        destination: &Destination,
        _platform: Platform,
        token: Option<&str>,
    ) -> Action {
        let browser = self.template.browser_link(destination);
        self.ctx.action(None, Some(&browser), token)
    }
}
