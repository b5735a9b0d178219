//! Multi-region merchants: one strategy, several country hosts.
//!
//! The region is derived from the destination host in `destination_from_url`
//! and carried on [`Destination::region`]. It selects the web host, the
//! `bttn.io` subdomain and the region's affiliate identifiers.

use super::protected_query;
use crate::{
    normalize_hostname, Action, BuilderContext, Destination, IntoLinkBuilder, LinkBuilder,
    Platform, UrlParts,
};

struct Region {
    code: &'static str,
    host: &'static str,
    subdomain: &'static str,
}

/// The region whose host is `hostname` or a parent of it, else the first.
fn region_by_host<'r>(regions: &'r [Region], hostname: Option<&str>) -> &'r Region {
    let host = hostname.map(normalize_hostname).unwrap_or_default();
    regions
        .iter()
        .find(|r| host == r.host || host.ends_with(&format!(".{}", r.host)))
        .unwrap_or(&regions[0])
}

fn region_by_code<'r>(regions: &'r [Region], code: Option<&str>) -> &'r Region {
    regions
        .iter()
        .find(|r| Some(r.code) == code)
        .unwrap_or(&regions[0])
}

fn regional_destination(regions: &[Region], url: &str) -> Destination {
    let parts = UrlParts::parse(url);
    let region = region_by_host(regions, parts.hostname.as_deref()).code;
    let destination = Destination::from_parts(parts);
    if destination.is_empty() {
        return destination;
    }
    Destination {
        region: Some(region.to_owned()),
        ..destination
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Amazon
// ═══════════════════════════════════════════════════════════════════════════════

const AMAZON_REGIONS: &[Region] = &[
    Region {
        code: "us",
        host: "amazon.com",
        subdomain: "amazon",
    },
    Region {
        code: "uk",
        host: "amazon.co.uk",
        subdomain: "amazon-uk",
    },
    Region {
        code: "de",
        host: "amazon.de",
        subdomain: "amazon-de",
    },
    Region {
        code: "ca",
        host: "amazon.ca",
        subdomain: "amazon-ca",
    },
    Region {
        code: "jp",
        host: "amazon.co.jp",
        subdomain: "amazon-jp",
    },
];

const AMAZON_APP_SCHEME: &str = "com.amazon.mobile.shopping.web://";

/// Amazon across its country stores.
///
/// The associate `tag` is a partner value named `associate_tag_<region>`
/// and is forced onto both links.
pub struct AmazonBuilder<'a> {
    ctx: BuilderContext<'a>,
}

impl IntoLinkBuilder for AmazonBuilder<'static> {
    fn into_builder<'a>(ctx: BuilderContext<'a>) -> Box<dyn LinkBuilder + 'a> {
        Box::new(AmazonBuilder { ctx })
    }
}

impl AmazonBuilder<'_> {
    fn region(destination: &Destination) -> &'static Region {
        region_by_code(AMAZON_REGIONS, destination.region.as_deref())
    }

    fn tag(&self, region: &Region) -> String {
        self.ctx
            .partner_value(&format!("associate_tag_{}", region.code), "")
    }

    fn supports_app(path: &str) -> bool {
        path.contains("/dp/") || path.starts_with("/gp/product/") || path.starts_with("/s")
    }

    fn links(&self, destination: &Destination) -> (String, String) {
        let region = Self::region(destination);
        let tag = self.tag(region);
        let query = if tag.is_empty() {
            destination.query.clone()
        } else {
            protected_query(destination, [("tag", tag)])
        };
        let host = format!("www.{}", region.host);
        let path = destination.path();
        (
            destination.render_with(&format!("{AMAZON_APP_SCHEME}{host}"), path, &query),
            destination.render_with(&format!("https://{host}"), path, &query),
        )
    }
}

impl LinkBuilder for AmazonBuilder<'_> {
    fn context(&self) -> &BuilderContext<'_> {
        &self.ctx
    }

    fn destination_from_url(&self, url: &str) -> Destination {
        regional_destination(AMAZON_REGIONS, url)
    }

    fn app_action(
        &self,
        destination: &Destination,
        platform: Platform,
        token: Option<&str>,
    ) -> Action {
        let (app, browser) = self.links(destination);
        let app = (platform.is_app() && Self::supports_app(destination.path())).then_some(app);
        self.ctx.action(app.as_deref(), Some(&browser), token)
    }

    fn web_action(
        &self,
        destination: &Destination,
        _platform: Platform,
        token: Option<&str>,
    ) -> Action {
        let (_, browser) = self.links(destination);
        self.ctx.action(None, Some(&browser), token)
    }

    fn partner_subdomain(&self, destination: &Destination) -> Option<String> {
        Some(Self::region(destination).subdomain.to_owned())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// eBay
// ═══════════════════════════════════════════════════════════════════════════════

const EBAY_REGIONS: &[Region] = &[
    Region {
        code: "us",
        host: "ebay.com",
        subdomain: "ebay",
    },
    Region {
        code: "uk",
        host: "ebay.co.uk",
        subdomain: "ebay-uk",
    },
    Region {
        code: "de",
        host: "ebay.de",
        subdomain: "ebay-de",
    },
];

const EBAY_DEFAULT_CAMPAIGN: &str = "5338380000";

fn ebay_rotation(region: &Region) -> &'static str {
    match region.code {
        "uk" => "710-53481-19255-0",
        "de" => "707-53477-19255-0",
        _ => "711-53200-19255-0",
    }
}

/// eBay Partner Network tracking on every link; app links only for items.
pub struct EbayBuilder<'a> {
    ctx: BuilderContext<'a>,
}

impl IntoLinkBuilder for EbayBuilder<'static> {
    fn into_builder<'a>(ctx: BuilderContext<'a>) -> Box<dyn LinkBuilder + 'a> {
        Box::new(EbayBuilder { ctx })
    }
}

impl EbayBuilder<'_> {
    fn region(destination: &Destination) -> &'static Region {
        region_by_code(EBAY_REGIONS, destination.region.as_deref())
    }

    fn tracking(&self, region: &Region) -> [(&'static str, String); 5] {
        [
            ("campid", self.ctx.partner_value("campaign_id", EBAY_DEFAULT_CAMPAIGN)),
            ("mkcid", "1".to_owned()),
            ("mkevt", "1".to_owned()),
            ("mkrid", ebay_rotation(region).to_owned()),
            ("toolid", "10001".to_owned()),
        ]
    }

    /// `/itm/<id>` or `/itm/<title>/<id>`.
    fn item_id(path: &str) -> Option<&str> {
        let mut segments = path.split('/').skip_while(|s| *s != "itm").skip(1);
        let first = segments.next()?;
        let id = segments.next().unwrap_or(first);
        (!id.is_empty() && id.bytes().all(|b| b.is_ascii_digit())).then_some(id)
    }

    fn browser_link(&self, destination: &Destination) -> String {
        let region = Self::region(destination);
        destination.render_with(
            &format!("https://www.{}", region.host),
            destination.path(),
            &protected_query(destination, self.tracking(region)),
        )
    }
}

impl LinkBuilder for EbayBuilder<'_> {
    fn context(&self) -> &BuilderContext<'_> {
        &self.ctx
    }

    fn destination_from_url(&self, url: &str) -> Destination {
        regional_destination(EBAY_REGIONS, url)
    }

    fn app_action(
        &self,
        destination: &Destination,
        platform: Platform,
        token: Option<&str>,
    ) -> Action {
        let region = Self::region(destination);
        let app = Self::item_id(destination.path())
            .filter(|_| platform.is_app())
            .map(|id| {
                let mut query: std::collections::BTreeMap<String, String> = self
                    .tracking(region)
                    .into_iter()
                    .map(|(k, v)| (k.to_owned(), v))
                    .collect();
                query.insert("itm".to_owned(), id.to_owned());
                Destination::empty().render_with("ebay://launch", "", &query)
            });
        let browser = self.browser_link(destination);
        self.ctx.action(app.as_deref(), Some(&browser), token)
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

    fn partner_subdomain(&self, destination: &Destination) -> Option<String> {
        Some(Self::region(destination).subdomain.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::merchants::ids;
    use crate::{Approval, Config, PartnerParameter, PartnerValue};

    fn config() -> Config {
        Config::builder()
            .approval(Approval::approved("org-pub", ids::AMAZON))
            .approval(Approval::approved("org-pub", ids::EBAY))
            .partner_parameter(PartnerParameter {
                id: "pp-amazon-us".into(),
                organization: ids::AMAZON.into(),
                name: "associate_tag_us".into(),
                default_value: "button-20".into(),
            })
            .partner_parameter(PartnerParameter {
                id: "pp-amazon-uk".into(),
                organization: ids::AMAZON.into(),
                name: "associate_tag_uk".into(),
                default_value: "buttonuk-21".into(),
            })
            .partner_value(PartnerValue {
                partner_parameter: "pp-amazon-us".into(),
                audience: "org-pub".into(),
                value: "pubtag-20".into(),
            })
            .build()
            .unwrap()
    }

    #[test]
    fn amazon_region_from_host() {
        let config = config();
        let builder = config.create_mapped_builder("org-pub", ids::AMAZON).unwrap();
        let uk = builder.destination_from_url("https://www.amazon.co.uk/dp/B01");
        assert_eq!(uk.region.as_deref(), Some("uk"));
        let smile = builder.destination_from_url("https://smile.amazon.com/dp/B01");
        assert_eq!(smile.region.as_deref(), Some("us"));
        assert_eq!(builder.destination_from_url(""), Destination::empty());
    }

    #[test]
    fn amazon_forces_publisher_tag() {
        let config = config();
        let builder = config.create_mapped_builder("org-pub", ids::AMAZON).unwrap();
        let action = builder.app_action_from_url(
            "https://amazon.com/Widget/dp/B01?tag=someone-else",
            Platform::Ios,
            Some("t"),
        );
        assert_eq!(
            action.app_link.as_deref(),
            Some("com.amazon.mobile.shopping.web://www.amazon.com/Widget/dp/B01?tag=pubtag-20&btn_ref=t")
        );
        assert_eq!(
            action.browser_link.as_deref(),
            Some("https://www.amazon.com/Widget/dp/B01?tag=pubtag-20&btn_ref=t")
        );
    }

    #[test]
    fn amazon_uk_uses_default_tag_and_subdomain() {
        let config = config();
        let builder = config.create_mapped_builder("org-pub", ids::AMAZON).unwrap();
        let d = builder.destination_from_url("https://www.amazon.co.uk/help");
        let action = builder.app_action(&d, Platform::Android, Some("t"));
        assert_eq!(action.app_link, None);
        assert_eq!(
            action.browser_link.as_deref(),
            Some("https://www.amazon.co.uk/help?tag=buttonuk-21&btn_ref=t")
        );
        assert_eq!(
            builder.universal_link(&d, Some("t")).as_deref(),
            Some("https://amazon-uk.bttn.io/help?btn_ref=t")
        );
    }

    #[test]
    fn ebay_item_links() {
        let config = config();
        let builder = config.create_mapped_builder("org-pub", ids::EBAY).unwrap();
        let action = builder.app_action_from_url(
            "https://www.ebay.com/itm/Red-Shoes/1234567",
            Platform::Ios,
            Some("t"),
        );
        assert_eq!(
            action.app_link.as_deref(),
            Some("ebay://launch?campid=5338380000&itm=1234567&mkcid=1&mkevt=1&mkrid=711-53200-19255-0&toolid=10001&btn_ref=t")
        );
        assert!(action
            .browser_link
            .as_deref()
            .unwrap()
            .starts_with("https://www.ebay.com/itm/Red-Shoes/1234567?campid=5338380000&"));
    }

    #[test]
    fn ebay_non_item_has_no_app_link() {
        let config = config();
        let builder = config.create_mapped_builder("org-pub", ids::EBAY).unwrap();
        let action =
            builder.app_action_from_url("https://www.ebay.de/b/Shoes", Platform::Ios, None);
        assert_eq!(action.app_link, None);
        assert!(action
            .browser_link
            .unwrap()
            .contains("mkrid=707-53477-19255-0"));
    }

    #[test]
    fn item_id_parsing() {
        assert_eq!(EbayBuilder::item_id("/itm/123"), Some("123"));
        assert_eq!(EbayBuilder::item_id("/itm/title/456"), Some("456"));
        assert_eq!(EbayBuilder::item_id("/itm/"), None);
        assert_eq!(EbayBuilder::item_id("/b/Shoes"), None);
    }
}
