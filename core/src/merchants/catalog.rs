//! Template merchants, one [`AppTemplate`] row each.

use super::ids;
use super::template::AppTemplate;
use crate::Affiliation;

/// `(merchant id, template)` for every template merchant.
pub static TEMPLATES: &[(&str, AppTemplate)] = &[
    // ── Retail ───────────────────────────────────────────────────────────────
    (ids::JET, AppTemplate {
        scheme: "jet://",
        web_host: "jet.com",
        app_paths: &[],
        protected: &[],
        affiliation: Affiliation::FULL,
    }),
    (ids::BOXED, AppTemplate {
        scheme: "boxed://",
        web_host: "www.boxed.com",
        app_paths: &["/product/", "/products/"],
        protected: &[],
        affiliation: Affiliation::FULL,
    }),
    (ids::NEWEGG, AppTemplate {
        scheme: "neweggapp://",
        web_host: "www.newegg.com",
        app_paths: &["/p/", "/Product/"],
        protected: &[],
        affiliation: Affiliation::FULL,
    }),
    (ids::NORDSTROM, AppTemplate {
        scheme: "nordstrom://",
        web_host: "shop.nordstrom.com",
        app_paths: &["/s/", "/c/", "/sr"],
        protected: &[("campaign", "button")],
        affiliation: Affiliation::FULL,
    }),
    (ids::ULTA, AppTemplate {
        scheme: "ulta://",
        web_host: "www.ulta.com",
        app_paths: &[],
        protected: &[],
        affiliation: Affiliation::APP_ONLY,
    }),
    (ids::WAYFAIR, AppTemplate {
        scheme: "wayfair://",
        web_host: "www.wayfair.com",
        app_paths: &["/pdp/", "/sb"],
        protected: &[("refid", "BUTTON")],
        affiliation: Affiliation::FULL,
    }),
    (ids::OVERSTOCK, AppTemplate {
        scheme: "overstock://",
        web_host: "www.overstock.com",
        app_paths: &[],
        protected: &[],
        affiliation: Affiliation::FULL,
    }),
    (ids::HOME_DEPOT, AppTemplate {
        scheme: "homedepot://",
        web_host: "www.homedepot.com",
        app_paths: &["/p/", "/b/", "/s/"],
        protected: &[],
        affiliation: Affiliation::FULL,
    }),
    (ids::LOWES, AppTemplate {
        scheme: "lowes://",
        web_host: "www.lowes.com",
        app_paths: &["/pd/", "/pl/"],
        protected: &[],
        affiliation: Affiliation::FULL,
    }),
    (ids::BEST_BUY, AppTemplate {
        scheme: "bestbuy://",
        web_host: "www.bestbuy.com",
        app_paths: &["/site/"],
        protected: &[("irclickid", "button")],
        affiliation: Affiliation::FULL,
    }),
    (ids::KOHLS, AppTemplate {
        scheme: "kohls://",
        web_host: "www.kohls.com",
        app_paths: &["/product/", "/catalog/"],
        protected: &[],
        affiliation: Affiliation::FULL,
    }),
    (ids::JCPENNEY, AppTemplate {
        scheme: "jcpenney://",
        web_host: "www.jcpenney.com",
        app_paths: &["/p/", "/g/"],
        protected: &[],
        affiliation: Affiliation::WEB_ONLY,
    }),
    (ids::GAP, AppTemplate {
        scheme: "gap://",
        web_host: "www.gap.com",
        app_paths: &["/browse/"],
        protected: &[],
        affiliation: Affiliation::FULL,
    }),
    (ids::OLD_NAVY, AppTemplate {
        scheme: "oldnavy://",
        web_host: "oldnavy.gap.com",
        app_paths: &["/browse/"],
        protected: &[],
        affiliation: Affiliation::FULL,
    }),
    (ids::ZAPPOS, AppTemplate {
        scheme: "zappos://",
        web_host: "www.zappos.com",
        app_paths: &["/p/", "/product/"],
        protected: &[],
        affiliation: Affiliation::FULL,
    }),
    (ids::ASOS, AppTemplate {
        scheme: "asos://",
        web_host: "www.asos.com",
        app_paths: &[],
        protected: &[("affid", "23529")],
        affiliation: Affiliation::FULL,
    }),
    (ids::POSHMARK, AppTemplate {
        scheme: "poshmark://",
        web_host: "poshmark.com",
        app_paths: &["/listing/", "/closet/"],
        protected: &[],
        affiliation: Affiliation::FULL,
    }),
    (ids::MERCARI, AppTemplate {
        scheme: "mercari://",
        web_host: "www.mercari.com",
        app_paths: &["/us/item/"],
        protected: &[],
        affiliation: Affiliation::FULL,
    }),
    (ids::CHEWY, AppTemplate {
        scheme: "chewy://",
        web_host: "www.chewy.com",
        app_paths: &["/dp/"],
        protected: &[],
        affiliation: Affiliation::FULL,
    }),
    (ids::PETCO, AppTemplate {
        scheme: "petco://",
        web_host: "www.petco.com",
        app_paths: &["/shop/"],
        protected: &[],
        affiliation: Affiliation::FULL,
    }),
    (ids::SAMS_CLUB, AppTemplate {
        scheme: "samsclub://",
        web_host: "www.samsclub.com",
        app_paths: &["/p/", "/ip/"],
        protected: &[],
        affiliation: Affiliation::FULL,
    }),
    (ids::SEPHORA, AppTemplate {
        scheme: "sephora://",
        web_host: "www.sephora.com",
        app_paths: &["/product/", "/brand/"],
        protected: &[],
        affiliation: Affiliation::FULL,
    }),
    (ids::GROUPON, AppTemplate {
        scheme: "groupon://",
        web_host: "www.groupon.com",
        app_paths: &["/deals/"],
        protected: &[("utm_medium", "afl")],
        affiliation: Affiliation::FULL,
    }),
    // ── Tickets and events ───────────────────────────────────────────────────
    (ids::STUBHUB, AppTemplate {
        scheme: "stubhub://",
        web_host: "www.stubhub.com",
        app_paths: &["/event/", "/performer/"],
        protected: &[("gcid", "C12289x486")],
        affiliation: Affiliation::FULL,
    }),
    (ids::SEATGEEK, AppTemplate {
        scheme: "seatgeek://",
        web_host: "seatgeek.com",
        app_paths: &["/e/", "/venues/"],
        protected: &[],
        affiliation: Affiliation::FULL,
    }),
    (ids::FANDANGO, AppTemplate {
        scheme: "fandango://",
        web_host: "www.fandango.com",
        app_paths: &[],
        protected: &[],
        affiliation: Affiliation::FULL,
    }),
    (ids::EVENTBRITE, AppTemplate {
        scheme: "eventbrite://",
        web_host: "www.eventbrite.com",
        app_paths: &["/e/"],
        protected: &[("aff", "button")],
        affiliation: Affiliation::FULL,
    }),
    // ── Food ─────────────────────────────────────────────────────────────────
    (ids::GRUBHUB, AppTemplate {
        scheme: "grubhubapp://",
        web_host: "www.grubhub.com",
        app_paths: &["/restaurant/"],
        protected: &[],
        affiliation: Affiliation::FULL,
    }),
    (ids::SEAMLESS, AppTemplate {
        scheme: "seamlessapp://",
        web_host: "www.seamless.com",
        app_paths: &["/menu/"],
        protected: &[],
        affiliation: Affiliation::FULL,
    }),
    (ids::OPENTABLE, AppTemplate {
        scheme: "reservetable-com.contextoptional.OpenTable-1://",
        web_host: "www.opentable.com",
        app_paths: &["/r/", "/restaurant/"],
        protected: &[("ref", "button")],
        affiliation: Affiliation::WEB_ONLY,
    }),
    (ids::DOORDASH, AppTemplate {
        scheme: "doordash://",
        web_host: "www.doordash.com",
        app_paths: &["/store/"],
        protected: &[],
        affiliation: Affiliation::APP_ONLY,
    }),
    (ids::INSTACART, AppTemplate {
        scheme: "instacart://",
        web_host: "www.instacart.com",
        app_paths: &["/store/"],
        protected: &[],
        affiliation: Affiliation::FULL,
    }),
    // ── Travel ───────────────────────────────────────────────────────────────
    (ids::PRICELINE, AppTemplate {
        scheme: "priceline://",
        web_host: "www.priceline.com",
        app_paths: &["/hotel-deals/", "/relax/"],
        protected: &[("refid", "PLBUTTON")],
        affiliation: Affiliation::FULL,
    }),
    (ids::KAYAK, AppTemplate {
        scheme: "kayak://",
        web_host: "www.kayak.com",
        app_paths: &["/flights/", "/hotels/", "/cars/"],
        protected: &[],
        affiliation: Affiliation::FULL,
    }),
    (ids::HOTELS_COM, AppTemplate {
        scheme: "hotelscom://",
        web_host: "www.hotels.com",
        app_paths: &["/ho"],
        protected: &[],
        affiliation: Affiliation::FULL,
    }),
    (ids::HOTWIRE, AppTemplate {
        scheme: "hotwire://",
        web_host: "www.hotwire.com",
        app_paths: &["/hotels/", "/car-rentals/"],
        protected: &[],
        affiliation: Affiliation::FULL,
    }),
];
