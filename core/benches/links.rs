//! Link-building benchmarks: builder creation and end-to-end link sets.

use linkwise::merchants::ids;
use linkwise::prelude::*;

fn main() {
    divan::main();
}

fn config() -> Config {
    Config::builder()
        .supported_merchant(SupportedMerchant::new("shop.example", "org-shop"))
        .supported_merchant(SupportedMerchant::new("jet.com", ids::JET))
        .supported_merchant(SupportedMerchant::new("www.booking.com", ids::BOOKING))
        .supported_affiliate(SupportedAffiliate::new("click.aff.example", ["u"]))
        .web_to_app_mapping(WebToAppMapping::new("org-shop", "shop", "https://shop.example"))
        .web_to_app_mapping(WebToAppMapping::new(ids::JET, "jet", "https://jet.com"))
        .approval(Approval::approved("org-pub", "org-shop"))
        .approval(Approval::approved("org-pub", ids::JET))
        .approval(Approval::approved("org-pub", ids::BOOKING))
        .on_warning(|_| {})
        .build()
        .unwrap()
}

#[divan::bench]
fn create_builder_registered(bencher: divan::Bencher) {
    let config = config();
    bencher.bench_local(|| config.create_builder("org-pub", ids::JET).is_ok());
}

#[divan::bench]
fn create_builder_unapproved(bencher: divan::Bencher) {
    let config = config();
    bencher.bench_local(|| config.create_builder("org-other", ids::JET).is_err());
}

#[divan::bench(args = [
    "https://shop.example/p?id=1",
    "https://jet.com/product/1?x=y",
    "https://www.booking.com/hotel/us/the-plaza.html",
])]
fn links_for_url_direct(bencher: divan::Bencher, url: &str) {
    let config = config();
    bencher.bench_local(|| config.links_for_url("org-pub", url, Platform::Ios, Some("srctok-1")));
}

#[divan::bench]
fn links_for_url_through_affiliate(bencher: divan::Bencher) {
    let config = config();
    bencher.bench_local(|| {
        config.links_for_url(
            "org-pub",
            "https://click.aff.example/c?u=https%3A%2F%2Fjet.com%2Fproduct%2F1",
            Platform::Android,
            Some("srctok-1"),
        )
    });
}
