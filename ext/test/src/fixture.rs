//! Conformance fixture runner
//!
//! Loads YAML fixtures and runs their URL cases against a [`Config`] built
//! from the fixture's embedded [`ModuleConfig`].
//!
//! Every expectation in a case is optional; only the ones present are checked.
//! For nullable results (`destination_url`, `merchant`, link fields) an explicit
//! `~` expects "none" while an absent key skips the check.

use linkwise::prelude::*;
use serde::{Deserialize, Deserializer};

/// A complete test fixture
#[derive(Debug, Deserialize)]
pub struct Fixture {
    pub name: String,
    pub description: String,
    pub config: ModuleConfig,
    pub cases: Vec<TestCase>,
}

/// One URL and what the engine should say about it
#[derive(Debug, Deserialize)]
pub struct TestCase {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub expect: Expectations,
}

#[derive(Debug, Default, Deserialize)]
pub struct Expectations {
    /// Result of [`Config::destination_url`].
    #[serde(default, deserialize_with = "present")]
    pub destination_url: Option<Option<String>>,
    /// `organization_id` of [`Config::supported_merchant_by_url`].
    #[serde(default, deserialize_with = "present")]
    pub merchant: Option<Option<String>>,
    #[serde(default)]
    pub should_redirect: Option<bool>,
    #[serde(default)]
    pub cache_key: Option<String>,
    #[serde(default)]
    pub links: Option<LinksExpectation>,
}

/// Expectations for [`Config::links_for_url`].
#[derive(Debug, Deserialize)]
pub struct LinksExpectation {
    pub publisher: String,
    pub platform: Platform,
    #[serde(default)]
    pub token: Option<String>,
    /// Expect `Ok(None)`.
    #[serde(default)]
    pub unsupported: bool,
    /// Expect an error whose message contains this text.
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub app_link: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub browser_link: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub universal_link: Option<Option<String>>,
}

/// Distinguishes an explicit `~` (`Some(None)`) from an absent key (`None`).
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Runner
// ═══════════════════════════════════════════════════════════════════════════════

/// A single failed check within a case
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub check: &'static str,
    pub expected: String,
    pub actual: String,
}

/// Result of running a single test case
#[derive(Debug)]
pub struct CaseResult {
    pub case_name: String,
    pub passed: bool,
    pub mismatches: Vec<Mismatch>,
}

#[derive(Default)]
struct Checks {
    mismatches: Vec<Mismatch>,
}

impl Checks {
    fn eq<T: std::fmt::Debug + PartialEq>(
        &mut self,
        check: &'static str,
        expected: Option<&T>,
        actual: &T,
    ) {
        if let Some(expected) = expected {
            if expected != actual {
                self.mismatches.push(Mismatch {
                    check,
                    expected: format!("{expected:?}"),
                    actual: format!("{actual:?}"),
                });
            }
        }
    }

    fn fail(
        &mut self,
        check: &'static str,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) {
        self.mismatches.push(Mismatch {
            check,
            expected: expected.into(),
            actual: actual.into(),
        });
    }
}

impl Fixture {
    /// Parse a fixture from YAML
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(yaml)
    }

    /// Parse multiple fixtures from a YAML file with `---` separators
    pub fn from_yaml_multi(yaml: &str) -> Result<Vec<Self>, serde_yaml::Error> {
        let mut fixtures = Vec::new();
        for doc in serde_yaml::Deserializer::from_str(yaml) {
            fixtures.push(Self::deserialize(doc)?);
        }
        Ok(fixtures)
    }

    /// Build the config and run all test cases.
    ///
    /// # Errors
    ///
    /// Returns the [`ConfigError`] if the embedded config does not load.
    pub fn run(&self) -> Result<Vec<CaseResult>, ConfigError> {
        let config = Config::from_module_config(self.config.clone())?;
        Ok(self.cases.iter().map(|case| case.run(&config)).collect())
    }

    /// Run all test cases and panic on the first failure
    pub fn run_and_assert(&self) {
        let results = self
            .run()
            .unwrap_or_else(|e| panic!("Fixture '{}' config failed to load: {e}", self.name));
        for result in results {
            assert!(
                result.passed,
                "Fixture '{}' case '{}' failed: {:#?}",
                self.name, result.case_name, result.mismatches
            );
        }
    }
}

impl TestCase {
    fn run(&self, config: &Config) -> CaseResult {
        let mut checks = Checks::default();
        let expect = &self.expect;

        checks.eq(
            "destination_url",
            expect.destination_url.as_ref(),
            &config.destination_url(&self.url),
        );
        checks.eq(
            "merchant",
            expect.merchant.as_ref(),
            &config
                .supported_merchant_by_url(&self.url)
                .map(|m| m.organization_id.clone()),
        );
        checks.eq(
            "should_redirect",
            expect.should_redirect.as_ref(),
            &config.should_redirect_by_url(&self.url),
        );
        checks.eq(
            "cache_key",
            expect.cache_key.as_ref(),
            &config.redirect_cache_key(&self.url),
        );
        if let Some(links) = &expect.links {
            links.check(config, &self.url, &mut checks);
        }

        CaseResult {
            case_name: self.name.clone(),
            passed: checks.mismatches.is_empty(),
            mismatches: checks.mismatches,
        }
    }
}

impl LinksExpectation {
    fn check(&self, config: &Config, url: &str, checks: &mut Checks) {
        let result =
            config.links_for_url(&self.publisher, url, self.platform, self.token.as_deref());
        match (result, &self.error) {
            (Err(e), Some(needle)) => {
                if !e.to_string().contains(needle.as_str()) {
                    checks.fail("links.error", needle.clone(), e.to_string());
                }
            }
            (Err(e), None) => checks.fail("links", "links", format!("error: {e}")),
            (Ok(links), Some(needle)) => {
                checks.fail("links.error", needle.clone(), format!("{links:?}"));
            }
            (Ok(None), None) => {
                if !self.unsupported {
                    checks.fail("links", "links", "unsupported");
                }
            }
            (Ok(Some(links)), None) => {
                if self.unsupported {
                    checks.fail("links", "unsupported", format!("{links:?}"));
                }
                checks.eq("links.app_link", self.app_link.as_ref(), &links.app_action.app_link);
                checks.eq(
                    "links.browser_link",
                    self.browser_link.as_ref(),
                    &links.app_action.browser_link,
                );
                checks.eq(
                    "links.universal_link",
                    self.universal_link.as_ref(),
                    &links.universal_link,
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FIXTURE: &str = r#"
name: smoke
description: one merchant, one bttn.io subdomain
config:
  supported_merchants:
    - hostname: shop.example
      organization_id: org-shop
  web_to_app_mappings:
    - organization: org-shop
      subdomain_name: shop
      external_host: http://shop.example
cases:
  - name: subdomain unwinds
    url: https://shop.bttn.io/p/1
    expect:
      destination_url: http://shop.example/p/1
      merchant: org-shop
  - name: blank url
    url: ""
    expect:
      destination_url: ~
      merchant: ~
"#;

    #[test]
    fn explicit_null_differs_from_absent() {
        let fixture = Fixture::from_yaml(FIXTURE).unwrap();
        assert_eq!(fixture.cases[1].expect.destination_url, Some(None));
        assert_eq!(fixture.cases[1].expect.should_redirect, None);
        assert!(fixture.cases[0].expect.links.is_none());
    }

    #[test]
    fn smoke_fixture_passes() {
        Fixture::from_yaml(FIXTURE).unwrap().run_and_assert();
    }

    #[test]
    fn mismatch_is_reported() {
        let mut fixture = Fixture::from_yaml(FIXTURE).unwrap();
        fixture.cases[0].expect.merchant = Some(Some("org-other".into()));
        let results = fixture.run().unwrap();
        assert!(!results[0].passed);
        assert_eq!(results[0].mismatches[0].check, "merchant");
        assert!(results[1].passed);
    }

    #[test]
    fn multi_document_files() {
        let yaml = format!("{FIXTURE}\n---\n{FIXTURE}");
        assert_eq!(Fixture::from_yaml_multi(&yaml).unwrap().len(), 2);
    }
}
