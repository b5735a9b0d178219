//! Wire projections: the publisher-scoped module form and the SDK form
//!
//! [`ModuleConfig`] is the public compatibility contract other services hydrate
//! from. Field names are fixed; the two partner collections default to empty
//! so six-field payloads still deserialize.
//!
//! [`SdkConfig`] is the reduced shape shipped to client SDKs. It carries
//! hostnames and patterns only, never organization ids.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::{
    normalize_hostname, Approval, Config, ConfigError, PartnerParameter, PartnerValue,
    SupportedAffiliate, SupportedAffiliatePathnameId, SupportedAffiliateQueryId,
    SupportedMerchant, WebToAppMapping,
};

/// Serializable snapshot of a [`Config`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModuleConfig {
    #[serde(default)]
    pub supported_merchants: Vec<SupportedMerchant>,
    #[serde(default)]
    pub supported_affiliate_query_ids: Vec<SupportedAffiliateQueryId>,
    #[serde(default)]
    pub supported_affiliate_pathname_ids: Vec<SupportedAffiliatePathnameId>,
    #[serde(default)]
    pub supported_affiliates: Vec<SupportedAffiliate>,
    #[serde(default)]
    pub web_to_app_mappings: Vec<WebToAppMapping>,
    #[serde(default)]
    pub approvals: Vec<Approval>,
    #[serde(default)]
    pub partner_parameters: Vec<PartnerParameter>,
    #[serde(default)]
    pub partner_values: Vec<PartnerValue>,
}

// ═══════════════════════════════════════════════════════════════════════════════
// SDK shape
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkConfig {
    pub supported_hostnames: Vec<SdkHostname>,
    pub supported_bttnio_subdomains: Vec<SdkSubdomain>,
    pub supported_affiliates: Vec<SdkAffiliate>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkHostname {
    pub hostname: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkSubdomain {
    pub subdomain: String,
}

/// Everything the SDK needs to unwrap links on one affiliate hostname.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkAffiliate {
    pub hostname: String,
    pub query_url_keys: Vec<String>,
    pub query_ids: Vec<SdkQueryId>,
    pub pathname_ids: Vec<SdkPathnameId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkQueryId {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SdkPathnameId {
    pub regex: String,
    pub redirect: bool,
}

// ═══════════════════════════════════════════════════════════════════════════════
// Projections
// ═══════════════════════════════════════════════════════════════════════════════

impl Config {
    /// Hydrate from a module snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if any regex fails to compile.
    pub fn from_module_config(data: ModuleConfig) -> Result<Self, ConfigError> {
        Self::new(data)
    }

    /// The subset of this config `publisher_id` is allowed to see.
    ///
    /// Approvals naming the publisher as audience or organization are kept.
    /// Merchant-owned records are limited to merchants approved for the
    /// publisher; pathname entries keep only approved match rows and vanish
    /// when none remain. Affiliates are not merchant-owned and pass through.
    /// Record order is preserved.
    #[must_use]
    pub fn to_module_config(&self, publisher_id: &str) -> ModuleConfig {
        let approved = self.approvals(publisher_id);
        let data = &self.data;

        let partner_parameters: Vec<PartnerParameter> = data
            .partner_parameters
            .iter()
            .filter(|p| approved.contains(&p.organization))
            .cloned()
            .collect();
        let kept_parameters: HashSet<&str> =
            partner_parameters.iter().map(|p| p.id.as_str()).collect();
        let partner_values = data
            .partner_values
            .iter()
            .filter(|v| v.audience == publisher_id)
            .filter(|v| kept_parameters.contains(v.partner_parameter.as_str()))
            .cloned()
            .collect();

        let supported_affiliate_pathname_ids = data
            .supported_affiliate_pathname_ids
            .iter()
            .filter_map(|entry| {
                let matches: Vec<_> = entry
                    .matches
                    .iter()
                    .filter(|row| approved.contains(&row.organization_id))
                    .cloned()
                    .collect();
                (!matches.is_empty()).then(|| SupportedAffiliatePathnameId {
                    matches,
                    ..entry.clone()
                })
            })
            .collect();

        let module = ModuleConfig {
            supported_merchants: data
                .supported_merchants
                .iter()
                .filter(|m| approved.contains(&m.organization_id))
                .cloned()
                .collect(),
            supported_affiliate_query_ids: data
                .supported_affiliate_query_ids
                .iter()
                .filter(|q| approved.contains(&q.organization_id))
                .cloned()
                .collect(),
            supported_affiliate_pathname_ids,
            supported_affiliates: data.supported_affiliates.clone(),
            web_to_app_mappings: data
                .web_to_app_mappings
                .iter()
                .filter(|m| approved.contains(&m.organization))
                .cloned()
                .collect(),
            approvals: data
                .approvals
                .iter()
                .filter(|a| a.audience == publisher_id || a.organization == publisher_id)
                .cloned()
                .collect(),
            partner_parameters,
            partner_values,
        };

        tracing::debug!(
            publisher_id,
            approved_merchants = approved.len(),
            merchants = module.supported_merchants.len(),
            "module config projected"
        );
        module
    }

    /// The client-SDK projection for `publisher_id`.
    ///
    /// Hostnames and subdomains are deduplicated; affiliate data is grouped
    /// by hostname in first-seen order.
    #[must_use]
    pub fn to_sdk_config(&self, publisher_id: &str) -> SdkConfig {
        let module = self.to_module_config(publisher_id);

        let mut seen = HashSet::new();
        let supported_hostnames = module
            .supported_merchants
            .iter()
            .filter(|m| seen.insert(normalize_hostname(&m.hostname)))
            .map(|m| SdkHostname {
                hostname: m.hostname.clone(),
            })
            .collect();

        let mut seen = HashSet::new();
        let supported_bttnio_subdomains = module
            .web_to_app_mappings
            .iter()
            .filter(|m| !m.subdomain_name.is_empty())
            .filter(|m| seen.insert(m.subdomain_name.to_ascii_lowercase()))
            .map(|m| SdkSubdomain {
                subdomain: m.subdomain_name.clone(),
            })
            .collect();

        let mut groups = AffiliateGroups::default();
        for affiliate in &module.supported_affiliates {
            let group = groups.entry(&affiliate.hostname);
            for key in &affiliate.query_url_keys {
                if !group.query_url_keys.contains(key) {
                    group.query_url_keys.push(key.clone());
                }
            }
        }
        for query_id in &module.supported_affiliate_query_ids {
            groups.entry(&query_id.hostname).query_ids.push(SdkQueryId {
                key: query_id.key.clone(),
                value: query_id.value.clone(),
            });
        }
        for pathname_id in &module.supported_affiliate_pathname_ids {
            groups
                .entry(&pathname_id.hostname)
                .pathname_ids
                .push(SdkPathnameId {
                    regex: pathname_id.regex.clone(),
                    redirect: pathname_id.redirect,
                });
        }

        SdkConfig {
            supported_hostnames,
            supported_bttnio_subdomains,
            supported_affiliates: groups.affiliates,
        }
    }
}

/// Insertion-ordered grouping of affiliate data by normalized hostname.
#[derive(Default)]
struct AffiliateGroups {
    index: HashMap<String, usize>,
    affiliates: Vec<SdkAffiliate>,
}

impl AffiliateGroups {
    fn entry(&mut self, hostname: &str) -> &mut SdkAffiliate {
        let len = self.affiliates.len();
        let i = *self.index.entry(normalize_hostname(hostname)).or_insert(len);
        if i == len {
            self.affiliates.push(SdkAffiliate {
                hostname: hostname.to_owned(),
                query_url_keys: Vec::new(),
                query_ids: Vec::new(),
                pathname_ids: Vec::new(),
            });
        }
        &mut self.affiliates[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ApprovalStatus, PathnameIdMatch};
    use assert_json_diff::assert_json_eq;
    use serde_json::json;

    fn config() -> Config {
        Config::builder()
            .supported_merchant(SupportedMerchant::new("shop.example", "org-shop"))
            .supported_merchant(SupportedMerchant::new("www.shop.example", "org-shop"))
            .supported_merchant(SupportedMerchant::new("hidden.example", "org-hidden"))
            .supported_affiliate(SupportedAffiliate::new("click.aff.example", ["u"]))
            .supported_affiliate(SupportedAffiliate::new("click.aff.example", ["u", "murl"]))
            .supported_affiliate_query_id(SupportedAffiliateQueryId {
                hostname: "click.aff.example".into(),
                key: "mid".into(),
                value: "1".into(),
                organization_id: "org-shop".into(),
                url: "https://shop.example".into(),
            })
            .supported_affiliate_query_id(SupportedAffiliateQueryId {
                hostname: "click.aff.example".into(),
                key: "mid".into(),
                value: "2".into(),
                organization_id: "org-hidden".into(),
                url: "https://hidden.example".into(),
            })
            .supported_affiliate_pathname_id(SupportedAffiliatePathnameId {
                hostname: "go.aff.example".into(),
                regex: r"^/c/(\d+)".into(),
                redirect: true,
                matches: vec![
                    PathnameIdMatch::new(["1"], "org-shop", "https://shop.example"),
                    PathnameIdMatch::new(["2"], "org-hidden", "https://hidden.example"),
                ],
            })
            .supported_affiliate_pathname_id(SupportedAffiliatePathnameId {
                hostname: "only.hidden.example".into(),
                regex: r"^/h/(\d+)".into(),
                redirect: false,
                matches: vec![PathnameIdMatch::new(["2"], "org-hidden", "https://hidden.example")],
            })
            .web_to_app_mapping(WebToAppMapping::new("org-shop", "shop", "https://shop.example"))
            .web_to_app_mapping(WebToAppMapping::new(
                "org-hidden",
                "hidden",
                "https://hidden.example",
            ))
            .approval(Approval::approved("org-pub", "org-shop"))
            .approval(Approval::with_status(ApprovalStatus::Declined, "org-pub", "org-hidden"))
            .approval(Approval::approved("org-other", "org-hidden"))
            .partner_parameter(PartnerParameter {
                id: "pp-shop".into(),
                organization: "org-shop".into(),
                name: "tag".into(),
                default_value: "d".into(),
            })
            .partner_parameter(PartnerParameter {
                id: "pp-hidden".into(),
                organization: "org-hidden".into(),
                name: "tag".into(),
                default_value: "d".into(),
            })
            .partner_value(PartnerValue {
                partner_parameter: "pp-shop".into(),
                audience: "org-pub".into(),
                value: "pub".into(),
            })
            .partner_value(PartnerValue {
                partner_parameter: "pp-shop".into(),
                audience: "org-other".into(),
                value: "other".into(),
            })
            .build()
            .unwrap()
    }

    #[test]
    fn module_config_is_scoped_to_publisher() {
        let module = serde_json::to_value(config().to_module_config("org-pub")).unwrap();
        assert_json_eq!(
            module,
            json!({
                "supported_merchants": [
                    { "hostname": "shop.example", "organization_id": "org-shop" },
                    { "hostname": "www.shop.example", "organization_id": "org-shop" }
                ],
                "supported_affiliate_query_ids": [{
                    "hostname": "click.aff.example", "key": "mid", "value": "1",
                    "organization_id": "org-shop", "url": "https://shop.example"
                }],
                "supported_affiliate_pathname_ids": [{
                    "hostname": "go.aff.example", "regex": "^/c/(\\d+)", "redirect": true,
                    "matches": [
                        { "values": ["1"], "organization_id": "org-shop", "url": "https://shop.example" }
                    ]
                }],
                "supported_affiliates": [
                    { "hostname": "click.aff.example", "query_url_keys": ["u"] },
                    { "hostname": "click.aff.example", "query_url_keys": ["u", "murl"] }
                ],
                "web_to_app_mappings": [{
                    "organization": "org-shop", "subdomain_name": "shop",
                    "external_host": "https://shop.example"
                }],
                "approvals": [
                    { "status": "approved", "audience": "org-pub", "organization": "org-shop" },
                    { "status": "declined", "audience": "org-pub", "organization": "org-hidden" }
                ],
                "partner_parameters": [
                    { "id": "pp-shop", "organization": "org-shop", "name": "tag", "default_value": "d" }
                ],
                "partner_values": [
                    { "partner_parameter": "pp-shop", "audience": "org-pub", "value": "pub" }
                ]
            })
        );
    }

    #[test]
    fn module_round_trip_is_deep_equal() {
        let first = config().to_module_config("org-pub");
        let json = serde_json::to_string(&first).unwrap();
        let hydrated = Config::from_json(&json).unwrap();
        assert_eq!(hydrated.to_module_config("org-pub"), first);

        let direct = Config::from_module_config(first.clone()).unwrap();
        assert_eq!(direct.to_module_config("org-pub"), first);
    }

    #[test]
    fn unknown_publisher_sees_only_affiliates() {
        let module = config().to_module_config("org-nobody");
        assert!(module.supported_merchants.is_empty());
        assert!(module.supported_affiliate_pathname_ids.is_empty());
        assert!(module.approvals.is_empty());
        assert_eq!(module.supported_affiliates.len(), 2);
    }

    #[test]
    fn six_field_payload_hydrates() {
        let config = Config::from_json(
            r#"{
                "supported_merchants": [{ "hostname": "shop.example", "organization_id": "org-shop" }],
                "supported_affiliate_query_ids": [],
                "supported_affiliate_pathname_ids": [],
                "supported_affiliates": [],
                "web_to_app_mappings": [],
                "approvals": [{ "status": "approved", "audience": "org-pub", "organization": "org-shop" }]
            }"#,
        )
        .unwrap();
        assert!(config.is_approved("org-pub", "org-shop"));
        assert!(config.partner_parameters().is_empty());
    }

    #[test]
    fn sdk_config_has_no_organization_ids() {
        let sdk = serde_json::to_value(config().to_sdk_config("org-pub")).unwrap();
        assert_json_eq!(
            sdk,
            json!({
                "supported_hostnames": [{ "hostname": "shop.example" }],
                "supported_bttnio_subdomains": [{ "subdomain": "shop" }],
                "supported_affiliates": [
                    {
                        "hostname": "click.aff.example",
                        "query_url_keys": ["u", "murl"],
                        "query_ids": [{ "key": "mid", "value": "1" }],
                        "pathname_ids": []
                    },
                    {
                        "hostname": "go.aff.example",
                        "query_url_keys": [],
                        "query_ids": [],
                        "pathname_ids": [{ "regex": "^/c/(\\d+)", "redirect": true }]
                    }
                ]
            })
        );
        assert!(!serde_json::to_string(&sdk).unwrap().contains("org-"));
    }
}
