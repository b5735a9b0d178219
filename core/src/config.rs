//! `Config`: the immutable configuration every component reads
//!
//! A `Config` is built once from a [`ModuleConfig`] (the wire form) or through
//! [`ConfigBuilder`], compiles its regexes and indexes up front, and is then
//! shared read-only. Nothing here mutates after [`ConfigBuilder::build`].
//!
//! # Thread safety
//!
//! `Config` is `Send + Sync`. Builders borrow it, so any number of requests can
//! resolve and build links against one instance without locks.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use regex::Regex;

use crate::approvals::{ApprovalIndex, ApprovedMerchants};
use crate::builder::{BuilderContext, LinkBuilder};
use crate::{
    Approval, BuilderRegistry, ConfigError, ModuleConfig, PartnerParameter, PartnerValue,
    SupportedAffiliate, SupportedAffiliatePathnameId, SupportedAffiliateQueryId,
    SupportedMerchant, WebToAppMapping, MAX_REGEX_PATTERN_LENGTH,
};

/// Callback for non-fatal configuration warnings.
///
/// Fired synchronously. Implementations must not panic or block.
pub type WarningFn = Arc<dyn Fn(&str) + Send + Sync>;

fn noop_warning() -> WarningFn {
    Arc::new(|_: &str| {})
}

/// A `SupportedMerchant` with its query regex compiled.
pub(crate) struct CompiledMerchant {
    pub(crate) query_regex: Option<Regex>,
}

/// Immutable resolution-and-attribution configuration.
///
/// # Example
///
/// ```
/// use linkwise::prelude::*;
///
/// let config = Config::builder()
///     .supported_merchant(SupportedMerchant::new("shop.example", "org-shop"))
///     .approval(Approval::approved("org-pub", "org-shop"))
///     .build()
///     .unwrap();
///
/// assert!(config.is_approved("org-pub", "org-shop"));
/// assert!(config.create_builder("org-pub", "org-shop").is_ok());
/// assert!(config.create_builder("org-pub", "org-other").is_err());
/// ```
pub struct Config {
    pub(crate) data: ModuleConfig,
    pub(crate) merchants: Vec<CompiledMerchant>,
    pub(crate) pathname_regexes: Vec<Regex>,
    approvals: ApprovalIndex,
    subdomains: HashMap<String, usize>,
    mappings_by_organization: HashMap<String, usize>,
    partner_parameters: HashMap<(String, String), usize>,
    partner_values: HashMap<(String, String), usize>,
    on_warning: WarningFn,
    registry: Arc<BuilderRegistry>,
}

impl Config {
    /// Start building a config programmatically.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Construct from the wire form with the default no-op warning callback
    /// and the standard strategy registry.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if any regex fails to compile.
    pub fn new(data: ModuleConfig) -> Result<Self, ConfigError> {
        ConfigBuilder::from_module_config(data).build()
    }

    /// Parse the wire form from JSON and construct.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidConfig`] for malformed JSON, or
    /// [`ConfigError::InvalidPattern`] for a bad regex.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let data: ModuleConfig = serde_json::from_str(json)?;
        Self::new(data)
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Collections
    // ───────────────────────────────────────────────────────────────────────────

    /// Merchant records in config order.
    #[must_use]
    pub fn supported_merchants(&self) -> &[SupportedMerchant] {
        &self.data.supported_merchants
    }

    /// Affiliate networks that carry the destination in a query parameter.
    #[must_use]
    pub fn supported_affiliates(&self) -> &[SupportedAffiliate] {
        &self.data.supported_affiliates
    }

    /// Fixed `key=value` affiliate rows.
    #[must_use]
    pub fn supported_affiliate_query_ids(&self) -> &[SupportedAffiliateQueryId] {
        &self.data.supported_affiliate_query_ids
    }

    /// Pathname-regex affiliate entries.
    #[must_use]
    pub fn supported_affiliate_pathname_ids(&self) -> &[SupportedAffiliatePathnameId] {
        &self.data.supported_affiliate_pathname_ids
    }

    /// Web-to-app mappings, one per `bttn.io` subdomain.
    #[must_use]
    pub fn web_to_app_mappings(&self) -> &[WebToAppMapping] {
        &self.data.web_to_app_mappings
    }

    /// Raw approval records, every status included.
    #[must_use]
    pub fn approval_records(&self) -> &[Approval] {
        &self.data.approvals
    }

    /// Per-merchant partner parameter definitions.
    #[must_use]
    pub fn partner_parameters(&self) -> &[PartnerParameter] {
        &self.data.partner_parameters
    }

    /// Per-publisher overrides of partner parameters.
    #[must_use]
    pub fn partner_values(&self) -> &[PartnerValue] {
        &self.data.partner_values
    }

    /// The strategy registry builders are created from.
    #[must_use]
    pub fn registry(&self) -> &BuilderRegistry {
        &self.registry
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Lookups
    // ───────────────────────────────────────────────────────────────────────────

    /// Mapping for a `<subdomain>.bttn.io` subdomain.
    #[must_use]
    pub fn web_to_app_mapping_by_subdomain(&self, subdomain: &str) -> Option<&WebToAppMapping> {
        self.subdomains
            .get(&subdomain.to_ascii_lowercase())
            .map(|&i| &self.data.web_to_app_mappings[i])
    }

    /// First mapping owned by a merchant.
    #[must_use]
    pub fn web_to_app_mapping_by_organization(
        &self,
        organization: &str,
    ) -> Option<&WebToAppMapping> {
        self.mappings_by_organization
            .get(organization)
            .map(|&i| &self.data.web_to_app_mappings[i])
    }

    /// Merchants `publisher_id` is approved for.
    #[must_use]
    pub fn approvals(&self, publisher_id: &str) -> ApprovedMerchants<'_> {
        self.approvals.get(publisher_id)
    }

    /// Whether an approved approval links `publisher_id` to `merchant_id`.
    #[must_use]
    pub fn is_approved(&self, publisher_id: &str, merchant_id: &str) -> bool {
        self.approvals(publisher_id).contains(merchant_id)
    }

    /// Resolve a per-publisher partner value.
    ///
    /// Looks up the merchant's parameter named `name`. If the merchant has no
    /// such parameter the warning callback fires and `fallback` is returned.
    /// Otherwise the publisher's override wins over the parameter default.
    #[must_use]
    pub fn get_partner_value(
        &self,
        name: &str,
        merchant_id: &str,
        publisher_id: &str,
        fallback: &str,
    ) -> String {
        let key = (merchant_id.to_owned(), name.to_owned());
        let Some(&param_index) = self.partner_parameters.get(&key) else {
            self.warn(&format!(
                "partner parameter \"{name}\" is not configured for merchant \"{merchant_id}\"; \
                 using fallback \"{fallback}\""
            ));
            return fallback.to_owned();
        };
        let parameter = &self.data.partner_parameters[param_index];

        let value_key = (parameter.id.clone(), publisher_id.to_owned());
        match self.partner_values.get(&value_key) {
            Some(&i) => {
                tracing::trace!(name, merchant_id, publisher_id, "partner value override");
                self.data.partner_values[i].value.clone()
            }
            None => {
                tracing::trace!(name, merchant_id, publisher_id, "partner value default");
                parameter.default_value.clone()
            }
        }
    }

    /// Emit a non-fatal warning through the injected callback.
    pub fn warn(&self, message: &str) {
        (self.on_warning)(message);
    }

    // ───────────────────────────────────────────────────────────────────────────
    // Builder factory
    // ───────────────────────────────────────────────────────────────────────────

    /// Create the link builder for `(publisher_id, merchant_id)`.
    ///
    /// Merchants without a registered strategy get the registry's fallback
    /// (generic) strategy.
    ///
    /// # Errors
    ///
    /// - [`ConfigError::EmptyPublisherId`] / [`ConfigError::EmptyMerchantId`]
    /// - [`ConfigError::NotApproved`] if no approved approval exists
    pub fn create_builder<'a>(
        &'a self,
        publisher_id: &'a str,
        merchant_id: &'a str,
    ) -> Result<Box<dyn LinkBuilder + 'a>, ConfigError> {
        let ctx = self.builder_context(publisher_id, merchant_id)?;
        Ok(self.registry.create(ctx))
    }

    /// Like [`create_builder`](Self::create_builder), but an unregistered
    /// merchant is an error instead of falling back.
    ///
    /// # Errors
    ///
    /// Everything `create_builder` returns, plus [`ConfigError::UnmappedMerchant`].
    pub fn create_mapped_builder<'a>(
        &'a self,
        publisher_id: &'a str,
        merchant_id: &'a str,
    ) -> Result<Box<dyn LinkBuilder + 'a>, ConfigError> {
        let ctx = self.builder_context(publisher_id, merchant_id)?;
        self.registry.create_mapped(ctx)
    }

    fn builder_context<'a>(
        &'a self,
        publisher_id: &'a str,
        merchant_id: &'a str,
    ) -> Result<BuilderContext<'a>, ConfigError> {
        if publisher_id.is_empty() {
            return Err(ConfigError::EmptyPublisherId);
        }
        if merchant_id.is_empty() {
            return Err(ConfigError::EmptyMerchantId);
        }
        if !self.is_approved(publisher_id, merchant_id) {
            return Err(ConfigError::NotApproved {
                publisher_id: publisher_id.to_owned(),
                merchant_id: merchant_id.to_owned(),
            });
        }
        Ok(BuilderContext::new(self, publisher_id, merchant_id))
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("supported_merchants", &self.data.supported_merchants.len())
            .field("supported_affiliates", &self.data.supported_affiliates.len())
            .field(
                "supported_affiliate_query_ids",
                &self.data.supported_affiliate_query_ids.len(),
            )
            .field(
                "supported_affiliate_pathname_ids",
                &self.data.supported_affiliate_pathname_ids.len(),
            )
            .field("web_to_app_mappings", &self.data.web_to_app_mappings.len())
            .field("approvals", &self.data.approvals.len())
            .field("registered_strategies", &self.registry.len())
            .finish()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Builder
// ═══════════════════════════════════════════════════════════════════════════════

/// Builder for [`Config`].
///
/// Collect records, optionally inject a warning callback and a registry, then
/// call [`build()`](Self::build). The resulting `Config` is frozen.
pub struct ConfigBuilder {
    data: ModuleConfig,
    on_warning: WarningFn,
    registry: Option<Arc<BuilderRegistry>>,
}

impl ConfigBuilder {
    /// An empty builder with a no-op warning callback.
    #[must_use]
    pub fn new() -> Self {
        Self::from_module_config(ModuleConfig::default())
    }

    /// Seed the builder with a wire-form snapshot.
    #[must_use]
    pub fn from_module_config(data: ModuleConfig) -> Self {
        Self {
            data,
            on_warning: noop_warning(),
            registry: None,
        }
    }

    #[must_use]
    pub fn supported_merchant(mut self, merchant: SupportedMerchant) -> Self {
        self.data.supported_merchants.push(merchant);
        self
    }

    #[must_use]
    pub fn supported_affiliate(mut self, affiliate: SupportedAffiliate) -> Self {
        self.data.supported_affiliates.push(affiliate);
        self
    }

    #[must_use]
    pub fn supported_affiliate_query_id(mut self, query_id: SupportedAffiliateQueryId) -> Self {
        self.data.supported_affiliate_query_ids.push(query_id);
        self
    }

    #[must_use]
    pub fn supported_affiliate_pathname_id(
        mut self,
        pathname_id: SupportedAffiliatePathnameId,
    ) -> Self {
        self.data.supported_affiliate_pathname_ids.push(pathname_id);
        self
    }

    #[must_use]
    pub fn web_to_app_mapping(mut self, mapping: WebToAppMapping) -> Self {
        self.data.web_to_app_mappings.push(mapping);
        self
    }

    #[must_use]
    pub fn approval(mut self, approval: Approval) -> Self {
        self.data.approvals.push(approval);
        self
    }

    #[must_use]
    pub fn partner_parameter(mut self, parameter: PartnerParameter) -> Self {
        self.data.partner_parameters.push(parameter);
        self
    }

    #[must_use]
    pub fn partner_value(mut self, value: PartnerValue) -> Self {
        self.data.partner_values.push(value);
        self
    }

    /// Inject the warning callback. The default is a no-op.
    #[must_use]
    pub fn on_warning(mut self, callback: impl Fn(&str) + Send + Sync + 'static) -> Self {
        self.on_warning = Arc::new(callback);
        self
    }

    /// Route warnings to `tracing::warn!`.
    #[must_use]
    pub fn warn_via_tracing(self) -> Self {
        self.on_warning(|message| tracing::warn!(target: "linkwise", "{message}"))
    }

    /// Use a custom strategy registry instead of [`BuilderRegistry::standard`].
    #[must_use]
    pub fn registry(mut self, registry: Arc<BuilderRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Compile regexes, build indexes, and freeze.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if a `query_regex` or pathname
    /// `regex` is invalid or longer than [`MAX_REGEX_PATTERN_LENGTH`].
    pub fn build(self) -> Result<Config, ConfigError> {
        let data = self.data;

        let merchants = data
            .supported_merchants
            .iter()
            .map(|m| {
                Ok(CompiledMerchant {
                    query_regex: m.query_regex.as_deref().map(compile).transpose()?,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;

        let pathname_regexes = data
            .supported_affiliate_pathname_ids
            .iter()
            .map(|p| compile(&p.regex))
            .collect::<Result<Vec<_>, _>>()?;

        let mut subdomains = HashMap::new();
        let mut mappings_by_organization = HashMap::new();
        for (i, mapping) in data.web_to_app_mappings.iter().enumerate() {
            subdomains
                .entry(mapping.subdomain_name.to_ascii_lowercase())
                .or_insert(i);
            mappings_by_organization
                .entry(mapping.organization.clone())
                .or_insert(i);
        }

        let mut partner_parameters = HashMap::new();
        for (i, p) in data.partner_parameters.iter().enumerate() {
            partner_parameters
                .entry((p.organization.clone(), p.name.clone()))
                .or_insert(i);
        }

        let mut partner_values = HashMap::new();
        for (i, v) in data.partner_values.iter().enumerate() {
            partner_values
                .entry((v.partner_parameter.clone(), v.audience.clone()))
                .or_insert(i);
        }

        let approvals = ApprovalIndex::new(&data.approvals);
        let registry = self.registry.unwrap_or_else(BuilderRegistry::standard);

        tracing::debug!(
            merchants = data.supported_merchants.len(),
            affiliates = data.supported_affiliates.len(),
            approvals = data.approvals.len(),
            "config built"
        );

        Ok(Config {
            data,
            merchants,
            pathname_regexes,
            approvals,
            subdomains,
            mappings_by_organization,
            partner_parameters,
            partner_values,
            on_warning: self.on_warning,
            registry,
        })
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    if pattern.len() > MAX_REGEX_PATTERN_LENGTH {
        return Err(ConfigError::InvalidPattern {
            pattern: pattern.chars().take(64).collect(),
            reason: format!(
                "pattern length is {}, but maximum allowed is {MAX_REGEX_PATTERN_LENGTH}",
                pattern.len()
            ),
        });
    }
    Regex::new(pattern).map_err(|e| ConfigError::InvalidPattern {
        pattern: pattern.to_owned(),
        reason: e.to_string(),
    })
}
