//! Strategy registry: merchant id → link-building strategy.
//!
//! Each strategy type registers itself via [`IntoLinkBuilder`]. At registration
//! time the concrete type is monomorphized into a closure and erased behind
//! `Box<dyn Fn>`: early type erasure at registration, late construction at
//! [`Config::create_builder`](crate::Config::create_builder) time.
//!
//! # Immutability after build
//!
//! [`BuilderRegistryBuilder::build`] freezes the registry. The standard
//! registry ([`BuilderRegistry::standard`]) is built once per process and shared.
//!
//! # Example
//!
//! ```ignore
//! let registry = BuilderRegistryBuilder::new()
//!     .strategy::<UberBuilder<'static>>(ids::UBER)
//!     .template("org-shop", &SHOP_TEMPLATE)
//!     .build();
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::builder::{BuilderContext, LinkBuilder};
use crate::merchants::{self, AppTemplate, GenericBuilder, TemplateBuilder};
use crate::ConfigError;

/// Trait for strategy types constructible from a [`BuilderContext`].
///
/// The strategy fixes its own [`Affiliation`](crate::Affiliation) flags here.
pub trait IntoLinkBuilder: 'static {
    fn into_builder<'a>(ctx: BuilderContext<'a>) -> Box<dyn LinkBuilder + 'a>;
}

/// Type-erased strategy factory closure.
type BoxedStrategyFactory =
    Box<dyn for<'a> Fn(BuilderContext<'a>) -> Box<dyn LinkBuilder + 'a> + Send + Sync>;

fn erase<F>(factory: F) -> BoxedStrategyFactory
where
    F: for<'a> Fn(BuilderContext<'a>) -> Box<dyn LinkBuilder + 'a> + Send + Sync + 'static,
{
    Box::new(factory)
}

// ═══════════════════════════════════════════════════════════════════════════════
// Builder
// ═══════════════════════════════════════════════════════════════════════════════

/// Builder for a [`BuilderRegistry`].
pub struct BuilderRegistryBuilder {
    factories: HashMap<String, BoxedStrategyFactory>,
    fallback: BoxedStrategyFactory,
}

impl BuilderRegistryBuilder {
    /// An empty registry whose fallback is [`GenericBuilder`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
            fallback: erase(GenericBuilder::into_builder),
        }
    }

    /// Register a strategy type for a merchant id.
    ///
    /// A later registration for the same id replaces the earlier one.
    #[must_use]
    pub fn strategy<T: IntoLinkBuilder>(mut self, merchant_id: &str) -> Self {
        self.factories
            .insert(merchant_id.to_owned(), erase(T::into_builder));
        self
    }

    /// Register a table-driven [`AppTemplate`] for a merchant id.
    #[must_use]
    pub fn template(mut self, merchant_id: &str, template: &'static AppTemplate) -> Self {
        self.factories.insert(
            merchant_id.to_owned(),
            erase(move |ctx| TemplateBuilder::boxed(ctx, template)),
        );
        self
    }

    /// Replace the fallback used for unregistered merchants.
    #[must_use]
    pub fn fallback<T: IntoLinkBuilder>(mut self) -> Self {
        self.fallback = erase(T::into_builder);
        self
    }

    /// Freeze the registry.
    #[must_use]
    pub fn build(self) -> BuilderRegistry {
        BuilderRegistry {
            factories: self.factories,
            fallback: self.fallback,
        }
    }
}

impl Default for BuilderRegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════════════════════════════════════════

static STANDARD: Lazy<Arc<BuilderRegistry>> =
    Lazy::new(|| Arc::new(merchants::register(BuilderRegistryBuilder::new()).build()));

/// Immutable map of merchant strategies.
pub struct BuilderRegistry {
    factories: HashMap<String, BoxedStrategyFactory>,
    fallback: BoxedStrategyFactory,
}

impl BuilderRegistry {
    /// The registry with every built-in merchant strategy.
    #[must_use]
    pub fn standard() -> Arc<Self> {
        Arc::clone(&STANDARD)
    }

    /// Number of registered merchants.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }

    #[must_use]
    pub fn contains(&self, merchant_id: &str) -> bool {
        self.factories.contains_key(merchant_id)
    }

    /// Registered merchant ids, sorted.
    #[must_use]
    pub fn merchant_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Construct the merchant's strategy, or the fallback if unregistered.
    pub(crate) fn create<'a>(&self, ctx: BuilderContext<'a>) -> Box<dyn LinkBuilder + 'a> {
        match self.factories.get(ctx.merchant_id()) {
            Some(factory) => factory(ctx),
            None => {
                tracing::debug!(merchant_id = ctx.merchant_id(), "no strategy, using fallback");
                (self.fallback)(ctx)
            }
        }
    }

    /// Construct the merchant's strategy, failing if unregistered.
    pub(crate) fn create_mapped<'a>(
        &self,
        ctx: BuilderContext<'a>,
    ) -> Result<Box<dyn LinkBuilder + 'a>, ConfigError> {
        let factory =
            self.factories
                .get(ctx.merchant_id())
                .ok_or_else(|| ConfigError::UnmappedMerchant {
                    merchant_id: ctx.merchant_id().to_owned(),
                    registered: self.factories.len(),
                })?;
        Ok(factory(ctx))
    }
}

impl std::fmt::Debug for BuilderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuilderRegistry")
            .field("merchants", &self.merchant_ids())
            .finish_non_exhaustive()
    }
}
