//! # Storefront
//!
//! Analytical reports over in-memory e-commerce orders.
//!
//! This crate ties the workspace together: it re-exports the data model,
//! configuration, risk scoring and analytics crates, installs the tracing
//! subscriber, and builds an `AnalyticsEngine` from the loaded configuration.

pub mod telemetry;

pub use analytics;
pub use configuration;
pub use core_types;
pub use risk;

pub use analytics::{AnalyticsEngine, HighestValueOrder, Statistics};
pub use core_types::{Customer, Order, Product, Transaction, YearMonth};
pub use telemetry::init_tracing;

use anyhow::Context;
use configuration::AnalyticsSettings;

/// Loads `analytics.toml` (plus `ANALYTICS__*` overrides) and builds an engine from it.
pub fn build_engine() -> anyhow::Result<AnalyticsEngine> {
    let settings = configuration::load_config().context("Failed to load analytics configuration")?;
    engine_from_settings(settings)
}

/// Builds an engine from already loaded settings.
pub fn engine_from_settings(settings: AnalyticsSettings) -> anyhow::Result<AnalyticsEngine> {
    let engine = AnalyticsEngine::new(settings).context("Invalid analytics settings")?;
    tracing::info!(settings = ?engine.settings(), "Analytics engine ready.");
    Ok(engine)
}
