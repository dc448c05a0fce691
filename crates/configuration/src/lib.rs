// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{
    AnalyticsSettings, BreachSettings, ExecutionSettings, ReportSettings, RiskSettings,
};

/// Base name of the optional configuration file (`analytics.toml`).
pub const CONFIG_FILE: &str = "analytics";

/// Prefix of environment overrides, e.g. `ANALYTICS__RISK__ITERATIONS=500`.
pub const ENV_PREFIX: &str = "ANALYTICS";

/// Loads the analytics configuration.
///
/// Reads `analytics.toml` from the working directory if it exists, layers
/// `ANALYTICS__*` environment variables on top, deserializes the result into
/// `AnalyticsSettings` and validates it. Every section is optional.
pub fn load_config() -> Result<AnalyticsSettings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::with_name(CONFIG_FILE).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    finish(builder)
}

/// Parses settings from an in-memory TOML document.
pub fn load_config_from_str(toml: &str) -> Result<AnalyticsSettings, ConfigError> {
    let builder = config::Config::builder()
        .add_source(config::File::from_str(toml, config::FileFormat::Toml))
        .build()?;

    finish(builder)
}

fn finish(builder: config::Config) -> Result<AnalyticsSettings, ConfigError> {
    let settings = builder.try_deserialize::<AnalyticsSettings>()?;
    settings.validate()?;
    tracing::debug!(?settings, "Analytics configuration loaded.");
    Ok(settings)
}
