use thiserror::Error;

/// Errors raised while assembling [`crate::AnalyticsSettings`].
#[derive(Error, Debug)]
pub enum ConfigError {
    /// A source (file, environment or in-memory document) could not be read
    /// or did not deserialize into the settings structure.
    #[error("Failed to load analytics configuration: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Invalid analytics configuration: {0}")]
    ValidationError(String),
}
