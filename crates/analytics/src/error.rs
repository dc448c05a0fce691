use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("Analytics engine received invalid parameters: {0}")]
    InvalidParameters(String),

    #[error("Configuration error: {0}")]
    Configuration(#[from] configuration::ConfigError),

    #[error("Risk scorer error: {0}")]
    Risk(#[from] risk::RiskError),
}
