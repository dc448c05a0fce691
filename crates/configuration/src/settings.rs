use crate::error::ConfigError;
use serde::Deserialize;
use std::time::Duration;

/// The root configuration structure for the analytics engine.
///
/// Every section may be omitted from `analytics.toml`; missing sections and
/// keys fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Default)]
#[serde(default)]
pub struct AnalyticsSettings {
    pub reports: ReportSettings,
    pub breach: BreachSettings,
    pub risk: RiskSettings,
    pub execution: ExecutionSettings,
}

/// Thresholds for the ranking and grouping reports.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ReportSettings {
    /// How many customers the top-spenders report returns at most.
    pub top_spenders_limit: usize,
    /// A category is reported only when it has strictly more qualifying transactions than this.
    pub category_min_transactions: usize,
}

/// Parameters of the SLA breach detector.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct BreachSettings {
    /// Number of failed transactions a customer needs before windows are inspected.
    /// This is also the size of the sliding window.
    pub min_failures: usize,
    /// Maximum elapsed time between the first and last failure of a window (inclusive).
    #[serde(with = "humantime_serde")]
    pub window: Duration,
}

/// Parameters of the synthetic per-order risk score.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RiskSettings {
    pub iterations: u32,
}

/// Controls how partitioned reductions split their input.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExecutionSettings {
    /// The smallest slice a single worker receives.
    pub min_partition_len: usize,
}

// --- Default Implementations ---

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            top_spenders_limit: 3,
            category_min_transactions: 50,
        }
    }
}

impl Default for BreachSettings {
    fn default() -> Self {
        Self {
            min_failures: 3,
            window: Duration::from_secs(24 * 60 * 60),
        }
    }
}

impl Default for RiskSettings {
    fn default() -> Self {
        Self { iterations: 1000 }
    }
}

impl Default for ExecutionSettings {
    fn default() -> Self {
        Self {
            min_partition_len: 1024,
        }
    }
}

impl BreachSettings {
    /// The window as a calendar duration, for comparison against timestamps.
    pub fn window_duration(&self) -> Result<chrono::Duration, ConfigError> {
        chrono::Duration::from_std(self.window).map_err(|e| {
            ConfigError::ValidationError(format!("breach.window is out of range: {e}"))
        })
    }
}

impl AnalyticsSettings {
    /// Checks that the loaded values are usable by the engine.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.reports.top_spenders_limit == 0 {
            return Err(ConfigError::ValidationError(
                "reports.top_spenders_limit must be greater than 0".to_string(),
            ));
        }
        if self.breach.min_failures < 2 {
            return Err(ConfigError::ValidationError(
                "breach.min_failures must be at least 2".to_string(),
            ));
        }
        if self.breach.window.is_zero() {
            return Err(ConfigError::ValidationError(
                "breach.window must be greater than 0".to_string(),
            ));
        }
        self.breach.window_duration()?;
        if self.risk.iterations == 0 {
            return Err(ConfigError::ValidationError(
                "risk.iterations must be greater than 0".to_string(),
            ));
        }
        if self.execution.min_partition_len == 0 {
            return Err(ConfigError::ValidationError(
                "execution.min_partition_len must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}
