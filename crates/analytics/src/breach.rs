use crate::error::AnalyticsError;
use chrono::{Duration, NaiveDateTime};
use configuration::BreachSettings;
use serde::{Deserialize, Serialize};

/// The earliest run of clustered failures found for one customer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BreachWindow {
    pub first_failure: NaiveDateTime,
    pub last_failure: NaiveDateTime,
}

impl BreachWindow {
    pub fn span(&self) -> Duration {
        self.last_failure - self.first_failure
    }
}

/// Sliding-window detector for clustered transaction failures.
///
/// A customer breaches when they have at least `min_failures` failed
/// transactions and some `min_failures` consecutive ones (in time order)
/// fit inside `window`, bounds inclusive.
#[derive(Debug, Clone)]
pub struct BreachDetector {
    min_failures: usize,
    window: Duration,
}

impl BreachDetector {
    pub fn new(min_failures: usize, window: Duration) -> Result<Self, AnalyticsError> {
        if min_failures < 2 {
            return Err(AnalyticsError::InvalidParameters(format!(
                "breach detection needs at least 2 failures per window, got {min_failures}"
            )));
        }
        if window <= Duration::zero() {
            return Err(AnalyticsError::InvalidParameters(
                "breach window must be positive".to_string(),
            ));
        }
        Ok(Self {
            min_failures,
            window,
        })
    }

    pub fn from_settings(settings: &BreachSettings) -> Result<Self, AnalyticsError> {
        Self::new(settings.min_failures, settings.window_duration()?)
    }

    pub fn min_failures(&self) -> usize {
        self.min_failures
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Finds the first qualifying window among the given failure timestamps.
    ///
    /// The timestamps may arrive in any order; they are sorted ascending
    /// before scanning and the scan stops at the first hit.
    pub fn detect(&self, mut failures: Vec<NaiveDateTime>) -> Option<BreachWindow> {
        if failures.len() < self.min_failures {
            return None;
        }
        failures.sort_unstable();

        failures
            .windows(self.min_failures)
            .map(|w| BreachWindow {
                first_failure: w[0],
                last_failure: w[w.len() - 1],
            })
            .find(|candidate| candidate.span() <= self.window)
    }
}
