use crate::RiskScorer;
use crate::error::RiskError;
use configuration::RiskSettings;
use core_types::Order;
use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;

/// Drops the low bits of an identifier half so it converts to `f64` exactly.
const MANTISSA_SHIFT: u32 = 11;

/// The reference `RiskScorer`.
///
/// For every iteration `i` the scorer takes the high and low halves of the
/// order identifier, offsets each by `i`, multiplies `sin(high)` by
/// `cos(low)`, squares the product and adds its absolute value to a decimal
/// accumulator. The total is divided by the number of transaction entries
/// (at least one).
#[derive(Debug, Clone)]
pub struct TrigonometricRiskScorer {
    iterations: u32,
}

impl TrigonometricRiskScorer {
    /// Creates a scorer running `iterations` rounds per order.
    pub fn new(iterations: u32) -> Result<Self, RiskError> {
        if iterations == 0 {
            return Err(RiskError::InvalidParameters(
                "iterations must be greater than 0".to_string(),
            ));
        }
        tracing::debug!(iterations, "Trigonometric risk scorer configured.");
        Ok(Self { iterations })
    }

    pub fn from_settings(settings: &RiskSettings) -> Result<Self, RiskError> {
        Self::new(settings.iterations)
    }

    pub fn iterations(&self) -> u32 {
        self.iterations
    }
}

impl RiskScorer for TrigonometricRiskScorer {
    fn score(&self, order: &Order) -> Decimal {
        let bits = order.id.as_u128();
        let high = (((bits >> 64) as u64) >> MANTISSA_SHIFT) as f64;
        let low = ((bits as u64) >> MANTISSA_SHIFT) as f64;

        let mut accumulated = Decimal::ZERO;
        for i in 0..self.iterations {
            let offset = f64::from(i);
            let product = (high + offset).sin() * (low + offset).cos();
            let term = product.powi(2);
            // from_f64 only fails for non-finite values.
            accumulated += Decimal::from_f64(term).unwrap_or(Decimal::ZERO).abs();
        }

        let divisor = order.transaction_count().max(1);
        accumulated / Decimal::from(divisor)
    }
}
