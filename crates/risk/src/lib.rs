//! # Order Risk Scoring
//!
//! A deterministic, CPU-bound per-order score. It does not model anything
//! about fraud or credit; it exists so that sequential and partitioned
//! execution strategies can be compared on a workload with real arithmetic
//! in it, and its output must be reproducible to the last decimal digit.

pub mod error;
pub mod simple_scorer;

pub use error::RiskError;
pub use simple_scorer::TrigonometricRiskScorer;

use core_types::Order;
use rust_decimal::Decimal;

/// Computes a numeric score for a single order.
///
/// The `Send + Sync` bounds are required so one scorer can be shared by the
/// workers of a partitioned run.
pub trait RiskScorer: Send + Sync {
    /// Scores one order. Must depend on nothing but the order itself.
    fn score(&self, order: &Order) -> Decimal;
}
