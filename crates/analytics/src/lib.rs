//! # Order Analytics Engine
//!
//! This crate computes the fixed set of order reports: top spenders in a
//! month, per-category average transaction value, SLA breach detection, the
//! highest-value order's boundary transactions, catalog price statistics,
//! per-order risk scores, a daily sales calendar, price-range filtering and
//! customer email extraction.
//!
//! ## Architectural Principles
//!
//! - **Pure Logic:** No I/O, no persistence. Inputs are fully materialized
//!   slices of `core-types` values and every report is read-only.
//! - **Tolerant of Malformed Records:** Missing customers, null transaction
//!   entries and missing prices are skipped or defaulted, never rejected.
//! - **Partition Independence:** Statistics are built from a `Reducer` whose
//!   merge is associative and commutative, so the partitioned (rayon) entry
//!   points produce exactly what the sequential ones produce.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: holds the thresholds and exposes every report.
//! - `Statistics`, `StatsAccumulator`, `Reducer`: the combinable reduction.
//! - `BreachDetector`: the sliding-window failure detector.
//! - `AnalyticsError`: the error returned when building an engine.

pub mod breach;
pub mod engine;
pub mod error;
pub mod report;
pub mod statistics;

pub use breach::{BreachDetector, BreachWindow};
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use report::{DataQualitySummary, HighestValueOrder, OrderEdges, SlaBreach};
pub use statistics::{
    DecimalStatistics, Reducer, Statistics, StatsAccumulator, reduce, reduce_partitioned,
    statistics_by,
};

