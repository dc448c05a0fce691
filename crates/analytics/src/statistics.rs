//! Combinable decimal statistics.
//!
//! A [`Reducer`] splits a reduction into `seed`, `fold`, `merge` and `finish`.
//! Any reducer whose `merge` is associative and commutative (with the seed as
//! identity) gives the same answer whether it runs over one sequence or over
//! arbitrary disjoint partitions merged afterwards, which is what
//! [`reduce_partitioned`] relies on.

use rayon::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A reduction protocol over elements of type `T`.
pub trait Reducer<T: ?Sized> {
    type Acc;
    type Output;

    /// A fresh, empty accumulator. Must be the identity of `merge`.
    fn seed(&self) -> Self::Acc;

    /// Adds one element to an accumulator.
    fn fold(&self, acc: &mut Self::Acc, item: &T);

    /// Combines two independently built accumulators.
    fn merge(&self, left: Self::Acc, right: Self::Acc) -> Self::Acc;

    fn finish(&self, acc: Self::Acc) -> Self::Output;
}

/// Count, sum, min, max and average of a sequence of decimals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistics {
    pub count: u64,
    pub sum: Decimal,
    pub min: Option<Decimal>,
    pub max: Option<Decimal>,
    /// `sum / count`, only present when `count > 0`.
    pub average: Option<Decimal>,
}

impl Statistics {
    /// The result of reducing an empty sequence.
    pub const EMPTY: Statistics = Statistics {
        count: 0,
        sum: Decimal::ZERO,
        min: None,
        max: None,
        average: None,
    };

    /// Builds statistics from their components, deriving the average.
    pub fn of(count: u64, sum: Decimal, min: Option<Decimal>, max: Option<Decimal>) -> Self {
        let average = (count > 0).then(|| sum / Decimal::from(count));
        Self {
            count,
            sum,
            min,
            max,
            average,
        }
    }
}

impl Default for Statistics {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// The mutable state behind [`Statistics`].
///
/// Each worker of a partitioned run must own its own accumulator; results
/// are combined with [`StatsAccumulator::merge`] once the workers are done.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsAccumulator {
    count: u64,
    sum: Decimal,
    min: Option<Decimal>,
    max: Option<Decimal>,
}

impl StatsAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value. Absent values are ignored entirely; the sum saturates
    /// instead of overflowing.
    pub fn accept(&mut self, value: Option<Decimal>) {
        let Some(value) = value else {
            return;
        };
        self.count += 1;
        self.sum = self.sum.saturating_add(value);
        self.min = Some(self.min.map_or(value, |min| min.min(value)));
        self.max = Some(self.max.map_or(value, |max| max.max(value)));
    }

    pub fn merge(self, other: StatsAccumulator) -> StatsAccumulator {
        if other.count == 0 {
            return self;
        }
        if self.count == 0 {
            return other;
        }
        StatsAccumulator {
            count: self.count + other.count,
            sum: self.sum.saturating_add(other.sum),
            min: pick(self.min, other.min, std::cmp::min),
            max: pick(self.max, other.max, std::cmp::max),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn finish(self) -> Statistics {
        if self.count == 0 {
            return Statistics::EMPTY;
        }
        Statistics::of(self.count, self.sum, self.min, self.max)
    }
}

fn pick(
    left: Option<Decimal>,
    right: Option<Decimal>,
    choose: fn(Decimal, Decimal) -> Decimal,
) -> Option<Decimal> {
    match (left, right) {
        (Some(l), Some(r)) => Some(choose(l, r)),
        (l, r) => l.or(r),
    }
}

/// A [`Reducer`] producing [`Statistics`] over whatever decimal the
/// extractor pulls out of each element.
pub struct DecimalStatistics<F> {
    extractor: F,
}

impl<F> DecimalStatistics<F> {
    pub fn new(extractor: F) -> Self {
        Self { extractor }
    }
}

impl<T, F> Reducer<T> for DecimalStatistics<F>
where
    T: ?Sized,
    F: Fn(&T) -> Option<Decimal>,
{
    type Acc = StatsAccumulator;
    type Output = Statistics;

    fn seed(&self) -> StatsAccumulator {
        StatsAccumulator::new()
    }

    fn fold(&self, acc: &mut StatsAccumulator, item: &T) {
        acc.accept((self.extractor)(item));
    }

    fn merge(&self, left: StatsAccumulator, right: StatsAccumulator) -> StatsAccumulator {
        left.merge(right)
    }

    fn finish(&self, acc: StatsAccumulator) -> Statistics {
        acc.finish()
    }
}

/// Runs a reducer over a sequence on the calling thread.
pub fn reduce<'a, T, R, I>(items: I, reducer: &R) -> R::Output
where
    T: ?Sized + 'a,
    R: Reducer<T>,
    I: IntoIterator<Item = &'a T>,
{
    let mut acc = reducer.seed();
    for item in items {
        reducer.fold(&mut acc, item);
    }
    reducer.finish(acc)
}

/// Runs a reducer over a slice on the rayon pool.
///
/// Every worker folds its own partition into its own accumulator; partial
/// accumulators are merged pairwise as the workers join. `min_len` is the
/// smallest partition handed to a worker.
pub fn reduce_partitioned<T, R>(items: &[T], reducer: &R, min_len: usize) -> R::Output
where
    T: Sync,
    R: Reducer<T> + Sync,
    R::Acc: Send,
{
    let acc = items
        .par_iter()
        .with_min_len(min_len.max(1))
        .fold(
            || reducer.seed(),
            |mut acc, item| {
                reducer.fold(&mut acc, item);
                acc
            },
        )
        .reduce(|| reducer.seed(), |left, right| reducer.merge(left, right));
    reducer.finish(acc)
}

/// Shorthand for [`reduce`] with a [`DecimalStatistics`] reducer.
pub fn statistics_by<'a, T, F, I>(items: I, extractor: F) -> Statistics
where
    T: ?Sized + 'a,
    F: Fn(&T) -> Option<Decimal>,
    I: IntoIterator<Item = &'a T>,
{
    reduce(items, &DecimalStatistics::new(extractor))
}
