use crate::DayWindow;
use sts_core::models::Series;

mod additive;
pub use additive::Additive;

mod weighted;
pub use weighted::Weighted;

/// What a node hands to its parent: per-day value totals and, for weighted
/// rollups, the number of leaf-days behind each total.
///
/// A parent's tally is the slot-wise sum of its children's tallies, with
/// "no data" as the identity: a slot stays empty only while every child is
/// empty there.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tally {
    /// Per-day totals (weighted totals for [`Weighted`])
    pub values: Series,
    /// Per-day leaf counts, only populated by [`Weighted`]
    pub weights: Series,
}

impl Tally {
    /// Fold another tally into this one.
    pub fn absorb(&mut self, other: &Tally) {
        add_into(&mut self.values, &other.values);
        add_into(&mut self.weights, &other.weights);
    }
}

fn add_into(acc: &mut Series, other: &Series) {
    for (day, value) in other.defined() {
        acc[day] = Some(acc[day].unwrap_or(0.0) + value);
    }
}

/// The values a node exposes once settled.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Stats {
    /// The per-day value
    pub metric_data: Series,
    /// Total over the window, if the metric sums
    pub sum: Option<f64>,
    /// Mean over the window
    pub average: Option<f64>,
}

/// A way of rolling per-day values up the hierarchy.
///
/// The engine settles leaves with [`Rollup::leaf`] and folds their tallies
/// into the parent. Internal nodes are settled from the folded tally with
/// [`Rollup::settle`], and that same tally is what they contribute upward.
pub trait Rollup {
    /// Settle an article and compute its contribution to the parent.
    fn leaf(&self, series: &Series, window: DayWindow) -> (Stats, Tally);

    /// Settle an internal node from the tally of its children.
    fn settle(&self, tally: &Tally) -> Stats;
}

/// `numerator / denominator`, or no data instead of a non-finite result.
pub(crate) fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 {
        return None;
    }
    Some(numerator / denominator).filter(|value| value.is_finite())
}

/// A leaf's average is taken over the days its window covers, not over the
/// days that happen to hold data.
pub(crate) fn leaf_average(series: &Series, window: DayWindow) -> Option<f64> {
    ratio(series.defined_sum()?, window.elements_to_take as f64)
}
