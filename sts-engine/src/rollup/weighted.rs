use super::{Rollup, Stats, Tally, leaf_average, ratio};
use crate::DayWindow;
use sts_core::models::Series;

/// Rollup for metrics that are averaged rather than summed (unit cost).
///
/// Each leaf-day with data carries weight 1. Parents accumulate
/// `value × weight` and `weight` per day and report their weighted mean, so
/// a node's value is the mean over every leaf-day below it rather than a
/// mean of its children's means. No sum is reported.
#[derive(Debug, Clone, Copy, Default)]
pub struct Weighted;

impl Rollup for Weighted {
    fn leaf(&self, series: &Series, window: DayWindow) -> (Stats, Tally) {
        let stats = Stats {
            metric_data: *series,
            sum: None,
            average: leaf_average(series, window),
        };
        let tally = Tally {
            values: *series,
            weights: Series::from_fn(|day| series[day].map(|_| 1.0)),
        };
        (stats, tally)
    }

    fn settle(&self, tally: &Tally) -> Stats {
        let metric_data =
            Series::from_fn(|day| ratio(tally.values[day]?, tally.weights[day]?));
        let average = tally
            .values
            .defined_sum()
            .zip(tally.weights.defined_sum())
            .and_then(|(values, weights)| ratio(values, weights));
        Stats {
            metric_data,
            sum: None,
            average,
        }
    }
}
