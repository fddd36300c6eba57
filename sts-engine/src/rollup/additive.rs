use super::{Rollup, Stats, Tally, leaf_average, ratio};
use crate::DayWindow;
use sts_core::models::Series;

/// Rollup for metrics whose totals add up across children.
#[derive(Debug, Clone, Copy, Default)]
pub struct Additive;

impl Rollup for Additive {
    fn leaf(&self, series: &Series, window: DayWindow) -> (Stats, Tally) {
        let stats = Stats {
            metric_data: *series,
            sum: series.defined_sum(),
            average: leaf_average(series, window),
        };
        let tally = Tally {
            values: *series,
            weights: Series::EMPTY,
        };
        (stats, tally)
    }

    fn settle(&self, tally: &Tally) -> Stats {
        let metric_data = tally.values;
        let sum = metric_data.defined_sum();
        Stats {
            metric_data,
            sum,
            average: sum.and_then(|sum| ratio(sum, metric_data.defined_count() as f64)),
        }
    }
}
