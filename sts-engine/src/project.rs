use sts_core::models::{Metric, Series};

/// Derive the daily series of `metric` from a product's aligned raw series.
///
/// Derived metrics only have data on days where every operand has data; a
/// missing operand is never read as zero.
pub fn project(cost: &Series, orders: &Series, returns: &Series, metric: Metric) -> Series {
    match metric {
        Metric::Cost => *cost,
        Metric::Orders => *orders,
        Metric::Returns => *returns,
        Metric::Buyouts => Series::from_fn(|day| Some(orders[day]? - returns[day]?)),
        Metric::Revenue => {
            Series::from_fn(|day| Some(cost[day]? * (orders[day]? - returns[day]?)))
        }
    }
}
