use super::IOArgs;
use clap::Subcommand;
use sts_core::models::{Metric, NodeId};
use time::Date;

pub mod aggregate;
pub mod page;

#[derive(Subcommand)]
pub enum Commands {
    /// Build the aggregated tree of one metric from a product feed
    Aggregate {
        #[command(flatten)]
        io: IOArgs,

        /// The metric to aggregate (cost, orders, returns, revenue or buyouts)
        #[arg(short, long)]
        metric: Metric,

        /// The last day of the window as YYYY-MM-DD (defaults to today, UTC)
        #[arg(short, long, value_parser = aggregate::parse_date)]
        today: Option<Date>,
    },

    /// Extract one window of rows from an aggregated tree
    Page {
        #[command(flatten)]
        io: IOArgs,

        /// An expanded ancestor, root first (repeat for deeper levels)
        #[arg(short, long = "group-key")]
        group_keys: Vec<NodeId>,

        /// First row of the window
        #[arg(short, long, default_value_t = 0)]
        start: usize,

        /// End of the window (exclusive)
        #[arg(short, long)]
        end: usize,
    },
}
