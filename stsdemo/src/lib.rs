#![warn(missing_docs)]
#![doc = include_str!("../README.md")]

mod schedule;
pub use schedule::Scheduler;

mod cli;
pub use cli::Cli;

mod config;
pub use config::AppConfig;

pub mod source;

use std::convert::Infallible;
use sts_core::{models::Metric, ports::ProductSource};
use sts_engine::{dispatch::Dispatcher, ingest};
use sts_sqlite::Db;
use time::OffsetDateTime;
use tracing::{Level, event};

/// Re-read the product feed, hand the valid products to the dispatcher and
/// queue every metric so stale trees get rebuilt in the background.
///
/// Returns how many products were accepted.
pub fn refresh<'a, S: ProductSource>(
    dispatcher: &'a Dispatcher<Db>,
    source: &'a S,
) -> impl Future<Output = Result<usize, S::Error>> + Send + 'a {
    async move {
        let products = ingest(source.fetch().await?);
        let count = products.len();
        dispatcher.replace_products(products);
        dispatcher.prefetch(Metric::ALL);
        event!(Level::INFO, products = count, "product feed refreshed");
        Ok(count)
    }
}

/// Refresh the feed at every tick of `schedule`, forever.
///
/// A failed refresh is logged and the previous products stay in place until
/// the next tick. Returns at once when no interval is configured.
pub async fn refresh_on_schedule<S: ProductSource>(
    schedule: Scheduler,
    dispatcher: Dispatcher<Db>,
    source: S,
) -> Result<(), Infallible> {
    let f = async move |_tick: OffsetDateTime| {
        if let Err(error) = refresh(&dispatcher, &source).await {
            event!(Level::ERROR, %error, "product feed refresh failed");
        }
        Ok::<(), Infallible>(())
    };
    schedule.schedule(f).await
}
