use std::io::Read;
use sts_core::models::{Metric, NodeMap, RawProductRecord};
use sts_engine::{aggregate, ingest};
use time::{Date, OffsetDateTime, macros::format_description};

pub fn parse_date(value: &str) -> Result<Date, time::error::Parse> {
    Date::parse(value, format_description!("[year]-[month]-[day]"))
}

pub fn today(requested: Option<Date>) -> Date {
    requested.unwrap_or_else(|| OffsetDateTime::now_utc().date())
}

/// Read a product feed, drop its malformed rows and aggregate the rest.
pub fn aggregate_feed(input: impl Read, metric: Metric, today: Date) -> anyhow::Result<NodeMap> {
    let rows: Vec<RawProductRecord> = serde_json::from_reader(input)?;
    let products = ingest(rows);
    Ok(aggregate(&products, metric, today))
}
