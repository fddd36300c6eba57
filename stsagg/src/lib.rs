use clap::Parser;
use sts_core::models::TreePageQuery;
use tracing::{Level, event};

mod io;
pub use io::*;

mod commands;
pub use commands::*;

// The top-level arguments -- presently just which subcommand to execute
#[derive(Parser)]
#[command(version, about, long_about = None)]
pub struct BaseArgs {
    #[command(subcommand)]
    pub command: Commands,
}

impl BaseArgs {
    pub fn evaluate(self) -> anyhow::Result<()> {
        match self.command {
            Commands::Aggregate { io, metric, today } => {
                let today = aggregate::today(today);
                event!(Level::INFO, metric = metric.as_str(), %today, "aggregating");
                let tree = aggregate::aggregate_feed(io.read()?, metric, today)?;
                let output = io.write()?;
                serde_json::to_writer_pretty(output, &tree)?;
            }
            Commands::Page {
                io,
                group_keys,
                start,
                end,
            } => {
                if end < start {
                    return Err(CliError::InvertedWindow { start, end })?;
                }
                let query = TreePageQuery {
                    group_keys,
                    start_row: start,
                    end_row: end,
                };
                let page = page::page_tree(io.read()?, &query)?;
                let output = io.write()?;
                serde_json::to_writer_pretty(output, &page)?;
            }
        }

        Ok(())
    }
}

#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("the row window ends ({end}) before it starts ({start})")]
    InvertedWindow { start: usize, end: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    use sts_core::models::{Metric, NodeId};
    use time::macros::date;

    #[test]
    fn test_parse_aggregate() {
        let args = BaseArgs::try_parse_from([
            "stsagg",
            "aggregate",
            "products.json",
            "--metric",
            "revenue",
            "--today",
            "2024-05-31",
        ])
        .unwrap();
        let Commands::Aggregate { metric, today, .. } = args.command else {
            panic!("expected the aggregate command");
        };
        assert_eq!(metric, Metric::Revenue);
        assert_eq!(today, Some(date!(2024-05-31)));
    }

    #[test]
    fn test_parse_rejects_unknown_metric() {
        let result =
            BaseArgs::try_parse_from(["stsagg", "aggregate", "-", "--metric", "margin"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_page() {
        let args = BaseArgs::try_parse_from([
            "stsagg", "page", "tree.json", "-g", "acme", "-g", "acme:zen", "--end", "20",
        ])
        .unwrap();
        let Commands::Page {
            group_keys,
            start,
            end,
            ..
        } = args.command
        else {
            panic!("expected the page command");
        };
        assert_eq!(group_keys, vec![NodeId::from("acme"), NodeId::from("acme:zen")]);
        assert_eq!((start, end), (0, 20));
    }
}
