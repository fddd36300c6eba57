use clap::Parser as _;
use stsagg::BaseArgs;
use tracing_subscriber::{EnvFilter, fmt};

pub fn main() -> anyhow::Result<()> {
    // stdout may carry the output, so diagnostics go to stderr
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = BaseArgs::parse();
    args.evaluate()
}
