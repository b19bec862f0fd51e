use clap::Parser;

use matchday::cli::{self, Cli};
use matchday::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_tracing();
    cli::run(Cli::parse()).await
}
