//! WDV CLI - Command line tool for preparing NWIS hydrologic time series.

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "wdv-cli",
    version,
    about = "Water data viewer time-series toolkit"
)]
struct Cli {
    #[command(subcommand)]
    command: wdv_cmd::Command,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    wdv_cmd::run(cli.command).await
}
