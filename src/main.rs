use anyhow::Result;
use clap::Parser;
use finbook::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    finbook::logging::init(cli.verbose);
    cli.run().await
}
