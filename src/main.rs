use clap::Parser;
use weather_dashboard::cli::{run, Cli};
use weather_dashboard::error::Result;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    run(cli).await
}
