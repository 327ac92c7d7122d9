use clap::Parser;
use tracing_subscriber::EnvFilter;

use pagevox_app::config::Cli;
use pagevox_app::runtime;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    tracing::info!("Starting PageVox");
    runtime::run(cli.into()).await
}
