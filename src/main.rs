use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod config;
mod error;
mod extract;
mod handlers;
mod router;
mod schemas;

#[cfg(test)]
mod test_utils;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "library_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load .env before clap reads DATABASE_URL / BIND_ADDRESS
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    cli.run().await?;

    Ok(())
}
