//! cfd-desk: headless client for a CFD maker daemon.

use anyhow::Result;
use clap::Parser;
use tracing::info;

/// Headless desk for a CFD maker daemon
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Configuration file path (can also be set via DESK_CONFIG env var)
    #[arg(short, long)]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    desk_app::init_logging();

    info!("Starting cfd-desk v{}", env!("CARGO_PKG_VERSION"));

    let config = match args
        .config
        .or_else(|| std::env::var("DESK_CONFIG").ok())
    {
        Some(path) => {
            info!(config_path = %path, "Loading configuration");
            desk_app::AppConfig::from_file(&path)?
        }
        None => desk_app::AppConfig::load()?,
    };

    let app = desk_app::Application::new(config);
    app.run().await?;

    Ok(())
}
