use anyhow::Result;
use clap::Parser;
use headshot_studio::ai::GeminiImageClient;
use headshot_studio::cli::{setup_logging, CliOptions};
use headshot_studio::models::Config;
use headshot_studio::web::{setup_server, AppState};
use std::sync::Arc;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = CliOptions::parse();
    setup_logging(cli.debug);

    info!("Starting headshot-studio");

    let config = Config::from_env();
    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY is not set; transform requests will fail until it is configured");
    }

    let generator = GeminiImageClient::from_config(&config);
    info!("Image provider: Gemini (model: {})", generator.model());
    let state = AppState::new(Arc::new(generator));

    if let Err(e) = setup_server(
        &cli.listen_address,
        cli.port,
        state,
        Some(cli.static_dir),
    )
    .await
    {
        error!("Server failed: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
