//! Request-scoped entry point: reads one function event as JSON from stdin
//! and writes one response object to stdout.

use anyhow::{Context, Result};
use headshot_studio::ai::GeminiImageClient;
use headshot_studio::cli::setup_logging;
use headshot_studio::function::{handle_event, FunctionEvent};
use headshot_studio::models::Config;
use headshot_studio::web::AppState;
use std::io::{Read, Write};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging(std::env::var_os("HEADSHOT_DEBUG").is_some());

    let mut input = String::new();
    std::io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read function event from stdin")?;
    let event: FunctionEvent =
        serde_json::from_str(&input).context("Failed to parse function event")?;

    let config = Config::from_env();
    let state = AppState::new(Arc::new(GeminiImageClient::from_config(&config)));

    let response = handle_event(state, event).await;

    let mut stdout = std::io::stdout().lock();
    serde_json::to_writer(&mut stdout, &response)?;
    stdout.write_all(b"\n")?;
    Ok(())
}
