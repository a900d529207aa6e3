//! CLI parser and logging setup shared by both binaries.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "headshot-studio")]
#[command(about = "Serve the headshot transform API")]
pub struct CliOptions {
    /// Enable debug logging. Env: HEADSHOT_DEBUG
    #[arg(long, env = "HEADSHOT_DEBUG")]
    pub debug: bool,

    /// Listen address. Env: HEADSHOT_LISTEN_ADDRESS
    #[arg(long, short, default_value = "127.0.0.1", env = "HEADSHOT_LISTEN_ADDRESS")]
    pub listen_address: String,

    /// Listen port. Env: HEADSHOT_PORT
    #[arg(long, short, default_value_t = 3000, env = "HEADSHOT_PORT")]
    pub port: u16,

    /// Directory of browser assets served for unmatched paths.
    /// Env: HEADSHOT_STATIC_DIR
    #[arg(long, default_value = "public", env = "HEADSHOT_STATIC_DIR")]
    pub static_dir: PathBuf,
}

/// Installs the global subscriber. `RUST_LOG` overrides the default filter.
///
/// Output goes to stderr so the function binary can keep stdout for its
/// response document.
pub fn setup_logging(debug: bool) {
    let default_filter = if debug {
        "headshot_studio=debug,tower_http=debug"
    } else {
        "headshot_studio=info,tower_http=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
