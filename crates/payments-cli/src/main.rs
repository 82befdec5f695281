//! # bloque-checkout
//!
//! Replay checkout UI events without a browser.
//!
//! ## Usage
//!
//! ```bash
//! # Optional: checkout config (TOML)
//! export BLOQUE_CHECKOUT_CONFIG=config/checkout.toml
//!
//! bloque-checkout --pretty script.json
//! ```

use clap::Parser;
use payments_cli::{load_script, run_script, HostSettings};
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON array of UI events
    script: PathBuf,

    /// Checkout configuration (TOML)
    #[arg(long, env = "BLOQUE_CHECKOUT_CONFIG")]
    config: Option<PathBuf>,

    /// Two-digit year for the card expiry check
    #[arg(long, env = "BLOQUE_CHECKOUT_YEAR")]
    current_year: Option<u32>,

    /// Pretty-print the summary
    #[arg(long)]
    pretty: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Logs go to stderr, stdout carries the summary
    tracing_subscriber::registry()
        .with(cli.log_json.then(|| fmt::layer().json().with_writer(std::io::stderr)))
        .with((!cli.log_json).then(|| fmt::layer().with_writer(std::io::stderr)))
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    let settings = HostSettings::from_env()
        .with_config_path(cli.config)
        .with_current_year(cli.current_year);

    let config = settings.checkout_config()?;
    let steps = load_script(&cli.script)?;

    let summary = run_script(config, &steps, settings.current_year).await?;
    info!(
        session = %summary.session_id,
        state = %summary.state,
        "replay finished"
    );

    let output = if cli.pretty {
        serde_json::to_string_pretty(&summary)?
    } else {
        serde_json::to_string(&summary)?
    };
    println!("{}", output);

    Ok(())
}
