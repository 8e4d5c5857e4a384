use anyhow::{Context, Result};
use clap::Parser;
use ninjadorks::config::{load_config, DEFAULT_CONFIG_FILE};
use ninjadorks::generator::DorkGenerator;
use ninjadorks::ui::{print_status, Spinner, Status};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Generate a Google dork from a plain-language description using a local model
#[derive(Parser, Debug)]
#[command(name = "dorkgen")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Generate a Google dork from a description using a local language model", long_about = None)]
struct Cli {
    /// What the dork should find (e.g. "SQL dumps containing passwords")
    description: String,

    /// Model to run (overrides generator.model)
    #[arg(long)]
    model: Option<String>,

    /// Ollama server URL (overrides generator.endpoint)
    #[arg(long)]
    endpoint: Option<String>,

    /// Generation timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Enable verbose logging (can be used multiple times: -v, -vv)
    #[arg(long, short, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Configuration file path
    #[arg(long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| format!("ninjadorks={0},dorkgen={0}", log_level)),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut settings = load_config(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?
        .generator;
    if let Some(model) = cli.model {
        settings.model = model;
    }
    if let Some(endpoint) = cli.endpoint {
        settings.endpoint = endpoint;
    }
    if let Some(timeout) = cli.timeout {
        settings.timeout_secs = timeout;
    }

    let generator = DorkGenerator::from_config(&settings).context("Failed to set up generator")?;

    let spinner = Spinner::new(&format!("Asking {} for a dork...", generator.model()));
    match generator.generate(&cli.description).await {
        Ok(dork) => {
            spinner.finish();
            println!("{}", dork);
            Ok(())
        }
        Err(e) => {
            spinner.finish_with_error("No dork generated");
            tracing::error!(error = %e, model = %settings.model, "Dork generation failed");
            print_status(Status::Error, &format!("Could not generate a dork: {}", e));
            std::process::exit(1);
        }
    }
}
