//! Main entry point for the order sync service.
//!
//! Loads the configuration, assembles the sync engine from the configured
//! storage and connector implementations, and serves the HTTP API.

use clap::Parser;
use order_config::Config;
use order_service::{build_engine_from_config, start_server};
use std::path::PathBuf;
use std::sync::Arc;

/// Command-line arguments for the order sync service.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config/demo.toml")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	// Initialize tracing with env filter
	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	fmt()
		.with_env_filter(env_filter)
		.with_thread_ids(true)
		.with_target(true)
		.init();

	tracing::info!("Started order sync");

	let config = Config::from_file(&args.config).await?;
	tracing::info!("Loaded configuration [{}]", config.service.id);

	let api_config = config.api.clone();
	let engine = Arc::new(build_engine_from_config(config)?);

	tokio::select! {
		result = start_server(api_config, engine) => {
			tracing::info!("API server finished");
			result?;
		}
		_ = tokio::signal::ctrl_c() => {
			tracing::info!("Shutting down");
		}
	}

	tracing::info!("Stopped order sync");
	Ok(())
}
