//! Main entry point for the bill counter.
//!
//! Loads the configuration, builds the order state manager on the configured
//! storage backend and runs an interactive session on stdin/stdout.

use bill_config::Config;
use bill_core::{OrderStateManager, StateBuilder, StateFactories};
use bill_storage::{get_all_implementations, StorageFactory};
use clap::Parser;
use std::collections::HashMap;
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};

mod session;

use session::{Command, Session};

/// Command-line arguments for the bill counter.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
	/// Path to configuration file
	#[arg(short, long, default_value = "config.toml", env = "BILL_CONFIG")]
	config: PathBuf,

	/// Log level (trace, debug, info, warn, error)
	#[arg(short, long, default_value = "info")]
	log_level: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	use tracing_subscriber::{fmt, EnvFilter};

	let env_filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

	// Logs go to stderr so they never interleave with the session output
	fmt()
		.with_env_filter(env_filter)
		.with_target(true)
		.with_writer(std::io::stderr)
		.init();

	let config = Config::from_file(&args.config).await?;
	tracing::info!("Loaded configuration [{}]", config.app.id);

	let manager = build_state(config).await?;
	run_session(Session::new(manager)).await?;

	tracing::info!("Stopped bill counter");
	Ok(())
}

/// Builds the order state manager with every registered storage backend.
async fn build_state(config: Config) -> Result<OrderStateManager, Box<dyn std::error::Error>> {
	let storage_factories: HashMap<String, StorageFactory> = get_all_implementations()
		.into_iter()
		.map(|(name, factory)| (name.to_string(), factory))
		.collect();

	Ok(StateBuilder::new(config)
		.build(StateFactories { storage_factories })
		.await?)
}

/// Reads commands from stdin until `quit` or end of input.
async fn run_session(mut session: Session) -> std::io::Result<()> {
	println!("{}", session::render(session.manager()));

	let mut lines = BufReader::new(tokio::io::stdin()).lines();
	while let Some(line) = lines.next_line().await? {
		let command = match Command::parse(&line) {
			Ok(command) => command,
			Err(e) => {
				println!("{}", e);
				continue;
			},
		};
		if command == Command::Quit {
			break;
		}
		match session.execute(command).await {
			Ok(output) => println!("{}\n", output),
			Err(e) => println!("{}", e),
		}
	}
	Ok(())
}
