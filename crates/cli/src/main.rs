//! `learner-recover`: entry point. Parses the top-level subcommand,
//! initializes `tracing-subscriber`, and maps any error surfacing from
//! a command into a process exit code — commands return `anyhow::Result`
//! and never call `std::process::exit` themselves.

mod commands;
mod exit_error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use exit_error::ExitError;

#[derive(Parser)]
#[command(name = "learner-recover", about = "Cluster rescue tool for a TiKV/PD deployment reduced to learners")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the unsafe-recovery orchestrator (Core A).
    Recover {
        #[arg(short = 'c', long = "config")]
        config: PathBuf,
    },
    /// Run the RPO sampling scheduler (Core B).
    Rpo {
        #[arg(short = 'c', long = "config")]
        config: PathBuf,
    },
    /// Run the metadata fetcher standalone.
    Fetch {
        #[arg(short = 'c', long = "config")]
        config: PathBuf,
    },
    /// Print the build version.
    Version,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Recover { config } => commands::recover::run(&config).await,
        Commands::Rpo { config } => commands::rpo::run(&config).await,
        Commands::Fetch { config } => commands::fetch::run(&config).await,
        Commands::Version => commands::version::run(),
    };

    if let Err(err) = result {
        let code = err
            .downcast_ref::<ExitError>()
            .map(|e| e.code)
            .unwrap_or(1);
        tracing::error!(error = %err, "learner-recover exited with an error");
        std::process::exit(code);
    }
}
