//! # hypertext CLI
//!
//! Command-line interface for the hypertext static site generator.

mod commands;

use clap::{Parser, Subcommand};
use hypertext_core::config::CONFIG_FILENAME;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hx")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = CONFIG_FILENAME)]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the directory layout and a starter page
    Init {
        /// Target directory (defaults to current directory)
        path: Option<PathBuf>,
    },

    /// Build the static site
    Build {
        /// Print the build report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Build, then serve the output directory
    Serve {
        /// Server port (overrides the config)
        #[arg(long)]
        port: Option<u16>,

        /// Rebuild when sources change
        #[arg(long)]
        watch: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match cli.command {
        Commands::Init { path } => commands::init_project(path.as_deref()),
        Commands::Build { json } => commands::build_site(&cli.config, json),
        Commands::Serve { port, watch } => commands::serve_site(&cli.config, port, watch).await,
    }
}
