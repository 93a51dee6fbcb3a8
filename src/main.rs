//! feedgraph - Request-scoped feed resolution
//!
//! Main entry point for the feedgraph CLI.

use anyhow::Context;
use clap::{Parser, Subcommand};
use feedgraph::config::{validate_config, FeedGraphConfig};
use feedgraph::{FeedGraphError, QueryEngine};
use feedstore::MemoryDb;
use std::io::Read;
use std::path::PathBuf;
use std::process;
use std::sync::Arc;

/// feedgraph - Resolve feed queries against a record snapshot
#[derive(Parser, Debug)]
#[command(name = "feedgraph")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to config file (default: ~/.config/feedgraph/config.yaml)
    #[arg(short, long, env = "FEEDGRAPH_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default configuration file
    Init,

    /// Run one query and print the JSON response
    Query {
        /// Snapshot file to load (overrides store.path)
        #[arg(long)]
        db: Option<PathBuf>,

        /// Query document as YAML or JSON, e.g. "{tweets: [id, body]}"
        #[arg(short, long, conflicts_with = "file")]
        query: Option<String>,

        /// Read the query document from a file (stdin if neither is given)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Print Prometheus metrics to stderr after the response
        #[arg(long)]
        metrics: bool,
    },

    /// Validate the configuration file
    Validate,
}

#[tokio::main]
async fn main() {
    // Initialize logging
    if let Err(e) = feedgraph::logging::init() {
        eprintln!("Failed to initialize logging: {}", e);
    }

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

async fn run(cli: Cli) -> feedgraph::Result<()> {
    match cli.command {
        Commands::Init => handle_init_command(&cli.config),

        Commands::Validate => {
            let config = load_config(&cli.config)?;
            handle_validate_command(&config)
        }

        Commands::Query {
            db,
            query,
            file,
            metrics,
        } => {
            let config = load_config(&cli.config)?;
            tracing::info!(store = %config.store.path.display(), "Configuration loaded");

            let db_path = db.unwrap_or_else(|| config.store.path.clone());
            let store = MemoryDb::load(&db_path)
                .with_context(|| format!("Failed to load snapshot {}", db_path.display()))?;
            let engine = QueryEngine::from_config(Arc::new(store), &config)?;

            let document = read_query(query, file)?;
            let response = engine.run_str(&document).await?;

            let output = if config.output.pretty {
                serde_json::to_string_pretty(&response)?
            } else {
                serde_json::to_string(&response)?
            };
            println!("{}", output);

            if metrics {
                eprintln!("{}", feedgraph::metrics::encode_metrics()?);
            }

            Ok(())
        }
    }
}

/// Load the config named on the command line, or the default one
///
/// A missing default config is not an error; every setting has a default.
fn load_config(config_path: &Option<String>) -> feedgraph::Result<FeedGraphConfig> {
    if let Some(path) = config_path {
        return FeedGraphConfig::load(path);
    }

    match FeedGraphConfig::load_default() {
        Ok(config) => Ok(config),
        Err(FeedGraphError::Config(msg)) if msg.contains("Config file not found") => {
            tracing::debug!("No configuration file, using defaults");
            Ok(FeedGraphConfig::default())
        }
        Err(e) => Err(e),
    }
}

fn read_query(query: Option<String>, file: Option<PathBuf>) -> feedgraph::Result<String> {
    if let Some(query) = query {
        return Ok(query);
    }

    if let Some(path) = file {
        let document = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read query file {}", path.display()))?;
        return Ok(document);
    }

    let mut document = String::new();
    std::io::stdin().read_to_string(&mut document)?;
    if document.trim().is_empty() {
        return Err(FeedGraphError::InvalidQuery(
            "No query given; use --query, --file or pipe one on stdin".to_string(),
        ));
    }
    Ok(document)
}

fn handle_init_command(config_path: &Option<String>) -> feedgraph::Result<()> {
    let config_file = if let Some(path) = config_path {
        PathBuf::from(path)
    } else {
        FeedGraphConfig::default_path()
    };

    // Check if already initialized
    if config_file.exists() {
        println!("Configuration already exists at {}", config_file.display());
        return Ok(());
    }

    let config = FeedGraphConfig::new();
    config.save(&config_file)?;

    println!("✓ Created configuration at {}", config_file.display());
    println!();
    println!("Next steps:");
    println!("  1. Point store.path at a JSON snapshot (default: db.json)");
    println!("  2. Run a query:");
    println!("     feedgraph query --query '{{tweets: [id, body, favoriteCount]}}'");

    Ok(())
}

fn handle_validate_command(config: &FeedGraphConfig) -> feedgraph::Result<()> {
    match validate_config(config) {
        Ok(()) => {
            println!("✓ Configuration is valid");
            Ok(())
        }
        Err(errors) => {
            println!("Configuration has {} problem(s):", errors.len());
            for error in &errors {
                println!("  - {}", error);
            }
            Err(FeedGraphError::Config(format!(
                "{} validation error(s)",
                errors.len()
            )))
        }
    }
}
