//! CLI binary for scout.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use scout::{ScoutConfig, ScoutError};
use scout_search::{
    Aggregator, Coordinates, EntityType, FetchParams, ProviderRegistry, ProviderSelection,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Search people across public sources and print normalized JSON.
#[derive(Parser)]
#[command(name = "scout", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Query providers and print the normalized entities.
    Search {
        /// Free-text query.
        query: String,

        /// Only query this provider (repeatable). Defaults to all.
        #[arg(short, long = "provider", value_name = "NAME")]
        providers: Vec<String>,

        /// Only query providers that can produce this entity type.
        #[arg(short = 't', long = "type", value_name = "TYPE")]
        entity_type: Option<EntityType>,

        /// Requested result count per provider (clamped per provider).
        #[arg(short, long)]
        limit: Option<usize>,

        /// Reference point for distances, as LAT,LON.
        #[arg(long, value_name = "LAT,LON", allow_hyphen_values = true)]
        near: Option<Coordinates>,

        /// Group output by provider instead of one flat list.
        #[arg(long)]
        grouped: bool,

        /// Pretty-print JSON.
        #[arg(long)]
        pretty: bool,
    },

    /// List registered providers and their capabilities.
    Providers,

    /// Print the effective configuration as TOML.
    Config {
        /// Save the effective configuration to the config path.
        #[arg(long)]
        write: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = match ScoutConfig::load(cli.config.as_deref()) {
        // `config --write` may create the file it is pointed at.
        Err(ScoutError::Io(e))
            if e.kind() == std::io::ErrorKind::NotFound
                && matches!(cli.command, Command::Config { write: true }) =>
        {
            ScoutConfig::default()
        }
        loaded => loaded?,
    };

    // stdout is reserved for results; diagnostics go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .init();

    match cli.command {
        Command::Search {
            query,
            providers,
            entity_type,
            limit,
            near,
            grouped,
            pretty,
        } => {
            let mut params = FetchParams::new(query);
            if let Some(limit) = limit {
                params = params.with_limit(limit);
            }
            if let Some(near) = near {
                params = params.with_location(near);
            }
            let selection = if providers.is_empty() {
                ProviderSelection::All
            } else {
                ProviderSelection::Named(providers)
            };
            let output = SearchOutput {
                params,
                selection,
                entity_type,
                grouped,
                pretty: pretty || config.output.pretty,
            };
            run_search(&config, output).await
        }
        Command::Providers => list_providers(&config),
        Command::Config { write } => show_config(&config, cli.config, write),
    }
}

struct SearchOutput {
    params: FetchParams,
    selection: ProviderSelection,
    entity_type: Option<EntityType>,
    grouped: bool,
    pretty: bool,
}

async fn run_search(config: &ScoutConfig, output: SearchOutput) -> anyhow::Result<()> {
    let aggregator = Aggregator::from_config(&config.search)?;

    if output.grouped {
        let groups = aggregator
            .fetch_grouped(&output.selection, &output.params, output.entity_type)
            .await;
        let mut by_provider = serde_json::Map::new();
        for group in groups {
            by_provider.insert(group.provider, serde_json::to_value(group.entities)?);
        }
        print_json(&by_provider, output.pretty)
    } else {
        let entities = aggregator
            .fetch_entities(&output.selection, &output.params, output.entity_type)
            .await;
        tracing::info!(count = entities.len(), "search finished");
        print_json(&entities, output.pretty)
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> anyhow::Result<()> {
    let json = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{json}");
    Ok(())
}

fn list_providers(config: &ScoutConfig) -> anyhow::Result<()> {
    let registry = ProviderRegistry::from_config(&config.search)?;
    for provider in registry.iter() {
        let capabilities: Vec<&str> = provider
            .capabilities()
            .iter()
            .map(EntityType::as_str)
            .collect();
        println!("{:<8} {}", provider.name(), capabilities.join(", "));
    }
    Ok(())
}

fn show_config(config: &ScoutConfig, path: Option<PathBuf>, write: bool) -> anyhow::Result<()> {
    if write {
        let path = path.unwrap_or_else(ScoutConfig::default_config_path);
        config.save_to_file(&path)?;
        println!("Wrote {}", path.display());
    } else {
        print!("{}", config.to_toml()?);
    }
    Ok(())
}
