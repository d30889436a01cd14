use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use arena_ranking::api::{build_router, state::AppState};
use arena_ranking::calculate::{RankingAggregator, WinrateCalculator};
use arena_ranking::config::AppConfig;
use arena_ranking::storage::{ImportData, SqliteRepository};

#[derive(Parser)]
#[command(name = "arena-ranking")]
#[command(about = "Ranking and winrate backend for a 1v1 arena ladder")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Database URL (overrides config)
    #[arg(long)]
    database_url: Option<String>,

    /// Log level (trace, debug, info, warn, error); overrides config
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Host to bind to (overrides config)
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },

    /// Create database tables
    InitDb,

    /// Load profiles and matches from a JSON file
    Import {
        /// Path to the import file
        path: PathBuf,
    },

    /// Recompute every stored winrate
    Recompute,

    /// Recompute one user's winrate
    UpdateWinrate {
        /// Exact (case-sensitive) user name
        name: String,
    },

    /// Print the ranking board
    Rankings,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(&cli.config)?;
    if let Some(url) = cli.database_url {
        config.database.url = url;
    }
    if let Some(level) = cli.log_level {
        config.log_level = level;
    }

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting arena-ranking v{}", env!("CARGO_PKG_VERSION"));

    let repo = SqliteRepository::connect(&config.database.url, config.database.max_connections)
        .await?;
    repo.migrate().await?;
    let repo = Arc::new(repo);

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            config.validate()?;

            let addr = format!("{}:{}", config.server.host, config.server.port);
            let app = build_router(AppState::new(repo, config));
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
        Commands::InitDb => {
            tracing::info!("Database ready at {}", config.database.url);
        }
        Commands::Import { path } => {
            let data = ImportData::from_file(&path)?;
            let (profiles, matches) = repo.import(data).await?;
            println!("Imported {} profiles and {} matches", profiles, matches);
        }
        Commands::Recompute => {
            let calculator = WinrateCalculator::new(repo);
            for update in calculator.update_all_winrates().await? {
                println!("{:<24} {:>6.2}%", update.name, update.winrate);
            }
        }
        Commands::UpdateWinrate { name } => {
            let update = WinrateCalculator::new(repo).update_winrate(&name).await?;
            println!("{:<24} {:>6.2}%", update.name, update.winrate);
        }
        Commands::Rankings => {
            let aggregator = RankingAggregator::new(
                repo,
                config.ranking.tier_order(),
                config.ranking.top_limit,
            );
            for group in aggregator.rankings().await? {
                println!("{:<16} {}", group.display_tier, group.joined_names());
            }
        }
    }

    Ok(())
}
