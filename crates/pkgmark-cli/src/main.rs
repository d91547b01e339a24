use anyhow::Context;
use clap::Parser;
use pkgmark_core::{providers::NpmsProvider, Config, FavoritesStore};
use pkgmark_storage::{KeyValueStore, MemoryStore, SqliteStore};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "pkgmark")]
#[command(version, about = "Search npm packages and keep annotated favorites", long_about = None)]
struct Cli {
    /// Config file (default: <config dir>/pkgmark/config.toml)
    #[arg(long, global = true, env = "PKGMARK_CONFIG")]
    config: Option<PathBuf>,

    /// Favorites database file, overrides the config
    #[arg(long, global = true, env = "PKGMARK_DB")]
    db: Option<PathBuf>,

    /// Keep favorites in memory only, nothing touches disk
    #[arg(long, global = true, conflicts_with = "db")]
    ephemeral: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Search the npm registry
    Search {
        /// Search query
        query: String,
        /// Max results (default from config)
        #[arg(short, long)]
        limit: Option<u32>,
    },
    /// Add a package to favorites
    Add {
        /// Package name
        name: String,
        /// Why you care about it
        #[arg(short, long, default_value = "")]
        reason: String,
    },
    /// List favorites in the order they were added
    List {
        /// Show each favorite's reason
        #[arg(short, long)]
        reasons: bool,
    },
    /// Remove a package from favorites, along with its reason
    Remove {
        /// Package name
        name: String,
        /// Leave the stored reason in place
        #[arg(long)]
        keep_reason: bool,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// View or edit the reason attached to a package
    Reason {
        #[command(subcommand)]
        action: ReasonAction,
    },
}

#[derive(clap::Subcommand)]
enum ReasonAction {
    /// Print the reason
    Show { name: String },
    /// Replace the reason
    Set { name: String, reason: String },
    /// Delete the reason
    Clear { name: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pkgmark=info,pkgmark_core=warn,pkgmark_api=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    }
    .context("Failed to load config")?;

    let backend: Box<dyn KeyValueStore> = if cli.ephemeral {
        tracing::debug!("Using in-memory storage");
        Box::new(MemoryStore::new())
    } else {
        let db_path = match cli.db {
            Some(path) => path,
            None => config.db_path()?,
        };
        let store = SqliteStore::open(&db_path)
            .with_context(|| format!("Failed to open favorites at {}", db_path.display()))?;
        Box::new(store)
    };
    let favorites = FavoritesStore::new(backend);

    let mut stdout = std::io::stdout().lock();

    match cli.command {
        Commands::Search { query, limit } => {
            tracing::debug!("Searching for: {}", query);
            let client = config.npms_client();
            tracing::debug!("Using registry {}", client.base_url());
            let provider = NpmsProvider::new(client);
            let limit = limit.unwrap_or(config.registry.page_size);
            commands::search(&favorites, &provider, &query, limit, &mut stdout).await?;
        }
        Commands::Add { name, reason } => {
            commands::add(&favorites, &name, &reason, &mut stdout)?;
        }
        Commands::List { reasons } => {
            commands::list(&favorites, reasons, &mut stdout)?;
        }
        Commands::Remove {
            name,
            keep_reason,
            yes,
        } => {
            let mut stdin = std::io::stdin().lock();
            commands::remove(&favorites, &name, keep_reason, yes, &mut stdin, &mut stdout)?;
        }
        Commands::Reason { action } => match action {
            ReasonAction::Show { name } => commands::show_reason(&favorites, &name, &mut stdout)?,
            ReasonAction::Set { name, reason } => {
                commands::set_reason(&favorites, &name, &reason, &mut stdout)?
            }
            ReasonAction::Clear { name } => commands::clear_reason(&favorites, &name, &mut stdout)?,
        },
    }

    Ok(())
}
