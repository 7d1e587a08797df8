mod browse;
mod memory;

use std::sync::Arc;

use anyhow::Context;
use carefind_browse::{BrowseSession, FacilityCatalog};
use carefind_client::FacilityClient;
use carefind_core::{AppConfig, Facility, PREFECTURES, SERVICE_OPTIONS};
use carefind_store::{FileStore, KeyValueStore};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::browse::BrowseArgs;
use crate::memory::{FavoritesCommands, HistoryCommands, SavedCommands};

#[derive(Debug, Parser)]
#[command(name = "carefind")]
#[command(about = "Browse and filter care facility listings")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch facilities and list the ones matching the given filters
    Browse(BrowseArgs),
    /// Show one facility fetched directly from the API
    Show {
        /// Facility id
        id: i64,
    },
    /// Recent free-text searches
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },
    /// Named saved searches
    Saved {
        #[command(subcommand)]
        command: SavedCommands,
    },
    /// Favorite facilities
    Favorites {
        #[command(subcommand)]
        command: FavoritesCommands,
    },
    /// List the service-type filter choices
    Services,
    /// List the prefecture filter choices
    Prefectures,
    /// Remove corrupt values from the local store
    Sanitize {
        /// Keys to leave untouched (repeatable)
        #[arg(long)]
        keep: Vec<String>,
    },
    /// Check that the facility API is reachable
    Health,
}

fn init_tracing(config: &AppConfig) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

/// Builds a session over the HTTP client and the file-backed store.
fn open_session(
    config: &AppConfig,
    store: Arc<dyn KeyValueStore>,
) -> anyhow::Result<BrowseSession<FacilityClient>> {
    let client = FacilityClient::from_config(config).context("failed to build facility client")?;
    Ok(BrowseSession::new(FacilityCatalog::new(client), store))
}

/// Print facilities as a fixed-width table, marking favorites with `★`.
pub(crate) fn print_facilities<'a>(
    facilities: impl IntoIterator<Item = &'a Facility>,
    is_favorite: impl Fn(i64) -> bool,
) {
    println!("{:<3}{:<7}{:<9}{:<28}{:<24}LOCATION", "", "ID", "MON-SUN", "NAME", "SERVICE");
    let mut count = 0_usize;
    for facility in facilities {
        let mark = if is_favorite(facility.id) { "★" } else { "" };
        println!(
            "{:<3}{:<7}{:<9}{:<28}{:<24}{}",
            mark,
            facility.id,
            facility.availability.badges(),
            truncate(&facility.name, 24),
            truncate(&facility.service_type, 20),
            facility.location
        );
        count += 1;
    }
    println!("{count} facilities");
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() > max_chars {
        format!("{}...", text.chars().take(max_chars).collect::<String>())
    } else {
        text.to_string()
    }
}

fn print_facility_detail(facility: &Facility) {
    println!("{} (id {})", facility.name, facility.id);
    println!("  service:   {}", facility.service_type);
    println!("  location:  {}", facility.location);
    if !facility.description.is_empty() {
        println!("  about:     {}", facility.description);
    }
    for (label, value) in [
        ("phone", &facility.phone),
        ("email", &facility.email),
        ("website", &facility.website),
        ("hours", &facility.operating_hours),
        ("capacity", &facility.capacity),
    ] {
        if let Some(value) = value {
            println!("  {label:<10} {value}");
        }
    }
    if let Some(rating) = facility.rating {
        println!(
            "  rating:    {rating:.1} ({} reviews)",
            facility.reviews.unwrap_or(0)
        );
    }
    let days: String = facility
        .availability
        .iter()
        .map(|(day, status)| format!("{}{} ", day.label(), status.symbol()))
        .collect();
    println!("  days:      {}", days.trim_end());
    if !facility.services.is_empty() {
        println!("  offers:    {}", facility.services.join(", "));
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("carefind: run `carefind --help` for commands");
        return Ok(());
    };

    let config = carefind_core::load_app_config().context("failed to load configuration")?;
    init_tracing(&config)?;

    let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::new(config.store_path.clone()));
    tracing::debug!(env = %config.env, store = %config.store_path.display(), "starting");

    match command {
        Commands::Browse(args) => {
            let mut session = open_session(&config, store)?;
            browse::run_browse(&mut session, &args).await;
        }
        Commands::Show { id } => {
            let client =
                FacilityClient::from_config(&config).context("failed to build facility client")?;
            let facility = client
                .get_facility(id)
                .await
                .with_context(|| format!("failed to fetch facility {id}"))?;
            print_facility_detail(&facility);
        }
        Commands::History { command } => memory::run_history(store, &command),
        Commands::Saved { command } => {
            let mut session = open_session(&config, store)?;
            memory::run_saved(&mut session, &command).await?;
        }
        Commands::Favorites { command } => {
            let mut session = open_session(&config, store)?;
            memory::run_favorites(&mut session, &command).await;
        }
        Commands::Services => {
            for option in SERVICE_OPTIONS {
                println!("{:<24}{}", option.key, option.label);
            }
        }
        Commands::Prefectures => {
            for prefecture in PREFECTURES {
                println!("{prefecture}");
            }
        }
        Commands::Sanitize { keep } => {
            let keep: Vec<&str> = keep.iter().map(String::as_str).collect();
            let removed = carefind_store::sanitize(store.as_ref(), &keep)
                .context("failed to rewrite the local store")?;
            if removed.is_empty() {
                println!("store is clean");
            } else {
                println!("removed {} corrupt keys: {}", removed.len(), removed.join(", "));
            }
        }
        Commands::Health => {
            let client =
                FacilityClient::from_config(&config).context("failed to build facility client")?;
            let body = client.health().await.context("facility API health check failed")?;
            println!("{}", serde_json::to_string_pretty(&body)?);
        }
    }

    Ok(())
}
