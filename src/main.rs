// src/main.rs

use anyhow::Result;
use appdex::catalog::CatalogStore;
use appdex::db::models::SubCategory;
use appdex::resolve::{MetadataResolver, ResolverConfig};
use clap::{Parser, Subcommand};
use tracing::info;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "appdex")]
#[command(author, version, about = "App catalog with fallback metadata resolution from the Play Store", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize the Appdex catalog database
    Init {
        /// Database path (default: /var/lib/appdex/appdex.db)
        #[arg(short, long, default_value = "/var/lib/appdex/appdex.db")]
        db_path: String,
    },
    /// Resolve metadata for a package id or Play Store URL (no insert)
    Resolve {
        /// Package id (e.g. com.example.app) or store URL
        input: String,
    },
    /// Resolve metadata and add the record to the catalog
    Add {
        /// Package id (e.g. com.example.app) or store URL
        input: String,
        /// Database path (default: /var/lib/appdex/appdex.db)
        #[arg(short, long, default_value = "/var/lib/appdex/appdex.db")]
        db_path: String,
        /// Comma-separated tags for the new record
        #[arg(short, long)]
        tags: Option<String>,
        /// Sub-category label (Action, RPG, Strategy, Social, Productivity, Utilities)
        #[arg(short, long, default_value = "Action")]
        sub_category: String,
    },
    /// List catalog records in insertion order
    List {
        /// Database path (default: /var/lib/appdex/appdex.db)
        #[arg(short, long, default_value = "/var/lib/appdex/appdex.db")]
        db_path: String,
    },
    /// List catalog records newest-first by update date
    Latest {
        /// Database path (default: /var/lib/appdex/appdex.db)
        #[arg(short, long, default_value = "/var/lib/appdex/appdex.db")]
        db_path: String,
    },
    /// Search the catalog by name, package id, or developer
    Search {
        /// Search query
        query: String,
        /// Database path (default: /var/lib/appdex/appdex.db)
        #[arg(short, long, default_value = "/var/lib/appdex/appdex.db")]
        db_path: String,
    },
    /// Show a single catalog record as JSON
    Show {
        /// Record id
        id: String,
        /// Database path (default: /var/lib/appdex/appdex.db)
        #[arg(short, long, default_value = "/var/lib/appdex/appdex.db")]
        db_path: String,
    },
}

fn print_record_line(record: &appdex::db::models::AppRecord) {
    println!(
        "  [{}] {} {} by {} ({}, updated {})",
        record.id,
        record.name,
        record.current_version,
        record.developer,
        record.package_id,
        record.updated_date
    );
}

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init { db_path }) => {
            info!("Initializing Appdex database at: {}", db_path);
            appdex::db::init(&db_path)?;
            println!("Database initialized successfully at: {}", db_path);
            Ok(())
        }
        Some(Commands::Resolve { input }) => {
            let resolver = MetadataResolver::new(&ResolverConfig::from_env())?;
            let draft = resolver.resolve(&input);

            println!("{}", serde_json::to_string_pretty(&draft)?);
            Ok(())
        }
        Some(Commands::Add {
            input,
            db_path,
            tags,
            sub_category,
        }) => {
            let sub_category: SubCategory = sub_category
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))?;

            let resolver = MetadataResolver::new(&ResolverConfig::from_env())?;
            let draft = resolver.resolve(&input);

            let tags: Vec<String> = tags
                .map(|t| {
                    t.split(',')
                        .map(|tag| tag.trim().to_string())
                        .filter(|tag| !tag.is_empty())
                        .collect()
                })
                .unwrap_or_default();

            // Versions are uploaded through the admin workflow later; a
            // record with no versions is simply not yet downloadable
            let record = draft.finalize(
                Uuid::new_v4().to_string(),
                sub_category,
                tags,
                Vec::new(),
            );

            let mut store = CatalogStore::load(&db_path)?;
            let id = record.id.clone();
            let name = record.name.clone();
            store.insert(record);

            println!("Added '{}' to catalog with id {}", name, id);
            Ok(())
        }
        Some(Commands::List { db_path }) => {
            let store = CatalogStore::load(&db_path)?;
            let records = store.list();

            if records.is_empty() {
                println!("Catalog is empty.");
            } else {
                println!("Catalog records:");
                for record in records {
                    print_record_line(record);
                }
                println!("\nTotal: {} record(s)", records.len());
            }

            Ok(())
        }
        Some(Commands::Latest { db_path }) => {
            let store = CatalogStore::load(&db_path)?;
            let records = store.list_latest_first();

            println!("Catalog records (newest first):");
            for record in &records {
                print_record_line(record);
            }
            println!("\nTotal: {} record(s)", records.len());

            Ok(())
        }
        Some(Commands::Search { query, db_path }) => {
            let store = CatalogStore::load(&db_path)?;
            let matches = store.search(&query);

            if matches.is_empty() {
                println!("No records match '{}'.", query);
            } else {
                println!("Matching records:");
                for record in &matches {
                    print_record_line(record);
                }
                println!("\nTotal: {} match(es)", matches.len());
            }

            Ok(())
        }
        Some(Commands::Show { id, db_path }) => {
            let store = CatalogStore::load(&db_path)?;
            let record = store
                .get_by_id(&id)
                .ok_or_else(|| appdex::Error::NotFoundError(format!("Record '{}'", id)))?;

            println!("{}", serde_json::to_string_pretty(record)?);
            Ok(())
        }
        None => {
            // No command provided, show help
            println!("Appdex App Catalog v{}", env!("CARGO_PKG_VERSION"));
            println!("Run 'appdex --help' for usage information");
            Ok(())
        }
    }
}
