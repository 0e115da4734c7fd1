// src/catalog/mod.rs

//! Catalog store for finalized app records
//!
//! The store owns the ordered in-memory collection and its SQLite backing.
//! The whole collection is persisted as one JSON blob under a versioned
//! storage key; reads and writes never touch individual records. The store
//! favors availability of the current session over durability: a failed
//! write is logged and the in-memory state stays authoritative.

use crate::db;
use crate::db::models::{seed_catalog, AppRecord};
use crate::error::Result;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension};
use tracing::{debug, info, warn};

/// Well-known storage key for the serialized catalog collection.
/// The version suffix changes when the record layout does; an old blob
/// under a stale key is simply abandoned in favor of the seed collection.
pub const STORAGE_KEY: &str = "catalog_v1";

/// Owned catalog store with single-writer discipline
pub struct CatalogStore {
    conn: Connection,
    records: Vec<AppRecord>,
}

impl CatalogStore {
    /// Open the database at `db_path` and load the catalog collection
    pub fn load(db_path: &str) -> Result<Self> {
        let conn = db::open(db_path)?;
        Ok(Self::from_connection(conn))
    }

    /// Load the catalog collection from an already-open connection
    ///
    /// A missing or unreadable blob initializes the collection from the
    /// fixed seed catalog; corrupt data never aborts initialization.
    pub fn from_connection(conn: Connection) -> Self {
        let records = read_collection(&conn);
        Self { conn, records }
    }

    /// Full collection in insertion order (newest insertions first)
    pub fn list(&self) -> &[AppRecord] {
        &self.records
    }

    /// Copy of the collection ordered by descending update date
    ///
    /// Stable for equal dates; records with unparseable dates sort last.
    pub fn list_latest_first(&self) -> Vec<AppRecord> {
        let mut sorted = self.records.clone();
        sorted.sort_by(|a, b| parse_date(&b.updated_date).cmp(&parse_date(&a.updated_date)));
        sorted
    }

    /// Look up a record by its catalog id
    pub fn get_by_id(&self, id: &str) -> Option<&AppRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Case-insensitive substring search over name, package id, and
    /// developer; results keep collection order
    pub fn search(&self, query: &str) -> Vec<&AppRecord> {
        let needle = query.to_lowercase();
        self.records
            .iter()
            .filter(|record| {
                record.name.to_lowercase().contains(&needle)
                    || record.package_id.to_lowercase().contains(&needle)
                    || record.developer.to_lowercase().contains(&needle)
            })
            .collect()
    }

    /// Prepend a finalized record and persist the whole collection
    ///
    /// The record must already carry its id and versions; nothing is
    /// assigned here. A persistence failure is logged and the in-memory
    /// insertion stands.
    pub fn insert(&mut self, record: AppRecord) {
        info!("Adding '{}' ({}) to catalog", record.name, record.package_id);
        self.records.insert(0, record);

        if let Err(e) = self.persist() {
            warn!("Failed to persist catalog, continuing in-memory: {}", e);
        }
    }

    /// Write the serialized collection under the storage key
    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string(&self.records)?;
        self.conn.execute(
            "INSERT OR REPLACE INTO storage (key, value, updated_at) VALUES (?1, ?2, CURRENT_TIMESTAMP)",
            params![STORAGE_KEY, json],
        )?;
        debug!("Persisted {} catalog records", self.records.len());
        Ok(())
    }
}

/// Read the persisted collection, falling back to the seed catalog
fn read_collection(conn: &Connection) -> Vec<AppRecord> {
    let stored: Option<String> = conn
        .query_row(
            "SELECT value FROM storage WHERE key = ?1",
            [STORAGE_KEY],
            |row| row.get(0),
        )
        .optional()
        .unwrap_or_else(|e| {
            warn!("Failed to read catalog from storage: {}", e);
            None
        });

    match stored {
        Some(json) => match serde_json::from_str::<Vec<AppRecord>>(&json) {
            Ok(records) => {
                debug!("Loaded {} catalog records", records.len());
                records
            }
            Err(e) => {
                warn!("Persisted catalog is unreadable, using seed data: {}", e);
                seed_catalog()
            }
        },
        None => {
            info!("No persisted catalog found, using seed data");
            seed_catalog()
        }
    }
}

/// Parse an ISO date, mapping failures below every valid date
fn parse_date(date: &str) -> NaiveDate {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap_or(NaiveDate::MIN)
}
