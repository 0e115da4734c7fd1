// src/lib.rs

//! Appdex App Catalog
//!
//! Catalog tool for Android app metadata with a degrading acquisition chain:
//! AI extraction first, proxy scraping second, deterministic placeholder last.
//!
//! # Architecture
//!
//! - Database-first: the catalog lives in SQLite as one serialized collection
//! - Resolution pipeline: ordered fallback sources behind a common trait,
//!   each attempted exactly once, first usable result wins
//! - Drafts: the pipeline produces partial records; the caller finalizes
//!   them with an id, tags, and downloadable versions before insertion
//! - Total resolution: no input fails to resolve; degraded results are
//!   clearly marked as simulated data

pub mod catalog;
pub mod db;
mod error;
pub mod resolve;

pub use error::{Error, Result};
