// src/resolve/sources/mod.rs

//! Metadata acquisition sources for the resolution pipeline
//!
//! Each source is one independent strategy for turning a normalized input
//! into a draft record:
//! - Gemini: structured extraction through a generative AI query
//! - Proxy: page scraping through a public CORS relay
//! - Placeholder: deterministic synthesis, cannot fail
//!
//! Sources never propagate errors. Every failure mode collapses to
//! `Unavailable` and the pipeline moves on.

pub mod gemini;
pub mod placeholder;
pub mod proxy;

use crate::db::models::DraftRecord;
use crate::resolve::normalize::NormalizedInput;
use chrono::Utc;

/// Today's date in the ISO form records carry (%Y-%m-%d)
pub(crate) fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

/// Outcome of a single source attempt
#[derive(Debug, Clone)]
pub enum SourceOutcome {
    /// The source produced a usable partial record
    Resolved(DraftRecord),
    /// The source was skipped, failed, or returned nothing usable
    Unavailable,
}

/// One acquisition strategy in the fallback chain
///
/// Implementations own their failure handling: `fetch` reports
/// `Unavailable` for any credential, network, timeout, or parse problem
/// rather than returning an error.
pub trait MetadataSource {
    /// Short source name for logging
    fn name(&self) -> &'static str;

    /// Attempt to resolve metadata for the given input
    fn fetch(&self, input: &NormalizedInput) -> SourceOutcome;
}
