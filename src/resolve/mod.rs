// src/resolve/mod.rs

//! Metadata resolution pipeline
//!
//! Turns raw user input (a package id or store URL) into a draft record
//! by walking an ordered chain of acquisition sources: AI extraction,
//! then proxy scraping, then the placeholder generator. Each source is
//! attempted exactly once and the first usable result wins. Resolution
//! is total - the placeholder terminal cannot fail, so callers always
//! get a (possibly degraded) record and never an error.

pub mod normalize;
pub mod sources;

use crate::db::models::DraftRecord;
use crate::error::Result;
use sources::gemini::GeminiSource;
use sources::placeholder::PlaceholderSource;
use sources::proxy::ProxySource;
use sources::{MetadataSource, SourceOutcome};
use std::time::Duration;
use tracing::{debug, info};

/// Configuration for the resolution pipeline
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Gemini API key; the AI source is skipped when unset
    pub api_key: Option<String>,
    /// Gemini model used for extraction
    pub model: String,
    /// Gemini API base URL
    pub gemini_base: String,
    /// CORS relay base URL
    pub proxy_base: String,
    /// Hard deadline for the relay fetch
    pub proxy_timeout: Duration,
}

impl ResolverConfig {
    /// Build configuration from the environment
    ///
    /// Reads `GEMINI_API_KEY` (with `API_KEY` as a legacy fallback);
    /// endpoints and timeouts use the public defaults.
    pub fn from_env() -> Self {
        let api_key = std::env::var("GEMINI_API_KEY")
            .or_else(|_| std::env::var("API_KEY"))
            .ok()
            .filter(|key| !key.is_empty());

        Self {
            api_key,
            ..Self::default()
        }
    }
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: sources::gemini::DEFAULT_MODEL.to_string(),
            gemini_base: sources::gemini::GEMINI_API_BASE.to_string(),
            proxy_base: sources::proxy::PROXY_API_BASE.to_string(),
            proxy_timeout: sources::proxy::PROXY_TIMEOUT,
        }
    }
}

/// The ordered fallback chain
pub struct MetadataResolver {
    chain: Vec<Box<dyn MetadataSource>>,
    placeholder: PlaceholderSource,
}

impl MetadataResolver {
    /// Build the standard chain (AI extraction, then proxy scraping)
    pub fn new(config: &ResolverConfig) -> Result<Self> {
        let gemini = GeminiSource::new(
            config.api_key.clone(),
            config.model.clone(),
            config.gemini_base.clone(),
        )?;
        let proxy = ProxySource::new(config.proxy_base.clone(), config.proxy_timeout)?;

        Ok(Self::from_chain(vec![Box::new(gemini), Box::new(proxy)]))
    }

    /// Build a resolver over an explicit source chain
    ///
    /// The placeholder terminal is always appended implicitly.
    pub fn from_chain(chain: Vec<Box<dyn MetadataSource>>) -> Self {
        Self {
            chain,
            placeholder: PlaceholderSource,
        }
    }

    /// Resolve raw input into a draft record
    ///
    /// Never fails: sources that report unavailable are passed over in
    /// order, and the placeholder generator terminates the chain with a
    /// record clearly marked as simulated.
    pub fn resolve(&self, input: &str) -> DraftRecord {
        let normalized = normalize::normalize(input);
        debug!(
            "Resolving '{}' via {}",
            normalized.package_id, normalized.request_url
        );

        for source in &self.chain {
            match source.fetch(&normalized) {
                SourceOutcome::Resolved(draft) => {
                    info!(
                        "Resolved '{}' via {} source",
                        normalized.package_id,
                        source.name()
                    );
                    return draft;
                }
                SourceOutcome::Unavailable => {
                    debug!("Source {} unavailable, advancing", source.name());
                }
            }
        }

        self.placeholder.generate(&normalized)
    }
}
