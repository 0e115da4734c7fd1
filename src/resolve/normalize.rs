// src/resolve/normalize.rs

//! Identifier normalization for resolution input
//!
//! Callers hand over either a bare package id or a full Play Store URL;
//! both collapse to a canonical (id, request URL) pair with locale
//! parameters applied. This path never fails: malformed URLs degrade to
//! the raw input used verbatim.

use tracing::warn;
use url::Url;

/// Default store page for a bare package id
const STORE_URL: &str = "https://play.google.com/store/apps/details";

/// Canonical identifier and request URL for one resolution attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedInput {
    pub package_id: String,
    pub request_url: String,
}

/// Normalize raw user input into a package id and canonical request URL
///
/// Input without a URL scheme is treated as a bare package id. URLs have
/// their `id` query parameter extracted (falling back to the raw input)
/// and `hl`/`gl` defaults added only when the caller did not set them.
pub fn normalize(input: &str) -> NormalizedInput {
    if !input.starts_with("http") {
        return NormalizedInput {
            package_id: input.to_string(),
            request_url: format!("{}?id={}&hl=en&gl=US", STORE_URL, input),
        };
    }

    match Url::parse(input) {
        Ok(mut url) => {
            let package_id = url
                .query_pairs()
                .find(|(key, _)| key == "id")
                .map(|(_, value)| value.into_owned())
                .unwrap_or_else(|| input.to_string());

            let has_locale = url.query_pairs().any(|(key, _)| key == "hl");
            let has_region = url.query_pairs().any(|(key, _)| key == "gl");
            if !has_locale {
                url.query_pairs_mut().append_pair("hl", "en");
            }
            if !has_region {
                url.query_pairs_mut().append_pair("gl", "US");
            }

            NormalizedInput {
                package_id,
                request_url: url.to_string(),
            }
        }
        Err(e) => {
            // Fail soft: the raw input stands in for both fields
            warn!("Failed to parse input URL '{}': {}", input, e);
            NormalizedInput {
                package_id: input.to_string(),
                request_url: input.to_string(),
            }
        }
    }
}
