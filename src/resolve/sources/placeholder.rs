// src/resolve/sources/placeholder.rs

//! Deterministic placeholder generator
//!
//! The pipeline's terminal fallback: synthesizes a complete record from
//! the package id alone, clearly marked as simulated data. Cannot fail.

use super::{today, MetadataSource, SourceOutcome};
use crate::db::models::{Category, DraftRecord};
use crate::resolve::normalize::NormalizedInput;
use tracing::info;

/// Total fallback source
pub struct PlaceholderSource;

impl PlaceholderSource {
    /// Synthesize a placeholder draft for the given input
    pub fn generate(&self, input: &NormalizedInput) -> DraftRecord {
        let package_id = &input.package_id;

        // Last reverse-domain segment, first letter uppercased
        let simple_name = package_id.split('.').next_back().unwrap_or("App");
        let simple_name = if simple_name.is_empty() {
            "App"
        } else {
            simple_name
        };
        let mut chars = simple_name.chars();
        let formatted_name = match chars.next() {
            Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
            None => "App".to_string(),
        };

        DraftRecord {
            package_id: package_id.clone(),
            name: format!("{} (Simulated)", formatted_name),
            developer: "Unknown Developer".to_string(),
            icon_url: format!(
                "https://ui-avatars.com/api/?name={}&background=random",
                formatted_name
            ),
            short_description:
                "Could not fetch real data (AI and Proxy failed). This is placeholder data."
                    .to_string(),
            full_description:
                "<p><b>Note:</b> Real metadata fetching failed. Please enter details manually.</p>"
                    .to_string(),
            category: Category::Games,
            rating: 4.5,
            rating_count: 1000,
            installs: "10M+".to_string(),
            current_version: "1.0.0".to_string(),
            updated_date: today(),
            requires_android: "5.0 and up".to_string(),
            screenshots: vec![
                format!("https://picsum.photos/seed/{}1/800/450", package_id),
                format!("https://picsum.photos/seed/{}2/800/450", package_id),
            ],
        }
    }
}

impl MetadataSource for PlaceholderSource {
    fn name(&self) -> &'static str {
        "placeholder"
    }

    fn fetch(&self, input: &NormalizedInput) -> SourceOutcome {
        info!("Generating placeholder record for {}", input.package_id);
        SourceOutcome::Resolved(self.generate(input))
    }
}
