// src/resolve/sources/gemini.rs

//! Semantic extraction source backed by the Gemini API
//!
//! Sends a structured-output query for one package id and maps the JSON
//! payload onto a draft record. The response schema requires name,
//! developer, and icon URL; everything else is advisory and filled with
//! fixed defaults when absent. Without a configured API key the source
//! is skipped outright.

use super::{today, MetadataSource, SourceOutcome};
use crate::db::models::{Category, DraftRecord};
use crate::error::{Error, Result};
use crate::resolve::normalize::NormalizedInput;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info, warn};

/// Default Gemini API endpoint
pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Model used for extraction queries
pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";

/// Gemini-backed metadata source
pub struct GeminiSource {
    client: Client,
    api_key: Option<String>,
    model: String,
    base_url: String,
}

impl GeminiSource {
    /// Create a new Gemini source
    ///
    /// `api_key` may be `None`, in which case every fetch is skipped.
    pub fn new(api_key: Option<String>, model: String, base_url: String) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| Error::InitError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key,
            model,
            base_url,
        })
    }

    /// Create a source against the public Gemini endpoint
    pub fn with_defaults(api_key: Option<String>) -> Result<Self> {
        Self::new(api_key, DEFAULT_MODEL.to_string(), GEMINI_API_BASE.to_string())
    }

    fn try_fetch(&self, api_key: &str, package_id: &str) -> Result<DraftRecord> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(&build_request(package_id))
            .send()
            .map_err(|e| Error::DownloadError(format!("Gemini request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::DownloadError(format!(
                "HTTP {} from Gemini API",
                response.status()
            )));
        }

        let envelope: GenerateContentResponse = response
            .json()
            .map_err(|e| Error::ParseError(format!("Failed to parse Gemini response: {}", e)))?;

        let text = envelope
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content.parts.into_iter().next())
            .map(|part| part.text)
            .ok_or_else(|| Error::ParseError("Gemini response carried no text part".to_string()))?;

        let payload: ExtractedMetadata = serde_json::from_str(text.trim())
            .map_err(|e| Error::ParseError(format!("Malformed extraction JSON: {}", e)))?;

        draft_from_payload(package_id, payload)
            .ok_or_else(|| Error::ParseError("Extraction returned no app name".to_string()))
    }
}

impl MetadataSource for GeminiSource {
    fn name(&self) -> &'static str {
        "gemini"
    }

    fn fetch(&self, input: &NormalizedInput) -> SourceOutcome {
        let Some(api_key) = self.api_key.as_deref() else {
            debug!("No API key configured, skipping AI extraction");
            return SourceOutcome::Unavailable;
        };

        info!("Attempting AI extraction for {}", input.package_id);
        match self.try_fetch(api_key, &input.package_id) {
            Ok(draft) => SourceOutcome::Resolved(draft),
            Err(e) => {
                warn!("AI extraction failed, falling back: {}", e);
                SourceOutcome::Unavailable
            }
        }
    }
}

/// Build the structured-output request for one package id
fn build_request(package_id: &str) -> GenerateContentRequest {
    let prompt = format!(
        "Analyze the Google Play Store app with package ID \"{id}\".\n\
         Task:\n\
         1. Search for the official Play Store page for \"{id}\".\n\
         2. Extract the exact App Name and Developer.\n\
         3. CRITICAL: Find the official high-resolution App Icon URL from the Play Store page. \
         It MUST be the one starting with \"https://play-lh.googleusercontent.com\" or \
         \"https://lh3.googleusercontent.com\". Do NOT return a generic icon. If you can't find \
         the Play Store one, find the highest quality official icon from a trusted tech site.\n\
         4. Extract a short description and a full description (HTML allowed).\n\
         5. Find the current version, rating, and install count.\n\
         6. Return JSON matching the schema.",
        id = package_id
    );

    GenerateContentRequest {
        contents: vec![RequestContent {
            parts: vec![RequestPart { text: prompt }],
        }],
        generation_config: GenerationConfig {
            response_mime_type: "application/json".to_string(),
            response_schema: json!({
                "type": "OBJECT",
                "properties": {
                    "name": { "type": "STRING" },
                    "developer": { "type": "STRING" },
                    "iconUrl": {
                        "type": "STRING",
                        "description": "Official play store icon URL (play-lh.googleusercontent.com)"
                    },
                    "shortDescription": { "type": "STRING" },
                    "fullDescription": { "type": "STRING" },
                    "rating": { "type": "NUMBER" },
                    "installs": { "type": "STRING" },
                    "currentVersion": { "type": "STRING" },
                    "updatedDate": { "type": "STRING" },
                    "screenshots": { "type": "ARRAY", "items": { "type": "STRING" } }
                },
                "required": ["name", "developer", "iconUrl"]
            }),
        },
    }
}

/// Map an extraction payload onto a draft, or reject it for lacking a name
fn draft_from_payload(package_id: &str, payload: ExtractedMetadata) -> Option<DraftRecord> {
    if payload.name.trim().is_empty() {
        return None;
    }

    Some(DraftRecord {
        package_id: package_id.to_string(),
        name: payload.name,
        developer: payload.developer,
        icon_url: payload.icon_url,
        short_description: payload
            .short_description
            .unwrap_or_else(|| "No description available".to_string()),
        full_description: payload
            .full_description
            .unwrap_or_else(|| "<p>No description available</p>".to_string()),
        category: Category::Games,
        rating: payload.rating.unwrap_or(4.5).clamp(0.0, 5.0),
        rating_count: 1000,
        installs: payload.installs.unwrap_or_else(|| "1M+".to_string()),
        current_version: payload
            .current_version
            .unwrap_or_else(|| "Latest".to_string()),
        updated_date: payload.updated_date.unwrap_or_else(today),
        requires_android: "5.0+".to_string(),
        screenshots: payload.screenshots.unwrap_or_default(),
    })
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<RequestContent>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<ResponseCandidate>,
}

#[derive(Debug, Deserialize)]
struct ResponseCandidate {
    content: ResponseContent,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: String,
}

/// The schema-constrained payload the model is asked to produce
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExtractedMetadata {
    #[serde(default)]
    name: String,
    #[serde(default)]
    developer: String,
    #[serde(default)]
    icon_url: String,
    short_description: Option<String>,
    full_description: Option<String>,
    rating: Option<f64>,
    installs: Option<String>,
    current_version: Option<String>,
    updated_date: Option<String>,
    screenshots: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::normalize::normalize;

    #[test]
    fn test_request_schema_requires_identity_fields() {
        let request = build_request("com.example.app");
        let schema = &request.generation_config.response_schema;

        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(required, vec!["name", "developer", "iconUrl"]);

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body["generationConfig"]["responseMimeType"],
            "application/json"
        );
        assert!(body["contents"][0]["parts"][0]["text"]
            .as_str()
            .unwrap()
            .contains("com.example.app"));
    }

    #[test]
    fn test_payload_with_all_fields() {
        let payload: ExtractedMetadata = serde_json::from_str(
            r#"{
                "name": "Example",
                "developer": "Example Dev",
                "iconUrl": "https://play-lh.googleusercontent.com/icon",
                "shortDescription": "Short",
                "fullDescription": "<p>Full</p>",
                "rating": 4.1,
                "installs": "50M+",
                "currentVersion": "3.2.1",
                "updatedDate": "2024-06-01",
                "screenshots": ["https://play-lh.googleusercontent.com/s1"]
            }"#,
        )
        .unwrap();

        let draft = draft_from_payload("com.example.app", payload).unwrap();
        assert_eq!(draft.name, "Example");
        assert_eq!(draft.developer, "Example Dev");
        assert_eq!(draft.rating, 4.1);
        assert_eq!(draft.installs, "50M+");
        assert_eq!(draft.current_version, "3.2.1");
        assert_eq!(draft.updated_date, "2024-06-01");
        assert_eq!(draft.screenshots.len(), 1);
    }

    #[test]
    fn test_payload_fills_fixed_defaults() {
        let payload: ExtractedMetadata = serde_json::from_str(
            r#"{
                "name": "Example",
                "developer": "Example Dev",
                "iconUrl": "https://play-lh.googleusercontent.com/icon"
            }"#,
        )
        .unwrap();

        let draft = draft_from_payload("com.example.app", payload).unwrap();
        assert_eq!(draft.short_description, "No description available");
        assert_eq!(draft.full_description, "<p>No description available</p>");
        assert_eq!(draft.rating, 4.5);
        assert_eq!(draft.rating_count, 1000);
        assert_eq!(draft.installs, "1M+");
        assert_eq!(draft.current_version, "Latest");
        assert_eq!(draft.requires_android, "5.0+");
        assert!(draft.screenshots.is_empty());
        assert_eq!(draft.category, Category::Games);
    }

    #[test]
    fn test_payload_rating_is_clamped() {
        let payload: ExtractedMetadata = serde_json::from_str(
            r#"{"name": "Example", "developer": "D", "iconUrl": "https://x", "rating": 11.0}"#,
        )
        .unwrap();

        let draft = draft_from_payload("com.example.app", payload).unwrap();
        assert_eq!(draft.rating, 5.0);
    }

    #[test]
    fn test_payload_without_name_is_rejected() {
        let payload: ExtractedMetadata =
            serde_json::from_str(r#"{"developer": "Example Dev"}"#).unwrap();
        assert!(draft_from_payload("com.example.app", payload).is_none());

        let payload: ExtractedMetadata =
            serde_json::from_str(r#"{"name": "   ", "developer": "Example Dev"}"#).unwrap();
        assert!(draft_from_payload("com.example.app", payload).is_none());
    }

    #[test]
    fn test_fetch_without_api_key_is_skipped() {
        let source = GeminiSource::with_defaults(None).unwrap();
        let input = normalize("com.example.app");

        assert!(matches!(source.fetch(&input), SourceOutcome::Unavailable));
    }
}
