// src/resolve/sources/proxy.rs

//! Document scraping source via a public CORS relay
//!
//! Fetches the canonical store page through the AllOrigins relay under a
//! hard 5 second deadline and extracts fields from the raw markup with
//! ordered string heuristics. The selectors track an undocumented
//! third-party page structure and are best-effort by design; swapping
//! them out is a new `MetadataSource`, not an interface change.

use super::{today, MetadataSource, SourceOutcome};
use crate::db::models::{Category, DraftRecord};
use crate::error::{Error, Result};
use crate::resolve::normalize::NormalizedInput;
use regex::Regex;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{info, warn};

/// Hard deadline for the relay fetch; the in-flight request is dropped
/// on expiry and the source reports unavailable
pub const PROXY_TIMEOUT: Duration = Duration::from_secs(5);

/// Default public relay endpoint
pub const PROXY_API_BASE: &str = "https://api.allorigins.win/get";

/// Truncation length for the derived short description
const SHORT_DESCRIPTION_LEN: usize = 150;

/// Relay envelope: the target page markup rides under `contents`
#[derive(Debug, Deserialize)]
struct ProxyEnvelope {
    contents: Option<String>,
}

/// Relay-based scraping source
pub struct ProxySource {
    client: Client,
    proxy_base: String,
}

impl ProxySource {
    /// Create a new proxy source against the given relay endpoint
    pub fn new(proxy_base: String, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::InitError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, proxy_base })
    }

    /// Create a source against the public AllOrigins relay
    pub fn with_defaults() -> Result<Self> {
        Self::new(PROXY_API_BASE.to_string(), PROXY_TIMEOUT)
    }

    fn try_fetch(&self, input: &NormalizedInput) -> Result<DraftRecord> {
        let url = url::Url::parse_with_params(&self.proxy_base, &[("url", &input.request_url)])
            .map_err(|e| Error::ParseError(format!("Invalid relay URL: {}", e)))?;

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| Error::DownloadError(format!("Relay fetch failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(Error::DownloadError(format!(
                "HTTP {} from relay",
                response.status()
            )));
        }

        let envelope: ProxyEnvelope = response
            .json()
            .map_err(|e| Error::ParseError(format!("Failed to parse relay envelope: {}", e)))?;

        let html = envelope
            .contents
            .ok_or_else(|| Error::ParseError("Relay envelope carried no contents".to_string()))?;

        let page = extract_from_html(&html)
            .ok_or_else(|| Error::ParseError("No app name found in page".to_string()))?;

        Ok(draft_from_page(&input.package_id, page))
    }
}

impl MetadataSource for ProxySource {
    fn name(&self) -> &'static str {
        "proxy"
    }

    fn fetch(&self, input: &NormalizedInput) -> SourceOutcome {
        info!("Attempting proxy scrape for {}", input.package_id);
        match self.try_fetch(input) {
            Ok(draft) => SourceOutcome::Resolved(draft),
            Err(e) => {
                warn!("Proxy scrape failed, falling back: {}", e);
                SourceOutcome::Unavailable
            }
        }
    }
}

/// Fields recovered from one store page; `name` is always non-empty
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageFields {
    pub name: String,
    pub developer: String,
    /// Absolute URL, or `None` when nothing resolvable was found
    pub icon_url: Option<String>,
    pub short_description: Option<String>,
    pub full_description: Option<String>,
}

/// Heuristically extract metadata fields from raw store page markup
///
/// Pure function over the markup; returns `None` when no page heading
/// (and therefore no app name) can be found. Per field the first
/// matching heuristic wins.
pub fn extract_from_html(html: &str) -> Option<PageFields> {
    let name = re_h1()
        .captures(html)
        .map(|c| strip_tags(&c[1]))
        .filter(|name| !name.is_empty())?;

    let developer = re_dev_link()
        .captures(html)
        .map(|c| strip_tags(&c[1]))
        .filter(|dev| !dev.is_empty())
        .unwrap_or_else(|| "Unknown".to_string());

    let icon_url = extract_icon(html);

    let (full_description, short_description) = match re_description().captures(html) {
        Some(captures) => {
            let markup = captures[1].trim().to_string();
            let text = strip_tags(&markup);
            let short: String = text.chars().take(SHORT_DESCRIPTION_LEN).collect();
            (Some(markup), Some(format!("{}...", short)))
        }
        None => (None, None),
    };

    Some(PageFields {
        name,
        developer,
        icon_url,
        short_description,
        full_description,
    })
}

/// Resolve the icon URL: the tagged icon image first, then the first
/// image served from the store's image host
fn extract_icon(html: &str) -> Option<String> {
    if let Some(tag) = re_icon_img().find(html) {
        let tag = tag.as_str();
        let candidate = re_src()
            .captures(tag)
            .map(|c| c[1].to_string())
            .or_else(|| re_data_src().captures(tag).map(|c| c[1].to_string()))
            .or_else(|| {
                re_srcset()
                    .captures(tag)
                    .and_then(|c| c[1].split_whitespace().next().map(str::to_string))
            });

        if let Some(normalized) = candidate.and_then(|url| normalize_image_url(&url)) {
            return Some(normalized);
        }
    }

    // Icons are classified as the first image from the known host,
    // not by dimension inspection
    re_host_img()
        .captures(html)
        .and_then(|c| normalize_image_url(&c[1]))
}

/// Upgrade protocol-relative URLs; discard anything not absolute
fn normalize_image_url(url: &str) -> Option<String> {
    if url.starts_with("http") {
        Some(url.to_string())
    } else if url.starts_with("//") {
        Some(format!("https:{}", url))
    } else {
        None
    }
}

/// Assemble the draft from extracted page fields and fixed defaults
fn draft_from_page(package_id: &str, page: PageFields) -> DraftRecord {
    // A generated avatar stands in when no icon was resolvable; the
    // scrape still counts as successful
    let icon_url = page.icon_url.unwrap_or_else(|| {
        format!(
            "https://ui-avatars.com/api/?name={}&background=random",
            page.name
        )
    });

    DraftRecord {
        package_id: package_id.to_string(),
        name: page.name,
        developer: page.developer,
        icon_url,
        short_description: page.short_description.unwrap_or_default(),
        full_description: page
            .full_description
            .unwrap_or_else(|| "<p>Description unavailable.</p>".to_string()),
        category: Category::Games,
        rating: 4.5,
        rating_count: 100,
        installs: "1M+".to_string(),
        current_version: "Latest".to_string(),
        updated_date: today(),
        requires_android: "5.0+".to_string(),
        screenshots: vec![],
    }
}

/// Remove markup and decode the handful of entities the store pages use
fn strip_tags(fragment: &str) -> String {
    let text = re_tag().replace_all(fragment, "");
    text.replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&nbsp;", " ")
        .trim()
        .to_string()
}

fn re_h1() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<h1[^>]*>(.*?)</h1>").expect("valid regex"))
}

fn re_dev_link() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?is)<a[^>]*href="[^"]*/store/apps/dev[^"]*"[^>]*>(.*?)</a>"#)
            .expect("valid regex")
    })
}

fn re_icon_img() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?is)<img[^>]*alt="Icon image"[^>]*>"#).expect("valid regex"))
}

fn re_host_img() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"(?is)<img[^>]*\ssrc="((?:https?:)?//play-lh\.googleusercontent\.com[^"]*)""#,
        )
        .expect("valid regex")
    })
}

fn re_description() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?is)<div[^>]*(?:itemprop="description"|data-g-id="description")[^>]*>(.*?)</div>"#)
            .expect("valid regex")
    })
}

fn re_src() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"\ssrc="([^"]+)""#).expect("valid regex"))
}

fn re_data_src() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"data-src="([^"]+)""#).expect("valid regex"))
}

fn re_srcset() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"srcset="([^"]+)""#).expect("valid regex"))
}

fn re_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").expect("valid regex"))
}

#[cfg(test)]
mod tests {
    use super::*;

    const FULL_PAGE: &str = r#"
        <html><body>
        <h1><span>Cool Game</span></h1>
        <a href="/store/apps/dev?id=123"><span>Great Studio</span></a>
        <img alt="Icon image" src="https://play-lh.googleusercontent.com/icon=s240">
        <div itemprop="description"><b>Best</b> game ever &amp; more</div>
        </body></html>
    "#;

    #[test]
    fn test_extract_full_page() {
        let page = extract_from_html(FULL_PAGE).unwrap();

        assert_eq!(page.name, "Cool Game");
        assert_eq!(page.developer, "Great Studio");
        assert_eq!(
            page.icon_url.as_deref(),
            Some("https://play-lh.googleusercontent.com/icon=s240")
        );
        assert_eq!(
            page.full_description.as_deref(),
            Some("<b>Best</b> game ever &amp; more")
        );
        assert_eq!(
            page.short_description.as_deref(),
            Some("Best game ever & more...")
        );
    }

    #[test]
    fn test_page_without_heading_is_unusable() {
        let html = r#"<html><body><p>Not found</p></body></html>"#;
        assert!(extract_from_html(html).is_none());
    }

    #[test]
    fn test_missing_developer_defaults_to_unknown() {
        let html = r#"<h1>Cool Game</h1>"#;
        let page = extract_from_html(html).unwrap();
        assert_eq!(page.developer, "Unknown");
    }

    #[test]
    fn test_icon_falls_back_to_first_host_image() {
        let html = r#"
            <h1>Cool Game</h1>
            <img src="https://example.com/banner.png">
            <img src="https://play-lh.googleusercontent.com/first">
            <img src="https://play-lh.googleusercontent.com/second">
        "#;
        let page = extract_from_html(html).unwrap();
        assert_eq!(
            page.icon_url.as_deref(),
            Some("https://play-lh.googleusercontent.com/first")
        );
    }

    #[test]
    fn test_protocol_relative_icon_is_upgraded() {
        let html = r#"
            <h1>Cool Game</h1>
            <img alt="Icon image" src="//play-lh.googleusercontent.com/icon">
        "#;
        let page = extract_from_html(html).unwrap();
        assert_eq!(
            page.icon_url.as_deref(),
            Some("https://play-lh.googleusercontent.com/icon")
        );
    }

    #[test]
    fn test_relative_icon_is_discarded() {
        let html = r#"
            <h1>Cool Game</h1>
            <img alt="Icon image" src="/images/icon.png">
        "#;
        let page = extract_from_html(html).unwrap();
        assert!(page.icon_url.is_none());
    }

    #[test]
    fn test_icon_from_data_src_and_srcset() {
        let html = r#"
            <h1>Cool Game</h1>
            <img alt="Icon image" data-src="https://play-lh.googleusercontent.com/lazy">
        "#;
        let page = extract_from_html(html).unwrap();
        assert_eq!(
            page.icon_url.as_deref(),
            Some("https://play-lh.googleusercontent.com/lazy")
        );

        let html = r#"
            <h1>Cool Game</h1>
            <img alt="Icon image" srcset="https://play-lh.googleusercontent.com/set=s64 1x, https://play-lh.googleusercontent.com/set=s128 2x">
        "#;
        let page = extract_from_html(html).unwrap();
        assert_eq!(
            page.icon_url.as_deref(),
            Some("https://play-lh.googleusercontent.com/set=s64")
        );
    }

    #[test]
    fn test_description_via_data_g_id_marker() {
        let html = r#"
            <h1>Cool Game</h1>
            <div data-g-id="description">Plain description text</div>
        "#;
        let page = extract_from_html(html).unwrap();
        assert_eq!(
            page.full_description.as_deref(),
            Some("Plain description text")
        );
    }

    #[test]
    fn test_short_description_is_truncated() {
        let long_text = "x".repeat(400);
        let html = format!(
            r#"<h1>Cool Game</h1><div itemprop="description">{}</div>"#,
            long_text
        );
        let page = extract_from_html(&html).unwrap();

        let short = page.short_description.unwrap();
        assert_eq!(short.chars().count(), SHORT_DESCRIPTION_LEN + 3);
        assert!(short.ends_with("..."));
    }

    #[test]
    fn test_draft_uses_generated_avatar_without_icon() {
        let page = extract_from_html("<h1>Cool Game</h1>").unwrap();
        let draft = draft_from_page("com.example.app", page);

        assert!(draft.icon_url.starts_with("https://ui-avatars.com/api/?name=Cool Game"));
        assert_eq!(draft.rating, 4.5);
        assert_eq!(draft.rating_count, 100);
        assert_eq!(draft.installs, "1M+");
        assert_eq!(draft.full_description, "<p>Description unavailable.</p>");
        assert_eq!(draft.short_description, "");
        assert!(draft.screenshots.is_empty());
    }

    #[test]
    fn test_timeout_reports_unavailable() {
        // Nothing listens on this port; connection fails immediately
        let source = ProxySource::new(
            "http://127.0.0.1:9/get".to_string(),
            Duration::from_millis(200),
        )
        .unwrap();
        let input = crate::resolve::normalize::normalize("com.example.app");

        assert!(matches!(source.fetch(&input), SourceOutcome::Unavailable));
    }
}
