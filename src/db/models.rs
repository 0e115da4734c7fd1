// src/db/models.rs

//! Data models for Appdex catalog entities
//!
//! Records serialize to camelCase JSON; the persisted collection and the
//! AI response schema share this field spelling. Enum string forms match
//! the upstream catalog labels.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Top-level catalog category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Games,
    Apps,
    Tools,
}

impl Category {
    pub fn as_str(&self) -> &str {
        match self {
            Category::Games => "Games",
            Category::Apps => "Apps",
            Category::Tools => "Tools",
        }
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Games" => Ok(Category::Games),
            "Apps" => Ok(Category::Apps),
            "Tools" => Ok(Category::Tools),
            _ => Err(format!("Invalid category: {}", s)),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Second-level catalog category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubCategory {
    Action,
    #[serde(rename = "RPG")]
    Rpg,
    Strategy,
    Social,
    Productivity,
    Utilities,
}

impl SubCategory {
    pub fn as_str(&self) -> &str {
        match self {
            SubCategory::Action => "Action",
            SubCategory::Rpg => "RPG",
            SubCategory::Strategy => "Strategy",
            SubCategory::Social => "Social",
            SubCategory::Productivity => "Productivity",
            SubCategory::Utilities => "Utilities",
        }
    }
}

impl FromStr for SubCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Action" => Ok(SubCategory::Action),
            "RPG" => Ok(SubCategory::Rpg),
            "Strategy" => Ok(SubCategory::Strategy),
            "Social" => Ok(SubCategory::Social),
            "Productivity" => Ok(SubCategory::Productivity),
            "Utilities" => Ok(SubCategory::Utilities),
            _ => Err(format!("Invalid sub-category: {}", s)),
        }
    }
}

/// Behavioral modification carried by a downloadable variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModType {
    Original,
    #[serde(rename = "Unlimited Money")]
    UnlimitedMoney,
    #[serde(rename = "Premium Unlocked")]
    PremiumUnlocked,
    #[serde(rename = "Ad-Free")]
    AdFree,
    #[serde(rename = "God Mode")]
    GodMode,
}

/// Malware scan verdict for an uploaded variant file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VirusScanStatus {
    Clean,
    Flagged,
    Pending,
}

/// A downloadable variant of an app (original build or a modified one)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppVersion {
    /// Unique within the parent record's version list
    pub id: String,
    pub version_name: String,
    pub version_code: i64,
    /// Human-readable label, e.g. "v1.2.3 - Mod Money"
    pub label: String,
    pub mod_type: ModType,
    /// Free-form size string, e.g. "45 MB"
    pub size: String,
    pub upload_date: String,
    pub md5: String,
    pub downloads: i64,
    pub virus_scan_status: VirusScanStatus,
    pub file_url: String,
}

/// A finalized catalog record
///
/// Ids are assigned once at finalization and never reused. An empty
/// `versions` list means the record is not yet downloadable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppRecord {
    pub id: String,
    /// Reverse-domain source identifier; stable per logical app but a
    /// single app may have multiple catalog entries
    pub package_id: String,
    pub name: String,
    pub developer: String,
    /// Always an absolute URL; relative candidates are discarded upstream
    pub icon_url: String,
    pub short_description: String,
    /// May carry a constrained markup subset; owned by the publisher
    /// workflow and stored as-is
    pub full_description: String,
    pub category: Category,
    pub sub_category: SubCategory,
    /// Clamped to [0.0, 5.0]
    pub rating: f64,
    pub rating_count: i64,
    /// Free-form magnitude string, e.g. "10M+"
    pub installs: String,
    pub current_version: String,
    /// ISO date (%Y-%m-%d)
    pub updated_date: String,
    pub requires_android: String,
    pub screenshots: Vec<String>,
    pub tags: Vec<String>,
    pub versions: Vec<AppVersion>,
}

/// A partial record as produced by the resolution pipeline
///
/// Drafts carry no id, tags, or versions; `finalize` attaches those and
/// promotes the draft to a full `AppRecord`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftRecord {
    pub package_id: String,
    pub name: String,
    pub developer: String,
    pub icon_url: String,
    pub short_description: String,
    pub full_description: String,
    pub category: Category,
    pub rating: f64,
    pub rating_count: i64,
    pub installs: String,
    pub current_version: String,
    pub updated_date: String,
    pub requires_android: String,
    pub screenshots: Vec<String>,
}

impl DraftRecord {
    /// Promote this draft into a finalized record
    pub fn finalize(
        self,
        id: String,
        sub_category: SubCategory,
        tags: Vec<String>,
        versions: Vec<AppVersion>,
    ) -> AppRecord {
        AppRecord {
            id,
            package_id: self.package_id,
            name: self.name,
            developer: self.developer,
            icon_url: self.icon_url,
            short_description: self.short_description,
            full_description: self.full_description,
            category: self.category,
            sub_category,
            rating: self.rating.clamp(0.0, 5.0),
            rating_count: self.rating_count,
            installs: self.installs,
            current_version: self.current_version,
            updated_date: self.updated_date,
            requires_android: self.requires_android,
            screenshots: self.screenshots,
            tags,
            versions,
        }
    }
}

/// Fixed seed collection used when no persisted catalog exists (or the
/// persisted blob is unreadable)
pub fn seed_catalog() -> Vec<AppRecord> {
    vec![
        AppRecord {
            id: "1".to_string(),
            package_id: "com.blockcraft.game".to_string(),
            name: "BlockCraft 3D".to_string(),
            developer: "Fun Games Ltd".to_string(),
            icon_url: "https://picsum.photos/id/10/200/200".to_string(),
            short_description: "Build your own city in this amazing 3D simulation game."
                .to_string(),
            full_description: "<p><b>BlockCraft 3D</b> is a building game where you can create your own city.</p><p>Features:</p><ul><li>Build anything you want</li><li>Multiplayer mode</li><li>Cool graphics</li></ul>".to_string(),
            category: Category::Games,
            sub_category: SubCategory::Strategy,
            rating: 4.5,
            rating_count: 12500,
            installs: "10M+".to_string(),
            current_version: "2.14.5".to_string(),
            updated_date: "2024-05-15".to_string(),
            requires_android: "5.0 and up".to_string(),
            screenshots: vec![
                "https://picsum.photos/id/101/800/450".to_string(),
                "https://picsum.photos/id/102/800/450".to_string(),
                "https://picsum.photos/id/103/800/450".to_string(),
            ],
            tags: vec![
                "Building".to_string(),
                "Simulation".to_string(),
                "Multiplayer".to_string(),
            ],
            versions: vec![
                AppVersion {
                    id: "v1-mod".to_string(),
                    version_name: "2.14.5".to_string(),
                    version_code: 2145,
                    label: "v2.14.5 - Mod Unlimited Gems".to_string(),
                    mod_type: ModType::UnlimitedMoney,
                    size: "65 MB".to_string(),
                    upload_date: "2024-05-16".to_string(),
                    md5: "a1b2c3d4e5f6".to_string(),
                    downloads: 54320,
                    virus_scan_status: VirusScanStatus::Clean,
                    file_url: "#".to_string(),
                },
                AppVersion {
                    id: "v1-orig".to_string(),
                    version_name: "2.14.5".to_string(),
                    version_code: 2145,
                    label: "v2.14.5 - Original".to_string(),
                    mod_type: ModType::Original,
                    size: "64 MB".to_string(),
                    upload_date: "2024-05-15".to_string(),
                    md5: "f6e5d4c3b2a1".to_string(),
                    downloads: 1200,
                    virus_scan_status: VirusScanStatus::Clean,
                    file_url: "#".to_string(),
                },
            ],
        },
        AppRecord {
            id: "2".to_string(),
            package_id: "com.stream.music".to_string(),
            name: "StreamMusic".to_string(),
            developer: "Music Corp".to_string(),
            icon_url: "https://picsum.photos/id/20/200/200".to_string(),
            short_description: "Listen to your favorite songs without limits.".to_string(),
            full_description: "<p>Listen to music anywhere, anytime.</p>".to_string(),
            category: Category::Apps,
            sub_category: SubCategory::Social,
            rating: 4.8,
            rating_count: 89000,
            installs: "100M+".to_string(),
            current_version: "8.9.12".to_string(),
            updated_date: "2024-05-18".to_string(),
            requires_android: "6.0 and up".to_string(),
            screenshots: vec![
                "https://picsum.photos/id/120/800/450".to_string(),
                "https://picsum.photos/id/121/800/450".to_string(),
            ],
            tags: vec![
                "Music".to_string(),
                "Audio".to_string(),
                "Streaming".to_string(),
            ],
            versions: vec![AppVersion {
                id: "v2-mod".to_string(),
                version_name: "8.9.12".to_string(),
                version_code: 8912,
                label: "v8.9.12 - Premium Unlocked".to_string(),
                mod_type: ModType::PremiumUnlocked,
                size: "42 MB".to_string(),
                upload_date: "2024-05-19".to_string(),
                md5: "998877665544".to_string(),
                downloads: 150000,
                virus_scan_status: VirusScanStatus::Clean,
                file_url: "#".to_string(),
            }],
        },
        AppRecord {
            id: "3".to_string(),
            package_id: "com.rpg.legends".to_string(),
            name: "RPG Legends".to_string(),
            developer: "Quest Studio".to_string(),
            icon_url: "https://picsum.photos/id/30/200/200".to_string(),
            short_description: "An epic role playing adventure awaits you.".to_string(),
            full_description: "Enter a world of magic and monsters.".to_string(),
            category: Category::Games,
            sub_category: SubCategory::Rpg,
            rating: 4.2,
            rating_count: 3400,
            installs: "1M+".to_string(),
            current_version: "1.0.4".to_string(),
            updated_date: "2024-05-10".to_string(),
            requires_android: "7.0 and up".to_string(),
            screenshots: vec!["https://picsum.photos/id/130/800/450".to_string()],
            tags: vec!["RPG".to_string(), "Fantasy".to_string()],
            versions: vec![AppVersion {
                id: "v3-mod".to_string(),
                version_name: "1.0.4".to_string(),
                version_code: 104,
                label: "v1.0.4 - God Mode".to_string(),
                mod_type: ModType::GodMode,
                size: "120 MB".to_string(),
                upload_date: "2024-05-11".to_string(),
                md5: "123123123".to_string(),
                downloads: 8500,
                virus_scan_status: VirusScanStatus::Clean,
                file_url: "#".to_string(),
            }],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_draft() -> DraftRecord {
        DraftRecord {
            package_id: "com.example.app".to_string(),
            name: "Example".to_string(),
            developer: "Example Dev".to_string(),
            icon_url: "https://play-lh.googleusercontent.com/icon".to_string(),
            short_description: "Short".to_string(),
            full_description: "<p>Full</p>".to_string(),
            category: Category::Games,
            rating: 4.0,
            rating_count: 10,
            installs: "1M+".to_string(),
            current_version: "1.0".to_string(),
            updated_date: "2024-06-01".to_string(),
            requires_android: "5.0+".to_string(),
            screenshots: vec![],
        }
    }

    #[test]
    fn test_finalize_attaches_identity_fields() {
        let record = sample_draft().finalize(
            "abc-123".to_string(),
            SubCategory::Action,
            vec!["Arcade".to_string()],
            vec![],
        );

        assert_eq!(record.id, "abc-123");
        assert_eq!(record.sub_category, SubCategory::Action);
        assert_eq!(record.tags, vec!["Arcade".to_string()]);
        assert!(record.versions.is_empty());
        assert_eq!(record.package_id, "com.example.app");
    }

    #[test]
    fn test_finalize_clamps_rating() {
        let mut draft = sample_draft();
        draft.rating = 9.7;
        let record = draft.finalize("x".to_string(), SubCategory::Action, vec![], vec![]);
        assert_eq!(record.rating, 5.0);

        let mut draft = sample_draft();
        draft.rating = -1.0;
        let record = draft.finalize("y".to_string(), SubCategory::Action, vec![], vec![]);
        assert_eq!(record.rating, 0.0);
    }

    #[test]
    fn test_record_json_round_trip() {
        let records = seed_catalog();
        let json = serde_json::to_string(&records).unwrap();
        let back: Vec<AppRecord> = serde_json::from_str(&json).unwrap();
        assert_eq!(records, back);
    }

    #[test]
    fn test_enum_wire_labels() {
        let json = serde_json::to_string(&ModType::UnlimitedMoney).unwrap();
        assert_eq!(json, "\"Unlimited Money\"");

        let json = serde_json::to_string(&VirusScanStatus::Clean).unwrap();
        assert_eq!(json, "\"clean\"");

        let json = serde_json::to_string(&SubCategory::Rpg).unwrap();
        assert_eq!(json, "\"RPG\"");
    }

    #[test]
    fn test_record_serializes_camel_case() {
        let record = &seed_catalog()[0];
        let value = serde_json::to_value(record).unwrap();
        assert!(value.get("packageId").is_some());
        assert!(value.get("iconUrl").is_some());
        assert!(value.get("updatedDate").is_some());
        assert!(value.get("package_id").is_none());
    }

    #[test]
    fn test_category_from_str() {
        assert_eq!("Games".parse::<Category>().unwrap(), Category::Games);
        assert!("Bogus".parse::<Category>().is_err());
    }
}
