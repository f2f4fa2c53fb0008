use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// The ten canonical waste categories. Wire value equals storage value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "burnable")]
    Burnable,
    #[serde(rename = "nonBurnable")]
    NonBurnable,
    #[serde(rename = "recyclable")]
    Recyclable,
    #[serde(rename = "bottles")]
    Bottles,
    #[serde(rename = "cans")]
    Cans,
    #[serde(rename = "plastics")]
    Plastics,
    #[serde(rename = "pet_bottles")]
    PetBottles,
    #[serde(rename = "paper_and_cloth")]
    PaperAndCloth,
    #[serde(rename = "hazardous_and_dangerous")]
    HazardousAndDangerous,
    #[serde(rename = "cooking_oil")]
    CookingOil,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Burnable,
        Category::NonBurnable,
        Category::Recyclable,
        Category::Bottles,
        Category::Cans,
        Category::Plastics,
        Category::PetBottles,
        Category::PaperAndCloth,
        Category::HazardousAndDangerous,
        Category::CookingOil,
    ];

    pub fn as_wire(&self) -> &'static str {
        match self {
            Category::Burnable => "burnable",
            Category::NonBurnable => "nonBurnable",
            Category::Recyclable => "recyclable",
            Category::Bottles => "bottles",
            Category::Cans => "cans",
            Category::Plastics => "plastics",
            Category::PetBottles => "pet_bottles",
            Category::PaperAndCloth => "paper_and_cloth",
            Category::HazardousAndDangerous => "hazardous_and_dangerous",
            Category::CookingOil => "cooking_oil",
        }
    }

    pub fn from_wire(token: &str) -> Option<Category> {
        Category::ALL.iter().copied().find(|c| c.as_wire() == token)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_wire())
    }
}

/// Collection days (1-31) per category within one month
pub type MonthlySchedule = BTreeMap<Category, Vec<u32>>;

/// Canonical schedule: month key ("1".."12", no leading zeros) to monthly schedule.
/// Legacy records still in the store may carry "YYYY-MM" keys until the bulk
/// normalization pass rewrites them.
pub type Schedule = BTreeMap<String, MonthlySchedule>;

/// One entry of the legacy list-shaped schedule, pre-dating the canonical map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegacyMonthEntry {
    /// Absolute month key, e.g. "2025-04"
    pub month: String,
    #[serde(default)]
    pub schedule: MonthlySchedule,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Municipality {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub prefecture: String,
    #[serde(default)]
    pub prefecture_en: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Municipality {
    pub fn new(prefecture: impl Into<String>, prefecture_en: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            prefecture: prefecture.into(),
            prefecture_en: prefecture_en.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CityKind {
    City,
    Ward,
    Town,
    Village,
}

/// Present only in the new nested schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct City {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub name_en: String,
    #[serde(default, rename = "type")]
    pub kind: Option<CityKind>,
}

/// The finest-grained geographic unit carrying its own collection schedule.
/// English name is stored as an empty string when absent so the persisted
/// shape stays stable for readers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Area {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub name: String,
    #[serde(default)]
    pub name_en: String,
    #[serde(default)]
    pub schedule: Option<Schedule>,
}

/// Disposal-category reference record with bilingual fields. Japanese values
/// are always populated at persistence time; English values default to empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GarbageItem {
    #[serde(default)]
    pub id: Option<Uuid>,
    /// Set when the item lives in the flat top-level collection
    #[serde(default)]
    pub municipality_id: Option<Uuid>,
    pub category: Category,
    pub name_ja: String,
    #[serde(default)]
    pub name_en: String,
    #[serde(default)]
    pub description_ja: String,
    #[serde(default)]
    pub description_en: String,
    #[serde(default)]
    pub examples_ja: Vec<String>,
    #[serde(default)]
    pub examples_en: Vec<String>,
}

/// Structured candidate data produced by one extraction chunk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedData {
    #[serde(default)]
    pub areas: Vec<ExtractedArea>,
    #[serde(default, rename = "garbageItems")]
    pub garbage_items: Vec<ExtractedItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedArea {
    pub name: String,
    #[serde(default)]
    pub schedule: Schedule,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedItem {
    pub name: String,
    pub category: Category,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub examples: Vec<String>,
}
