pub mod categories;
pub mod csv;
pub mod records;

use crate::domain::{CityKind, LegacyMonthEntry, Schedule};
use crate::error::{AdminError, Result};
use serde::Deserialize;

use self::csv::Table;

/// Area as it appears in an input payload, before shape conversion
#[derive(Debug, Clone, Deserialize)]
pub struct RawArea {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(default)]
    pub schedule: Option<Schedule>,
    #[serde(default, rename = "monthlySchedules")]
    pub monthly_schedules: Option<Vec<LegacyMonthEntry>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawCity {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<CityKind>,
    #[serde(default)]
    pub areas: Vec<RawArea>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawMunicipality {
    #[serde(default)]
    pub id: Option<String>,
    pub prefecture: String,
    #[serde(default)]
    pub prefecture_en: Option<String>,
    #[serde(default)]
    pub cities: Vec<RawCity>,
}

/// Item as it appears in an input payload. Legacy single-language fields
/// (`name`, `description`, `examples`) coexist with the bilingual spellings;
/// precedence is applied by the record builder.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawGarbageItem {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub name_ja: Option<String>,
    #[serde(default)]
    pub name_en: Option<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub description_ja: Option<String>,
    #[serde(default)]
    pub description_en: Option<String>,
    #[serde(default)]
    pub examples: Option<Vec<String>>,
    #[serde(default)]
    pub examples_ja: Option<Vec<String>>,
    #[serde(default)]
    pub examples_en: Option<Vec<String>>,
}

/// New nested schema: municipality → city → area
#[derive(Debug, Clone, Deserialize)]
pub struct NewFormatPayload {
    pub municipalities: Vec<RawMunicipality>,
    #[serde(default, rename = "garbageItems")]
    pub garbage_items: Vec<RawGarbageItem>,
}

/// Old flat schema: areas and items at top level
#[derive(Debug, Clone, Deserialize)]
pub struct OldFormatPayload {
    #[serde(default)]
    pub areas: Vec<RawArea>,
    #[serde(default, rename = "garbageItems")]
    pub garbage_items: Vec<RawGarbageItem>,
}

/// JSON payload variants, discriminated by the structural marker field
#[derive(Debug, Clone)]
pub enum JsonPayload {
    New(NewFormatPayload),
    Old(OldFormatPayload),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Schedule,
    Item,
}

/// A classified input payload ready for the importer
#[derive(Debug)]
pub enum DetectedPayload {
    Json(JsonPayload),
    Table { kind: TableKind, table: Table },
}

/// Classifies raw input text as a JSON payload or a tabular payload
pub fn detect(text: &str) -> Result<DetectedPayload> {
    let trimmed = text.trim_start();
    if trimmed.starts_with('{') || trimmed.starts_with('[') {
        return Ok(DetectedPayload::Json(detect_json(text)?));
    }

    let table = csv::parse_table(text)?;
    let kind = classify_header(&table.header)?;
    Ok(DetectedPayload::Table { kind, table })
}

/// An array-typed `municipalities` field selects the new nested format;
/// anything else is assumed to be the old flat format.
pub fn detect_json(text: &str) -> Result<JsonPayload> {
    let value: serde_json::Value = serde_json::from_str(text)?;

    let is_new = value
        .get("municipalities")
        .map(|m| m.is_array())
        .unwrap_or(false);

    if is_new {
        Ok(JsonPayload::New(serde_json::from_value(value)?))
    } else {
        Ok(JsonPayload::Old(serde_json::from_value(value)?))
    }
}

/// Classifies a tabular header row by its required column pair
pub fn classify_header(header: &[String]) -> Result<TableKind> {
    let has = |column: &str| header.iter().any(|h| h == column);

    if has("name") && has("month") {
        Ok(TableKind::Schedule)
    } else if has("item_name_ja") && has("category") {
        Ok(TableKind::Item)
    } else {
        Err(AdminError::UnrecognizedFormat(
            "header must contain either `name` and `month` (schedule table) \
             or `item_name_ja` and `category` (item table)"
                .to_string(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn municipalities_array_selects_new_format() {
        let payload = detect_json(
            r#"{"municipalities":[{"prefecture":"神奈川県","cities":[]}],"garbageItems":[]}"#,
        )
        .unwrap();
        match payload {
            JsonPayload::New(p) => assert_eq!(p.municipalities[0].prefecture, "神奈川県"),
            JsonPayload::Old(_) => panic!("expected new format"),
        }
    }

    #[test]
    fn missing_municipalities_falls_back_to_old_format() {
        let payload =
            detect_json(r#"{"areas":[{"name":"中央区","monthlySchedules":[]}]}"#).unwrap();
        match payload {
            JsonPayload::Old(p) => assert_eq!(p.areas[0].name, "中央区"),
            JsonPayload::New(_) => panic!("expected old format"),
        }
    }

    #[test]
    fn non_array_municipalities_is_old_format() {
        let payload = detect_json(r#"{"municipalities":"oops","areas":[]}"#).unwrap();
        assert!(matches!(payload, JsonPayload::Old(_)));
    }

    #[test]
    fn malformed_json_surfaces_parse_error() {
        assert!(matches!(detect_json("{not json"), Err(AdminError::Json(_))));
    }

    #[test]
    fn header_classification() {
        let header = |names: &[&str]| names.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        assert_eq!(
            classify_header(&header(&["name", "name_en", "month", "burnable"])).unwrap(),
            TableKind::Schedule
        );
        assert_eq!(
            classify_header(&header(&["item_name_ja", "category", "description_ja"])).unwrap(),
            TableKind::Item
        );

        let err = classify_header(&header(&["name", "category"])).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("month"));
        assert!(message.contains("item_name_ja"));
    }

    #[test]
    fn detect_dispatches_between_json_and_table() {
        assert!(matches!(
            detect(r#"{"areas":[]}"#).unwrap(),
            DetectedPayload::Json(_)
        ));
        assert!(matches!(
            detect("item_name_ja,category\nスプレー缶,nonBurnable").unwrap(),
            DetectedPayload::Table {
                kind: TableKind::Item,
                ..
            }
        ));
    }
}
