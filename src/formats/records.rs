use crate::domain::{Category, GarbageItem, LegacyMonthEntry, MonthlySchedule};
use crate::formats::categories::{category_for_column, parse_day_list};
use crate::formats::csv::Table;
use crate::formats::{RawArea, RawGarbageItem};
use std::collections::HashMap;
use tracing::warn;

/// Builds legacy-shaped area records from a schedule table.
///
/// Rows are grouped by area name; the first occurrence pins the English name
/// and starts the month list. Each row contributes one legacy month entry,
/// so the output matches the direct JSON legacy format and goes through the
/// shape converter before persistence.
pub fn build_schedule_areas(table: &Table) -> Vec<RawArea> {
    let Some(name_idx) = table.column("name") else {
        return Vec::new();
    };
    let Some(month_idx) = table.column("month") else {
        return Vec::new();
    };
    let name_en_idx = table.column("name_en");

    let category_columns: Vec<(usize, Category)> = table
        .header
        .iter()
        .enumerate()
        .filter_map(|(index, column)| category_for_column(column).map(|c| (index, c)))
        .collect();

    let mut areas: Vec<RawArea> = Vec::new();
    let mut index_by_name: HashMap<String, usize> = HashMap::new();

    for row in &table.rows {
        let name = row[name_idx].as_str();
        let month = row[month_idx].as_str();
        if name.is_empty() || month.is_empty() {
            warn!("Skipping schedule row: blank name or month");
            continue;
        }

        let mut monthly = MonthlySchedule::new();
        for (column_idx, category) in &category_columns {
            let days = parse_day_list(&row[*column_idx]);
            if !days.is_empty() {
                // Last synonym column wins by insertion order
                monthly.insert(*category, days);
            }
        }
        let entry = LegacyMonthEntry {
            month: month.to_string(),
            schedule: monthly,
        };

        match index_by_name.get(name) {
            Some(&area_idx) => {
                if let Some(entries) = areas[area_idx].monthly_schedules.as_mut() {
                    entries.push(entry);
                }
            }
            None => {
                index_by_name.insert(name.to_string(), areas.len());
                areas.push(RawArea {
                    id: None,
                    name: name.to_string(),
                    name_en: name_en_idx
                        .map(|idx| row[idx].clone())
                        .filter(|value| !value.is_empty()),
                    schedule: None,
                    monthly_schedules: Some(vec![entry]),
                });
            }
        }
    }

    areas
}

/// Builds canonical items from an item table, skipping invalid rows
pub fn build_items(table: &Table) -> Vec<GarbageItem> {
    let cell = |row: &[String], column: &str| -> Option<String> {
        table
            .column(column)
            .map(|idx| row[idx].clone())
            .filter(|value| !value.is_empty())
    };

    table
        .rows
        .iter()
        .filter_map(|row| {
            let raw = RawGarbageItem {
                name_ja: cell(row, "item_name_ja"),
                name_en: cell(row, "item_name_en"),
                category: cell(row, "category").unwrap_or_default(),
                description_ja: cell(row, "description_ja"),
                description_en: cell(row, "description_en"),
                examples_ja: cell(row, "examples_ja").map(|v| split_pipe_list(&v)),
                examples_en: cell(row, "examples_en").map(|v| split_pipe_list(&v)),
                ..Default::default()
            };
            build_item(&raw)
        })
        .collect()
}

/// Splits a pipe-delimited example-list cell, dropping empty segments
pub fn split_pipe_list(cell: &str) -> Vec<String> {
    cell.split('|')
        .map(|segment| segment.trim())
        .filter(|segment| !segment.is_empty())
        .map(|segment| segment.to_string())
        .collect()
}

/// Constructs a canonical item from a raw record, applying the legacy
/// fallback precedence (`name` → `name_ja`, etc). Returns None with a
/// warning when a required field is missing or the category is invalid.
pub fn build_item(raw: &RawGarbageItem) -> Option<GarbageItem> {
    let name_ja = raw
        .name_ja
        .as_deref()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| raw.name.as_deref().filter(|v| !v.trim().is_empty()));
    let Some(name_ja) = name_ja else {
        warn!("Skipping item: missing required Japanese name");
        return None;
    };

    let category_token = raw.category.trim();
    let Some(category) = Category::from_wire(category_token) else {
        warn!(
            "Skipping item '{}': invalid category '{}'",
            name_ja, category_token
        );
        return None;
    };

    Some(GarbageItem {
        id: None,
        municipality_id: None,
        category,
        name_ja: name_ja.to_string(),
        name_en: raw.name_en.clone().unwrap_or_default(),
        description_ja: raw
            .description_ja
            .clone()
            .or_else(|| raw.description.clone())
            .unwrap_or_default(),
        description_en: raw.description_en.clone().unwrap_or_default(),
        examples_ja: raw
            .examples_ja
            .clone()
            .or_else(|| raw.examples.clone())
            .unwrap_or_default(),
        examples_en: raw.examples_en.clone().unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::csv::parse_table;

    #[test]
    fn schedule_rows_group_by_area_name() {
        let table = parse_table(
            "name,name_en,month,burnable,resources\n\
             中央区,Chuo,2025-04,\"1,8,15,22\",4\n\
             中央区,IGNORED,2025-05,\"6,13\",\n\
             北区,,2025-04,2,",
        )
        .unwrap();

        let areas = build_schedule_areas(&table);
        assert_eq!(areas.len(), 2);

        let chuo = &areas[0];
        assert_eq!(chuo.name, "中央区");
        // First occurrence pins the English name
        assert_eq!(chuo.name_en.as_deref(), Some("Chuo"));
        let entries = chuo.monthly_schedules.as_ref().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].month, "2025-04");
        assert_eq!(entries[0].schedule[&Category::Burnable], vec![1, 8, 15, 22]);
        assert_eq!(entries[0].schedule[&Category::Recyclable], vec![4]);
        // Empty day cell contributes no category entry
        assert!(!entries[1].schedule.contains_key(&Category::Recyclable));

        let kita = &areas[1];
        assert_eq!(kita.name_en, None);
    }

    #[test]
    fn duplicate_synonym_columns_last_one_wins() {
        let table = parse_table("name,month,resources,resource_dates\n中央区,2025-04,4,11").unwrap();
        let areas = build_schedule_areas(&table);
        let entries = areas[0].monthly_schedules.as_ref().unwrap();
        assert_eq!(entries[0].schedule[&Category::Recyclable], vec![11]);
    }

    #[test]
    fn item_rows_with_invalid_category_are_skipped() {
        let table = parse_table(
            "item_name_ja,category,description_ja,examples_ja\n\
             スプレー缶,nonBurnable,中身を使い切る,ヘアスプレー|殺虫剤|\n\
             古新聞,newspaper,,\n\
             ,burnable,,",
        )
        .unwrap();

        let items = build_items(&table);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name_ja, "スプレー缶");
        assert_eq!(items[0].category, Category::NonBurnable);
        assert_eq!(items[0].examples_ja, vec!["ヘアスプレー", "殺虫剤"]);
        assert_eq!(items[0].name_en, "");
    }

    #[test]
    fn legacy_single_language_fields_fall_back() {
        let raw = RawGarbageItem {
            name: Some("乾電池".to_string()),
            category: "hazardous_and_dangerous".to_string(),
            description: Some("透明な袋に入れて出す".to_string()),
            examples: Some(vec!["単三電池".to_string()]),
            ..Default::default()
        };
        let item = build_item(&raw).unwrap();
        assert_eq!(item.name_ja, "乾電池");
        assert_eq!(item.description_ja, "透明な袋に入れて出す");
        assert_eq!(item.examples_ja, vec!["単三電池"]);
        assert_eq!(item.description_en, "");
    }

    #[test]
    fn bilingual_fields_take_precedence_over_legacy() {
        let raw = RawGarbageItem {
            name: Some("legacy".to_string()),
            name_ja: Some("ペットボトル".to_string()),
            category: "pet_bottles".to_string(),
            ..Default::default()
        };
        assert_eq!(build_item(&raw).unwrap().name_ja, "ペットボトル");
    }

    #[test]
    fn pipe_list_drops_empty_segments() {
        assert_eq!(split_pipe_list("a| b ||c|"), vec!["a", "b", "c"]);
        assert_eq!(split_pipe_list(""), Vec::<String>::new());
    }
}
