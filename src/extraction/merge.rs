use crate::domain::{ExtractedArea, ExtractedData, ExtractedItem, Schedule};
use std::collections::{HashMap, HashSet};

/// Merges independent, possibly-overlapping chunk results into one.
///
/// Areas merge by exact name; the first occurrence establishes identity.
/// Day lists for a month/category present on both sides are unioned,
/// deduplicated and sorted ascending. Items deduplicate by exact name,
/// first occurrence wins; later duplicates are discarded entirely.
pub fn merge_extracted(results: Vec<ExtractedData>) -> ExtractedData {
    let mut areas: Vec<ExtractedArea> = Vec::new();
    let mut area_index: HashMap<String, usize> = HashMap::new();
    let mut items: Vec<ExtractedItem> = Vec::new();
    let mut item_names: HashSet<String> = HashSet::new();

    for data in results {
        for area in data.areas {
            match area_index.get(&area.name) {
                Some(&index) => merge_schedule(&mut areas[index].schedule, &area.schedule),
                None => {
                    area_index.insert(area.name.clone(), areas.len());
                    areas.push(area);
                }
            }
        }

        for item in data.garbage_items {
            if item_names.insert(item.name.clone()) {
                items.push(item);
            }
        }
    }

    ExtractedData {
        areas,
        garbage_items: items,
    }
}

fn merge_schedule(existing: &mut Schedule, incoming: &Schedule) {
    for (month, incoming_month) in incoming {
        let Some(existing_month) = existing.get_mut(month) else {
            existing.insert(month.clone(), incoming_month.clone());
            continue;
        };

        for (category, days) in incoming_month {
            if days.is_empty() {
                continue;
            }
            match existing_month.get_mut(category) {
                None => {
                    existing_month.insert(*category, days.clone());
                }
                Some(existing_days) => {
                    let mut merged: Vec<u32> =
                        existing_days.iter().chain(days.iter()).copied().collect();
                    merged.sort_unstable();
                    merged.dedup();
                    *existing_days = merged;
                }
            }
        }
    }
}
