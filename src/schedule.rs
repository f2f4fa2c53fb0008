use crate::domain::Schedule;
use crate::formats::RawArea;
use tracing::warn;

/// Normalizes a single schedule key to the canonical month string ("1".."12").
///
/// "2025-04" and "04" both normalize to "4"; already-canonical keys pass
/// through unchanged. Out-of-range or non-numeric input is not rejected, it
/// yields "NaN" or the out-of-range numeral and is logged.
pub fn normalize_month_key(key: &str) -> String {
    let month_part = if key.contains('-') {
        key.split('-').nth(1).unwrap_or("")
    } else {
        key
    };

    match month_part.trim().parse::<i64>() {
        Ok(month) => {
            if !(1..=12).contains(&month) {
                warn!("Schedule key '{}' normalizes to out-of-range month {}", key, month);
            }
            month.to_string()
        }
        Err(_) => {
            warn!("Schedule key '{}' has a non-numeric month portion", key);
            "NaN".to_string()
        }
    }
}

/// Converts an input area record to the canonical month-indexed schedule.
///
/// A canonical `schedule` map takes precedence when both shapes are present;
/// a legacy `monthlySchedules` list is converted entry by entry; an area with
/// neither yields an empty map. Day lists are copied verbatim, without
/// deduplication or sorting.
pub fn to_canonical_schedule(area: &RawArea) -> Schedule {
    if let Some(schedule) = &area.schedule {
        return schedule.clone();
    }

    let mut canonical = Schedule::new();
    if let Some(entries) = &area.monthly_schedules {
        for entry in entries {
            canonical.insert(normalize_month_key(&entry.month), entry.schedule.clone());
        }
    }
    canonical
}

/// True when any key still uses the legacy "YYYY-MM" shape
pub fn has_legacy_keys(schedule: &Schedule) -> bool {
    schedule.keys().any(|key| key.contains('-'))
}

/// Rewrites every key of a persisted schedule through [`normalize_month_key`]
pub fn normalize_schedule_keys(schedule: &Schedule) -> Schedule {
    schedule
        .iter()
        .map(|(key, monthly)| (normalize_month_key(key), monthly.clone()))
        .collect()
}
