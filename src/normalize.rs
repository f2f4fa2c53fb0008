use crate::error::{AdminError, Result};
use crate::schedule::{has_legacy_keys, normalize_schedule_keys};
use crate::store::{AreaParent, DocumentStore};
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalizeSummary {
    pub normalized: usize,
    pub skipped: usize,
}

/// Rewrites every legacy date-keyed schedule under a municipality to the
/// canonical month-keyed shape, in place. Areas without a schedule, or whose
/// schedule is already canonical, are counted as skipped.
///
/// This is a destructive rewrite; callers must obtain operator confirmation
/// before invoking it.
pub async fn normalize_municipality(
    store: &dyn DocumentStore,
    municipality_id: Uuid,
) -> Result<NormalizeSummary> {
    let municipality = store
        .get_municipality(municipality_id)
        .await?
        .ok_or_else(|| {
            AdminError::NotFound(format!("municipality {municipality_id} does not exist"))
        })?;

    let parent = AreaParent::Municipality(municipality_id);
    let areas = store.list_areas(parent).await?;
    let total = areas.len();
    let mut summary = NormalizeSummary::default();

    for area in areas {
        let Some(schedule) = &area.schedule else {
            summary.skipped += 1;
            continue;
        };
        if !has_legacy_keys(schedule) {
            summary.skipped += 1;
            continue;
        }

        let area_id = area.id.ok_or_else(|| AdminError::Store {
            message: format!("persisted area '{}' has no id", area.name),
        })?;
        let normalized = normalize_schedule_keys(schedule);
        store
            .update_area_schedule(parent, area_id, &normalized)
            .await?;
        summary.normalized += 1;
        info!(
            "Normalized schedule for {} ({}/{})",
            area.name,
            summary.normalized + summary.skipped,
            total
        );
    }

    info!(
        "Normalization finished for '{}': {} normalized, {} skipped",
        municipality.prefecture, summary.normalized, summary.skipped
    );
    Ok(summary)
}
