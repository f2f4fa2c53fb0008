use crate::domain::{Area, City, ExtractedData, GarbageItem};
use crate::error::{AdminError, Result};
use crate::formats::records::build_item;
use crate::formats::{JsonPayload, NewFormatPayload, OldFormatPayload};
use crate::schedule::to_canonical_schedule;
use crate::store::{AreaParent, DocumentStore};
use tracing::{info, warn};
use uuid::Uuid;

/// Running per-entity write counts for one import operation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub cities: usize,
    pub areas: usize,
    pub items: usize,
}

fn assigned_id(id: Option<Uuid>, entity: &str) -> Result<Uuid> {
    id.ok_or_else(|| AdminError::Store {
        message: format!("store did not assign an id to the created {entity}"),
    })
}

async fn require_municipality(store: &dyn DocumentStore, municipality_id: Uuid) -> Result<String> {
    let municipality = store
        .get_municipality(municipality_id)
        .await?
        .ok_or_else(|| {
            AdminError::NotFound(format!("municipality {municipality_id} does not exist"))
        })?;
    Ok(municipality.prefecture)
}

/// Imports a detected JSON payload into the selected municipality.
///
/// Writes are sequential and not transactional; a failure partway through
/// leaves previously-written entities persisted.
pub async fn import_payload(
    store: &dyn DocumentStore,
    municipality_id: Uuid,
    payload: JsonPayload,
) -> Result<ImportSummary> {
    let prefecture = require_municipality(store, municipality_id).await?;
    info!("Importing into municipality '{}'", prefecture);

    match payload {
        JsonPayload::New(payload) => import_new(store, municipality_id, payload).await,
        JsonPayload::Old(payload) => import_old(store, municipality_id, payload).await,
    }
}

/// New nested format: every source municipality's cities and areas are
/// written under the single selected target municipality.
async fn import_new(
    store: &dyn DocumentStore,
    municipality_id: Uuid,
    payload: NewFormatPayload,
) -> Result<ImportSummary> {
    if payload.municipalities.len() > 1 {
        warn!(
            "Payload contains {} municipalities; all of them will be written under the selected target",
            payload.municipalities.len()
        );
    }

    let items: Vec<GarbageItem> = payload.garbage_items.iter().filter_map(build_item).collect();
    let mut summary = ImportSummary::default();

    for source_municipality in &payload.municipalities {
        for raw_city in &source_municipality.cities {
            let mut city = City {
                id: None,
                name: raw_city.name.clone(),
                name_en: raw_city.name_en.clone().unwrap_or_default(),
                kind: raw_city.kind,
            };
            store.create_city(municipality_id, &mut city).await?;
            summary.cities += 1;
            let city_id = assigned_id(city.id, "city")?;
            let parent = AreaParent::City {
                municipality_id,
                city_id,
            };

            for raw_area in &raw_city.areas {
                let schedule = to_canonical_schedule(raw_area);
                let mut area = Area {
                    id: None,
                    name: raw_area.name.clone(),
                    name_en: raw_area.name_en.clone().unwrap_or_default(),
                    schedule: Some(schedule),
                };
                store.create_area(parent, &mut area).await?;
                summary.areas += 1;
                let area_id = assigned_id(area.id, "area")?;

                // Global item list is replicated onto every area in scope
                for item in &items {
                    let mut item = item.clone();
                    store.create_area_item(parent, area_id, &mut item).await?;
                    summary.items += 1;
                }

                info!(
                    cities = summary.cities,
                    areas = summary.areas,
                    items = summary.items,
                    "Import progress"
                );
            }
        }
    }

    Ok(summary)
}

/// Old flat format: areas directly under the municipality, then the global
/// item list replicated onto every created area's item subcollection.
async fn import_old(
    store: &dyn DocumentStore,
    municipality_id: Uuid,
    payload: OldFormatPayload,
) -> Result<ImportSummary> {
    let items: Vec<GarbageItem> = payload.garbage_items.iter().filter_map(build_item).collect();
    let parent = AreaParent::Municipality(municipality_id);
    let mut summary = ImportSummary::default();
    let mut created_area_ids = Vec::with_capacity(payload.areas.len());

    for raw_area in &payload.areas {
        let schedule = to_canonical_schedule(raw_area);
        let mut area = Area {
            id: None,
            name: raw_area.name.clone(),
            name_en: raw_area.name_en.clone().unwrap_or_default(),
            schedule: Some(schedule),
        };
        store.create_area(parent, &mut area).await?;
        summary.areas += 1;
        created_area_ids.push(assigned_id(area.id, "area")?);
        info!(
            "Imported area {}/{}",
            summary.areas,
            payload.areas.len()
        );
    }

    for area_id in &created_area_ids {
        for item in &items {
            let mut item = item.clone();
            store.create_area_item(parent, *area_id, &mut item).await?;
            summary.items += 1;
        }
    }
    if !items.is_empty() {
        info!(
            "Replicated {} items onto {} areas",
            items.len(),
            created_area_ids.len()
        );
    }

    Ok(summary)
}

/// Writes canonical items to the flat municipality-tagged collection.
/// Used for item-table imports, which carry no area scope.
pub async fn import_items(
    store: &dyn DocumentStore,
    municipality_id: Uuid,
    items: Vec<GarbageItem>,
) -> Result<ImportSummary> {
    require_municipality(store, municipality_id).await?;

    let mut summary = ImportSummary::default();
    for mut item in items {
        store.create_flat_item(municipality_id, &mut item).await?;
        summary.items += 1;
        info!("Imported item {} ({})", summary.items, item.name_ja);
    }
    Ok(summary)
}

/// Persists a reviewed extraction draft: areas directly under the
/// municipality, items into the flat tagged collection.
pub async fn save_extracted(
    store: &dyn DocumentStore,
    municipality_id: Uuid,
    data: &ExtractedData,
) -> Result<ImportSummary> {
    require_municipality(store, municipality_id).await?;

    let parent = AreaParent::Municipality(municipality_id);
    let mut summary = ImportSummary::default();

    for extracted in &data.areas {
        let mut area = Area {
            id: None,
            name: extracted.name.clone(),
            name_en: String::new(),
            schedule: Some(extracted.schedule.clone()),
        };
        store.create_area(parent, &mut area).await?;
        summary.areas += 1;
    }

    for extracted in &data.garbage_items {
        let mut item = GarbageItem {
            id: None,
            municipality_id: None,
            category: extracted.category,
            name_ja: extracted.name.clone(),
            name_en: String::new(),
            description_ja: extracted.description.clone(),
            description_en: String::new(),
            examples_ja: extracted.examples.clone(),
            examples_en: Vec::new(),
        };
        store.create_flat_item(municipality_id, &mut item).await?;
        summary.items += 1;
    }

    info!(
        "Saved extraction draft: {} areas, {} items",
        summary.areas, summary.items
    );
    Ok(summary)
}
