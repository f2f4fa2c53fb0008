use crate::domain::{Area, City, GarbageItem, Municipality, Schedule};
use crate::error::{AdminError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tracing::debug;
use uuid::Uuid;

/// Where an area document lives in the store hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaParent {
    /// Legacy path: municipalities/{id}/areas
    Municipality(Uuid),
    /// Current path: municipalities/{id}/cities/{id}/areas
    City {
        municipality_id: Uuid,
        city_id: Uuid,
    },
}

/// Seam to the hosted document database. Each write is one awaited store
/// operation; there is no batching, no retry, and no rollback.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn create_municipality(&self, municipality: &mut Municipality) -> Result<()>;
    async fn get_municipality(&self, id: Uuid) -> Result<Option<Municipality>>;
    async fn list_municipalities(&self) -> Result<Vec<Municipality>>;

    async fn create_city(&self, municipality_id: Uuid, city: &mut City) -> Result<()>;
    async fn list_cities(&self, municipality_id: Uuid) -> Result<Vec<City>>;

    async fn create_area(&self, parent: AreaParent, area: &mut Area) -> Result<()>;
    async fn list_areas(&self, parent: AreaParent) -> Result<Vec<Area>>;
    async fn update_area_schedule(
        &self,
        parent: AreaParent,
        area_id: Uuid,
        schedule: &Schedule,
    ) -> Result<()>;

    /// Item nested under an area's subcollection
    async fn create_area_item(
        &self,
        parent: AreaParent,
        area_id: Uuid,
        item: &mut GarbageItem,
    ) -> Result<()>;
    async fn list_area_items(&self, area_id: Uuid) -> Result<Vec<GarbageItem>>;

    /// Item in the flat top-level collection, tagged with the municipality id
    async fn create_flat_item(&self, municipality_id: Uuid, item: &mut GarbageItem) -> Result<()>;
    async fn list_flat_items(&self, municipality_id: Uuid) -> Result<Vec<GarbageItem>>;
}

/// In-memory store implementation for development/testing
pub struct InMemoryStore {
    municipalities: Arc<Mutex<HashMap<Uuid, Municipality>>>,
    cities: Arc<Mutex<HashMap<Uuid, (Uuid, City)>>>,
    areas: Arc<Mutex<HashMap<Uuid, (AreaParent, Area)>>>,
    area_items: Arc<Mutex<HashMap<Uuid, (Uuid, GarbageItem)>>>,
    flat_items: Arc<Mutex<HashMap<Uuid, GarbageItem>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            municipalities: Arc::new(Mutex::new(HashMap::new())),
            cities: Arc::new(Mutex::new(HashMap::new())),
            areas: Arc::new(Mutex::new(HashMap::new())),
            area_items: Arc::new(Mutex::new(HashMap::new())),
            flat_items: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn create_municipality(&self, municipality: &mut Municipality) -> Result<()> {
        let id = Uuid::new_v4();
        municipality.id = Some(id);

        let mut municipalities = self.municipalities.lock().unwrap();
        municipalities.insert(id, municipality.clone());

        debug!(
            "Created municipality: {} with id {}",
            municipality.prefecture, id
        );
        Ok(())
    }

    async fn get_municipality(&self, id: Uuid) -> Result<Option<Municipality>> {
        let municipalities = self.municipalities.lock().unwrap();
        Ok(municipalities.get(&id).cloned())
    }

    async fn list_municipalities(&self) -> Result<Vec<Municipality>> {
        let municipalities = self.municipalities.lock().unwrap();
        Ok(municipalities.values().cloned().collect())
    }

    async fn create_city(&self, municipality_id: Uuid, city: &mut City) -> Result<()> {
        let id = Uuid::new_v4();
        city.id = Some(id);

        let mut cities = self.cities.lock().unwrap();
        cities.insert(id, (municipality_id, city.clone()));

        debug!("Created city: {} with id {}", city.name, id);
        Ok(())
    }

    async fn list_cities(&self, municipality_id: Uuid) -> Result<Vec<City>> {
        let cities = self.cities.lock().unwrap();
        Ok(cities
            .values()
            .filter(|(parent_id, _)| *parent_id == municipality_id)
            .map(|(_, city)| city.clone())
            .collect())
    }

    async fn create_area(&self, parent: AreaParent, area: &mut Area) -> Result<()> {
        let id = Uuid::new_v4();
        area.id = Some(id);

        let mut areas = self.areas.lock().unwrap();
        areas.insert(id, (parent, area.clone()));

        debug!("Created area: {} with id {}", area.name, id);
        Ok(())
    }

    async fn list_areas(&self, parent: AreaParent) -> Result<Vec<Area>> {
        let areas = self.areas.lock().unwrap();
        Ok(areas
            .values()
            .filter(|(area_parent, _)| *area_parent == parent)
            .map(|(_, area)| area.clone())
            .collect())
    }

    async fn update_area_schedule(
        &self,
        parent: AreaParent,
        area_id: Uuid,
        schedule: &Schedule,
    ) -> Result<()> {
        let mut areas = self.areas.lock().unwrap();
        match areas.get_mut(&area_id) {
            Some((area_parent, area)) if *area_parent == parent => {
                area.schedule = Some(schedule.clone());
                debug!("Updated schedule for area: {} ({})", area.name, area_id);
                Ok(())
            }
            _ => Err(AdminError::NotFound(format!(
                "area {area_id} not found under {parent:?}"
            ))),
        }
    }

    async fn create_area_item(
        &self,
        _parent: AreaParent,
        area_id: Uuid,
        item: &mut GarbageItem,
    ) -> Result<()> {
        let id = Uuid::new_v4();
        item.id = Some(id);

        let mut items = self.area_items.lock().unwrap();
        items.insert(id, (area_id, item.clone()));

        debug!("Created item: {} under area {}", item.name_ja, area_id);
        Ok(())
    }

    async fn list_area_items(&self, area_id: Uuid) -> Result<Vec<GarbageItem>> {
        let items = self.area_items.lock().unwrap();
        Ok(items
            .values()
            .filter(|(parent_id, _)| *parent_id == area_id)
            .map(|(_, item)| item.clone())
            .collect())
    }

    async fn create_flat_item(&self, municipality_id: Uuid, item: &mut GarbageItem) -> Result<()> {
        let id = Uuid::new_v4();
        item.id = Some(id);
        item.municipality_id = Some(municipality_id);

        let mut items = self.flat_items.lock().unwrap();
        items.insert(id, item.clone());

        debug!("Created flat item: {} with id {}", item.name_ja, id);
        Ok(())
    }

    async fn list_flat_items(&self, municipality_id: Uuid) -> Result<Vec<GarbageItem>> {
        let items = self.flat_items.lock().unwrap();
        Ok(items
            .values()
            .filter(|item| item.municipality_id == Some(municipality_id))
            .cloned()
            .collect())
    }
}
