use std::sync::Arc;

use chrono::{Datelike, Utc};

use realty_core::BuildingId;

use crate::building::{Building, BuildingDraft};
use crate::error::{CatalogError, CatalogResult};
use crate::ports::BuildingRepository;

/// Creates and looks up buildings.
#[derive(Clone)]
pub struct BuildingRegistry {
    buildings: Arc<dyn BuildingRepository>,
}

impl BuildingRegistry {
    pub fn new(buildings: Arc<dyn BuildingRepository>) -> Self {
        Self { buildings }
    }

    pub async fn create(&self, draft: BuildingDraft) -> CatalogResult<Building> {
        let new_building = draft.validate(Utc::now().year())?;
        let building = self.buildings.insert(new_building).await?;
        tracing::info!(house_id = %building.id, year = building.year, "house created");
        Ok(building)
    }

    pub async fn get(&self, id: BuildingId) -> CatalogResult<Building> {
        self.buildings
            .find(id)
            .await?
            .ok_or(CatalogError::BuildingNotFound(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::building::MIN_CONSTRUCTION_YEAR;
    use crate::testing::FakeCatalog;
    use proptest::prelude::*;

    fn registry() -> BuildingRegistry {
        BuildingRegistry::new(Arc::new(FakeCatalog::default()))
    }

    fn draft(address: &str, year: i32, developer: Option<&str>) -> BuildingDraft {
        BuildingDraft {
            address: address.into(),
            year,
            developer: developer.map(Into::into),
        }
    }

    #[tokio::test]
    async fn get_returns_what_create_stored() {
        let registry = registry();
        let oak = registry.create(draft("Oak St", 1990, Some("Acme"))).await.unwrap();
        let elm = registry.create(draft("Elm St", 2001, None)).await.unwrap();
        assert_ne!(oak.id, elm.id);

        let fetched = registry.get(oak.id).await.unwrap();
        assert_eq!(fetched, oak);
        assert_eq!(fetched.address, "Oak St");
        assert_eq!(fetched.year, 1990);
        assert_eq!(fetched.developer.as_deref(), Some("Acme"));
        assert_eq!(registry.get(elm.id).await.unwrap().developer, None);
    }

    #[tokio::test]
    async fn unknown_building_is_not_found() {
        let err = registry().get(BuildingId::new(42)).await.unwrap_err();
        assert!(matches!(err, CatalogError::BuildingNotFound(id) if id == BuildingId::new(42)));
    }

    #[tokio::test]
    async fn invalid_draft_is_not_stored() {
        let registry = registry();
        let err = registry.create(draft("Oak St", 1700, None)).await.unwrap_err();
        assert!(matches!(err, CatalogError::Validation(ref f) if f.field == "year"));
        assert!(registry.get(BuildingId::new(1)).await.is_err());
    }

    proptest! {
        #[test]
        fn create_then_get_round_trips(
            address in "[A-Za-z][A-Za-z0-9 ]{0,20}[A-Za-z0-9]",
            year in MIN_CONSTRUCTION_YEAR..=2026i32,
            developer in proptest::option::of("[A-Za-z]{1,12}"),
        ) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            rt.block_on(async {
                let registry = registry();
                let created = registry
                    .create(draft(&address, year, developer.as_deref()))
                    .await
                    .unwrap();
                let fetched = registry.get(created.id).await.unwrap();
                assert_eq!(fetched.id, created.id);
                assert_eq!(fetched.address, address);
                assert_eq!(fetched.year, year);
                assert_eq!(fetched.developer, developer);
            });
        }
    }
}
