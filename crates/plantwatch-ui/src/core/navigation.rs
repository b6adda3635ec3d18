//! Drill-down navigation across the setup screens.
//!
//! Each step records the chosen entity in the hierarchy (which unsets the
//! levels below it) and names the screen to open next.

use plantwatch_api_models::{Account, Area, Asset, EntityRef, Plant, System};
use thiserror::Error;

use crate::core::hierarchy::{HierarchyLevel, HierarchyStore};

/// Setup screens reachable by drilling down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Plants of the selected account.
    Plants,
    /// Areas of the selected plant.
    Areas,
    /// Systems of the selected area.
    Systems,
    /// Assets of the selected system.
    Assets,
    /// Components of the selected asset.
    Components,
}

impl Route {
    /// Client-side path.
    #[must_use]
    pub const fn path(self) -> &'static str {
        match self {
            Self::Plants => "/database-setup/plants",
            Self::Areas => "/database-setup/areas",
            Self::Systems => "/database-setup/systems",
            Self::Assets => "/database-setup/assets",
            Self::Components => "/database-setup/components",
        }
    }
}

/// Navigation refused because the entity has no identifier yet.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
#[error("cannot navigate from an unsaved {0}")]
pub struct MissingId(pub HierarchyLevel);

fn display(level: HierarchyLevel, id: i64, description: Option<&str>, code: Option<&str>) -> String {
    description
        .filter(|text| !text.is_empty())
        .or_else(|| code.filter(|text| !text.is_empty()))
        .map_or_else(|| format!("{} {id}", level.title()), str::to_string)
}

fn select(
    store: &HierarchyStore,
    level: HierarchyLevel,
    id: Option<i64>,
    description: Option<&str>,
    code: Option<&str>,
) -> Result<(), MissingId> {
    let id = id.ok_or(MissingId(level))?;
    store.update(level, id, display(level, id, description, code));
    Ok(())
}

/// Select `account` and open its plants.
///
/// # Errors
///
/// Returns [`MissingId`] when the account has no identifier.
pub fn navigate_to_plants(store: &HierarchyStore, account: &Account) -> Result<Route, MissingId> {
    select(
        store,
        HierarchyLevel::Account,
        account.id,
        Some(&account.description),
        Some(&account.code),
    )?;
    Ok(Route::Plants)
}

/// Select `plant` and open its areas.
///
/// # Errors
///
/// Returns [`MissingId`] when the plant has no identifier.
pub fn navigate_to_areas(store: &HierarchyStore, plant: &Plant) -> Result<Route, MissingId> {
    select(
        store,
        HierarchyLevel::Plant,
        plant.id,
        plant.description.as_deref(),
        plant.code.as_deref(),
    )?;
    Ok(Route::Areas)
}

/// Select `area` and open its systems.
///
/// # Errors
///
/// Returns [`MissingId`] when the area has no identifier.
pub fn navigate_to_systems(store: &HierarchyStore, area: &Area) -> Result<Route, MissingId> {
    select(
        store,
        HierarchyLevel::Area,
        area.id,
        area.description.as_deref(),
        area.code.as_deref(),
    )?;
    Ok(Route::Systems)
}

/// Select `system` and open its assets.
///
/// # Errors
///
/// Returns [`MissingId`] when the system has no identifier.
pub fn navigate_to_assets(store: &HierarchyStore, system: &System) -> Result<Route, MissingId> {
    select(
        store,
        HierarchyLevel::System,
        system.id,
        system.description.as_deref(),
        system.code.as_deref(),
    )?;
    Ok(Route::Assets)
}

/// Open the components of `asset`, selecting its owning system when known.
///
/// # Errors
///
/// Returns [`MissingId`] when the owning system reference has no identifier.
pub fn navigate_to_components(store: &HierarchyStore, asset: &Asset) -> Result<Route, MissingId> {
    if let Some(EntityRef {
        id,
        code,
        description,
    }) = &asset.system
    {
        select(
            store,
            HierarchyLevel::System,
            *id,
            description.as_deref(),
            code.as_deref(),
        )?;
    }
    Ok(Route::Components)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::hierarchy::HierarchyValue;
    use crate::core::storage::{MemoryStorage, PersistentStore};
    use std::rc::Rc;

    fn store() -> HierarchyStore {
        HierarchyStore::load(PersistentStore::with_defaults(Rc::new(MemoryStorage::new())))
    }

    #[test]
    fn account_drill_down_clears_lower_levels() {
        let hierarchy = store();
        hierarchy.update_plant(2, "Old plant");
        let account = Account {
            id: Some(5),
            code: "ACME".into(),
            ..Account::default()
        };
        assert_eq!(navigate_to_plants(&hierarchy, &account), Ok(Route::Plants));
        assert_eq!(hierarchy.account(), HierarchyValue::selected(5, "ACME"));
        assert!(!hierarchy.plant().is_set());
    }

    #[test]
    fn description_falls_back_to_level_and_id() {
        let hierarchy = store();
        let plant = Plant {
            id: Some(8),
            ..Plant::default()
        };
        navigate_to_areas(&hierarchy, &plant).expect("navigate");
        assert_eq!(hierarchy.plant().description, "Plant 8");
        assert_eq!(Route::Areas.path(), "/database-setup/areas");
    }

    #[test]
    fn unsaved_entities_are_rejected() {
        let hierarchy = store();
        assert_eq!(
            navigate_to_systems(&hierarchy, &Area::default()),
            Err(MissingId(HierarchyLevel::Area))
        );
        assert!(hierarchy.snapshot().is_empty());
    }

    #[test]
    fn components_select_owning_system_when_present() {
        let hierarchy = store();
        let orphan = Asset::default();
        assert_eq!(navigate_to_components(&hierarchy, &orphan), Ok(Route::Components));
        assert!(!hierarchy.system().is_set());

        let owned = Asset {
            system: Some(EntityRef::new(9, "Cooling")),
            ..Asset::default()
        };
        navigate_to_components(&hierarchy, &owned).expect("navigate");
        assert_eq!(hierarchy.system(), HierarchyValue::selected(9, "Cooling"));
    }
}
