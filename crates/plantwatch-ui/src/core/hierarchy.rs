//! Cascading account → plant → area → system selection.
//!
//! # Design
//! - Changing or clearing a level resets every strict descendant in the same
//!   transition, so no descendant can reference a stale ancestor.
//! - Ancestors are never required: a plant may be picked without an account.
//! - Seeding from the login scope is a full replace and applies no cascade.
//! - Every transition writes the state once and notifies listeners once.

use std::cell::RefCell;
use std::fmt;
use std::str::FromStr;

use plantwatch_api_models::{EntityRef, IdRef, ListFilters};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::core::observer::{Observable, Subscription};
use crate::core::storage::PersistentStore;

/// Storage key of the persisted selection.
pub const HIERARCHY_STORAGE_KEY: &str = "hierarchy-store";

static ORDERED: [HierarchyLevel; 4] = HierarchyLevel::ALL;

/// One tier of the organisational hierarchy, ordered root first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HierarchyLevel {
    /// Customer account (root).
    Account,
    /// Plant within an account.
    Plant,
    /// Area within a plant.
    Area,
    /// System within an area (leaf).
    System,
}

impl HierarchyLevel {
    /// Every level, root first.
    pub const ALL: [Self; 4] = [Self::Account, Self::Plant, Self::Area, Self::System];

    /// Lower-case wire name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Account => "account",
            Self::Plant => "plant",
            Self::Area => "area",
            Self::System => "system",
        }
    }

    /// Capitalised display name.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Account => "Account",
            Self::Plant => "Plant",
            Self::Area => "Area",
            Self::System => "System",
        }
    }

    const fn depth(self) -> usize {
        match self {
            Self::Account => 0,
            Self::Plant => 1,
            Self::Area => 2,
            Self::System => 3,
        }
    }

    /// Strict descendants, nearest first.
    #[must_use]
    pub fn descendants(self) -> &'static [Self] {
        &ORDERED[self.depth() + 1..]
    }

    /// This level followed by its descendants.
    #[must_use]
    pub fn with_descendants(self) -> &'static [Self] {
        &ORDERED[self.depth()..]
    }
}

impl fmt::Display for HierarchyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected hierarchy level name.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown hierarchy level '{0}' (expected account, plant, area, or system)")]
pub struct LevelParseError(pub String);

impl FromStr for HierarchyLevel {
    type Err = LevelParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "account" => Ok(Self::Account),
            "plant" => Ok(Self::Plant),
            "area" => Ok(Self::Area),
            "system" => Ok(Self::System),
            _ => Err(LevelParseError(value.to_string())),
        }
    }
}

/// Selection held at a single level.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyValue {
    /// Selected identifier; `None` means unset.
    pub id: Option<i64>,
    #[serde(default)]
    /// Display text.
    pub description: String,
    #[serde(default)]
    /// Whether the value came from the user's assigned scope.
    pub readonly: bool,
}

impl HierarchyValue {
    /// The unset value.
    #[must_use]
    pub const fn unset() -> Self {
        Self {
            id: None,
            description: String::new(),
            readonly: false,
        }
    }

    /// A user selection.
    #[must_use]
    pub fn selected(id: i64, description: impl Into<String>) -> Self {
        Self {
            id: Some(id),
            description: description.into(),
            readonly: false,
        }
    }

    /// Whether an identifier is present.
    #[must_use]
    pub const fn is_set(&self) -> bool {
        self.id.is_some()
    }

    fn from_scope(entity: Option<&EntityRef>) -> Self {
        entity.map_or_else(Self::unset, |entity| Self {
            id: entity.id,
            description: entity.description.clone().unwrap_or_default(),
            readonly: true,
        })
    }
}

/// The four-level selection. Every level key must be present when decoding.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyState {
    /// Account level.
    pub account: HierarchyValue,
    /// Plant level.
    pub plant: HierarchyValue,
    /// Area level.
    pub area: HierarchyValue,
    /// System level.
    pub system: HierarchyValue,
}

impl HierarchyState {
    /// Value held at `level`.
    #[must_use]
    pub const fn get(&self, level: HierarchyLevel) -> &HierarchyValue {
        match level {
            HierarchyLevel::Account => &self.account,
            HierarchyLevel::Plant => &self.plant,
            HierarchyLevel::Area => &self.area,
            HierarchyLevel::System => &self.system,
        }
    }

    fn slot(&mut self, level: HierarchyLevel) -> &mut HierarchyValue {
        match level {
            HierarchyLevel::Account => &mut self.account,
            HierarchyLevel::Plant => &mut self.plant,
            HierarchyLevel::Area => &mut self.area,
            HierarchyLevel::System => &mut self.system,
        }
    }

    /// Set `level` to a user selection and unset its descendants.
    pub fn select(&mut self, level: HierarchyLevel, id: i64, description: impl Into<String>) {
        *self.slot(level) = HierarchyValue::selected(id, description);
        for child in level.descendants() {
            *self.slot(*child) = HierarchyValue::unset();
        }
    }

    /// Unset `level` and its descendants.
    pub fn clear_from(&mut self, level: HierarchyLevel) {
        for target in level.with_descendants() {
            *self.slot(*target) = HierarchyValue::unset();
        }
    }

    /// Whether every level is unset.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        HierarchyLevel::ALL
            .iter()
            .all(|level| !self.get(*level).is_set())
    }

    /// Identifier filters for each set level.
    #[must_use]
    pub fn id_refs(&self) -> [(HierarchyLevel, Option<IdRef>); 4] {
        HierarchyLevel::ALL.map(|level| (level, self.get(level).id.map(|id| IdRef { id })))
    }

    /// List filters restricted to the selected levels.
    #[must_use]
    pub fn list_filters(&self) -> ListFilters {
        let mut filters = ListFilters::default();
        for (level, reference) in self.id_refs() {
            match level {
                HierarchyLevel::Account => filters.account = reference,
                HierarchyLevel::Plant => filters.plant = reference,
                HierarchyLevel::Area => filters.area = reference,
                HierarchyLevel::System => filters.system = reference,
            }
        }
        filters
    }
}

/// Scope assigned to a user, as carried on the login payload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HierarchyScope {
    /// Assigned account.
    pub account: Option<EntityRef>,
    /// Assigned plant.
    pub plant: Option<EntityRef>,
    /// Assigned area.
    pub area: Option<EntityRef>,
    /// Assigned system.
    pub system: Option<EntityRef>,
}

/// Owner of the hierarchy selection, its persistence, and its listeners.
#[derive(Debug)]
pub struct HierarchyStore {
    storage: PersistentStore,
    state: RefCell<HierarchyState>,
    observers: Observable<HierarchyState>,
}

impl HierarchyStore {
    /// Hydrate from storage. Any structural problem in the stored blob yields
    /// the all-unset state.
    #[must_use]
    pub fn load(storage: PersistentStore) -> Self {
        let state = storage
            .get::<HierarchyState>(HIERARCHY_STORAGE_KEY)
            .unwrap_or_default();
        Self {
            storage,
            state: RefCell::new(state),
            observers: Observable::new(),
        }
    }

    /// Current selection.
    #[must_use]
    pub fn snapshot(&self) -> HierarchyState {
        self.state.borrow().clone()
    }

    /// Current value at `level`.
    #[must_use]
    pub fn level(&self, level: HierarchyLevel) -> HierarchyValue {
        self.state.borrow().get(level).clone()
    }

    /// Current account value.
    #[must_use]
    pub fn account(&self) -> HierarchyValue {
        self.level(HierarchyLevel::Account)
    }

    /// Current plant value.
    #[must_use]
    pub fn plant(&self) -> HierarchyValue {
        self.level(HierarchyLevel::Plant)
    }

    /// Current area value.
    #[must_use]
    pub fn area(&self) -> HierarchyValue {
        self.level(HierarchyLevel::Area)
    }

    /// Current system value.
    #[must_use]
    pub fn system(&self) -> HierarchyValue {
        self.level(HierarchyLevel::System)
    }

    /// Listen for state changes.
    pub fn subscribe(&self, listener: impl Fn(&HierarchyState) + 'static) -> Subscription {
        self.observers.subscribe(listener)
    }

    fn transition(&self, operation: &'static str, apply: impl FnOnce(&mut HierarchyState)) {
        let snapshot = {
            let mut state = self.state.borrow_mut();
            apply(&mut state);
            state.clone()
        };
        debug!(operation, "hierarchy transition");
        self.storage.set(HIERARCHY_STORAGE_KEY, &snapshot);
        self.observers.notify(&snapshot);
    }

    /// Replace the whole selection with the user's scope, marking present
    /// levels read-only.
    pub fn init_from_login(&self, scope: &HierarchyScope) {
        self.transition("init_from_login", |state| {
            *state = HierarchyState {
                account: HierarchyValue::from_scope(scope.account.as_ref()),
                plant: HierarchyValue::from_scope(scope.plant.as_ref()),
                area: HierarchyValue::from_scope(scope.area.as_ref()),
                system: HierarchyValue::from_scope(scope.system.as_ref()),
            };
        });
    }

    /// Select `id` at `level` and unset its descendants.
    pub fn update(&self, level: HierarchyLevel, id: i64, description: impl Into<String>) {
        let description = description.into();
        self.transition("update", |state| state.select(level, id, description));
    }

    /// Select an account; plant, area, and system are unset.
    pub fn update_account(&self, id: i64, description: impl Into<String>) {
        self.update(HierarchyLevel::Account, id, description);
    }

    /// Select a plant; area and system are unset.
    pub fn update_plant(&self, id: i64, description: impl Into<String>) {
        self.update(HierarchyLevel::Plant, id, description);
    }

    /// Select an area; system is unset.
    pub fn update_area(&self, id: i64, description: impl Into<String>) {
        self.update(HierarchyLevel::Area, id, description);
    }

    /// Select a system.
    pub fn update_system(&self, id: i64, description: impl Into<String>) {
        self.update(HierarchyLevel::System, id, description);
    }

    /// Unset `level` and its descendants; ancestors are untouched.
    pub fn clear_level(&self, level: HierarchyLevel) {
        self.transition("clear_level", |state| state.clear_from(level));
    }

    /// Unset every level.
    pub fn clear_account(&self) {
        self.clear_level(HierarchyLevel::Account);
    }

    /// Unset plant, area, and system.
    pub fn clear_plant(&self) {
        self.clear_level(HierarchyLevel::Plant);
    }

    /// Unset area and system.
    pub fn clear_area(&self) {
        self.clear_level(HierarchyLevel::Area);
    }

    /// Unset system.
    pub fn clear_system(&self) {
        self.clear_level(HierarchyLevel::System);
    }

    /// Unset every level and persist the empty selection.
    pub fn reset(&self) {
        self.transition("reset", |state| *state = HierarchyState::default());
    }

    /// Unset every level and delete the stored entry.
    pub fn clear(&self) {
        self.storage.remove(HIERARCHY_STORAGE_KEY);
        let snapshot = {
            let mut state = self.state.borrow_mut();
            *state = HierarchyState::default();
            state.clone()
        };
        debug!(operation = "clear", "hierarchy transition");
        self.observers.notify(&snapshot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::{MemoryStorage, NoopStorage, StorageBackend};
    use std::cell::Cell;
    use std::rc::Rc;

    fn fixture() -> (Rc<MemoryStorage>, PersistentStore, HierarchyStore) {
        let backend = Rc::new(MemoryStorage::new());
        let storage = PersistentStore::with_defaults(backend.clone());
        let store = HierarchyStore::load(storage.clone());
        (backend, storage, store)
    }

    fn fully_selected(store: &HierarchyStore) {
        store.update_account(1, "Acme");
        store.update_plant(2, "North");
        store.update_area(3, "Boilers");
        store.update_system(4, "Feedwater");
    }

    #[test]
    fn levels_parse_case_insensitively() {
        assert_eq!("Plant".parse::<HierarchyLevel>(), Ok(HierarchyLevel::Plant));
        assert_eq!(" SYSTEM ".parse::<HierarchyLevel>(), Ok(HierarchyLevel::System));
        assert_eq!(
            "asset".parse::<HierarchyLevel>(),
            Err(LevelParseError("asset".to_string()))
        );
    }

    #[test]
    fn descendants_follow_hierarchy_order() {
        assert_eq!(
            HierarchyLevel::Account.descendants(),
            &[HierarchyLevel::Plant, HierarchyLevel::Area, HierarchyLevel::System]
        );
        assert!(HierarchyLevel::System.descendants().is_empty());
        assert_eq!(
            HierarchyLevel::Area.with_descendants(),
            &[HierarchyLevel::Area, HierarchyLevel::System]
        );
    }

    #[test]
    fn update_resets_strict_descendants_for_every_level() {
        for level in HierarchyLevel::ALL {
            let (_backend, _storage, store) = fixture();
            fully_selected(&store);
            store.update(level, 42, "picked");
            let state = store.snapshot();
            assert_eq!(state.get(level), &HierarchyValue::selected(42, "picked"));
            for child in level.descendants() {
                assert_eq!(state.get(*child), &HierarchyValue::unset(), "{level} -> {child}");
            }
            for ancestor in HierarchyLevel::ALL.iter().filter(|other| **other < level) {
                assert!(state.get(*ancestor).is_set());
            }
        }
    }

    #[test]
    fn clear_resets_level_and_descendants_only() {
        for level in HierarchyLevel::ALL {
            let (_backend, _storage, store) = fixture();
            fully_selected(&store);
            let before = store.snapshot();
            store.clear_level(level);
            let after = store.snapshot();
            for target in HierarchyLevel::ALL {
                if target >= level {
                    assert_eq!(after.get(target), &HierarchyValue::unset());
                } else {
                    assert_eq!(after.get(target), before.get(target));
                }
            }
        }
    }

    #[test]
    fn init_from_login_marks_scope_readonly_without_cascade() {
        let (_backend, _storage, store) = fixture();
        store.update_area(8, "stale");
        store.init_from_login(&HierarchyScope {
            account: Some(EntityRef::new(5, "A")),
            system: Some(EntityRef::new(9, "S")),
            ..HierarchyScope::default()
        });
        let state = store.snapshot();
        assert_eq!(
            state.account,
            HierarchyValue {
                id: Some(5),
                description: "A".into(),
                readonly: true
            }
        );
        assert_eq!(state.plant, HierarchyValue::unset());
        assert_eq!(state.area, HierarchyValue::unset());
        assert_eq!(
            state.system,
            HierarchyValue {
                id: Some(9),
                description: "S".into(),
                readonly: true
            }
        );
    }

    #[test]
    fn updating_plant_without_account_is_allowed() {
        let (_backend, _storage, store) = fixture();
        store.update_plant(3, "Orphan");
        assert_eq!(store.account(), HierarchyValue::unset());
        assert_eq!(store.plant(), HierarchyValue::selected(3, "Orphan"));
    }

    #[test]
    fn reset_is_idempotent_and_persisted() {
        let (_backend, storage, store) = fixture();
        fully_selected(&store);
        store.reset();
        let once = store.snapshot();
        store.reset();
        assert_eq!(store.snapshot(), once);
        assert!(once.is_empty());
        assert_eq!(
            storage.get::<HierarchyState>(HIERARCHY_STORAGE_KEY),
            Some(HierarchyState::default())
        );
    }

    #[test]
    fn clear_deletes_stored_entry() {
        let (_backend, storage, store) = fixture();
        fully_selected(&store);
        assert!(storage.contains(HIERARCHY_STORAGE_KEY));
        store.clear();
        assert!(!storage.contains(HIERARCHY_STORAGE_KEY));
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn persisted_state_round_trips() {
        let (_backend, storage, store) = fixture();
        store.update_account(1, "Acme");
        store.update_plant(2, "North");
        let reloaded = HierarchyStore::load(storage);
        assert_eq!(reloaded.snapshot(), store.snapshot());
    }

    #[test]
    fn malformed_blobs_hydrate_as_unset() {
        let cases = [
            "{\"account\":{\"id\":1,\"description\":\"A\",\"readonly\":false}",
            "{\"account\":{\"id\":1},\"plant\":{\"id\":null},\"area\":{\"id\":null}}",
            "{\"account\":{\"id\":\"one\"},\"plant\":{},\"area\":{},\"system\":{}}",
            "[]",
        ];
        for raw in cases {
            let backend = Rc::new(MemoryStorage::new());
            backend.write("app_hierarchy-store", raw).expect("write");
            let store = HierarchyStore::load(PersistentStore::with_defaults(backend));
            assert_eq!(store.snapshot(), HierarchyState::default(), "{raw}");
        }
    }

    #[test]
    fn each_transition_notifies_once_with_full_snapshot() {
        let (_backend, _storage, store) = fixture();
        fully_selected(&store);
        let calls = Rc::new(Cell::new(0));
        let last = Rc::new(RefCell::new(None));
        let _subscription = {
            let calls = Rc::clone(&calls);
            let last = Rc::clone(&last);
            store.subscribe(move |state| {
                calls.set(calls.get() + 1);
                *last.borrow_mut() = Some(state.clone());
            })
        };
        store.update_account(7, "Other");
        assert_eq!(calls.get(), 1);
        let seen = last.borrow().clone().expect("notified");
        assert_eq!(seen.account, HierarchyValue::selected(7, "Other"));
        assert!(!seen.plant.is_set() && !seen.area.is_set() && !seen.system.is_set());
    }

    #[test]
    fn listeners_can_read_the_store_during_delivery() {
        let (_backend, _storage, store) = fixture();
        let store = Rc::new(store);
        let observed = Rc::new(Cell::new(None));
        let _subscription = {
            let reader = Rc::clone(&store);
            let observed = Rc::clone(&observed);
            store.subscribe(move |_| observed.set(reader.plant().id))
        };
        store.update_plant(12, "P");
        assert_eq!(observed.get(), Some(12));
    }

    #[test]
    fn transitions_complete_without_persistent_storage() {
        let store = HierarchyStore::load(PersistentStore::with_defaults(Rc::new(NoopStorage)));
        store.update_area(3, "Area");
        assert_eq!(store.area(), HierarchyValue::selected(3, "Area"));
    }

    #[test]
    fn list_filters_include_only_set_levels() {
        let mut state = HierarchyState::default();
        state.select(HierarchyLevel::Account, 1, "A");
        state.select(HierarchyLevel::Area, 3, "C");
        let filters = state.list_filters();
        assert_eq!(filters.account, Some(IdRef { id: 1 }));
        assert_eq!(filters.plant, None);
        assert_eq!(filters.area, Some(IdRef { id: 3 }));
        assert_eq!(filters.system, None);
    }
}
