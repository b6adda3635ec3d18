//! Adapter used by hierarchy pickers and search inputs.

use std::rc::Rc;

use crate::core::hierarchy::{HierarchyLevel, HierarchyStore, HierarchyValue};

/// Item chosen in a picker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PickedItem {
    /// Identifier of the chosen entity.
    pub id: i64,
    /// Preferred display text.
    pub description: Option<String>,
    /// Fallback display text.
    pub name: Option<String>,
}

impl PickedItem {
    /// Item with only an identifier.
    #[must_use]
    pub const fn id(id: i64) -> Self {
        Self {
            id,
            description: None,
            name: None,
        }
    }

    /// Display text: a non-empty description, else a non-empty name, else
    /// `"<level> <id>"`.
    #[must_use]
    pub fn display(&self, level: HierarchyLevel) -> String {
        self.description
            .as_deref()
            .filter(|text| !text.is_empty())
            .or_else(|| self.name.as_deref().filter(|text| !text.is_empty()))
            .map_or_else(|| format!("{level} {}", self.id), str::to_string)
    }
}

/// Picker-facing view over a shared [`HierarchyStore`].
#[derive(Debug, Clone)]
pub struct HierarchyFilter {
    store: Rc<HierarchyStore>,
}

impl HierarchyFilter {
    /// Bind to `store`.
    #[must_use]
    pub const fn new(store: Rc<HierarchyStore>) -> Self {
        Self { store }
    }

    /// Current value at `level`.
    #[must_use]
    pub fn value(&self, level: HierarchyLevel) -> HierarchyValue {
        self.store.level(level)
    }

    /// Clear `level` and its descendants; returns the unset value so the
    /// input can render it immediately.
    pub fn clear_hierarchy_level(&self, level: HierarchyLevel) -> HierarchyValue {
        self.store.clear_level(level);
        HierarchyValue::unset()
    }

    /// Select `item` at `level` (descendants are unset) and return the value
    /// the input should render.
    pub fn update_hierarchy_level(&self, level: HierarchyLevel, item: &PickedItem) -> HierarchyValue {
        let value = HierarchyValue::selected(item.id, item.display(level));
        self.store.update(level, item.id, value.description.clone());
        value
    }
}

/// Unset values for the strict descendants of `level`, root first. The store
/// is not touched.
#[must_use]
pub fn cleared_child_values(level: HierarchyLevel) -> Vec<(HierarchyLevel, HierarchyValue)> {
    level
        .descendants()
        .iter()
        .map(|child| (*child, HierarchyValue::unset()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::storage::{MemoryStorage, PersistentStore};

    fn fixture() -> (Rc<HierarchyStore>, HierarchyFilter) {
        let store = Rc::new(HierarchyStore::load(PersistentStore::with_defaults(Rc::new(
            MemoryStorage::new(),
        ))));
        (Rc::clone(&store), HierarchyFilter::new(store))
    }

    #[test]
    fn bare_id_gets_generated_description() {
        let (store, filter) = fixture();
        let value = filter.update_hierarchy_level(HierarchyLevel::Plant, &PickedItem::id(3));
        assert_eq!(
            value,
            HierarchyValue {
                id: Some(3),
                description: "plant 3".into(),
                readonly: false
            }
        );
        assert_eq!(store.plant(), value);
    }

    #[test]
    fn description_preferred_then_name() {
        let item = PickedItem {
            id: 4,
            description: Some(String::new()),
            name: Some("Line 4".into()),
        };
        assert_eq!(item.display(HierarchyLevel::Area), "Line 4");
        let item = PickedItem {
            description: Some("Main line".into()),
            ..item
        };
        assert_eq!(item.display(HierarchyLevel::Area), "Main line");
    }

    #[test]
    fn update_cascades_through_store() {
        let (store, filter) = fixture();
        store.update_plant(2, "P");
        store.update_area(3, "A");
        store.update_system(4, "S");
        filter.update_hierarchy_level(HierarchyLevel::Plant, &PickedItem::id(9));
        assert_eq!(store.area(), HierarchyValue::unset());
        assert_eq!(store.system(), HierarchyValue::unset());
    }

    #[test]
    fn clear_returns_unset_and_cascades() {
        let (store, filter) = fixture();
        store.update_account(1, "A");
        store.update_plant(2, "P");
        store.update_area(3, "Ar");
        assert_eq!(
            filter.clear_hierarchy_level(HierarchyLevel::Plant),
            HierarchyValue::unset()
        );
        assert!(store.account().is_set());
        assert!(!store.plant().is_set());
        assert!(!store.area().is_set());
    }

    #[test]
    fn cleared_children_are_strict_descendants_in_order() {
        let levels = |level| {
            cleared_child_values(level)
                .into_iter()
                .map(|(child, value)| {
                    assert_eq!(value, HierarchyValue::unset());
                    child
                })
                .collect::<Vec<_>>()
        };
        assert_eq!(
            levels(HierarchyLevel::Account),
            vec![HierarchyLevel::Plant, HierarchyLevel::Area, HierarchyLevel::System]
        );
        assert_eq!(levels(HierarchyLevel::Area), vec![HierarchyLevel::System]);
        assert!(levels(HierarchyLevel::System).is_empty());
    }

    #[test]
    fn cleared_children_leave_store_untouched() {
        let (store, _filter) = fixture();
        store.update_area(3, "A");
        let _ = cleared_child_values(HierarchyLevel::Plant);
        assert!(store.area().is_set());
    }
}
