//! Selection reconciliation.
//!
//! Keeps the hotels and food venues the traveler layered on top of the
//! current itinerary. Each kind is a [`SelectionSet`] keyed by catalog id, so
//! repeated adds and removes converge to the same set regardless of how many
//! times they are applied.

use std::collections::HashSet;
use tracing::debug;

use crate::catalog::{CatalogItem, Food, Hotel};

/// Ordered, id-unique selections of one catalog kind.
#[derive(Debug, Clone)]
pub struct SelectionSet<T: CatalogItem> {
    /// Items in insertion order.
    items: Vec<T>,
    /// Ids of `items`, for constant-time membership.
    ids: HashSet<u32>,
}

/// Hotel and food selections for the active itinerary.
#[derive(Debug, Clone, Default)]
pub struct SelectionReconciler {
    /// Selected hotels.
    pub hotels: SelectionSet<Hotel>,
    /// Selected food venues.
    pub foods: SelectionSet<Food>,
}

impl<T: CatalogItem> Default for SelectionSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: CatalogItem> SelectionSet<T> {
    /// Creates an empty selection set.
    #[must_use]
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            ids: HashSet::new(),
        }
    }

    /// Appends an item unless one with the same id is already selected.
    ///
    /// Returns true if the set changed.
    pub fn add(&mut self, item: T) -> bool {
        if !self.ids.insert(item.id()) {
            debug!("{} {} already selected", T::KIND, item.id());
            return false;
        }
        debug!("Selected {} {} ({})", T::KIND, item.id(), item.name());
        self.items.push(item);
        true
    }

    /// Removes the item with this id, if selected.
    ///
    /// Returns true if the set changed.
    pub fn remove(&mut self, id: u32) -> bool {
        if !self.ids.remove(&id) {
            return false;
        }
        self.items.retain(|item| item.id() != id);
        debug!("Removed {} {id}", T::KIND);
        true
    }

    /// Returns true if an item with this id is selected.
    #[must_use]
    pub fn contains(&self, id: u32) -> bool {
        self.ids.contains(&id)
    }

    /// Selected items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Number of selected items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Drops every selection.
    pub fn clear(&mut self) {
        self.items.clear();
        self.ids.clear();
    }
}

impl SelectionReconciler {
    /// Creates empty selections.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drops hotel and food selections.
    pub fn clear(&mut self) {
        self.hotels.clear();
        self.foods.clear();
    }

    /// Returns true if neither kind has selections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hotels.is_empty() && self.foods.is_empty()
    }
}
