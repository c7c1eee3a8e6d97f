//! Reference catalogs of destinations, hotels and food venues.
//!
//! Catalogs are immutable data handed to the engine at construction. The
//! engine reads ids and display fields and never writes back.

mod store;
mod types;

pub use store::Catalog;
pub use types::{CatalogItem, CatalogKind, Destination, Food, Hotel};
