//! Catalog loading and lookup.
//!
//! A catalog is either the built-in East Java reference data or a YAML file
//! with `destinations`, `hotels` and `foods` lists.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::{debug, info};

use crate::error::{CatalogError, Result};

use super::types::{CatalogKind, Destination, Food, Hotel};

/// Immutable reference data for one region.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Catalog {
    /// Destinations, listed for inspiration only.
    #[serde(default)]
    pub destinations: Vec<Destination>,
    /// Hotels available for selection.
    #[serde(default)]
    pub hotels: Vec<Hotel>,
    /// Food venues available for selection.
    #[serde(default)]
    pub foods: Vec<Food>,
}

impl Catalog {
    /// Returns the built-in East Java catalog.
    #[must_use]
    pub fn east_java() -> Self {
        let destinations = vec![
            destination(1, "Bromo Tengger Semeru", "Gunung", "Destinasi pegunungan terkenal"),
            destination(2, "Pantai Malang Selatan", "Pantai", "Pantai indah di selatan"),
        ];

        let hotels = vec![
            hotel(1, "Hotel Santika Malang", 4.5, "Malang", "Rp 650.000/night"),
            hotel(2, "Grand Inna Malioboro", 4.3, "Surabaya", "Rp 550.000/night"),
            hotel(3, "Whiz Prime Surabaya", 4.2, "Surabaya", "Rp 450.000/night"),
            hotel(4, "Swiss-Belinn Malang", 4.4, "Malang", "Rp 600.000/night"),
        ];

        let foods = vec![
            food(1, "Rawon Setan", 4.8, "Rp 35.000", "Surabaya"),
            food(2, "Bakso President", 4.6, "Rp 25.000", "Malang"),
            food(3, "Soto Ayam Lamongan", 4.7, "Rp 20.000", "Surabaya"),
            food(4, "Pecel Madiun", 4.5, "Rp 15.000", "Madiun"),
        ];

        Self {
            destinations,
            hotels,
            foods,
        }
    }

    /// Loads a catalog from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file is missing, unparsable, or has duplicate ids.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading catalog from: {}", path.display());

        if !path.exists() {
            return Err(CatalogError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let content = std::fs::read_to_string(path)?;
        Self::parse_yaml(&content)
    }

    /// Parses a catalog from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid or an id repeats within a kind.
    pub fn parse_yaml(content: &str) -> Result<Self> {
        let catalog: Self = serde_yaml::from_str(content).map_err(|e| CatalogError::ParseError {
            message: format!("YAML parse error: {e}"),
        })?;

        catalog.check_unique_ids()?;

        debug!(
            "Catalog has {} destinations, {} hotels, {} foods",
            catalog.destinations.len(),
            catalog.hotels.len(),
            catalog.foods.len()
        );
        Ok(catalog)
    }

    /// Looks up a hotel by id.
    #[must_use]
    pub fn hotel(&self, id: u32) -> Option<&Hotel> {
        self.hotels.iter().find(|h| h.id == id)
    }

    /// Looks up a food venue by id.
    #[must_use]
    pub fn food(&self, id: u32) -> Option<&Food> {
        self.foods.iter().find(|f| f.id == id)
    }

    /// Looks up a hotel by id, failing if it is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownItem`] if no hotel has this id.
    pub fn require_hotel(&self, id: u32) -> Result<&Hotel, CatalogError> {
        self.hotel(id).ok_or(CatalogError::UnknownItem {
            kind: CatalogKind::Hotel,
            id,
        })
    }

    /// Looks up a food venue by id, failing if it is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownItem`] if no food venue has this id.
    pub fn require_food(&self, id: u32) -> Result<&Food, CatalogError> {
        self.food(id).ok_or(CatalogError::UnknownItem {
            kind: CatalogKind::Food,
            id,
        })
    }

    fn check_unique_ids(&self) -> Result<(), CatalogError> {
        ensure_unique(
            self.destinations.iter().map(|d| d.id),
            CatalogKind::Destination,
        )?;
        ensure_unique(self.hotels.iter().map(|h| h.id), CatalogKind::Hotel)?;
        ensure_unique(self.foods.iter().map(|f| f.id), CatalogKind::Food)
    }
}

fn ensure_unique(ids: impl Iterator<Item = u32>, kind: CatalogKind) -> Result<(), CatalogError> {
    let mut seen = HashSet::new();
    for id in ids {
        if !seen.insert(id) {
            return Err(CatalogError::DuplicateId { kind, id });
        }
    }
    Ok(())
}

fn destination(id: u32, name: &str, category: &str, description: &str) -> Destination {
    Destination {
        id,
        name: name.to_string(),
        category: category.to_string(),
        description: description.to_string(),
    }
}

fn hotel(id: u32, name: &str, rating: f32, location: &str, price: &str) -> Hotel {
    Hotel {
        id,
        name: name.to_string(),
        rating,
        location: location.to_string(),
        price: price.to_string(),
    }
}

fn food(id: u32, name: &str, rating: f32, price: &str, location: &str) -> Food {
    Food {
        id,
        name: name.to_string(),
        rating,
        price: price.to_string(),
        location: location.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GuideError;
    use std::io::Write;

    #[test]
    fn test_builtin_catalog_lookup() {
        let catalog = Catalog::east_java();
        assert_eq!(catalog.hotels.len(), 4);
        assert_eq!(catalog.foods.len(), 4);
        assert_eq!(catalog.hotel(3).map(|h| h.name.as_str()), Some("Whiz Prime Surabaya"));
        assert!(catalog.food(99).is_none());
        assert!(catalog.check_unique_ids().is_ok());
    }

    #[test]
    fn test_require_unknown_item() {
        let catalog = Catalog::east_java();
        let err = catalog.require_food(7).unwrap_err();
        assert!(matches!(
            err,
            CatalogError::UnknownItem {
                kind: CatalogKind::Food,
                id: 7
            }
        ));
    }

    #[test]
    fn test_parse_yaml_rejects_duplicate_ids() {
        let yaml = r#"
hotels:
  - { id: 1, name: "A", rating: 4.0, location: "Malang", price: "Rp 1" }
  - { id: 1, name: "B", rating: 4.1, location: "Batu", price: "Rp 2" }
"#;
        let err = Catalog::parse_yaml(yaml).unwrap_err();
        assert!(matches!(
            err,
            GuideError::Catalog(CatalogError::DuplicateId {
                kind: CatalogKind::Hotel,
                id: 1
            })
        ));
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().expect("Failed to create temp file");
        writeln!(
            file,
            "foods:\n  - {{ id: 9, name: \"Lontong Balap\", rating: 4.4, \
             price: \"Rp 18.000\", location: \"Surabaya\" }}"
        )
        .expect("Failed to write catalog");

        let catalog = Catalog::load_file(file.path()).expect("Failed to load catalog");
        assert!(catalog.hotels.is_empty());
        assert_eq!(catalog.food(9).map(|f| f.name.as_str()), Some("Lontong Balap"));
    }

    #[test]
    fn test_load_missing_file() {
        let result = Catalog::load_file("/nonexistent/catalog.yaml");
        assert!(matches!(
            result,
            Err(GuideError::Catalog(CatalogError::FileNotFound { .. }))
        ));
    }
}
