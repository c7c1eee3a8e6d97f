//! Catalog entry types.

use serde::{Deserialize, Serialize};

/// Kind of catalog entry.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    /// Tourist destination.
    Destination,
    /// Lodging.
    Hotel,
    /// Food venue or dish.
    Food,
}

/// A catalog entry that can be layered onto an itinerary as a selection.
pub trait CatalogItem: Clone {
    /// The catalog this item belongs to.
    const KIND: CatalogKind;

    /// Stable id, unique within the item's catalog.
    fn id(&self) -> u32;

    /// Display name.
    fn name(&self) -> &str;
}

/// A destination shown in the catalog listing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Destination {
    /// Unique id.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Category, e.g. mountain or beach.
    #[serde(rename = "type")]
    pub category: String,
    /// Short description.
    pub description: String,
}

/// A hotel the traveler can add to the route.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Hotel {
    /// Unique id.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Rating out of five.
    pub rating: f32,
    /// City or area.
    pub location: String,
    /// Price per night, as displayed.
    pub price: String,
}

/// A food venue or dish the traveler can add to the route.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Food {
    /// Unique id.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Rating out of five.
    pub rating: f32,
    /// Price per portion, as displayed.
    pub price: String,
    /// City or area.
    pub location: String,
}

impl CatalogItem for Hotel {
    const KIND: CatalogKind = CatalogKind::Hotel;

    fn id(&self) -> u32 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl CatalogItem for Food {
    const KIND: CatalogKind = CatalogKind::Food;

    fn id(&self) -> u32 {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Destination => "destination",
            Self::Hotel => "hotel",
            Self::Food => "food",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for CatalogKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "destination" | "destinations" => Ok(Self::Destination),
            "hotel" | "hotels" => Ok(Self::Hotel),
            "food" | "foods" => Ok(Self::Food),
            other => Err(format!("unknown catalog kind '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_parsing() {
        assert_eq!("Hotels".parse::<CatalogKind>(), Ok(CatalogKind::Hotel));
        assert_eq!("food".parse::<CatalogKind>(), Ok(CatalogKind::Food));
        assert!("spa".parse::<CatalogKind>().is_err());
    }

    #[test]
    fn test_destination_type_field() {
        let yaml = "id: 1\nname: Bromo\ntype: Gunung\ndescription: Volcano\n";
        let destination: Destination = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(destination.category, "Gunung");
    }
}
