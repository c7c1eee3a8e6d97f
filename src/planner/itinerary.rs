//! Itinerary types.
//!
//! Field names on the wire follow the JSON schema given to the generation
//! service (`day`, `hotel`, `food`, `totalBudget`), so the same types parse
//! service replies and serialize JSON output.

use serde::{Deserialize, Serialize};

/// A complete multi-day travel plan.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Itinerary {
    /// Trip title.
    pub title: String,
    /// Short overview.
    pub summary: String,
    /// Days in order, numbered from 1.
    pub days: Vec<ItineraryDay>,
    /// Estimated budget as "low - high" text.
    #[serde(rename = "totalBudget")]
    pub total_budget_range: String,
    /// General advice for the trip.
    pub tips: Vec<String>,
}

/// One day of an itinerary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ItineraryDay {
    /// 1-based position within the itinerary.
    #[serde(rename = "day")]
    pub day_index: u32,
    /// Day title.
    pub title: String,
    /// Places visited, in order. Never empty.
    pub locations: Vec<String>,
    /// Things to do, in order.
    pub activities: Vec<String>,
    /// Suggested lodging. Descriptive only, not a catalog reference.
    #[serde(rename = "hotel")]
    pub hotel_name: String,
    /// Suggested dishes or venues. Descriptive only.
    #[serde(rename = "food")]
    pub food_names: Vec<String>,
    /// Extra advice for the day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Where a generated itinerary came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum PlanSource {
    /// Parsed from the external generation service.
    External,
    /// Synthesized locally.
    Fallback,
}

/// Output of one successful generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedPlan {
    /// The itinerary.
    pub itinerary: Itinerary,
    /// Which strategy produced it.
    pub source: PlanSource,
    /// Why the fallback was used after the service was tried, if it was.
    pub fallback_reason: Option<String>,
}

impl Itinerary {
    /// Number of days in the plan.
    #[must_use]
    pub fn day_count(&self) -> usize {
        self.days.len()
    }
}

impl std::fmt::Display for PlanSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::External => "external",
            Self::Fallback => "fallback",
        };
        write!(f, "{s}")
    }
}

impl std::fmt::Display for Itinerary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.title)?;
        writeln!(f, "{}", self.summary)?;
        for day in &self.days {
            writeln!(f, "  Day {}: {}", day.day_index, day.title)?;
            writeln!(f, "    Locations: {}", day.locations.join(", "))?;
        }
        write!(f, "Budget: {}", self.total_budget_range)
    }
}
