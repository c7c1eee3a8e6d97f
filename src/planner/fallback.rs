//! Deterministic offline itinerary synthesis.
//!
//! Used when the generation service is disabled, unreachable, or replies with
//! something that does not parse. The output depends only on the trip
//! parameters and the fallback configuration.

use tracing::debug;

use crate::config::FallbackConfig;

use super::itinerary::{Itinerary, ItineraryDay};
use super::params::TripParameters;

/// Landmarks visited on the arrival day after the starting point.
const ARRIVAL_LANDMARKS: [&str; 2] = ["Tugu Pahlawan", "House of Sampoerna"];

const ARRIVAL_ACTIVITIES: [&str; 4] = [
    "Morning city tour and local breakfast",
    "Visit historical landmarks",
    "Explore local markets",
    "Sunset photography session",
];

const ARRIVAL_NOTES: &str = "Keep the first day light and get used to the local traffic.";

const FOODS: [&str; 3] = ["Rawon Setan", "Soto Ayam", "Pecel Madiun"];

const TIPS: [&str; 4] = [
    "Bring warm clothes for mountain areas",
    "Book accommodations in advance during peak season",
    "Try local street food for authentic experience",
    "Hire a local guide for better insights",
];

/// A day shape reused in rotation after the arrival day.
struct DayTemplate {
    locations: [&'static str; 3],
    activities: [&'static str; 4],
    notes: &'static str,
}

static ROTATION: [DayTemplate; 3] = [
    DayTemplate {
        locations: ["Mount Bromo", "Madakaripura Waterfall", "Cemoro Lawang"],
        activities: [
            "Sunrise jeep tour at Penanjakan viewpoint",
            "Walk the sea of sand to the Bromo crater",
            "Hike to Madakaripura Waterfall",
            "Evening rest in Cemoro Lawang",
        ],
        notes: "Book sunrise tour tickets in advance. Bring warm clothes for mountain areas.",
    },
    DayTemplate {
        locations: ["Batu", "Coban Rondo Waterfall", "Jatim Park 2"],
        activities: [
            "Apple picking at a Batu orchard",
            "Forest walk to Coban Rondo Waterfall",
            "Afternoon at Jatim Park 2",
            "Night market dinner at Alun-Alun Batu",
        ],
        notes: "Weekends in Batu are busy; start early to avoid queues.",
    },
    DayTemplate {
        locations: ["Kawah Ijen", "Baluran National Park", "Pantai Pulau Merah"],
        activities: [
            "Night hike to see the blue fire at Kawah Ijen",
            "Savanna safari drive in Baluran",
            "Beach time at Pulau Merah",
            "Seafood dinner by the coast",
        ],
        notes: "Ijen hikes start around 1 AM; a gas mask is required at the crater.",
    },
];

/// Estimated trip cost range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetRange {
    /// Lower estimate.
    pub low: u64,
    /// Upper estimate.
    pub high: u64,
}

impl BudgetRange {
    /// Computes `days * per_day_rate - buffer` to `days * per_day_rate`.
    ///
    /// The low end saturates at zero for trips shorter than the buffer, where
    /// the plain formula would go negative (`Rp -500000` for one day). See the
    /// budget entry under open question decisions in DESIGN.md.
    #[must_use]
    pub const fn for_trip(days: u32, per_day_rate: u64, buffer: u64) -> Self {
        let high = (days as u64).saturating_mul(per_day_rate);
        Self {
            low: high.saturating_sub(buffer),
            high,
        }
    }

    /// Renders the range with a currency prefix, e.g. `Rp 2500000 - Rp 4500000`.
    #[must_use]
    pub fn render(&self, currency: &str) -> String {
        format!("{currency} {} - {currency} {}", self.low, self.high)
    }
}

/// Builds fallback itineraries.
#[derive(Debug, Clone)]
pub struct FallbackPlanner {
    /// Region named in titles.
    region: String,
    /// Rates, currency and hotel names.
    config: FallbackConfig,
}

impl FallbackPlanner {
    /// Creates a fallback planner for a region.
    #[must_use]
    pub fn new(region: impl Into<String>, config: FallbackConfig) -> Self {
        Self {
            region: region.into(),
            config,
        }
    }

    /// Synthesizes an itinerary from the trip parameters alone.
    #[must_use]
    pub fn plan(&self, params: &TripParameters) -> Itinerary {
        debug!(
            "Synthesizing {}-day fallback itinerary from {}",
            params.duration_days, params.start_point
        );

        let days = (1..=params.duration_days)
            .map(|day_index| self.day(day_index, params))
            .collect();

        let budget = BudgetRange::for_trip(
            params.duration_days,
            self.config.per_day_rate,
            self.config.buffer,
        );

        Itinerary {
            title: format!(
                "{}-Day {} Adventure from {}",
                params.duration_days, self.region, params.start_point
            ),
            summary: format!(
                "Explore the best of {} starting from {} using {}",
                self.region, params.start_point, params.transport_mode
            ),
            days,
            total_budget_range: budget.render(&self.config.currency),
            tips: TIPS.iter().map(|t| (*t).to_string()).collect(),
        }
    }

    fn day(&self, day_index: u32, params: &TripParameters) -> ItineraryDay {
        let (title, locations, activities, notes) = if day_index == 1 {
            let mut locations = vec![params.start_point.clone()];
            locations.extend(ARRIVAL_LANDMARKS.iter().map(|l| (*l).to_string()));
            (
                String::from("Arrival & City Exploration"),
                locations,
                to_strings(&ARRIVAL_ACTIVITIES),
                ARRIVAL_NOTES,
            )
        } else {
            let template = &ROTATION[(day_index as usize - 2) % ROTATION.len()];
            (
                format!("Day {day_index} Adventure"),
                to_strings(&template.locations),
                to_strings(&template.activities),
                template.notes,
            )
        };

        // Odd days get the first hotel, even days the second.
        let hotel_name = self.config.hotels[((day_index - 1) % 2) as usize].clone();

        ItineraryDay {
            day_index,
            title,
            locations,
            activities,
            hotel_name,
            food_names: to_strings(&FOODS),
            notes: Some(notes.to_string()),
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}
