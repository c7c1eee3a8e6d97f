//! Output formatting for CLI commands.
//!
//! This module provides formatting utilities for displaying
//! information to the user in various formats.

use colored::Colorize;
use std::fmt::Write;
use tabled::{Table, Tabled};

use crate::catalog::{Catalog, CatalogKind, Destination, Food, Hotel};
use crate::config::ValidationResult;
use crate::planner::{ItineraryHasher, PlanSource};
use crate::session::{ActivePlan, GenerationOutcome, GenerationRecord, SessionSnapshot};

use super::commands::OutputFormat;

/// Output formatter for CLI.
#[derive(Debug)]
pub struct OutputFormatter {
    /// Output format.
    format: OutputFormat,
}

/// Hotel row for table display.
#[derive(Tabled)]
struct HotelRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Rating")]
    rating: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Price")]
    price: String,
}

/// Food row for table display.
#[derive(Tabled)]
struct FoodRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Rating")]
    rating: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Location")]
    location: String,
}

/// Destination row for table display.
#[derive(Tabled)]
struct DestinationRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    category: String,
    #[tabled(rename = "Description")]
    description: String,
}

/// History row for table display.
#[derive(Tabled)]
struct HistoryRow {
    #[tabled(rename = "#")]
    sequence: u64,
    #[tabled(rename = "Started")]
    started: String,
    #[tabled(rename = "Trip")]
    trip: String,
    #[tabled(rename = "Outcome")]
    outcome: String,
    #[tabled(rename = "Took")]
    took: String,
}

impl From<&Hotel> for HotelRow {
    fn from(hotel: &Hotel) -> Self {
        Self {
            id: hotel.id,
            name: hotel.name.clone(),
            rating: format!("{:.1}", hotel.rating),
            location: hotel.location.clone(),
            price: hotel.price.clone(),
        }
    }
}

impl From<&Food> for FoodRow {
    fn from(food: &Food) -> Self {
        Self {
            id: food.id,
            name: food.name.clone(),
            rating: format!("{:.1}", food.rating),
            price: food.price.clone(),
            location: food.location.clone(),
        }
    }
}

impl From<&Destination> for DestinationRow {
    fn from(destination: &Destination) -> Self {
        Self {
            id: destination.id,
            name: destination.name.clone(),
            category: destination.category.clone(),
            description: OutputFormatter::truncate(&destination.description, 40),
        }
    }
}

impl OutputFormatter {
    /// Creates a new output formatter.
    #[must_use]
    pub const fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Formats the itinerary and selections of a session.
    #[must_use]
    pub fn format_snapshot(&self, snapshot: &SessionSnapshot) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(snapshot).unwrap_or_default(),
            OutputFormat::Text => {
                let mut output = match &snapshot.plan {
                    Some(plan) => Self::format_plan_text(plan),
                    None if snapshot.is_generating() => {
                        format!("{} Generating your route...\n", "…".cyan())
                    }
                    None => String::from("   No itinerary yet.\n"),
                };

                if let Some(error) = &snapshot.last_error {
                    let _ = writeln!(output, "\n{} {error}", "✗".red());
                }

                output.push_str(&Self::format_selections_text(&snapshot.hotels, &snapshot.foods));
                output
            }
        }
    }

    /// Formats a generated plan.
    #[must_use]
    pub fn format_plan(&self, plan: &ActivePlan) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(plan).unwrap_or_default(),
            OutputFormat::Text => Self::format_plan_text(plan),
        }
    }

    /// Formats a plan as text.
    fn format_plan_text(plan: &ActivePlan) -> String {
        let itinerary = &plan.itinerary;
        let mut output = String::new();

        let _ = writeln!(output, "\n{}", itinerary.title.bold());
        let _ = writeln!(output, "{}", itinerary.summary);
        let _ = writeln!(
            output,
            "   Source: {} | Fingerprint: {}",
            Self::format_source(plan.source),
            ItineraryHasher::short_hash(&plan.fingerprint)
        );
        if let Some(reason) = &plan.fallback_reason {
            let _ = writeln!(output, "   {} {}", "⚠".yellow(), Self::truncate(reason, 80));
        }

        for day in &itinerary.days {
            let _ = write!(
                output,
                "\n{} {}\n",
                format!("Day {}:", day.day_index).cyan().bold(),
                day.title
            );
            let _ = writeln!(output, "   Locations:  {}", day.locations.join(" → "));
            for activity in &day.activities {
                let _ = writeln!(output, "   - {activity}");
            }
            let _ = writeln!(output, "   Hotel:      {}", day.hotel_name);
            let _ = writeln!(output, "   Food:       {}", day.food_names.join(", "));
            if let Some(notes) = &day.notes {
                let _ = writeln!(output, "   Notes:      {}", notes.dimmed());
            }
        }

        let _ = write!(
            output,
            "\nEstimated budget: {}\n",
            itinerary.total_budget_range.green()
        );

        if !itinerary.tips.is_empty() {
            output.push_str("\nTips:\n");
            for tip in &itinerary.tips {
                let _ = writeln!(output, "   - {tip}");
            }
        }

        output
    }

    /// Formats selected hotels and food venues.
    #[must_use]
    pub fn format_selections(&self, hotels: &[Hotel], foods: &[Food]) -> String {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::json!({ "hotels": hotels, "foods": foods });
                serde_json::to_string_pretty(&json).unwrap_or_default()
            }
            OutputFormat::Text => Self::format_selections_text(hotels, foods),
        }
    }

    fn format_selections_text(hotels: &[Hotel], foods: &[Food]) -> String {
        let mut output = String::new();

        let _ = writeln!(output, "\nAdded hotels ({}):", hotels.len());
        if hotels.is_empty() {
            output.push_str("   none\n");
        } else {
            output.push_str(&Table::new(hotels.iter().map(HotelRow::from)).to_string());
            output.push('\n');
        }

        let _ = writeln!(output, "\nAdded food ({}):", foods.len());
        if foods.is_empty() {
            output.push_str("   none\n");
        } else {
            output.push_str(&Table::new(foods.iter().map(FoodRow::from)).to_string());
            output.push('\n');
        }

        output
    }

    /// Formats the catalog, or one kind of it.
    #[must_use]
    pub fn format_catalog(&self, catalog: &Catalog, kind: Option<CatalogKind>) -> String {
        let show = |k: CatalogKind| kind.is_none_or(|wanted| wanted == k);

        match self.format {
            OutputFormat::Json => {
                let mut json = serde_json::Map::new();
                if show(CatalogKind::Destination) {
                    json.insert(
                        String::from("destinations"),
                        serde_json::to_value(&catalog.destinations).unwrap_or_default(),
                    );
                }
                if show(CatalogKind::Hotel) {
                    json.insert(
                        String::from("hotels"),
                        serde_json::to_value(&catalog.hotels).unwrap_or_default(),
                    );
                }
                if show(CatalogKind::Food) {
                    json.insert(
                        String::from("foods"),
                        serde_json::to_value(&catalog.foods).unwrap_or_default(),
                    );
                }
                serde_json::to_string_pretty(&json).unwrap_or_default()
            }
            OutputFormat::Text => {
                let mut output = String::new();
                if show(CatalogKind::Destination) {
                    let _ = writeln!(output, "\n{}", "Destinations".bold());
                    output.push_str(
                        &Table::new(catalog.destinations.iter().map(DestinationRow::from))
                            .to_string(),
                    );
                    output.push('\n');
                }
                if show(CatalogKind::Hotel) {
                    let _ = writeln!(output, "\n{}", "Hotels".bold());
                    let rows = catalog.hotels.iter().map(HotelRow::from);
                    output.push_str(&Table::new(rows).to_string());
                    output.push('\n');
                }
                if show(CatalogKind::Food) {
                    let _ = writeln!(output, "\n{}", "Food".bold());
                    let rows = catalog.foods.iter().map(FoodRow::from);
                    output.push_str(&Table::new(rows).to_string());
                    output.push('\n');
                }
                output
            }
        }
    }

    /// Formats generation history.
    #[must_use]
    pub fn format_history(&self, history: &[GenerationRecord]) -> String {
        match self.format {
            OutputFormat::Json => serde_json::to_string_pretty(history).unwrap_or_default(),
            OutputFormat::Text => {
                if history.is_empty() {
                    return String::from("   No generations yet.\n");
                }

                let rows: Vec<HistoryRow> = history
                    .iter()
                    .map(|record| HistoryRow {
                        sequence: record.sequence,
                        started: record.started_at.format("%H:%M:%S").to_string(),
                        trip: format!(
                            "{}d from {} ({})",
                            record.params.duration_days,
                            Self::truncate(&record.params.start_point, 20),
                            record.params.transport_mode
                        ),
                        outcome: Self::format_outcome(&record.outcome),
                        took: format!("{} ms", record.duration_ms()),
                    })
                    .collect();

                let mut output = Table::new(rows).to_string();
                output.push('\n');
                output
            }
        }
    }

    /// Formats a configuration validation result.
    #[must_use]
    pub fn format_validation(&self, result: &ValidationResult, show_warnings: bool) -> String {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::json!({
                    "valid": result.is_valid(),
                    "errors": result
                        .errors
                        .iter()
                        .map(|e| serde_json::json!({ "field": e.field, "message": e.message }))
                        .collect::<Vec<_>>(),
                    "warnings": result.warnings,
                });
                serde_json::to_string_pretty(&json).unwrap_or_default()
            }
            OutputFormat::Text => {
                let mut output = if result.is_valid() {
                    format!("{} Configuration is valid\n", "✓".green())
                } else {
                    format!("{} Configuration is invalid\n", "✗".red())
                };

                for error in &result.errors {
                    let _ = writeln!(output, "   - {}: {}", error.field, error.message);
                }

                if show_warnings && !result.warnings.is_empty() {
                    let _ = write!(output, "\n{} Warnings:\n", "⚠".yellow());
                    for warning in &result.warnings {
                        let _ = writeln!(output, "   - {warning}");
                    }
                }

                output
            }
        }
    }

    /// Formats a plan source with color.
    fn format_source(source: PlanSource) -> String {
        match source {
            PlanSource::External => "external".green().to_string(),
            PlanSource::Fallback => "fallback".yellow().to_string(),
        }
    }

    /// Formats a generation outcome with color.
    fn format_outcome(outcome: &GenerationOutcome) -> String {
        match outcome {
            GenerationOutcome::Generated { source, fingerprint } => format!(
                "{} {} {}",
                "✓".green(),
                source,
                ItineraryHasher::short_hash(fingerprint)
            ),
            GenerationOutcome::Failed { message } => {
                format!("{} {}", "✗".red(), Self::truncate(message, 40))
            }
            GenerationOutcome::Abandoned => "abandoned".dimmed().to_string(),
        }
    }

    /// Truncates a string to a maximum number of characters.
    fn truncate(s: &str, max_len: usize) -> String {
        if s.chars().count() <= max_len {
            s.to_string()
        } else {
            let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
            format!("{kept}...")
        }
    }

    /// Formats a success message.
    #[must_use]
    pub fn success(&self, message: &str) -> String {
        self.message("success", &"✓".green().to_string(), message)
    }

    /// Formats an error message.
    #[must_use]
    pub fn error(&self, message: &str) -> String {
        self.message("error", &"✗".red().to_string(), message)
    }

    /// Formats a warning message.
    #[must_use]
    pub fn warning(&self, message: &str) -> String {
        self.message("warning", &"⚠".yellow().to_string(), message)
    }

    fn message(&self, status: &str, marker: &str, message: &str) -> String {
        match self.format {
            OutputFormat::Json => {
                let json = serde_json::json!({ "status": status, "message": message });
                serde_json::to_string(&json).unwrap_or_default()
            }
            OutputFormat::Text => format!("{marker} {message}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FallbackConfig;
    use crate::planner::{FallbackPlanner, TransportMode, TripParameters};

    fn plan() -> ActivePlan {
        let params = TripParameters::new("Surabaya", TransportMode::PrivateCar, 2, 14).unwrap();
        let itinerary = FallbackPlanner::new("East Java", FallbackConfig::default()).plan(&params);
        ActivePlan {
            sequence: 1,
            fingerprint: ItineraryHasher::new().hash_itinerary(&itinerary),
            itinerary,
            source: PlanSource::Fallback,
            fallback_reason: None,
        }
    }

    #[test]
    fn test_plan_text() {
        colored::control::set_override(false);
        let text = OutputFormatter::new(OutputFormat::Text).format_plan(&plan());

        assert!(text.contains("2-Day East Java Adventure from Surabaya"));
        assert!(text.contains("Day 1: Arrival & City Exploration"));
        assert!(text.contains("Estimated budget: Rp 1000000 - Rp 3000000"));
    }

    #[test]
    fn test_plan_json() {
        let json = OutputFormatter::new(OutputFormat::Json).format_plan(&plan());
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["source"], "fallback");
        assert_eq!(value["itinerary"]["days"][1]["day"], 2);
    }

    #[test]
    fn test_catalog_filter() {
        let catalog = Catalog::east_java();
        let json = OutputFormatter::new(OutputFormat::Json)
            .format_catalog(&catalog, Some(CatalogKind::Hotel));
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.get("hotels").is_some());
        assert!(value.get("foods").is_none());
    }

    #[test]
    fn test_empty_selections() {
        colored::control::set_override(false);
        let text = OutputFormatter::new(OutputFormat::Text).format_selections(&[], &[]);
        assert!(text.contains("Added hotels (0)"));
        assert!(text.contains("none"));
    }

    #[test]
    fn test_truncate_is_char_safe() {
        assert_eq!(OutputFormatter::truncate("Madakaripura", 8), "Madak...");
        assert_eq!(OutputFormatter::truncate("Batu → Malang", 40), "Batu → Malang");
    }
}
