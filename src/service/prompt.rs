//! Prompt construction for itinerary requests.

use crate::planner::TripParameters;

/// JSON shape the service is asked to reply with.
const ITINERARY_SCHEMA: &str = r#"{
  "title": "Trip title",
  "summary": "Brief overview",
  "days": [
    {
      "day": 1,
      "title": "Day title",
      "locations": ["location1", "location2"],
      "activities": ["activity1", "activity2"],
      "hotel": "hotel name",
      "food": ["food1", "food2"],
      "notes": "Additional tips"
    }
  ],
  "totalBudget": "estimated budget",
  "tips": ["tip1", "tip2"]
}"#;

/// Builds the generation prompt for a region.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    region: String,
}

impl PromptBuilder {
    /// Creates a prompt builder for a region.
    #[must_use]
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
        }
    }

    /// Renders the prompt for a trip.
    #[must_use]
    pub fn build(&self, params: &TripParameters) -> String {
        format!(
            "You are a travel planner for {region}, Indonesia. \
             Generate a detailed {days}-day travel itinerary starting from {start} using {mode}.\n\
             \n\
             Include:\n\
             - Daily schedule with specific destinations in {region}\n\
             - Recommended activities at each location\n\
             - Estimated travel times between locations\n\
             - Hotel recommendations for each night\n\
             - Local food recommendations\n\
             - Budget estimates in IDR\n\
             \n\
             The \"days\" array must contain exactly {days} entries numbered 1 to {days}, \
             and every day must list at least one location.\n\
             \n\
             Format your response as JSON with this structure:\n\
             {schema}\n\
             \n\
             Respond ONLY with valid JSON, no markdown or explanation.",
            region = self.region,
            days = params.duration_days,
            start = params.start_point,
            mode = params.transport_mode,
            schema = ITINERARY_SCHEMA,
        )
    }
}
