//! Itinerary planning module.
//!
//! This module turns trip parameters into a structured multi-day itinerary:
//! - Validating raw trip input
//! - Calling the external generation service and checking its reply
//! - Synthesizing a deterministic fallback plan
//! - Fingerprinting itineraries for display and history

mod fallback;
mod fingerprint;
mod generator;
mod itinerary;
mod params;
mod parse;

pub use fallback::{BudgetRange, FallbackPlanner};
pub use fingerprint::ItineraryHasher;
pub use generator::PlanGenerator;
pub use itinerary::{GeneratedPlan, Itinerary, ItineraryDay, PlanSource};
pub use params::{TransportMode, TripParameters, TripRequest};
pub use parse::{parse_itinerary, strip_code_fences, validate_shape};
