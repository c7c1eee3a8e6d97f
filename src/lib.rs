// ============================================================================
// Linting - Dangerous or non-idiomatic practices are flagged
// ============================================================================

#![forbid(unsafe_code)]               // Unsafe code is forbidden
#![warn(missing_docs)]                // Public items should be documented
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::redundant_clone)]     // Useless clones warning

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// Tests may unwrap and panic freely
#![cfg_attr(test, allow(clippy::unwrap_used, clippy::expect_used, clippy::panic))]

// ============================================================================
// Crate Documentation
// ============================================================================

//! # `JatimGuide`
//!
//! A multi-day itinerary planner for East Java, Indonesia.
//!
//! ## Overview
//!
//! `JatimGuide` turns a starting point, a transport mode and a trip length
//! into a day-by-day route, then lets the traveler layer hand-picked hotels
//! and food venues from a catalog on top of it:
//!
//! - Itineraries come from an external LLM messages endpoint when one is
//!   configured, or from a deterministic fallback planner
//! - Replies are checked for shape (day count, numbering, locations) and any
//!   malformed reply falls back instead of failing
//! - Selections are unique by catalog id; adding twice is the same as once
//! - A new generation clears the previous route and selections
//!
//! ## Architecture
//!
//! 1. **Trip request**: raw text validated into [`planner::TripParameters`]
//! 2. **Session**: explicit state record with begin / complete / abandon
//!    transitions guarded by generation tickets
//! 3. **Plan generator**: service call with timeout, parsing and fallback
//! 4. **Selection reconciler**: idempotent hotel and food sets
//!
//! ## Modules
//!
//! - [`config`]: Configuration parsing and validation
//! - [`catalog`]: Destination, hotel and food reference data
//! - [`service`]: Generation service client
//! - [`planner`]: Trip parameters, itineraries, fallback and generation
//! - [`reconciler`]: Hotel and food selection sets
//! - [`session`]: Session state and generation tickets
//! - [`engine`]: Async façade driven by the CLI
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```yaml
//! region: East Java
//!
//! service:
//!   enabled: true
//!   model: claude-sonnet-4-20250514
//!   timeout_secs: 60
//!
//! fallback:
//!   enabled: true
//!   per_day_rate: 1500000
//!   buffer: 2000000
//!   currency: Rp
//!
//! trip:
//!   max_days: 14
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod catalog;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod planner;
pub mod reconciler;
pub mod service;
pub mod session;

// ============================================================================
// Re-exports
// ============================================================================

pub use catalog::{Catalog, Food, Hotel};
pub use cli::{Cli, Commands, OutputFormatter};
pub use config::{ConfigParser, ConfigValidator, GuideConfig};
pub use engine::{GuideEngine, PendingGeneration};
pub use error::{GenerationError, GuideError, Result};
pub use planner::{
    FallbackPlanner, GeneratedPlan, Itinerary, ItineraryDay, PlanGenerator, PlanSource,
    TransportMode, TripParameters, TripRequest,
};
pub use reconciler::{SelectionReconciler, SelectionSet};
pub use service::{AnthropicClient, PlanService};
pub use session::{ActivePlan, Session, SessionSnapshot};
