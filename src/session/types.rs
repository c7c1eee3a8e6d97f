//! Session record types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::catalog::{Food, Hotel};
use crate::planner::{Itinerary, PlanSource, TripParameters};

/// Number of generation records a session keeps.
pub const MAX_HISTORY: usize = 20;

/// The itinerary currently shown to the traveler.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivePlan {
    /// Sequence of the generation that produced it.
    pub sequence: u64,
    /// The itinerary.
    pub itinerary: Itinerary,
    /// Which strategy produced it.
    pub source: PlanSource,
    /// SHA-256 fingerprint of the itinerary.
    pub fingerprint: String,
    /// Why the fallback was used, if the service was tried first.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}

/// One finished generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationRecord {
    /// Ticket sequence.
    pub sequence: u64,
    /// Ticket id.
    pub ticket_id: String,
    /// Parameters the generation ran with.
    pub params: TripParameters,
    /// When it started.
    pub started_at: DateTime<Utc>,
    /// When it finished or was abandoned.
    pub finished_at: DateTime<Utc>,
    /// How it ended.
    pub outcome: GenerationOutcome,
}

/// How a generation ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GenerationOutcome {
    /// An itinerary was stored.
    Generated {
        /// Strategy that produced it.
        source: PlanSource,
        /// Itinerary fingerprint.
        fingerprint: String,
    },
    /// No itinerary could be produced.
    Failed {
        /// Error description.
        message: String,
    },
    /// Abandoned before completion; any late result was discarded.
    Abandoned,
}

/// Read-only view of a session for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    /// Current plan, if any.
    pub plan: Option<ActivePlan>,
    /// Selected hotels in insertion order.
    pub hotels: Vec<Hotel>,
    /// Selected food venues in insertion order.
    pub foods: Vec<Food>,
    /// Sequence of the in-flight generation, if one is running.
    pub generating: Option<u64>,
    /// Last user-facing error.
    pub last_error: Option<String>,
    /// Recent generations, oldest first.
    pub history: Vec<GenerationRecord>,
}

impl GenerationOutcome {
    /// Short status label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Generated { .. } => "generated",
            Self::Failed { .. } => "failed",
            Self::Abandoned => "abandoned",
        }
    }

    /// Returns true if an itinerary was stored.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Generated { .. })
    }
}

impl GenerationRecord {
    /// Duration of the generation in milliseconds.
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        (self.finished_at - self.started_at).num_milliseconds().max(0)
    }
}

impl SessionSnapshot {
    /// The current itinerary, if any.
    #[must_use]
    pub fn itinerary(&self) -> Option<&Itinerary> {
        self.plan.as_ref().map(|p| &p.itinerary)
    }

    /// Returns true if a generation is in flight.
    #[must_use]
    pub const fn is_generating(&self) -> bool {
        self.generating.is_some()
    }
}
