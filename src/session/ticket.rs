//! Generation tickets.
//!
//! A ticket marks one in-flight generation. Its sequence number is what the
//! session compares on completion, so a late result from an abandoned or
//! superseded generation can be recognized and discarded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::planner::TripParameters;

/// Information about an in-flight generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationTicket {
    /// Monotonic sequence number within the session.
    pub sequence: u64,
    /// Unique ticket identifier.
    pub id: String,
    /// Who started the generation.
    pub holder: String,
    /// When the generation started.
    pub started_at: DateTime<Utc>,
    /// Validated trip parameters.
    pub params: TripParameters,
}

impl GenerationTicket {
    /// Creates a new ticket.
    #[must_use]
    pub fn new(sequence: u64, holder: &str, params: TripParameters) -> Self {
        Self {
            sequence,
            id: Uuid::new_v4().to_string(),
            holder: holder.to_string(),
            started_at: Utc::now(),
            params,
        }
    }

    /// Milliseconds since the generation started.
    #[must_use]
    pub fn elapsed_ms(&self) -> i64 {
        (Utc::now() - self.started_at).num_milliseconds().max(0)
    }
}

/// Generates a holder identifier for the current process.
#[must_use]
pub fn generate_holder_id() -> String {
    let hostname = hostname::get()
        .map_or_else(|_| String::from("unknown"), |h| h.to_string_lossy().to_string());

    let pid = std::process::id();

    format!("{hostname}-{pid}")
}
