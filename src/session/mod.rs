//! Planning session state.
//!
//! This module holds everything the traveler sees for one session: the
//! current itinerary, selections, the in-flight generation and a short
//! history of past generations. Nothing here is persisted.

mod state;
mod ticket;
mod types;

pub use state::Session;
pub use ticket::{generate_holder_id, GenerationTicket};
pub use types::{
    ActivePlan, GenerationOutcome, GenerationRecord, SessionSnapshot, MAX_HISTORY,
};
