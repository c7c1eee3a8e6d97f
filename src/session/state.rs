//! The session state machine.
//!
//! All transitions are synchronous methods, so the rules below can be tested
//! without a runtime:
//! - A request is validated before anything is cleared.
//! - Beginning a generation clears the itinerary and both selection sets.
//! - Only one generation is in flight; a second request is rejected.
//! - A result is applied only if its ticket is still the in-flight one.

use chrono::Utc;
use std::collections::VecDeque;
use tracing::{debug, info, warn};

use crate::catalog::{Food, Hotel};
use crate::error::GenerationError;
use crate::planner::{GeneratedPlan, Itinerary, ItineraryHasher, TripParameters, TripRequest};
use crate::reconciler::SelectionReconciler;

use super::ticket::{generate_holder_id, GenerationTicket};
use super::types::{
    ActivePlan, GenerationOutcome, GenerationRecord, SessionSnapshot, MAX_HISTORY,
};

/// One traveler's planning session.
#[derive(Debug)]
pub struct Session {
    /// Current plan.
    plan: Option<ActivePlan>,
    /// Hotel and food selections layered on the plan.
    selections: SelectionReconciler,
    /// In-flight generation.
    in_flight: Option<GenerationTicket>,
    /// Last issued sequence number.
    sequence: u64,
    /// Last user-facing error.
    last_error: Option<String>,
    /// Recent generations, oldest first.
    history: VecDeque<GenerationRecord>,
    /// Holder tag written on tickets.
    holder: String,
    /// Itinerary fingerprinting.
    hasher: ItineraryHasher,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    /// Creates an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self {
            plan: None,
            selections: SelectionReconciler::new(),
            in_flight: None,
            sequence: 0,
            last_error: None,
            history: VecDeque::with_capacity(MAX_HISTORY),
            holder: generate_holder_id(),
            hasher: ItineraryHasher::new(),
        }
    }

    /// Validates a request and enters the in-flight state.
    ///
    /// On success the previous itinerary and all selections are cleared
    /// before the ticket is returned.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::AlreadyInProgress`] if a generation is in
    /// flight (nothing changes), or [`GenerationError::InvalidParameters`] if
    /// the request is invalid (only the last error changes).
    pub fn begin_generation(
        &mut self,
        request: &TripRequest,
        max_days: u32,
    ) -> Result<GenerationTicket, GenerationError> {
        if let Some(ticket) = &self.in_flight {
            return Err(GenerationError::AlreadyInProgress {
                sequence: ticket.sequence,
            });
        }

        let params = match request.validate(max_days) {
            Ok(params) => params,
            Err(e) => {
                debug!("Rejected trip request: {e}");
                self.last_error = Some(e.user_message());
                return Err(e);
            }
        };

        Ok(self.start(params))
    }

    /// Clears the plan and issues a ticket for already validated parameters.
    fn start(&mut self, params: TripParameters) -> GenerationTicket {
        self.plan = None;
        self.selections.clear();
        self.last_error = None;
        self.sequence += 1;

        let ticket = GenerationTicket::new(self.sequence, &self.holder, params);
        info!(
            "Generation {} started: {} days from {} by {}",
            ticket.sequence,
            ticket.params.duration_days,
            ticket.params.start_point,
            ticket.params.transport_mode
        );
        self.in_flight = Some(ticket.clone());
        ticket
    }

    /// Applies the result of a generation.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::Superseded`] if the ticket is no longer the
    /// in-flight one; the result is discarded. Otherwise a failed result is
    /// recorded and returned unchanged.
    pub fn complete_generation(
        &mut self,
        ticket: &GenerationTicket,
        result: Result<GeneratedPlan, GenerationError>,
    ) -> Result<ActivePlan, GenerationError> {
        let current = self.in_flight.as_ref().map(|t| t.sequence);
        if current != Some(ticket.sequence) {
            warn!(
                "Discarding result of generation {} (in flight: {current:?})",
                ticket.sequence
            );
            return Err(GenerationError::Superseded {
                sequence: ticket.sequence,
            });
        }
        self.in_flight = None;

        match result {
            Ok(generated) => {
                let fingerprint = self.hasher.hash_itinerary(&generated.itinerary);
                let plan = ActivePlan {
                    sequence: ticket.sequence,
                    itinerary: generated.itinerary,
                    source: generated.source,
                    fingerprint: fingerprint.clone(),
                    fallback_reason: generated.fallback_reason,
                };
                info!(
                    "Generation {} completed from {} ({})",
                    ticket.sequence,
                    plan.source,
                    ItineraryHasher::short_hash(&fingerprint)
                );
                self.record(
                    ticket,
                    GenerationOutcome::Generated {
                        source: plan.source,
                        fingerprint,
                    },
                );
                self.plan = Some(plan.clone());
                Ok(plan)
            }
            Err(e) => {
                warn!("Generation {} failed: {e}", ticket.sequence);
                self.last_error = Some(e.user_message());
                self.record(
                    ticket,
                    GenerationOutcome::Failed {
                        message: e.to_string(),
                    },
                );
                Err(e)
            }
        }
    }

    /// Abandons the in-flight generation, if any.
    ///
    /// Its result will be discarded when it arrives. Returns the abandoned
    /// sequence number.
    pub fn abandon_generation(&mut self) -> Option<u64> {
        let ticket = self.in_flight.take()?;
        info!("Generation {} abandoned", ticket.sequence);
        self.record(&ticket, GenerationOutcome::Abandoned);
        Some(ticket.sequence)
    }

    /// Abandons the generation only while `ticket` is still the in-flight one.
    pub fn abandon_ticket(&mut self, ticket: &GenerationTicket) -> bool {
        let current = self.in_flight.as_ref().map(|t| t.sequence);
        current == Some(ticket.sequence) && self.abandon_generation().is_some()
    }

    fn record(&mut self, ticket: &GenerationTicket, outcome: GenerationOutcome) {
        if self.history.len() >= MAX_HISTORY {
            self.history.pop_front();
        }
        self.history.push_back(GenerationRecord {
            sequence: ticket.sequence,
            ticket_id: ticket.id.clone(),
            params: ticket.params.clone(),
            started_at: ticket.started_at,
            finished_at: Utc::now(),
            outcome,
        });
    }

    /// Adds a hotel selection. Returns true if the set changed.
    pub fn add_hotel(&mut self, hotel: Hotel) -> bool {
        self.selections.hotels.add(hotel)
    }

    /// Removes a hotel selection. Returns true if the set changed.
    pub fn remove_hotel(&mut self, id: u32) -> bool {
        self.selections.hotels.remove(id)
    }

    /// Returns true if the hotel is selected.
    #[must_use]
    pub fn contains_hotel(&self, id: u32) -> bool {
        self.selections.hotels.contains(id)
    }

    /// Adds a food selection. Returns true if the set changed.
    pub fn add_food(&mut self, food: Food) -> bool {
        self.selections.foods.add(food)
    }

    /// Removes a food selection. Returns true if the set changed.
    pub fn remove_food(&mut self, id: u32) -> bool {
        self.selections.foods.remove(id)
    }

    /// Returns true if the food venue is selected.
    #[must_use]
    pub fn contains_food(&self, id: u32) -> bool {
        self.selections.foods.contains(id)
    }

    /// The current itinerary, if any.
    #[must_use]
    pub fn itinerary(&self) -> Option<&Itinerary> {
        self.plan.as_ref().map(|p| &p.itinerary)
    }

    /// The current plan, if any.
    #[must_use]
    pub const fn plan(&self) -> Option<&ActivePlan> {
        self.plan.as_ref()
    }

    /// Current selections.
    #[must_use]
    pub const fn selections(&self) -> &SelectionReconciler {
        &self.selections
    }

    /// The in-flight ticket, if any.
    #[must_use]
    pub const fn in_flight(&self) -> Option<&GenerationTicket> {
        self.in_flight.as_ref()
    }

    /// Returns true if a generation is in flight.
    #[must_use]
    pub const fn is_generating(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Last user-facing error.
    #[must_use]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Recent generations, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &GenerationRecord> {
        self.history.iter()
    }

    /// Copies the observable state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            plan: self.plan.clone(),
            hotels: self.selections.hotels.items().to_vec(),
            foods: self.selections.foods.items().to_vec(),
            generating: self.in_flight.as_ref().map(|t| t.sequence),
            last_error: self.last_error.clone(),
            history: self.history.iter().cloned().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FallbackConfig;
    use crate::planner::{FallbackPlanner, PlanSource, TransportMode};

    fn request(start: &str, days: &str) -> TripRequest {
        TripRequest::new(start, "Private Car", days)
    }

    fn plan_for(ticket: &GenerationTicket) -> GeneratedPlan {
        GeneratedPlan {
            itinerary: FallbackPlanner::new("East Java", FallbackConfig::default())
                .plan(&ticket.params),
            source: PlanSource::Fallback,
            fallback_reason: None,
        }
    }

    fn hotel(id: u32) -> Hotel {
        Hotel {
            id,
            name: format!("Hotel {id}"),
            rating: 4.0,
            location: String::from("Malang"),
            price: String::from("Rp 1"),
        }
    }

    fn food(id: u32) -> Food {
        Food {
            id,
            name: format!("Food {id}"),
            rating: 4.0,
            price: String::from("Rp 1"),
            location: String::from("Malang"),
        }
    }

    /// A session holding a completed 2-day plan and one selection of each kind.
    fn populated() -> Session {
        let mut session = Session::new();
        let ticket = session.begin_generation(&request("Malang", "2"), 14).unwrap();
        let plan = plan_for(&ticket);
        session.complete_generation(&ticket, Ok(plan)).unwrap();
        session.add_hotel(hotel(1));
        session.add_food(food(1));
        session
    }

    #[test]
    fn test_begin_clears_itinerary_and_selections() {
        let mut session = populated();
        assert!(session.itinerary().is_some());

        let ticket = session.begin_generation(&request("Surabaya", "3"), 14).unwrap();
        assert_eq!(ticket.sequence, 2);
        assert!(session.itinerary().is_none());
        assert!(session.selections().is_empty());
        assert!(session.is_generating());
    }

    #[test]
    fn test_invalid_request_preserves_state() {
        let mut session = populated();
        let before = session.plan().cloned();

        let invalid = [
            ("", "3"),
            ("Malang", "0"),
            ("Malang", "-1"),
            ("Malang", "abc"),
            ("Malang", "99"),
        ];
        for (start, days) in invalid {
            let err = session.begin_generation(&request(start, days), 14).unwrap_err();
            assert!(matches!(err, GenerationError::InvalidParameters { .. }));
        }

        assert_eq!(session.plan().cloned(), before);
        assert!(session.contains_hotel(1));
        assert!(session.contains_food(1));
        assert!(!session.is_generating());
        assert!(session.last_error().unwrap().contains("starting point and duration"));
    }

    #[test]
    fn test_second_request_rejected_while_in_flight() {
        let mut session = Session::new();
        let ticket = session.begin_generation(&request("Malang", "2"), 14).unwrap();

        let err = session.begin_generation(&request("Batu", "1"), 14).unwrap_err();
        assert_eq!(err, GenerationError::AlreadyInProgress { sequence: 1 });
        assert_eq!(session.in_flight().map(|t| t.sequence), Some(ticket.sequence));
    }

    #[test]
    fn test_completion_applies_plan() {
        let mut session = Session::new();
        let ticket = session.begin_generation(&request("Surabaya", "3"), 14).unwrap();
        let plan = session.complete_generation(&ticket, Ok(plan_for(&ticket))).unwrap();

        assert_eq!(plan.itinerary.days.len(), 3);
        assert_eq!(plan.fingerprint.len(), 64);
        assert!(!session.is_generating());
        assert_eq!(session.itinerary(), Some(&plan.itinerary));

        let history: Vec<_> = session.history().collect();
        assert_eq!(history.len(), 1);
        assert!(history[0].outcome.is_success());
    }

    #[test]
    fn test_failure_leaves_itinerary_absent() {
        let mut session = populated();
        let ticket = session.begin_generation(&request("Surabaya", "3"), 14).unwrap();
        let err = session
            .complete_generation(&ticket, Err(GenerationError::failed("service down")))
            .unwrap_err();

        assert!(matches!(err, GenerationError::GenerationFailed { .. }));
        assert!(session.itinerary().is_none());
        assert!(!session.is_generating());
        assert_eq!(
            session.last_error(),
            Some("An error occurred while generating the route. Please try again.")
        );
    }

    #[test]
    fn test_stale_result_is_discarded() {
        let mut session = Session::new();
        let ticket_a = session.begin_generation(&request("Malang", "2"), 14).unwrap();
        assert_eq!(session.abandon_generation(), Some(ticket_a.sequence));

        let ticket_b = session.begin_generation(&request("Surabaya", "3"), 14).unwrap();
        let plan_b = session.complete_generation(&ticket_b, Ok(plan_for(&ticket_b))).unwrap();
        session.add_hotel(hotel(2));

        let late = session.complete_generation(&ticket_a, Ok(plan_for(&ticket_a)));
        assert_eq!(late, Err(GenerationError::Superseded { sequence: 1 }));

        let late = session.complete_generation(&ticket_a, Err(GenerationError::failed("x")));
        assert_eq!(late, Err(GenerationError::Superseded { sequence: 1 }));

        assert_eq!(session.plan(), Some(&plan_b));
        assert!(session.contains_hotel(2));
        assert!(session.last_error().is_none());
    }

    #[test]
    fn test_abandon_without_in_flight() {
        let mut session = Session::new();
        assert_eq!(session.abandon_generation(), None);
        assert_eq!(session.history().count(), 0);
    }

    #[test]
    fn test_abandon_ticket_only_matches_in_flight() {
        let mut session = Session::new();
        let ticket_a = session.begin_generation(&request("Malang", "2"), 14).unwrap();
        assert!(session.abandon_ticket(&ticket_a));
        assert!(!session.abandon_ticket(&ticket_a));

        let ticket_b = session.begin_generation(&request("Surabaya", "3"), 14).unwrap();
        assert!(!session.abandon_ticket(&ticket_a));
        assert_eq!(session.in_flight().map(|t| t.sequence), Some(ticket_b.sequence));

        let outcomes: Vec<_> = session.history().map(|r| r.outcome.label()).collect();
        assert_eq!(outcomes, vec![GenerationOutcome::Abandoned.label()]);
    }

    #[test]
    fn test_history_is_bounded() {
        let mut session = Session::new();
        for _ in 0..(MAX_HISTORY + 5) {
            let ticket = session.begin_generation(&request("Malang", "1"), 14).unwrap();
            session.complete_generation(&ticket, Ok(plan_for(&ticket))).unwrap();
        }

        let history: Vec<_> = session.history().collect();
        assert_eq!(history.len(), MAX_HISTORY);
        assert_eq!(history[0].sequence, 6);
    }

    #[test]
    fn test_selection_operations() {
        let mut session = populated();
        assert!(!session.add_hotel(hotel(1)));
        assert_eq!(session.selections().hotels.len(), 1);
        assert!(session.remove_food(1));
        assert!(!session.remove_food(1));
        assert!(!session.contains_food(1));
    }

    #[test]
    fn test_snapshot() {
        let session = populated();
        let snapshot = session.snapshot();

        assert_eq!(snapshot.itinerary().map(Itinerary::day_count), Some(2));
        assert_eq!(snapshot.hotels.len(), 1);
        assert_eq!(snapshot.foods.len(), 1);
        assert!(!snapshot.is_generating());
        assert_eq!(snapshot.history.len(), 1);
    }

    #[test]
    fn test_transport_mode_kept_on_ticket() {
        let mut session = Session::new();
        let ticket = session
            .begin_generation(&TripRequest::new("Batu", "motorcycle", "2"), 14)
            .unwrap();
        assert_eq!(ticket.params.transport_mode, TransportMode::Motorcycle);
    }
}
