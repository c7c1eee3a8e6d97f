//! Guide engine.
//!
//! The engine owns the plan generator, the injected catalog and the session.
//! It is cheap to clone; clones share the same session. The session lock is
//! only taken inside synchronous helpers, never across an await.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::catalog::{Catalog, Food, Hotel};
use crate::config::{ConfigParser, GuideConfig};
use crate::error::{CatalogError, GenerationError, Result};
use crate::planner::{GeneratedPlan, PlanGenerator, TripRequest};
use crate::session::{ActivePlan, GenerationTicket, Session, SessionSnapshot};

/// Async façade over generation and selection.
#[derive(Debug, Clone)]
pub struct GuideEngine {
    /// Plan generator.
    generator: Arc<PlanGenerator>,
    /// Reference catalog.
    catalog: Arc<Catalog>,
    /// Shared session state.
    session: Arc<Mutex<Session>>,
    /// Longest accepted trip.
    max_days: u32,
}

/// A generation running on a spawned task.
#[derive(Debug)]
pub struct PendingGeneration {
    /// Ticket issued when the generation began.
    pub ticket: GenerationTicket,
    /// Task handle.
    handle: JoinHandle<Result<ActivePlan, GenerationError>>,
}

impl PendingGeneration {
    /// Waits for the generation to finish.
    ///
    /// # Errors
    ///
    /// Returns the generation error, or [`GenerationError::GenerationFailed`]
    /// if the task panicked or was cancelled.
    pub async fn wait(self) -> Result<ActivePlan, GenerationError> {
        self.handle
            .await
            .map_err(|e| GenerationError::failed(format!("generation task ended: {e}")))?
    }
}

/// Abandons a generation whose future is dropped before it completes, so the
/// session does not stay in flight.
struct AbandonOnDrop<'a> {
    engine: &'a GuideEngine,
    ticket: &'a GenerationTicket,
    armed: bool,
}

impl Drop for AbandonOnDrop<'_> {
    fn drop(&mut self) {
        if self.armed && self.engine.session().abandon_ticket(self.ticket) {
            debug!("Generation {} dropped before completion", self.ticket.sequence);
        }
    }
}

impl GuideEngine {
    /// Creates an engine from its parts.
    #[must_use]
    pub fn new(generator: PlanGenerator, catalog: Catalog, max_days: u32) -> Self {
        Self {
            generator: Arc::new(generator),
            catalog: Arc::new(catalog),
            session: Arc::new(Mutex::new(Session::new())),
            max_days,
        }
    }

    /// Builds an engine from configuration.
    ///
    /// The API key is read from the configured environment variable. When it
    /// is missing the engine runs fallback-only.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded or the HTTP client
    /// cannot be created.
    pub fn from_config(config: &GuideConfig) -> Result<Self> {
        let api_key = if config.service.enabled {
            ConfigParser::get_api_key(&config.service).ok()
        } else {
            None
        };

        let generator = PlanGenerator::from_config(config, api_key.as_deref())?;

        let catalog = match &config.catalog.path {
            Some(path) => Catalog::load_file(path)?,
            None => Catalog::east_java(),
        };

        info!(
            "Engine ready for {} ({} hotels, {} foods)",
            config.region,
            catalog.hotels.len(),
            catalog.foods.len()
        );

        Ok(Self::new(generator, catalog, config.trip.max_days))
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Validates the request, clears the previous plan and issues a ticket.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidParameters`] or
    /// [`GenerationError::AlreadyInProgress`].
    pub fn begin_generation(
        &self,
        request: &TripRequest,
    ) -> Result<GenerationTicket, GenerationError> {
        self.session().begin_generation(request, self.max_days)
    }

    fn complete(
        &self,
        ticket: &GenerationTicket,
        result: Result<GeneratedPlan, GenerationError>,
    ) -> Result<ActivePlan, GenerationError> {
        self.session().complete_generation(ticket, result)
    }

    /// Generates an itinerary and stores it in the session.
    ///
    /// # Errors
    ///
    /// Returns a [`GenerationError`] if the request is rejected, no plan can
    /// be produced, or the generation was abandoned while running.
    pub async fn generate(&self, request: &TripRequest) -> Result<ActivePlan, GenerationError> {
        let ticket = self.begin_generation(request)?;
        self.run(ticket).await
    }

    async fn run(&self, ticket: GenerationTicket) -> Result<ActivePlan, GenerationError> {
        let mut guard = AbandonOnDrop {
            engine: self,
            ticket: &ticket,
            armed: true,
        };
        let result = self.generator.generate(&ticket.params).await;
        guard.armed = false;
        self.complete(&ticket, result)
    }

    /// Starts a generation on a spawned task.
    ///
    /// Validation and the clearing of the previous plan happen before this
    /// returns, so a snapshot taken right after shows the cleared state.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidParameters`] or
    /// [`GenerationError::AlreadyInProgress`].
    pub fn spawn_generation(
        &self,
        request: &TripRequest,
    ) -> Result<PendingGeneration, GenerationError> {
        let ticket = self.begin_generation(request)?;
        debug!("Spawning generation {}", ticket.sequence);

        let engine = self.clone();
        let task_ticket = ticket.clone();
        let handle = tokio::spawn(async move { engine.run(task_ticket).await });

        Ok(PendingGeneration { ticket, handle })
    }

    /// Abandons the in-flight generation. Returns its sequence number.
    pub fn abandon_generation(&self) -> Option<u64> {
        self.session().abandon_generation()
    }

    /// Adds a hotel selection. Returns true if the set changed.
    pub fn add_hotel(&self, hotel: Hotel) -> bool {
        self.session().add_hotel(hotel)
    }

    /// Adds the catalog hotel with this id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownItem`] if the id is not in the catalog.
    pub fn add_hotel_by_id(&self, id: u32) -> Result<bool, CatalogError> {
        let hotel = self.catalog.require_hotel(id)?.clone();
        Ok(self.add_hotel(hotel))
    }

    /// Removes a hotel selection. Returns true if the set changed.
    pub fn remove_hotel(&self, id: u32) -> bool {
        self.session().remove_hotel(id)
    }

    /// Returns true if the hotel is selected.
    #[must_use]
    pub fn contains_hotel(&self, id: u32) -> bool {
        self.session().contains_hotel(id)
    }

    /// Adds a food selection. Returns true if the set changed.
    pub fn add_food(&self, food: Food) -> bool {
        self.session().add_food(food)
    }

    /// Adds the catalog food venue with this id.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnknownItem`] if the id is not in the catalog.
    pub fn add_food_by_id(&self, id: u32) -> Result<bool, CatalogError> {
        let food = self.catalog.require_food(id)?.clone();
        Ok(self.add_food(food))
    }

    /// Removes a food selection. Returns true if the set changed.
    pub fn remove_food(&self, id: u32) -> bool {
        self.session().remove_food(id)
    }

    /// Returns true if the food venue is selected.
    #[must_use]
    pub fn contains_food(&self, id: u32) -> bool {
        self.session().contains_food(id)
    }

    /// Copies the observable session state.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.session().snapshot()
    }

    /// The injected catalog.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Longest accepted trip, in days.
    #[must_use]
    pub const fn max_days(&self) -> u32 {
        self.max_days
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FallbackConfig;
    use crate::error::ServiceError;
    use crate::planner::{FallbackPlanner, PlanSource};
    use crate::service::{MockPlanService, PlanService};
    use crate::session::GenerationOutcome;
    use std::time::Duration;
    use tokio::sync::Notify;

    fn fallback_engine() -> GuideEngine {
        let generator = PlanGenerator::new("East Java")
            .with_fallback(FallbackPlanner::new("East Java", FallbackConfig::default()));
        GuideEngine::new(generator, Catalog::east_java(), 14)
    }

    fn failing_service() -> Arc<dyn PlanService> {
        let mut mock = MockPlanService::new();
        mock.expect_name().return_const("mock");
        mock.expect_complete()
            .returning(|_| Err(ServiceError::api_error(503, "unavailable")));
        Arc::new(mock)
    }

    #[tokio::test]
    async fn test_surabaya_three_days_offline() {
        let engine = fallback_engine();
        let plan = engine
            .generate(&TripRequest::new("Surabaya", "Private Car", "3"))
            .await
            .unwrap();

        let itinerary = &plan.itinerary;
        assert_eq!(plan.source, PlanSource::Fallback);
        assert_eq!(itinerary.days.len(), 3);
        assert!(itinerary.days[0].locations.iter().any(|l| l == "Surabaya"));
        assert_eq!(itinerary.total_budget_range, "Rp 2500000 - Rp 4500000");
        for (i, day) in itinerary.days.iter().enumerate() {
            assert_eq!(day.day_index as usize, i + 1);
        }
    }

    #[tokio::test]
    async fn test_fallback_is_byte_identical() {
        let generator = PlanGenerator::new("East Java")
            .with_service(failing_service())
            .with_fallback(FallbackPlanner::new("East Java", FallbackConfig::default()));
        let engine = GuideEngine::new(generator, Catalog::east_java(), 14);
        let request = TripRequest::new("Malang", "Bicycle", "5");

        let a = engine.generate(&request).await.unwrap();
        let b = engine.generate(&request).await.unwrap();

        assert_eq!(a.fingerprint, b.fingerprint);
        assert_eq!(
            serde_json::to_string(&a.itinerary).unwrap(),
            serde_json::to_string(&b.itinerary).unwrap()
        );
        assert!(a.fallback_reason.is_some());
    }

    #[tokio::test]
    async fn test_service_failure_without_fallback() {
        let generator = PlanGenerator::new("East Java").with_service(failing_service());
        let engine = GuideEngine::new(generator, Catalog::east_java(), 14);

        let err = engine
            .generate(&TripRequest::new("Malang", "Bicycle", "2"))
            .await
            .unwrap_err();

        assert!(matches!(err, GenerationError::GenerationFailed { .. }));
        let snapshot = engine.snapshot();
        assert!(snapshot.plan.is_none());
        assert!(!snapshot.is_generating());
        assert!(snapshot.last_error.is_some());
    }

    #[tokio::test]
    async fn test_add_by_id() {
        let engine = fallback_engine();
        engine
            .generate(&TripRequest::new("Malang", "", "1"))
            .await
            .unwrap();

        assert!(engine.add_hotel_by_id(1).unwrap());
        assert!(!engine.add_hotel_by_id(1).unwrap());
        assert_eq!(engine.snapshot().hotels.len(), 1);
        assert!(engine.contains_hotel(1));

        assert!(engine.add_food_by_id(2).unwrap());
        assert!(engine.remove_food(2));
        assert!(!engine.contains_food(2));

        assert!(matches!(
            engine.add_hotel_by_id(99),
            Err(CatalogError::UnknownItem { id: 99, .. })
        ));
    }

    #[tokio::test]
    async fn test_generate_clears_selections() {
        let engine = fallback_engine();
        let request = TripRequest::new("Malang", "", "1");
        engine.generate(&request).await.unwrap();
        engine.add_hotel_by_id(1).unwrap();

        engine.generate(&request).await.unwrap();
        assert!(engine.snapshot().hotels.is_empty());
    }

    /// Blocks in `complete` until released, so tests can interleave requests.
    struct GatedService {
        gate: Arc<Notify>,
    }

    #[async_trait::async_trait]
    impl PlanService for GatedService {
        fn name(&self) -> &'static str {
            "gated"
        }

        async fn complete(&self, _prompt: &str) -> std::result::Result<String, ServiceError> {
            self.gate.notified().await;
            Err(ServiceError::network("released"))
        }
    }

    fn gated_engine() -> (GuideEngine, Arc<Notify>) {
        let gate = Arc::new(Notify::new());
        let generator = PlanGenerator::new("East Java")
            .with_service(Arc::new(GatedService { gate: Arc::clone(&gate) }))
            .with_fallback(FallbackPlanner::new("East Java", FallbackConfig::default()))
            .with_timeout(Duration::from_secs(30));
        (GuideEngine::new(generator, Catalog::east_java(), 14), gate)
    }

    #[tokio::test]
    async fn test_spawn_clears_state_immediately() {
        let (engine, gate) = gated_engine();
        engine.add_hotel_by_id(1).unwrap();

        let pending = engine
            .spawn_generation(&TripRequest::new("Surabaya", "", "2"))
            .unwrap();
        let snapshot = engine.snapshot();
        assert!(snapshot.plan.is_none());
        assert!(snapshot.hotels.is_empty());
        assert_eq!(snapshot.generating, Some(pending.ticket.sequence));

        let err = engine
            .spawn_generation(&TripRequest::new("Batu", "", "1"))
            .unwrap_err();
        assert!(matches!(err, GenerationError::AlreadyInProgress { .. }));

        gate.notify_one();
        let plan = pending.wait().await.unwrap();
        assert_eq!(plan.itinerary.days.len(), 2);
        assert!(!engine.snapshot().is_generating());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_generate_releases_session() {
        let (engine, gate) = gated_engine();

        let dropped = tokio::time::timeout(
            Duration::from_secs(1),
            engine.generate(&TripRequest::new("Malang", "", "2")),
        )
        .await;
        assert!(dropped.is_err());
        assert!(!engine.snapshot().is_generating());

        gate.notify_one();
        let plan = engine
            .generate(&TripRequest::new("Surabaya", "", "3"))
            .await
            .unwrap();
        assert_eq!(plan.sequence, 2);

        let history = engine.snapshot().history;
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].outcome, GenerationOutcome::Abandoned);
    }

    #[tokio::test]
    async fn test_selection_during_generation_survives_completion() {
        let (engine, gate) = gated_engine();

        let pending = engine
            .spawn_generation(&TripRequest::new("Malang", "", "2"))
            .unwrap();
        assert!(engine.add_hotel_by_id(1).unwrap());
        assert!(engine.add_food_by_id(3).unwrap());

        gate.notify_one();
        pending.wait().await.unwrap();

        assert!(engine.contains_hotel(1));
        assert!(engine.contains_food(3));
        let snapshot = engine.snapshot();
        assert_eq!(snapshot.hotels.len(), 1);
        assert_eq!(snapshot.foods.len(), 1);
        assert!(snapshot.plan.is_some());
    }

    #[tokio::test]
    async fn test_abandoned_generation_is_superseded() {
        let (engine, gate) = gated_engine();

        let stale = engine
            .spawn_generation(&TripRequest::new("Malang", "", "2"))
            .unwrap();
        assert_eq!(engine.abandon_generation(), Some(stale.ticket.sequence));

        // A newer generation that completes without the service.
        let fresh_ticket = engine
            .begin_generation(&TripRequest::new("Surabaya", "", "3"))
            .unwrap();
        let fresh_plan = FallbackPlanner::new("East Java", FallbackConfig::default())
            .plan(&fresh_ticket.params);
        let fresh = engine
            .complete(
                &fresh_ticket,
                Ok(GeneratedPlan {
                    itinerary: fresh_plan,
                    source: PlanSource::Fallback,
                    fallback_reason: None,
                }),
            )
            .unwrap();
        engine.add_hotel_by_id(2).unwrap();

        gate.notify_one();
        let err = stale.wait().await.unwrap_err();
        assert_eq!(err, GenerationError::Superseded { sequence: 1 });

        let snapshot = engine.snapshot();
        assert_eq!(snapshot.plan, Some(fresh));
        assert_eq!(snapshot.hotels.len(), 1);
    }
}
