//! Plan generation.
//!
//! The generator tries the external service first when one is configured and
//! falls back to the deterministic planner when the service is missing, fails,
//! times out, or replies with something that is not a valid itinerary.

use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::{GuideConfig, ServiceConfig};
use crate::error::{GenerationError, ServiceError};
use crate::service::{AnthropicClient, PlanService, PromptBuilder};

use super::fallback::FallbackPlanner;
use super::itinerary::{GeneratedPlan, PlanSource};
use super::params::TripParameters;
use super::parse::parse_itinerary;

/// Produces itineraries from validated trip parameters.
pub struct PlanGenerator {
    /// External service, if enabled.
    service: Option<Arc<dyn PlanService>>,
    /// Deterministic fallback, if enabled.
    fallback: Option<FallbackPlanner>,
    /// Prompt builder for the configured region.
    prompts: PromptBuilder,
    /// Upper bound on one service call.
    timeout: Duration,
}

impl std::fmt::Debug for PlanGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlanGenerator")
            .field("service", &self.service.as_ref().map(|s| s.name()))
            .field("fallback", &self.fallback.is_some())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl PlanGenerator {
    /// Creates a generator with no strategies for a region.
    #[must_use]
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            service: None,
            fallback: None,
            prompts: PromptBuilder::new(region),
            timeout: Duration::from_secs(ServiceConfig::default().timeout_secs),
        }
    }

    /// Sets the external service.
    #[must_use]
    pub fn with_service(mut self, service: Arc<dyn PlanService>) -> Self {
        self.service = Some(service);
        self
    }

    /// Sets the fallback planner.
    #[must_use]
    pub fn with_fallback(mut self, fallback: FallbackPlanner) -> Self {
        self.fallback = Some(fallback);
        self
    }

    /// Sets the service call timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Builds a generator from configuration.
    ///
    /// The service is only wired in when it is enabled and an API key is
    /// available.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn from_config(config: &GuideConfig, api_key: Option<&str>) -> Result<Self, ServiceError> {
        let mut generator = Self::new(config.region.clone())
            .with_timeout(Duration::from_secs(config.service.timeout_secs));

        if config.service.enabled {
            match api_key {
                Some(key) => {
                    let client = AnthropicClient::new(key, &config.service)?;
                    info!("Generation service enabled: {}", client.endpoint());
                    generator = generator.with_service(Arc::new(client));
                }
                None => warn!(
                    "{} is not set; itineraries will come from the fallback planner",
                    config.service.api_key_env
                ),
            }
        }

        if config.fallback.enabled {
            generator = generator.with_fallback(FallbackPlanner::new(
                config.region.clone(),
                config.fallback.clone(),
            ));
        }

        Ok(generator)
    }

    /// Returns true if an external service is wired in.
    #[must_use]
    pub fn has_service(&self) -> bool {
        self.service.is_some()
    }

    /// Returns true if the fallback planner is enabled.
    #[must_use]
    pub const fn has_fallback(&self) -> bool {
        self.fallback.is_some()
    }

    /// Generates an itinerary.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::GenerationFailed`] if the service is missing
    /// or unusable and the fallback is disabled.
    pub async fn generate(
        &self,
        params: &TripParameters,
    ) -> Result<GeneratedPlan, GenerationError> {
        let failure = match &self.service {
            Some(service) => match self.try_service(service.as_ref(), params).await {
                Ok(plan) => return Ok(plan),
                Err(reason) => Some(reason),
            },
            None => None,
        };

        match &self.fallback {
            Some(fallback) => {
                if let Some(reason) = &failure {
                    warn!("Using fallback itinerary: {reason}");
                } else {
                    debug!("No generation service configured; using fallback itinerary");
                }
                Ok(GeneratedPlan {
                    itinerary: fallback.plan(params),
                    source: PlanSource::Fallback,
                    fallback_reason: failure,
                })
            }
            None => Err(GenerationError::failed(
                failure.unwrap_or_else(|| String::from("no generation strategy is enabled")),
            )),
        }
    }

    /// Calls the service and parses its reply. Errors are returned as text
    /// because they only ever become a fallback reason or a failure message.
    async fn try_service(
        &self,
        service: &dyn PlanService,
        params: &TripParameters,
    ) -> Result<GeneratedPlan, String> {
        let prompt = self.prompts.build(params);
        debug!(
            "Requesting {}-day itinerary from {}",
            params.duration_days,
            service.name()
        );

        let text = match tokio::time::timeout(self.timeout, service.complete(&prompt)).await {
            Ok(Ok(text)) => text,
            Ok(Err(e)) => return Err(e.to_string()),
            Err(_) => {
                let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
                return Err(ServiceError::Timeout { timeout_ms }.to_string());
            }
        };

        let itinerary =
            parse_itinerary(&text, params.duration_days).map_err(|e| e.to_string())?;

        info!(
            "Generated {}-day itinerary with {}",
            itinerary.day_count(),
            service.name()
        );

        Ok(GeneratedPlan {
            itinerary,
            source: PlanSource::External,
            fallback_reason: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FallbackConfig;
    use crate::planner::TransportMode;
    use crate::service::MockPlanService;

    fn params(days: i64) -> TripParameters {
        TripParameters::new("Surabaya", TransportMode::PrivateCar, days, 14).unwrap()
    }

    fn fallback() -> FallbackPlanner {
        FallbackPlanner::new("East Java", FallbackConfig::default())
    }

    fn reply(days: u32) -> String {
        let days: Vec<serde_json::Value> = (1..=days)
            .map(|day| {
                serde_json::json!({
                    "day": day,
                    "title": format!("Day {day}"),
                    "locations": ["Malang"],
                    "activities": ["Walk"],
                    "hotel": "Hotel Tugu",
                    "food": ["Bakso"]
                })
            })
            .collect();
        let body = serde_json::json!({
            "title": "Service trip",
            "summary": "From the service",
            "days": days,
            "totalBudget": "Rp 1 - Rp 2",
            "tips": []
        });
        format!("```json\n{body}\n```")
    }

    fn service(reply: Result<String, ServiceError>) -> Arc<dyn PlanService> {
        let mut mock = MockPlanService::new();
        mock.expect_name().return_const("mock");
        mock.expect_complete()
            .times(1)
            .return_once(move |_| reply);
        Arc::new(mock)
    }

    #[tokio::test]
    async fn test_external_plan_used() {
        let generator = PlanGenerator::new("East Java")
            .with_service(service(Ok(reply(2))))
            .with_fallback(fallback());

        let plan = generator.generate(&params(2)).await.unwrap();
        assert_eq!(plan.source, PlanSource::External);
        assert_eq!(plan.itinerary.title, "Service trip");
        assert!(plan.fallback_reason.is_none());
    }

    #[tokio::test]
    async fn test_prompt_carries_parameters() {
        let mut mock = MockPlanService::new();
        mock.expect_name().return_const("mock");
        mock.expect_complete()
            .withf(|prompt: &str| prompt.contains("2-day") && prompt.contains("Surabaya"))
            .times(1)
            .returning(|_| Ok(reply(2)));

        let generator = PlanGenerator::new("East Java").with_service(Arc::new(mock));
        assert!(generator.generate(&params(2)).await.is_ok());
    }

    #[tokio::test]
    async fn test_wrong_day_count_falls_back() {
        let generator = PlanGenerator::new("East Java")
            .with_service(service(Ok(reply(2))))
            .with_fallback(fallback());

        let plan = generator.generate(&params(3)).await.unwrap();
        assert_eq!(plan.source, PlanSource::Fallback);
        assert_eq!(plan.itinerary.days.len(), 3);
        assert!(plan.fallback_reason.unwrap().contains("expected 3 days"));
    }

    #[tokio::test]
    async fn test_service_error_falls_back() {
        let generator = PlanGenerator::new("East Java")
            .with_service(service(Err(ServiceError::network("refused"))))
            .with_fallback(fallback());

        let plan = generator.generate(&params(3)).await.unwrap();
        assert_eq!(plan.source, PlanSource::Fallback);
        assert_eq!(plan.itinerary.total_budget_range, "Rp 2500000 - Rp 4500000");
    }

    #[tokio::test]
    async fn test_failure_without_fallback() {
        let generator = PlanGenerator::new("East Java")
            .with_service(service(Ok(String::from("Sorry, I can't help with that."))));

        let err = generator.generate(&params(1)).await.unwrap_err();
        assert!(matches!(err, GenerationError::GenerationFailed { .. }));
    }

    #[tokio::test]
    async fn test_no_strategy_fails() {
        let err = PlanGenerator::new("East Java")
            .generate(&params(1))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            GenerationError::failed("no generation strategy is enabled")
        );
    }

    struct SlowService;

    #[async_trait::async_trait]
    impl PlanService for SlowService {
        fn name(&self) -> &'static str {
            "slow"
        }

        async fn complete(&self, _prompt: &str) -> Result<String, ServiceError> {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok(String::new())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_falls_back() {
        let generator = PlanGenerator::new("East Java")
            .with_service(Arc::new(SlowService))
            .with_fallback(fallback())
            .with_timeout(Duration::from_secs(5));

        let plan = generator.generate(&params(2)).await.unwrap();
        assert_eq!(plan.source, PlanSource::Fallback);
        assert!(plan.fallback_reason.unwrap().contains("5000 ms"));
    }

    #[test]
    fn test_from_config_without_key_is_fallback_only() {
        let generator = PlanGenerator::from_config(&GuideConfig::default(), None).unwrap();
        assert!(!generator.has_service());
        assert!(generator.has_fallback());
    }

    #[test]
    fn test_fallback_only_is_deterministic() {
        let generator = PlanGenerator::new("East Java").with_fallback(fallback());

        let first = tokio_test::block_on(generator.generate(&params(4))).unwrap();
        let second = tokio_test::block_on(generator.generate(&params(4))).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.source, PlanSource::Fallback);
        assert!(first.fallback_reason.is_none());
    }

    #[test]
    fn test_from_config_with_key() {
        let generator = PlanGenerator::from_config(&GuideConfig::default(), Some("key")).unwrap();
        assert!(generator.has_service());
    }
}
