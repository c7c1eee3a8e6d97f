//! Configuration specification types for the route planner.
//!
//! This module defines the structs that map to the `jatimguide.yaml` file.
//! Every section has defaults, so an empty file (or no file at all) yields a
//! working fallback-capable configuration.

use ::validator::Validate;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Default base URL of the generation service.
pub const DEFAULT_BASE_URL: &str = "https://api.anthropic.com/v1";

/// Default model requested from the generation service.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-20250514";

/// Default environment variable holding the service API key.
pub const DEFAULT_API_KEY_ENV: &str = "ANTHROPIC_API_KEY";

/// The root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(default)]
pub struct GuideConfig {
    /// Region the itineraries are planned for.
    #[validate(length(min = 1))]
    pub region: String,
    /// External generation service settings.
    #[validate(nested)]
    pub service: ServiceConfig,
    /// Deterministic fallback settings.
    #[validate(nested)]
    pub fallback: FallbackConfig,
    /// Trip input limits.
    #[validate(nested)]
    pub trip: TripConfig,
    /// Catalog source.
    pub catalog: CatalogConfig,
}

/// External generation service configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(default)]
pub struct ServiceConfig {
    /// Whether to call the service at all.
    pub enabled: bool,
    /// Base URL; requests go to `{base_url}/messages`.
    #[validate(url)]
    pub base_url: String,
    /// Model identifier.
    #[validate(length(min = 1))]
    pub model: String,
    /// Maximum tokens the service may return.
    #[validate(range(min = 256, max = 64000))]
    pub max_tokens: u32,
    /// Upper bound on one generation call, in seconds.
    #[validate(range(min = 1, max = 600))]
    pub timeout_secs: u64,
    /// Retries for rate-limit and network failures.
    #[validate(range(max = 10))]
    pub max_retries: u32,
    /// Base delay between retries, in milliseconds.
    pub retry_delay_ms: u64,
    /// Environment variable holding the API key.
    #[validate(length(min = 1))]
    pub api_key_env: String,
}

/// Fallback itinerary configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(default)]
pub struct FallbackConfig {
    /// Whether the deterministic fallback may be used.
    pub enabled: bool,
    /// Estimated spend per day.
    #[validate(range(min = 1))]
    pub per_day_rate: u64,
    /// Amount subtracted from the total for the low end of the range.
    pub buffer: u64,
    /// Currency prefix used in the budget text.
    #[validate(length(min = 1))]
    pub currency: String,
    /// Hotel names for odd and even days.
    pub hotels: [String; 2],
}

/// Trip input limits.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Validate)]
#[serde(default)]
pub struct TripConfig {
    /// Longest trip accepted, in days.
    #[validate(range(min = 1, max = 30))]
    pub max_days: u32,
}

/// Catalog source configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CatalogConfig {
    /// YAML catalog file; the built-in East Java catalog is used when absent.
    pub path: Option<PathBuf>,
}

impl Default for GuideConfig {
    fn default() -> Self {
        Self {
            region: String::from("East Java"),
            service: ServiceConfig::default(),
            fallback: FallbackConfig::default(),
            trip: TripConfig::default(),
            catalog: CatalogConfig::default(),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            max_tokens: 4096,
            timeout_secs: 60,
            max_retries: 2,
            retry_delay_ms: 1000,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
        }
    }
}

impl Default for FallbackConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            per_day_rate: 1_500_000,
            buffer: 2_000_000,
            currency: String::from("Rp"),
            hotels: [
                String::from("Hotel Santika Malang"),
                String::from("Jiwa Jawa Resort Bromo"),
            ],
        }
    }
}

impl Default for TripConfig {
    fn default() -> Self {
        Self { max_days: 14 }
    }
}

impl GuideConfig {
    /// Returns true if at least one generation strategy is enabled.
    #[must_use]
    pub const fn has_strategy(&self) -> bool {
        self.service.enabled || self.fallback.enabled
    }
}
