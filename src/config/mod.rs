//! Configuration module for the route planner.
//!
//! This module handles all configuration-related functionality:
//! - Parsing and deserializing `jatimguide.yaml`
//! - Environment variable overrides and `.env` loading
//! - Validation of configuration values

mod spec;
mod parser;
mod validator;

pub use spec::{
    CatalogConfig, FallbackConfig, GuideConfig, ServiceConfig, TripConfig, DEFAULT_API_KEY_ENV,
    DEFAULT_BASE_URL, DEFAULT_MODEL,
};
pub use parser::{apply_overrides, find_config_file, ConfigParser, DEFAULT_CONFIG_FILES};
pub use self::validator::{ConfigValidator, ValidationError, ValidationResult};
