//! Configuration parser for loading configuration files.
//!
//! This module handles loading configuration from YAML files and environment
//! variables, with proper precedence and error handling.

use crate::error::{ConfigError, GuideError, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::spec::{GuideConfig, ServiceConfig};

/// Configuration parser for loading planner configuration.
#[derive(Debug, Default)]
pub struct ConfigParser {
    /// Base path for resolving relative paths.
    base_path: Option<PathBuf>,
}

impl ConfigParser {
    /// Creates a new configuration parser.
    #[must_use]
    pub const fn new() -> Self {
        Self { base_path: None }
    }

    /// Sets the base path for resolving relative paths.
    #[must_use]
    pub fn with_base_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.base_path = Some(path.into());
        self
    }

    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_file(&self, path: impl AsRef<Path>) -> Result<GuideConfig> {
        let path = path.as_ref();
        info!("Loading configuration from: {}", path.display());

        if !path.exists() {
            return Err(GuideError::Config(ConfigError::FileNotFound {
                path: path.to_path_buf(),
            }));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            GuideError::Config(ConfigError::ParseError {
                message: format!("Failed to read file: {e}"),
                location: Some(path.display().to_string()),
            })
        })?;

        let mut config = self.parse_yaml(&content, Some(path))?;
        self.resolve_catalog_path(&mut config);
        Ok(config)
    }

    /// Parses configuration from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn parse_yaml(&self, content: &str, source: Option<&Path>) -> Result<GuideConfig> {
        debug!("Parsing YAML configuration");

        if content.trim().is_empty() {
            return Ok(GuideConfig::default());
        }

        let config: GuideConfig = serde_yaml::from_str(content).map_err(|e| {
            let location = source.map(|p| p.display().to_string());
            GuideError::Config(ConfigError::ParseError {
                message: format!("YAML parse error: {e}"),
                location,
            })
        })?;

        debug!("Successfully parsed configuration for region: {}", config.region);
        Ok(config)
    }

    /// Loads configuration with environment variable overrides.
    ///
    /// Environment variables are checked in the format
    /// `JATIMGUIDE_<SECTION>_<KEY>` (e.g., `JATIMGUIDE_SERVICE_MODEL`).
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_with_env(&self, path: impl AsRef<Path>) -> Result<GuideConfig> {
        let mut config = self.load_file(path)?;
        apply_overrides(&mut config, |key| std::env::var(key).ok());
        Ok(config)
    }

    /// Loads the .env file if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the .env file exists but cannot be loaded.
    pub fn load_dotenv(&self) -> Result<()> {
        let env_path = self
            .base_path
            .as_ref()
            .map_or_else(|| PathBuf::from(".env"), |p| p.join(".env"));

        if env_path.exists() {
            info!("Loading environment from: {}", env_path.display());
            dotenvy::from_path(&env_path).map_err(|e| {
                GuideError::Config(ConfigError::ParseError {
                    message: format!("Failed to load .env file: {e}"),
                    location: Some(env_path.display().to_string()),
                })
            })?;
        } else {
            debug!(".env file not found at: {}", env_path.display());
        }

        Ok(())
    }

    /// Gets the generation service API key from the configured variable.
    ///
    /// # Errors
    ///
    /// Returns an error if the variable is unset or empty.
    pub fn get_api_key(service: &ServiceConfig) -> Result<String> {
        std::env::var(&service.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                GuideError::Config(ConfigError::MissingEnvVar {
                    name: service.api_key_env.clone(),
                })
            })
    }

    /// Makes a relative catalog path relative to the config file directory.
    fn resolve_catalog_path(&self, config: &mut GuideConfig) {
        if let (Some(base), Some(path)) = (&self.base_path, &config.catalog.path) {
            if path.is_relative() {
                config.catalog.path = Some(base.join(path));
            }
        }
    }
}

/// Applies `JATIMGUIDE_*` overrides using the given variable lookup.
pub fn apply_overrides(config: &mut GuideConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(region) = lookup("JATIMGUIDE_REGION") {
        debug!("Overriding region from environment");
        config.region = region;
    }

    if let Some(enabled) = lookup("JATIMGUIDE_SERVICE_ENABLED") {
        debug!("Overriding service.enabled from environment");
        config.service.enabled = matches!(
            enabled.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        );
    }

    if let Some(model) = lookup("JATIMGUIDE_SERVICE_MODEL") {
        debug!("Overriding service.model from environment");
        config.service.model = model;
    }

    if let Some(base_url) = lookup("JATIMGUIDE_SERVICE_BASE_URL") {
        debug!("Overriding service.base_url from environment");
        config.service.base_url = base_url;
    }
}

/// Default configuration file names to search for.
pub const DEFAULT_CONFIG_FILES: &[&str] =
    &["jatimguide.yaml", "jatimguide.yml", ".jatimguide.yaml"];

/// Finds the configuration file in the given directory or its parents, then
/// in the user configuration directory.
///
/// # Errors
///
/// Returns an error if no configuration file is found.
pub fn find_config_file(start_dir: impl AsRef<Path>) -> Result<PathBuf> {
    let start = start_dir.as_ref();
    let mut current = start.to_path_buf();

    loop {
        for filename in DEFAULT_CONFIG_FILES {
            let config_path = current.join(filename);
            if config_path.exists() {
                info!("Found configuration file: {}", config_path.display());
                return Ok(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    if let Some(user_config) =
        dirs::config_dir().map(|d| d.join("jatimguide").join("config.yaml"))
    {
        if user_config.exists() {
            info!("Found configuration file: {}", user_config.display());
            return Ok(user_config);
        }
    }

    Err(GuideError::Config(ConfigError::FileNotFound {
        path: start.join(DEFAULT_CONFIG_FILES[0]),
    }))
}
