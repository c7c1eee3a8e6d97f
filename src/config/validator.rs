//! Configuration validation.
//!
//! Field-level rules (ranges, lengths, URL shape) are declared on the config
//! types with the `validator` derive. Cross-field rules live here.

use ::validator::{Validate, ValidationErrors, ValidationErrorsKind};
use tracing::debug;

use crate::error::{ConfigError, GuideError, Result};

use super::spec::GuideConfig;

/// Validator for planner configurations.
#[derive(Debug, Default)]
pub struct ConfigValidator;

/// Validation result containing all errors found.
#[derive(Debug, Default)]
pub struct ValidationResult {
    /// List of validation errors.
    pub errors: Vec<ValidationError>,
    /// List of warnings (non-fatal issues).
    pub warnings: Vec<String>,
}

/// A single validation error.
#[derive(Debug)]
pub struct ValidationError {
    /// The field path that failed validation.
    pub field: String,
    /// The error message.
    pub message: String,
}

impl ConfigValidator {
    /// Creates a new validator.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates a planner configuration.
    ///
    /// # Errors
    ///
    /// Returns the first error if validation fails.
    pub fn validate(&self, config: &GuideConfig) -> Result<ValidationResult> {
        let result = self.check(config);

        if result.errors.is_empty() {
            debug!("Configuration validation passed");
            Ok(result)
        } else {
            let first_error = &result.errors[0];
            Err(GuideError::Config(ConfigError::validation(
                first_error.message.clone(),
                first_error.field.clone(),
            )))
        }
    }

    /// Collects every error and warning without failing.
    #[must_use]
    pub fn check(&self, config: &GuideConfig) -> ValidationResult {
        let mut result = ValidationResult::default();

        Self::validate_fields(config, &mut result);
        Self::validate_strategies(config, &mut result);
        Self::validate_fallback_hotels(config, &mut result);

        result
    }

    /// Applies the derive-declared field rules.
    fn validate_fields(config: &GuideConfig, result: &mut ValidationResult) {
        if let Err(errors) = config.validate() {
            collect_field_errors("", &errors, result);
        }
    }

    /// At least one way of producing a plan must remain.
    fn validate_strategies(config: &GuideConfig, result: &mut ValidationResult) {
        if !config.has_strategy() {
            result.errors.push(ValidationError {
                field: String::from("service.enabled"),
                message: String::from(
                    "Both the generation service and the fallback are disabled; no itinerary can be produced",
                ),
            });
        } else if !config.fallback.enabled {
            result.warnings.push(String::from(
                "Fallback is disabled: service failures will surface as generation errors",
            ));
        } else if !config.service.enabled {
            result.warnings.push(String::from(
                "Generation service is disabled: only fallback itineraries will be produced",
            ));
        }
    }

    fn validate_fallback_hotels(config: &GuideConfig, result: &mut ValidationResult) {
        for (i, name) in config.fallback.hotels.iter().enumerate() {
            if name.trim().is_empty() {
                result.errors.push(ValidationError {
                    field: format!("fallback.hotels[{i}]"),
                    message: String::from("Fallback hotel name cannot be empty"),
                });
            }
        }
    }
}

/// Flattens nested `validator` errors into dotted field paths.
fn collect_field_errors(prefix: &str, errors: &ValidationErrors, result: &mut ValidationResult) {
    let mut fields: Vec<_> = errors.errors().iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    for (field, kind) in fields {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for err in field_errors {
                    result.errors.push(ValidationError {
                        field: path.clone(),
                        message: err.to_string(),
                    });
                }
            }
            ValidationErrorsKind::Struct(inner) => collect_field_errors(&path, inner, result),
            ValidationErrorsKind::List(items) => {
                for (i, inner) in items {
                    collect_field_errors(&format!("{path}[{i}]"), inner, result);
                }
            }
        }
    }
}

impl ValidationResult {
    /// Returns true if validation passed (no errors).
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let validator = ConfigValidator::new();
        let result = validator.validate(&GuideConfig::default()).unwrap();
        assert!(result.is_valid());
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_no_strategy_is_error() {
        let mut config = GuideConfig::default();
        config.service.enabled = false;
        config.fallback.enabled = false;

        let result = ConfigValidator::new().check(&config);
        assert!(!result.is_valid());
        assert_eq!(result.errors[0].field, "service.enabled");
    }

    #[test]
    fn test_service_disabled_warns() {
        let mut config = GuideConfig::default();
        config.service.enabled = false;

        let result = ConfigValidator::new().validate(&config).unwrap();
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_empty_fallback_hotel() {
        let mut config = GuideConfig::default();
        config.fallback.hotels[1] = String::from("  ");

        let err = ConfigValidator::new().validate(&config).unwrap_err();
        assert!(matches!(
            err,
            GuideError::Config(ConfigError::ValidationError { field: Some(ref f), .. })
                if f == "fallback.hotels[1]"
        ));
    }

    #[test]
    fn test_field_rules_are_reported() {
        let mut config = GuideConfig::default();
        config.service.timeout_secs = 0;

        let result = ConfigValidator::new().check(&config);
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "service.timeout_secs"));
    }
}
