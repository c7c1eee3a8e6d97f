//! Trip parameters and their validation.
//!
//! Raw input arrives as text ([`TripRequest`]) and is turned into
//! [`TripParameters`] before anything else happens. A request that fails here
//! never touches the current itinerary.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::GenerationError;

/// How the traveler gets around.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum TransportMode {
    /// Buses, trains and ferries.
    #[default]
    #[serde(rename = "Public Transport")]
    PublicTransport,
    /// Rented or own car.
    #[serde(rename = "Private Car")]
    PrivateCar,
    /// Motorcycle.
    #[serde(rename = "Motorcycle")]
    Motorcycle,
    /// Bicycle.
    #[serde(rename = "Bicycle")]
    Bicycle,
}

/// Raw trip input as typed by the traveler.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TripRequest {
    /// Starting point text.
    pub start_point: String,
    /// Transport mode text.
    pub transport_mode: String,
    /// Duration text, expected to hold a whole number of days.
    pub duration: String,
}

/// Validated trip parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TripParameters {
    /// Where the trip starts.
    pub start_point: String,
    /// How the traveler moves between places.
    pub transport_mode: TransportMode,
    /// Number of days, within the configured bounds.
    pub duration_days: u32,
}

impl TransportMode {
    /// All modes, in display order.
    pub const ALL: [Self; 4] = [
        Self::PublicTransport,
        Self::PrivateCar,
        Self::Motorcycle,
        Self::Bicycle,
    ];

    /// Human-readable name.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::PublicTransport => "Public Transport",
            Self::PrivateCar => "Private Car",
            Self::Motorcycle => "Motorcycle",
            Self::Bicycle => "Bicycle",
        }
    }
}

impl std::fmt::Display for TransportMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TransportMode {
    type Err = GenerationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "publictransport" | "public" => Ok(Self::PublicTransport),
            "privatecar" | "car" => Ok(Self::PrivateCar),
            "motorcycle" | "motorbike" => Ok(Self::Motorcycle),
            "bicycle" | "bike" => Ok(Self::Bicycle),
            _ => Err(GenerationError::invalid(
                "transport_mode",
                format!(
                    "'{}' is not one of: {}",
                    s.trim(),
                    Self::ALL.map(Self::label).join(", ")
                ),
            )),
        }
    }
}

impl TripRequest {
    /// Creates a request from raw text fields.
    #[must_use]
    pub fn new(
        start_point: impl Into<String>,
        transport_mode: impl Into<String>,
        duration: impl Into<String>,
    ) -> Self {
        Self {
            start_point: start_point.into(),
            transport_mode: transport_mode.into(),
            duration: duration.into(),
        }
    }

    /// Validates the request into trip parameters.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidParameters`] if the start point is
    /// blank, the transport mode is unknown, or the duration is not a whole
    /// number in `1..=max_days`.
    pub fn validate(&self, max_days: u32) -> Result<TripParameters, GenerationError> {
        let start_point = self.start_point.trim();
        if start_point.is_empty() {
            return Err(GenerationError::invalid(
                "start_point",
                "starting point is required",
            ));
        }

        let duration = self.duration.trim();
        if duration.is_empty() {
            return Err(GenerationError::invalid("duration", "duration is required"));
        }

        let days: i64 = duration.parse().map_err(|_| {
            GenerationError::invalid(
                "duration",
                format!("'{duration}' is not a whole number of days"),
            )
        })?;

        let transport_mode = if self.transport_mode.trim().is_empty() {
            TransportMode::default()
        } else {
            self.transport_mode.parse()?
        };

        TripParameters::new(start_point, transport_mode, days, max_days)
    }
}

impl TripParameters {
    /// Creates validated parameters.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::InvalidParameters`] if the start point is
    /// blank or `days` is outside `1..=max_days`.
    pub fn new(
        start_point: &str,
        transport_mode: TransportMode,
        days: i64,
        max_days: u32,
    ) -> Result<Self, GenerationError> {
        let start_point = start_point.trim();
        if start_point.is_empty() {
            return Err(GenerationError::invalid(
                "start_point",
                "starting point is required",
            ));
        }

        if days < 1 {
            return Err(GenerationError::invalid(
                "duration",
                "duration must be at least 1 day",
            ));
        }

        let duration_days = u32::try_from(days)
            .ok()
            .filter(|d| *d <= max_days)
            .ok_or_else(|| {
                GenerationError::invalid(
                    "duration",
                    format!("duration must be at most {max_days} days"),
                )
            })?;

        Ok(Self {
            start_point: start_point.to_string(),
            transport_mode,
            duration_days,
        })
    }
}

impl From<&TripParameters> for TripRequest {
    fn from(params: &TripParameters) -> Self {
        Self {
            start_point: params.start_point.clone(),
            transport_mode: params.transport_mode.label().to_string(),
            duration: params.duration_days.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn field_of(err: &GenerationError) -> &str {
        match err {
            GenerationError::InvalidParameters { field, .. } => field,
            _ => "",
        }
    }

    #[test]
    fn test_valid_request() {
        let params = TripRequest::new("  Surabaya ", "Private Car", "3")
            .validate(14)
            .unwrap();
        assert_eq!(params.start_point, "Surabaya");
        assert_eq!(params.transport_mode, TransportMode::PrivateCar);
        assert_eq!(params.duration_days, 3);
    }

    #[test]
    fn test_transport_slugs() {
        assert_eq!("private-car".parse::<TransportMode>(), Ok(TransportMode::PrivateCar));
        assert_eq!("PUBLIC_TRANSPORT".parse::<TransportMode>(), Ok(TransportMode::PublicTransport));
        assert_eq!("bike".parse::<TransportMode>(), Ok(TransportMode::Bicycle));
        assert!("helicopter".parse::<TransportMode>().is_err());
    }

    #[test]
    fn test_blank_transport_uses_default() {
        let params = TripRequest::new("Malang", "", "2").validate(14).unwrap();
        assert_eq!(params.transport_mode, TransportMode::PublicTransport);
    }

    #[test]
    fn test_invalid_inputs() {
        let cases = [
            (TripRequest::new("", "Bicycle", "3"), "start_point"),
            (TripRequest::new("   ", "Bicycle", "3"), "start_point"),
            (TripRequest::new("Malang", "Bicycle", ""), "duration"),
            (TripRequest::new("Malang", "Bicycle", "0"), "duration"),
            (TripRequest::new("Malang", "Bicycle", "-2"), "duration"),
            (TripRequest::new("Malang", "Bicycle", "three"), "duration"),
            (TripRequest::new("Malang", "Bicycle", "2.5"), "duration"),
            (TripRequest::new("Malang", "Bicycle", "15"), "duration"),
            (TripRequest::new("Malang", "Jetpack", "3"), "transport_mode"),
        ];

        for (request, field) in cases {
            let err = request.validate(14).unwrap_err();
            assert_eq!(field_of(&err), field, "request {request:?}");
        }
    }

    #[test]
    fn test_request_round_trip_from_params() {
        let params = TripParameters::new("Batu", TransportMode::Motorcycle, 4, 14).unwrap();
        let request = TripRequest::from(&params);
        assert_eq!(request.validate(14).unwrap(), params);
    }
}
