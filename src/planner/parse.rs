//! Parsing and shape checks for service replies.

use crate::error::GenerationError;

use super::itinerary::Itinerary;

/// Removes ```` ```json ```` and ```` ``` ```` markers anywhere in the text and
/// trims surrounding whitespace.
#[must_use]
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "")
        .replace("```JSON", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// Parses a service reply into an itinerary of exactly `expected_days` days.
///
/// # Errors
///
/// Returns [`GenerationError::MalformedResponse`] if the text is not the
/// itinerary JSON schema, the day count differs, a day is out of sequence, or
/// a day has no locations.
pub fn parse_itinerary(raw: &str, expected_days: u32) -> Result<Itinerary, GenerationError> {
    let text = strip_code_fences(raw);
    if text.is_empty() {
        return Err(GenerationError::malformed("empty response"));
    }

    let itinerary: Itinerary = serde_json::from_str(&text)
        .map_err(|e| GenerationError::malformed(format!("not an itinerary: {e}")))?;

    validate_shape(&itinerary, expected_days)?;
    Ok(itinerary)
}

/// Checks day count, numbering and locations.
///
/// # Errors
///
/// Returns [`GenerationError::MalformedResponse`] describing the first problem.
pub fn validate_shape(itinerary: &Itinerary, expected_days: u32) -> Result<(), GenerationError> {
    if itinerary.days.len() != expected_days as usize {
        return Err(GenerationError::malformed(format!(
            "expected {expected_days} days, got {}",
            itinerary.days.len()
        )));
    }

    for (position, day) in (1u32..).zip(&itinerary.days) {
        if day.day_index != position {
            return Err(GenerationError::malformed(format!(
                "day at position {position} is numbered {}",
                day.day_index
            )));
        }
        if day.locations.iter().all(|l| l.trim().is_empty()) {
            return Err(GenerationError::malformed(format!(
                "day {position} has no locations"
            )));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reply(days: &[(u32, &[&str])]) -> String {
        let days: Vec<serde_json::Value> = days
            .iter()
            .map(|(day, locations)| {
                serde_json::json!({
                    "day": day,
                    "title": format!("Day {day}"),
                    "locations": locations,
                    "activities": ["Explore"],
                    "hotel": "Hotel Tugu Malang",
                    "food": ["Rawon"],
                    "notes": "Bring water"
                })
            })
            .collect();

        serde_json::json!({
            "title": "Trip",
            "summary": "A trip",
            "days": days,
            "totalBudget": "Rp 1.000.000 - Rp 2.000.000",
            "tips": ["Start early"]
        })
        .to_string()
    }

    #[test]
    fn test_strip_code_fences() {
        assert_eq!(strip_code_fences("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fences("  ```\n{}\n```  "), "{}");
        assert_eq!(strip_code_fences("{}"), "{}");
    }

    #[test]
    fn test_parse_fenced_reply() {
        let raw = format!("```json\n{}\n```", reply(&[(1, &["Surabaya"]), (2, &["Malang"])]));
        let itinerary = parse_itinerary(&raw, 2).unwrap();
        assert_eq!(itinerary.days.len(), 2);
        assert_eq!(itinerary.days[1].locations, ["Malang"]);
    }

    #[test]
    fn test_wrong_day_count() {
        let raw = reply(&[(1, &["Surabaya"])]);
        let err = parse_itinerary(&raw, 3).unwrap_err();
        assert_eq!(err, GenerationError::malformed("expected 3 days, got 1"));
    }

    #[test]
    fn test_out_of_sequence_day() {
        let raw = reply(&[(1, &["Surabaya"]), (3, &["Malang"])]);
        assert!(matches!(
            parse_itinerary(&raw, 2),
            Err(GenerationError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_empty_locations() {
        let raw = reply(&[(1, &[])]);
        assert_eq!(
            parse_itinerary(&raw, 1).unwrap_err(),
            GenerationError::malformed("day 1 has no locations")
        );
    }

    #[test]
    fn test_not_json() {
        assert!(matches!(
            parse_itinerary("Here is your trip: day one...", 1),
            Err(GenerationError::MalformedResponse { .. })
        ));
        assert!(matches!(
            parse_itinerary("```\n```", 1),
            Err(GenerationError::MalformedResponse { .. })
        ));
    }

    #[test]
    fn test_missing_required_field() {
        let raw = r#"{"title":"T","summary":"S","days":[],"tips":[]}"#;
        assert!(matches!(
            parse_itinerary(raw, 0),
            Err(GenerationError::MalformedResponse { .. })
        ));
    }
}
