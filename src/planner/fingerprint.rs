//! Itinerary fingerprinting.
//!
//! A fingerprint is a SHA-256 digest over every field of an itinerary, so two
//! plans with the same content always carry the same label.

use sha2::{Digest, Sha256};

use super::itinerary::{Itinerary, ItineraryDay};

/// Number of hex characters shown for a short fingerprint.
const SHORT_LEN: usize = 12;

/// Hasher for computing itinerary fingerprints.
#[derive(Debug, Default)]
pub struct ItineraryHasher;

impl ItineraryHasher {
    /// Creates a new itinerary hasher.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Computes the fingerprint of a whole itinerary.
    #[must_use]
    pub fn hash_itinerary(&self, itinerary: &Itinerary) -> String {
        let mut hasher = Sha256::new();

        update_str(&mut hasher, &itinerary.title);
        update_str(&mut hasher, &itinerary.summary);
        update_str(&mut hasher, &itinerary.total_budget_range);
        update_list(&mut hasher, &itinerary.tips);

        // Days in stored order; order is part of the plan
        hasher.update((itinerary.days.len() as u64).to_be_bytes());
        for day in &itinerary.days {
            hasher.update(self.hash_day(day).as_bytes());
        }

        hex::encode(hasher.finalize())
    }

    /// Computes the fingerprint of one day.
    #[must_use]
    pub fn hash_day(&self, day: &ItineraryDay) -> String {
        let mut hasher = Sha256::new();

        hasher.update(day.day_index.to_be_bytes());
        update_str(&mut hasher, &day.title);
        update_list(&mut hasher, &day.locations);
        update_list(&mut hasher, &day.activities);
        update_str(&mut hasher, &day.hotel_name);
        update_list(&mut hasher, &day.food_names);
        match &day.notes {
            Some(notes) => {
                hasher.update([1u8]);
                update_str(&mut hasher, notes);
            }
            None => hasher.update([0u8]),
        }

        hex::encode(hasher.finalize())
    }

    /// Returns a short prefix of a fingerprint for display.
    #[must_use]
    pub fn short_hash(hash: &str) -> &str {
        hash.get(..SHORT_LEN).unwrap_or(hash)
    }
}

/// Length-prefixed so that field boundaries cannot shift between values.
fn update_str(hasher: &mut Sha256, value: &str) {
    hasher.update((value.len() as u64).to_be_bytes());
    hasher.update(value.as_bytes());
}

fn update_list(hasher: &mut Sha256, values: &[String]) {
    hasher.update((values.len() as u64).to_be_bytes());
    for value in values {
        update_str(hasher, value);
    }
}
