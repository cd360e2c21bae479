//! Itinerary agent document

use serde::{Deserialize, Serialize};

use super::Validate;
use crate::structured::lenient;

/// Activities for one part of a day
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub activities: Vec<String>,
    pub location: String,
}

/// Breakfast, lunch and dinner recommendations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meals {
    pub breakfast: String,
    pub lunch: String,
    pub dinner: String,
}

impl Meals {
    /// All three meals are filled in
    pub fn is_complete(&self) -> bool {
        !self.breakfast.trim().is_empty() && !self.lunch.trim().is_empty() && !self.dinner.trim().is_empty()
    }
}

/// One day of the itinerary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayItinerary {
    #[serde(deserialize_with = "lenient::uint")]
    pub day: u32,
    pub title: String,
    pub morning: TimeSlot,
    pub afternoon: TimeSlot,
    pub evening: TimeSlot,
    #[serde(default)]
    pub meals: Meals,
}

impl DayItinerary {
    /// Placeholder day used when meals arrive for a day the itinerary lacks
    pub fn placeholder(day: u32) -> Self {
        Self {
            day,
            title: format!("Day {}", day),
            morning: TimeSlot::default(),
            afternoon: TimeSlot::default(),
            evening: TimeSlot::default(),
            meals: Meals::default(),
        }
    }
}

/// Validated day-by-day itinerary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItineraryDoc {
    pub destination: String,
    #[serde(deserialize_with = "lenient::uint")]
    pub days: u32,
    pub itinerary: Vec<DayItinerary>,
}

impl Validate for ItineraryDoc {
    fn validate(&self) -> Result<(), String> {
        if self.days < 1 {
            return Err("days must be at least 1".to_string());
        }
        if self.itinerary.len() != self.days as usize {
            return Err(format!(
                "itinerary has {} entries but days is {}",
                self.itinerary.len(),
                self.days
            ));
        }
        Ok(())
    }
}
