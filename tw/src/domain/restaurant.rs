//! Restaurant agent document

use serde::{Deserialize, Serialize};

use super::Validate;
use super::itinerary::Meals;
use crate::structured::lenient;

/// Meal recommendations for one day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayMeals {
    #[serde(deserialize_with = "lenient::uint")]
    pub day: u32,
    pub breakfast: String,
    pub lunch: String,
    pub dinner: String,
}

impl DayMeals {
    pub fn to_meals(&self) -> Meals {
        Meals {
            breakfast: self.breakfast.clone(),
            lunch: self.lunch.clone(),
            dinner: self.dinner.clone(),
        }
    }
}

/// Validated day-by-day meal plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantDoc {
    pub destination: String,
    #[serde(deserialize_with = "lenient::uint")]
    pub days: u32,
    pub meals: Vec<DayMeals>,
}

impl Validate for RestaurantDoc {
    fn validate(&self) -> Result<(), String> {
        if self.days < 1 {
            return Err("days must be at least 1".to_string());
        }
        if self.meals.len() != self.days as usize {
            return Err(format!(
                "meals has {} entries but days is {}",
                self.meals.len(),
                self.days
            ));
        }
        Ok(())
    }
}
