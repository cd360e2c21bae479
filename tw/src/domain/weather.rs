//! Weather agent document

use serde::{Deserialize, Serialize};

use super::Validate;
use crate::structured::lenient;

/// Forecast for one day of the trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyWeather {
    #[serde(deserialize_with = "lenient::uint")]
    pub day: u32,
    pub date: String,
    pub condition: String,
    /// Fahrenheit
    #[serde(deserialize_with = "lenient::int")]
    pub high_temp: i64,
    /// Fahrenheit
    #[serde(deserialize_with = "lenient::int")]
    pub low_temp: i64,
    /// Chance of precipitation, percent
    #[serde(deserialize_with = "lenient::int")]
    pub precipitation: i64,
    /// Percent
    #[serde(deserialize_with = "lenient::int")]
    pub humidity: i64,
    /// Miles per hour
    #[serde(deserialize_with = "lenient::int")]
    pub wind_speed: i64,
    pub description: String,
}

/// Validated forecast with packing advice
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherDoc {
    pub destination: String,
    pub forecast: Vec<DailyWeather>,
    pub travel_advice: String,
    #[serde(deserialize_with = "lenient::uint_list")]
    pub best_days: Vec<u32>,
}

impl Validate for WeatherDoc {
    fn validate(&self) -> Result<(), String> {
        if let Some(missing) = self
            .best_days
            .iter()
            .find(|d| !self.forecast.iter().any(|f| f.day == **d))
        {
            return Err(format!("bestDays names day {} which is not in the forecast", missing));
        }
        Ok(())
    }
}
