//! Weather snapshot returned by the weather endpoints.

use serde::{Deserialize, Serialize};

use crate::models::null_as_default;

/// Current conditions plus the daily forecast, as one response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub current_temp: f64,
    pub humidity: i32,
    pub condition: String,
    /// Observation time, preformatted by the backend.
    pub time: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub forecast: Vec<DailyForecast>,
}

/// Current conditions without the forecast.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentConditions {
    pub current_temp: f64,
    pub humidity: i32,
    pub condition: String,
    pub time: String,
}

/// One forecast day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    pub date: String,
    pub min_temp: f64,
    pub max_temp: f64,
    pub condition: String,
    /// Percent chance of rain.
    pub rain_chance: i32,
}

impl WeatherSnapshot {
    pub fn current(&self) -> CurrentConditions {
        CurrentConditions {
            current_temp: self.current_temp,
            humidity: self.humidity,
            condition: self.condition.clone(),
            time: self.time.clone(),
        }
    }
}
