use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Cache key with two-decimal precision, e.g. `"12.97,77.59"`.
    ///
    /// Rounding collapses nearby points into one entry; the full-precision
    /// coordinates are still used for the upstream fetch.
    pub fn cache_key(&self) -> String {
        format!("{:.2},{:.2}", self.lat, self.lon)
    }
}

/// Current conditions at one location, in metric units.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    /// Temperature in °C, rounded.
    pub temp: i32,
    /// Relative humidity percentage.
    pub humidity: u32,
    /// Wind speed in km/h, rounded.
    pub wind_speed: i32,
    /// Rainfall over the last hour in mm.
    pub rainfall: f64,
    pub condition: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    /// ISO 8601 date of the forecast day.
    pub date: String,
    pub temp_high: i32,
    pub temp_low: i32,
    pub condition: String,
    /// Expected rainfall in mm.
    pub rainfall: f64,
    /// Probability of precipitation as a percentage.
    pub rain_probability: u32,
}

/// Current conditions plus the 7-day forecast, the unit the weather
/// cache stores per coordinate key.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeatherBundle {
    pub current_weather: WeatherSnapshot,
    pub forecast: Vec<DailyForecast>,
}
