use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::config::WeatherConfig;
use crate::error::{Result, SahayakError};
use crate::models::{Coordinates, DailyForecast, WeatherBundle, WeatherSnapshot};

/// Thin client over the OpenWeather current-weather, one-call, and
/// geocoding endpoints. All requests use metric units.
#[derive(Clone)]
pub struct WeatherClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    geo_url: String,
}

impl WeatherClient {
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| SahayakError::Weather(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            geo_url: config.geo_url.trim_end_matches('/').to_string(),
        })
    }

    pub async fn geocode(&self, city: &str) -> Result<Coordinates> {
        let url = format!("{}/direct", self.geo_url);
        let response = self
            .http
            .get(&url)
            .query(&[("q", city), ("limit", "1"), ("appid", &self.api_key)])
            .send()
            .await?
            .error_for_status()?;

        let entries: Vec<GeoEntry> = response.json().await?;
        let entry = entries
            .into_iter()
            .next()
            .ok_or_else(|| SahayakError::NotFound(format!("Location not found: {city}")))?;

        Ok(Coordinates {
            lat: entry.lat,
            lon: entry.lon,
        })
    }

    pub async fn current_weather(&self, coords: Coordinates) -> Result<WeatherSnapshot> {
        let url = format!("{}/weather", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("lat", coords.lat.to_string()),
                ("lon", coords.lon.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let data: CurrentResponse = response.json().await?;

        Ok(WeatherSnapshot {
            temp: data.main.temp.round() as i32,
            humidity: data.main.humidity,
            // OpenWeather reports m/s; convert to km/h.
            wind_speed: (data.wind.speed * 3.6).round() as i32,
            rainfall: data.rain.and_then(|r| r.one_hour).unwrap_or(0.0),
            condition: map_condition(
                data.weather
                    .first()
                    .map(|w| w.main.as_str())
                    .unwrap_or("Unknown"),
            ),
            timestamp: Utc::now(),
        })
    }

    pub async fn forecast(&self, coords: Coordinates) -> Result<Vec<DailyForecast>> {
        let url = format!("{}/onecall", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("lat", coords.lat.to_string()),
                ("lon", coords.lon.to_string()),
                ("exclude", "current,minutely,hourly,alerts".to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let data: OneCallResponse = response.json().await?;

        Ok(data
            .daily
            .into_iter()
            .take(7)
            .map(|day| DailyForecast {
                date: DateTime::<Utc>::from_timestamp(day.dt, 0)
                    .unwrap_or_else(Utc::now)
                    .to_rfc3339(),
                temp_high: day.temp.max.round() as i32,
                temp_low: day.temp.min.round() as i32,
                condition: map_condition(
                    day.weather
                        .first()
                        .map(|w| w.main.as_str())
                        .unwrap_or("Unknown"),
                ),
                rainfall: day.rain.unwrap_or(0.0),
                rain_probability: (day.pop * 100.0).round() as u32,
            })
            .collect())
    }

    pub async fn fetch_bundle(&self, coords: Coordinates) -> Result<WeatherBundle> {
        let current_weather = self.current_weather(coords).await?;
        let forecast = self.forecast(coords).await?;
        Ok(WeatherBundle {
            current_weather,
            forecast,
        })
    }
}

/// Collapse OpenWeather condition groups into farmer-facing labels.
fn map_condition(condition: &str) -> String {
    match condition {
        "Clouds" => "Cloudy",
        "Drizzle" => "Light Rain",
        "Mist" | "Fog" | "Haze" => "Fog",
        other => other,
    }
    .to_string()
}

#[derive(Debug, Deserialize)]
struct GeoEntry {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct CurrentResponse {
    main: CurrentMain,
    wind: Wind,
    rain: Option<Rain>,
    #[serde(default)]
    weather: Vec<Condition>,
}

#[derive(Debug, Deserialize)]
struct CurrentMain {
    temp: f64,
    humidity: u32,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct Rain {
    #[serde(rename = "1h")]
    one_hour: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Condition {
    main: String,
}

#[derive(Debug, Deserialize)]
struct OneCallResponse {
    daily: Vec<DailyEntry>,
}

#[derive(Debug, Deserialize)]
struct DailyEntry {
    dt: i64,
    temp: DailyTemp,
    #[serde(default)]
    weather: Vec<Condition>,
    rain: Option<f64>,
    pop: f64,
}

#[derive(Debug, Deserialize)]
struct DailyTemp {
    min: f64,
    max: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_condition() {
        assert_eq!(map_condition("Clear"), "Clear");
        assert_eq!(map_condition("Clouds"), "Cloudy");
        assert_eq!(map_condition("Drizzle"), "Light Rain");
        assert_eq!(map_condition("Mist"), "Fog");
        assert_eq!(map_condition("Haze"), "Fog");
        assert_eq!(map_condition("Thunderstorm"), "Thunderstorm");
    }

    #[test]
    fn test_current_response_parsing() {
        let json = r#"{
            "main": {"temp": 28.4, "humidity": 65},
            "wind": {"speed": 3.5},
            "rain": {"1h": 0.8},
            "weather": [{"main": "Drizzle"}]
        }"#;
        let data: CurrentResponse = serde_json::from_str(json).unwrap();
        assert_eq!(data.main.humidity, 65);
        assert_eq!(data.rain.unwrap().one_hour, Some(0.8));
    }

    #[test]
    fn test_current_response_without_rain() {
        let json = r#"{
            "main": {"temp": 31.0, "humidity": 40},
            "wind": {"speed": 2.0},
            "weather": [{"main": "Clear"}]
        }"#;
        let data: CurrentResponse = serde_json::from_str(json).unwrap();
        assert!(data.rain.is_none());
    }
}
