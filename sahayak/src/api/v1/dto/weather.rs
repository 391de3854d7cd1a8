use serde::{Deserialize, Serialize};

use crate::models::{DailyForecast, WeatherSnapshot};

/// `POST /api/v1/weather-advice` request body.
///
/// Either `location` or both `lat` and `lon` must be provided.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct WeatherAdviceRequest {
    pub location: Option<String>,
    pub crop: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
}

/// `POST /api/v1/weather-advice` response payload.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WeatherAdviceData {
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crop: Option<String>,
    pub current_weather: WeatherSnapshot,
    pub forecast: Vec<DailyForecast>,
    pub advice: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_allows_location_only() {
        let req: WeatherAdviceRequest =
            serde_json::from_str(r#"{"location": "Davangere"}"#).expect("deserialize");
        assert_eq!(req.location.as_deref(), Some("Davangere"));
        assert!(req.lat.is_none());
    }

    #[test]
    fn request_allows_coordinates_only() {
        let req: WeatherAdviceRequest =
            serde_json::from_str(r#"{"lat": 14.46, "lon": 75.92, "crop": "maize"}"#)
                .expect("deserialize");
        assert_eq!(req.lat, Some(14.46));
        assert_eq!(req.crop.as_deref(), Some("maize"));
    }
}
