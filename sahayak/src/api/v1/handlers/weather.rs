//! Weather-based farming advice.

use axum::extract::State;

use crate::api::v1::dto::{WeatherAdviceData, WeatherAdviceRequest};
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode};
use crate::api::{AppJson, AppState};
use crate::llm::prompts;
use crate::llm::CompletionOptions;
use crate::models::Coordinates;

const ADVICE_FALLBACK: &str =
    "Unable to generate farming advice at this time. Please try again later.";

/// `POST /api/v1/weather-advice`
///
/// Resolves coordinates (given directly or geocoded from a location name),
/// fetches the cached weather bundle, and asks the LLM for short advice.
/// A failed advice completion falls back to a fixed string rather than an
/// error; the weather data is still worth returning on its own.
#[utoipa::path(
    post,
    path = "/api/v1/weather-advice",
    tag = "advisory",
    request_body = WeatherAdviceRequest,
    responses(
        (status = 200, description = "Current weather, forecast, and advice", body = WeatherAdviceData),
        (status = 400, description = "Missing or unresolvable location", body = ApiError),
        (status = 502, description = "Weather provider failure", body = ApiError),
    )
)]
pub async fn weather_advice(
    State(state): State<AppState>,
    AppJson(req): AppJson<WeatherAdviceRequest>,
) -> ApiResponse<WeatherAdviceData> {
    let coords = match (req.lat, req.lon) {
        (Some(lat), Some(lon)) => Coordinates { lat, lon },
        _ => {
            let Some(location) = req.location.as_deref().filter(|l| !l.trim().is_empty()) else {
                return ApiResponse::error(
                    ErrorCode::InvalidRequest,
                    "Either location name or coordinates (lat, lon) are required",
                );
            };
            match state.weather.geocode(location).await {
                Ok(coords) => coords,
                Err(err) => {
                    tracing::warn!(location, error = %err, "Geocoding failed");
                    return ApiResponse::error(
                        ErrorCode::InvalidRequest,
                        "Failed to get coordinates for the provided location",
                    );
                }
            }
        }
    };

    let bundle = match state.weather.bundle(coords).await {
        Ok(bundle) => bundle,
        Err(err) => return ApiResponse::from(err),
    };

    let location = req
        .location
        .clone()
        .unwrap_or_else(|| format!("coordinates ({},{})", coords.lat, coords.lon));

    let prompt = prompts::farming_advice_prompt(
        &bundle.current_weather,
        &bundle.forecast,
        &location,
        req.crop.as_deref(),
    );
    let options = CompletionOptions {
        temperature: Some(0.7),
        max_tokens: Some(300),
        ..Default::default()
    };

    let advice = match state
        .llm
        .complete(&prompt, Some(prompts::ADVICE_SYSTEM_PROMPT), Some(&options))
        .await
    {
        Ok(advice) => advice,
        Err(err) => {
            tracing::warn!(error = %err, "Farming advice completion failed, using fallback");
            ADVICE_FALLBACK.to_string()
        }
    };

    ApiResponse::success(WeatherAdviceData {
        location,
        crop: req.crop,
        current_weather: bundle.current_weather,
        forecast: bundle.forecast,
        advice,
    })
}
