//! Prompt templates for LLM-powered features
//!
//! These templates use basic `format!()` interpolation for type safety.
//! Missing variables will cause compile-time errors.

use crate::models::{ClimateProfile, DailyForecast, WeatherSnapshot};

/// System prompt for the general farming chat assistant.
pub const CHAT_SYSTEM_PROMPT: &str = "You are an AI assistant specialized in agriculture, farming, and related topics. You provide helpful, accurate, and practical advice to farmers. Your responses should be informative, respectful, and tailored to the agricultural context. If you're unsure about something, be honest about limitations rather than making up information.";

pub const ADVICE_SYSTEM_PROMPT: &str = "You are an expert agricultural advisor.";

pub const ALERTS_SYSTEM_PROMPT: &str = "You are an agricultural expert AI that provides timely alerts for farmers in India. Your alerts should be actionable, specific, and based on current agricultural trends, weather patterns, disease outbreaks, and policy changes.";

/// System prompt for crop suggestions, parameterized on response language.
pub fn crop_suggestion_system_prompt(language: &str) -> String {
    format!(
        "You are an agricultural expert specialized in Indian farming. You provide accurate crop recommendations based on local conditions. You ALWAYS respond in valid JSON format exactly as requested. Respond in {language}."
    )
}

/// Generate a prompt asking for 3-4 crop recommendations as JSON
///
/// The response is expected to match:
/// `{"message": "...", "suggestedCrops": [{"name": "...", "rationale": "..."}]}`
pub fn crop_suggestion_prompt(
    state: &str,
    soil_type: &str,
    season: &str,
    time_range_months: u32,
    climate: &ClimateProfile,
    language: &str,
) -> String {
    format!(
        r#"I need crop recommendations for these farming conditions:
- State: {state}
- Soil: {soil_type}
- Season: {season}
- Growing period: {time_range_months} months
- Climate: {description}
- Rainfall: {rainfall}

Please recommend 3-4 suitable crops. For each crop, include:
1. The crop name
2. Why it's good for this climate, soil, and growing period

Keep each explanation brief but informative.

RESPOND IN EXACTLY THIS JSON FORMAT (very important):
{{
  "message": "Brief overview of farming situation",
  "suggestedCrops": [
    {{
      "name": "Crop Name",
      "rationale": "Explanation why suitable"
    }},
    ...
  ]
}}

Provide your response in {language} language."#,
        description = climate.description,
        rainfall = climate.rainfall,
    )
}

/// A plainer retry prompt used when the first crop-suggestion response
/// could not be parsed as JSON.
pub fn crop_suggestion_retry_prompt(
    state: &str,
    soil_type: &str,
    season: &str,
    time_range_months: u32,
    language: &str,
) -> String {
    format!(
        r#"Recommend 3-4 crops for a farmer in {state} with {soil_type} soil, planting in the {season} season for a {time_range_months} month growing period.

Respond with ONLY a JSON object, no other text:
{{"message": "one sentence overview", "suggestedCrops": [{{"name": "crop", "rationale": "why"}}]}}

Respond in {language}."#
    )
}

pub fn plant_diagnosis_system_prompt(language: &str) -> String {
    format!(
        "You are a plant disease detection specialist. Analyze the provided plant image and identify any diseases or issues present. Provide your response in {language} language."
    )
}

pub fn plant_diagnosis_prompt(language: &str) -> String {
    format!(
        r#"This is an image of a plant that may have a disease. Please analyze it and provide the following details in JSON format: 1) Disease name, 2) Cure recommendations, 3) Prevention tips. Please format your response as a valid JSON object with fields "name", "cure", and "prevention". Provide your entire response in {language} language."#
    )
}

/// Generate a prompt requesting 5 varied agricultural alerts as JSON.
pub fn alerts_prompt() -> String {
    r#"Generate 5 agricultural alerts for Indian farmers. The alerts should cover different categories: disease outbreaks, price fluctuations, weather events, and policy changes.

Each alert should include:
1. A specific message with actionable advice
2. A severity level (high, medium, or low)
3. Affected regions in India
4. Affected crops (or "All" if applicable)
5. Alert type (disease, price, weather, policy)

Format your response as a valid JSON with this exact structure:
{
  "alerts": [
    {
      "id": "unique-id-1",
      "type": "disease|price|weather|policy",
      "severity": "high|medium|low",
      "message": "Detailed message with actionable advice",
      "regions": ["Region1", "Region2"],
      "crops": ["Crop1", "Crop2"]
    },
    ...more alerts
  ]
}

Make the alerts realistic, specific, and varied in terms of severity, regions, and crops."#
        .to_string()
}

/// Generate a farming-advice prompt from current weather plus a 7-day forecast.
pub fn farming_advice_prompt(
    snapshot: &WeatherSnapshot,
    forecast: &[DailyForecast],
    location: &str,
    crop: Option<&str>,
) -> String {
    let crop_clause = crop
        .map(|c| format!(" and specifically for {c} cultivation"))
        .unwrap_or_default();

    let forecast_lines = forecast
        .iter()
        .map(|day| {
            format!(
                "- {}: {}°C / {}°C, {}, {}% chance of rain, Expected rainfall: {}mm",
                day.date,
                day.temp_high,
                day.temp_low,
                day.condition,
                day.rain_probability,
                day.rainfall
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"You are an expert agricultural advisor with deep knowledge of farming practices, weather patterns, and crop management.
Based on the following weather data for {location}{crop_clause},
provide practical and actionable advice for farmers. Your advice should cover:

1. Watering schedules and irrigation needs
2. Potential pest risks based on the current and forecasted humidity and temperature
3. Specific recommendations for crop protection
4. Any preventative measures needed based on the upcoming weather

Current Weather:
- Temperature: {temp}°C
- Humidity: {humidity}%
- Wind Speed: {wind_speed} km/h
- Rainfall: {rainfall} mm
- Condition: {condition}

7-Day Forecast:
{forecast_lines}

Provide specific actionable advice in 3-4 sentences that farmers can implement immediately."#,
        temp = snapshot.temp,
        humidity = snapshot.humidity,
        wind_speed = snapshot.wind_speed,
        rainfall = snapshot.rainfall,
        condition = snapshot.condition,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crop_suggestion_prompt_interpolation() {
        let climate = ClimateProfile {
            description: "Tropical monsoon climate".to_string(),
            rainfall: "Heavy during monsoon".to_string(),
        };
        let prompt =
            crop_suggestion_prompt("Karnataka", "red loam", "Kharif", 4, &climate, "english");
        assert!(prompt.contains("Karnataka"));
        assert!(prompt.contains("red loam"));
        assert!(prompt.contains("4 months"));
        assert!(prompt.contains("suggestedCrops"));
        assert!(prompt.contains("english language"));
    }

    #[test]
    fn test_plant_diagnosis_prompt_mentions_required_fields() {
        let prompt = plant_diagnosis_prompt("hindi");
        assert!(prompt.contains("\"name\""));
        assert!(prompt.contains("\"cure\""));
        assert!(prompt.contains("\"prevention\""));
        assert!(prompt.contains("hindi"));
    }

    #[test]
    fn test_farming_advice_prompt_with_and_without_crop() {
        let snapshot = WeatherSnapshot {
            temp: 28,
            humidity: 70,
            wind_speed: 12,
            rainfall: 0.4,
            condition: "Cloudy".to_string(),
            timestamp: chrono::Utc::now(),
        };
        let forecast = vec![DailyForecast {
            date: "2025-06-01".to_string(),
            temp_high: 31,
            temp_low: 22,
            condition: "Rain".to_string(),
            rainfall: 5.1,
            rain_probability: 80,
        }];

        let prompt = farming_advice_prompt(&snapshot, &forecast, "Davangere", Some("maize"));
        assert!(prompt.contains("maize cultivation"));
        assert!(prompt.contains("80% chance of rain"));

        let prompt = farming_advice_prompt(&snapshot, &forecast, "Davangere", None);
        assert!(!prompt.contains("cultivation"));
    }
}
