//! LLM advisory handlers: crop suggestions, agricultural alerts, and the
//! chat assistant.
//!
//! Crop suggestions and alerts never surface an LLM failure to the caller.
//! Each has a deterministic fallback payload and answers 200 with it when
//! the provider is down or its output cannot be parsed.

use axum::extract::State;
use chrono::{Duration, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::api::v1::dto::{ChatData, ChatRequest, CropSuggestionRequest, CropSuggestions, SuggestedCrop};
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode};
use crate::api::{AppJson, AppState};
use crate::error::Result;
use crate::llm::extract::extract_json_with;
use crate::llm::prompts;
use crate::models::{state_climate, Alert, AlertEnvelope, AlertKind, AlertSeverity, Season};

/// `POST /api/v1/crop-suggestion`
#[utoipa::path(
    post,
    path = "/api/v1/crop-suggestion",
    tag = "advisory",
    request_body = CropSuggestionRequest,
    responses(
        (status = 200, description = "Crop suggestions, possibly a fallback payload", body = CropSuggestions),
        (status = 400, description = "Invalid request", body = ApiError),
    )
)]
pub async fn crop_suggestion(
    State(state): State<AppState>,
    AppJson(req): AppJson<CropSuggestionRequest>,
) -> ApiResponse<CropSuggestions> {
    let language = req.language.as_deref().unwrap_or("english");
    let climate = state_climate(&req.state);

    // "Kharif (Monsoon)" from the UI becomes just "Kharif" in the prompt.
    let season = match &req.planting_season {
        Some(season) => season
            .split_whitespace()
            .next()
            .unwrap_or(season)
            .to_string(),
        None => Season::current(Utc::now()).as_str().to_string(),
    };

    let system = prompts::crop_suggestion_system_prompt(language);
    let prompt = prompts::crop_suggestion_prompt(
        &req.state,
        &req.soil_type,
        &season,
        req.time_range,
        &climate,
        language,
    );

    let text = match state.llm.complete(&prompt, Some(&system), None).await {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(error = %err, "Crop suggestion completion failed, using fallback");
            return ApiResponse::success(fallback_suggestions(language));
        }
    };

    if let Ok(data) = extract_json_with::<CropSuggestions, _>(&text, has_suggestions) {
        return ApiResponse::success(data);
    }

    // One retry with a plainer prompt before giving up on structure.
    let retry_prompt = prompts::crop_suggestion_retry_prompt(
        &req.state,
        &req.soil_type,
        &season,
        req.time_range,
        language,
    );

    match state.llm.complete(&retry_prompt, Some(&system), None).await {
        Ok(retry_text) => {
            if let Ok(data) = extract_json_with::<CropSuggestions, _>(&retry_text, has_suggestions)
            {
                return ApiResponse::success(data);
            }
            tracing::warn!("Crop suggestion extraction exhausted, embedding raw excerpt");
            ApiResponse::success(raw_excerpt_suggestions(&retry_text))
        }
        Err(err) => {
            tracing::warn!(error = %err, "Crop suggestion retry failed, using fallback");
            ApiResponse::success(fallback_suggestions(language))
        }
    }
}

fn has_suggestions(data: &CropSuggestions) -> bool {
    !data.message.is_empty() && !data.suggested_crops.is_empty()
}

/// Default object embedding a truncated excerpt of the unparseable raw text.
fn raw_excerpt_suggestions(raw_text: &str) -> CropSuggestions {
    CropSuggestions {
        message: "Based on your criteria, here are some crop suggestions:".to_string(),
        suggested_crops: vec![SuggestedCrop {
            name: "General Recommendation".to_string(),
            rationale: raw_text.chars().take(500).collect(),
        }],
    }
}

/// Fixed fallback when the LLM cannot be reached at all.
fn fallback_suggestions(language: &str) -> CropSuggestions {
    let (message, rationale) = if language.eq_ignore_ascii_case("hindi") {
        (
            "आपके डेटा का विश्लेषण करते समय हमें एक तकनीकी समस्या का सामना करना पड़ा।",
            "कृपया अलग पैरामीटर के साथ फिर से प्रयास करें या यदि समस्या बनी रहती है तो सहायता से संपर्क करें।",
        )
    } else {
        (
            "We encountered a technical issue while analyzing your data.",
            "Please try again with different parameters or contact support if the problem persists.",
        )
    };

    CropSuggestions {
        message: message.to_string(),
        suggested_crops: vec![SuggestedCrop {
            name: "Temporary Issue".to_string(),
            rationale: rationale.to_string(),
        }],
    }
}

/// `GET /api/v1/gpt-alerts`
#[utoipa::path(
    get,
    path = "/api/v1/gpt-alerts",
    tag = "advisory",
    responses(
        (status = 200, description = "Agricultural alerts, possibly the fixed fallback pair", body = [Alert]),
    )
)]
pub async fn gpt_alerts(State(state): State<AppState>) -> ApiResponse<Vec<Alert>> {
    match generate_alerts(&state).await {
        Ok(alerts) => ApiResponse::success(alerts),
        Err(err) => {
            tracing::warn!(error = %err, "Alert generation failed, using fallback alerts");
            ApiResponse::success(fallback_alerts())
        }
    }
}

async fn generate_alerts(state: &AppState) -> Result<Vec<Alert>> {
    let text = state
        .llm
        .complete(
            &prompts::alerts_prompt(),
            Some(prompts::ALERTS_SYSTEM_PROMPT),
            None,
        )
        .await?;

    // The model is asked for {"alerts": [...]} but a bare array is accepted.
    let mut alerts =
        match extract_json_with::<AlertEnvelope, _>(&text, |env| !env.alerts.is_empty()) {
            Ok(envelope) => envelope.alerts,
            Err(_) => extract_json_with::<Vec<Alert>, _>(&text, |list| !list.is_empty())?,
        };

    let now = Utc::now();
    for (index, alert) in alerts.iter_mut().enumerate() {
        alert.created = Some(now - Duration::days((index % 3) as i64));
    }

    alerts.sort_by(|a, b| {
        a.severity
            .cmp(&b.severity)
            .then_with(|| b.created.cmp(&a.created))
    });

    Ok(alerts)
}

fn fallback_alerts() -> Vec<Alert> {
    let now = Utc::now();
    vec![
        Alert {
            id: "alert-fallback-1".to_string(),
            kind: AlertKind::Disease,
            severity: AlertSeverity::High,
            message: "Potential crop disease outbreak in several regions. Monitor your crops closely and consider preventative measures.".to_string(),
            regions: vec!["All India".to_string()],
            crops: vec!["All".to_string()],
            created: Some(now),
        },
        Alert {
            id: "alert-fallback-2".to_string(),
            kind: AlertKind::Weather,
            severity: AlertSeverity::Medium,
            message: "Unseasonable weather patterns expected. Prepare appropriate crop protection measures.".to_string(),
            regions: vec!["All India".to_string()],
            crops: vec!["All".to_string()],
            created: Some(now - Duration::days(1)),
        },
    ]
}

static THINK_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"<think>[\s\S]*?</think>").expect("valid think-span regex"));

/// `POST /api/v1/chatbot`
#[utoipa::path(
    post,
    path = "/api/v1/chatbot",
    tag = "advisory",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "Assistant reply", body = ChatData),
        (status = 400, description = "Message empty after filtering", body = ApiError),
        (status = 503, description = "LLM not configured", body = ApiError),
    )
)]
pub async fn chatbot(
    State(state): State<AppState>,
    AppJson(req): AppJson<ChatRequest>,
) -> ApiResponse<ChatData> {
    // Reasoning-model transcripts pasted into the chat box carry
    // <think>...</think> spans that must not reach the model.
    let cleaned = THINK_SPAN.replace_all(&req.message, "");
    let cleaned = cleaned.trim();

    if cleaned.is_empty() {
        return ApiResponse::error(
            ErrorCode::InvalidRequest,
            "No valid content found in message after filtering",
        );
    }

    match state
        .llm
        .complete(cleaned, Some(prompts::CHAT_SYSTEM_PROMPT), None)
        .await
    {
        Ok(response) => ApiResponse::success(ChatData { response }),
        Err(err) => ApiResponse::from(err),
    }
}
