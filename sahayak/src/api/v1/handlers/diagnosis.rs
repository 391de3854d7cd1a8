//! Plant disease diagnosis from an uploaded image.

use axum::extract::{Multipart, State};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::api::v1::dto::PlantDiagnosis;
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode};
use crate::api::AppState;
use crate::error::Result;
use crate::llm::extract::extract_json;
use crate::llm::prompts;
use crate::llm::CompletionOptions;

/// `POST /api/v1/analyze-plant`
///
/// Multipart form with an `image` file field and an optional `language`
/// text field (defaults to `english`).
#[utoipa::path(
    post,
    path = "/api/v1/analyze-plant",
    tag = "diagnosis",
    request_body(content_type = "multipart/form-data", content = String, description = "Image upload with an optional language field"),
    responses(
        (status = 200, description = "Diagnosis with cure and prevention advice", body = PlantDiagnosis),
        (status = 400, description = "No image file provided", body = ApiError),
        (status = 502, description = "Vision model failure", body = ApiError),
        (status = 503, description = "LLM not configured", body = ApiError),
    )
)]
pub async fn analyze_plant(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> ApiResponse<PlantDiagnosis> {
    let mut image: Option<(Vec<u8>, String)> = None;
    let mut language = "english".to_string();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(err) => {
                return ApiResponse::error(
                    ErrorCode::InvalidRequest,
                    format!("Invalid multipart body: {err}"),
                )
            }
        };

        match field.name() {
            Some("image") => {
                let content_type = field
                    .content_type()
                    .unwrap_or("image/jpeg")
                    .to_string();
                match field.bytes().await {
                    Ok(bytes) => image = Some((bytes.to_vec(), content_type)),
                    Err(err) => {
                        return ApiResponse::error(
                            ErrorCode::InvalidRequest,
                            format!("Failed to read image field: {err}"),
                        )
                    }
                }
            }
            Some("language") => {
                if let Ok(value) = field.text().await {
                    if !value.trim().is_empty() {
                        language = value.trim().to_lowercase();
                    }
                }
            }
            _ => {}
        }
    }

    let Some((bytes, content_type)) = image else {
        return ApiResponse::error(ErrorCode::InvalidRequest, "No image file provided");
    };

    let data_url = encode_data_url(&bytes, &content_type);

    match diagnose_image(&state, &data_url, &language).await {
        Ok(diagnosis) => ApiResponse::success(diagnosis),
        Err(err) => ApiResponse::from(err),
    }
}

/// Runs the vision model over an image data URL and parses the structured
/// diagnosis out of its reply. Shared with the WhatsApp webhook.
pub(crate) async fn diagnose_image(
    state: &AppState,
    image_data_url: &str,
    language: &str,
) -> Result<PlantDiagnosis> {
    // The vision request carries a single user message, so the specialist
    // framing rides along in the prompt text itself.
    let prompt = format!(
        "{}\n\n{}",
        prompts::plant_diagnosis_system_prompt(language),
        prompts::plant_diagnosis_prompt(language)
    );
    let options = CompletionOptions {
        max_tokens: Some(1000),
        ..Default::default()
    };

    let text = state
        .llm
        .complete_vision(&prompt, image_data_url, Some(&options))
        .await?;

    extract_json::<PlantDiagnosis>(&text)
}

pub(crate) fn encode_data_url(bytes: &[u8], content_type: &str) -> String {
    format!("data:{content_type};base64,{}", BASE64.encode(bytes))
}
