//! Twilio WhatsApp webhook.
//!
//! Twilio expects a TwiML document back on every delivery. A non-2xx or
//! non-XML reply makes Twilio show the sender a generic failure, so this
//! handler degrades to apology messages instead of HTTP errors.

use axum::extract::State;
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Form;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use serde::Deserialize;

use crate::api::v1::handlers::diagnosis;
use crate::api::AppState;
use crate::config::TwilioConfig;
use crate::error::{Result, SahayakError};

const HELP_MESSAGE: &str = "Welcome to PlantDoctor Bot! 🌿\n\nTo analyze a plant, simply send a clear image of the plant showing any signs of disease or issues.\n\nYou'll receive detailed information about:\n- Disease identification\n- Treatment recommendations\n- Prevention tips\n\nSend 'help' anytime to see this message again.";

const PROMPT_FOR_IMAGE: &str = "Please send a photo of your plant for analysis. If you need help, simply reply with 'help'.";

const NON_IMAGE_MEDIA: &str =
    "Please send an image file (JPEG or PNG) of your plant for analysis.";

const IMAGE_FAILURE: &str = "Sorry, we couldn't process your image. Please try sending it again or contact support.";

const SERVICE_FAILURE: &str =
    "Sorry, something went wrong with our service. Please try again later.";

/// The subset of Twilio's form-encoded webhook payload this bot reads.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema)]
pub struct TwilioWebhookForm {
    #[serde(rename = "From")]
    pub from: Option<String>,
    #[serde(rename = "Body")]
    pub body: Option<String>,
    #[serde(rename = "NumMedia")]
    pub num_media: Option<String>,
    #[serde(rename = "MediaUrl0")]
    pub media_url0: Option<String>,
    #[serde(rename = "MediaContentType0")]
    pub media_content_type0: Option<String>,
}

/// `POST /api/v1/whatsapp`
#[utoipa::path(
    post,
    path = "/api/v1/whatsapp",
    tag = "whatsapp",
    responses(
        (status = 200, description = "TwiML reply", content_type = "text/xml"),
    )
)]
pub async fn whatsapp_webhook(
    State(state): State<AppState>,
    Form(form): Form<TwilioWebhookForm>,
) -> Response {
    let message = handle_message(&state, &form).await.unwrap_or_else(|err| {
        tracing::error!(error = %err, from = ?form.from, "WhatsApp webhook failed");
        SERVICE_FAILURE.to_string()
    });

    twiml_response(&message)
}

async fn handle_message(state: &AppState, form: &TwilioWebhookForm) -> Result<String> {
    let num_media: usize = form
        .num_media
        .as_deref()
        .and_then(|n| n.parse().ok())
        .unwrap_or(0);

    if num_media > 0 {
        let is_image = form
            .media_content_type0
            .as_deref()
            .is_some_and(|ct| ct.starts_with("image/"));

        if !is_image {
            return Ok(NON_IMAGE_MEDIA.to_string());
        }

        let Some(media_url) = form.media_url0.as_deref() else {
            return Ok(NON_IMAGE_MEDIA.to_string());
        };
        let content_type = form
            .media_content_type0
            .as_deref()
            .unwrap_or("image/jpeg");

        return match analyze_media(state, media_url, content_type).await {
            Ok(analysis) => Ok(format!("🌱 Plant Analysis Results:\n\n{analysis}")),
            Err(err) => {
                tracing::warn!(error = %err, "WhatsApp image analysis failed");
                Ok(IMAGE_FAILURE.to_string())
            }
        };
    }

    let body = form.body.as_deref().unwrap_or("").trim().to_lowercase();
    if body.contains("help") {
        Ok(HELP_MESSAGE.to_string())
    } else {
        Ok(PROMPT_FOR_IMAGE.to_string())
    }
}

/// Downloads the Twilio-hosted media (basic auth with account credentials)
/// and runs the vision diagnosis over it.
async fn analyze_media(state: &AppState, media_url: &str, content_type: &str) -> Result<String> {
    let twilio = state.config.twilio.as_ref().ok_or_else(|| {
        SahayakError::Internal("Twilio credentials are not configured".to_string())
    })?;

    let bytes = download_media(twilio, media_url).await?;
    let data_url = diagnosis::encode_data_url(&bytes, content_type);
    let result = diagnosis::diagnose_image(state, &data_url, "english").await?;

    Ok(format!(
        "Disease: {}\n\nTreatment: {}\n\nPrevention: {}",
        result.name, result.cure, result.prevention
    ))
}

async fn download_media(twilio: &TwilioConfig, media_url: &str) -> Result<Vec<u8>> {
    let credentials = BASE64.encode(format!("{}:{}", twilio.account_sid, twilio.auth_token));

    let response = reqwest::Client::new()
        .get(media_url)
        .header(header::AUTHORIZATION.as_str(), format!("Basic {credentials}"))
        .send()
        .await?;

    if !response.status().is_success() {
        return Err(SahayakError::Internal(format!(
            "Media download failed with status {}",
            response.status()
        )));
    }

    Ok(response.bytes().await?.to_vec())
}

fn twiml_response(message: &str) -> Response {
    let body = format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><Response><Message>{}</Message></Response>"#,
        escape_xml(message)
    );

    ([(header::CONTENT_TYPE, "text/xml")], body).into_response()
}

fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twiml_escapes_markup() {
        let body = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?><Response><Message>{}</Message></Response>"#,
            escape_xml("a < b & c > d")
        );
        assert!(body.contains("a &lt; b &amp; c &gt; d"));
        assert!(!body.contains("a < b"));
    }

    #[test]
    fn help_keyword_is_case_insensitive_substring() {
        let body = "Can you HELP me?".trim().to_lowercase();
        assert!(body.contains("help"));
    }

    #[test]
    fn num_media_parses_twilio_string() {
        let form = TwilioWebhookForm {
            num_media: Some("2".to_string()),
            ..Default::default()
        };
        let parsed: usize = form.num_media.as_deref().and_then(|n| n.parse().ok()).unwrap_or(0);
        assert_eq!(parsed, 2);
    }
}
