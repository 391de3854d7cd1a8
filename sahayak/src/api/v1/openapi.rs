use axum::Json;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};

use crate::{auth, market, models, soil};

use super::dto;
use super::handlers;
use super::response;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Kisan Sahayak API",
        version = "1.0.0",
        description = "Farming assistant backend: plant disease diagnosis, crop suggestions, weather advice, market prices, and farm record keeping.",
    ),
    paths(
        handlers::health::health_check,
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::refresh_token,
        handlers::auth::me,
        handlers::auth::logout,
        handlers::advisory::crop_suggestion,
        handlers::advisory::gpt_alerts,
        handlers::advisory::chatbot,
        handlers::weather::weather_advice,
        handlers::market::commodity_prices,
        handlers::soil::soil_stats,
        handlers::soil::list_soil_reports,
        handlers::soil::create_soil_report,
        handlers::reports::list_disease_logs,
        handlers::reports::create_disease_log,
        handlers::reports::delete_disease_log,
        handlers::diagnosis::analyze_plant,
        handlers::whatsapp::whatsapp_webhook,
    ),
    components(schemas(
        // Response envelope
        response::ErrorCode,
        response::ApiError,
        response::ResponseMeta,
        // Auth
        dto::RegisterRequest,
        dto::LoginRequest,
        dto::RefreshTokenRequest,
        dto::AuthData,
        dto::RefreshData,
        dto::LogoutData,
        auth::TokenPair,
        models::UserProfile,
        // Advisory
        dto::CropSuggestionRequest,
        dto::CropSuggestions,
        dto::SuggestedCrop,
        dto::ChatRequest,
        dto::ChatData,
        models::Alert,
        models::AlertSeverity,
        models::AlertKind,
        // Weather
        dto::WeatherAdviceRequest,
        dto::WeatherAdviceData,
        models::WeatherSnapshot,
        models::DailyForecast,
        // Market
        dto::CommodityPricesData,
        market::PricePoint,
        market::CropPrice,
        // Soil
        dto::SoilStatsData,
        dto::CreateSoilReportRequest,
        soil::SoilHealth,
        soil::SoilHistoryPoint,
        models::SoilReport,
        // Disease logs
        dto::CreateDiseaseLogRequest,
        models::DiseaseReport,
        // Diagnosis
        dto::PlantDiagnosis,
        // Health (handler-local types)
        handlers::health::HealthData,
        handlers::health::DatabaseStatus,
        handlers::health::LlmStatus,
        handlers::health::WeatherStatus,
    )),
    tags(
        (name = "health", description = "Health check"),
        (name = "auth", description = "Account registration, login, and token refresh"),
        (name = "advisory", description = "Crop suggestions, alerts, and the chat assistant"),
        (name = "diagnosis", description = "Plant disease diagnosis from images"),
        (name = "market", description = "Commodity price charts"),
        (name = "soil", description = "Soil dashboard and soil test reports (auth required)"),
        (name = "reports", description = "Disease diagnosis logs (auth required)"),
        (name = "whatsapp", description = "Twilio WhatsApp webhook"),
    ),
    modifiers(&SecurityAddon),
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            utoipa::openapi::security::SecurityScheme::Http(utoipa::openapi::security::Http::new(
                utoipa::openapi::security::HttpAuthScheme::Bearer,
            )),
        );
    }
}

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

pub fn redoc_router<S: Clone + Send + Sync + 'static>() -> axum::Router<S> {
    Redoc::with_url("/docs", ApiDoc::openapi()).into()
}
