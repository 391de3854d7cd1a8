use axum::extract::DefaultBodyLimit;
use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};

use crate::api::state::AppState;

use super::handlers;
use super::middleware::v1_auth_middleware;

// Plant photos from phone cameras run a few MB; axum's 2 MB default is
// too tight for the analyze-plant upload.
const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

pub fn v1_router(state: AppState) -> Router<AppState> {
    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/openapi.json", get(super::openapi::openapi_json))
        .merge(super::openapi::redoc_router())
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/refresh-token", post(handlers::auth::refresh_token))
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/crop-suggestion", post(handlers::advisory::crop_suggestion))
        .route("/gpt-alerts", get(handlers::advisory::gpt_alerts))
        .route("/chatbot", post(handlers::advisory::chatbot))
        .route("/weather-advice", post(handlers::weather::weather_advice))
        .route("/commodity-prices", get(handlers::market::commodity_prices))
        .route(
            "/analyze-plant",
            post(handlers::diagnosis::analyze_plant)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/whatsapp", post(handlers::whatsapp::whatsapp_webhook));

    let protected_routes = Router::new()
        .route("/auth/me", get(handlers::auth::me))
        .route("/soil-stats", get(handlers::soil::soil_stats))
        .route(
            "/soil-reports",
            get(handlers::soil::list_soil_reports).post(handlers::soil::create_soil_report),
        )
        .route(
            "/disease-logs",
            get(handlers::reports::list_disease_logs).post(handlers::reports::create_disease_log),
        )
        .route(
            "/disease-logs/{id}",
            delete(handlers::reports::delete_disease_log),
        )
        .route_layer(middleware::from_fn_with_state(state, v1_auth_middleware));

    Router::new().merge(public_routes).merge(protected_routes)
}
