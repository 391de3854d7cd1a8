//! Soil dashboard and soil test reports. All routes here are protected.

use axum::extract::State;
use axum::Extension;
use chrono::Utc;
use nanoid::nanoid;

use crate::api::v1::dto::{CreateSoilReportRequest, SoilStatsData};
use crate::api::v1::middleware::AuthUser;
use crate::api::v1::response::{ApiError, ApiResponse, ResponseMeta};
use crate::api::{AppJson, AppState};
use crate::models::SoilReport;
use crate::soil;

/// `GET /api/v1/soil-stats`
///
/// Dashboard data for the authenticated user. Until sensor or lab
/// integrations exist this is representative data, not measurements.
#[utoipa::path(
    get,
    path = "/api/v1/soil-stats",
    tag = "soil",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current soil health, history, and recommendations", body = SoilStatsData),
        (status = 401, description = "Missing or invalid token", body = ApiError),
    )
)]
pub async fn soil_stats(Extension(AuthUser(user)): Extension<AuthUser>) -> ApiResponse<SoilStatsData> {
    let current = soil::current_soil_health();
    let recommendations = soil::recommendations(&current);

    ApiResponse::success(SoilStatsData {
        user_id: user.id,
        current_soil_health: current,
        historical_data: soil::historical_soil_data(),
        recommendations,
    })
}

/// `GET /api/v1/soil-reports`
#[utoipa::path(
    get,
    path = "/api/v1/soil-reports",
    tag = "soil",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The user's soil reports, newest first", body = [SoilReport]),
        (status = 401, description = "Missing or invalid token", body = ApiError),
    )
)]
pub async fn list_soil_reports(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
) -> ApiResponse<Vec<SoilReport>> {
    match state.db.list_soil_reports(&user.id).await {
        Ok(reports) => {
            let total = Some(reports.len() as u64);
            ApiResponse::success_with_meta(reports, ResponseMeta { total })
        }
        Err(err) => ApiResponse::from(err),
    }
}

/// `POST /api/v1/soil-reports`
#[utoipa::path(
    post,
    path = "/api/v1/soil-reports",
    tag = "soil",
    security(("bearer_auth" = [])),
    request_body = CreateSoilReportRequest,
    responses(
        (status = 201, description = "Soil report saved", body = SoilReport),
        (status = 400, description = "Invalid request", body = ApiError),
        (status = 401, description = "Missing or invalid token", body = ApiError),
    )
)]
pub async fn create_soil_report(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    AppJson(req): AppJson<CreateSoilReportRequest>,
) -> ApiResponse<SoilReport> {
    let report = SoilReport {
        id: nanoid!(),
        user_id: user.id,
        ph: req.ph,
        nitrogen: req.nitrogen,
        phosphorus: req.phosphorus,
        potassium: req.potassium,
        organic_matter: req.organic_matter,
        texture: req.texture,
        moisture: req.moisture,
        recorded_at: Utc::now(),
    };

    match state.db.create_soil_report(&report).await {
        Ok(()) => ApiResponse::created(report),
        Err(err) => ApiResponse::from(err),
    }
}
