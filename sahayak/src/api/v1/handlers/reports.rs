//! Disease diagnosis log CRUD. All routes here are protected and scoped
//! to the authenticated user.

use axum::extract::{Path, Query, State};
use axum::Extension;
use chrono::Utc;
use nanoid::nanoid;

use crate::api::v1::dto::{CreateDiseaseLogRequest, DiseaseLogQuery};
use crate::api::v1::middleware::AuthUser;
use crate::api::v1::response::{ApiError, ApiResponse, ErrorCode, ResponseMeta};
use crate::api::{AppJson, AppState};
use crate::models::DiseaseReport;

/// `GET /api/v1/disease-logs`
#[utoipa::path(
    get,
    path = "/api/v1/disease-logs",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(DiseaseLogQuery),
    responses(
        (status = 200, description = "Matching disease logs, newest diagnosis first", body = [DiseaseReport]),
        (status = 401, description = "Missing or invalid token", body = ApiError),
    )
)]
pub async fn list_disease_logs(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Query(query): Query<DiseaseLogQuery>,
) -> ApiResponse<Vec<DiseaseReport>> {
    match state.db.list_disease_reports(&user.id, &query.into()).await {
        Ok(reports) => {
            let total = Some(reports.len() as u64);
            ApiResponse::success_with_meta(reports, ResponseMeta { total })
        }
        Err(err) => ApiResponse::from(err),
    }
}

/// `POST /api/v1/disease-logs`
#[utoipa::path(
    post,
    path = "/api/v1/disease-logs",
    tag = "reports",
    security(("bearer_auth" = [])),
    request_body = CreateDiseaseLogRequest,
    responses(
        (status = 201, description = "Disease log saved", body = DiseaseReport),
        (status = 400, description = "Missing required fields", body = ApiError),
        (status = 401, description = "Missing or invalid token", body = ApiError),
    )
)]
pub async fn create_disease_log(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    AppJson(req): AppJson<CreateDiseaseLogRequest>,
) -> ApiResponse<DiseaseReport> {
    if req.crop_name.trim().is_empty()
        || req.disease_detected.trim().is_empty()
        || req.region.trim().is_empty()
        || req.severity.trim().is_empty()
    {
        return ApiResponse::error(ErrorCode::InvalidRequest, "Missing required fields");
    }

    let report = DiseaseReport {
        id: nanoid!(),
        user_id: user.id,
        crop_name: req.crop_name,
        disease_detected: req.disease_detected,
        region: req.region,
        severity: req.severity,
        diagnosis_date: Utc::now(),
    };

    match state.db.create_disease_report(&report).await {
        Ok(()) => ApiResponse::created(report),
        Err(err) => ApiResponse::from(err),
    }
}

/// `DELETE /api/v1/disease-logs/{id}`
#[utoipa::path(
    delete,
    path = "/api/v1/disease-logs/{id}",
    tag = "reports",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Disease log id")),
    responses(
        (status = 200, description = "Disease log deleted"),
        (status = 401, description = "Missing or invalid token", body = ApiError),
        (status = 404, description = "No such log for this user", body = ApiError),
    )
)]
pub async fn delete_disease_log(
    State(state): State<AppState>,
    Extension(AuthUser(user)): Extension<AuthUser>,
    Path(id): Path<String>,
) -> ApiResponse<serde_json::Value> {
    match state.db.delete_disease_report(&user.id, &id).await {
        Ok(true) => ApiResponse::success(serde_json::json!({ "success": true })),
        Ok(false) => ApiResponse::error(ErrorCode::NotFound, "Disease log not found"),
        Err(err) => ApiResponse::from(err),
    }
}
