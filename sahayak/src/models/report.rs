use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A logged plant-disease diagnosis for one user.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseReport {
    pub id: String,
    pub user_id: String,
    pub crop_name: String,
    pub disease_detected: String,
    pub region: String,
    pub severity: String,
    pub diagnosis_date: DateTime<Utc>,
}

/// Query filters for listing disease reports. String matches are
/// case-insensitive; date bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct DiseaseReportFilter {
    pub crop: Option<String>,
    pub region: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// A soil test measurement saved by a user.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SoilReport {
    pub id: String,
    pub user_id: String,
    pub ph: f64,
    /// Nitrogen in kg/ha.
    pub nitrogen: i32,
    /// Phosphorus in kg/ha.
    pub phosphorus: i32,
    /// Potassium in kg/ha.
    pub potassium: i32,
    /// Organic matter percentage.
    pub organic_matter: f64,
    pub texture: String,
    /// Moisture percentage.
    pub moisture: i32,
    pub recorded_at: DateTime<Utc>,
}
