use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AlertSeverity {
    // Declaration order doubles as sort order: high severity first.
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Disease,
    Price,
    Weather,
    Policy,
    #[serde(other)]
    Other,
}

/// An advisory alert for farmers, either model-generated or a fixed
/// fallback when the model is unavailable.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Alert {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: AlertKind,
    pub severity: AlertSeverity,
    pub message: String,
    pub regions: Vec<String>,
    pub crops: Vec<String>,
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
}

/// The envelope shape alerts are requested in; a bare array is also
/// tolerated by the handler.
#[derive(Debug, Clone, Deserialize)]
pub struct AlertEnvelope {
    pub alerts: Vec<Alert>,
}
