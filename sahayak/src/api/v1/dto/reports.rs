use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::DiseaseReportFilter;

/// Query parameters for `GET /api/v1/disease-logs`.
#[derive(Debug, Clone, Default, Deserialize, utoipa::ToSchema, utoipa::IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct DiseaseLogQuery {
    pub crop: Option<String>,
    pub region: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl From<DiseaseLogQuery> for DiseaseReportFilter {
    fn from(query: DiseaseLogQuery) -> Self {
        Self {
            crop: query.crop,
            region: query.region,
            start_date: query.start_date,
            end_date: query.end_date,
        }
    }
}

/// `POST /api/v1/disease-logs` request body.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDiseaseLogRequest {
    pub crop_name: String,
    pub disease_detected: String,
    pub region: String,
    pub severity: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disease_log_query_parses_dates() {
        let json = r#"{
            "crop": "Rice",
            "startDate": "2026-01-01T00:00:00Z",
            "endDate": "2026-06-30T00:00:00Z"
        }"#;
        let query: DiseaseLogQuery = serde_json::from_str(json).expect("deserialize");
        assert_eq!(query.crop.as_deref(), Some("Rice"));
        assert!(query.start_date.is_some());
        assert!(query.region.is_none());
    }

    #[test]
    fn disease_log_query_converts_to_filter() {
        let query = DiseaseLogQuery {
            crop: Some("wheat".to_string()),
            region: Some("punjab".to_string()),
            start_date: None,
            end_date: None,
        };
        let filter: DiseaseReportFilter = query.into();
        assert_eq!(filter.crop.as_deref(), Some("wheat"));
        assert!(filter.start_date.is_none());
    }
}
