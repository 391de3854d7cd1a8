use serde::{Deserialize, Serialize};

use crate::soil::{SoilHealth, SoilHistoryPoint};

/// `GET /api/v1/soil-stats` response payload.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SoilStatsData {
    pub user_id: String,
    pub current_soil_health: SoilHealth,
    pub historical_data: Vec<SoilHistoryPoint>,
    pub recommendations: Vec<String>,
}

/// `POST /api/v1/soil-reports` request body.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSoilReportRequest {
    pub ph: f64,
    pub nitrogen: i32,
    pub phosphorus: i32,
    pub potassium: i32,
    pub organic_matter: f64,
    pub texture: String,
    pub moisture: i32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_soil_report_request_uses_camel_case() {
        let json = r#"{
            "ph": 6.5,
            "nitrogen": 70,
            "phosphorus": 30,
            "potassium": 180,
            "organicMatter": 2.9,
            "texture": "Loamy",
            "moisture": 38
        }"#;
        let req: CreateSoilReportRequest = serde_json::from_str(json).expect("deserialize");
        assert_eq!(req.organic_matter, 2.9);
        assert_eq!(req.texture, "Loamy");
    }
}
