use serde::{Deserialize, Serialize};

/// `POST /api/v1/crop-suggestion` request body.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CropSuggestionRequest {
    /// Growing period in months.
    pub time_range: u32,
    pub state: String,
    /// Planting season; derived from the current month when omitted.
    pub planting_season: Option<String>,
    pub soil_type: String,
    pub language: Option<String>,
}

/// Crop suggestions as extracted from the model response, or one of the
/// deterministic fallback shapes.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CropSuggestions {
    pub message: String,
    pub suggested_crops: Vec<SuggestedCrop>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct SuggestedCrop {
    pub name: String,
    pub rationale: String,
}

/// `POST /api/v1/chatbot` request body.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct ChatRequest {
    pub message: String,
}

/// `POST /api/v1/chatbot` response payload.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct ChatData {
    pub response: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crop_suggestion_request_uses_camel_case() {
        let json = r#"{
            "timeRange": 4,
            "state": "Karnataka",
            "plantingSeason": "Kharif (Monsoon)",
            "soilType": "Loamy",
            "language": "english"
        }"#;
        let req: CropSuggestionRequest = serde_json::from_str(json).expect("deserialize");
        assert_eq!(req.time_range, 4);
        assert_eq!(req.planting_season.as_deref(), Some("Kharif (Monsoon)"));
    }

    #[test]
    fn crop_suggestion_request_allows_missing_optionals() {
        let json = r#"{"timeRange": 6, "state": "Punjab", "soilType": "Clay"}"#;
        let req: CropSuggestionRequest = serde_json::from_str(json).expect("deserialize");
        assert!(req.planting_season.is_none());
        assert!(req.language.is_none());
    }

    #[test]
    fn crop_suggestions_round_trip_camel_case() {
        let json = r#"{
            "message": "Overview",
            "suggestedCrops": [{"name": "Rice", "rationale": "Thrives in monsoon"}]
        }"#;
        let data: CropSuggestions = serde_json::from_str(json).expect("deserialize");
        assert_eq!(data.suggested_crops.len(), 1);

        let out = serde_json::to_value(&data).expect("serialize");
        assert!(out.get("suggestedCrops").is_some());
    }
}
