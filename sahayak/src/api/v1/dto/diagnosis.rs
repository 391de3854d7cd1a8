use serde::{Deserialize, Serialize};

/// Structured plant diagnosis extracted from the vision model response.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PlantDiagnosis {
    /// Name of the detected disease.
    pub name: String,
    /// Cure recommendations.
    pub cure: String,
    /// Prevention tips.
    pub prevention: String,
}
