//! Soil health dashboard data: a representative current reading, a
//! jittered six-month history, and threshold-based recommendations.
//! Stands in for sensor or lab integrations.

use chrono::{DateTime, Months, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SoilHealth {
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
    pub last_updated: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SoilHistoryPoint {
    /// ISO date (YYYY-MM-DD).
    pub date: String,
    pub ph: f64,
    pub nitrogen: i32,
    pub phosphorus: i32,
    pub potassium: i32,
    pub organic_matter: f64,
    pub moisture: i32,
}

pub fn current_soil_health() -> SoilHealth {
    SoilHealth {
        ph: 6.8,
        nitrogen: 75,
        phosphorus: 35,
        potassium: 210,
        organic_matter: 3.2,
        texture: "Loamy".to_string(),
        moisture: 42,
        last_updated: Utc::now(),
    }
}

/// Six monthly readings before today, most recent first, jittered
/// around the current baseline.
pub fn historical_soil_data() -> Vec<SoilHistoryPoint> {
    let mut rng = rand::rng();
    let today = Utc::now();

    (1..=6u32)
        .map(|months_ago| {
            let date = today
                .checked_sub_months(Months::new(months_ago))
                .unwrap_or(today);

            let ph_variance: f64 = rng.random_range(-0.3..0.3);
            let nutrient_variance: f64 = rng.random_range(-0.1..0.1);

            SoilHistoryPoint {
                date: date.format("%Y-%m-%d").to_string(),
                ph: 6.8 + ph_variance,
                nitrogen: (75.0 * (1.0 + nutrient_variance)).round() as i32,
                phosphorus: (35.0 * (1.0 + nutrient_variance)).round() as i32,
                potassium: (210.0 * (1.0 + nutrient_variance)).round() as i32,
                organic_matter: ((3.2 * (1.0 + nutrient_variance / 2.0)) * 10.0).round() / 10.0,
                moisture: rng.random_range(40..=50),
            }
        })
        .collect()
}

/// Threshold checks over a soil reading. Always returns at least one
/// recommendation.
pub fn recommendations(soil: &SoilHealth) -> Vec<String> {
    let mut recommendations = Vec::new();

    if soil.ph < 6.0 {
        recommendations.push("Soil pH is too acidic. Consider applying agricultural lime to raise pH to the 6.5-7.0 range for optimal nutrient availability.".to_string());
    } else if soil.ph > 7.5 {
        recommendations.push("Soil pH is too alkaline. Consider adding organic matter like compost or sulfur to gradually lower pH.".to_string());
    }

    if soil.nitrogen < 60 {
        recommendations.push("Nitrogen levels are low. Consider applying a nitrogen-rich fertilizer or incorporating legumes into your crop rotation.".to_string());
    }

    if soil.phosphorus < 25 {
        recommendations.push("Phosphorus levels are low. Add bone meal or rock phosphate to improve phosphorus content.".to_string());
    }

    if soil.potassium < 150 {
        recommendations.push("Potassium levels are low. Consider applying wood ash or a potassium-specific fertilizer.".to_string());
    }

    if soil.organic_matter < 2.5 {
        recommendations.push("Organic matter is low. Incorporate compost, manure, or practice cover cropping to improve soil structure and fertility.".to_string());
    }

    if recommendations.is_empty() {
        recommendations.push("Your soil health parameters are within optimal ranges. Continue your current soil management practices.".to_string());
    }

    recommendations
}
