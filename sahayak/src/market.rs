//! Mandi commodity prices, synthesized from per-crop base rates with
//! regional factors and daily jitter. Stands in for a live market feed.

use chrono::{Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Crops shown side by side on the price comparison panel.
pub const COMPARISON_CROPS: &[&str] = &["rice", "wheat", "cotton", "maize", "tomato"];

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct PricePoint {
    /// ISO date (YYYY-MM-DD).
    pub date: String,
    /// Price in INR per quintal.
    pub price: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct CropPrice {
    pub crop: String,
    pub price: f64,
}

/// Base mandi price in INR per quintal.
pub fn base_price(crop: &str) -> f64 {
    match crop.to_lowercase().as_str() {
        "rice" => 2100.0,
        "wheat" => 1950.0,
        "cotton" => 6200.0,
        "maize" => 1800.0,
        "tomato" => 2500.0,
        "potato" => 1600.0,
        "sugarcane" => 380.0,
        _ => 2000.0,
    }
}

/// Regional price multiplier; regions without specific data use 1.0.
pub fn regional_factor(region: &str, crop: &str) -> f64 {
    let crop = crop.to_lowercase();
    match region.to_lowercase().as_str() {
        "karnataka" => match crop.as_str() {
            "rice" => 1.05,
            "wheat" => 0.95,
            _ => 1.0,
        },
        "tamil nadu" => match crop.as_str() {
            "rice" => 1.1,
            "cotton" => 0.9,
            _ => 1.0,
        },
        "punjab" => match crop.as_str() {
            "wheat" => 1.15,
            _ => 1.0,
        },
        _ => 1.0,
    }
}

/// Number of history days for a range token: `7d`, `30d`, or `90d`.
/// Unknown tokens fall back to 30 days.
pub fn days_for_range(range: &str) -> u32 {
    match range {
        "7d" => 7,
        "90d" => 90,
        _ => 30,
    }
}

/// Daily price series ending today, oldest first, with ±5% jitter
/// around the regional base price.
pub fn price_history(crop: &str, region: &str, days: u32) -> Vec<PricePoint> {
    let mut rng = rand::rng();
    let today = Utc::now().date_naive();
    let base = base_price(crop) * regional_factor(region, crop);

    (0..days)
        .rev()
        .map(|days_ago| {
            let date = today - Duration::days(days_ago as i64);
            let variance: f64 = rng.random_range(-0.05..0.05);
            let price = base * (1.0 + variance);
            PricePoint {
                date: date.format("%Y-%m-%d").to_string(),
                price: (price * 100.0).round() / 100.0,
            }
        })
        .collect()
}

/// Today's jitter-free prices for a set of crops in one region.
pub fn today_prices(crops: &[&str], region: &str) -> Vec<CropPrice> {
    crops
        .iter()
        .map(|crop| CropPrice {
            crop: crop.to_string(),
            price: base_price(crop) * regional_factor(region, crop),
        })
        .collect()
}
