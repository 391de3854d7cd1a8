use serde::{Deserialize, Serialize};

use crate::market::{CropPrice, PricePoint};

/// Query parameters for `GET /api/v1/commodity-prices`.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema, utoipa::IntoParams)]
pub struct CommodityPricesQuery {
    pub crop: Option<String>,
    pub region: Option<String>,
    /// One of `7d`, `30d`, `90d`; defaults to `30d`.
    pub range: Option<String>,
}

/// `GET /api/v1/commodity-prices` response payload.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CommodityPricesData {
    pub crop: String,
    pub region: String,
    pub range: String,
    pub price_history: Vec<PricePoint>,
    pub comparison_data: Vec<CropPrice>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_defaults_to_none() {
        let query: CommodityPricesQuery = serde_json::from_str("{}").expect("deserialize");
        assert!(query.crop.is_none());
        assert!(query.region.is_none());
        assert!(query.range.is_none());
    }
}
