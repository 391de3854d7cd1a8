//! Commodity price charts.

use axum::extract::Query;

use crate::api::v1::dto::{CommodityPricesData, CommodityPricesQuery};
use crate::api::v1::response::ApiResponse;
use crate::market;

/// `GET /api/v1/commodity-prices`
///
/// Synthetic price series; no market data provider is wired up yet.
#[utoipa::path(
    get,
    path = "/api/v1/commodity-prices",
    tag = "market",
    params(CommodityPricesQuery),
    responses(
        (status = 200, description = "Price history and cross-crop comparison", body = CommodityPricesData),
    )
)]
pub async fn commodity_prices(
    Query(query): Query<CommodityPricesQuery>,
) -> ApiResponse<CommodityPricesData> {
    let crop = query.crop.unwrap_or_else(|| "rice".to_string());
    let region = query.region.unwrap_or_else(|| "karnataka".to_string());
    let range = query.range.unwrap_or_else(|| "30d".to_string());

    let days = market::days_for_range(&range);
    let price_history = market::price_history(&crop, &region, days);
    let comparison_data = market::today_prices(market::COMPARISON_CROPS, &region);

    ApiResponse::success(CommodityPricesData {
        crop,
        region,
        range,
        price_history,
        comparison_data,
    })
}
