//! Market price API endpoints.

use axum::extract::{Path, Query};
use serde::{Deserialize, Serialize};

use super::{success, ApiResult};
use crate::catalog::{self, MARKET_CROPS, PRICE_ALERTS};
use crate::models::{MarketOutlook, MarketPrice, PriceAlert};

#[derive(Debug, Deserialize)]
pub struct MarketQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub crop: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct MarketListing {
    pub prices: Vec<&'static MarketPrice>,
    pub crops: &'static [&'static str],
    /// Sentence for the frontend's "listen" button
    pub announcement: String,
}

/// GET /api/market - Filtered price table.
pub async fn list_market(Query(query): Query<MarketQuery>) -> ApiResult<MarketListing> {
    let prices = catalog::search_market(&query.q, query.crop.as_deref());
    let announcement = catalog::market_announcement(prices.len());
    success(MarketListing {
        prices,
        crops: MARKET_CROPS,
        announcement,
    })
}

/// GET /api/market/alerts - Price movement alerts.
pub async fn list_price_alerts() -> ApiResult<&'static [PriceAlert]> {
    success(PRICE_ALERTS)
}

/// GET /api/market/outlook/{crop} - Mandi quotes and sell suggestion.
pub async fn get_market_outlook(Path(crop): Path<String>) -> ApiResult<MarketOutlook> {
    success(catalog::market_outlook(&crop))
}
