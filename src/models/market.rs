//! Market price models matching the frontend market tables.

use serde::Serialize;

/// Mandi price row for one crop variety.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MarketPrice {
    pub crop: &'static str,
    pub variety: &'static str,
    pub market: &'static str,
    /// Rupees per quintal
    pub current_price: u32,
    pub previous_price: u32,
    /// Percent change against the previous price
    pub change: f64,
}

/// Short price movement notice shown above the price table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PriceAlert {
    pub crop: &'static str,
    pub message: &'static str,
    pub change: f64,
    pub badge: &'static str,
}

/// Whether the current prices favour selling.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SuggestionKind {
    Good,
    Wait,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SellSuggestion {
    #[serde(rename = "type")]
    pub kind: SuggestionKind,
    pub message: &'static str,
}

/// Price quote from a single mandi.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MandiQuote {
    pub market: &'static str,
    pub current_price: u32,
    pub previous_price: u32,
    pub change: f64,
}

/// Per-crop view of mandi prices with a sell suggestion.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MarketOutlook {
    pub crop: &'static str,
    pub prices: &'static [MandiQuote],
    pub suggestion: SellSuggestion,
}
