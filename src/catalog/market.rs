//! Mandi price tables.

use super::{CategoryFilter, Searchable};
use crate::models::{
    MandiQuote, MarketOutlook, MarketPrice, PriceAlert, SellSuggestion, SuggestionKind,
};

/// Selector label meaning "no crop filter".
pub const ALL_CROPS: &str = "All Crops";

/// Crop offered when an outlook is requested for a crop without one.
pub const DEFAULT_OUTLOOK_CROP: &str = "Rice";

#[rustfmt::skip]
pub const MARKET_PRICES: &[MarketPrice] = &[
    MarketPrice { crop: "Rice", variety: "Basmati", market: "Delhi Mandi", current_price: 3200, previous_price: 3100, change: 3.2 },
    MarketPrice { crop: "Wheat", variety: "HD-2967", market: "Haryana Mandi", current_price: 2150, previous_price: 2200, change: -2.3 },
    MarketPrice { crop: "Cotton", variety: "Shankar-6", market: "Gujarat Mandi", current_price: 5800, previous_price: 5600, change: 3.6 },
    MarketPrice { crop: "Sugarcane", variety: "Co-238", market: "UP Mandi", current_price: 350, previous_price: 340, change: 2.9 },
    MarketPrice { crop: "Soybean", variety: "JS-335", market: "Madhya Pradesh Mandi", current_price: 4200, previous_price: 4150, change: 1.2 },
    MarketPrice { crop: "Maize", variety: "Hybrid", market: "Karnataka Mandi", current_price: 1800, previous_price: 1750, change: 2.9 },
];

#[rustfmt::skip]
pub const PRICE_ALERTS: &[PriceAlert] = &[
    PriceAlert { crop: "Rice", message: "Price increased by ₹100/quintal in last 3 days", change: 3.2, badge: "success" },
    PriceAlert { crop: "Wheat", message: "Expected price rise next week due to procurement", change: 2.3, badge: "success" },
    PriceAlert { crop: "Cotton", message: "High demand from textile industry", change: 5.6, badge: "success" },
];

/// Crops offered by the market selector, sentinel first.
pub const MARKET_CROPS: &[&str] = &[
    ALL_CROPS, "Rice", "Wheat", "Cotton", "Sugarcane", "Soybean", "Maize",
];

#[rustfmt::skip]
const RICE_QUOTES: &[MandiQuote] = &[
    MandiQuote { market: "Delhi Mandi", current_price: 3200, previous_price: 3100, change: 3.2 },
    MandiQuote { market: "Haryana Mandi", current_price: 3150, previous_price: 3000, change: 5.0 },
    MandiQuote { market: "Punjab Mandi", current_price: 3250, previous_price: 3200, change: 1.6 },
];

#[rustfmt::skip]
const WHEAT_QUOTES: &[MandiQuote] = &[
    MandiQuote { market: "Haryana Mandi", current_price: 2150, previous_price: 2200, change: -2.3 },
    MandiQuote { market: "Punjab Mandi", current_price: 2100, previous_price: 2180, change: -3.7 },
    MandiQuote { market: "UP Mandi", current_price: 2050, previous_price: 2100, change: -2.4 },
];

#[rustfmt::skip]
const COTTON_QUOTES: &[MandiQuote] = &[
    MandiQuote { market: "Gujarat Mandi", current_price: 5800, previous_price: 5600, change: 3.6 },
    MandiQuote { market: "Maharashtra Mandi", current_price: 5750, previous_price: 5500, change: 4.5 },
    MandiQuote { market: "Telangana Mandi", current_price: 5900, previous_price: 5700, change: 3.5 },
];

impl Searchable for MarketPrice {
    fn category(&self) -> &str {
        self.crop
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.crop, self.variety, self.market]
    }
}

/// Filter the price table by crop selector and search text.
pub fn search_market(query: &str, crop: Option<&str>) -> Vec<&'static MarketPrice> {
    let category = CategoryFilter::parse(crop, &[ALL_CROPS]);
    super::filter(MARKET_PRICES, query, &category)
}

/// Mandi quotes and sell suggestion for a crop.
///
/// Total over all inputs: crops without quotes get the `DEFAULT_OUTLOOK_CROP` outlook.
pub fn market_outlook(crop: &str) -> MarketOutlook {
    match crop {
        "Wheat" => MarketOutlook {
            crop: "Wheat",
            prices: WHEAT_QUOTES,
            suggestion: SellSuggestion {
                kind: SuggestionKind::Wait,
                message: "⚠️ Prices are low, consider waiting for better rates.",
            },
        },
        "Cotton" => MarketOutlook {
            crop: "Cotton",
            prices: COTTON_QUOTES,
            suggestion: SellSuggestion {
                kind: SuggestionKind::Good,
                message: "💡 High demand from textile industry, excellent time to sell!",
            },
        },
        _ => MarketOutlook {
            crop: DEFAULT_OUTLOOK_CROP,
            prices: RICE_QUOTES,
            suggestion: SellSuggestion {
                kind: SuggestionKind::Good,
                message: "💡 Prices are high, good time to sell!",
            },
        },
    }
}

/// Sentence the frontend reads out after refreshing the price table.
pub fn market_announcement(listed: usize) -> String {
    format!("Market prices updated. {} crops listed.", listed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rice_query_matches_crop_variety_or_market() {
        let expected: Vec<&MarketPrice> = MARKET_PRICES
            .iter()
            .filter(|p| {
                [p.crop, p.variety, p.market]
                    .iter()
                    .any(|f| f.to_lowercase().contains("rice"))
            })
            .collect();

        let result = search_market("rice", None);
        assert_eq!(result, expected);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].variety, "Basmati");
    }

    #[test]
    fn test_market_field_is_searched() {
        let result = search_market("MANDI", Some(ALL_CROPS));
        assert_eq!(result.len(), MARKET_PRICES.len());

        let result = search_market("pradesh", None);
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].crop, "Soybean");
    }

    #[test]
    fn test_crop_selector_is_exact() {
        let result = search_market("", Some("Wheat"));
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].market, "Haryana Mandi");

        assert!(search_market("", Some("wheat")).is_empty());
    }

    #[test]
    fn test_outlook_falls_back_to_rice() {
        let outlook = market_outlook("Banana");
        assert_eq!(outlook.crop, DEFAULT_OUTLOOK_CROP);
        assert_eq!(outlook.prices.len(), 3);

        let wheat = market_outlook("Wheat");
        assert_eq!(wheat.suggestion.kind, SuggestionKind::Wait);
    }

    #[test]
    fn test_announcement() {
        assert_eq!(
            market_announcement(6),
            "Market prices updated. 6 crops listed."
        );
    }
}
