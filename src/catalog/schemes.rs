//! Government scheme directory.

use super::{CategoryFilter, Searchable};
use crate::models::Scheme;

pub const SCHEMES: &[Scheme] = &[
    Scheme {
        id: "pm-kisan",
        name: "PM-KISAN",
        category: "Income Support",
        description: "Direct income support paid to landholding farmer families in three instalments.",
        benefit: "₹6,000 per year",
        eligibility: "All landholding farmer families",
    },
    Scheme {
        id: "pmfby",
        name: "Pradhan Mantri Fasal Bima Yojana",
        category: "Insurance",
        description: "Crop insurance against yield losses from natural calamities, pests and diseases.",
        benefit: "Premium of 2% for kharif and 1.5% for rabi crops",
        eligibility: "Farmers growing notified crops in notified areas",
    },
    Scheme {
        id: "kcc",
        name: "Kisan Credit Card",
        category: "Credit",
        description: "Short-term credit for cultivation, post-harvest and allied activities.",
        benefit: "Loans up to ₹3 lakh at subsidised interest",
        eligibility: "Owner cultivators, tenant farmers and sharecroppers",
    },
    Scheme {
        id: "soil-health-card",
        name: "Soil Health Card",
        category: "Soil",
        description: "Free soil testing with crop-wise nutrient and fertilizer recommendations.",
        benefit: "Soil test report every two years",
        eligibility: "All farmers",
    },
    Scheme {
        id: "pmksy-drip",
        name: "PMKSY Per Drop More Crop",
        category: "Irrigation",
        description: "Subsidy for drip and sprinkler micro-irrigation systems.",
        benefit: "Up to 55% subsidy for small and marginal farmers",
        eligibility: "Farmers with own or leased land and a water source",
    },
    Scheme {
        id: "smam",
        name: "Sub-Mission on Agricultural Mechanization",
        category: "Equipment",
        description: "Assistance to buy tractors, tillers and other farm machinery.",
        benefit: "40-50% subsidy on equipment cost",
        eligibility: "Individual farmers, with priority to small and marginal farmers",
    },
];

/// Selector labels, sentinel first.
pub const SCHEME_CATEGORIES: &[&str] = &[
    "All",
    "Income Support",
    "Insurance",
    "Credit",
    "Soil",
    "Irrigation",
    "Equipment",
];

impl Searchable for Scheme {
    fn category(&self) -> &str {
        self.category
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name, self.description, self.benefit]
    }
}

/// Filter the scheme directory by category selector and search text.
pub fn search_schemes(query: &str, category: Option<&str>) -> Vec<&'static Scheme> {
    let category = CategoryFilter::parse(category, &[SCHEME_CATEGORIES[0]]);
    super::filter(SCHEMES, query, &category)
}
