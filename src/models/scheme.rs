//! Government scheme model.

use serde::Serialize;

/// A subsidy or support programme farmers can apply for.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Scheme {
    pub id: &'static str,
    pub name: &'static str,
    pub category: &'static str,
    pub description: &'static str,
    pub benefit: &'static str,
    pub eligibility: &'static str,
}
