//! Government scheme API endpoints.

use axum::extract::Query;
use serde::Deserialize;

use super::{success, ApiResult};
use crate::catalog::{self, SCHEME_CATEGORIES};
use crate::models::Scheme;

#[derive(Debug, Deserialize)]
pub struct SchemeQuery {
    #[serde(default)]
    pub q: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// GET /api/schemes - Filtered scheme directory.
pub async fn list_schemes(Query(query): Query<SchemeQuery>) -> ApiResult<Vec<&'static Scheme>> {
    success(catalog::search_schemes(&query.q, query.category.as_deref()))
}

/// GET /api/schemes/categories - Category selector labels.
pub async fn list_scheme_categories() -> ApiResult<&'static [&'static str]> {
    success(SCHEME_CATEGORIES)
}
