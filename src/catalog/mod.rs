//! Fixed market and scheme catalogs with client-side style filtering.
//!
//! Filtering keeps the original table order: an item matches when its category passes the
//! category filter and the query is empty or a case-insensitive substring of a search field.

mod market;
mod schemes;

pub use market::*;
pub use schemes::*;

/// An item that can be narrowed by category and free-text query.
pub trait Searchable {
    /// Value compared against the category selector.
    fn category(&self) -> &str;

    /// Fields the free-text query is matched against.
    fn search_fields(&self) -> Vec<&str>;
}

/// Category selector with an "all" sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CategoryFilter {
    All,
    Only(String),
}

impl CategoryFilter {
    /// Parse a selector value. `sentinels` are the labels that mean "all" in a given view.
    pub fn parse(raw: Option<&str>, sentinels: &[&str]) -> Self {
        match raw.map(str::trim) {
            None | Some("") => CategoryFilter::All,
            Some(value)
                if value.eq_ignore_ascii_case("all")
                    || sentinels.iter().any(|s| s.eq_ignore_ascii_case(value)) =>
            {
                CategoryFilter::All
            }
            Some(value) => CategoryFilter::Only(value.to_string()),
        }
    }

    fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }
}

/// Return the items matching both the category filter and the query, in original order.
pub fn filter<'a, T: Searchable>(
    items: &'a [T],
    query: &str,
    category: &CategoryFilter,
) -> Vec<&'a T> {
    let needle = query.to_lowercase();

    items
        .iter()
        .filter(|item| category.matches(item.category()))
        .filter(|item| {
            needle.is_empty()
                || item
                    .search_fields()
                    .iter()
                    .any(|field| field.to_lowercase().contains(&needle))
        })
        .collect()
}
