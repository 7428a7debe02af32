//! Page/search parameters shared by the product and variant list endpoints.

use serde::Deserialize;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_PAGE_SIZE: i64 = 10;
/// Upper bound on `pageSize` unless `PAGINATION_MAX_PAGE_SIZE` says otherwise
pub const DEFAULT_MAX_PAGE_SIZE: i64 = 1000;

/// Raw list query string. Values stay strings so that junk input falls back
/// to defaults instead of rejecting the request.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    #[serde(rename = "pageSize")]
    pub page_size: Option<String>,
    pub search: Option<String>,
    #[serde(rename = "productID")]
    pub product_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: i64,
    pub page_size: i64,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl Pagination {
    pub fn from_params(page: Option<&str>, page_size: Option<&str>, max_page_size: i64) -> Self {
        let page = parse_positive(page).unwrap_or(DEFAULT_PAGE);
        let page_size = parse_positive(page_size)
            .unwrap_or(DEFAULT_PAGE_SIZE)
            .min(max_page_size.max(1));
        Self { page, page_size }
    }

    pub fn from_query(query: &ListQuery, max_page_size: i64) -> Self {
        Self::from_params(query.page.as_deref(), query.page_size.as_deref(), max_page_size)
    }

    pub fn limit(&self) -> i64 {
        self.page_size
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

fn parse_positive(value: Option<&str>) -> Option<i64> {
    value
        .and_then(|v| v.trim().parse::<i64>().ok())
        .filter(|v| *v > 0)
}

/// `%term%` for a substring LIKE match, or `None` when the term is empty.
/// LIKE wildcards inside the term are escaped so they match literally.
pub fn like_pattern(search: Option<&str>) -> Option<String> {
    let term = search?;
    if term.is_empty() {
        return None;
    }

    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    Some(escaped)
}
