use serde::Deserialize;

use crate::config;

/// Raw `?page=&limit=` values. Kept as strings so junk falls back to defaults
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub page: i64,
    pub limit: i64,
}

impl Page {
    pub fn from_query(query: &PageQuery) -> Self {
        let api = &config::config().api;
        Self::resolve(query, api.default_page_size as i64, api.max_page_size as i64)
    }

    pub fn resolve(query: &PageQuery, default_limit: i64, max_limit: i64) -> Self {
        let parse = |v: &Option<String>| v.as_deref().and_then(|s| s.trim().parse::<i64>().ok());

        let page = parse(&query.page).filter(|p| *p >= 1).unwrap_or(1);
        let limit = parse(&query.limit)
            .unwrap_or(default_limit)
            .clamp(1, max_limit.max(1));

        Self { page, limit }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}
