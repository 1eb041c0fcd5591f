use serde::{Deserialize, Serialize};

/// Raw `offset`/`limit` query parameters.
///
/// Kept as strings so that `?limit=abc` or `?offset=-3` fall back to the
/// defaults instead of being rejected by the extractor.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PaginationQuery {
    pub offset: Option<String>,
    pub limit: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub offset: usize,
    pub limit: usize,
}

impl Pagination {
    pub fn new(offset: usize, limit: usize) -> Self {
        Self { offset, limit }
    }

    /// 解析分页参数，非法值回退到默认值
    pub fn from_query(query: &PaginationQuery, default_limit: usize) -> Self {
        let offset = parse_non_negative(query.offset.as_deref()).unwrap_or(0);
        let limit = parse_limit(query.limit.as_deref()).unwrap_or(default_limit);
        Self { offset, limit }
    }
}

/// 分页结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    /// Size of the filtered collection before slicing.
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
}

/// Slice `[offset, offset + limit)` out of `items`, clamped to its length.
pub fn paginate<T>(items: Vec<T>, pagination: Pagination) -> Page<T> {
    let total = items.len();
    let items = items
        .into_iter()
        .skip(pagination.offset)
        .take(pagination.limit)
        .collect();

    Page {
        items,
        total,
        offset: pagination.offset,
        limit: pagination.limit,
    }
}

pub fn parse_non_negative(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .filter(|value| *value >= 0)
        .map(|value| value as usize)
}

pub fn parse_limit(raw: Option<&str>) -> Option<usize> {
    parse_non_negative(raw).filter(|value| *value > 0)
}
