//! Search module - pure search primitives over candidate texts / 搜索模块
//!
//! Candidate rows come from the store; everything here works on plain data:
//! - query: phrase / term parsing
//! - matcher: case folding and occurrence scanning on char offsets
//! - snippet: escaped, highlighted context windows
//! - occurrence: one hit per match, ordered and paginated
//! - ranked: one result per document, ordered by occurrence score

pub mod matcher;
pub mod occurrence;
pub mod query;
pub mod ranked;
pub mod snippet;

use serde_json::Value;

use crate::config::SearchConfig;

pub use occurrence::{search_occurrences, Hit};
pub use query::{QueryMode, SearchQuery};
pub use ranked::{rank_documents, RankedDocument};

/// Clamped pagination window / 分页参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub limit: usize,
    pub offset: usize,
}

impl Page {
    /// Build from raw query-string values. Missing, zero or non-numeric limits
    /// fall back to the configured default; the result is clamped to `1..=max_limit`.
    pub fn from_params(limit: Option<&str>, offset: Option<&str>, config: &SearchConfig) -> Self {
        let limit = limit
            .and_then(parse_number)
            .filter(|n| *n != 0)
            .unwrap_or(config.default_limit);
        let offset = offset.and_then(parse_number).unwrap_or(0);
        Self {
            limit: limit.clamp(1, config.max_limit.max(1)) as usize,
            offset: offset.max(0) as usize,
        }
    }

    /// Rows to fetch so that `offset + limit` hits can be produced
    pub fn candidate_rows(&self) -> usize {
        self.limit + self.offset
    }
}

/// Ranked-search `k`, clamped to `1..=max_top_k` / 排序搜索结果数
pub fn top_k(k: Option<&Value>, config: &SearchConfig) -> usize {
    let k = k
        .and_then(|v| match v {
            Value::Number(n) => n.as_f64().map(|f| f.trunc() as i64),
            Value::String(s) => parse_number(s),
            _ => None,
        })
        .filter(|n| *n != 0)
        .unwrap_or(config.default_top_k);
    k.clamp(1, config.max_top_k.max(1)) as usize
}

/// Lenient integer parse: accepts decimals (truncated), rejects NaN/garbage
fn parse_number(s: &str) -> Option<i64> {
    let n: f64 = s.trim().parse().ok()?;
    n.is_finite().then(|| n.trunc() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_defaults_and_clamps() {
        let config = SearchConfig::default();
        assert_eq!(Page::from_params(None, None, &config), Page { limit: 25, offset: 0 });
        assert_eq!(Page::from_params(Some("0"), Some("-4"), &config), Page { limit: 25, offset: 0 });
        assert_eq!(Page::from_params(Some("abc"), Some("x"), &config), Page { limit: 25, offset: 0 });
        assert_eq!(Page::from_params(Some("9999"), Some("7"), &config), Page { limit: 500, offset: 7 });
        assert_eq!(Page::from_params(Some("-3"), None, &config), Page { limit: 1, offset: 0 });
        assert_eq!(Page::from_params(Some("2.9"), None, &config).limit, 2);
        assert_eq!(Page { limit: 10, offset: 5 }.candidate_rows(), 15);
    }

    #[test]
    fn test_top_k() {
        let config = SearchConfig::default();
        assert_eq!(top_k(None, &config), 10);
        assert_eq!(top_k(Some(&json!(0)), &config), 10);
        assert_eq!(top_k(Some(&json!(3)), &config), 3);
        assert_eq!(top_k(Some(&json!("7")), &config), 7);
        assert_eq!(top_k(Some(&json!(500)), &config), 50);
        assert_eq!(top_k(Some(&json!(-2)), &config), 1);
        assert_eq!(top_k(Some(&json!(true)), &config), 10);
    }
}
