//! Occurrence search: one hit per match, not per document / 逐次命中搜索
//!
//! Every candidate text is scanned in full before sorting, so pagination always
//! sees the complete ordered list for the fetched candidates.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashSet;

use super::matcher::{find_all, fold_case, Span};
use super::query::SearchQuery;
use super::snippet::{highlight_html, TextIndex};
use super::Page;
use crate::models::CandidateText;

/// One concrete match location / 单个命中
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Hit {
    pub document_id: String,
    pub document_name: String,
    pub match_start: usize,
    pub match_end: usize,
    pub snippet: String,
    pub document_created_at: DateTime<Utc>,
}

struct Located {
    candidate: usize,
    span: Span,
}

/// Expand, order and paginate the occurrences of `query` in `candidates` / 展开、排序并分页
///
/// Hits are ordered by document creation time (newest first), then by match
/// start. The sort is stable, so any remaining ties keep scan order.
pub fn search_occurrences(
    candidates: &[CandidateText],
    query: &SearchQuery,
    page: Page,
    radius: usize,
) -> Vec<Hit> {
    if query.is_empty() {
        return Vec::new();
    }

    let mut located = Vec::new();
    for (candidate, row) in candidates.iter().enumerate() {
        let folded = fold_case(&row.text);
        let mut seen: HashSet<Span> = HashSet::new();
        for term in &query.folded {
            for span in find_all(&folded, term) {
                // the same range can come from two terms that fold alike
                if seen.insert(span) {
                    located.push(Located { candidate, span });
                }
            }
        }
    }

    located.sort_by(|a, b| {
        let (ra, rb) = (&candidates[a.candidate], &candidates[b.candidate]);
        rb.document_created_at
            .cmp(&ra.document_created_at)
            .then(a.span.start.cmp(&b.span.start))
    });

    tracing::debug!(
        "occurrence search: {} candidates, {} occurrences",
        candidates.len(),
        located.len()
    );

    let mut indexes: Vec<Option<TextIndex<'_>>> = (0..candidates.len()).map(|_| None).collect();
    located
        .into_iter()
        .skip(page.offset)
        .take(page.limit)
        .map(|loc| {
            let row = &candidates[loc.candidate];
            let index = indexes[loc.candidate].get_or_insert_with(|| TextIndex::new(&row.text));
            Hit {
                document_id: row.document_id.clone(),
                document_name: row.document_name.clone(),
                match_start: loc.span.start,
                match_end: loc.span.end,
                snippet: highlight_html(index, loc.span, radius),
                document_created_at: row.document_created_at,
            }
        })
        .collect()
}
