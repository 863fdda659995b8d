//! Document-level ranked search / 文档级排序搜索
//!
//! Scores each candidate document by how often the query occurs in its name
//! (weighted double) and body, keeps one plain snippet per document and returns
//! the top `k` documents by score.

use serde::Serialize;

use super::matcher::{count_occurrences, find_all, fold_case, Span};
use super::query::SearchQuery;
use super::snippet::{plain, TextIndex};
use crate::models::RankedCandidate;

/// Weight of a match in the document name relative to one in the body / 文件名匹配权重
const NAME_WEIGHT: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankedDocument {
    pub id: String,
    pub name: String,
    pub score: usize,
    pub snippet: String,
}

/// Total occurrences of every query term in `folded`
fn score_text(folded: &str, query: &SearchQuery) -> usize {
    query
        .folded
        .iter()
        .map(|term| count_occurrences(folded, term))
        .sum()
}

/// First match of the query, trying terms in the order they were typed
fn first_match(folded: &str, query: &SearchQuery) -> Option<Span> {
    query
        .folded
        .iter()
        .find_map(|term| find_all(folded, term).into_iter().next())
}

/// Rank `candidates` and keep the best `top_k` / 排序并取前k个
pub fn rank_documents(
    candidates: &[RankedCandidate],
    query: &SearchQuery,
    top_k: usize,
    radius: usize,
) -> Vec<RankedDocument> {
    if query.is_empty() {
        return Vec::new();
    }

    let mut ranked: Vec<RankedDocument> = candidates
        .iter()
        .filter_map(|doc| {
            let name_score = score_text(&fold_case(&doc.name), query) * NAME_WEIGHT;
            let (text_score, snippet) = match doc.text.as_deref() {
                Some(text) => {
                    let folded = fold_case(text);
                    let snippet = first_match(&folded, query)
                        .map(|span| plain(&TextIndex::new(text), span, radius))
                        .unwrap_or_default();
                    (score_text(&folded, query), snippet)
                }
                None => (0, doc.name.clone()),
            };
            let score = name_score + text_score;
            (score > 0).then(|| RankedDocument {
                id: doc.id.clone(),
                name: doc.name.clone(),
                score,
                snippet,
            })
        })
        .collect();

    // stable: equal scores keep the newest-first candidate order
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked.truncate(top_k);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, name: &str, text: Option<&str>) -> RankedCandidate {
        RankedCandidate {
            id: id.to_string(),
            name: name.to_string(),
            text: text.map(str::to_string),
        }
    }

    #[test]
    fn test_name_matches_weigh_double() {
        let docs = vec![
            doc("body", "notes.txt", Some("invoice invoice invoice")),
            doc("name", "invoice-2.txt", Some("invoice")),
            doc("none", "other.txt", Some("nothing here")),
        ];
        let ranked = rank_documents(&docs, &SearchQuery::parse("Invoice"), 10, 90);
        let scores: Vec<(&str, usize)> = ranked.iter().map(|r| (r.id.as_str(), r.score)).collect();
        assert_eq!(scores, vec![("body", 3), ("name", 3)]);
    }

    #[test]
    fn test_top_k_truncates() {
        let docs = vec![
            doc("a", "a", Some("x")),
            doc("b", "b", Some("x x x")),
            doc("c", "c", Some("x x")),
        ];
        let ranked = rank_documents(&docs, &SearchQuery::parse("x"), 2, 90);
        let ids: Vec<&str> = ranked.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "c"]);
    }

    #[test]
    fn test_snippet_from_first_term_found() {
        let text = format!("{}beta{}alpha", "-".repeat(10), "-".repeat(10));
        let docs = vec![doc("a", "a.txt", Some(&text))];
        let ranked = rank_documents(&docs, &SearchQuery::parse("alpha beta"), 10, 3);
        // "alpha" is tried first and found, even though "beta" comes earlier in the text
        assert_eq!(ranked[0].snippet, "…---alpha");
        assert_eq!(ranked[0].score, 2);
    }

    #[test]
    fn test_document_without_text_uses_name() {
        let docs = vec![doc("a", "Quarterly Report.pdf", None)];
        let ranked = rank_documents(&docs, &SearchQuery::parse("report"), 10, 90);
        assert_eq!(ranked[0].score, 2);
        assert_eq!(ranked[0].snippet, "Quarterly Report.pdf");
    }

    #[test]
    fn test_phrase_counts_phrase_only() {
        let docs = vec![doc("a", "a.txt", Some("net 30, net 60, 30 net"))];
        let ranked = rank_documents(&docs, &SearchQuery::parse(r#""net 30""#), 10, 90);
        assert_eq!(ranked[0].score, 1);
    }
}
