use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use doclens_backend::error::Result;
use doclens_backend::search::{Hit, RankedDocument};

use crate::state::AppState;

/// Query string of the occurrence endpoints / 搜索查询参数
///
/// Numbers stay raw so that malformed values fall back to defaults instead of
/// rejecting the request.
#[derive(Debug, Deserialize)]
pub struct OccurrenceQuery {
    pub q: Option<String>,
    pub limit: Option<String>,
    pub offset: Option<String>,
}

/// One occurrence as returned over HTTP / 单个命中
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OccurrenceResult {
    pub doc_id: String,
    pub name: String,
    pub snippet_html: String,
    pub start_index: usize,
    pub end_index: usize,
}

impl From<Hit> for OccurrenceResult {
    fn from(hit: Hit) -> Self {
        Self {
            doc_id: hit.document_id,
            name: hit.document_name,
            snippet_html: hit.snippet,
            start_index: hit.match_start,
            end_index: hit.match_end,
        }
    }
}

async fn occurrences(
    state: &AppState,
    params: &OccurrenceQuery,
    document_id: Option<&str>,
) -> Result<Json<Vec<OccurrenceResult>>> {
    let hits = state
        .service
        .search_occurrences(
            params.q.as_deref(),
            params.limit.as_deref(),
            params.offset.as_deref(),
            document_id,
        )
        .await?;
    Ok(Json(hits.into_iter().map(OccurrenceResult::from).collect()))
}

/// GET /api/documents/search - 全部文档内搜索
pub async fn search_all(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OccurrenceQuery>,
) -> Result<Json<Vec<OccurrenceResult>>> {
    occurrences(&state, &params, None).await
}

/// GET /api/documents/:documentId/search - 单文档内搜索
pub async fn search_document(
    State(state): State<Arc<AppState>>,
    Path(document_id): Path<String>,
    Query(params): Query<OccurrenceQuery>,
) -> Result<Json<Vec<OccurrenceResult>>> {
    occurrences(&state, &params, Some(&document_id)).await
}

/// POST /api/search - 排序搜索
///
/// Body `{q, k?}`; an unreadable body counts as an empty one.
pub async fn search_ranked(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<Vec<RankedDocument>>> {
    let body = payload.map(|Json(body)| body).unwrap_or(Value::Null);
    let results = state
        .service
        .search_ranked(body.get("q"), body.get("k"))
        .await?;
    Ok(Json(results))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::api::test_support::{app, get, json_request, send, upload_text};

    #[tokio::test]
    async fn test_occurrences_over_http() {
        let (app, _dir) = app().await;
        upload_text(&app, "a.txt", "x <b>net</b> y").await;
        let newer = upload_text(&app, "b.txt", "NET net").await;

        let (status, body) = send(&app, get("/api/documents/search?q=net")).await;
        assert_eq!(status, 200);
        let hits = body.as_array().unwrap();
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0]["docId"], newer.as_str());
        assert_eq!(hits[0]["startIndex"], 0);
        assert_eq!(hits[0]["endIndex"], 3);
        assert_eq!(hits[1]["startIndex"], 4);
        assert_eq!(hits[2]["name"], "a.txt");
        assert_eq!(hits[2]["snippetHtml"], "x &lt;b&gt;<mark>net</mark>&lt;/b&gt; y");

        let (_, body) = send(&app, get("/api/documents/search?q=net&limit=1&offset=1")).await;
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["startIndex"], 4);

        let (_, body) = send(&app, get("/api/documents/search?q=net&limit=abc")).await;
        assert_eq!(body.as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_scoped_search() {
        let (app, _dir) = app().await;
        let first = upload_text(&app, "a.txt", "alpha beta").await;
        upload_text(&app, "b.txt", "beta gamma").await;

        let (status, body) = send(&app, get(&format!("/api/documents/{}/search?q=beta", first))).await;
        assert_eq!(status, 200);
        assert_eq!(body.as_array().unwrap().len(), 1);
        assert_eq!(body[0]["docId"], first.as_str());

        let (status, body) = send(&app, get("/api/documents/missing/search?q=beta")).await;
        assert_eq!(status, 200);
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn test_query_required() {
        let (app, _dir) = app().await;
        let (status, body) = send(&app, get("/api/documents/search")).await;
        assert_eq!(status, 400);
        assert_eq!(body["error"], "q query parameter required");

        let (status, _) = send(&app, get("/api/documents/search?q=%20%20")).await;
        assert_eq!(status, 400);

        let (status, body) = send(&app, json_request("POST", "/api/search", json!({ "q": 5 }))).await;
        assert_eq!(status, 400);
        assert_eq!(body["error"], "q required");
    }

    #[tokio::test]
    async fn test_ranked_over_http() {
        let (app, _dir) = app().await;
        upload_text(&app, "report.txt", "quarterly report draft").await;
        upload_text(&app, "notes.txt", "see the report").await;

        let (status, body) =
            send(&app, json_request("POST", "/api/search", json!({ "q": "report", "k": 5 }))).await;
        assert_eq!(status, 200);
        let results = body.as_array().unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0]["name"], "report.txt");
        assert_eq!(results[0]["score"], 3);
        assert_eq!(results[1]["score"], 1);
        assert_eq!(results[1]["snippet"], "see the report");
    }
}
