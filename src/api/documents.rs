use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde_json::Value;
use std::sync::Arc;

use doclens_backend::error::{AppError, Result};
use doclens_backend::models::{CreateDocumentRequest, Document};
use doclens_backend::service::{DocumentWithText, ReplaceOutcome};

use crate::state::AppState;

/// GET /api/documents - newest first / 文档列表
pub async fn list_documents(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Document>>> {
    Ok(Json(state.service.list_documents().await?))
}

/// POST /api/documents - 创建逻辑文档
pub async fn create_document(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<CreateDocumentRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Document>)> {
    let Json(req) = payload?;
    let doc = state.service.create_document(req).await?;
    Ok((StatusCode::CREATED, Json(doc)))
}

/// GET /api/documents/:documentId / 获取文档
pub async fn get_document(
    State(state): State<Arc<AppState>>,
    Path(document_id): Path<String>,
) -> Result<Json<DocumentWithText>> {
    Ok(Json(state.service.get_document(&document_id).await?))
}

/// PATCH /api/documents/:documentId - 批量范围替换
///
/// The body is taken as raw JSON: `changes` is validated entry by entry and
/// `expectedVersion` is optional. An unreadable body counts as an empty one.
pub async fn replace_ranges(
    State(state): State<Arc<AppState>>,
    Path(document_id): Path<String>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<ReplaceOutcome>> {
    let body = payload.map(|Json(body)| body).unwrap_or_else(|rejection| {
        tracing::debug!("unreadable replace body: {}", rejection.body_text());
        Value::Null
    });
    let expected_version = match body.get("expectedVersion") {
        None | Some(Value::Null) => None,
        Some(v) => Some(v.as_i64().ok_or_else(|| {
            AppError::Validation("expectedVersion must be an integer".to_string())
        })?),
    };

    let outcome = state
        .service
        .replace(&document_id, body.get("changes"), expected_version)
        .await?;
    Ok(Json(outcome))
}
