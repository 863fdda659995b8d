use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use doclens_backend::error::{AppError, Result};
use doclens_backend::models::Document;

use crate::state::AppState;

/// POST /api/upload - 上传文件 (multipart field `file`)
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Document>)> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let file_name = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("failed to read upload: {}", e)))?;

        let doc = state
            .service
            .upload(file_name.as_deref(), content_type.as_deref(), &data)
            .await?;
        tracing::info!("upload stored: {} ({} bytes)", doc.name, doc.size_bytes);
        return Ok((StatusCode::CREATED, Json(doc)));
    }

    Err(AppError::Validation("file field required".to_string()))
}
