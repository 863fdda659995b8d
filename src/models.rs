use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub storage_key: String,
    pub version: i64,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields supplied when a document row is created / 新建文档字段
#[derive(Debug, Clone)]
pub struct NewDocument {
    /// Preassigned id (uploads name their stored file after it), or None for a fresh uuid
    pub id: Option<String>,
    pub name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub storage_key: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDocumentRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_mime_type")]
    pub mime_type: String,
    #[serde(default)]
    pub size_bytes: i64,
}

fn default_mime_type() -> String {
    "text/plain".to_string()
}

/// A text row returned for occurrence search / 搜索候选文本
#[derive(Debug, Clone)]
pub struct CandidateText {
    pub document_id: String,
    pub document_name: String,
    pub document_created_at: DateTime<Utc>,
    pub text: String,
}

/// A document row returned for ranked search / 排序搜索候选文档
#[derive(Debug, Clone)]
pub struct RankedCandidate {
    pub id: String,
    pub name: String,
    pub text: Option<String>,
}
