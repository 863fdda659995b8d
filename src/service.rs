//! Document service / 文档服务
//!
//! The read → validate → apply → persist flow behind the API.
//!
//! Handlers stay thin and call into this type; it owns the store handle, the
//! optional text cache and the configuration snapshot it needs.

use serde::Serialize;
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;

use crate::cache::TextCache;
use crate::config::{AppConfig, SearchConfig, UploadConfig};
use crate::edit::{apply_changes, parse_changes};
use crate::error::{AppError, Result};
use crate::extract::{detect_kind, extract_text};
use crate::models::{CreateDocumentRequest, Document, NewDocument};
use crate::search::{rank_documents, search_occurrences, top_k, Hit, Page, RankedDocument, SearchQuery};
use crate::store::DocumentStore;
use crate::utils::sanitize_name;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceOutcome {
    pub id: String,
    pub version: i64,
    pub updated_text: String,
    pub changes_applied: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct DocumentWithText {
    pub document: Document,
    pub text: Option<String>,
}

pub struct DocumentService {
    store: Arc<dyn DocumentStore>,
    cache: Option<TextCache>,
    search: SearchConfig,
    upload: UploadConfig,
    upload_dir: PathBuf,
}

impl DocumentService {
    pub fn new(store: Arc<dyn DocumentStore>, config: &AppConfig) -> Self {
        let cache = config
            .editor
            .cache_texts
            .then(|| TextCache::new(config.editor.cache_capacity));
        Self {
            store,
            cache,
            search: config.search.clone(),
            upload: config.upload.clone(),
            upload_dir: config.get_upload_dir(),
        }
    }

    pub async fn list_documents(&self) -> Result<Vec<Document>> {
        self.store.list_documents().await
    }

    /// Register a document without content (storage key `logical://name`) / 创建逻辑文档
    pub async fn create_document(&self, req: CreateDocumentRequest) -> Result<Document> {
        let name = req
            .name
            .filter(|n| !n.is_empty())
            .ok_or_else(|| AppError::Validation("name required".to_string()))?;
        let doc = self
            .store
            .create_document(NewDocument {
                id: None,
                storage_key: format!("logical://{}", name),
                name,
                mime_type: req.mime_type,
                size_bytes: req.size_bytes,
            })
            .await?;
        tracing::info!("document created: {} ({})", doc.id, doc.name);
        Ok(doc)
    }

    pub async fn get_document(&self, id: &str) -> Result<DocumentWithText> {
        let document = self
            .store
            .get_document(id)
            .await?
            .ok_or_else(|| AppError::NotFound("not found".to_string()))?;
        let text = self.current_text(id).await?;
        Ok(DocumentWithText { document, text })
    }

    async fn current_text(&self, id: &str) -> Result<Option<String>> {
        if let Some(text) = self.cache.as_ref().and_then(|c| c.get(id)) {
            return Ok(Some(text));
        }
        let epoch = self.cache.as_ref().map(TextCache::epoch);
        let text = self.store.get_document_text(id).await?;
        if let (Some(cache), Some(epoch), Some(text)) = (&self.cache, epoch, &text) {
            cache.insert(id, text, epoch);
        }
        Ok(text)
    }

    /// Apply a batch of range replacements and persist with a version bump / 应用批量替换
    ///
    /// Changes are applied to the document's current text.
    ///
    /// `expected_version`, when given, makes the write fail with a conflict if
    /// another write landed since the caller read the document.
    pub async fn replace(
        &self,
        id: &str,
        changes: Option<&Value>,
        expected_version: Option<i64>,
    ) -> Result<ReplaceOutcome> {
        if self.store.get_document(id).await?.is_none() {
            return Err(AppError::NotFound("not found".to_string()));
        }

        let text = self.current_text(id).await?.ok_or_else(|| {
            AppError::Conflict(
                "document has no editable text (e.g., binary-only or extraction missing)"
                    .to_string(),
            )
        })?;

        let changes = parse_changes(changes)?;
        let updated_text = apply_changes(&text, &changes)?;

        let written = self
            .store
            .put_document_text(id, &updated_text, expected_version)
            .await;
        // after the write settles, whether or not it committed
        if let Some(cache) = &self.cache {
            cache.invalidate(id);
        }
        let version = written?;

        tracing::info!(
            "document {} updated: {} changes applied, version {}",
            id,
            changes.len(),
            version
        );

        Ok(ReplaceOutcome {
            id: id.to_string(),
            version,
            updated_text,
            changes_applied: changes.len(),
        })
    }

    /// Occurrence search, optionally scoped to one document / 逐次命中搜索
    pub async fn search_occurrences(
        &self,
        q: Option<&str>,
        limit: Option<&str>,
        offset: Option<&str>,
        document_id: Option<&str>,
    ) -> Result<Vec<Hit>> {
        let q = q
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| AppError::Validation("q query parameter required".to_string()))?;

        let query = SearchQuery::parse(q);
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let page = Page::from_params(limit, offset, &self.search);

        let candidates = self
            .store
            .find_candidate_texts(&query.folded, document_id, page.candidate_rows())
            .await?;

        Ok(search_occurrences(
            &candidates,
            &query,
            page,
            self.search.occurrence_snippet_radius,
        ))
    }

    /// Document-level ranked search / 文档级排序搜索
    pub async fn search_ranked(&self, q: Option<&Value>, k: Option<&Value>) -> Result<Vec<RankedDocument>> {
        let q = q
            .and_then(Value::as_str)
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| AppError::Validation("q required".to_string()))?;

        let query = SearchQuery::parse(q);
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let candidates = self
            .store
            .find_ranked_candidates(&query.folded, self.search.ranked_candidate_rows)
            .await?;

        Ok(rank_documents(
            &candidates,
            &query,
            top_k(k, &self.search),
            self.search.ranked_snippet_radius,
        ))
    }

    /// Store an uploaded file, register it and index its text / 保存上传文件并索引
    ///
    /// Extraction failures are logged; the document is still created, just
    /// without editable text.
    pub async fn upload(
        &self,
        file_name: Option<&str>,
        content_type: Option<&str>,
        data: &[u8],
    ) -> Result<Document> {
        let id = uuid::Uuid::new_v4().to_string();
        let name = sanitize_name(file_name.filter(|n| !n.is_empty()).unwrap_or("upload.bin"));
        let mime_type = content_type
            .filter(|m| !m.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| mime_guess::from_path(&name).first_or_octet_stream().to_string());

        tokio::fs::create_dir_all(&self.upload_dir).await?;
        let storage_key = format!("{}_{}", id, name);
        let dest = self.upload_dir.join(&storage_key);
        tokio::fs::write(&dest, data).await?;

        let doc = self
            .store
            .create_document(NewDocument {
                id: Some(id),
                name: name.clone(),
                mime_type: mime_type.clone(),
                size_bytes: data.len() as i64,
                storage_key,
            })
            .await?;

        let kind = detect_kind(&mime_type, &name);
        match extract_text(kind, data, &dest, &self.upload).await {
            Ok(Some(text)) => {
                self.store.upsert_document_text(&doc.id, &text).await?;
                tracing::info!("indexed {} ({} chars)", doc.name, text.chars().count());
            }
            Ok(None) => tracing::debug!("no searchable text in {}", doc.name),
            Err(e) => tracing::warn!("text extraction failed for {}: {}", doc.name, e),
        }

        Ok(doc)
    }
}
