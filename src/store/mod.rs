//! Document persistence / 文档持久化
//!
//! The service only talks to [`DocumentStore`]; [`SqliteStore`] is the
//! implementation used by the server and the tests.

pub mod sqlite;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{CandidateText, Document, NewDocument, RankedCandidate};

pub use sqlite::SqliteStore;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn create_document(&self, doc: NewDocument) -> Result<Document>;

    /// All documents, newest first / 全部文档
    async fn list_documents(&self) -> Result<Vec<Document>>;

    async fn get_document(&self, id: &str) -> Result<Option<Document>>;

    /// Current editable text, `None` when the document has none / 当前可编辑文本
    async fn get_document_text(&self, id: &str) -> Result<Option<String>>;

    /// Store the extracted text of a document without touching its version / 保存提取的文本
    async fn upsert_document_text(&self, id: &str, text: &str) -> Result<()>;

    /// Replace the text and bump the version in one transaction, returning the
    /// new version. With `expected_version` the write only happens when the
    /// stored version still matches.
    async fn put_document_text(
        &self,
        id: &str,
        text: &str,
        expected_version: Option<i64>,
    ) -> Result<i64>;

    /// Texts containing at least one folded term, newest document first / 候选文本
    async fn find_candidate_texts(
        &self,
        folded_terms: &[String],
        document_id: Option<&str>,
        max_rows: usize,
    ) -> Result<Vec<CandidateText>>;

    /// Documents whose name or text contains every folded term, newest first / 排序搜索候选
    async fn find_ranked_candidates(
        &self,
        folded_terms: &[String],
        max_rows: usize,
    ) -> Result<Vec<RankedCandidate>>;
}
