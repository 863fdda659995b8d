//! SQLite document store / SQLite文档存储
//!
//! Tables:
//! - documents: metadata, version counter, folded name for matching
//! - document_texts: one editable text per document plus its folded shadow
//!   column, which candidate retrieval scans with `instr` so that matching is
//!   case-insensitive beyond ASCII

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{sqlite::SqlitePoolOptions, Pool, QueryBuilder, Sqlite};

use super::DocumentStore;
use crate::error::{AppError, Result};
use crate::models::{CandidateText, Document, NewDocument, RankedCandidate};
use crate::search::matcher::fold_case;
use crate::utils::now_timestamp;

const DOCUMENT_COLUMNS: &str =
    "id, name, mime_type, size_bytes, storage_key, version, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct CandidateRow {
    document_id: String,
    document_name: String,
    created_at: String,
    text: String,
}

#[derive(sqlx::FromRow)]
struct RankedRow {
    id: String,
    name: String,
    text: Option<String>,
}

pub struct SqliteStore {
    db: Pool<Sqlite>,
}

impl SqliteStore {
    /// Use an existing connection pool / 使用已有连接池
    pub fn new(db: Pool<Sqlite>) -> Self {
        Self { db }
    }

    /// Open (or create) the database at `url` and make sure the tables exist / 打开数据库并建表
    pub async fn connect(url: &str) -> Result<Self> {
        let db = SqlitePoolOptions::new()
            .max_connections(4)
            .connect(url)
            .await?;

        sqlx::query("PRAGMA journal_mode=WAL").execute(&db).await?;
        sqlx::query("PRAGMA busy_timeout=5000").execute(&db).await?;
        sqlx::query("PRAGMA synchronous=NORMAL").execute(&db).await?;

        let store = Self::new(db);
        store.init().await?;
        tracing::info!("Document database opened: {}", url);
        Ok(store)
    }

    /// Private in-memory database; a single connection so every query sees it / 内存数据库
    pub async fn in_memory() -> Result<Self> {
        let db = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        let store = Self::new(db);
        store.init().await?;
        Ok(store)
    }

    /// Create tables if they do not exist yet / 创建表
    pub async fn init(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS documents (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                name_folded TEXT NOT NULL,
                mime_type TEXT NOT NULL,
                size_bytes INTEGER NOT NULL DEFAULT 0,
                storage_key TEXT NOT NULL,
                version INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.db)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS document_texts (
                document_id TEXT PRIMARY KEY,
                text TEXT NOT NULL,
                text_folded TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (document_id) REFERENCES documents(id) ON DELETE CASCADE
            )
            "#,
        )
        .execute(&self.db)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_documents_created ON documents(created_at)")
            .execute(&self.db)
            .await?;

        Ok(())
    }

    pub async fn close(&self) {
        self.db.close().await;
    }
}

fn parse_created_at(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| AppError::Internal(format!("bad created_at {:?}: {}", value, e)))
}

#[async_trait]
impl DocumentStore for SqliteStore {
    async fn create_document(&self, doc: NewDocument) -> Result<Document> {
        let id = doc.id.unwrap_or_else(|| uuid::Uuid::new_v4().to_string());
        let now = now_timestamp();

        sqlx::query(
            r#"
            INSERT INTO documents
                (id, name, name_folded, mime_type, size_bytes, storage_key, version, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, 1, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&doc.name)
        .bind(fold_case(&doc.name))
        .bind(&doc.mime_type)
        .bind(doc.size_bytes)
        .bind(&doc.storage_key)
        .bind(&now)
        .bind(&now)
        .execute(&self.db)
        .await?;

        self.get_document(&id)
            .await?
            .ok_or_else(|| AppError::Internal(format!("document {} vanished after insert", id)))
    }

    async fn list_documents(&self) -> Result<Vec<Document>> {
        let sql = format!(
            "SELECT {} FROM documents ORDER BY created_at DESC, rowid DESC",
            DOCUMENT_COLUMNS
        );
        Ok(sqlx::query_as::<_, Document>(&sql).fetch_all(&self.db).await?)
    }

    async fn get_document(&self, id: &str) -> Result<Option<Document>> {
        let sql = format!("SELECT {} FROM documents WHERE id = ?", DOCUMENT_COLUMNS);
        Ok(sqlx::query_as::<_, Document>(&sql)
            .bind(id)
            .fetch_optional(&self.db)
            .await?)
    }

    async fn get_document_text(&self, id: &str) -> Result<Option<String>> {
        let row: Option<(String,)> =
            sqlx::query_as("SELECT text FROM document_texts WHERE document_id = ?")
                .bind(id)
                .fetch_optional(&self.db)
                .await?;
        Ok(row.map(|(text,)| text))
    }

    async fn upsert_document_text(&self, id: &str, text: &str) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO document_texts (document_id, text, text_folded, updated_at)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(document_id) DO UPDATE SET
                text = excluded.text,
                text_folded = excluded.text_folded,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(id)
        .bind(text)
        .bind(fold_case(text))
        .bind(now_timestamp())
        .execute(&self.db)
        .await?;
        Ok(())
    }

    async fn put_document_text(
        &self,
        id: &str,
        text: &str,
        expected_version: Option<i64>,
    ) -> Result<i64> {
        let now = now_timestamp();
        // dropping the transaction on an early return rolls it back
        let mut tx = self.db.begin().await?;

        let bumped = match expected_version {
            Some(expected) => {
                sqlx::query(
                    "UPDATE documents SET version = version + 1, updated_at = ? WHERE id = ? AND version = ?",
                )
                .bind(&now)
                .bind(id)
                .bind(expected)
                .execute(&mut *tx)
                .await?
            }
            None => {
                sqlx::query("UPDATE documents SET version = version + 1, updated_at = ? WHERE id = ?")
                    .bind(&now)
                    .bind(id)
                    .execute(&mut *tx)
                    .await?
            }
        };

        if bumped.rows_affected() == 0 {
            let current: Option<(i64,)> = sqlx::query_as("SELECT version FROM documents WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
            return Err(match (current, expected_version) {
                (Some((current,)), Some(expected)) => AppError::Conflict(format!(
                    "document version is {}, expected {}",
                    current, expected
                )),
                _ => AppError::NotFound("not found".to_string()),
            });
        }

        let written = sqlx::query(
            "UPDATE document_texts SET text = ?, text_folded = ?, updated_at = ? WHERE document_id = ?",
        )
        .bind(text)
        .bind(fold_case(text))
        .bind(&now)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if written.rows_affected() == 0 {
            return Err(AppError::Conflict(
                "document has no editable text".to_string(),
            ));
        }

        let (version,): (i64,) = sqlx::query_as("SELECT version FROM documents WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        tracing::debug!("document {} text updated, version {}", id, version);
        Ok(version)
    }

    async fn find_candidate_texts(
        &self,
        folded_terms: &[String],
        document_id: Option<&str>,
        max_rows: usize,
    ) -> Result<Vec<CandidateText>> {
        if folded_terms.is_empty() || max_rows == 0 {
            return Ok(Vec::new());
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            r#"
            SELECT d.id AS document_id, d.name AS document_name, d.created_at AS created_at, t.text AS text
            FROM document_texts t
            JOIN documents d ON d.id = t.document_id
            WHERE (
            "#,
        );
        let mut any = qb.separated(" OR ");
        for term in folded_terms {
            any.push("instr(t.text_folded, ")
                .push_bind_unseparated(term.clone())
                .push_unseparated(") > 0");
        }
        qb.push(")");
        if let Some(id) = document_id {
            qb.push(" AND d.id = ").push_bind(id.to_string());
        }
        qb.push(" ORDER BY d.created_at DESC, d.rowid DESC LIMIT ")
            .push_bind(max_rows as i64);

        let rows: Vec<CandidateRow> = qb.build_query_as().fetch_all(&self.db).await?;

        rows.into_iter()
            .map(|row| {
                Ok(CandidateText {
                    document_created_at: parse_created_at(&row.created_at)?,
                    document_id: row.document_id,
                    document_name: row.document_name,
                    text: row.text,
                })
            })
            .collect()
    }

    async fn find_ranked_candidates(
        &self,
        folded_terms: &[String],
        max_rows: usize,
    ) -> Result<Vec<RankedCandidate>> {
        if folded_terms.is_empty() || max_rows == 0 {
            return Ok(Vec::new());
        }

        let mut qb: QueryBuilder<Sqlite> = QueryBuilder::new(
            r#"
            SELECT d.id AS id, d.name AS name, t.text AS text
            FROM documents d
            LEFT JOIN document_texts t ON t.document_id = d.id
            WHERE
            "#,
        );
        let mut all = qb.separated(" AND ");
        for term in folded_terms {
            all.push("(instr(d.name_folded, ")
                .push_bind_unseparated(term.clone())
                .push_unseparated(") > 0 OR instr(COALESCE(t.text_folded, ''), ")
                .push_bind_unseparated(term.clone())
                .push_unseparated(") > 0)");
        }
        qb.push(" ORDER BY d.created_at DESC, d.rowid DESC LIMIT ")
            .push_bind(max_rows as i64);

        let rows: Vec<RankedRow> = qb.build_query_as().fetch_all(&self.db).await?;

        Ok(rows
            .into_iter()
            .map(|row| RankedCandidate {
                id: row.id,
                name: row.name,
                text: row.text,
            })
            .collect())
    }
}
