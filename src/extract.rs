//! Searchable text extraction for uploaded files / 上传文件文本提取
//!
//! Plain-text uploads are decoded directly; PDFs go through `pdf_oxide` on a
//! blocking thread (feature `pdf`). Everything else is stored without text.

use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;
use thiserror::Error;

use crate::config::UploadConfig;
use crate::utils::get_ext;

static HORIZONTAL_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\t ]+").expect("space pattern compiles"));

const PLAIN_TEXT_EXTS: &[&str] = &["txt", "md", "csv", "json", "log"];

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("pdf extraction failed: {0}")]
    Pdf(String),
    #[error("extraction task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    PlainText,
    Pdf,
    Other,
}

/// Classify an upload by MIME type, falling back to the file extension / 识别文件类型
pub fn detect_kind(mime_type: &str, name: &str) -> SourceKind {
    let ext = get_ext(name);
    if mime_type.starts_with("text/") || PLAIN_TEXT_EXTS.contains(&ext.as_str()) {
        SourceKind::PlainText
    } else if mime_type == "application/pdf" || ext == "pdf" {
        SourceKind::Pdf
    } else {
        SourceKind::Other
    }
}

/// NUL becomes a space, runs of tabs/spaces collapse to one space, and the
/// result is cut to `max_chars` chars
pub fn normalize_text(raw: &str, max_chars: usize) -> String {
    let without_nul = raw.replace('\0', " ");
    let collapsed = HORIZONTAL_SPACE.replace_all(&without_nul, " ");
    match collapsed.char_indices().nth(max_chars) {
        Some((cut, _)) => collapsed[..cut].to_string(),
        None => collapsed.into_owned(),
    }
}

/// Extract and normalise the text of an upload already written to `path` / 提取并规范化文本
///
/// Returns `None` when the file type carries no text or nothing was extracted.
pub async fn extract_text(
    kind: SourceKind,
    data: &[u8],
    path: &Path,
    config: &UploadConfig,
) -> Result<Option<String>, ExtractError> {
    let raw = match kind {
        SourceKind::PlainText => {
            let head = &data[..data.len().min(config.max_plain_text_bytes)];
            String::from_utf8_lossy(head).into_owned()
        }
        SourceKind::Pdf => extract_pdf(path.to_path_buf()).await?,
        SourceKind::Other => String::new(),
    };

    if raw.is_empty() {
        return Ok(None);
    }
    Ok(Some(normalize_text(&raw, config.max_text_chars)))
}

#[cfg(feature = "pdf")]
async fn extract_pdf(path: std::path::PathBuf) -> Result<String, ExtractError> {
    tokio::task::spawn_blocking(move || {
        let mut doc = pdf_oxide::PdfDocument::open(&path)
            .map_err(|e| ExtractError::Pdf(e.to_string()))?;
        let pages = doc
            .page_count()
            .map_err(|e| ExtractError::Pdf(e.to_string()))?;

        let mut texts = Vec::with_capacity(pages);
        for page in 0..pages {
            texts.push(
                doc.extract_text(page)
                    .map_err(|e| ExtractError::Pdf(format!("page {}: {}", page, e)))?,
            );
        }
        tracing::debug!("extracted {} pdf pages from {:?}", pages, path);
        Ok(texts.join("\n").trim().to_string())
    })
    .await?
}

#[cfg(not(feature = "pdf"))]
async fn extract_pdf(path: std::path::PathBuf) -> Result<String, ExtractError> {
    tracing::debug!("pdf support disabled, storing {:?} without text", path);
    Ok(String::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_kind() {
        assert_eq!(detect_kind("text/markdown", "a.bin"), SourceKind::PlainText);
        assert_eq!(detect_kind("", "data.CSV"), SourceKind::PlainText);
        assert_eq!(detect_kind("application/octet-stream", "notes.log"), SourceKind::PlainText);
        assert_eq!(detect_kind("application/pdf", "scan"), SourceKind::Pdf);
        assert_eq!(detect_kind("", "paper.pdf"), SourceKind::Pdf);
        assert_eq!(detect_kind("image/png", "photo.png"), SourceKind::Other);
    }

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("a\0b\t\t c   d\n\ne", 100), "a b c d\n\ne");
        assert_eq!(normalize_text("héllo wörld", 5), "héllo");
        assert_eq!(normalize_text("short", 5), "short");
    }

    #[tokio::test]
    async fn test_plain_text_is_capped_and_lossy() {
        let config = UploadConfig {
            max_plain_text_bytes: 6,
            ..UploadConfig::default()
        };
        let data = b"ab\xffcdefgh";
        let text = extract_text(SourceKind::PlainText, data, Path::new("unused"), &config)
            .await
            .unwrap();
        assert_eq!(text.as_deref(), Some("ab\u{fffd}cde"));
    }

    #[tokio::test]
    async fn test_other_and_empty_have_no_text() {
        let config = UploadConfig::default();
        let none = extract_text(SourceKind::Other, b"\x89PNG", Path::new("x.png"), &config)
            .await
            .unwrap();
        assert!(none.is_none());

        let empty = extract_text(SourceKind::PlainText, b"", Path::new("x.txt"), &config)
            .await
            .unwrap();
        assert!(empty.is_none());
    }
}
