//! Position-based text editing / 基于位置的文本编辑
//!
//! A batch of changes is parsed from the request body, validated against the
//! current text length and applied in one pass. Offsets count `char`s of the text,
//! the same unit the search module reports hits in.

pub mod parse;
pub mod replace;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use parse::parse_changes;
pub use replace::{apply_changes, validate_changes};

/// Half-open `[start, end)` range in chars / 字符范围
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

/// One replacement instruction / 单条替换指令
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    pub range: TextRange,
    pub text: String,
}

impl Change {
    pub fn replace(start: usize, end: usize, text: impl Into<String>) -> Self {
        Self {
            range: TextRange { start, end },
            text: text.into(),
        }
    }
}

/// Why a change batch was rejected / 替换校验错误
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChangeError {
    #[error("changes[] required")]
    Empty,
    #[error("changes[{index}].operation must be \"replace\"")]
    UnsupportedOperation { index: usize },
    #[error("changes[{index}].range.start/end must be integers")]
    NonIntegerRange { index: usize },
    #[error("changes[{index}].range.{field} {value} must not be negative")]
    NegativeOffset {
        index: usize,
        field: &'static str,
        value: i64,
    },
    #[error("changes[{index}].text must be a string")]
    TextNotString { index: usize },
    #[error("changes[{index}].range.start {start} is after end {end}")]
    StartAfterEnd { index: usize, start: usize, end: usize },
    #[error("changes[{index}].range.end {end} exceeds text length {len}")]
    EndOutOfBounds { index: usize, end: usize, len: usize },
}
