//! Small helpers shared by upload, extraction and the store / 通用工具函数

use chrono::{SecondsFormat, Utc};
use once_cell::sync::Lazy;
use regex::Regex;

static UNSAFE_NAME_CHARS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^a-zA-Z0-9._-]").expect("name pattern compiles"));

/// Replace every char outside `[a-zA-Z0-9._-]` with `_` / 文件名清理
pub fn sanitize_name(name: &str) -> String {
    UNSAFE_NAME_CHARS.replace_all(name, "_").into_owned()
}

/// Get file extension (lowercase) / 获取文件扩展名（小写）
pub fn get_ext(path: &str) -> String {
    std::path::Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

/// Current time as RFC 3339 with fixed microsecond precision, so that stored
/// timestamps sort lexically in time order
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}
