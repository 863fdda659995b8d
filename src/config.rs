//! Application configuration module / 应用配置模块
//!
//! Manages application configuration loaded from config.json.
//! Creates the default config file on first run / 首次运行时创建默认配置文件

use once_cell::sync::OnceCell;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Global configuration instance / 全局配置实例
static CONFIG: OnceCell<Arc<RwLock<AppConfig>>> = OnceCell::new();

/// Application configuration / 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration / 服务器配置
    pub server: ServerConfig,
    /// Database configuration / 数据库配置
    pub database: DatabaseConfig,
    /// Upload and text extraction configuration / 上传与文本提取配置
    #[serde(default)]
    pub upload: UploadConfig,
    /// Search configuration / 搜索配置
    #[serde(default)]
    pub search: SearchConfig,
    /// Editing configuration / 编辑配置
    #[serde(default)]
    pub editor: EditorConfig,
}

/// Server configuration / 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server host address / 服务器监听地址
    pub host: String,
    /// Server port / 服务器端口
    pub port: u16,
}

/// Database configuration / 数据库配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Data directory path / 数据目录路径
    pub data_dir: String,
    /// Main database file path (relative to data_dir) / 主数据库文件路径
    pub db_file: String,
}

/// Upload configuration / 上传配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadConfig {
    /// Directory for raw uploaded bytes (relative to data_dir) / 上传文件目录
    pub dir: String,
    /// Bytes of a plain-text upload that are decoded for indexing
    pub max_plain_text_bytes: usize,
    /// Characters of extracted text that are kept
    pub max_text_chars: usize,
}

/// Search configuration / 搜索配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Context characters on each side of an occurrence snippet
    pub occurrence_snippet_radius: usize,
    /// Context characters on each side of a ranked-search snippet
    pub ranked_snippet_radius: usize,
    /// Page size used when the request gives none / 默认分页大小
    pub default_limit: i64,
    /// Upper clamp for the page size
    pub max_limit: i64,
    /// Result count for ranked search when `k` is missing
    pub default_top_k: i64,
    /// Upper clamp for ranked search `k`
    pub max_top_k: i64,
    /// Candidate documents scanned by ranked search
    pub ranked_candidate_rows: usize,
}

/// Editor configuration / 编辑器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Keep a read-through cache of document texts / 启用文本缓存
    pub cache_texts: bool,
    /// Maximum number of cached texts
    pub cache_capacity: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            data_dir: "data".to_string(),
            db_file: "doclens.db".to_string(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            dir: "uploads".to_string(),
            max_plain_text_bytes: 5 * 1024 * 1024,
            max_text_chars: 2 * 1024 * 1024,
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            occurrence_snippet_radius: 50,
            ranked_snippet_radius: 90,
            default_limit: 25,
            max_limit: 500,
            default_top_k: 10,
            max_top_k: 50,
            ranked_candidate_rows: 200,
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            cache_texts: true,
            cache_capacity: 256,
        }
    }
}

impl AppConfig {
    /// Get the full database URL / 获取数据库URL
    pub fn get_database_url(&self) -> String {
        let db_path = Path::new(&self.database.data_dir).join(&self.database.db_file);
        format!("sqlite:{}?mode=rwc", db_path.to_string_lossy())
    }

    /// Get the full data directory path / 获取数据目录
    pub fn get_data_dir(&self) -> PathBuf {
        PathBuf::from(&self.database.data_dir)
    }

    /// Get the upload directory / 获取上传目录
    pub fn get_upload_dir(&self) -> PathBuf {
        let data_dir = self.get_data_dir();
        if self.upload.dir.is_empty() {
            data_dir
        } else {
            data_dir.join(&self.upload.dir)
        }
    }

    /// Get the server bind address / 获取监听地址
    pub fn get_bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Get the config file path / 获取配置文件路径
fn get_config_path() -> PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| PathBuf::from("."))
        .join("config.json")
}

/// Load configuration from file, or create default if not exists / 加载配置
pub fn load_config() -> Result<AppConfig, String> {
    let config_path = get_config_path();

    if config_path.exists() {
        let content = std::fs::read_to_string(&config_path)
            .map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config file: {}", e))?;

        tracing::info!("Loaded configuration from {:?}", config_path);
        Ok(config)
    } else {
        let config = AppConfig::default();
        save_config(&config)?;
        tracing::info!("Created default configuration at {:?}", config_path);
        Ok(config)
    }
}

/// Save configuration to file / 保存配置
pub fn save_config(config: &AppConfig) -> Result<(), String> {
    let config_path = get_config_path();

    let content = serde_json::to_string_pretty(config)
        .map_err(|e| format!("Failed to serialize config: {}", e))?;

    std::fs::write(&config_path, content)
        .map_err(|e| format!("Failed to write config file: {}", e))?;

    Ok(())
}

/// Initialize global configuration / 初始化全局配置
pub fn init_config() -> Result<Arc<RwLock<AppConfig>>, String> {
    let config = load_config()?;

    let config_arc = Arc::new(RwLock::new(config));

    CONFIG
        .set(config_arc.clone())
        .map_err(|_| "Config already initialized".to_string())?;

    Ok(config_arc)
}

/// Get global configuration instance / 获取全局配置
pub fn get_config() -> Arc<RwLock<AppConfig>> {
    CONFIG
        .get_or_init(|| {
            let config = load_config().unwrap_or_default();
            Arc::new(RwLock::new(config))
        })
        .clone()
}

/// Get a read-only snapshot of current config / 获取当前配置快照
pub fn config() -> AppConfig {
    get_config().read().clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_section_defaults() {
        let json = r#"{
            "server": { "host": "127.0.0.1", "port": 8080 },
            "database": { "data_dir": "/tmp/doclens", "db_file": "d.db" },
            "search": { "occurrence_snippet_radius": 80 }
        }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.search.occurrence_snippet_radius, 80);
        assert_eq!(config.search.ranked_snippet_radius, 90);
        assert_eq!(config.search.max_limit, 500);
        assert!(config.editor.cache_texts);
        assert_eq!(config.upload.max_plain_text_bytes, 5 * 1024 * 1024);
        assert_eq!(config.get_bind_address(), "127.0.0.1:8080");
        assert_eq!(config.get_upload_dir(), PathBuf::from("/tmp/doclens/uploads"));
    }
}
