use axum::Json;
use serde_json::{json, Value};

/// GET /api/health - 健康检查
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "buildTime": env!("BUILD_TIME"),
    }))
}

#[cfg(test)]
mod tests {
    use crate::api::test_support::{app, get, send};

    #[tokio::test]
    async fn test_health() {
        let (app, _dir) = app().await;
        let (status, body) = send(&app, get("/api/health")).await;
        assert_eq!(status, 200);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
        assert!(body["buildTime"].is_string());
    }
}
