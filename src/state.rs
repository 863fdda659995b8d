use doclens_backend::service::DocumentService;

/// Shared handler state / 共享状态
pub struct AppState {
    pub service: DocumentService,
}
