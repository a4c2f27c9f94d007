pub mod articles;
pub mod categories;
pub mod diagnostics;
pub mod stats;
pub mod tags;

use crate::state::AppState;
use axum::{routing::get, Router};
use std::sync::Arc;

/// 完整的 API 路由（不含中间件层）
pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health_check))
        .route("/health", get(health_check))
        .nest("/api/articles", articles::router())
        .nest("/api/categories", categories::router())
        .nest("/api/tags", tags::router())
        .nest("/api/stats", stats::router())
        .nest("/api/diagnostics", diagnostics::router())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "Tech Blog is running!"
}
