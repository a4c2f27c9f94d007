use crate::{
    error::{AppError, Result},
    state::AppState,
};
use axum::{extract::State, response::Json, routing::get, Router};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::debug;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(diagnostics))
}

/// 诊断端点（仅开发环境可用），列出加载失败的文章
/// GET /api/diagnostics
async fn diagnostics(State(state): State<Arc<AppState>>) -> Result<Json<Value>> {
    if !state.is_development() {
        return Err(AppError::forbidden("Diagnostics endpoint is only available in development"));
    }

    debug!("Running diagnostics endpoint");

    let report = state.article_manager.load_all().await?;

    Ok(Json(json!({
        "postsDir": state.article_manager.posts_dir().display().to_string(),
        "articles": report.articles.len(),
        "errors": report.errors,
    })))
}
