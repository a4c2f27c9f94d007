use crate::{error::Result, models::stats::BlogStats, state::AppState};
use axum::{extract::State, response::Json, routing::get, Router};
use std::sync::Arc;
use tracing::debug;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(get_blog_stats))
}

/// 博客统计
/// GET /api/stats
async fn get_blog_stats(State(app_state): State<Arc<AppState>>) -> Result<Json<BlogStats>> {
    debug!("Fetching blog stats");

    let stats = app_state.article_manager.get_blog_stats().await?;
    Ok(Json(stats))
}
