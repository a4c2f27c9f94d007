use crate::{error::Result, models::category::CategoryStats, state::AppState};
use axum::{extract::State, response::Json, routing::get, Router};
use std::sync::Arc;
use tracing::debug;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(get_category_stats))
}

/// 分类统计
/// GET /api/categories
async fn get_category_stats(
    State(app_state): State<Arc<AppState>>,
) -> Result<Json<CategoryStats>> {
    debug!("Fetching category stats");

    let stats = app_state.article_manager.get_category_stats().await?;
    Ok(Json(stats))
}
