use crate::{
    error::Result,
    models::tag::TagsResponse,
    services::stats,
    state::AppState,
};
use axum::{extract::State, response::Json, routing::get, Router};
use std::sync::Arc;
use tracing::debug;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/", get(get_tags))
}

/// 标签统计与热门标签
/// GET /api/tags
async fn get_tags(State(app_state): State<Arc<AppState>>) -> Result<Json<TagsResponse>> {
    debug!("Fetching tag stats");

    let tags = app_state.article_manager.get_tag_stats().await?;
    let popular_tags = stats::popular_tags(&tags, app_state.config.popular_tags_limit);

    Ok(Json(TagsResponse {
        total_tags: tags.len(),
        popular_tags,
        tags,
    }))
}
