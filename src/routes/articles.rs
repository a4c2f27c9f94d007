use crate::{
    error::{AppError, Result},
    models::article::{Article, ArticleListResponse, ArticleQuery},
    services::query,
    state::AppState,
};
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    response::Json,
    routing::get,
    Router,
};
use std::sync::Arc;
use tracing::debug;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_articles))
        .route("/category/:category", get(get_articles_by_category))
        .route("/:slug", get(get_article_by_slug))
}

/// 获取文章列表
/// GET /api/articles?category=&search=&tags=&page=&limit=
///
/// 无法解析的查询参数返回 400，错误体和其他接口一致。
pub async fn list_articles(
    State(app_state): State<Arc<AppState>>,
    article_query: std::result::Result<Query<ArticleQuery>, QueryRejection>,
) -> Result<Json<ArticleListResponse>> {
    let Query(article_query) = article_query?;
    debug!("Fetching articles list with query: {:?}", article_query);

    let articles = app_state.article_manager.get_all_articles().await?;

    Ok(Json(query::apply(
        articles,
        &article_query,
        app_state.config.default_articles_per_page,
        app_state.config.max_articles_per_page,
    )))
}

/// 根据 slug 获取文章详情
/// GET /api/articles/:slug
pub async fn get_article_by_slug(
    State(app_state): State<Arc<AppState>>,
    Path(slug): Path<String>,
) -> Result<Json<Article>> {
    debug!("Fetching article by slug: {}", slug);

    let article = app_state
        .article_manager
        .get_article_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::not_found("Article"))?;

    Ok(Json(article))
}

/// 按分类获取文章
/// GET /api/articles/category/:category
pub async fn get_articles_by_category(
    State(app_state): State<Arc<AppState>>,
    Path(category): Path<String>,
) -> Result<Json<Vec<Article>>> {
    debug!("Fetching articles in category: {}", category);

    let articles = app_state
        .article_manager
        .get_articles_by_category(&category)
        .await?;

    Ok(Json(articles))
}
