use serde::Serialize;

/// GET /api/stats 响应
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogStats {
    pub total_articles: usize,
    pub total_categories: usize,
    pub total_tags: usize,
    /// 最新文章的 date，无文章时为当前时间
    pub last_updated: String,
}
