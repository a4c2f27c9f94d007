//! 分类、标签与博客统计；输入为按日期降序排好的文章列表

use chrono::{SecondsFormat, Utc};

use crate::models::{
    article::Article,
    category::CategoryStats,
    stats::BlogStats,
    tag::{TagCount, TagStats},
};

/// 按分类分组，没有分类的文章不计入
pub fn category_stats(articles: &[Article]) -> CategoryStats {
    let mut stats = CategoryStats::new();
    for article in articles {
        if let Some(category) = article.category.as_deref().filter(|c| !c.is_empty()) {
            stats.record(category, article);
        }
    }
    stats
}

/// 每篇文章的每个标签计一次，不在单篇内去重
pub fn tag_stats(articles: &[Article]) -> TagStats {
    let mut stats = TagStats::new();
    for tag in articles.iter().flat_map(Article::tags) {
        stats.increment(tag);
    }
    stats
}

pub fn popular_tags(stats: &TagStats, limit: usize) -> Vec<TagCount> {
    stats.top(limit)
}

pub fn blog_stats(articles: &[Article]) -> BlogStats {
    let last_updated = articles
        .first()
        .map(|article| article.date.clone())
        .unwrap_or_else(|| Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));

    BlogStats {
        total_articles: articles.len(),
        total_categories: category_stats(articles).len(),
        total_tags: tag_stats(articles).len(),
        last_updated,
    }
}
