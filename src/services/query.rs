//! 文章列表的筛选、搜索与分页
//!
//! 规则：
//! - `category` 精确匹配，`all` 表示不过滤
//! - `tags` 对任一标签做不区分大小写的子串匹配
//! - 存在 `tags` 时忽略 `search`
//! - `search` 在全部文章中搜索，会替代 `category` 筛选而不是在其结果中再筛
//! - 空字符串参数视为未提供

use crate::models::article::{Article, ArticleListResponse, ArticleQuery};

/// "全部分类" 的占位值
pub const ALL_CATEGORIES: &str = "all";

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

pub fn filter_by_category(articles: Vec<Article>, category: &str) -> Vec<Article> {
    if category == ALL_CATEGORIES {
        return articles;
    }
    articles
        .into_iter()
        .filter(|article| article.in_category(category))
        .collect()
}

pub fn filter_by_tag(articles: Vec<Article>, tag: &str) -> Vec<Article> {
    let needle = tag.to_lowercase();
    articles
        .into_iter()
        .filter(|article| article.has_tag_containing(&needle))
        .collect()
}

/// 只匹配标题和标签，不搜索正文与摘要；空白关键词匹配全部
pub fn search(articles: Vec<Article>, query: &str) -> Vec<Article> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return articles;
    }
    articles
        .into_iter()
        .filter(|article| article.matches_search(&needle))
        .collect()
}

/// 1 起始的页码分页；页码和每页条数都会被收敛到合法范围
pub fn paginate(articles: Vec<Article>, page: usize, limit: usize) -> ArticleListResponse {
    let page = page.max(1);
    let limit = limit.max(1);
    let total = articles.len();
    let total_pages = (total + limit - 1) / limit;

    let start = (page - 1).saturating_mul(limit).min(total);
    let end = start.saturating_add(limit).min(total);

    let articles = articles
        .into_iter()
        .skip(start)
        .take(end - start)
        .collect();

    ArticleListResponse {
        articles,
        total,
        page,
        total_pages,
    }
}

/// 按查询参数筛选并分页
pub fn apply(
    articles: Vec<Article>,
    query: &ArticleQuery,
    default_limit: usize,
    max_limit: usize,
) -> ArticleListResponse {
    let tag = non_empty(&query.tags);

    let articles = match (tag, non_empty(&query.search)) {
        (None, Some(keyword)) => search(articles, keyword),
        _ => {
            let articles = match non_empty(&query.category) {
                Some(category) => filter_by_category(articles, category),
                None => articles,
            };
            match tag {
                Some(tag) => filter_by_tag(articles, tag),
                None => articles,
            }
        }
    };

    let page = query.page.unwrap_or(1);
    let limit = query.limit.unwrap_or(default_limit).clamp(1, max_limit.max(1));

    paginate(articles, page, limit)
}
