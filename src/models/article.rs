use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 由 Markdown 文件实时构建的文章
///
/// 已知字段之外的 front-matter 原样保留在 `extra` 中，序列化时平铺到对象顶层。
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
    /// 创建日期
    pub date: String,
    /// 更新日期，未更新时为 null
    pub updated: Option<String>,
    pub content: String,
    pub html_content: String,
    pub word_count: usize,
    pub read_time: String,
}

/// 派生字段名，front-matter 中的同名键会被丢弃
pub const RESERVED_KEYS: &[&str] = &["slug", "content", "htmlContent", "wordCount", "readTime"];

impl Article {
    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or(&[])
    }

    /// 标题或任一标签包含关键词（不区分大小写），`needle` 需已转小写
    pub fn matches_search(&self, needle: &str) -> bool {
        let title_match = self
            .title
            .as_deref()
            .map_or(false, |title| title.to_lowercase().contains(needle));

        title_match || self.has_tag_containing(needle)
    }

    /// 任一标签包含子串（不区分大小写），`needle` 需已转小写
    pub fn has_tag_containing(&self, needle: &str) -> bool {
        self.tags()
            .iter()
            .any(|tag| tag.to_lowercase().contains(needle))
    }

    pub fn in_category(&self, category: &str) -> bool {
        self.category.as_deref() == Some(category)
    }
}

/// 单个文件的加载失败
#[derive(Debug, Clone, Serialize)]
pub struct LoadError {
    pub file: String,
    pub message: String,
}

/// 一次完整加载的结果：成功的文章 + 被跳过的文件
#[derive(Debug, Clone, Default, Serialize)]
pub struct LoadReport {
    pub articles: Vec<Article>,
    pub errors: Vec<LoadError>,
}

/// GET /api/articles 查询参数
#[derive(Debug, Deserialize, Default)]
pub struct ArticleQuery {
    pub category: Option<String>,
    pub search: Option<String>,
    pub tags: Option<String>,
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleListResponse {
    pub articles: Vec<Article>,
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
}
