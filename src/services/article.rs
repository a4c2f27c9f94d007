use std::cmp::Reverse;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, SystemTime};

use tracing::{debug, info, warn};

use crate::{
    config::Config,
    error::Result,
    models::{
        article::{Article, LoadError, LoadReport, RESERVED_KEYS},
        category::CategoryStats,
        stats::BlogStats,
        tag::{TagCount, TagStats},
    },
    services::{query, stats},
    utils::{
        cache::Cache,
        date::{mtime_day, parse_date},
        frontmatter,
        markdown::MarkdownProcessor,
        slug::{is_safe_slug, slug_from_path, POST_EXTENSION},
    },
};

const SNAPSHOT_KEY: &str = "articles";

/// 从文章目录加载 Markdown 文章
///
/// 每次调用都会重新读取磁盘；配置了 `cache_ttl` 时，完整列表会在 TTL 内复用。
#[derive(Clone)]
pub struct ArticleManager {
    posts_dir: PathBuf,
    excerpt_length: usize,
    markdown_processor: MarkdownProcessor,
    snapshot_cache: Option<Cache<Arc<LoadReport>>>,
}

impl ArticleManager {
    pub fn new(config: &Config) -> Self {
        let snapshot_cache = (config.cache_ttl > 0)
            .then(|| Cache::new(Duration::from_secs(config.cache_ttl)));

        Self {
            posts_dir: config.posts_dir.clone(),
            excerpt_length: config.excerpt_length,
            markdown_processor: MarkdownProcessor::new(),
            snapshot_cache,
        }
    }

    pub fn posts_dir(&self) -> &Path {
        &self.posts_dir
    }

    /// 加载全部文章，单个文件失败只记录不中断
    ///
    /// 文章按 date 降序；无法解析的日期排在最后，同一日期保持文件名顺序。
    /// 读不了文章目录本身时返回错误。
    pub async fn load_all(&self) -> Result<Arc<LoadReport>> {
        if let Some(report) = self
            .snapshot_cache
            .as_ref()
            .and_then(|cache| cache.get(SNAPSHOT_KEY))
        {
            debug!("Serving {} articles from snapshot cache", report.articles.len());
            return Ok(report);
        }

        let mut files = Vec::new();
        let mut entries = tokio::fs::read_dir(&self.posts_dir).await?;
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_dir() {
                continue;
            }
            let path = entry.path();
            if let Some(slug) = slug_from_path(&path) {
                files.push((slug, path));
            }
        }
        files.sort_by(|a, b| a.1.file_name().cmp(&b.1.file_name()));

        let mut report = LoadReport::default();
        for (slug, path) in files {
            match self.read_article(&path, slug).await {
                Ok(article) => report.articles.push(article),
                Err(e) => {
                    warn!("Skipping article {}: {}", path.display(), e);
                    report.errors.push(LoadError {
                        file: file_name(&path),
                        message: e.to_string(),
                    });
                }
            }
        }

        sort_by_date_desc(&mut report.articles);

        debug!(
            "Loaded {} articles from {} ({} skipped)",
            report.articles.len(),
            self.posts_dir.display(),
            report.errors.len()
        );

        let report = Arc::new(report);
        if let Some(cache) = &self.snapshot_cache {
            cache.set(SNAPSHOT_KEY.to_string(), report.clone());
        }
        Ok(report)
    }

    /// 全部文章，按 date 降序
    pub async fn get_all_articles(&self) -> Result<Vec<Article>> {
        Ok(self.load_all().await?.articles.clone())
    }

    /// 根据 slug 读取单篇文章；不存在或 slug 不安全时返回 `None`
    pub async fn get_article_by_slug(&self, slug: &str) -> Result<Option<Article>> {
        if !is_safe_slug(slug) {
            warn!("Rejected unsafe article slug: {:?}", slug);
            return Ok(None);
        }

        let path = self.posts_dir.join(format!("{}.{}", slug, POST_EXTENSION));
        match tokio::fs::metadata(&path).await {
            Ok(metadata) if metadata.is_file() => {}
            Ok(_) => return Ok(None),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        }

        self.read_article(&path, slug.to_string()).await.map(Some)
    }

    pub async fn get_articles_by_category(&self, category: &str) -> Result<Vec<Article>> {
        let articles = self.get_all_articles().await?;
        Ok(articles
            .into_iter()
            .filter(|article| article.in_category(category))
            .collect())
    }

    /// 标题和标签的不区分大小写搜索，空白关键词返回全部
    pub async fn search_articles(&self, keyword: &str) -> Result<Vec<Article>> {
        let articles = self.get_all_articles().await?;
        Ok(query::search(articles, keyword))
    }

    pub async fn get_category_stats(&self) -> Result<CategoryStats> {
        let report = self.load_all().await?;
        Ok(stats::category_stats(&report.articles))
    }

    pub async fn get_tag_stats(&self) -> Result<TagStats> {
        let report = self.load_all().await?;
        Ok(stats::tag_stats(&report.articles))
    }

    pub async fn get_popular_tags(&self, limit: usize) -> Result<Vec<TagCount>> {
        let tag_stats = self.get_tag_stats().await?;
        Ok(stats::popular_tags(&tag_stats, limit))
    }

    pub async fn get_blog_stats(&self) -> Result<BlogStats> {
        let report = self.load_all().await?;
        Ok(stats::blog_stats(&report.articles))
    }

    async fn read_article(&self, path: &Path, slug: String) -> Result<Article> {
        let raw = tokio::fs::read_to_string(path).await?;
        let modified = tokio::fs::metadata(path).await?.modified()?;
        self.build_article(slug, &raw, modified)
    }

    /// 解析单个文件内容并计算派生字段
    pub fn build_article(&self, slug: String, raw: &str, modified: SystemTime) -> Result<Article> {
        let (front_matter, body) = frontmatter::parse(raw)?;

        let file_day = mtime_day(modified);
        let date = non_blank(front_matter.date).unwrap_or_else(|| file_day.clone());
        let updated = resolve_updated(&slug, non_blank(front_matter.updated), &date, &file_day);

        let mut extra = front_matter.extra;
        for key in RESERVED_KEYS {
            extra.remove(*key);
        }

        let excerpt = non_blank(front_matter.excerpt).or_else(|| {
            non_blank(Some(
                self.markdown_processor
                    .generate_excerpt(body, self.excerpt_length),
            ))
        });

        let word_count = self.markdown_processor.count_words(body);

        Ok(Article {
            slug,
            title: front_matter.title,
            category: front_matter.category,
            tags: front_matter.tags,
            excerpt,
            extra,
            date,
            updated,
            content: body.to_string(),
            html_content: self.markdown_processor.to_html(body),
            word_count,
            read_time: self.markdown_processor.format_reading_time(word_count),
        })
    }

    /// 启动时检查文章目录
    pub async fn verify_posts_dir(&self) -> Result<()> {
        let metadata = tokio::fs::metadata(&self.posts_dir).await?;
        if !metadata.is_dir() {
            return Err(std::io::Error::new(
                ErrorKind::InvalidInput,
                format!("{} is not a directory", self.posts_dir.display()),
            )
            .into());
        }
        info!("Serving articles from {}", self.posts_dir.display());
        Ok(())
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// 更新日期：front-matter 的 updated 优先；否则文件修改日期晚于创建日期时取修改日期
///
/// updated 不会早于 date，早于 date 的 front-matter 值会被忽略。
fn resolve_updated(
    slug: &str,
    explicit: Option<String>,
    date: &str,
    file_day: &str,
) -> Option<String> {
    let created_at = parse_date(date);

    if let Some(explicit) = explicit {
        match (parse_date(&explicit), created_at) {
            (Some(updated_at), Some(created_at)) if updated_at < created_at => {
                warn!(
                    "Ignoring updated {} earlier than date {} in {}",
                    explicit, date, slug
                );
            }
            _ => return Some(explicit),
        }
    }

    match (parse_date(file_day), created_at) {
        (Some(modified_at), Some(created_at)) if modified_at > created_at => {
            Some(file_day.to_string())
        }
        _ => None,
    }
}

fn sort_by_date_desc(articles: &mut Vec<Article>) {
    let mut keyed: Vec<_> = articles
        .drain(..)
        .map(|article| (parse_date(&article.date), article))
        .collect();
    keyed.sort_by_key(|(date, _)| Reverse(*date));
    articles.extend(keyed.into_iter().map(|(_, article)| article));
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn at(rfc3339: &str) -> SystemTime {
        SystemTime::from(DateTime::parse_from_rfc3339(rfc3339).unwrap().with_timezone(&Utc))
    }

    fn manager_for(dir: &Path) -> ArticleManager {
        ArticleManager::new(&Config::with_posts_dir(dir))
    }

    fn write_post(dir: &Path, name: &str, content: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn set_mtime(path: &Path, time: SystemTime) {
        File::options()
            .write(true)
            .open(path)
            .unwrap()
            .set_modified(time)
            .unwrap();
    }

    #[test]
    fn test_front_matter_date_is_verbatim() {
        let manager = manager_for(Path::new("posts"));
        let article = manager
            .build_article(
                "a".into(),
                "---\ndate: 2024-01-01 08:30:00\n---\nbody",
                at("2024-05-01T00:00:00Z"),
            )
            .unwrap();

        assert_eq!(article.date, "2024-01-01 08:30:00");
    }

    #[test]
    fn test_missing_date_uses_mtime_day() {
        let manager = manager_for(Path::new("posts"));
        let article = manager
            .build_article("a".into(), "# no front matter", at("2024-05-01T13:45:00Z"))
            .unwrap();

        assert_eq!(article.date, "2024-05-01");
        assert_eq!(article.updated, None);
        assert!(article.title.is_none());
    }

    #[test]
    fn test_explicit_updated_wins() {
        let manager = manager_for(Path::new("posts"));
        let article = manager
            .build_article(
                "a".into(),
                "---\ndate: 2024-01-01\nupdated: 2024-02-01\n---\nbody",
                at("2024-09-09T00:00:00Z"),
            )
            .unwrap();

        assert_eq!(article.updated.as_deref(), Some("2024-02-01"));
    }

    #[test]
    fn test_updated_from_newer_mtime() {
        let manager = manager_for(Path::new("posts"));
        let article = manager
            .build_article(
                "a".into(),
                "---\ndate: 2024-01-01\n---\nbody",
                at("2024-03-10T09:00:00Z"),
            )
            .unwrap();
        assert_eq!(article.updated.as_deref(), Some("2024-03-10"));

        let untouched = manager
            .build_article(
                "b".into(),
                "---\ndate: 2024-01-01\n---\nbody",
                at("2024-01-01T23:00:00Z"),
            )
            .unwrap();
        assert_eq!(untouched.updated, None);
    }

    #[test]
    fn test_updated_earlier_than_date_is_ignored() {
        let manager = manager_for(Path::new("posts"));
        let article = manager
            .build_article(
                "a".into(),
                "---\ndate: 2024-06-01\nupdated: 2024-01-01\n---\nbody",
                at("2024-05-01T00:00:00Z"),
            )
            .unwrap();

        assert_eq!(article.updated, None);
    }

    #[test]
    fn test_derived_fields() {
        let manager = manager_for(Path::new("posts"));
        let raw = "---\ntitle: 入门\nslug: hijacked\nwordCount: 999\nseries: jvm\n---\n\
                   # 标题\n\nHello world\n";
        let article = manager
            .build_article("intro".into(), raw, at("2024-01-01T00:00:00Z"))
            .unwrap();

        assert_eq!(article.slug, "intro");
        assert_eq!(article.word_count, 4);
        assert_eq!(article.read_time, "1 分钟");
        assert!(article.html_content.contains("<h1>标题</h1>"));
        assert_eq!(article.excerpt.as_deref(), Some("标题 Hello world"));
        assert!(!article.extra.contains_key("slug"));
        assert!(!article.extra.contains_key("wordCount"));
        assert_eq!(article.extra.get("series"), Some(&serde_json::json!("jvm")));
    }

    #[test]
    fn test_front_matter_excerpt_preserved() {
        let manager = manager_for(Path::new("posts"));
        let article = manager
            .build_article(
                "a".into(),
                "---\nexcerpt: 手写摘要\n---\nbody text",
                at("2024-01-01T00:00:00Z"),
            )
            .unwrap();

        assert_eq!(article.excerpt.as_deref(), Some("手写摘要"));
    }

    #[test]
    fn test_sort_unparseable_dates_last() {
        let manager = manager_for(Path::new("posts"));
        let mtime = at("2024-01-01T00:00:00Z");
        let mut articles = vec![
            manager.build_article("x".into(), "---\ndate: someday\n---\n", mtime).unwrap(),
            manager.build_article("old".into(), "---\ndate: 2020-01-01\n---\n", mtime).unwrap(),
            manager.build_article("new".into(), "---\ndate: 2024-01-01\n---\n", mtime).unwrap(),
        ];

        sort_by_date_desc(&mut articles);
        let slugs: Vec<_> = articles.iter().map(|a| a.slug.as_str()).collect();
        assert_eq!(slugs, vec!["new", "old", "x"]);
    }

    #[tokio::test]
    async fn test_get_all_articles_sorted_and_aggregated() {
        let dir = TempDir::new().unwrap();
        write_post(
            dir.path(),
            "a.md",
            "---\ntitle: A\ndate: 2024-01-01\ncategory: java\ntags: [x]\n---\nA body",
        );
        write_post(
            dir.path(),
            "b.md",
            "---\ntitle: B\ndate: 2024-02-01\ncategory: db\ntags: [x, y]\n---\nB body",
        );
        write_post(dir.path(), "notes.txt", "ignored");
        fs::create_dir(dir.path().join("drafts.md")).unwrap();

        let manager = manager_for(dir.path());

        let articles = manager.get_all_articles().await.unwrap();
        let slugs: Vec<_> = articles.iter().map(|a| a.slug.as_str()).collect();
        assert_eq!(slugs, vec!["b", "a"]);

        let tags = manager.get_tag_stats().await.unwrap();
        assert_eq!(serde_json::to_value(&tags).unwrap(), serde_json::json!({"x": 2, "y": 1}));

        let categories = manager.get_category_stats().await.unwrap();
        assert_eq!(categories.len(), 2);
        assert!(categories.iter().all(|c| c.count == 1));

        let popular = manager.get_popular_tags(1).await.unwrap();
        assert_eq!(popular, vec![TagCount { tag: "x".into(), count: 2 }]);

        let stats = manager.get_blog_stats().await.unwrap();
        assert_eq!(stats.total_articles, 2);
        assert_eq!(stats.last_updated, "2024-02-01");

        let java = manager.get_articles_by_category("java").await.unwrap();
        assert_eq!(java.len(), 1);
        assert_eq!(java[0].slug, "a");
    }

    #[tokio::test]
    async fn test_bad_file_is_isolated() {
        let dir = TempDir::new().unwrap();
        write_post(dir.path(), "good.md", "---\ntitle: Good\ndate: 2024-01-01\n---\nok");
        write_post(dir.path(), "broken.md", "---\ntitle: [unclosed\n---\nbody");

        let manager = manager_for(dir.path());
        let report = manager.load_all().await.unwrap();

        assert_eq!(report.articles.len(), 1);
        assert_eq!(report.articles[0].slug, "good");
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].file, "broken.md");
    }

    #[tokio::test]
    async fn test_missing_posts_dir_is_an_error() {
        let dir = TempDir::new().unwrap();
        let manager = manager_for(&dir.path().join("nope"));

        assert!(manager.load_all().await.is_err());
        assert!(manager.verify_posts_dir().await.is_err());
    }

    #[tokio::test]
    async fn test_mtime_reconciliation_from_disk() {
        let dir = TempDir::new().unwrap();
        let path = write_post(dir.path(), "undated.md", "---\ntitle: Undated\n---\nbody");
        set_mtime(&path, at("2023-07-08T10:00:00Z"));
        let dated = write_post(dir.path(), "dated.md", "---\ndate: 2023-01-01\n---\nbody");
        set_mtime(&dated, at("2023-07-08T10:00:00Z"));

        let manager = manager_for(dir.path());

        let undated = manager.get_article_by_slug("undated").await.unwrap().unwrap();
        assert_eq!(undated.date, "2023-07-08");
        assert_eq!(undated.updated, None);

        let dated = manager.get_article_by_slug("dated").await.unwrap().unwrap();
        assert_eq!(dated.updated.as_deref(), Some("2023-07-08"));
    }

    #[tokio::test]
    async fn test_get_article_by_slug() {
        let dir = TempDir::new().unwrap();
        write_post(dir.path(), "hello.md", "---\ntitle: Hello\n---\nbody");

        let manager = manager_for(dir.path());

        let article = manager.get_article_by_slug("hello").await.unwrap();
        assert_eq!(article.unwrap().title.as_deref(), Some("Hello"));

        assert!(manager.get_article_by_slug("does-not-exist").await.unwrap().is_none());
        assert!(manager.get_article_by_slug("../hello").await.unwrap().is_none());
        assert!(manager.get_article_by_slug("..").await.unwrap().is_none());
        assert!(manager.get_article_by_slug("").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_articles() {
        let dir = TempDir::new().unwrap();
        write_post(
            dir.path(),
            "a.md",
            "---\ntitle: Redis 持久化\ndate: 2024-01-01\ntags: [NoSQL]\n---\nmysql in body",
        );
        write_post(
            dir.path(),
            "b.md",
            "---\ntitle: MySQL 索引\ndate: 2024-02-01\ntags: [SQL]\n---\nbody",
        );

        let manager = manager_for(dir.path());

        let hits = manager.search_articles("sql").await.unwrap();
        let slugs: Vec<_> = hits.iter().map(|a| a.slug.as_str()).collect();
        assert_eq!(slugs, vec!["b", "a"]);

        assert_eq!(manager.search_articles("redis").await.unwrap().len(), 1);
        assert!(manager.search_articles("somewordnotanywhere").await.unwrap().is_empty());
        assert_eq!(manager.search_articles("  ").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_word_count_is_stable_across_loads() {
        let dir = TempDir::new().unwrap();
        write_post(
            dir.path(),
            "a.md",
            "---\ndate: 2024-01-01\n---\n你好 world `code` ```\nblock\n```",
        );

        let manager = manager_for(dir.path());
        let first = manager.get_all_articles().await.unwrap();
        let second = manager.get_all_articles().await.unwrap();

        assert_eq!(first[0].word_count, 3);
        assert_eq!(first[0].word_count, second[0].word_count);
        assert_eq!(first[0].read_time, second[0].read_time);
    }

    #[tokio::test]
    async fn test_snapshot_cache_reuses_listing() {
        let dir = TempDir::new().unwrap();
        write_post(dir.path(), "a.md", "---\ndate: 2024-01-01\n---\nA");

        let mut config = Config::with_posts_dir(dir.path());
        config.cache_ttl = 60;
        let manager = ArticleManager::new(&config);

        assert_eq!(manager.get_all_articles().await.unwrap().len(), 1);
        write_post(dir.path(), "b.md", "---\ndate: 2024-02-01\n---\nB");
        assert_eq!(manager.get_all_articles().await.unwrap().len(), 1);

        let uncached = manager_for(dir.path());
        assert_eq!(uncached.get_all_articles().await.unwrap().len(), 2);
    }
}
