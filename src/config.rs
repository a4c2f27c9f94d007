use serde::{Deserialize, Serialize};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // Server configuration
    pub server_host: String,
    pub server_port: u16,
    pub environment: String,
    pub log_level: String,

    // Content settings
    pub posts_dir: PathBuf,
    pub default_articles_per_page: usize,
    pub max_articles_per_page: usize,
    pub popular_tags_limit: usize,
    pub excerpt_length: usize,

    // Snapshot cache, 0 disables it
    pub cache_ttl: u64,

    // CORS configuration
    pub cors_allowed_origins: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_host: "0.0.0.0".to_string(),
            server_port: 3001,
            environment: "development".to_string(),
            log_level: "tech_blog=debug,tower_http=debug".to_string(),
            posts_dir: PathBuf::from("posts"),
            default_articles_per_page: 10,
            max_articles_per_page: 100,
            popular_tags_limit: 15,
            excerpt_length: 200,
            cache_ttl: 0,
            cors_allowed_origins: "*".to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Config::default();

        // PORT 优先，兼容 SERVER_PORT
        let port = env::var("PORT")
            .or_else(|_| env::var("SERVER_PORT"))
            .unwrap_or_else(|_| defaults.server_port.to_string());

        Ok(Config {
            server_host: env::var("SERVER_HOST").unwrap_or(defaults.server_host),
            server_port: port.parse()?,
            environment: env::var("ENVIRONMENT").unwrap_or(defaults.environment),
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),

            posts_dir: env::var("POSTS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.posts_dir),
            default_articles_per_page: env::var("DEFAULT_ARTICLES_PER_PAGE")
                .unwrap_or_else(|_| "10".to_string())
                .parse()?,
            max_articles_per_page: env::var("MAX_ARTICLES_PER_PAGE")
                .unwrap_or_else(|_| "100".to_string())
                .parse()?,
            popular_tags_limit: env::var("POPULAR_TAGS_LIMIT")
                .unwrap_or_else(|_| "15".to_string())
                .parse()?,
            excerpt_length: env::var("EXCERPT_LENGTH")
                .unwrap_or_else(|_| "200".to_string())
                .parse()?,

            cache_ttl: env::var("CACHE_TTL")
                .unwrap_or_else(|_| "0".to_string())
                .parse()?,

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or(defaults.cors_allowed_origins),
        })
    }

    /// 使用指定文章目录的配置，其余取默认值
    pub fn with_posts_dir(posts_dir: impl Into<PathBuf>) -> Self {
        Self {
            posts_dir: posts_dir.into(),
            ..Self::default()
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}
