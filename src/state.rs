use crate::{config::Config, services::ArticleManager};

/// 应用程序的共享状态
#[derive(Clone)]
pub struct AppState {
    /// 应用配置
    pub config: Config,

    /// 文章管理器
    pub article_manager: ArticleManager,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let article_manager = ArticleManager::new(&config);
        Self {
            config,
            article_manager,
        }
    }

    /// 检查是否为开发环境
    pub fn is_development(&self) -> bool {
        self.config.is_development()
    }
}
