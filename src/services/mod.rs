pub mod article;
pub mod query;
pub mod stats;

pub use article::ArticleManager;
