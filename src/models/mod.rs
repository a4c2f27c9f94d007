pub mod article;
pub mod category;
pub mod response;
pub mod stats;
pub mod tag;
