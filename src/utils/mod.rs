pub mod cache;
pub mod date;
pub mod frontmatter;
pub mod markdown;
pub mod serde_helpers;
pub mod slug;
