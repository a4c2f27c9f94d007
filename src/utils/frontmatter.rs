//! YAML front-matter 解析
//!
//! 文章格式：
//! ```markdown
//! ---
//! title: "Spring Boot 启动流程"
//! date: 2024-01-15
//! category: spring
//! tags: [java, spring]
//! ---
//!
//! 正文...
//! ```
//! 没有 front-matter 的文件整体作为正文处理。

use serde::Deserialize;
use std::collections::BTreeMap;

use crate::error::Result;
use crate::utils::serde_helpers::{lenient_string, string_or_seq};

/// 已知字段 + 其余任意字段
#[derive(Debug, Default, Deserialize)]
pub struct FrontMatter {
    #[serde(default, with = "lenient_string")]
    pub title: Option<String>,
    #[serde(default, with = "lenient_string")]
    pub date: Option<String>,
    #[serde(default, with = "lenient_string")]
    pub updated: Option<String>,
    #[serde(default, with = "lenient_string")]
    pub category: Option<String>,
    #[serde(default, with = "string_or_seq")]
    pub tags: Option<Vec<String>>,
    #[serde(default, with = "lenient_string")]
    pub excerpt: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// 分离 front-matter 与正文
///
/// 返回 `(yaml, body)`。第一行必须是 `---`，结束行是 `---` 或 `...`；
/// 找不到完整的块时 `yaml` 为 `None`，整个内容作为正文。
pub fn split_front_matter(content: &str) -> (Option<&str>, &str) {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let Some(first_end) = content.find('\n') else {
        return (None, content);
    };
    if content[..first_end].trim_end() != "---" {
        return (None, content);
    }

    let yaml_start = first_end + 1;
    let mut line_start = yaml_start;
    while line_start <= content.len() {
        let rest = &content[line_start..];
        let (line, next) = match rest.find('\n') {
            Some(pos) => (&rest[..pos], line_start + pos + 1),
            None => (rest, content.len()),
        };

        let fence = line.trim_end();
        if fence == "---" || fence == "..." {
            return (Some(&content[yaml_start..line_start]), &content[next..]);
        }

        if next == content.len() {
            break;
        }
        line_start = next;
    }

    (None, content)
}

/// 解析 front-matter，返回元数据与正文
pub fn parse(content: &str) -> Result<(FrontMatter, &str)> {
    let (yaml, body) = split_front_matter(content);

    let front_matter = match yaml {
        Some(yaml) if !yaml.trim().is_empty() => serde_yaml::from_str(yaml)?,
        _ => FrontMatter::default(),
    };

    Ok((front_matter, body))
}
