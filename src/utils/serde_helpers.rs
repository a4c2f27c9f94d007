//! front-matter 字段的宽松反序列化辅助模块
//!
//! 手写的 YAML 经常把 `date: 2024` 写成数字、把 `tags: rust` 写成单个字符串，
//! 这里把它们统一成 `String` / `Vec<String>`。

use serde::{Deserialize, Deserializer};

#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
}

impl Scalar {
    fn into_string(self) -> String {
        match self {
            Scalar::String(s) => s,
            Scalar::Integer(n) => n.to_string(),
            Scalar::Float(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
        }
    }
}

/// 标量字段 (title, category, date ...)，`null` 视为缺失
pub mod lenient_string {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Scalar>::deserialize(deserializer)?.map(Scalar::into_string))
    }
}

/// 标签字段：列表或单个字符串
pub mod string_or_seq {
    use super::*;

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Vec<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum TagsValue {
            One(Scalar),
            Many(Vec<Option<Scalar>>),
        }

        Ok(match Option::<TagsValue>::deserialize(deserializer)? {
            None => None,
            Some(TagsValue::One(s)) => Some(vec![s.into_string()]),
            Some(TagsValue::Many(items)) => Some(
                items
                    .into_iter()
                    .flatten()
                    .map(Scalar::into_string)
                    .collect(),
            ),
        })
    }
}
