use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// 标签 -> 出现次数，保持首次出现的顺序
///
/// 序列化为 JSON 对象 `{ "java": 3, "redis": 1 }`。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagStats(Vec<TagCount>);

impl TagStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment(&mut self, tag: &str) {
        match self.0.iter_mut().find(|entry| entry.tag == tag) {
            Some(entry) => entry.count += 1,
            None => self.0.push(TagCount {
                tag: tag.to_string(),
                count: 1,
            }),
        }
    }

    pub fn get(&self, tag: &str) -> Option<usize> {
        self.0.iter().find(|entry| entry.tag == tag).map(|entry| entry.count)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 按次数降序取前 `limit` 个；稳定排序，次数相同时保持首次出现顺序
    pub fn top(&self, limit: usize) -> Vec<TagCount> {
        let mut entries = self.0.clone();
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        entries.truncate(limit);
        entries
    }
}

impl Serialize for TagStats {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for entry in &self.0 {
            map.serialize_entry(&entry.tag, &entry.count)?;
        }
        map.end()
    }
}

/// GET /api/tags 响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TagsResponse {
    pub tags: TagStats,
    pub popular_tags: Vec<TagCount>,
    pub total_tags: usize,
}
