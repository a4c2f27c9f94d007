use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::models::article::Article;

/// 单个分类的统计
#[derive(Debug, Clone, serde::Serialize)]
pub struct CategoryStat {
    pub name: String,
    pub count: usize,
    pub articles: Vec<Article>,
    pub description: String,
    pub icon: &'static str,
}

/// 分类名 -> 统计，保持首次出现的顺序
///
/// 序列化为 JSON 对象 `{ "java": {...}, "database": {...} }`。
#[derive(Debug, Clone, Default)]
pub struct CategoryStats(Vec<CategoryStat>);

impl CategoryStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&CategoryStat> {
        self.0.iter().find(|stat| stat.name == name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryStat> {
        self.0.iter()
    }

    /// 把文章计入对应分类，分类不存在时按需创建
    pub fn record(&mut self, name: &str, article: &Article) {
        let index = match self.0.iter().position(|stat| stat.name == name) {
            Some(index) => index,
            None => {
                self.0.push(CategoryStat {
                    name: name.to_string(),
                    count: 0,
                    articles: Vec::new(),
                    description: format!("Articles about {}", name),
                    icon: category_icon(name),
                });
                self.0.len() - 1
            }
        };

        let stat = &mut self.0[index];
        stat.count += 1;
        stat.articles.push(article.clone());
    }
}

impl Serialize for CategoryStats {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.len()))?;
        for stat in self.iter() {
            map.serialize_entry(&stat.name, stat)?;
        }
        map.end()
    }
}

pub const DEFAULT_CATEGORY_ICON: &str = "📂";

/// 分类图标，按小写名称查表
pub fn category_icon(category: &str) -> &'static str {
    match category.to_lowercase().as_str() {
        "java" => "☕",
        "database" => "🗄️",
        "spring" => "🌱",
        "devops" => "🚀",
        "tools" => "🛠️",
        "architecture" => "🏗️",
        "security" => "🔒",
        "performance" => "⚡",
        "testing" => "🧪",
        "javascript" => "📜",
        "frontend" => "🎨",
        "backend" => "⚙️",
        "api" => "🔌",
        "microservices" => "🔗",
        "daily" => "📝",
        "thinking" => "💡",
        "interview" => "🦜",
        "programming" => "💻",
        "interests" => "🌸",
        "algorithms" => "📐",
        "deeplearning" => "🤖",
        _ => DEFAULT_CATEGORY_ICON,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::article::fixtures::article;

    #[test]
    fn test_category_icon() {
        assert_eq!(category_icon("java"), "☕");
        assert_eq!(category_icon("Java"), "☕");
        assert_eq!(category_icon("DeepLearning"), "🤖");
        assert_eq!(category_icon("gardening"), DEFAULT_CATEGORY_ICON);
    }

    #[test]
    fn test_record_and_serialize_in_first_seen_order() {
        let mut stats = CategoryStats::new();
        let a = article("a", "2024-02-01", Some("spring"), &[]);
        let b = article("b", "2024-01-01", Some("java"), &[]);
        let c = article("c", "2023-12-01", Some("spring"), &[]);

        stats.record("spring", &a);
        stats.record("java", &b);
        stats.record("spring", &c);

        assert_eq!(stats.len(), 2);
        let spring = stats.get("spring").unwrap();
        assert_eq!(spring.count, 2);
        assert_eq!(spring.description, "Articles about spring");
        assert_eq!(spring.icon, "🌱");

        let json = serde_json::to_string(&stats).unwrap();
        let spring_pos = json.find("\"spring\":").unwrap();
        let java_pos = json.find("\"java\":").unwrap();
        assert!(spring_pos < java_pos);
    }
}
