use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tokio::time::sleep;

/// 过期项清理间隔
const SWEEP_INTERVAL: Duration = Duration::from_secs(300);

/// 缓存项
#[derive(Debug, Clone)]
struct CacheItem<T> {
    value: T,
    expires_at: Instant,
}

/// 简单的内存 TTL 缓存
#[derive(Debug, Clone)]
pub struct Cache<T: Clone + Send + Sync> {
    data: Arc<RwLock<HashMap<String, CacheItem<T>>>>,
    default_ttl: Duration,
}

impl<T: Clone + Send + Sync + 'static> Cache<T> {
    /// 创建新的缓存实例；在 tokio 运行时内会启动后台清理任务
    pub fn new(default_ttl: Duration) -> Self {
        let cache = Self {
            data: Arc::new(RwLock::new(HashMap::new())),
            default_ttl,
        };

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let data_ref = Arc::downgrade(&cache.data);
            handle.spawn(async move {
                loop {
                    sleep(SWEEP_INTERVAL).await;
                    if !Self::cleanup_expired(&data_ref) {
                        break;
                    }
                }
            });
        }

        cache
    }

    pub fn set(&self, key: String, value: T) {
        self.set_with_ttl(key, value, self.default_ttl)
    }

    pub fn set_with_ttl(&self, key: String, value: T, ttl: Duration) {
        let item = CacheItem {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.data.write().insert(key, item);
    }

    /// 获取未过期的缓存项；过期项顺便删除
    pub fn get(&self, key: &str) -> Option<T> {
        let now = Instant::now();
        {
            let data = self.data.read();
            match data.get(key) {
                Some(item) if item.expires_at > now => return Some(item.value.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        self.data.write().retain(|_, item| item.expires_at > now);
        None
    }

    /// 清理过期项，缓存已被释放时返回 false
    fn cleanup_expired(data: &Weak<RwLock<HashMap<String, CacheItem<T>>>>) -> bool {
        match data.upgrade() {
            Some(data) => {
                let now = Instant::now();
                data.write().retain(|_, item| item.expires_at > now);
                true
            }
            None => false,
        }
    }
}
