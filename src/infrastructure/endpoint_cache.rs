//! 可用端点缓存
//!
//! 每个网络最多一条记录，生命周期与一次批处理绑定，由端点解析器独占持有。
//! 探测失败时立即移除。

use std::{collections::HashMap, sync::Arc};

use tokio::sync::RwLock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointCacheEntry {
    pub network_id: u64,
    pub endpoint_url: String,
    /// 最近一次使用前是否通过了存活探测
    pub last_validated: bool,
}

#[derive(Debug, Clone, Default)]
pub struct EndpointCache {
    entries: Arc<RwLock<HashMap<u64, EndpointCacheEntry>>>,
}

impl EndpointCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, network_id: u64) -> Option<EndpointCacheEntry> {
        self.entries.read().await.get(&network_id).cloned()
    }

    /// 记录可用端点（刚成功应答，视为已验证）
    pub async fn store(&self, network_id: u64, endpoint_url: &str) {
        let mut entries = self.entries.write().await;
        entries.insert(
            network_id,
            EndpointCacheEntry {
                network_id,
                endpoint_url: endpoint_url.to_string(),
                last_validated: true,
            },
        );
    }

    pub async fn mark_validated(&self, network_id: u64, validated: bool) {
        if let Some(entry) = self.entries.write().await.get_mut(&network_id) {
            entry.last_validated = validated;
        }
    }

    /// 仅当缓存的仍是该端点时才移除，避免误删并发写入的新值
    pub async fn evict(&self, network_id: u64, endpoint_url: &str) -> bool {
        let mut entries = self.entries.write().await;
        match entries.get(&network_id) {
            Some(entry) if entry.endpoint_url == endpoint_url => {
                entries.remove(&network_id);
                true
            }
            _ => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
