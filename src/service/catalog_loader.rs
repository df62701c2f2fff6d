//! 端点目录加载
//!
//! 目录是一份 JSON 对象：键为十进制链 ID，值为 RPC 地址数组。
//! 加载失败时整个批次不启动。

use std::collections::{BTreeMap, HashSet};

use serde_json::Value;

use crate::{config::CatalogConfig, domain::Network, error::CatalogFetchError};

pub struct CatalogLoader {
    http_client: reqwest::Client,
    config: CatalogConfig,
}

impl CatalogLoader {
    /// HTTP 客户端构建失败时直接返回错误，不退回到无超时的默认客户端
    pub fn new(config: CatalogConfig) -> Result<Self, CatalogFetchError> {
        let http_client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self {
            http_client,
            config,
        })
    }

    /// 拉取并解析目录，返回按链 ID 升序排列的网络
    pub async fn load(&self) -> Result<Vec<Network>, CatalogFetchError> {
        tracing::info!(url = %self.config.url, "loading endpoint catalog");

        let response = self.http_client.get(&self.config.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogFetchError::Status(status.as_u16()));
        }

        let document: Value = response
            .json()
            .await
            .map_err(|e| CatalogFetchError::Parse(e.to_string()))?;

        parse_catalog(&document, &self.config.denied_hosts)
    }
}

/// 解析目录文档
///
/// - 根必须是对象，否则视为格式错误
/// - 无法解析为正整数的键、非数组的值会被跳过
/// - 只保留 http/https 地址，去掉模板地址（`${...}`）和屏蔽主机
/// - 同一网络内地址去重，过滤后为空的网络整体丢弃
pub fn parse_catalog(
    document: &Value,
    denied_hosts: &[String],
) -> Result<Vec<Network>, CatalogFetchError> {
    let entries = document
        .as_object()
        .ok_or_else(|| CatalogFetchError::Parse("catalog root is not an object".into()))?;

    let mut by_id: BTreeMap<u64, Network> = BTreeMap::new();
    let mut skipped = 0usize;

    for (key, value) in entries {
        let id = match key.trim().parse::<u64>() {
            Ok(id) if id > 0 => id,
            _ => {
                tracing::debug!(key = %key, "skipping catalog entry with non-numeric chain id");
                skipped += 1;
                continue;
            }
        };

        let Some(raw_urls) = value.as_array() else {
            tracing::debug!(chain_id = id, "skipping catalog entry without endpoint list");
            skipped += 1;
            continue;
        };

        let endpoints = filter_endpoints(raw_urls, denied_hosts);
        match Network::new(id, endpoints) {
            Some(network) => {
                if by_id.contains_key(&id) {
                    // "01" 与 "1" 这类重复键保留先出现的
                    tracing::debug!(chain_id = id, "duplicate chain id in catalog");
                    continue;
                }
                by_id.insert(id, network);
            }
            None => skipped += 1,
        }
    }

    let networks: Vec<Network> = by_id.into_values().collect();
    tracing::info!(
        networks = networks.len(),
        endpoints = crate::domain::total_endpoint_count(&networks),
        skipped,
        "endpoint catalog loaded"
    );
    Ok(networks)
}

fn filter_endpoints(raw_urls: &[Value], denied_hosts: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    raw_urls
        .iter()
        .filter_map(|v| v.as_str())
        .map(str::trim)
        .filter(|url| is_usable_endpoint(url, denied_hosts))
        .filter(|url| seen.insert(url.to_string()))
        .map(str::to_string)
        .collect()
}

fn is_usable_endpoint(url: &str, denied_hosts: &[String]) -> bool {
    if url.contains("${") {
        return false;
    }

    let Ok(parsed) = reqwest::Url::parse(url) else {
        return false;
    };
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return false;
    }

    let Some(host) = parsed.host_str() else {
        return false;
    };
    let host = host.to_lowercase();
    !denied_hosts.iter().any(|denied| {
        let denied = denied.to_lowercase();
        host == denied || host.ends_with(&format!(".{}", denied))
    })
}
