//! 端点解析器
//!
//! 对单个网络查询地址余额：先复用缓存中的可用端点（先做存活探测），
//! 否则按目录顺序逐个尝试，第一个成功的写入缓存。
//! 永远不返回错误，全部失败时给出零余额条目。

use std::{future::Future, sync::Arc, time::Duration};

use crate::{
    domain::{BalanceEntry, Network, ProbeEvent},
    error::EndpointError,
    infrastructure::{EndpointCache, RpcTransport},
    utils::{format_units, NATIVE_DECIMALS},
};

pub struct EndpointResolver {
    transport: Arc<dyn RpcTransport>,
    cache: EndpointCache,
    probe_timeout: Duration,
}

impl EndpointResolver {
    pub fn new(transport: Arc<dyn RpcTransport>, probe_timeout: Duration) -> Self {
        Self {
            transport,
            cache: EndpointCache::new(),
            probe_timeout,
        }
    }

    pub fn cache(&self) -> &EndpointCache {
        &self.cache
    }

    /// 查询 `address` 在 `network` 上的原生币余额
    ///
    /// 每次端点调用前后各上报一次 `ProbeEvent`；缓存命中后的余额查询不单独上报。
    pub async fn resolve_balance<F>(
        &self,
        address: &str,
        network: &Network,
        mut on_probe: F,
    ) -> BalanceEntry
    where
        F: FnMut(ProbeEvent) + Send,
    {
        let network_id = network.id();
        let mut evicted: Option<String> = None;

        if let Some(cached) = self.cache.get(network_id).await {
            let url = cached.endpoint_url;
            match self.try_cached(&url, address, network_id, &mut on_probe).await {
                Ok(raw) => {
                    tracing::debug!(chain_id = network_id, endpoint = %url, "rpc_cache_hit");
                    return self.balance_entry(network, raw, &url);
                }
                Err(e) => {
                    tracing::debug!(
                        chain_id = network_id,
                        endpoint = %url,
                        code = e.code(),
                        error = %e,
                        "cached endpoint failed, evicting"
                    );
                    self.cache.evict(network_id, &url).await;
                    evicted = Some(url);
                }
            }
        }

        for url in network.endpoints() {
            if evicted.as_deref() == Some(url.as_str()) {
                continue;
            }

            on_probe(ProbeEvent::started(url));
            match self.call(self.transport.get_balance(url, address)).await {
                Ok(raw) => {
                    self.cache.store(network_id, url).await;
                    on_probe(ProbeEvent::finished(url, true));
                    return self.balance_entry(network, raw, url);
                }
                Err(e) => {
                    on_probe(ProbeEvent::finished(url, false));
                    tracing::debug!(
                        chain_id = network_id,
                        endpoint = %url,
                        code = e.code(),
                        error = %e,
                        "rpc_probe_fail"
                    );
                }
            }
        }

        tracing::warn!(
            chain_id = network_id,
            endpoints = network.endpoints().len(),
            "no working endpoint, reporting zero balance"
        );
        BalanceEntry::unresolved(network_id, network.display_name())
    }

    /// 缓存端点：存活探测通过后再查余额，任一步失败都视为端点失效
    ///
    /// 两次调用合计一次完成事件，成功标志取余额查询的结果。
    async fn try_cached<F>(
        &self,
        url: &str,
        address: &str,
        network_id: u64,
        on_probe: &mut F,
    ) -> Result<u128, EndpointError>
    where
        F: FnMut(ProbeEvent) + Send,
    {
        on_probe(ProbeEvent::started(url));
        if let Err(e) = self.call(self.transport.block_number(url)).await {
            on_probe(ProbeEvent::finished(url, false));
            return Err(e);
        }

        self.cache.mark_validated(network_id, true).await;
        let balance = self.call(self.transport.get_balance(url, address)).await;
        on_probe(ProbeEvent::finished(url, balance.is_ok()));
        balance
    }

    async fn call<T, Fut>(&self, fut: Fut) -> Result<T, EndpointError>
    where
        Fut: Future<Output = Result<T, EndpointError>>,
    {
        tokio::time::timeout(self.probe_timeout, fut)
            .await
            .unwrap_or(Err(EndpointError::Timeout))
    }

    fn balance_entry(&self, network: &Network, raw: u128, url: &str) -> BalanceEntry {
        BalanceEntry {
            network_id: network.id(),
            network_display_name: network.display_name().to_string(),
            amount: format_units(raw, NATIVE_DECIMALS),
            source_endpoint: url.to_string(),
        }
    }
}
