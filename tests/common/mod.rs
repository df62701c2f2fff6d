//! 测试辅助模块
//! 提供脚本化的 RPC 传输层，按 URL 预设应答并记录调用顺序

#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::Duration,
};

use async_trait::async_trait;
use chainprobe::{
    domain::Network, error::EndpointError, infrastructure::RpcTransport,
    service::BalanceOrchestrator,
};

/// 单个端点的预设行为
#[derive(Debug, Clone)]
pub enum Behavior {
    /// 返回该余额（最小单位），链高查询同样成功
    Answer(u128),
    /// 第一次调用应答，之后返回 HTTP 503
    AnswerOnce(u128),
    Fail(EndpointError),
    RateLimited,
    /// 永不返回，交给调用方超时
    Hang,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub url: String,
    pub method: &'static str,
}

#[derive(Default)]
pub struct ScriptedTransport {
    behaviors: Mutex<HashMap<String, Behavior>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn script(&self, url: &str, behavior: Behavior) {
        self.behaviors
            .lock()
            .unwrap()
            .insert(url.to_string(), behavior);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, url: &str) -> usize {
        self.calls().iter().filter(|c| c.url == url).count()
    }

    async fn respond(&self, url: &str, method: &'static str) -> Result<u128, EndpointError> {
        self.calls.lock().unwrap().push(Call {
            url: url.to_string(),
            method,
        });

        let behavior = {
            let mut behaviors = self.behaviors.lock().unwrap();
            let current = behaviors.get(url).cloned();
            if let Some(Behavior::AnswerOnce(_)) = current {
                behaviors.insert(
                    url.to_string(),
                    Behavior::Fail(EndpointError::HttpStatus(503)),
                );
            }
            current
        };
        match behavior {
            Some(Behavior::Answer(value)) | Some(Behavior::AnswerOnce(value)) => Ok(value),
            Some(Behavior::Fail(e)) => Err(e),
            Some(Behavior::RateLimited) => Err(EndpointError::RateLimited),
            Some(Behavior::Hang) => std::future::pending().await,
            None => Err(EndpointError::Transport("connection refused".into())),
        }
    }
}

#[async_trait]
impl RpcTransport for ScriptedTransport {
    async fn block_number(&self, url: &str) -> Result<u64, EndpointError> {
        self.respond(url, "eth_blockNumber").await.map(|_| 19_000_000)
    }

    async fn get_balance(&self, url: &str, _address: &str) -> Result<u128, EndpointError> {
        self.respond(url, "eth_getBalance").await
    }
}

/// 探测超时取短值，让 Hang 端点很快失败
pub const TEST_PROBE_TIMEOUT: Duration = Duration::from_millis(50);

pub const ONE_ETHER: u128 = 1_000_000_000_000_000_000;

pub const SAMPLE_ADDRESS: &str = "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed";

pub fn network(id: u64, urls: &[&str]) -> Network {
    Network::new(id, urls.iter().map(|u| u.to_string()).collect()).unwrap()
}

pub fn orchestrator(
    transport: Arc<ScriptedTransport>,
    networks: Vec<Network>,
) -> Arc<BalanceOrchestrator> {
    Arc::new(BalanceOrchestrator::new(
        transport,
        networks,
        TEST_PROBE_TIMEOUT,
    ))
}
