//! EVM JSON-RPC 客户端
//!
//! `RpcTransport` 是端点解析器与网络之间的接缝，测试中可替换为脚本化实现。

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use crate::{
    error::EndpointError,
    infrastructure::rpc_validator::{validate_block_number, validate_quantity, validate_rpc_response},
};

#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// 链高查询（`eth_blockNumber`），用作存活探测
    async fn block_number(&self, url: &str) -> Result<u64, EndpointError>;

    /// 原生币余额（`eth_getBalance`），最小单位
    async fn get_balance(&self, url: &str, address: &str) -> Result<u128, EndpointError>;
}

#[derive(Clone)]
pub struct HttpRpcClient {
    http_client: reqwest::Client,
}

impl HttpRpcClient {
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(timeout)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()?;
        Ok(Self {
            http_client: client,
        })
    }

    async fn call(&self, url: &str, body: &JsonRpcRequest<'_>) -> Result<Value, EndpointError> {
        let start = Instant::now();
        let response = self.http_client.post(url).json(body).send().await?;

        let status = response.status();
        if status.as_u16() == 429 {
            return Err(EndpointError::RateLimited);
        }
        if !status.is_success() {
            return Err(EndpointError::HttpStatus(status.as_u16()));
        }

        let json: Value = response.json().await?;
        let result = validate_rpc_response(&json)?.clone();
        tracing::trace!(
            endpoint = %url,
            method = body.method,
            latency_ms = start.elapsed().as_millis() as u64,
            "rpc_call_ok"
        );
        Ok(result)
    }
}

#[async_trait]
impl RpcTransport for HttpRpcClient {
    async fn block_number(&self, url: &str) -> Result<u64, EndpointError> {
        let req = JsonRpcRequest::new("eth_blockNumber", vec![]);
        let result = self.call(url, &req).await?;
        validate_block_number(&result)
    }

    async fn get_balance(&self, url: &str, address: &str) -> Result<u128, EndpointError> {
        let params = vec![
            Value::String(address.into()),
            Value::String("latest".into()),
        ];
        let req = JsonRpcRequest::new("eth_getBalance", params);
        let result = self.call(url, &req).await?;
        validate_quantity(&result)
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct JsonRpcRequest<'a> {
    jsonrpc: &'a str,
    method: &'a str,
    params: Vec<Value>,
    id: u64,
}

impl<'a> JsonRpcRequest<'a> {
    pub(crate) fn new(method: &'a str, params: Vec<Value>) -> Self {
        Self {
            jsonrpc: "2.0",
            method,
            params,
            id: 1,
        }
    }
}
