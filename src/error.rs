//! 错误类型定义
//!
//! 只有目录加载失败会中止整个批次；派生错误只影响单条密文，
//! 端点错误只影响单次探测。

use thiserror::Error;

/// 端点目录加载失败（批次级致命错误）
#[derive(Debug, Error)]
pub enum CatalogFetchError {
    #[error("catalog request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("catalog source returned HTTP {0}")]
    Status(u16),

    #[error("catalog document is malformed: {0}")]
    Parse(String),
}

/// 密文无法派生出地址（仅影响该条记录）
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DerivationError {
    #[error("invalid private key: {0}")]
    InvalidKey(String),

    #[error("invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),
}

/// 单次端点调用失败，总是可恢复的
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EndpointError {
    #[error("endpoint timed out")]
    Timeout,

    #[error("endpoint rate limited the request (HTTP 429)")]
    RateLimited,

    #[error("endpoint returned HTTP {0}")]
    HttpStatus(u16),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("invalid RPC response: {0}")]
    InvalidResponse(String),
}

impl CatalogFetchError {
    pub fn code(&self) -> &'static str {
        match self {
            CatalogFetchError::Transport(_) => "catalog_transport",
            CatalogFetchError::Status(_) => "catalog_status",
            CatalogFetchError::Parse(_) => "catalog_parse",
        }
    }
}

impl DerivationError {
    pub fn code(&self) -> &'static str {
        match self {
            DerivationError::InvalidKey(_) => "invalid_key",
            DerivationError::InvalidMnemonic(_) => "invalid_mnemonic",
            DerivationError::InvalidAddress(_) => "invalid_address",
        }
    }
}

impl EndpointError {
    pub fn code(&self) -> &'static str {
        match self {
            EndpointError::Timeout => "timeout",
            EndpointError::RateLimited => "rate_limit",
            EndpointError::HttpStatus(_) => "http_status",
            EndpointError::Transport(_) => "network",
            EndpointError::Rpc { .. } => "rpc_error",
            EndpointError::InvalidResponse(_) => "invalid_response",
        }
    }
}

impl From<reqwest::Error> for EndpointError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            return EndpointError::Timeout;
        }
        if let Some(status) = e.status() {
            if status.as_u16() == 429 {
                return EndpointError::RateLimited;
            }
            return EndpointError::HttpStatus(status.as_u16());
        }
        if e.is_decode() {
            return EndpointError::InvalidResponse(e.to_string());
        }
        EndpointError::Transport(e.to_string())
    }
}
