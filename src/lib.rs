//! chainprobe - 多链原生币余额批量查询
//!
//! 输入地址、私钥或助记词，派生出 EVM 地址后在目录中的每条网络上查询余额。
//! 私钥与助记词只在内存中参与派生，不会写入日志或输出。

pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod service;
pub mod utils;

// 重新导出常用类型
pub use error::{CatalogFetchError, DerivationError, EndpointError};

pub mod prelude {
    pub use crate::{
        config::Config,
        domain::{
            parse_secret_batch, BalanceEntry, Network, ResolutionState, ResolutionStatus,
            SecretKind, SecretRecord,
        },
        error::{CatalogFetchError, DerivationError, EndpointError},
        infrastructure::{HttpRpcClient, RpcTransport},
        service::{BalanceOrchestrator, BatchHandle, CatalogLoader, ResolutionUpdate, UpdateEvent},
    };
}
