//! 网络模型
//!
//! 目录加载时创建，之后不可变

use serde::Serialize;

/// 常见链的显示名称，其余回退为 `Chain <id>`
const KNOWN_NETWORKS: &[(u64, &str)] = &[
    (1, "Ethereum Mainnet"),
    (10, "OP Mainnet"),
    (25, "Cronos Mainnet"),
    (56, "BNB Smart Chain Mainnet"),
    (100, "Gnosis"),
    (137, "Polygon Mainnet"),
    (250, "Fantom Opera"),
    (324, "zkSync Mainnet"),
    (1101, "Polygon zkEVM"),
    (5000, "Mantle"),
    (8453, "Base"),
    (42161, "Arbitrum One"),
    (42220, "Celo Mainnet"),
    (43114, "Avalanche C-Chain"),
    (59144, "Linea"),
    (534352, "Scroll"),
];

/// 一条区块链网络及其候选 RPC 端点
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Network {
    id: u64,
    display_name: String,
    endpoints: Vec<String>,
}

impl Network {
    /// 创建网络记录；链 ID 为 0 或端点列表为空时返回 `None`
    pub fn new(id: u64, endpoints: Vec<String>) -> Option<Self> {
        if id == 0 || endpoints.is_empty() {
            return None;
        }
        Some(Self {
            id,
            display_name: display_name_for(id),
            endpoints,
        })
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn endpoints(&self) -> &[String] {
        &self.endpoints
    }
}

pub fn display_name_for(id: u64) -> String {
    KNOWN_NETWORKS
        .iter()
        .find(|(known, _)| *known == id)
        .map(|(_, name)| name.to_string())
        .unwrap_or_else(|| format!("Chain {}", id))
}

/// 所有网络端点数之和，作为进度的固定分母
pub fn total_endpoint_count(networks: &[Network]) -> usize {
    networks.iter().map(|n| n.endpoints.len()).sum()
}
