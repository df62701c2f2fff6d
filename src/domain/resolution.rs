//! 单条密文的解析状态
//!
//! 由编排器推进，展示层只读。状态严格单调：pending → checking → done。

use std::fmt;

use serde::{ser::SerializeStruct, Serialize, Serializer};

use crate::domain::secret::SecretKind;

/// 解析状态机
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionStatus {
    /// 尚未开始
    Pending,
    /// 正在逐个网络查询
    Checking,
    /// 所有网络都已产出余额条目（或派生失败）
    Done,
}

impl ResolutionStatus {
    /// 只允许向前推进；派生失败时可从 Pending 直接到 Done
    pub fn can_transition_to(&self, target: &Self) -> bool {
        use ResolutionStatus::*;

        matches!(
            (self, target),
            (Pending, Checking) | (Pending, Done) | (Checking, Done)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Checking => "checking",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for ResolutionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// 某网络上的原生币余额
///
/// 所有端点都失败时 `amount` 为 `"0"`，`source_endpoint` 为空。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BalanceEntry {
    pub network_id: u64,
    pub network_display_name: String,
    pub amount: String,
    pub source_endpoint: String,
}

impl BalanceEntry {
    pub fn unresolved(network_id: u64, network_display_name: &str) -> Self {
        Self {
            network_id,
            network_display_name: network_display_name.to_string(),
            amount: "0".to_string(),
            source_endpoint: String::new(),
        }
    }

    pub fn is_resolved(&self) -> bool {
        !self.source_endpoint.is_empty()
    }

    pub fn is_zero(&self) -> bool {
        self.amount == "0"
    }
}

/// 单次端点调用的阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum ProbePhase {
    Started,
    Finished { success: bool },
}

/// 端点解析器上报的探测事件
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeEvent {
    pub endpoint: String,
    #[serde(flatten)]
    pub phase: ProbePhase,
}

impl ProbeEvent {
    pub fn started(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            phase: ProbePhase::Started,
        }
    }

    pub fn finished(endpoint: &str, success: bool) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            phase: ProbePhase::Finished { success },
        }
    }

    /// 回调语义下的 success 参数：开始时恒为 false
    pub fn success(&self) -> bool {
        matches!(self.phase, ProbePhase::Finished { success: true })
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.phase, ProbePhase::Finished { .. })
    }
}

/// 展示层看到的单条密文视图
#[derive(Debug, Clone)]
pub struct ResolutionState {
    pub address: String,
    pub kind: SecretKind,
    status: ResolutionStatus,
    checked_endpoint_count: usize,
    total_endpoint_count: usize,
    balances: Vec<BalanceEntry>,
}

impl ResolutionState {
    pub fn new(address: &str, kind: SecretKind, total_endpoint_count: usize) -> Self {
        Self {
            address: address.to_string(),
            kind,
            status: ResolutionStatus::Pending,
            checked_endpoint_count: 0,
            total_endpoint_count,
            balances: Vec::new(),
        }
    }

    pub fn status(&self) -> ResolutionStatus {
        self.status
    }

    pub fn checked_endpoint_count(&self) -> usize {
        self.checked_endpoint_count
    }

    pub fn total_endpoint_count(&self) -> usize {
        self.total_endpoint_count
    }

    pub fn balances(&self) -> &[BalanceEntry] {
        &self.balances
    }

    /// 地址为空表示派生失败
    pub fn has_address(&self) -> bool {
        !self.address.is_empty()
    }

    /// 已检查端点占比，分母为 0 时视为 0
    pub fn progress(&self) -> f64 {
        if self.total_endpoint_count == 0 {
            return 0.0;
        }
        self.checked_endpoint_count as f64 / self.total_endpoint_count as f64
    }

    pub fn non_zero_balances(&self) -> impl Iterator<Item = &BalanceEntry> {
        self.balances.iter().filter(|b| !b.is_zero())
    }

    /// 推进状态；非法转换（包括回退）返回 false 且不修改
    pub fn advance(&mut self, target: ResolutionStatus) -> bool {
        if !self.status.can_transition_to(&target) {
            tracing::warn!(from = %self.status, to = %target, "illegal resolution transition");
            return false;
        }
        self.status = target;
        true
    }

    /// 记录一次完成的端点调用，计数不超过分母
    pub fn record_probe(&mut self) -> bool {
        if self.status != ResolutionStatus::Checking
            || self.checked_endpoint_count >= self.total_endpoint_count
        {
            return false;
        }
        self.checked_endpoint_count += 1;
        true
    }

    /// Done 之后不再接受余额条目
    pub fn push_balance(&mut self, entry: BalanceEntry) -> bool {
        if self.status != ResolutionStatus::Checking {
            return false;
        }
        self.balances.push(entry);
        true
    }
}

impl Serialize for ResolutionState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("ResolutionState", 7)?;
        s.serialize_field("address", &self.address)?;
        s.serialize_field("kind", &self.kind)?;
        s.serialize_field("status", &self.status)?;
        s.serialize_field("progress", &self.progress())?;
        s.serialize_field("checked_endpoint_count", &self.checked_endpoint_count)?;
        s.serialize_field("total_endpoint_count", &self.total_endpoint_count)?;
        s.serialize_field("balances", &self.balances)?;
        s.end()
    }
}
