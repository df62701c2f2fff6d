//! 批量余额编排
//!
//! 按输入顺序逐条处理密文，每条密文按目录顺序逐个网络查询。
//! 进度通过 mpsc 通道推送给展示层，最终状态由任务返回。

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use serde::Serialize;
use tokio::{
    sync::mpsc::{self, UnboundedReceiver, UnboundedSender},
    task::{JoinError, JoinHandle},
};

use crate::{
    domain::{
        total_endpoint_count, BalanceEntry, Network, ProbePhase, ResolutionState, ResolutionStatus,
        SecretRecord,
    },
    infrastructure::RpcTransport,
    service::endpoint_resolver::EndpointResolver,
};

/// 进度更新中的事件
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum UpdateEvent {
    /// 状态变化（包括批次开始时的初始 pending）
    StatusChanged,
    /// 端点调用开始
    ProbeStarted { network_id: u64, endpoint: String },
    /// 端点调用结束
    ProbeFinished {
        network_id: u64,
        endpoint: String,
        success: bool,
    },
    /// 某网络的余额条目已产出
    Balance(BalanceEntry),
}

/// 推送给展示层的单条更新，附带该密文当前的进度快照
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolutionUpdate {
    pub secret_index: usize,
    pub status: ResolutionStatus,
    pub checked_endpoint_count: usize,
    pub total_endpoint_count: usize,
    #[serde(flatten)]
    pub event: UpdateEvent,
}

impl ResolutionUpdate {
    fn snapshot(secret_index: usize, state: &ResolutionState, event: UpdateEvent) -> Self {
        Self {
            secret_index,
            status: state.status(),
            checked_endpoint_count: state.checked_endpoint_count(),
            total_endpoint_count: state.total_endpoint_count(),
            event,
        }
    }
}

/// 可克隆的中止开关
#[derive(Debug, Clone, Default)]
pub struct AbortSignal(Arc<AtomicBool>);

impl AbortSignal {
    pub fn abort(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// 正在运行的批次
pub struct BatchHandle {
    updates: UnboundedReceiver<ResolutionUpdate>,
    abort: AbortSignal,
    task: JoinHandle<Vec<ResolutionState>>,
}

impl BatchHandle {
    /// 下一条进度更新；批次结束且通道排空后返回 `None`
    pub async fn next_update(&mut self) -> Option<ResolutionUpdate> {
        self.updates.recv().await
    }

    /// 当前密文处理完后停止，未开始的密文保持 pending
    pub fn abort(&self) {
        self.abort.abort();
    }

    pub fn abort_signal(&self) -> AbortSignal {
        self.abort.clone()
    }

    pub async fn join(self) -> Result<Vec<ResolutionState>, JoinError> {
        self.task.await
    }
}

pub struct BalanceOrchestrator {
    transport: Arc<dyn RpcTransport>,
    networks: Arc<Vec<Network>>,
    total_endpoint_count: usize,
    probe_timeout: Duration,
}

impl BalanceOrchestrator {
    pub fn new(
        transport: Arc<dyn RpcTransport>,
        networks: Vec<Network>,
        probe_timeout: Duration,
    ) -> Self {
        let total_endpoint_count = total_endpoint_count(&networks);
        Self {
            transport,
            networks: Arc::new(networks),
            total_endpoint_count,
            probe_timeout,
        }
    }

    pub fn networks(&self) -> &[Network] {
        &self.networks
    }

    pub fn total_endpoint_count(&self) -> usize {
        self.total_endpoint_count
    }

    /// 在后台任务中运行批次
    pub fn start(self: &Arc<Self>, records: Vec<SecretRecord>) -> BatchHandle {
        let (tx, rx) = mpsc::unbounded_channel();
        let abort = AbortSignal::default();

        let orchestrator = Arc::clone(self);
        let signal = abort.clone();
        let task = tokio::spawn(async move { orchestrator.resolve_all(&records, &tx, &signal).await });

        BatchHandle {
            updates: rx,
            abort,
            task,
        }
    }

    /// 处理整个批次并返回每条密文的最终状态
    ///
    /// 端点缓存只在本次调用内有效。接收端被丢弃不影响批次继续执行。
    pub async fn resolve_all(
        &self,
        records: &[SecretRecord],
        updates: &UnboundedSender<ResolutionUpdate>,
        abort: &AbortSignal,
    ) -> Vec<ResolutionState> {
        let resolver = EndpointResolver::new(Arc::clone(&self.transport), self.probe_timeout);

        let mut states: Vec<ResolutionState> = records
            .iter()
            .map(|r| ResolutionState::new(r.canonical_address(), r.kind(), self.total_endpoint_count))
            .collect();

        for (index, state) in states.iter().enumerate() {
            let _ = updates.send(ResolutionUpdate::snapshot(index, state, UpdateEvent::StatusChanged));
        }

        tracing::info!(
            secrets = records.len(),
            networks = self.networks.len(),
            endpoints = self.total_endpoint_count,
            "balance batch started"
        );

        for (index, state) in states.iter_mut().enumerate() {
            if abort.is_aborted() {
                tracing::info!(remaining = records.len() - index, "balance batch aborted");
                break;
            }
            self.resolve_secret(&resolver, index, state, updates).await;
        }

        tracing::info!(secrets = records.len(), "balance batch finished");
        states
    }

    async fn resolve_secret(
        &self,
        resolver: &EndpointResolver,
        index: usize,
        state: &mut ResolutionState,
        updates: &UnboundedSender<ResolutionUpdate>,
    ) {
        if !state.has_address() {
            state.advance(ResolutionStatus::Done);
            let _ = updates.send(ResolutionUpdate::snapshot(index, state, UpdateEvent::StatusChanged));
            return;
        }

        state.advance(ResolutionStatus::Checking);
        let _ = updates.send(ResolutionUpdate::snapshot(index, state, UpdateEvent::StatusChanged));

        let address = state.address.clone();
        for network in self.networks.iter() {
            let network_id = network.id();
            let entry = resolver
                .resolve_balance(&address, network, |probe| {
                    if probe.is_finished() {
                        state.record_probe();
                    }
                    let event = match probe.phase {
                        ProbePhase::Started => UpdateEvent::ProbeStarted {
                            network_id,
                            endpoint: probe.endpoint,
                        },
                        ProbePhase::Finished { success } => UpdateEvent::ProbeFinished {
                            network_id,
                            endpoint: probe.endpoint,
                            success,
                        },
                    };
                    let _ = updates.send(ResolutionUpdate::snapshot(index, state, event));
                })
                .await;

            state.push_balance(entry.clone());
            let _ = updates.send(ResolutionUpdate::snapshot(index, state, UpdateEvent::Balance(entry)));
        }

        state.advance(ResolutionStatus::Done);
        let _ = updates.send(ResolutionUpdate::snapshot(index, state, UpdateEvent::StatusChanged));

        tracing::info!(
            secret_index = index,
            kind = state.kind.as_str(),
            checked = state.checked_endpoint_count(),
            funded_networks = state.non_zero_balances().count(),
            "secret resolved"
        );
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::{domain::parse_secret_batch, error::EndpointError};

    /// 以 "good" 开头的端点返回 1 ETH，其余失败
    struct PrefixTransport;

    #[async_trait]
    impl RpcTransport for PrefixTransport {
        async fn block_number(&self, url: &str) -> Result<u64, EndpointError> {
            if url.starts_with("https://good") {
                Ok(1)
            } else {
                Err(EndpointError::Timeout)
            }
        }

        async fn get_balance(&self, url: &str, _address: &str) -> Result<u128, EndpointError> {
            if url.starts_with("https://good") {
                Ok(1_000_000_000_000_000_000)
            } else {
                Err(EndpointError::Timeout)
            }
        }
    }

    fn orchestrator() -> Arc<BalanceOrchestrator> {
        let networks = vec![
            Network::new(1, vec!["https://good".into()]).unwrap(),
            Network::new(56, vec!["https://dead1".into(), "https://good2".into()]).unwrap(),
        ];
        Arc::new(BalanceOrchestrator::new(
            Arc::new(PrefixTransport),
            networks,
            Duration::from_millis(100),
        ))
    }

    #[tokio::test]
    async fn test_failed_derivation_goes_straight_to_done() {
        let orchestrator = orchestrator();
        let records = parse_secret_batch("not a secret at all");
        let (tx, mut rx) = mpsc::unbounded_channel();

        let states = orchestrator
            .resolve_all(&records, &tx, &AbortSignal::default())
            .await;

        assert_eq!(states[0].status(), ResolutionStatus::Done);
        assert!(states[0].balances().is_empty());
        assert_eq!(states[0].checked_endpoint_count(), 0);

        drop(tx);
        let mut statuses = Vec::new();
        while let Some(update) = rx.recv().await {
            statuses.push(update.status);
        }
        assert_eq!(statuses, vec![ResolutionStatus::Pending, ResolutionStatus::Done]);
    }

    #[tokio::test]
    async fn test_abort_leaves_remaining_secrets_pending() {
        let orchestrator = orchestrator();
        let records = parse_secret_batch(
            "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed\n0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359",
        );
        let (tx, _rx) = mpsc::unbounded_channel();
        let signal = AbortSignal::default();
        signal.abort();

        let states = orchestrator.resolve_all(&records, &tx, &signal).await;
        assert_eq!(states.len(), 2);
        assert!(states.iter().all(|s| s.status() == ResolutionStatus::Pending));
    }

    #[tokio::test]
    async fn test_batch_runs_without_receiver() {
        let orchestrator = orchestrator();
        let records = parse_secret_batch("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed");
        let batch = orchestrator.start(records);

        let states = batch.join().await.unwrap();
        assert_eq!(states[0].status(), ResolutionStatus::Done);
        assert_eq!(states[0].balances().len(), 2);
        assert_eq!(states[0].checked_endpoint_count(), 3);
    }

    #[test]
    fn test_update_serialization() {
        let state = ResolutionState::new("0xabc", crate::domain::SecretKind::Address, 3);
        let update = ResolutionUpdate::snapshot(
            2,
            &state,
            UpdateEvent::ProbeFinished {
                network_id: 56,
                endpoint: "https://dead1".into(),
                success: false,
            },
        );
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json["secret_index"], 2);
        assert_eq!(json["event"], "probe_finished");
        assert_eq!(json["network_id"], 56);
        assert_eq!(json["success"], false);
        assert_eq!(json["status"], "pending");
    }
}
