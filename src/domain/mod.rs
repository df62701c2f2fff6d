//! Domain 模块
//!
//! 网络、密文、派生与解析状态等纯领域模型，不做任何 I/O

pub mod derivation;
pub mod network;
pub mod resolution;
pub mod secret;

// 重新导出常用类型
pub use derivation::{derive_from_mnemonic, derive_from_private_key, ETHEREUM_DERIVATION_PATH};
pub use network::{total_endpoint_count, Network};
pub use resolution::{BalanceEntry, ProbeEvent, ProbePhase, ResolutionState, ResolutionStatus};
pub use secret::{classify, parse_secret_batch, SecretKind, SecretRecord};
