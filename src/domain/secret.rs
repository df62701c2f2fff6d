//! 用户输入的密文：分类与规范地址

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use zeroize::Zeroize;

use crate::{
    domain::derivation::{derive_from_mnemonic, derive_from_private_key},
    error::DerivationError,
    utils::AddressValidator,
};

static ADDRESS_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(0x)?[0-9a-fA-F]{40}$").expect("valid address pattern"));
static PRIVATE_KEY_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(0x)?[0-9a-fA-F]{64}$").expect("valid private key pattern"));

const MNEMONIC_MIN_WORDS: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SecretKind {
    Address,
    PrivateKey,
    Mnemonic,
}

impl SecretKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            SecretKind::Address => "address",
            SecretKind::PrivateKey => "private_key",
            SecretKind::Mnemonic => "mnemonic",
        }
    }
}

/// 按结构规则分类，第一条命中即返回，永不失败
///
/// 不校验地址校验和或助记词词表，这些留给派生阶段。
pub fn classify(line: &str) -> SecretKind {
    let line = line.trim();
    if ADDRESS_PATTERN.is_match(line) {
        SecretKind::Address
    } else if PRIVATE_KEY_PATTERN.is_match(line) {
        SecretKind::PrivateKey
    } else if line.split_whitespace().count() >= MNEMONIC_MIN_WORDS {
        SecretKind::Mnemonic
    } else {
        SecretKind::Address
    }
}

/// 一行输入及其派生结果
///
/// `canonical_address` 为空字符串表示派生失败。原始行不参与序列化，
/// 避免私钥或助记词出现在输出里。
#[derive(Clone, Serialize)]
pub struct SecretRecord {
    #[serde(skip)]
    raw_line: String,
    kind: SecretKind,
    canonical_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl SecretRecord {
    /// 分类并派生；派生错误记录在该条记录上，不向外传播
    pub fn from_line(line: &str) -> Self {
        let raw_line = line.trim().to_string();
        let kind = classify(&raw_line);

        match derive_canonical_address(kind, &raw_line) {
            Ok(canonical_address) => Self {
                raw_line,
                kind,
                canonical_address,
                error: None,
            },
            Err(e) => {
                tracing::warn!(kind = kind.as_str(), code = e.code(), "secret derivation failed");
                Self {
                    raw_line,
                    kind,
                    canonical_address: String::new(),
                    error: Some(e.to_string()),
                }
            }
        }
    }

    pub fn kind(&self) -> SecretKind {
        self.kind
    }

    pub fn canonical_address(&self) -> &str {
        &self.canonical_address
    }

    pub fn is_derived(&self) -> bool {
        !self.canonical_address.is_empty()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// 释放时抹掉内存中的原始密文
impl Drop for SecretRecord {
    fn drop(&mut self) {
        self.raw_line.zeroize();
    }
}

impl std::fmt::Debug for SecretRecord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretRecord")
            .field("raw_line", &"<redacted>")
            .field("kind", &self.kind)
            .field("canonical_address", &self.canonical_address)
            .field("error", &self.error)
            .finish()
    }
}

pub fn derive_canonical_address(kind: SecretKind, line: &str) -> Result<String, DerivationError> {
    match kind {
        SecretKind::Address => AddressValidator::canonicalize(line),
        SecretKind::PrivateKey => derive_from_private_key(line),
        SecretKind::Mnemonic => derive_from_mnemonic(line),
    }
}

/// 按行拆分输入，去掉首尾空白与空行，保持原有顺序
pub fn parse_secret_batch(text: &str) -> Vec<SecretRecord> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(SecretRecord::from_line)
        .collect()
}
