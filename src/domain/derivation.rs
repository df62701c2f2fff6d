//! 地址派生
//!
//! 私钥与 BIP39 助记词到 EIP-55 地址的纯函数派生，不依赖网络或全局状态。

use bip39::{Language, Mnemonic};
use coins_bip32::path::DerivationPath;
use k256::ecdsa::SigningKey;
use sha3::{Digest, Keccak256};
use zeroize::Zeroizing;

use crate::{error::DerivationError, utils::AddressValidator};

/// 以太坊 BIP44 路径，第一个外部地址
pub const ETHEREUM_DERIVATION_PATH: &str = "m/44'/60'/0'/0/0";

/// 从 32 字节十六进制私钥派生地址（`0x` 前缀可选）
pub fn derive_from_private_key(key: &str) -> Result<String, DerivationError> {
    let trimmed = key.trim();
    let payload = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);

    let bytes = Zeroizing::new(
        hex::decode(payload).map_err(|e| DerivationError::InvalidKey(e.to_string()))?,
    );
    if bytes.len() != 32 {
        return Err(DerivationError::InvalidKey(format!(
            "expected 32 bytes, got {}",
            bytes.len()
        )));
    }

    let signing_key = SigningKey::from_slice(&bytes)
        .map_err(|_| DerivationError::InvalidKey("scalar is zero or out of range".into()))?;

    Ok(address_from_signing_key(&signing_key))
}

/// 从 BIP39 助记词沿 `m/44'/60'/0'/0/0` 派生地址
///
/// 词表或校验和不通过时立即返回 `InvalidMnemonic`，不会退化为随机地址。
/// 种子不使用 passphrase。
pub fn derive_from_mnemonic(phrase: &str) -> Result<String, DerivationError> {
    use coins_bip32::prelude::*;

    let normalized = Zeroizing::new(
        phrase
            .split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
            .join(" "),
    );

    let mnemonic = Mnemonic::parse_in(Language::English, normalized.as_str())
        .map_err(|e| DerivationError::InvalidMnemonic(e.to_string()))?;
    let seed = Zeroizing::new(mnemonic.to_seed(""));

    let derivation_path = ETHEREUM_DERIVATION_PATH
        .parse::<DerivationPath>()
        .map_err(|e| DerivationError::InvalidMnemonic(format!("invalid derivation path: {}", e)))?;

    let master_key = XPriv::root_from_seed(&seed[..], None)
        .map_err(|e| DerivationError::InvalidMnemonic(format!("master key: {}", e)))?;
    let derived_key = master_key
        .derive_path(&derivation_path)
        .map_err(|e| DerivationError::InvalidMnemonic(format!("child key: {}", e)))?;

    // XPriv 实现 AsRef<SigningKey>
    let signing_key: &SigningKey = derived_key.as_ref();
    Ok(address_from_signing_key(signing_key))
}

fn address_from_signing_key(signing_key: &SigningKey) -> String {
    let public_key = signing_key.verifying_key().to_encoded_point(false); // 未压缩格式
    let hash = Keccak256::digest(&public_key.as_bytes()[1..]); // 去掉 0x04 前缀

    let mut address = [0u8; 20];
    address.copy_from_slice(&hash[12..]);
    AddressValidator::to_checksum(&address)
}
