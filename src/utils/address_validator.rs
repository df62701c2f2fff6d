//! 地址验证模块
//!
//! EVM 地址的 EIP-55 校验和编码与校验

use sha3::{Digest, Keccak256};

use crate::error::DerivationError;

/// 地址验证器
pub struct AddressValidator;

impl AddressValidator {
    /// 把 20 字节地址编码为 EIP-55 校验和格式
    /// https://eips.ethereum.org/EIPS/eip-55
    pub fn to_checksum(address_bytes: &[u8; 20]) -> String {
        let lower = hex::encode(address_bytes);
        let hash = Keccak256::digest(lower.as_bytes());

        let mut out = String::with_capacity(42);
        out.push_str("0x");
        for (i, ch) in lower.chars().enumerate() {
            let hash_byte = hash[i / 2];
            let nibble = if i % 2 == 0 {
                hash_byte >> 4
            } else {
                hash_byte & 0x0f
            };
            if ch.is_ascii_alphabetic() && nibble >= 8 {
                out.push(ch.to_ascii_uppercase());
            } else {
                out.push(ch);
            }
        }
        out
    }

    /// 规范化用户输入的地址（`0x` 可选，40 个十六进制字符）
    ///
    /// 全小写或全大写视为未带校验和，直接重新编码；
    /// 大小写混合时必须满足 EIP-55，否则拒绝。
    pub fn canonicalize(input: &str) -> Result<String, DerivationError> {
        let hex_part = input
            .strip_prefix("0x")
            .or_else(|| input.strip_prefix("0X"))
            .unwrap_or(input);

        if hex_part.len() != 40 {
            return Err(DerivationError::InvalidAddress(format!(
                "expected 40 hex characters, got {}",
                hex_part.len()
            )));
        }
        if !hex_part.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(DerivationError::InvalidAddress(
                "contains non-hex characters".into(),
            ));
        }

        let mut bytes = [0u8; 20];
        hex::decode_to_slice(hex_part, &mut bytes)
            .map_err(|e| DerivationError::InvalidAddress(e.to_string()))?;
        let checksummed = Self::to_checksum(&bytes);

        let has_lower = hex_part.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = hex_part.chars().any(|c| c.is_ascii_uppercase());
        if has_lower && has_upper && checksummed[2..] != *hex_part {
            return Err(DerivationError::InvalidAddress(
                "EIP-55 checksum mismatch".into(),
            ));
        }

        Ok(checksummed)
    }

    /// 验证EIP-55 Checksum
    pub fn verify_eip55_checksum(address: &str) -> bool {
        Self::canonicalize(address)
            .map(|c| c == address)
            .unwrap_or(false)
    }
}
