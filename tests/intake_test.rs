//! 密文输入与地址派生验证
//!
//! 使用 BIP39 / EIP-55 公开测试向量，确保与主流钱包派生结果一致

use chainprobe::{
    domain::{classify, derive_from_mnemonic, derive_from_private_key, parse_secret_batch, SecretKind},
    error::DerivationError,
    service::parse_catalog,
    utils::AddressValidator,
};
use serde_json::json;

const VECTOR_MNEMONIC: &str =
    "abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon abandon about";

#[test]
fn test_bip39_vector_address() {
    assert_eq!(
        derive_from_mnemonic(VECTOR_MNEMONIC).unwrap(),
        "0x9858EfFD232B4033E47d90003D23EC58E053e11f"
    );
}

#[test]
fn test_mnemonic_whitespace_and_case_are_normalized() {
    let messy = format!("  {}  ", VECTOR_MNEMONIC.to_uppercase().replace(' ', "   "));
    assert_eq!(
        derive_from_mnemonic(&messy).unwrap(),
        "0x9858EfFD232B4033E47d90003D23EC58E053e11f"
    );
}

#[test]
fn test_private_key_vectors() {
    assert_eq!(
        derive_from_private_key("0x4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318")
            .unwrap(),
        "0x2c7536E3605D9C16a7a3D7b1898e529396a65c23"
    );
    assert_eq!(
        derive_from_private_key(&format!("{:064x}", 1)).unwrap(),
        "0x7E5F4552091A69125d5DfCb7b8C2659029395Bdf"
    );
}

#[test]
fn test_zero_private_key_is_rejected() {
    let err = derive_from_private_key(&"0".repeat(64)).unwrap_err();
    assert!(matches!(err, DerivationError::InvalidKey(_)));
}

#[test]
fn test_eip55_vectors_round_trip_through_canonicalize() {
    for addr in [
        "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
        "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
        "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
        "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
    ] {
        assert_eq!(AddressValidator::canonicalize(&addr.to_lowercase()).unwrap(), addr);
        assert!(AddressValidator::verify_eip55_checksum(addr));
    }
}

#[test]
fn test_bad_mixed_case_checksum_is_rejected() {
    let records = parse_secret_batch("0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAeD");
    assert_eq!(records[0].kind(), SecretKind::Address);
    assert!(!records[0].is_derived());
}

#[test]
fn test_classification_never_fails() {
    for line in ["", "hello", "0x", "💎 emoji 💎", &"f".repeat(128)] {
        let _ = classify(line);
    }
    assert_eq!(classify(VECTOR_MNEMONIC), SecretKind::Mnemonic);
}

#[test]
fn test_catalog_document_to_networks() {
    let doc = json!({
        "8453": ["https://mainnet.base.org", "https://base.example.com"],
        "1": [
            "https://cloudflare-eth.com",
            "https://eth.example.com",
            "wss://eth.example.com"
        ],
        "999999": []
    });

    let networks = parse_catalog(&doc, &["cloudflare-eth.com".to_string()]).unwrap();
    assert_eq!(networks.len(), 2);
    assert_eq!(networks[0].id(), 1);
    assert_eq!(networks[0].endpoints(), &["https://eth.example.com".to_string()]);
    assert_eq!(networks[1].display_name(), "Base");
    assert_eq!(chainprobe::domain::total_endpoint_count(&networks), 3);
}
