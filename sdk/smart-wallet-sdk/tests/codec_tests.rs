mod common;

use borsh::{BorshDeserialize, BorshSerialize};
use proptest::prelude::*;
use smart_wallet_sdk::core::config::DeploymentConfig;
use smart_wallet_sdk::error::SmartWalletError;
use smart_wallet_sdk::types::{
    Message, PasskeyPubkey, SmartWalletAuthority, SmartWalletData, VerifyParam,
};
use solana_sdk::pubkey::Pubkey;

/// Mirrors of the program's account and argument structs, serialized the way
/// the program deserializes them.
#[derive(BorshSerialize, BorshDeserialize)]
struct ProgramMessage {
    nonce: u64,
    timestamp: i64,
}

#[derive(BorshSerialize, BorshDeserialize)]
struct ProgramVerifyParam {
    msg: ProgramMessage,
    sig: [u8; 64],
    pubkey: [u8; 33],
}

#[derive(BorshSerialize, BorshDeserialize)]
struct ProgramAuthority {
    nonce: u64,
    pubkey: [u8; 33],
    smart_wallet_pubkey: [u8; 32],
}

fn arb_passkey() -> impl Strategy<Value = PasskeyPubkey> {
    prop::collection::vec(any::<u8>(), 33)
        .prop_map(|bytes| PasskeyPubkey::try_from_slice(&bytes).unwrap())
}

fn arb_verify_param() -> impl Strategy<Value = VerifyParam> {
    (
        any::<u64>(),
        any::<i64>(),
        prop::collection::vec(any::<u8>(), 64),
        arb_passkey(),
    )
        .prop_map(|(nonce, timestamp, sig, pubkey)| {
            VerifyParam::new(Message::new(nonce, timestamp), &sig, pubkey).unwrap()
        })
}

proptest! {
    #[test]
    fn verify_param_round_trips(param in arb_verify_param()) {
        let bytes = param.encode();
        prop_assert_eq!(bytes.len(), VerifyParam::LEN);
        prop_assert_eq!(VerifyParam::decode(&bytes).unwrap(), param);
        prop_assert_eq!(Message::decode(&param.msg.encode()).unwrap(), param.msg);
        prop_assert_eq!(PasskeyPubkey::decode(&param.pubkey.encode()).unwrap(), param.pubkey);
    }

    #[test]
    fn verify_param_matches_borsh(param in arb_verify_param()) {
        let mirror = ProgramVerifyParam {
            msg: ProgramMessage { nonce: param.msg.nonce, timestamp: param.msg.timestamp },
            sig: param.sig,
            pubkey: param.pubkey.data,
        };
        let borsh_bytes = borsh::to_vec(&mirror).unwrap();
        let encoded = param.encode();
        prop_assert_eq!(borsh_bytes.as_slice(), encoded.as_slice());
    }

    #[test]
    fn short_verify_param_is_malformed(len in 0usize..VerifyParam::LEN) {
        let err = VerifyParam::decode(&vec![0u8; len]).unwrap_err();
        let is_malformed = matches!(
            err,
            SmartWalletError::MalformedInput { len: l, needed: 113, .. } if l == len
        );
        prop_assert!(is_malformed);
    }

    #[test]
    fn short_authority_is_malformed(len in 0usize..SmartWalletAuthority::LEN) {
        let err = SmartWalletAuthority::decode(&vec![1u8; len]).unwrap_err();
        let is_malformed = matches!(err, SmartWalletError::MalformedInput { needed: 73, .. });
        prop_assert!(is_malformed);
    }

    #[test]
    fn short_passkey_is_malformed(len in 0usize..PasskeyPubkey::LEN) {
        let err = PasskeyPubkey::decode(&vec![2u8; len]).unwrap_err();
        let is_malformed = matches!(
            err,
            SmartWalletError::MalformedInput { operation: "PasskeyPubkey::decode", len: l, needed: 33 } if l == len
        );
        prop_assert!(is_malformed);
    }

    #[test]
    fn short_wallet_data_is_malformed(len in 0usize..SmartWalletData::LEN) {
        let err = SmartWalletData::decode(&vec![0xFFu8; len]).unwrap_err();
        let is_malformed = matches!(
            err,
            SmartWalletError::MalformedInput { operation: "SmartWalletData::decode", len: l, needed: 9 } if l == len
        );
        prop_assert!(is_malformed);
    }

    #[test]
    fn authority_decodes_borsh_layout(nonce in any::<u64>(), passkey in arb_passkey(), wallet in any::<[u8; 32]>()) {
        let mirror = ProgramAuthority { nonce, pubkey: passkey.data, smart_wallet_pubkey: wallet };
        let record = SmartWalletAuthority::decode(&borsh::to_vec(&mirror).unwrap()).unwrap();
        prop_assert_eq!(record.nonce, nonce);
        prop_assert_eq!(record.passkey_pubkey, passkey);
        prop_assert_eq!(record.smart_wallet_pubkey, Pubkey::new_from_array(wallet));
    }
}

#[test]
fn test_passkey_length_is_checked() {
    for len in [0usize, 32, 34, 65] {
        let err = PasskeyPubkey::try_from_slice(&vec![2u8; len]).unwrap_err();
        match err {
            SmartWalletError::InvalidInputLength {
                expected, actual, ..
            } => {
                assert_eq!(expected, 33);
                assert_eq!(actual, len);
            },
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

#[test]
fn test_message_decode_short_buffer() {
    let err = Message::decode(&[0u8; 15]).unwrap_err();
    assert!(matches!(
        err,
        SmartWalletError::MalformedInput {
            operation: "Message::decode",
            len: 15,
            needed: 16
        }
    ));
}

#[test]
fn test_decode_ignores_trailing_bytes() {
    let msg = Message::new(3, 4);
    let mut bytes = msg.encode().to_vec();
    bytes.extend_from_slice(&[0xEE; 10]);
    assert_eq!(Message::decode(&bytes).unwrap(), msg);
}

#[test]
fn test_authority_account_data_round_trip() {
    let config = DeploymentConfig::default();
    let record = SmartWalletAuthority {
        nonce: 41,
        passkey_pubkey: PasskeyPubkey::new([3u8; 33]),
        smart_wallet_pubkey: Pubkey::new_unique(),
    };
    let data = common::authority_account_data(&config, &record);
    assert_eq!(data.len(), 8 + SmartWalletAuthority::LEN);

    let decoded =
        SmartWalletAuthority::from_account_data(&data, &config.authority_account_discriminator)
            .unwrap();
    assert_eq!(decoded, record);
}

#[test]
fn test_authority_account_data_truncated() {
    let config = DeploymentConfig::default();
    let err = SmartWalletAuthority::from_account_data(
        &config.authority_account_discriminator[..5],
        &config.authority_account_discriminator,
    )
    .unwrap_err();
    assert!(matches!(
        err,
        SmartWalletError::MalformedInput {
            len: 5,
            needed: 8,
            ..
        }
    ));
}

#[test]
fn test_wallet_data_rejects_authority_discriminator() {
    let config = DeploymentConfig::default();
    let data = common::wallet_data_account_data(&config, &SmartWalletData { bump: 255, id: 7 });
    let err = SmartWalletData::from_account_data(&data, &config.authority_account_discriminator)
        .unwrap_err();
    assert!(matches!(err, SmartWalletError::InvalidAccountData(_)));

    let decoded =
        SmartWalletData::from_account_data(&data, &config.wallet_data_account_discriminator)
            .unwrap();
    assert_eq!(decoded, SmartWalletData { bump: 255, id: 7 });
}
