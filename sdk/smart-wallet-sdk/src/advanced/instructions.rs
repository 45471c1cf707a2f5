//! Raw instruction builders for the smart wallet program.
//!
//! Each builder returns a ready `Instruction`: the configured 8-byte
//! discriminator followed by the fixed-layout payload, plus the account list
//! in the exact order the program's handler expects.

use solana_sdk::instruction::{AccountMeta, Instruction};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::{system_program, sysvar};
use tracing::debug;

use crate::core::config::DeploymentConfig;
use crate::core::constants::DISCRIMINATOR_SIZE;
use crate::error::Result;
use crate::types::{PasskeyPubkey, VerifyParam};
use crate::utils::{derive_authority_address, derive_wallet_address, derive_wallet_data_address};

/// Addresses touched by a new wallet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WalletAddresses {
    pub wallet: Pubkey,
    pub wallet_data: Pubkey,
    pub authority: Pubkey,
}

impl WalletAddresses {
    pub fn derive(program_id: &Pubkey, passkey_bytes: &[u8], sequence_id: u64) -> Result<Self> {
        let (wallet, _) = derive_wallet_address(program_id, sequence_id);
        let (authority, _) = derive_authority_address(program_id, passkey_bytes, &wallet)?;
        let (wallet_data, _) = derive_wallet_data_address(program_id, &wallet);
        Ok(Self {
            wallet,
            wallet_data,
            authority,
        })
    }
}

/// Init a wallet owned by `passkey_bytes`.
///
/// # Data
/// ```text
/// [0..8]    discriminator
/// [8..41]   passkey
/// [41..49]  sequence_id: u64
/// ```
pub fn init_smart_wallet(
    config: &DeploymentConfig,
    payer: &Pubkey,
    passkey_bytes: &[u8],
    sequence_id: u64,
) -> Result<Instruction> {
    let passkey = PasskeyPubkey::try_from_slice(passkey_bytes)?;
    let addresses = WalletAddresses::derive(&config.program_id, &passkey.data, sequence_id)?;

    let mut data = Vec::with_capacity(DISCRIMINATOR_SIZE + PasskeyPubkey::LEN + 8);
    data.extend_from_slice(&config.init_smart_wallet_discriminator);
    data.extend_from_slice(&passkey.data);
    data.extend_from_slice(&sequence_id.to_le_bytes());

    let accounts = vec![
        AccountMeta::new(*payer, true),
        AccountMeta::new(addresses.wallet, false),
        AccountMeta::new(addresses.wallet_data, false),
        AccountMeta::new(addresses.authority, false),
        AccountMeta::new_readonly(system_program::id(), false),
    ];

    debug!(wallet = %addresses.wallet, sequence_id, "built init_smart_wallet instruction");

    Ok(Instruction {
        program_id: config.program_id,
        accounts,
        data,
    })
}

/// Accounts of a target instruction as forwarded to the wallet program.
/// Signer flags are cleared: the wallet PDA signs through the program, and
/// no inner account may claim signer status on its own.
pub fn forwarded_accounts(target: &Instruction) -> Vec<AccountMeta> {
    target
        .accounts
        .iter()
        .map(|meta| AccountMeta {
            pubkey: meta.pubkey,
            is_signer: false,
            is_writable: meta.is_writable,
        })
        .collect()
}

/// Verify a passkey authorization and execute `target` from the wallet.
/// Must be preceded in the same transaction by the secp256r1 instruction
/// carrying the same message, pubkey and signature.
///
/// # Data
/// ```text
/// [0..8]     discriminator
/// [8..121]   VerifyParam
/// [121..]    target instruction data
/// ```
pub fn verify_and_execute(
    config: &DeploymentConfig,
    payer: &Pubkey,
    wallet: &Pubkey,
    authority: &Pubkey,
    verify_param: &VerifyParam,
    target: &Instruction,
) -> Instruction {
    let (wallet_data, _) = derive_wallet_data_address(&config.program_id, wallet);

    let mut data = Vec::with_capacity(DISCRIMINATOR_SIZE + VerifyParam::LEN + target.data.len());
    data.extend_from_slice(&config.verify_and_execute_discriminator);
    data.extend_from_slice(&verify_param.encode());
    data.extend_from_slice(&target.data);

    let mut accounts = vec![
        AccountMeta::new(sysvar::instructions::id(), false),
        AccountMeta::new(*wallet, false),
        AccountMeta::new_readonly(wallet_data, false),
        AccountMeta::new(*authority, false),
        AccountMeta::new_readonly(target.program_id, false),
    ];
    accounts.extend(forwarded_accounts(target));
    accounts.push(AccountMeta::new(*payer, true));

    debug!(
        wallet = %wallet,
        target_program = %target.program_id,
        nonce = verify_param.msg.nonce,
        "built verify_and_execute instruction"
    );

    Instruction {
        program_id: config.program_id,
        accounts,
        data,
    }
}

/// Register `new_passkey` as an additional authenticator of `wallet`.
///
/// # Data
/// ```text
/// [0..8]     discriminator
/// [8..121]   VerifyParam
/// [121..154] new passkey
/// ```
pub fn add_authenticator(
    config: &DeploymentConfig,
    payer: &Pubkey,
    wallet: &Pubkey,
    authority: &Pubkey,
    verify_param: &VerifyParam,
    new_passkey: &PasskeyPubkey,
) -> Result<Instruction> {
    let (wallet_data, _) = derive_wallet_data_address(&config.program_id, wallet);
    let (new_authority, _) = derive_authority_address(&config.program_id, &new_passkey.data, wallet)?;

    let mut data = Vec::with_capacity(DISCRIMINATOR_SIZE + VerifyParam::LEN + PasskeyPubkey::LEN);
    data.extend_from_slice(&config.add_authenticator_discriminator);
    data.extend_from_slice(&verify_param.encode());
    data.extend_from_slice(&new_passkey.data);

    let accounts = vec![
        AccountMeta::new(*payer, true),
        AccountMeta::new_readonly(sysvar::instructions::id(), false),
        AccountMeta::new(*wallet, false),
        AccountMeta::new_readonly(wallet_data, false),
        AccountMeta::new(*authority, false),
        AccountMeta::new(new_authority, false),
        AccountMeta::new_readonly(system_program::id(), false),
    ];

    debug!(wallet = %wallet, new_authority = %new_authority, "built add_authenticator instruction");

    Ok(Instruction {
        program_id: config.program_id,
        accounts,
        data,
    })
}
