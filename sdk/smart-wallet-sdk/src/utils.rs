use rand::Rng;
use sha2::{Digest, Sha256};
use solana_sdk::address_lookup_table::{self, state::AddressLookupTable};
use solana_sdk::message::AddressLookupTableAccount;
use solana_sdk::pubkey::Pubkey;
use tracing::debug;

use crate::core::connection::SolConnection;
use crate::core::constants::{PASSKEY_PUBKEY_SIZE, SMART_WALLET_DATA_SEED, SMART_WALLET_SEED};
use crate::error::{Result, SmartWalletError};

//=============================================================================
// PDA Derivation Helpers
//=============================================================================

/// Derive the wallet PDA from program ID and sequence id
pub fn derive_wallet_address(program_id: &Pubkey, sequence_id: u64) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[SMART_WALLET_SEED, &sequence_id.to_le_bytes()], program_id)
}

/// Derive the wallet-data PDA from program ID and wallet address
pub fn derive_wallet_data_address(program_id: &Pubkey, wallet: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[SMART_WALLET_DATA_SEED, wallet.as_ref()], program_id)
}

/// Seed of the authority PDA: `sha256(passkey ‖ wallet)`.
pub fn authority_seed(passkey_bytes: &[u8], wallet: &Pubkey) -> Result<[u8; 32]> {
    if passkey_bytes.len() != PASSKEY_PUBKEY_SIZE {
        return Err(SmartWalletError::InvalidInputLength {
            field: "passkey pubkey",
            expected: PASSKEY_PUBKEY_SIZE,
            actual: passkey_bytes.len(),
        });
    }

    let mut hasher = Sha256::new();
    hasher.update(passkey_bytes);
    hasher.update(wallet.as_ref());
    Ok(hasher.finalize().into())
}

/// Derive the authority PDA binding a passkey to a wallet
pub fn derive_authority_address(
    program_id: &Pubkey,
    passkey_bytes: &[u8],
    wallet: &Pubkey,
) -> Result<(Pubkey, u8)> {
    let seed = authority_seed(passkey_bytes, wallet)?;
    let derived = Pubkey::find_program_address(&[&seed], program_id);
    debug!(wallet = %wallet, authority = %derived.0, "derived authority address");
    Ok(derived)
}

/// Random sequence id for a new wallet.
pub fn random_wallet_id() -> u64 {
    rand::thread_rng().gen()
}

//=============================================================================
// Account Fetching & Parsing
//=============================================================================

/// Fetch raw account data, failing if the account does not exist
pub async fn fetch_account_data(
    connection: &impl SolConnection,
    address: &Pubkey,
) -> Result<Vec<u8>> {
    let account = connection
        .get_account(address)
        .await
        .map_err(|e| SmartWalletError::network("getAccountInfo", e))?
        .ok_or(SmartWalletError::AccountNotFound(*address))?;

    Ok(account.data)
}

/// Parse address lookup table account data into the form v0 compilation
/// takes. Uninitialized or undecodable data is not a lookup table.
pub fn parse_lookup_table(key: Pubkey, data: &[u8]) -> Result<AddressLookupTableAccount> {
    let table = AddressLookupTable::deserialize(data).map_err(|e| {
        debug!(lookup_table = %key, error = %e, "account data is not a lookup table");
        SmartWalletError::LookupTableNotFound(key)
    })?;

    Ok(AddressLookupTableAccount {
        key,
        addresses: table.addresses.to_vec(),
    })
}

/// Fetch and parse an address lookup table. The account must be owned by
/// the address lookup table program.
pub async fn fetch_lookup_table(
    connection: &impl SolConnection,
    address: &Pubkey,
) -> Result<AddressLookupTableAccount> {
    let account = connection
        .get_account(address)
        .await
        .map_err(|e| SmartWalletError::network("getAddressLookupTable", e))?
        .ok_or(SmartWalletError::LookupTableNotFound(*address))?;

    if account.owner != address_lookup_table::program::id() {
        debug!(lookup_table = %address, owner = %account.owner, "lookup table has foreign owner");
        return Err(SmartWalletError::LookupTableNotFound(*address));
    }

    parse_lookup_table(*address, &account.data)
}
