//! Deployment and client configuration.
//!
//! Everything that differs between deployments (program ids, discriminators,
//! lookup table) lives in [`DeploymentConfig`] and is injected into the
//! client, so several deployments can be used from one process.

use std::str::FromStr;

use serde::{Deserialize, Deserializer};
use solana_sdk::pubkey::Pubkey;
use tracing::{debug, warn};

use crate::core::constants::*;
use crate::error::{Result, SmartWalletError};

pub const RPC_URL_ENV: &str = "SMART_WALLET_RPC_URL";
pub const RELAYER_URL_ENV: &str = "SMART_WALLET_RELAYER_URL";
pub const PROGRAM_ID_ENV: &str = "SMART_WALLET_PROGRAM_ID";
pub const LOOKUP_TABLE_ENV: &str = "SMART_WALLET_LOOKUP_TABLE";

const DEFAULT_RPC_URL: &str = "http://localhost:8899";

/// On-chain ABI constants of one smart wallet deployment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DeploymentConfig {
    #[serde(deserialize_with = "deserialize_pubkey")]
    pub program_id: Pubkey,

    #[serde(deserialize_with = "deserialize_pubkey")]
    pub secp256r1_program_id: Pubkey,

    /// Lookup table used when a transaction build does not name one
    #[serde(deserialize_with = "deserialize_pubkey")]
    pub lookup_table: Pubkey,

    pub init_smart_wallet_discriminator: [u8; 8],
    pub verify_and_execute_discriminator: [u8; 8],
    pub add_authenticator_discriminator: [u8; 8],
    pub authority_account_discriminator: [u8; 8],
    pub wallet_data_account_discriminator: [u8; 8],

    /// Byte offset of the passkey inside authority account data
    pub authority_passkey_offset: usize,
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            program_id: DEFAULT_PROGRAM_ID,
            secp256r1_program_id: SECP256R1_PROGRAM_ID,
            lookup_table: DEFAULT_LOOKUP_TABLE,
            init_smart_wallet_discriminator: INIT_SMART_WALLET_DISCRIMINATOR,
            verify_and_execute_discriminator: VERIFY_AND_EXECUTE_DISCRIMINATOR,
            add_authenticator_discriminator: ADD_AUTHENTICATOR_DISCRIMINATOR,
            authority_account_discriminator: SMART_WALLET_AUTHORITY_DISCRIMINATOR,
            wallet_data_account_discriminator: SMART_WALLET_DATA_DISCRIMINATOR,
            authority_passkey_offset: AUTHORITY_PASSKEY_OFFSET,
        }
    }
}

impl DeploymentConfig {
    pub fn with_program_id(mut self, program_id: Pubkey) -> Self {
        self.program_id = program_id;
        self
    }

    pub fn with_lookup_table(mut self, lookup_table: Pubkey) -> Self {
        self.lookup_table = lookup_table;
        self
    }

    /// Parse a deployment from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| SmartWalletError::Config(e.to_string()))
    }
}

/// Endpoints plus deployment, as used by applications and the demos.
#[derive(Debug, Clone)]
pub struct SdkConfig {
    pub rpc_url: String,
    pub relayer_url: Option<String>,
    pub deployment: DeploymentConfig,
}

impl SdkConfig {
    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        load_dotenv(dotenvy::dotenv());

        let mut deployment = DeploymentConfig::default();
        if let Ok(program_id) = std::env::var(PROGRAM_ID_ENV) {
            deployment.program_id = parse_pubkey(PROGRAM_ID_ENV, &program_id)?;
        }
        if let Ok(lookup_table) = std::env::var(LOOKUP_TABLE_ENV) {
            deployment.lookup_table = parse_pubkey(LOOKUP_TABLE_ENV, &lookup_table)?;
        }

        Ok(Self {
            rpc_url: std::env::var(RPC_URL_ENV).unwrap_or_else(|_| DEFAULT_RPC_URL.to_string()),
            relayer_url: std::env::var(RELAYER_URL_ENV).ok(),
            deployment,
        })
    }
}

/// A missing `.env` is normal; anything else is logged and skipped.
/// Returns whether a file was loaded.
fn load_dotenv<T: std::fmt::Debug>(outcome: dotenvy::Result<T>) -> bool {
    match outcome {
        Ok(path) => {
            debug!(path = ?path, "loaded .env file");
            true
        },
        Err(e) if e.not_found() => false,
        Err(e) => {
            warn!(error = %e, "failed to load .env file");
            false
        },
    }
}

fn parse_pubkey(name: &str, value: &str) -> Result<Pubkey> {
    Pubkey::from_str(value.trim())
        .map_err(|e| SmartWalletError::Config(format!("{name}: {e}")))
}

fn deserialize_pubkey<'de, D>(deserializer: D) -> std::result::Result<Pubkey, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    Pubkey::from_str(&s).map_err(serde::de::Error::custom)
}
