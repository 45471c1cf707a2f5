use solana_sdk::pubkey;
use solana_sdk::pubkey::Pubkey;

/// Seed of the wallet PDA, followed by the little-endian sequence id.
pub const SMART_WALLET_SEED: &[u8] = b"smart_wallet";

/// Seed of the wallet-data PDA, followed by the wallet address.
pub const SMART_WALLET_DATA_SEED: &[u8] = b"smart_wallet_data";

pub const PASSKEY_PUBKEY_SIZE: usize = 33;
pub const SIGNATURE_SIZE: usize = 64;
pub const DISCRIMINATOR_SIZE: usize = 8;

// Program ID of the public deployment
pub const DEFAULT_PROGRAM_ID: Pubkey = pubkey!("3jq9oBWGCUWmBynC8TTBL9KWJdGegsChJ1c8ksybGhum");

pub const SECP256R1_PROGRAM_ID: Pubkey = pubkey!("Secp256r1SigVerify1111111111111111111111111");

pub const DEFAULT_LOOKUP_TABLE: Pubkey = pubkey!("6GxBfXPQxVV17tdvpXLD7uz2tGqyEhRYYVWw8rKHMFw1");

/// Wrapped SOL mint, the relayer's default fee token.
pub const DEFAULT_FEE_TOKEN: Pubkey = pubkey!("So11111111111111111111111111111111111111112");

// Anchor discriminators of the deployed program
pub const INIT_SMART_WALLET_DISCRIMINATOR: [u8; 8] = [229, 38, 158, 24, 6, 73, 94, 101];
pub const VERIFY_AND_EXECUTE_DISCRIMINATOR: [u8; 8] = [48, 18, 40, 40, 75, 74, 147, 110];
pub const ADD_AUTHENTICATOR_DISCRIMINATOR: [u8; 8] = [131, 241, 96, 145, 76, 194, 212, 203];
pub const SMART_WALLET_AUTHORITY_DISCRIMINATOR: [u8; 8] = [164, 179, 94, 28, 254, 200, 86, 148];
pub const SMART_WALLET_DATA_DISCRIMINATOR: [u8; 8] = [124, 86, 202, 243, 63, 150, 66, 22];

/// Default offset of the passkey bytes for the authority program-account scan.
///
/// This is the deployed client's scan offset, right after the discriminator.
/// It does not match the decoded record layout (`nonce ‖ passkey ‖ wallet`,
/// passkey at byte 16), so against such accounts the scan finds nothing.
/// Deployments override it through
/// [`DeploymentConfig::authority_passkey_offset`](crate::core::config::DeploymentConfig::authority_passkey_offset).
pub const AUTHORITY_PASSKEY_OFFSET: usize = 8;
