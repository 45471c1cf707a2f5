pub mod advanced;
pub mod basic;
pub mod core;
pub mod error;
pub mod relayer;
pub mod types;
pub mod utils;

pub use crate::basic::wallet::SmartWalletClient;
pub use crate::core::config::{DeploymentConfig, SdkConfig};
pub use crate::core::connection::SolConnection;
pub use crate::core::signer::PasskeySigner;
pub use crate::error::{Result, SmartWalletError};
pub use crate::relayer::RelayClient;
pub use crate::types::{
    Message, PasskeyPubkey, SignedAuthorization, SmartWalletAuthority, SmartWalletData, VerifyParam,
};
pub use crate::utils::{
    derive_authority_address, derive_wallet_address, derive_wallet_data_address, random_wallet_id,
};
