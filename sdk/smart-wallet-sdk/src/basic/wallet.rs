use solana_sdk::pubkey::Pubkey;
use tracing::{debug, info};

use crate::basic::actions::{AddAuthenticatorBuilder, InitSmartWalletBuilder, VerifyAndExecuteBuilder};
use crate::core::config::DeploymentConfig;
use crate::core::connection::{DataSlice, MemcmpFilter, ProgramAccountsQuery, SolConnection};
use crate::core::signer::PasskeySigner;
use crate::error::{Result, SmartWalletError};
use crate::types::{Message, PasskeyPubkey, SignedAuthorization, SmartWalletAuthority, SmartWalletData};
use crate::utils;

/// Entry point for one smart wallet deployment.
///
/// Holds no mutable state: the deployment is fixed at construction and every
/// call is an independent request, so a client can be shared across tasks.
#[derive(Debug, Clone)]
pub struct SmartWalletClient<C> {
    connection: C,
    config: DeploymentConfig,
}

impl<C: SolConnection> SmartWalletClient<C> {
    pub fn new(connection: C, config: DeploymentConfig) -> Self {
        Self { connection, config }
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    pub fn config(&self) -> &DeploymentConfig {
        &self.config
    }

    pub fn program_id(&self) -> Pubkey {
        self.config.program_id
    }

    /// Start building an init-wallet transaction
    pub fn init_wallet(&self) -> InitSmartWalletBuilder<'_> {
        InitSmartWalletBuilder::new(&self.config)
    }

    /// Start building a verify-and-execute transaction
    pub fn verify_and_execute(&self) -> VerifyAndExecuteBuilder<'_> {
        VerifyAndExecuteBuilder::new(&self.config)
    }

    /// Start building an add-authenticator transaction
    pub fn add_authenticator(&self) -> AddAuthenticatorBuilder<'_> {
        AddAuthenticatorBuilder::new(&self.config)
    }

    /// All authority records registered for `passkey`, across wallets.
    pub async fn find_authorities_by_passkey(&self, passkey: &PasskeyPubkey) -> Result<Vec<Pubkey>> {
        let query = ProgramAccountsQuery {
            filters: vec![
                MemcmpFilter::new(0, self.config.authority_account_discriminator),
                MemcmpFilter::new(self.config.authority_passkey_offset, passkey.data),
            ],
            data_slice: Some(DataSlice {
                offset: self.config.authority_passkey_offset,
                length: PasskeyPubkey::LEN,
            }),
        };

        let accounts = self
            .connection
            .get_program_accounts(&self.config.program_id, &query)
            .await
            .map_err(|e| SmartWalletError::network("getProgramAccounts", e))?;

        if accounts.is_empty() {
            return Err(SmartWalletError::NotFound(format!(
                "no smart wallet authority for passkey {}",
                bs58::encode(passkey.data).into_string()
            )));
        }

        debug!(count = accounts.len(), "found authorities for passkey");
        Ok(accounts.into_iter().map(|(address, _)| address).collect())
    }

    pub async fn fetch_authority_record(&self, address: &Pubkey) -> Result<SmartWalletAuthority> {
        let data = utils::fetch_account_data(&self.connection, address).await?;
        SmartWalletAuthority::from_account_data(&data, &self.config.authority_account_discriminator)
    }

    pub async fn fetch_wallet_data(&self, wallet: &Pubkey) -> Result<SmartWalletData> {
        let (wallet_data, _) = utils::derive_wallet_data_address(&self.config.program_id, wallet);
        let data = utils::fetch_account_data(&self.connection, &wallet_data).await?;
        SmartWalletData::from_account_data(&data, &self.config.wallet_data_account_discriminator)
    }

    /// Message for the record's current nonce, stamped with the block time of
    /// the latest processed slot. Returns the message and its encoding.
    pub async fn build_authorization_message(
        &self,
        record: &SmartWalletAuthority,
    ) -> Result<(Message, Vec<u8>)> {
        let slot = self
            .connection
            .get_slot()
            .await
            .map_err(|e| SmartWalletError::network("getSlot", e))?;
        let timestamp = self
            .connection
            .get_block_time(slot)
            .await
            .map_err(|e| SmartWalletError::network("getBlockTime", e))?;

        let message = Message::new(record.nonce, timestamp);
        Ok((message, message.encode().to_vec()))
    }

    /// Build the authorization message and have `signer` sign it.
    pub async fn sign_authorization(
        &self,
        signer: &impl PasskeySigner,
        record: &SmartWalletAuthority,
    ) -> Result<SignedAuthorization> {
        let passkey = signer.passkey_pubkey();
        if passkey != record.passkey_pubkey {
            return Err(SmartWalletError::Signer(format!(
                "signer passkey {} does not own this authority",
                bs58::encode(passkey.data).into_string()
            )));
        }

        let (message, message_bytes) = self.build_authorization_message(record).await?;
        let signature = signer
            .sign_message(&message_bytes)
            .await
            .map_err(SmartWalletError::Signer)?;

        info!(nonce = message.nonce, timestamp = message.timestamp, "passkey signed authorization");
        SignedAuthorization::new(message, &signature, passkey)
    }
}
