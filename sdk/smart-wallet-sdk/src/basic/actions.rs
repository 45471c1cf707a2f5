use solana_sdk::hash::Hash;
use solana_sdk::instruction::Instruction;
use solana_sdk::message::{v0, Message as LegacyMessage, VersionedMessage};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::{Transaction, VersionedTransaction};
use tracing::info;

use crate::advanced::instructions::{self, WalletAddresses};
use crate::advanced::secp256r1::new_secp256r1_instruction;
use crate::core::config::DeploymentConfig;
use crate::core::connection::SolConnection;
use crate::error::{Result, SmartWalletError};
use crate::types::{PasskeyPubkey, SignedAuthorization};
use crate::utils;

async fn latest_blockhash(connection: &impl SolConnection) -> Result<Hash> {
    connection
        .get_latest_blockhash()
        .await
        .map_err(|e| SmartWalletError::network("getLatestBlockhash", e))
}

/// Compile `[secp256r1 verify, program ix]` into an unsigned v0 transaction
/// that references `lookup_table`.
async fn compile_with_signature_check(
    connection: &impl SolConnection,
    config: &DeploymentConfig,
    payer: &Pubkey,
    authorization: &SignedAuthorization,
    program_ix: Instruction,
    lookup_table: &Pubkey,
) -> Result<VersionedTransaction> {
    let recent_blockhash = latest_blockhash(connection).await?;
    let lookup_table = utils::fetch_lookup_table(connection, lookup_table).await?;

    let verify_ix = new_secp256r1_instruction(
        &config.secp256r1_program_id,
        authorization.message_bytes(),
        &authorization.passkey_pubkey(),
        authorization.signature(),
    )?;

    let message = v0::Message::try_compile(
        payer,
        &[verify_ix, program_ix],
        &[lookup_table],
        recent_blockhash,
    )?;

    let num_signatures = message.header.num_required_signatures as usize;
    Ok(VersionedTransaction {
        signatures: vec![Signature::default(); num_signatures],
        message: VersionedMessage::V0(message),
    })
}

pub struct InitSmartWalletBuilder<'a> {
    config: &'a DeploymentConfig,
    payer: Option<Pubkey>,
    passkey: Option<Vec<u8>>,
    sequence_id: u64,
}

impl<'a> InitSmartWalletBuilder<'a> {
    /// Starts with a random sequence id; override it with `with_sequence_id`.
    pub fn new(config: &'a DeploymentConfig) -> Self {
        Self {
            config,
            payer: None,
            passkey: None,
            sequence_id: utils::random_wallet_id(),
        }
    }

    pub fn with_payer(mut self, payer: Pubkey) -> Self {
        self.payer = Some(payer);
        self
    }

    /// Compressed secp256r1 public key, 33 bytes
    pub fn with_passkey(mut self, passkey: impl Into<Vec<u8>>) -> Self {
        self.passkey = Some(passkey.into());
        self
    }

    pub fn with_sequence_id(mut self, sequence_id: u64) -> Self {
        self.sequence_id = sequence_id;
        self
    }

    pub fn sequence_id(&self) -> u64 {
        self.sequence_id
    }

    /// Wallet, wallet-data and authority addresses the transaction will create
    pub fn addresses(&self) -> Result<WalletAddresses> {
        let passkey = self.passkey.as_ref().ok_or(SmartWalletError::MissingField("passkey"))?;
        WalletAddresses::derive(&self.config.program_id, passkey, self.sequence_id)
    }

    pub fn instruction(&self) -> Result<Instruction> {
        let payer = self.payer.ok_or(SmartWalletError::MissingField("payer"))?;
        let passkey = self.passkey.as_ref().ok_or(SmartWalletError::MissingField("passkey"))?;
        instructions::init_smart_wallet(self.config, &payer, passkey, self.sequence_id)
    }

    pub async fn build_transaction(&self, connection: &impl SolConnection) -> Result<Transaction> {
        let ix = self.instruction()?;
        let payer = self.payer.ok_or(SmartWalletError::MissingField("payer"))?;

        let recent_blockhash = latest_blockhash(connection).await?;
        let tx = Transaction::new_unsigned(LegacyMessage::new_with_blockhash(
            &[ix],
            Some(&payer),
            &recent_blockhash,
        ));

        info!(
            payer = %payer,
            sequence_id = self.sequence_id,
            "assembled init_smart_wallet transaction"
        );
        Ok(tx)
    }
}

pub struct VerifyAndExecuteBuilder<'a> {
    config: &'a DeploymentConfig,
    payer: Option<Pubkey>,
    wallet: Option<Pubkey>,
    authority: Option<Pubkey>,
    authorization: Option<SignedAuthorization>,
    target: Option<Instruction>,
    lookup_table: Option<Pubkey>,
}

impl<'a> VerifyAndExecuteBuilder<'a> {
    pub fn new(config: &'a DeploymentConfig) -> Self {
        Self {
            config,
            payer: None,
            wallet: None,
            authority: None,
            authorization: None,
            target: None,
            lookup_table: None,
        }
    }

    pub fn with_payer(mut self, payer: Pubkey) -> Self {
        self.payer = Some(payer);
        self
    }

    pub fn with_wallet(mut self, wallet: Pubkey) -> Self {
        self.wallet = Some(wallet);
        self
    }

    pub fn with_authority(mut self, authority: Pubkey) -> Self {
        self.authority = Some(authority);
        self
    }

    pub fn with_authorization(mut self, authorization: SignedAuthorization) -> Self {
        self.authorization = Some(authorization);
        self
    }

    /// Instruction to run with the wallet PDA as signer
    pub fn with_instruction(mut self, ix: Instruction) -> Self {
        self.target = Some(ix);
        self
    }

    /// Lookup table for this transaction; defaults to the deployment's.
    pub fn with_lookup_table(mut self, lookup_table: Pubkey) -> Self {
        self.lookup_table = Some(lookup_table);
        self
    }

    pub fn instruction(&self) -> Result<Instruction> {
        let payer = self.payer.ok_or(SmartWalletError::MissingField("payer"))?;
        let wallet = self.wallet.ok_or(SmartWalletError::MissingField("wallet"))?;
        let authority = self
            .authority
            .ok_or(SmartWalletError::MissingField("authority"))?;
        let authorization = self
            .authorization
            .as_ref()
            .ok_or(SmartWalletError::MissingField("authorization"))?;
        let target = self
            .target
            .as_ref()
            .ok_or(SmartWalletError::MissingField("instruction"))?;

        Ok(instructions::verify_and_execute(
            self.config,
            &payer,
            &wallet,
            &authority,
            &authorization.verify_param(),
            target,
        ))
    }

    pub async fn build_transaction(
        &self,
        connection: &impl SolConnection,
    ) -> Result<VersionedTransaction> {
        let program_ix = self.instruction()?;
        let payer = self.payer.ok_or(SmartWalletError::MissingField("payer"))?;
        let authorization = self
            .authorization
            .as_ref()
            .ok_or(SmartWalletError::MissingField("authorization"))?;
        let lookup_table = self.lookup_table.unwrap_or(self.config.lookup_table);

        let tx = compile_with_signature_check(
            connection,
            self.config,
            &payer,
            authorization,
            program_ix,
            &lookup_table,
        )
        .await?;

        info!(
            payer = %payer,
            lookup_table = %lookup_table,
            nonce = authorization.message().nonce,
            "assembled verify_and_execute transaction"
        );
        Ok(tx)
    }
}

pub struct AddAuthenticatorBuilder<'a> {
    config: &'a DeploymentConfig,
    payer: Option<Pubkey>,
    wallet: Option<Pubkey>,
    authority: Option<Pubkey>,
    authorization: Option<SignedAuthorization>,
    new_passkey: Option<Vec<u8>>,
    lookup_table: Option<Pubkey>,
}

impl<'a> AddAuthenticatorBuilder<'a> {
    pub fn new(config: &'a DeploymentConfig) -> Self {
        Self {
            config,
            payer: None,
            wallet: None,
            authority: None,
            authorization: None,
            new_passkey: None,
            lookup_table: None,
        }
    }

    pub fn with_payer(mut self, payer: Pubkey) -> Self {
        self.payer = Some(payer);
        self
    }

    pub fn with_wallet(mut self, wallet: Pubkey) -> Self {
        self.wallet = Some(wallet);
        self
    }

    pub fn with_authority(mut self, authority: Pubkey) -> Self {
        self.authority = Some(authority);
        self
    }

    pub fn with_authorization(mut self, authorization: SignedAuthorization) -> Self {
        self.authorization = Some(authorization);
        self
    }

    pub fn with_new_passkey(mut self, passkey: impl Into<Vec<u8>>) -> Self {
        self.new_passkey = Some(passkey.into());
        self
    }

    pub fn with_lookup_table(mut self, lookup_table: Pubkey) -> Self {
        self.lookup_table = Some(lookup_table);
        self
    }

    pub fn instruction(&self) -> Result<Instruction> {
        let payer = self.payer.ok_or(SmartWalletError::MissingField("payer"))?;
        let wallet = self.wallet.ok_or(SmartWalletError::MissingField("wallet"))?;
        let authority = self
            .authority
            .ok_or(SmartWalletError::MissingField("authority"))?;
        let authorization = self
            .authorization
            .as_ref()
            .ok_or(SmartWalletError::MissingField("authorization"))?;
        let new_passkey = self
            .new_passkey
            .as_ref()
            .ok_or(SmartWalletError::MissingField("new passkey"))?;
        let new_passkey = PasskeyPubkey::try_from_slice(new_passkey)?;

        instructions::add_authenticator(
            self.config,
            &payer,
            &wallet,
            &authority,
            &authorization.verify_param(),
            &new_passkey,
        )
    }

    pub async fn build_transaction(
        &self,
        connection: &impl SolConnection,
    ) -> Result<VersionedTransaction> {
        let program_ix = self.instruction()?;
        let payer = self.payer.ok_or(SmartWalletError::MissingField("payer"))?;
        let authorization = self
            .authorization
            .as_ref()
            .ok_or(SmartWalletError::MissingField("authorization"))?;
        let lookup_table = self.lookup_table.unwrap_or(self.config.lookup_table);

        let tx = compile_with_signature_check(
            connection,
            self.config,
            &payer,
            authorization,
            program_ix,
            &lookup_table,
        )
        .await?;

        info!(payer = %payer, "assembled add_authenticator transaction");
        Ok(tx)
    }
}
