//! [`SolConnection`] for the nonblocking Solana RPC client.

use async_trait::async_trait;
use solana_account_decoder::{UiAccountEncoding, UiDataSliceConfig};
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_client::rpc_config::{RpcAccountInfoConfig, RpcProgramAccountsConfig};
use solana_client::rpc_filter::{Memcmp, RpcFilterType};
use solana_sdk::account::Account;
use solana_sdk::clock::{Slot, UnixTimestamp};
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;

use crate::core::connection::{ConnectionError, ProgramAccountsQuery, SolConnection};

#[async_trait]
impl SolConnection for RpcClient {
    async fn get_latest_blockhash(&self) -> Result<Hash, ConnectionError> {
        Ok(RpcClient::get_latest_blockhash(self).await?)
    }

    async fn get_account(&self, pubkey: &Pubkey) -> Result<Option<Account>, ConnectionError> {
        Ok(self
            .get_account_with_commitment(pubkey, self.commitment())
            .await?
            .value)
    }

    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        query: &ProgramAccountsQuery,
    ) -> Result<Vec<(Pubkey, Account)>, ConnectionError> {
        let filters = query
            .filters
            .iter()
            .map(|f| RpcFilterType::Memcmp(Memcmp::new_raw_bytes(f.offset, f.bytes.clone())))
            .collect();

        let config = RpcProgramAccountsConfig {
            filters: Some(filters),
            account_config: RpcAccountInfoConfig {
                encoding: Some(UiAccountEncoding::Base64),
                data_slice: query.data_slice.map(|s| UiDataSliceConfig {
                    offset: s.offset,
                    length: s.length,
                }),
                commitment: Some(self.commitment()),
                ..RpcAccountInfoConfig::default()
            },
            ..RpcProgramAccountsConfig::default()
        };

        Ok(self
            .get_program_accounts_with_config(program_id, config)
            .await?)
    }

    async fn get_slot(&self) -> Result<Slot, ConnectionError> {
        Ok(self
            .get_slot_with_commitment(CommitmentConfig::processed())
            .await?)
    }

    async fn get_block_time(&self, slot: Slot) -> Result<UnixTimestamp, ConnectionError> {
        Ok(RpcClient::get_block_time(self, slot).await?)
    }
}
