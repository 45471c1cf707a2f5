use async_trait::async_trait;
use solana_sdk::account::Account;
use solana_sdk::clock::{Slot, UnixTimestamp};
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use std::error::Error;

pub type ConnectionError = Box<dyn Error + Send + Sync>;

/// Byte-compare filter applied server-side to account data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemcmpFilter {
    pub offset: usize,
    pub bytes: Vec<u8>,
}

impl MemcmpFilter {
    pub fn new(offset: usize, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            offset,
            bytes: bytes.into(),
        }
    }

    pub fn matches(&self, data: &[u8]) -> bool {
        data.get(self.offset..self.offset + self.bytes.len()) == Some(self.bytes.as_slice())
    }
}

/// Window of account data returned by a program-account scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataSlice {
    pub offset: usize,
    pub length: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgramAccountsQuery {
    pub filters: Vec<MemcmpFilter>,
    pub data_slice: Option<DataSlice>,
}

impl ProgramAccountsQuery {
    /// True when every filter matches the full account data.
    pub fn matches(&self, data: &[u8]) -> bool {
        self.filters.iter().all(|f| f.matches(data))
    }

    /// Apply the data slice the way the RPC node does (clamped, never panics).
    pub fn slice<'a>(&self, data: &'a [u8]) -> &'a [u8] {
        match self.data_slice {
            Some(DataSlice { offset, length }) => {
                let start = offset.min(data.len());
                let end = offset.saturating_add(length).min(data.len());
                &data[start..end]
            },
            None => data,
        }
    }
}

/// The RPC surface the SDK needs. Each call is a single request; retries
/// are left to the caller.
#[async_trait]
pub trait SolConnection: Send + Sync {
    async fn get_latest_blockhash(&self) -> Result<Hash, ConnectionError>;
    async fn get_account(&self, pubkey: &Pubkey) -> Result<Option<Account>, ConnectionError>;
    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        query: &ProgramAccountsQuery,
    ) -> Result<Vec<(Pubkey, Account)>, ConnectionError>;
    /// Current slot at `processed` commitment
    async fn get_slot(&self) -> Result<Slot, ConnectionError>;
    async fn get_block_time(&self, slot: Slot) -> Result<UnixTimestamp, ConnectionError>;
}
