#![allow(dead_code)]

use std::collections::HashMap;

use async_trait::async_trait;
use p256::ecdsa::signature::Signer;
use p256::ecdsa::{Signature as P256Signature, SigningKey};
use smart_wallet_sdk::core::config::DeploymentConfig;
use smart_wallet_sdk::core::connection::{ConnectionError, ProgramAccountsQuery, SolConnection};
use smart_wallet_sdk::core::signer::PasskeySigner;
use smart_wallet_sdk::types::{PasskeyPubkey, SmartWalletAuthority, SmartWalletData};
use solana_sdk::account::Account;
use solana_sdk::clock::{Slot, UnixTimestamp};
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// In-memory chain state answering the SDK's RPC surface.
pub struct MockConnection {
    pub accounts: HashMap<Pubkey, Account>,
    pub blockhash: Hash,
    pub slot: Slot,
    pub block_time: UnixTimestamp,
    pub fail_blockhash: bool,
    pub fail_slot: bool,
    /// Every program-account query received, in order
    pub queries: Mutex<Vec<ProgramAccountsQuery>>,
}

impl Default for MockConnection {
    fn default() -> Self {
        Self {
            accounts: HashMap::new(),
            blockhash: Hash::new_unique(),
            slot: 1_000,
            block_time: 1_700_000_000,
            fail_blockhash: false,
            fail_slot: false,
            queries: Mutex::new(Vec::new()),
        }
    }
}

impl MockConnection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_account(mut self, address: Pubkey, owner: Pubkey, data: Vec<u8>) -> Self {
        self.accounts.insert(
            address,
            Account {
                lamports: 1_000_000,
                data,
                owner,
                executable: false,
                rent_epoch: 0,
            },
        );
        self
    }

    pub async fn recorded_queries(&self) -> Vec<ProgramAccountsQuery> {
        self.queries.lock().await.clone()
    }
}

#[async_trait]
impl SolConnection for MockConnection {
    async fn get_latest_blockhash(&self) -> Result<Hash, ConnectionError> {
        if self.fail_blockhash {
            return Err("connection refused".into());
        }
        Ok(self.blockhash)
    }

    async fn get_account(&self, pubkey: &Pubkey) -> Result<Option<Account>, ConnectionError> {
        Ok(self.accounts.get(pubkey).cloned())
    }

    async fn get_program_accounts(
        &self,
        program_id: &Pubkey,
        query: &ProgramAccountsQuery,
    ) -> Result<Vec<(Pubkey, Account)>, ConnectionError> {
        self.queries.lock().await.push(query.clone());

        let mut matched: Vec<(Pubkey, Account)> = self
            .accounts
            .iter()
            .filter(|(_, account)| account.owner == *program_id && query.matches(&account.data))
            .map(|(address, account)| {
                let mut account = account.clone();
                account.data = query.slice(&account.data).to_vec();
                (*address, account)
            })
            .collect();
        matched.sort_by_key(|(address, _)| *address);
        Ok(matched)
    }

    async fn get_slot(&self) -> Result<Slot, ConnectionError> {
        if self.fail_slot {
            return Err("slot unavailable".into());
        }
        Ok(self.slot)
    }

    async fn get_block_time(&self, slot: Slot) -> Result<UnixTimestamp, ConnectionError> {
        if slot != self.slot {
            return Err(format!("no block time for slot {slot}").into());
        }
        Ok(self.block_time)
    }
}

/// Software p256 key standing in for a platform passkey.
pub struct SoftPasskey {
    pub key: SigningKey,
}

impl SoftPasskey {
    pub fn random() -> Self {
        Self {
            key: SigningKey::random(&mut rand::rngs::OsRng),
        }
    }

    pub fn pubkey(&self) -> PasskeyPubkey {
        let point = self.key.verifying_key().to_encoded_point(true);
        PasskeyPubkey::try_from_slice(point.as_bytes()).unwrap()
    }
}

#[async_trait]
impl PasskeySigner for SoftPasskey {
    fn passkey_pubkey(&self) -> PasskeyPubkey {
        self.pubkey()
    }

    async fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>, String> {
        let signature: P256Signature = self.key.sign(message);
        // The precompile only accepts low-S signatures
        let signature = signature.normalize_s().unwrap_or(signature);
        Ok(signature.to_bytes().to_vec())
    }
}

/// Signer whose authenticator always refuses.
pub struct RejectingPasskey(pub PasskeyPubkey);

#[async_trait]
impl PasskeySigner for RejectingPasskey {
    fn passkey_pubkey(&self) -> PasskeyPubkey {
        self.0
    }

    async fn sign_message(&self, _message: &[u8]) -> Result<Vec<u8>, String> {
        Err("user cancelled".to_string())
    }
}

//=============================================================================
// Account data fixtures
//=============================================================================

pub fn authority_account_data(config: &DeploymentConfig, record: &SmartWalletAuthority) -> Vec<u8> {
    let mut data = config.authority_account_discriminator.to_vec();
    data.extend_from_slice(&record.nonce.to_le_bytes());
    data.extend_from_slice(&record.passkey_pubkey.data);
    data.extend_from_slice(record.smart_wallet_pubkey.as_ref());
    data
}

pub fn wallet_data_account_data(config: &DeploymentConfig, wallet_data: &SmartWalletData) -> Vec<u8> {
    let mut data = config.wallet_data_account_discriminator.to_vec();
    data.push(wallet_data.bump);
    data.extend_from_slice(&wallet_data.id.to_le_bytes());
    data
}

pub const LOOKUP_TABLE_PROGRAM_ID: Pubkey = solana_sdk::address_lookup_table::program::ID;

pub fn lookup_table_account_data(addresses: &[Pubkey]) -> Vec<u8> {
    let mut data = vec![0u8; 56];
    data[..4].copy_from_slice(&1u32.to_le_bytes());
    // deactivation slot: never
    data[4..12].copy_from_slice(&u64::MAX.to_le_bytes());
    for address in addresses {
        data.extend_from_slice(address.as_ref());
    }
    data
}

//=============================================================================
// One-shot HTTP responder
//=============================================================================

/// Answer a single HTTP request with `status` and `body`, then close.
/// Returns the URL to post to and a handle resolving to the request body.
pub async fn spawn_http_responder(status: u16, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());

    let handle = tokio::spawn(async move {
        let (mut socket, _) = listener.accept().await.unwrap();

        let mut buf = Vec::new();
        let mut chunk = [0u8; 4096];
        let header_end = loop {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before headers");
            buf.extend_from_slice(&chunk[..n]);
            if let Some(pos) = find(&buf, b"\r\n\r\n") {
                break pos + 4;
            }
        };

        let headers = String::from_utf8_lossy(&buf[..header_end]).to_ascii_lowercase();
        let content_length = headers
            .lines()
            .find_map(|line| line.strip_prefix("content-length:"))
            .map(|v| v.trim().parse::<usize>().unwrap())
            .unwrap_or(0);

        while buf.len() < header_end + content_length {
            let n = socket.read(&mut chunk).await.unwrap();
            assert!(n > 0, "connection closed before body");
            buf.extend_from_slice(&chunk[..n]);
        }

        let response = format!(
            "HTTP/1.1 {status} Status\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        socket.write_all(response.as_bytes()).await.unwrap();
        socket.shutdown().await.ok();

        String::from_utf8(buf[header_end..header_end + content_length].to_vec()).unwrap()
    });

    (url, handle)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}
