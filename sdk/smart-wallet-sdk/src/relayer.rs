//! JSON-RPC 2.0 client for the fee relayer.
//!
//! The relayer accepts base58-encoded, bincode-serialized transactions and
//! signs (and optionally submits) them as fee payer. Every call is a single
//! POST with no retry.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::transaction::{Transaction, VersionedTransaction};
use tracing::{info, warn};

use crate::core::constants::DEFAULT_FEE_TOKEN;
use crate::error::{Result, SmartWalletError};

const JSONRPC_VERSION: &str = "2.0";
const REQUEST_ID: u64 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayMethod {
    SignAndSendTransaction,
    SignTransaction,
    EstimateTransactionFee,
    SignAndSendVersionedTransaction,
}

impl RelayMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelayMethod::SignAndSendTransaction => "signAndSendTransaction",
            RelayMethod::SignTransaction => "signTransaction",
            RelayMethod::EstimateTransactionFee => "estimateTransactionFee",
            RelayMethod::SignAndSendVersionedTransaction => "signAndSendVersionedTransaction",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelayRequest {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'static str,
    pub params: Vec<String>,
}

impl RelayRequest {
    pub fn new(method: RelayMethod, params: Vec<String>) -> Self {
        Self {
            jsonrpc: JSONRPC_VERSION,
            id: REQUEST_ID,
            method: method.as_str(),
            params,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RelayErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

/// JSON-RPC response envelope. Relayers do not always omit the unused
/// member, so an `error` wins over a `result` (even a `null` one).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(bound(deserialize = "T: serde::de::DeserializeOwned"))]
pub struct RelayResponse<T> {
    #[serde(default)]
    pub jsonrpc: Option<String>,
    #[serde(default)]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub result: Option<T>,
    #[serde(default)]
    pub error: Option<RelayErrorObject>,
}

impl<T> RelayResponse<T> {
    pub fn into_result(self, method: &'static str) -> Result<T> {
        if let Some(error) = self.error {
            warn!(method, code = error.code, message = %error.message, "relayer rejected request");
            return Err(SmartWalletError::Relay {
                method,
                code: error.code,
                message: error.message,
            });
        }
        self.result.ok_or_else(|| {
            SmartWalletError::Serialization(format!("{method}: relayer response has no result"))
        })
    }
}

/// Result of the submitting methods.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SendResult {
    Signature(String),
    Detailed {
        signature: String,
        #[serde(default)]
        signed_transaction: Option<String>,
    },
}

impl SendResult {
    pub fn signature(&self) -> &str {
        match self {
            SendResult::Signature(signature) => signature,
            SendResult::Detailed { signature, .. } => signature,
        }
    }
}

/// Result of `signTransaction`: the fee-payer-signed transaction, base58.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum SignResult {
    Transaction(String),
    Detailed {
        signed_transaction: String,
        #[serde(default)]
        signature: Option<String>,
    },
}

impl SignResult {
    pub fn signed_transaction(&self) -> &str {
        match self {
            SignResult::Transaction(tx) => tx,
            SignResult::Detailed {
                signed_transaction, ..
            } => signed_transaction,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum FeeEstimate {
    Lamports(u64),
    Detailed {
        fee_in_lamports: u64,
        #[serde(default)]
        fee_in_token: Option<u64>,
    },
}

impl FeeEstimate {
    pub fn lamports(&self) -> u64 {
        match self {
            FeeEstimate::Lamports(fee) => *fee,
            FeeEstimate::Detailed {
                fee_in_lamports, ..
            } => *fee_in_lamports,
        }
    }
}

/// Serialize with bincode and encode as base58, the relayer's wire format.
pub fn encode_transaction<T: Serialize>(tx: &T) -> Result<String> {
    let bytes = bincode::serialize(tx).map_err(|e| SmartWalletError::Serialization(e.to_string()))?;
    Ok(bs58::encode(bytes).into_string())
}

#[derive(Debug, Clone)]
pub struct RelayClient {
    http: reqwest::Client,
    url: String,
}

impl RelayClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_http_client(reqwest::Client::new(), url)
    }

    pub fn with_http_client(http: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            http,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Send one request and unwrap the JSON-RPC envelope.
    pub async fn call<T: DeserializeOwned>(
        &self,
        method: RelayMethod,
        params: Vec<String>,
    ) -> Result<T> {
        let name = method.as_str();
        let request = RelayRequest::new(method, params);

        let response = self
            .http
            .post(&self.url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| SmartWalletError::network(name, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!(method = name, %status, "relayer returned HTTP error");
            return Err(SmartWalletError::network(name, format!("HTTP status {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SmartWalletError::network(name, e))?;
        let envelope: RelayResponse<T> = serde_json::from_str(&body).map_err(|e| {
            SmartWalletError::Serialization(format!("{name}: invalid relayer response: {e}"))
        })?;

        envelope.into_result(name)
    }

    pub async fn sign_and_send_transaction(&self, tx: &Transaction) -> Result<SendResult> {
        let result: SendResult = self
            .call(RelayMethod::SignAndSendTransaction, vec![encode_transaction(tx)?])
            .await?;
        info!(signature = result.signature(), "relayer submitted transaction");
        Ok(result)
    }

    pub async fn sign_transaction(&self, tx: &Transaction) -> Result<SignResult> {
        self.call(RelayMethod::SignTransaction, vec![encode_transaction(tx)?])
            .await
    }

    /// Fee quote in `fee_token` (wrapped SOL when `None`).
    pub async fn estimate_transaction_fee(
        &self,
        tx: &Transaction,
        fee_token: Option<&Pubkey>,
    ) -> Result<FeeEstimate> {
        let fee_token = fee_token.copied().unwrap_or(DEFAULT_FEE_TOKEN);
        self.call(
            RelayMethod::EstimateTransactionFee,
            vec![encode_transaction(tx)?, fee_token.to_string()],
        )
        .await
    }

    pub async fn sign_and_send_versioned_transaction(
        &self,
        tx: &VersionedTransaction,
    ) -> Result<SendResult> {
        let result: SendResult = self
            .call(
                RelayMethod::SignAndSendVersionedTransaction,
                vec![encode_transaction(tx)?],
            )
            .await?;
        info!(signature = result.signature(), "relayer submitted versioned transaction");
        Ok(result)
    }
}
