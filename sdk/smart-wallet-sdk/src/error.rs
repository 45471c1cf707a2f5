use solana_sdk::message::CompileError;
use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

/// SDK-specific error types for smart wallet operations
#[derive(Debug, Error)]
pub enum SmartWalletError {
    /// A fixed-size input (passkey, signature) had the wrong length
    #[error("Invalid {field} length: expected {expected} bytes, got {actual}")]
    InvalidInputLength {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Decoding failed on a truncated or corrupt buffer
    #[error("Malformed input in {operation}: buffer has {len} bytes, {needed} required")]
    MalformedInput {
        operation: &'static str,
        len: usize,
        needed: usize,
    },

    /// Account exists but holds the wrong kind of data
    #[error("Invalid account data: {0}")]
    InvalidAccountData(String),

    /// Account not found on-chain
    #[error("Account not found: {0}")]
    AccountNotFound(Pubkey),

    /// Query returned nothing (e.g. a passkey without any smart wallet)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Address lookup table missing or not a lookup table
    #[error("Address lookup table not found: {0}")]
    LookupTableNotFound(Pubkey),

    /// Transport-level failure talking to the RPC node or the relayer
    #[error("Network error in {method}: {message}")]
    Network {
        method: &'static str,
        message: String,
    },

    /// Relayer answered with a JSON-RPC error object
    #[error("Relayer error in {method} (code {code}): {message}")]
    Relay {
        method: &'static str,
        code: i64,
        message: String,
    },

    /// Transaction or payload (de)serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Versioned message compilation failed
    #[error("Transaction compile error: {0}")]
    TransactionCompile(#[from] CompileError),

    /// External passkey signer failed
    #[error("Signer error: {0}")]
    Signer(String),

    /// Builder used without a required field
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Invalid configuration value
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl SmartWalletError {
    pub(crate) fn network(method: &'static str, err: impl ToString) -> Self {
        SmartWalletError::Network {
            method,
            message: err.to_string(),
        }
    }
}

/// Result type alias for SDK operations
pub type Result<T> = std::result::Result<T, SmartWalletError>;
