use async_trait::async_trait;

use crate::types::PasskeyPubkey;

/// Abstraction for the authenticator holding the passkey private key.
/// This allows the SDK to work with:
/// 1. WebAuthn / platform passkeys (the signature comes back from the browser or OS)
/// 2. Hardware secure elements
/// 3. Software p256 keys (tests, backends)
#[async_trait]
pub trait PasskeySigner: Send + Sync {
    fn passkey_pubkey(&self) -> PasskeyPubkey;

    /// Sign the encoded authorization message.
    /// Must return a 64-byte compact (r ‖ s) secp256r1 signature.
    async fn sign_message(&self, message: &[u8]) -> Result<Vec<u8>, String>;
}
