//! Fixed-layout records exchanged with the smart wallet program.
//!
//! Every field has an explicit width and position; integers are
//! little-endian and fixed arrays carry no length prefix. The layouts must
//! stay byte-identical to what the program deserializes.

use solana_sdk::pubkey::Pubkey;

use crate::core::constants::{DISCRIMINATOR_SIZE, PASSKEY_PUBKEY_SIZE, SIGNATURE_SIZE};
use crate::error::{Result, SmartWalletError};

/// Sequential reader over a borrowed buffer. Short reads fail with
/// `MalformedInput` for the whole operation, never a partial value.
struct Reader<'a> {
    buf: &'a [u8],
    pos: usize,
    operation: &'static str,
}

impl<'a> Reader<'a> {
    fn new(buf: &'a [u8], operation: &'static str) -> Self {
        Self {
            buf,
            pos: 0,
            operation,
        }
    }

    fn require(&self, total: usize) -> Result<()> {
        if self.buf.len() < total {
            return Err(SmartWalletError::MalformedInput {
                operation: self.operation,
                len: self.buf.len(),
                needed: total,
            });
        }
        Ok(())
    }

    fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        self.require(self.pos + N)?;
        let mut out = [0u8; N];
        out.copy_from_slice(&self.buf[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    fn read_u64(&mut self) -> Result<u64> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    fn read_i64(&mut self) -> Result<i64> {
        Ok(i64::from_le_bytes(self.read_array()?))
    }
}

/// Compressed secp256r1 public key of a passkey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PasskeyPubkey {
    pub data: [u8; PASSKEY_PUBKEY_SIZE],
}

impl PasskeyPubkey {
    pub const LEN: usize = PASSKEY_PUBKEY_SIZE;

    pub fn new(data: [u8; PASSKEY_PUBKEY_SIZE]) -> Self {
        Self { data }
    }

    /// Build from caller-supplied bytes, which must be exactly 33 long.
    pub fn try_from_slice(bytes: &[u8]) -> Result<Self> {
        let data: [u8; PASSKEY_PUBKEY_SIZE] =
            bytes
                .try_into()
                .map_err(|_| SmartWalletError::InvalidInputLength {
                    field: "passkey pubkey",
                    expected: PASSKEY_PUBKEY_SIZE,
                    actual: bytes.len(),
                })?;
        Ok(Self { data })
    }

    pub fn as_bytes(&self) -> &[u8; PASSKEY_PUBKEY_SIZE] {
        &self.data
    }

    pub fn encode(&self) -> [u8; PASSKEY_PUBKEY_SIZE] {
        self.data
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Self::read(&mut Reader::new(bytes, "PasskeyPubkey::decode"))
    }

    fn read(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            data: reader.read_array()?,
        })
    }
}

impl AsRef<[u8]> for PasskeyPubkey {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

/// Payload signed by the passkey to authorize one action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Message {
    /// Must equal the authority record's nonce at signing time
    pub nonce: u64,
    /// Unix seconds taken from the chain clock
    pub timestamp: i64,
}

impl Message {
    pub const LEN: usize = 16;

    pub fn new(nonce: u64, timestamp: i64) -> Self {
        Self { nonce, timestamp }
    }

    /// Layout: `[0..8] nonce: u64`, `[8..16] timestamp: i64`
    pub fn encode(&self) -> [u8; Self::LEN] {
        let mut out = [0u8; Self::LEN];
        out[..8].copy_from_slice(&self.nonce.to_le_bytes());
        out[8..].copy_from_slice(&self.timestamp.to_le_bytes());
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Self::read(&mut Reader::new(bytes, "Message::decode"))
    }

    fn read(reader: &mut Reader<'_>) -> Result<Self> {
        reader.require(reader.pos + Self::LEN)?;
        let nonce = reader.read_u64()?;
        let timestamp = reader.read_i64()?;
        Ok(Self { nonce, timestamp })
    }
}

/// Proof of authorization submitted to the program.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyParam {
    pub msg: Message,
    pub sig: [u8; SIGNATURE_SIZE],
    pub pubkey: PasskeyPubkey,
}

impl VerifyParam {
    pub const LEN: usize = Message::LEN + SIGNATURE_SIZE + PasskeyPubkey::LEN;

    /// `sig` must be a 64-byte compact signature.
    pub fn new(msg: Message, sig: &[u8], pubkey: PasskeyPubkey) -> Result<Self> {
        let sig: [u8; SIGNATURE_SIZE] =
            sig.try_into()
                .map_err(|_| SmartWalletError::InvalidInputLength {
                    field: "signature",
                    expected: SIGNATURE_SIZE,
                    actual: sig.len(),
                })?;
        Ok(Self { msg, sig, pubkey })
    }

    /// Layout: `[0..16] msg`, `[16..80] sig`, `[80..113] pubkey`
    pub fn encode(&self) -> [u8; Self::LEN] {
        let mut out = [0u8; Self::LEN];
        out[..Message::LEN].copy_from_slice(&self.msg.encode());
        out[Message::LEN..Message::LEN + SIGNATURE_SIZE].copy_from_slice(&self.sig);
        out[Message::LEN + SIGNATURE_SIZE..].copy_from_slice(&self.pubkey.data);
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes, "VerifyParam::decode");
        reader.require(Self::LEN)?;
        let msg = Message::read(&mut reader)?;
        let sig = reader.read_array()?;
        let pubkey = PasskeyPubkey::read(&mut reader)?;
        Ok(Self { msg, sig, pubkey })
    }
}

/// On-chain record binding a passkey to a wallet. Read-only for clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmartWalletAuthority {
    pub nonce: u64,
    pub passkey_pubkey: PasskeyPubkey,
    pub smart_wallet_pubkey: Pubkey,
}

impl SmartWalletAuthority {
    pub const LEN: usize = 8 + PasskeyPubkey::LEN + 32;

    /// Layout: `[0..8] nonce`, `[8..41] passkey`, `[41..73] smart wallet`
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes, "SmartWalletAuthority::decode");
        reader.require(Self::LEN)?;
        let nonce = reader.read_u64()?;
        let passkey_pubkey = PasskeyPubkey::read(&mut reader)?;
        let smart_wallet_pubkey = Pubkey::new_from_array(reader.read_array()?);
        Ok(Self {
            nonce,
            passkey_pubkey,
            smart_wallet_pubkey,
        })
    }

    /// Decode full account data: `discriminator(8) ‖ record`.
    pub fn from_account_data(data: &[u8], discriminator: &[u8; 8]) -> Result<Self> {
        Self::decode(strip_discriminator(
            data,
            discriminator,
            "SmartWalletAuthority::from_account_data",
        )?)
    }
}

/// Per-wallet bookkeeping kept by the program next to the wallet PDA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SmartWalletData {
    pub bump: u8,
    /// Sequence id the wallet address was derived from
    pub id: u64,
}

impl SmartWalletData {
    pub const LEN: usize = 1 + 8;

    /// Layout: `[0] bump`, `[1..9] id`
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes, "SmartWalletData::decode");
        reader.require(Self::LEN)?;
        let [bump] = reader.read_array::<1>()?;
        let id = reader.read_u64()?;
        Ok(Self { bump, id })
    }

    pub fn from_account_data(data: &[u8], discriminator: &[u8; 8]) -> Result<Self> {
        Self::decode(strip_discriminator(
            data,
            discriminator,
            "SmartWalletData::from_account_data",
        )?)
    }
}

fn strip_discriminator<'a>(
    data: &'a [u8],
    discriminator: &[u8; 8],
    operation: &'static str,
) -> Result<&'a [u8]> {
    let mut reader = Reader::new(data, operation);
    let found: [u8; DISCRIMINATOR_SIZE] = reader.read_array()?;
    if &found != discriminator {
        return Err(SmartWalletError::InvalidAccountData(format!(
            "{operation}: discriminator {found:?} does not match {discriminator:?}"
        )));
    }
    Ok(&data[DISCRIMINATOR_SIZE..])
}

/// A message together with the passkey signature over its encoding.
///
/// Only constructible through [`SignedAuthorization::new`], so the signed
/// bytes always equal `message.encode()`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedAuthorization {
    message: Message,
    message_bytes: Vec<u8>,
    signature: [u8; SIGNATURE_SIZE],
    passkey_pubkey: PasskeyPubkey,
}

impl SignedAuthorization {
    pub fn new(message: Message, signature: &[u8], passkey_pubkey: PasskeyPubkey) -> Result<Self> {
        let param = VerifyParam::new(message, signature, passkey_pubkey)?;
        Ok(Self {
            message,
            message_bytes: message.encode().to_vec(),
            signature: param.sig,
            passkey_pubkey,
        })
    }

    pub fn message(&self) -> Message {
        self.message
    }

    /// The exact bytes the passkey signed.
    pub fn message_bytes(&self) -> &[u8] {
        &self.message_bytes
    }

    pub fn signature(&self) -> &[u8; SIGNATURE_SIZE] {
        &self.signature
    }

    pub fn passkey_pubkey(&self) -> PasskeyPubkey {
        self.passkey_pubkey
    }

    pub fn verify_param(&self) -> VerifyParam {
        VerifyParam {
            msg: self.message,
            sig: self.signature,
            pubkey: self.passkey_pubkey,
        }
    }
}
