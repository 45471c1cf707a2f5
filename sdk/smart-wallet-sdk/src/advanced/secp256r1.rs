//! Encoder for the native secp256r1 signature-verification precompile.
//!
//! The smart wallet program loads this instruction through the instructions
//! sysvar and compares its embedded pubkey, signature and message with the
//! `VerifyParam` it was given, so the layout below is part of the wallet ABI.

use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;

use crate::core::constants::{PASSKEY_PUBKEY_SIZE, SIGNATURE_SIZE};
use crate::error::{Result, SmartWalletError};
use crate::types::PasskeyPubkey;

pub const SIGNATURE_OFFSETS_SERIALIZED_SIZE: usize = 14;
/// `[num_signatures: u8][padding: u8]`
pub const SIGNATURE_OFFSETS_START: usize = 2;
pub const DATA_START: usize = SIGNATURE_OFFSETS_START + SIGNATURE_OFFSETS_SERIALIZED_SIZE;

pub const PUBKEY_DATA_OFFSET: usize = DATA_START;
pub const SIGNATURE_DATA_OFFSET: usize = PUBKEY_DATA_OFFSET + PASSKEY_PUBKEY_SIZE;
pub const MESSAGE_DATA_OFFSET: usize = SIGNATURE_DATA_OFFSET + SIGNATURE_SIZE;

/// Instruction index meaning "this instruction".
const CURRENT_INSTRUCTION: u16 = u16::MAX;

/// Secp256r1 signature offsets structure (matches solana-secp256r1-program)
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Secp256r1SignatureOffsets {
    pub signature_offset: u16,
    pub signature_instruction_index: u16,
    pub public_key_offset: u16,
    pub public_key_instruction_index: u16,
    pub message_data_offset: u16,
    pub message_data_size: u16,
    pub message_instruction_index: u16,
}

impl Secp256r1SignatureOffsets {
    /// Offsets for a single signature whose data is embedded in the same
    /// instruction as `pubkey ‖ signature ‖ message`.
    pub fn single(message_len: u16) -> Self {
        Self {
            signature_offset: SIGNATURE_DATA_OFFSET as u16,
            signature_instruction_index: CURRENT_INSTRUCTION,
            public_key_offset: PUBKEY_DATA_OFFSET as u16,
            public_key_instruction_index: CURRENT_INSTRUCTION,
            message_data_offset: MESSAGE_DATA_OFFSET as u16,
            message_data_size: message_len,
            message_instruction_index: CURRENT_INSTRUCTION,
        }
    }

    pub fn to_bytes(&self) -> [u8; SIGNATURE_OFFSETS_SERIALIZED_SIZE] {
        let mut out = [0u8; SIGNATURE_OFFSETS_SERIALIZED_SIZE];
        let fields = [
            self.signature_offset,
            self.signature_instruction_index,
            self.public_key_offset,
            self.public_key_instruction_index,
            self.message_data_offset,
            self.message_data_size,
            self.message_instruction_index,
        ];
        for (chunk, field) in out.chunks_exact_mut(2).zip(fields) {
            chunk.copy_from_slice(&field.to_le_bytes());
        }
        out
    }
}

/// Build the precompile instruction verifying `signature` over `message`.
///
/// # Layout
/// ```text
/// [0]        num_signatures = 1
/// [1]        padding
/// [2..16]    Secp256r1SignatureOffsets
/// [16..49]   compressed public key
/// [49..113]  signature
/// [113..]    message
/// ```
///
/// The offsets table stores the message size as a u16; longer messages are
/// rejected with [`SmartWalletError::InvalidInputLength`].
pub fn new_secp256r1_instruction(
    precompile_program_id: &Pubkey,
    message: &[u8],
    pubkey: &PasskeyPubkey,
    signature: &[u8; SIGNATURE_SIZE],
) -> Result<Instruction> {
    let message_size =
        u16::try_from(message.len()).map_err(|_| SmartWalletError::InvalidInputLength {
            field: "secp256r1 message",
            expected: u16::MAX as usize,
            actual: message.len(),
        })?;
    let offsets = Secp256r1SignatureOffsets::single(message_size);

    let mut data = Vec::with_capacity(MESSAGE_DATA_OFFSET + message.len());
    data.push(1);
    data.push(0);
    data.extend_from_slice(&offsets.to_bytes());
    data.extend_from_slice(pubkey.as_bytes());
    data.extend_from_slice(signature);
    data.extend_from_slice(message);

    Ok(Instruction {
        program_id: *precompile_program_id,
        accounts: vec![],
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::constants::SECP256R1_PROGRAM_ID;

    #[test]
    fn test_offsets_constants() {
        assert_eq!(PUBKEY_DATA_OFFSET, 16);
        assert_eq!(SIGNATURE_DATA_OFFSET, 49);
        assert_eq!(MESSAGE_DATA_OFFSET, 113);
    }

    #[test]
    fn test_instruction_layout() {
        let pubkey = PasskeyPubkey::new([2u8; 33]);
        let signature = [7u8; 64];
        let message = [1u8; 16];
        let ix = new_secp256r1_instruction(&SECP256R1_PROGRAM_ID, &message, &pubkey, &signature)
            .unwrap();

        assert!(ix.accounts.is_empty());
        assert_eq!(ix.data.len(), 2 + 14 + 33 + 64 + 16);
        assert_eq!(&ix.data[..2], &[1, 0]);
        // signature_offset, signature_instruction_index
        assert_eq!(&ix.data[2..6], &[49, 0, 0xFF, 0xFF]);
        // public_key_offset, public_key_instruction_index
        assert_eq!(&ix.data[6..10], &[16, 0, 0xFF, 0xFF]);
        // message_data_offset, message_data_size, message_instruction_index
        assert_eq!(&ix.data[10..16], &[113, 0, 16, 0, 0xFF, 0xFF]);
        assert_eq!(&ix.data[16..49], &[2u8; 33]);
        assert_eq!(&ix.data[49..113], &[7u8; 64]);
        assert_eq!(&ix.data[113..], &message);
    }

    #[test]
    fn test_message_size_must_fit_u16() {
        let pubkey = PasskeyPubkey::new([2u8; 33]);
        let signature = [7u8; 64];

        let max = vec![0u8; u16::MAX as usize];
        let ix = new_secp256r1_instruction(&SECP256R1_PROGRAM_ID, &max, &pubkey, &signature)
            .unwrap();
        assert_eq!(&ix.data[12..14], &[0xFF, 0xFF]);

        let oversized = vec![0u8; u16::MAX as usize + 6];
        let err = new_secp256r1_instruction(&SECP256R1_PROGRAM_ID, &oversized, &pubkey, &signature)
            .unwrap_err();
        assert!(matches!(
            err,
            SmartWalletError::InvalidInputLength {
                field: "secp256r1 message",
                actual: 65541,
                ..
            }
        ));
    }
}
