//! Offchain message v1 (§6): a standalone signing format used by wallets,
//! never submitted to the network.

use kit_addresses::Address;

use crate::error::{TransactionError, TransactionResult};

/// `0xFF` followed by the ASCII bytes of `"solana offchain"`, 16 bytes total.
pub const SIGNING_DOMAIN: [u8; 16] = *b"\xffsolana offchain";

pub const OFFCHAIN_MESSAGE_VERSION: u8 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffchainMessage {
    pub signatories: Vec<Address>,
    pub content: Vec<u8>,
}

impl OffchainMessage {
    /// Encodes as `signingDomain || version || signatoryCount || signatories(sorted) || content`.
    pub fn encode(&self) -> TransactionResult<Vec<u8>> {
        if self.signatories.is_empty() {
            return Err(TransactionError::OffchainMessageMissingSignatories);
        }
        if self.content.is_empty() {
            return Err(TransactionError::OffchainMessageContentEmpty);
        }
        let mut sorted = self.signatories.clone();
        sorted.sort();
        sorted.dedup();
        if sorted.len() != self.signatories.len() {
            return Err(TransactionError::DuplicateOffchainSignatory);
        }

        let mut out = Vec::with_capacity(16 + 2 + sorted.len() * 32 + self.content.len());
        out.extend_from_slice(&SIGNING_DOMAIN);
        out.push(OFFCHAIN_MESSAGE_VERSION);
        out.push(sorted.len() as u8);
        for signatory in &sorted {
            out.extend_from_slice(signatory.as_bytes());
        }
        out.extend_from_slice(&self.content);
        Ok(out)
    }

    pub fn decode(bytes: &[u8]) -> TransactionResult<Self> {
        if bytes.len() < SIGNING_DOMAIN.len() || bytes[..SIGNING_DOMAIN.len()] != SIGNING_DOMAIN[..] {
            return Err(TransactionError::InvalidOffchainSigningDomain);
        }
        let mut offset = SIGNING_DOMAIN.len();

        let version = *bytes
            .get(offset)
            .ok_or(TransactionError::InvalidOffchainSigningDomain)?;
        if version != OFFCHAIN_MESSAGE_VERSION {
            return Err(TransactionError::UnsupportedOffchainMessageVersion { version });
        }
        offset += 1;

        let signatory_count = *bytes
            .get(offset)
            .ok_or(TransactionError::OffchainMessageMissingSignatories)?;
        if signatory_count == 0 {
            return Err(TransactionError::OffchainMessageMissingSignatories);
        }
        offset += 1;

        let mut signatories = Vec::with_capacity(signatory_count as usize);
        for _ in 0..signatory_count {
            if bytes.len() < offset + 32 {
                return Err(TransactionError::Codec(
                    kit_codecs::error::CodecError::ByteArrayTooShort {
                        expected: 32,
                        actual: bytes.len().saturating_sub(offset),
                        offset,
                    },
                ));
            }
            let mut array = [0u8; 32];
            array.copy_from_slice(&bytes[offset..offset + 32]);
            signatories.push(Address::new_from_array(array));
            offset += 32;
        }

        let mut sorted_check = signatories.clone();
        sorted_check.sort();
        if sorted_check != signatories {
            return Err(TransactionError::OffchainSignatoriesNotSorted);
        }
        sorted_check.dedup();
        if sorted_check.len() != signatories.len() {
            return Err(TransactionError::DuplicateOffchainSignatory);
        }

        let content = bytes[offset..].to_vec();
        if content.is_empty() {
            return Err(TransactionError::OffchainMessageContentEmpty);
        }

        Ok(Self {
            signatories,
            content,
        })
    }
}
