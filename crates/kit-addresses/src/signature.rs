//! `Signature`: a 64-byte Ed25519 signature, normally carried as base58 text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{AddressError, AddressResult};

pub const SIGNATURE_BYTES: usize = 64;
const MIN_BASE58_LEN: usize = 64;
const MAX_BASE58_LEN: usize = 88;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Signature([u8; SIGNATURE_BYTES]);

impl Signature {
    pub const fn new_from_array(bytes: [u8; SIGNATURE_BYTES]) -> Self {
        Self(bytes)
    }

    pub fn to_bytes(self) -> [u8; SIGNATURE_BYTES] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; SIGNATURE_BYTES] {
        &self.0
    }

    pub fn from_bytes(bytes: &[u8]) -> AddressResult<Self> {
        let array: [u8; SIGNATURE_BYTES] =
            bytes
                .try_into()
                .map_err(|_| AddressError::InvalidSignatureByteLength {
                    actual_length: bytes.len(),
                })?;
        Ok(Self(array))
    }

    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).into_string()
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signature({})", self.to_base58())
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl FromStr for Signature {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() < MIN_BASE58_LEN || s.len() > MAX_BASE58_LEN {
            return Err(AddressError::SignatureStringLengthOutOfRange {
                actual_length: s.len(),
            });
        }
        let decoded = bs58::decode(s).into_vec().map_err(|_| {
            AddressError::InvalidSignatureByteLength { actual_length: 0 }
        })?;
        Self::from_bytes(&decoded)
    }
}

impl TryFrom<String> for Signature {
    type Error = AddressError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Signature> for String {
    fn from(value: Signature) -> Self {
        value.to_base58()
    }
}

impl From<[u8; SIGNATURE_BYTES]> for Signature {
    fn from(bytes: [u8; SIGNATURE_BYTES]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Signature {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_base58() {
        let bytes = [7u8; SIGNATURE_BYTES];
        let sig = Signature::new_from_array(bytes);
        let text = sig.to_base58();
        let parsed: Signature = text.parse().unwrap();
        assert_eq!(parsed, sig);
    }

    #[test]
    fn rejects_wrong_byte_length() {
        assert!(matches!(
            Signature::from_bytes(&[0u8; 10]),
            Err(AddressError::InvalidSignatureByteLength { actual_length: 10 })
        ));
    }

    #[test]
    fn rejects_out_of_range_string_length() {
        assert!(matches!(
            "abc".parse::<Signature>(),
            Err(AddressError::SignatureStringLengthOutOfRange { .. })
        ));
    }
}
