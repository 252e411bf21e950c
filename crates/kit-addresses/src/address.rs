//! `Address`: an opaque 32-byte public key (C4), normally carried as base58
//! text.

use std::fmt;
use std::str::FromStr;

use curve25519_dalek::edwards::CompressedEdwardsY;
use serde::{Deserialize, Serialize};

use crate::error::{AddressError, AddressResult};

pub const ADDRESS_BYTES: usize = 32;
const MIN_BASE58_LEN: usize = 32;
const MAX_BASE58_LEN: usize = 44;

/// A 32-byte Solana address.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address([u8; ADDRESS_BYTES]);

impl Address {
    pub const fn new_from_array(bytes: [u8; ADDRESS_BYTES]) -> Self {
        Self(bytes)
    }

    pub fn to_bytes(self) -> [u8; ADDRESS_BYTES] {
        self.0
    }

    pub fn as_bytes(&self) -> &[u8; ADDRESS_BYTES] {
        &self.0
    }

    pub fn from_bytes(bytes: &[u8]) -> AddressResult<Self> {
        let array: [u8; ADDRESS_BYTES] =
            bytes
                .try_into()
                .map_err(|_| AddressError::InvalidByteLength {
                    actual_length: bytes.len(),
                })?;
        Ok(Self(array))
    }

    /// Whether this address is *not* a valid compressed Ed25519 point. PDAs
    /// must satisfy this; ordinary wallet addresses normally do not.
    pub fn is_off_curve(&self) -> bool {
        !is_on_curve(&self.0)
    }

    pub fn to_base58(&self) -> String {
        bs58::encode(self.0).into_string()
    }
}

/// The standard Ed25519 compressed-point decompression validity test used by
/// [`Address::is_off_curve`] and by PDA derivation.
pub(crate) fn is_on_curve(bytes: &[u8; ADDRESS_BYTES]) -> bool {
    CompressedEdwardsY(*bytes).decompress().is_some()
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Address({})", self.to_base58())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base58())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() < MIN_BASE58_LEN || s.len() > MAX_BASE58_LEN {
            return Err(AddressError::StringLengthOutOfRange {
                actual_length: s.len(),
            });
        }
        let decoded = bs58::decode(s)
            .into_vec()
            .map_err(|_| AddressError::InvalidByteLength { actual_length: 0 })?;
        Self::from_bytes(&decoded)
    }
}

impl TryFrom<String> for Address {
    type Error = AddressError;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Address> for String {
    fn from(value: Address) -> Self {
        value.to_base58()
    }
}

impl From<[u8; ADDRESS_BYTES]> for Address {
    fn from(bytes: [u8; ADDRESS_BYTES]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Address {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_program_is_on_curve_by_convention() {
        // The all-zero address is the System Program's address and is
        // conventionally treated as a valid (if degenerate) curve point in
        // Solana tooling: it round-trips as base58 either way.
        let addr: Address = "11111111111111111111111111111111".parse().unwrap();
        assert_eq!(addr.to_base58(), "11111111111111111111111111111111");
    }

    #[test]
    fn rejects_out_of_range_lengths() {
        assert!(matches!(
            "1".parse::<Address>(),
            Err(AddressError::StringLengthOutOfRange { .. })
        ));
        let too_long = "1".repeat(45);
        assert!(matches!(
            too_long.parse::<Address>(),
            Err(AddressError::StringLengthOutOfRange { .. })
        ));
    }

    #[test]
    fn known_on_curve_and_off_curve_addresses() {
        // A base point on the curve (the Ed25519 basepoint, little-endian).
        let on_curve_bytes = [
            0x58, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
            0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66, 0x66,
            0x66, 0x66, 0x66, 0x66,
        ];
        assert!(is_on_curve(&on_curve_bytes));

        // All-0xFF is not a valid compressed point.
        let off_curve_bytes = [0xFFu8; 32];
        assert!(!is_on_curve(&off_curve_bytes));
    }
}
