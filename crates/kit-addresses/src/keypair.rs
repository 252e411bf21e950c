//! `KeyPair`: Ed25519 signing key pairs, generation, signing, and import of
//! raw 64-byte secret+public key material (C4's "CryptoKeyPair-equivalent").

use ed25519_dalek::{Signer, SigningKey, Verifier, VerifyingKey};
use rand::rngs::OsRng;

use crate::address::{Address, ADDRESS_BYTES};
use crate::error::{AddressError, AddressResult};
use crate::signature::{Signature, SIGNATURE_BYTES};

const KEYPAIR_BYTES: usize = 64;

/// An Ed25519 signing key pair. Mirrors the web `CryptoKeyPair` the spec
/// models this on: an address (public half) plus signing capability.
#[derive(Clone)]
pub struct KeyPair {
    signing_key: SigningKey,
}

impl KeyPair {
    /// Generates a new random key pair using the operating system's CSPRNG.
    pub fn generate() -> Self {
        let signing_key = SigningKey::generate(&mut OsRng);
        Self { signing_key }
    }

    /// Imports a 64-byte key pair: the first 32 bytes are the private key,
    /// the last 32 are the public key, which must match what the private
    /// half derives.
    pub fn from_bytes(bytes: &[u8]) -> AddressResult<Self> {
        if bytes.len() != KEYPAIR_BYTES {
            return Err(AddressError::InvalidKeyPairByteLength {
                actual_length: bytes.len(),
            });
        }
        let mut secret = [0u8; ADDRESS_BYTES];
        secret.copy_from_slice(&bytes[..ADDRESS_BYTES]);
        let mut claimed_public = [0u8; ADDRESS_BYTES];
        claimed_public.copy_from_slice(&bytes[ADDRESS_BYTES..]);

        let signing_key = SigningKey::from_bytes(&secret);
        if signing_key.verifying_key().to_bytes() != claimed_public {
            return Err(AddressError::PublicKeyMustMatchPrivateKey);
        }
        Ok(Self { signing_key })
    }

    /// Exports this key pair as 64 bytes: private key, then public key.
    pub fn to_bytes(&self) -> [u8; KEYPAIR_BYTES] {
        let mut out = [0u8; KEYPAIR_BYTES];
        out[..ADDRESS_BYTES].copy_from_slice(&self.signing_key.to_bytes());
        out[ADDRESS_BYTES..].copy_from_slice(&self.signing_key.verifying_key().to_bytes());
        out
    }

    pub fn address(&self) -> Address {
        Address::new_from_array(self.signing_key.verifying_key().to_bytes())
    }

    pub fn sign_message(&self, message: &[u8]) -> Signature {
        let sig = self.signing_key.sign(message);
        Signature::new_from_array(sig.to_bytes())
    }

    /// Verifies `signature` over `message` against `address` without needing
    /// a private key, mirroring the spec's separable verify-only path.
    pub fn verify(address: &Address, message: &[u8], signature: &Signature) -> bool {
        let Ok(verifying_key) = VerifyingKey::from_bytes(address.as_bytes()) else {
            return false;
        };
        let sig = ed25519_dalek::Signature::from_bytes(signature.as_bytes());
        verifying_key.verify(message, &sig).is_ok()
    }
}

impl std::fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "KeyPair({})", self.address())
    }
}

const _: () = assert!(SIGNATURE_BYTES == 64);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sign_and_verify_round_trip() {
        let keypair = KeyPair::generate();
        let message = b"hello solana";
        let signature = keypair.sign_message(message);
        assert!(KeyPair::verify(&keypair.address(), message, &signature));
    }

    #[test]
    fn tampered_message_fails_verification() {
        let keypair = KeyPair::generate();
        let signature = keypair.sign_message(b"original");
        assert!(!KeyPair::verify(&keypair.address(), b"tampered", &signature));
    }

    #[test]
    fn import_round_trips_through_bytes() {
        let keypair = KeyPair::generate();
        let bytes = keypair.to_bytes();
        let restored = KeyPair::from_bytes(&bytes).unwrap();
        assert_eq!(restored.address(), keypair.address());
    }

    #[test]
    fn mismatched_public_key_is_rejected() {
        let a = KeyPair::generate();
        let b = KeyPair::generate();
        let mut bytes = a.to_bytes();
        bytes[32..].copy_from_slice(&b.address().to_bytes());
        assert!(matches!(
            KeyPair::from_bytes(&bytes),
            Err(AddressError::PublicKeyMustMatchPrivateKey)
        ));
    }

    #[test]
    fn wrong_length_import_is_rejected() {
        assert!(matches!(
            KeyPair::from_bytes(&[0u8; 10]),
            Err(AddressError::InvalidKeyPairByteLength { actual_length: 10 })
        ));
    }
}
