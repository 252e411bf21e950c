use kit_errors::ErrorCode;
use thiserror::Error;

/// Errors from address, PDA, and key-pair handling (C4).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AddressError {
    #[error("address string length {actual_length} is out of range [32, 44]")]
    StringLengthOutOfRange { actual_length: usize },

    #[error("expected a 32-byte address, found {actual_length} bytes")]
    InvalidByteLength { actual_length: usize },

    #[error("address is on the ed25519 curve, which is not valid for this operation")]
    InvalidOffCurveAddress,

    #[error("malformed program derived address")]
    MalformedPda,

    #[error("PDA bump seed {bump} is out of range [0, 255]")]
    PdaBumpSeedOutOfRange { bump: i32 },

    #[error("at most 16 seeds may be used to derive a PDA, found {actual}")]
    MaxSeedsExceeded { actual: usize },

    #[error("seed {index} is {actual_length} bytes, exceeding the 32-byte maximum")]
    MaxSeedLengthExceeded { index: usize, actual_length: usize },

    #[error("the provided seeds, as given, already point on the ed25519 curve")]
    InvalidSeedsPointOnCurve,

    #[error("no bump seed in [0, 255] produces an off-curve address for these seeds")]
    FailedToFindViablePdaBumpSeed,

    #[error("a program address must not end with the PDA marker")]
    PdaEndsWithPdaMarker,

    #[error("expected a 64-byte key pair, found {actual_length} bytes")]
    InvalidKeyPairByteLength { actual_length: usize },

    #[error("the public key half of this key pair does not match its private key")]
    PublicKeyMustMatchPrivateKey,

    #[error("signature string length {actual_length} is out of range [64, 88]")]
    SignatureStringLengthOutOfRange { actual_length: usize },

    #[error("expected a 64-byte signature, found {actual_length} bytes")]
    InvalidSignatureByteLength { actual_length: usize },

    #[error("the signing capability is unavailable: {subcategory}")]
    SubtleCryptoUnavailable { subcategory: String },
}

impl ErrorCode for AddressError {
    fn code(&self) -> &'static str {
        match self {
            Self::StringLengthOutOfRange { .. } => "StringLengthOutOfRange",
            Self::InvalidByteLength { .. } => "InvalidByteLength",
            Self::InvalidOffCurveAddress => "InvalidOffCurveAddress",
            Self::MalformedPda => "MalformedPda",
            Self::PdaBumpSeedOutOfRange { .. } => "PdaBumpSeedOutOfRange",
            Self::MaxSeedsExceeded { .. } => "MaxSeedsExceeded",
            Self::MaxSeedLengthExceeded { .. } => "MaxSeedLengthExceeded",
            Self::InvalidSeedsPointOnCurve => "InvalidSeedsPointOnCurve",
            Self::FailedToFindViablePdaBumpSeed => "FailedToFindViablePdaBumpSeed",
            Self::PdaEndsWithPdaMarker => "PdaEndsWithPdaMarker",
            Self::InvalidKeyPairByteLength { .. } => "InvalidKeyPairByteLength",
            Self::PublicKeyMustMatchPrivateKey => "PublicKeyMustMatchPrivateKey",
            Self::SignatureStringLengthOutOfRange { .. } => "SignatureStringLengthOutOfRange",
            Self::InvalidSignatureByteLength { .. } => "InvalidSignatureByteLength",
            Self::SubtleCryptoUnavailable { .. } => "SubtleCryptoUnavailable",
        }
    }
}

pub type AddressResult<T> = Result<T, AddressError>;
