use kit_errors::ErrorCode;
use thiserror::Error;

/// Errors from the transaction message model and the compiler/decompiler
/// (C6, C7).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransactionError {
    #[error("message version {version} is not supported (only legacy and v0 messages are)")]
    VersionNumberOutOfRange { version: u8 },

    #[error("the message has no fee payer set")]
    FeePayerMissing,

    #[error("the message has no lifetime (blockhash or durable nonce) set")]
    LifetimeMissing,

    #[error("address-table lookup referenced an entry outside the table's bounds")]
    AddressLookupTableEntryMissing {
        lookup_table_address: String,
        address_index: u8,
    },

    #[error("a program address must be a static account, not looked up")]
    ProgramMustBeStatic,

    #[error("account {address} appears more than once in the account list")]
    DuplicateAccount { address: String },

    #[error("no signer was provided for signer account {address}")]
    SignatureMissingForAddress { address: String },

    #[error("instruction referenced account index {index}, but only {available} accounts are known")]
    AccountIndexOutOfBounds { index: u8, available: usize },

    #[error("a durable-nonce message's first instruction must be a nonce-advance instruction")]
    MissingNonceAdvanceInstruction,

    #[error("decompiling a blockhash-lifetime message requires a lastValidBlockHeight hint")]
    LifetimeHintMissing,

    #[error("the offchain message signing domain prefix is invalid")]
    InvalidOffchainSigningDomain,

    #[error("offchain message version {version} is not supported")]
    UnsupportedOffchainMessageVersion { version: u8 },

    #[error("offchain message must name at least one signatory")]
    OffchainMessageMissingSignatories,

    #[error("offchain message signatories must be unique")]
    DuplicateOffchainSignatory,

    #[error("offchain message signatories must be emitted in sorted order")]
    OffchainSignatoriesNotSorted,

    #[error("offchain message content must not be empty")]
    OffchainMessageContentEmpty,

    #[error(transparent)]
    Codec(#[from] kit_codecs::error::CodecError),

    #[error(transparent)]
    Address(#[from] kit_addresses::AddressError),
}

impl ErrorCode for TransactionError {
    fn code(&self) -> &'static str {
        match self {
            Self::VersionNumberOutOfRange { .. } => "VersionNumberOutOfRange",
            Self::FeePayerMissing => "FeePayerMissing",
            Self::LifetimeMissing => "LifetimeMissing",
            Self::AddressLookupTableEntryMissing { .. } => "AddressLookupTableEntryMissing",
            Self::ProgramMustBeStatic => "ProgramMustBeStatic",
            Self::DuplicateAccount { .. } => "DuplicateAccount",
            Self::SignatureMissingForAddress { .. } => "SignatureMissingForAddress",
            Self::AccountIndexOutOfBounds { .. } => "AccountIndexOutOfBounds",
            Self::MissingNonceAdvanceInstruction => "MissingNonceAdvanceInstruction",
            Self::LifetimeHintMissing => "LifetimeHintMissing",
            Self::InvalidOffchainSigningDomain => "InvalidOffchainSigningDomain",
            Self::UnsupportedOffchainMessageVersion { .. } => "UnsupportedOffchainMessageVersion",
            Self::OffchainMessageMissingSignatories => "OffchainMessageMissingSignatories",
            Self::DuplicateOffchainSignatory => "DuplicateOffchainSignatory",
            Self::OffchainSignatoriesNotSorted => "OffchainSignatoriesNotSorted",
            Self::OffchainMessageContentEmpty => "OffchainMessageContentEmpty",
            Self::Codec(inner) => inner.code(),
            Self::Address(inner) => inner.code(),
        }
    }
}

pub type TransactionResult<T> = Result<T, TransactionError>;
