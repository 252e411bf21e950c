use kit_errors::ErrorCode;
use thiserror::Error;

/// Every failure the codec algebra (C1–C3) can produce.
///
/// Codec errors never wrap a cause — they are always the bottom of whatever
/// chain calls into them — so they carry the offending offset/value directly
/// instead of using `#[source]`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CodecError {
    #[error("{codec_name}: value {value} is out of range [{min}, {max}]")]
    NumberOutOfRange {
        codec_name: &'static str,
        min: i128,
        max: i128,
        value: i128,
    },

    #[error("{codec_name}: expected constant {expected:?}, found {actual:?}")]
    InvalidConstant {
        codec_name: &'static str,
        expected: Vec<u8>,
        actual: Vec<u8>,
    },

    #[error("enum discriminator {discriminator} is out of range [0, {max_index}]")]
    EnumDiscriminatorOutOfRange { discriminator: u32, max_index: usize },

    #[error("{variant_name:?} is not a valid variant of this enum")]
    InvalidEnumVariant { variant_name: String },

    #[error("cannot use lexical/non-numeric values as enum discriminators")]
    CannotUseLexicalValuesAsEnumDiscriminators,

    #[error("literal union discriminator {discriminator} is out of range [0, {max_index}]")]
    LiteralUnionDiscriminatorOutOfRange { discriminator: u32, max_index: usize },

    #[error("{value:?} is not a valid literal union variant")]
    InvalidLiteralUnionVariant { value: String },

    #[error("no pattern matched the provided value")]
    InvalidPatternMatchValue,

    #[error("no pattern matched the provided bytes")]
    InvalidPatternMatchBytes,

    #[error("encoded bytes contain the sentinel sequence {sentinel:?}")]
    EncodedBytesContainsSentinel { sentinel: Vec<u8> },

    #[error("sentinel sequence {sentinel:?} was not found in the decoded bytes")]
    SentinelMissingInDecodedBytes { sentinel: Vec<u8> },

    #[error("expected at least {expected} bytes at offset {offset}, found {actual}")]
    ByteArrayTooShort {
        expected: usize,
        actual: usize,
        offset: usize,
    },

    #[error("{codec_name}: declared max size {max_size} exceeded by {actual_size} bytes")]
    MaxSizeExceeded {
        codec_name: &'static str,
        max_size: usize,
        actual_size: usize,
    },

    #[error("invalid utf-8 string")]
    InvalidUtf8,

    #[error("invalid {encoding} string: {message}")]
    InvalidEncodedString {
        encoding: &'static str,
        message: String,
    },

    #[error("fixed-count array expected {expected} items, found {actual}")]
    ArrayLengthMismatch { expected: usize, actual: usize },
}

impl ErrorCode for CodecError {
    fn code(&self) -> &'static str {
        match self {
            Self::NumberOutOfRange { .. } => "NumberOutOfRange",
            Self::InvalidConstant { .. } => "InvalidConstant",
            Self::EnumDiscriminatorOutOfRange { .. } => "EnumDiscriminatorOutOfRange",
            Self::InvalidEnumVariant { .. } => "InvalidEnumVariant",
            Self::CannotUseLexicalValuesAsEnumDiscriminators => {
                "CannotUseLexicalValuesAsEnumDiscriminators"
            }
            Self::LiteralUnionDiscriminatorOutOfRange { .. } => {
                "LiteralUnionDiscriminatorOutOfRange"
            }
            Self::InvalidLiteralUnionVariant { .. } => "InvalidLiteralUnionVariant",
            Self::InvalidPatternMatchValue => "InvalidPatternMatchValue",
            Self::InvalidPatternMatchBytes => "InvalidPatternMatchBytes",
            Self::EncodedBytesContainsSentinel { .. } => "EncodedBytesContainsSentinel",
            Self::SentinelMissingInDecodedBytes { .. } => "SentinelMissingInDecodedBytes",
            Self::ByteArrayTooShort { .. } => "ByteArrayTooShort",
            Self::MaxSizeExceeded { .. } => "MaxSizeExceeded",
            Self::InvalidUtf8 => "InvalidUtf8",
            Self::InvalidEncodedString { .. } => "InvalidEncodedString",
            Self::ArrayLengthMismatch { .. } => "ArrayLengthMismatch",
        }
    }
}

pub type CodecResult<T> = Result<T, CodecError>;
