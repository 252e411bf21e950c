//! Base58 / Base16 / Base64 string codecs (C2). Each is a `Codec<String>`
//! over its *textual* representation: encoding a string decodes its digits
//! into raw bytes, decoding raw bytes re-renders them as text. All three are
//! unbounded variable-size codecs meant to be wrapped with
//! [`crate::core::fix_size`] (e.g. a 32-byte address) or
//! [`crate::core::size_prefix`] (e.g. an arbitrary-length memo string).

use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;

use crate::core::{CodecSize, Decoder, Encoder};
use crate::error::{CodecError, CodecResult};

#[derive(Debug, Clone, Copy, Default)]
pub struct Base58Codec;

impl Encoder<String> for Base58Codec {
    fn encoded_size(&self) -> CodecSize {
        CodecSize::Variable { max_size: None }
    }
    fn size_from_value(&self, value: &String) -> usize {
        bs58::decode(value).into_vec().map(|v| v.len()).unwrap_or(0)
    }
    fn write(&self, value: &String, bytes: &mut [u8], offset: usize) -> CodecResult<usize> {
        let decoded = bs58::decode(value).into_vec().map_err(|e| {
            CodecError::InvalidEncodedString {
                encoding: "base58",
                message: e.to_string(),
            }
        })?;
        write_raw(&decoded, bytes, offset)
    }
}

impl Decoder<String> for Base58Codec {
    fn encoded_size(&self) -> CodecSize {
        CodecSize::Variable { max_size: None }
    }
    fn read(&self, bytes: &[u8], offset: usize) -> CodecResult<(String, usize)> {
        let rest = &bytes[offset.min(bytes.len())..];
        Ok((bs58::encode(rest).into_string(), bytes.len()))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Base16Codec;

impl Encoder<String> for Base16Codec {
    fn encoded_size(&self) -> CodecSize {
        CodecSize::Variable { max_size: None }
    }
    fn size_from_value(&self, value: &String) -> usize {
        hex::decode(value).map(|v| v.len()).unwrap_or(0)
    }
    fn write(&self, value: &String, bytes: &mut [u8], offset: usize) -> CodecResult<usize> {
        let decoded = hex::decode(value).map_err(|e| CodecError::InvalidEncodedString {
            encoding: "base16",
            message: e.to_string(),
        })?;
        write_raw(&decoded, bytes, offset)
    }
}

impl Decoder<String> for Base16Codec {
    fn encoded_size(&self) -> CodecSize {
        CodecSize::Variable { max_size: None }
    }
    fn read(&self, bytes: &[u8], offset: usize) -> CodecResult<(String, usize)> {
        let rest = &bytes[offset.min(bytes.len())..];
        Ok((hex::encode(rest), bytes.len()))
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Base64Codec;

impl Encoder<String> for Base64Codec {
    fn encoded_size(&self) -> CodecSize {
        CodecSize::Variable { max_size: None }
    }
    fn size_from_value(&self, value: &String) -> usize {
        BASE64_STANDARD.decode(value).map(|v| v.len()).unwrap_or(0)
    }
    fn write(&self, value: &String, bytes: &mut [u8], offset: usize) -> CodecResult<usize> {
        let decoded = BASE64_STANDARD
            .decode(value)
            .map_err(|e| CodecError::InvalidEncodedString {
                encoding: "base64",
                message: e.to_string(),
            })?;
        write_raw(&decoded, bytes, offset)
    }
}

impl Decoder<String> for Base64Codec {
    fn encoded_size(&self) -> CodecSize {
        CodecSize::Variable { max_size: None }
    }
    fn read(&self, bytes: &[u8], offset: usize) -> CodecResult<(String, usize)> {
        let rest = &bytes[offset.min(bytes.len())..];
        Ok((BASE64_STANDARD.encode(rest), bytes.len()))
    }
}

fn write_raw(decoded: &[u8], bytes: &mut [u8], offset: usize) -> CodecResult<usize> {
    if bytes.len() < offset + decoded.len() {
        return Err(CodecError::ByteArrayTooShort {
            expected: decoded.len(),
            actual: bytes.len().saturating_sub(offset),
            offset,
        });
    }
    bytes[offset..offset + decoded.len()].copy_from_slice(decoded);
    Ok(offset + decoded.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::fix_size;

    #[test]
    fn base58_round_trips_through_fixed_32_bytes() {
        let codec = fix_size(Base58Codec, 32);
        let address = "11111111111111111111111111111111".to_string();
        let encoded = codec.encode(&address).unwrap();
        assert_eq!(encoded.len(), 32);
        let decoded = codec.decode(&encoded).unwrap();
        assert_eq!(decoded, address);
    }

    #[test]
    fn base16_round_trip() {
        let value = "deadbeef".to_string();
        let encoded = Base16Codec.encode(&value).unwrap();
        assert_eq!(encoded, vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(Base16Codec.decode(&encoded).unwrap(), value);
    }

    #[test]
    fn base64_round_trip() {
        let value = "SGVsbG8h".to_string();
        let encoded = Base64Codec.encode(&value).unwrap();
        assert_eq!(encoded, b"Hello!");
        assert_eq!(Base64Codec.decode(&encoded).unwrap(), value);
    }
}
