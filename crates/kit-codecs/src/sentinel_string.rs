//! UTF-8 string codec and the sentinel-framed string convenience built on
//! top of it (C3's "sentinel-framed strings").

use crate::core::{add_sentinel, CodecSize, Decoder, Encoder, SentinelCodec};
use crate::error::{CodecError, CodecResult};

/// An unbounded variable-size codec over raw UTF-8 text (no length prefix —
/// wrap with [`crate::core::size_prefix`] or [`crate::core::fix_size`]).
#[derive(Debug, Clone, Copy, Default)]
pub struct Utf8Codec;

impl Encoder<String> for Utf8Codec {
    fn encoded_size(&self) -> CodecSize {
        CodecSize::Variable { max_size: None }
    }
    fn size_from_value(&self, value: &String) -> usize {
        value.len()
    }
    fn write(&self, value: &String, bytes: &mut [u8], offset: usize) -> CodecResult<usize> {
        let body = value.as_bytes();
        if bytes.len() < offset + body.len() {
            return Err(CodecError::ByteArrayTooShort {
                expected: body.len(),
                actual: bytes.len().saturating_sub(offset),
                offset,
            });
        }
        bytes[offset..offset + body.len()].copy_from_slice(body);
        Ok(offset + body.len())
    }
}

impl Decoder<String> for Utf8Codec {
    fn encoded_size(&self) -> CodecSize {
        CodecSize::Variable { max_size: None }
    }
    fn read(&self, bytes: &[u8], offset: usize) -> CodecResult<(String, usize)> {
        let rest = &bytes[offset.min(bytes.len())..];
        let value = String::from_utf8(rest.to_vec()).map_err(|_| CodecError::InvalidUtf8)?;
        Ok((value, bytes.len()))
    }
}

/// A UTF-8 string terminated by `sentinel` (commonly a single `0x00` byte),
/// used for C-string-like fields embedded in a larger structure.
pub fn sentinel_terminated_utf8(sentinel: impl Into<Vec<u8>>) -> SentinelCodec<Utf8Codec> {
    add_sentinel(Utf8Codec, sentinel)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_terminated_string_round_trip() {
        let codec = sentinel_terminated_utf8(vec![0u8]);
        let value = "hello".to_string();
        let encoded = codec.encode(&value).unwrap();
        assert_eq!(encoded, b"hello\0");
        assert_eq!(codec.decode(&encoded).unwrap(), value);
    }

    #[test]
    fn sentinel_in_body_is_rejected() {
        let codec = sentinel_terminated_utf8(vec![b'l']);
        assert!(codec.encode(&"hello".to_string()).is_err());
    }
}
