//! `patternMatch(patterns)` and `predicate(predicate, ifTrue, ifFalse)` (C3):
//! value- or byte-predicate dispatch among codecs that share an output type.

use crate::core::{Codec, CodecSize, Decoder, Encoder};
use crate::error::{CodecError, CodecResult};

type BoxedCodec<T> = Box<dyn Codec<T>>;

/// On encode, the first entry whose `value_predicate` accepts the value is
/// used. On decode, the first entry whose `bytes_predicate` accepts the
/// remaining bytes is used. Patterns are tried in order.
pub struct PatternMatchCodec<T> {
    encode_patterns: Vec<(Box<dyn Fn(&T) -> bool>, BoxedCodec<T>)>,
    decode_patterns: Vec<(Box<dyn Fn(&[u8]) -> bool>, BoxedCodec<T>)>,
}

impl<T> PatternMatchCodec<T> {
    pub fn new(
        encode_patterns: Vec<(Box<dyn Fn(&T) -> bool>, BoxedCodec<T>)>,
        decode_patterns: Vec<(Box<dyn Fn(&[u8]) -> bool>, BoxedCodec<T>)>,
    ) -> Self {
        Self {
            encode_patterns,
            decode_patterns,
        }
    }
}

impl<T> Encoder<T> for PatternMatchCodec<T> {
    fn encoded_size(&self) -> CodecSize {
        CodecSize::Variable { max_size: None }
    }
    fn size_from_value(&self, value: &T) -> usize {
        self.encode_patterns
            .iter()
            .find(|(predicate, _)| predicate(value))
            .map(|(_, codec)| codec.size_from_value(value))
            .unwrap_or(0)
    }
    fn write(&self, value: &T, bytes: &mut [u8], offset: usize) -> CodecResult<usize> {
        let (_, codec) = self
            .encode_patterns
            .iter()
            .find(|(predicate, _)| predicate(value))
            .ok_or(CodecError::InvalidPatternMatchValue)?;
        codec.write(value, bytes, offset)
    }
}

impl<T> Decoder<T> for PatternMatchCodec<T> {
    fn encoded_size(&self) -> CodecSize {
        CodecSize::Variable { max_size: None }
    }
    fn read(&self, bytes: &[u8], offset: usize) -> CodecResult<(T, usize)> {
        let remaining = &bytes[offset.min(bytes.len())..];
        let (_, codec) = self
            .decode_patterns
            .iter()
            .find(|(predicate, _)| predicate(remaining))
            .ok_or(CodecError::InvalidPatternMatchBytes)?;
        codec.read(bytes, offset)
    }
}

/// Simpler two-way dispatch: one predicate, one codec for each side.
pub struct PredicateCodec<T> {
    value_predicate: Box<dyn Fn(&T) -> bool>,
    bytes_predicate: Box<dyn Fn(&[u8]) -> bool>,
    if_true: BoxedCodec<T>,
    if_false: BoxedCodec<T>,
}

impl<T> PredicateCodec<T> {
    pub fn new(
        value_predicate: Box<dyn Fn(&T) -> bool>,
        bytes_predicate: Box<dyn Fn(&[u8]) -> bool>,
        if_true: BoxedCodec<T>,
        if_false: BoxedCodec<T>,
    ) -> Self {
        Self {
            value_predicate,
            bytes_predicate,
            if_true,
            if_false,
        }
    }
}

impl<T> Encoder<T> for PredicateCodec<T> {
    fn encoded_size(&self) -> CodecSize {
        CodecSize::Variable { max_size: None }
    }
    fn size_from_value(&self, value: &T) -> usize {
        if (self.value_predicate)(value) {
            self.if_true.size_from_value(value)
        } else {
            self.if_false.size_from_value(value)
        }
    }
    fn write(&self, value: &T, bytes: &mut [u8], offset: usize) -> CodecResult<usize> {
        if (self.value_predicate)(value) {
            self.if_true.write(value, bytes, offset)
        } else {
            self.if_false.write(value, bytes, offset)
        }
    }
}

impl<T> Decoder<T> for PredicateCodec<T> {
    fn encoded_size(&self) -> CodecSize {
        CodecSize::Variable { max_size: None }
    }
    fn read(&self, bytes: &[u8], offset: usize) -> CodecResult<(T, usize)> {
        let remaining = &bytes[offset.min(bytes.len())..];
        if (self.bytes_predicate)(remaining) {
            self.if_true.read(bytes, offset)
        } else {
            self.if_false.read(bytes, offset)
        }
    }
}
