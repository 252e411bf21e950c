//! `option(codec)` (C3): a one-byte presence flag followed by the value when
//! present.

use crate::core::{CodecSize, Decoder, Encoder};
use crate::error::CodecResult;
use crate::primitives::BoolCodec;

pub struct OptionCodec<C> {
    inner: C,
}

impl<C> OptionCodec<C> {
    pub fn new(inner: C) -> Self {
        Self { inner }
    }
}

impl<T, C: Encoder<T>> Encoder<Option<T>> for OptionCodec<C> {
    fn encoded_size(&self) -> CodecSize {
        CodecSize::Variable {
            max_size: self.inner.encoded_size().max_size().map(|n| n + 1),
        }
    }
    fn size_from_value(&self, value: &Option<T>) -> usize {
        1 + value.as_ref().map_or(0, |v| self.inner.size_from_value(v))
    }
    fn write(&self, value: &Option<T>, bytes: &mut [u8], offset: usize) -> CodecResult<usize> {
        let cursor = BoolCodec.write(&value.is_some(), bytes, offset)?;
        match value {
            Some(inner) => self.inner.write(inner, bytes, cursor),
            None => Ok(cursor),
        }
    }
}

impl<T, C: Decoder<T>> Decoder<Option<T>> for OptionCodec<C> {
    fn encoded_size(&self) -> CodecSize {
        CodecSize::Variable {
            max_size: self.inner.encoded_size().max_size().map(|n| n + 1),
        }
    }
    fn read(&self, bytes: &[u8], offset: usize) -> CodecResult<(Option<T>, usize)> {
        let (present, cursor) = BoolCodec.read(bytes, offset)?;
        if present {
            let (value, new_cursor) = self.inner.read(bytes, cursor)?;
            Ok((Some(value), new_cursor))
        } else {
            Ok((None, cursor))
        }
    }
}

pub fn option<C>(inner: C) -> OptionCodec<C> {
    OptionCodec::new(inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::U32LeCodec;

    #[test]
    fn option_round_trip() {
        let codec = option(U32LeCodec);
        assert_eq!(codec.encode(&Some(7u32)).unwrap(), vec![1, 7, 0, 0, 0]);
        assert_eq!(codec.encode(&None).unwrap(), vec![0]);
        assert_eq!(codec.decode(&[1, 7, 0, 0, 0]).unwrap(), Some(7u32));
        assert_eq!(codec.decode(&[0]).unwrap(), None);
    }
}
