//! `array(itemCodec, { size })` (C3): a length-prefixed or fixed-count
//! homogeneous sequence.

use crate::core::{CodecSize, Decoder, Encoder};
use crate::error::{CodecError, CodecResult};

/// A compact array: a length prefix (typically [`crate::primitives::ShortU16Codec`])
/// followed by that many items.
pub struct PrefixedArrayCodec<C, L> {
    item: C,
    length_codec: L,
}

impl<C, L> PrefixedArrayCodec<C, L> {
    pub fn new(item: C, length_codec: L) -> Self {
        Self { item, length_codec }
    }
}

impl<T, C: Encoder<T>, L: Encoder<u32>> Encoder<Vec<T>> for PrefixedArrayCodec<C, L> {
    fn encoded_size(&self) -> CodecSize {
        CodecSize::Variable { max_size: None }
    }
    fn size_from_value(&self, value: &Vec<T>) -> usize {
        let items_size: usize = value.iter().map(|v| self.item.size_from_value(v)).sum();
        self.length_codec.size_from_value(&(value.len() as u32)) + items_size
    }
    fn write(&self, value: &Vec<T>, bytes: &mut [u8], offset: usize) -> CodecResult<usize> {
        let mut cursor = self
            .length_codec
            .write(&(value.len() as u32), bytes, offset)?;
        for item in value {
            cursor = self.item.write(item, bytes, cursor)?;
        }
        Ok(cursor)
    }
}

impl<T, C: Decoder<T>, L: Decoder<u32>> Decoder<Vec<T>> for PrefixedArrayCodec<C, L> {
    fn encoded_size(&self) -> CodecSize {
        CodecSize::Variable { max_size: None }
    }
    fn read(&self, bytes: &[u8], offset: usize) -> CodecResult<(Vec<T>, usize)> {
        let (len, mut cursor) = self.length_codec.read(bytes, offset)?;
        let mut items = Vec::with_capacity(len as usize);
        for _ in 0..len {
            let (item, new_cursor) = self.item.read(bytes, cursor)?;
            items.push(item);
            cursor = new_cursor;
        }
        Ok((items, cursor))
    }
}

pub fn array<C, L>(item: C, length_codec: L) -> PrefixedArrayCodec<C, L> {
    PrefixedArrayCodec::new(item, length_codec)
}

/// An array with a statically known item count and no length prefix.
pub struct FixedCountArrayCodec<C> {
    item: C,
    count: usize,
}

impl<C> FixedCountArrayCodec<C> {
    pub fn new(item: C, count: usize) -> Self {
        Self { item, count }
    }
}

impl<T, C: Encoder<T>> Encoder<Vec<T>> for FixedCountArrayCodec<C> {
    fn encoded_size(&self) -> CodecSize {
        match self.item.encoded_size().fixed() {
            Some(item_size) => CodecSize::Fixed(item_size * self.count),
            None => CodecSize::Variable { max_size: None },
        }
    }
    fn size_from_value(&self, value: &Vec<T>) -> usize {
        value.iter().map(|v| self.item.size_from_value(v)).sum()
    }
    fn write(&self, value: &Vec<T>, bytes: &mut [u8], offset: usize) -> CodecResult<usize> {
        if value.len() != self.count {
            return Err(CodecError::ArrayLengthMismatch {
                expected: self.count,
                actual: value.len(),
            });
        }
        let mut cursor = offset;
        for item in value {
            cursor = self.item.write(item, bytes, cursor)?;
        }
        Ok(cursor)
    }
}

impl<T, C: Decoder<T>> Decoder<Vec<T>> for FixedCountArrayCodec<C> {
    fn encoded_size(&self) -> CodecSize {
        match self.item.encoded_size().fixed() {
            Some(item_size) => CodecSize::Fixed(item_size * self.count),
            None => CodecSize::Variable { max_size: None },
        }
    }
    fn read(&self, bytes: &[u8], offset: usize) -> CodecResult<(Vec<T>, usize)> {
        let mut items = Vec::with_capacity(self.count);
        let mut cursor = offset;
        for _ in 0..self.count {
            let (item, new_cursor) = self.item.read(bytes, cursor)?;
            items.push(item);
            cursor = new_cursor;
        }
        Ok((items, cursor))
    }
}

pub fn fixed_count_array<C>(item: C, count: usize) -> FixedCountArrayCodec<C> {
    FixedCountArrayCodec::new(item, count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{ShortU16AsU32Codec, U8Codec};

    #[test]
    fn prefixed_array_round_trip() {
        let codec = array(U8Codec, ShortU16AsU32Codec);
        let value = vec![1u8, 2, 3, 4, 5];
        let encoded = codec.encode(&value).unwrap();
        assert_eq!(encoded, vec![5, 1, 2, 3, 4, 5]);
        assert_eq!(codec.decode(&encoded).unwrap(), value);
    }

    #[test]
    fn fixed_count_array_rejects_wrong_length() {
        let codec = fixed_count_array(U8Codec, 3);
        assert!(codec.encode(&vec![1u8, 2]).is_err());
        let encoded = codec.encode(&vec![1u8, 2, 3]).unwrap();
        assert_eq!(encoded, vec![1, 2, 3]);
    }
}
