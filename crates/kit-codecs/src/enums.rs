//! `enum(variants, { size, useValuesAsDiscriminators })` and
//! `literalUnion(variants, { size })` (C3): discriminator-tagged closed sets.

use crate::core::{Codec, CodecSize, Decoder, Encoder};
use crate::error::{CodecError, CodecResult};

/// The discriminator table shared by [`EnumCodec`]: maps each variant's
/// logical index to the byte(s) written for it.
struct DiscriminatorTable<D> {
    codec: D,
    /// `values[i]` is the on-wire discriminator for logical variant `i`.
    values: Vec<u32>,
}

impl<D: Codec<u32>> DiscriminatorTable<D> {
    fn positional(codec: D, variant_count: usize) -> Self {
        Self {
            codec,
            values: (0..variant_count as u32).collect(),
        }
    }

    fn explicit(codec: D, values: Vec<u32>) -> CodecResult<Self> {
        if values.is_empty() {
            return Err(CodecError::CannotUseLexicalValuesAsEnumDiscriminators);
        }
        Ok(Self { codec, values })
    }

    fn encode_index(&self, index: usize) -> CodecResult<Vec<u8>> {
        self.codec.encode(&self.values[index])
    }

    fn decode_index(&self, bytes: &[u8], offset: usize) -> CodecResult<(usize, usize)> {
        let (discriminator, new_offset) = self.codec.read(bytes, offset)?;
        match self.values.iter().position(|&v| v == discriminator) {
            Some(index) => Ok((index, new_offset)),
            None if (discriminator as usize) >= self.values.len() => {
                Err(CodecError::EnumDiscriminatorOutOfRange {
                    discriminator,
                    max_index: self.values.len().saturating_sub(1),
                })
            }
            None => Err(CodecError::InvalidEnumVariant {
                variant_name: format!("discriminator {discriminator}"),
            }),
        }
    }
}

/// A codec over a closed, unit-variant enum type `T`. `to_index`/`from_index`
/// connect `T` to its logical variant position; the discriminator actually
/// written on the wire may either equal that position (`positional`) or an
/// explicit value per variant (`with_explicit_values`, the
/// `useValuesAsDiscriminators` mode).
pub struct EnumCodec<D, ToIndex, FromIndex> {
    table: DiscriminatorTable<D>,
    to_index: ToIndex,
    from_index: FromIndex,
}

impl<D: Codec<u32>, ToIndex, FromIndex> EnumCodec<D, ToIndex, FromIndex> {
    pub fn positional(
        discriminator_codec: D,
        variant_count: usize,
        to_index: ToIndex,
        from_index: FromIndex,
    ) -> Self {
        Self {
            table: DiscriminatorTable::positional(discriminator_codec, variant_count),
            to_index,
            from_index,
        }
    }

    pub fn with_explicit_values(
        discriminator_codec: D,
        values: Vec<u32>,
        to_index: ToIndex,
        from_index: FromIndex,
    ) -> CodecResult<Self> {
        Ok(Self {
            table: DiscriminatorTable::explicit(discriminator_codec, values)?,
            to_index,
            from_index,
        })
    }
}

impl<T, D: Codec<u32>, ToIndex: Fn(&T) -> usize, FromIndex> Encoder<T>
    for EnumCodec<D, ToIndex, FromIndex>
{
    fn encoded_size(&self) -> CodecSize {
        self.table.codec.encoded_size()
    }
    fn size_from_value(&self, value: &T) -> usize {
        let index = (self.to_index)(value);
        self.table.codec.size_from_value(&self.table.values[index])
    }
    fn write(&self, value: &T, bytes: &mut [u8], offset: usize) -> CodecResult<usize> {
        let index = (self.to_index)(value);
        let discriminator = self.table.values[index];
        self.table.codec.write(&discriminator, bytes, offset)
    }
}

impl<T, D: Codec<u32>, ToIndex, FromIndex: Fn(usize) -> T> Decoder<T>
    for EnumCodec<D, ToIndex, FromIndex>
{
    fn encoded_size(&self) -> CodecSize {
        self.table.codec.encoded_size()
    }
    fn read(&self, bytes: &[u8], offset: usize) -> CodecResult<(T, usize)> {
        let (index, new_offset) = self.table.decode_index(bytes, offset)?;
        Ok(((self.from_index)(index), new_offset))
    }
}

/// A codec over a closed set of concrete literal values (rather than a Rust
/// enum type): the discriminator is the value's position in `variants`.
pub struct LiteralUnionCodec<T, D> {
    discriminator_codec: D,
    variants: Vec<T>,
}

impl<T: PartialEq + Clone, D: Codec<u32>> LiteralUnionCodec<T, D> {
    pub fn new(discriminator_codec: D, variants: Vec<T>) -> Self {
        Self {
            discriminator_codec,
            variants,
        }
    }
}

impl<T: PartialEq + std::fmt::Debug, D: Codec<u32>> Encoder<T> for LiteralUnionCodec<T, D> {
    fn encoded_size(&self) -> CodecSize {
        self.discriminator_codec.encoded_size()
    }
    fn size_from_value(&self, value: &T) -> usize {
        match self.variants.iter().position(|v| v == value) {
            Some(index) => self.discriminator_codec.size_from_value(&(index as u32)),
            None => 0,
        }
    }
    fn write(&self, value: &T, bytes: &mut [u8], offset: usize) -> CodecResult<usize> {
        let index = self
            .variants
            .iter()
            .position(|v| v == value)
            .ok_or_else(|| CodecError::InvalidLiteralUnionVariant {
                value: format!("{value:?}"),
            })?;
        self.discriminator_codec
            .write(&(index as u32), bytes, offset)
    }
}

impl<T: Clone + std::fmt::Debug, D: Codec<u32>> Decoder<T> for LiteralUnionCodec<T, D> {
    fn encoded_size(&self) -> CodecSize {
        self.discriminator_codec.encoded_size()
    }
    fn read(&self, bytes: &[u8], offset: usize) -> CodecResult<(T, usize)> {
        let (index, new_offset) = self.discriminator_codec.read(bytes, offset)?;
        let variant = self
            .variants
            .get(index as usize)
            .cloned()
            .ok_or(CodecError::LiteralUnionDiscriminatorOutOfRange {
                discriminator: index,
                max_index: self.variants.len().saturating_sub(1),
            })?;
        Ok((variant, new_offset))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::{ShortU16AsU32Codec, U8Codec};
    use crate::core::transform_codec;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Direction {
        Up,
        Down,
        Left,
        Right,
    }

    fn u8_as_u32() -> impl Codec<u32> {
        transform_codec(U8Codec, |v: &u32| *v as u8, |v: u8| v as u32)
    }

    fn direction_codec() -> EnumCodec<impl Codec<u32>, fn(&Direction) -> usize, fn(usize) -> Direction>
    {
        EnumCodec::positional(
            u8_as_u32(),
            4,
            (|d: &Direction| *d as usize) as fn(&Direction) -> usize,
            (|i: usize| match i {
                0 => Direction::Up,
                1 => Direction::Down,
                2 => Direction::Left,
                _ => Direction::Right,
            }) as fn(usize) -> Direction,
        )
    }

    #[test]
    fn enum_discriminator_examples_from_spec() {
        let codec = direction_codec();
        assert_eq!(codec.encode(&Direction::Left).unwrap(), vec![0x02]);
        assert_eq!(codec.decode(&[0x03]).unwrap(), Direction::Right);
        let err = codec.decode(&[0x04]).unwrap_err();
        assert_eq!(
            err,
            CodecError::EnumDiscriminatorOutOfRange {
                discriminator: 4,
                max_index: 3
            }
        );
    }

    #[test]
    fn literal_union_round_trip() {
        let codec = LiteralUnionCodec::new(
            ShortU16AsU32Codec,
            vec!["legacy".to_string(), "v0".to_string()],
        );
        assert_eq!(codec.encode(&"v0".to_string()).unwrap(), vec![0x01]);
        assert_eq!(codec.decode(&[0x00]).unwrap(), "legacy".to_string());
        assert!(codec.decode(&[0x02]).is_err());
    }
}
