//! `struct([[name, codec], ...])` (C3): sequential field encode/decode,
//! fixed-size exactly when every field is fixed-size.
//!
//! Rust has no heterogeneous list type to hold an arbitrary number of
//! differently-typed field codecs, so this is implemented as one tuple-typed
//! codec per arity (`Struct2`, `Struct3`, ...). Callers compose the tuple
//! codec with [`crate::core::transform_codec`] to map to/from their actual
//! named struct.

use crate::core::{CodecSize, Decoder, Encoder};
use crate::error::CodecResult;

macro_rules! define_struct_codec {
    ($name:ident, $($field:ident : $ty:ident as $codec:ident),+) => {
        pub struct $name<$($codec),+> {
            $($field: $codec),+
        }

        impl<$($codec),+> $name<$($codec),+> {
            #[allow(clippy::too_many_arguments)]
            pub fn new($($field: $codec),+) -> Self {
                Self { $($field),+ }
            }
        }

        impl<$($ty, $codec: Encoder<$ty>),+> Encoder<($($ty,)+)> for $name<$($codec),+> {
            fn encoded_size(&self) -> CodecSize {
                let mut total = 0usize;
                $(
                    match self.$field.encoded_size().fixed() {
                        Some(n) => total += n,
                        None => return CodecSize::Variable { max_size: None },
                    }
                )+
                CodecSize::Fixed(total)
            }

            fn size_from_value(&self, value: &($($ty,)+)) -> usize {
                #[allow(non_snake_case)]
                let ($($ty,)+) = value;
                let mut total = 0usize;
                $(
                    total += self.$field.size_from_value($ty);
                )+
                total
            }

            fn write(&self, value: &($($ty,)+), bytes: &mut [u8], offset: usize) -> CodecResult<usize> {
                #[allow(non_snake_case)]
                let ($($ty,)+) = value;
                let mut cursor = offset;
                $(
                    cursor = self.$field.write($ty, bytes, cursor)?;
                )+
                Ok(cursor)
            }
        }

        impl<$($ty, $codec: Decoder<$ty>),+> Decoder<($($ty,)+)> for $name<$($codec),+> {
            fn encoded_size(&self) -> CodecSize {
                let mut total = 0usize;
                $(
                    match self.$field.encoded_size().fixed() {
                        Some(n) => total += n,
                        None => return CodecSize::Variable { max_size: None },
                    }
                )+
                CodecSize::Fixed(total)
            }

            fn read(&self, bytes: &[u8], offset: usize) -> CodecResult<(($($ty,)+), usize)> {
                let mut cursor = offset;
                $(
                    let ($field, new_cursor) = self.$field.read(bytes, cursor)?;
                    cursor = new_cursor;
                )+
                Ok((($($field,)+), cursor))
            }
        }
    };
}

define_struct_codec!(Struct2, a: A as CA, b: B as CB);
define_struct_codec!(Struct3, a: A as CA, b: B as CB, c: C as CC);
define_struct_codec!(Struct4, a: A as CA, b: B as CB, c: C as CC, d: D as CD);
define_struct_codec!(Struct5, a: A as CA, b: B as CB, c: C as CC, d: D as CD, e: E as CE);
define_struct_codec!(Struct6, a: A as CA, b: B as CB, c: C as CC, d: D as CD, e: E as CE, f: F as CF);
