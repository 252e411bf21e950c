//! The composable binary codec framework (C1, C2, C3): a tiny algebra over
//! byte buffers with precise fixed/variable size tracking, offset arithmetic,
//! and combinators. Every wire format in this workspace (`kit-addresses`,
//! `kit-transactions`) is built from the pieces in this crate.

pub mod arrays;
pub mod bytes;
pub mod core;
pub mod enums;
pub mod error;
pub mod option;
pub mod pattern;
pub mod primitives;
pub mod sentinel_string;
pub mod strings;
pub mod structs;

pub use core::{
    add_sentinel, combine_codec, fix_size, size_prefix, transform_codec, Codec, CodecSize,
    Decoder, Encoder,
};
pub use error::{CodecError, CodecResult};
