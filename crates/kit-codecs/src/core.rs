//! The codec algebra (C1): `Encoder`, `Decoder`, `Codec`, and the
//! size-preserving combinators every other codec in this crate is built from.

use crate::bytes::contains_bytes;
use crate::error::{CodecError, CodecResult};

/// How many bytes a codec's output occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecSize {
    /// Every value of this codec encodes to exactly this many bytes.
    Fixed(usize),
    /// Size depends on the value. `max_size` is an upper bound if known.
    Variable { max_size: Option<usize> },
}

impl CodecSize {
    pub fn fixed(&self) -> Option<usize> {
        match self {
            CodecSize::Fixed(n) => Some(*n),
            CodecSize::Variable { .. } => None,
        }
    }

    pub fn max_size(&self) -> Option<usize> {
        match self {
            CodecSize::Fixed(n) => Some(*n),
            CodecSize::Variable { max_size } => *max_size,
        }
    }
}

/// Encodes values of type `T` into a byte buffer at a given offset.
pub trait Encoder<T: ?Sized> {
    fn encoded_size(&self) -> CodecSize;

    /// The exact number of bytes `write` will consume for this value.
    fn size_from_value(&self, value: &T) -> usize;

    /// Writes `value` into `bytes` starting at `offset`. Must advance the
    /// offset by exactly `size_from_value(value)` and must not write outside
    /// `[offset, offset + size_from_value(value))`.
    fn write(&self, value: &T, bytes: &mut [u8], offset: usize) -> CodecResult<usize>;

    fn encode(&self, value: &T) -> CodecResult<Vec<u8>> {
        let size = self.size_from_value(value);
        let mut out = vec![0u8; size];
        let end = self.write(value, &mut out, 0)?;
        debug_assert_eq!(end, size, "write() did not advance by size_from_value()");
        Ok(out)
    }
}

/// Decodes values of type `T` from a byte buffer starting at a given offset.
pub trait Decoder<T> {
    fn encoded_size(&self) -> CodecSize;

    /// Reads one `T` from `bytes` starting at `offset`, returning the value
    /// and the offset immediately after it.
    fn read(&self, bytes: &[u8], offset: usize) -> CodecResult<(T, usize)>;

    fn decode(&self, bytes: &[u8]) -> CodecResult<T> {
        let (value, _) = self.read(bytes, 0)?;
        Ok(value)
    }
}

/// A codec is simply something that is both an `Encoder<T>` and `Decoder<T>`.
pub trait Codec<T>: Encoder<T> + Decoder<T> {}
impl<T, C: Encoder<T> + Decoder<T> + ?Sized> Codec<T> for C {}

fn require_len(bytes: &[u8], offset: usize, needed: usize) -> CodecResult<()> {
    if bytes.len() < offset + needed {
        return Err(CodecError::ByteArrayTooShort {
            expected: needed,
            actual: bytes.len().saturating_sub(offset),
            offset,
        });
    }
    Ok(())
}

/// Pairs a standalone encoder with a standalone decoder into one `Codec<T>`,
/// checking at construction time that their fixed sizes (if any) agree.
pub struct CombinedCodec<E, D> {
    encoder: E,
    decoder: D,
}

impl<T, E: Encoder<T>, D: Decoder<T>> CombinedCodec<E, D> {
    pub fn try_new(encoder: E, decoder: D) -> CodecResult<Self> {
        if let (Some(e), Some(d)) = (encoder.encoded_size().fixed(), decoder.encoded_size().fixed())
        {
            if e != d {
                return Err(CodecError::MaxSizeExceeded {
                    codec_name: "combineCodec",
                    max_size: e,
                    actual_size: d,
                });
            }
        }
        Ok(Self { encoder, decoder })
    }
}

impl<T, E: Encoder<T>, D: Decoder<T>> Encoder<T> for CombinedCodec<E, D> {
    fn encoded_size(&self) -> CodecSize {
        self.encoder.encoded_size()
    }
    fn size_from_value(&self, value: &T) -> usize {
        self.encoder.size_from_value(value)
    }
    fn write(&self, value: &T, bytes: &mut [u8], offset: usize) -> CodecResult<usize> {
        self.encoder.write(value, bytes, offset)
    }
}

impl<T, E: Encoder<T>, D: Decoder<T>> Decoder<T> for CombinedCodec<E, D> {
    fn encoded_size(&self) -> CodecSize {
        self.decoder.encoded_size()
    }
    fn read(&self, bytes: &[u8], offset: usize) -> CodecResult<(T, usize)> {
        self.decoder.read(bytes, offset)
    }
}

pub fn combine_codec<T, E: Encoder<T>, D: Decoder<T>>(
    encoder: E,
    decoder: D,
) -> CodecResult<CombinedCodec<E, D>> {
    CombinedCodec::try_new(encoder, decoder)
}

/// `fixSize`: wraps a codec so it always occupies exactly `size` bytes,
/// zero-padding short encodings and truncating long ones.
pub struct FixSizeCodec<C> {
    inner: C,
    size: usize,
}

impl<C> FixSizeCodec<C> {
    pub fn new(inner: C, size: usize) -> Self {
        Self { inner, size }
    }
}

impl<T, C: Encoder<T>> Encoder<T> for FixSizeCodec<C> {
    fn encoded_size(&self) -> CodecSize {
        CodecSize::Fixed(self.size)
    }
    fn size_from_value(&self, _value: &T) -> usize {
        self.size
    }
    fn write(&self, value: &T, bytes: &mut [u8], offset: usize) -> CodecResult<usize> {
        require_len(bytes, offset, self.size)?;
        let inner_size = self.inner.size_from_value(value);
        let mut inner_buf = vec![0u8; inner_size];
        self.inner.write(value, &mut inner_buf, 0)?;
        let copy_len = inner_buf.len().min(self.size);
        bytes[offset..offset + copy_len].copy_from_slice(&inner_buf[..copy_len]);
        for b in &mut bytes[offset + copy_len..offset + self.size] {
            *b = 0;
        }
        Ok(offset + self.size)
    }
}

impl<T, C: Decoder<T>> Decoder<T> for FixSizeCodec<C> {
    fn encoded_size(&self) -> CodecSize {
        CodecSize::Fixed(self.size)
    }
    fn read(&self, bytes: &[u8], offset: usize) -> CodecResult<(T, usize)> {
        require_len(bytes, offset, self.size)?;
        let window = &bytes[offset..offset + self.size];
        let slice = match self.inner.encoded_size().fixed() {
            Some(inner_fixed) if inner_fixed <= window.len() => &window[..inner_fixed],
            _ => window,
        };
        let (value, _) = self.inner.read(slice, 0)?;
        Ok((value, offset + self.size))
    }
}

pub fn fix_size<C>(inner: C, size: usize) -> FixSizeCodec<C> {
    FixSizeCodec::new(inner, size)
}

/// `addSentinel`: appends a fixed byte sequence after the encoded body and,
/// on decode, scans for it to find where the body ends.
pub struct SentinelCodec<C> {
    inner: C,
    sentinel: Vec<u8>,
}

impl<C> SentinelCodec<C> {
    pub fn new(inner: C, sentinel: Vec<u8>) -> Self {
        Self { inner, sentinel }
    }
}

impl<T, C: Encoder<T>> Encoder<T> for SentinelCodec<C> {
    fn encoded_size(&self) -> CodecSize {
        match self.inner.encoded_size() {
            CodecSize::Fixed(n) => CodecSize::Fixed(n + self.sentinel.len()),
            CodecSize::Variable { max_size } => CodecSize::Variable {
                max_size: max_size.map(|m| m + self.sentinel.len()),
            },
        }
    }
    fn size_from_value(&self, value: &T) -> usize {
        self.inner.size_from_value(value) + self.sentinel.len()
    }
    fn write(&self, value: &T, bytes: &mut [u8], offset: usize) -> CodecResult<usize> {
        let inner_size = self.inner.size_from_value(value);
        let mut body = vec![0u8; inner_size];
        self.inner.write(value, &mut body, 0)?;
        if contains_bytes(&body, &self.sentinel, 0).is_some() {
            return Err(CodecError::EncodedBytesContainsSentinel {
                sentinel: self.sentinel.clone(),
            });
        }
        require_len(bytes, offset, inner_size + self.sentinel.len())?;
        bytes[offset..offset + inner_size].copy_from_slice(&body);
        bytes[offset + inner_size..offset + inner_size + self.sentinel.len()]
            .copy_from_slice(&self.sentinel);
        Ok(offset + inner_size + self.sentinel.len())
    }
}

impl<T, C: Decoder<T>> Decoder<T> for SentinelCodec<C> {
    fn encoded_size(&self) -> CodecSize {
        CodecSize::Variable { max_size: None }
    }
    fn read(&self, bytes: &[u8], offset: usize) -> CodecResult<(T, usize)> {
        let sentinel_pos = contains_bytes(bytes, &self.sentinel, offset).ok_or_else(|| {
            CodecError::SentinelMissingInDecodedBytes {
                sentinel: self.sentinel.clone(),
            }
        })?;
        let (value, _) = self.inner.read(&bytes[offset..sentinel_pos], 0)?;
        Ok((value, sentinel_pos + self.sentinel.len()))
    }
}

pub fn add_sentinel<C>(inner: C, sentinel: impl Into<Vec<u8>>) -> SentinelCodec<C> {
    SentinelCodec::new(inner, sentinel.into())
}

/// `sizePrefix`: prefixes the encoded body with its own byte length, using
/// `length_codec` (typically `u32_le` or `short_u16`).
pub struct SizePrefixCodec<C, L> {
    inner: C,
    length_codec: L,
}

impl<C, L> SizePrefixCodec<C, L> {
    pub fn new(inner: C, length_codec: L) -> Self {
        Self { inner, length_codec }
    }
}

impl<T, C: Encoder<T>, L: Encoder<u32>> Encoder<T> for SizePrefixCodec<C, L> {
    fn encoded_size(&self) -> CodecSize {
        CodecSize::Variable { max_size: None }
    }
    fn size_from_value(&self, value: &T) -> usize {
        let inner_size = self.inner.size_from_value(value);
        self.length_codec.size_from_value(&(inner_size as u32)) + inner_size
    }
    fn write(&self, value: &T, bytes: &mut [u8], offset: usize) -> CodecResult<usize> {
        let inner_size = self.inner.size_from_value(value);
        let after_len = self
            .length_codec
            .write(&(inner_size as u32), bytes, offset)?;
        self.inner.write(value, bytes, after_len)
    }
}

impl<T, C: Decoder<T>, L: Decoder<u32>> Decoder<T> for SizePrefixCodec<C, L> {
    fn encoded_size(&self) -> CodecSize {
        CodecSize::Variable { max_size: None }
    }
    fn read(&self, bytes: &[u8], offset: usize) -> CodecResult<(T, usize)> {
        let (len, after_len) = self.length_codec.read(bytes, offset)?;
        let len = len as usize;
        require_len(bytes, after_len, len)?;
        let (value, _) = self.inner.read(&bytes[after_len..after_len + len], 0)?;
        Ok((value, after_len + len))
    }
}

pub fn size_prefix<C, L>(inner: C, length_codec: L) -> SizePrefixCodec<C, L> {
    SizePrefixCodec::new(inner, length_codec)
}

/// `transformCodec`: lifts a `Codec<A>` into a `Codec<B>` via a pair of
/// total, infallible maps.
pub struct TransformCodec<C, ToInner, FromInner> {
    inner: C,
    to_inner: ToInner,
    from_inner: FromInner,
}

impl<C, ToInner, FromInner> TransformCodec<C, ToInner, FromInner> {
    pub fn new(inner: C, to_inner: ToInner, from_inner: FromInner) -> Self {
        Self {
            inner,
            to_inner,
            from_inner,
        }
    }
}

impl<A, B, C, ToInner, FromInner> Encoder<B> for TransformCodec<C, ToInner, FromInner>
where
    C: Encoder<A>,
    ToInner: Fn(&B) -> A,
{
    fn encoded_size(&self) -> CodecSize {
        self.inner.encoded_size()
    }
    fn size_from_value(&self, value: &B) -> usize {
        self.inner.size_from_value(&(self.to_inner)(value))
    }
    fn write(&self, value: &B, bytes: &mut [u8], offset: usize) -> CodecResult<usize> {
        self.inner.write(&(self.to_inner)(value), bytes, offset)
    }
}

impl<A, B, C, ToInner, FromInner> Decoder<B> for TransformCodec<C, ToInner, FromInner>
where
    C: Decoder<A>,
    FromInner: Fn(A) -> B,
{
    fn encoded_size(&self) -> CodecSize {
        self.inner.encoded_size()
    }
    fn read(&self, bytes: &[u8], offset: usize) -> CodecResult<(B, usize)> {
        let (value, new_offset) = self.inner.read(bytes, offset)?;
        Ok(((self.from_inner)(value), new_offset))
    }
}

pub fn transform_codec<C, ToInner, FromInner>(
    inner: C,
    to_inner: ToInner,
    from_inner: FromInner,
) -> TransformCodec<C, ToInner, FromInner> {
    TransformCodec::new(inner, to_inner, from_inner)
}
