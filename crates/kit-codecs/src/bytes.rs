//! Byte-buffer helpers used across the primitive and structural codecs (C2).

/// Concatenates byte slices into one owned buffer.
pub fn merge_bytes(chunks: &[&[u8]]) -> Vec<u8> {
    let total: usize = chunks.iter().map(|c| c.len()).sum();
    let mut out = Vec::with_capacity(total);
    for chunk in chunks {
        out.extend_from_slice(chunk);
    }
    out
}

/// Right-pads `bytes` with zeros up to `len`. No-op if already `>= len`.
pub fn pad_bytes(bytes: &[u8], len: usize) -> Vec<u8> {
    if bytes.len() >= len {
        return bytes.to_vec();
    }
    let mut out = vec![0u8; len];
    out[..bytes.len()].copy_from_slice(bytes);
    out
}

/// Pads or truncates `bytes` to exactly `len`.
pub fn fix_bytes(bytes: &[u8], len: usize) -> Vec<u8> {
    if bytes.len() == len {
        bytes.to_vec()
    } else if bytes.len() < len {
        pad_bytes(bytes, len)
    } else {
        bytes[..len].to_vec()
    }
}

/// Returns the index of the first occurrence of `needle` in `data` at or
/// after `offset`, or `None` if absent. Mirrors the source's
/// `containsBytes(data, needle, offset)` helper used by `addSentinel`.
pub fn contains_bytes(data: &[u8], needle: &[u8], offset: usize) -> Option<usize> {
    if needle.is_empty() || offset > data.len() {
        return None;
    }
    data[offset..]
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| pos + offset)
}
