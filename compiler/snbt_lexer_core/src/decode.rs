//! Charset sniffing and decoding of raw bytes into UTF-16 code units.
//!
//! # Encoding Detection
//!
//! When no charset is given, the first bytes are checked for a byte order
//! mark in this order: UTF-8, UTF-32BE, UTF-32LE, UTF-16BE, UTF-16LE. The
//! UTF-32 marks are checked before UTF-16 because `FF FE 00 00` also starts
//! with the UTF-16LE mark. Without a mark the input is read as UTF-8. A
//! sniffed mark is stripped; an explicit charset decodes every byte.
//!
//! Malformed input never fails: each malformed byte (UTF-8) or code unit
//! (UTF-16, UTF-32) becomes one U+FFFD and decoding carries on.

use std::fmt;

/// The replacement character emitted for malformed input.
const REPLACEMENT: u16 = 0xFFFD;

/// Fatal errors raised while turning input into a source buffer.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// An explicit charset label that names none of the supported encodings.
    #[error("unsupported charset `{label}`")]
    UnsupportedCharset { label: String },
    /// The normalized buffer does not fit in 32-bit offsets.
    #[error("input of {len} code units exceeds the maximum offset")]
    TooLarge { len: usize },
}

/// The Unicode transformation formats the decoder understands.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Charset {
    Utf8,
    Utf16Be,
    Utf16Le,
    Utf32Be,
    Utf32Le,
}

impl Charset {
    /// Resolve a charset label such as `"UTF-16LE"` or `"utf8"`.
    ///
    /// Labels without an explicit byte order (`UTF-16`, `UTF-32`) read as
    /// big-endian.
    pub fn for_label(label: &str) -> Result<Self, SourceError> {
        let normalized: String = label
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match normalized.as_str() {
            "utf8" => Ok(Charset::Utf8),
            "utf16" | "utf16be" => Ok(Charset::Utf16Be),
            "utf16le" => Ok(Charset::Utf16Le),
            "utf32" | "utf32be" => Ok(Charset::Utf32Be),
            "utf32le" => Ok(Charset::Utf32Le),
            _ => Err(SourceError::UnsupportedCharset {
                label: label.to_owned(),
            }),
        }
    }

    /// Canonical label, as accepted by [`Charset::for_label`].
    pub const fn label(self) -> &'static str {
        match self {
            Charset::Utf8 => "UTF-8",
            Charset::Utf16Be => "UTF-16BE",
            Charset::Utf16Le => "UTF-16LE",
            Charset::Utf32Be => "UTF-32BE",
            Charset::Utf32Le => "UTF-32LE",
        }
    }

    /// Detect a byte order mark, returning the charset and the mark length.
    pub fn sniff(bytes: &[u8]) -> Option<(Self, usize)> {
        match bytes {
            [0xEF, 0xBB, 0xBF, ..] => Some((Charset::Utf8, 3)),
            [0x00, 0x00, 0xFE, 0xFF, ..] => Some((Charset::Utf32Be, 4)),
            [0xFF, 0xFE, 0x00, 0x00, ..] => Some((Charset::Utf32Le, 4)),
            [0xFE, 0xFF, ..] => Some((Charset::Utf16Be, 2)),
            [0xFF, 0xFE, ..] => Some((Charset::Utf16Le, 2)),
            _ => None,
        }
    }
}

impl fmt::Display for Charset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Decode `bytes` into UTF-16 code units.
///
/// With `charset == None` a byte order mark is sniffed and stripped; input
/// without a mark is UTF-8.
pub fn decode(bytes: &[u8], charset: Option<Charset>) -> Vec<u16> {
    let (charset, body) = match charset {
        Some(cs) => (cs, bytes),
        None => match Charset::sniff(bytes) {
            Some((cs, bom_len)) => (cs, &bytes[bom_len..]),
            None => (Charset::Utf8, bytes),
        },
    };
    match charset {
        Charset::Utf8 => decode_utf8(body),
        Charset::Utf16Be => decode_utf16(body, u16::from_be_bytes),
        Charset::Utf16Le => decode_utf16(body, u16::from_le_bytes),
        Charset::Utf32Be => decode_utf32(body, u32::from_be_bytes),
        Charset::Utf32Le => decode_utf32(body, u32::from_le_bytes),
    }
}

fn decode_utf8(bytes: &[u8]) -> Vec<u16> {
    let mut out = Vec::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        out.extend(chunk.valid().encode_utf16());
        out.resize(out.len() + chunk.invalid().len(), REPLACEMENT);
    }
    out
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> Vec<u16> {
    let mut chunks = bytes.chunks_exact(2);
    let units = chunks.by_ref().map(|pair| unit([pair[0], pair[1]]));
    let mut out = Vec::with_capacity(bytes.len() / 2 + 1);
    for decoded in char::decode_utf16(units) {
        push_char(&mut out, decoded.unwrap_or(char::REPLACEMENT_CHARACTER));
    }
    if !chunks.remainder().is_empty() {
        out.push(REPLACEMENT);
    }
    out
}

fn decode_utf32(bytes: &[u8], unit: fn([u8; 4]) -> u32) -> Vec<u16> {
    let mut chunks = bytes.chunks_exact(4);
    let mut out = Vec::with_capacity(bytes.len() / 4 + 1);
    for quad in chunks.by_ref() {
        let value = unit([quad[0], quad[1], quad[2], quad[3]]);
        push_char(
            &mut out,
            char::from_u32(value).unwrap_or(char::REPLACEMENT_CHARACTER),
        );
    }
    if !chunks.remainder().is_empty() {
        out.push(REPLACEMENT);
    }
    out
}

#[inline]
fn push_char(out: &mut Vec<u16>, c: char) {
    let mut buf = [0u16; 2];
    out.extend_from_slice(c.encode_utf16(&mut buf));
}

#[cfg(test)]
mod tests;
