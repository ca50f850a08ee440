//! Normalized source buffer.
//!
//! [`SourceText`] owns the canonical UTF-16 code units the scanner reads,
//! the [`LineIndex`] built over them, and the location settings (starting
//! line and column, tab width) used for diagnostics.
//!
//! # Normalization
//!
//! Each step is toggled by a [`NormalizeFlags`] bit:
//!
//! - `PRESERVE_LINES` unset: `\r\n` and lone `\r` become `\n`
//! - `PRESERVE_TABS` unset: `\t` expands to spaces up to the next tab stop
//! - `UNICODE_ESCAPES` set: `\uXXXX` (any number of `u`s) becomes the code
//!   unit it names, unless the backslash is itself escaped
//! - `FINAL_NEWLINE` set: a `\n` is appended unless the text already ends
//!   with a line terminator
//!
//! The defaults keep tabs, fold line endings, and leave escapes alone.

use bitflags::bitflags;

use crate::decode::{decode, Charset, SourceError};
use crate::line_index::{is_high_surrogate, is_low_surrogate, LineIndex};

/// Default tab width for column reporting.
pub const DEFAULT_TAB_SIZE: u32 = 1;

bitflags! {
    /// Toggles for the normalization pass.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
    pub struct NormalizeFlags: u8 {
        /// Keep `\t` as is instead of expanding it to spaces.
        const PRESERVE_TABS = 1 << 0;
        /// Keep `\r` and `\r\n` as is instead of folding them to `\n`.
        const PRESERVE_LINES = 1 << 1;
        /// Expand `\uXXXX` escapes.
        const UNICODE_ESCAPES = 1 << 2;
        /// Guarantee the buffer ends with a line terminator.
        const FINAL_NEWLINE = 1 << 3;
    }
}

impl Default for NormalizeFlags {
    fn default() -> Self {
        NormalizeFlags::PRESERVE_TABS
    }
}

/// How raw input turns into a [`SourceText`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceOptions {
    pub flags: NormalizeFlags,
    /// Tab width used for tab expansion and column reporting.
    pub tab_size: u32,
    /// Line number reported for the first line.
    pub starting_line: u32,
    /// Column number reported for the first character of the first line.
    pub starting_column: u32,
}

impl Default for SourceOptions {
    fn default() -> Self {
        SourceOptions {
            flags: NormalizeFlags::default(),
            tab_size: DEFAULT_TAB_SIZE,
            starting_line: 1,
            starting_column: 1,
        }
    }
}

impl SourceOptions {
    /// Options for a fragment embedded at `line`:`column` of a larger file.
    #[must_use]
    pub fn at(line: u32, column: u32) -> Self {
        SourceOptions {
            starting_line: line,
            starting_column: column,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_flags(mut self, flags: NormalizeFlags) -> Self {
        self.flags = flags;
        self
    }

    #[must_use]
    pub fn with_tab_size(mut self, tab_size: u32) -> Self {
        self.tab_size = tab_size;
        self
    }
}

/// The normalized code units plus everything needed to report positions.
#[derive(Clone, Debug)]
pub struct SourceText {
    units: Vec<u16>,
    lines: LineIndex,
    tab_size: u32,
    starting_line: u32,
    starting_column: u32,
}

impl SourceText {
    /// Normalize `raw` code units per `options`.
    ///
    /// Fails only when the normalized buffer is too long for `u32` offsets.
    pub fn new(raw: &[u16], options: &SourceOptions) -> Result<Self, SourceError> {
        let units = normalize(raw, options.flags, options.tab_size);
        // One extra slot is addressed past the end by the token cache.
        if units.len() >= u32::MAX as usize {
            return Err(SourceError::TooLarge { len: units.len() });
        }
        let lines = LineIndex::build(&units);
        Ok(SourceText {
            units,
            lines,
            tab_size: options.tab_size,
            starting_line: options.starting_line,
            starting_column: options.starting_column,
        })
    }

    /// Normalize UTF-8 text.
    pub fn from_text(text: &str, options: &SourceOptions) -> Result<Self, SourceError> {
        let raw: Vec<u16> = text.encode_utf16().collect();
        Self::new(&raw, options)
    }

    /// Decode `bytes` (sniffing a byte order mark when `charset` is `None`)
    /// and normalize the result.
    pub fn from_bytes(
        bytes: &[u8],
        charset: Option<Charset>,
        options: &SourceOptions,
    ) -> Result<Self, SourceError> {
        Self::new(&decode(bytes, charset), options)
    }

    pub fn units(&self) -> &[u16] {
        &self.units
    }

    pub fn lines(&self) -> &LineIndex {
        &self.lines
    }

    /// Length in code units.
    #[allow(clippy::cast_possible_truncation)]
    pub fn len(&self) -> u32 {
        // Checked against `u32::MAX` in `new`.
        self.units.len() as u32
    }

    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// The code unit at `pos`, if inside the buffer.
    #[inline]
    pub fn unit(&self, pos: u32) -> Option<u16> {
        self.units.get(pos as usize).copied()
    }

    /// The character starting at `pos` and the number of code units it
    /// occupies. A high surrogate followed by a low surrogate is one
    /// character of width 2; an unpaired surrogate reads as U+FFFD with
    /// width 1.
    #[inline]
    pub fn char_at(&self, pos: u32) -> Option<(char, u32)> {
        let unit = self.unit(pos)?;
        if is_high_surrogate(unit) {
            if let Some(low) = self.unit(pos + 1).filter(|&u| is_low_surrogate(u)) {
                let scalar =
                    0x10000 + ((u32::from(unit) - 0xD800) << 10) + (u32::from(low) - 0xDC00);
                let c = char::from_u32(scalar).unwrap_or(char::REPLACEMENT_CHARACTER);
                return Some((c, 2));
            }
        }
        Some((
            char::from_u32(u32::from(unit)).unwrap_or(char::REPLACEMENT_CHARACTER),
            1,
        ))
    }

    /// Lossy UTF-8 rendering of `begin..end`, clamped to the buffer.
    pub fn slice(&self, begin: u32, end: u32) -> String {
        let len = self.units.len();
        let end = (end as usize).min(len);
        let begin = (begin as usize).min(end);
        String::from_utf16_lossy(&self.units[begin..end])
    }

    pub fn tab_size(&self) -> u32 {
        self.tab_size
    }

    pub fn set_tab_size(&mut self, tab_size: u32) {
        self.tab_size = tab_size;
    }

    pub fn starting_line(&self) -> u32 {
        self.starting_line
    }

    pub fn starting_column(&self) -> u32 {
        self.starting_column
    }

    /// Line number holding `pos`. See [`LineIndex::line_from_offset`].
    pub fn line_from_offset(&self, pos: u32) -> u32 {
        self.lines
            .line_from_offset(&self.units, pos, self.starting_line)
    }

    /// Column of `pos`. See [`LineIndex::column_from_offset`].
    pub fn column_from_offset(&self, pos: u32) -> u32 {
        self.lines
            .column_from_offset(&self.units, pos, self.starting_column, self.tab_size)
    }
}

const LF: u16 = b'\n' as u16;
const CR: u16 = b'\r' as u16;
const TAB: u16 = b'\t' as u16;
const BACKSLASH: u16 = b'\\' as u16;
const LOWER_U: u16 = b'u' as u16;
const SPACE: u16 = b' ' as u16;

/// Apply the normalization steps selected by `flags`.
pub(crate) fn normalize(raw: &[u16], flags: NormalizeFlags, tab_size: u32) -> Vec<u16> {
    let preserve_tabs = flags.contains(NormalizeFlags::PRESERVE_TABS);
    let preserve_lines = flags.contains(NormalizeFlags::PRESERVE_LINES);
    let escapes = flags.contains(NormalizeFlags::UNICODE_ESCAPES);

    let mut out = if preserve_tabs && preserve_lines && !escapes {
        raw.to_vec()
    } else {
        let tab_size = tab_size.max(1);
        let mut out = Vec::with_capacity(raw.len());
        let mut col = 0u32;
        let mut index = 0;
        while index < raw.len() {
            let unit = raw[index];
            index += 1;
            if unit == LF {
                out.push(unit);
                col = 0;
            } else if escapes && unit == BACKSLASH && raw.get(index) == Some(&LOWER_U) {
                let slashes = raw[..index]
                    .iter()
                    .rev()
                    .take_while(|&&u| u == BACKSLASH)
                    .count();
                col += 1;
                if slashes % 2 == 0 {
                    out.push(BACKSLASH);
                    continue;
                }
                let us = raw[index..].iter().take_while(|&&u| u == LOWER_U).count();
                match parse_hex4(raw.get(index + us..index + us + 4)) {
                    Some(decoded) => {
                        out.push(decoded);
                        index += us + 4;
                    }
                    // Malformed escapes stay verbatim.
                    None => out.push(BACKSLASH),
                }
            } else if !preserve_lines && unit == CR {
                out.push(LF);
                col = 0;
                if raw.get(index) == Some(&LF) {
                    index += 1;
                }
            } else if unit == TAB && !preserve_tabs {
                let spaces = tab_size - col % tab_size;
                out.resize(out.len() + spaces as usize, SPACE);
                col += spaces;
            } else {
                out.push(unit);
                if !is_low_surrogate(unit) {
                    col += 1;
                }
            }
        }
        out
    };

    if flags.contains(NormalizeFlags::FINAL_NEWLINE) && !matches!(out.last(), Some(&(LF | CR))) {
        out.push(LF);
    }
    out
}

fn parse_hex4(digits: Option<&[u16]>) -> Option<u16> {
    let digits = digits?;
    digits.iter().try_fold(0u16, |acc, &unit| {
        let digit = char::from_u32(u32::from(unit))?.to_digit(16)?;
        Some((acc << 4) | u16::try_from(digit).ok()?)
    })
}

/// Render one character for an error message: printable ASCII in quotes,
/// common control characters as quoted escapes, small values as decimal,
/// everything else as hex.
pub fn display_char(c: char) -> String {
    match c {
        '\'' => "'\\''".to_owned(),
        '\\' => "'\\\\'".to_owned(),
        '\t' => "'\\t'".to_owned(),
        '\r' => "'\\r'".to_owned(),
        '\n' => "'\\n'".to_owned(),
        '\u{c}' => "'\\f'".to_owned(),
        ' ' => "' '".to_owned(),
        c if c.is_ascii_graphic() => format!("'{c}'"),
        c if u32::from(c) < 10 => u32::from(c).to_string(),
        c => format!("0x{:x}", u32::from(c)),
    }
}

/// Escape `text` for display inside a quoted literal.
pub fn escape_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\u{8}' => escaped.push_str("\\b"),
            '\t' => escaped.push_str("\\t"),
            '\n' => escaped.push_str("\\n"),
            '\u{c}' => escaped.push_str("\\f"),
            '\r' => escaped.push_str("\\r"),
            '"' => escaped.push_str("\\\""),
            '\'' => escaped.push_str("\\'"),
            '\\' => escaped.push_str("\\\\"),
            c if c.is_control() => {
                escaped.push_str(&format!("\\u{:04x}", u32::from(c)));
            }
            c => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests;
