//! Token kinds, kind sets, and the skip/more/unparsed classification.
//!
//! # Design
//!
//! Declaration order of [`TokenKind`] is match priority: when two kinds
//! match the same longest span, the lower ordinal wins. This is why
//! `Boolean` precedes `String` (so `true` is a boolean, not an unquoted
//! string) and why the numeric kinds precede `String`.

use std::fmt;

/// Every kind of token the scanner can produce.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum TokenKind {
    Eof,
    Whitespace,
    Colon,
    Comma,
    OpenBracket,
    CloseBracket,
    OpenBrace,
    CloseBrace,
    Semicolon,
    Boolean,
    Float,
    Double,
    Integer,
    Long,
    Byte,
    Short,
    String,
    /// `B` in a `[B;` typed array header.
    ByteArrayTag,
    /// `I` in a `[I;` typed array header.
    IntArrayTag,
    /// `L` in a `[L;` typed array header.
    LongArrayTag,
    /// Input no pattern matches.
    Invalid,
}

/// Coarse grouping of kinds, used by callers that only care whether a
/// token is punctuation, a literal, or trivia.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum KindCategory {
    Delimiter,
    Literal,
    ArrayTag,
    Trivia,
    Special,
}

impl TokenKind {
    /// Number of token kinds.
    pub const COUNT: usize = TokenKind::Invalid as usize + 1;

    /// All kinds in priority order.
    pub const ALL: [TokenKind; TokenKind::COUNT] = [
        TokenKind::Eof,
        TokenKind::Whitespace,
        TokenKind::Colon,
        TokenKind::Comma,
        TokenKind::OpenBracket,
        TokenKind::CloseBracket,
        TokenKind::OpenBrace,
        TokenKind::CloseBrace,
        TokenKind::Semicolon,
        TokenKind::Boolean,
        TokenKind::Float,
        TokenKind::Double,
        TokenKind::Integer,
        TokenKind::Long,
        TokenKind::Byte,
        TokenKind::Short,
        TokenKind::String,
        TokenKind::ByteArrayTag,
        TokenKind::IntArrayTag,
        TokenKind::LongArrayTag,
        TokenKind::Invalid,
    ];

    /// Priority ordinal; lower wins ties.
    #[inline]
    pub const fn ordinal(self) -> u8 {
        self as u8
    }

    /// Human-readable name for diagnostics and token dumps.
    pub const fn name(self) -> &'static str {
        match self {
            TokenKind::Eof => "EOF",
            TokenKind::Whitespace => "WHITESPACE",
            TokenKind::Colon => "COLON",
            TokenKind::Comma => "COMMA",
            TokenKind::OpenBracket => "OPEN_BRACKET",
            TokenKind::CloseBracket => "CLOSE_BRACKET",
            TokenKind::OpenBrace => "OPEN_BRACE",
            TokenKind::CloseBrace => "CLOSE_BRACE",
            TokenKind::Semicolon => "SEMICOLON",
            TokenKind::Boolean => "BOOLEAN",
            TokenKind::Float => "FLOAT",
            TokenKind::Double => "DOUBLE",
            TokenKind::Integer => "INTEGER",
            TokenKind::Long => "LONG",
            TokenKind::Byte => "BYTE",
            TokenKind::Short => "SHORT",
            TokenKind::String => "STRING",
            TokenKind::ByteArrayTag => "B",
            TokenKind::IntArrayTag => "I",
            TokenKind::LongArrayTag => "L",
            TokenKind::Invalid => "INVALID",
        }
    }

    /// Fixed source text for kinds that always spell the same way.
    pub const fn lexeme(self) -> Option<&'static str> {
        match self {
            TokenKind::Colon => Some(":"),
            TokenKind::Comma => Some(","),
            TokenKind::OpenBracket => Some("["),
            TokenKind::CloseBracket => Some("]"),
            TokenKind::OpenBrace => Some("{"),
            TokenKind::CloseBrace => Some("}"),
            TokenKind::Semicolon => Some(";"),
            TokenKind::ByteArrayTag => Some("B"),
            TokenKind::IntArrayTag => Some("I"),
            TokenKind::LongArrayTag => Some("L"),
            _ => None,
        }
    }

    pub const fn category(self) -> KindCategory {
        match self {
            TokenKind::Colon
            | TokenKind::Comma
            | TokenKind::OpenBracket
            | TokenKind::CloseBracket
            | TokenKind::OpenBrace
            | TokenKind::CloseBrace
            | TokenKind::Semicolon => KindCategory::Delimiter,
            TokenKind::Boolean
            | TokenKind::Float
            | TokenKind::Double
            | TokenKind::Integer
            | TokenKind::Long
            | TokenKind::Byte
            | TokenKind::Short
            | TokenKind::String => KindCategory::Literal,
            TokenKind::ByteArrayTag | TokenKind::IntArrayTag | TokenKind::LongArrayTag => {
                KindCategory::ArrayTag
            }
            TokenKind::Whitespace => KindCategory::Trivia,
            TokenKind::Eof | TokenKind::Invalid => KindCategory::Special,
        }
    }

    #[inline]
    pub const fn is_eof(self) -> bool {
        matches!(self, TokenKind::Eof)
    }

    #[inline]
    pub const fn is_invalid(self) -> bool {
        matches!(self, TokenKind::Invalid)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

/// A set of [`TokenKind`]s packed into one word.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Default)]
pub struct KindSet(u32);

impl KindSet {
    pub const EMPTY: KindSet = KindSet(0);
    pub const ALL: KindSet = KindSet((1 << TokenKind::COUNT) - 1);

    #[must_use]
    pub const fn of(kinds: &[TokenKind]) -> Self {
        let mut bits = 0;
        let mut i = 0;
        while i < kinds.len() {
            bits |= 1 << kinds[i] as u32;
            i += 1;
        }
        KindSet(bits)
    }

    #[inline]
    pub const fn contains(self, kind: TokenKind) -> bool {
        self.0 & (1 << kind as u32) != 0
    }

    #[inline]
    pub fn insert(&mut self, kind: TokenKind) {
        self.0 |= 1 << kind as u32;
    }

    #[inline]
    pub fn remove(&mut self, kind: TokenKind) {
        self.0 &= !(1 << kind as u32);
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Members in priority order.
    pub fn iter(self) -> impl Iterator<Item = TokenKind> {
        TokenKind::ALL.into_iter().filter(move |k| self.contains(*k))
    }
}

impl fmt::Debug for KindSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl FromIterator<TokenKind> for KindSet {
    fn from_iter<I: IntoIterator<Item = TokenKind>>(iter: I) -> Self {
        let mut set = KindSet::EMPTY;
        for kind in iter {
            set.insert(kind);
        }
        set
    }
}

/// What the scanner does with a matched kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TokenCategory {
    /// Cached and returned to the caller.
    Regular,
    /// Cached and chained, but hidden from parsed iteration.
    Unparsed,
    /// Consumed and marked skipped; never becomes a token.
    Skip,
    /// Consumed as a prefix of the next token.
    More,
}

/// Assignment of token kinds to [`TokenCategory`]s.
///
/// A kind in none of the three sets is regular. `Eof` and `Invalid` are
/// always regular, whatever the sets say.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TokenClasses {
    pub skip: KindSet,
    pub unparsed: KindSet,
    pub more: KindSet,
}

impl Default for TokenClasses {
    fn default() -> Self {
        TokenClasses {
            skip: KindSet::of(&[TokenKind::Whitespace]),
            unparsed: KindSet::EMPTY,
            more: KindSet::EMPTY,
        }
    }
}

impl TokenClasses {
    /// Keep whitespace as unparsed trivia so the token chain covers the
    /// whole buffer.
    #[must_use]
    pub fn retaining_whitespace() -> Self {
        TokenClasses {
            skip: KindSet::EMPTY,
            unparsed: KindSet::of(&[TokenKind::Whitespace]),
            more: KindSet::EMPTY,
        }
    }

    pub fn category(&self, kind: TokenKind) -> TokenCategory {
        if kind.is_eof() || kind.is_invalid() {
            TokenCategory::Regular
        } else if self.skip.contains(kind) {
            TokenCategory::Skip
        } else if self.more.contains(kind) {
            TokenCategory::More
        } else if self.unparsed.contains(kind) {
            TokenCategory::Unparsed
        } else {
            TokenCategory::Regular
        }
    }
}
