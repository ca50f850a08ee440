//! Low-level building blocks for the SNBT lexer.
//!
//! This crate has no dependency on the token cache or tree crates. It owns
//! everything that can be computed from the input alone:
//!
//! - [`decode`]: byte-order-mark sniffing and charset decoding into UTF-16
//!   code units
//! - [`SourceText`]: the normalized code-unit buffer plus its [`LineIndex`]
//! - [`TokenKind`] / [`KindSet`] / [`TokenClasses`]: the closed token
//!   vocabulary, ordered by priority
//! - [`nfa`]: the per-lexical-state transition tables driven by the scanner
//!
//! # Design
//!
//! Offsets are UTF-16 code-unit positions stored as `u32`. The scanner in
//! `snbt_lexer` reads code points, so a surrogate pair occupies two offsets
//! but is matched as one character.

mod decode;
mod kind;
mod line_index;
pub mod nfa;
mod source_text;

pub use decode::{decode, Charset, SourceError};
pub use kind::{KindCategory, KindSet, TokenCategory, TokenClasses, TokenKind};
pub use line_index::LineIndex;
pub use nfa::{LexicalState, StateSet};
pub use source_text::{
    display_char, escape_text, NormalizeFlags, SourceOptions, SourceText, DEFAULT_TAB_SIZE,
};
