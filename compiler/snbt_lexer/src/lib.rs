//! Incremental lexer for SNBT, the stringified form of NBT tag trees.
//!
//! Built on the NFA tables and normalized buffers of `snbt_lexer_core`,
//! this crate adds:
//!
//! - [`Lexer`]: pull-based scanning with an offset-indexed token cache,
//!   invalid-input coalescing, and idempotent end of input
//! - line masking ([`Lexer::set_parsed_lines`], [`Lexer::set_unparsed_lines`])
//! - the token chain ([`Lexer::pre_insert`], [`Lexer::replace_type`],
//!   parsed and raw iteration)
//! - [`NodeArena`]: generic labeled tree nodes with tokens as leaves
//!
//! # Example
//!
//! ```
//! use snbt_lexer::{Lexer, TokenKind};
//!
//! let mut lexer = Lexer::new("{a:1b}").unwrap_or_else(|e| panic!("{e}"));
//! let kinds: Vec<_> = lexer
//!     .tokenize()
//!     .into_iter()
//!     .map(|t| lexer.kind(t))
//!     .collect();
//! assert_eq!(
//!     kinds,
//!     [
//!         TokenKind::OpenBrace,
//!         TokenKind::String,
//!         TokenKind::Colon,
//!         TokenKind::Byte,
//!         TokenKind::CloseBrace,
//!         TokenKind::Eof,
//!     ]
//! );
//! ```

mod config;
mod lexer;
mod location_table;
mod mask;
mod token;
mod tree;

pub use config::{ChildStorage, LexerConfig, TreeConfig};
pub use lexer::Lexer;
pub use tree::{Branch, Node, NodeArena, NodeData, NodeId, Token};

pub use snbt_lexer_core::{
    escape_text, Charset, KindCategory, KindSet, LexicalState, NormalizeFlags, SourceError,
    SourceOptions, SourceText, TokenCategory, TokenClasses, TokenKind,
};
