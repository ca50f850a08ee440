//! Lexer configuration.

use snbt_lexer_core::{LexicalState, SourceOptions, TokenClasses};

/// Container used for each branch node's child list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum ChildStorage {
    /// Heap-allocated `Vec` (default).
    #[default]
    Vec,
    /// Inline storage for the first few children, spilling to the heap.
    Inline,
}

/// Tree-wide settings fixed when the node arena is created.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub struct TreeConfig {
    pub child_storage: ChildStorage,
}

/// Everything a [`Lexer`](crate::Lexer) needs besides its input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LexerConfig {
    /// Name used in locations, typically a file name. Defaults to `"input"`.
    pub input_source: String,
    /// Lexical state scanning starts in.
    pub lexical_state: LexicalState,
    /// Normalization and position-reporting settings.
    pub source: SourceOptions,
    /// Which kinds are skipped, unparsed, or prefixes of longer tokens.
    pub classes: TokenClasses,
    pub tree: TreeConfig,
}

impl Default for LexerConfig {
    fn default() -> Self {
        Self {
            input_source: "input".to_owned(),
            lexical_state: LexicalState::default(),
            source: SourceOptions::default(),
            classes: TokenClasses::default(),
            tree: TreeConfig::default(),
        }
    }
}

impl LexerConfig {
    /// Create a config reporting locations against `input_source`.
    pub fn with_input_source(input_source: impl Into<String>) -> Self {
        Self {
            input_source: input_source.into(),
            ..Default::default()
        }
    }

    /// Create a config for a fragment starting at `line`:`column`.
    pub fn with_start(line: u32, column: u32) -> Self {
        Self {
            source: SourceOptions::at(line, column),
            ..Default::default()
        }
    }

    /// Create a config with the given token classes.
    pub fn with_classes(classes: TokenClasses) -> Self {
        Self {
            classes,
            ..Default::default()
        }
    }

    /// Create a config that keeps whitespace as unparsed tokens, so the
    /// cached token chain covers every offset of the buffer.
    pub fn retaining_whitespace() -> Self {
        Self::with_classes(TokenClasses::retaining_whitespace())
    }
}
