//! The scanning driver: NFA loop, invalid coalescing, and the token cache.
//!
//! # Design
//!
//! A [`Lexer`] owns one normalized buffer for its whole life, together with
//! the [`LocationTable`] of cached tokens and the [`NodeArena`] holding the
//! tokens themselves. Scanning is pull-based: callers ask for the token
//! after a token they already hold ([`Lexer::next_token`]), which is served
//! from the cache when possible, or for the token at an offset
//! ([`Lexer::next_token_at`]), which always scans.
//!
//! Offsets marked ignored (see [`Lexer::set_parsed_lines`]) are stepped over
//! by the cursor, never hold cached tokens, and are left out of
//! [`Lexer::text`].

use snbt_lexer_core::nfa::Nfa;
use snbt_lexer_core::{
    Charset, KindSet, LexicalState, SourceError, SourceText, TokenCategory, TokenClasses,
    TokenKind,
};
use tracing::{debug, trace};

use crate::config::LexerConfig;
use crate::location_table::LocationTable;
use crate::tree::{NodeArena, NodeId, Token};

/// Outcome of one pass of the NFA loop, before it becomes a token.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
struct RawMatch {
    kind: TokenKind,
    begin: u32,
    end: u32,
}

/// Incremental SNBT lexer over one input.
#[derive(Clone, Debug)]
pub struct Lexer {
    input_source: String,
    source: SourceText,
    table: LocationTable,
    arena: NodeArena,
    /// Offset of the next code unit to read.
    pos: u32,
    nfa: Nfa,
    active: KindSet,
    classes: TokenClasses,
    state: LexicalState,
}

impl Lexer {
    /// Lex `text` with the default configuration.
    pub fn new(text: &str) -> Result<Self, SourceError> {
        Self::with_config(text, LexerConfig::default())
    }

    pub fn with_config(text: &str, config: LexerConfig) -> Result<Self, SourceError> {
        let source = SourceText::from_text(text, &config.source)?;
        Ok(Self::from_source(source, config))
    }

    /// Lex a sequence of UTF-16 code units.
    pub fn from_utf16(units: &[u16], config: LexerConfig) -> Result<Self, SourceError> {
        let source = SourceText::new(units, &config.source)?;
        Ok(Self::from_source(source, config))
    }

    /// Lex raw bytes. Without an explicit `charset`, a byte order mark
    /// selects the encoding and UTF-8 is assumed otherwise.
    pub fn from_bytes(
        bytes: &[u8],
        charset: Option<Charset>,
        config: LexerConfig,
    ) -> Result<Self, SourceError> {
        let source = SourceText::from_bytes(bytes, charset, &config.source)?;
        Ok(Self::from_source(source, config))
    }

    /// Lex an already normalized buffer.
    pub fn from_source(source: SourceText, config: LexerConfig) -> Self {
        debug!(
            input = %config.input_source,
            len = source.len(),
            lines = source.lines().line_count(),
            state = config.lexical_state.name(),
            "lexer created"
        );
        Lexer {
            input_source: config.input_source,
            table: LocationTable::new(source.len()),
            arena: NodeArena::new(config.tree),
            source,
            pos: 0,
            nfa: Nfa::default(),
            active: KindSet::ALL,
            classes: config.classes,
            state: config.lexical_state,
        }
    }

    // === Accessors ===

    pub fn source(&self) -> &SourceText {
        &self.source
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    /// Mutable access to the node arena, for building trees over tokens.
    pub fn arena_mut(&mut self) -> &mut NodeArena {
        &mut self.arena
    }

    /// Name used in locations, typically a file name.
    pub fn input_source(&self) -> &str {
        &self.input_source
    }

    pub fn set_input_source(&mut self, input_source: impl Into<String>) {
        self.input_source = input_source.into();
    }

    pub fn tab_size(&self) -> u32 {
        self.source.tab_size()
    }

    /// Tab width used for column reporting.
    pub fn set_tab_size(&mut self, tab_size: u32) {
        self.source.set_tab_size(tab_size);
    }

    pub fn lexical_state(&self) -> LexicalState {
        self.state
    }

    pub fn active_kinds(&self) -> KindSet {
        self.active
    }

    pub fn classes(&self) -> &TokenClasses {
        &self.classes
    }

    /// Current cursor offset.
    pub fn position(&self) -> u32 {
        self.pos
    }

    /// # Panics
    ///
    /// Panics if `id` is not a token.
    pub fn token(&self, id: NodeId) -> &Token {
        self.arena.token(id)
    }

    /// # Panics
    ///
    /// Panics if `id` is not a token.
    pub fn kind(&self, id: NodeId) -> TokenKind {
        self.arena.token(id).kind
    }

    // === Lexical State and Active Kinds ===

    /// Switch lexical state. Returns `false` if already in `state`.
    pub fn switch_to(&mut self, state: LexicalState) -> bool {
        if self.state == state {
            return false;
        }
        debug!(from = self.state.name(), to = state.name(), "switching lexical state");
        self.state = state;
        true
    }

    /// Allow `kinds` to be reported again. Returns whether anything changed.
    pub fn activate_token_kinds(&mut self, kinds: impl IntoIterator<Item = TokenKind>) -> bool {
        let before = self.active;
        for kind in kinds {
            self.active.insert(kind);
        }
        before != self.active
    }

    /// Stop reporting `kinds`. Returns whether anything changed.
    pub fn deactivate_token_kinds(&mut self, kinds: impl IntoIterator<Item = TokenKind>) -> bool {
        let before = self.active;
        for kind in kinds {
            self.active.remove(kind);
        }
        before != self.active
    }

    // === Token Retrieval ===

    /// The token after `prev`, or the token at the cursor when `prev` is
    /// `None`.
    ///
    /// A cached successor is reused if its kind is still active. An inactive
    /// successor invalidates the cache from `prev` onward and the input is
    /// scanned again from `prev`'s end.
    ///
    /// # Panics
    ///
    /// Panics if `prev` is not a token.
    pub fn next_token(&mut self, prev: Option<NodeId>) -> NodeId {
        let Some(prev) = prev else {
            return self.scan_token();
        };
        if let Some(cached) = self.next_cached_token(prev) {
            if self.active.contains(self.kind(cached)) {
                return cached;
            }
            trace!(kind = %self.kind(cached), "cached successor inactive, rescanning");
            self.reset(prev, None);
        }
        let end = self.arena.token(prev).end;
        self.next_token_at(end)
    }

    /// Scan the token at `offset`, ignoring what is cached there.
    pub fn next_token_at(&mut self, offset: u32) -> NodeId {
        self.go_to(offset);
        self.scan_token()
    }

    /// Every token from the cursor up to and including `Eof`, following
    /// cached successors where they exist.
    pub fn tokenize(&mut self) -> Vec<NodeId> {
        let mut tokens = Vec::new();
        let mut current = self.next_token(None);
        loop {
            tokens.push(current);
            if self.kind(current).is_eof() {
                return tokens;
            }
            current = self.next_token(Some(current));
        }
    }

    /// Move the cursor to just after `token`, forget every cached token from
    /// there on, and optionally switch lexical state.
    ///
    /// # Panics
    ///
    /// Panics if `token` is not a token.
    pub fn reset(&mut self, token: NodeId, state: Option<LexicalState>) {
        let end = self.arena.token(token).end;
        debug!(token = token.raw(), end, "resetting lexer");
        self.go_to(end);
        self.table.clear_from(end);
        self.arena.token_mut(token).appended = None;
        if let Some(state) = state {
            self.switch_to(state);
        }
    }

    // === Scanning ===

    fn go_to(&mut self, offset: u32) {
        let len = self.source.len();
        let mut offset = offset.min(len);
        while offset < len && self.table.is_ignored(offset) {
            offset += 1;
        }
        self.pos = offset;
    }

    fn skip_ignored(&mut self) {
        self.go_to(self.pos);
    }

    /// Read the character at the cursor, stepping over ignored offsets.
    fn read_char(&mut self) -> Option<char> {
        self.skip_ignored();
        let (c, width) = self.source.char_at(self.pos)?;
        self.pos += width;
        Some(c)
    }

    /// Scan one token and coalesce any run of invalid input before it.
    fn scan_token(&mut self) -> NodeId {
        let mut invalid: Option<RawMatch> = None;
        let mut raw = self.scan_raw();
        while raw.kind.is_invalid() {
            match &mut invalid {
                Some(run) => run.end = raw.end,
                None => invalid = Some(raw),
            }
            raw = self.scan_raw();
        }
        let token = self.intern(raw);
        match invalid {
            Some(run) => {
                trace!(begin = run.begin, end = run.end, "coalesced invalid input");
                let id = self.intern(run);
                self.go_to(run.end);
                id
            }
            None => token,
        }
    }

    /// One pass of the NFA machinery: longest match from the cursor, with
    /// skip kinds consumed and more kinds accumulated.
    fn scan_raw(&mut self) -> RawMatch {
        let mut in_more = false;
        let mut begin = self.pos;
        loop {
            self.skip_ignored();
            if !in_more {
                begin = self.pos;
            }
            let Some(first) = self.read_char() else {
                // A pending prefix with nothing to finish it is invalid.
                let kind = if in_more {
                    TokenKind::Invalid
                } else {
                    TokenKind::Eof
                };
                return RawMatch {
                    kind,
                    begin,
                    end: self.pos,
                };
            };
            let first_end = self.pos;
            let mut matched = self
                .nfa
                .start(self.state, first, self.active)
                .map(|kind| (kind, self.pos));
            while self.nfa.is_live() {
                let Some(c) = self.read_char() else {
                    break;
                };
                if let Some(kind) = self.nfa.step(self.state, c, self.active) {
                    matched = Some((kind, self.pos));
                }
            }

            let Some((kind, end)) = matched else {
                // One code point, never half a surrogate pair.
                self.pos = first_end;
                return RawMatch {
                    kind: TokenKind::Invalid,
                    begin,
                    end: first_end,
                };
            };
            self.pos = end;
            match self.classes.category(kind) {
                TokenCategory::Skip => {
                    for offset in begin..end {
                        self.table.mark_skipped(offset);
                    }
                    in_more = false;
                }
                TokenCategory::More => in_more = true,
                TokenCategory::Regular | TokenCategory::Unparsed => {
                    return RawMatch { kind, begin, end };
                }
            }
        }
    }

    /// Turn a raw match into a cached token, reusing an identical cached
    /// one so repeated scans of the same span yield the same handle.
    fn intern(&mut self, raw: RawMatch) -> NodeId {
        let unparsed = self.classes.category(raw.kind) == TokenCategory::Unparsed;
        if let Some(existing) = self.table.token_at(raw.begin) {
            let token = self.arena.token(existing);
            if token.kind == raw.kind
                && token.end == raw.end
                && self.arena.is_unparsed(existing) == unparsed
            {
                return existing;
            }
        }
        let id = self.arena.alloc_token(
            Token {
                kind: raw.kind,
                begin: raw.begin,
                end: raw.end,
                image: None,
                prepended: None,
                appended: None,
                inserted: false,
                scanned: true,
            },
            unparsed,
        );
        trace!(kind = %raw.kind, begin = raw.begin, end = raw.end, "token");
        self.cache_token(id);
        id
    }

    // === Positions and Text ===

    /// Line of `offset`, counted from the configured starting line.
    pub fn line_from_offset(&self, offset: u32) -> u32 {
        self.source.line_from_offset(offset)
    }

    /// One-based column of `offset`, counting tabs to the next tab stop and
    /// surrogate pairs as one column.
    pub fn column_from_offset(&self, offset: u32) -> u32 {
        self.source.column_from_offset(offset)
    }

    /// Buffer text in `begin..end`, leaving out ignored offsets.
    pub fn text(&self, begin: u32, end: u32) -> String {
        let end = end.min(self.source.len());
        let units: Vec<u16> = (begin..end)
            .filter(|&offset| !self.table.is_ignored(offset))
            .filter_map(|offset| self.source.unit(offset))
            .collect();
        String::from_utf16_lossy(&units)
    }

    /// Text of a token: its explicit image, the empty string for `Eof`,
    /// or its span of the buffer. For a branch, the images of its tokens.
    pub fn image(&self, id: NodeId) -> String {
        match self.arena.node(id).as_token() {
            Some(token) => self.token_image(token),
            None => self.node_text(id),
        }
    }

    fn token_image(&self, token: &Token) -> String {
        if let Some(image) = token.image_override() {
            return image.to_owned();
        }
        if token.kind.is_eof() || !token.scanned {
            return String::new();
        }
        self.text(token.begin, token.end)
    }

    /// Like [`image`](Self::image), but `Eof` reads as `"EOF"`.
    pub fn normalized_text(&self, id: NodeId) -> String {
        if self.arena.kind(id) == Some(TokenKind::Eof) {
            return "EOF".to_owned();
        }
        self.image(id)
    }

    /// Concatenated images of every token under `id`.
    pub fn node_text(&self, id: NodeId) -> String {
        self.arena
            .descendant_tokens(id)
            .into_iter()
            .map(|t| self.token_image(self.arena.token(t)))
            .collect()
    }

    pub fn begin_line(&self, id: NodeId) -> u32 {
        self.line_from_offset(self.arena.begin_offset(id))
    }

    pub fn begin_column(&self, id: NodeId) -> u32 {
        self.column_from_offset(self.arena.begin_offset(id))
    }

    /// Line of the last code unit of `id`.
    pub fn end_line(&self, id: NodeId) -> u32 {
        self.line_from_offset(self.last_offset(id))
    }

    /// Column of the last code unit of `id`.
    pub fn end_column(&self, id: NodeId) -> u32 {
        self.column_from_offset(self.last_offset(id))
    }

    fn last_offset(&self, id: NodeId) -> u32 {
        let begin = self.arena.begin_offset(id);
        self.arena.end_offset(id).saturating_sub(1).max(begin)
    }

    /// `input:line:column` of the start of `id`.
    pub fn location(&self, id: NodeId) -> String {
        format!(
            "{}:{}:{}",
            self.input_source,
            self.begin_line(id),
            self.begin_column(id)
        )
    }

    pub(crate) fn table(&self) -> &LocationTable {
        &self.table
    }

    pub(crate) fn table_mut(&mut self) -> &mut LocationTable {
        &mut self.table
    }

    pub(crate) fn arena_token_mut(&mut self, id: NodeId) -> &mut Token {
        self.arena.token_mut(id)
    }
}
