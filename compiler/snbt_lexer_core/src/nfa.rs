//! Table-driven NFA for SNBT tokens.
//!
//! Each lexical state owns a table of transition functions. Index 0 is the
//! start state. A function looks at one character, inserts successor state
//! indices into the next [`StateSet`], and returns the kind matched by the
//! input consumed so far, if any.
//!
//! # Design
//!
//! All live states are advanced together. On every step the lowest-ordinal
//! kind reported by any live state wins; the caller remembers the last step
//! that reported a kind and rewinds to it, which gives longest match with
//! ties broken by [`TokenKind`] priority.
//!
//! Reporting is gated on the active [`KindSet`]; transitions are not, so a
//! deactivated kind never hides a longer match of another kind.

use crate::{KindSet, SourceText, TokenKind};

/// Transition function for one NFA state.
pub type NfaFunction = fn(char, &mut StateSet, KindSet) -> Option<TokenKind>;

/// Set of NFA state indices (at most 64 per lexical state).
#[derive(Copy, Clone, Default, PartialEq, Eq)]
pub struct StateSet(u64);

impl StateSet {
    #[inline]
    pub fn insert(&mut self, state: usize) {
        debug_assert!(state < 64, "NFA state index out of range: {state}");
        self.0 |= 1 << state;
    }

    #[inline]
    pub fn contains(self, state: usize) -> bool {
        state < 64 && self.0 & (1 << state) != 0
    }

    #[inline]
    pub fn clear(&mut self) {
        self.0 = 0;
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Members in ascending order.
    pub fn iter(self) -> impl Iterator<Item = usize> {
        let mut bits = self.0;
        std::iter::from_fn(move || {
            if bits == 0 {
                return None;
            }
            let state = bits.trailing_zeros() as usize;
            bits &= bits - 1;
            Some(state)
        })
    }
}

impl std::fmt::Debug for StateSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Lexical states. Each selects a different transition table.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum LexicalState {
    /// Values, keys, and punctuation.
    #[default]
    Snbt,
    /// The element-type header of a typed array: `B`, `I`, or `L`, then `;`.
    ArrayType,
}

impl LexicalState {
    pub fn table(self) -> &'static [NfaFunction] {
        match self {
            LexicalState::Snbt => &SNBT_TABLE,
            LexicalState::ArrayType => &ARRAY_TYPE_TABLE,
        }
    }

    /// Transition function of the start state.
    pub fn start(self) -> NfaFunction {
        match self {
            LexicalState::Snbt => SNBT_TABLE[START],
            LexicalState::ArrayType => ARRAY_TYPE_TABLE[ARRAY_START],
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            LexicalState::Snbt => "SNBT",
            LexicalState::ArrayType => "ARRAY_TYPE",
        }
    }
}

/// The two alternating state sets of a running match.
#[derive(Clone, Debug, Default)]
pub struct Nfa {
    current: StateSet,
    next: StateSet,
}

impl Nfa {
    /// Feed the first character of a token to the start state.
    pub fn start(&mut self, state: LexicalState, c: char, active: KindSet) -> Option<TokenKind> {
        self.current.clear();
        self.next.clear();
        (state.start())(c, &mut self.next, active)
    }

    /// Feed the next character to every state reached by the previous one.
    pub fn step(&mut self, state: LexicalState, c: char, active: KindSet) -> Option<TokenKind> {
        std::mem::swap(&mut self.current, &mut self.next);
        self.next.clear();
        let table = state.table();
        let mut matched = None;
        for index in self.current.iter() {
            if let Some(function) = table.get(index) {
                matched = best(matched, function(c, &mut self.next, active));
            }
        }
        matched
    }

    /// Whether any state survived the last character.
    #[inline]
    pub fn is_live(&self) -> bool {
        !self.next.is_empty()
    }
}

/// Longest match at `pos` in `source`, ignoring any masking.
///
/// Returns the matched kind and the offset just past it.
pub fn longest_match(
    source: &SourceText,
    pos: u32,
    state: LexicalState,
    active: KindSet,
) -> Option<(TokenKind, u32)> {
    let mut nfa = Nfa::default();
    let (c, width) = source.char_at(pos)?;
    let mut cursor = pos + width;
    let mut matched = nfa.start(state, c, active).map(|kind| (kind, cursor));
    while nfa.is_live() {
        let Some((c, width)) = source.char_at(cursor) else {
            break;
        };
        cursor += width;
        if let Some(kind) = nfa.step(state, c, active) {
            matched = Some((kind, cursor));
        }
    }
    matched
}

/// Lower ordinal wins.
#[inline]
fn best(a: Option<TokenKind>, b: Option<TokenKind>) -> Option<TokenKind> {
    match (a, b) {
        (Some(x), Some(y)) => Some(x.min(y)),
        (x, None) => x,
        (None, y) => y,
    }
}

#[inline]
fn accept(kind: TokenKind, active: KindSet) -> Option<TokenKind> {
    active.contains(kind).then_some(kind)
}

#[inline]
fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

#[inline]
fn is_unquoted(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '+' | '-')
}

// === SNBT state indices ===

const START: usize = 0;
const WS: usize = 1;
const TRUE_R: usize = 2;
const TRUE_U: usize = 3;
const TRUE_E: usize = 4;
const FALSE_A: usize = 5;
const FALSE_L: usize = 6;
const FALSE_S: usize = 7;
const FALSE_E: usize = 8;
const SIGN: usize = 9;
const INT_DIGITS: usize = 10;
const DOT_LEAD: usize = 11;
const FRACTION: usize = 12;
const EXPONENT: usize = 13;
const EXPONENT_SIGN: usize = 14;
const EXPONENT_DIGITS: usize = 15;
const DQ_BODY: usize = 16;
const DQ_ESCAPE: usize = 17;
const SQ_BODY: usize = 18;
const SQ_ESCAPE: usize = 19;
const UNQUOTED: usize = 20;

static SNBT_TABLE: [NfaFunction; 21] = [
    snbt_start,
    whitespace,
    true_r,
    true_u,
    true_e,
    false_a,
    false_l,
    false_s,
    false_e,
    sign,
    int_digits,
    dot_lead,
    fraction,
    exponent,
    exponent_sign,
    exponent_digits,
    dq_body,
    dq_escape,
    sq_body,
    sq_escape,
    unquoted,
];

fn snbt_start(c: char, next: &mut StateSet, active: KindSet) -> Option<TokenKind> {
    let mut matched = None;
    match c {
        ' ' | '\t' | '\n' | '\r' => {
            next.insert(WS);
            return accept(TokenKind::Whitespace, active);
        }
        ':' => return accept(TokenKind::Colon, active),
        ',' => return accept(TokenKind::Comma, active),
        '[' => return accept(TokenKind::OpenBracket, active),
        ']' => return accept(TokenKind::CloseBracket, active),
        '{' => return accept(TokenKind::OpenBrace, active),
        '}' => return accept(TokenKind::CloseBrace, active),
        ';' => return accept(TokenKind::Semicolon, active),
        '"' => {
            next.insert(DQ_BODY);
            return None;
        }
        '\'' => {
            next.insert(SQ_BODY);
            return None;
        }
        't' => next.insert(TRUE_R),
        'f' => next.insert(FALSE_A),
        '+' | '-' => next.insert(SIGN),
        '.' => next.insert(DOT_LEAD),
        '0'..='9' => {
            next.insert(INT_DIGITS);
            matched = accept(TokenKind::Integer, active);
        }
        _ => {}
    }
    if is_unquoted(c) {
        next.insert(UNQUOTED);
        matched = best(matched, accept(TokenKind::String, active));
    }
    matched
}

fn whitespace(c: char, next: &mut StateSet, active: KindSet) -> Option<TokenKind> {
    if is_whitespace(c) {
        next.insert(WS);
        return accept(TokenKind::Whitespace, active);
    }
    None
}

fn literal_step(c: char, expected: char, next: &mut StateSet, to: usize) -> Option<TokenKind> {
    if c == expected {
        next.insert(to);
    }
    None
}

fn true_r(c: char, next: &mut StateSet, _: KindSet) -> Option<TokenKind> {
    literal_step(c, 'r', next, TRUE_U)
}

fn true_u(c: char, next: &mut StateSet, _: KindSet) -> Option<TokenKind> {
    literal_step(c, 'u', next, TRUE_E)
}

fn true_e(c: char, _: &mut StateSet, active: KindSet) -> Option<TokenKind> {
    (c == 'e').then(|| accept(TokenKind::Boolean, active)).flatten()
}

fn false_a(c: char, next: &mut StateSet, _: KindSet) -> Option<TokenKind> {
    literal_step(c, 'a', next, FALSE_L)
}

fn false_l(c: char, next: &mut StateSet, _: KindSet) -> Option<TokenKind> {
    literal_step(c, 'l', next, FALSE_S)
}

fn false_s(c: char, next: &mut StateSet, _: KindSet) -> Option<TokenKind> {
    literal_step(c, 's', next, FALSE_E)
}

fn false_e(c: char, _: &mut StateSet, active: KindSet) -> Option<TokenKind> {
    (c == 'e').then(|| accept(TokenKind::Boolean, active)).flatten()
}

fn sign(c: char, next: &mut StateSet, active: KindSet) -> Option<TokenKind> {
    match c {
        '0'..='9' => {
            next.insert(INT_DIGITS);
            accept(TokenKind::Integer, active)
        }
        '.' => {
            next.insert(DOT_LEAD);
            None
        }
        _ => None,
    }
}

/// Suffix letters that end a decimal literal.
fn decimal_suffix(c: char, active: KindSet) -> Option<TokenKind> {
    match c {
        'd' | 'D' => accept(TokenKind::Double, active),
        'f' | 'F' => accept(TokenKind::Float, active),
        _ => None,
    }
}

fn int_digits(c: char, next: &mut StateSet, active: KindSet) -> Option<TokenKind> {
    match c {
        '0'..='9' => {
            next.insert(INT_DIGITS);
            accept(TokenKind::Integer, active)
        }
        '.' => {
            next.insert(FRACTION);
            accept(TokenKind::Double, active)
        }
        'e' | 'E' => {
            next.insert(EXPONENT);
            None
        }
        'l' | 'L' => accept(TokenKind::Long, active),
        'b' | 'B' => accept(TokenKind::Byte, active),
        's' | 'S' => accept(TokenKind::Short, active),
        _ => decimal_suffix(c, active),
    }
}

fn dot_lead(c: char, next: &mut StateSet, active: KindSet) -> Option<TokenKind> {
    if c.is_ascii_digit() {
        next.insert(FRACTION);
        return accept(TokenKind::Double, active);
    }
    None
}

fn fraction(c: char, next: &mut StateSet, active: KindSet) -> Option<TokenKind> {
    match c {
        '0'..='9' => {
            next.insert(FRACTION);
            accept(TokenKind::Double, active)
        }
        'e' | 'E' => {
            next.insert(EXPONENT);
            None
        }
        _ => decimal_suffix(c, active),
    }
}

fn exponent(c: char, next: &mut StateSet, active: KindSet) -> Option<TokenKind> {
    match c {
        '+' | '-' => {
            next.insert(EXPONENT_SIGN);
            None
        }
        '0'..='9' => {
            next.insert(EXPONENT_DIGITS);
            accept(TokenKind::Double, active)
        }
        _ => None,
    }
}

fn exponent_sign(c: char, next: &mut StateSet, active: KindSet) -> Option<TokenKind> {
    if c.is_ascii_digit() {
        next.insert(EXPONENT_DIGITS);
        return accept(TokenKind::Double, active);
    }
    None
}

fn exponent_digits(c: char, next: &mut StateSet, active: KindSet) -> Option<TokenKind> {
    if c.is_ascii_digit() {
        next.insert(EXPONENT_DIGITS);
        return accept(TokenKind::Double, active);
    }
    decimal_suffix(c, active)
}

fn quoted_body(
    c: char,
    quote: char,
    next: &mut StateSet,
    active: KindSet,
    body: usize,
    escape: usize,
) -> Option<TokenKind> {
    if c == quote {
        accept(TokenKind::String, active)
    } else if c == '\\' {
        next.insert(escape);
        None
    } else {
        next.insert(body);
        None
    }
}

fn dq_body(c: char, next: &mut StateSet, active: KindSet) -> Option<TokenKind> {
    quoted_body(c, '"', next, active, DQ_BODY, DQ_ESCAPE)
}

fn dq_escape(_: char, next: &mut StateSet, _: KindSet) -> Option<TokenKind> {
    next.insert(DQ_BODY);
    None
}

fn sq_body(c: char, next: &mut StateSet, active: KindSet) -> Option<TokenKind> {
    quoted_body(c, '\'', next, active, SQ_BODY, SQ_ESCAPE)
}

fn sq_escape(_: char, next: &mut StateSet, _: KindSet) -> Option<TokenKind> {
    next.insert(SQ_BODY);
    None
}

fn unquoted(c: char, next: &mut StateSet, active: KindSet) -> Option<TokenKind> {
    if is_unquoted(c) {
        next.insert(UNQUOTED);
        return accept(TokenKind::String, active);
    }
    None
}

// === Array type header ===

const ARRAY_START: usize = 0;
const ARRAY_WS: usize = 1;

static ARRAY_TYPE_TABLE: [NfaFunction; 2] = [array_start, array_whitespace];

fn array_start(c: char, next: &mut StateSet, active: KindSet) -> Option<TokenKind> {
    match c {
        ' ' | '\t' | '\n' | '\r' => {
            next.insert(ARRAY_WS);
            accept(TokenKind::Whitespace, active)
        }
        'B' => accept(TokenKind::ByteArrayTag, active),
        'I' => accept(TokenKind::IntArrayTag, active),
        'L' => accept(TokenKind::LongArrayTag, active),
        ';' => accept(TokenKind::Semicolon, active),
        _ => None,
    }
}

fn array_whitespace(c: char, next: &mut StateSet, active: KindSet) -> Option<TokenKind> {
    if is_whitespace(c) {
        next.insert(ARRAY_WS);
        return accept(TokenKind::Whitespace, active);
    }
    None
}
