//! Offset-indexed token cache.
//!
//! One slot per code-unit offset plus one for end of input. A slot is
//! empty, holds a cached token, or carries a marker: `Ignored` offsets are
//! masked out of scanning entirely, `Skipped` offsets were consumed by a
//! skip kind. A parallel presence bitmap answers "next/previous cached
//! token" queries a word at a time.

use crate::tree::NodeId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Slot {
    Empty,
    Ignored,
    Skipped,
    Token(NodeId),
}

#[derive(Clone, Debug)]
pub(crate) struct LocationTable {
    slots: Vec<Slot>,
    /// Bit `i` is set when `slots[i]` holds a live cached token.
    occupied: Vec<u64>,
}

impl LocationTable {
    /// A table for a buffer of `len` code units.
    pub(crate) fn new(len: u32) -> Self {
        let slots = len as usize + 1;
        LocationTable {
            slots: vec![Slot::Empty; slots],
            occupied: vec![0; slots.div_ceil(64)],
        }
    }

    #[inline]
    pub(crate) fn is_ignored(&self, offset: u32) -> bool {
        matches!(self.slots.get(offset as usize), Some(Slot::Ignored))
    }

    /// Mask `offset` out. Any token cached there is dropped.
    pub(crate) fn mark_ignored(&mut self, offset: u32) {
        if let Some(slot) = self.slots.get_mut(offset as usize) {
            *slot = Slot::Ignored;
            self.clear_bit(offset);
        }
    }

    /// Record that a skip kind consumed `offset`. Ignored slots stay ignored.
    pub(crate) fn mark_skipped(&mut self, offset: u32) {
        if let Some(slot) = self.slots.get_mut(offset as usize) {
            if *slot != Slot::Ignored {
                *slot = Slot::Skipped;
                self.clear_bit(offset);
            }
        }
    }

    /// Cache `token` at `offset`. Returns `false` if the offset is ignored.
    pub(crate) fn cache(&mut self, offset: u32, token: NodeId) -> bool {
        match self.slots.get_mut(offset as usize) {
            Some(slot) if *slot != Slot::Ignored => {
                *slot = Slot::Token(token);
                let (word, bit) = split(offset);
                self.occupied[word] |= bit;
                true
            }
            _ => false,
        }
    }

    /// The live token cached at `offset`, if any.
    pub(crate) fn token_at(&self, offset: u32) -> Option<NodeId> {
        if !self.is_occupied(offset) {
            return None;
        }
        match self.slots.get(offset as usize) {
            Some(Slot::Token(id)) => Some(*id),
            _ => None,
        }
    }

    /// First live token at or after `offset`.
    pub(crate) fn next_token(&self, offset: u32) -> Option<NodeId> {
        self.next_occupied(offset).and_then(|o| self.token_at(o))
    }

    /// Last live token strictly before `offset`.
    pub(crate) fn previous_token(&self, offset: u32) -> Option<NodeId> {
        self.prev_occupied(offset).and_then(|o| self.token_at(o))
    }

    /// Drop every cached token at or after `offset` from the presence
    /// bitmap. Slots keep their contents so markers survive.
    pub(crate) fn clear_from(&mut self, offset: u32) {
        let (word, _) = split(offset);
        if word >= self.occupied.len() {
            return;
        }
        let keep = (1u64 << (offset % 64)) - 1;
        self.occupied[word] &= keep;
        for w in &mut self.occupied[word + 1..] {
            *w = 0;
        }
    }

    #[inline]
    fn is_occupied(&self, offset: u32) -> bool {
        let (word, bit) = split(offset);
        self.occupied.get(word).is_some_and(|w| w & bit != 0)
    }

    fn clear_bit(&mut self, offset: u32) {
        let (word, bit) = split(offset);
        if let Some(w) = self.occupied.get_mut(word) {
            *w &= !bit;
        }
    }

    fn next_occupied(&self, offset: u32) -> Option<u32> {
        let (mut word, _) = split(offset);
        let mut bits = *self.occupied.get(word)? & !((1u64 << (offset % 64)) - 1);
        loop {
            if bits != 0 {
                return Some(join(word, bits.trailing_zeros()));
            }
            word += 1;
            bits = *self.occupied.get(word)?;
        }
    }

    fn prev_occupied(&self, offset: u32) -> Option<u32> {
        if offset == 0 {
            return None;
        }
        let last = offset - 1;
        let (mut word, _) = split(last);
        let shift = last % 64;
        let mask = if shift == 63 {
            u64::MAX
        } else {
            (1u64 << (shift + 1)) - 1
        };
        let mut bits = self.occupied.get(word).copied().unwrap_or(0) & mask;
        loop {
            if bits != 0 {
                return Some(join(word, 63 - bits.leading_zeros()));
            }
            if word == 0 {
                return None;
            }
            word -= 1;
            bits = self.occupied.get(word).copied().unwrap_or(0);
        }
    }
}

#[inline]
fn split(offset: u32) -> (usize, u64) {
    ((offset / 64) as usize, 1u64 << (offset % 64))
}

#[inline]
#[allow(clippy::cast_possible_truncation)]
fn join(word: usize, bit: u32) -> u32 {
    // Word indices come from `u32` offsets.
    word as u32 * 64 + bit
}
