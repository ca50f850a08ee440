//! Token chain navigation and splicing.
//!
//! Neighbours in the chain come from explicit links first (set by
//! [`Lexer::pre_insert`] and [`Lexer::replace_type`]) and from the offset
//! cache otherwise. Parsed navigation skips unparsed tokens; cached
//! navigation sees everything.

use snbt_lexer_core::{TokenCategory, TokenKind};

use crate::lexer::Lexer;
use crate::tree::{NodeId, Token};

impl Lexer {
    /// The next token of any sort, or `None` after `Eof`.
    pub fn next_cached_token(&self, id: NodeId) -> Option<NodeId> {
        let token = self.token(id);
        if token.kind().is_eof() {
            return None;
        }
        if let Some(appended) = token.appended() {
            return Some(appended);
        }
        self.arena().token_source(id)?;
        self.table().next_token(token.end())
    }

    /// The previous token of any sort.
    pub fn previous_cached_token(&self, id: NodeId) -> Option<NodeId> {
        let token = self.token(id);
        if let Some(prepended) = token.prepended() {
            return Some(prepended);
        }
        self.arena().token_source(id)?;
        self.table().previous_token(token.begin())
    }

    /// The next cached token that takes part in parsing.
    pub fn next_parsed_token(&self, id: NodeId) -> Option<NodeId> {
        let mut next = self.next_cached_token(id);
        while let Some(t) = next.filter(|&t| self.arena().is_unparsed(t)) {
            next = self.next_cached_token(t);
        }
        next
    }

    /// The previous cached token that takes part in parsing.
    pub fn previous_parsed_token(&self, id: NodeId) -> Option<NodeId> {
        let mut prev = self.previous_cached_token(id);
        while let Some(t) = prev.filter(|&t| self.arena().is_unparsed(t)) {
            prev = self.previous_cached_token(t);
        }
        prev
    }

    /// Cached tokens after `id`, parsed or not, in input order.
    pub fn following_tokens(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.next_cached_token(id), |&t| self.next_cached_token(t))
    }

    /// Cached tokens before `id`, nearest first.
    pub fn preceding_tokens(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.previous_cached_token(id), |&t| {
            self.previous_cached_token(t)
        })
    }

    /// The run of unparsed tokens directly before `id`, in input order.
    pub fn preceding_unparsed_tokens(&self, id: NodeId) -> Vec<NodeId> {
        let mut run: Vec<NodeId> = self
            .preceding_tokens(id)
            .take_while(|&t| self.arena().is_unparsed(t))
            .collect();
        run.reverse();
        run
    }

    /// A synthetic token with explicit text, backed by this lexer but not
    /// placed in the chain. Splice it in with [`pre_insert`](Self::pre_insert).
    pub fn new_token(&mut self, kind: TokenKind, image: &str) -> NodeId {
        let id = self.arena_mut().new_token(kind, image);
        self.arena_token_mut(id).scanned = true;
        id
    }

    /// Splice `inserted` into the chain immediately before `before`.
    ///
    /// The inserted token collapses to an empty span at `before`'s begin
    /// and is never cached by offset.
    pub fn pre_insert(&mut self, before: NodeId, inserted: NodeId) {
        if self.token(before).prepended() == Some(inserted) {
            return;
        }
        let existing = self.previous_cached_token(before);
        let begin = self.token(before).begin();
        {
            let token = self.arena_token_mut(inserted);
            token.appended = Some(before);
            token.inserted = true;
            token.begin = begin;
            token.end = begin;
            if existing.is_some() {
                token.prepended = existing;
            }
        }
        if let Some(existing) = existing {
            self.arena_token_mut(existing).appended = Some(inserted);
        }
        self.arena_token_mut(before).prepended = Some(inserted);
    }

    /// A copy of `id` with a new kind, taking over its place in the chain.
    ///
    /// The replacement is cached unless `id` was inserted.
    pub fn replace_type(&mut self, id: NodeId, kind: TokenKind) -> NodeId {
        let old = self.token(id).clone();
        let unparsed = self.classes().category(kind) == TokenCategory::Unparsed;
        let replacement = self.arena_mut().alloc_token(Token { kind, ..old.clone() }, unparsed);
        if let Some(appended) = old.appended {
            self.arena_token_mut(appended).prepended = Some(replacement);
        }
        if let Some(prepended) = old.prepended {
            self.arena_token_mut(prepended).appended = Some(replacement);
        }
        if !old.inserted {
            self.cache_token(replacement);
        }
        replacement
    }

    /// Record `id` in the offset cache. An inserted token has no offset of
    /// its own, so the first real token after it is cached instead.
    pub(crate) fn cache_token(&mut self, id: NodeId) {
        let mut current = id;
        // Bounded by the number of tokens in case of a spliced loop.
        for _ in 0..=self.arena().len() {
            let token = self.token(current);
            if !token.is_inserted() {
                let begin = token.begin();
                self.table_mut().cache(begin, current);
                return;
            }
            match self.next_cached_token(current) {
                Some(next) => current = next,
                None => return,
            }
        }
    }
}

#[cfg(test)]
mod tests;
