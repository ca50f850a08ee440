//! Arena of tokens and labeled branch nodes.
//!
//! Tokens are the leaves of a generic ordered tree and at the same time
//! members of the bidirectional token chain. Both kinds of edge are stored
//! as [`NodeId`] indices into one [`NodeArena`], so a token can be spliced
//! into the chain or re-parented without shared ownership.
//!
//! # Design
//!
//! Structural misuse (a duplicate named child, an out-of-range child index,
//! adopting a node that already has a parent, giving children to a token)
//! is a programming error and panics. Lexical problems never reach this
//! module; they are `Invalid` tokens.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use snbt_lexer_core::TokenKind;

use crate::config::{ChildStorage, TreeConfig};

/// Index of a node in a [`NodeArena`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub const fn new(raw: u32) -> Self {
        NodeId(raw)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// A classified span of the buffer, or a synthetic token with its own text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    pub(crate) kind: TokenKind,
    pub(crate) begin: u32,
    pub(crate) end: u32,
    /// Overrides the buffer text when set.
    pub(crate) image: Option<Box<str>>,
    pub(crate) prepended: Option<NodeId>,
    pub(crate) appended: Option<NodeId>,
    pub(crate) inserted: bool,
    /// Produced by a lexer, so its offsets index that lexer's buffer.
    pub(crate) scanned: bool,
}

impl Token {
    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn begin(&self) -> u32 {
        self.begin
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    /// Explicit text, if this token does not take its text from the buffer.
    pub fn image_override(&self) -> Option<&str> {
        self.image.as_deref()
    }

    /// Token spliced in before this one.
    pub fn prepended(&self) -> Option<NodeId> {
        self.prepended
    }

    /// Token spliced in after this one.
    pub fn appended(&self) -> Option<NodeId> {
        self.appended
    }

    /// Whether this token was spliced into the chain rather than scanned.
    pub fn is_inserted(&self) -> bool {
        self.inserted
    }

    pub fn is_scanned(&self) -> bool {
        self.scanned
    }
}

#[derive(Clone, Debug)]
enum ChildList {
    Heap(Vec<NodeId>),
    Inline(SmallVec<[NodeId; 4]>),
}

impl ChildList {
    fn new(storage: ChildStorage) -> Self {
        match storage {
            ChildStorage::Vec => ChildList::Heap(Vec::new()),
            ChildStorage::Inline => ChildList::Inline(SmallVec::new()),
        }
    }

    fn as_slice(&self) -> &[NodeId] {
        match self {
            ChildList::Heap(v) => v,
            ChildList::Inline(v) => v,
        }
    }

    fn as_mut_slice(&mut self) -> &mut [NodeId] {
        match self {
            ChildList::Heap(v) => v,
            ChildList::Inline(v) => v,
        }
    }

    fn insert(&mut self, index: usize, id: NodeId) {
        match self {
            ChildList::Heap(v) => v.insert(index, id),
            ChildList::Inline(v) => v.insert(index, id),
        }
    }

    fn remove(&mut self, index: usize) -> NodeId {
        match self {
            ChildList::Heap(v) => v.remove(index),
            ChildList::Inline(v) => v.remove(index),
        }
    }

    fn take(&mut self) -> Vec<NodeId> {
        match self {
            ChildList::Heap(v) => std::mem::take(v),
            ChildList::Inline(v) => std::mem::take(v).into_vec(),
        }
    }
}

/// An interior node: a label, ordered children, and optional named slots.
#[derive(Clone, Debug)]
pub struct Branch {
    label: Box<str>,
    children: ChildList,
    begin: Option<u32>,
    end: Option<u32>,
    named: Option<FxHashMap<Box<str>, NodeId>>,
    named_lists: Option<FxHashMap<Box<str>, Vec<NodeId>>>,
}

impl Branch {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn children(&self) -> &[NodeId] {
        self.children.as_slice()
    }
}

#[derive(Clone, Debug)]
pub enum NodeData {
    Token(Token),
    Branch(Branch),
}

#[derive(Clone, Debug)]
pub struct Node {
    parent: Option<NodeId>,
    unparsed: bool,
    data: NodeData,
}

impl Node {
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn is_unparsed(&self) -> bool {
        self.unparsed
    }

    pub fn data(&self) -> &NodeData {
        &self.data
    }

    pub fn as_token(&self) -> Option<&Token> {
        match &self.data {
            NodeData::Token(t) => Some(t),
            NodeData::Branch(_) => None,
        }
    }

    pub fn as_branch(&self) -> Option<&Branch> {
        match &self.data {
            NodeData::Branch(b) => Some(b),
            NodeData::Token(_) => None,
        }
    }
}

/// Owner of every token and branch produced for one input.
#[derive(Clone, Debug, Default)]
pub struct NodeArena {
    nodes: Vec<Node>,
    config: TreeConfig,
}

impl NodeArena {
    pub fn new(config: TreeConfig) -> Self {
        NodeArena {
            nodes: Vec::new(),
            config,
        }
    }

    pub fn config(&self) -> TreeConfig {
        self.config
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn push(&mut self, unparsed: bool, data: NodeData) -> NodeId {
        let raw = u32::try_from(self.nodes.len()).unwrap_or(u32::MAX);
        assert!(raw != u32::MAX, "node arena overflow");
        self.nodes.push(Node {
            parent: None,
            unparsed,
            data,
        });
        NodeId(raw)
    }

    pub(crate) fn alloc_token(&mut self, token: Token, unparsed: bool) -> NodeId {
        self.push(unparsed, NodeData::Token(token))
    }

    /// A free-standing token with explicit text and no buffer position.
    ///
    /// It has no lexer behind it until it is spliced next to one that has.
    pub fn new_token(&mut self, kind: TokenKind, image: &str) -> NodeId {
        self.alloc_token(
            Token {
                kind,
                begin: 0,
                end: 0,
                image: Some(image.into()),
                prepended: None,
                appended: None,
                inserted: false,
                scanned: false,
            },
            false,
        )
    }

    /// A new, empty branch node.
    pub fn new_branch(&mut self, label: &str) -> NodeId {
        let branch = Branch {
            label: label.into(),
            children: ChildList::new(self.config.child_storage),
            begin: None,
            end: None,
            named: None,
            named_lists: None,
        };
        self.push(false, NodeData::Branch(branch))
    }

    /// # Panics
    ///
    /// Panics if `id` does not belong to this arena.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// # Panics
    ///
    /// Panics if `id` is a branch.
    pub fn token(&self, id: NodeId) -> &Token {
        match &self.node(id).data {
            NodeData::Token(t) => t,
            NodeData::Branch(b) => panic!("node {} (`{}`) is not a token", id.raw(), b.label),
        }
    }

    pub(crate) fn token_mut(&mut self, id: NodeId) -> &mut Token {
        match &mut self.nodes[id.index()].data {
            NodeData::Token(t) => t,
            NodeData::Branch(b) => panic!("node {} (`{}`) is not a token", id.raw(), b.label),
        }
    }

    pub fn is_token(&self, id: NodeId) -> bool {
        self.node(id).as_token().is_some()
    }

    pub fn kind(&self, id: NodeId) -> Option<TokenKind> {
        self.node(id).as_token().map(Token::kind)
    }

    pub fn label(&self, id: NodeId) -> Option<&str> {
        self.node(id).as_branch().map(Branch::label)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub fn is_unparsed(&self, id: NodeId) -> bool {
        self.node(id).unparsed
    }

    pub fn set_unparsed(&mut self, id: NodeId, unparsed: bool) {
        self.nodes[id.index()].unparsed = unparsed;
    }

    fn branch_mut(&mut self, id: NodeId) -> &mut Branch {
        match &mut self.nodes[id.index()].data {
            NodeData::Branch(b) => b,
            NodeData::Token(t) => panic!("token {} ({}) cannot have children", id.raw(), t.kind),
        }
    }

    fn branch(&self, id: NodeId) -> Option<&Branch> {
        self.node(id).as_branch()
    }

    // === Children ===

    /// Append `child` to `parent`'s children and make `parent` its parent.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is a token, if `child` already has a parent, or
    /// if `child` is `parent` or one of its ancestors.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) {
        let index = self.child_count(parent);
        self.insert_child(parent, index, child);
    }

    /// Insert `child` at `index` among `parent`'s children.
    ///
    /// # Panics
    ///
    /// Same as [`add_child`](Self::add_child), and if `index` is past the
    /// end of the child list.
    pub fn insert_child(&mut self, parent: NodeId, index: usize, child: NodeId) {
        self.check_adoptable(parent, child);
        self.branch_mut(parent).children.insert(index, child);
        self.nodes[child.index()].parent = Some(parent);
    }

    /// Replace the child at `index`, returning the detached former child.
    ///
    /// # Panics
    ///
    /// Same as [`add_child`](Self::add_child), and if `index` is out of
    /// range.
    pub fn set_child(&mut self, parent: NodeId, index: usize, child: NodeId) -> NodeId {
        self.check_adoptable(parent, child);
        let slot = &mut self.branch_mut(parent).children.as_mut_slice()[index];
        let old = std::mem::replace(slot, child);
        self.nodes[old.index()].parent = None;
        self.nodes[child.index()].parent = Some(parent);
        old
    }

    /// Detach and return the child at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is a token or `index` is out of range.
    pub fn remove_child(&mut self, parent: NodeId, index: usize) -> NodeId {
        let old = self.branch_mut(parent).children.remove(index);
        self.nodes[old.index()].parent = None;
        old
    }

    /// Detach every child. Tokens have none, so this is a no-op for them.
    pub fn clear_children(&mut self, parent: NodeId) {
        let Some(NodeData::Branch(branch)) = self.nodes.get_mut(parent.index()).map(|n| &mut n.data)
        else {
            return;
        };
        for child in branch.children.take() {
            self.nodes[child.index()].parent = None;
        }
    }

    /// # Panics
    ///
    /// Panics if `index` is out of range (a token has no children).
    pub fn child(&self, parent: NodeId, index: usize) -> NodeId {
        let children = self.children(parent);
        match children.get(index) {
            Some(&id) => id,
            None => panic!(
                "child index {index} out of range for node {} with {} children",
                parent.raw(),
                children.len()
            ),
        }
    }

    /// Children in order; empty for tokens.
    pub fn children(&self, parent: NodeId) -> &[NodeId] {
        self.branch(parent).map_or(&[], Branch::children)
    }

    pub fn child_count(&self, parent: NodeId) -> usize {
        self.children(parent).len()
    }

    pub fn index_of(&self, parent: NodeId, child: NodeId) -> Option<usize> {
        self.children(parent).iter().position(|&c| c == child)
    }

    fn check_adoptable(&self, parent: NodeId, child: NodeId) {
        if let Some(owner) = self.parent(child) {
            panic!(
                "node {} already belongs to node {}",
                child.raw(),
                owner.raw()
            );
        }
        let mut cursor = Some(parent);
        while let Some(node) = cursor {
            assert!(
                node != child,
                "adding node {} under node {} would create a cycle",
                child.raw(),
                parent.raw()
            );
            cursor = self.parent(node);
        }
    }

    // === Named Children ===

    /// # Panics
    ///
    /// Panics if `parent` already has a child named `name`, or is a token.
    pub fn set_named_child(&mut self, parent: NodeId, name: &str, node: NodeId) {
        let named = self.branch_mut(parent).named.get_or_insert_with(FxHashMap::default);
        assert!(
            !named.contains_key(name),
            "duplicate named child not allowed: {name}"
        );
        named.insert(name.into(), node);
    }

    pub fn named_child(&self, parent: NodeId, name: &str) -> Option<NodeId> {
        self.branch(parent)?.named.as_ref()?.get(name).copied()
    }

    /// # Panics
    ///
    /// Panics if `parent` is a token.
    pub fn add_to_named_child_list(&mut self, parent: NodeId, name: &str, node: NodeId) {
        self.branch_mut(parent)
            .named_lists
            .get_or_insert_with(FxHashMap::default)
            .entry(name.into())
            .or_default()
            .push(node);
    }

    pub fn named_child_list(&self, parent: NodeId, name: &str) -> Option<&[NodeId]> {
        self.branch(parent)?
            .named_lists
            .as_ref()?
            .get(name)
            .map(Vec::as_slice)
    }

    // === Offsets ===

    /// Begin offset: a token's own, a branch's explicit one, or else the
    /// first descendant token's. A branch with no tokens reports 0.
    pub fn begin_offset(&self, id: NodeId) -> u32 {
        match &self.node(id).data {
            NodeData::Token(t) => t.begin,
            NodeData::Branch(b) => b
                .begin
                .or_else(|| self.first_token(id).map(|t| self.token(t).begin))
                .unwrap_or(0),
        }
    }

    /// End offset: a token's own, a branch's explicit one, or else the
    /// last descendant token's. A branch with no tokens reports 0.
    pub fn end_offset(&self, id: NodeId) -> u32 {
        match &self.node(id).data {
            NodeData::Token(t) => t.end,
            NodeData::Branch(b) => b
                .end
                .or_else(|| self.last_token(id).map(|t| self.token(t).end))
                .unwrap_or(0),
        }
    }

    pub fn set_begin_offset(&mut self, id: NodeId, offset: u32) {
        match &mut self.nodes[id.index()].data {
            NodeData::Token(t) => t.begin = offset,
            NodeData::Branch(b) => b.begin = Some(offset),
        }
    }

    pub fn set_end_offset(&mut self, id: NodeId, offset: u32) {
        match &mut self.nodes[id.index()].data {
            NodeData::Token(t) => t.end = offset,
            NodeData::Branch(b) => b.end = Some(offset),
        }
    }

    /// Give `id` the span from `start`'s begin to `end`'s end. Tokens also
    /// take over `start`'s prepended and `end`'s appended links.
    pub fn copy_location_info(&mut self, id: NodeId, start: NodeId, end: NodeId) {
        let begin = self.begin_offset(start);
        let finish = self.end_offset(end);
        let prepended = self.node(start).as_token().map(Token::prepended);
        let appended = self.node(end).as_token().map(Token::appended);
        self.set_begin_offset(id, begin);
        self.set_end_offset(id, finish);
        if let NodeData::Token(t) = &mut self.nodes[id.index()].data {
            if let Some(prepended) = prepended {
                t.prepended = prepended;
            }
            if let Some(appended) = appended {
                t.appended = appended;
            }
        }
    }

    fn first_token(&self, id: NodeId) -> Option<NodeId> {
        let mut cursor = id;
        loop {
            match &self.node(cursor).data {
                NodeData::Token(_) => return Some(cursor),
                NodeData::Branch(b) => {
                    // Skip leading branches that hold no tokens.
                    cursor = b
                        .children()
                        .iter()
                        .copied()
                        .find(|&c| self.has_token(c))?;
                }
            }
        }
    }

    fn last_token(&self, id: NodeId) -> Option<NodeId> {
        let mut cursor = id;
        loop {
            match &self.node(cursor).data {
                NodeData::Token(_) => return Some(cursor),
                NodeData::Branch(b) => {
                    cursor = b
                        .children()
                        .iter()
                        .rev()
                        .copied()
                        .find(|&c| self.has_token(c))?;
                }
            }
        }
    }

    fn has_token(&self, id: NodeId) -> bool {
        match &self.node(id).data {
            NodeData::Token(_) => true,
            NodeData::Branch(b) => b.children().iter().any(|&c| self.has_token(c)),
        }
    }

    /// Every token under `id` (or `id` itself), depth first, left to right.
    pub fn descendant_tokens(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(node) = stack.pop() {
            match &self.node(node).data {
                NodeData::Token(_) => out.push(node),
                NodeData::Branch(b) => stack.extend(b.children().iter().rev().copied()),
            }
        }
        out
    }

    /// The scanned token through which `id` reaches a lexer, if any.
    ///
    /// A token answers for itself when scanned; otherwise its prepended
    /// chain is searched, then its appended chain. A branch asks its
    /// children in order.
    pub fn token_source(&self, id: NodeId) -> Option<NodeId> {
        match &self.node(id).data {
            NodeData::Token(t) => {
                if t.scanned {
                    return Some(id);
                }
                self.chain_source(t.prepended, Token::prepended)
                    .or_else(|| self.chain_source(t.appended, Token::appended))
            }
            NodeData::Branch(b) => b.children().iter().find_map(|&c| self.token_source(c)),
        }
    }

    fn chain_source(
        &self,
        start: Option<NodeId>,
        step: fn(&Token) -> Option<NodeId>,
    ) -> Option<NodeId> {
        let mut cursor = start;
        // Bounded by the arena size in case a chain was spliced into a loop.
        for _ in 0..self.nodes.len() {
            let id = cursor?;
            let token = self.token(id);
            if token.scanned {
                return Some(id);
            }
            cursor = step(token);
        }
        None
    }
}
