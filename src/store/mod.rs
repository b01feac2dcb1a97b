// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Per-node child storage.
//!
//! A child store maps the leading byte of each outgoing edge to the child
//! node carrying the full label. Four interchangeable strategies implement
//! the same contract (see [`crate::types::StoreKind`] for the trade-off
//! table); a lexicon picks one at construction and every node shares it.
//!
//! The contract every strategy upholds:
//!
//! - at most one child per leading byte (`attach` is only called for bytes
//!   that are absent - the split logic in the lexicon guarantees it);
//! - `for_each` visits children in a stable enumeration order, used by
//!   traversal, serialization and `optimize`;
//! - reordering (move-to-front, `rebuild` after an optimize pass) may change
//!   enumeration order but never the set of children.

mod compact;
mod list;
mod tree;
mod vec;

pub(crate) use compact::CompactStore;
pub(crate) use list::ListStore;
pub(crate) use tree::TreeStore;
pub(crate) use vec::VecStore;

use crate::types::{NodeId, StoreKind};

/// Child storage for one trie node.
#[derive(Debug)]
pub(crate) enum ChildStore {
    List(ListStore),
    Vec(VecStore),
    Compact(CompactStore),
    Tree(TreeStore),
}

impl ChildStore {
    pub(crate) fn new(kind: StoreKind) -> Self {
        match kind {
            StoreKind::List => ChildStore::List(ListStore::new()),
            StoreKind::Vec => ChildStore::Vec(VecStore::new()),
            StoreKind::Compact => ChildStore::Compact(CompactStore::new()),
            StoreKind::Tree => ChildStore::Tree(TreeStore::new()),
        }
    }

    /// Look up the child whose edge starts with `byte`.
    pub(crate) fn get(&self, byte: u8) -> Option<NodeId> {
        match self {
            ChildStore::List(s) => s.get(byte),
            ChildStore::Vec(s) => s.get(byte),
            ChildStore::Compact(s) => s.get(byte),
            ChildStore::Tree(s) => s.get(byte),
        }
    }

    /// Like [`ChildStore::get`], but lets the strategy apply its reordering
    /// heuristic (move-to-front). Used on the insertion path only; lookups
    /// leave the order alone.
    pub(crate) fn seek_adjust(&mut self, byte: u8) -> Option<NodeId> {
        match self {
            ChildStore::List(s) => s.seek_adjust(byte),
            ChildStore::Vec(s) => s.seek_adjust(byte),
            ChildStore::Compact(s) => s.seek_adjust(byte),
            ChildStore::Tree(s) => s.get(byte),
        }
    }

    /// Add a child under a leading byte that is not present yet.
    pub(crate) fn attach(&mut self, byte: u8, child: NodeId) {
        debug_assert!(self.get(byte).is_none(), "duplicate leading byte");
        match self {
            ChildStore::List(s) => s.attach(byte, child),
            ChildStore::Vec(s) => s.attach(byte, child),
            ChildStore::Compact(s) => s.attach(byte, child),
            ChildStore::Tree(s) => s.attach(byte, child),
        }
    }

    /// Point an existing entry at a different node. Used when a split wedges
    /// a fork node between parent and child; the leading byte is unchanged.
    pub(crate) fn replace(&mut self, byte: u8, child: NodeId) {
        match self {
            ChildStore::List(s) => s.replace(byte, child),
            ChildStore::Vec(s) => s.replace(byte, child),
            ChildStore::Compact(s) => s.replace(byte, child),
            ChildStore::Tree(s) => s.replace(byte, child),
        }
    }

    /// Number of children.
    pub(crate) fn arity(&self) -> usize {
        match self {
            ChildStore::List(s) => s.arity(),
            ChildStore::Vec(s) => s.arity(),
            ChildStore::Compact(s) => s.arity(),
            ChildStore::Tree(s) => s.arity(),
        }
    }

    /// Visit every child in enumeration order.
    pub(crate) fn for_each<F: FnMut(u8, NodeId)>(&self, f: &mut F) {
        match self {
            ChildStore::List(s) => s.for_each(f),
            ChildStore::Vec(s) => s.for_each(f),
            ChildStore::Compact(s) => s.for_each(f),
            ChildStore::Tree(s) => s.for_each(f),
        }
    }

    /// Collect the children in enumeration order.
    pub(crate) fn entries(&self) -> Vec<(u8, NodeId)> {
        let mut out = Vec::with_capacity(self.arity());
        self.for_each(&mut |byte, child| out.push((byte, child)));
        out
    }

    /// Replace the contents with `entries`, in the given order where the
    /// strategy has one. The ordered tree keeps byte order regardless.
    pub(crate) fn rebuild(&mut self, entries: Vec<(u8, NodeId)>) {
        match self {
            ChildStore::List(s) => s.rebuild(entries),
            ChildStore::Vec(s) => s.rebuild(entries),
            ChildStore::Compact(s) => s.rebuild(entries),
            ChildStore::Tree(_) => {} // byte-ordered, reordering is meaningless
        }
    }
}
