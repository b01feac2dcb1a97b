// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Edge labels.
//!
//! An edge label is the run of bytes consumed when stepping from a node to
//! one of its children. Three physical representations coexist behind one
//! type: a single byte, a small inline buffer, and a heap slice. Callers get
//! length, byte access and prefix matching and must not care which variant
//! they are holding - the representations differ only in memory layout and in
//! how much input [`Key::extract`] bites off when a new edge is created.
//!
//! Sibling edges under one parent never share a leading byte, so a child
//! store can dispatch on the first byte alone and leave the rest of the label
//! comparison to [`Key::match_len`].

use crate::types::{KeyKind, TextRange};

/// Longest label the inline representation can hold.
pub const INLINE_KEY_CAP: usize = 8;

/// A compressed edge label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Key {
    /// No label. Only the root carries this.
    Empty,
    /// A one-byte label.
    Byte(u8),
    /// A short label stored inline, no allocation.
    Inline { len: u8, buf: [u8; INLINE_KEY_CAP] },
    /// An arbitrarily long label on the heap.
    Heap(Box<[u8]>),
}

impl Key {
    /// Label length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            Key::Empty => 0,
            Key::Byte(_) => 1,
            Key::Inline { len, .. } => *len as usize,
            Key::Heap(bytes) => bytes.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The label as a byte slice.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        match self {
            Key::Empty => &[],
            Key::Byte(b) => std::slice::from_ref(b),
            Key::Inline { len, buf } => &buf[..*len as usize],
            Key::Heap(bytes) => bytes,
        }
    }

    /// Leading byte of a non-empty label.
    #[inline]
    pub fn first_byte(&self) -> u8 {
        debug_assert!(!self.is_empty(), "first_byte of an empty label");
        self.bytes().first().copied().unwrap_or(0)
    }

    /// How many leading bytes of this label match `input`.
    ///
    /// Returns a value in `0..=len()`. A full match (`== len()`) means the
    /// walk continues past this edge; anything shorter is a divergence point
    /// and forces a split.
    #[inline]
    pub fn match_len(&self, input: &[u8]) -> usize {
        self.bytes()
            .iter()
            .zip(input)
            .take_while(|(a, b)| a == b)
            .count()
    }

    /// Build a label from raw bytes, picking the smallest representation
    /// that fits. Used when splitting an edge and when decoding a persisted
    /// lexicon.
    pub fn from_label(bytes: &[u8]) -> Key {
        match bytes.len() {
            0 => Key::Empty,
            1 => Key::Byte(bytes[0]),
            n if n <= INLINE_KEY_CAP => {
                let mut buf = [0u8; INLINE_KEY_CAP];
                buf[..n].copy_from_slice(bytes);
                Key::Inline { len: n as u8, buf }
            }
            _ => Key::Heap(Box::from(bytes)),
        }
    }

    /// Cut a fresh label out of the word being inserted, starting at `*ofs`,
    /// and advance `*ofs` past the consumed bytes.
    ///
    /// How much is consumed is the representation policy: `Byte` takes one
    /// byte, `Inline` up to [`INLINE_KEY_CAP`], `Heap` the whole remaining
    /// suffix. The caller guarantees at least one byte remains.
    pub fn extract(kind: KeyKind, word: TextRange, ofs: &mut usize, text: &[u8]) -> Key {
        let remaining = &text[word.start as usize + *ofs..word.end()];
        debug_assert!(!remaining.is_empty(), "extract with exhausted input");
        match kind {
            KeyKind::Byte => {
                *ofs += 1;
                Key::Byte(remaining[0])
            }
            KeyKind::Inline => {
                let n = remaining.len().min(INLINE_KEY_CAP);
                let mut buf = [0u8; INLINE_KEY_CAP];
                buf[..n].copy_from_slice(&remaining[..n]);
                *ofs += n;
                Key::Inline { len: n as u8, buf }
            }
            KeyKind::Heap => {
                *ofs += remaining.len();
                Key::Heap(Box::from(remaining))
            }
        }
    }
}
