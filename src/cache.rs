// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Front-byte lookup accelerator.
//!
//! Exact lookups all start with the same root dispatch, and interactive
//! workloads hammer a handful of leading bytes. This wrapper remembers, per
//! possible first byte, the top-level child the previous lookup reached and
//! resumes there, skipping the root's child store entirely on a repeat.
//!
//! The cache holds a shared borrow of the lexicon for its whole lifetime, so
//! the "must not be used across a mutation" contract is enforced by the
//! borrow checker rather than by documentation: drop the cache, insert,
//! build a new one.

use crate::lexicon::Lexicon;
use crate::types::NodeId;

/// Caching wrapper with the same lookup contract as
/// [`Lexicon::search`].
pub struct FirstByteCache<'a> {
    lexicon: &'a Lexicon,
    slots: [Option<NodeId>; 256],
}

impl<'a> FirstByteCache<'a> {
    pub fn new(lexicon: &'a Lexicon) -> Self {
        FirstByteCache {
            lexicon,
            slots: [None; 256],
        }
    }

    /// Is `word` in the dictionary?
    pub fn search(&mut self, word: &str) -> bool {
        let input = word.as_bytes();
        let lex = self.lexicon;
        // the root's own word never goes through the dispatch
        if let Some(stored) = lex.node(NodeId::ROOT).word {
            if stored.bytes(&lex.text) == input {
                return true;
            }
        }
        let Some(&first) = input.first() else {
            return false;
        };
        let child = match self.slots[first as usize] {
            Some(child) => child,
            None => {
                let Some(child) = lex.node(NodeId::ROOT).children.get(first) else {
                    return false;
                };
                self.slots[first as usize] = Some(child);
                child
            }
        };
        // the cache only keys on the first byte; the rest of the edge label
        // still has to match this particular word
        let key = &lex.node(child).key;
        let matched = key.match_len(input);
        if matched < key.len() {
            return false;
        }
        lex.locate_from(child, input, matched).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{KeyKind, LexiconConfig, StoreKind};

    fn sample(config: LexiconConfig) -> Lexicon {
        let mut lex = Lexicon::with_config(config);
        for word in ["aap", "arfman", "burp", "koe", "koekjes", "koekenpan"] {
            lex.insert(word);
        }
        lex.optimize();
        lex
    }

    #[test]
    fn agrees_with_plain_search_hot_and_cold() {
        for store in [
            StoreKind::List,
            StoreKind::Vec,
            StoreKind::Compact,
            StoreKind::Tree,
        ] {
            for key in [KeyKind::Byte, KeyKind::Inline, KeyKind::Heap] {
                let config = LexiconConfig { store, key };
                let lex = sample(config);
                let mut cache = FirstByteCache::new(&lex);
                let probes = [
                    "aap",
                    "arfman",
                    "burp",
                    "koe",
                    "koekjes",
                    "koekenpan",
                    "koekx",
                    "koek",
                    "kat",
                    "b",
                    "",
                    "zebra",
                ];
                // twice: first pass fills the slots, second pass reuses them
                for _ in 0..2 {
                    for probe in probes {
                        assert_eq!(
                            cache.search(probe),
                            lex.search(probe),
                            "{config:?}: {probe:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn root_word_is_found_without_dispatch() {
        let mut lex = Lexicon::new();
        lex.insert("koe");
        let mut cache = FirstByteCache::new(&lex);
        assert!(cache.search("koe"));
        assert!(!cache.search("ko"));
    }
}
