// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The lexicon: a path-compressed trie over a byte dictionary.
//!
//! Compression here is the digital-search-tree flavor: a terminal node
//! stores its *complete* word, and that stored word doubles as the
//! compressed tail of the path. Inserting a word that collides with a stored
//! word's tail "demotes" the stored word down into the children, so chains
//! of single-child nodes never materialize.
//!
//! The demotion policy (one of several that all yield the same match set,
//! differing only in trie shape) is: **demote whenever the stored word is at
//! least as long as the incoming one**. Shorter words therefore bubble
//! toward the root and the shape is independent of insertion order for words
//! of distinct lengths.
//!
//! # Lifecycle
//!
//! Build once with repeated [`Lexicon::insert`], call
//! [`Lexicon::optimize`] once, then query. The lexicon is not internally
//! synchronized: callers must not insert while a search borrow is live (the
//! borrow checker enforces this for safe code).

use crate::key::Key;
use crate::store::ChildStore;
use crate::types::{LexiconConfig, LexiconStats, NodeId, TextRange};

/// A single trie node in the arena.
#[derive(Debug)]
pub(crate) struct Node {
    /// Edge label consumed to reach this node from its parent. `Key::Empty`
    /// on the root only.
    pub(crate) key: Key,
    /// Terminal marker: the complete dictionary word ending here, if any.
    pub(crate) word: Option<TextRange>,
    pub(crate) children: ChildStore,
}

/// Outcome of one descent step during insertion.
enum Step {
    /// The word found its node; nothing left to do.
    Done,
    /// Continue inserting at this child, with this many bytes consumed.
    Continue(NodeId, usize),
}

/// An in-memory dictionary supporting exact and approximate lookup.
#[derive(Debug)]
pub struct Lexicon {
    pub(crate) nodes: Vec<Node>,
    pub(crate) text: Vec<u8>,
    pub(crate) config: LexiconConfig,
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::new()
    }
}

impl Lexicon {
    /// An empty lexicon with the default configuration.
    pub fn new() -> Self {
        Self::with_config(LexiconConfig::default())
    }

    /// An empty lexicon with an explicit store strategy and edge-label
    /// representation.
    pub fn with_config(config: LexiconConfig) -> Self {
        let root = Node {
            key: Key::Empty,
            word: None,
            children: ChildStore::new(config.store),
        };
        Lexicon {
            nodes: vec![root],
            text: Vec::new(),
            config,
        }
    }

    /// The configuration this lexicon was built with.
    pub fn config(&self) -> LexiconConfig {
        self.config
    }

    #[inline]
    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    #[inline]
    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    fn new_node(&mut self, key: Key, word: Option<TextRange>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node {
            key,
            word,
            children: ChildStore::new(self.config.store),
        });
        id
    }

    /// The stored word a range points at.
    pub(crate) fn word_str(&self, range: TextRange) -> &str {
        // words enter through `insert(&str)` or the validated decoder, so
        // the buffer slice is always valid UTF-8
        std::str::from_utf8(range.bytes(&self.text)).unwrap_or_default()
    }

    // =========================================================================
    // INSERTION
    // =========================================================================

    /// Add `word` to the dictionary. Inserting a word twice is a no-op.
    pub fn insert(&mut self, word: &str) {
        let start = self.text.len();
        self.text.extend_from_slice(word.as_bytes());
        let range = TextRange::new(start, word.len());
        if !self.insert_range(NodeId::ROOT, range, 0) {
            // already present: the appended copy is the last thing in the
            // buffer and nothing references it yet
            self.text.truncate(start);
        }
    }

    /// Insert a word (already resident in the text buffer) starting at
    /// `node` with `ofs` bytes of it consumed. Returns false when the word
    /// was already present.
    fn insert_range(&mut self, mut cur: NodeId, word: TextRange, mut ofs: usize) -> bool {
        loop {
            let resident = self.node(cur).word;
            if let Some(stored) = resident {
                if self.tail_eq(stored, word, ofs) {
                    return false;
                }
                // demotion policy: push the resident word down when it is at
                // least as long as the incoming one
                if stored.len() > ofs && stored.len() >= word.len() {
                    self.node_mut(cur).word = None;
                    self.demote(cur, stored, ofs);
                }
            }
            if self.node(cur).word.is_none() {
                self.node_mut(cur).word = Some(word);
                return true;
            }
            match self.step(cur, word, ofs) {
                Step::Done => return true,
                Step::Continue(child, next) => {
                    cur = child;
                    ofs = next;
                }
            }
        }
    }

    /// Re-insert a demoted word into `cur`'s children. Depth of the demote
    /// cascade is bounded by the word length.
    fn demote(&mut self, cur: NodeId, stored: TextRange, ofs: usize) {
        match self.step(cur, stored, ofs) {
            Step::Done => {}
            Step::Continue(child, next) => {
                let inserted = self.insert_range(child, stored, next);
                debug_assert!(inserted, "demoted a word that already existed below");
            }
        }
    }

    /// One descent step: dispatch on the next input byte, creating, entering
    /// or splitting the edge as needed.
    fn step(&mut self, cur: NodeId, word: TextRange, mut ofs: usize) -> Step {
        debug_assert!(ofs < word.len(), "step with exhausted input");
        let byte = self.text[word.start as usize + ofs];
        match self.node_mut(cur).children.seek_adjust(byte) {
            None => {
                let key = Key::extract(self.config.key, word, &mut ofs, &self.text);
                let id = self.new_node(key, Some(word));
                self.node_mut(cur).children.attach(byte, id);
                Step::Done
            }
            Some(child) => {
                let (matched, key_len) = {
                    let key = &self.node(child).key;
                    let input = &self.text[word.start as usize + ofs..word.end()];
                    (key.match_len(input), key.len())
                };
                if matched == key_len {
                    Step::Continue(child, ofs + matched)
                } else {
                    self.split(cur, child, byte, matched, word, ofs + matched);
                    Step::Done
                }
            }
        }
    }

    /// Cut the edge into `child` at `at` label bytes: a fresh fork node
    /// takes the common prefix, the old child keeps the rest, and the
    /// incoming word lands either on the fork itself (input exhausted at the
    /// divergence) or on a new sibling.
    fn split(
        &mut self,
        parent: NodeId,
        child: NodeId,
        byte: u8,
        at: usize,
        word: TextRange,
        mut ofs: usize,
    ) {
        debug_assert!(at >= 1, "split below the dispatch byte");
        let (fork_key, rest_key) = {
            let label = self.node(child).key.bytes();
            (Key::from_label(&label[..at]), Key::from_label(&label[at..]))
        };
        let rest_byte = rest_key.first_byte();
        self.node_mut(child).key = rest_key;
        let fork = self.new_node(fork_key, None);
        self.node_mut(fork).children.attach(rest_byte, child);
        self.node_mut(parent).children.replace(byte, fork);
        if ofs == word.len() {
            self.node_mut(fork).word = Some(word);
        } else {
            let next_byte = self.text[word.start as usize + ofs];
            let key = Key::extract(self.config.key, word, &mut ofs, &self.text);
            let id = self.new_node(key, Some(word));
            self.node_mut(fork).children.attach(next_byte, id);
        }
    }

    /// Do the tails of two resident ranges agree from `ofs` on?
    ///
    /// Both prefixes spell the path to the node under inspection, so tail
    /// equality is word equality.
    fn tail_eq(&self, a: TextRange, b: TextRange, ofs: usize) -> bool {
        a.len() >= ofs
            && b.len() >= ofs
            && self.text[a.start as usize + ofs..a.end()]
                == self.text[b.start as usize + ofs..b.end()]
    }

    // =========================================================================
    // EXACT LOOKUP
    // =========================================================================

    /// Is `word` in the dictionary?
    pub fn search(&self, word: &str) -> bool {
        self.locate_from(NodeId::ROOT, word.as_bytes(), 0).is_some()
    }

    /// Exact lookup returning the terminal node. Cost is O(|word|) per
    /// level-dispatch, independent of dictionary size.
    pub(crate) fn locate_from(&self, mut cur: NodeId, input: &[u8], mut ofs: usize) -> Option<NodeId> {
        loop {
            let node = self.node(cur);
            if let Some(stored) = node.word {
                if stored.len() >= ofs
                    && self.text[stored.start as usize + ofs..stored.end()] == input[ofs..]
                {
                    return Some(cur);
                }
            }
            if ofs >= input.len() {
                return None;
            }
            let child = node.children.get(input[ofs])?;
            let key = &self.node(child).key;
            let matched = key.match_len(&input[ofs..]);
            if matched < key.len() {
                return None;
            }
            ofs += matched;
            cur = child;
        }
    }

    // =========================================================================
    // OPTIMIZATION & ENUMERATION
    // =========================================================================

    /// Reorder every node's children by descending subtree word count, so
    /// the fuzzy traversal meets word-dense branches first. Call once after
    /// bulk insertion; searches stay correct without it, just slower.
    /// Returns the total word count.
    pub fn optimize(&mut self) -> usize {
        // subtree word counts, bottom-up with an explicit stack
        let mut counts = vec![0usize; self.nodes.len()];
        let mut stack = vec![(NodeId::ROOT, false)];
        while let Some((id, expanded)) = stack.pop() {
            if !expanded {
                stack.push((id, true));
                self.node(id)
                    .children
                    .for_each(&mut |_, child| stack.push((child, false)));
            } else {
                let mut acc = usize::from(self.node(id).word.is_some());
                self.node(id)
                    .children
                    .for_each(&mut |_, child| acc += counts[child.index()]);
                counts[id.index()] = acc;
            }
        }
        // reorder pass; stable sort keeps enumeration order among ties
        for node in &mut self.nodes {
            if node.children.arity() < 2 {
                continue;
            }
            let mut entries = node.children.entries();
            entries.sort_by(|a, b| counts[b.1.index()].cmp(&counts[a.1.index()]));
            node.children.rebuild(entries);
        }
        counts[NodeId::ROOT.index()]
    }

    /// Every stored word, in trie enumeration order (pre-order; not sorted).
    pub fn words(&self) -> Vec<&str> {
        let mut out = Vec::new();
        let mut stack = vec![NodeId::ROOT];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if let Some(range) = node.word {
                out.push(self.word_str(range));
            }
            let mut kids = Vec::with_capacity(node.children.arity());
            node.children.for_each(&mut |_, child| kids.push(child));
            while let Some(child) = kids.pop() {
                stack.push(child);
            }
        }
        out
    }

    /// Number of distinct words stored.
    pub fn len(&self) -> usize {
        self.nodes.iter().filter(|n| n.word.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Walk the trie and summarize its shape.
    pub fn stats(&self) -> LexiconStats {
        let mut stats = LexiconStats {
            nodes: self.nodes.len(),
            words: 0,
            text_bytes: self.text.len(),
            max_depth: 0,
            max_arity: 0,
        };
        let mut stack = vec![(NodeId::ROOT, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let node = self.node(id);
            stats.words += usize::from(node.word.is_some());
            stats.max_depth = stats.max_depth.max(depth);
            stats.max_arity = stats.max_arity.max(node.children.arity());
            node.children
                .for_each(&mut |_, child| stack.push((child, depth + 1)));
        }
        stats
    }

    /// Shape check: under the default demotion policy every non-root node is
    /// terminal or a real fork (two or more children).
    #[cfg(test)]
    pub(crate) fn forks_are_real(&self) -> bool {
        self.nodes.iter().enumerate().all(|(i, node)| {
            i == NodeId::ROOT.index() || node.word.is_some() || node.children.arity() >= 2
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{KeyKind, StoreKind};

    fn all_configs() -> Vec<LexiconConfig> {
        let mut out = Vec::new();
        for store in [
            StoreKind::List,
            StoreKind::Vec,
            StoreKind::Compact,
            StoreKind::Tree,
        ] {
            for key in [KeyKind::Byte, KeyKind::Inline, KeyKind::Heap] {
                out.push(LexiconConfig { store, key });
            }
        }
        out
    }

    #[test]
    fn inserted_words_are_found_verbatim() {
        for config in all_configs() {
            let mut lex = Lexicon::with_config(config);
            for word in ["cat", "cats", "dog"] {
                lex.insert(word);
            }
            assert!(lex.search("cat"), "{config:?}");
            assert!(lex.search("cats"), "{config:?}");
            assert!(lex.search("dog"), "{config:?}");
            assert!(!lex.search("cot"), "{config:?}");
            assert!(!lex.search("ca"), "{config:?}");
            assert!(!lex.search("catsx"), "{config:?}");
        }
    }

    #[test]
    fn insertion_is_idempotent() {
        for config in all_configs() {
            let mut lex = Lexicon::with_config(config);
            lex.insert("koe");
            lex.insert("koekjes");
            let nodes = lex.nodes.len();
            let bytes = lex.text.len();
            lex.insert("koe");
            lex.insert("koekjes");
            assert_eq!(lex.nodes.len(), nodes, "{config:?}");
            assert_eq!(lex.text.len(), bytes, "{config:?}");
            assert_eq!(lex.len(), 2, "{config:?}");
        }
    }

    #[test]
    fn prefix_words_and_splits_coexist() {
        for config in all_configs() {
            let mut lex = Lexicon::with_config(config);
            for word in ["aap", "arfman", "burp", "koe", "koekjes", "koekenpan"] {
                lex.insert(word);
            }
            for word in ["aap", "arfman", "burp", "koe", "koekjes", "koekenpan"] {
                assert!(lex.search(word), "{config:?}: lost {word}");
            }
            for word in ["koek", "koekje", "koekenpannen", "a", ""] {
                assert!(!lex.search(word), "{config:?}: phantom {word}");
            }
        }
    }

    #[test]
    fn shorter_words_bubble_toward_the_root() {
        // both insertion orders end with the shorter word higher up
        for words in [["cats", "cat"], ["cat", "cats"]] {
            let mut lex = Lexicon::new();
            for word in words {
                lex.insert(word);
            }
            let root_word = lex.node(NodeId::ROOT).word.map(|r| lex.word_str(r));
            assert_eq!(root_word, Some("cat"));
        }
    }

    #[test]
    fn empty_word_is_storable() {
        let mut lex = Lexicon::new();
        lex.insert("cat");
        lex.insert("");
        assert!(lex.search(""));
        assert!(lex.search("cat"));
        assert_eq!(lex.len(), 2);
    }

    #[test]
    fn forks_are_real_after_interleaved_inserts() {
        for config in all_configs() {
            let mut lex = Lexicon::with_config(config);
            for word in [
                "koekenpan",
                "koe",
                "koekjes",
                "koek",
                "kat",
                "katten",
                "k",
                "burp",
            ] {
                lex.insert(word);
            }
            assert!(lex.forks_are_real(), "{config:?}");
        }
    }

    #[test]
    fn optimize_reports_word_count_and_keeps_results() {
        for config in all_configs() {
            let mut lex = Lexicon::with_config(config);
            let words = ["aap", "arfman", "burp", "koe", "koekjes", "koekenpan"];
            for word in words {
                lex.insert(word);
            }
            assert_eq!(lex.optimize(), words.len(), "{config:?}");
            for word in words {
                assert!(lex.search(word), "{config:?}: lost {word} after optimize");
            }
        }
    }

    #[test]
    fn words_enumerates_the_full_dictionary() {
        let mut lex = Lexicon::new();
        let mut expect: Vec<&str> = vec!["aap", "arfman", "burp", "koe", "koekjes"];
        for word in &expect {
            lex.insert(word);
        }
        let mut got = lex.words();
        got.sort_unstable();
        expect.sort_unstable();
        assert_eq!(got, expect);
    }

    #[test]
    fn stats_reflect_the_shape() {
        let mut lex = Lexicon::new();
        for word in ["cat", "cats", "dog"] {
            lex.insert(word);
        }
        let stats = lex.stats();
        assert_eq!(stats.words, 3);
        assert_eq!(stats.nodes, lex.nodes.len());
        assert_eq!(stats.text_bytes, "catcatsdog".len());
        assert!(stats.max_arity >= 2);
    }
}
