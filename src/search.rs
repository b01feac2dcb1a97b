//! Fuzzy search: trie traversal in lock-step with the automaton.
//!
//! The traversal walks the lexicon from the root, feeding each edge label
//! into the automaton byte by byte. An edge dies the moment the automaton's
//! lowest live row exceeds the current distance limit - that mid-edge prune
//! is where almost all of the savings come from. Surviving children are
//! either free (no new edits on this edge: recurse now, depth-first, via an
//! explicit stack) or deferred into a bucket indexed by their new lower
//! bound.
//!
//! Scanning the buckets in increasing distance order *is* the best-first
//! ordering: candidates finalize in non-decreasing true distance without a
//! priority queue, because distances live in the tiny range `0..=height`.
//! In the `Nearest` modes a better candidate tightens the limit, and any
//! deferred bucket beyond the new limit is simply never scanned.
//!
//! The lexicon is a tree, so each node is reachable along exactly one path
//! and no memoization across paths is needed.

use crate::automaton::{Automaton, QueryError, State};
use crate::lexicon::Lexicon;
use crate::types::{Match, NodeId, SearchMode};

/// A deferred traversal frontier entry: a child whose edge introduced new
/// edits, parked until the scan reaches its distance.
#[derive(Clone, Copy)]
struct Held {
    node: NodeId,
    state: State,
    depth: usize,
}

struct Searcher<'a> {
    lex: &'a Lexicon,
    nfa: Automaton,
    mode: SearchMode,
    /// Current result limit; starts at the automaton height and only ever
    /// tightens.
    limit: usize,
    results: Vec<(NodeId, usize)>,
    buckets: Vec<Vec<Held>>,
}

impl Lexicon {
    /// All dictionary words within `max_distance` edits of `query`,
    /// filtered by `mode`, sorted by distance.
    ///
    /// `max_distance` is clamped as described on [`Automaton::new`]; a
    /// query longer than the automaton register is rejected.
    pub fn search_fuzzy(
        &self,
        query: &str,
        max_distance: usize,
        mode: SearchMode,
    ) -> Result<Vec<Match>, QueryError> {
        let nfa = Automaton::new(query.as_bytes(), max_distance)?;
        let limit = nfa.height();
        let mut searcher = Searcher {
            lex: self,
            nfa,
            mode,
            limit,
            results: Vec::new(),
            buckets: vec![Vec::new(); limit + 1],
        };
        searcher.run();
        let mut matches: Vec<Match> = searcher
            .results
            .iter()
            .filter_map(|&(id, distance)| {
                self.node(id).word.map(|range| Match {
                    word: self.word_str(range).to_string(),
                    distance,
                })
            })
            .collect();
        matches.sort_by_key(|m| m.distance);
        Ok(matches)
    }

    /// The single best match within `max_distance`, or `None` when there is
    /// no match - or no *unambiguous* one: two words tied at the best
    /// distance cancel each other out.
    pub fn search_nearest(
        &self,
        query: &str,
        max_distance: usize,
    ) -> Result<Option<Match>, QueryError> {
        let mut matches = self.search_fuzzy(query, max_distance, SearchMode::NearestUnique)?;
        Ok(if matches.is_empty() {
            None
        } else {
            Some(matches.swap_remove(0))
        })
    }
}

impl<'a> Searcher<'a> {
    fn run(&mut self) {
        let start = self.nfa.start();
        self.step(NodeId::ROOT, start, 0, 0);
        // bucket scan: strictly increasing distance, re-checking the limit
        // because Nearest modes tighten it mid-scan
        let mut threshold = 0;
        while threshold < self.limit {
            threshold += 1;
            let mut i = 0;
            while i < self.buckets[threshold].len() {
                if threshold > self.limit {
                    break;
                }
                let held = self.buckets[threshold][i];
                i += 1;
                self.step(held.node, held.state, held.depth, threshold);
            }
        }
    }

    /// Visit `node` and exhaust everything reachable from it at the same
    /// cost `dist`, deferring costlier children into the buckets.
    fn step(&mut self, node: NodeId, state: State, depth: usize, dist: usize) {
        let lex = self.lex;
        let mut stack = vec![(node, state, depth)];
        let mut same: Vec<(NodeId, State, usize)> = Vec::new();
        while let Some((id, state, depth)) = stack.pop() {
            self.visit(id, &state, depth);
            lex.node(id).children.for_each(&mut |_, child| {
                let label = lex.node(child).key.bytes();
                let mut next = state;
                let mut floor = dist;
                for &byte in label {
                    let (fed, low) = self.nfa.feed(&next, byte);
                    next = fed;
                    floor = low;
                    if floor > self.limit {
                        return; // edge dead, prune mid-label
                    }
                }
                let child_depth = depth + label.len();
                debug_assert!(floor >= dist);
                if floor == dist {
                    same.push((child, next, child_depth));
                } else {
                    self.buckets[floor].push(Held {
                        node: child,
                        state: next,
                        depth: child_depth,
                    });
                }
            });
            // reverse so the stack pops children in enumeration order
            while let Some(entry) = same.pop() {
                stack.push(entry);
            }
        }
    }

    /// If `id` is terminal, finish the automaton over the stored word's
    /// remaining tail and record the candidate under the active mode.
    fn visit(&mut self, id: NodeId, state: &State, depth: usize) {
        let Some(stored) = self.lex.node(id).word else {
            return;
        };
        debug_assert!(stored.len() >= depth);
        let tail = &self.lex.text[stored.start as usize + depth..stored.end()];
        let mut current = *state;
        for &byte in tail {
            let (fed, floor) = self.nfa.feed(&current, byte);
            current = fed;
            if floor > self.limit {
                return;
            }
        }
        let distance = self.nfa.accepts_distance(&current);
        if distance > self.limit {
            return;
        }
        match self.mode {
            SearchMode::All => self.results.push((id, distance)),
            SearchMode::Nearest | SearchMode::NearestUnique => {
                if distance < self.limit {
                    // strictly better: everything collected so far is stale
                    self.results.clear();
                    self.results.push((id, distance));
                    self.limit = distance;
                } else if self.mode == SearchMode::NearestUnique && !self.results.is_empty() {
                    // ambiguous best: drop the tie and retry one tighter
                    self.results.clear();
                    self.limit = self.limit.saturating_sub(1);
                } else {
                    self.results.push((id, distance));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{KeyKind, LexiconConfig, StoreKind};

    fn lexicon(words: &[&str]) -> Lexicon {
        let mut lex = Lexicon::new();
        for word in words {
            lex.insert(word);
        }
        lex.optimize();
        lex
    }

    fn hits(matches: &[Match]) -> Vec<(String, usize)> {
        let mut out: Vec<(String, usize)> = matches
            .iter()
            .map(|m| (m.word.clone(), m.distance))
            .collect();
        out.sort();
        out
    }

    #[test]
    fn all_mode_returns_everything_in_range() {
        let lex = lexicon(&["cat", "cats", "dog"]);
        let matches = lex.search_fuzzy("cot", 1, SearchMode::All).unwrap();
        assert_eq!(hits(&matches), vec![("cat".to_string(), 1)]);

        let matches = lex.search_fuzzy("cot", 2, SearchMode::All).unwrap();
        assert_eq!(
            hits(&matches),
            vec![("cat".to_string(), 1), ("cats".to_string(), 2)]
        );
    }

    #[test]
    fn results_come_back_sorted_by_distance() {
        let lex = lexicon(&["cats", "cat", "coat", "dog"]);
        let matches = lex.search_fuzzy("cot", 2, SearchMode::All).unwrap();
        let distances: Vec<usize> = matches.iter().map(|m| m.distance).collect();
        let mut sorted = distances.clone();
        sorted.sort_unstable();
        assert_eq!(distances, sorted);
    }

    #[test]
    fn nearest_mode_keeps_only_the_best_tier() {
        let lex = lexicon(&["cat", "cats", "dog"]);
        // cat is 1 edit from cot; cats at 2 is inside the radius but loses
        let matches = lex.search_fuzzy("cot", 2, SearchMode::Nearest).unwrap();
        assert_eq!(hits(&matches), vec![("cat".to_string(), 1)]);
    }

    #[test]
    fn nearest_mode_keeps_ties() {
        let lex = lexicon(&["cat", "bat", "dog"]);
        let matches = lex.search_fuzzy("rat", 2, SearchMode::Nearest).unwrap();
        assert_eq!(
            hits(&matches),
            vec![("bat".to_string(), 1), ("cat".to_string(), 1)]
        );
    }

    #[test]
    fn nearest_unique_returns_the_single_best() {
        let lex = lexicon(&["cat", "cats", "dog"]);
        let matches = lex
            .search_fuzzy("cot", 1, SearchMode::NearestUnique)
            .unwrap();
        assert_eq!(hits(&matches), vec![("cat".to_string(), 1)]);
        let best = lex.search_nearest("cot", 1).unwrap();
        assert_eq!(
            best,
            Some(Match {
                word: "cat".to_string(),
                distance: 1
            })
        );
    }

    #[test]
    fn nearest_unique_discards_an_ambiguous_tie() {
        let lex = lexicon(&["cat", "bat", "dog"]);
        // cat and bat tie at distance 1 from rat; the tie cancels and
        // nothing survives at a tighter limit
        let matches = lex
            .search_fuzzy("rat", 2, SearchMode::NearestUnique)
            .unwrap();
        assert!(matches.is_empty());
        assert_eq!(lex.search_nearest("rat", 2).unwrap(), None);
    }

    #[test]
    fn exact_hit_wins_under_nearest_unique() {
        let lex = lexicon(&["cat", "bat", "rat", "dog"]);
        let best = lex.search_nearest("rat", 2).unwrap();
        assert_eq!(
            best,
            Some(Match {
                word: "rat".to_string(),
                distance: 0
            })
        );
    }

    #[test]
    fn distance_zero_is_exact_search() {
        let lex = lexicon(&["aap", "arfman", "burp", "koe", "koekjes", "koekenpan"]);
        let matches = lex.search_fuzzy("koe", 0, SearchMode::All).unwrap();
        assert_eq!(hits(&matches), vec![("koe".to_string(), 0)]);
    }

    #[test]
    fn every_configuration_agrees() {
        let words = ["aap", "arfman", "burp", "koe", "koekjes", "koekenpan"];
        let reference = {
            let lex = lexicon(&words);
            hits(&lex.search_fuzzy("koekje", 2, SearchMode::All).unwrap())
        };
        for store in [
            StoreKind::List,
            StoreKind::Vec,
            StoreKind::Compact,
            StoreKind::Tree,
        ] {
            for key in [KeyKind::Byte, KeyKind::Inline, KeyKind::Heap] {
                let config = LexiconConfig { store, key };
                let mut lex = Lexicon::with_config(config);
                for word in words {
                    lex.insert(word);
                }
                lex.optimize();
                let got = hits(&lex.search_fuzzy("koekje", 2, SearchMode::All).unwrap());
                assert_eq!(got, reference, "{config:?}");
            }
        }
    }

    #[test]
    fn unoptimized_lexicon_finds_the_same_matches() {
        let mut lex = Lexicon::new();
        for word in ["cat", "cats", "coat", "dog"] {
            lex.insert(word);
        }
        let matches = lex.search_fuzzy("cot", 2, SearchMode::All).unwrap();
        assert_eq!(
            hits(&matches),
            vec![
                ("cat".to_string(), 1),
                ("cats".to_string(), 2),
                ("coat".to_string(), 1)
            ]
        );
    }

    #[test]
    fn oversized_query_is_rejected() {
        let lex = lexicon(&["cat"]);
        let long = "x".repeat(80);
        assert!(matches!(
            lex.search_fuzzy(&long, 2, SearchMode::All),
            Err(QueryError::PatternTooLong { len: 80, .. })
        ));
    }

    #[test]
    fn empty_lexicon_yields_no_matches() {
        let lex = Lexicon::new();
        assert!(lex
            .search_fuzzy("anything", 2, SearchMode::All)
            .unwrap()
            .is_empty());
    }
}
