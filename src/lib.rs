//! Approximate-string dictionary lookup.
//!
//! A compressed prefix tree (the [`Lexicon`]) holds the dictionary; a
//! bit-parallel Levenshtein [`Automaton`] evaluates a bounded edit-distance
//! query; a joint traversal walks the trie while feeding the automaton,
//! pruning every branch that cannot stay within the distance limit. The
//! result: "which words are within D edits of this query" without scanning
//! the dictionary, with O(D) word-ops per character fed.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────┐     ┌──────────────┐     ┌──────────────┐
//! │  key.rs    │────▶│  lexicon.rs  │────▶│  search.rs   │
//! │ (Key:edge  │     │ (insert,     │     │ (fuzzy joint │
//! │  labels)   │     │  search,     │     │  traversal)  │
//! └────────────┘     │  optimize)   │     └──────────────┘
//! ┌────────────┐     └──────────────┘     ┌──────────────┐
//! │  store/    │────────────▲ ▲───────────│ automaton.rs │
//! │ (4 child   │              │           │ (bit-vector  │
//! │ strategies)│      ┌───────┴─────┐     │  Levenshtein)│
//! └────────────┘      │  binary.rs  │     └──────────────┘
//!                     │ (persisted  │
//!                     │   format)   │
//!                     └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```
//! use fuzzylex::{Lexicon, SearchMode};
//!
//! let mut lexicon = Lexicon::new();
//! for word in ["cat", "cats", "dog"] {
//!     lexicon.insert(word);
//! }
//! lexicon.optimize();
//!
//! assert!(lexicon.search("cat"));
//! assert!(!lexicon.search("cot"));
//!
//! let matches = lexicon.search_fuzzy("cot", 1, SearchMode::All)?;
//! assert_eq!(matches.len(), 1);
//! assert_eq!((matches[0].word.as_str(), matches[0].distance), ("cat", 1));
//! # Ok::<(), fuzzylex::QueryError>(())
//! ```
//!
//! # Lifecycle and limits
//!
//! Insert everything, [`Lexicon::optimize`] once, then query; the crate is
//! single-threaded and a lexicon must not be mutated while searches borrow
//! it (the borrow checker enforces this for safe code). Queries are capped
//! at [`MAX_PATTERN_LEN`] bytes because the automaton packs the pattern
//! into one machine word; distances are tracked up to [`MAX_DISTANCE`].
//! Large radii work but explore a lot of trie - bound the radius if you
//! need bounded latency.

// Module declarations
mod automaton;
mod cache;
mod key;
mod levenshtein;
mod lexicon;
mod search;
mod store;
mod types;

pub mod binary;

// Re-exports for the public API
pub use automaton::{Automaton, QueryError, State, MAX_DISTANCE, MAX_PATTERN_LEN};
pub use cache::FirstByteCache;
pub use levenshtein::{levenshtein, levenshtein_within};
pub use lexicon::Lexicon;
pub use types::{KeyKind, LexiconConfig, LexiconStats, Match, SearchMode, StoreKind};
