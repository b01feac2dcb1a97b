// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! CLI definitions for the fuzzylex command-line interface.
//!
//! Four subcommands: `build` turns a word list into a `.flx` index, `search`
//! runs one query against an index, `repl` is the interactive loop, and
//! `inspect` dumps the shape of an index without querying it.

pub mod display;

use clap::{Parser, Subcommand, ValueEnum};

use fuzzylex::{KeyKind, LexiconConfig, SearchMode, StoreKind};

#[derive(Parser)]
#[command(
    name = "fuzzylex",
    about = "Approximate-string dictionary lookup",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build an index from a newline-separated word list
    Build {
        /// Input word list (one word per line)
        #[arg(short, long)]
        input: String,

        /// Output index file
        #[arg(short, long)]
        output: String,

        /// Child-storage strategy
        #[arg(long, value_enum, default_value = "vec")]
        store: StoreArg,

        /// Edge-label representation
        #[arg(long, value_enum, default_value = "byte")]
        key: KeyArg,
    },

    /// Query an index once
    Search {
        /// The query string
        query: String,

        /// Index file produced by `build`
        #[arg(short, long)]
        index: String,

        /// Maximum edit distance
        #[arg(short, long, default_value_t = 2)]
        distance: usize,

        /// Result mode
        #[arg(short, long, value_enum, default_value = "all")]
        mode: ModeArg,

        /// Show at most this many results
        #[arg(short, long, default_value_t = 10)]
        limit: usize,

        /// Emit results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Interactive query loop
    Repl {
        /// Load a raw word list instead of a prebuilt index
        #[arg(short = 'w', long, conflicts_with = "index")]
        words: Option<String>,

        /// Load a prebuilt index
        #[arg(short, long)]
        index: Option<String>,

        /// Initial maximum edit distance
        #[arg(short, long, default_value_t = 2)]
        distance: usize,
    },

    /// Show the shape of an index
    Inspect {
        /// Index file produced by `build`
        index: String,

        /// Emit the summary as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum StoreArg {
    List,
    Vec,
    Compact,
    Tree,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum KeyArg {
    Byte,
    Inline,
    Heap,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    All,
    Nearest,
    NearestUnique,
}

impl StoreArg {
    pub fn to_kind(self) -> StoreKind {
        match self {
            StoreArg::List => StoreKind::List,
            StoreArg::Vec => StoreKind::Vec,
            StoreArg::Compact => StoreKind::Compact,
            StoreArg::Tree => StoreKind::Tree,
        }
    }
}

impl KeyArg {
    pub fn to_kind(self) -> KeyKind {
        match self {
            KeyArg::Byte => KeyKind::Byte,
            KeyArg::Inline => KeyKind::Inline,
            KeyArg::Heap => KeyKind::Heap,
        }
    }
}

impl ModeArg {
    pub fn to_mode(self) -> SearchMode {
        match self {
            ModeArg::All => SearchMode::All,
            ModeArg::Nearest => SearchMode::Nearest,
            ModeArg::NearestUnique => SearchMode::NearestUnique,
        }
    }
}

pub fn config_from(store: StoreArg, key: KeyArg) -> LexiconConfig {
    LexiconConfig {
        store: store.to_kind(),
        key: key.to_kind(),
    }
}
