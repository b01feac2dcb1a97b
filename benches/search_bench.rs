// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Fuzzy-search benchmarks over a synthetic dictionary.
//!
//! The generator is deterministic so runs are comparable across machines
//! and commits. Words are pseudo-Dutch syllable soup, which gives realistic
//! prefix sharing without shipping a dictionary file.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fuzzylex::{KeyKind, Lexicon, LexiconConfig, SearchMode, StoreKind};

/// Deterministic word generator (xorshift over a syllable table).
fn words(count: usize) -> Vec<String> {
    const SYLLABLES: [&str; 16] = [
        "ka", "ter", "boe", "lin", "pan", "koe", "str", "aal", "mor", "vel", "din", "zon", "gra",
        "plu", "wik", "sem",
    ];
    let mut state = 0x9e37_79b9_u32;
    let mut out = Vec::with_capacity(count);
    for _ in 0..count {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        let syllables = 2 + (state as usize % 4);
        let mut word = String::new();
        let mut s = state;
        for _ in 0..syllables {
            word.push_str(SYLLABLES[s as usize % SYLLABLES.len()]);
            s = s.rotate_left(7).wrapping_mul(0x85eb_ca6b);
        }
        out.push(word);
    }
    out
}

fn build(config: LexiconConfig, dictionary: &[String]) -> Lexicon {
    let mut lexicon = Lexicon::with_config(config);
    for word in dictionary {
        lexicon.insert(word);
    }
    lexicon.optimize();
    lexicon
}

fn bench_fuzzy(c: &mut Criterion) {
    let dictionary = words(20_000);
    let mut group = c.benchmark_group("search_fuzzy");
    for store in [StoreKind::Vec, StoreKind::Compact, StoreKind::Tree] {
        let config = LexiconConfig {
            store,
            key: KeyKind::Byte,
        };
        let lexicon = build(config, &dictionary);
        group.bench_with_input(
            BenchmarkId::new("nearest_d2", format!("{store:?}")),
            &lexicon,
            |b, lexicon| {
                b.iter(|| {
                    lexicon
                        .search_fuzzy(black_box("koeterpan"), 2, SearchMode::Nearest)
                        .unwrap()
                })
            },
        );
    }
    group.finish();
}

fn bench_exact(c: &mut Criterion) {
    let dictionary = words(20_000);
    let lexicon = build(LexiconConfig::default(), &dictionary);
    c.bench_function("search_exact", |b| {
        b.iter(|| lexicon.search(black_box("koeterpan")))
    });
}

fn bench_insert(c: &mut Criterion) {
    let dictionary = words(5_000);
    c.bench_function("insert_5k", |b| {
        b.iter(|| {
            let mut lexicon = Lexicon::new();
            for word in &dictionary {
                lexicon.insert(black_box(word));
            }
            lexicon
        })
    });
}

criterion_group!(benches, bench_fuzzy, bench_exact, bench_insert);
criterion_main!(benches);
