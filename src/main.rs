// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! fuzzylex command-line driver.
//!
//! Thin wiring around the library: build an index from a word list, query
//! it, poke at it interactively, or inspect its shape. All the interesting
//! logic lives in the `fuzzylex` crate.

mod cli;

use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};

use clap::Parser;

use cli::display::{accent, dim, warn, Stopwatch};
use cli::{Cli, Commands, ModeArg};
use fuzzylex::{binary, FirstByteCache, Lexicon, LexiconConfig, Match, SearchMode, MAX_PATTERN_LEN};

fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli) {
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    match cli.command {
        Commands::Build {
            input,
            output,
            store,
            key,
        } => build(&input, &output, cli::config_from(store, key)),
        Commands::Search {
            query,
            index,
            distance,
            mode,
            limit,
            json,
        } => search(&query, &index, distance, mode, limit, json),
        Commands::Repl {
            words,
            index,
            distance,
        } => repl(words.as_deref(), index.as_deref(), distance),
        Commands::Inspect { index, json } => inspect(&index, json),
    }
}

fn load_words(path: &str, config: LexiconConfig) -> Result<Lexicon, Box<dyn Error>> {
    let reader = BufReader::new(File::open(path)?);
    let mut lexicon = Lexicon::with_config(config);
    for line in reader.lines() {
        let line = line?;
        let word = line.trim_end_matches(|c| c == '\r' || c == '\n');
        if !word.is_empty() {
            lexicon.insert(word);
        }
    }
    Ok(lexicon)
}

fn load_index(path: &str) -> Result<Lexicon, Box<dyn Error>> {
    let mut reader = BufReader::new(File::open(path)?);
    Ok(binary::decode(&mut reader, LexiconConfig::default())?)
}

fn build(input: &str, output: &str, config: LexiconConfig) -> Result<(), Box<dyn Error>> {
    let watch = Stopwatch::start();
    let mut lexicon = load_words(input, config)?;
    println!("{} read {}", watch.stamp(), input);
    let words = lexicon.optimize();
    println!("{} optimized {} words", watch.stamp(), words);
    let mut writer = BufWriter::new(File::create(output)?);
    binary::encode(&mut writer, &lexicon)?;
    writer.flush()?;
    println!("{} wrote {}", watch.stamp(), output);
    let stats = lexicon.stats();
    println!(
        "{} {} nodes, depth {}, widest node {}",
        watch.stamp(),
        stats.nodes,
        stats.max_depth,
        stats.max_arity
    );
    Ok(())
}

fn clamp_notice(query: &str, distance: usize) {
    if !query.is_empty() && distance >= query.len() {
        eprintln!(
            "{}",
            warn(&format!(
                "note: distance {} clamped to {} (a distance >= the query length matches everything)",
                distance,
                query.len() - 1
            ))
        );
    }
}

fn search(
    query: &str,
    index: &str,
    distance: usize,
    mode: ModeArg,
    limit: usize,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let lexicon = load_index(index)?;
    clamp_notice(query, distance);
    let matches = lexicon.search_fuzzy(query, distance, mode.to_mode())?;
    if json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
        return Ok(());
    }
    print_matches(&matches, limit);
    Ok(())
}

fn print_matches(matches: &[Match], limit: usize) {
    println!("{}", dim(&format!("#{}", matches.len())));
    for m in matches.iter().take(limit) {
        println!("{} {}", dim(&format!("${}", m.distance)), accent(&m.word));
    }
    if matches.len() > limit {
        println!("{}", dim("..."));
    }
}

fn repl(
    words: Option<&str>,
    index: Option<&str>,
    mut distance: usize,
) -> Result<(), Box<dyn Error>> {
    let watch = Stopwatch::start();
    let lexicon = match (words, index) {
        (Some(path), _) => {
            let mut lexicon = load_words(path, LexiconConfig::default())?;
            println!("{} read {}", watch.stamp(), path);
            let count = lexicon.optimize();
            println!("{} optimized {} words", watch.stamp(), count);
            lexicon
        }
        (None, Some(path)) => {
            let lexicon = load_index(path)?;
            println!("{} loaded {}", watch.stamp(), path);
            lexicon
        }
        (None, None) => return Err("repl needs --words or --index".into()),
    };
    let mut exact = FirstByteCache::new(&lexicon);
    let mut mode = SearchMode::NearestUnique;
    let mut shown = 10usize;
    let interactive = atty::is(atty::Stream::Stdin);
    if interactive {
        println!(
            "{}",
            dim("queries as-is; $N sets distance, ^N sets mode (0 all, 1 nearest, 2 unique), #N caps output")
        );
    }
    let stdin = io::stdin();
    loop {
        if interactive {
            print!("> ");
            io::stdout().flush()?;
        }
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let query = line.trim_end_matches(|c| c == '\r' || c == '\n');
        if query.is_empty() {
            continue;
        }
        // single-character controls keep the loop free of argument parsing
        if let Some(rest) = query.strip_prefix('$') {
            distance = rest.trim().parse().unwrap_or(distance);
            continue;
        }
        if let Some(rest) = query.strip_prefix('^') {
            mode = match rest.trim() {
                "0" => SearchMode::All,
                "1" => SearchMode::Nearest,
                "2" => SearchMode::NearestUnique,
                _ => mode,
            };
            continue;
        }
        if let Some(rest) = query.strip_prefix('#') {
            shown = rest.trim().parse().unwrap_or(shown);
            continue;
        }
        if query.len() > MAX_PATTERN_LEN {
            println!("{}", warn("query too long for the automaton"));
            continue;
        }
        let watch = Stopwatch::start();
        if exact.search(query) {
            println!("{} {} {}", watch.stamp(), accent("!"), query);
            continue;
        }
        println!("{} {} {}", watch.stamp(), dim("?"), query);
        clamp_notice(query, distance);
        let matches = lexicon.search_fuzzy(query, distance, mode)?;
        print_matches(&matches, shown);
    }
    Ok(())
}

fn inspect(index: &str, json: bool) -> Result<(), Box<dyn Error>> {
    let lexicon = load_index(index)?;
    let stats = lexicon.stats();
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }
    println!("nodes      {}", stats.nodes);
    println!("words      {}", stats.words);
    println!("text bytes {}", stats.text_bytes);
    println!("max depth  {}", stats.max_depth);
    println!("max arity  {}", stats.max_arity);
    Ok(())
}
