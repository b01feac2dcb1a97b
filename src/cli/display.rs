// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Terminal output helpers for the fuzzylex CLI.
//!
//! Color when it makes sense, plain text when it does not: `NO_COLOR` wins,
//! then non-TTY detection for pipelines. The stopwatch prefixes REPL lines
//! with elapsed time the way long-running index builds deserve.

use std::sync::OnceLock;
use std::time::Instant;

static COLOR: OnceLock<bool> = OnceLock::new();

/// Should output carry ANSI colors?
pub fn color_enabled() -> bool {
    *COLOR.get_or_init(|| {
        if std::env::var_os("NO_COLOR").is_some() {
            return false;
        }
        atty::is(atty::Stream::Stdout)
    })
}

fn paint(text: &str, code: &str) -> String {
    if color_enabled() {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

/// Highlight a result or a hit.
pub fn accent(text: &str) -> String {
    paint(text, "1;36")
}

/// De-emphasize metadata.
pub fn dim(text: &str) -> String {
    paint(text, "2")
}

/// Flag a warning without resorting to stderr formatting.
pub fn warn(text: &str) -> String {
    paint(text, "33")
}

/// Wall-clock timer for progress lines.
pub struct Stopwatch {
    started: Instant,
}

impl Stopwatch {
    pub fn start() -> Self {
        Stopwatch {
            started: Instant::now(),
        }
    }

    /// Elapsed time formatted as a fixed-width prefix, e.g. `[  12.3ms]`.
    pub fn stamp(&self) -> String {
        let elapsed = self.started.elapsed();
        let ms = elapsed.as_secs_f64() * 1e3;
        if ms < 1000.0 {
            dim(&format!("[{:>7.1}ms]", ms))
        } else {
            dim(&format!("[{:>8.2}s]", ms / 1e3))
        }
    }
}
