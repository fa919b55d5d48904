//! `mdw` — Mildew interactive shell.
//!
//! Reads lines from standard input, supports a backslash-at-end-of-line
//! continuation, terminates on empty input or the literal `#exit`, and
//! routes each accumulated program through the front-end driver.  Exits
//! with code 0 in all non-fatal cases.

use std::io::{self, BufRead, Write};

use mildew_core::interpreter::Interpreter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut interpreter = Interpreter::new();
    let mut accumulated = String::new();

    loop {
        let prompt = if accumulated.is_empty() {
            "mildew> "
        } else {
            "....... "
        };
        print!("{prompt}");
        let _ = io::stdout().flush();

        let Some(Ok(line)) = lines.next() else {
            break;
        };
        let line = line.trim_end();
        if let Some(stripped) = line.strip_suffix('\\') {
            accumulated.push_str(stripped);
            accumulated.push('\n');
            continue;
        }
        accumulated.push_str(line);

        if accumulated.is_empty() || accumulated == "#exit" {
            break;
        }

        interpreter.evaluate(&accumulated, "<repl>");
        for error in interpreter.errors() {
            eprintln!("{error}");
        }
        accumulated.clear();
    }
}
