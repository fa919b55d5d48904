//! The driver facade routing source text through the front-end pipeline.
//!
//! [`Interpreter::evaluate`] is what the shell calls per program: it lexes,
//! reports accumulated lexical diagnostics (skipping the parse when any are
//! present), then parses and records at most one compile error.  Execution
//! belongs to a later stage; the result is always `undefined` for now.

use tracing::debug;

use crate::parser::lexer::Lexer;
use crate::parser::parser::Parser;
use crate::values::any::ScriptAny;

/// Front-end driver with error accumulation.
#[derive(Debug, Default)]
pub struct Interpreter {
    errors: Vec<String>,
}

impl Interpreter {
    /// Create a fresh driver.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` when the last [`Interpreter::evaluate`] call recorded
    /// errors.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// The errors recorded by the last [`Interpreter::evaluate`] call.
    pub fn errors(&self) -> &[String] {
        &self.errors
    }

    /// Run `code` (named `name` for diagnostics) through the lexer and
    /// parser.  Lexical errors are reported first and suppress the parse;
    /// a parse failure records a single compile error.
    pub fn evaluate(&mut self, code: &str, name: &str) -> ScriptAny {
        self.errors.clear();

        let mut lexer = Lexer::new(code);
        let tokens = lexer.tokenize();
        if lexer.has_errors() {
            self.errors.push(format!("Lexer errors in {name}:"));
            self.errors.extend(lexer.errors().iter().cloned());
            return ScriptAny::Undefined;
        }
        debug!(program = name, token_count = tokens.len(), "tokenized");

        let mut parser = Parser::new(tokens);
        match parser.parse_program() {
            Ok(program) => {
                debug!(program = name, rendering = %program, "parsed");
            }
            Err(error) => {
                self.errors.push(error.to_string());
            }
        }
        ScriptAny::Undefined
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
