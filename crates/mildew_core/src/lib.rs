//! `mildew_core` — the front-end of the Mildew scripting language: a
//! dynamically-typed, JavaScript-flavored language.
//!
//! Given program source text this crate produces a token stream and a
//! syntactically structured program tree for later semantic analysis,
//! compilation, or direct interpretation, and defines the dynamic value
//! model those stages consume.
//!
//! # Crate layout
//!
//! - [`error`] — error types and the [`error::MildewResult`] alias.
//! - [`parser`] — lexer, AST, parser, and regex-literal helpers.
//! - [`values`] — the [`values::any::ScriptAny`] dynamic value and its
//!   referents (object, array, function, string, environment).
//! - [`interpreter`] — the per-program driver facade used by the shell.
//!
//! # Example
//!
//! ```
//! let (tokens, errors) = mildew_core::tokenize("let x = 1 + 2 * 3;");
//! assert!(errors.is_empty());
//! let program = mildew_core::parse(tokens).unwrap();
//! assert!(matches!(program, mildew_core::parser::ast::Stmt::Block(_)));
//! ```

/// Error types and the `MildewResult` alias.
pub mod error;
/// The per-program driver facade.
pub mod interpreter;
/// Lexer, AST, parser, and regex-literal helpers.
pub mod parser;
/// The dynamic value model and its referents.
pub mod values;

use error::MildewResult;
use parser::ast::Stmt;
use parser::lexer::{Lexer, Token};
use parser::parser::Parser;

/// Tokenize `text`, returning the token vector (always EOF-terminated) and
/// the accumulated lexical diagnostics.
pub fn tokenize(text: &str) -> (Vec<Token>, Vec<String>) {
    let mut lexer = Lexer::new(text);
    let tokens = lexer.tokenize();
    let errors = lexer.errors().to_vec();
    (tokens, errors)
}

/// Parse a token vector into the program block.
///
/// # Errors
///
/// Returns [`error::MildewError::Compile`] on the first structural failure;
/// no partial tree is produced.
pub fn parse(tokens: Vec<Token>) -> MildewResult<Stmt> {
    Parser::new(tokens).parse_program()
}
