//! Mildew parsing infrastructure.
//!
//! - [`lexer`] — hand-written scanner producing a [`lexer::Token`] stream.
//! - [`ast`] — expression/statement node definitions and visitor traits.
//! - [`parser`] — Pratt expression parser fused with a recursive-descent
//!   statement parser.
//! - [`regex`] — regex-literal extraction and validation helpers.

/// Expression/statement node definitions and visitor traits.
pub mod ast;
/// Hand-written scanner producing the token stream.
pub mod lexer;
/// Pratt expression parser fused with a recursive-descent statement parser.
#[allow(clippy::module_inception)]
pub mod parser;
/// Regex-literal extraction and validation helpers.
pub mod regex;
