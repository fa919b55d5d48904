//! Error types for the Mildew front-end.

use thiserror::Error;

/// All errors that can be produced by the Mildew front-end.
///
/// Lexical diagnostics are *not* represented here: the lexer accumulates them
/// as plain strings and keeps scanning (see
/// [`Lexer::errors`](crate::parser::lexer::Lexer::errors)).  A
/// [`MildewError::Compile`] aborts the parse at the first structural failure.
#[derive(Debug, Error)]
pub enum MildewError {
    /// A structural failure raised by the parser.  The message embeds the
    /// offending token and its source position.
    #[error("CompileError: {0}")]
    Compile(String),

    /// A declared but not yet implemented language feature was reached.
    /// Never raised by the completed front-end; reserved for downstream
    /// stages that grow behind this interface.
    #[error("UnimplementedError: this feature is unimplemented: {0}")]
    Unimplemented(String),
}

/// Convenient `Result` alias for fallible front-end operations.
pub type MildewResult<T> = Result<T, MildewError>;
