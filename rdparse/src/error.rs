//! Errors returned by generated lexers and parsers.
//!
//! A generated parser never recovers: the first failure is returned to the
//! caller unchanged, wrapped in a [`ParseError`].
//!
//! # Examples
//!
//! ```rust
//! # use rdparse::{ParseError, SyntaxError, TokenData};
//! let err: ParseError = SyntaxError::UnexpectedToken {
//!     expected: vec!["NUM".into()],
//!     found: TokenData::end(3),
//! }
//! .into();
//! assert_eq!(err.to_string(), "expected NUM but found end of input");
//! ```

use crate::TokenData;
use thiserror::Error;

/// Input remaining after skip stripping that no token pattern matches.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unmatched data in input at offset {offset}: {remainder:?}")]
pub struct LexicalError {
    /// Byte offset of the unmatched remainder.
    pub offset: usize,
    /// The unmatched remainder of the input.
    pub remainder: String,
}

/// The current token does not fit the grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    /// The current token is not in the expected lookahead set of the active rule.
    #[error("expected {} but found {found}", .expected.join(", "))]
    UnexpectedToken {
        /// Token names that would have been accepted, in declaration order.
        expected: Vec<String>,
        /// The token actually found.
        found: TokenData,
    },

    /// The start rule completed but input remains.
    #[error("expected end of input but found {found}")]
    TrailingInput {
        /// The first token after the start rule's derivation.
        found: TokenData,
    },
}

/// Error type returned by generated parsers.
///
/// Lexical and syntax errors convert with `?`; failures raised by semantic
/// action code are wrapped with [`ParseError::action`].
#[derive(Debug, Error)]
pub enum ParseError {
    /// The lexer could not produce the next token.
    #[error(transparent)]
    Lexical(#[from] LexicalError),

    /// The parser rejected the token stream.
    #[error(transparent)]
    Syntax(#[from] SyntaxError),

    /// A semantic action failed.
    #[error("action failed: {0}")]
    Action(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl ParseError {
    /// Wraps an error raised inside semantic action code.
    ///
    /// Intended for `map_err`: `n.text.parse::<i64>().map_err(ParseError::action)?`.
    pub fn action<E>(err: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        ParseError::Action(err.into())
    }

    /// Returns the lexical error, if this is one.
    pub fn as_lexical(&self) -> Option<&LexicalError> {
        match self {
            ParseError::Lexical(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the syntax error, if this is one.
    pub fn as_syntax(&self) -> Option<&SyntaxError> {
        match self {
            ParseError::Syntax(err) => Some(err),
            _ => None,
        }
    }
}
