//! # Calculator Error Type
//!
//! [`CalcError`] is the single error surface of [`crate::eval`] and friends.
//! Lexical, syntax and action failures all arrive as a [`ParseError`]; an
//! arithmetic failure raised by an action can be recovered with
//! [`CalcError::arithmetic`].
use crate::arith::ArithmeticError;
use rdparse::{LexicalError, ParseError, SyntaxError};
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CalcError {
    /// A token pattern of the generated lexer failed to compile.
    #[error("invalid token pattern: {0}")]
    Pattern(#[from] rdparse::regex::Error),

    /// Lexing, parsing or a semantic action failed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The input file could not be read.
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CalcError {
    pub fn lexical(&self) -> Option<&LexicalError> {
        match self {
            CalcError::Parse(err) => err.as_lexical(),
            _ => None,
        }
    }

    pub fn syntax(&self) -> Option<&SyntaxError> {
        match self {
            CalcError::Parse(err) => err.as_syntax(),
            _ => None,
        }
    }

    /// The arithmetic error raised by a semantic action, if any.
    pub fn arithmetic(&self) -> Option<&ArithmeticError> {
        match self {
            CalcError::Parse(ParseError::Action(err)) => err.downcast_ref::<ArithmeticError>(),
            _ => None,
        }
    }
}
