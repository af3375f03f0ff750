//! Released under the terms of the GNU Lesser General Public License, version 3.0
//! or (at your option) any later version (LGPL-3.0-or-later).
//!
//! Runtime support for parsers produced by `rdparse-gen`.
//!
//! Generated lexers and parsers are thin, grammar-specific wrappers; the
//! shared pieces live here:
//!  * [`Tokenizer`]: the anchored, declaration-ordered matching engine that
//!    every generated lexer drives,
//!  * [`TokenData`]: the matched text and rule name carried by each token,
//!  * [`LexicalError`], [`SyntaxError`] and [`ParseError`]: the errors a
//!    generated lexer or parser can return.
//!
//! The [`regex`] and [`log`] crates are re-exported so that generated code
//! only needs a dependency on `rdparse`.

mod error;
mod lexer;
mod token;

pub use crate::error::{LexicalError, ParseError, SyntaxError};
pub use crate::lexer::{Tokenizer, TokenizerStats};
pub use crate::token::{END, TokenData};

pub use log;
pub use regex;
