//! Token payload shared by every generated lexer.
//!
//! A generated lexer pairs its own token-kind enum with a [`TokenData`]: the
//! name of the rule that matched, the matched text, and the byte offset the
//! match started at. The payload is what semantic actions see when they bind
//! a terminal (`n=NUM { ... n.text ... }`).
use smartstring::alias::String;
use std::fmt;

/// Name carried by the end-of-input token.
pub const END: &str = "_END";

/// Data carried by a lexical token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenData {
    /// Name of the token rule that produced this token (`"_END"` at end of input).
    pub name: String,
    /// The matched input text; empty at end of input.
    pub text: String,
    /// Byte offset of the first matched byte in the input.
    pub offset: usize,
}

impl TokenData {
    /// Creates token data for a match of rule `name`.
    pub fn new(name: &str, text: &str, offset: usize) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            offset,
        }
    }

    /// Creates the data of the end-of-input token.
    pub fn end(offset: usize) -> Self {
        Self::new(END, "", offset)
    }

    /// Returns `true` for the end-of-input token.
    #[inline]
    pub fn is_end(&self) -> bool {
        self.name.as_str() == END
    }
}

impl fmt::Display for TokenData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_end() {
            write!(f, "end of input")
        } else {
            write!(f, "{}({:?})", self.name, self.text.as_str())
        }
    }
}
