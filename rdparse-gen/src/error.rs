//! Grammar construction errors.
//!
//! Every variant is fatal to a generation run: the pipeline stops at the
//! first one, before any artifact is written.
use std::fmt;
use thiserror::Error;

/// Namespace a symbol reference was resolved in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolKind {
    Terminal,
    NonTerminal,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolKind::Terminal => write!(f, "terminal"),
            SymbolKind::NonTerminal => write!(f, "non-terminal"),
        }
    }
}

/// Reasons a grammar description is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    /// Two token rules share a name.
    #[error("duplicate token rule {name:?}")]
    DuplicateTokenRule { name: String },

    /// A token is listed twice in the skip list.
    #[error("duplicate token {name:?} in skip list")]
    DuplicateSkip { name: String },

    /// The skip list names a token that has no rule.
    #[error("skip list names unknown token rule {name:?}")]
    UnknownSkip { name: String },

    /// No parser rule exists for the start symbol.
    #[error("no rule for start non-terminal {name:?}")]
    UnknownStart { name: String },

    /// An atom references a name that does not resolve in its namespace.
    #[error("rule {rule:?} references unknown {kind} {name:?}")]
    UnknownSymbol {
        rule: String,
        name: String,
        kind: SymbolKind,
    },

    /// Two alternatives of a rule cannot be told apart with one token of lookahead.
    #[error(
        "grammar is not LL(1): alternatives {first} and {second} of rule {rule:?} conflict on {}",
        .tokens.join(", ")
    )]
    NotLL1 {
        rule: String,
        first: usize,
        second: usize,
        tokens: Vec<String>,
    },

    /// Two parser rules share a name.
    #[error("duplicate parser rule {name:?}")]
    DuplicateParserRule { name: String },

    /// A token rule uses the name reserved for the end-of-input kind.
    #[error("token rule name {name:?} is reserved for end of input")]
    ReservedTokenName { name: String },

    /// A terminal atom references a skipped token, which the lexer never produces.
    #[error("rule {rule:?} references skipped token {name:?}")]
    SkippedTerminal { rule: String, name: String },

    /// A token pattern is not a valid regular expression.
    #[error("invalid pattern for token {name:?}: {message}")]
    InvalidPattern { name: String, message: String },
}
