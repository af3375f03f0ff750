//! Released under the terms of the GNU Lesser General Public License, version 3.0
//! or (at your option) any later version (LGPL-3.0-or-later).
//!
//! # rdparse-calc
//!
//! A small demonstration crate for **rdparse-gen**: its `build.rs` generates
//! lexers and recursive-descent parsers from the grammar descriptions in
//! `grammars/`, and this crate compiles and drives them.
//!
//! - [`sum`]: sums of integers; the parser returns the operands.
//! - [`calc`]: an integer calculator with `+ - * /`, parentheses, unary
//!   minus and `#` comments; semantic actions evaluate as they parse.
//! - [`tree`]: parenthesized binary trees such as `(a (b a))`.
//!
//! ## Example
//!
//! ```rust
//! assert_eq!(rdparse_calc::eval("1 + 2 * 3").unwrap(), 7);
//! assert_eq!(rdparse_calc::eval("(1 + 2) * -3 # comment").unwrap(), -9);
//! assert!(rdparse_calc::eval("1 / 0").unwrap_err().arithmetic().is_some());
//! ```
use std::path::Path;

pub mod arith;
mod error;
mod tree_model;

pub use error::CalcError;
pub use tree_model::Tree;

/// Generated from `grammars/sum.rdg`.
pub mod sum {
    #[allow(unused_imports)]
    pub mod sum_tokens {
        include!(concat!(env!("OUT_DIR"), "/sum_tokens.rs"));
    }

    #[allow(unused_imports)]
    pub mod sum_lexer {
        include!(concat!(env!("OUT_DIR"), "/sum_lexer.rs"));
    }

    #[allow(unused_imports)]
    pub mod sum_parser {
        include!(concat!(env!("OUT_DIR"), "/sum_parser.rs"));
    }

    pub use sum_lexer::SumLexer;
    pub use sum_parser::SumParser;
    pub use sum_tokens::{SumToken, SumTokens};
}

/// Generated from `grammars/calc.rdg`.
pub mod calc {
    #[allow(unused_imports)]
    pub mod calc_tokens {
        include!(concat!(env!("OUT_DIR"), "/calc_tokens.rs"));
    }

    #[allow(unused_imports)]
    pub mod calc_lexer {
        include!(concat!(env!("OUT_DIR"), "/calc_lexer.rs"));
    }

    #[allow(unused_imports)]
    pub mod calc_parser {
        include!(concat!(env!("OUT_DIR"), "/calc_parser.rs"));
    }

    pub use calc_lexer::CalcLexer;
    pub use calc_parser::CalcParser;
    pub use calc_tokens::{CalcToken, CalcTokens};
}

/// Generated from `grammars/tree.rdg`.
pub mod tree {
    #[allow(unused_imports)]
    pub mod tree_tokens {
        include!(concat!(env!("OUT_DIR"), "/tree_tokens.rs"));
    }

    #[allow(unused_imports)]
    pub mod tree_lexer {
        include!(concat!(env!("OUT_DIR"), "/tree_lexer.rs"));
    }

    #[allow(unused_imports)]
    pub mod tree_parser {
        include!(concat!(env!("OUT_DIR"), "/tree_parser.rs"));
    }

    pub use tree_lexer::TreeLexer;
    pub use tree_parser::TreeParser;
    pub use tree_tokens::{TreeToken, TreeTokens};
}

/// Evaluates a calculator expression.
pub fn eval(source: &str) -> Result<i64, CalcError> {
    let lexer = calc::CalcLexer::new(source)?;
    let mut parser = calc::CalcParser::new(lexer);
    let value = parser.parse()?;
    log::debug!("eval {:?} = {}", source, value);
    Ok(value)
}

/// Evaluates the calculator expression stored in a file.
pub fn eval_file<P: AsRef<Path>>(path: P) -> Result<i64, CalcError> {
    let path = path.as_ref();
    let source = std::fs::read_to_string(path).map_err(|source| CalcError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    eval(&source)
}

/// Parses a sum such as `1 + 2 + 3` and returns its operands.
pub fn sum_operands(source: &str) -> Result<Vec<i64>, CalcError> {
    let lexer = sum::SumLexer::new(source)?;
    let mut parser = sum::SumParser::new(lexer);
    Ok(parser.parse()?)
}

/// Parses a binary tree such as `(a (b a))`.
pub fn parse_tree(source: &str) -> Result<Tree, CalcError> {
    let lexer = tree::TreeLexer::new(source)?;
    let mut parser = tree::TreeParser::new(lexer);
    Ok(parser.parse()?)
}
