//! Released under the terms of the GNU Lesser General Public License, version 3.0
//! or (at your option) any later version (LGPL-3.0-or-later).
//!
//! LL(1) grammar analysis and recursive-descent lexer/parser generation.
//!
//! Given a grammar description (token rules, skip list, start symbol and
//! parser rules with embedded action code), `rdparse-gen`:
//!  * validates it ([`Grammar::new`]),
//!  * computes FIRST, FOLLOW and per-alternative marker sets and rejects
//!    grammars that are not LL(1) ([`Analysis::new`]),
//!  * emits three Rust source files: token kinds, a lexer, and a
//!    recursive-descent parser ([`generate`]).
//!
//! The generated code depends only on the `rdparse` runtime crate. Use
//! [`generate`] from a `build.rs` script and `include!` the results:
//!
//! ```ignore
//! pub mod calc_tokens {
//!     include!(concat!(env!("OUT_DIR"), "/calc_tokens.rs"));
//! }
//! pub mod calc_lexer {
//!     include!(concat!(env!("OUT_DIR"), "/calc_lexer.rs"));
//! }
//! pub mod calc_parser {
//!     include!(concat!(env!("OUT_DIR"), "/calc_parser.rs"));
//! }
//! ```

pub mod analysis;
pub mod error;
mod generate;
pub mod grammar;
pub mod input;
mod lexgen;
mod naming;
mod pargen;
mod symtab;
mod validate;

pub use analysis::Analysis;
pub use error::{GrammarError, SymbolKind};
pub use generate::{Artifact, generate, render, render_grammar};
pub use grammar::Grammar;
pub use input::parse_grammar;
pub use naming::Names;
