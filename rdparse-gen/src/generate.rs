//! The generation pipeline: grammar file in, three Rust source files out.
use crate::analysis::Analysis;
use crate::grammar::Grammar;
use crate::input::parse_grammar;
use crate::lexgen::{write_lexer, write_tokens};
use crate::naming::Names;
use crate::pargen::write_parser;
use anyhow::{Context, Result};
use std::path::Path;

/// A rendered output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub contents: String,
}

/// Renders the tokens, lexer and parser artifacts of an analyzed grammar.
pub fn render_grammar(
    grammar: &Grammar,
    analysis: &Analysis,
    names: &Names,
    debug: bool,
) -> Result<Vec<Artifact>> {
    let mut tokens: Vec<u8> = Vec::new();
    write_tokens(&mut tokens, grammar, names)?;
    let mut lexer: Vec<u8> = Vec::new();
    write_lexer(&mut lexer, grammar, names)?;
    let mut parser: Vec<u8> = Vec::new();
    write_parser(&mut parser, grammar, analysis, names, debug)?;

    [
        (names.tokens_file(), tokens),
        (names.lexer_file(), lexer),
        (names.parser_file(), parser),
    ]
    .into_iter()
    .map(|(file_name, bytes)| {
        Ok(Artifact {
            contents: String::from_utf8(bytes)
                .with_context(|| format!("generated {} is not UTF-8", file_name))?,
            file_name,
        })
    })
    .collect()
}

/// Parses, validates and analyzes `source`, then renders its artifacts.
///
/// Nothing is returned unless every stage succeeds.
pub fn render(source: &str, name: &str, debug: bool) -> Result<Vec<Artifact>> {
    let names = Names::new(name)?;
    let grammar = parse_grammar(source)?;
    let analysis = Analysis::new(&grammar)?;
    render_grammar(&grammar, &analysis, &names, debug)
}

/// Generates `<name>_tokens.rs`, `<name>_lexer.rs` and `<name>_parser.rs` in
/// `output_dir` from the grammar description at `grammar_path`.
///
/// Intended for `build.rs`:
///
/// ```no_run
/// let out_dir = std::env::var("OUT_DIR").unwrap();
/// rdparse_gen::generate("grammars/calc.rdg", &out_dir, "calc", false).unwrap();
/// ```
pub fn generate<P: AsRef<Path>, Q: AsRef<Path>>(
    grammar_path: P,
    output_dir: Q,
    name: &str,
    debug: bool,
) -> Result<()> {
    let grammar_path = grammar_path.as_ref();
    let output_dir = output_dir.as_ref();
    let source = std::fs::read_to_string(grammar_path)
        .with_context(|| format!("cannot read grammar {}", grammar_path.display()))?;
    log::debug!("loaded grammar {} ({} bytes)", grammar_path.display(), source.len());

    let artifacts = render(&source, name, debug)
        .with_context(|| format!("cannot generate from {}", grammar_path.display()))?;

    std::fs::create_dir_all(output_dir)
        .with_context(|| format!("cannot create {}", output_dir.display()))?;
    for artifact in &artifacts {
        let path = output_dir.join(&artifact.file_name);
        std::fs::write(&path, &artifact.contents)
            .with_context(|| format!("cannot write {}", path.display()))?;
        log::debug!("wrote {} ({} bytes)", path.display(), artifact.contents.len());
    }
    Ok(())
}
