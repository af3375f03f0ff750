//! Emits the token-kind and lexer artifacts of a grammar.
//!
//! The generated lexer is a thin wrapper over `rdparse::Tokenizer`: it
//! passes the skip patterns (skip-list order) and the token rules
//! (declaration order) to the engine and converts each match into the
//! grammar's token type.
//!
//! All paths in generated code are fully qualified and no `use` items are
//! emitted, so the grammar header can be copied into every artifact without
//! clashing with generated names.
use crate::grammar::{END, Grammar};
use crate::naming::Names;
use std::io::{self, Write};

/// Formats `s` as a raw string literal with as few `#` as needed.
pub(crate) fn raw_str(s: &str) -> String {
    let mut n = 0;
    while s.contains(&format!("\"{}", "#".repeat(n))) {
        n += 1;
    }
    let hashes = "#".repeat(n);
    format!("r{hashes}\"{s}\"{hashes}")
}

/// Banner and grammar header opening every artifact.
pub(crate) fn write_prologue<W: Write>(
    out: &mut W,
    grammar: &Grammar,
    names: &Names,
    what: &str,
) -> io::Result<()> {
    writeln!(out, "/*")?;
    writeln!(out, "Produced by rdgen: {} for grammar {}.", what, names.prefix())?;
    writeln!(out, "Do not edit; regenerate from the grammar instead.")?;
    writeln!(out, "*/")?;
    writeln!(out)?;
    if !grammar.header().is_empty() {
        writeln!(out, "{}", grammar.header())?;
        writeln!(out)?;
    }
    Ok(())
}

/// Writes `<name>_tokens.rs`: the token-kind enum and the token value type.
pub fn write_tokens<W: Write>(out: &mut W, grammar: &Grammar, names: &Names) -> io::Result<()> {
    let kinds = names.tokens_enum();
    let token = names.token_struct();
    let lexemes: Vec<&str> = grammar.lexemes().map(|t| t.name()).chain([END]).collect();

    write_prologue(out, grammar, names, "token kinds")?;

    writeln!(out, "/// Token kinds in declaration order; `{}` marks end of input.", END)?;
    writeln!(out, "#[allow(non_camel_case_types)]")?;
    writeln!(out, "#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]")?;
    writeln!(out, "pub enum {} {{", kinds)?;
    for name in &lexemes {
        writeln!(out, "    {},", name)?;
    }
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(out, "impl {} {{", kinds)?;
    writeln!(out, "    pub const ALL: [{}; {}] = [", kinds, lexemes.len())?;
    for name in &lexemes {
        writeln!(out, "        {}::{},", kinds, name)?;
    }
    writeln!(out, "    ];")?;
    writeln!(out)?;
    writeln!(out, "    /// Name of the token rule, as written in the grammar.")?;
    writeln!(out, "    pub fn name(self) -> &'static str {{")?;
    writeln!(out, "        match self {{")?;
    for name in &lexemes {
        writeln!(out, "            {}::{} => {:?},", kinds, name, name)?;
    }
    writeln!(out, "        }}")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(out, "impl ::std::fmt::Display for {} {{", kinds)?;
    writeln!(
        out,
        "    fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {{"
    )?;
    writeln!(out, "        f.write_str(self.name())")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(out, "/// A token: its kind plus the matched text, rule name and offset.")?;
    writeln!(out, "#[derive(Debug, Clone, PartialEq, Eq)]")?;
    writeln!(out, "pub struct {} {{", token)?;
    writeln!(out, "    pub kind: {},", kinds)?;
    writeln!(out, "    pub data: ::rdparse::TokenData,")?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(out, "impl ::std::fmt::Display for {} {{", token)?;
    writeln!(
        out,
        "    fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {{"
    )?;
    writeln!(out, "        ::std::fmt::Display::fmt(&self.data, f)")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;
    Ok(())
}

/// Writes `<name>_lexer.rs`: the lexer wrapping the shared tokenizer engine.
pub fn write_lexer<W: Write>(out: &mut W, grammar: &Grammar, names: &Names) -> io::Result<()> {
    let kinds = format!("super::{}::{}", names.tokens_module(), names.tokens_enum());
    let token = format!("super::{}::{}", names.tokens_module(), names.token_struct());
    let lexer = names.lexer_struct();
    let skips: Vec<_> = grammar.skip_rules().collect();
    let rules: Vec<_> = grammar.lexemes().collect();

    write_prologue(out, grammar, names, "lexer")?;

    writeln!(out, "/// Splits input text into `{}` values.", names.token_struct())?;
    writeln!(out, "#[derive(Debug)]")?;
    writeln!(out, "pub struct {} {{", lexer)?;
    writeln!(out, "    tokenizer: ::rdparse::Tokenizer<{}>,", kinds)?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(out, "impl {} {{", lexer)?;
    writeln!(out, "    /// Skip patterns in skip-list order.")?;
    writeln!(out, "    pub const SKIPS: [&'static str; {}] = [", skips.len())?;
    for rule in &skips {
        writeln!(out, "        {}, // {}", raw_str(rule.pattern()), rule.name())?;
    }
    writeln!(out, "    ];")?;
    writeln!(out)?;
    writeln!(out, "    /// Token rules in declaration order.")?;
    writeln!(
        out,
        "    pub const RULES: [({}, &'static str, &'static str); {}] = [",
        kinds,
        rules.len()
    )?;
    for rule in &rules {
        writeln!(
            out,
            "        ({}::{}, {:?}, {}),",
            kinds,
            rule.name(),
            rule.name(),
            raw_str(rule.pattern())
        )?;
    }
    writeln!(out, "    ];")?;
    writeln!(out)?;

    writeln!(out, "    /// Creates a lexer over `input`.")?;
    writeln!(
        out,
        "    pub fn new(input: impl ::std::convert::Into<::std::string::String>) -> ::std::result::Result<Self, ::rdparse::regex::Error> {{"
    )?;
    writeln!(
        out,
        "        let tokenizer = ::rdparse::Tokenizer::new(input, &Self::SKIPS, &Self::RULES, {}::{})?;",
        kinds, END
    )?;
    writeln!(out, "        ::std::result::Result::Ok(Self {{ tokenizer }})")?;
    writeln!(out, "    }}")?;
    writeln!(out)?;

    writeln!(
        out,
        "    /// Returns the next token; `{}` once the input is exhausted, on every call.",
        END
    )?;
    writeln!(
        out,
        "    pub fn next_token(&mut self) -> ::std::result::Result<{}, ::rdparse::LexicalError> {{",
        token
    )?;
    writeln!(out, "        let (kind, data) = self.tokenizer.next_token()?;")?;
    writeln!(out, "        ::std::result::Result::Ok({} {{ kind, data }})", token)?;
    writeln!(out, "    }}")?;
    writeln!(out)?;

    writeln!(out, "    /// Byte offset of the first unconsumed byte.")?;
    writeln!(out, "    pub fn offset(&self) -> usize {{")?;
    writeln!(out, "        self.tokenizer.offset()")?;
    writeln!(out, "    }}")?;
    writeln!(out)?;
    writeln!(out, "    pub fn remainder(&self) -> &str {{")?;
    writeln!(out, "        self.tokenizer.remainder()")?;
    writeln!(out, "    }}")?;
    writeln!(out)?;
    writeln!(out, "    pub fn stats(&self) -> ::rdparse::TokenizerStats {{")?;
    writeln!(out, "        self.tokenizer.stats()")?;
    writeln!(out, "    }}")?;
    writeln!(out, "}}")?;
    Ok(())
}
