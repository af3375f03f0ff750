//! Emits the recursive-descent parser artifact of a grammar.
//!
//! One private method per parser rule. Each method matches on the kind of
//! the current token: every alternative gets an arm labelled with its marker
//! set, and the default arm fails with the union of all markers. Inside an
//! arm the init action comes first, then each atom in order.
//!
//! The return binding is declared without an initial value. A rule whose
//! actions can leave it unset on some path does not compile, which surfaces
//! the grammar bug at build time.
use crate::analysis::{Analysis, TokenSet};
use crate::grammar::{ActionCode, Alternative, AtomKind, END, Grammar, ParserRule};
use crate::lexgen::write_prologue;
use crate::naming::Names;
use std::io::{self, Write};

struct Emitter<'a> {
    grammar: &'a Grammar,
    analysis: &'a Analysis,
    kinds: String,
}

impl<'a> Emitter<'a> {
    fn pattern(&self, set: &TokenSet) -> String {
        self.analysis
            .token_names(set)
            .iter()
            .map(|name| format!("{}::{}", self.kinds, name))
            .collect::<Vec<_>>()
            .join(" | ")
    }

    fn expected(&self, set: &TokenSet) -> String {
        let names: Vec<String> = self
            .analysis
            .token_names(set)
            .iter()
            .map(|name| format!("{:?}", name))
            .collect();
        format!("&[{}]", names.join(", "))
    }

    fn rule_type(&self, name: &str) -> &str {
        self.grammar.rule(name).map(|r| r.returns().ty()).unwrap_or("()")
    }

    fn write_code<W: Write>(out: &mut W, code: Option<&ActionCode>, indent: &str) -> io::Result<()> {
        if let Some(code) = code {
            writeln!(out, "{}{}", indent, code.as_str())?;
        }
        Ok(())
    }

    fn write_rule<W: Write>(&self, out: &mut W, index: usize, rule: &ParserRule) -> io::Result<()> {
        let args: Vec<String> = rule
            .arguments()
            .iter()
            .map(|b| format!(", {}: {}", b.name(), b.ty()))
            .collect();
        let ret = rule.returns();

        writeln!(
            out,
            "    fn parse_{}(&mut self{}) -> ::std::result::Result<{}, ::rdparse::ParseError> {{",
            rule.name(),
            args.concat(),
            ret.ty()
        )?;
        writeln!(out, "        ::rdparse::log::trace!(\"enter {}: {{}}\", self.current);", rule.name())?;
        writeln!(out, "        let mut {}: {};", ret.name(), ret.ty())?;
        writeln!(out, "        match self.current.kind {{")?;

        for (alt_index, alt) in rule.alternatives().iter().enumerate() {
            let markers = self.analysis.markers(index, alt_index);
            if markers.is_empty() {
                continue;
            }
            writeln!(out, "            {} => {{", self.pattern(markers))?;
            Self::write_code(out, alt.init(), "                ")?;
            match alt {
                Alternative::Epsilon { code, .. } => {
                    Self::write_code(out, code.as_ref(), "                ")?;
                }
                Alternative::Sequence { atoms, .. } => {
                    for atom in atoms {
                        match atom.kind() {
                            AtomKind::Terminal => {
                                writeln!(
                                    out,
                                    "                if self.current.kind != {}::{} {{",
                                    self.kinds,
                                    atom.name()
                                )?;
                                writeln!(
                                    out,
                                    "                    return ::std::result::Result::Err(self.unexpected(&[{:?}]));",
                                    atom.name()
                                )?;
                                writeln!(out, "                }}")?;
                                writeln!(
                                    out,
                                    "                let {}: ::rdparse::TokenData = self.current.data.clone();",
                                    atom.binding()
                                )?;
                                Self::write_code(out, atom.action(), "                ")?;
                                writeln!(out, "                self.advance()?;")?;
                            }
                            AtomKind::NonTerminal { params } => {
                                writeln!(
                                    out,
                                    "                let {}: {} = self.parse_{}({})?;",
                                    atom.binding(),
                                    self.rule_type(atom.name()),
                                    atom.name(),
                                    params.join(", ")
                                )?;
                                Self::write_code(out, atom.action(), "                ")?;
                            }
                        }
                    }
                }
            }
            writeln!(out, "            }}")?;
        }

        writeln!(
            out,
            "            _ => return ::std::result::Result::Err(self.unexpected({})),",
            self.expected(&self.analysis.expected(index))
        )?;
        writeln!(out, "        }}")?;
        writeln!(out, "        ::std::result::Result::Ok({})", ret.name())?;
        writeln!(out, "    }}")?;
        Ok(())
    }
}

/// Writes `<name>_parser.rs`.
///
/// With `debug` set, the FIRST, FOLLOW and marker tables are written as a
/// comment block after the banner.
pub fn write_parser<W: Write>(
    out: &mut W,
    grammar: &Grammar,
    analysis: &Analysis,
    names: &Names,
    debug: bool,
) -> io::Result<()> {
    let kinds = format!("super::{}::{}", names.tokens_module(), names.tokens_enum());
    let token = format!("super::{}::{}", names.tokens_module(), names.token_struct());
    let lexer = format!("super::{}::{}", names.lexer_module(), names.lexer_struct());
    let parser = names.parser_struct();
    let start = grammar.start_rule();

    write_prologue(out, grammar, names, "parser")?;

    if debug {
        writeln!(out, "/*")?;
        analysis.write_sets(out, "")?;
        writeln!(out, "*/")?;
        writeln!(out)?;
    }

    writeln!(out, "/// Recursive-descent parser; the start rule is `{}`.", start.name())?;
    writeln!(out, "#[derive(Debug)]")?;
    writeln!(out, "pub struct {} {{", parser)?;
    writeln!(out, "    lexer: {},", lexer)?;
    writeln!(out, "    current: {},", token)?;
    writeln!(out, "}}")?;
    writeln!(out)?;

    writeln!(
        out,
        "#[allow(non_snake_case, unused_variables, unused_mut, unused_assignments, unreachable_patterns, unreachable_code, dead_code, clippy::all)]"
    )?;
    writeln!(out, "impl {} {{", parser)?;

    writeln!(out, "    pub fn new(lexer: {}) -> Self {{", lexer)?;
    writeln!(out, "        Self {{")?;
    writeln!(out, "            lexer,")?;
    writeln!(out, "            current: {} {{", token)?;
    writeln!(out, "                kind: {}::{},", kinds, END)?;
    writeln!(out, "                data: ::rdparse::TokenData::end(0),")?;
    writeln!(out, "            }},")?;
    writeln!(out, "        }}")?;
    writeln!(out, "    }}")?;
    writeln!(out)?;

    let params: Vec<String> = start
        .arguments()
        .iter()
        .map(|b| format!(", {}: {}", b.name(), b.ty()))
        .collect();
    let forwarded: Vec<&str> = start.arguments().iter().map(|b| b.name()).collect();
    writeln!(
        out,
        "    /// Parses the whole input as `{}` and returns its value.",
        start.name()
    )?;
    writeln!(
        out,
        "    pub fn parse(&mut self{}) -> ::std::result::Result<{}, ::rdparse::ParseError> {{",
        params.concat(),
        start.returns().ty()
    )?;
    writeln!(out, "        self.advance()?;")?;
    writeln!(
        out,
        "        let value = self.parse_{}({})?;",
        start.name(),
        forwarded.join(", ")
    )?;
    writeln!(out, "        if self.current.kind != {}::{} {{", kinds, END)?;
    writeln!(
        out,
        "            return ::std::result::Result::Err(::rdparse::SyntaxError::TrailingInput {{ found: self.current.data.clone() }}.into());"
    )?;
    writeln!(out, "        }}")?;
    writeln!(out, "        ::std::result::Result::Ok(value)")?;
    writeln!(out, "    }}")?;
    writeln!(out)?;

    writeln!(out, "    fn advance(&mut self) -> ::std::result::Result<(), ::rdparse::ParseError> {{")?;
    writeln!(out, "        self.current = self.lexer.next_token()?;")?;
    writeln!(out, "        ::std::result::Result::Ok(())")?;
    writeln!(out, "    }}")?;
    writeln!(out)?;

    writeln!(out, "    fn unexpected(&self, expected: &[&str]) -> ::rdparse::ParseError {{")?;
    writeln!(out, "        ::rdparse::SyntaxError::UnexpectedToken {{")?;
    writeln!(
        out,
        "            expected: expected.iter().map(|name| ::std::string::ToString::to_string(name)).collect(),"
    )?;
    writeln!(out, "            found: self.current.data.clone(),")?;
    writeln!(out, "        }}")?;
    writeln!(out, "        .into()")?;
    writeln!(out, "    }}")?;

    let emitter = Emitter {
        grammar,
        analysis,
        kinds,
    };
    for (index, rule) in grammar.parser_rules().iter().enumerate() {
        writeln!(out)?;
        emitter.write_rule(out, index, rule)?;
    }
    writeln!(out, "}}")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{Atom, Binding, TokenRule};

    /// expr -> n=NUM {..} t=tail[n] {res = t;}
    /// tail[acc] -> PLUS n=NUM t=tail[acc + n] {res = t;} | eps {res = acc;}
    fn sum_grammar() -> Grammar {
        Grammar::new(
            "use rdparse::ParseError;",
            vec![
                TokenRule::new("NUM", "[0-9]+"),
                TokenRule::new("PLUS", r"\+"),
                TokenRule::new("WS", r"\s+"),
            ],
            vec!["WS".into()],
            "expr",
            vec![
                ParserRule::new(
                    "expr",
                    vec![],
                    Binding::new("res", "i64"),
                    vec![Alternative::Sequence {
                        init: None,
                        atoms: vec![
                            Atom::terminal(
                                "n",
                                "NUM",
                                Some(ActionCode::new(
                                    "let v: i64 = n.text.parse().map_err(ParseError::action)?;",
                                )),
                            ),
                            Atom::non_terminal(
                                "t",
                                "tail",
                                vec!["v".into()],
                                Some(ActionCode::new("res = t;")),
                            ),
                        ],
                    }],
                ),
                ParserRule::new(
                    "tail",
                    vec![Binding::new("acc", "i64")],
                    Binding::new("res", "i64"),
                    vec![
                        Alternative::Sequence {
                            init: Some(ActionCode::new("let mut acc = acc;")),
                            atoms: vec![
                                Atom::terminal("_", "PLUS", None),
                                Atom::terminal(
                                    "n",
                                    "NUM",
                                    Some(ActionCode::new(
                                        "acc += n.text.parse::<i64>().map_err(ParseError::action)?;",
                                    )),
                                ),
                                Atom::non_terminal(
                                    "t",
                                    "tail",
                                    vec!["acc".into()],
                                    Some(ActionCode::new("res = t;")),
                                ),
                            ],
                        },
                        Alternative::Epsilon {
                            init: None,
                            code: Some(ActionCode::new("res = acc;")),
                        },
                    ],
                ),
            ],
        )
        .unwrap()
    }

    fn render(debug: bool) -> String {
        let _ = env_logger::builder().is_test(true).try_init();
        let grammar = sum_grammar();
        let analysis = Analysis::new(&grammar).unwrap();
        let mut out = Vec::new();
        write_parser(&mut out, &grammar, &analysis, &Names::new("sum").unwrap(), debug).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn entry_point_checks_end_of_input() {
        let text = render(false);
        assert!(text.contains("pub struct SumParser {\n    lexer: super::sum_lexer::SumLexer,\n    current: super::sum_tokens::SumToken,\n}"));
        assert!(text.contains(
            "    pub fn parse(&mut self) -> ::std::result::Result<i64, ::rdparse::ParseError> {\n        self.advance()?;\n        let value = self.parse_expr()?;\n        if self.current.kind != super::sum_tokens::SumTokens::_END {"
        ));
        assert!(text.contains("::rdparse::SyntaxError::TrailingInput"));
        assert!(!text.contains("FIRST("));
    }

    #[test]
    fn rule_arms_are_labelled_with_markers() {
        let text = render(false);
        assert!(text.contains(
            "    fn parse_tail(&mut self, acc: i64) -> ::std::result::Result<i64, ::rdparse::ParseError> {"
        ));
        assert!(text.contains("        let mut res: i64;\n        match self.current.kind {\n            super::sum_tokens::SumTokens::PLUS => {\n                let mut acc = acc;\n"));
        assert!(text.contains("            super::sum_tokens::SumTokens::_END => {\n                res = acc;\n            }\n"));
        assert!(text.contains(
            "            _ => return ::std::result::Result::Err(self.unexpected(&[\"PLUS\", \"_END\"])),"
        ));
        assert!(text.contains(
            "            _ => return ::std::result::Result::Err(self.unexpected(&[\"NUM\"])),"
        ));
    }

    #[test]
    fn atoms_bind_check_and_advance() {
        let text = render(false);
        let expected = "\
                if self.current.kind != super::sum_tokens::SumTokens::NUM {
                    return ::std::result::Result::Err(self.unexpected(&[\"NUM\"]));
                }
                let n: ::rdparse::TokenData = self.current.data.clone();
                let v: i64 = n.text.parse().map_err(ParseError::action)?;
                self.advance()?;
                let t: i64 = self.parse_tail(v)?;
                res = t;
";
        assert!(text.contains(expected), "{}", text);
        assert!(text.contains("let _: ::rdparse::TokenData = self.current.data.clone();"));
    }

    #[test]
    fn action_text_is_emitted_verbatim() {
        let grammar = Grammar::new(
            "",
            vec![TokenRule::new("A", "a")],
            vec![],
            "s",
            vec![ParserRule::new(
                "s",
                vec![],
                Binding::new("res", "u32"),
                vec![Alternative::Sequence {
                    init: Some(ActionCode::new("\t let mut n = 0;  ")),
                    atoms: vec![Atom::terminal(
                        "_",
                        "A",
                        Some(ActionCode::new("\n  n += 1;\n  res = n;\n")),
                    )],
                }],
            )],
        )
        .unwrap();
        let analysis = Analysis::new(&grammar).unwrap();
        let mut out = Vec::new();
        write_parser(&mut out, &grammar, &analysis, &Names::new("one").unwrap(), false).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("                \t let mut n = 0;  \n"), "{}", text);
        assert!(text.contains(
            "self.current.data.clone();\n                \n  n += 1;\n  res = n;\n\n                self.advance()?;"
        ));
    }

    #[test]
    fn debug_writes_set_tables() {
        let text = render(true);
        assert!(text.contains("/*\nFIRST(expr) = {NUM}\nFIRST(tail) = {ε, PLUS}\n"));
        assert!(text.contains("FOLLOW(tail) = {_END}\n"));
        assert!(text.contains("MARKERS(tail, 1) = {_END}\n*/\n"));
    }

    #[test]
    fn output_is_deterministic() {
        assert_eq!(render(true), render(true));
    }
}
