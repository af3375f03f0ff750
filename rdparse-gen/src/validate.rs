//! Structural validation of grammar descriptions.
//!
//! [`Grammar::new`] is the only way to obtain a [`Grammar`]. Checks run in a
//! fixed order and the first failure is returned:
//!
//! 1. token rule names are unique,
//! 2. skip names are unique,
//! 3. skip names refer to token rules,
//! 4. a parser rule exists for the start symbol,
//! 5. every atom resolves (terminals to token rules, non-terminals to parser rules),
//! 6. parser rule names are unique,
//! 7. no token rule uses the end-of-input name,
//! 8. no terminal atom refers to a skip token,
//! 9. every token pattern compiles.
use crate::error::{GrammarError, SymbolKind};
use crate::grammar::{END, Grammar, ParserRule, TokenRule};
use crate::symtab::Symtab;
use regex::Regex;

impl Grammar {
    /// Validates the raw parts of a grammar description and assembles a [`Grammar`].
    pub fn new(
        header: impl Into<String>,
        token_rules: Vec<TokenRule>,
        skip_names: Vec<String>,
        start: &str,
        parser_rules: Vec<ParserRule>,
    ) -> Result<Self, GrammarError> {
        let terminals = Symtab::unique(token_rules.iter().map(TokenRule::name))
            .map_err(|name| GrammarError::DuplicateTokenRule { name: name.into() })?;

        Symtab::unique(skip_names.iter().map(String::as_str))
            .map_err(|name| GrammarError::DuplicateSkip { name: name.into() })?;

        if let Some(name) = skip_names.iter().find(|s| !terminals.contains(s.as_str())) {
            return Err(GrammarError::UnknownSkip { name: name.clone() });
        }

        let start = parser_rules
            .iter()
            .position(|r| r.name() == start)
            .ok_or_else(|| GrammarError::UnknownStart { name: start.into() })?;

        let nonterminals: Symtab = parser_rules.iter().map(ParserRule::name).collect();
        for rule in &parser_rules {
            for atom in rule.alternatives().iter().flat_map(|alt| alt.atoms()) {
                let (known, kind) = if atom.is_terminal() {
                    (terminals.contains(atom.name()), SymbolKind::Terminal)
                } else {
                    (nonterminals.contains(atom.name()), SymbolKind::NonTerminal)
                };
                if !known {
                    return Err(GrammarError::UnknownSymbol {
                        rule: rule.name().into(),
                        name: atom.name().into(),
                        kind,
                    });
                }
            }
        }

        Symtab::unique(parser_rules.iter().map(ParserRule::name))
            .map_err(|name| GrammarError::DuplicateParserRule { name: name.into() })?;

        if let Some(rule) = token_rules.iter().find(|t| t.name() == END) {
            return Err(GrammarError::ReservedTokenName {
                name: rule.name().into(),
            });
        }

        for rule in &parser_rules {
            let skipped = rule
                .alternatives()
                .iter()
                .flat_map(|alt| alt.atoms())
                .find(|atom| atom.is_terminal() && skip_names.iter().any(|s| s == atom.name()));
            if let Some(atom) = skipped {
                return Err(GrammarError::SkippedTerminal {
                    rule: rule.name().into(),
                    name: atom.name().into(),
                });
            }
        }

        for rule in &token_rules {
            Regex::new(&format!("^(?:{})", rule.pattern())).map_err(|err| {
                GrammarError::InvalidPattern {
                    name: rule.name().into(),
                    message: err.to_string(),
                }
            })?;
        }

        log::debug!(
            "grammar validated: {} token rules ({} skipped), {} parser rules, start {:?}",
            token_rules.len(),
            skip_names.len(),
            parser_rules.len(),
            parser_rules[start].name()
        );

        Ok(Self {
            header: header.into(),
            token_rules,
            skip_names,
            start,
            parser_rules,
        })
    }
}
