// This module computes FIRST, FOLLOW and per-alternative marker sets for a
// validated grammar and checks that the grammar is LL(1).

use crate::error::{GrammarError, SymbolKind};
use crate::grammar::{END, Grammar};
use crate::symtab::Symtab;
use std::collections::BTreeSet;
use std::io::{self, Write};

/// Index of a terminal: the position of a non-skip token rule in declaration
/// order, or [`Analysis::end`] for end of input.
pub type TokenId = usize;

/// A set of terminals ordered by declaration.
pub type TokenSet = BTreeSet<TokenId>;

/// Label used for the empty string when sets are printed.
pub const EPSILON: &str = "ε";

/// A grammar symbol in index form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Term(TokenId),
    NonTerm(usize),
}

/// Productions in index form: `prods[rule][alt]` is the symbol sequence of
/// one alternative. Epsilon alternatives are empty sequences.
pub type Prods = Vec<Vec<Vec<Symbol>>>;

/// A FIRST set: terminals plus the ε marker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FirstSet {
    pub tokens: TokenSet,
    /// `true` when ε belongs to the set.
    pub epsilon: bool,
}

impl FirstSet {
    fn union(&mut self, other: &FirstSet) {
        self.tokens.extend(other.tokens.iter().copied());
        self.epsilon |= other.epsilon;
    }

    /// Terminals and ε shared by both sets.
    fn intersection(&self, other: &FirstSet) -> FirstSet {
        FirstSet {
            tokens: self.tokens.intersection(&other.tokens).copied().collect(),
            epsilon: self.epsilon && other.epsilon,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty() && !self.epsilon
    }
}

/// FIRST of a symbol sequence given the FIRST sets of all non-terminals.
///
/// An empty sequence yields `{ε}`; a leading terminal yields itself; a
/// leading non-terminal contributes its terminals and, when it is nullable,
/// the FIRST of the rest of the sequence.
pub fn first_of(seq: &[Symbol], first: &[FirstSet]) -> FirstSet {
    let mut out = FirstSet::default();
    for sym in seq {
        match *sym {
            Symbol::Term(t) => {
                out.tokens.insert(t);
                return out;
            }
            Symbol::NonTerm(n) => {
                out.tokens.extend(first[n].tokens.iter().copied());
                if !first[n].epsilon {
                    return out;
                }
            }
        }
    }
    out.epsilon = true;
    out
}

/// Computes FIRST sets of all non-terminals.
///
/// Each round builds a fresh vector from the previous one; sets only grow and
/// are bounded by the terminal alphabet plus ε, so the loop terminates.
pub fn first_sets(prods: &Prods) -> Vec<FirstSet> {
    let mut first = vec![FirstSet::default(); prods.len()];
    let mut round = 0;
    loop {
        round += 1;
        let next: Vec<FirstSet> = prods
            .iter()
            .map(|alts| {
                let mut set = FirstSet::default();
                for alt in alts {
                    set.union(&first_of(alt, &first));
                }
                set
            })
            .collect();
        log::trace!("FIRST round {}: {:?}", round, next);
        if next == first {
            return first;
        }
        first = next;
    }
}

/// Computes FOLLOW sets of all non-terminals.
///
/// `FOLLOW(start)` is seeded with `end`. For each occurrence of `N` followed
/// by a suffix `β`, `FOLLOW(N)` gains `FIRST(β) \ {ε}` and, when `β` is
/// nullable, `FOLLOW` of the enclosing rule.
pub fn follow_sets(prods: &Prods, first: &[FirstSet], start: usize, end: TokenId) -> Vec<TokenSet> {
    let mut follow = vec![TokenSet::new(); prods.len()];
    follow[start].insert(end);
    let mut round = 0;
    loop {
        round += 1;
        let mut next = follow.clone();
        for (lhs, alts) in prods.iter().enumerate() {
            for alt in alts {
                for (i, sym) in alt.iter().enumerate() {
                    if let Symbol::NonTerm(b) = *sym {
                        let beta = first_of(&alt[i + 1..], first);
                        next[b].extend(beta.tokens.iter().copied());
                        if beta.epsilon {
                            next[b].extend(follow[lhs].iter().copied());
                        }
                    }
                }
            }
        }
        log::trace!("FOLLOW round {}: {:?}", round, next);
        if next == follow {
            return follow;
        }
        follow = next;
    }
}

/// Lookahead sets selecting each alternative: `FIRST(alt) \ {ε}`, plus
/// `FOLLOW(rule)` when the alternative is nullable.
pub fn marker_sets(prods: &Prods, first: &[FirstSet], follow: &[TokenSet]) -> Vec<Vec<TokenSet>> {
    prods
        .iter()
        .enumerate()
        .map(|(rule, alts)| {
            alts.iter()
                .map(|alt| {
                    let f = first_of(alt, first);
                    let mut markers = f.tokens;
                    if f.epsilon {
                        markers.extend(follow[rule].iter().copied());
                    }
                    markers
                })
                .collect()
        })
        .collect()
}

/// A pair of alternatives that one token of lookahead cannot separate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    pub rule: usize,
    pub first: usize,
    pub second: usize,
    pub overlap: FirstSet,
}

/// Checks every ordered pair of distinct alternatives `(i, j)` of every rule:
/// `FIRST(i) ∩ FIRST(j)` must be empty, and when `ε ∈ FIRST(i)`,
/// `FIRST(j) ∩ FOLLOW(rule)` must be empty too.
pub fn find_conflict(prods: &Prods, first: &[FirstSet], follow: &[TokenSet]) -> Option<Conflict> {
    for (rule, alts) in prods.iter().enumerate() {
        let firsts: Vec<FirstSet> = alts.iter().map(|alt| first_of(alt, first)).collect();
        for (i, fi) in firsts.iter().enumerate() {
            for (j, fj) in firsts.iter().enumerate() {
                if i == j {
                    continue;
                }
                let overlap = fi.intersection(fj);
                if !overlap.is_empty() {
                    return Some(Conflict {
                        rule,
                        first: i,
                        second: j,
                        overlap,
                    });
                }
                if fi.epsilon {
                    let tokens: TokenSet = fj.tokens.intersection(&follow[rule]).copied().collect();
                    if !tokens.is_empty() {
                        return Some(Conflict {
                            rule,
                            first: i,
                            second: j,
                            overlap: FirstSet {
                                tokens,
                                epsilon: false,
                            },
                        });
                    }
                }
            }
        }
    }
    None
}

/// Derived lookahead data of a validated grammar.
///
/// Built once by [`Analysis::new`] and read-only afterwards. Rules are
/// indexed as in [`Grammar::parser_rules`]; terminals as in
/// [`Grammar::lexemes`], followed by the end-of-input marker.
#[derive(Debug, Clone)]
pub struct Analysis {
    terminals: Symtab,
    nonterminals: Symtab,
    first: Vec<FirstSet>,
    follow: Vec<TokenSet>,
    markers: Vec<Vec<TokenSet>>,
}

/// Lowers the grammar's rules into index form.
fn lower(grammar: &Grammar, terminals: &Symtab, nonterminals: &Symtab) -> Result<Prods, GrammarError> {
    grammar
        .parser_rules()
        .iter()
        .map(|rule| {
            rule.alternatives()
                .iter()
                .map(|alt| {
                    alt.atoms()
                        .iter()
                        .map(|atom| {
                            let (idx, kind) = if atom.is_terminal() {
                                (terminals.id(atom.name()).map(Symbol::Term), SymbolKind::Terminal)
                            } else {
                                (
                                    nonterminals.id(atom.name()).map(Symbol::NonTerm),
                                    SymbolKind::NonTerminal,
                                )
                            };
                            idx.ok_or_else(|| GrammarError::UnknownSymbol {
                                rule: rule.name().into(),
                                name: atom.name().into(),
                                kind,
                            })
                        })
                        .collect::<Result<Vec<_>, _>>()
                })
                .collect::<Result<Vec<_>, _>>()
        })
        .collect()
}

impl Analysis {
    /// Computes FIRST, FOLLOW and marker sets, then runs the LL(1) check.
    pub fn new(grammar: &Grammar) -> Result<Self, GrammarError> {
        let terminals: Symtab = grammar
            .lexemes()
            .map(|t| t.name())
            .chain(std::iter::once(END))
            .collect();
        let nonterminals: Symtab = grammar.parser_rules().iter().map(|r| r.name()).collect();
        let end = terminals.len() - 1;

        let prods = lower(grammar, &terminals, &nonterminals)?;
        let first = first_sets(&prods);
        let follow = follow_sets(&prods, &first, grammar.start_index(), end);

        if let Some(conflict) = find_conflict(&prods, &first, &follow) {
            let mut tokens: Vec<String> = Vec::new();
            if conflict.overlap.epsilon {
                tokens.push(EPSILON.into());
            }
            tokens.extend(
                conflict
                    .overlap
                    .tokens
                    .iter()
                    .filter_map(|&t| terminals.name(t))
                    .map(String::from),
            );
            return Err(GrammarError::NotLL1 {
                rule: grammar.parser_rules()[conflict.rule].name().into(),
                first: conflict.first,
                second: conflict.second,
                tokens,
            });
        }

        let markers = marker_sets(&prods, &first, &follow);
        log::debug!(
            "grammar is LL(1): {} terminals, {} non-terminals",
            terminals.len(),
            nonterminals.len()
        );

        Ok(Self {
            terminals,
            nonterminals,
            first,
            follow,
            markers,
        })
    }

    /// Id of the end-of-input marker.
    pub fn end(&self) -> TokenId {
        self.terminals.len() - 1
    }

    /// Name of terminal `id`; `"_END"` for the end-of-input marker.
    pub fn token_name(&self, id: TokenId) -> &str {
        self.terminals.name(id).unwrap_or(END)
    }

    pub fn token_names(&self, set: &TokenSet) -> Vec<&str> {
        set.iter().map(|&t| self.token_name(t)).collect()
    }

    pub fn first(&self, rule: usize) -> &FirstSet {
        &self.first[rule]
    }

    pub fn follow(&self, rule: usize) -> &TokenSet {
        &self.follow[rule]
    }

    /// Lookahead tokens selecting alternative `alt` of rule `rule`.
    pub fn markers(&self, rule: usize, alt: usize) -> &TokenSet {
        &self.markers[rule][alt]
    }

    /// Union of the marker sets of all alternatives of `rule`.
    pub fn expected(&self, rule: usize) -> TokenSet {
        self.markers[rule].iter().flatten().copied().collect()
    }

    /// Writes the FIRST, FOLLOW and marker tables in a readable form, one per line.
    pub fn write_sets<W: Write>(&self, out: &mut W, prefix: &str) -> io::Result<()> {
        let rules = self.nonterminals.names();
        for (rule, set) in rules.iter().zip(&self.first) {
            let mut names: Vec<&str> = Vec::new();
            if set.epsilon {
                names.push(EPSILON);
            }
            names.extend(self.token_names(&set.tokens));
            writeln!(out, "{}FIRST({}) = {{{}}}", prefix, rule, names.join(", "))?;
        }
        for (rule, set) in rules.iter().zip(&self.follow) {
            writeln!(
                out,
                "{}FOLLOW({}) = {{{}}}",
                prefix,
                rule,
                self.token_names(set).join(", ")
            )?;
        }
        for (rule, alts) in rules.iter().zip(&self.markers) {
            for (alt, set) in alts.iter().enumerate() {
                writeln!(
                    out,
                    "{}MARKERS({}, {}) = {{{}}}",
                    prefix,
                    rule,
                    alt,
                    self.token_names(set).join(", ")
                )?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::{Alternative, Atom, Binding, ParserRule, TokenRule};

    fn seq(atoms: Vec<Atom>) -> Alternative {
        Alternative::Sequence { init: None, atoms }
    }

    fn eps() -> Alternative {
        Alternative::Epsilon {
            init: None,
            code: None,
        }
    }

    fn t(name: &str) -> Atom {
        Atom::terminal("_", name, None)
    }

    fn nt(name: &str) -> Atom {
        Atom::non_terminal("_", name, vec![], None)
    }

    fn rule(name: &str, alternatives: Vec<Alternative>) -> ParserRule {
        ParserRule::new(name, vec![], Binding::new("res", "()"), alternatives)
    }

    fn grammar(tokens: &[&str], start: &str, rules: Vec<ParserRule>) -> Grammar {
        let tokens = tokens
            .iter()
            .map(|name| TokenRule::new(*name, regex::escape(&name.to_lowercase())))
            .collect();
        Grammar::new("", tokens, vec![], start, rules).unwrap()
    }

    fn names(a: &Analysis, set: &TokenSet) -> Vec<String> {
        a.token_names(set).into_iter().map(String::from).collect()
    }

    /// expr -> term expr_tail
    /// expr_tail -> PLUS term expr_tail | ε
    /// term -> factor term_tail
    /// term_tail -> STAR factor term_tail | ε
    /// factor -> LPAREN expr RPAREN | ID
    fn expression_grammar() -> Grammar {
        grammar(
            &["PLUS", "STAR", "LPAREN", "RPAREN", "ID"],
            "expr",
            vec![
                rule("expr", vec![seq(vec![nt("term"), nt("expr_tail")])]),
                rule(
                    "expr_tail",
                    vec![seq(vec![t("PLUS"), nt("term"), nt("expr_tail")]), eps()],
                ),
                rule("term", vec![seq(vec![nt("factor"), nt("term_tail")])]),
                rule(
                    "term_tail",
                    vec![seq(vec![t("STAR"), nt("factor"), nt("term_tail")]), eps()],
                ),
                rule(
                    "factor",
                    vec![seq(vec![t("LPAREN"), nt("expr"), t("RPAREN")]), seq(vec![t("ID")])],
                ),
            ],
        )
    }

    #[test]
    fn first_sets_of_expression_grammar() {
        let g = expression_grammar();
        let a = Analysis::new(&g).unwrap();
        assert_eq!(names(&a, &a.first(0).tokens), vec!["LPAREN", "ID"]);
        assert!(!a.first(0).epsilon);
        assert_eq!(names(&a, &a.first(1).tokens), vec!["PLUS"]);
        assert!(a.first(1).epsilon);
        assert_eq!(names(&a, &a.first(3).tokens), vec!["STAR"]);
        assert!(a.first(3).epsilon);
        assert_eq!(names(&a, &a.first(4).tokens), vec!["LPAREN", "ID"]);
    }

    #[test]
    fn follow_sets_of_expression_grammar() {
        let g = expression_grammar();
        let a = Analysis::new(&g).unwrap();
        assert_eq!(names(&a, a.follow(0)), vec!["RPAREN", "_END"]);
        assert_eq!(names(&a, a.follow(1)), vec!["RPAREN", "_END"]);
        assert_eq!(names(&a, a.follow(2)), vec!["PLUS", "RPAREN", "_END"]);
        assert_eq!(names(&a, a.follow(3)), vec!["PLUS", "RPAREN", "_END"]);
        assert_eq!(names(&a, a.follow(4)), vec!["PLUS", "STAR", "RPAREN", "_END"]);
    }

    #[test]
    fn markers_of_nullable_alternative_include_follow() {
        let g = expression_grammar();
        let a = Analysis::new(&g).unwrap();
        assert_eq!(names(&a, a.markers(1, 0)), vec!["PLUS"]);
        assert_eq!(names(&a, a.markers(1, 1)), vec!["RPAREN", "_END"]);
        assert_eq!(names(&a, a.markers(3, 1)), vec!["PLUS", "RPAREN", "_END"]);
        assert_eq!(names(&a, &a.expected(4)), vec!["LPAREN", "ID"]);
        assert_eq!(a.token_name(a.end()), "_END");
    }

    #[test]
    fn markers_are_disjoint_for_accepted_grammars() {
        let g = expression_grammar();
        let a = Analysis::new(&g).unwrap();
        for (r, rule) in g.parser_rules().iter().enumerate() {
            let n = rule.alternatives().len();
            for i in 0..n {
                for j in 0..n {
                    if i != j {
                        assert!(a.markers(r, i).is_disjoint(a.markers(r, j)));
                    }
                }
            }
        }
    }

    #[test]
    fn epsilon_iff_rule_derives_empty_string() {
        // a -> b c ; b -> ε | X ; c -> b b ; d -> X d
        let g = grammar(
            &["X", "Y"],
            "a",
            vec![
                rule("a", vec![seq(vec![nt("b"), nt("c")])]),
                rule("b", vec![eps(), seq(vec![t("X")])]),
                rule("c", vec![seq(vec![nt("b"), t("Y")])]),
                rule("d", vec![seq(vec![t("X"), nt("d")])]),
            ],
        );
        let terminals: Symtab = ["X", "Y", END].into_iter().collect();
        let nonterminals: Symtab = ["a", "b", "c", "d"].into_iter().collect();
        let prods = lower(&g, &terminals, &nonterminals).unwrap();
        let first = first_sets(&prods);
        assert!(!first[0].epsilon);
        assert!(first[1].epsilon);
        assert!(!first[2].epsilon);
        assert!(!first[3].epsilon);
        // FIRST(a) = FIRST(b) \ ε ∪ FIRST(c) = {X, Y}
        assert_eq!(first[0].tokens, TokenSet::from([0, 1]));
        // Only terminals of the alphabet appear.
        for set in &first {
            assert!(set.tokens.iter().all(|&t| t < terminals.len() - 1));
        }
    }

    #[test]
    fn first_of_sequence_skips_nullable_prefix() {
        let first = vec![
            FirstSet {
                tokens: TokenSet::from([0]),
                epsilon: true,
            },
            FirstSet {
                tokens: TokenSet::from([1]),
                epsilon: false,
            },
        ];
        let f = first_of(&[Symbol::NonTerm(0), Symbol::NonTerm(1)], &first);
        assert_eq!(f.tokens, TokenSet::from([0, 1]));
        assert!(!f.epsilon);

        let f = first_of(&[Symbol::NonTerm(0), Symbol::NonTerm(0)], &first);
        assert!(f.epsilon);

        let f = first_of(&[], &first);
        assert!(f.epsilon && f.tokens.is_empty());

        let f = first_of(&[Symbol::Term(2), Symbol::NonTerm(1)], &first);
        assert_eq!(f.tokens, TokenSet::from([2]));
    }

    #[test]
    fn right_recursive_list_is_ll1() {
        // s -> a s | ε ; a -> A
        let g = grammar(
            &["A"],
            "s",
            vec![
                rule("s", vec![seq(vec![nt("a"), nt("s")]), eps()]),
                rule("a", vec![seq(vec![t("A")])]),
            ],
        );
        let a = Analysis::new(&g).unwrap();
        assert_eq!(names(&a, a.markers(0, 0)), vec!["A"]);
        assert_eq!(names(&a, a.markers(0, 1)), vec!["_END"]);
    }

    #[test]
    fn nullable_alternative_conflicting_with_follow_is_rejected() {
        // x -> s A ; s -> a s | ε ; a -> A
        let g = grammar(
            &["A"],
            "x",
            vec![
                rule("x", vec![seq(vec![nt("s"), t("A")])]),
                rule("s", vec![seq(vec![nt("a"), nt("s")]), eps()]),
                rule("a", vec![seq(vec![t("A")])]),
            ],
        );
        let err = Analysis::new(&g).unwrap_err();
        assert_eq!(
            err,
            GrammarError::NotLL1 {
                rule: "s".into(),
                first: 1,
                second: 0,
                tokens: vec!["A".into()],
            }
        );
    }

    #[test]
    fn common_prefix_is_rejected() {
        // s -> A B | A C
        let g = grammar(
            &["A", "B", "C"],
            "s",
            vec![rule(
                "s",
                vec![seq(vec![t("A"), t("B")]), seq(vec![t("A"), t("C")])],
            )],
        );
        let err = Analysis::new(&g).unwrap_err();
        assert!(matches!(
            err,
            GrammarError::NotLL1 { ref rule, first: 0, second: 1, ref tokens } if rule == "s" && tokens == &["A"]
        ));
    }

    #[test]
    fn two_nullable_alternatives_are_rejected() {
        // s -> ε | b ; b -> ε
        let g = grammar(
            &["A"],
            "s",
            vec![
                rule("s", vec![eps(), seq(vec![nt("b")])]),
                rule("b", vec![eps()]),
            ],
        );
        let err = Analysis::new(&g).unwrap_err();
        assert!(matches!(
            err,
            GrammarError::NotLL1 { ref tokens, .. } if tokens == &[EPSILON]
        ));
    }

    #[test]
    fn left_recursion_is_rejected() {
        // e -> e PLUS ID | ID
        let g = grammar(
            &["PLUS", "ID"],
            "e",
            vec![rule(
                "e",
                vec![seq(vec![nt("e"), t("PLUS"), t("ID")]), seq(vec![t("ID")])],
            )],
        );
        assert!(matches!(
            Analysis::new(&g),
            Err(GrammarError::NotLL1 { .. })
        ));
    }

    #[test]
    fn write_sets_prints_tables() {
        let g = expression_grammar();
        let a = Analysis::new(&g).unwrap();
        let mut out = Vec::new();
        a.write_sets(&mut out, "// ").unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("// FIRST(expr_tail) = {ε, PLUS}\n"));
        assert!(text.contains("// FOLLOW(factor) = {PLUS, STAR, RPAREN, _END}\n"));
        assert!(text.contains("// MARKERS(factor, 1) = {ID}\n"));
    }
}
