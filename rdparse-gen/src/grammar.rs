//! In-memory grammar model.
//!
//! These are plain data types: a [`Grammar`] owns its token rules and parser
//! rules, and nothing in it changes after [`Grammar::new`] has validated it
//! (see [`crate::validate`]). Derived data (FIRST/FOLLOW/marker sets) lives in
//! [`crate::analysis::Analysis`], never here.

/// Name of the distinguished end-of-input token kind.
pub const END: &str = "_END";

/// An opaque fragment of target-language source code.
///
/// Semantic actions, init blocks, rule headers and argument expressions are
/// never parsed or checked; generators reproduce them byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ActionCode(String);

impl ActionCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A lexer rule: token name and the pattern that matches it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRule {
    name: String,
    pattern: String,
}

impl TokenRule {
    pub fn new(name: impl Into<String>, pattern: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The regular expression, exactly as written in the grammar.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

/// A `name: type` pair: a rule argument or a rule's return binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Binding {
    name: String,
    ty: String,
}

impl Binding {
    pub fn new(name: impl Into<String>, ty: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: ty.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &str {
        &self.ty
    }
}

/// What an [`Atom`] refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AtomKind {
    /// A token kind; the atom binds the token's data.
    Terminal,
    /// A parser rule, called with the given argument expressions.
    NonTerminal { params: Vec<String> },
}

/// One element of a sequence alternative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Atom {
    binding: String,
    name: String,
    action: Option<ActionCode>,
    kind: AtomKind,
}

impl Atom {
    /// A terminal atom `binding=NAME {action}`.
    pub fn terminal(
        binding: impl Into<String>,
        name: impl Into<String>,
        action: Option<ActionCode>,
    ) -> Self {
        Self {
            binding: binding.into(),
            name: name.into(),
            action,
            kind: AtomKind::Terminal,
        }
    }

    /// A non-terminal atom `binding=name[params] {action}`.
    pub fn non_terminal(
        binding: impl Into<String>,
        name: impl Into<String>,
        params: Vec<String>,
        action: Option<ActionCode>,
    ) -> Self {
        Self {
            binding: binding.into(),
            name: name.into(),
            action,
            kind: AtomKind::NonTerminal { params },
        }
    }

    /// Variable the matched token data or the rule result is bound to.
    pub fn binding(&self) -> &str {
        &self.binding
    }

    /// Referenced token or rule name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn action(&self) -> Option<&ActionCode> {
        self.action.as_ref()
    }

    pub fn kind(&self) -> &AtomKind {
        &self.kind
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, AtomKind::Terminal)
    }
}

/// One alternative of a parser rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Alternative {
    /// Matches the empty string.
    Epsilon {
        init: Option<ActionCode>,
        code: Option<ActionCode>,
    },
    /// Matches its atoms in order.
    Sequence {
        init: Option<ActionCode>,
        atoms: Vec<Atom>,
    },
}

impl Alternative {
    pub fn init(&self) -> Option<&ActionCode> {
        match self {
            Alternative::Epsilon { init, .. } | Alternative::Sequence { init, .. } => init.as_ref(),
        }
    }

    /// The atoms of a sequence; empty for epsilon.
    pub fn atoms(&self) -> &[Atom] {
        match self {
            Alternative::Epsilon { .. } => &[],
            Alternative::Sequence { atoms, .. } => atoms,
        }
    }
}

/// A named parser rule with its arguments, return binding and alternatives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserRule {
    name: String,
    arguments: Vec<Binding>,
    returns: Binding,
    alternatives: Vec<Alternative>,
}

impl ParserRule {
    pub fn new(
        name: impl Into<String>,
        arguments: Vec<Binding>,
        returns: Binding,
        alternatives: Vec<Alternative>,
    ) -> Self {
        Self {
            name: name.into(),
            arguments,
            returns,
            alternatives,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn arguments(&self) -> &[Binding] {
        &self.arguments
    }

    pub fn returns(&self) -> &Binding {
        &self.returns
    }

    /// Alternatives in source order, which is also their priority order.
    pub fn alternatives(&self) -> &[Alternative] {
        &self.alternatives
    }
}

/// A validated grammar.
///
/// Construct with [`Grammar::new`]; the invariants checked there hold for the
/// lifetime of the value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grammar {
    pub(crate) header: String,
    pub(crate) token_rules: Vec<TokenRule>,
    pub(crate) skip_names: Vec<String>,
    pub(crate) start: usize,
    pub(crate) parser_rules: Vec<ParserRule>,
}

impl Grammar {
    /// Free text copied to the top of every generated artifact.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// All token rules in declaration order, skip tokens included.
    pub fn token_rules(&self) -> &[TokenRule] {
        &self.token_rules
    }

    /// Skip token names in the order they were listed.
    pub fn skip_names(&self) -> &[String] {
        &self.skip_names
    }

    pub fn is_skip(&self, name: &str) -> bool {
        self.skip_names.iter().any(|s| s == name)
    }

    /// Skip rules in skip-list order.
    pub fn skip_rules(&self) -> impl Iterator<Item = &TokenRule> + '_ {
        self.skip_names
            .iter()
            .filter_map(|name| self.token_rules.iter().find(|t| t.name() == name))
    }

    /// Token rules that produce tokens, in declaration order.
    pub fn lexemes(&self) -> impl Iterator<Item = &TokenRule> + '_ {
        self.token_rules.iter().filter(|t| !self.is_skip(t.name()))
    }

    pub fn parser_rules(&self) -> &[ParserRule] {
        &self.parser_rules
    }

    pub fn rule(&self, name: &str) -> Option<&ParserRule> {
        self.parser_rules.iter().find(|r| r.name() == name)
    }

    pub fn start_rule(&self) -> &ParserRule {
        &self.parser_rules[self.start]
    }

    /// Index of the start rule in [`Grammar::parser_rules`].
    pub fn start_index(&self) -> usize {
        self.start
    }
}
