use super::lexer::Token;
use crate::grammar::{ActionCode, Alternative, Atom, Binding, ParserRule, TokenRule};
use chumsky::prelude::*;

/// A top-level declaration of a grammar description.
#[derive(Debug, Clone, PartialEq)]
pub enum Item {
    Header(String),
    Token(TokenRule),
    Skip(Vec<String>),
    Start(String),
    Rule(ParserRule),
}

/// Splits `s` at commas outside of `()`, `[]` and `{}`; with `angles` set,
/// `<>` nests as well (`->` excepted). Pieces are trimmed; an all-blank
/// input yields no pieces.
pub(crate) fn split_top_level(s: &str, angles: bool) -> Vec<String> {
    if s.trim().is_empty() {
        return Vec::new();
    }
    let mut pieces = Vec::new();
    let mut depth = 0i32;
    let mut start = 0;
    let mut prev = '\0';
    for (i, c) in s.char_indices() {
        match c {
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => depth -= 1,
            '<' if angles => depth += 1,
            '>' if angles && prev != '-' => depth -= 1,
            ',' if depth == 0 => {
                pieces.push(s[start..i].trim().to_owned());
                start = i + 1;
            }
            _ => {}
        }
        prev = c;
    }
    pieces.push(s[start..].trim().to_owned());
    pieces
}

/// Parses `name: type`.
pub(crate) fn parse_binding(s: &str) -> Result<Binding, String> {
    let (name, ty) = s
        .split_once(':')
        .ok_or_else(|| format!("expected `name: type`, found {:?}", s))?;
    let (name, ty) = (name.trim(), ty.trim());
    let ident = name
        .chars()
        .next()
        .is_some_and(|c| c.is_ascii_lowercase() || c == '_')
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !ident {
        return Err(format!("invalid binding name {:?}", name));
    }
    if ty.is_empty() {
        return Err(format!("missing type for {:?}", name));
    }
    Ok(Binding::new(name, ty))
}

fn code(text: Option<String>) -> Option<ActionCode> {
    text.map(ActionCode::new)
}

/// Grammar description parser over the token stream of [`super::lexer::tokenize`].
pub fn parser<'a>() -> impl Parser<'a, &'a [Token], Vec<Item>, extra::Err<Rich<'a, Token>>> {
    let upper = select! { Token::Upper(name) => name }.labelled("token name");
    let lower = select! { Token::Lower(name) => name }.labelled("rule name");
    let block = select! { Token::Code(text) => text }.labelled("action block");
    let bracket = select! { Token::Bracket(text) => text }.labelled("bracket block");
    let pattern = select! { Token::Pattern(text) => text }.labelled("pattern");
    let semi = just(Token::Semi);

    let header = just(Token::Header)
        .ignore_then(block.clone())
        .map(Item::Header);

    let token_rule = just(Token::TokenKw)
        .ignore_then(upper.clone())
        .then_ignore(just(Token::Eq))
        .then(pattern)
        .then_ignore(semi.clone())
        .map(|(name, pattern)| Item::Token(TokenRule::new(name, pattern)));

    let skip = just(Token::Skip)
        .ignore_then(
            upper
                .clone()
                .separated_by(just(Token::Comma))
                .at_least(1)
                .collect::<Vec<_>>(),
        )
        .then_ignore(semi.clone())
        .map(Item::Skip);

    let start = just(Token::Start)
        .ignore_then(lower.clone())
        .then_ignore(semi.clone())
        .map(Item::Start);

    let binding = lower.clone().then_ignore(just(Token::Eq)).or_not();

    let terminal = binding
        .clone()
        .then(upper)
        .then(block.clone().or_not())
        .map(|((binding, name), action)| {
            Atom::terminal(binding.unwrap_or_else(|| "_".into()), name, code(action))
        });

    let non_terminal = binding
        .then(lower.clone())
        .then(bracket.clone().or_not())
        .then(block.clone().or_not())
        .map(|(((binding, name), params), action)| {
            let params = params.map(|p| split_top_level(&p, false)).unwrap_or_default();
            Atom::non_terminal(
                binding.unwrap_or_else(|| "_".into()),
                name,
                params,
                code(action),
            )
        });

    let atom = terminal.or(non_terminal).labelled("atom");

    let epsilon = block
        .clone()
        .or_not()
        .then_ignore(just(Token::Eps))
        .then(block.clone().or_not())
        .map(|(init, body)| Alternative::Epsilon {
            init: code(init),
            code: code(body),
        });

    let sequence = block
        .or_not()
        .then(atom.repeated().at_least(1).collect::<Vec<_>>())
        .map(|(init, atoms)| Alternative::Sequence {
            init: code(init),
            atoms,
        });

    let alternative = epsilon.or(sequence).labelled("alternative");

    let rule = lower
        .then(bracket.clone().or_not())
        .then_ignore(just(Token::Returns))
        .then(bracket)
        .then_ignore(just(Token::Colon))
        .then(
            alternative
                .separated_by(just(Token::Pipe))
                .at_least(1)
                .collect::<Vec<_>>(),
        )
        .then_ignore(semi)
        .try_map(|(((name, args), returns), alternatives), span| {
            let arguments = split_top_level(args.as_deref().unwrap_or(""), true)
                .iter()
                .map(|a| parse_binding(a))
                .collect::<Result<Vec<_>, _>>()
                .map_err(|msg| Rich::custom(span, format!("rule {:?}: {}", name, msg)))?;
            let returns = match split_top_level(&returns, true).as_slice() {
                [single] => parse_binding(single)
                    .map_err(|msg| Rich::custom(span, format!("rule {:?}: {}", name, msg)))?,
                _ => {
                    return Err(Rich::custom(
                        span,
                        format!("rule {:?} must return exactly one `name: type`", name),
                    ));
                }
            };
            Ok(Item::Rule(ParserRule::new(name, arguments, returns, alternatives)))
        });

    choice((header, token_rule, skip, start, rule))
        .repeated()
        .collect::<Vec<_>>()
        .then_ignore(end())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::AtomKind;

    fn parse(tokens: &[Token]) -> Vec<Item> {
        parser().parse(tokens).into_result().unwrap()
    }

    fn up(s: &str) -> Token {
        Token::Upper(s.into())
    }

    fn low(s: &str) -> Token {
        Token::Lower(s.into())
    }

    #[test]
    fn splits_at_top_level_commas() {
        assert_eq!(
            split_top_level("a: Vec<(i64, u8)>, b: HashMap<K, V>", true),
            vec!["a: Vec<(i64, u8)>", "b: HashMap<K, V>"]
        );
        assert_eq!(
            split_top_level("f: Box<dyn Fn(i64) -> i64>, n: i64", true),
            vec!["f: Box<dyn Fn(i64) -> i64>", "n: i64"]
        );
        assert_eq!(split_top_level("a < b, vec![1, 2]", false), vec!["a < b", "vec![1, 2]"]);
        assert!(split_top_level("  ", false).is_empty());
    }

    #[test]
    fn bindings() {
        assert_eq!(
            parse_binding(" acc : std::vec::Vec<i64> ").unwrap(),
            Binding::new("acc", "std::vec::Vec<i64>")
        );
        assert!(parse_binding("acc").is_err());
        assert!(parse_binding("Acc: i64").is_err());
        assert!(parse_binding("acc:").is_err());
    }

    #[test]
    fn declarations() {
        let items = parse(&[
            Token::Header,
            Token::Code(" use x; ".into()),
            Token::TokenKw,
            up("NUM"),
            Token::Eq,
            Token::Pattern("[0-9]+".into()),
            Token::Semi,
            Token::Skip,
            up("WS"),
            Token::Comma,
            up("NL"),
            Token::Semi,
            Token::Start,
            low("expr"),
            Token::Semi,
        ]);
        assert_eq!(
            items,
            vec![
                Item::Header(" use x; ".into()),
                Item::Token(TokenRule::new("NUM", "[0-9]+")),
                Item::Skip(vec!["WS".into(), "NL".into()]),
                Item::Start("expr".into()),
            ]
        );
    }

    #[test]
    fn rule_with_atoms_and_epsilon() {
        // tail[acc: i64] returns [res: i64] : {init} PLUS n=NUM {a} t=tail[acc] {b} | eps {c} ;
        let items = parse(&[
            low("tail"),
            Token::Bracket("acc: i64".into()),
            Token::Returns,
            Token::Bracket("res: i64".into()),
            Token::Colon,
            Token::Code("init".into()),
            up("PLUS"),
            low("n"),
            Token::Eq,
            up("NUM"),
            Token::Code("a".into()),
            low("t"),
            Token::Eq,
            low("tail"),
            Token::Bracket("acc".into()),
            Token::Code("b".into()),
            Token::Pipe,
            Token::Eps,
            Token::Code("c".into()),
            Token::Semi,
        ]);
        let Item::Rule(rule) = &items[0] else {
            panic!("expected a rule, got {:?}", items);
        };
        assert_eq!(rule.name(), "tail");
        assert_eq!(rule.arguments(), &[Binding::new("acc", "i64")]);
        assert_eq!(rule.returns(), &Binding::new("res", "i64"));
        assert_eq!(rule.alternatives().len(), 2);

        let alt = &rule.alternatives()[0];
        assert_eq!(alt.init().map(ActionCode::as_str), Some("init"));
        let atoms = alt.atoms();
        assert_eq!(atoms.len(), 3);
        assert_eq!((atoms[0].binding(), atoms[0].name()), ("_", "PLUS"));
        assert!(atoms[0].action().is_none());
        assert_eq!((atoms[1].binding(), atoms[1].name()), ("n", "NUM"));
        assert_eq!(atoms[1].action().map(ActionCode::as_str), Some("a"));
        assert_eq!(
            atoms[2].kind(),
            &AtomKind::NonTerminal {
                params: vec!["acc".into()]
            }
        );
        assert_eq!(atoms[2].binding(), "t");

        assert_eq!(
            rule.alternatives()[1],
            Alternative::Epsilon {
                init: None,
                code: Some(ActionCode::new("c")),
            }
        );
    }

    #[test]
    fn unbound_non_terminal_atom() {
        // s returns [r: ()] : a b ;
        let items = parse(&[
            low("s"),
            Token::Returns,
            Token::Bracket("r: ()".into()),
            Token::Colon,
            low("a"),
            low("b"),
            Token::Semi,
        ]);
        let Item::Rule(rule) = &items[0] else {
            panic!("expected a rule");
        };
        let atoms = rule.alternatives()[0].atoms();
        assert_eq!(atoms.len(), 2);
        assert_eq!((atoms[0].binding(), atoms[0].name()), ("_", "a"));
        assert_eq!((atoms[1].binding(), atoms[1].name()), ("_", "b"));
        assert!(!atoms[0].is_terminal());
    }

    #[test]
    fn rejects_missing_return_binding() {
        let tokens = [
            low("s"),
            Token::Returns,
            Token::Bracket("".into()),
            Token::Colon,
            Token::Eps,
            Token::Semi,
        ];
        let errs = parser().parse(&tokens[..]).into_result().unwrap_err();
        assert!(errs[0].to_string().contains("must return exactly one"));
    }

    #[test]
    fn rejects_missing_semicolon() {
        let tokens = [Token::Start, low("s")];
        assert!(parser().parse(&tokens[..]).has_errors());
    }
}
