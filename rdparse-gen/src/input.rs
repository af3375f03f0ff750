//! Textual grammar descriptions.
//!
//! A description is a sequence of declarations:
//!
//! ```text
//! -- comment to end of line
//! header { use rdparse::ParseError; }
//! token NUM = "[0-9]+";
//! token PLUS = "\+";
//! token WS = "\s+";
//! skip WS;
//! start expr;
//!
//! expr returns [res: i64]
//!     : n=NUM { let acc: i64 = n.text.parse().map_err(ParseError::action)?; }
//!       t=tail[acc] { res = t; }
//!     ;
//!
//! tail[acc: i64] returns [res: i64]
//!     : PLUS n=NUM { let acc = acc + n.text.parse::<i64>().map_err(ParseError::action)?; }
//!       t=tail[acc] { res = t; }
//!     | eps { res = acc; }
//!     ;
//! ```
//!
//! [`parse_grammar`] tokenizes the text with a [`logos`] lexer, parses it
//! with [`chumsky`] and hands the pieces to [`Grammar::new`] for validation.
mod lexer;
mod parser;

use crate::grammar::Grammar;
use anyhow::{Context, Result, anyhow, bail};
use chumsky::Parser;
use parser::Item;

/// Parses and validates a grammar description.
pub fn parse_grammar(src: &str) -> Result<Grammar> {
    let toks = lexer::tokenize(src)
        .map_err(|offset| anyhow!("invalid grammar syntax at offset {}", offset))?;
    log::debug!("grammar description: {} tokens", toks.tokens.len());

    let items = parser::parser()
        .parse(&toks.tokens[..])
        .into_result()
        .map_err(|errs| match errs.first() {
            Some(err) => anyhow!(
                "grammar syntax error at offset {}: {}",
                toks.offset(err.span().start, src.len()),
                err
            ),
            None => anyhow!("grammar syntax error"),
        })?;

    let mut header = None;
    let mut start = None;
    let mut token_rules = Vec::new();
    let mut skip_names = Vec::new();
    let mut parser_rules = Vec::new();
    for item in items {
        match item {
            Item::Header(text) => {
                if header.replace(text).is_some() {
                    bail!("more than one `header` block");
                }
            }
            Item::Start(name) => {
                if start.replace(name).is_some() {
                    bail!("more than one `start` declaration");
                }
            }
            Item::Token(rule) => token_rules.push(rule),
            Item::Skip(names) => skip_names.extend(names),
            Item::Rule(rule) => parser_rules.push(rule),
        }
    }
    let start = start.context("missing `start` declaration")?;

    let grammar = Grammar::new(
        header.unwrap_or_default().trim(),
        token_rules,
        skip_names,
        &start,
        parser_rules,
    )?;
    Ok(grammar)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GrammarError;

    const SUM: &str = r#"
        -- sums of integers
        header { use rdparse::ParseError; }
        token NUM = "[0-9]+";
        token PLUS = "\+";
        token WS = "\s+";
        skip WS;
        start expr;

        expr returns [res: i64]
            : n=NUM { let acc: i64 = n.text.parse().map_err(ParseError::action)?; }
              t=tail[acc] { res = t; }
            ;

        tail[acc: i64] returns [res: i64]
            : PLUS n=NUM { let acc = acc + n.text.parse::<i64>().map_err(ParseError::action)?; }
              t=tail[acc] { res = t; }
            | eps { res = acc; }
            ;
    "#;

    #[test]
    fn parses_sum_grammar() {
        let _ = env_logger::builder().is_test(true).try_init();
        let g = parse_grammar(SUM).unwrap();
        assert_eq!(g.header(), "use rdparse::ParseError;");
        assert_eq!(g.token_rules().len(), 3);
        assert_eq!(g.token_rules()[1].pattern(), r"\+");
        assert_eq!(g.skip_names(), &["WS".to_string()]);
        assert_eq!(g.start_rule().name(), "expr");
        let tail = g.rule("tail").unwrap();
        assert_eq!(tail.arguments()[0].ty(), "i64");
        assert_eq!(tail.alternatives().len(), 2);
        assert_eq!(
            tail.alternatives()[0].atoms()[1]
                .action()
                .map(|a| a.as_str().trim()),
            Some("let acc = acc + n.text.parse::<i64>().map_err(ParseError::action)?;")
        );
    }

    #[test]
    fn skip_lists_accumulate() {
        let src = r#"
            token A = "a"; token WS = " "; token NL = "\n";
            skip WS; skip NL;
            start s;
            s returns [r: ()] : A { r = (); } ;
        "#;
        let g = parse_grammar(src).unwrap();
        assert_eq!(g.skip_names(), &["WS".to_string(), "NL".to_string()]);
        assert_eq!(g.header(), "");
    }

    #[test]
    fn validation_errors_surface() {
        let src = r#"
            token A = "a";
            start s;
            s returns [r: ()] : B ;
        "#;
        let err = parse_grammar(src).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GrammarError>(),
            Some(GrammarError::UnknownSymbol { name, .. }) if name == "B"
        ));
    }

    #[test]
    fn missing_start_is_reported() {
        let err = parse_grammar(r#"token A = "a"; s returns [r: ()] : A ;"#).unwrap_err();
        assert!(err.to_string().contains("missing `start`"));
    }

    #[test]
    fn duplicate_start_is_reported() {
        let err = parse_grammar("start a; start b;").unwrap_err();
        assert!(err.to_string().contains("more than one `start`"));
    }

    #[test]
    fn syntax_errors_carry_offsets() {
        let err = parse_grammar("start s;\ntoken A \"a\";").unwrap_err();
        assert!(err.to_string().starts_with("grammar syntax error at offset"), "{}", err);

        let err = parse_grammar("start s; %").unwrap_err();
        assert_eq!(err.to_string(), "invalid grammar syntax at offset 9");
    }
}
