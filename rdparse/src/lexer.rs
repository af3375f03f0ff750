//! Anchored tokenizer engine driven by generated lexers.
//!
//! A generated lexer hands [`Tokenizer::new`] its skip patterns and its token
//! rules, both in declaration order, and forwards `next_token` calls to it.
//! Each request:
//!
//! 1. strips leading skip matches (first skip pattern with a non-empty match
//!    wins) until none matches,
//! 2. returns the end-of-input kind if nothing remains,
//! 3. otherwise returns the first token rule with a non-empty anchored match,
//! 4. or fails with a [`LexicalError`] carrying the unmatched remainder.
//!
//! Patterns are compiled as `^(?:pattern)` and matched against the remaining
//! input, so adjacent tokens need no separating skip text.
use crate::{LexicalError, TokenData};
use regex::Regex;
use std::fmt::Debug;

/// Counters describing the work done by a [`Tokenizer`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenizerStats {
    /// Tokens returned, including end-of-input tokens.
    pub tokens: usize,
    /// Skip matches stripped.
    pub skipped: usize,
}

#[derive(Debug)]
struct TokenRule<K> {
    kind: K,
    name: &'static str,
    regex: Regex,
}

/// Declaration-ordered, anchored-prefix tokenizer over an owned input string.
#[derive(Debug)]
pub struct Tokenizer<K> {
    input: String,
    pos: usize,
    skips: Vec<Regex>,
    rules: Vec<TokenRule<K>>,
    end: K,
    stats: TokenizerStats,
}

fn anchored(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{})", pattern))
}

impl<K> Tokenizer<K>
where
    K: Copy + Debug,
{
    /// Compiles the skip patterns and token rules for `input`.
    ///
    /// `rules` holds `(kind, rule name, pattern)` triples; `end` is the kind
    /// returned once the input is exhausted.
    pub fn new(
        input: impl Into<String>,
        skips: &[&str],
        rules: &[(K, &'static str, &str)],
        end: K,
    ) -> Result<Self, regex::Error> {
        let skips = skips
            .iter()
            .map(|pattern| anchored(pattern))
            .collect::<Result<Vec<_>, _>>()?;
        let rules = rules
            .iter()
            .map(|&(kind, name, pattern)| {
                Ok(TokenRule {
                    kind,
                    name,
                    regex: anchored(pattern)?,
                })
            })
            .collect::<Result<Vec<_>, regex::Error>>()?;
        Ok(Self {
            input: input.into(),
            pos: 0,
            skips,
            rules,
            end,
            stats: TokenizerStats::default(),
        })
    }

    /// Input not consumed yet.
    #[inline]
    pub fn remainder(&self) -> &str {
        &self.input[self.pos..]
    }

    /// Byte offset of the first unconsumed byte.
    #[inline]
    pub fn offset(&self) -> usize {
        self.pos
    }

    pub fn stats(&self) -> TokenizerStats {
        self.stats.clone()
    }

    fn skip_len(&self) -> Option<usize> {
        let rest = self.remainder();
        self.skips
            .iter()
            .filter_map(|re| re.find(rest))
            .map(|m| m.end())
            .find(|&len| len > 0)
    }

    /// Produces the next token, or the end-of-input kind once the input is exhausted.
    pub fn next_token(&mut self) -> Result<(K, TokenData), LexicalError> {
        while let Some(len) = self.skip_len() {
            log::trace!("SKIP: offset={}, len={}", self.pos, len);
            self.pos += len;
            self.stats.skipped += 1;
        }

        let rest = self.remainder();
        if rest.is_empty() {
            self.stats.tokens += 1;
            return Ok((self.end, TokenData::end(self.pos)));
        }

        let matched = self.rules.iter().find_map(|rule| {
            rule.regex
                .find(rest)
                .filter(|m| !m.is_empty())
                .map(|m| (rule.kind, rule.name, m.end()))
        });

        match matched {
            Some((kind, name, len)) => {
                let start = self.pos;
                let data = TokenData::new(name, &rest[..len], start);
                log::trace!("MATCHED: kind={:?}, offset={}, text={:?}", kind, start, &rest[..len]);
                self.pos += len;
                self.stats.tokens += 1;
                Ok((kind, data))
            }
            None => Err(LexicalError {
                offset: self.pos,
                remainder: rest.to_owned(),
            }),
        }
    }
}
