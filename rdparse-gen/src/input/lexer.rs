//! Lexer for grammar description files.
//!
//! Built on [`logos`]. Action blocks (`{ ... }`) and bracket blocks
//! (`[ ... ]`) are captured whole by callbacks that scan for the balancing
//! delimiter, so their contents never need to be valid grammar syntax.
use logos::Logos;
use std::fmt;
use std::ops::Range;

/// Tokens of the grammar description language.
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    /// A comment running to the end of the line (`-- ...`).
    #[regex(r"--[^\n]*")]
    Comment,

    #[token("header")]
    Header,

    #[token("token")]
    TokenKw,

    #[token("skip")]
    Skip,

    #[token("start")]
    Start,

    #[token("returns")]
    Returns,

    #[token("eps")]
    Eps,

    /// A token name (e.g. `NUM`).
    #[regex(r"[A-Z][A-Za-z0-9_]*", |lex| lex.slice().to_owned())]
    Upper(String),

    /// A rule or binding name (e.g. `expr`, `_`).
    #[regex(r"[a-z_][A-Za-z0-9_]*", |lex| lex.slice().to_owned())]
    Lower(String),

    /// A quoted pattern with `\"` already unescaped.
    #[regex(r#""([^"\\]|\\.)*""#, pattern)]
    Pattern(String),

    /// The inside of a `{ ... }` block, verbatim.
    #[token("{", code_block)]
    Code(String),

    /// The inside of a `[ ... ]` block, verbatim.
    #[token("[", bracket_block)]
    Bracket(String),

    #[token("=")]
    Eq,

    #[token(";")]
    Semi,

    #[token(",")]
    Comma,

    #[token("|")]
    Pipe,

    #[token(":")]
    Colon,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Comment => write!(f, "comment"),
            Token::Header => write!(f, "`header`"),
            Token::TokenKw => write!(f, "`token`"),
            Token::Skip => write!(f, "`skip`"),
            Token::Start => write!(f, "`start`"),
            Token::Returns => write!(f, "`returns`"),
            Token::Eps => write!(f, "`eps`"),
            Token::Upper(name) | Token::Lower(name) => write!(f, "`{}`", name),
            Token::Pattern(p) => write!(f, "pattern {:?}", p),
            Token::Code(_) => write!(f, "action block"),
            Token::Bracket(_) => write!(f, "bracket block"),
            Token::Eq => write!(f, "`=`"),
            Token::Semi => write!(f, "`;`"),
            Token::Comma => write!(f, "`,`"),
            Token::Pipe => write!(f, "`|`"),
            Token::Colon => write!(f, "`:`"),
        }
    }
}

fn pattern(lex: &mut logos::Lexer<Token>) -> String {
    let slice = lex.slice();
    let inner = &slice[1..slice.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            match chars.next() {
                Some('"') => out.push('"'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Length of a string literal starting at `b[i] == b'"'`, escapes included.
fn string_len(b: &[u8], i: usize) -> Option<usize> {
    let mut j = i + 1;
    while j < b.len() {
        match b[j] {
            b'\\' => j += 2,
            b'"' => return Some(j + 1 - i),
            _ => j += 1,
        }
    }
    None
}

/// Length of a char literal at `b[i] == b'\''`, or `None` for a lifetime.
fn char_len(b: &[u8], i: usize) -> Option<usize> {
    if b.get(i + 1) == Some(&b'\\') {
        let close = b[i + 2..].iter().take(12).position(|&c| c == b'\'')?;
        return Some(close + 3);
    }
    if b.get(i + 2) == Some(&b'\'') {
        return Some(3);
    }
    None
}

/// Finds the byte index of the delimiter closing an already consumed `open`.
///
/// String literals, char literals and `//` comments are skipped.
pub(crate) fn balanced(rest: &str, open: u8, close: u8) -> Option<usize> {
    let b = rest.as_bytes();
    let mut depth = 1usize;
    let mut i = 0;
    while i < b.len() {
        match b[i] {
            b'"' => {
                i += string_len(b, i)?;
                continue;
            }
            b'\'' => {
                i += char_len(b, i).unwrap_or(1);
                continue;
            }
            b'/' if b.get(i + 1) == Some(&b'/') => {
                i += b[i..].iter().position(|&c| c == b'\n').unwrap_or(b.len() - i);
                continue;
            }
            c if c == open => depth += 1,
            c if c == close => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
        i += 1;
    }
    None
}

fn code_block(lex: &mut logos::Lexer<Token>) -> Option<String> {
    let end = balanced(lex.remainder(), b'{', b'}')?;
    let inner = lex.remainder()[..end].to_owned();
    lex.bump(end + 1);
    Some(inner)
}

fn bracket_block(lex: &mut logos::Lexer<Token>) -> Option<String> {
    let end = balanced(lex.remainder(), b'[', b']')?;
    let inner = lex.remainder()[..end].to_owned();
    lex.bump(end + 1);
    Some(inner)
}

/// Token stream of a grammar description, with byte spans.
#[derive(Debug, Default)]
pub struct Tokens {
    pub tokens: Vec<Token>,
    pub spans: Vec<Range<usize>>,
}

impl Tokens {
    /// Byte offset of token `index`, or `len` past the last token.
    pub fn offset(&self, index: usize, len: usize) -> usize {
        self.spans.get(index).map(|s| s.start).unwrap_or(len)
    }
}

/// Tokenizes `src`, dropping comments.
///
/// Returns the byte offset of the first character no token matches, or of an
/// unterminated block or string.
pub fn tokenize(src: &str) -> Result<Tokens, usize> {
    let mut out = Tokens::default();
    let mut lex = Token::lexer(src);
    while let Some(tok) = lex.next() {
        match tok {
            Ok(Token::Comment) => continue,
            Ok(tok) => {
                out.tokens.push(tok);
                out.spans.push(lex.span());
            }
            Err(()) => return Err(lex.span().start),
        }
    }
    Ok(out)
}
