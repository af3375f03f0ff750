//! Names of generated files and types.
use anyhow::{Result, bail};
use once_cell::sync::Lazy;
use regex::Regex;

static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]*$").unwrap());

pub(crate) fn capitalize_first(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + c.as_str(),
    }
}

/// `calc_expr` -> `CalcExpr`; already capitalised words are kept.
pub(crate) fn to_pascal_case(s: &str) -> String {
    s.split('_').map(capitalize_first).collect()
}

/// `CalcExpr` -> `calc_expr`.
pub(crate) fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let mut prev_lower = false;
    for c in s.chars() {
        if c.is_uppercase() {
            if prev_lower {
                out.push('_');
            }
            out.extend(c.to_lowercase());
            prev_lower = false;
        } else {
            out.push(c);
            prev_lower = c.is_lowercase() || c.is_ascii_digit();
        }
    }
    out
}

/// Type and file names derived from a grammar name such as `calc` or `Calc`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Names {
    ty: String,
    file: String,
}

impl Names {
    pub fn new(name: &str) -> Result<Self> {
        if !NAME_RE.is_match(name) {
            bail!("invalid grammar name {:?}: expected an identifier starting with a letter", name);
        }
        let ty = to_pascal_case(name);
        let file = to_snake_case(&ty);
        Ok(Self { ty, file })
    }

    /// `Calc`
    pub fn prefix(&self) -> &str {
        &self.ty
    }

    pub fn tokens_enum(&self) -> String {
        format!("{}Tokens", self.ty)
    }

    pub fn token_struct(&self) -> String {
        format!("{}Token", self.ty)
    }

    pub fn lexer_struct(&self) -> String {
        format!("{}Lexer", self.ty)
    }

    pub fn parser_struct(&self) -> String {
        format!("{}Parser", self.ty)
    }

    /// `calc_tokens`; artifacts refer to each other as `super::<module>`.
    pub fn tokens_module(&self) -> String {
        format!("{}_tokens", self.file)
    }

    pub fn lexer_module(&self) -> String {
        format!("{}_lexer", self.file)
    }

    pub fn parser_module(&self) -> String {
        format!("{}_parser", self.file)
    }

    pub fn tokens_file(&self) -> String {
        format!("{}.rs", self.tokens_module())
    }

    pub fn lexer_file(&self) -> String {
        format!("{}.rs", self.lexer_module())
    }

    pub fn parser_file(&self) -> String {
        format!("{}.rs", self.parser_module())
    }
}
