//! Tokenizer for war request phrases.

use std::fmt;

use crate::error::WarError;
use crate::Result;

/// A lexical unit of a request phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Alphabetic run, lower-cased.
    Word(String),
    /// Unsigned decimal number.
    Number(u32),
    /// The `:` in a clock time.
    Colon,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Word(w) => write!(f, "'{}'", w),
            Token::Number(n) => write!(f, "{}", n),
            Token::Colon => f.write_str("':'"),
        }
    }
}

fn is_separator(c: char) -> bool {
    c.is_whitespace() || matches!(c, '-' | ',' | '.' | '!' | '?' | ';')
}

/// Split a phrase into tokens.
///
/// Whitespace, hyphens and sentence punctuation only separate tokens.
/// Any other character is an error.
pub fn tokenize(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, c)) = chars.peek() {
        if is_separator(c) {
            chars.next();
        } else if c == ':' {
            chars.next();
            tokens.push(Token::Colon);
        } else if c.is_ascii_digit() {
            let mut end = start;
            while let Some(&(i, d)) = chars.peek() {
                if !d.is_ascii_digit() {
                    break;
                }
                end = i + d.len_utf8();
                chars.next();
            }
            let digits = &input[start..end];
            let value = digits
                .parse()
                .map_err(|_| WarError::Unparseable(format!("number too large: {}", digits)))?;
            tokens.push(Token::Number(value));
        } else if c.is_alphabetic() {
            let mut word = String::new();
            while let Some(&(_, a)) = chars.peek() {
                if !a.is_alphabetic() {
                    break;
                }
                word.extend(a.to_lowercase());
                chars.next();
            }
            tokens.push(Token::Word(word));
        } else {
            return Err(WarError::Unparseable(format!("unexpected character {:?}", c)));
        }
    }

    Ok(tokens)
}
