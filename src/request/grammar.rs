//! Grammar for war requests.
//!
//! ```text
//! request := ("word" "war" | "wordwar") ["for"] NUMBER [unit] [when]
//! unit    := "m" | "min" | "mins" | "minute" | "minutes"
//! when    := "in" NUMBER [unit]
//!          | "at" NUMBER [":" NUMBER]
//!          | "now"
//! ```
//!
//! Anything left over after a complete match is rejected.

use super::resolver::TimeSpec;
use super::token::{tokenize, Token};
use crate::error::WarError;
use crate::Result;

/// A parsed request to start a war.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarRequest {
    /// Writing phase length in minutes.
    pub duration: u32,
    /// When to start; `None` means the configured default countdown.
    pub time: Option<TimeSpec>,
}

const UNITS: &[&str] = &["m", "min", "mins", "minute", "minutes"];

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

impl Parser {
    fn new(input: &str) -> Result<Self> {
        Ok(Self {
            tokens: tokenize(input)?,
            pos: 0,
        })
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn eat_word(&mut self, word: &str) -> bool {
        match self.peek() {
            Some(Token::Word(w)) if w == word => {
                self.pos += 1;
                true
            }
            _ => false,
        }
    }

    fn expect_word(&mut self, word: &str) -> Result<()> {
        if self.eat_word(word) {
            Ok(())
        } else {
            Err(self.unexpected(&format!("'{}'", word)))
        }
    }

    fn expect_number(&mut self, what: &str) -> Result<u32> {
        match self.peek() {
            Some(Token::Number(n)) => {
                let n = *n;
                self.pos += 1;
                Ok(n)
            }
            _ => Err(self.unexpected(what)),
        }
    }

    fn skip_unit(&mut self) {
        if let Some(Token::Word(w)) = self.peek() {
            if UNITS.contains(&w.as_str()) {
                self.pos += 1;
            }
        }
    }

    fn header(&mut self) -> Result<()> {
        if self.eat_word("wordwar") {
            return Ok(());
        }
        self.expect_word("word")?;
        self.expect_word("war")
    }

    fn when(&mut self) -> Result<Option<TimeSpec>> {
        if self.eat_word("in") {
            let countdown = self.expect_number("a number of minutes")?;
            self.skip_unit();
            return Ok(Some(TimeSpec::Relative(countdown)));
        }

        if self.eat_word("at") {
            let hour = self.expect_number("an hour")?;
            let minute = if matches!(self.peek(), Some(Token::Colon)) {
                self.pos += 1;
                self.expect_number("minutes after ':'")?
            } else {
                0
            };
            if hour > 23 || minute > 59 {
                return Err(WarError::Unparseable(format!(
                    "{}:{:02} is not a time of day",
                    hour, minute
                )));
            }
            return Ok(Some(TimeSpec::Clock { hour, minute }));
        }

        if self.eat_word("now") {
            return Ok(Some(TimeSpec::Immediate));
        }

        match self.peek() {
            None => Ok(None),
            Some(_) => Err(self.unexpected("'in', 'at' or 'now'")),
        }
    }

    fn finish(&self) -> Result<()> {
        match self.peek() {
            None => Ok(()),
            Some(token) => Err(WarError::Unparseable(format!(
                "unexpected {} at the end",
                token
            ))),
        }
    }

    fn unexpected(&self, expected: &str) -> WarError {
        match self.peek() {
            Some(token) => WarError::Unparseable(format!("expected {}, found {}", expected, token)),
            None => WarError::Unparseable(format!("expected {}", expected)),
        }
    }
}

/// Parse a full war request such as `word war for 20 minutes in 5`.
pub fn parse_war_request(input: &str) -> Result<WarRequest> {
    let mut parser = Parser::new(input)?;

    parser.header()?;
    parser.eat_word("for");
    let duration = parser.expect_number("a duration")?;
    parser.skip_unit();
    let time = parser.when()?;
    parser.finish()?;

    Ok(WarRequest { duration, time })
}

/// Parse only the start-time part, e.g. `in 5`, `at 3:15` or `now`.
///
/// An empty phrase means "use the default".
pub fn parse_time_spec(input: &str) -> Result<Option<TimeSpec>> {
    let mut parser = Parser::new(input)?;
    let time = parser.when()?;
    parser.finish()?;
    Ok(time)
}
