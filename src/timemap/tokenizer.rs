//! Lexer for the link format.
//!
//! Each line is scanned for the three token shapes in priority order:
//! a bracketed target `<...>`, an attribute `name="value"`, or one of the
//! separators `;` and `,`. Text between tokens that matches none of these
//! is dropped, as is whitespace after a token. Tokens never span lines.
//!
//! `Link` headers are looser than timemaps: RFC 8288 lets a parameter value
//! be a bare token (`rel=timegate`). [`Tokenizer::lenient`] accepts those as
//! attributes too; timemap bodies keep the quoted-only grammar.

use once_cell::sync::Lazy;
use regex_lite::Regex;
use std::{collections::VecDeque, fmt};

use crate::Result;

static TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:<([^>]+)>|([a-zA-Z]+)="([^"]*)"|([;,]))\s*"#).expect("valid token regex")
});

// same groups as TOKEN_RE, plus an unquoted `name=token` as groups 5 and 6
static LENIENT_TOKEN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?:<([^>]+)>|([a-zA-Z]+)="([^"]*)"|([;,])|([a-zA-Z]+)=([^;,\s"]+))\s*"#)
        .expect("valid lenient token regex")
});

/// A lexical token of the link format
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Token {
    /// The target of a link, with the angle brackets stripped
    Uri(String),
    /// A `name="value"` parameter, with the quotes stripped
    Attribute { name: String, value: String },
    Semicolon,
    Comma,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uri(uri) => write!(f, "<{uri}>"),
            Self::Attribute { name, value } => write!(f, "{name}=\"{value}\""),
            Self::Semicolon => write!(f, ";"),
            Self::Comma => write!(f, ","),
        }
    }
}

/// Lazy token stream over a sequence of lines
pub struct Tokenizer<L> {
    lines: L,
    pattern: &'static Regex,
    pending: VecDeque<Token>,
}

impl<L> Tokenizer<L>
where
    L: Iterator<Item = Result<String>>,
{
    pub fn new(lines: L) -> Self {
        Self::with_pattern(lines, &TOKEN_RE)
    }

    /// Also accept unquoted `name=token` parameters, as found in `Link` headers
    pub fn lenient(lines: L) -> Self {
        Self::with_pattern(lines, &LENIENT_TOKEN_RE)
    }

    fn with_pattern(lines: L, pattern: &'static Regex) -> Self {
        Self {
            lines,
            pattern,
            pending: VecDeque::new(),
        }
    }

    fn scan(&mut self, line: &str) {
        for caps in self.pattern.captures_iter(line) {
            let token = if let Some(uri) = caps.get(1) {
                Token::Uri(uri.as_str().to_owned())
            } else if let (Some(name), Some(value)) = (caps.get(2), caps.get(3)) {
                Token::Attribute {
                    name: name.as_str().to_owned(),
                    value: value.as_str().to_owned(),
                }
            } else if let (Some(name), Some(value)) = (caps.get(5), caps.get(6)) {
                Token::Attribute {
                    name: name.as_str().to_owned(),
                    value: value.as_str().to_owned(),
                }
            } else if caps.get(4).map(|m| m.as_str()) == Some(";") {
                Token::Semicolon
            } else {
                Token::Comma
            };
            self.pending.push_back(token);
        }
    }
}

impl<L> Iterator for Tokenizer<L>
where
    L: Iterator<Item = Result<String>>,
{
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(token) = self.pending.pop_front() {
                return Some(Ok(token));
            }
            match self.lines.next()? {
                Ok(line) => self.scan(&line),
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

/// Tokenize an in-memory string
pub fn tokenize(text: &str) -> Tokenizer<impl Iterator<Item = Result<String>> + '_> {
    Tokenizer::new(text.lines().map(|line| Ok(line.to_owned())))
}

/// Tokenize a `Link` header value, accepting unquoted parameters
pub fn tokenize_header(value: &str) -> Tokenizer<impl Iterator<Item = Result<String>> + '_> {
    Tokenizer::lenient(value.lines().map(|line| Ok(line.to_owned())))
}
