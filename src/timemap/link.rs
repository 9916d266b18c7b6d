//! Assembles tokens into one [`LinkRecord`] per comma-delimited link.

use chrono::{DateTime, FixedOffset, Utc};
use std::collections::BTreeSet;
use tracing::{trace, warn};

use super::tokenizer::Token;
use crate::{
    datetime::{normalize, parse_datetime},
    Error, Result,
};

/// One link entry with its recognized parameters
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct LinkRecord {
    /// The link target as written, not yet resolved
    pub uri: String,
    pub rels: BTreeSet<String>,
    /// `datetime`, normalized against `uri`
    pub datetime: Option<DateTime<Utc>>,
    pub mime_type: Option<String>,
    pub license: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl LinkRecord {
    pub fn has_rel(&self, rel: &str) -> bool {
        self.rels.contains(rel)
    }
}

/// How to treat attributes the grammar does not name
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Mode {
    /// Timemaps: any unknown attribute is an [`Error::UnexpectedToken`]
    Strict,
    /// `Link` headers: unknown attributes (`title`, `anchor`, ...) are skipped
    Lenient,
}

/// Fields collected for the entry currently being read
#[derive(Default)]
struct Pending {
    uri: Option<String>,
    rels: BTreeSet<String>,
    datetime: Option<DateTime<FixedOffset>>,
    from: Option<DateTime<FixedOffset>>,
    until: Option<DateTime<FixedOffset>>,
    mime_type: Option<String>,
    license: Option<String>,
    touched: bool,
}

fn parse_attribute(attribute: &'static str, value: &str) -> Result<DateTime<FixedOffset>> {
    parse_datetime(value).ok_or_else(|| Error::InvalidDatetime {
        attribute,
        value: value.to_owned(),
    })
}

impl Pending {
    fn apply(&mut self, name: String, value: String, mode: Mode) -> Result<()> {
        self.touched = true;
        match name.as_str() {
            "datetime" => self.datetime = Some(parse_attribute("datetime", &value)?),
            "from" => self.from = Some(parse_attribute("from", &value)?),
            "until" => self.until = Some(parse_attribute("until", &value)?),
            "rel" => self.rels = value.split_whitespace().map(str::to_owned).collect(),
            "type" => self.mime_type = Some(value),
            "license" => self.license = Some(value),
            _ if mode == Mode::Lenient => trace!(%name, "skipping link parameter"),
            _ => {
                return Err(Error::UnexpectedToken {
                    token: Token::Attribute { name, value }.to_string(),
                });
            }
        }
        Ok(())
    }

    fn finish(self, with_interval: bool) -> Option<LinkRecord> {
        let uri = match self.uri {
            Some(uri) => uri,
            None => {
                if self.touched {
                    warn!(rels = ?self.rels, "skipping link without a target");
                }
                return None;
            }
        };
        let (from, until) = if with_interval {
            (normalize(self.from, None), normalize(self.until, None))
        } else {
            (None, None)
        };
        Some(LinkRecord {
            datetime: normalize(self.datetime, Some(&uri)),
            uri,
            rels: self.rels,
            mime_type: self.mime_type,
            license: self.license,
            from,
            until,
        })
    }
}

/// Pull-based stream of link records over a token stream.
///
/// Records are flushed on every `,`; a trailing entry without a final
/// comma is flushed at the end of input without its `from`/`until`.
/// After the first error the stream is exhausted.
pub struct LinkStream<T> {
    tokens: T,
    mode: Mode,
    pending: Pending,
    done: bool,
}

impl<T> LinkStream<T>
where
    T: Iterator<Item = Result<Token>>,
{
    pub fn new(tokens: T, mode: Mode) -> Self {
        Self {
            tokens,
            mode,
            pending: Pending::default(),
            done: false,
        }
    }

    /// Shorthand for `LinkStream::new(tokens, Mode::Strict)`
    pub fn strict(tokens: T) -> Self {
        Self::new(tokens, Mode::Strict)
    }

    /// Shorthand for `LinkStream::new(tokens, Mode::Lenient)`
    pub fn lenient(tokens: T) -> Self {
        Self::new(tokens, Mode::Lenient)
    }

    fn fail(&mut self, error: Error) -> Option<Result<LinkRecord>> {
        self.done = true;
        Some(Err(error))
    }
}

impl<T> Iterator for LinkStream<T>
where
    T: Iterator<Item = Result<Token>>,
{
    type Item = Result<LinkRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        loop {
            let token = match self.tokens.next() {
                Some(Ok(token)) => token,
                Some(Err(e)) => return self.fail(e),
                None => {
                    self.done = true;
                    return std::mem::take(&mut self.pending).finish(false).map(Ok);
                }
            };
            match token {
                Token::Uri(uri) => self.pending.uri = Some(uri),
                Token::Attribute { name, value } => {
                    if let Err(e) = self.pending.apply(name, value, self.mode) {
                        return self.fail(e);
                    }
                }
                Token::Semicolon => {}
                Token::Comma => {
                    if let Some(record) = std::mem::take(&mut self.pending).finish(true) {
                        return Some(Ok(record));
                    }
                }
            }
        }
    }
}
