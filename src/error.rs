use chrono::{DateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;

use crate::TextEncoding;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Everything that can go wrong while reading timemaps or resource headers
#[derive(Debug, Error)]
pub enum Error {
    /// A token that none of the link-format productions accept
    #[error("Unexpected timemap token `{token}`")]
    UnexpectedToken { token: String },

    #[error("Invalid {attribute} value `{value}`")]
    InvalidDatetime { attribute: &'static str, value: String },

    /// A link target (or the base URI) that cannot be resolved
    #[error("Cannot resolve URI `{uri}`: {source}")]
    InvalidUri {
        uri: String,
        source: url::ParseError,
    },

    #[error("No mementos recorded for {datetime}")]
    MementoNotFound { datetime: DateTime<Utc> },

    #[error("Failed to read timemap {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Line {line} is not valid {encoding}")]
    Decode { encoding: TextEncoding, line: usize },

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
