use std::{
    fmt,
    fs::File,
    io::{BufRead, BufReader},
    path::Path,
    str::FromStr,
};

use crate::{Error, Result};

/// Text encodings accepted for timemap files
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum TextEncoding {
    /// Strict UTF-8, invalid sequences are an error
    #[default]
    Utf8,
    /// ISO-8859-1, every byte maps to the code point of the same value
    Latin1,
}

impl TextEncoding {
    /// Decode a single line, returns `None` if the bytes are not valid
    pub fn decode(self, bytes: &[u8]) -> Option<String> {
        match self {
            Self::Utf8 => std::str::from_utf8(bytes).ok().map(str::to_owned),
            Self::Latin1 => Some(bytes.iter().copied().map(char::from).collect()),
        }
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Utf8 => write!(f, "UTF-8"),
            Self::Latin1 => write!(f, "ISO-8859-1"),
        }
    }
}

#[derive(Debug)]
pub struct UnknownEncodingError(String);

impl fmt::Display for UnknownEncodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown text encoding `{}`", self.0)
    }
}

impl std::error::Error for UnknownEncodingError {}

impl FromStr for TextEncoding {
    type Err = UnknownEncodingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Self::Utf8),
            "latin1" | "latin-1" | "iso-8859-1" | "iso8859-1" => Ok(Self::Latin1),
            _ => Err(UnknownEncodingError(s.to_owned())),
        }
    }
}

/// Lazily read and decode the lines of `path`
pub(crate) fn read_lines(
    path: &Path,
    encoding: TextEncoding,
) -> Result<impl Iterator<Item = Result<String>>> {
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_owned(),
        source,
    })?;
    let path = path.to_owned();
    let lines = BufReader::new(file)
        .split(b'\n')
        .enumerate()
        .map(move |(index, line)| {
            let bytes = line.map_err(|source| Error::Io {
                path: path.clone(),
                source,
            })?;
            encoding.decode(&bytes).ok_or(Error::Decode {
                encoding,
                line: index + 1,
            })
        });
    Ok(lines)
}
