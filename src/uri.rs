//! Relative reference resolution against a timemap or resource URI.

use url::{ParseError, Url};

use crate::{Error, Result};

/// Parse the URI that relative link targets are resolved against
pub(crate) fn parse_base(base_uri: &str) -> Result<Url> {
    Url::parse(base_uri).map_err(|source| Error::InvalidUri {
        uri: base_uri.to_owned(),
        source,
    })
}

/// Resolve `reference` against `base`.
///
/// Absolute references are returned verbatim, so `http://a.example.org` does
/// not pick up the trailing slash a round-trip through [`Url`] would add.
pub(crate) fn resolve(base: &Url, reference: &str) -> Result<String> {
    let invalid = |source| Error::InvalidUri {
        uri: reference.to_owned(),
        source,
    };
    match Url::parse(reference) {
        Ok(_) => Ok(reference.to_owned()),
        Err(ParseError::RelativeUrlWithoutBase) => {
            base.join(reference).map(String::from).map_err(invalid)
        }
        Err(source) => Err(invalid(source)),
    }
}
