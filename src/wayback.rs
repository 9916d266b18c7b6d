//! Memento endpoints of the Internet Archives' [Wayback Machine]
//!
//! [Wayback Machine]: http://web.archive.org/
use chrono::{DateTime, Utc};

use crate::{ClientConfig, Result, Timemap};

/// The base URL for the timemap of the Internet Archives' Wayback Machine
///
/// i.e. `https://web.archive.org/web/timemap/?`
pub const TIMEMAP_BASE: &str = "https://web.archive.org/web/timemap/?";

/// The prefix of TimeGate and memento URIs, i.e. `https://web.archive.org/web/`
pub const WEB_BASE: &str = "https://web.archive.org/web/";

/// The 14-digit timestamp used in wayback paths and query parameters
const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// The URI-G for `url`
///
/// ```
/// assert_eq!(
///     memento_links::wayback::timegate_uri("http://a.example.org"),
///     "https://web.archive.org/web/http://a.example.org"
/// );
/// ```
pub fn timegate_uri(url: &str) -> String {
    format!("{}{}", WEB_BASE, url)
}

/// The URI-M of the capture of `url` closest to `datetime`
pub fn memento_uri(url: &str, datetime: DateTime<Utc>) -> String {
    format!("{}{}/{}", WEB_BASE, datetime.format(TIMESTAMP_FORMAT), url)
}

/// A link-format timemap request
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use memento_links::wayback::TimemapRequest;
///
/// let uri = TimemapRequest::new("a.example.org/docs")
///     .match_prefix()
///     .from(Utc.with_ymd_and_hms(2000, 6, 20, 0, 0, 0).unwrap())
///     .to_uri();
/// assert_eq!(uri, "https://web.archive.org/web/timemap/\
/// ?url=a.example.org%2Fdocs\
/// &matchType=prefix\
/// &from=20000620000000\
/// &output=link");
/// ```
#[derive(Debug, Clone)]
pub struct TimemapRequest<'a> {
    /// URL
    url: &'a str,
    /// Match Type
    match_type: MatchType,
    /// Lower bound of the capture time
    from: Option<DateTime<Utc>>,
    /// Upper bound of the capture time
    until: Option<DateTime<Utc>>,
}

impl<'a> TimemapRequest<'a> {
    pub fn new(url: &'a str) -> Self {
        Self {
            url,
            match_type: MatchType::Exact,
            from: None,
            until: None,
        }
    }

    /// Set the match type of the request
    pub fn match_type(mut self, match_type: MatchType) -> Self {
        self.match_type = match_type;
        self
    }

    /// Shorthand for `match_type(MatchType::Prefix)`
    pub fn match_prefix(self) -> Self {
        self.match_type(MatchType::Prefix)
    }

    /// Only list captures at or after `datetime`
    pub fn from(mut self, datetime: DateTime<Utc>) -> Self {
        self.from = Some(datetime);
        self
    }

    /// Only list captures at or before `datetime`
    pub fn until(mut self, datetime: DateTime<Utc>) -> Self {
        self.until = Some(datetime);
        self
    }

    /// Return the URI-T that this request represents
    pub fn to_uri(&self) -> String {
        let mut url = TIMEMAP_BASE.to_string();
        url.push_str("url=");
        url.push_str(&urlencoding::encode(self.url));
        if let Some(match_type) = self.match_type.opt_static_str() {
            url.push_str("&matchType=");
            url.push_str(match_type);
        }
        if let Some(from) = self.from {
            url.push_str("&from=");
            url.push_str(&from.format(TIMESTAMP_FORMAT).to_string());
        }
        if let Some(until) = self.until {
            url.push_str("&to=");
            url.push_str(&until.format(TIMESTAMP_FORMAT).to_string());
        }
        url.push_str("&output=link");
        url
    }

    /// Dereference the URI-T and parse the timemap
    pub async fn fetch(&self, config: &ClientConfig) -> Result<Timemap> {
        Timemap::from_uri(&self.to_uri(), config).await
    }
}

/// How to match an entry to the `url` key of a request.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum MatchType {
    /// The result URL is must match the query exactly
    #[default]
    Exact,
    /// The result URL must start with the query
    Prefix,
}

impl MatchType {
    /// The query value, `None` for the server default
    pub fn opt_static_str(&self) -> Option<&'static str> {
        match self {
            Self::Exact => None,
            Self::Prefix => Some("prefix"),
        }
    }
}
