//! Relation lookup on a single resource (URI-R, URI-M or URI-G).
//!
//! The response headers of a `HEAD` request are fetched on first use and
//! cached until [`Resource::refresh`] is called.

use chrono::{DateTime, Utc};
use reqwest::header::{HeaderMap, LINK};
use tracing::{debug, warn};
use url::Url;

use crate::{
    datetime::{normalize, parse_datetime},
    timemap::{link::LinkStream, tokenizer::tokenize_header},
    uri, ClientConfig, Error, Result,
};

pub const MEMENTO_DATETIME: &str = "memento-datetime";

/// Find the target of the first `Link` entry with relation type `relation`.
///
/// Every `Link` header value is read with the timemap grammar in lenient
/// mode, which also admits unquoted parameters such as `rel=timegate`.
/// The target is resolved against `base_uri`. `Ok(None)` means the relation
/// is not advertised.
pub fn relation_from_headers(
    headers: &HeaderMap,
    base_uri: &str,
    relation: &str,
) -> Result<Option<String>> {
    let base = uri::parse_base(base_uri)?;
    for value in headers.get_all(LINK) {
        let value = match value.to_str() {
            Ok(value) => value,
            Err(_) => {
                warn!(base = base_uri, "skipping non-ASCII Link header");
                continue;
            }
        };
        for link in LinkStream::lenient(tokenize_header(value)) {
            let link = link?;
            if link.has_rel(relation) {
                return uri::resolve(&base, &link.uri).map(Some);
            }
        }
    }
    Ok(None)
}

/// Read the `Memento-Datetime` header, normalized to UTC
pub fn memento_datetime_from_headers(headers: &HeaderMap) -> Result<Option<DateTime<Utc>>> {
    let value = match headers.get(MEMENTO_DATETIME) {
        Some(value) => value,
        None => return Ok(None),
    };
    let invalid = || Error::InvalidDatetime {
        attribute: "Memento-Datetime",
        value: String::from_utf8_lossy(value.as_bytes()).into_owned(),
    };
    let raw = value.to_str().map_err(|_| invalid())?;
    let dt = parse_datetime(raw).ok_or_else(invalid)?;
    Ok(normalize(Some(dt), None))
}

/// A web resource whose headers advertise Memento relations
#[derive(Debug)]
pub struct Resource {
    uri: String,
    client: reqwest::Client,
    headers: Option<HeaderMap>,
}

impl Resource {
    pub fn new(uri: impl Into<String>, config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            uri: uri.into(),
            client: config.head_client()?,
            headers: None,
        })
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// The cached response headers, fetching them if necessary
    pub async fn headers(&mut self) -> Result<&HeaderMap> {
        let headers = match self.headers.take() {
            Some(headers) => headers,
            None => self.fetch_headers().await?,
        };
        Ok(&*self.headers.insert(headers))
    }

    /// Re-issue the request and replace the cached headers
    pub async fn refresh(&mut self) -> Result<&HeaderMap> {
        let headers = self.fetch_headers().await?;
        Ok(&*self.headers.insert(headers))
    }

    async fn fetch_headers(&self) -> Result<HeaderMap> {
        debug!(uri = %self.uri, "HEAD");
        let response = self.client.head(&self.uri).send().await?.error_for_status()?;
        Ok(response.headers().clone())
    }

    /// The target of the first `Link` entry with relation type `relation`
    pub async fn uri_for_relation(&mut self, relation: &str) -> Result<Option<String>> {
        let base = self.uri.clone();
        let headers = self.headers().await?;
        relation_from_headers(headers, &base, relation)
    }

    /// The URI-G advertised by this resource
    pub async fn timegate_uri(&mut self) -> Result<Option<String>> {
        self.uri_for_relation("timegate").await
    }

    /// The URI-T advertised by this resource
    pub async fn timemap_uri(&mut self) -> Result<Option<String>> {
        self.uri_for_relation("timemap").await
    }

    /// The URI-R advertised by this resource
    pub async fn original_uri(&mut self) -> Result<Option<String>> {
        self.uri_for_relation("original").await
    }

    /// Whether this resource is its own TimeGate
    pub async fn is_timegate(&mut self) -> Result<bool> {
        let own = uri::parse_base(&self.uri)?;
        let target = match self.timegate_uri().await? {
            Some(target) => target,
            None => return Ok(false),
        };
        let target = Url::parse(&target).map_err(|source| Error::InvalidUri {
            uri: target.clone(),
            source,
        })?;
        Ok(own == target)
    }

    /// The capture datetime of this resource, if it is a memento
    pub async fn memento_datetime(&mut self) -> Result<Option<DateTime<Utc>>> {
        memento_datetime_from_headers(self.headers().await?)
    }
}
