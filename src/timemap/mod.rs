//! Link-format timemaps (RFC 7089, section 5)
//!
//! A timemap is read in one forward pass: the [`tokenizer`] turns lines into
//! tokens, [`link::LinkStream`] assembles the tokens into link records and
//! [`Timemap::from_links`] classifies every record by its relation types.

pub mod link;
pub mod tokenizer;

use chrono::{DateTime, Utc};
use reqwest::header::ACCEPT;
use std::{
    collections::{BTreeMap, BTreeSet},
    path::Path,
};
use tracing::{debug, trace, warn};
use url::Url;

use self::{
    link::{LinkRecord, LinkStream},
    tokenizer::{tokenize, Tokenizer},
};
use crate::{encoding::read_lines, uri, ClientConfig, Error, Result, TextEncoding};

/// A memento (URI-M) listed in a timemap
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct MementoLink {
    /// The capture datetime, in UTC
    pub datetime: DateTime<Utc>,
    /// The absolute URI-M
    pub uri_m: String,
    /// Relation types other than `memento`, e.g. `first` or `last`
    pub rels: BTreeSet<String>,
    pub license_uri: Option<String>,
}

/// A timemap (URI-T) listed in a timemap, possibly the timemap itself
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TimemapLink {
    /// The absolute URI-T
    pub uri_t: String,
    pub from_datetime: Option<DateTime<Utc>>,
    pub until_datetime: Option<DateTime<Utc>>,
    /// The media type (`type` parameter), e.g. `application/link-format`
    pub mime_type: Option<String>,
    /// Whether the link carried the `self` relation
    pub is_self: bool,
}

/// A parsed timemap.
///
/// ```
/// use memento_links::Timemap;
///
/// let tm = Timemap::parse(
///     r#"<http://a.example.org>;rel="original",
///        </timegate/http://a.example.org>;rel="timegate",
///        </web/20000620180259/http://a.example.org>
///          ;rel="memento";datetime="Tue, 20 Jun 2000 00:00:00 GMT""#,
///     "http://arxiv.example.net/timemap/http://a.example.org",
/// ).unwrap();
///
/// assert_eq!(tm.original_uri.as_deref(), Some("http://a.example.org"));
/// assert_eq!(tm.timegate_uris, ["http://arxiv.example.net/timegate/http://a.example.org"]);
/// let memento = tm.first_memento().unwrap();
/// assert_eq!(memento.datetime.to_rfc3339(), "2000-06-20T18:02:59+00:00");
/// ```
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Timemap {
    /// The URI-R, if an `original` link was present
    pub original_uri: Option<String>,
    /// All URI-Gs in the order they were listed
    pub timegate_uris: Vec<String>,
    /// All timemap links; a `self` link, if any, comes first
    pub timemap_links: Vec<TimemapLink>,
    /// Mementos grouped by capture datetime
    pub mementos: BTreeMap<DateTime<Utc>, BTreeSet<MementoLink>>,
}

impl Timemap {
    /// Parse a timemap held in memory, resolving relative URIs against `base_uri`
    pub fn parse(text: &str, base_uri: &str) -> Result<Self> {
        Self::from_links(LinkStream::strict(tokenize(text)), base_uri)
    }

    /// Parse the timemap stored at `path`, resolving relative URIs against `base_uri`
    pub fn from_file(
        path: impl AsRef<Path>,
        base_uri: &str,
        encoding: TextEncoding,
    ) -> Result<Self> {
        let lines = read_lines(path.as_ref(), encoding)?;
        Self::from_links(LinkStream::strict(Tokenizer::new(lines)), base_uri)
    }

    /// Dereference `uri_t` and parse the representation, using `uri_t` as the base URI
    pub async fn from_uri(uri_t: &str, config: &ClientConfig) -> Result<Self> {
        debug!(uri = uri_t, "fetching timemap");
        let text = config
            .http_client()?
            .get(uri_t)
            .header(ACCEPT, config.accept.as_str())
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Self::parse(&text, uri_t)
    }

    /// Build a timemap from a stream of link records.
    ///
    /// The first error, from the stream or from resolving a URI, aborts the
    /// whole build.
    pub fn from_links<I>(links: I, base_uri: &str) -> Result<Self>
    where
        I: IntoIterator<Item = Result<LinkRecord>>,
    {
        let base = uri::parse_base(base_uri)?;
        let mut timemap = Self::default();
        for link in links {
            timemap.insert(link?, &base)?;
        }
        Ok(timemap)
    }

    fn insert(&mut self, link: LinkRecord, base: &Url) -> Result<()> {
        if link.has_rel("memento") {
            let datetime = match link.datetime {
                Some(datetime) => datetime,
                None => {
                    warn!(uri = %link.uri, "skipping memento without datetime");
                    return Ok(());
                }
            };
            let uri_m = uri::resolve(base, &link.uri)?;
            let mut rels = link.rels;
            rels.remove("memento");
            self.mementos.entry(datetime).or_default().insert(MementoLink {
                datetime,
                uri_m,
                rels,
                license_uri: link.license,
            });
        } else if link.has_rel("original") {
            self.original_uri = Some(uri::resolve(base, &link.uri)?);
        } else if link.has_rel("timegate") {
            self.timegate_uris.push(uri::resolve(base, &link.uri)?);
        } else if link.has_rel("timemap") || link.has_rel("self") {
            let is_self = link.has_rel("self");
            let timemap_link = TimemapLink {
                uri_t: uri::resolve(base, &link.uri)?,
                from_datetime: link.from,
                until_datetime: link.until,
                mime_type: link.mime_type,
                is_self,
            };
            if is_self {
                if self.self_link().is_some() {
                    debug!(uri = %timemap_link.uri_t, "replacing self link at the front");
                }
                self.timemap_links.insert(0, timemap_link);
            } else {
                self.timemap_links.push(timemap_link);
            }
        } else {
            trace!(uri = %link.uri, rels = ?link.rels, "dropping link with unknown relation");
        }
        Ok(())
    }

    /// The URI-Ms captured at exactly `datetime`
    pub fn mementos_at(&self, datetime: &DateTime<Utc>) -> Result<&BTreeSet<MementoLink>> {
        self.mementos
            .get(datetime)
            .ok_or(Error::MementoNotFound {
                datetime: *datetime,
            })
    }

    /// The timemap's own link, if one was tagged `self`
    pub fn self_link(&self) -> Option<&TimemapLink> {
        self.timemap_links.first().filter(|link| link.is_self)
    }

    /// All mementos, oldest first
    pub fn iter_mementos(&self) -> impl Iterator<Item = &MementoLink> + '_ {
        self.mementos.values().flatten()
    }

    /// All distinct capture datetimes, oldest first
    pub fn datetimes(&self) -> impl Iterator<Item = &DateTime<Utc>> + '_ {
        self.mementos.keys()
    }

    pub fn memento_count(&self) -> usize {
        self.mementos.values().map(BTreeSet::len).sum()
    }

    /// The oldest memento; ties are broken by URI-M
    pub fn first_memento(&self) -> Option<&MementoLink> {
        self.iter_mementos().next()
    }

    /// The newest memento; ties are broken by URI-M
    pub fn last_memento(&self) -> Option<&MementoLink> {
        self.mementos.values().next_back()?.iter().next_back()
    }
}
