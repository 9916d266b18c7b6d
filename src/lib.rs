//! # Client-side Memento (RFC 7089) parsing
//!
//! This library reads link-format [timemaps] into a [`Timemap`] and looks up
//! Memento relations (`original`, `timegate`, `timemap`) in the `Link`
//! headers of single resources. It also builds timemap and TimeGate URIs
//! for the Internet Archive's [Wayback Machine].
//!
//! [timemaps]: https://tools.ietf.org/html/rfc7089#section-5
//! [Wayback Machine]: http://web.archive.org/
//!
//! ## Usage
//!
//! ```
//! use memento_links::Timemap;
//!
//! let tm = Timemap::parse(r#"
//!     <http://a.example.org>;rel="original",
//!     <http://arxiv.example.net/timemap/http://a.example.org>
//!       ; rel="self";type="application/link-format"
//!       ; from="Tue, 20 Jun 2000 18:02:59 GMT"
//!       ; until="Wed, 09 Apr 2008 20:30:51 GMT",
//!     <http://arxiv.example.net/timegate/http://a.example.org>
//!       ; rel="timegate",
//!     <http://arxiv.example.net/web/20000620180259/http://a.example.org>
//!       ; rel="first memento";datetime="Tue, 20 Jun 2000 18:02:59 GMT"
//!       ; license="http://creativecommons.org/publicdomain/zero/1.0/",
//! "#, "http://arxiv.example.net/timemap/http://a.example.org").unwrap();
//!
//! assert_eq!(tm.original_uri.as_deref(), Some("http://a.example.org"));
//! assert_eq!(
//!     tm.self_link().unwrap().uri_t,
//!     "http://arxiv.example.net/timemap/http://a.example.org"
//! );
//! let first = tm.first_memento().unwrap();
//! assert!(first.rels.contains("first"));
//! assert!(tm.mementos_at(&first.datetime).unwrap().contains(first));
//! ```
//!
//! Network access (`Timemap::from_uri`, [`Resource`]) goes through
//! `reqwest` and is configured with a [`ClientConfig`].

mod config;
pub mod datetime;
mod encoding;
mod error;
pub mod resource;
pub mod timemap;
mod uri;
pub mod wayback;

pub use config::{ClientConfig, LINK_FORMAT_ACCEPT};
pub use encoding::{TextEncoding, UnknownEncodingError};
pub use error::{Error, Result};
pub use resource::Resource;
pub use timemap::{MementoLink, Timemap, TimemapLink};
