use serde::Deserialize;
use std::time::Duration;

use crate::Result;

/// The media type requested when dereferencing a URI-T
pub const LINK_FORMAT_ACCEPT: &str = "application/link-format;q=1.0";

/// Settings for every request this crate issues.
///
/// All fields have defaults, so a partial (or empty) document deserializes:
///
/// ```
/// let config: memento_links::ClientConfig = serde_json::from_str(r#"{"timeout": 5}"#).unwrap();
/// assert_eq!(config.timeout().as_secs(), 5);
/// assert_eq!(config.accept, memento_links::LINK_FORMAT_ACCEPT);
/// ```
#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
#[serde(default)]
pub struct ClientConfig {
    /// Request timeout in seconds, covering connect and body
    #[serde(rename = "timeout")]
    pub timeout_secs: u64,
    pub user_agent: String,
    /// `Accept` header sent with timemap requests
    pub accept: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!("memento-links/", env!("CARGO_PKG_VERSION")).to_owned(),
            accept: LINK_FORMAT_ACCEPT.to_owned(),
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn client_builder(&self) -> reqwest::ClientBuilder {
        reqwest::Client::builder()
            .timeout(self.timeout())
            .user_agent(self.user_agent.as_str())
    }

    /// Build an HTTP client honoring the timeout and user agent
    pub fn http_client(&self) -> Result<reqwest::Client> {
        Ok(self.client_builder().build()?)
    }

    /// Like [`Self::http_client`], but redirects are returned instead of
    /// followed, so a TimeGate's own `Link` header is the one that is read.
    pub fn head_client(&self) -> Result<reqwest::Client> {
        let client = self
            .client_builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.timeout(), Duration::from_secs(30));
        assert!(config.user_agent.starts_with("memento-links/"));
        assert_eq!(config.accept, LINK_FORMAT_ACCEPT);
    }

    #[test]
    fn empty_document_uses_defaults() {
        let config: ClientConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn overrides() {
        let config: ClientConfig = serde_json::from_str(
            r#"{"timeout": 2, "user_agent": "archiver/1.0", "accept": "application/link-format"}"#,
        )
        .unwrap();
        assert_eq!(config.timeout_secs, 2);
        assert_eq!(config.user_agent, "archiver/1.0");
        assert_eq!(config.accept, "application/link-format");
    }

    #[test]
    fn client_builds() {
        assert!(ClientConfig::default().http_client().is_ok());
        assert!(ClientConfig::default().head_client().is_ok());
    }
}
