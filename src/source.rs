//! Where manifests and tag definition files are read from.

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};

use crate::error::{TagPickError, TagPickResult};

/// A read-only text store addressed by relative paths.
#[async_trait]
pub trait TagSource: Send + Sync {
    async fn read_text(&self, path: &str) -> TagPickResult<String>;

    /// Human readable location, for logs.
    fn describe(&self) -> String;
}

/// Files under a local directory.
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl TagSource for FileSource {
    async fn read_text(&self, path: &str) -> TagPickResult<String> {
        let full = self.root.join(path);
        tokio::fs::read_to_string(&full)
            .await
            .map_err(|e| TagPickError::catalog_load(path, e))
    }

    fn describe(&self) -> String {
        self.root.display().to_string()
    }
}

/// Files served over HTTP below a base URL.
///
/// Every request carries the current time as its query string so caches
/// never hand back a stale copy.
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: Url,
}

impl HttpSource {
    pub fn new(base_url: &str) -> TagPickResult<Self> {
        // Url::join drops the last path segment unless the base ends with '/'
        let normalized = if base_url.ends_with('/') {
            base_url.to_string()
        } else {
            format!("{base_url}/")
        };
        let base_url = Url::parse(&normalized)
            .map_err(|e| TagPickError::Config(format!("invalid source url '{base_url}': {e}")))?;

        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .user_agent(concat!("tagpick/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TagPickError::Config(format!("failed to create HTTP client: {e}")))?;

        Ok(Self { client, base_url })
    }

    fn url_for(&self, path: &str) -> TagPickResult<Url> {
        let mut url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| TagPickError::catalog_load(path, e))?;
        url.set_query(Some(&chrono::Utc::now().timestamp_millis().to_string()));
        Ok(url)
    }
}

#[async_trait]
impl TagSource for HttpSource {
    async fn read_text(&self, path: &str) -> TagPickResult<String> {
        let url = self.url_for(path)?;
        tracing::debug!(%url, "fetching");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| TagPickError::catalog_load(path, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(TagPickError::catalog_load(path, format!("HTTP {status}")));
        }

        response
            .text()
            .await
            .map_err(|e| TagPickError::catalog_load(path, e))
    }

    fn describe(&self) -> String {
        self.base_url.to_string()
    }
}

/// Pick a source from a location string: `http(s)://` URLs are fetched,
/// anything else is treated as a directory.
pub fn from_location(location: &str) -> TagPickResult<Box<dyn TagSource>> {
    if location.starts_with("http://") || location.starts_with("https://") {
        Ok(Box::new(HttpSource::new(location)?))
    } else {
        Ok(Box::new(FileSource::new(location)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_gets_trailing_slash_and_timestamp() {
        let source = HttpSource::new("http://localhost:7860/file=tags").unwrap();
        let url = source.url_for("/hair.yml").unwrap();
        assert_eq!(url.path(), "/file=tags/hair.yml");
        let query = url.query().unwrap();
        assert!(query.parse::<i64>().is_ok(), "query was {query}");
    }

    #[test]
    fn location_picks_http_for_urls() {
        assert!(from_location("https://example.com/tags")
            .unwrap()
            .describe()
            .starts_with("https://"));
        assert_eq!(from_location("tags").unwrap().describe(), "tags");
    }

    #[test]
    fn bad_url_is_config_error() {
        assert!(matches!(
            HttpSource::new("http://"),
            Err(TagPickError::Config(_))
        ));
    }
}
