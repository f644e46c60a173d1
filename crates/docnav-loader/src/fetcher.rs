//! Page resource fetching.

use std::time::Duration;

use ureq::Agent;

use crate::error::FetchError;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// Fetches page resources by URL.
///
/// The engine only ever issues GET requests for rendered HTML documents;
/// implementations return the response body as text.
pub trait Fetcher {
    /// Fetch the resource at `url`.
    fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// ureq-backed [`Fetcher`].
///
/// Relative URLs are resolved against an optional base URL, so the same
/// engine code works against absolute paths served by the host and against a
/// standalone document server in development.
pub struct HttpFetcher {
    agent: Agent,
    base_url: Option<String>,
}

impl HttpFetcher {
    /// Create a fetcher with the default timeout.
    #[must_use]
    pub fn new() -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: None,
        }
    }

    /// Resolve path-only URLs against this base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into().trim_end_matches('/').to_owned());
        self
    }

    fn resolve(&self, url: &str) -> String {
        match &self.base_url {
            Some(base) if url.starts_with('/') => format!("{base}{url}"),
            _ => url.to_owned(),
        }
    }
}

impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let target = self.resolve(url);
        let response = self.agent.get(&target).call()?;

        let status = response.status().as_u16();
        let mut body = response.into_body();

        if status >= 400 {
            return Err(FetchError::Status {
                status,
                url: target,
            });
        }

        Ok(body.read_to_string()?)
    }
}

/// Mock fetcher serving canned documents for tests.
///
/// # Example
///
/// ```ignore
/// use docnav_loader::{Fetcher, MockFetcher};
///
/// let fetcher = MockFetcher::new()
///     .with_page("/guide/index.html", "<html><body>hi</body></html>");
/// assert!(fetcher.fetch("/guide/index.html").is_ok());
/// ```
#[cfg(any(test, feature = "mock"))]
#[derive(Debug, Default)]
pub struct MockFetcher {
    pages: std::collections::HashMap<String, String>,
    failures: std::collections::HashSet<String>,
    log: std::sync::Mutex<Vec<String>>,
}

#[cfg(any(test, feature = "mock"))]
impl MockFetcher {
    /// Create an empty mock fetcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve a document for a URL.
    #[must_use]
    pub fn with_page(mut self, url: impl Into<String>, document: impl Into<String>) -> Self {
        self.pages.insert(url.into(), document.into());
        self
    }

    /// Fail requests for a URL with a 500 status.
    #[must_use]
    pub fn with_failure(mut self, url: impl Into<String>) -> Self {
        self.failures.insert(url.into());
        self
    }

    /// URLs fetched so far, oldest first.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn fetched(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }
}

#[cfg(any(test, feature = "mock"))]
impl Fetcher for MockFetcher {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        self.log.lock().unwrap().push(url.to_owned());

        if self.failures.contains(url) {
            return Err(FetchError::Status {
                status: 500,
                url: url.to_owned(),
            });
        }

        self.pages
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::NotFound {
                url: url.to_owned(),
            })
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_mock_fetcher_serves_pages() {
        let fetcher = MockFetcher::new().with_page("/guide/index.html", "<html></html>");

        assert_eq!(
            fetcher.fetch("/guide/index.html").unwrap(),
            "<html></html>"
        );
        assert_eq!(fetcher.fetched(), ["/guide/index.html"]);
    }

    #[test]
    fn test_mock_fetcher_missing_page_is_not_found() {
        let fetcher = MockFetcher::new();
        assert!(matches!(
            fetcher.fetch("/nope/index.html"),
            Err(FetchError::NotFound { .. })
        ));
    }

    #[test]
    fn test_mock_fetcher_scripted_failure() {
        let fetcher = MockFetcher::new().with_failure("/guide/index.html");
        assert!(matches!(
            fetcher.fetch("/guide/index.html"),
            Err(FetchError::Status { status: 500, .. })
        ));
    }

    #[test]
    fn test_http_fetcher_resolves_relative_urls() {
        let fetcher = HttpFetcher::new().with_base_url("http://localhost:7979/");
        assert_eq!(
            fetcher.resolve("/guide/index.html"),
            "http://localhost:7979/guide/index.html"
        );
        assert_eq!(
            fetcher.resolve("http://example.com/x"),
            "http://example.com/x"
        );
    }
}
