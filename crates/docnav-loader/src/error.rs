//! Error types for page loading.

/// Error fetching a page resource.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FetchError {
    /// HTTP request failed (network error, timeout, ...).
    #[error("HTTP request failed")]
    Http(#[from] ureq::Error),

    /// Server returned an error status.
    #[error("HTTP error: {status} for {url}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Requested URL.
        url: String,
    },

    /// No resource is registered for the URL (mock fetcher).
    #[error("resource not found: {url}")]
    NotFound {
        /// Requested URL.
        url: String,
    },
}

/// Error loading a page fragment.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum LoadError {
    /// Fetching the page resource failed.
    #[error("fetch failed")]
    Fetch(#[from] FetchError),

    /// The fragment markup could not be processed.
    #[error("markup error")]
    Markup(#[from] quick_xml::Error),
}
