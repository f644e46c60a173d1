//! Page fragment fetching and installation for the docnav engine.
//!
//! [`ContentLoader`] drives the fetch-and-install path: it GETs a page's
//! rendered `index.html`, extracts the designated content region (falling
//! back to the document body, then to the whole document), assigns anchor ids
//! to the fragment's headings, installs the processed markup into the content
//! viewport, and attaches copy affordances to code blocks.
//!
//! HTTP access goes through the [`Fetcher`] trait; [`HttpFetcher`] is the
//! ureq-backed implementation, and `MockFetcher` (behind the `mock` feature)
//! serves canned documents in tests.
//!
//! Fetch and parse failures never escape [`ContentLoader::load`]: the
//! content area is replaced with a marked, non-fatal error message and the
//! outcome reports `Failed`.

mod error;
mod fetcher;
mod fragment;
mod loader;

pub use error::{FetchError, LoadError};
pub use fetcher::{Fetcher, HttpFetcher};
pub use loader::{ContentLoader, LoadOutcome, copy_code_block};

#[cfg(any(test, feature = "mock"))]
pub use fetcher::MockFetcher;
