//! Fetch-and-install pipeline for page content.

use docnav_outline::{ElementRef, Heading, HeadingIdentifier};
use docnav_surface::{ClipboardError, Surface};

use crate::error::LoadError;
use crate::fetcher::Fetcher;
use crate::fragment::{apply_heading_ids, extract_fragment};

/// Message installed in place of content when a load fails.
const LOAD_ERROR_MESSAGE: &str = "Can not load content.";

/// Result of a [`ContentLoader::load`] call.
///
/// Failures are reported as a value, never as an error: the loader has
/// already installed the error message by the time `Failed` is returned.
#[derive(Clone, Debug, PartialEq)]
pub enum LoadOutcome {
    /// Content installed; carries the page's headings in document order.
    Loaded(Vec<Heading>),
    /// Fetch or markup processing failed; an error message was installed.
    Failed,
}

/// Fetches page fragments and installs them into the content viewport.
///
/// The loader owns the resource-name and content-region conventions from the
/// page resource contract: a page at path `P` is served as `P + "index.html"`
/// and its main content lives in the element with the configured region id.
pub struct ContentLoader<F: Fetcher> {
    fetcher: F,
    resource_name: String,
    content_region_id: String,
}

impl<F: Fetcher> ContentLoader<F> {
    /// Create a loader with the default `index.html` / `content` conventions.
    #[must_use]
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            resource_name: "index.html".to_owned(),
            content_region_id: "content".to_owned(),
        }
    }

    /// Override the per-page resource name.
    #[must_use]
    pub fn with_resource_name(mut self, resource_name: impl Into<String>) -> Self {
        self.resource_name = resource_name.into();
        self
    }

    /// Override the content region id.
    #[must_use]
    pub fn with_content_region_id(mut self, content_region_id: impl Into<String>) -> Self {
        self.content_region_id = content_region_id.into();
        self
    }

    /// The underlying fetcher.
    #[must_use]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Fetch a page and extract its content fragment without installing it.
    ///
    /// This is the lazy-outline path: the caller derives an outline from the
    /// fragment and discards it.
    pub fn fetch_fragment(&self, page_url: &str) -> Result<String, LoadError> {
        let url = format!("{page_url}{}", self.resource_name);
        let document = self.fetcher.fetch(&url)?;
        Ok(extract_fragment(&document, &self.content_region_id))
    }

    /// Load a page into the content viewport.
    ///
    /// On success the viewport holds the processed fragment (headings carry
    /// their anchor ids), the scroll position is reset to the top, every code
    /// block has a copy affordance, and the page's headings are returned for
    /// scroll-spy tracking. On failure the viewport holds a marked error
    /// message; nothing propagates to the caller and nothing is retried.
    pub fn load(&self, surface: &mut impl Surface, page_url: &str) -> LoadOutcome {
        match self.try_load(surface, page_url) {
            Ok(headings) => LoadOutcome::Loaded(headings),
            Err(e) => {
                tracing::warn!(url = %page_url, error = %e, "failed to load page content");
                surface.install_load_error(LOAD_ERROR_MESSAGE);
                LoadOutcome::Failed
            }
        }
    }

    fn try_load(&self, surface: &mut impl Surface, page_url: &str) -> Result<Vec<Heading>, LoadError> {
        let fragment = self.fetch_fragment(page_url)?;

        let elements = surface.fragment_headings(&fragment);
        let headings = HeadingIdentifier::new().identify(&elements);

        let ids: Vec<&str> = headings.iter().map(|h| h.id.as_str()).collect();
        let html = apply_heading_ids(&fragment, &ids)?;
        surface.install_content(&html);

        // Rebind to the installed elements; the detached handles die with
        // the fragment.
        let installed = surface.content_headings();
        let headings: Vec<Heading> = headings
            .into_iter()
            .zip(installed)
            .map(|(heading, element)| Heading {
                element: element.element,
                ..heading
            })
            .collect();

        surface.scroll_content_to_top();

        for block in surface.code_blocks() {
            surface.attach_copy_affordance(block);
        }

        Ok(headings)
    }
}

/// Copy a code block's text to the clipboard.
///
/// Unsupported or denied clipboards are reported to the user with a blocking
/// notification; a block the surface no longer knows is a silent no-op.
pub fn copy_code_block(surface: &mut impl Surface, block: ElementRef) {
    let Some(text) = surface.code_block_text(block) else {
        return;
    };

    match surface.clipboard_write(&text) {
        Ok(()) => {}
        Err(ClipboardError::Unsupported) => surface.alert("Clipboard API is not supported"),
        Err(ClipboardError::Denied) => surface.alert("Failed to copy to clipboard."),
        Err(_) => {}
    }
}
