//! Rendering surface abstraction for the docnav engine.
//!
//! The engine never touches a document tree directly. Every document,
//! viewport, history, and clipboard operation goes through the [`Surface`]
//! trait, so the same navigation logic runs against a browser DOM binding, a
//! test double, or any other rendering surface.
//!
//! Element handles ([`ElementRef`](docnav_outline::ElementRef)) are minted by
//! the surface and dereferenced only by the surface. Missing markup (no
//! outline container, no matching link) is not an error: implementations
//! no-op on commands that target markup the host page does not have.
//!
//! # Mock
//!
//! With the `mock` feature enabled, [`MockSurface`] provides an in-memory
//! surface with scriptable heading geometry and recorded state for tests.

#[cfg(any(test, feature = "mock"))]
mod mock;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockSurface;

use docnav_outline::{ElementRef, HeadingElement};

/// A known documentation page link exposed by the host at initialization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageLink {
    /// Canonical path of the page (e.g., `/guide/`).
    pub href: String,
    /// Human-readable label of the link.
    pub label: String,
}

/// Clipboard write failure.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ClipboardError {
    /// The platform exposes no clipboard-write capability.
    #[error("clipboard capability is not available")]
    Unsupported,
    /// The platform refused the write (permissions, focus, ...).
    #[error("clipboard write was denied")]
    Denied,
}

/// Host document operations required by the navigation engine.
///
/// One implementation drives the real host page; [`MockSurface`] drives
/// tests. All mutating commands are fire-and-forget: a command addressing
/// markup that does not exist must be ignored, not fail.
pub trait Surface {
    // --- page links / overview panel ---

    /// Known documentation pages, in host order.
    fn doc_links(&self) -> Vec<PageLink>;

    /// Mark or unmark a page link (and its title label) as the active page.
    fn set_page_active(&mut self, page_url: &str, active: bool);

    /// Clear active styling from every page link.
    fn clear_page_active(&mut self);

    // --- content viewport ---

    /// Replace the visible content area with the given markup.
    fn install_content(&mut self, html: &str);

    /// Replace the visible content area with a marked, non-fatal error
    /// message.
    fn install_load_error(&mut self, message: &str);

    /// Heading elements of the installed content, in document order.
    fn content_headings(&self) -> Vec<HeadingElement>;

    /// Parse a fragment without installing it and return its heading
    /// elements, in document order. The handles are detached: geometry
    /// queries on them return `None`.
    fn fragment_headings(&mut self, html: &str) -> Vec<HeadingElement>;

    /// Top edge of the element relative to the viewport's top edge, in
    /// pixels. `None` for detached or unknown elements.
    fn heading_viewport_top(&self, element: ElementRef) -> Option<f64>;

    /// Smooth-scroll the content viewport back to the top.
    fn scroll_content_to_top(&mut self);

    /// Scroll the viewport so the element is in reading position.
    fn scroll_to_element(&mut self, element: ElementRef);

    // --- code blocks / clipboard ---

    /// Code block elements of the installed content, in document order.
    fn code_blocks(&self) -> Vec<ElementRef>;

    /// Attach a copy-to-clipboard affordance to a code block.
    fn attach_copy_affordance(&mut self, block: ElementRef);

    /// Text content of a code block. `None` for unknown elements.
    fn code_block_text(&self, block: ElementRef) -> Option<String>;

    /// Write text to the platform clipboard.
    fn clipboard_write(&mut self, text: &str) -> Result<(), ClipboardError>;

    /// Show a blocking notification to the user.
    fn alert(&mut self, message: &str);

    // --- outline panel ---

    /// Whether the host page has an outline container for the page.
    fn has_outline_container(&self, page_url: &str) -> bool;

    /// Install outline markup into the page's outline container.
    fn install_outline(&mut self, page_url: &str, html: &str);

    /// Show or hide an outline list: the page's top-level list when `parent`
    /// is `None`, otherwise the child list nested under that heading id.
    fn set_outline_list_visible(&mut self, page_url: &str, parent: Option<&str>, visible: bool);

    /// Mark or unmark one outline link as active.
    fn set_outline_link_active(&mut self, page_url: &str, heading_id: &str, active: bool);

    /// Clear active styling from every outline link across all pages.
    fn clear_outline_active(&mut self);

    /// Scroll an outline link into view within the outline panel.
    fn scroll_outline_link_into_view(&mut self, page_url: &str, heading_id: &str);

    // --- browser history ---

    /// Current browser path.
    fn current_path(&self) -> String;

    /// Push a new history entry for the path.
    fn push_history(&mut self, path: &str);

    /// Rewrite the current history entry without creating a new one.
    fn replace_history(&mut self, path: &str);
}
