//! Mock surface implementation for testing.
//!
//! [`MockSurface`] keeps the whole host page state in memory: installed
//! content, parsed headings with scriptable viewport geometry, outline panels
//! with visibility flags, history, and a scripted clipboard. Tests drive the
//! engine against it and assert on the recorded state.

use std::collections::{HashMap, HashSet};

use docnav_outline::{ElementRef, HeadingElement};
use regex::Regex;

use crate::{ClipboardError, PageLink, Surface};

/// Scripted clipboard behavior.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum ClipboardMode {
    /// Writes succeed and are recorded.
    #[default]
    Supported,
    /// Writes fail with [`ClipboardError::Unsupported`].
    Unsupported,
    /// Writes fail with [`ClipboardError::Denied`].
    Denied,
}

#[derive(Clone, Debug)]
struct MockHeading {
    element: ElementRef,
    level: u8,
    text: String,
    id: Option<String>,
    top: Option<f64>,
}

#[derive(Clone, Debug)]
struct MockCodeBlock {
    element: ElementRef,
    text: String,
}

/// In-memory surface for tests.
///
/// Use the builder methods to describe the host page, then hand the mock to
/// the engine and assert on the recorded state afterwards.
///
/// # Example
///
/// ```
/// use docnav_surface::{MockSurface, Surface};
///
/// let mut surface = MockSurface::new()
///     .with_doc_link("/guide/", "Guide")
///     .with_path("/guide/");
///
/// surface.install_content("<h1>Guide</h1>");
/// assert_eq!(surface.content_headings().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockSurface {
    links: Vec<PageLink>,
    path: String,
    next_ref: u64,
    content: Option<String>,
    load_error: Option<String>,
    headings: Vec<MockHeading>,
    code: Vec<MockCodeBlock>,
    copy_affordances: Vec<ElementRef>,
    clipboard_mode: ClipboardMode,
    clipboard_writes: Vec<String>,
    alerts: Vec<String>,
    missing_outline_containers: HashSet<String>,
    outlines: HashMap<String, String>,
    visible_lists: HashMap<(String, Option<String>), bool>,
    active_outline_links: HashSet<(String, String)>,
    active_pages: HashSet<String>,
    pushed: Vec<String>,
    replaced: Vec<String>,
    scrolled_elements: Vec<ElementRef>,
    scroll_to_top_count: usize,
    links_scrolled_into_view: Vec<(String, String)>,
}

impl MockSurface {
    /// Create an empty mock surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a known documentation page link.
    #[must_use]
    pub fn with_doc_link(mut self, href: impl Into<String>, label: impl Into<String>) -> Self {
        self.links.push(PageLink {
            href: href.into(),
            label: label.into(),
        });
        self
    }

    /// Set the current browser path.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = path.into();
        self
    }

    /// Declare that the host page has no outline container for a page.
    #[must_use]
    pub fn without_outline_container(mut self, page_url: impl Into<String>) -> Self {
        self.missing_outline_containers.insert(page_url.into());
        self
    }

    /// Script the clipboard as unavailable.
    #[must_use]
    pub fn with_clipboard_unsupported(mut self) -> Self {
        self.clipboard_mode = ClipboardMode::Unsupported;
        self
    }

    /// Script the clipboard to deny writes.
    #[must_use]
    pub fn with_clipboard_denied(mut self) -> Self {
        self.clipboard_mode = ClipboardMode::Denied;
        self
    }

    /// Assign viewport-relative top offsets to the installed headings, in
    /// document order.
    pub fn set_heading_tops(&mut self, tops: &[f64]) {
        for (heading, top) in self.headings.iter_mut().zip(tops) {
            heading.top = Some(*top);
        }
    }

    /// Markup currently installed in the content area.
    #[must_use]
    pub fn content(&self) -> Option<&str> {
        self.content.as_deref()
    }

    /// Error message installed in place of content, if any.
    #[must_use]
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Anchor ids carried by the installed headings, in document order.
    #[must_use]
    pub fn installed_heading_ids(&self) -> Vec<Option<String>> {
        self.headings.iter().map(|h| h.id.clone()).collect()
    }

    /// Outline markup installed for a page.
    #[must_use]
    pub fn outline_html(&self, page_url: &str) -> Option<&str> {
        self.outlines.get(page_url).map(String::as_str)
    }

    /// Whether an outline list is currently shown. Lists default to hidden
    /// until a visibility command addresses them.
    #[must_use]
    pub fn is_outline_visible(&self, page_url: &str, parent: Option<&str>) -> bool {
        self.visible_lists
            .get(&(page_url.to_owned(), parent.map(str::to_owned)))
            .copied()
            .unwrap_or(false)
    }

    /// Outline links currently styled active, sorted for stable assertions.
    #[must_use]
    pub fn active_outline_links(&self) -> Vec<(String, String)> {
        let mut active: Vec<_> = self.active_outline_links.iter().cloned().collect();
        active.sort();
        active
    }

    /// Page links currently styled active, sorted for stable assertions.
    #[must_use]
    pub fn active_pages(&self) -> Vec<String> {
        let mut active: Vec<_> = self.active_pages.iter().cloned().collect();
        active.sort();
        active
    }

    /// Paths pushed onto the history stack, oldest first.
    #[must_use]
    pub fn pushed_paths(&self) -> &[String] {
        &self.pushed
    }

    /// Paths written with replace, oldest first.
    #[must_use]
    pub fn replaced_paths(&self) -> &[String] {
        &self.replaced
    }

    /// Elements the content viewport scrolled to, oldest first.
    #[must_use]
    pub fn scrolled_elements(&self) -> &[ElementRef] {
        &self.scrolled_elements
    }

    /// How many times the viewport was reset to the top.
    #[must_use]
    pub fn scroll_to_top_count(&self) -> usize {
        self.scroll_to_top_count
    }

    /// Outline links scrolled into view, oldest first.
    #[must_use]
    pub fn links_scrolled_into_view(&self) -> &[(String, String)] {
        &self.links_scrolled_into_view
    }

    /// Code blocks that received a copy affordance.
    #[must_use]
    pub fn copy_affordances(&self) -> &[ElementRef] {
        &self.copy_affordances
    }

    /// Successful clipboard writes, oldest first.
    #[must_use]
    pub fn clipboard_writes(&self) -> &[String] {
        &self.clipboard_writes
    }

    /// Blocking notifications shown to the user, oldest first.
    #[must_use]
    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    fn mint(&mut self) -> ElementRef {
        let element = ElementRef::new(self.next_ref);
        self.next_ref += 1;
        element
    }

    fn scan_headings(&mut self, html: &str) -> Vec<MockHeading> {
        let heading_re =
            Regex::new(r"(?is)<h([1-6])((?:\s[^>]*)?)>(.*?)</h[1-6]\s*>").expect("static regex");
        let id_re = Regex::new(r#"id\s*=\s*"([^"]*)""#).expect("static regex");

        heading_re
            .captures_iter(html)
            .map(|cap| {
                let level = cap[1].parse().expect("level digit");
                let id = id_re.captures(&cap[2]).map(|c| c[1].to_owned());
                let text = strip_markup(&cap[3]);
                (level, id, text)
            })
            .collect::<Vec<_>>()
            .into_iter()
            .map(|(level, id, text)| MockHeading {
                element: self.mint(),
                level,
                text,
                id,
                top: None,
            })
            .collect()
    }

    fn scan_code_blocks(&mut self, html: &str) -> Vec<MockCodeBlock> {
        let code_re =
            Regex::new(r"(?is)<pre[^>]*>\s*<code[^>]*>(.*?)</code>").expect("static regex");

        code_re
            .captures_iter(html)
            .map(|cap| strip_markup(&cap[1]))
            .collect::<Vec<_>>()
            .into_iter()
            .map(|text| MockCodeBlock {
                element: self.mint(),
                text,
            })
            .collect()
    }
}

/// Strip tags and decode the handful of entities the mock cares about.
fn strip_markup(html: &str) -> String {
    let tag_re = Regex::new(r"(?s)<[^>]*>").expect("static regex");
    tag_re
        .replace_all(html, "")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
        .trim()
        .to_owned()
}

impl Surface for MockSurface {
    fn doc_links(&self) -> Vec<PageLink> {
        self.links.clone()
    }

    fn set_page_active(&mut self, page_url: &str, active: bool) {
        if active {
            self.active_pages.insert(page_url.to_owned());
        } else {
            self.active_pages.remove(page_url);
        }
    }

    fn clear_page_active(&mut self) {
        self.active_pages.clear();
    }

    fn install_content(&mut self, html: &str) {
        self.content = Some(html.to_owned());
        self.load_error = None;
        self.headings = self.scan_headings(html);
        self.code = self.scan_code_blocks(html);
        self.copy_affordances.clear();
    }

    fn install_load_error(&mut self, message: &str) {
        self.content = None;
        self.load_error = Some(message.to_owned());
        self.headings.clear();
        self.code.clear();
        self.copy_affordances.clear();
    }

    fn content_headings(&self) -> Vec<HeadingElement> {
        self.headings
            .iter()
            .map(|h| HeadingElement {
                element: h.element,
                level: h.level,
                text: h.text.clone(),
            })
            .collect()
    }

    fn fragment_headings(&mut self, html: &str) -> Vec<HeadingElement> {
        self.scan_headings(html)
            .into_iter()
            .map(|h| HeadingElement {
                element: h.element,
                level: h.level,
                text: h.text,
            })
            .collect()
    }

    fn heading_viewport_top(&self, element: ElementRef) -> Option<f64> {
        self.headings
            .iter()
            .find(|h| h.element == element)
            .and_then(|h| h.top)
    }

    fn scroll_content_to_top(&mut self) {
        self.scroll_to_top_count += 1;
    }

    fn scroll_to_element(&mut self, element: ElementRef) {
        self.scrolled_elements.push(element);
    }

    fn code_blocks(&self) -> Vec<ElementRef> {
        self.code.iter().map(|block| block.element).collect()
    }

    fn attach_copy_affordance(&mut self, block: ElementRef) {
        self.copy_affordances.push(block);
    }

    fn code_block_text(&self, block: ElementRef) -> Option<String> {
        self.code
            .iter()
            .find(|candidate| candidate.element == block)
            .map(|candidate| candidate.text.clone())
    }

    fn clipboard_write(&mut self, text: &str) -> Result<(), ClipboardError> {
        match self.clipboard_mode {
            ClipboardMode::Supported => {
                self.clipboard_writes.push(text.to_owned());
                Ok(())
            }
            ClipboardMode::Unsupported => Err(ClipboardError::Unsupported),
            ClipboardMode::Denied => Err(ClipboardError::Denied),
        }
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_owned());
    }

    fn has_outline_container(&self, page_url: &str) -> bool {
        !self.missing_outline_containers.contains(page_url)
    }

    fn install_outline(&mut self, page_url: &str, html: &str) {
        self.outlines.insert(page_url.to_owned(), html.to_owned());
    }

    fn set_outline_list_visible(&mut self, page_url: &str, parent: Option<&str>, visible: bool) {
        self.visible_lists.insert(
            (page_url.to_owned(), parent.map(str::to_owned)),
            visible,
        );
    }

    fn set_outline_link_active(&mut self, page_url: &str, heading_id: &str, active: bool) {
        let key = (page_url.to_owned(), heading_id.to_owned());
        if active {
            self.active_outline_links.insert(key);
        } else {
            self.active_outline_links.remove(&key);
        }
    }

    fn clear_outline_active(&mut self) {
        self.active_outline_links.clear();
    }

    fn scroll_outline_link_into_view(&mut self, page_url: &str, heading_id: &str) {
        self.links_scrolled_into_view
            .push((page_url.to_owned(), heading_id.to_owned()));
    }

    fn current_path(&self) -> String {
        self.path.clone()
    }

    fn push_history(&mut self, path: &str) {
        self.pushed.push(path.to_owned());
        self.path = path.to_owned();
    }

    fn replace_history(&mut self, path: &str) {
        self.replaced.push(path.to_owned());
        self.path = path.to_owned();
    }
}
