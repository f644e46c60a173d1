//! Interactive outline tree rendering and state.
//!
//! [`OutlineRenderer`] owns the per-page outline UI state: the outline
//! forest, a declarative expanded/collapsed flag per node, and the
//! open/closed flag of the page's outline panel. Outlines are built lazily
//! on first request from the page's content fragment and cached for the
//! session; pages are treated as static, so an outline is never rebuilt.
//!
//! Rendering produces plain markup installed through the surface; visibility
//! and active styling are driven afterwards through surface commands keyed
//! by heading id.

use std::collections::HashMap;
use std::fmt::Write;

use docnav_loader::{ContentLoader, Fetcher};
use docnav_outline::{HeadingIdentifier, OutlineNode, build_forest, escape_html};
use docnav_surface::Surface;

/// Per-page outline UI state, created the first time the outline is
/// requested.
#[derive(Debug, Default)]
struct PageOutline {
    forest: Vec<OutlineNode>,
    expanded: HashMap<String, bool>,
    panel_open: bool,
}

/// Builds and maintains the interactive outline tree for every page.
#[derive(Debug, Default)]
pub struct OutlineRenderer {
    pages: HashMap<String, PageOutline>,
}

impl OutlineRenderer {
    /// Create a renderer with no outlines built.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the page's outline has been built this session.
    #[must_use]
    pub fn is_built(&self, page_url: &str) -> bool {
        self.pages.contains_key(page_url)
    }

    /// Whether the page's outline panel is currently open.
    #[must_use]
    pub fn is_panel_open(&self, page_url: &str) -> bool {
        self.pages
            .get(page_url)
            .is_some_and(|outline| outline.panel_open)
    }

    /// Build the page's outline on first request.
    ///
    /// Fetches the page's content fragment (without installing it), derives
    /// the outline forest, and installs the rendered markup into the page's
    /// outline container. Returns `false` when the host page has no outline
    /// container for the page or the fragment cannot be fetched; both leave
    /// the page unbuilt so a later request can retry.
    pub fn ensure_built<F: Fetcher>(
        &mut self,
        surface: &mut impl Surface,
        loader: &ContentLoader<F>,
        page_url: &str,
    ) -> bool {
        if self.pages.contains_key(page_url) {
            return true;
        }
        if !surface.has_outline_container(page_url) {
            return false;
        }

        let fragment = match loader.fetch_fragment(page_url) {
            Ok(fragment) => fragment,
            Err(e) => {
                tracing::warn!(url = %page_url, error = %e, "failed to load outline fragment");
                return false;
            }
        };

        let elements = surface.fragment_headings(&fragment);
        let headings = HeadingIdentifier::new().identify(&elements);
        let forest = build_forest(headings);

        if !forest.is_empty() {
            let html = render_forest(&forest);
            surface.install_outline(page_url, &html);
        }

        self.pages.insert(
            page_url.to_owned(),
            PageOutline {
                forest,
                ..PageOutline::default()
            },
        );
        true
    }

    /// Open or close the page's outline panel. No-op for unbuilt pages.
    pub fn set_panel_open(&mut self, surface: &mut impl Surface, page_url: &str, open: bool) {
        let Some(outline) = self.pages.get_mut(page_url) else {
            return;
        };
        outline.panel_open = open;
        surface.set_outline_list_visible(page_url, None, open);
    }

    /// Toggle the page's outline panel, building the outline on first use.
    pub fn toggle_panel<F: Fetcher>(
        &mut self,
        surface: &mut impl Surface,
        loader: &ContentLoader<F>,
        page_url: &str,
    ) {
        if !self.ensure_built(surface, loader, page_url) {
            return;
        }
        let open = !self.is_panel_open(page_url);
        self.set_panel_open(surface, page_url, open);
    }

    /// Toggle one node's child list. Does not touch active state or trigger
    /// navigation.
    pub fn toggle_node(&mut self, surface: &mut impl Surface, page_url: &str, heading_id: &str) {
        let Some(outline) = self.pages.get_mut(page_url) else {
            return;
        };
        if find_node(&outline.forest, heading_id).is_none() {
            return;
        }
        let expanded = !outline.expanded.get(heading_id).copied().unwrap_or(false);
        outline.expanded.insert(heading_id.to_owned(), expanded);
        surface.set_outline_list_visible(page_url, Some(heading_id), expanded);
    }

    /// Expand one node's child list, if it has children.
    pub fn expand_node(&mut self, surface: &mut impl Surface, page_url: &str, heading_id: &str) {
        let Some(outline) = self.pages.get_mut(page_url) else {
            return;
        };
        let has_children =
            find_node(&outline.forest, heading_id).is_some_and(|node| !node.children.is_empty());
        if !has_children {
            return;
        }
        if !outline.expanded.get(heading_id).copied().unwrap_or(false) {
            outline.expanded.insert(heading_id.to_owned(), true);
            surface.set_outline_list_visible(page_url, Some(heading_id), true);
        }
    }

    /// Make the node visible: open the page panel and expand every collapsed
    /// ancestor. No-op for unbuilt pages and unknown nodes.
    pub fn reveal(&mut self, surface: &mut impl Surface, page_url: &str, heading_id: &str) {
        let Some(outline) = self.pages.get_mut(page_url) else {
            return;
        };
        let Some(ancestors) = ancestor_path(&outline.forest, heading_id) else {
            return;
        };

        if !outline.panel_open {
            outline.panel_open = true;
            surface.set_outline_list_visible(page_url, None, true);
        }

        for ancestor in ancestors {
            if !outline.expanded.get(&ancestor).copied().unwrap_or(false) {
                outline.expanded.insert(ancestor.clone(), true);
                surface.set_outline_list_visible(page_url, Some(&ancestor), true);
            }
        }
    }

    /// Whether the node has children.
    #[must_use]
    pub fn has_children(&self, page_url: &str, heading_id: &str) -> bool {
        self.pages.get(page_url).is_some_and(|outline| {
            find_node(&outline.forest, heading_id).is_some_and(|node| !node.children.is_empty())
        })
    }

    /// Heading text of an outline node.
    #[must_use]
    pub fn heading_text(&self, page_url: &str, heading_id: &str) -> Option<String> {
        self.pages
            .get(page_url)
            .and_then(|outline| find_node(&outline.forest, heading_id))
            .map(|node| node.heading.text.clone())
    }
}

/// Depth-first search for a node by heading id.
fn find_node<'a>(nodes: &'a [OutlineNode], heading_id: &str) -> Option<&'a OutlineNode> {
    for node in nodes {
        if node.heading.id == heading_id {
            return Some(node);
        }
        if let Some(found) = find_node(&node.children, heading_id) {
            return Some(found);
        }
    }
    None
}

/// Ids of the node's ancestors, outermost first. `None` when the id is not
/// in the forest.
fn ancestor_path(nodes: &[OutlineNode], heading_id: &str) -> Option<Vec<String>> {
    fn walk(nodes: &[OutlineNode], heading_id: &str, path: &mut Vec<String>) -> bool {
        for node in nodes {
            if node.heading.id == heading_id {
                return true;
            }
            path.push(node.heading.id.clone());
            if walk(&node.children, heading_id, path) {
                return true;
            }
            path.pop();
        }
        false
    }

    let mut path = Vec::new();
    walk(nodes, heading_id, &mut path).then_some(path)
}

/// Render the outline forest to markup. Child lists start hidden.
fn render_forest(forest: &[OutlineNode]) -> String {
    let mut out = String::with_capacity(forest.len() * 96);
    out.push_str(r#"<ul class="toc-list">"#);
    render_nodes(&mut out, forest);
    out.push_str("</ul>");
    out
}

fn render_nodes(out: &mut String, nodes: &[OutlineNode]) {
    for node in nodes {
        out.push_str("<li>");
        write!(
            out,
            r##"<div class="toc-item"><a class="toc-link" href="#{}">{}</a>"##,
            node.heading.id,
            escape_html(&node.heading.text)
        )
        .unwrap();
        if !node.children.is_empty() {
            write!(
                out,
                r#"<span class="toc-arrow" data-node="{}"></span>"#,
                node.heading.id
            )
            .unwrap();
        }
        out.push_str("</div>");
        if !node.children.is_empty() {
            write!(
                out,
                r#"<ul class="toc-children" data-parent="{}" hidden>"#,
                node.heading.id
            )
            .unwrap();
            render_nodes(out, &node.children);
            out.push_str("</ul>");
        }
        out.push_str("</li>");
    }
}

#[cfg(test)]
mod tests {
    use docnav_loader::{ContentLoader, MockFetcher};
    use docnav_surface::MockSurface;
    use pretty_assertions::assert_eq;

    use super::*;

    const ADVANCED_DOCUMENT: &str = concat!(
        "<html><body><div id=\"content\">",
        "<h1>Advanced</h1><h2>Usage</h2><h3>Deep &amp; Wide</h3><h2>FAQ</h2>",
        "</div></body></html>",
    );

    fn loader_for(url: &str, document: &str) -> ContentLoader<MockFetcher> {
        ContentLoader::new(MockFetcher::new().with_page(url.to_owned() + "index.html", document))
    }

    #[test]
    fn test_outline_is_built_lazily_and_cached() {
        let loader = loader_for("/guide/advanced/", ADVANCED_DOCUMENT);
        let mut surface = MockSurface::new();
        let mut renderer = OutlineRenderer::new();

        assert!(!renderer.is_built("/guide/advanced/"));
        assert!(renderer.ensure_built(&mut surface, &loader, "/guide/advanced/"));
        assert!(renderer.is_built("/guide/advanced/"));

        // A second request serves the session cache without refetching.
        assert!(renderer.ensure_built(&mut surface, &loader, "/guide/advanced/"));
        assert_eq!(loader.fetcher().fetched().len(), 1);
    }

    #[test]
    fn test_rendered_outline_markup() {
        let loader = loader_for("/guide/advanced/", ADVANCED_DOCUMENT);
        let mut surface = MockSurface::new();
        let mut renderer = OutlineRenderer::new();

        renderer.ensure_built(&mut surface, &loader, "/guide/advanced/");
        let html = surface.outline_html("/guide/advanced/").unwrap();

        assert!(html.contains(r##"<a class="toc-link" href="#advanced">Advanced</a>"##));
        assert!(html.contains(r#"<span class="toc-arrow" data-node="usage">"#));
        // Child lists start hidden and label text is escaped.
        assert!(html.contains(r#"<ul class="toc-children" data-parent="usage" hidden>"#));
        assert!(html.contains("Deep &amp; Wide"));
        // Leaf nodes get no expand affordance.
        assert!(!html.contains(r#"data-node="faq""#));
    }

    #[test]
    fn test_missing_outline_container_is_a_noop() {
        let loader = loader_for("/guide/advanced/", ADVANCED_DOCUMENT);
        let mut surface = MockSurface::new().without_outline_container("/guide/advanced/");
        let mut renderer = OutlineRenderer::new();

        assert!(!renderer.ensure_built(&mut surface, &loader, "/guide/advanced/"));
        assert!(!renderer.is_built("/guide/advanced/"));
        assert_eq!(surface.outline_html("/guide/advanced/"), None);
    }

    #[test]
    fn test_fetch_failure_leaves_page_unbuilt() {
        let loader =
            ContentLoader::new(MockFetcher::new().with_failure("/guide/advanced/index.html"));
        let mut surface = MockSurface::new();
        let mut renderer = OutlineRenderer::new();

        assert!(!renderer.ensure_built(&mut surface, &loader, "/guide/advanced/"));
        assert!(!renderer.is_built("/guide/advanced/"));
    }

    #[test]
    fn test_page_without_headings_builds_empty_outline() {
        let loader = loader_for("/empty/", "<html><body><div id=\"content\"><p>x</p></div></body></html>");
        let mut surface = MockSurface::new();
        let mut renderer = OutlineRenderer::new();

        assert!(renderer.ensure_built(&mut surface, &loader, "/empty/"));
        assert_eq!(surface.outline_html("/empty/"), None);
    }

    #[test]
    fn test_toggle_panel_builds_then_flips_visibility() {
        let loader = loader_for("/guide/advanced/", ADVANCED_DOCUMENT);
        let mut surface = MockSurface::new();
        let mut renderer = OutlineRenderer::new();

        renderer.toggle_panel(&mut surface, &loader, "/guide/advanced/");
        assert!(renderer.is_panel_open("/guide/advanced/"));
        assert!(surface.is_outline_visible("/guide/advanced/", None));

        renderer.toggle_panel(&mut surface, &loader, "/guide/advanced/");
        assert!(!renderer.is_panel_open("/guide/advanced/"));
        assert!(!surface.is_outline_visible("/guide/advanced/", None));
        assert_eq!(loader.fetcher().fetched().len(), 1);
    }

    #[test]
    fn test_toggle_node_flips_only_that_list() {
        let loader = loader_for("/guide/advanced/", ADVANCED_DOCUMENT);
        let mut surface = MockSurface::new();
        let mut renderer = OutlineRenderer::new();
        renderer.ensure_built(&mut surface, &loader, "/guide/advanced/");

        renderer.toggle_node(&mut surface, "/guide/advanced/", "usage");
        assert!(surface.is_outline_visible("/guide/advanced/", Some("usage")));
        assert!(!surface.is_outline_visible("/guide/advanced/", None));

        renderer.toggle_node(&mut surface, "/guide/advanced/", "usage");
        assert!(!surface.is_outline_visible("/guide/advanced/", Some("usage")));
    }

    #[test]
    fn test_reveal_opens_panel_and_ancestors() {
        let loader = loader_for("/guide/advanced/", ADVANCED_DOCUMENT);
        let mut surface = MockSurface::new();
        let mut renderer = OutlineRenderer::new();
        renderer.ensure_built(&mut surface, &loader, "/guide/advanced/");

        renderer.reveal(&mut surface, "/guide/advanced/", "deep-wide");

        assert!(surface.is_outline_visible("/guide/advanced/", None));
        assert!(surface.is_outline_visible("/guide/advanced/", Some("advanced")));
        assert!(surface.is_outline_visible("/guide/advanced/", Some("usage")));
    }

    #[test]
    fn test_reveal_on_unbuilt_page_is_a_noop() {
        let mut surface = MockSurface::new();
        let mut renderer = OutlineRenderer::new();

        renderer.reveal(&mut surface, "/guide/advanced/", "usage");
        assert!(!surface.is_outline_visible("/guide/advanced/", None));
    }

    #[test]
    fn test_heading_text_and_children_lookups() {
        let loader = loader_for("/guide/advanced/", ADVANCED_DOCUMENT);
        let mut surface = MockSurface::new();
        let mut renderer = OutlineRenderer::new();
        renderer.ensure_built(&mut surface, &loader, "/guide/advanced/");

        assert_eq!(
            renderer.heading_text("/guide/advanced/", "deep-wide"),
            Some("Deep & Wide".to_owned())
        );
        assert!(renderer.has_children("/guide/advanced/", "usage"));
        assert!(!renderer.has_children("/guide/advanced/", "faq"));
        assert_eq!(renderer.heading_text("/guide/advanced/", "nope"), None);
    }
}
