//! Top-level navigation orchestration.
//!
//! [`NavigationCoordinator`] owns the engine's single [`NavigationState`]
//! and every collaborator: the rendering surface, the content loader, the
//! scroll spy, and the outline renderer. Host events enter through the
//! `on_*` methods; deferred work (debounced scroll recomputes, settle
//! re-checks, deferred scrolls, lock release) is queued with a deadline and
//! drained by [`tick`](NavigationCoordinator::tick).

use std::time::Instant;

use docnav_loader::{ContentLoader, Fetcher, LoadOutcome, copy_code_block};
use docnav_outline::ElementRef;
use docnav_surface::Surface;

use crate::config::EngineConfig;
use crate::outline_view::OutlineRenderer;
use crate::spy::ScrollSpy;

/// One known documentation page, captured at initialization.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PageEntry {
    /// Canonical path of the page.
    pub url: String,
    /// Human-readable name shown in the overview panel.
    pub display_name: String,
}

/// The manual-selection lock: a clicked outline link wins over scroll-driven
/// updates until the lock expires or is released.
#[derive(Clone, Debug)]
struct ManualLock {
    page_url: String,
    heading_id: String,
    expires_at: Instant,
}

/// Process-wide navigation state, owned by the coordinator.
///
/// `current_page_url` is mutated only by successful page loads. The manual
/// lock is an explicit expiry checked against the event clock on every
/// scroll tick, not a timer callback.
#[derive(Debug, Default)]
pub struct NavigationState {
    current_page_url: Option<String>,
    manual_lock: Option<ManualLock>,
}

impl NavigationState {
    /// Path of the currently loaded page, if any.
    #[must_use]
    pub fn current_page_url(&self) -> Option<&str> {
        self.current_page_url.as_deref()
    }

    /// Whether the manual-selection lock is live at `now`.
    #[must_use]
    pub fn manual_lock_active(&self, now: Instant) -> bool {
        self.manual_lock
            .as_ref()
            .is_some_and(|lock| now < lock.expires_at)
    }

    fn acquire_lock(&mut self, page_url: &str, heading_id: &str, expires_at: Instant) {
        self.manual_lock = Some(ManualLock {
            page_url: page_url.to_owned(),
            heading_id: heading_id.to_owned(),
            expires_at,
        });
    }

    fn release_lock(&mut self) {
        self.manual_lock = None;
    }
}

/// Deferred work, drained by `tick` once its deadline passes.
#[derive(Clone, Debug)]
enum PendingAction {
    /// Re-run the scroll spy after content install settles.
    SettleSpy,
    /// Scroll the content viewport to a clicked heading.
    ScrollToHeading { page_url: String, heading_id: String },
    /// Release the manual-selection lock.
    ReleaseLock,
}

#[derive(Clone, Debug)]
struct Scheduled {
    due: Instant,
    action: PendingAction,
}

/// Orchestrates page loads, outline interaction, scroll tracking, and host
/// history.
pub struct NavigationCoordinator<S: Surface, F: Fetcher> {
    surface: S,
    loader: ContentLoader<F>,
    config: EngineConfig,
    pages: Vec<PageEntry>,
    state: NavigationState,
    spy: ScrollSpy,
    outline: OutlineRenderer,
    pending: Vec<Scheduled>,
    latest_request: u64,
}

impl<S: Surface, F: Fetcher> NavigationCoordinator<S, F> {
    /// Create a coordinator over a surface and fetcher.
    #[must_use]
    pub fn new(surface: S, fetcher: F, config: EngineConfig) -> Self {
        let loader = ContentLoader::new(fetcher)
            .with_resource_name(config.resource_name.clone())
            .with_content_region_id(config.content_region_id.clone());
        let spy = ScrollSpy::new(config.scroll_offset, config.scroll_debounce());

        Self {
            surface,
            loader,
            config,
            pages: Vec::new(),
            state: NavigationState::default(),
            spy,
            outline: OutlineRenderer::new(),
            pending: Vec::new(),
            latest_request: 0,
        }
    }

    /// The rendering surface.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The rendering surface, mutable.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The navigation state.
    #[must_use]
    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// Known pages, captured at initialization.
    #[must_use]
    pub fn pages(&self) -> &[PageEntry] {
        &self.pages
    }

    /// Capture the known page list and load the starting page.
    ///
    /// The starting page is the one matching the current browser path, or
    /// the first known page otherwise; in the latter case the browser path
    /// is rewritten without creating a history entry. A host page without
    /// doc links leaves the engine inert.
    pub fn initialize(&mut self, now: Instant) {
        self.pages = self
            .surface
            .doc_links()
            .into_iter()
            .map(|link| PageEntry {
                url: link.href,
                display_name: link.label,
            })
            .collect();

        let Some(first) = self.pages.first() else {
            return;
        };

        let path = self.surface.current_path();
        let start = if self.is_known_page(&path) {
            path
        } else {
            let url = first.url.clone();
            self.surface.replace_history(&url);
            url
        };

        self.load_page(&start, now);
    }

    /// Record a scroll event in the content viewport.
    pub fn on_scroll(&mut self, now: Instant) {
        self.spy.record_scroll(now);
    }

    /// Drain due deferred work: debounced scroll recomputes and scheduled
    /// actions.
    pub fn tick(&mut self, now: Instant) {
        if let Some(index) = self.spy.poll(now, &self.surface) {
            self.apply_current_heading(index, now);
        }

        loop {
            let due = self
                .pending
                .iter()
                .enumerate()
                .filter(|(_, scheduled)| scheduled.due <= now)
                .min_by_key(|(index, scheduled)| (scheduled.due, *index))
                .map(|(index, _)| index);
            let Some(index) = due else {
                break;
            };

            let scheduled = self.pending.remove(index);
            match scheduled.action {
                PendingAction::SettleSpy => {
                    if let Some(index) = self.spy.current(&self.surface) {
                        self.apply_current_heading(index, now);
                    }
                }
                PendingAction::ScrollToHeading {
                    page_url,
                    heading_id,
                } => self.scroll_to_heading(&page_url, &heading_id),
                PendingAction::ReleaseLock => self.state.release_lock(),
            }
        }
    }

    /// Earliest pending deadline, for host timer scheduling.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        let pending = self.pending.iter().map(|scheduled| scheduled.due).min();
        match (pending, self.spy.next_deadline()) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (deadline, None) | (None, deadline) => deadline,
        }
    }

    /// An outline link was clicked.
    ///
    /// The click wins over scroll-driven updates for the lock's validity
    /// window. Active styling is applied synchronously, before any fetch;
    /// cross-page targets push a history entry and load the target page;
    /// the clicked node's ancestors and own child list end up expanded.
    pub fn on_outline_click(&mut self, page_url: &str, heading_id: &str, now: Instant) {
        self.state
            .acquire_lock(page_url, heading_id, now + self.config.manual_lock());
        self.surface.clear_outline_active();
        self.surface.set_outline_link_active(page_url, heading_id, true);

        if self.state.current_page_url() != Some(page_url) {
            if !self.is_known_page(page_url) {
                return;
            }
            self.surface.push_history(page_url);
            self.load_page(page_url, now);
        }

        // Keep the clicked item visible once navigation settles: ancestors
        // first, then its own child list.
        self.outline.reveal(&mut self.surface, page_url, heading_id);
        self.outline.expand_node(&mut self.surface, page_url, heading_id);

        self.schedule(
            now + self.config.nav_scroll_delay(),
            PendingAction::ScrollToHeading {
                page_url: page_url.to_owned(),
                heading_id: heading_id.to_owned(),
            },
        );
        self.schedule(now + self.config.manual_lock(), PendingAction::ReleaseLock);
    }

    /// An outline expand/collapse affordance was clicked: the page panel's
    /// when `node_id` is `None`, a node's otherwise. Toggling never touches
    /// active state or navigation; the first panel toggle builds the
    /// outline lazily.
    pub fn on_outline_toggle(&mut self, page_url: &str, node_id: Option<&str>) {
        match node_id {
            None => self
                .outline
                .toggle_panel(&mut self.surface, &self.loader, page_url),
            Some(id) => self.outline.toggle_node(&mut self.surface, page_url, id),
        }
    }

    /// A page link in the overview panel was clicked.
    pub fn on_page_link_click(&mut self, page_url: &str, now: Instant) {
        if !self.is_known_page(page_url) {
            return;
        }
        self.surface.push_history(page_url);
        self.load_page(page_url, now);
    }

    /// The host reported a history pop (back/forward). Known paths load
    /// without pushing a new entry; unknown paths are ignored.
    pub fn on_pop_state(&mut self, now: Instant) {
        let path = self.surface.current_path();
        if self.is_known_page(&path) {
            self.load_page(&path, now);
        }
    }

    /// A copy affordance on a code block was clicked.
    pub fn on_copy_click(&mut self, block: ElementRef) {
        copy_code_block(&mut self.surface, block);
    }

    fn is_known_page(&self, page_url: &str) -> bool {
        self.pages.iter().any(|page| page.url == page_url)
    }

    fn schedule(&mut self, due: Instant, action: PendingAction) {
        self.pending.push(Scheduled { due, action });
    }

    /// Load a page into the content viewport and rewire the spy and outline
    /// panel around it.
    ///
    /// Each load claims a fresh request number; a load that completes under
    /// a stale number is discarded, so the latest navigation always wins.
    fn load_page(&mut self, page_url: &str, now: Instant) {
        self.latest_request += 1;
        let request = self.latest_request;

        self.surface.clear_page_active();
        self.surface.set_page_active(page_url, true);

        match self.loader.load(&mut self.surface, page_url) {
            LoadOutcome::Loaded(headings) => {
                if request != self.latest_request {
                    tracing::debug!(url = %page_url, "discarding stale page load");
                    return;
                }
                self.state.current_page_url = Some(page_url.to_owned());
                self.spy.set_headings(headings);
                self.schedule(now + self.config.settle_delay(), PendingAction::SettleSpy);

                // Unfold the loaded page's outline, building it on first
                // visit.
                if self
                    .outline
                    .ensure_built(&mut self.surface, &self.loader, page_url)
                {
                    self.outline.set_panel_open(&mut self.surface, page_url, true);
                }
            }
            LoadOutcome::Failed => {
                // The loader already installed the error message; stop
                // tracking the torn-down heading set.
                self.spy.set_headings(Vec::new());
            }
        }
    }

    /// Apply a scroll-spy result: restyle the active outline link and keep
    /// nested headings visible in the outline.
    fn apply_current_heading(&mut self, index: usize, now: Instant) {
        if self.state.manual_lock_active(now) {
            if let Some(lock) = &self.state.manual_lock {
                tracing::debug!(
                    page = %lock.page_url,
                    heading = %lock.heading_id,
                    "manual selection lock active, suppressing scroll update"
                );
            }
            return;
        }

        let Some(page_url) = self.state.current_page_url().map(str::to_owned) else {
            return;
        };
        let Some(heading) = self.spy.headings().get(index) else {
            return;
        };
        let heading_id = heading.id.clone();
        let level = heading.level;

        self.surface.clear_outline_active();
        self.surface
            .set_outline_link_active(&page_url, &heading_id, true);

        if level >= self.config.auto_expand_min_level {
            self.outline.reveal(&mut self.surface, &page_url, &heading_id);
        }
        if self.outline.is_panel_open(&page_url) {
            self.surface
                .scroll_outline_link_into_view(&page_url, &heading_id);
        }
    }

    /// Scroll the content viewport to a heading, resolving by id first and
    /// by heading text as a fallback.
    fn scroll_to_heading(&mut self, page_url: &str, heading_id: &str) {
        if self.state.current_page_url() != Some(page_url) {
            return;
        }

        let index = self.spy.find_by_id(heading_id).or_else(|| {
            self.outline
                .heading_text(page_url, heading_id)
                .and_then(|text| self.spy.find_by_text(&text))
        });

        if let Some(index) = index {
            let element = self.spy.headings()[index].element;
            self.surface.scroll_to_element(element);
        }
    }
}
