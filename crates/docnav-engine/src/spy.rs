//! Scroll position tracking.
//!
//! [`ScrollSpy`] determines which heading is "current" for the visible
//! viewport. Scroll events arrive in bursts, so they are coalesced by a
//! trailing-edge debounce: [`ScrollSpy::record_scroll`] only arms a deadline,
//! and the recompute happens when [`ScrollSpy::poll`] observes the deadline
//! passed with no newer event.

use std::time::{Duration, Instant};

use docnav_outline::Heading;
use docnav_surface::Surface;

/// Trailing-edge debouncer: the deadline moves with every recorded event and
/// fires once the quiet period elapses.
#[derive(Debug)]
struct ScrollDebouncer {
    quiet: Duration,
    deadline: Option<Instant>,
}

impl ScrollDebouncer {
    fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            deadline: None,
        }
    }

    fn record(&mut self, now: Instant) {
        self.deadline = Some(now + self.quiet);
    }

    fn fire(&mut self, now: Instant) -> bool {
        if self.deadline.is_some_and(|deadline| deadline <= now) {
            self.deadline = None;
            true
        } else {
            false
        }
    }
}

/// Determines the currently read heading from viewport geometry.
#[derive(Debug)]
pub struct ScrollSpy {
    headings: Vec<Heading>,
    offset: f64,
    debouncer: ScrollDebouncer,
}

impl ScrollSpy {
    /// Create a spy with the given threshold offset and debounce quiet
    /// period.
    #[must_use]
    pub fn new(offset: f64, quiet: Duration) -> Self {
        Self {
            headings: Vec::new(),
            offset,
            debouncer: ScrollDebouncer::new(quiet),
        }
    }

    /// Track a new page's heading set, dropping any pending scroll event.
    pub fn set_headings(&mut self, headings: Vec<Heading>) {
        self.headings = headings;
        self.debouncer.deadline = None;
    }

    /// Headings of the tracked page, in document order.
    #[must_use]
    pub fn headings(&self) -> &[Heading] {
        &self.headings
    }

    /// Record a scroll event; the recompute is deferred to [`poll`](Self::poll).
    pub fn record_scroll(&mut self, now: Instant) {
        self.debouncer.record(now);
    }

    /// Recompute the current heading if the debounce quiet period elapsed.
    pub fn poll(&mut self, now: Instant, surface: &impl Surface) -> Option<usize> {
        if self.debouncer.fire(now) {
            self.current(surface)
        } else {
            None
        }
    }

    /// Earliest pending deadline, for host timer scheduling.
    #[must_use]
    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline
    }

    /// Index of the current heading for the viewport.
    ///
    /// Scans from the last heading to the first; the current heading is the
    /// last one whose top edge has scrolled past the threshold offset. When
    /// the viewport sits above every heading, the first heading is current.
    /// The bias toward "the section being read" over "the section whose top
    /// is visible" is deliberate.
    #[must_use]
    pub fn current(&self, surface: &impl Surface) -> Option<usize> {
        if self.headings.is_empty() {
            return None;
        }

        for (index, heading) in self.headings.iter().enumerate().rev() {
            if let Some(top) = surface.heading_viewport_top(heading.element) {
                if top <= self.offset {
                    return Some(index);
                }
            }
        }

        Some(0)
    }

    /// Index of the heading with the given anchor id.
    #[must_use]
    pub fn find_by_id(&self, id: &str) -> Option<usize> {
        self.headings.iter().position(|h| h.id == id)
    }

    /// Index of the first heading with the given text (whitespace-trimmed).
    #[must_use]
    pub fn find_by_text(&self, text: &str) -> Option<usize> {
        let needle = text.trim();
        self.headings.iter().position(|h| h.text == needle)
    }
}
