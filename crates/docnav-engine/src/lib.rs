//! Navigation coordination for the docnav documentation engine.
//!
//! This crate ties the lower layers together into the browser-resident
//! engine: [`NavigationCoordinator`] owns the navigation state machine,
//! arbitrates between user clicks and scroll-driven updates, drives host
//! history, and lazily materializes per-page outlines.
//!
//! # Architecture
//!
//! ```text
//! Host events ──► NavigationCoordinator ──► Surface (host page)
//!                     │        │
//!                     │        ├─► ScrollSpy (current heading)
//!                     │        ├─► OutlineRenderer (outline UI state)
//!                     │        └─► ContentLoader (fetch + install)
//!                     │
//!                     └─► NavigationState (current page, manual lock)
//! ```
//!
//! Execution is single-threaded and host-driven: the host delivers events
//! (`on_scroll`, `on_outline_click`, `on_pop_state`, ...) and pumps
//! [`NavigationCoordinator::tick`] with the current time. Deferred work
//! (debounced scroll recomputes, settle re-checks, lock release) lives in a
//! deadline queue drained by `tick`; there are no timers and no threads.

mod config;
mod coordinator;
mod outline_view;
mod spy;

pub use config::EngineConfig;
pub use coordinator::{NavigationCoordinator, NavigationState, PageEntry};
pub use outline_view::OutlineRenderer;
pub use spy::ScrollSpy;
