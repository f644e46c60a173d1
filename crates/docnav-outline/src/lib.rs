//! Outline types and heading algorithms for the docnav engine.
//!
//! This crate holds the data model shared by every other docnav crate and the
//! two pure algorithms that derive an outline from rendered content:
//!
//! - [`HeadingIdentifier`]: assigns stable, collision-free ids to headings
//! - [`build_forest`]: nests a flat heading sequence into an outline forest
//!
//! Heading elements are referenced through the opaque [`ElementRef`] handle.
//! Only the rendering surface mints and dereferences handles; everything in
//! this crate treats them as tokens, so the algorithms work unchanged against
//! any rendering surface.

mod hierarchy;
mod identifier;
mod types;
mod util;

pub use hierarchy::build_forest;
pub use identifier::{HeadingIdentifier, slugify};
pub use types::{ElementRef, Heading, HeadingElement, OutlineNode};
pub use util::escape_html;
