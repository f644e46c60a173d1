//! Data model for headings and outline trees.

/// Opaque handle to a rendered heading or code-block element.
///
/// Handles are minted by the rendering surface and are only meaningful to the
/// surface that produced them. Handles minted for a detached fragment become
/// dangling once the fragment is discarded; geometry queries on them return
/// `None`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ElementRef(u64);

impl ElementRef {
    /// Create a handle from a surface-assigned slot number.
    #[must_use]
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The surface-assigned slot number.
    #[must_use]
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// A heading element as reported by the rendering surface, before ids are
/// assigned.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeadingElement {
    /// Handle to the backing element.
    pub element: ElementRef,
    /// Heading level (1-6).
    pub level: u8,
    /// Text content with markup stripped.
    pub text: String,
}

/// A heading with its assigned anchor id.
///
/// Produced by [`HeadingIdentifier`](crate::HeadingIdentifier) in document
/// order. The `id` is unique within the fragment the heading came from.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Heading {
    /// Text content with markup stripped.
    pub text: String,
    /// Heading level (1-6).
    pub level: u8,
    /// Handle to the backing element.
    pub element: ElementRef,
    /// Anchor id, unique within the fragment.
    pub id: String,
}

/// A node in the outline forest.
///
/// Invariant: every child's level is strictly greater than the node's own
/// level. A pre-order walk of the forest reproduces the original document
/// order of the headings.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OutlineNode {
    /// The heading this node represents.
    pub heading: Heading,
    /// Nested headings, in document order.
    pub children: Vec<OutlineNode>,
}

impl OutlineNode {
    /// Create a leaf node for a heading.
    #[must_use]
    pub fn new(heading: Heading) -> Self {
        Self {
            heading,
            children: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_ref_round_trip() {
        let element = ElementRef::new(7);
        assert_eq!(element.raw(), 7);
        assert_eq!(element, ElementRef::new(7));
        assert_ne!(element, ElementRef::new(8));
    }

    #[test]
    fn test_outline_node_new_is_leaf() {
        let heading = Heading {
            text: "Overview".to_owned(),
            level: 2,
            element: ElementRef::new(0),
            id: "overview".to_owned(),
        };
        let node = OutlineNode::new(heading.clone());
        assert_eq!(node.heading, heading);
        assert!(node.children.is_empty());
    }
}
