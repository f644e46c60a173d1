//! Outline forest construction.

use crate::types::{Heading, OutlineNode};

/// Nest a flat, document-ordered heading sequence into an outline forest.
///
/// Single left-to-right pass over the headings with a stack of open nodes: a
/// heading of level L closes every open heading of level >= L, then becomes
/// either a new root (empty stack) or the last child of the stack top.
/// Missing ancestor levels are not synthesized — a level-3 heading appearing
/// before any level-1/2 heading becomes a top-level root.
#[must_use]
pub fn build_forest(headings: Vec<Heading>) -> Vec<OutlineNode> {
    let mut forest: Vec<OutlineNode> = Vec::new();
    let mut stack: Vec<OutlineNode> = Vec::new();

    for heading in headings {
        while stack
            .last()
            .is_some_and(|open| open.heading.level >= heading.level)
        {
            let closed = stack.pop().expect("stack top was just checked");
            attach(closed, &mut stack, &mut forest);
        }
        stack.push(OutlineNode::new(heading));
    }

    while let Some(closed) = stack.pop() {
        attach(closed, &mut stack, &mut forest);
    }

    forest
}

/// Attach a closed node to the current stack top, or to the forest roots when
/// nothing is open.
fn attach(node: OutlineNode, stack: &mut Vec<OutlineNode>, forest: &mut Vec<OutlineNode>) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(node);
    } else {
        forest.push(node);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::types::ElementRef;

    fn headings(levels: &[u8]) -> Vec<Heading> {
        levels
            .iter()
            .enumerate()
            .map(|(i, level)| Heading {
                text: format!("H{i}"),
                level: *level,
                element: ElementRef::new(i as u64),
                id: format!("h{i}"),
            })
            .collect()
    }

    fn flatten<'a>(forest: &'a [OutlineNode], out: &mut Vec<&'a Heading>) {
        for node in forest {
            out.push(&node.heading);
            flatten(&node.children, out);
        }
    }

    fn check_invariant(forest: &[OutlineNode]) {
        for node in forest {
            for child in &node.children {
                assert!(
                    child.heading.level > node.heading.level,
                    "child {} not deeper than parent {}",
                    child.heading.id,
                    node.heading.id
                );
            }
            check_invariant(&node.children);
        }
    }

    #[test]
    fn test_standard_nesting_shape() {
        let forest = build_forest(headings(&[1, 2, 3, 2, 1]));

        assert_eq!(forest.len(), 2);
        let first = &forest[0];
        assert_eq!(first.children.len(), 2);
        assert_eq!(first.children[0].heading.level, 2);
        assert_eq!(first.children[0].children.len(), 1);
        assert_eq!(first.children[0].children[0].heading.level, 3);
        assert_eq!(first.children[1].heading.level, 2);
        assert!(first.children[1].children.is_empty());
        assert!(forest[1].children.is_empty());
    }

    #[test]
    fn test_preorder_walk_reproduces_input_order() {
        let input = headings(&[2, 3, 1, 4, 4, 2, 6]);
        let forest = build_forest(input.clone());

        let mut walked = Vec::new();
        flatten(&forest, &mut walked);
        let walked_ids: Vec<&str> = walked.iter().map(|h| h.id.as_str()).collect();
        let input_ids: Vec<&str> = input.iter().map(|h| h.id.as_str()).collect();
        assert_eq!(walked_ids, input_ids);
        check_invariant(&forest);
    }

    #[test]
    fn test_deep_heading_before_shallow_becomes_root() {
        let forest = build_forest(headings(&[3, 1]));

        assert_eq!(forest.len(), 2);
        assert_eq!(forest[0].heading.level, 3);
        assert!(forest[0].children.is_empty());
        assert_eq!(forest[1].heading.level, 1);
    }

    #[test]
    fn test_equal_levels_are_siblings() {
        let forest = build_forest(headings(&[2, 2, 2]));

        assert_eq!(forest.len(), 3);
        assert!(forest.iter().all(|node| node.children.is_empty()));
    }

    #[test]
    fn test_empty_input_builds_empty_forest() {
        assert!(build_forest(Vec::new()).is_empty());
    }

    #[test]
    fn test_skipped_levels_still_nest() {
        let forest = build_forest(headings(&[1, 4, 2]));

        assert_eq!(forest.len(), 1);
        let root = &forest[0];
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].heading.level, 4);
        assert_eq!(root.children[1].heading.level, 2);
    }
}
