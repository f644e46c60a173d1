//! Stable anchor id assignment for headings.

use std::collections::{HashMap, HashSet};

use crate::types::{Heading, HeadingElement};

/// Maximum length of a slug-derived base id.
const MAX_SLUG_LEN: usize = 50;

/// Normalize heading text into an anchor slug.
///
/// Lowercases, strips everything outside `[a-z0-9\s-]`, collapses whitespace
/// runs into single hyphens, and truncates to 50 characters. May return an
/// empty string when the text contains no usable characters.
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len().min(MAX_SLUG_LEN));
    let mut pending_gap = false;
    for ch in text.trim().to_lowercase().chars() {
        if ch.is_whitespace() {
            pending_gap = !slug.is_empty();
        } else if ch.is_ascii_lowercase() || ch.is_ascii_digit() || ch == '-' {
            if pending_gap {
                slug.push('-');
                pending_gap = false;
            }
            slug.push(ch);
        }
    }
    slug.truncate(MAX_SLUG_LEN);
    slug
}

/// Assigns deterministic, pairwise-unique anchor ids to a heading sequence.
///
/// Repeated heading text gets an occurrence suffix: the second `Overview`
/// becomes `overview-2`, the third `overview-3`. Headings whose text strips
/// down to nothing fall back to `heading-<index>` using their 0-based
/// position. Distinct texts that happen to slug to the same base id are
/// disambiguated the same way, so ids stay unique even for pathological
/// input.
#[derive(Debug, Default)]
pub struct HeadingIdentifier {
    occurrences: HashMap<String, usize>,
    taken: HashSet<String>,
}

impl HeadingIdentifier {
    /// Create a fresh identifier with no recorded occurrences.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Produce a [`Heading`] for every element, assigning ids in document
    /// order.
    pub fn identify(&mut self, elements: &[HeadingElement]) -> Vec<Heading> {
        elements
            .iter()
            .enumerate()
            .map(|(index, element)| {
                let text = element.text.trim().to_owned();
                let id = self.next_id(&text, index);
                Heading {
                    text,
                    level: element.level,
                    element: element.element,
                    id,
                }
            })
            .collect()
    }

    fn next_id(&mut self, text: &str, index: usize) -> String {
        let base = {
            let slug = slugify(text);
            if slug.is_empty() {
                format!("heading-{index}")
            } else {
                slug
            }
        };

        let count = self
            .occurrences
            .entry(text.to_owned())
            .and_modify(|c| *c += 1)
            .or_insert(1);

        let mut candidate = if *count > 1 {
            format!("{base}-{count}")
        } else {
            base.clone()
        };

        // Distinct texts can slug to the same base; bump until free.
        let mut bump = 2;
        while self.taken.contains(&candidate) {
            candidate = format!("{base}-{bump}");
            bump += 1;
        }

        self.taken.insert(candidate.clone());
        candidate
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::types::ElementRef;

    fn elements(texts: &[&str]) -> Vec<HeadingElement> {
        texts
            .iter()
            .enumerate()
            .map(|(i, text)| HeadingElement {
                element: ElementRef::new(i as u64),
                level: 2,
                text: (*text).to_owned(),
            })
            .collect()
    }

    fn ids(texts: &[&str]) -> Vec<String> {
        HeadingIdentifier::new()
            .identify(&elements(texts))
            .into_iter()
            .map(|h| h.id)
            .collect()
    }

    #[test]
    fn test_slugify_basic() {
        assert_eq!(slugify("Getting Started"), "getting-started");
    }

    #[test]
    fn test_slugify_strips_punctuation() {
        assert_eq!(slugify("What's new?"), "whats-new");
    }

    #[test]
    fn test_slugify_collapses_whitespace_runs() {
        assert_eq!(slugify("a \t  b\nc"), "a-b-c");
    }

    #[test]
    fn test_slugify_truncates_to_fifty() {
        let long = "x".repeat(80);
        assert_eq!(slugify(&long).len(), 50);
    }

    #[test]
    fn test_slugify_symbols_only_is_empty() {
        assert_eq!(slugify("§§ ±± !!"), "");
    }

    #[test]
    fn test_duplicate_text_gets_occurrence_suffix() {
        assert_eq!(
            ids(&["Overview", "Overview", "Overview"]),
            vec!["overview", "overview-2", "overview-3"]
        );
    }

    #[test]
    fn test_symbol_only_heading_falls_back_to_position() {
        assert_eq!(ids(&["First", "!!!", "Last"]), vec!["first", "heading-1", "last"]);
    }

    #[test]
    fn test_distinct_texts_with_colliding_slugs_stay_unique() {
        assert_eq!(ids(&["Setup!", "Setup?"]), vec!["setup", "setup-2"]);
    }

    #[test]
    fn test_ids_are_deterministic_and_pairwise_unique() {
        let texts = ["Intro", "Intro", "intro", "§", "§", "A  B", "A B"];
        let first = ids(&texts);
        let second = ids(&texts);
        assert_eq!(first, second);

        let mut seen = std::collections::HashSet::new();
        for id in &first {
            assert!(seen.insert(id.clone()), "duplicate id {id}");
        }
    }

    #[test]
    fn test_identify_preserves_levels_and_elements() {
        let mut input = elements(&["Top", "Nested"]);
        input[1].level = 3;
        let headings = HeadingIdentifier::new().identify(&input);
        assert_eq!(headings[0].level, 2);
        assert_eq!(headings[1].level, 3);
        assert_eq!(headings[1].element, ElementRef::new(1));
        assert_eq!(headings[1].id, "nested");
    }

    #[test]
    fn test_identify_trims_text() {
        let headings = HeadingIdentifier::new().identify(&elements(&["  Padded  "]));
        assert_eq!(headings[0].text, "Padded");
        assert_eq!(headings[0].id, "padded");
    }
}
