//! Fragment extraction and heading id rewriting.
//!
//! Documents fetched from the static-site output are HTML, not XML, so the
//! reader runs with end-name checking off and treats void elements
//! (`<br>`, `<img>`, ...) as non-nesting. Extraction slices the original
//! document by byte offsets, so entities and formatting pass through
//! untouched.

use std::fmt::Write;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

/// HTML void elements: never nest, may appear unclosed.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

fn is_heading(tag: &str) -> bool {
    matches!(tag, "h1" | "h2" | "h3" | "h4" | "h5" | "h6")
}

fn tag_name(e: &BytesStart) -> String {
    String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase()
}

fn html_reader(input: &str) -> Reader<&[u8]> {
    let mut reader = Reader::from_str(input);
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;
    config.allow_unmatched_ends = true;
    reader
}

/// Extract the inner markup of the content region from a fetched document.
///
/// Falls back to the `<body>` inner markup when the region is absent, then to
/// the whole document. Extraction is best-effort: markup the reader cannot
/// make sense of falls through to the next strategy instead of failing.
pub(crate) fn extract_fragment(document: &str, content_region_id: &str) -> String {
    if let Some(inner) = find_inner(document, &|_, e| has_id(e, content_region_id)) {
        return inner;
    }
    if let Some(inner) = find_inner(document, &|name, _| name == "body") {
        return inner;
    }
    document.to_owned()
}

/// Inner markup of the first element accepted by `matches`.
fn find_inner(document: &str, matches: &dyn Fn(&str, &BytesStart) -> bool) -> Option<String> {
    let mut reader = html_reader(document);
    let mut target: Option<(usize, String)> = None;
    let mut depth = 0usize;

    loop {
        let before = reader.buffer_position() as usize;
        let Ok(event) = reader.read_event() else {
            return None;
        };

        match event {
            Event::Start(e) => {
                let name = tag_name(&e);
                if target.is_none() {
                    if matches(&name, &e) {
                        target = Some((reader.buffer_position() as usize, name));
                    }
                } else if !is_void(&name) {
                    depth += 1;
                }
            }
            Event::End(e) => {
                if let Some((start, tag)) = &target {
                    let name = String::from_utf8_lossy(e.name().as_ref()).to_ascii_lowercase();
                    if depth == 0 {
                        if name == *tag {
                            return Some(document[*start..before].to_owned());
                        }
                        // stray end tag inside the region
                    } else if !is_void(&name) {
                        depth -= 1;
                    }
                }
            }
            Event::Eof => {
                // Unclosed region: everything to the end of the document.
                return target.map(|(start, _)| document[start..].to_owned());
            }
            _ => {}
        }
    }
}

fn has_id(e: &BytesStart, id: &str) -> bool {
    e.try_get_attribute("id")
        .ok()
        .flatten()
        .is_some_and(|attr| attr.value.as_ref() == id.as_bytes())
}

/// Rewrite heading open tags so the nth heading carries `ids[n]`.
///
/// An id the heading already has is replaced; other attributes are kept
/// as written. Headings beyond the id list are left untouched.
pub(crate) fn apply_heading_ids(fragment: &str, ids: &[&str]) -> Result<String, quick_xml::Error> {
    let mut reader = html_reader(fragment);
    let mut out = String::with_capacity(fragment.len() + ids.len() * 16);
    let mut copied = 0usize;
    let mut seen = 0usize;

    loop {
        let before = reader.buffer_position() as usize;
        match reader.read_event()? {
            Event::Start(e) => {
                let name = tag_name(&e);
                if is_heading(&name) {
                    if let Some(id) = ids.get(seen) {
                        let after = reader.buffer_position() as usize;
                        out.push_str(&fragment[copied..before]);
                        out.push_str(&rebuild_heading_tag(&name, &e, id));
                        copied = after;
                    }
                    seen += 1;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    out.push_str(&fragment[copied..]);
    Ok(out)
}

fn rebuild_heading_tag(name: &str, e: &BytesStart, id: &str) -> String {
    let mut tag = format!(r#"<{name} id="{id}""#);
    for attr in e.attributes().flatten() {
        if attr.key.as_ref().eq_ignore_ascii_case(b"id") {
            continue;
        }
        let key = String::from_utf8_lossy(attr.key.as_ref());
        let value = String::from_utf8_lossy(&attr.value);
        write!(tag, r#" {key}="{value}""#).unwrap();
    }
    tag.push('>');
    tag
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const DOCUMENT: &str = concat!(
        "<html><head><meta charset=\"utf-8\"><title>Guide</title></head>",
        "<body><nav>skip</nav>",
        "<div id=\"content\"><h1>Guide</h1><p>Intro<br>text</p>",
        "<div class=\"note\"><img src=\"a.png\">nested</div></div>",
        "<footer>skip</footer></body></html>",
    );

    #[test]
    fn test_extracts_content_region() {
        let fragment = extract_fragment(DOCUMENT, "content");
        assert_eq!(
            fragment,
            "<h1>Guide</h1><p>Intro<br>text</p><div class=\"note\"><img src=\"a.png\">nested</div>"
        );
    }

    #[test]
    fn test_falls_back_to_body() {
        let document = "<html><body><h1>Bare</h1><p>No region</p></body></html>";
        assert_eq!(
            extract_fragment(document, "content"),
            "<h1>Bare</h1><p>No region</p>"
        );
    }

    #[test]
    fn test_falls_back_to_whole_document() {
        let document = "<h1>Loose</h1><p>fragment only</p>";
        assert_eq!(extract_fragment(document, "content"), document);
    }

    #[test]
    fn test_unclosed_region_runs_to_document_end() {
        let document = "<div id=\"content\"><h1>Open</h1><p>rest";
        assert_eq!(
            extract_fragment(document, "content"),
            "<h1>Open</h1><p>rest"
        );
    }

    #[test]
    fn test_region_with_entities_passes_through() {
        let document = "<body><div id=\"content\"><p>a&nbsp;&mdash;&amp;b</p></div></body>";
        assert_eq!(
            extract_fragment(document, "content"),
            "<p>a&nbsp;&mdash;&amp;b</p>"
        );
    }

    #[test]
    fn test_apply_ids_inserts_and_replaces() {
        let fragment = "<h1>Guide</h1><h2 class=\"x\" id=\"old\">Setup</h2><p>text</p>";
        let rewritten = apply_heading_ids(fragment, &["guide", "setup"]).unwrap();
        assert_eq!(
            rewritten,
            "<h1 id=\"guide\">Guide</h1><h2 id=\"setup\" class=\"x\">Setup</h2><p>text</p>"
        );
    }

    #[test]
    fn test_apply_ids_leaves_extra_headings_untouched() {
        let fragment = "<h2>A</h2><h2>B</h2>";
        let rewritten = apply_heading_ids(fragment, &["a"]).unwrap();
        assert_eq!(rewritten, "<h2 id=\"a\">A</h2><h2>B</h2>");
    }

    #[test]
    fn test_apply_ids_keeps_inline_markup() {
        let fragment = "<h2>Install <code>npm</code></h2>";
        let rewritten = apply_heading_ids(fragment, &["install-npm"]).unwrap();
        assert_eq!(
            rewritten,
            "<h2 id=\"install-npm\">Install <code>npm</code></h2>"
        );
    }
}
