//! Shared `quick-xml` helpers for reading and rewriting page elements.

use super::PageError;
use quick_xml::{
    Reader, Writer,
    escape::{resolve_html5_entity, unescape_with},
    events::{BytesEnd, BytesStart, BytesText, Event},
};
use std::borrow::Cow;
use std::fmt::Display;
use std::io::Cursor;

pub type XmlWriter = Writer<Cursor<Vec<u8>>>;

/// HTML elements that never have a closing tag.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Elements whose content is raw text, not markup.
const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

#[inline]
pub fn create_xml_reader(content: &[u8]) -> Reader<&[u8]> {
    let mut reader = Reader::from_reader(content);
    reader.config_mut().trim_text(false);
    reader.config_mut().enable_all_checks(false);
    reader
}

#[inline]
pub fn write_err(err: impl Display) -> PageError {
    PageError::Write(err.to_string())
}

/// Lowercased element name.
pub fn elem_name(elem: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(elem.name().as_ref()).to_ascii_lowercase()
}

#[inline]
pub fn is_void(name: &str) -> bool {
    VOID_ELEMENTS.contains(&name)
}

#[inline]
pub fn is_raw_text(name: &str) -> bool {
    RAW_TEXT_ELEMENTS.contains(&name)
}

/// Resolve character and HTML entity references; unknown ones stay literal.
pub fn unescape_text(raw: &str) -> Cow<'_, str> {
    if !raw.contains('&') {
        return Cow::Borrowed(raw);
    }
    if let Ok(text) = unescape_with(raw, resolve_html5_entity) {
        return text;
    }

    // Some reference is unknown: resolve them one at a time.
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let name_len = tail[1..]
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '#'))
            .unwrap_or(tail.len() - 1);

        if tail[1 + name_len..].starts_with(';') && name_len > 0 {
            let reference = &tail[..name_len + 2];
            match unescape_with(reference, resolve_html5_entity) {
                Ok(text) => out.push_str(&text),
                Err(_) => out.push_str(reference),
            }
            rest = &tail[name_len + 2..];
        } else {
            out.push('&');
            rest = &tail[1..];
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

/// Unescaped value of attribute `key`, if present.
pub fn attr_value(elem: &BytesStart<'_>, key: &str) -> Option<String> {
    elem.html_attributes()
        .flatten()
        .find(|attr| attr.key.as_ref().eq_ignore_ascii_case(key.as_bytes()))
        .map(|attr| unescape_text(&String::from_utf8_lossy(&attr.value)).into_owned())
}

/// Whether the element's `class` list contains `class`.
pub fn has_class(elem: &BytesStart<'_>, class: &str) -> bool {
    attr_value(elem, "class").is_some_and(|v| v.split_whitespace().any(|c| c == class))
}

/// Rebuild an element with transformed attributes (avoids duplication bug).
fn rebuild_elem<F>(elem: &BytesStart<'_>, mut transform: F) -> BytesStart<'static>
where
    F: FnMut(&[u8], Cow<'_, [u8]>) -> Cow<'static, [u8]>,
{
    let tag = String::from_utf8_lossy(elem.name().as_ref()).into_owned();
    let attrs: Vec<_> = elem
        .html_attributes()
        .flatten()
        .map(|attr| {
            let key = attr.key.as_ref().to_vec();
            let value = transform(attr.key.as_ref(), attr.value);
            (key, value)
        })
        .collect();

    let mut new_elem = BytesStart::new(tag);
    for (k, v) in attrs {
        new_elem.push_attribute((k.as_slice(), v.as_ref()));
    }
    new_elem
}

/// Escape an attribute value for direct insertion as raw bytes.
fn escaped_attr(value: &str) -> Cow<'static, [u8]> {
    quick_xml::escape::escape(value).into_owned().into_bytes().into()
}

/// Re-escape a raw attribute value for a double-quoted attribute.
///
/// Single-quoted source values may hold a bare `"`.
fn requoted_attr(raw: &[u8]) -> Cow<'static, [u8]> {
    escaped_attr(&unescape_text(&String::from_utf8_lossy(raw)))
}

/// Rebuild an element with classes added/removed, keeping other classes in order.
///
/// A `class` attribute is created when needed and dropped when it ends up empty.
pub fn with_classes(elem: &BytesStart<'_>, add: &[&str], remove: &[&str]) -> BytesStart<'static> {
    let mut seen_class = false;
    let mut drop_class = false;

    let mut new_elem = rebuild_elem(elem, |key, value| {
        if !key.eq_ignore_ascii_case(b"class") {
            return requoted_attr(&value);
        }
        seen_class = true;
        let existing = unescape_text(&String::from_utf8_lossy(&value)).into_owned();
        let classes = merge_classes(&existing, add, remove);
        drop_class = classes.is_empty();
        escaped_attr(&classes)
    });

    if drop_class {
        new_elem = without_attr(&new_elem, "class");
    } else if !seen_class && !add.is_empty() {
        new_elem.push_attribute(("class", merge_classes("", add, remove).as_str()));
    }
    new_elem
}

/// Rebuild an element with attribute `key` set to `value` (added if missing).
pub fn with_attr(elem: &BytesStart<'_>, key: &str, value: &str) -> BytesStart<'static> {
    let mut seen = false;
    let mut new_elem = rebuild_elem(elem, |k, v| {
        if k.eq_ignore_ascii_case(key.as_bytes()) {
            seen = true;
            escaped_attr(value)
        } else {
            requoted_attr(&v)
        }
    });
    if !seen {
        new_elem.push_attribute((key, value));
    }
    new_elem
}

fn without_attr(elem: &BytesStart<'_>, key: &str) -> BytesStart<'static> {
    let tag = String::from_utf8_lossy(elem.name().as_ref()).into_owned();
    let mut new_elem = BytesStart::new(tag);
    for attr in elem.html_attributes().flatten() {
        if !attr.key.as_ref().eq_ignore_ascii_case(key.as_bytes()) {
            new_elem.push_attribute((attr.key.as_ref(), requoted_attr(&attr.value).as_ref()));
        }
    }
    new_elem
}

/// `existing` minus `remove`, plus any of `add` not already present.
fn merge_classes(existing: &str, add: &[&str], remove: &[&str]) -> String {
    let mut classes: Vec<&str> = existing
        .split_whitespace()
        .filter(|c| !remove.contains(c))
        .collect();
    for class in add {
        if !class.is_empty() && !classes.contains(class) {
            classes.push(class);
        }
    }
    classes.join(" ")
}

/// Write `elem` as a start tag (or self-closing when `empty`).
#[inline]
pub fn write_start(writer: &mut XmlWriter, elem: BytesStart<'_>, empty: bool) -> Result<(), PageError> {
    let event = if empty {
        Event::Empty(elem)
    } else {
        Event::Start(elem)
    };
    writer.write_event(event).map_err(write_err)
}

/// Write `<elem>text</elem>`, replacing whatever the element held.
pub fn write_text_element(
    writer: &mut XmlWriter,
    elem: BytesStart<'_>,
    text: &str,
) -> Result<(), PageError> {
    let name = String::from_utf8_lossy(elem.name().as_ref()).into_owned();
    writer.write_event(Event::Start(elem)).map_err(write_err)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(write_err)?;
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(write_err)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn start(markup: &str) -> BytesStart<'static> {
        let mut reader = create_xml_reader(markup.as_bytes());
        match reader.read_event().unwrap() {
            Event::Start(e) | Event::Empty(e) => e.into_owned(),
            other => panic!("expected element, got {other:?}"),
        }
    }

    fn to_string(elem: BytesStart<'_>) -> String {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        writer.write_event(Event::Empty(elem)).unwrap();
        String::from_utf8(writer.into_inner().into_inner()).unwrap()
    }

    #[test]
    fn test_elem_name_lowercased() {
        assert_eq!(elem_name(&start("<DIV class=\"x\">")), "div");
    }

    #[test]
    fn test_void_and_raw_text() {
        assert!(is_void("input"));
        assert!(is_void("br"));
        assert!(!is_void("div"));
        assert!(is_raw_text("script"));
        assert!(!is_raw_text("p"));
    }

    #[test]
    fn test_unescape_text_html_entities() {
        assert_eq!(unescape_text("a &amp; b"), "a & b");
        assert_eq!(unescape_text("caf&eacute; &#8212; x"), "café — x");
        assert_eq!(unescape_text("1&nbsp;2"), "1\u{a0}2");
        // unknown entity stays as written, known ones around it resolve
        assert_eq!(unescape_text("&bogus; x"), "&bogus; x");
        assert_eq!(unescape_text("&lt;&bogus;&gt; & more"), "<&bogus;> & more");
    }

    #[test]
    fn test_attr_value_and_has_class() {
        let elem = start(r#"<div class="post-box  featured" data-tags="a &amp; b">"#);
        assert_eq!(attr_value(&elem, "data-tags").as_deref(), Some("a & b"));
        assert_eq!(attr_value(&elem, "id"), None);
        assert!(has_class(&elem, "post-box"));
        assert!(has_class(&elem, "featured"));
        assert!(!has_class(&elem, "post"));
    }

    #[test]
    fn test_with_classes_add_and_remove() {
        let elem = start(r#"<div class="post-box tag-hidden" id="p1">"#);
        let out = to_string(with_classes(&elem, &["search-hidden"], &["tag-hidden", "search-hidden"]));
        assert_eq!(out, r#"<div class="post-box search-hidden" id="p1"/>"#);
    }

    #[test]
    fn test_with_classes_creates_and_drops_attribute() {
        let elem = start(r#"<button data-tag="a">"#);
        let out = to_string(with_classes(&elem, &["active"], &[]));
        assert_eq!(out, r#"<button data-tag="a" class="active"/>"#);

        let elem = start(r#"<button class="active" data-tag="a">"#);
        let out = to_string(with_classes(&elem, &[], &["active"]));
        assert_eq!(out, r#"<button data-tag="a"/>"#);
    }

    #[test]
    fn test_with_classes_is_idempotent() {
        let elem = start(r#"<span class="post-tag">"#);
        let once = with_classes(&elem, &["highlight"], &["highlight"]);
        let twice = with_classes(&once, &["highlight"], &["highlight"]);
        assert_eq!(to_string(once), to_string(twice));
    }

    #[test]
    fn test_with_attr_replaces_or_adds() {
        let elem = start(r#"<input id="search-input" value="old">"#);
        let out = to_string(with_attr(&elem, "value", "a \"b\" & c"));
        assert_eq!(out, r#"<input id="search-input" value="a &quot;b&quot; &amp; c"/>"#);

        let elem = start(r#"<input id="search-input">"#);
        let out = to_string(with_attr(&elem, "value", "rust"));
        assert_eq!(out, r#"<input id="search-input" value="rust"/>"#);
    }

    #[test]
    fn test_rebuild_requotes_single_quoted_values() {
        let elem = start(r#"<div class="post-box" title='say "hi"' data-tags="a &amp; b">"#);
        let out = to_string(with_classes(&elem, &["search-hidden"], &[]));
        assert_eq!(
            out,
            r#"<div class="post-box search-hidden" title="say &quot;hi&quot;" data-tags="a &amp; b"/>"#
        );

        let out = to_string(with_attr(&elem, "data-x", "1"));
        assert!(out.contains(r#"title="say &quot;hi&quot;""#));

        let elem = start(r#"<button class="active" title='a "b"'>"#);
        let out = to_string(with_classes(&elem, &[], &["active"]));
        assert_eq!(out, r#"<button title="a &quot;b&quot;"/>"#);
    }

    #[test]
    fn test_merge_classes() {
        assert_eq!(merge_classes("a b c", &["d", "a"], &["b"]), "a c d");
        assert_eq!(merge_classes("", &[], &[]), "");
    }
}
