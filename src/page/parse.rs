//! Split a listing page into layout segments and posts.

use super::common::{
    attr_value, create_xml_reader, elem_name, has_class, is_raw_text, is_void, unescape_text,
};
use super::{Controls, Layout, Page, PageError, PostMarkup, Segment, Slot, Token};
use crate::config::{FilterConfig, MarkupConfig};
use crate::post::{Field, Post, TagLabel, parse_tags};
use compact_str::CompactString;
use quick_xml::{
    Reader,
    events::{BytesStart, BytesText, Event},
};
use std::{mem, ops::Range};

/// Parse a listing page.
pub fn parse_page(content: &[u8], config: &FilterConfig) -> Result<Page, PageError> {
    let mut reader = create_xml_reader(content);
    let mut parser = Parser {
        config,
        segments: Vec::new(),
        posts: Vec::new(),
        controls: Controls::default(),
    };

    loop {
        match read(&mut reader)? {
            Event::Eof => break,
            Event::Start(elem) => parser.element(&mut reader, elem.into_owned(), false)?,
            Event::Empty(elem) => parser.element(&mut reader, elem.into_owned(), true)?,
            Event::End(elem) if elem.name().as_ref().eq_ignore_ascii_case(b"head") => {
                parser.segments.push(Segment::HeadEnd(elem.into_owned()));
            }
            event => parser.segments.push(Segment::Event(event.into_owned())),
        }
    }

    Ok(Page {
        layout: Layout {
            segments: parser.segments,
            hiding_style: parser.controls.hiding_style,
        },
        posts: parser.posts,
        controls: parser.controls,
    })
}

fn read<'a>(reader: &mut Reader<&'a [u8]>) -> Result<Event<'a>, PageError> {
    reader.read_event().map_err(|source| PageError::Parse {
        position: reader.error_position() as u64,
        source,
    })
}

// ============================================================================
// Page level
// ============================================================================

struct Parser<'c> {
    config: &'c FilterConfig,
    segments: Vec<Segment>,
    posts: Vec<Post>,
    controls: Controls,
}

impl Parser<'_> {
    fn element(
        &mut self,
        reader: &mut Reader<&[u8]>,
        elem: BytesStart<'static>,
        empty: bool,
    ) -> Result<(), PageError> {
        let config = self.config;
        let markup = &config.markup;
        let name = elem_name(&elem);

        if has_class(&elem, &markup.post_class) {
            let tokens = if empty {
                vec![Token::Event(Event::Empty(elem))]
            } else {
                collect_post(reader, elem, &config.search.highlight_class)?
            };
            self.segments.push(Segment::Post);
            self.posts.push(build_post(tokens, markup));
            return Ok(());
        }

        if !empty && is_raw_text(&name) {
            self.raw_text(reader, elem, &name);
            return Ok(());
        }

        if has_class(&elem, &markup.tag_button_class) {
            let label = attr_value(&elem, &markup.tag_attr).unwrap_or_default();
            let label = CompactString::from(label.trim());
            self.controls.tag_buttons.push(label.clone());
            self.segments.push(Segment::TagButton { elem, label, empty });
            return Ok(());
        }

        let id = attr_value(&elem, "id").unwrap_or_default();
        let controls = &mut self.controls;
        match id.as_str() {
            id if id == markup.search_input_id => {
                controls.search_input = Some(attr_value(&elem, "value").unwrap_or_default());
                self.segments.push(Segment::SearchInput { elem, empty });
                return Ok(());
            }
            id if id == markup.results_count_id => {
                return self.replace(reader, Slot::ResultsCount, elem, empty, &name);
            }
            id if id == markup.sort_label_id && config.sort.enable => {
                controls.sort_label = true;
                return self.replace(reader, Slot::SortLabel, elem, empty, &name);
            }
            id if id == markup.search_button_id => controls.search_button = true,
            id if id == markup.clear_search_id => controls.clear_search = true,
            id if id == markup.sort_button_id => controls.sort_button = true,
            _ => {}
        }

        let event = if empty {
            Event::Empty(elem)
        } else {
            Event::Start(elem)
        };
        self.segments.push(Segment::Event(event));
        Ok(())
    }

    /// Keep `<script>`/`<style>` content byte for byte.
    ///
    /// Raw text may contain `<` and `&`, so it is not tokenized: the reader is
    /// moved straight to the closing tag, which then comes back as a normal
    /// end event.
    fn raw_text(&mut self, reader: &mut Reader<&[u8]>, elem: BytesStart<'static>, name: &str) {
        let rest: &[u8] = *reader.get_ref();
        let close = format!("</{name}");
        let len = rest
            .windows(close.len())
            .position(|w| w.eq_ignore_ascii_case(close.as_bytes()))
            .unwrap_or(rest.len());
        let raw = String::from_utf8_lossy(&rest[..len]).into_owned();
        *reader.get_mut() = &rest[len..];

        if name == "style" && has_rules(&raw, &self.config.markup.hiding_style()) {
            self.controls.hiding_style = true;
        }

        self.segments.push(Segment::Event(Event::Start(elem)));
        if !raw.is_empty() {
            self.segments
                .push(Segment::Event(Event::Text(BytesText::from_escaped(raw))));
        }
    }

    /// Record an element whose content is generated, dropping its current content.
    fn replace(
        &mut self,
        reader: &mut Reader<&[u8]>,
        slot: Slot,
        elem: BytesStart<'static>,
        empty: bool,
        name: &str,
    ) -> Result<(), PageError> {
        if !empty && !is_void(name) {
            reader
                .read_to_end(elem.name())
                .map_err(|source| PageError::Parse {
                    position: reader.error_position() as u64,
                    source,
                })?;
        }
        self.segments.push(Segment::Replace { slot, elem });
        Ok(())
    }
}

// ============================================================================
// Post level
// ============================================================================

/// Read a post element to its end, merging character data into text tokens.
///
/// Highlight spans left by an earlier run are unwrapped so their text joins
/// the surrounding text again.
fn collect_post(
    reader: &mut Reader<&[u8]>,
    start: BytesStart<'static>,
    highlight_class: &str,
) -> Result<Vec<Token>, PageError> {
    let mut tokens = vec![Token::Event(Event::Start(start))];
    let mut text = String::new();
    // one entry per open element: whether it is an unwrapped highlight span
    let mut open = vec![false];

    let flush = |tokens: &mut Vec<Token>, text: &mut String| {
        if !text.is_empty() {
            tokens.push(Token::Text(mem::take(text)));
        }
    };

    loop {
        match read(reader)? {
            Event::Text(t) => text.push_str(&unescape_text(&String::from_utf8_lossy(&t))),
            Event::GeneralRef(r) => {
                let reference = format!("&{};", String::from_utf8_lossy(&r));
                text.push_str(&unescape_text(&reference));
            }
            Event::CData(c) => text.push_str(&String::from_utf8_lossy(&c)),
            Event::Start(e) => {
                let name = elem_name(&e);
                let unwrap = name == "span" && has_class(&e, highlight_class);
                if !is_void(&name) {
                    open.push(unwrap);
                }
                if !unwrap {
                    flush(&mut tokens, &mut text);
                    tokens.push(Token::Event(Event::Start(e.into_owned())));
                }
            }
            Event::End(e) => {
                if open.pop().unwrap_or(false) {
                    continue;
                }
                flush(&mut tokens, &mut text);
                tokens.push(Token::Event(Event::End(e.into_owned())));
                if open.is_empty() {
                    break;
                }
            }
            Event::Eof => {
                flush(&mut tokens, &mut text);
                break;
            }
            event => {
                flush(&mut tokens, &mut text);
                tokens.push(Token::Event(event.into_owned()));
            }
        }
    }
    Ok(tokens)
}

/// Index of the token closing the element opened at `start`.
fn element_end(tokens: &[Token], start: usize) -> usize {
    let mut depth = 0usize;
    for (i, token) in tokens.iter().enumerate().skip(start) {
        match token {
            Token::Event(Event::Start(e)) if !is_void(&elem_name(e)) => depth += 1,
            Token::Event(Event::End(_)) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return i;
                }
            }
            _ => {}
        }
    }
    tokens.len()
}

/// Concatenated text content of an element range.
fn text_in(tokens: &[Token], range: &Range<usize>) -> String {
    tokens
        .get(range.start + 1..range.end)
        .unwrap_or_default()
        .iter()
        .filter_map(|t| match t {
            Token::Text(s) => Some(s.as_str()),
            Token::Event(_) => None,
        })
        .collect()
}

#[inline]
fn inside(range: Option<&Range<usize>>, index: usize) -> bool {
    range.is_some_and(|r| r.start < index && index < r.end)
}

fn build_post(tokens: Vec<Token>, markup: &MarkupConfig) -> Post {
    let tags = match tokens.first() {
        Some(Token::Event(Event::Start(e) | Event::Empty(e))) => {
            attr_value(e, &markup.tags_attr).unwrap_or_default()
        }
        _ => String::new(),
    };

    let title_tag = markup.title_tag.to_ascii_lowercase();
    let description_tag = markup.description_tag.to_ascii_lowercase();

    let mut title: Option<Range<usize>> = None;
    let mut description: Option<Range<usize>> = None;
    let mut label_positions = Vec::new();
    let mut labels = Vec::new();

    for (i, token) in tokens.iter().enumerate().skip(1) {
        let (elem, empty) = match token {
            Token::Event(Event::Start(e)) => (e, false),
            Token::Event(Event::Empty(e)) => (e, true),
            _ => continue,
        };
        let name = elem_name(elem);
        let range = if empty || is_void(&name) {
            i..i
        } else {
            i..element_end(&tokens, i)
        };

        if has_class(elem, &markup.post_tag_class) {
            label_positions.push(i);
            labels.push(TagLabel {
                text: CompactString::from(text_in(&tokens, &range).trim()),
                highlighted: false,
            });
        }

        let nested = inside(title.as_ref(), i) || inside(description.as_ref(), i);
        if title.is_none() && name == title_tag && !nested {
            title = Some(range);
        } else if description.is_none() && name == description_tag && !nested {
            description = Some(range);
        }
    }

    let title_text = title.as_ref().map(|r| text_in(&tokens, r)).unwrap_or_default();
    let description_text = description
        .as_ref()
        .map(|r| text_in(&tokens, r))
        .unwrap_or_default();

    Post {
        title: Field::new(title_text),
        description: Field::new(description_text),
        tags: parse_tags(&tags),
        labels,
        visibility: Default::default(),
        markup: PostMarkup {
            tokens,
            title,
            description,
            labels: label_positions,
        },
    }
}

/// Whether the stylesheet `css` contains `rules`, ignoring whitespace.
fn has_rules(css: &str, rules: &str) -> bool {
    let squeeze = |s: &str| s.split_whitespace().collect::<String>();
    squeeze(css).contains(&squeeze(rules))
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Posts</title></head>
<body>
<div class="tags">
  <button class="tag-button active" data-tag="all">All</button>
  <button class="tag-button" data-tag="rust">Rust</button>
  <button class="tag-button" data-tag="web">Web</button>
</div>
<input type="text" id="search-input" value="">
<button id="search-button">Search</button>
<button id="clear-search">Clear</button>
<button id="sort-button">Sort <span id="sort-direction">?</span></button>
<p id="results-count">old text</p>
<div class="post-list">
  <div class="post-box" data-tags="rust web">
    <h2><a href="/a">Hello &amp; <em>World</em></a></h2>
    <p>Greetings&nbsp;from Rust</p>
    <span class="post-tag">rust</span><span class="post-tag">web</span>
  </div>
  <div class="post-box">
    <h2>Untagged</h2>
  </div>
</div>
<script>if (a < b && c) { go("</p>"); }</script>
</body>
</html>"#;

    fn page() -> Page {
        parse_page(PAGE.as_bytes(), &FilterConfig::default()).unwrap()
    }

    #[test]
    fn test_parse_posts() {
        let page = page();
        assert_eq!(page.posts.len(), 2);
        let slots = page.layout.segments.iter().filter(|s| matches!(s, Segment::Post));
        assert_eq!(slots.count(), 2);

        let first = &page.posts[0];
        assert_eq!(first.title.text(), "Hello & World");
        assert_eq!(first.description.text(), "Greetings\u{a0}from Rust");
        assert_eq!(first.tags.as_slice(), ["rust", "web"]);
        let labels: Vec<_> = first.labels.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(labels, ["rust", "web"]);
    }

    #[test]
    fn test_parse_missing_attributes_default_empty() {
        let page = page();
        let second = &page.posts[1];
        assert!(second.tags.is_empty());
        assert_eq!(second.title.text(), "Untagged");
        assert_eq!(second.description.text(), "");
        assert!(second.markup.description.is_none());
    }

    #[test]
    fn test_parse_controls() {
        let Page {
            layout, controls, ..
        } = page();
        let counter = layout
            .segments
            .iter()
            .filter(|s| matches!(s, Segment::Replace { slot: Slot::ResultsCount, .. }));
        assert_eq!(counter.count(), 1);

        assert_eq!(controls.tag_buttons, ["all", "rust", "web"]);
        assert_eq!(controls.search_input.as_deref(), Some(""));
        assert!(controls.search_button);
        assert!(controls.clear_search);
        assert!(controls.sort_button);
        assert!(controls.sort_label);
        assert!(!controls.hiding_style);
    }

    #[test]
    fn test_parse_page_without_controls() {
        let html = r#"<ul><li class="post-box" data-tags="a"><h2>Only</h2><p>post</p></li></ul>"#;
        let page = parse_page(html.as_bytes(), &FilterConfig::default()).unwrap();

        assert_eq!(page.posts.len(), 1);
        assert_eq!(page.controls, Controls::default());
    }

    #[test]
    fn test_parse_unwraps_previous_highlights() {
        let html = r#"<div class="post-box"><h2><span class="search-highlight">Hel</span>lo</h2></div>"#;
        let page = parse_page(html.as_bytes(), &FilterConfig::default()).unwrap();

        let post = &page.posts[0];
        assert_eq!(post.title.text(), "Hello");
        // a single merged text token remains inside the title
        let range = post.markup.title.clone().unwrap();
        assert_eq!(range.end - range.start, 2);
    }

    #[test]
    fn test_parse_void_elements_inside_post() {
        let html = r#"<div class="post-box"><h2>A<br>B</h2><p>desc<img src="x.png"></p></div><p id="after">x</p>"#;
        let page = parse_page(html.as_bytes(), &FilterConfig::default()).unwrap();

        assert_eq!(page.posts.len(), 1);
        assert_eq!(page.posts[0].title.text(), "AB");
        assert_eq!(page.posts[0].description.text(), "desc");
        // the trailing paragraph is not swallowed by the post
        assert!(page.layout.segments.len() > 1);
    }

    #[test]
    fn test_parse_detects_injected_style() {
        let config = FilterConfig::default();
        let html = format!(
            "<html><head><style>{}</style></head><body></body></html>",
            config.markup.hiding_style()
        );
        let page = parse_page(html.as_bytes(), &config).unwrap();
        assert!(page.controls.hiding_style);
    }

    #[test]
    fn test_parse_detects_reformatted_style() {
        let config = FilterConfig::default();
        let html = "<html><head><style>\n  body { margin: 0; }\n  .tag-hidden, .search-hidden {\n    display: none !important;\n  }\n</style></head><body></body></html>";
        let page = parse_page(html.as_bytes(), &config).unwrap();
        assert!(page.controls.hiding_style);

        let html = "<html><head><style>.tag-hidden { display: none; }</style></head></html>";
        let page = parse_page(html.as_bytes(), &config).unwrap();
        assert!(!page.controls.hiding_style);
    }

    #[test]
    fn test_has_rules_ignores_whitespace() {
        assert!(has_rules(".a,.b{display:none}", ".a, .b { display: none }"));
        assert!(!has_rules(".a { display: none }", ".a, .b { display: none }"));
    }

    #[test]
    fn test_parse_custom_markup() {
        let mut config = FilterConfig::default();
        config.markup.post_class = "entry".into();
        config.markup.title_tag = "h3".into();
        config.markup.tags_attr = "data-labels".into();

        let html = r#"<article class="entry" data-labels="x"><h3>Custom</h3><p>d</p></article>"#;
        let page = parse_page(html.as_bytes(), &config).unwrap();
        assert_eq!(page.posts[0].title.text(), "Custom");
        assert_eq!(page.posts[0].tags.as_slice(), ["x"]);
    }

    #[test]
    fn test_element_end_and_text_in() {
        let html = r#"<div class="post-box"><h2>a<b>b</b>c</h2></div>"#;
        let page = parse_page(html.as_bytes(), &FilterConfig::default()).unwrap();
        let markup = &page.posts[0].markup;

        let title = markup.title.clone().unwrap();
        assert_eq!(element_end(&markup.tokens, title.start), title.end);
        assert_eq!(text_in(&markup.tokens, &title), "abc");
    }
}
