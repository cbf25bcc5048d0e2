//! Re-emit a parsed page with the current filter state.

use super::common::{
    XmlWriter, with_attr, with_classes, write_err, write_start, write_text_element,
};
use super::{Layout, PageError, Segment, Slot, Token};
use crate::config::FilterConfig;
use crate::filter::{ActiveTags, SortDirection};
use crate::post::{Field, Post};
use quick_xml::{
    Writer,
    events::{BytesEnd, BytesStart, BytesText, Event},
};
use std::io::Cursor;

/// Filter state a page is rendered from.
#[derive(Debug, Clone)]
pub struct View<'a> {
    /// Posts in display order.
    pub posts: &'a [Post],
    /// Active tags, when the page has a tag filter.
    pub active_tags: Option<&'a ActiveTags>,
    /// Current search box text, when the page has a search box.
    pub input: Option<&'a str>,
    /// Results counter message.
    pub counter: String,
    /// Sort direction, when the page has a sort control.
    pub sort: Option<SortDirection>,
}

/// Render `layout` filled from `view`.
///
/// A pure function of its inputs: the same layout and view always give the
/// same bytes.
pub fn render_page(
    layout: &Layout,
    view: &View<'_>,
    config: &FilterConfig,
) -> Result<Vec<u8>, PageError> {
    let markup = &config.markup;
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    let mut posts = view.posts.iter();

    for segment in &layout.segments {
        match segment {
            Segment::Event(event) => writer.write_event(event.borrow()).map_err(write_err)?,
            Segment::Post => {
                if let Some(post) = posts.next() {
                    render_post(&mut writer, post, config)?;
                }
            }
            Segment::TagButton { elem, label, empty } => {
                let elem = match view.active_tags {
                    Some(active) => {
                        let class = [markup.active_class.as_str()];
                        let add: &[&str] = if active.contains(label) { &class } else { &[] };
                        with_classes(elem, add, &class)
                    }
                    None => elem.clone(),
                };
                write_start(&mut writer, elem, *empty)?;
            }
            Segment::SearchInput { elem, empty } => {
                let elem = match view.input {
                    Some(input) => with_attr(elem, "value", input),
                    None => elem.clone(),
                };
                write_start(&mut writer, elem, *empty)?;
            }
            Segment::Replace { slot, elem } => {
                let text = match slot {
                    Slot::ResultsCount => view.counter.as_str(),
                    Slot::SortLabel => view.sort.map_or("", |d| config.sort.label(d)),
                };
                write_text_element(&mut writer, elem.clone(), text)?;
            }
            Segment::HeadEnd(end) => {
                if markup.inject_style && !layout.hiding_style {
                    write_text_element(
                        &mut writer,
                        BytesStart::new("style"),
                        &markup.hiding_style(),
                    )?;
                }
                writer
                    .write_event(Event::End(end.clone()))
                    .map_err(write_err)?;
            }
        }
    }

    Ok(writer.into_inner().into_inner())
}

/// Which searchable field a text token belongs to.
#[derive(Clone, Copy)]
enum FieldKind {
    Title,
    Description,
}

fn render_post(writer: &mut XmlWriter, post: &Post, config: &FilterConfig) -> Result<(), PageError> {
    let markup = &config.markup;
    let tokens = &post.markup.tokens;
    let hidden = [
        markup.tag_hidden_class.as_str(),
        markup.search_hidden_class.as_str(),
    ];

    let mut add = Vec::with_capacity(2);
    if post.visibility.hidden_by_tag {
        add.push(markup.tag_hidden_class.as_str());
    }
    if post.visibility.hidden_by_search {
        add.push(markup.search_hidden_class.as_str());
    }

    // byte offset into each field's text of the next text token
    let mut title_offset = 0;
    let mut description_offset = 0;

    for (i, token) in tokens.iter().enumerate() {
        match token {
            Token::Text(text) => {
                let kind = field_of(post, i);
                let (field, offset) = match kind {
                    Some(FieldKind::Title) => (&post.title, &mut title_offset),
                    Some(FieldKind::Description) => (&post.description, &mut description_offset),
                    None => {
                        writer
                            .write_event(Event::Text(BytesText::new(text)))
                            .map_err(write_err)?;
                        continue;
                    }
                };
                let span = *offset..*offset + text.len();
                *offset = span.end;
                write_field_text(writer, field, span, &config.search.highlight_class)?;
            }
            Token::Event(Event::Start(elem) | Event::Empty(elem)) if i == 0 => {
                let elem = with_classes(elem, &add, &hidden);
                write_start(writer, elem, matches!(token, Token::Event(Event::Empty(_))))?;
            }
            Token::Event(event @ (Event::Start(elem) | Event::Empty(elem))) => {
                let label = post
                    .markup
                    .labels
                    .iter()
                    .position(|&p| p == i)
                    .and_then(|k| post.labels.get(k));
                match label {
                    Some(label) => {
                        let class = [markup.highlight_class.as_str()];
                        let add: &[&str] = if label.highlighted { &class } else { &[] };
                        let elem = with_classes(elem, add, &class);
                        write_start(writer, elem, matches!(event, Event::Empty(_)))?;
                    }
                    None => writer.write_event(event.borrow()).map_err(write_err)?,
                }
            }
            Token::Event(event) => writer.write_event(event.borrow()).map_err(write_err)?,
        }
    }
    Ok(())
}

fn field_of(post: &Post, index: usize) -> Option<FieldKind> {
    let within = |range: &Option<std::ops::Range<usize>>| {
        range
            .as_ref()
            .is_some_and(|r| r.start < index && index < r.end)
    };
    if within(&post.markup.title) {
        Some(FieldKind::Title)
    } else if within(&post.markup.description) {
        Some(FieldKind::Description)
    } else {
        None
    }
}

/// Write the part of `field` covered by one text node, wrapping marked pieces.
fn write_field_text(
    writer: &mut XmlWriter,
    field: &Field,
    span: std::ops::Range<usize>,
    highlight_class: &str,
) -> Result<(), PageError> {
    for (range, marked) in field.fragments_in(span) {
        let Some(piece) = field.text().get(range) else {
            continue;
        };
        if marked {
            let mut start = BytesStart::new("span");
            start.push_attribute(("class", highlight_class));
            writer.write_event(Event::Start(start)).map_err(write_err)?;
            writer
                .write_event(Event::Text(BytesText::new(piece)))
                .map_err(write_err)?;
            writer
                .write_event(Event::End(BytesEnd::new("span")))
                .map_err(write_err)?;
        } else {
            writer
                .write_event(Event::Text(BytesText::new(piece)))
                .map_err(write_err)?;
        }
    }
    Ok(())
}
