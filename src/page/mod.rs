//! Listing page processing.
//!
//! The page is streamed once with `quick-xml` and split into [`Segment`]s:
//! markup passed through untouched, plus the handful of places the filters
//! write to. Rendering walks the segments again and fills those places from
//! the current filter state, so the same layout can be rendered any number
//! of times.
//!
//! ```text
//! page.html ──parse──▶ Layout + Vec<Post> + Controls
//!                           │        │
//!                           │    Listing (filters mutate posts)
//!                           ▼        ▼
//!                        render(layout, view) ──▶ page.html
//! ```

mod common;
mod error;
mod parse;
mod render;

pub use error::PageError;
pub use parse::parse_page;
pub use render::{View, render_page};

use crate::config::FilterConfig;
use compact_str::CompactString;
use quick_xml::events::{BytesEnd, BytesStart, Event};
use std::{fs, ops::Range, path::Path};

// ============================================================================
// Post markup
// ============================================================================

/// A piece of a post's markup.
#[derive(Debug, Clone)]
pub enum Token {
    /// Any event other than character data.
    Event(Event<'static>),
    /// Unescaped character data (adjacent text and entity references merged).
    Text(String),
}

/// Token stream of one post with the positions the filters write to.
///
/// Element positions are token index ranges from the opening tag up to (not
/// including) the closing tag, so `start + 1..end` is the element content.
#[derive(Debug, Clone, Default)]
pub struct PostMarkup {
    pub(crate) tokens: Vec<Token>,
    pub(crate) title: Option<Range<usize>>,
    pub(crate) description: Option<Range<usize>>,
    /// Token indices of the tag label elements.
    pub(crate) labels: Vec<usize>,
}

// ============================================================================
// Layout
// ============================================================================

/// Elements whose content is replaced on render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    ResultsCount,
    SortLabel,
}

/// A piece of the page outside the posts.
#[derive(Debug, Clone)]
pub enum Segment {
    /// Passed through unchanged.
    Event(Event<'static>),
    /// A post position; positions are filled in display order.
    Post,
    /// Tag filter button (its content follows as plain events).
    TagButton {
        elem: BytesStart<'static>,
        label: CompactString,
        empty: bool,
    },
    /// Search box; its `value` mirrors the current input.
    SearchInput { elem: BytesStart<'static>, empty: bool },
    /// Element whose content is generated.
    Replace { slot: Slot, elem: BytesStart<'static> },
    /// `</head>`, where the hiding stylesheet goes.
    HeadEnd(BytesEnd<'static>),
}

/// Parsed page structure, independent of filter state.
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub(crate) segments: Vec<Segment>,
    /// The page already carries the hiding stylesheet.
    pub(crate) hiding_style: bool,
}

/// Optional page elements found while parsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Controls {
    /// Tag button labels in document order.
    pub tag_buttons: Vec<CompactString>,
    /// Initial value of the search box, if the page has one.
    pub search_input: Option<String>,
    pub search_button: bool,
    pub clear_search: bool,
    pub sort_button: bool,
    pub sort_label: bool,
    /// The page already carries the hiding stylesheet.
    pub hiding_style: bool,
}

// ============================================================================
// Page
// ============================================================================

/// A parsed listing page.
#[derive(Debug, Clone)]
pub struct Page {
    pub layout: Layout,
    pub posts: Vec<crate::post::Post>,
    pub controls: Controls,
}

impl Page {
    /// Read and parse a page file.
    pub fn read(path: &Path, config: &FilterConfig) -> Result<Self, PageError> {
        let content = fs::read(path).map_err(|err| PageError::Io(path.to_path_buf(), err))?;
        parse_page(&content, config)
    }
}
