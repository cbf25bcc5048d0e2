//! Post entries of a listing page.
//!
//! A [`Post`] is created once per post container when the page is parsed and
//! is never created or destroyed afterwards: the filters only flip its
//! visibility flags, move its highlight ranges and reorder it.

use crate::page::PostMarkup;
use compact_str::CompactString;
use rustc_hash::FxHashSet;
use smallvec::SmallVec;
use std::ops::Range;

/// Tag labels of one post, in attribute order without duplicates.
pub type TagLabels = SmallVec<[CompactString; 4]>;

/// Parse a whitespace-separated tag attribute.
///
/// A missing attribute is an empty string, which yields no tags.
pub fn parse_tags(attr: &str) -> TagLabels {
    let mut seen = FxHashSet::default();
    attr.split_whitespace()
        .filter(|tag| seen.insert(*tag))
        .map(CompactString::from)
        .collect()
}

// ============================================================================
// Visibility
// ============================================================================

/// The two independent hide flags of a post.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Visibility {
    /// Set by the tag filter.
    pub hidden_by_tag: bool,
    /// Set by the word search.
    pub hidden_by_search: bool,
}

impl Visibility {
    /// A post is shown only if neither filter hides it.
    #[inline]
    pub const fn is_visible(self) -> bool {
        !self.hidden_by_tag && !self.hidden_by_search
    }
}

// ============================================================================
// Field
// ============================================================================

/// Searchable text of a post (title or description) with highlight ranges.
///
/// Ranges are byte ranges into `text`, sorted and non-overlapping. The text
/// itself never changes, so clearing the ranges restores the plain field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Field {
    text: String,
    marks: Vec<Range<usize>>,
}

impl Field {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            marks: Vec::new(),
        }
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[cfg(test)]
    pub fn marks(&self) -> &[Range<usize>] {
        &self.marks
    }

    #[cfg(test)]
    pub fn is_marked(&self) -> bool {
        !self.marks.is_empty()
    }

    pub fn clear_marks(&mut self) {
        self.marks.clear();
    }

    /// Replace the highlight ranges.
    ///
    /// Ranges outside the text or not on char boundaries are dropped.
    pub fn set_marks(&mut self, marks: Vec<Range<usize>>) {
        self.marks = marks
            .into_iter()
            .filter(|r| {
                r.start < r.end
                    && self.text.is_char_boundary(r.start)
                    && self.text.is_char_boundary(r.end)
            })
            .collect();
    }

    /// Marked text pieces in order, e.g. for `"Hello World"` marked at
    /// `0..5`: `["Hello"]`.
    pub fn marked_text(&self) -> impl Iterator<Item = &str> {
        self.marks.iter().map(|r| &self.text[r.clone()])
    }

    /// Split `span` (a byte range of the text) into `(range, marked)` pieces.
    ///
    /// Used when a field is rendered from several text nodes: each node covers
    /// one span, and marks crossing a node boundary are cut at that boundary.
    pub fn fragments_in(&self, span: Range<usize>) -> Vec<(Range<usize>, bool)> {
        let mut pieces = Vec::new();
        let mut cursor = span.start;

        for mark in &self.marks {
            if mark.end <= span.start {
                continue;
            }
            if mark.start >= span.end {
                break;
            }
            let start = mark.start.max(span.start);
            let end = mark.end.min(span.end);
            if cursor < start {
                pieces.push((cursor..start, false));
            }
            pieces.push((start..end, true));
            cursor = end;
        }

        if cursor < span.end {
            pieces.push((cursor..span.end, false));
        }
        pieces
    }
}

// ============================================================================
// Post
// ============================================================================

/// A tag label element rendered inside a post (`.post-tag`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagLabel {
    pub text: CompactString,
    pub highlighted: bool,
}

/// One post entry of the listing.
#[derive(Debug, Clone)]
pub struct Post {
    pub title: Field,
    pub description: Field,
    /// Tags from the post's tag attribute.
    pub tags: TagLabels,
    /// Tag label elements shown inside the post, in document order.
    pub labels: Vec<TagLabel>,
    pub visibility: Visibility,
    /// Original markup; empty for posts built in memory.
    pub(crate) markup: PostMarkup,
}

impl Post {
    /// Build a post without markup from its title, description and tag attribute.
    #[cfg(test)]
    pub fn new(title: &str, description: &str, tags: &str) -> Self {
        let tags = parse_tags(tags);
        let labels = tags
            .iter()
            .map(|tag| TagLabel {
                text: tag.clone(),
                highlighted: false,
            })
            .collect();

        Self {
            title: Field::new(title),
            description: Field::new(description),
            tags,
            labels,
            visibility: Visibility::default(),
            markup: PostMarkup::default(),
        }
    }

    #[inline]
    pub const fn is_visible(&self) -> bool {
        self.visibility.is_visible()
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Drop highlight ranges from both fields.
    pub fn clear_highlights(&mut self) {
        self.title.clear_marks();
        self.description.clear_marks();
    }
}
