//! Word search over post titles and descriptions.
//!
//! The term is matched literally and case-insensitively: it is escaped with
//! [`regex::escape`] before being compiled, so characters such as `.` or `(`
//! only ever match themselves.

use super::{SearchHook, TagHook};
use crate::log;
use crate::post::{Field, Post};
use regex::{Regex, RegexBuilder};
use std::ops::Range;

// ============================================================================
// SearchTerm
// ============================================================================

/// Trimmed, lowercased search term. Empty means "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchTerm(String);

impl SearchTerm {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ============================================================================
// Matcher
// ============================================================================

/// Compiled literal, case-insensitive matcher for a non-empty term.
#[derive(Debug, Clone)]
pub enum Matcher {
    Literal(Regex),
    /// Used when the escaped term exceeds the regex size limit: still
    /// filters correctly but yields no highlight ranges.
    Lowercase(String),
}

impl Matcher {
    /// Build a matcher; `None` for an empty term.
    pub fn new(term: &SearchTerm) -> Option<Self> {
        if term.is_empty() {
            return None;
        }

        let matcher = match RegexBuilder::new(&regex::escape(term.as_str()))
            .case_insensitive(true)
            .build()
        {
            Ok(regex) => Self::Literal(regex),
            Err(err) => {
                log!("search"; "term too long to highlight ({err}), matching without highlights");
                Self::Lowercase(term.as_str().to_owned())
            }
        };
        Some(matcher)
    }

    pub fn is_match(&self, text: &str) -> bool {
        match self {
            Self::Literal(regex) => regex.is_match(text),
            Self::Lowercase(term) => text.to_lowercase().contains(term.as_str()),
        }
    }

    /// Byte ranges of every non-overlapping occurrence in `text`.
    pub fn find_ranges(&self, text: &str) -> Vec<Range<usize>> {
        match self {
            Self::Literal(regex) => regex.find_iter(text).map(|m| m.range()).collect(),
            Self::Lowercase(_) => Vec::new(),
        }
    }

    fn highlight(&self, field: &mut Field) {
        let marks = self.find_ranges(field.text());
        field.set_marks(marks);
    }
}

// ============================================================================
// WordSearch
// ============================================================================

/// Word search component.
///
/// `input` is the raw text of the search box; the term and matcher are
/// derived from it whenever it changes.
#[derive(Debug, Clone, Default)]
pub struct WordSearch {
    input: String,
    term: SearchTerm,
    matcher: Option<Matcher>,
}

impl WordSearch {
    /// Search component whose box initially holds `input` (not yet applied).
    pub fn new(input: impl Into<String>) -> Self {
        let mut search = Self::default();
        search.set_input(input);
        search
    }

    #[inline]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[inline]
    pub const fn term(&self) -> &SearchTerm {
        &self.term
    }

    /// Replace the search box text. Does not run the search.
    pub fn set_input(&mut self, input: impl Into<String>) {
        self.input = input.into();
        let term = SearchTerm::new(&self.input);
        if term != self.term {
            self.matcher = Matcher::new(&term);
            self.term = term;
        }
    }

    /// Empty the search box. Does not run the search.
    pub fn clear(&mut self) {
        self.set_input(String::new());
    }

    /// Run the search against the current term.
    ///
    /// With an empty term this resets the search. Otherwise the tag filter
    /// (if any) recomputes first and only posts it leaves visible are
    /// matched. Returns the number of posts shown afterwards.
    pub fn run(&self, posts: &mut [Post], tags: Option<&dyn TagHook>) -> usize {
        let Some(matcher) = &self.matcher else {
            return self.reset(posts, tags);
        };

        if let Some(tags) = tags {
            tags.recompute(posts);
        }

        let mut matched = 0;
        for post in posts.iter_mut() {
            post.clear_highlights();
            if post.visibility.hidden_by_tag {
                continue;
            }

            let hit = matcher.is_match(post.title.text()) || matcher.is_match(post.description.text());
            post.visibility.hidden_by_search = !hit;
            if hit {
                matcher.highlight(&mut post.title);
                matcher.highlight(&mut post.description);
                matched += 1;
            }
        }
        matched
    }

    /// Clear every search flag and highlight, then let the tag filter decide.
    ///
    /// Returns the number of posts shown afterwards.
    pub fn reset(&self, posts: &mut [Post], tags: Option<&dyn TagHook>) -> usize {
        for post in posts.iter_mut() {
            post.visibility.hidden_by_search = false;
            post.clear_highlights();
        }

        if let Some(tags) = tags {
            tags.recompute(posts);
        }
        posts.iter().filter(|p| !p.visibility.hidden_by_tag).count()
    }
}

impl SearchHook for WordSearch {
    fn is_active(&self) -> bool {
        !self.term.is_empty()
    }

    fn rerun(&self, posts: &mut [Post], tags: Option<&dyn TagHook>) {
        self.run(posts, tags);
    }
}
