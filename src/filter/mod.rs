//! Filter components of a post listing.
//!
//! | Component      | State                      | Hides posts by      |
//! |----------------|----------------------------|---------------------|
//! | [`TagFilter`]  | [`ActiveTags`]             | tag intersection    |
//! | [`WordSearch`] | `SearchTerm`               | substring match     |
//! | [`SortControl`]| [`SortDirection`]          | (reorders only)     |
//!
//! The tag filter and the word search know each other only through the
//! [`TagHook`] and [`SearchHook`] traits, passed in as optional references:
//!
//! ```text
//! tag click ──▶ TagFilter::click ──▶ recompute ──▶ SearchHook::rerun (if term)
//!                                                       │
//! search    ──▶ WordSearch::run ──▶ TagHook::recompute ◀┘ (never calls back)
//! ```

mod counter;
mod search;
mod sort;
mod tags;

pub use counter::{counter_message, visible_count};
pub use search::WordSearch;
pub use sort::{SortControl, SortDirection};
pub use tags::{ALL_TAG, ActiveTags, TagFilter};

use crate::post::Post;

/// What the word search may ask of the tag filter.
pub trait TagHook {
    /// Recompute hidden-by-tag flags and tag label highlights.
    ///
    /// Must not call back into the search.
    fn recompute(&self, posts: &mut [Post]);
}

/// What the tag filter may ask of the word search.
pub trait SearchHook {
    /// Whether the current term is non-empty.
    fn is_active(&self) -> bool;

    /// Re-run the search over the posts not hidden by tag.
    fn rerun(&self, posts: &mut [Post], tags: Option<&dyn TagHook>);
}
