//! Tag filter: AND-intersection of the selected tags.
//!
//! The active set always holds either the `all` sentinel alone or one or more
//! specific tags, never both and never nothing.

use super::{SearchHook, TagHook};
use crate::post::Post;
use compact_str::CompactString;
use rustc_hash::FxHashSet;
use std::collections::BTreeSet;
use std::fmt;

/// Label of the sentinel button that shows every post.
pub const ALL_TAG: &str = "all";

/// Outcome of a tag button click.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    /// A specific tag was added (and `all` dropped).
    Activated,
    /// A specific tag was removed; `all` comes back if it was the last one.
    Deactivated,
    /// `all` was clicked while specific tags were active.
    Reset,
    /// Nothing changed (`all` clicked while already the only member).
    Unchanged,
}

// ============================================================================
// ActiveTags
// ============================================================================

/// The set of selected tag filters, initialised to `{"all"}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveTags(BTreeSet<CompactString>);

impl Default for ActiveTags {
    fn default() -> Self {
        Self(BTreeSet::from([CompactString::from(ALL_TAG)]))
    }
}

impl ActiveTags {
    #[inline]
    pub fn is_all(&self) -> bool {
        self.0.contains(ALL_TAG)
    }

    #[inline]
    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(CompactString::as_str)
    }


    /// Apply a click on the button labelled `tag`.
    ///
    /// Clicking `all` always leaves exactly `{"all"}`: it resets the specific
    /// tags when any are active and cannot switch itself off otherwise.
    pub fn toggle(&mut self, tag: &str) -> Toggle {
        let tag = tag.trim();
        if tag.is_empty() {
            return Toggle::Unchanged;
        }

        if tag == ALL_TAG {
            if self.is_all() {
                return Toggle::Unchanged;
            }
            *self = Self::default();
            return Toggle::Reset;
        }

        if self.0.remove(tag) {
            if self.0.is_empty() {
                *self = Self::default();
            }
            Toggle::Deactivated
        } else {
            self.0.remove(ALL_TAG);
            self.0.insert(CompactString::from(tag));
            Toggle::Activated
        }
    }

    /// Whether a post with `tags` passes: always with `all`, otherwise only
    /// when the post carries every active tag.
    pub fn matches<S: AsRef<str>>(&self, tags: &[S]) -> bool {
        self.is_all()
            || self
                .0
                .iter()
                .all(|active| tags.iter().any(|t| t.as_ref() == active.as_str()))
    }
}

impl fmt::Display for ActiveTags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, tag) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            f.write_str(tag)?;
        }
        Ok(())
    }
}

// ============================================================================
// TagFilter
// ============================================================================

/// Tag filter component: the active set plus the labels of the page's buttons.
#[derive(Debug, Clone, Default)]
pub struct TagFilter {
    active: ActiveTags,
    buttons: Vec<CompactString>,
    known: FxHashSet<CompactString>,
}

impl TagFilter {
    pub fn new<I, S>(buttons: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        let mut known = FxHashSet::default();
        let buttons = buttons
            .into_iter()
            .map(Into::into)
            .filter(|label: &CompactString| !label.is_empty() && known.insert(label.clone()))
            .collect();

        Self {
            active: ActiveTags::default(),
            buttons,
            known,
        }
    }

    #[inline]
    pub const fn active(&self) -> &ActiveTags {
        &self.active
    }

    /// Button labels in document order.
    pub fn buttons(&self) -> &[CompactString] {
        &self.buttons
    }

    pub fn has_button(&self, label: &str) -> bool {
        self.known.contains(label)
    }

    /// Handle a click on the button labelled `label`.
    ///
    /// Returns `None` when the page has no such button. After recomputing
    /// visibility, an active search re-filters the posts left visible.
    pub fn click(
        &mut self,
        label: &str,
        posts: &mut [Post],
        search: Option<&dyn SearchHook>,
    ) -> Option<Toggle> {
        let label = label.trim();
        if !self.has_button(label) {
            return None;
        }

        let toggle = self.active.toggle(label);
        self.recompute(posts);

        if let Some(search) = search.filter(|s| s.is_active()) {
            search.rerun(posts, Some(&*self));
        }
        Some(toggle)
    }
}

impl TagHook for TagFilter {
    fn recompute(&self, posts: &mut [Post]) {
        let all = self.active.is_all();

        for post in posts.iter_mut() {
            post.visibility.hidden_by_tag = !self.active.matches(post.tags.as_slice());
            for label in &mut post.labels {
                label.highlighted = !all && self.active.contains(label.text.trim());
            }
        }
    }
}
