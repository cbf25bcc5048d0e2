//! User interactions with a listing page.

use compact_str::CompactString;
use std::fmt;
use std::time::Duration;

/// One user interaction. Timestamps are offsets from page load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Click on the tag button with this label.
    TagClick(CompactString),
    /// The search box now holds `text` (one keystroke).
    Input { text: String, at: Duration },
    /// Enter pressed in the search box.
    Enter { at: Duration },
    /// Click on the search button.
    SubmitSearch,
    /// Click on the clear-search button.
    ClearSearch,
    /// Click on the sort button.
    SortClick,
    /// Time passes; fires a due debounced search.
    Tick { at: Duration },
}

impl Event {
    /// Timestamp of timed events.
    pub const fn at(&self) -> Option<Duration> {
        match self {
            Self::Input { at, .. } | Self::Enter { at } | Self::Tick { at } => Some(*at),
            _ => None,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TagClick(label) => write!(f, "tag `{label}`"),
            Self::Input { text, at } => write!(f, "input `{text}` at {}ms", at.as_millis()),
            Self::Enter { at } => write!(f, "enter at {}ms", at.as_millis()),
            Self::SubmitSearch => f.write_str("search button"),
            Self::ClearSearch => f.write_str("clear button"),
            Self::SortClick => f.write_str("sort button"),
            Self::Tick { at } => write!(f, "tick at {}ms", at.as_millis()),
        }
    }
}
