//! Timed event scripts for `postfilter replay`.
//!
//! A script is a TOML list of steps replayed against a page in order:
//!
//! ```toml
//! [[event]]
//! kind = "tag"
//! label = "rust"
//!
//! [[event]]
//! kind = "input"
//! text = "ser"
//! at_ms = 0
//!
//! [[event]]
//! kind = "input"
//! text = "serde"
//! at_ms = 120
//!
//! [[event]]
//! kind = "sort"
//! at_ms = 900
//! ```
//!
//! Keystrokes go through the search debounce, so the search above runs once,
//! for "serde", 300ms after the last keystroke. Clicks may carry an `at_ms`
//! too; a debounced search due by then runs first. A search still pending at
//! the end of the script is flushed.

use crate::listing::{Event, Listing};
use crate::log;
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

/// Errors raised while loading an event script
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("IO error when reading `{0}`")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("script parsing error")]
    Toml(#[from] toml::de::Error),

    #[error("event {step} at {at_ms}ms comes before the previous event at {previous}ms")]
    OutOfOrder { step: usize, at_ms: u64, previous: u64 },
}

/// One scripted interaction.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase", deny_unknown_fields)]
pub enum Step {
    Tag {
        label: String,
        #[serde(default)]
        at_ms: Option<u64>,
    },
    Input {
        text: String,
        at_ms: u64,
    },
    Enter {
        at_ms: u64,
    },
    Submit {
        #[serde(default)]
        at_ms: Option<u64>,
    },
    Clear {
        #[serde(default)]
        at_ms: Option<u64>,
    },
    Sort {
        #[serde(default)]
        at_ms: Option<u64>,
    },
    Tick {
        at_ms: u64,
    },
}

impl Step {
    /// Timestamp of the step, if it has one.
    pub const fn at_ms(&self) -> Option<u64> {
        match self {
            Self::Input { at_ms, .. } | Self::Enter { at_ms } | Self::Tick { at_ms } => Some(*at_ms),
            Self::Tag { at_ms, .. } | Self::Submit { at_ms } | Self::Clear { at_ms } | Self::Sort { at_ms } => {
                *at_ms
            }
        }
    }

    /// Listing events for this step. A timed click is preceded by a tick.
    pub fn events(&self) -> Vec<Event> {
        let ms = Duration::from_millis;
        let click = match self {
            Self::Input { text, at_ms } => {
                return vec![Event::Input {
                    text: text.clone(),
                    at: ms(*at_ms),
                }];
            }
            Self::Enter { at_ms } => return vec![Event::Enter { at: ms(*at_ms) }],
            Self::Tick { at_ms } => return vec![Event::Tick { at: ms(*at_ms) }],
            Self::Tag { label, .. } => Event::TagClick(label.as_str().into()),
            Self::Submit { .. } => Event::SubmitSearch,
            Self::Clear { .. } => Event::ClearSearch,
            Self::Sort { .. } => Event::SortClick,
        };

        match self.at_ms() {
            Some(at) => vec![Event::Tick { at: ms(at) }, click],
            None => vec![click],
        }
    }
}

/// A validated event script.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    #[serde(default, rename = "event")]
    steps: Vec<Step>,
}

impl Script {
    /// Parse a script and check its timestamps never go backwards.
    pub fn from_str(content: &str) -> Result<Self, ScriptError> {
        let script: Self = toml::from_str(content)?;
        script.validate()?;
        Ok(script)
    }

    pub fn from_path(path: &Path) -> Result<Self, ScriptError> {
        let content =
            fs::read_to_string(path).map_err(|err| ScriptError::Io(path.to_path_buf(), err))?;
        Self::from_str(&content)
    }

    #[inline]
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    fn validate(&self) -> Result<(), ScriptError> {
        let mut previous = 0;
        for (i, step) in self.steps.iter().enumerate() {
            let Some(at_ms) = step.at_ms() else {
                continue;
            };
            if at_ms < previous {
                return Err(ScriptError::OutOfOrder {
                    step: i + 1,
                    at_ms,
                    previous,
                });
            }
            previous = at_ms;
        }
        Ok(())
    }

    /// Replay every step, then flush a still-pending search.
    pub fn replay(&self, listing: &mut Listing) {
        for event in self.steps.iter().flat_map(Step::events) {
            listing.dispatch(event);
        }
        if listing.has_pending_search() {
            log!("search"; "flushing pending search at end of script");
            listing.settle();
        }
    }
}
