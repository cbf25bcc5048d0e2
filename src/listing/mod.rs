//! Listing controller: routes user events to the filter components.
//!
//! ```text
//! Event ──▶ Listing::dispatch ──┬─ TagClick ──────▶ TagFilter::click ──▶ (search rerun)
//!                               ├─ Input ─────────▶ Debouncer (300ms) ──▶ WordSearch::run
//!                               ├─ Enter/Submit ──▶ WordSearch::run
//!                               ├─ ClearSearch ───▶ WordSearch::reset
//!                               └─ SortClick ─────▶ SortControl::click
//! ```
//!
//! A component exists only when the page has the elements it needs; events
//! aimed at a missing component are ignored.

mod debounce;
mod event;

pub use event::Event;

use debounce::Debouncer;

use crate::config::{FilterConfig, SearchConfig};
use crate::filter::{
    ActiveTags, SearchHook, SortControl, SortDirection, TagFilter, TagHook, WordSearch,
    counter_message, visible_count,
};
use crate::log;
use crate::page::{Controls, View};
use crate::post::Post;
use std::time::Duration;

/// State of one listing page and its filter components.
#[derive(Debug, Clone)]
pub struct Listing {
    posts: Vec<Post>,
    tags: Option<TagFilter>,
    search: Option<WordSearch>,
    sort: Option<SortControl>,
    debouncer: Debouncer,
    search_button: bool,
    clear_search: bool,
    config: SearchConfig,
}

impl Listing {
    /// Set up the components the page supports.
    ///
    /// Performs the initial tag recompute and the one-time initial sort. A
    /// value already in the search box is kept but not applied.
    pub fn new(posts: Vec<Post>, controls: &Controls, config: &FilterConfig) -> Self {
        let tags = (!controls.tag_buttons.is_empty())
            .then(|| TagFilter::new(controls.tag_buttons.iter().cloned()));
        let search = controls.search_input.clone().map(WordSearch::new);
        let sort = (config.sort.enable && (controls.sort_button || controls.sort_label))
            .then(|| SortControl::new(config.sort.initial));

        let mut listing = Self {
            posts,
            tags,
            search,
            sort,
            debouncer: Debouncer::new(config.search.debounce()),
            search_button: controls.search_button,
            clear_search: controls.clear_search,
            config: config.search.clone(),
        };
        listing.setup();
        listing
    }

    fn setup(&mut self) {
        if let Some(tags) = &self.tags {
            tags.recompute(&mut self.posts);
        }
        if let Some(sort) = &self.sort {
            sort.setup(&mut self.posts);
        }
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    /// Posts in display order.
    #[inline]
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    #[inline]
    pub const fn tag_filter(&self) -> Option<&TagFilter> {
        self.tags.as_ref()
    }

    #[inline]
    pub const fn word_search(&self) -> Option<&WordSearch> {
        self.search.as_ref()
    }

    pub fn active_tags(&self) -> Option<&ActiveTags> {
        self.tags.as_ref().map(TagFilter::active)
    }

    pub fn sort_direction(&self) -> Option<SortDirection> {
        self.sort.as_ref().map(SortControl::direction)
    }

    pub fn visible_count(&self) -> usize {
        visible_count(&self.posts)
    }

    /// Results counter message for the posts currently shown.
    pub fn counter_text(&self) -> String {
        counter_message(&self.config, self.visible_count())
    }

    /// Whether a debounced search is waiting to run.
    #[inline]
    pub const fn has_pending_search(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Render state of the page.
    pub fn view(&self) -> View<'_> {
        View {
            posts: &self.posts,
            active_tags: self.active_tags(),
            input: self.search.as_ref().map(WordSearch::input),
            counter: self.counter_text(),
            sort: self.sort_direction(),
        }
    }

    // ------------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------------

    /// Handle one event.
    ///
    /// A timed event first fires a debounced search that became due before it.
    pub fn dispatch(&mut self, event: Event) {
        if let Some(at) = event.at() {
            self.poll(at);
        }

        match event {
            Event::TagClick(label) => self.click_tag(&label),
            Event::Input { text, at } => self.input(text, at),
            Event::Enter { .. } => self.submit("enter"),
            Event::SubmitSearch if self.search_button => self.submit("search button"),
            Event::ClearSearch if self.clear_search => self.clear_search(),
            Event::SortClick => self.click_sort(),
            Event::Tick { .. } => {}
            event => log!("page"; "ignored {event}: no such control on the page"),
        }
    }

    /// Run the debounced search if it is due at `now`. Returns whether it ran.
    pub fn poll(&mut self, now: Duration) -> bool {
        if !self.debouncer.ready(now) {
            return false;
        }
        self.debouncer.take();
        self.run_search("debounce");
        true
    }

    /// Run a pending debounced search right away.
    pub fn settle(&mut self) -> bool {
        if !self.debouncer.take() {
            return false;
        }
        self.run_search("debounce");
        true
    }

    fn click_tag(&mut self, label: &str) {
        let Some(tags) = self.tags.as_mut() else {
            log!("tags"; "ignored click on `{label}`: page has no tag buttons");
            return;
        };
        let search = self.search.as_ref().map(|s| s as &dyn SearchHook);

        match tags.click(label, &mut self.posts, search) {
            Some(toggle) => log!(
                "tags";
                "`{label}` {toggle:?}, active: {}, {} shown",
                tags.active(),
                visible_count(&self.posts)
            ),
            None => log!("tags"; "ignored click on unknown tag `{label}`"),
        }
    }

    fn input(&mut self, text: String, at: Duration) {
        let Some(search) = self.search.as_mut() else {
            log!("search"; "ignored input: page has no search box");
            return;
        };
        search.set_input(text);
        self.debouncer.add(at);
    }

    fn submit(&mut self, source: &str) {
        self.debouncer.take();
        self.run_search(source);
    }

    fn clear_search(&mut self) {
        self.debouncer.take();
        let Some(search) = self.search.as_mut() else {
            return;
        };
        search.clear();
        let tags = self.tags.as_ref().map(|t| t as &dyn TagHook);
        let shown = search.reset(&mut self.posts, tags);
        log!("search"; "cleared, {shown} shown");
    }

    fn run_search(&mut self, source: &str) {
        let Some(search) = self.search.as_ref() else {
            return;
        };
        let tags = self.tags.as_ref().map(|t| t as &dyn TagHook);
        let shown = search.run(&mut self.posts, tags);
        log!(
            "search";
            "`{}` ({source}): {}",
            search.term().as_str(),
            counter_message(&self.config, shown)
        );
    }

    fn click_sort(&mut self) {
        let Some(sort) = self.sort.as_mut() else {
            log!("sort"; "ignored click: page has no sort control");
            return;
        };
        let direction = sort.click(&mut self.posts);
        log!("sort"; "by title, {}", direction.name());
    }
}
