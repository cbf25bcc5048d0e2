//! `postfilter inspect`: what the filters see on a page.

use crate::filter::ALL_TAG;
use crate::listing::Listing;
use crate::post::Post;
use colored::Colorize;
use compact_str::CompactString;
use serde::Serialize;
use std::collections::BTreeMap;

/// One post as the filters see it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct PostReport {
    pub title: String,
    pub description: String,
    pub tags: Vec<CompactString>,
    /// Highlighted matches of the current search, title first.
    pub highlights: Vec<String>,
    pub visible: bool,
    pub hidden_by_tag: bool,
    pub hidden_by_search: bool,
}

/// One tag label with the number of posts carrying it.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TagReport {
    pub label: CompactString,
    /// The page has a filter button for this label.
    pub button: bool,
    pub posts: usize,
}

/// Filter state summary of a listing page.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub posts: Vec<PostReport>,
    pub tags: Vec<TagReport>,
    pub active_tags: Option<Vec<String>>,
    pub search: Option<String>,
    pub sort: Option<&'static str>,
    pub counter: String,
}

impl Report {
    pub fn new(listing: &Listing) -> Self {
        let posts = listing.posts().iter().map(post_report).collect();

        Self {
            posts,
            tags: tag_reports(listing),
            active_tags: listing
                .active_tags()
                .map(|tags| tags.iter().map(str::to_owned).collect()),
            search: listing.word_search().map(|s| s.term().as_str().to_owned()),
            sort: listing.sort_direction().map(|d| d.name()),
            counter: listing.counter_text(),
        }
    }

    /// Print as aligned plain-text tables.
    pub fn print(&self) {
        let width = self
            .posts
            .iter()
            .map(|p| p.title.chars().count())
            .max()
            .unwrap_or(0)
            .max(5);

        println!("{}", "Posts".bold());
        for post in &self.posts {
            let state = match (post.hidden_by_tag, post.hidden_by_search) {
                (false, false) => "shown".green(),
                (true, false) => "hidden (tag)".yellow(),
                (false, true) => "hidden (search)".yellow(),
                (true, true) => "hidden (tag, search)".yellow(),
            };
            println!("  {:<width$}  {:<16}  {}", post.title, state, post.tags.join(" "));
        }

        println!();
        println!("{}", "Tags".bold());
        for tag in &self.tags {
            let button = if tag.button { "button" } else { "-" };
            println!("  {:<20}  {:<6}  {}", tag.label, button, tag.posts);
        }

        println!();
        if let Some(active) = &self.active_tags {
            println!("active tags: {}", active.join(", "));
        }
        if let Some(term) = self.search.as_deref().filter(|t| !t.is_empty()) {
            println!("search: {term}");
        }
        if let Some(sort) = self.sort {
            println!("sort: {sort}");
        }
        println!("{}", self.counter);
    }
}

fn post_report(post: &Post) -> PostReport {
    PostReport {
        title: post.title.text().to_owned(),
        description: post.description.text().to_owned(),
        tags: post.tags.to_vec(),
        highlights: post
            .title
            .marked_text()
            .chain(post.description.marked_text())
            .map(str::to_owned)
            .collect(),
        visible: post.is_visible(),
        hidden_by_tag: post.visibility.hidden_by_tag,
        hidden_by_search: post.visibility.hidden_by_search,
    }
}

/// Button labels in page order, then labels only found on posts, by name.
fn tag_reports(listing: &Listing) -> Vec<TagReport> {
    let posts = listing.posts();
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for tag in posts.iter().flat_map(|p| p.tags.iter()) {
        *counts.entry(tag.as_str()).or_default() += 1;
    }

    let buttons = listing.tag_filter().map(|f| f.buttons()).unwrap_or_default();
    let mut reports: Vec<_> = buttons
        .iter()
        .map(|label| TagReport {
            label: label.clone(),
            button: true,
            posts: if label.as_str() == ALL_TAG {
                posts.len()
            } else {
                posts.iter().filter(|p| p.has_tag(label)).count()
            },
        })
        .collect();

    reports.extend(
        counts
            .iter()
            .filter(|&(label, _)| !buttons.iter().any(|b| b.as_str() == *label))
            .map(|(label, &posts)| TagReport {
                label: CompactString::from(*label),
                button: false,
                posts,
            }),
    );
    reports
}
