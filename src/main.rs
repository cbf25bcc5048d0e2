//! postfilter - tag filter, word search and sort for static blog post listings.

mod cli;
mod config;
mod filter;
mod inspect;
mod listing;
mod logger;
mod page;
mod post;
mod script;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands, FilterArgs, RenderArgs};
use config::FilterConfig;
use inspect::Report;
use listing::{Event, Listing};
use page::{Layout, Page, render_page};
use script::Script;
use std::{
    fs,
    io::{Write, stdout},
    path::Path,
    time::Duration,
};

fn main() -> Result<()> {
    let cli = Cli::parse();
    logger::set_quiet(cli.quiet);
    let config = FilterConfig::load(&cli)?;

    match &cli.command {
        Commands::Apply {
            page,
            filter,
            render,
        } => {
            let (layout, mut listing) = open_page(page, &config)?;
            apply_filters(&mut listing, filter);
            write_page(&layout, &listing, &config, render)
        }
        Commands::Replay {
            page,
            script: script_path,
            render,
        } => {
            let script = Script::from_path(script_path)
                .with_context(|| format!("failed to load script `{}`", script_path.display()))?;
            let (layout, mut listing) = open_page(page, &config)?;
            log!("page"; "replaying {} events from {}", script.steps().len(), script_path.display());
            script.replay(&mut listing);
            write_page(&layout, &listing, &config, render)
        }
        Commands::Inspect { page, filter, json } => {
            let (_, mut listing) = open_page(page, &config)?;
            apply_filters(&mut listing, filter);
            let report = Report::new(&listing);
            if *json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                report.print();
            }
            Ok(())
        }
    }
}

/// Parse a page and set up its filter components.
fn open_page(path: &Path, config: &FilterConfig) -> Result<(Layout, Listing)> {
    let Page {
        layout,
        posts,
        controls,
    } = Page::read(path, config)
        .with_context(|| format!("failed to read page `{}`", path.display()))?;

    log!(
        "page";
        "{}: {} posts, {} tag buttons",
        path.display(),
        posts.len(),
        controls.tag_buttons.len()
    );
    let listing = Listing::new(posts, &controls, config);
    Ok((layout, listing))
}

/// Click the tags, submit the search, then click sort.
fn apply_filters(listing: &mut Listing, args: &FilterArgs) {
    for tag in &args.tags {
        listing.dispatch(Event::TagClick(tag.as_str().into()));
    }
    if let Some(term) = &args.search {
        listing.dispatch(Event::Input {
            text: term.clone(),
            at: Duration::ZERO,
        });
        listing.dispatch(Event::Enter { at: Duration::ZERO });
    }
    for _ in 0..args.sort {
        listing.dispatch(Event::SortClick);
    }
}

fn write_page(
    layout: &Layout,
    listing: &Listing,
    config: &FilterConfig,
    args: &RenderArgs,
) -> Result<()> {
    let html = render_page(layout, &listing.view(), config)?;

    match &args.output {
        Some(path) => {
            fs::write(path, &html)
                .with_context(|| format!("failed to write `{}`", path.display()))?;
            log!(
                "page";
                "wrote {}: {}",
                path.display(),
                listing.counter_text()
            );
        }
        None => {
            let mut out = stdout().lock();
            out.write_all(&html)?;
            out.flush()?;
        }
    }
    Ok(())
}
