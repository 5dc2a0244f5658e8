//! Terminal rendering of the resource feed.

use std::sync::atomic::{AtomicUsize, Ordering};

use console::style;
use kelifax_client::Resource;
use kelifax_feed::{count_label, FeedView, LoadMoreVisibility};

const DESCRIPTION_WIDTH: usize = 72;

/// Prints the feed to stdout. Numbering continues across appended pages.
#[derive(Debug, Default)]
pub struct TerminalView {
    quiet: bool,
    shown: AtomicUsize,
}

impl TerminalView {
    pub fn new(quiet: bool) -> Self {
        Self {
            quiet,
            shown: AtomicUsize::new(0),
        }
    }
}

impl FeedView for TerminalView {
    fn render(&self, resources: &[Resource], append: bool) {
        if !append {
            self.shown.store(0, Ordering::SeqCst);
        }
        let start = self.shown.fetch_add(resources.len(), Ordering::SeqCst);
        for (i, resource) in resources.iter().enumerate() {
            print_resource(start + i + 1, resource);
        }
    }

    fn render_featured(&self, featured: &[Resource]) {
        if self.quiet || featured.is_empty() {
            return;
        }
        println!();
        println!("{}", style("Featured").bold());
        for resource in featured {
            println!(
                "  {} {}",
                style("*").yellow(),
                style(&resource.title).bold()
            );
        }
        println!();
    }

    fn set_loading(&self, loading: bool) {
        if loading && !self.quiet {
            println!("{}", style("Loading...").dim());
        }
    }

    fn show_error(&self, message: &str) {
        eprintln!("{}", style(message).red());
    }

    fn show_degraded(&self) {
        if !self.quiet {
            println!(
                "{}",
                style("API unavailable, showing the bundled catalog").yellow()
            );
        }
    }

    fn update_load_more(&self, visibility: LoadMoreVisibility) {
        if self.quiet {
            return;
        }
        match visibility {
            LoadMoreVisibility::Show => println!("{}", style("More resources available").dim()),
            LoadMoreVisibility::NoMore => println!("{}", style("No more resources").dim()),
            LoadMoreVisibility::Hidden => {}
        }
    }

    fn update_count(&self, count: usize) {
        if !self.quiet {
            println!("{}", style(count_label(count)).cyan());
        }
    }
}

fn print_resource(n: usize, resource: &Resource) {
    println!(
        "{:>3}. {}  {}",
        n,
        style(&resource.title).bold(),
        style(format!("[{}]", resource.category)).cyan()
    );
    if !resource.description.is_empty() {
        println!("     {}", truncate(&resource.description, DESCRIPTION_WIDTH));
    }
}

/// Cut `text` to at most `width` characters, marking the cut with `...`.
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let cut: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", cut.trim_end())
}
