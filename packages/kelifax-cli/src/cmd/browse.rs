//! Paged listing, driven through the feed controller.

use std::sync::Arc;

use anyhow::{bail, Result};
use dialoguer::Select;
use kelifax_client::{Category, CategoryFilter};
use kelifax_feed::{
    FallbackPolicy, FeedConfig, FeedController, FeedPhase, LoadOutcome, ResourceSource,
};

use crate::context::AppContext;
use crate::view::TerminalView;

pub struct BrowseOptions {
    pub category: CategoryFilter,
    pub batch_size: usize,
    pub pages: usize,
    pub interactive: bool,
    /// Serve the bundled catalog when the API fails.
    pub fallback: bool,
}

pub async fn run(ctx: &AppContext, options: BrowseOptions) -> Result<()> {
    let feed = build_feed(ctx, &options)?;

    ctx.print_header(&format!("Resources: {}", filter_label(options.category)));
    let mut outcome = feed.initialize(options.category).await;

    if options.interactive {
        return interact(ctx, &feed, outcome).await;
    }

    for _ in 1..options.pages {
        if !outcome.is_loaded() || feed.phase() == FeedPhase::Exhausted {
            break;
        }
        outcome = feed.on_load_more_clicked().await;
    }

    match outcome {
        LoadOutcome::Failed(_) => bail!("Could not load resources"),
        _ => Ok(()),
    }
}

fn build_feed(ctx: &AppContext, options: &BrowseOptions) -> Result<FeedController> {
    let source: Arc<dyn ResourceSource> = if ctx.config.use_api {
        Arc::new(ctx.client()?)
    } else {
        Arc::new(ctx.catalog.clone())
    };

    let fallback = if options.fallback && ctx.config.use_api {
        FallbackPolicy::Static(ctx.catalog.clone())
    } else {
        FallbackPolicy::Disabled
    };

    tracing::debug!(
        source = source.name(),
        batch_size = options.batch_size,
        "Starting feed"
    );

    Ok(FeedController::new(
        source,
        Arc::new(TerminalView::new(ctx.quiet)),
        FeedConfig::default()
            .with_batch_size(options.batch_size)
            .with_fallback(fallback),
    ))
}

#[derive(Clone, Copy)]
enum Action {
    LoadMore,
    Retry,
    ChangeCategory,
    Quit,
}

impl Action {
    fn label(&self) -> &'static str {
        match self {
            Action::LoadMore => "Load more",
            Action::Retry => "Retry",
            Action::ChangeCategory => "Change category",
            Action::Quit => "Quit",
        }
    }
}

async fn interact(ctx: &AppContext, feed: &FeedController, mut outcome: LoadOutcome) -> Result<()> {
    loop {
        let state = feed.snapshot();
        let mut actions = Vec::new();
        if state.last_error.is_some() {
            actions.push(Action::Retry);
        } else if state.phase() == FeedPhase::Idle {
            actions.push(Action::LoadMore);
        }
        actions.push(Action::ChangeCategory);
        actions.push(Action::Quit);

        let labels: Vec<&str> = actions.iter().map(Action::label).collect();
        let choice = Select::with_theme(&ctx.theme())
            .with_prompt("What next?")
            .items(&labels)
            .default(0)
            .interact()?;

        outcome = match actions[choice] {
            Action::LoadMore => feed.on_load_more_clicked().await,
            Action::Retry => feed.retry().await,
            Action::ChangeCategory => {
                let category = pick_category(ctx, feed.category())?;
                ctx.print_header(&format!("Resources: {}", filter_label(category)));
                feed.change_category(category).await
            }
            Action::Quit => break,
        };
        tracing::debug!(?outcome, "Feed action finished");
    }

    feed.discard();
    Ok(())
}

fn pick_category(ctx: &AppContext, current: CategoryFilter) -> Result<CategoryFilter> {
    let filters: Vec<CategoryFilter> = std::iter::once(CategoryFilter::All)
        .chain(Category::ALL.into_iter().map(CategoryFilter::Only))
        .collect();
    let labels: Vec<&str> = filters.iter().map(|f| filter_label(*f)).collect();
    let default = filters.iter().position(|f| *f == current).unwrap_or(0);

    let choice = Select::with_theme(&ctx.theme())
        .with_prompt("Category")
        .items(&labels)
        .default(default)
        .interact()?;
    Ok(filters[choice])
}

fn filter_label(filter: CategoryFilter) -> &'static str {
    match filter {
        CategoryFilter::All => "All Resources",
        CategoryFilter::Only(category) => category.label(),
    }
}
