//! `kelifax`: browse, search and submit resources, and review submissions.

mod cmd;
mod context;
mod view;

use anyhow::Result;
use clap::{Parser, Subcommand};
use kelifax_client::CategoryFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cmd::admin::AdminCommand;
use crate::context::AppContext;

#[derive(Parser)]
#[command(name = "kelifax")]
#[command(about = "Browse and curate the Kelifax resource catalog")]
#[command(version)]
struct Cli {
    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only print results and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Read the bundled catalog instead of the API
    #[arg(long, global = true)]
    offline: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Page through the resource listing
    Browse {
        /// Category to show (`all`, `design`, `ai`, ...)
        #[arg(short, long, default_value = "all")]
        category: CategoryFilter,

        /// Resources per page (at most 50)
        #[arg(short, long)]
        batch_size: Option<usize>,

        /// Number of pages to load
        #[arg(short, long, default_value_t = 1)]
        pages: usize,

        /// Prompt after each page instead of stopping
        #[arg(short, long)]
        interactive: bool,

        /// Fail instead of falling back to the bundled catalog
        #[arg(long)]
        no_fallback: bool,
    },

    /// Show one resource
    Show {
        slug: String,

        /// Also list related resources
        #[arg(long)]
        related: bool,
    },

    /// Search titles, descriptions and tags of the bundled catalog
    Search { query: Vec<String> },

    /// Validate and submit a draft (JSON)
    Submit {
        draft: std::path::PathBuf,

        /// PNG logo to upload with the submission
        #[arg(long)]
        logo: Option<std::path::PathBuf>,
    },

    /// Check a draft (JSON) page by page without submitting it
    Validate { draft: std::path::PathBuf },

    /// Review submissions
    #[command(subcommand)]
    Admin(AdminCommand),
}

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = match (verbose, quiet) {
        (0, true) => EnvFilter::new("error"),
        (0, false) => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        (1, _) => EnvFilter::new("warn,kelifax_client=info,kelifax_feed=info"),
        _ => EnvFilter::new("info,kelifax_client=debug,kelifax_feed=debug"),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let ctx = AppContext::new(cli.quiet, cli.offline)?;

    match cli.command {
        Commands::Browse {
            category,
            batch_size,
            pages,
            interactive,
            no_fallback,
        } => {
            let options = cmd::browse::BrowseOptions {
                category,
                batch_size: batch_size.unwrap_or(ctx.config.batch_size),
                pages,
                interactive,
                fallback: !no_fallback,
            };
            cmd::browse::run(&ctx, options).await
        }
        Commands::Show { slug, related } => cmd::show::run(&ctx, &slug, related).await,
        Commands::Search { query } => cmd::search::run(&ctx, &query.join(" ")),
        Commands::Submit { draft, logo } => cmd::submit::run(&ctx, &draft, logo.as_deref()).await,
        Commands::Validate { draft } => cmd::validate::run(&ctx, &draft),
        Commands::Admin(command) => cmd::admin::run(&ctx, command).await,
    }
}
