//! Check a draft page by page.

use std::path::Path;

use anyhow::{bail, Result};
use console::style;
use kelifax_feed::validation::{validate_page, FORM_PAGES};

use super::load_draft;
use crate::context::AppContext;

const PAGE_TITLES: [&str; FORM_PAGES as usize] =
    ["Your details", "Resource", "Extended details"];

pub fn run(ctx: &AppContext, path: &Path) -> Result<()> {
    let draft = load_draft(path)?;
    let mut failed = 0;

    for (page, title) in (1..=FORM_PAGES).zip(PAGE_TITLES) {
        let result = validate_page(page, &draft);
        if result.is_valid {
            ctx.print_success(&format!("Page {}: {} ok", page, title));
            continue;
        }
        failed += 1;
        println!("{}", style(format!("Page {}: {}", page, title)).red().bold());
        for (field, message) in &result.errors {
            println!("  {:<18} {}", style(field).dim(), message);
        }
    }

    if failed > 0 {
        bail!("{} of {} pages have errors", failed, FORM_PAGES);
    }
    ctx.print_success(&format!("Slug: {}", draft.slug()));
    Ok(())
}
