//! Search over the bundled catalog.

use anyhow::Result;

use super::print_resource_line;
use crate::context::AppContext;

pub fn run(ctx: &AppContext, query: &str) -> Result<()> {
    let matches = ctx.catalog.search(query);

    ctx.print_header(&format!("{} match(es) for \"{}\"", matches.len(), query));
    for resource in matches {
        print_resource_line(resource);
    }
    Ok(())
}
