//! Resource detail.

use anyhow::{bail, Context, Result};
use kelifax_client::{ClientError, Resource};
use kelifax_feed::query::RELATED_LIMIT;

use super::{print_resource_detail, print_resource_line};
use crate::context::AppContext;

pub async fn run(ctx: &AppContext, slug: &str, related: bool) -> Result<()> {
    let resource = find(ctx, slug).await?;
    print_resource_detail(&resource, &ctx.config.logo_storage);

    if related {
        let related = ctx.catalog.related(&resource, RELATED_LIMIT);
        ctx.print_header("Related resources");
        if related.is_empty() {
            ctx.print_info("Nothing related yet.");
        }
        for resource in related {
            print_resource_line(resource);
        }
    }
    Ok(())
}

/// Look the slug up through the API, or the bundled catalog when offline or
/// when the API cannot be reached.
async fn find(ctx: &AppContext, slug: &str) -> Result<Resource> {
    if ctx.config.use_api {
        match ctx.client()?.fetch_resource_detail(slug).await {
            Ok(resource) => return Ok(resource),
            Err(e @ ClientError::NotFound { .. }) => return Err(e.into()),
            Err(e) if e.is_transient() => {
                ctx.print_warning(&format!("API unavailable ({}), using the bundled catalog", e));
            }
            Err(e) => return Err(e).context("Failed to fetch resource"),
        }
    }

    match ctx.catalog.find_by_slug(slug) {
        Some(resource) => Ok(resource.clone()),
        None => bail!("Resource not found: {}", slug),
    }
}
