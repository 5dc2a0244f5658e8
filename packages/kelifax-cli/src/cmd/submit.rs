//! Validate, upload the logo, submit.

use std::path::Path;

use anyhow::{bail, Context, Result};
use console::style;
use kelifax_client::upload::sniff_content_type;
use kelifax_feed::validate_draft;

use super::load_draft;
use crate::context::AppContext;

pub async fn run(ctx: &AppContext, path: &Path, logo: Option<&Path>) -> Result<()> {
    let mut draft = load_draft(path)?;

    if let Err(errors) = validate_draft(&draft) {
        for error in &errors {
            eprintln!("  {}", style(error).red());
        }
        bail!("Draft has {} validation error(s)", errors.len());
    }

    if !ctx.config.use_api {
        bail!("Submitting needs the API (drop --offline or set KELIFAX_USE_API=true)");
    }
    let client = ctx.client()?;

    if let Some(logo) = logo {
        let bytes =
            std::fs::read(logo).with_context(|| format!("Failed to read {}", logo.display()))?;
        let content_type = sniff_content_type(&bytes).unwrap_or("application/octet-stream");
        let upload = client
            .upload_logo(&draft.resource_name, content_type, &bytes)
            .await
            .context("Logo upload failed")?;
        ctx.print_info(&format!("Logo uploaded as {}", upload.file_name));
        draft.logo_image = Some(upload.file_name);
    }

    let receipt = client
        .submit_resource(&draft)
        .await
        .context("Failed to submit resource")?;

    if !receipt.success {
        let message = receipt
            .message
            .unwrap_or_else(|| "Submission was rejected".to_string());
        if let Some(errors) = receipt.errors {
            eprintln!("{}", style(errors).red());
        }
        bail!(message);
    }

    let slug = receipt
        .data
        .map(|d| d.resource_slug)
        .unwrap_or_else(|| draft.slug());
    ctx.print_success(&format!("Submitted {} for review", slug));
    if let Some(message) = receipt.message {
        ctx.print_info(&message);
    }
    Ok(())
}
