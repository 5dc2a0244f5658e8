//! Command implementations

pub mod admin;
pub mod browse;
pub mod search;
pub mod show;
pub mod submit;
pub mod validate;

use std::path::Path;

use anyhow::{Context, Result};
use console::style;
use kelifax_client::{LogoFolder, LogoStorageConfig, Resource, SubmissionDraft};

/// Read a submission draft from a JSON file.
pub fn load_draft(path: &Path) -> Result<SubmissionDraft> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read draft {}", path.display()))?;
    serde_json::from_str(&contents)
        .with_context(|| format!("Draft {} is not valid JSON", path.display()))
}

/// One line per resource: slug, title and category.
pub fn print_resource_line(resource: &Resource) {
    let status = resource
        .status
        .map(|s| format!(" ({})", s))
        .unwrap_or_default();
    println!(
        "  {:<28} {}  {}{}",
        style(&resource.slug).dim(),
        style(&resource.title).bold(),
        style(format!("[{}]", resource.category)).cyan(),
        status
    );
}

/// Public logo URL, from the pending folder while the resource awaits review.
pub fn resource_logo_url(storage: &LogoStorageConfig, resource: &Resource) -> Option<String> {
    let image = resource.image.as_deref()?;
    storage.logo_url(image, LogoFolder::for_status(resource.status))
}

/// Everything known about a resource.
pub fn print_resource_detail(resource: &Resource, storage: &LogoStorageConfig) {
    println!("{}", style(&resource.title).bold());
    println!("  Category: {}", resource.category.label());
    if let Some(url) = &resource.url {
        println!("  URL:      {}", url);
    }
    if let Some(logo) = resource_logo_url(storage, resource) {
        println!("  Logo:     {}", logo);
    }
    if let Some(status) = resource.status {
        println!("  Status:   {}", status);
    }
    if !resource.tags.is_empty() {
        println!("  Tags:     {}", resource.tags.join(", "));
    }
    if !resource.description.is_empty() {
        println!();
        println!("  {}", resource.description);
    }

    print_list("Key features", &resource.key_features);
    print_list("Use cases", &resource.use_cases);

    if !resource.learning_resources.is_empty() {
        println!();
        println!("  {}", style("Learning resources").bold());
        for lr in &resource.learning_resources {
            println!("    - {} ({}): {}", lr.title, lr.kind, lr.url);
        }
    }
}

fn print_list(heading: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }
    println!();
    println!("  {}", style(heading).bold());
    for item in items {
        println!("    - {}", item);
    }
}
