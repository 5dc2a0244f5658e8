//! Queries over an already-loaded resource list.
//!
//! Used on the bundled catalog and on whatever the feed has accumulated.

use kelifax_client::Resource;

/// Featured resources shown above the listing.
pub const FEATURED_LIMIT: usize = 6;

/// Related resources shown on a detail view.
pub const RELATED_LIMIT: usize = 3;

pub fn find_by_slug<'a>(resources: &'a [Resource], slug: &str) -> Option<&'a Resource> {
    resources.iter().find(|r| r.slug == slug)
}

/// First `limit` resources flagged as featured, in list order.
pub fn featured(resources: &[Resource], limit: usize) -> Vec<Resource> {
    resources
        .iter()
        .filter(|r| r.featured)
        .take(limit)
        .cloned()
        .collect()
}

/// Resources ranked by similarity to `resource`: +3 for the same category,
/// +1 per shared tag. Ties keep list order. `resource` itself is excluded.
pub fn related<'a>(resources: &'a [Resource], resource: &Resource, limit: usize) -> Vec<&'a Resource> {
    let mut scored: Vec<(usize, &Resource)> = resources
        .iter()
        .filter(|r| r.slug != resource.slug)
        .map(|r| (similarity(resource, r), r))
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().take(limit).map(|(_, r)| r).collect()
}

fn similarity(a: &Resource, b: &Resource) -> usize {
    let category = if a.category == b.category { 3 } else { 0 };
    let shared_tags = b.tags.iter().filter(|t| a.tags.contains(t)).count();
    category + shared_tags
}

/// Case-insensitive substring match on title, description or any tag.
pub fn search<'a>(resources: &'a [Resource], query: &str) -> Vec<&'a Resource> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return resources.iter().collect();
    }

    resources
        .iter()
        .filter(|r| {
            r.title.to_lowercase().contains(&needle)
                || r.description.to_lowercase().contains(&needle)
                || r.tags.iter().any(|t| t.to_lowercase().contains(&needle))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kelifax_client::Category;

    fn fixtures() -> Vec<Resource> {
        vec![
            Resource::new("Figma", Category::Design)
                .with_tags(["design", "prototyping"])
                .featured(),
            Resource::new("Canva", Category::Design).with_tags(["design", "templates"]),
            Resource::new("Notion", Category::Productivity)
                .with_tags(["notes", "prototyping"])
                .with_description("All-in-one workspace"),
            Resource::new("GitHub", Category::Development)
                .with_tags(["git"])
                .featured(),
            Resource::new("Sketch", Category::Design).with_tags(["design", "prototyping"]),
        ]
    }

    #[test]
    fn test_find_by_slug() {
        let resources = fixtures();
        assert_eq!(find_by_slug(&resources, "notion").unwrap().title, "Notion");
        assert!(find_by_slug(&resources, "missing").is_none());
    }

    #[test]
    fn test_featured_keeps_order_and_limit() {
        let resources = fixtures();
        let slugs: Vec<_> = featured(&resources, FEATURED_LIMIT)
            .into_iter()
            .map(|r| r.slug)
            .collect();
        assert_eq!(slugs, vec!["figma", "github"]);
        assert_eq!(featured(&resources, 1).len(), 1);
    }

    #[test]
    fn test_related_scores_category_then_tags() {
        let resources = fixtures();
        let figma = &resources[0];

        let slugs: Vec<_> = related(&resources, figma, RELATED_LIMIT)
            .into_iter()
            .map(|r| r.slug.as_str())
            .collect();

        // sketch: 3 + 2, canva: 3 + 1, notion: 0 + 1
        assert_eq!(slugs, vec!["sketch", "canva", "notion"]);
    }

    #[test]
    fn test_related_never_includes_self() {
        let resources = fixtures();
        let figma = &resources[0];
        assert!(related(&resources, figma, 10)
            .iter()
            .all(|r| r.slug != "figma"));
        assert_eq!(related(&resources, figma, 10).len(), 4);
    }

    #[test]
    fn test_search_matches_title_description_and_tags() {
        let resources = fixtures();
        let hits = |q: &str| -> Vec<String> {
            search(&resources, q).into_iter().map(|r| r.slug.clone()).collect()
        };

        assert_eq!(hits("FIG"), vec!["figma"]);
        assert_eq!(hits("workspace"), vec!["notion"]);
        assert_eq!(hits("templates"), vec!["canva"]);
        assert!(hits("nothing-matches").is_empty());
        assert_eq!(hits("  ").len(), resources.len());
    }
}
