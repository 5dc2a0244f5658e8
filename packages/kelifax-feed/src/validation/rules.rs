//! Per-field rules. Each returns `None` when the value is acceptable.

use std::sync::LazyLock;

use kelifax_client::{Category, LearningResource};
use regex::Regex;

static RE_PERSON_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z\s\-'.]+$").unwrap());
static RE_PHONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\+?[1-9][0-9]{0,15}$").unwrap());
static RE_PHONE_SEPARATORS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s\-().]").unwrap());
static RE_EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
static RE_MARKUP_CHARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[<>{}\[\]\\]").unwrap());

pub const LEARNING_RESOURCE_TYPES: [&str; 4] = ["documentation", "tutorial", "video", "course"];

fn len(value: &str) -> usize {
    value.chars().count()
}

fn is_absolute_url(value: &str) -> bool {
    url::Url::parse(value.trim()).is_ok()
}

/// Stored values are pipe-delimited server side, so `|` is never allowed.
pub fn validate_no_pipe(value: &str, field: &str) -> Option<String> {
    value.contains('|').then(|| {
        format!(
            "{} cannot contain the pipe character (|). Please use commas, dashes, or other separators instead.",
            field
        )
    })
}

/// Rejects `|` and characters that break rendering: `< > { } [ ] \`.
pub fn validate_clean_text(value: &str, field: &str) -> Option<String> {
    if value.contains('|') {
        return Some(format!("{} cannot contain the pipe character (|)", field));
    }
    if RE_MARKUP_CHARS.is_match(value) {
        return Some(format!(
            "{} contains invalid characters. Please avoid using < > {{ }} [ ] \\",
            field
        ));
    }
    None
}

// ============================================================================
// Page 1: submitter
// ============================================================================

fn person_name(value: &str, label: &str) -> Option<String> {
    let value = value.trim();
    if len(value) < 2 {
        return Some(format!("{} must be at least 2 characters long", label));
    }
    if len(value) > 50 {
        return Some(format!("{} cannot exceed 50 characters", label));
    }
    if !RE_PERSON_NAME.is_match(value) {
        return Some(format!(
            "{} can only contain letters, spaces, hyphens, apostrophes, and periods",
            label
        ));
    }
    None
}

pub fn first_name(value: &str) -> Option<String> {
    person_name(value, "First name")
}

pub fn last_name(value: &str) -> Option<String> {
    person_name(value, "Last name")
}

pub fn company(value: &str) -> Option<String> {
    (len(value.trim()) > 100).then(|| "Company name cannot exceed 100 characters".to_string())
}

/// Optional. Separators (spaces, dashes, parentheses, dots) are ignored.
pub fn phone_number(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        return None;
    }
    let digits = RE_PHONE_SEPARATORS.replace_all(value, "");
    (!RE_PHONE.is_match(&digits)).then(|| "Please enter a valid phone number".to_string())
}

pub fn company_email(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return Some("Email address is required".to_string());
    }
    (!RE_EMAIL.is_match(value)).then(|| "Please enter a valid email address".to_string())
}

// ============================================================================
// Page 2: resource
// ============================================================================

pub fn resource_name(value: &str) -> Option<String> {
    let value = value.trim();
    if len(value) < 3 {
        return Some("Resource name must be at least 3 characters long".to_string());
    }
    if len(value) > 100 {
        return Some("Resource name cannot exceed 100 characters".to_string());
    }
    None
}

pub fn usage_purpose(value: &str) -> Option<String> {
    let value = value.trim();
    if len(value) < 20 {
        return Some("Usage purpose must be at least 20 characters long".to_string());
    }
    if len(value) > 500 {
        return Some("Usage purpose cannot exceed 500 characters".to_string());
    }
    None
}

pub fn resource_url(value: &str) -> Option<String> {
    if value.trim().is_empty() {
        return Some("Resource URL is required".to_string());
    }
    (!is_absolute_url(value)).then(|| "Please enter a valid URL".to_string())
}

/// Must be one of the category identifiers exactly (`"design"`, not `"Design"`).
pub fn category(value: &str) -> Option<String> {
    let known = Category::ALL.iter().any(|c| c.as_str() == value);
    (!known).then(|| "Please select a valid category".to_string())
}

/// Optional comma list: at most 10 tags, each at most 30 characters, no `|`.
pub fn tags(value: &str) -> Option<String> {
    let tags: Vec<&str> = value
        .split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();

    if tags.len() > 10 {
        return Some("Maximum 10 tags allowed".to_string());
    }
    tags.iter().find_map(|tag| {
        if len(tag) > 30 {
            return Some(format!("Tag \"{}\" exceeds 30 character limit", tag));
        }
        validate_no_pipe(tag, &format!("Tag \"{}\"", tag))
    })
}

// ============================================================================
// Page 3: extended details
// ============================================================================

/// Item count within `min..=max`, each trimmed item within `min_len..=max_len`, no `|`.
fn item_list(
    items: &[String],
    (min, max): (usize, usize),
    (min_len, max_len): (usize, usize),
    plural: &str,
    singular: &str,
    pipe_label: &str,
) -> Option<String> {
    if items.len() < min {
        return Some(format!("At least {} {} are required", min, plural));
    }
    if items.len() > max {
        return Some(format!("Maximum {} {} allowed", max, plural));
    }
    items.iter().enumerate().find_map(|(i, item)| {
        let item = item.trim();
        let n = i + 1;
        if len(item) < min_len {
            return Some(format!(
                "{} {} must be at least {} characters long",
                singular, n, min_len
            ));
        }
        if len(item) > max_len {
            return Some(format!("{} {} cannot exceed {} characters", singular, n, max_len));
        }
        validate_no_pipe(item, &format!("{} {}", pipe_label, n))
    })
}

pub fn key_features(features: &[String]) -> Option<String> {
    item_list(
        features,
        (3, 10),
        (10, 200),
        "key features",
        "Key feature",
        "Key Feature",
    )
}

pub fn use_cases(use_cases: &[String]) -> Option<String> {
    item_list(use_cases, (2, 8), (15, 300), "use cases", "Use case", "Use Case")
}

pub fn learning_resources(resources: &[LearningResource]) -> Option<String> {
    if resources.len() > 5 {
        return Some("Maximum 5 learning resources allowed".to_string());
    }
    resources.iter().enumerate().find_map(|(i, resource)| {
        let n = i + 1;
        let title = resource.title.trim();
        if title.is_empty() {
            return Some(format!("Learning resource {} title is required", n));
        }
        if len(title) > 100 {
            return Some(format!(
                "Learning resource {} title cannot exceed 100 characters",
                n
            ));
        }
        if let Some(error) =
            validate_no_pipe(&resource.title, &format!("Learning Resource {} Title", n))
        {
            return Some(error);
        }
        if resource.url.trim().is_empty() {
            return Some(format!("Learning resource {} URL is required", n));
        }
        if !is_absolute_url(&resource.url) {
            return Some(format!("Learning resource {} has an invalid URL", n));
        }
        if !LEARNING_RESOURCE_TYPES.contains(&resource.kind.as_str()) {
            return Some(format!("Learning resource {} must have a valid type", n));
        }
        None
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_person_names() {
        assert_eq!(first_name("Ada"), None);
        assert_eq!(first_name("  Mary-Jane O'Neil Jr. "), None);
        assert_eq!(
            first_name(" A ").as_deref(),
            Some("First name must be at least 2 characters long")
        );
        assert_eq!(
            last_name(&"x".repeat(51)).as_deref(),
            Some("Last name cannot exceed 50 characters")
        );
        assert!(first_name("R2D2").unwrap().contains("only contain letters"));
    }

    #[test]
    fn test_company_is_optional_but_bounded() {
        assert_eq!(company(""), None);
        assert_eq!(company("Acme"), None);
        assert!(company(&"a".repeat(101)).is_some());
    }

    #[test]
    fn test_phone_number() {
        assert_eq!(phone_number(""), None);
        assert_eq!(phone_number("+1 (555) 123-4567"), None);
        assert_eq!(phone_number("555.123.4567"), None);
        assert!(phone_number("0123456").is_some(), "leading zero");
        assert!(phone_number("call me").is_some());
        assert!(phone_number("+12345678901234567").is_some(), "too long");
    }

    #[test]
    fn test_company_email() {
        assert_eq!(company_email("ada@example.com"), None);
        assert_eq!(
            company_email("  ").as_deref(),
            Some("Email address is required")
        );
        assert!(company_email("ada@example").is_some());
        assert!(company_email("ada example@x.com").is_some());
    }

    #[test]
    fn test_resource_fields() {
        assert_eq!(resource_name("Figma"), None);
        assert!(resource_name("Fi").is_some());
        assert!(usage_purpose("too short").is_some());
        assert_eq!(usage_purpose("Designing interfaces with my team"), None);
        assert!(usage_purpose(&"x".repeat(501)).is_some());
    }

    #[test]
    fn test_resource_url() {
        assert_eq!(resource_url("https://figma.com"), None);
        assert_eq!(
            resource_url("").as_deref(),
            Some("Resource URL is required")
        );
        assert_eq!(
            resource_url("figma.com").as_deref(),
            Some("Please enter a valid URL")
        );
    }

    #[test]
    fn test_category_is_exact() {
        assert_eq!(category("design"), None);
        assert_eq!(category("ai"), None);
        assert!(category("Design").is_some());
        assert!(category("").is_some());
        assert!(category("gardening").is_some());
    }

    #[test]
    fn test_tags() {
        assert_eq!(tags(""), None);
        assert_eq!(tags("design, ui, , prototyping"), None);
        assert_eq!(
            tags(&vec!["t"; 11].join(",")).as_deref(),
            Some("Maximum 10 tags allowed")
        );
        assert!(tags(&"x".repeat(31)).unwrap().contains("exceeds 30 character limit"));
        assert!(tags("a|b").unwrap().contains("pipe character"));
    }

    #[test]
    fn test_key_features() {
        let ok = strings(&[
            "Real-time collaboration",
            "Component libraries",
            "Prototyping and handoff",
        ]);
        assert_eq!(key_features(&ok), None);
        assert_eq!(
            key_features(&ok[..2]).as_deref(),
            Some("At least 3 key features are required")
        );

        let mut short = ok.clone();
        short[1] = "Fast".into();
        assert_eq!(
            key_features(&short).as_deref(),
            Some("Key feature 2 must be at least 10 characters long")
        );

        let mut piped = ok.clone();
        piped[2] = "Exports | imports".into();
        assert!(key_features(&piped)
            .unwrap()
            .starts_with("Key Feature 3 cannot contain the pipe character"));

        assert_eq!(
            key_features(&vec!["Long enough feature".to_string(); 11]).as_deref(),
            Some("Maximum 10 key features allowed")
        );
    }

    #[test]
    fn test_use_cases() {
        let ok = strings(&["Designing product screens", "Building a design system"]);
        assert_eq!(use_cases(&ok), None);
        assert_eq!(
            use_cases(&ok[..1]).as_deref(),
            Some("At least 2 use cases are required")
        );
        assert_eq!(
            use_cases(&strings(&["Designing product screens", "Too short"])).as_deref(),
            Some("Use case 2 must be at least 15 characters long")
        );
    }

    #[test]
    fn test_learning_resources() {
        let docs = LearningResource {
            title: "Docs".into(),
            url: "https://help.figma.com".into(),
            kind: "documentation".into(),
        };
        assert_eq!(learning_resources(&[]), None);
        assert_eq!(learning_resources(&[docs.clone()]), None);

        let bad_type = LearningResource {
            kind: "podcast".into(),
            ..docs.clone()
        };
        assert_eq!(
            learning_resources(&[docs.clone(), bad_type]).as_deref(),
            Some("Learning resource 2 must have a valid type")
        );

        let bad_url = LearningResource {
            url: "help.figma.com".into(),
            ..docs.clone()
        };
        assert_eq!(
            learning_resources(&[bad_url]).as_deref(),
            Some("Learning resource 1 has an invalid URL")
        );

        let untitled = LearningResource {
            title: " ".into(),
            ..docs.clone()
        };
        assert_eq!(
            learning_resources(&[untitled]).as_deref(),
            Some("Learning resource 1 title is required")
        );

        assert_eq!(
            learning_resources(&vec![docs; 6]).as_deref(),
            Some("Maximum 5 learning resources allowed")
        );
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(validate_clean_text("Plain text, fine.", "Title"), None);
        assert_eq!(
            validate_clean_text("a|b", "Title").as_deref(),
            Some("Title cannot contain the pipe character (|)")
        );
        assert_eq!(
            validate_clean_text("<script>", "Title").as_deref(),
            Some("Title contains invalid characters. Please avoid using < > { } [ ] \\")
        );
        assert!(validate_clean_text("path\\to", "Title").is_some());
    }
}
