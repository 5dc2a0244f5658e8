//! Submission form validation.
//!
//! The form is split over three pages; each page is validated on its own
//! before the visitor may move on, and [`validate_draft`] runs all of them
//! before anything is sent to the API.

pub mod rules;

use std::collections::BTreeMap;

use kelifax_client::SubmissionDraft;
use thiserror::Error;

pub use rules::{validate_clean_text, validate_no_pipe};

pub const FORM_PAGES: u8 = 3;

/// One failed field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

/// Result of validating one page of the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageValidation {
    pub is_valid: bool,
    /// Field key (`firstName`, `tags`, ...) to message.
    pub errors: BTreeMap<String, String>,
}

impl PageValidation {
    fn from_checks(checks: Vec<(&str, Option<String>)>) -> Self {
        let errors: BTreeMap<String, String> = checks
            .into_iter()
            .filter_map(|(field, error)| error.map(|message| (field.to_string(), message)))
            .collect();
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn into_errors(self) -> Vec<ValidationError> {
        self.errors
            .into_iter()
            .map(|(field, message)| ValidationError { field, message })
            .collect()
    }
}

/// Validate one page (1 to 3) of the draft.
pub fn validate_page(page: u8, draft: &SubmissionDraft) -> PageValidation {
    let checks = match page {
        1 => vec![
            ("firstName", rules::first_name(&draft.first_name)),
            ("lastName", rules::last_name(&draft.last_name)),
            ("company", rules::company(&draft.company)),
            ("phoneNumber", rules::phone_number(&draft.phone_number)),
            ("companyEmail", rules::company_email(&draft.company_email)),
        ],
        2 => vec![
            ("resourceName", rules::resource_name(&draft.resource_name)),
            ("usagePurpose", rules::usage_purpose(&draft.usage_purpose)),
            ("resourceUrl", rules::resource_url(&draft.resource_url)),
            ("category", rules::category(&draft.category)),
            ("tags", rules::tags(&draft.tags)),
        ],
        3 => vec![
            ("keyFeatures", rules::key_features(&draft.key_features)),
            ("useCases", rules::use_cases(&draft.use_cases)),
            (
                "learningResources",
                rules::learning_resources(&draft.learning_resources),
            ),
        ],
        _ => vec![("general", Some("Invalid page number".to_string()))],
    };
    PageValidation::from_checks(checks)
}

/// Validate every page. Errors come back in page order.
pub fn validate_draft(draft: &SubmissionDraft) -> Result<(), Vec<ValidationError>> {
    let errors: Vec<ValidationError> = (1..=FORM_PAGES)
        .flat_map(|page| validate_page(page, draft).into_errors())
        .collect();

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kelifax_client::LearningResource;

    fn valid_draft() -> SubmissionDraft {
        SubmissionDraft {
            first_name: "Ada".into(),
            last_name: "Lovelace".into(),
            company: "Analytical Engines".into(),
            phone_number: "+44 20 7946 0958".into(),
            company_email: "ada@example.com".into(),
            resource_name: "Figma".into(),
            usage_purpose: "Designing interfaces with the whole team".into(),
            resource_url: "https://figma.com".into(),
            category: "design".into(),
            tags: "design, prototyping".into(),
            key_features: vec![
                "Real-time collaboration".into(),
                "Component libraries".into(),
                "Developer handoff".into(),
            ],
            use_cases: vec![
                "Designing product screens".into(),
                "Maintaining a design system".into(),
            ],
            learning_resources: vec![LearningResource {
                title: "Figma Help Center".into(),
                url: "https://help.figma.com".into(),
                kind: "documentation".into(),
            }],
            logo_image: None,
        }
    }

    #[test]
    fn test_valid_draft_passes_every_page() {
        let draft = valid_draft();
        for page in 1..=FORM_PAGES {
            let result = validate_page(page, &draft);
            assert!(result.is_valid, "page {} errors: {:?}", page, result.errors);
        }
        assert_eq!(validate_draft(&draft), Ok(()));
    }

    #[test]
    fn test_page_one_reports_each_failing_field() {
        let draft = SubmissionDraft {
            first_name: "A".into(),
            company_email: "not-an-email".into(),
            ..valid_draft()
        };

        let result = validate_page(1, &draft);

        assert!(!result.is_valid);
        assert_eq!(result.errors.len(), 2);
        assert_eq!(
            result.error("firstName"),
            Some("First name must be at least 2 characters long")
        );
        assert_eq!(
            result.error("companyEmail"),
            Some("Please enter a valid email address")
        );
        assert_eq!(result.error("lastName"), None);
    }

    #[test]
    fn test_page_checks_only_its_own_fields() {
        let draft = SubmissionDraft {
            first_name: String::new(),
            ..valid_draft()
        };
        assert!(validate_page(2, &draft).is_valid);
        assert!(validate_page(3, &draft).is_valid);
    }

    #[test]
    fn test_unknown_page() {
        for page in [0, 4] {
            let result = validate_page(page, &valid_draft());
            assert!(!result.is_valid);
            assert_eq!(result.error("general"), Some("Invalid page number"));
        }
    }

    #[test]
    fn test_validate_draft_collects_all_pages() {
        let draft = SubmissionDraft {
            last_name: "L".into(),
            category: "Design".into(),
            use_cases: vec![],
            ..valid_draft()
        };

        let errors = validate_draft(&draft).unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();

        assert_eq!(fields, vec!["lastName", "category", "useCases"]);
        assert_eq!(
            errors[2].to_string(),
            "useCases: At least 2 use cases are required"
        );
    }
}
