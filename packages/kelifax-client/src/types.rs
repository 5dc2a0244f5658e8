//! Wire and domain types for the Kelifax API.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::slug::slugify;

// ============================================================================
// Category
// ============================================================================

/// Resource category. Unknown strings from the API deserialize as [`Category::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Development,
    Design,
    Learning,
    Productivity,
    Ai,
    Analytics,
    #[serde(other)]
    Other,
}

impl Category {
    pub const ALL: [Category; 7] = [
        Category::Development,
        Category::Design,
        Category::Learning,
        Category::Productivity,
        Category::Ai,
        Category::Analytics,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Development => "development",
            Category::Design => "design",
            Category::Learning => "learning",
            Category::Productivity => "productivity",
            Category::Ai => "ai",
            Category::Analytics => "analytics",
            Category::Other => "other",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::Development => "Development Tools & Frameworks",
            Category::Design => "Design & UI/UX Tools",
            Category::Learning => "Learning & Education Platforms",
            Category::Productivity => "Productivity & Organization Tools",
            Category::Ai => "AI & Machine Learning Tools",
            Category::Analytics => "Analytics & Data Tools",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown category name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown category: {0}")]
pub struct UnknownCategory(pub String);

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

/// Category filter for the listing feed: everything, or one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Only(category) => category.as_str(),
        }
    }

    pub fn matches(&self, category: Category) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => *wanted == category,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CategoryFilter {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" | "" => Ok(CategoryFilter::All),
            other => other.parse().map(CategoryFilter::Only),
        }
    }
}

impl From<Category> for CategoryFilter {
    fn from(category: Category) -> Self {
        CategoryFilter::Only(category)
    }
}

impl Serialize for CategoryFilter {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// ============================================================================
// Resource
// ============================================================================

/// Lifecycle status of a resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceStatus {
    Pending,
    Submitted,
    Approved,
    Rejected,
}

impl ResourceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceStatus::Pending => "pending",
            ResourceStatus::Submitted => "submitted",
            ResourceStatus::Approved => "approved",
            ResourceStatus::Rejected => "rejected",
        }
    }

    /// Still waiting on an administrator.
    pub fn is_awaiting_review(&self) -> bool {
        matches!(self, ResourceStatus::Pending | ResourceStatus::Submitted)
    }
}

impl fmt::Display for ResourceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResourceStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(ResourceStatus::Pending),
            "submitted" => Ok(ResourceStatus::Submitted),
            "approved" => Ok(ResourceStatus::Approved),
            "rejected" => Ok(ResourceStatus::Rejected),
            other => Err(format!("unknown status: {}", other)),
        }
    }
}

/// A link to documentation, a tutorial, a video or a course.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LearningResource {
    pub title: String,
    pub url: String,
    /// One of `documentation`, `tutorial`, `video`, `course`. Kept as raw input so
    /// form validation can report a bad value instead of failing to parse.
    #[serde(rename = "type")]
    pub kind: String,
}

/// A catalog entry.
///
/// Listing payloads carry only the summary fields; detail payloads add the
/// extended fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    /// Detail payloads may omit the slug; the facade fills it from the request.
    #[serde(default, alias = "resourceSlug")]
    pub slug: String,
    #[serde(alias = "resourceName")]
    pub title: String,
    #[serde(default, alias = "usagePurpose")]
    pub description: String,
    #[serde(
        default,
        alias = "resourceUrl",
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub url: Option<String>,
    #[serde(default = "default_category")]
    pub category: Category,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(
        default,
        alias = "logoImage",
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub image: Option<String>,
    #[serde(default)]
    pub featured: bool,
    #[serde(
        default,
        alias = "resourceStatus",
        deserialize_with = "blank_as_none_parsed",
        skip_serializing_if = "Option::is_none"
    )]
    pub status: Option<ResourceStatus>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub key_features: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub use_cases: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub learning_resources: Vec<LearningResource>,
    #[serde(
        default,
        deserialize_with = "blank_as_none_parsed",
        skip_serializing_if = "Option::is_none"
    )]
    pub submission_timestamp: Option<DateTime<Utc>>,
}

impl Resource {
    /// Minimal resource, mostly useful for fixtures.
    pub fn new(title: impl Into<String>, category: Category) -> Self {
        let title = title.into();
        Self {
            slug: slugify(&title),
            title,
            description: String::new(),
            url: None,
            category,
            tags: Vec::new(),
            image: None,
            featured: false,
            status: None,
            key_features: Vec::new(),
            use_cases: Vec::new(),
            learning_resources: Vec::new(),
            submission_timestamp: None,
        }
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn featured(mut self) -> Self {
        self.featured = true;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

fn default_category() -> Category {
    Category::Other
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// Admin listings send `""` for attributes a record never had.
fn blank_as_none_parsed<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match blank_as_none(deserializer)? {
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

// ============================================================================
// Pagination
// ============================================================================

/// Opaque continuation cursor issued by the API. Passed back unmodified.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageToken(String);

impl PageToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PageToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Body of `POST /resources` when listing.
///
/// The batch size is clamped to [`PageRequest::MAX_BATCH_SIZE`] at construction, so
/// no request for more than that can be built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRequest {
    batch_size: usize,
    category: CategoryFilter,
    #[serde(skip_serializing_if = "Option::is_none")]
    page_token: Option<PageToken>,
}

impl PageRequest {
    pub const MAX_BATCH_SIZE: usize = 50;

    pub fn new(category: CategoryFilter, batch_size: usize) -> Self {
        Self {
            batch_size: batch_size.min(Self::MAX_BATCH_SIZE),
            category,
            page_token: None,
        }
    }

    pub fn with_page_token(mut self, token: Option<PageToken>) -> Self {
        self.page_token = token;
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn category(&self) -> CategoryFilter {
        self.category
    }

    pub fn page_token(&self) -> Option<&PageToken> {
        self.page_token.as_ref()
    }
}

/// Pagination metadata returned alongside a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub has_more: bool,
    #[serde(default)]
    pub next_page_token: Option<PageToken>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

/// One page of the listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourcePage {
    pub resources: Vec<Resource>,
    pub pagination: Pagination,
}

impl ResourcePage {
    pub fn new(resources: Vec<Resource>, has_more: bool, next: Option<PageToken>) -> Self {
        let count = resources.len();
        Self {
            resources,
            pagination: Pagination {
                has_more,
                next_page_token: next,
                count: Some(count),
            },
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new(), false, None)
    }
}

// ============================================================================
// Envelope
// ============================================================================

/// The `{success, data, message}` wrapper every endpoint responds with.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<serde_json::Value>,
}

/// Result of an admin mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub success: bool,
    pub message: String,
}

// ============================================================================
// Submission
// ============================================================================

/// Multi-page submission form, as typed by the visitor.
///
/// Fields hold raw input; validation happens before the draft is turned into a
/// [`SubmissionPayload`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmissionDraft {
    // Page 1: submitter
    pub first_name: String,
    pub last_name: String,
    pub company: String,
    pub phone_number: String,
    pub company_email: String,

    // Page 2: resource
    pub resource_name: String,
    pub usage_purpose: String,
    pub resource_url: String,
    pub category: String,
    /// Comma-separated tags.
    pub tags: String,

    // Page 3: extended details
    pub key_features: Vec<String>,
    pub use_cases: Vec<String>,
    pub learning_resources: Vec<LearningResource>,
    /// File name returned by the logo upload.
    pub logo_image: Option<String>,
}

impl SubmissionDraft {
    /// Tags split on commas, trimmed, empties dropped.
    pub fn tag_list(&self) -> Vec<String> {
        self.tags
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect()
    }

    pub fn slug(&self) -> String {
        slugify(&self.resource_name)
    }

    pub fn to_payload(&self) -> SubmissionPayload {
        SubmissionPayload {
            resource_slug: self.slug(),
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            company: non_blank(&self.company),
            phone_number: non_blank(&self.phone_number),
            company_email: self.company_email.trim().to_string(),
            resource_name: self.resource_name.trim().to_string(),
            usage_purpose: self.usage_purpose.trim().to_string(),
            resource_url: self.resource_url.trim().to_string(),
            category: self.category.trim().to_ascii_lowercase(),
            tags: self.tag_list(),
            key_features: trimmed(&self.key_features),
            use_cases: trimmed(&self.use_cases),
            learning_resources: self
                .learning_resources
                .iter()
                .map(|r| LearningResource {
                    title: r.title.trim().to_string(),
                    url: r.url.trim().to_string(),
                    kind: r.kind.trim().to_string(),
                })
                .collect(),
            logo_image: self.logo_image.clone(),
        }
    }
}

fn non_blank(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn trimmed(values: &[String]) -> Vec<String> {
    values.iter().map(|v| v.trim().to_string()).collect()
}

/// Body of `POST /resources` when submitting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub resource_slug: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    pub company_email: String,
    pub resource_name: String,
    pub usage_purpose: String,
    pub resource_url: String,
    pub category: String,
    pub tags: Vec<String>,
    pub key_features: Vec<String>,
    pub use_cases: Vec<String>,
    pub learning_resources: Vec<LearningResource>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_image: Option<String>,
}

/// What the API echoes back for an accepted submission.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionData {
    pub resource_slug: String,
    #[serde(default)]
    pub status: Option<ResourceStatus>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub submission_timestamp: Option<DateTime<Utc>>,
}

/// Outcome of `submit_resource`. A rejected submission is not an error.
#[derive(Debug, Clone)]
pub struct SubmissionReceipt {
    pub success: bool,
    pub message: Option<String>,
    pub data: Option<SubmissionData>,
    pub errors: Option<serde_json::Value>,
}
