//! Resource repository: the domain calls the rest of the workspace uses.

use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::error::{ClientError, Result};
use crate::slug::is_valid_slug;
use crate::types::{
    ActionOutcome, ApiEnvelope, PageRequest, Resource, ResourcePage, ResourceStatus,
    SubmissionData, SubmissionDraft, SubmissionReceipt,
};
use crate::KelifaxClient;

#[derive(Serialize)]
struct DetailRequest<'a> {
    slug: &'a str,
}

#[derive(Serialize)]
struct StatusUpdate {
    status: ResourceStatus,
}

impl KelifaxClient {
    /// Fetch one page of the public listing.
    pub async fn fetch_resource_page(&self, request: &PageRequest) -> Result<ResourcePage> {
        let http_request = self.http.request(Method::POST, "/resources").json(request);

        let page = self
            .http
            .send::<ResourcePage>(http_request, "/resources")
            .await
            .and_then(|envelope| envelope.into_data())
            .map_err(|e| {
                error!(category = %request.category(), error = %e, "Failed to fetch resource page");
                e
            })?;

        debug!(
            category = %request.category(),
            count = page.resources.len(),
            has_more = page.pagination.has_more,
            "Fetched resource page"
        );
        Ok(page)
    }

    /// Fetch the full record for `slug`.
    pub async fn fetch_resource_detail(&self, slug: &str) -> Result<Resource> {
        let slug = slug.trim();
        if slug.is_empty() {
            return Err(ClientError::NotFound {
                slug: String::new(),
            });
        }

        let request = self
            .http
            .request(Method::POST, "/get-resource")
            .json(&DetailRequest { slug });

        let envelope = match self.http.send::<Resource>(request, "/get-resource").await {
            Ok(envelope) => envelope,
            Err(ClientError::Api { status, .. }) if status == StatusCode::NOT_FOUND.as_u16() => {
                return Err(ClientError::NotFound {
                    slug: slug.to_string(),
                })
            }
            Err(e) => {
                error!(slug, error = %e, "Failed to fetch resource detail");
                return Err(e);
            }
        };

        if !envelope.success || envelope.data.is_none() {
            return Err(ClientError::NotFound {
                slug: slug.to_string(),
            });
        }

        let mut resource = envelope.into_data()?;
        if resource.slug.is_empty() {
            resource.slug = slug.to_string();
        }
        Ok(resource)
    }

    /// Submit a visitor's draft. The caller validates the draft first.
    ///
    /// A submission the server rejects comes back as a receipt with
    /// `success: false`, not as an error.
    pub async fn submit_resource(&self, draft: &SubmissionDraft) -> Result<SubmissionReceipt> {
        let payload = draft.to_payload();
        let request = self.http.request(Method::POST, "/resources").json(&payload);

        let envelope = self
            .http
            .send::<SubmissionData>(request, "/resources")
            .await
            .map_err(|e| {
                error!(slug = %payload.resource_slug, error = %e, "Failed to submit resource");
                e
            })?;

        info!(
            slug = %payload.resource_slug,
            success = envelope.success,
            "Submitted resource"
        );
        Ok(SubmissionReceipt {
            success: envelope.success,
            message: envelope.message,
            data: envelope.data,
            errors: envelope.errors,
        })
    }

    /// Admin listing of submissions, optionally filtered by status.
    pub async fn list_submissions(&self, status: Option<ResourceStatus>) -> Result<Vec<Resource>> {
        let mut request = self.http.request(Method::GET, "/resources");
        if let Some(status) = status {
            request = request.query(&[("status", status.as_str())]);
        }
        let request = self.auth.authorize(request)?;

        let resources = self
            .admin_send::<Vec<Resource>>(request, "/resources")
            .await?
            .into_data()?;

        debug!(count = resources.len(), ?status, "Listed submissions");
        Ok(resources)
    }

    /// Admin: move a resource to `status`.
    pub async fn update_resource_status(
        &self,
        slug: &str,
        status: ResourceStatus,
    ) -> Result<ActionOutcome> {
        let path = resource_path(slug)?;
        let request = self
            .http
            .request(Method::PATCH, &path)
            .json(&StatusUpdate { status });
        let request = self.auth.authorize(request)?;

        let envelope = self.admin_send::<serde_json::Value>(request, &path).await?;
        let outcome = ActionOutcome {
            success: envelope.success,
            message: envelope.message.unwrap_or_else(|| {
                if envelope.success {
                    format!("Status updated to {}", status)
                } else {
                    "Failed to update resource status".to_string()
                }
            }),
        };

        info!(slug, %status, success = outcome.success, "Updated resource status");
        Ok(outcome)
    }

    /// Admin: delete a resource.
    pub async fn delete_resource(&self, slug: &str) -> Result<ActionOutcome> {
        let path = resource_path(slug)?;
        let request = self.auth.authorize(self.http.request(Method::DELETE, &path))?;

        let envelope = self.admin_send::<serde_json::Value>(request, &path).await?;
        let outcome = ActionOutcome {
            success: envelope.success,
            message: envelope.message.unwrap_or_else(|| {
                if envelope.success {
                    "Resource deleted successfully".to_string()
                } else {
                    "Failed to delete resource".to_string()
                }
            }),
        };

        info!(slug, success = outcome.success, "Deleted resource");
        Ok(outcome)
    }

    /// Send an admin request. A 401 drops the stored session and reports
    /// [`ClientError::Unauthorized`].
    async fn admin_send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        endpoint: &str,
    ) -> Result<ApiEnvelope<T>> {
        match self.http.send::<T>(request, endpoint).await {
            Err(ClientError::Api { status, .. })
                if status == StatusCode::UNAUTHORIZED.as_u16() =>
            {
                if let Err(e) = self.auth.logout() {
                    error!(error = %e, "Failed to clear rejected admin session");
                }
                Err(ClientError::Unauthorized)
            }
            Err(e) => {
                error!(endpoint, error = %e, "Admin request failed");
                Err(e)
            }
            ok => ok,
        }
    }
}

/// `/resources/{slug}`. Anything that is not a slug could escape the path, so
/// it is rejected before a request is built.
fn resource_path(slug: &str) -> Result<String> {
    if !is_valid_slug(slug) {
        return Err(ClientError::NotFound {
            slug: slug.to_string(),
        });
    }
    Ok(format!("/resources/{}", slug))
}
