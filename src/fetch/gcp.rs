use url::Url;

use crate::error::{ImportError, ImportResult};
use crate::resource::{Provider, ResourceType};
use crate::traits::HttpClient;

use super::pagination::fetch_token_paginated;
use super::{ResourceFetcher, ResourceRecord};

const COMPUTE_API: &str = "https://compute.googleapis.com/compute/v1/";
const STORAGE_API: &str = "https://storage.googleapis.com/storage/v1/b";

/// Google Cloud REST client for Compute Engine instances and Cloud Storage buckets
pub struct GcpFetcher<'a> {
    http: &'a dyn HttpClient,
    project_id: String,
    zone: String,
    access_token: String,
}

impl<'a> GcpFetcher<'a> {
    pub fn new(
        http: &'a dyn HttpClient,
        project_id: impl Into<String>,
        zone: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            project_id: project_id.into(),
            zone: zone.into(),
            access_token: access_token.into(),
        }
    }

    /// First-page URL for a resource type
    pub fn endpoint(&self, resource_type: ResourceType) -> ImportResult<Url> {
        let invalid = |e: url::ParseError| ImportError::InvalidInput(e.to_string());

        match resource_type {
            ResourceType::GcpInstances => {
                let mut url = Url::parse(COMPUTE_API).map_err(invalid)?;
                url.path_segments_mut()
                    .map_err(|_| ImportError::InvalidInput(COMPUTE_API.to_string()))?
                    .pop_if_empty()
                    .extend([
                        "projects",
                        self.project_id.as_str(),
                        "zones",
                        self.zone.as_str(),
                        "instances",
                    ]);
                Ok(url)
            }
            ResourceType::GcpBuckets => {
                let mut url = Url::parse(STORAGE_API).map_err(invalid)?;
                url.query_pairs_mut().append_pair("project", &self.project_id);
                Ok(url)
            }
            ResourceType::OktaUsers | ResourceType::OktaGroups => {
                Err(ImportError::UnsupportedResourceType {
                    provider: Provider::Gcp.name().to_string(),
                    resource_type: resource_type.tag().to_string(),
                })
            }
        }
    }
}

impl ResourceFetcher for GcpFetcher<'_> {
    fn fetch(&self, resource_type: ResourceType) -> ImportResult<Vec<ResourceRecord>> {
        let url = self.endpoint(resource_type)?;
        let authorization = format!("Bearer {}", self.access_token);
        let headers = [
            ("Accept", "application/json"),
            ("Authorization", authorization.as_str()),
        ];

        tracing::debug!(%url, "listing gcp {}", resource_type);
        fetch_token_paginated(self.http, &url, &headers)
    }
}
