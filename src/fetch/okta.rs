use crate::error::{ImportError, ImportResult};
use crate::resource::{Provider, ResourceType};
use crate::traits::HttpClient;

use super::pagination::fetch_link_paginated;
use super::{ResourceFetcher, ResourceRecord};

/// Okta management API client (`/api/v1/<type>`, `SSWS` token auth)
pub struct OktaFetcher<'a> {
    http: &'a dyn HttpClient,
    org_name: String,
    base_url: String,
    api_token: String,
}

impl<'a> OktaFetcher<'a> {
    pub fn new(
        http: &'a dyn HttpClient,
        org_name: impl Into<String>,
        base_url: impl Into<String>,
        api_token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            org_name: org_name.into(),
            base_url: base_url.into(),
            api_token: api_token.into(),
        }
    }

    /// First-page URL for a resource type
    pub fn endpoint(&self, resource_type: ResourceType) -> ImportResult<String> {
        if resource_type.provider() != Provider::Okta {
            return Err(ImportError::UnsupportedResourceType {
                provider: Provider::Okta.name().to_string(),
                resource_type: resource_type.tag().to_string(),
            });
        }

        Ok(format!(
            "https://{}.{}/api/v1/{}",
            self.org_name,
            self.base_url.trim_end_matches('/'),
            resource_type.tag()
        ))
    }
}

impl ResourceFetcher for OktaFetcher<'_> {
    fn fetch(&self, resource_type: ResourceType) -> ImportResult<Vec<ResourceRecord>> {
        let url = self.endpoint(resource_type)?;
        let authorization = format!("SSWS {}", self.api_token);
        let headers = [
            ("Accept", "application/json"),
            ("Content-Type", "application/json"),
            ("Authorization", authorization.as_str()),
        ];

        tracing::debug!(%url, "listing okta {}", resource_type);
        fetch_link_paginated(self.http, &url, &headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{HttpResponse, MockHttpClient};

    #[test]
    fn test_endpoint() {
        let http = MockHttpClient::new();
        let fetcher = OktaFetcher::new(&http, "acme", "okta.com", "t");

        assert_eq!(
            fetcher.endpoint(ResourceType::OktaGroups).unwrap(),
            "https://acme.okta.com/api/v1/groups"
        );
        assert!(fetcher.endpoint(ResourceType::GcpBuckets).is_err());
    }

    #[test]
    fn test_fetch_follows_link_header_and_sends_token() {
        let http = MockHttpClient::with_responses(vec![
            HttpResponse::new(
                200,
                r#"[{"id":"00u1","profile":{"firstName":"Jane","lastName":"Doe"}}]"#,
            )
            .with_header(
                "link",
                "<https://acme.okta.com/api/v1/users?limit=200>; rel=\"self\", \
                 <https://acme.okta.com/api/v1/users?after=00u1&limit=200>; rel=\"next\"",
            ),
            HttpResponse::new(
                200,
                r#"[{"id":"00u2","profile":{"firstName":"John","lastName":"Roe"}}]"#,
            )
            .with_header(
                "link",
                "<https://acme.okta.com/api/v1/users?after=00u1&limit=200>; rel=\"self\"",
            ),
        ]);

        let fetcher = OktaFetcher::new(&http, "acme", "okta.com", "secret");
        let records = fetcher.fetch(ResourceType::OktaUsers).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0]["id"], "00u1");
        assert_eq!(records[1]["id"], "00u2");

        let requests = http.requests();
        assert_eq!(requests.len(), 2);
        assert_eq!(requests[0].url, "https://acme.okta.com/api/v1/users");
        assert_eq!(
            requests[1].url,
            "https://acme.okta.com/api/v1/users?after=00u1&limit=200"
        );
        assert_eq!(requests[0].header("Authorization"), Some("SSWS secret"));
        assert_eq!(requests[0].header("Accept"), Some("application/json"));
    }

    #[test]
    fn test_fetch_surfaces_auth_failure() {
        let http = MockHttpClient::with_responses(vec![HttpResponse::new(
            401,
            r#"{"errorCode":"E0000011","errorSummary":"Invalid token provided"}"#,
        )]);

        let fetcher = OktaFetcher::new(&http, "acme", "okta.com", "bad");
        let err = fetcher.fetch(ResourceType::OktaGroups).unwrap_err();

        let text = err.to_string();
        assert!(text.contains("401"));
        assert!(text.contains("Invalid token provided"));
    }
}
