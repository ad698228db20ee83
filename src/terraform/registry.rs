use serde::Deserialize;

use crate::error::{ImportError, ImportResult};
use crate::resource::Provider;
use crate::traits::HttpClient;

#[derive(Debug, Deserialize)]
struct ProviderVersionResponse {
    version: String,
}

/// Result of asking the registry whether a provider version exists
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionAvailability {
    Available,
    Missing,
    /// Could not tell (offline, unexpected status, constraint instead of a version)
    Unknown(String),
}

/// Terraform registry lookups for provider versions
pub struct RegistryClient<'a> {
    http: &'a dyn HttpClient,
    base_url: &'a str,
}

impl<'a> RegistryClient<'a> {
    pub fn new(http: &'a dyn HttpClient, base_url: &'a str) -> Self {
        Self { http, base_url }
    }

    fn provider_url(&self, provider: Provider) -> String {
        let (namespace, name) = provider.registry_source();
        format!(
            "{}/v1/providers/{}/{}",
            self.base_url.trim_end_matches('/'),
            namespace,
            name
        )
    }

    /// Latest published version of the provider
    pub fn latest_version(&self, provider: Provider) -> ImportResult<String> {
        let url = self.provider_url(provider);
        let response = self
            .http
            .get(&url, &[("Accept", "application/json")])
            .map_err(|e| ImportError::Transport(format!("{:#}", e)))?;

        if !response.is_success() {
            return Err(ImportError::Http {
                status: response.status,
                url,
                body: response.body,
            });
        }

        let parsed: ProviderVersionResponse =
            serde_json::from_str(&response.body).map_err(|e| ImportError::InvalidResponse {
                url,
                message: e.to_string(),
            })?;

        Ok(parsed.version)
    }

    /// Check that an exact version is published
    pub fn check_version(&self, provider: Provider, version: &str) -> VersionAvailability {
        let version = version.trim();
        if !version.starts_with(|c: char| c.is_ascii_digit()) {
            return VersionAvailability::Unknown(format!(
                "'{}' is a constraint, not an exact version",
                version
            ));
        }

        let url = format!("{}/{}", self.provider_url(provider), version);
        match self.http.get(&url, &[("Accept", "application/json")]) {
            Ok(response) if response.status == 404 => VersionAvailability::Missing,
            Ok(response) if response.is_success() => VersionAvailability::Available,
            Ok(response) => {
                VersionAvailability::Unknown(format!("registry answered {}", response.status))
            }
            Err(e) => VersionAvailability::Unknown(format!("{:#}", e)),
        }
    }
}
