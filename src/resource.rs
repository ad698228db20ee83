//! Provider and resource-type catalogue plus per-type field extraction

use serde_json::Value;
use std::fmt;


/// Providers resources can be pulled from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    Okta,
    Gcp,
}

impl Provider {
    pub const ALL: [Provider; 2] = [Provider::Okta, Provider::Gcp];

    /// Short name used in file names and error messages
    pub fn name(self) -> &'static str {
        match self {
            Provider::Okta => "okta",
            Provider::Gcp => "gcp",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Provider::Okta => "Okta",
            Provider::Gcp => "GCP",
        }
    }

    /// Registry coordinates as (namespace, type)
    pub fn registry_source(self) -> (&'static str, &'static str) {
        match self {
            Provider::Okta => ("okta", "okta"),
            Provider::Gcp => ("hashicorp", "google"),
        }
    }

    /// Version constraint used when the registry can't be reached
    pub fn fallback_version(self) -> &'static str {
        match self {
            Provider::Okta => "~> 4.0",
            Provider::Gcp => "~> 6.0",
        }
    }

    pub fn resource_types(self) -> &'static [ResourceType] {
        match self {
            Provider::Okta => &[ResourceType::OktaUsers, ResourceType::OktaGroups],
            Provider::Gcp => &[ResourceType::GcpInstances, ResourceType::GcpBuckets],
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every resource type an import file can be generated for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    OktaUsers,
    OktaGroups,
    GcpInstances,
    GcpBuckets,
}

impl ResourceType {
    pub fn provider(self) -> Provider {
        match self {
            ResourceType::OktaUsers | ResourceType::OktaGroups => Provider::Okta,
            ResourceType::GcpInstances | ResourceType::GcpBuckets => Provider::Gcp,
        }
    }

    /// Tag used in listing URLs and generated file names
    pub fn tag(self) -> &'static str {
        match self {
            ResourceType::OktaUsers => "users",
            ResourceType::OktaGroups => "groups",
            ResourceType::GcpInstances => "instances",
            ResourceType::GcpBuckets => "buckets",
        }
    }

    /// Menu label
    pub fn label(self) -> &'static str {
        match self {
            ResourceType::OktaUsers => "Users",
            ResourceType::OktaGroups => "Groups",
            ResourceType::GcpInstances => "Compute Instances",
            ResourceType::GcpBuckets => "Storage Buckets",
        }
    }

    /// Parse a tag for the given provider
    #[cfg(test)]
    pub fn from_tag(provider: Provider, tag: &str) -> crate::error::ImportResult<Self> {
        provider
            .resource_types()
            .iter()
            .copied()
            .find(|rt| rt.tag() == tag)
            .ok_or_else(|| crate::error::ImportError::UnsupportedResourceType {
                provider: provider.name().to_string(),
                resource_type: tag.to_string(),
            })
    }

    /// Terraform resource type the import blocks target
    pub fn terraform_type(self) -> String {
        match self {
            // okta_<tag without the plural s>
            ResourceType::OktaUsers | ResourceType::OktaGroups => {
                let tag = self.tag();
                format!("okta_{}", tag.strip_suffix('s').unwrap_or(tag))
            }
            ResourceType::GcpInstances => "google_compute_instance".to_string(),
            ResourceType::GcpBuckets => "google_storage_bucket".to_string(),
        }
    }

    /// Pull the name and import id out of a raw provider record
    pub fn extract(self, record: &Value) -> Result<ImportTarget, MissingField> {
        match self {
            ResourceType::OktaUsers => okta_user(record),
            ResourceType::OktaGroups => okta_group(record),
            ResourceType::GcpInstances => compute_instance(record),
            ResourceType::GcpBuckets => storage_bucket(record),
        }
    }
}

impl fmt::Display for ResourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Name and id of one importable resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportTarget {
    pub name: String,
    pub id: String,
}

/// A required field was absent or not a string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingField {
    pub path: String,
}

impl fmt::Display for MissingField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "missing '{}'", self.path)
    }
}

fn str_at<'a>(record: &'a Value, path: &[&str]) -> Result<&'a str, MissingField> {
    path.iter()
        .try_fold(record, |value, key| value.get(*key))
        .and_then(Value::as_str)
        .ok_or_else(|| MissingField {
            path: path.join("."),
        })
}

fn okta_group(record: &Value) -> Result<ImportTarget, MissingField> {
    let name = str_at(record, &["profile", "name"])?;
    let id = str_at(record, &["id"])?;

    Ok(ImportTarget {
        name: name.to_string(),
        id: id.to_string(),
    })
}

fn okta_user(record: &Value) -> Result<ImportTarget, MissingField> {
    let first = str_at(record, &["profile", "firstName"])?;
    let last = str_at(record, &["profile", "lastName"])?;
    let id = str_at(record, &["id"])?;

    Ok(ImportTarget {
        name: format!("{}_{}", first, last),
        id: id.to_string(),
    })
}

/// Compute API URLs look like `https://www.googleapis.com/compute/v1/projects/p/zones/z/...`
fn compute_path(url: &str) -> &str {
    url.split_once("/compute/v1/")
        .map(|(_, path)| path)
        .unwrap_or(url)
}

fn compute_instance(record: &Value) -> Result<ImportTarget, MissingField> {
    let name = str_at(record, &["name"])?;

    let id = match str_at(record, &["selfLink"]) {
        Ok(self_link) => compute_path(self_link).to_string(),
        Err(_) => {
            let zone = str_at(record, &["zone"])?;
            format!("{}/instances/{}", compute_path(zone), name)
        }
    };

    Ok(ImportTarget {
        name: name.to_string(),
        id,
    })
}

fn storage_bucket(record: &Value) -> Result<ImportTarget, MissingField> {
    let name = str_at(record, &["name"])?;

    Ok(ImportTarget {
        name: name.to_string(),
        id: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImportError;
    use serde_json::json;

    #[test]
    fn test_terraform_types() {
        assert_eq!(ResourceType::OktaUsers.terraform_type(), "okta_user");
        assert_eq!(ResourceType::OktaGroups.terraform_type(), "okta_group");
        assert_eq!(
            ResourceType::GcpInstances.terraform_type(),
            "google_compute_instance"
        );
        assert_eq!(
            ResourceType::GcpBuckets.terraform_type(),
            "google_storage_bucket"
        );
    }

    #[test]
    fn test_from_tag_is_scoped_to_provider() {
        assert_eq!(
            ResourceType::from_tag(Provider::Okta, "groups").unwrap(),
            ResourceType::OktaGroups
        );

        let err = ResourceType::from_tag(Provider::Okta, "applications").unwrap_err();
        assert!(matches!(
            err,
            ImportError::UnsupportedResourceType { ref resource_type, .. } if resource_type == "applications"
        ));

        assert!(ResourceType::from_tag(Provider::Gcp, "users").is_err());
    }

    #[test]
    fn test_extract_okta_group() {
        let record = json!({"id": "00g1", "profile": {"name": "Engineers"}});
        let target = ResourceType::OktaGroups.extract(&record).unwrap();
        assert_eq!(target.name, "Engineers");
        assert_eq!(target.id, "00g1");
    }

    #[test]
    fn test_extract_okta_user_joins_names() {
        let record = json!({
            "id": "00u1",
            "profile": {"firstName": "Jane", "lastName": "Doe", "login": "jane@example.com"}
        });
        let target = ResourceType::OktaUsers.extract(&record).unwrap();
        assert_eq!(target.name, "Jane_Doe");
    }

    #[test]
    fn test_extract_reports_missing_path() {
        let record = json!({"id": "00u1", "profile": {"firstName": "Jane"}});
        let err = ResourceType::OktaUsers.extract(&record).unwrap_err();
        assert_eq!(err.path, "profile.lastName");

        let record = json!({"profile": {"name": "Engineers"}});
        let err = ResourceType::OktaGroups.extract(&record).unwrap_err();
        assert_eq!(err.to_string(), "missing 'id'");
    }

    #[test]
    fn test_extract_rejects_non_string_id() {
        let record = json!({"id": 42, "profile": {"name": "Engineers"}});
        assert!(ResourceType::OktaGroups.extract(&record).is_err());
    }

    #[test]
    fn test_extract_compute_instance_from_self_link() {
        let record = json!({
            "name": "web-1",
            "selfLink": "https://www.googleapis.com/compute/v1/projects/acme/zones/europe-west2-a/instances/web-1"
        });
        let target = ResourceType::GcpInstances.extract(&record).unwrap();
        assert_eq!(target.id, "projects/acme/zones/europe-west2-a/instances/web-1");
    }

    #[test]
    fn test_extract_compute_instance_from_zone() {
        let record = json!({
            "name": "web-1",
            "zone": "https://www.googleapis.com/compute/v1/projects/acme/zones/europe-west2-a"
        });
        let target = ResourceType::GcpInstances.extract(&record).unwrap();
        assert_eq!(target.id, "projects/acme/zones/europe-west2-a/instances/web-1");
    }

    #[test]
    fn test_extract_bucket_uses_name_as_id() {
        let record = json!({"name": "acme-logs", "id": "acme-logs"});
        let target = ResourceType::GcpBuckets.extract(&record).unwrap();
        assert_eq!(target.name, "acme-logs");
        assert_eq!(target.id, "acme-logs");
    }
}
