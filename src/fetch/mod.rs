//! Listing-endpoint clients that turn paginated provider APIs into one flat
//! record sequence per resource type

pub mod gcp;
pub mod okta;
pub mod pagination;

pub use gcp::GcpFetcher;
pub use okta::OktaFetcher;

use crate::error::ImportResult;
use crate::resource::ResourceType;

/// One raw record as returned by a provider listing call
pub type ResourceRecord = serde_json::Value;

/// Fetches every record of a resource type, in provider order
pub trait ResourceFetcher {
    fn fetch(&self, resource_type: ResourceType) -> ImportResult<Vec<ResourceRecord>>;
}
