pub mod provider_config;
pub mod registry;
pub mod runner;

pub use provider_config::{ProviderConfigWriter, ProviderSettings};
pub use registry::{RegistryClient, VersionAvailability};
pub use runner::{InitMode, TerraformOutcome, TerraformRunner};
