use std::path::PathBuf;

pub const DEFAULT_TERRAFORM_BIN: &str = "terraform";
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.terraform.io";
pub const DEFAULT_GENERATED_CONFIG: &str = "terraform-importer-created.tf";
pub const LOG_FILE_NAME: &str = "terraform-importer.log";

/// Run-wide settings, passed explicitly instead of relying on the working directory
#[derive(Debug, Clone)]
pub struct ImporterConfig {
    /// Where provider files, import files, dumps and the terraform log go
    pub output_dir: PathBuf,
    pub terraform_bin: String,
    pub registry_url: String,
    /// Target of `terraform plan -generate-config-out`
    pub generated_config_file: String,
    /// Deterministic file-name suffixes starting here instead of random ones
    pub suffix_start: Option<u32>,
}

impl ImporterConfig {
    pub fn log_path(&self) -> PathBuf {
        self.output_dir.join(LOG_FILE_NAME)
    }
}

impl Default for ImporterConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            terraform_bin: DEFAULT_TERRAFORM_BIN.to_string(),
            registry_url: DEFAULT_REGISTRY_URL.to_string(),
            generated_config_file: DEFAULT_GENERATED_CONFIG.to_string(),
            suffix_start: None,
        }
    }
}
