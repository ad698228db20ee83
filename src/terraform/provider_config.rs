use handlebars::Handlebars;
use serde_json::json;
use std::path::{Path, PathBuf};

use crate::error::{ImportError, ImportResult};
use crate::naming::hcl_escape;
use crate::resource::Provider;
use crate::traits::FileSystem;

const OKTA_TEMPLATE: &str = r#"terraform {
  required_providers {
    okta = {
      source  = "okta/okta"
      version = "{{version}}"
    }
  }
}

provider "okta" {
  org_name  = "{{org_name}}"
  base_url  = "{{base_url}}"
  api_token = "{{api_token}}"
}
"#;

const GCP_TEMPLATE: &str = r#"terraform {
  required_providers {
    google = {
      source  = "hashicorp/google"
      version = "{{version}}"
    }
  }
}

provider "google" {
  project     = "{{project}}"
  zone        = "{{zone}}"
  credentials = "{{credentials}}"
}
"#;

/// Values interpolated into a provider config file
#[derive(Debug, Clone)]
pub enum ProviderSettings {
    Okta {
        org_name: String,
        base_url: String,
        api_token: String,
        version: String,
    },
    Gcp {
        project_id: String,
        zone: String,
        /// Path to the service account key file
        credentials_path: String,
        version: String,
    },
}

impl ProviderSettings {
    pub fn provider(&self) -> Provider {
        match self {
            ProviderSettings::Okta { .. } => Provider::Okta,
            ProviderSettings::Gcp { .. } => Provider::Gcp,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}_provider.tf", self.provider().name())
    }
}

/// Renders provider blocks from fixed Handlebars templates
pub struct ProviderConfigWriter<'a> {
    fs: &'a dyn FileSystem,
    output_dir: &'a Path,
    handlebars: Handlebars<'static>,
}

impl<'a> ProviderConfigWriter<'a> {
    pub fn new(fs: &'a dyn FileSystem, output_dir: &'a Path) -> Self {
        let mut handlebars = Handlebars::new();
        // Output is HCL, not HTML; values are HCL-escaped before rendering
        handlebars.register_escape_fn(handlebars::no_escape);

        Self {
            fs,
            output_dir,
            handlebars,
        }
    }

    pub fn render(&self, settings: &ProviderSettings) -> ImportResult<String> {
        let (template, values) = match settings {
            ProviderSettings::Okta {
                org_name,
                base_url,
                api_token,
                version,
            } => (
                OKTA_TEMPLATE,
                json!({
                    "org_name": hcl_escape(org_name),
                    "base_url": hcl_escape(base_url),
                    "api_token": hcl_escape(api_token),
                    "version": hcl_escape(version),
                }),
            ),
            ProviderSettings::Gcp {
                project_id,
                zone,
                credentials_path,
                version,
            } => (
                GCP_TEMPLATE,
                json!({
                    "project": hcl_escape(project_id),
                    "zone": hcl_escape(zone),
                    "credentials": hcl_escape(credentials_path),
                    "version": hcl_escape(version),
                }),
            ),
        };

        Ok(self.handlebars.render_template(template, &values)?)
    }

    /// Render and write the provider file into the output directory
    pub fn write(&self, settings: &ProviderSettings) -> ImportResult<PathBuf> {
        let rendered = self.render(settings)?;
        let path = self.output_dir.join(settings.file_name());

        self.fs
            .write(&path, &rendered)
            .map_err(|e| ImportError::FileSystem(format!("{:#}", e)))?;

        Ok(path)
    }
}
