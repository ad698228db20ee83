use anyhow::{Context as _, Result, bail};
use std::path::{Path, PathBuf};

use super::workflow;
use crate::context::Context;
use crate::fetch::GcpFetcher;
use crate::resource::Provider;
use crate::terraform::{ProviderConfigWriter, ProviderSettings};

pub const DEFAULT_ZONE: &str = "europe-west2-a";

/// Interactive import of GCP compute instances and storage buckets
pub struct GcpCommand;

impl GcpCommand {
    pub fn execute(ctx: &Context) -> Result<()> {
        ctx.output.section("Google Cloud Platform");

        let latest = workflow::latest_version_or_fallback(ctx, Provider::Gcp);
        ctx.output.key_value("Latest Google provider version", &latest);

        let project_id = ctx.input.text("GCP project ID:", None)?.trim().to_string();
        if project_id.is_empty() {
            ctx.output.error("A GCP project ID is required");
            return Ok(());
        }

        let zone = ctx
            .input
            .text("GCP zone:", Some(DEFAULT_ZONE))?
            .trim()
            .to_string();

        let answer = ctx
            .input
            .text("Path to the service account key file:", None)?;
        let credentials_path = absolute_path(answer.trim())?;
        if !ctx.fs.is_file(&credentials_path) {
            ctx.output.error(&format!(
                "Credentials file not found: {}",
                credentials_path.display()
            ));
            return Ok(());
        }

        let token = ctx
            .input
            .password("GCP access token (leave empty to ask gcloud):")?;
        let access_token = if token.trim().is_empty() {
            match Self::gcloud_access_token(ctx) {
                Ok(token) => token,
                Err(e) => {
                    ctx.output
                        .error(&format!("Could not obtain a GCP access token: {:#}", e));
                    return Ok(());
                }
            }
        } else {
            token.trim().to_string()
        };

        let version = ctx
            .input
            .text("Google provider version:", Some(latest.as_str()))?
            .trim()
            .to_string();
        workflow::warn_on_unavailable_version(ctx, Provider::Gcp, &version, &latest);

        let settings = ProviderSettings::Gcp {
            project_id: project_id.clone(),
            zone: zone.clone(),
            credentials_path: credentials_path.display().to_string(),
            version,
        };
        let writer = ProviderConfigWriter::new(ctx.fs.as_ref(), &ctx.config.output_dir);
        match writer.write(&settings) {
            Ok(path) => ctx.output.success(&format!(
                "Terraform configuration created: {}",
                path.display()
            )),
            Err(e) => {
                ctx.output.error(&format!("{}", e));
                return Ok(());
            }
        }

        let fetcher = GcpFetcher::new(ctx.http.as_ref(), project_id, zone, access_token);

        while let Some(resource_type) = workflow::choose_resource_type(ctx, Provider::Gcp)? {
            if !ctx.input.confirm(
                &format!("Import all {} from GCP?", resource_type.tag()),
                true,
            )? {
                continue;
            }
            workflow::import_resource_type(ctx, &fetcher, resource_type)?;
        }

        if ctx
            .input
            .confirm("Handle duplicate imports in all generated files?", false)?
        {
            workflow::resolve_all_files(ctx);
        }

        Ok(())
    }

    /// `gcloud auth print-access-token` for the active gcloud account
    fn gcloud_access_token(ctx: &Context) -> Result<String> {
        let output = ctx
            .command
            .execute(
                "gcloud",
                &["auth", "print-access-token"],
                &ctx.config.output_dir,
            )
            .context("Is the gcloud CLI installed?")?;

        if !output.status.success() {
            bail!(
                "gcloud exited with {}: {}",
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if token.is_empty() {
            bail!("gcloud printed an empty token");
        }

        Ok(token)
    }
}

/// Relative paths are taken from the directory the tool was started in,
/// since terraform itself runs inside the output directory
fn absolute_path(raw: &str) -> Result<PathBuf> {
    let path = Path::new(raw);
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }

    let cwd = std::env::current_dir().context("Failed to read the current directory")?;
    Ok(cwd.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{
        HttpResponse, MockCommandExecutor, MockCommandResult, MockFileSystem, MockHttpClient,
        MockResponse,
    };
    use crate::test_helpers::TestHarness;
    use serde_json::json;

    fn key_file_fs() -> MockFileSystem {
        MockFileSystem::new().with_file("/keys/sa.json", r#"{"type":"service_account"}"#)
    }

    #[test]
    fn test_buckets_with_gcloud_token() {
        let http = MockHttpClient::with_responses(vec![
            HttpResponse::new(200, r#"{"version":"6.8.0"}"#),
            HttpResponse::new(200, r#"{"version":"6.8.0"}"#),
            HttpResponse::new(
                200,
                json!({"items": [{"name": "acme-logs"}], "nextPageToken": "p2"}).to_string(),
            ),
            HttpResponse::new(200, json!({"items": [{"name": "acme.assets"}]}).to_string()),
        ]);

        let harness = TestHarness::new(vec![
            MockResponse::Text("acme-prod".to_string()),
            MockResponse::Text(String::new()),
            MockResponse::Text("/keys/sa.json".to_string()),
            MockResponse::Password(String::new()),
            MockResponse::Text(String::new()),
            MockResponse::Select("Storage Buckets".to_string()),
            MockResponse::Confirm(true),
            MockResponse::Confirm(true),
            MockResponse::Confirm(true),
            MockResponse::Confirm(false),
            MockResponse::Select("Exit".to_string()),
            MockResponse::Confirm(false),
        ])
        .with_fs(key_file_fs())
        .with_http(http)
        .with_command(MockCommandExecutor::with_outputs(vec![MockCommandResult::ok(
            "gcloud",
            "ya29.token\n",
        )]));

        GcpCommand::execute(&harness.context()).unwrap();

        let requests = harness.http.requests();
        assert_eq!(
            requests[2].url,
            "https://storage.googleapis.com/storage/v1/b?project=acme-prod"
        );
        assert_eq!(requests[2].header("Authorization"), Some("Bearer ya29.token"));
        assert!(requests[3].url.ends_with("pageToken=p2"));

        let provider = harness
            .fs
            .get_file_contents(Path::new("/out/gcp_provider.tf"))
            .unwrap();
        assert!(provider.contains("europe-west2-a"));
        assert!(provider.contains("/keys/sa.json"));

        let dump = harness
            .fs
            .get_file_contents(Path::new("/out/gcp_buckets.json"))
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&dump).unwrap();
        assert_eq!(parsed.as_array().unwrap().len(), 2);

        let import = harness
            .fs
            .get_file_contents(Path::new("/out/output_file_1000_buckets.tf"))
            .unwrap();
        assert!(import.contains("to = google_storage_bucket.acmelogs\n  id = \"acme-logs\""));
        assert!(import.contains("to = google_storage_bucket.acmeassets\n  id = \"acme.assets\""));

        // No terraform runs for GCP until the final plan
        let calls = harness.command.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "gcloud");
        assert_eq!(harness.input.remaining(), 0);
    }

    #[test]
    fn test_relative_credentials_path_is_made_absolute() {
        let key_path = std::env::current_dir().unwrap().join("keys/sa.json");
        let harness = TestHarness::new(vec![
            MockResponse::Text("acme-prod".to_string()),
            MockResponse::Text(String::new()),
            MockResponse::Text("keys/sa.json".to_string()),
            MockResponse::Password("explicit".to_string()),
            MockResponse::Text(String::new()),
            MockResponse::Select("Exit".to_string()),
            MockResponse::Confirm(false),
        ])
        .with_fs(MockFileSystem::new().with_file(key_path.clone(), "{}"))
        .with_http(MockHttpClient::with_responses(vec![
            HttpResponse::new(200, r#"{"version":"6.8.0"}"#),
            HttpResponse::new(200, r#"{"version":"6.8.0"}"#),
        ]));

        GcpCommand::execute(&harness.context()).unwrap();

        let provider = harness
            .fs
            .get_file_contents(Path::new("/out/gcp_provider.tf"))
            .unwrap();
        assert!(provider.contains(&format!("credentials = \"{}\"", key_path.display())));
        assert!(!provider.contains("credentials = \"keys/sa.json\""));
        assert!(!harness.output.has_error());
    }

    #[test]
    fn test_missing_credentials_file() {
        let harness = TestHarness::new(vec![
            MockResponse::Text("acme-prod".to_string()),
            MockResponse::Text(String::new()),
            MockResponse::Text("/keys/missing.json".to_string()),
        ])
        .with_http(MockHttpClient::with_responses(vec![HttpResponse::new(
            200,
            r#"{"version":"6.8.0"}"#,
        )]));

        GcpCommand::execute(&harness.context()).unwrap();

        assert!(
            harness
                .output
                .get_errors()
                .iter()
                .any(|e| e.contains("Credentials file not found"))
        );
        assert!(!harness.fs.has_file(Path::new("/out/gcp_provider.tf")));
    }

    #[test]
    fn test_gcloud_failure_is_reported() {
        let harness = TestHarness::new(vec![
            MockResponse::Text("acme-prod".to_string()),
            MockResponse::Text(String::new()),
            MockResponse::Text("/keys/sa.json".to_string()),
            MockResponse::Password(String::new()),
        ])
        .with_fs(key_file_fs())
        .with_http(MockHttpClient::with_responses(vec![HttpResponse::new(
            200,
            r#"{"version":"6.8.0"}"#,
        )]))
        .with_command(MockCommandExecutor::with_outputs(vec![MockCommandResult::failed(
            "gcloud",
            1,
            "You do not currently have an active account selected.",
        )]));

        GcpCommand::execute(&harness.context()).unwrap();

        let errors = harness.output.get_errors();
        assert!(errors.iter().any(|e| e.contains("active account")));
        assert_eq!(harness.input.remaining(), 0);
    }

    #[test]
    fn test_instances_with_explicit_token() {
        let instance = json!({
            "name": "web-1",
            "selfLink": "https://www.googleapis.com/compute/v1/projects/acme-prod/zones/europe-west2-a/instances/web-1"
        });
        let http = MockHttpClient::with_responses(vec![
            HttpResponse::new(200, r#"{"version":"6.8.0"}"#),
            HttpResponse::new(200, r#"{"version":"6.8.0"}"#),
            HttpResponse::new(200, json!({"items": [instance]}).to_string()),
        ]);

        let harness = TestHarness::new(vec![
            MockResponse::Text("acme-prod".to_string()),
            MockResponse::Text(String::new()),
            MockResponse::Text("/keys/sa.json".to_string()),
            MockResponse::Password("explicit".to_string()),
            MockResponse::Text(String::new()),
            MockResponse::Select("Compute Instances".to_string()),
            MockResponse::Confirm(true),
            MockResponse::Confirm(false),
            MockResponse::Confirm(true),
            MockResponse::Confirm(false),
            MockResponse::Select("Exit".to_string()),
            MockResponse::Confirm(false),
        ])
        .with_fs(key_file_fs())
        .with_http(http);

        GcpCommand::execute(&harness.context()).unwrap();

        let import = harness
            .fs
            .get_file_contents(Path::new("/out/output_file_1000_instances.tf"))
            .unwrap();
        assert_eq!(
            import,
            "import {\n  to = google_compute_instance.web1\n  id = \"projects/acme-prod/zones/europe-west2-a/instances/web-1\"\n}\n"
        );
        assert!(harness.command.calls().is_empty());
    }
}
