use anyhow::Result;

use super::workflow;
use crate::context::Context;
use crate::fetch::OktaFetcher;
use crate::resource::Provider;
use crate::terraform::{ProviderConfigWriter, ProviderSettings};

pub const DEFAULT_BASE_URL: &str = "okta.com";

/// Interactive import of Okta users and groups
pub struct OktaCommand;

impl OktaCommand {
    pub fn execute(ctx: &Context) -> Result<()> {
        ctx.output.section("Okta");

        let latest = workflow::latest_version_or_fallback(ctx, Provider::Okta);
        ctx.output.key_value("Latest Okta provider version", &latest);

        let api_token = ctx.input.password("Okta API token:")?;
        let base_url = ctx
            .input
            .text("Okta base URL:", Some(DEFAULT_BASE_URL))?
            .trim()
            .to_string();
        let org_name = ctx.input.text("Okta organisation name:", None)?.trim().to_string();

        if org_name.is_empty() || api_token.trim().is_empty() {
            ctx.output
                .error("An Okta organisation name and API token are required");
            return Ok(());
        }

        let version = ctx
            .input
            .text("Okta provider version:", Some(latest.as_str()))?
            .trim()
            .to_string();
        workflow::warn_on_unavailable_version(ctx, Provider::Okta, &version, &latest);

        let settings = ProviderSettings::Okta {
            org_name: org_name.clone(),
            base_url: base_url.clone(),
            api_token: api_token.clone(),
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

        if !workflow::run_terraform_init(ctx) {
            ctx.output.error(
                "Terraform initialisation failed. Check your Terraform installation and configuration.",
            );
            return Ok(());
        }

        let fetcher = OktaFetcher::new(ctx.http.as_ref(), org_name, base_url, api_token);

        while let Some(resource_type) = workflow::choose_resource_type(ctx, Provider::Okta)? {
            if !ctx.input.confirm(
                &format!("Import all {} from Okta?", resource_type.tag()),
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
}
