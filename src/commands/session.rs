use anyhow::Result;

use super::workflow::{self, EXIT_OPTION};
use super::{GcpCommand, OktaCommand, is_cancelled};
use crate::context::Context;
use crate::resource::Provider;

/// Top-level menu: pick providers until Exit, then optionally plan
pub struct SessionCommand;

impl SessionCommand {
    pub fn execute(ctx: &Context) -> Result<()> {
        ctx.output.section("Terraform resource importer");
        ctx.output
            .key_value("Output directory", &ctx.config.output_dir.display().to_string());
        ctx.output.blank();

        loop {
            let mut options: Vec<String> = Provider::ALL
                .iter()
                .map(|p| p.display_name().to_string())
                .collect();
            options.push(EXIT_OPTION.to_string());

            let choice = match ctx
                .input
                .select("Choose a service to import resources from:", options)
            {
                Ok(choice) => choice,
                Err(e) if is_cancelled(&e) => return Ok(()),
                Err(e) => return Err(e),
            };

            let Some(provider) = Provider::ALL
                .iter()
                .copied()
                .find(|p| p.display_name() == choice)
            else {
                break;
            };

            let result = match provider {
                Provider::Okta => OktaCommand::execute(ctx),
                Provider::Gcp => GcpCommand::execute(ctx),
            };

            match result {
                Ok(()) => {}
                Err(e) if is_cancelled(&e) => {
                    ctx.output.warning(&format!(
                        "{} import cancelled",
                        provider.display_name()
                    ));
                }
                Err(e) => {
                    ctx.output.error(&format!(
                        "{} import failed: {:#}",
                        provider.display_name(),
                        e
                    ));
                }
            }
            ctx.output.blank();
        }

        let plan = match ctx.input.confirm(
            "Create a Terraform plan file for all the resources found?",
            false,
        ) {
            Ok(plan) => plan,
            Err(e) if is_cancelled(&e) => false,
            Err(e) => return Err(e),
        };
        if plan {
            workflow::run_terraform_plan(ctx);
        }

        ctx.output.info("Goodbye!");
        Ok(())
    }
}
