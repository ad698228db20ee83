//! Steps shared by every provider flow: version lookup, terraform init,
//! resource menu, fetch, dump, generate and duplicate handling

use anyhow::{Context as _, Result};
use std::path::{Path, PathBuf};

use crate::context::Context;
use crate::fetch::{ResourceFetcher, ResourceRecord};
use crate::import::{DuplicateRenameMap, DuplicateResolver, GenerationReport, ImportScriptGenerator};
use crate::resource::{Provider, ResourceType};
use crate::terraform::{
    InitMode, RegistryClient, TerraformOutcome, TerraformRunner, VersionAvailability,
};

pub const EXIT_OPTION: &str = "Exit";

/// Latest provider version from the registry, or the provider's fallback constraint
pub fn latest_version_or_fallback(ctx: &Context, provider: Provider) -> String {
    let registry = RegistryClient::new(ctx.http.as_ref(), &ctx.config.registry_url);

    match registry.latest_version(provider) {
        Ok(version) => version,
        Err(e) => {
            ctx.output.warning(&format!(
                "Failed to fetch the latest {} provider version: {}",
                provider.display_name(),
                e
            ));
            provider.fallback_version().to_string()
        }
    }
}

/// Warn (never fail) when a requested provider version can't be confirmed
pub fn warn_on_unavailable_version(ctx: &Context, provider: Provider, version: &str, latest: &str) {
    let registry = RegistryClient::new(ctx.http.as_ref(), &ctx.config.registry_url);
    let (namespace, name) = provider.registry_source();

    match registry.check_version(provider, version) {
        VersionAvailability::Available => {}
        VersionAvailability::Missing => {
            ctx.output.warning(&format!(
                "The {} provider version '{}' is not available; terraform init may fail",
                provider.display_name(),
                version
            ));
            ctx.output.dimmed(&format!(
                "The latest version is {}. Other versions: {}/providers/{}/{}/versions",
                latest,
                ctx.config.registry_url.trim_end_matches('/'),
                namespace,
                name
            ));
        }
        VersionAvailability::Unknown(reason) => {
            ctx.output.warning(&format!(
                "Unable to verify {} provider version '{}': {}",
                provider.display_name(),
                version,
                reason
            ));
        }
    }
}

fn terraform_runner(ctx: &Context) -> TerraformRunner<'_> {
    TerraformRunner::new(
        ctx.command.as_ref(),
        ctx.fs.as_ref(),
        &ctx.config.terraform_bin,
        &ctx.config.output_dir,
        ctx.config.log_path(),
    )
}

/// Terraform prints deprecation and provider warnings on stderr even when it succeeds
fn print_outcome(ctx: &Context, outcome: &TerraformOutcome) {
    if !outcome.stdout.trim().is_empty() {
        ctx.output.dimmed(outcome.stdout.trim_end());
    }
    if !outcome.stderr.trim().is_empty() {
        ctx.output.warning(outcome.stderr.trim_end());
    }
}

/// Run `terraform init` (or `init -upgrade`); false when it failed
pub fn run_terraform_init(ctx: &Context) -> bool {
    let runner = terraform_runner(ctx);
    ctx.output.info("Initialising Terraform...");

    match runner.init() {
        Ok((mode, outcome)) => {
            print_outcome(ctx, &outcome);
            match mode {
                InitMode::Init => ctx.output.success("Terraform initialised successfully"),
                InitMode::Upgrade => ctx.output.success("Terraform upgraded successfully"),
            }
            true
        }
        Err(e) => {
            ctx.output
                .error(&format!("Error during Terraform initialisation/upgrade: {}", e));
            false
        }
    }
}

/// `terraform plan -generate-config-out=...`; failures are reported, not returned
pub fn run_terraform_plan(ctx: &Context) {
    let runner = terraform_runner(ctx);
    let out_file = &ctx.config.generated_config_file;

    match runner.plan_generate_config(out_file) {
        Ok(outcome) => {
            print_outcome(ctx, &outcome);
            ctx.output.success(&format!(
                "Terraform plan file created ({}). Review this file carefully before applying!",
                out_file
            ));
        }
        Err(e) => {
            ctx.output
                .error(&format!("Error during Terraform plan generation: {}", e));
        }
    }
}

/// Resource menu for a provider; None when the user picks Exit
pub fn choose_resource_type(ctx: &Context, provider: Provider) -> Result<Option<ResourceType>> {
    let types = provider.resource_types();
    let mut options: Vec<String> = types.iter().map(|rt| rt.label().to_string()).collect();
    options.push(EXIT_OPTION.to_string());

    let choice = ctx.input.select(
        &format!("Available {} resources to import:", provider.display_name()),
        options,
    )?;

    Ok(types.iter().copied().find(|rt| rt.label() == choice))
}

/// Fetch one resource type and walk the user through dump / generate / dedupe
pub fn import_resource_type(
    ctx: &Context,
    fetcher: &dyn ResourceFetcher,
    resource_type: ResourceType,
) -> Result<()> {
    let provider = resource_type.provider();
    ctx.output.info(&format!(
        "Fetching {} from {}...",
        resource_type.tag(),
        provider.display_name()
    ));

    let records = match fetcher.fetch(resource_type) {
        Ok(records) => records,
        Err(e) => {
            ctx.output
                .error(&format!("Failed to fetch {}: {}", resource_type.tag(), e));
            return Ok(());
        }
    };

    ctx.output.key_value(
        &format!("Total {} retrieved", resource_type.tag()),
        &records.len().to_string(),
    );

    if records.is_empty() {
        ctx.output.info(&format!(
            "No {} found in {}",
            resource_type.tag(),
            provider.display_name()
        ));
        return Ok(());
    }

    if ctx.input.confirm(
        &format!("Save the fetched {} to a JSON file?", resource_type.tag()),
        false,
    )? {
        match dump_records(ctx, resource_type, &records) {
            Ok(path) => ctx
                .output
                .success(&format!("Saved {}", path.display())),
            Err(e) => ctx.output.error(&format!("{:#}", e)),
        }
    }

    if !ctx.input.confirm(
        &format!("Create the import file for {}?", resource_type.tag()),
        true,
    )? {
        return Ok(());
    }

    let generator =
        ImportScriptGenerator::new(ctx.fs.as_ref(), ctx.suffix.as_ref(), &ctx.config.output_dir);

    let report = match generator.generate(resource_type, &records) {
        Ok(report) => report,
        Err(e) => {
            ctx.output
                .error(&format!("Error creating Terraform import script: {}", e));
            return Ok(());
        }
    };

    print_generation_report(ctx, &report);

    if ctx
        .input
        .confirm("Handle duplicate imports in this file?", true)?
    {
        resolve_file(ctx, &report.path);
    }

    Ok(())
}

/// Pretty-printed JSON array of the raw records, named `<provider>_<tag>.json`
pub fn dump_records(
    ctx: &Context,
    resource_type: ResourceType,
    records: &[ResourceRecord],
) -> Result<PathBuf> {
    let path = ctx.config.output_dir.join(format!(
        "{}_{}.json",
        resource_type.provider().name(),
        resource_type.tag()
    ));

    let json = serde_json::to_string_pretty(records).context("Failed to serialize records")?;
    ctx.fs
        .write(&path, &json)
        .with_context(|| format!("Failed to save {}", path.display()))?;

    Ok(path)
}

fn print_generation_report(ctx: &Context, report: &GenerationReport) {
    for block in &report.blocks {
        ctx.output.dimmed(&format!(
            "Added import block for {} (ID: {})",
            block.resource_address, block.resource_id
        ));
    }

    for skipped in &report.skipped {
        ctx.output.warning(&format!(
            "Skipping record #{}: {}",
            skipped.index + 1,
            skipped.reason
        ));
    }

    if let Some(error) = &report.rename_error {
        ctx.output.warning(&format!(
            "Could not rename import file ({}); keeping {}",
            error,
            report.path.display()
        ));
    }

    ctx.output.success(&format!(
        "Terraform import script created: {}",
        report.path.display()
    ));
    ctx.output
        .key_value("Import blocks written", &report.written().to_string());
    ctx.output
        .key_value("Records skipped", &report.skipped_count().to_string());
}

fn print_renames(ctx: &Context, path: &Path, renames: &DuplicateRenameMap) {
    if renames.is_empty() {
        ctx.output
            .info(&format!("No duplicates found in {}", path.display()));
        return;
    }

    ctx.output.warning(&format!(
        "Duplicate resources found and renamed in {}:",
        path.display()
    ));
    let mut reported: Vec<&str> = Vec::new();
    for rename in renames.iter() {
        if reported.contains(&rename.original.as_str()) {
            continue;
        }
        reported.push(&rename.original);
        ctx.output.dimmed(&format!(
            "  - {} -> {}",
            rename.original,
            renames.history(&rename.original).join(", ")
        ));
    }
}

/// Dedupe one generated file, reporting the outcome
pub fn resolve_file(ctx: &Context, path: &Path) {
    let resolver = DuplicateResolver::new(ctx.fs.as_ref());

    match resolver.resolve_file(path) {
        Ok(renames) => print_renames(ctx, path, &renames),
        Err(e) => ctx.output.error(&format!(
            "Error handling duplicate imports in {}: {}",
            path.display(),
            e
        )),
    }
}

/// Dedupe every generated file in the output directory
pub fn resolve_all_files(ctx: &Context) {
    let resolver = DuplicateResolver::new(ctx.fs.as_ref());

    let results = match resolver.resolve_all(&ctx.config.output_dir) {
        Ok(results) => results,
        Err(e) => {
            ctx.output.error(&format!("{}", e));
            return;
        }
    };

    if results.is_empty() {
        ctx.output.info(&format!(
            "No generated import files in {}",
            ctx.config.output_dir.display()
        ));
    }

    for (path, result) in results {
        match result {
            Ok(renames) => print_renames(ctx, &path, &renames),
            Err(e) => ctx.output.error(&format!(
                "Error handling duplicate imports in {}: {}",
                path.display(),
                e
            )),
        }
    }
}
