mod commands;
mod config;
mod context;
mod error;
mod fetch;
mod import;
mod naming;
mod output;
mod resource;
mod terraform;
#[cfg(test)]
mod test_helpers;
mod traits;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use commands::SessionCommand;
use config::{DEFAULT_GENERATED_CONFIG, DEFAULT_REGISTRY_URL, DEFAULT_TERRAFORM_BIN, ImporterConfig};
use context::Context;

#[derive(Parser)]
#[command(name = "tf-importer")]
#[command(
    about = "Generate Terraform import blocks for existing Okta and GCP resources",
    long_about = None
)]
#[command(version)]
struct Cli {
    /// Directory for provider configs, import files, JSON dumps and the terraform log
    #[arg(short, long, env = "TF_IMPORTER_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Terraform executable to run
    #[arg(long, env = "TF_IMPORTER_TERRAFORM_BIN", default_value = DEFAULT_TERRAFORM_BIN)]
    terraform_bin: String,

    /// Terraform registry used for provider version lookups
    #[arg(long, env = "TF_IMPORTER_REGISTRY_URL", default_value = DEFAULT_REGISTRY_URL)]
    registry_url: String,

    /// File passed to `terraform plan -generate-config-out`
    #[arg(long, default_value = DEFAULT_GENERATED_CONFIG)]
    generated_config: String,

    /// Number import files sequentially from this value instead of randomly
    #[arg(long, value_parser = clap::value_parser!(u32).range(1000..=9999))]
    suffix_start: Option<u32>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = ImporterConfig {
        output_dir: cli.output_dir,
        terraform_bin: cli.terraform_bin,
        registry_url: cli.registry_url,
        generated_config_file: cli.generated_config,
        suffix_start: cli.suffix_start,
    };
    tracing::debug!(?config, "starting");

    let ctx = Context::new(config);
    ctx.fs.create_dir_all(&ctx.config.output_dir)?;

    SessionCommand::execute(&ctx)
}
