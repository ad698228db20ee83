use std::path::{Path, PathBuf};

use crate::error::{ImportError, ImportResult};
use crate::fetch::ResourceRecord;
use crate::resource::{MissingField, ResourceType};
use crate::traits::FileSystem;

use super::block::{ImportBlock, render_blocks};
use super::suffix::SuffixSource;

/// Prefix shared by every disambiguated import file
pub const GENERATED_FILE_PREFIX: &str = "output_file_";

/// Size of the four-digit suffix space
const SUFFIX_ATTEMPTS: usize = 9000;

/// A record that could not become an import block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Position in the fetched sequence
    pub index: usize,
    pub reason: MissingField,
}

/// Outcome of one generation run
#[derive(Debug, Clone)]
pub struct GenerationReport {
    /// Where the file ended up
    pub path: PathBuf,
    pub blocks: Vec<ImportBlock>,
    pub skipped: Vec<SkippedRecord>,
    /// Set when the move to the disambiguated name failed and `path` is the staging name
    pub rename_error: Option<String>,
}

impl GenerationReport {
    pub fn written(&self) -> usize {
        self.blocks.len()
    }

    pub fn skipped_count(&self) -> usize {
        self.skipped.len()
    }
}

/// Writes Terraform import files for fetched records
pub struct ImportScriptGenerator<'a> {
    fs: &'a dyn FileSystem,
    suffix: &'a dyn SuffixSource,
    output_dir: &'a Path,
}

impl<'a> ImportScriptGenerator<'a> {
    pub fn new(fs: &'a dyn FileSystem, suffix: &'a dyn SuffixSource, output_dir: &'a Path) -> Self {
        Self {
            fs,
            suffix,
            output_dir,
        }
    }

    /// Staging file name, written before the rename
    pub fn staging_path(&self, resource_type: ResourceType) -> PathBuf {
        self.output_dir
            .join(format!("terraform_import_{}.tf", resource_type.tag()))
    }

    fn final_path(&self, resource_type: ResourceType, suffix: u32) -> PathBuf {
        self.output_dir.join(format!(
            "{}{}_{}.tf",
            GENERATED_FILE_PREFIX,
            suffix,
            resource_type.tag()
        ))
    }

    /// First suffixed name not already present, so earlier runs are never replaced
    fn free_target(&self, resource_type: ResourceType) -> ImportResult<PathBuf> {
        for _ in 0..SUFFIX_ATTEMPTS {
            let candidate = self.final_path(resource_type, self.suffix.next_suffix());
            if !self.fs.exists(&candidate) {
                return Ok(candidate);
            }
            tracing::debug!(path = %candidate.display(), "import file name taken");
        }

        Err(ImportError::FileSystem(format!(
            "no free {}*_{}.tf name left in {}",
            GENERATED_FILE_PREFIX,
            resource_type.tag(),
            self.output_dir.display()
        )))
    }

    /// Resolve a tag first; an unknown tag never touches the filesystem
    #[cfg(test)]
    pub fn generate_for_tag(
        &self,
        provider: crate::resource::Provider,
        tag: &str,
        records: &[ResourceRecord],
    ) -> ImportResult<GenerationReport> {
        let resource_type = ResourceType::from_tag(provider, tag)?;
        self.generate(resource_type, records)
    }

    pub fn generate(
        &self,
        resource_type: ResourceType,
        records: &[ResourceRecord],
    ) -> ImportResult<GenerationReport> {
        let (blocks, skipped) = build_blocks(resource_type, records);
        let target = self.free_target(resource_type)?;

        let staging = self.staging_path(resource_type);
        self.fs
            .write(&staging, &render_blocks(&blocks))
            .map_err(|e| ImportError::FileSystem(format!("{:#}", e)))?;

        let (path, rename_error) = match self.fs.rename(&staging, &target) {
            Ok(()) => (target, None),
            Err(e) => {
                tracing::warn!(error = %e, "keeping staging file name");
                (staging, Some(format!("{:#}", e)))
            }
        };

        tracing::debug!(
            path = %path.display(),
            written = blocks.len(),
            skipped = skipped.len(),
            "generated import file"
        );

        Ok(GenerationReport {
            path,
            blocks,
            skipped,
            rename_error,
        })
    }
}

/// Turn records into blocks, skipping (not failing on) records with missing fields
pub fn build_blocks(
    resource_type: ResourceType,
    records: &[ResourceRecord],
) -> (Vec<ImportBlock>, Vec<SkippedRecord>) {
    let terraform_type = resource_type.terraform_type();
    let mut blocks = Vec::with_capacity(records.len());
    let mut skipped = Vec::new();

    for (index, record) in records.iter().enumerate() {
        match resource_type.extract(record) {
            Ok(target) => blocks.push(ImportBlock::new(&terraform_type, &target.name, &target.id)),
            Err(reason) => skipped.push(SkippedRecord { index, reason }),
        }
    }

    (blocks, skipped)
}
