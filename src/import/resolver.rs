//! Duplicate import-target resolution
//!
//! Generated files can carry the same `to = <address>` more than once when
//! two resources sanitize to the same local name. Every repeat after the
//! first gets `_<n>` appended, counting per address.
//!
//! The pass is single and linear: a suffixed address is never checked
//! against originals that appear later in the file, so an original named
//! `foo_1` ahead of two `foo` targets still ends up duplicated.

use regex::Regex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::error::{ImportError, ImportResult};
use crate::traits::FileSystem;

use super::generator::GENERATED_FILE_PREFIX;

/// A single rewrite decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rename {
    pub original: String,
    pub renamed: String,
    /// 1-based line number in the file
    pub line: usize,
}

/// Every rename made during one pass, in file order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DuplicateRenameMap {
    renames: Vec<Rename>,
}

impl DuplicateRenameMap {
    pub fn is_empty(&self) -> bool {
        self.renames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.renames.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rename> {
        self.renames.iter()
    }

    /// Addresses an original was renamed to, in order
    pub fn history(&self, original: &str) -> Vec<&str> {
        self.renames
            .iter()
            .filter(|r| r.original == original)
            .map(|r| r.renamed.as_str())
            .collect()
    }
}

/// Rewrites duplicate import targets in generated files
pub struct DuplicateResolver<'a> {
    fs: &'a dyn FileSystem,
    target_pattern: Regex,
}

impl<'a> DuplicateResolver<'a> {
    pub fn new(fs: &'a dyn FileSystem) -> Self {
        Self {
            fs,
            // Matches `to = okta_user.jane_doe`
            target_pattern: Regex::new(r"\bto\s*=\s*(\w+\.\w+)")
                .expect("Invalid import target regex"),
        }
    }

    /// Transform file contents, returning the new text and the decisions taken
    pub fn resolve_text(&self, content: &str) -> (String, DuplicateRenameMap) {
        let mut seen: HashMap<String, usize> = HashMap::new();
        let mut renames = Vec::new();
        let mut rewritten = String::with_capacity(content.len() + 16);

        for (line_index, line) in content.split_inclusive('\n').enumerate() {
            let Some(address) = self
                .target_pattern
                .captures(line)
                .and_then(|captures| captures.get(1))
            else {
                rewritten.push_str(line);
                continue;
            };

            let original = address.as_str();
            let count = *seen
                .entry(original.to_string())
                .and_modify(|count| *count += 1)
                .or_insert(0);

            if count == 0 {
                rewritten.push_str(line);
                continue;
            }

            let renamed = format!("{}_{}", original, count);
            rewritten.push_str(&line[..address.start()]);
            rewritten.push_str(&renamed);
            rewritten.push_str(&line[address.end()..]);

            renames.push(Rename {
                original: original.to_string(),
                renamed,
                line: line_index + 1,
            });
        }

        (rewritten, DuplicateRenameMap { renames })
    }

    /// Rewrite one file in place. The whole file is read and transformed in
    /// memory, then replaced in a single write, only when something changed.
    pub fn resolve_file(&self, path: &Path) -> ImportResult<DuplicateRenameMap> {
        let content = self
            .fs
            .read_to_string(path)
            .map_err(|e| ImportError::FileSystem(format!("{:#}", e)))?;

        let (rewritten, renames) = self.resolve_text(&content);

        if !renames.is_empty() {
            self.fs
                .write(path, &rewritten)
                .map_err(|e| ImportError::FileSystem(format!("{:#}", e)))?;
        }

        tracing::debug!(path = %path.display(), renames = renames.len(), "resolved duplicates");
        Ok(renames)
    }

    /// Generated import files in a directory, sorted by name
    pub fn generated_files(&self, dir: &Path) -> ImportResult<Vec<PathBuf>> {
        let mut files: Vec<PathBuf> = self
            .fs
            .read_dir(dir)
            .map_err(|e| ImportError::FileSystem(format!("{:#}", e)))?
            .into_iter()
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| {
                        name.starts_with(GENERATED_FILE_PREFIX) && name.ends_with(".tf")
                    })
            })
            .filter(|path| self.fs.is_file(path))
            .collect();

        files.sort();
        Ok(files)
    }

    /// Resolve every generated file in a directory; one failing file does not stop the rest
    pub fn resolve_all(
        &self,
        dir: &Path,
    ) -> ImportResult<Vec<(PathBuf, ImportResult<DuplicateRenameMap>)>> {
        Ok(self
            .generated_files(dir)?
            .into_iter()
            .map(|path| {
                let result = self.resolve_file(&path);
                (path, result)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::{MockFileSystem, RealFileSystem};

    fn block(address: &str, id: &str) -> String {
        format!("import {{\n  to = {}\n  id = \"{}\"\n}}\n", address, id)
    }

    fn targets(content: &str) -> Vec<String> {
        content
            .lines()
            .filter_map(|l| l.trim().strip_prefix("to = "))
            .map(str::to_string)
            .collect()
    }

    #[test]
    fn test_three_duplicates_get_counted_suffixes() {
        let fs = MockFileSystem::new();
        let resolver = DuplicateResolver::new(&fs);
        let content = [
            block("okta_user.jane_doe", "1"),
            block("okta_user.jane_doe", "2"),
            block("okta_user.jane_doe", "3"),
        ]
        .join("\n");

        let (rewritten, renames) = resolver.resolve_text(&content);

        assert_eq!(
            targets(&rewritten),
            vec![
                "okta_user.jane_doe",
                "okta_user.jane_doe_1",
                "okta_user.jane_doe_2"
            ]
        );
        assert_eq!(renames.len(), 2);
        assert_eq!(
            renames.history("okta_user.jane_doe"),
            vec!["okta_user.jane_doe_1", "okta_user.jane_doe_2"]
        );
        // Ids and layout untouched
        assert_eq!(rewritten.len(), content.len() + 4);
        assert!(rewritten.contains("id = \"3\""));
    }

    #[test]
    fn test_rewrite_touches_only_matched_span() {
        let fs = MockFileSystem::new();
        let resolver = DuplicateResolver::new(&fs);
        let content = "  to   =   a.b   # first\n\tto=a.b # a.b again\r\n";

        let (rewritten, renames) = resolver.resolve_text(content);

        assert_eq!(rewritten, "  to   =   a.b   # first\n\tto=a.b_1 # a.b again\r\n");
        assert_eq!(renames.iter().next().unwrap().line, 2);
    }

    #[test]
    fn test_second_pass_is_a_no_op() {
        let fs = MockFileSystem::new().with_file(
            "/out/output_file_1000_users.tf",
            &[
                block("okta_user.jane_doe", "1"),
                block("okta_user.jane_doe", "2"),
                block("okta_user.jane_doe", "3"),
            ]
            .join("\n"),
        );
        let resolver = DuplicateResolver::new(&fs);
        let path = Path::new("/out/output_file_1000_users.tf");

        let first = resolver.resolve_file(path).unwrap();
        let after_first = fs.get_file_contents(path).unwrap();
        let second = resolver.resolve_file(path).unwrap();

        assert_eq!(first.len(), 2);
        assert!(second.is_empty());
        assert_eq!(fs.get_file_contents(path).unwrap(), after_first);
    }

    #[test]
    fn test_identifiers_ending_in_to_are_not_targets() {
        let fs = MockFileSystem::new();
        let resolver = DuplicateResolver::new(&fs);
        let content = block("a.b", "1") + "# auto = a.b\n" + &block("a.b", "2");

        let (rewritten, renames) = resolver.resolve_text(&content);

        assert_eq!(renames.len(), 1);
        assert!(rewritten.contains("# auto = a.b\n"));
        assert_eq!(targets(&rewritten), vec!["a.b", "a.b_1"]);
    }

    #[test]
    fn test_no_duplicates_reports_empty_map() {
        let fs = MockFileSystem::new();
        let resolver = DuplicateResolver::new(&fs);
        let content = block("okta_group.engineers", "1") + "\n" + &block("okta_group.sales_team", "2");

        let (rewritten, renames) = resolver.resolve_text(&content);
        assert!(renames.is_empty());
        assert_eq!(rewritten, content);
    }

    // Single-pass gap: a suffixed name can collide with an original that
    // already used that suffix. Pinned here so a behaviour change is deliberate.
    #[test]
    fn test_suffix_can_collide_with_existing_original() {
        let fs = MockFileSystem::new();
        let resolver = DuplicateResolver::new(&fs);
        let content = [
            block("okta_group.foo_1", "a"),
            block("okta_group.foo", "b"),
            block("okta_group.foo", "c"),
        ]
        .join("\n");

        let (rewritten, _) = resolver.resolve_text(&content);
        assert_eq!(
            targets(&rewritten),
            vec!["okta_group.foo_1", "okta_group.foo", "okta_group.foo_1"]
        );
    }

    #[test]
    fn test_missing_file_is_reported() {
        let fs = MockFileSystem::new();
        let resolver = DuplicateResolver::new(&fs);

        let err = resolver
            .resolve_file(Path::new("/out/missing.tf"))
            .unwrap_err();
        assert!(matches!(err, ImportError::FileSystem(_)));
    }

    #[test]
    fn test_failed_write_leaves_file_untouched() {
        let original = block("a.b", "1") + "\n" + &block("a.b", "2");
        let fs = MockFileSystem::new().with_file("/out/output_file_1_groups.tf", &original);
        fs.fail_writes();
        let resolver = DuplicateResolver::new(&fs);
        let path = Path::new("/out/output_file_1_groups.tf");

        assert!(resolver.resolve_file(path).is_err());
        assert_eq!(fs.get_file_contents(path).unwrap(), original);
    }

    #[test]
    fn test_generated_files_filters_and_sorts() {
        let fs = MockFileSystem::new()
            .with_file("/out/output_file_2000_users.tf", "")
            .with_file("/out/output_file_1000_groups.tf", "")
            .with_file("/out/okta_provider.tf", "")
            .with_file("/out/output_file_notes.txt", "");
        let resolver = DuplicateResolver::new(&fs);

        let files = resolver.generated_files(Path::new("/out")).unwrap();
        assert_eq!(
            files,
            vec![
                PathBuf::from("/out/output_file_1000_groups.tf"),
                PathBuf::from("/out/output_file_2000_users.tf"),
            ]
        );
    }

    #[test]
    fn test_resolve_file_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output_file_1234_users.tf");
        std::fs::write(
            &path,
            block("okta_user.jane_doe", "1") + "\n" + &block("okta_user.jane_doe", "2"),
        )
        .unwrap();

        let fs = RealFileSystem;
        let resolver = DuplicateResolver::new(&fs);
        let results = resolver.resolve_all(dir.path()).unwrap();

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].1.as_ref().unwrap().len(), 1);
        assert_eq!(
            targets(&std::fs::read_to_string(&path).unwrap()),
            vec!["okta_user.jane_doe", "okta_user.jane_doe_1"]
        );
    }
}
