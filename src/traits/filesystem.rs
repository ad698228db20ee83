use anyhow::{Context, Result};
use std::io::Write;
use std::path::{Path, PathBuf};
#[cfg(test)]
use std::collections::{BTreeMap, BTreeSet};
#[cfg(test)]
use std::sync::RwLock;
#[cfg(test)]
use std::sync::atomic::{AtomicBool, Ordering};

/// Trait for filesystem operations to enable testing with mocks
pub trait FileSystem: Send + Sync {
    /// Read file contents as string
    fn read_to_string(&self, path: &Path) -> Result<String>;

    /// Replace the file contents in a single step (readers never observe a half-written file)
    fn write(&self, path: &Path, contents: &str) -> Result<()>;

    /// Append to a file, creating it when missing
    fn append(&self, path: &Path, contents: &str) -> Result<()>;

    /// Rename a file
    fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    /// Create directory and all parent directories
    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Check if path exists
    fn exists(&self, path: &Path) -> bool;

    /// Check if path is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Check if path is a file
    fn is_file(&self, path: &Path) -> bool;

    /// Read directory entries
    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>>;
}

/// Real filesystem implementation using std::fs
pub struct RealFileSystem;

impl FileSystem for RealFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {:?}", path))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };

        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create parent directory: {:?}", parent))?;

        // Stage next to the target so the final persist is a same-filesystem rename
        let mut staged = tempfile::NamedTempFile::new_in(parent)
            .with_context(|| format!("Failed to create temporary file in: {:?}", parent))?;
        staged
            .write_all(contents.as_bytes())
            .with_context(|| format!("Failed to write file: {:?}", path))?;
        staged
            .persist(path)
            .map_err(|e| e.error)
            .with_context(|| format!("Failed to write file: {:?}", path))?;

        tracing::debug!(path = %path.display(), bytes = contents.len(), "wrote file");
        Ok(())
    }

    fn append(&self, path: &Path, contents: &str) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create parent directory: {:?}", parent))?;
            }
        }

        let mut file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open file for append: {:?}", path))?;
        file.write_all(contents.as_bytes())
            .with_context(|| format!("Failed to append to file: {:?}", path))
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        std::fs::rename(from, to)
            .with_context(|| format!("Failed to rename {:?} to {:?}", from, to))?;
        tracing::debug!(from = %from.display(), to = %to.display(), "renamed file");
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create directory: {:?}", path))
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let entries = std::fs::read_dir(path)
            .with_context(|| format!("Failed to read directory: {:?}", path))?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry.context("Failed to read directory entry")?;
            paths.push(entry.path());
        }

        Ok(paths)
    }
}

/// Mock filesystem implementation for testing (in-memory)
#[cfg(test)]
pub struct MockFileSystem {
    files: RwLock<BTreeMap<PathBuf, String>>,
    directories: RwLock<BTreeSet<PathBuf>>,
    fail_renames: AtomicBool,
    fail_writes: AtomicBool,
}

#[cfg(test)]
impl MockFileSystem {
    /// Create new empty mock filesystem
    pub fn new() -> Self {
        Self {
            files: RwLock::new(BTreeMap::new()),
            directories: RwLock::new(BTreeSet::new()),
            fail_renames: AtomicBool::new(false),
            fail_writes: AtomicBool::new(false),
        }
    }

    /// Seed a file
    pub fn with_file(self, path: impl Into<PathBuf>, contents: &str) -> Self {
        self.files
            .write()
            .unwrap()
            .insert(path.into(), contents.to_string());
        self
    }

    /// Seed a directory
    pub fn with_dir(self, path: impl Into<PathBuf>) -> Self {
        self.directories.write().unwrap().insert(path.into());
        self
    }

    /// Make every subsequent rename fail
    pub fn fail_renames(&self) {
        self.fail_renames.store(true, Ordering::SeqCst);
    }

    /// Make every subsequent write fail
    pub fn fail_writes(&self) {
        self.fail_writes.store(true, Ordering::SeqCst);
    }

    /// Get captured file contents for testing assertions
    pub fn get_file_contents(&self, path: &Path) -> Option<String> {
        self.files.read().unwrap().get(path).cloned()
    }

    /// Check if file was written
    pub fn has_file(&self, path: &Path) -> bool {
        self.files.read().unwrap().contains_key(path)
    }

    /// List all files in mock filesystem
    pub fn list_files(&self) -> Vec<PathBuf> {
        self.files.read().unwrap().keys().cloned().collect()
    }
}

#[cfg(test)]
impl Default for MockFileSystem {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        self.files
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .with_context(|| format!("File not found in mock filesystem: {:?}", path))
    }

    fn write(&self, path: &Path, contents: &str) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            anyhow::bail!("Mock write failure: {:?}", path);
        }

        if let Some(parent) = path.parent() {
            self.create_dir_all(parent)?;
        }

        self.files
            .write()
            .unwrap()
            .insert(path.to_path_buf(), contents.to_string());
        Ok(())
    }

    fn append(&self, path: &Path, contents: &str) -> Result<()> {
        self.files
            .write()
            .unwrap()
            .entry(path.to_path_buf())
            .or_default()
            .push_str(contents);
        Ok(())
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        if self.fail_renames.load(Ordering::SeqCst) {
            anyhow::bail!("Mock rename failure: {:?} -> {:?}", from, to);
        }

        let mut files = self.files.write().unwrap();
        let contents = files
            .remove(from)
            .with_context(|| format!("File not found in mock filesystem: {:?}", from))?;
        files.insert(to.to_path_buf(), contents);
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        let mut directories = self.directories.write().unwrap();
        let mut current = Some(path);
        while let Some(dir) = current {
            directories.insert(dir.to_path_buf());
            current = dir.parent();
        }
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        self.files.read().unwrap().contains_key(path)
            || self.directories.read().unwrap().contains(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        self.directories.read().unwrap().contains(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.read().unwrap().contains_key(path)
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let files = self.files.read().unwrap();
        let directories = self.directories.read().unwrap();

        let mut entries: Vec<PathBuf> = files
            .keys()
            .filter(|file_path| file_path.parent() == Some(path))
            .cloned()
            .collect();

        entries.extend(
            directories
                .iter()
                .filter(|dir_path| dir_path.parent() == Some(path))
                .cloned(),
        );

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_real_write_replaces_contents() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("imports.tf");

        RealFileSystem.write(&path, "first").unwrap();
        RealFileSystem.write(&path, "second").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "second");
        // Only the target remains; the staging file was persisted over it
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_real_append_creates_and_extends() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("run.log");

        RealFileSystem.append(&path, "a\n").unwrap();
        RealFileSystem.append(&path, "b\n").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "a\nb\n");
    }

    #[test]
    fn test_mock_rename_moves_contents() {
        let fs = MockFileSystem::new().with_file("/out/a.tf", "x");
        fs.rename(Path::new("/out/a.tf"), Path::new("/out/b.tf"))
            .unwrap();

        assert!(!fs.has_file(Path::new("/out/a.tf")));
        assert_eq!(
            fs.get_file_contents(Path::new("/out/b.tf")).as_deref(),
            Some("x")
        );
    }

    #[test]
    fn test_mock_read_dir_lists_direct_children() {
        let fs = MockFileSystem::new()
            .with_file("/out/a.tf", "")
            .with_file("/out/nested/b.tf", "");

        let entries = fs.read_dir(Path::new("/out")).unwrap();
        assert!(entries.contains(&PathBuf::from("/out/a.tf")));
        assert!(!entries.contains(&PathBuf::from("/out/nested/b.tf")));
    }
}
