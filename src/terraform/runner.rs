use std::path::{Path, PathBuf};

use crate::error::{ImportError, ImportResult};
use crate::traits::{CommandExecutor, FileSystem};

/// Which init variant was run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitMode {
    Init,
    Upgrade,
}

/// Captured output of a successful terraform invocation
#[derive(Debug, Clone)]
pub struct TerraformOutcome {
    pub stdout: String,
    pub stderr: String,
}

/// Drives the terraform binary in the output directory
pub struct TerraformRunner<'a> {
    command: &'a dyn CommandExecutor,
    fs: &'a dyn FileSystem,
    binary: &'a str,
    working_dir: &'a Path,
    log_path: PathBuf,
}

impl<'a> TerraformRunner<'a> {
    pub fn new(
        command: &'a dyn CommandExecutor,
        fs: &'a dyn FileSystem,
        binary: &'a str,
        working_dir: &'a Path,
        log_path: PathBuf,
    ) -> Self {
        Self {
            command,
            fs,
            binary,
            working_dir,
            log_path,
        }
    }

    /// `init`, or `init -upgrade` when the directory is already initialised
    pub fn init(&self) -> ImportResult<(InitMode, TerraformOutcome)> {
        if self.fs.is_dir(&self.working_dir.join(".terraform")) {
            let outcome = self.run(&["init", "-upgrade"])?;
            Ok((InitMode::Upgrade, outcome))
        } else {
            let outcome = self.run(&["init"])?;
            Ok((InitMode::Init, outcome))
        }
    }

    /// `plan -generate-config-out=<file>` for the import blocks in the directory
    pub fn plan_generate_config(&self, out_file: &str) -> ImportResult<TerraformOutcome> {
        let flag = format!("-generate-config-out={}", out_file);
        self.run(&["plan", flag.as_str()])
    }

    fn run(&self, args: &[&str]) -> ImportResult<TerraformOutcome> {
        let display = format!("{} {}", self.binary, args.join(" "));

        let output = match self.command.execute(self.binary, args, self.working_dir) {
            Ok(output) => output,
            Err(e) => {
                let not_found = e
                    .root_cause()
                    .downcast_ref::<std::io::Error>()
                    .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound);

                self.log(&display, None, "", &format!("{:#}", e));

                if not_found {
                    return Err(ImportError::TerraformNotFound(self.binary.to_string()));
                }

                return Err(ImportError::TerraformFailed {
                    command: display,
                    exit_code: None,
                    stderr: format!("{:#}", e),
                });
            }
        };

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
        self.log(&display, output.status.code(), &stdout, &stderr);

        if !output.status.success() {
            return Err(ImportError::TerraformFailed {
                command: display,
                exit_code: output.status.code(),
                stderr,
            });
        }

        Ok(TerraformOutcome { stdout, stderr })
    }

    /// Append an invocation record to the run log; failures only warn
    fn log(&self, command: &str, exit_code: Option<i32>, stdout: &str, stderr: &str) {
        let status = exit_code
            .map(|code| code.to_string())
            .unwrap_or_else(|| "none".to_string());

        let entry = format!(
            "=== {} | {} | exit {} ===\n--- stdout ---\n{}\n--- stderr ---\n{}\n\n",
            chrono::Local::now().to_rfc3339(),
            command,
            status,
            stdout.trim_end(),
            stderr.trim_end()
        );

        if let Err(e) = self.fs.append(&self.log_path, &entry) {
            tracing::warn!(error = %e, path = %self.log_path.display(), "could not write terraform log");
        }
    }
}
