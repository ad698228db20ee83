use anyhow::{Context, Result};
use std::path::Path;
use std::process::{Command, Output};
#[cfg(test)]
use std::path::PathBuf;
#[cfg(test)]
use std::sync::Mutex;

/// Trait for executing system commands, allowing for mocking in tests
pub trait CommandExecutor: Send + Sync {
    /// Execute a command with arguments and return its captured output.
    ///
    /// A missing executable surfaces as an error whose root cause is an
    /// `std::io::Error` of kind `NotFound`.
    fn execute(&self, command: &str, args: &[&str], working_dir: &Path) -> Result<Output>;
}

/// Real command executor using std::process::Command
pub struct RealCommandExecutor;

impl RealCommandExecutor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RealCommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandExecutor for RealCommandExecutor {
    fn execute(&self, command: &str, args: &[&str], working_dir: &Path) -> Result<Output> {
        tracing::debug!(command, ?args, dir = %working_dir.display(), "spawning command");

        let output = Command::new(command)
            .args(args)
            .current_dir(working_dir)
            .output()
            .with_context(|| format!("Failed to execute {}", command))?;

        tracing::debug!(command, status = ?output.status.code(), "command finished");
        Ok(output)
    }
}

/// Mock command executor for testing
#[cfg(test)]
pub struct MockCommandExecutor {
    /// Pre-configured outputs for commands
    outputs: Mutex<Vec<MockCommandResult>>,
    /// Every invocation as (command, args, working_dir)
    calls: Mutex<Vec<(String, Vec<String>, PathBuf)>>,
    missing_binary: bool,
}

#[cfg(test)]
#[derive(Clone, Debug)]
pub struct MockCommandResult {
    pub command: String,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

#[cfg(test)]
impl MockCommandResult {
    pub fn ok(command: &str, stdout: &str) -> Self {
        Self {
            command: command.to_string(),
            exit_code: 0,
            stdout: stdout.to_string(),
            stderr: String::new(),
        }
    }

    pub fn failed(command: &str, exit_code: i32, stderr: &str) -> Self {
        Self {
            command: command.to_string(),
            exit_code,
            stdout: String::new(),
            stderr: stderr.to_string(),
        }
    }
}

#[cfg(test)]
impl MockCommandExecutor {
    pub fn new() -> Self {
        Self::with_outputs(Vec::new())
    }

    pub fn with_outputs(outputs: Vec<MockCommandResult>) -> Self {
        Self {
            outputs: Mutex::new(outputs),
            calls: Mutex::new(Vec::new()),
            missing_binary: false,
        }
    }

    /// Every execute call fails as if the executable were not on PATH
    pub fn missing_binary() -> Self {
        Self {
            missing_binary: true,
            ..Self::new()
        }
    }

    /// Recorded invocations
    pub fn calls(&self) -> Vec<(String, Vec<String>, PathBuf)> {
        self.calls.lock().unwrap().clone()
    }
}

#[cfg(test)]
impl Default for MockCommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
impl CommandExecutor for MockCommandExecutor {
    fn execute(&self, command: &str, args: &[&str], working_dir: &Path) -> Result<Output> {
        self.calls.lock().unwrap().push((
            command.to_string(),
            args.iter().map(|a| a.to_string()).collect(),
            working_dir.to_path_buf(),
        ));

        if self.missing_binary {
            return Err(std::io::Error::new(std::io::ErrorKind::NotFound, "not found"))
                .with_context(|| format!("Failed to execute {}", command));
        }

        let mut outputs = self.outputs.lock().unwrap();

        if let Some(result) = outputs.iter().position(|r| r.command == command) {
            let mock_result = outputs.remove(result);
            return Ok(Output {
                status: create_exit_status(mock_result.exit_code),
                stdout: mock_result.stdout.into_bytes(),
                stderr: mock_result.stderr.into_bytes(),
            });
        }

        // Default: successful empty output
        Ok(Output {
            status: create_exit_status(0),
            stdout: Vec::new(),
            stderr: Vec::new(),
        })
    }
}

#[cfg(test)]
fn create_exit_status(code: i32) -> std::process::ExitStatus {
    // ExitStatus can't be constructed directly; on unix the raw value is a
    // wait status, so the exit code sits in the second byte
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        std::process::ExitStatus::from_raw(code << 8)
    }

    #[cfg(windows)]
    {
        use std::os::windows::process::ExitStatusExt;
        std::process::ExitStatus::from_raw(code as u32)
    }
}
