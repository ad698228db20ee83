use std::fmt;

/// Error types for fetch / generate / resolve / terraform operations
#[derive(Debug)]
pub enum ImportError {
    /// Provider answered with a non-success status
    Http {
        status: u16,
        url: String,
        body: String,
    },

    /// Request never produced a response (DNS, TLS, connection reset, ...)
    Transport(String),

    /// Response arrived but its body is not what the listing endpoint promises
    InvalidResponse { url: String, message: String },

    /// Resource type tag not known for the provider
    UnsupportedResourceType {
        provider: String,
        resource_type: String,
    },

    /// File system operation failed
    FileSystem(String),

    /// Provider config template failed to render
    Template(String),

    /// Terraform ran and exited non-zero
    TerraformFailed {
        command: String,
        exit_code: Option<i32>,
        stderr: String,
    },

    /// Terraform executable not on PATH
    TerraformNotFound(String),

    /// Invalid input or parameter
    InvalidInput(String),
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportError::Http { status, url, body } => {
                write!(f, "HTTP request failed with status {}: {}", status, url)?;

                let body = body.trim();
                if !body.is_empty() {
                    write!(f, ": {}", body)?;
                }

                Ok(())
            }
            ImportError::Transport(msg) => {
                write!(f, "Request failed: {}", msg)
            }
            ImportError::InvalidResponse { url, message } => {
                write!(f, "Unexpected response from {}: {}", url, message)
            }
            ImportError::UnsupportedResourceType {
                provider,
                resource_type,
            } => {
                write!(
                    f,
                    "Unsupported resource type '{}' for provider '{}'",
                    resource_type, provider
                )
            }
            ImportError::FileSystem(msg) => {
                write!(f, "File system error: {}", msg)
            }
            ImportError::Template(msg) => {
                write!(f, "Failed to render template: {}", msg)
            }
            ImportError::TerraformFailed {
                command,
                exit_code,
                stderr,
            } => {
                write!(f, "Terraform command '{}' failed", command)?;

                if let Some(code) = exit_code {
                    write!(f, " (exit code {})", code)?;
                }

                let stderr = stderr.trim();
                if !stderr.is_empty() {
                    write!(f, ": {}", stderr)?;
                }

                Ok(())
            }
            ImportError::TerraformNotFound(binary) => {
                write!(f, "{} is not installed or not in your PATH", binary)
            }
            ImportError::InvalidInput(msg) => {
                write!(f, "Invalid input: {}", msg)
            }
        }
    }
}

impl std::error::Error for ImportError {}

impl From<handlebars::RenderError> for ImportError {
    fn from(err: handlebars::RenderError) -> Self {
        ImportError::Template(err.to_string())
    }
}

/// Result type for import operations
pub type ImportResult<T> = Result<T, ImportError>;
