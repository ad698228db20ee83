pub mod gcp;
pub mod okta;
pub mod session;
pub mod workflow;

pub use gcp::GcpCommand;
pub use okta::OktaCommand;
pub use session::SessionCommand;

use inquire::InquireError;

/// Escape or Ctrl-C at a prompt
pub fn is_cancelled(error: &anyhow::Error) -> bool {
    matches!(
        error.downcast_ref::<InquireError>(),
        Some(InquireError::OperationCanceled | InquireError::OperationInterrupted)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_cancelled() {
        assert!(is_cancelled(&anyhow::Error::new(
            InquireError::OperationCanceled
        )));
        assert!(is_cancelled(
            &anyhow::Error::new(InquireError::OperationInterrupted).context("Okta API token")
        ));
        assert!(!is_cancelled(&anyhow::anyhow!("no more responses")));
    }
}
