//! Calculation error types and diagnostics.

use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

/// Error that aborts a whole calculation.
///
/// Problems with individual files or manifests never end up here; they are
/// reported as diagnostics next to the result.
#[derive(Debug, Error)]
pub enum CalculateError {
    #[error("source directory calculation was cancelled")]
    Cancelled,

    #[error("failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl CalculateError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            CalculateError::Cancelled => Diagnostic::note(self.to_string())
                .with_context("no content entries were produced"),
            CalculateError::ThreadPool(err) => {
                Diagnostic::error(format!("failed to start worker pool: {}", err))
                    .with_suggestion("Lower the number of jobs with `--jobs`")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_is_not_an_error_diagnostic() {
        let diag = CalculateError::Cancelled.to_diagnostic();
        assert!(!diag.is_error());
        assert!(diag.message.contains("cancelled"));
    }
}
