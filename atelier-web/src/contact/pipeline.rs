//! Server-side submission pipeline
//!
//! Required-fields check, email shape check, then hand-off to the
//! spreadsheet sink, or a degraded success when the sink was never
//! configured. Degrading is deliberate: the form must not look broken
//! to a visitor because an operator secret is missing, but the
//! condition is logged so operators can see submissions going
//! unrecorded.

use crate::sink::SheetsClient;
use atelier_common::validation::{self, ContactSubmission, ServerValidationError};
use tracing::{error, warn};

pub const SUCCESS_MESSAGE: &str = "Form submitted successfully";
pub const DEGRADED_MESSAGE: &str = "Form submitted successfully (spreadsheet not configured)";
pub const SINK_FAILURE_MESSAGE: &str = "Failed to submit form. Please try again.";

/// Pipeline failure, mapped onto exactly two HTTP status families
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// User-correctable input error (400)
    Invalid(ServerValidationError),
    /// Sink/infrastructure failure (500); detail stays in the log
    Sink,
}

impl SubmitError {
    /// Client-visible message. Sink failures never echo the raw error.
    pub fn message(&self) -> &'static str {
        match self {
            SubmitError::Invalid(err) => err.message(),
            SubmitError::Sink => SINK_FAILURE_MESSAGE,
        }
    }

    pub fn is_client_error(&self) -> bool {
        matches!(self, SubmitError::Invalid(_))
    }
}

/// Run one submission through the pipeline. Returns the message for
/// the success payload.
pub async fn process_submission(
    sink: Option<&SheetsClient>,
    submission: &ContactSubmission,
) -> Result<&'static str, SubmitError> {
    validation::validate_for_server(submission).map_err(SubmitError::Invalid)?;

    let Some(client) = sink else {
        warn!("Contact submission accepted but not recorded: spreadsheet sink not configured");
        return Ok(DEGRADED_MESSAGE);
    };

    match client.append_submission(submission, chrono::Utc::now()).await {
        Ok(()) => Ok(SUCCESS_MESSAGE),
        Err(e) => {
            error!("Spreadsheet append failed: {e}");
            Err(SubmitError::Sink)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(email: &str, first: &str, last: &str, message: &str) -> ContactSubmission {
        ContactSubmission {
            email: email.to_string(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            message: message.to_string(),
        }
    }

    #[tokio::test]
    async fn test_missing_fields_rejected_first() {
        let err = process_submission(None, &submission("", "Ada", "", "hello there"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            SubmitError::Invalid(ServerValidationError::MissingFields)
        );
        assert_eq!(err.message(), "All fields are required");
        assert!(err.is_client_error());
    }

    #[tokio::test]
    async fn test_invalid_email_checked_before_lengths() {
        // Short name and message do not matter at this boundary
        let err = process_submission(None, &submission("bad", "A", "B", "short"))
            .await
            .unwrap_err();
        assert_eq!(err, SubmitError::Invalid(ServerValidationError::InvalidEmail));
        assert_eq!(err.message(), "Invalid email address");
    }

    #[tokio::test]
    async fn test_unconfigured_sink_degrades_to_success() {
        let message = process_submission(
            None,
            &submission("a@b.co", "Ada", "Lovelace", "A message long enough."),
        )
        .await
        .unwrap();
        assert_eq!(message, DEGRADED_MESSAGE);
    }
}
