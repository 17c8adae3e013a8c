//! Contact submission endpoint
//!
//! The public pipeline contract: 400 for user-correctable input, 500
//! for anything unexpected (including the sink), 200 otherwise, the
//! degraded no-sink path included. No other statuses are used.

use atelier_common::validation::ContactSubmission;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;

use crate::contact::pipeline::{self, SubmitError, SINK_FAILURE_MESSAGE};
use crate::AppState;

/// POST /api/contact
pub async fn submit_contact(
    State(state): State<AppState>,
    body: String,
) -> Result<Json<serde_json::Value>, ContactError> {
    // A body that is not valid JSON is an unexpected failure (500),
    // not a validation 400: the site's own form always sends JSON.
    let submission: ContactSubmission = serde_json::from_str(&body).map_err(|e| {
        error!("Malformed contact request body: {e}");
        ContactError::Malformed
    })?;

    let message = pipeline::process_submission(state.sink.as_deref(), &submission)
        .await
        .map_err(ContactError::Submit)?;

    Ok(Json(json!({
        "success": true,
        "message": message,
    })))
}

/// Contact endpoint errors
#[derive(Debug)]
pub enum ContactError {
    Malformed,
    Submit(SubmitError),
}

impl IntoResponse for ContactError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ContactError::Malformed => {
                (StatusCode::INTERNAL_SERVER_ERROR, SINK_FAILURE_MESSAGE)
            }
            ContactError::Submit(err) => {
                let status = if err.is_client_error() {
                    StatusCode::BAD_REQUEST
                } else {
                    StatusCode::INTERNAL_SERVER_ERROR
                };
                (status, err.message())
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
