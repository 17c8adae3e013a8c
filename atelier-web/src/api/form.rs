//! Contact form session endpoints
//!
//! Mirrors the gallery session surface: create, submit, observe over
//! SSE, delete. The submit response carries the resulting form state;
//! the submitting/success/idle transitions also go out on the feed.

use atelier_common::validation::ContactSubmission;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use futures::stream::Stream;
use serde::Serialize;
use serde_json::json;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use crate::contact::{FormController, FormEvent, FormView};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct FormSessionResponse {
    pub session_id: Uuid,
    pub state: FormView,
}

async fn lookup(
    state: &AppState,
    id: Uuid,
) -> Result<std::sync::Arc<FormController>, FormError> {
    state
        .forms
        .get(id)
        .await
        .ok_or(FormError::SessionNotFound(id))
}

/// POST /api/form
pub async fn create_form(
    State(state): State<AppState>,
) -> Result<Json<FormSessionResponse>, FormError> {
    let controller = FormController::new(state.sink.clone(), state.form_timing);
    let view = controller.snapshot().await;
    let session_id = state.forms.insert(controller).await;
    Ok(Json(FormSessionResponse {
        session_id,
        state: view,
    }))
}

/// GET /api/form/:id
pub async fn get_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<FormView>, FormError> {
    let controller = lookup(&state, id).await?;
    Ok(Json(controller.snapshot().await))
}

/// POST /api/form/:id/submit
pub async fn submit_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(submission): Json<ContactSubmission>,
) -> Result<Json<FormView>, FormError> {
    let controller = lookup(&state, id).await?;
    Ok(Json(controller.submit(&submission).await))
}

/// DELETE /api/form/:id
pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, FormError> {
    state
        .forms
        .remove(id)
        .await
        .ok_or(FormError::SessionNotFound(id))?;
    Ok(Json(json!({ "success": true })))
}

/// GET /api/form/:id/events - SSE feed of form status transitions
pub async fn form_events(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, FormError> {
    let controller = lookup(&state, id).await?;
    let mut rx = controller.subscribe();
    let initial = FormEvent::InitialState {
        state: controller.snapshot().await,
        timestamp: Utc::now(),
    };

    let stream = async_stream::stream! {
        if let Ok(json) = serde_json::to_string(&initial) {
            yield Ok(Event::default().event(initial.name()).data(json));
        }
        loop {
            match rx.recv().await {
                Ok(event) => {
                    if let Ok(json) = serde_json::to_string(&event) {
                        yield Ok(Event::default().event(event.name()).data(json));
                    }
                }
                Err(RecvError::Lagged(_)) => continue,
                Err(RecvError::Closed) => break,
            }
        }
    };

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("heartbeat"),
    ))
}

/// Form session errors
#[derive(Debug)]
pub enum FormError {
    SessionNotFound(Uuid),
}

impl IntoResponse for FormError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            FormError::SessionNotFound(id) => {
                (StatusCode::NOT_FOUND, format!("Form session not found: {id}"))
            }
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
