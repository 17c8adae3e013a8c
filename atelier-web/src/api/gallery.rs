//! Gallery session endpoints
//!
//! A UI instance creates a session, drives it with select/loaded
//! reports, and watches it over SSE. Deleting the session tears the
//! controller (and its timers) down.

use atelier_common::catalog::Category;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::sse::{Event, KeepAlive, Sse},
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use futures::stream::Stream;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::convert::Infallible;
use std::time::Duration;
use tokio::sync::broadcast::error::RecvError;
use uuid::Uuid;

use crate::gallery::{GalleryController, GalleryEvent, GalleryView};
use crate::AppState;

#[derive(Debug, Deserialize, Default)]
pub struct CreateGalleryRequest {
    /// Omitted = whole catalog
    pub category: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GallerySessionResponse {
    pub session_id: Uuid,
    pub state: GalleryView,
}

#[derive(Debug, Deserialize)]
pub struct CategoryRequest {
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct IndexRequest {
    pub index: usize,
}

fn parse_category(raw: Option<&str>) -> Result<Option<Category>, GalleryError> {
    match raw {
        None => Ok(None),
        Some(raw) => raw
            .parse::<Category>()
            .map(Some)
            .map_err(|_| GalleryError::UnknownCategory(raw.to_string())),
    }
}

async fn lookup(
    state: &AppState,
    id: Uuid,
) -> Result<std::sync::Arc<GalleryController>, GalleryError> {
    state
        .galleries
        .get(id)
        .await
        .ok_or(GalleryError::SessionNotFound(id))
}

/// POST /api/gallery
pub async fn create_gallery(
    State(state): State<AppState>,
    body: Option<Json<CreateGalleryRequest>>,
) -> Result<Json<GallerySessionResponse>, GalleryError> {
    let request = body.map(|Json(r)| r).unwrap_or_default();
    let category = parse_category(request.category.as_deref())?;
    let controller = GalleryController::new(category, state.gallery_timing).await;
    let view = controller.snapshot().await;
    let session_id = state.galleries.insert(controller).await;
    Ok(Json(GallerySessionResponse {
        session_id,
        state: view,
    }))
}

/// GET /api/gallery/:id
pub async fn get_gallery(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<GalleryView>, GalleryError> {
    let controller = lookup(&state, id).await?;
    Ok(Json(controller.snapshot().await))
}

/// POST /api/gallery/:id/category
pub async fn set_gallery_category(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CategoryRequest>,
) -> Result<Json<GalleryView>, GalleryError> {
    let category = parse_category(request.category.as_deref())?;
    let controller = lookup(&state, id).await?;
    Ok(Json(controller.set_category(category).await))
}

/// POST /api/gallery/:id/select
pub async fn select_gallery_index(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<IndexRequest>,
) -> Result<Json<GalleryView>, GalleryError> {
    let controller = lookup(&state, id).await?;
    let view = controller
        .select(request.index)
        .await
        .map_err(|e| GalleryError::InvalidIndex(e.to_string()))?;
    Ok(Json(view))
}

/// POST /api/gallery/:id/loaded
pub async fn gallery_image_loaded(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<IndexRequest>,
) -> Result<Json<GalleryView>, GalleryError> {
    let controller = lookup(&state, id).await?;
    Ok(Json(controller.image_loaded(request.index).await))
}

/// DELETE /api/gallery/:id
pub async fn delete_gallery(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, GalleryError> {
    state
        .galleries
        .remove(id)
        .await
        .ok_or(GalleryError::SessionNotFound(id))?;
    Ok(Json(json!({ "success": true })))
}

/// GET /api/gallery/:id/events - SSE feed of gallery transitions
pub async fn gallery_events(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, GalleryError> {
    let controller = lookup(&state, id).await?;
    let mut rx = controller.subscribe();
    let initial = GalleryEvent::InitialState {
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
                // A slow consumer resumes with the next event
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

/// Gallery session errors
#[derive(Debug)]
pub enum GalleryError {
    SessionNotFound(Uuid),
    UnknownCategory(String),
    InvalidIndex(String),
}

impl IntoResponse for GalleryError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            GalleryError::SessionNotFound(id) => {
                (StatusCode::NOT_FOUND, format!("Gallery session not found: {id}"))
            }
            GalleryError::UnknownCategory(raw) => {
                (StatusCode::NOT_FOUND, format!("Unknown category: {raw}"))
            }
            GalleryError::InvalidIndex(detail) => (StatusCode::BAD_REQUEST, detail),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}
