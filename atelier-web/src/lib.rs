//! atelier-web library - design studio site service
//!
//! Serves the portfolio catalog, the contact submission pipeline, and
//! the per-session gallery/form controllers behind one axum router.

use atelier_common::config::SiteConfig;
use atelier_common::{Error, Result};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod contact;
pub mod gallery;
pub mod sched;
pub mod sessions;
pub mod sink;

use contact::{FormController, FormTiming};
use gallery::{GalleryController, GalleryTiming};
use sessions::{Registry, DEFAULT_IDLE_TIMEOUT};
use sink::SheetsClient;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<SiteConfig>,
    /// `None` = spreadsheet sink unconfigured (degraded mode)
    pub sink: Option<Arc<SheetsClient>>,
    pub galleries: Registry<GalleryController>,
    pub forms: Registry<FormController>,
    pub gallery_timing: GalleryTiming,
    pub form_timing: FormTiming,
}

impl AppState {
    /// Create application state. Must run inside a tokio runtime (the
    /// session registries start their sweep tasks).
    pub fn new(config: SiteConfig) -> Result<Self> {
        let sink = match &config.sheets {
            Some(sheets) => Some(Arc::new(
                SheetsClient::new(sheets.clone()).map_err(|e| Error::Sink(e.to_string()))?,
            )),
            None => None,
        };
        Ok(Self {
            config: Arc::new(config),
            sink,
            galleries: Registry::new(DEFAULT_IDLE_TIMEOUT),
            forms: Registry::new(DEFAULT_IDLE_TIMEOUT),
            gallery_timing: GalleryTiming::default(),
            form_timing: FormTiming::default(),
        })
    }

    /// Override controller cadences (tests run in milliseconds)
    pub fn with_timings(mut self, gallery: GalleryTiming, form: FormTiming) -> Self {
        self.gallery_timing = gallery;
        self.form_timing = form;
        self
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    let api = Router::new()
        .route("/api/categories", get(api::list_categories))
        .route("/api/projects", get(api::list_projects))
        .route("/api/projects/:id", get(api::get_project))
        .route("/api/contact", post(api::submit_contact))
        .route("/api/gallery", post(api::create_gallery))
        .route(
            "/api/gallery/:id",
            get(api::get_gallery).delete(api::delete_gallery),
        )
        .route("/api/gallery/:id/category", post(api::set_gallery_category))
        .route("/api/gallery/:id/select", post(api::select_gallery_index))
        .route("/api/gallery/:id/loaded", post(api::gallery_image_loaded))
        .route("/api/gallery/:id/events", get(api::gallery_events))
        .route("/api/form", post(api::create_form))
        .route("/api/form/:id", get(api::get_form).delete(api::delete_form))
        .route("/api/form/:id/submit", post(api::submit_form))
        .route("/api/form/:id/events", get(api::form_events));

    let ui = Router::new()
        .route("/", get(api::serve_index))
        .route("/static/app.js", get(api::serve_app_js))
        .merge(api::health_routes());

    Router::new()
        .merge(api)
        .merge(ui)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
