//! HTTP API handlers for atelier-web

pub mod contact;
pub mod form;
pub mod gallery;
pub mod health;
pub mod projects;
pub mod ui;

pub use contact::submit_contact;
pub use form::{create_form, delete_form, form_events, get_form, submit_form};
pub use gallery::{
    create_gallery, delete_gallery, gallery_events, gallery_image_loaded, get_gallery,
    select_gallery_index, set_gallery_category,
};
pub use health::health_routes;
pub use projects::{get_project, list_categories, list_projects};
pub use ui::{serve_app_js, serve_index};
