//! Gallery session controller
//!
//! One controller per mounted gallery UI: the pure selection state
//! machine (`state`), the async shell that owns its timers and event
//! feed (`controller`), and the event types pushed over SSE (`events`).

pub mod controller;
pub mod events;
pub mod state;

pub use controller::{GalleryController, GalleryTiming};
pub use events::GalleryEvent;
pub use state::{GalleryState, GalleryView, ThumbAlignment};
