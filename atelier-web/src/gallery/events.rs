//! Gallery events
//!
//! Broadcast by the controller and forwarded to connected clients over
//! SSE. Every event carries a full view snapshot so a client never has
//! to reconstruct state from deltas, plus the transition timestamp.

use super::state::GalleryView;
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum GalleryEvent {
    /// Sent once to each new SSE subscriber
    InitialState {
        state: GalleryView,
        timestamp: DateTime<Utc>,
    },

    /// Mount or category switch dropped all per-list state
    Reset {
        state: GalleryView,
        timestamp: DateTime<Utc>,
    },

    /// Selection moved (user click or auto-advance)
    SelectionChanged {
        state: GalleryView,
        timestamp: DateTime<Utc>,
    },

    /// An image reported load completion
    ImageLoaded {
        index: usize,
        state: GalleryView,
        timestamp: DateTime<Utc>,
    },

    /// The loading overlay came down (debounced clear or safeguard)
    LoadingCleared {
        state: GalleryView,
        timestamp: DateTime<Utc>,
    },
}

impl GalleryEvent {
    /// SSE event name
    pub fn name(&self) -> &'static str {
        match self {
            GalleryEvent::InitialState { .. } => "InitialState",
            GalleryEvent::Reset { .. } => "Reset",
            GalleryEvent::SelectionChanged { .. } => "SelectionChanged",
            GalleryEvent::ImageLoaded { .. } => "ImageLoaded",
            GalleryEvent::LoadingCleared { .. } => "LoadingCleared",
        }
    }
}
