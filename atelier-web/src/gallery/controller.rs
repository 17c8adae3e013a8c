//! Gallery controller
//!
//! Async shell around `GalleryState`. The shell owns the three clocks
//! (the recurring auto-advance, the per-selection load-timeout
//! safeguard, and the short debounce before the loading overlay comes
//! down) and broadcasts every transition to SSE subscribers. All
//! transitions are serialized through the state mutex, so timer fires,
//! user actions, and load reports may interleave in any order.

use super::events::GalleryEvent;
use super::state::{GalleryState, GalleryView, LoadAck};
use crate::sched::Scheduled;
use atelier_common::catalog::Category;
use atelier_common::Result;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, Mutex};

/// Timer cadences, configurable so tests run in milliseconds
#[derive(Debug, Clone, Copy)]
pub struct GalleryTiming {
    /// Recurring advance period while idle
    pub auto_advance: Duration,
    /// Ceiling on how long the loading overlay may stay up
    pub load_timeout: Duration,
    /// Debounce between a load report and the overlay coming down
    pub load_clear_delay: Duration,
}

impl Default for GalleryTiming {
    fn default() -> Self {
        Self {
            auto_advance: Duration::from_millis(5000),
            load_timeout: Duration::from_millis(3000),
            load_clear_delay: Duration::from_millis(100),
        }
    }
}

#[derive(Default)]
struct Timers {
    auto_advance: Option<Scheduled>,
    load_timeout: Option<Scheduled>,
    pending_clear: Option<Scheduled>,
}

struct Inner {
    state: Mutex<GalleryState>,
    timers: Mutex<Timers>,
    events: broadcast::Sender<GalleryEvent>,
    timing: GalleryTiming,
}

/// One live gallery session. Dropping the controller aborts every
/// pending timer, so no transition can fire after teardown.
pub struct GalleryController {
    inner: Arc<Inner>,
}

impl GalleryController {
    pub async fn new(category: Option<Category>, timing: GalleryTiming) -> Arc<Self> {
        let (events, _) = broadcast::channel(64);
        let inner = Arc::new(Inner {
            state: Mutex::new(GalleryState::new(category)),
            timers: Mutex::new(Timers::default()),
            events,
            timing,
        });
        Inner::restart_load_timeout_if_loading(&inner).await;
        Inner::resync_auto_advance(&inner).await;
        Arc::new(Self { inner })
    }

    pub fn subscribe(&self) -> broadcast::Receiver<GalleryEvent> {
        self.inner.events.subscribe()
    }

    pub async fn snapshot(&self) -> GalleryView {
        self.inner.state.lock().await.snapshot()
    }

    /// Category switch: full reset, timers rebuilt from scratch.
    pub async fn set_category(&self, category: Option<Category>) -> GalleryView {
        let view = {
            let mut state = self.inner.state.lock().await;
            state.reset(category);
            state.snapshot()
        };
        {
            let mut timers = self.inner.timers.lock().await;
            timers.auto_advance = None;
            timers.load_timeout = None;
            timers.pending_clear = None;
        }
        Inner::restart_load_timeout_if_loading(&self.inner).await;
        Inner::resync_auto_advance(&self.inner).await;
        self.inner.emit(GalleryEvent::Reset {
            state: view.clone(),
            timestamp: Utc::now(),
        });
        view
    }

    /// Manual selection (no debounce).
    pub async fn select(&self, index: usize) -> Result<GalleryView> {
        let (changed, view) = {
            let mut state = self.inner.state.lock().await;
            let changed = state.select(index)?;
            (changed, state.snapshot())
        };
        if changed {
            Inner::restart_load_timeout_if_loading(&self.inner).await;
            Inner::resync_auto_advance(&self.inner).await;
            self.inner.emit(GalleryEvent::SelectionChanged {
                state: view.clone(),
                timestamp: Utc::now(),
            });
        }
        Ok(view)
    }

    /// Load report from the client for the image at `index`.
    pub async fn image_loaded(&self, index: usize) -> GalleryView {
        let (ack, view) = {
            let mut state = self.inner.state.lock().await;
            let ack = state.image_loaded(index);
            (ack, state.snapshot())
        };
        if ack == LoadAck::Ignored {
            return view;
        }
        self.inner.emit(GalleryEvent::ImageLoaded {
            index,
            state: view.clone(),
            timestamp: Utc::now(),
        });
        if ack == LoadAck::ClearPending {
            let weak = Arc::downgrade(&self.inner);
            let delay = self.inner.timing.load_clear_delay;
            let task = Scheduled::once(delay, async move {
                if let Some(inner) = weak.upgrade() {
                    Inner::deferred_clear(&inner, index).await;
                }
            });
            self.inner.timers.lock().await.pending_clear = Some(task);
        }
        view
    }
}

impl Inner {
    fn emit(&self, event: GalleryEvent) {
        // Lossy: a gallery with no SSE subscriber is still correct
        let _ = self.events.send(event);
    }

    /// Recreate (or cancel) the auto-advance interval from the current
    /// valid-count/loading inputs. Called after every transition that
    /// can change either.
    async fn resync_auto_advance(this: &Arc<Inner>) {
        let enabled = this.state.lock().await.auto_advance_enabled();
        let mut timers = this.timers.lock().await;
        if enabled {
            let weak = Arc::downgrade(this);
            let task = Scheduled::every(this.timing.auto_advance, move || {
                let weak = weak.clone();
                async move {
                    if let Some(inner) = weak.upgrade() {
                        Inner::advance_tick(&inner).await;
                    }
                }
            });
            timers.auto_advance = Some(task);
        } else {
            timers.auto_advance = None;
        }
    }

    /// (Re)arm the load-timeout safeguard whenever a load begins.
    async fn restart_load_timeout_if_loading(this: &Arc<Inner>) {
        if !this.state.lock().await.is_loading() {
            return;
        }
        let weak = Arc::downgrade(this);
        let task = Scheduled::once(this.timing.load_timeout, async move {
            if let Some(inner) = weak.upgrade() {
                Inner::timeout_clear(&inner).await;
            }
        });
        this.timers.lock().await.load_timeout = Some(task);
    }

    async fn advance_tick(this: &Arc<Inner>) {
        let view = {
            let mut state = this.state.lock().await;
            // Inputs may have changed between scheduling and firing
            if !state.auto_advance_enabled() {
                return;
            }
            if state.advance().is_none() {
                return;
            }
            state.snapshot()
        };
        this.emit(GalleryEvent::SelectionChanged {
            state: view,
            timestamp: Utc::now(),
        });
    }

    /// Debounced clear, keyed by the index that loaded.
    async fn deferred_clear(this: &Arc<Inner>, index: usize) {
        let view = {
            let mut state = this.state.lock().await;
            if !state.clear_loading_if_selected(index) {
                return;
            }
            state.snapshot()
        };
        // The safeguard is moot once the overlay is down
        this.timers.lock().await.load_timeout = None;
        this.emit(GalleryEvent::LoadingCleared {
            state: view,
            timestamp: Utc::now(),
        });
        Inner::resync_auto_advance(this).await;
    }

    /// Safeguard fire: never leave the overlay up indefinitely.
    async fn timeout_clear(this: &Arc<Inner>) {
        let view = {
            let mut state = this.state.lock().await;
            if !state.force_clear_loading() {
                return;
            }
            state.snapshot()
        };
        this.emit(GalleryEvent::LoadingCleared {
            state: view,
            timestamp: Utc::now(),
        });
        Inner::resync_auto_advance(this).await;
    }
}
