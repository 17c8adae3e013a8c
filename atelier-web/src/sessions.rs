//! UI session registry
//!
//! Gallery and form controllers live server-side, one per mounted UI
//! instance, keyed by a session id the client carries. A browser that
//! navigates away is expected to delete its session; ones that never do
//! are evicted by the idle sweep so controllers (and their timers) do
//! not accumulate. Dropping a controller aborts its scheduled tasks.

use crate::sched::Scheduled;
use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Sessions idle longer than this are evicted
pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(15 * 60);

/// Sweep cadence
const SWEEP_PERIOD: Duration = Duration::from_secs(60);

struct Entry<C> {
    controller: Arc<C>,
    last_touched: Instant,
}

type Sessions<C> = Arc<RwLock<HashMap<Uuid, Entry<C>>>>;

/// Shared registry of live controllers
pub struct Registry<C> {
    sessions: Sessions<C>,
    idle_timeout: Duration,
    _sweeper: Arc<Scheduled>,
}

impl<C> Clone for Registry<C> {
    fn clone(&self) -> Self {
        Self {
            sessions: self.sessions.clone(),
            idle_timeout: self.idle_timeout,
            _sweeper: self._sweeper.clone(),
        }
    }
}

impl<C: Send + Sync + 'static> Registry<C> {
    pub fn new(idle_timeout: Duration) -> Self {
        let sessions: Sessions<C> = Arc::new(RwLock::new(HashMap::new()));
        let weak: Weak<RwLock<HashMap<Uuid, Entry<C>>>> = Arc::downgrade(&sessions);
        let sweeper = Scheduled::every(SWEEP_PERIOD, move || {
            let weak = weak.clone();
            async move {
                let Some(sessions) = weak.upgrade() else {
                    return;
                };
                let mut map = sessions.write().await;
                let before = map.len();
                map.retain(|_, entry| entry.last_touched.elapsed() < idle_timeout);
                let evicted = before - map.len();
                if evicted > 0 {
                    debug!("Evicted {evicted} idle session(s)");
                }
            }
        });
        Self {
            sessions,
            idle_timeout,
            _sweeper: Arc::new(sweeper),
        }
    }

    pub async fn insert(&self, controller: Arc<C>) -> Uuid {
        let id = Uuid::new_v4();
        let mut map = self.sessions.write().await;
        map.insert(
            id,
            Entry {
                controller,
                last_touched: Instant::now(),
            },
        );
        id
    }

    /// Fetch a live controller, refreshing its idle clock
    pub async fn get(&self, id: Uuid) -> Option<Arc<C>> {
        let mut map = self.sessions.write().await;
        let entry = map.get_mut(&id)?;
        entry.last_touched = Instant::now();
        Some(entry.controller.clone())
    }

    pub async fn remove(&self, id: Uuid) -> Option<Arc<C>> {
        let mut map = self.sessions.write().await;
        map.remove(&id).map(|entry| entry.controller)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }
}
