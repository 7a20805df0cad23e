//! Application state management

use f1t_core::Snapshot;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// Shared application state
///
/// The engine task is the sole writer of the snapshot; consumers read it
/// through the lock or subscribe to receive a clone on every notification.
#[derive(Clone)]
pub struct AppState {
    /// Current race state, replaced field-group-wise by the engine
    pub snapshot: Arc<RwLock<Snapshot>>,

    /// Broadcast channel for state-changed notifications
    pub updates: broadcast::Sender<Snapshot>,
}

impl AppState {
    pub fn new() -> Self {
        // Capacity for a short burst of notifications; slow consumers lag
        let (updates, _) = broadcast::channel(64);

        Self {
            snapshot: Arc::new(RwLock::new(Snapshot::default())),
            updates,
        }
    }

    /// Subscribe to state-changed notifications
    pub fn subscribe(&self) -> broadcast::Receiver<Snapshot> {
        self.updates.subscribe()
    }

    /// Read a copy of the current snapshot
    pub async fn snapshot(&self) -> Snapshot {
        self.snapshot.read().await.clone()
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
