//! # Best-effort event fan-out with per-observer failure isolation.
//!
//! [`ObserverSet`] distributes encoded event frames to every attached
//! observer connection.
//!
//! ## Architecture
//! ```text
//! broadcast(event)
//!     │  encode once
//!     ├──► observer 1.send(frame) ── timeout/err ──► detach + warn
//!     ├──► observer 2.send(frame)
//!     └──► observer N.send(frame)
//! ```
//!
//! ## Rules
//! - Iteration happens over a **snapshot** of the subscriber list; removals
//!   are applied after the pass, never mid-iteration.
//! - One failing observer is dropped and removed from the set; the
//!   remaining observers still receive the event and the triggering
//!   registry operation is unaffected.
//! - Each send is bounded by a write timeout so a hung socket cannot stall
//!   the registry indefinitely.
//! - Attach/detach are independent of the registry lock.

use std::sync::{Arc, RwLock};
use std::time::Duration;

use futures::future::join_all;

use crate::events::codec;
use crate::events::event::ProcessEvent;
use crate::events::observer::ObserverConnection;

/// Fan-out set of attached observer connections.
pub struct ObserverSet {
    observers: RwLock<Vec<Arc<dyn ObserverConnection>>>,
    write_timeout: Duration,
}

impl ObserverSet {
    /// Creates an empty set with the given per-send write timeout.
    pub fn new(write_timeout: Duration) -> Self {
        Self {
            observers: RwLock::new(Vec::new()),
            write_timeout,
        }
    }

    /// Attaches an observer connection.
    pub fn attach(&self, observer: Arc<dyn ObserverConnection>) {
        let mut observers = self.observers.write().expect("observer set poisoned");
        observers.push(observer);
    }

    /// Detaches an observer connection (pointer identity).
    pub fn detach(&self, observer: &Arc<dyn ObserverConnection>) {
        let mut observers = self.observers.write().expect("observer set poisoned");
        observers.retain(|o| !Arc::ptr_eq(o, observer));
    }

    /// Returns the number of attached observers.
    pub fn len(&self) -> usize {
        self.observers.read().expect("observer set poisoned").len()
    }

    /// Returns `true` when no observers are attached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Encodes the event once and delivers it to every attached observer.
    ///
    /// Observers whose send fails or times out are detached; everything
    /// else is unaffected.
    pub async fn broadcast(&self, event: &ProcessEvent) {
        let snapshot: Vec<Arc<dyn ObserverConnection>> = {
            let observers = self.observers.read().expect("observer set poisoned");
            observers.clone()
        };
        if snapshot.is_empty() {
            return;
        }

        let frame = codec::encode(event);
        let outcomes = join_all(snapshot.iter().map(|observer| {
            let frame = frame.clone();
            async move { tokio::time::timeout(self.write_timeout, observer.send(frame)).await }
        }))
        .await;

        let mut failed: Vec<Arc<dyn ObserverConnection>> = Vec::new();
        for (observer, outcome) in snapshot.iter().zip(outcomes) {
            match outcome {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    tracing::warn!(
                        observer = observer.name(),
                        event = event.as_label(),
                        %err,
                        "failed to write event frame; dropping observer"
                    );
                    failed.push(observer.clone());
                }
                Err(_) => {
                    tracing::warn!(
                        observer = observer.name(),
                        event = event.as_label(),
                        timeout = ?self.write_timeout,
                        "event frame write timed out; dropping observer"
                    );
                    failed.push(observer.clone());
                }
            }
        }

        for observer in &failed {
            self.detach(observer);
        }
    }
}
