//! Single Flight Module
//!
//! Collapses concurrent loads of the same key into one execution.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::future::Future;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::debug;

use crate::error::Result;

/// Outcome slot of an in-flight call; `None` until the leader finishes.
type Slot<T> = watch::Receiver<Option<Result<T>>>;

// == Single Flight ==
/// Per-key request coalescer.
///
/// The first caller for a key (the leader) runs the supplier inline.
/// Callers arriving while it runs wait and receive a clone of the
/// leader's result. The in-flight entry is removed before the result is
/// published, so later calls always start a fresh load.
#[derive(Debug)]
pub struct SingleFlight<T> {
    calls: Mutex<HashMap<String, Slot<T>>>,
}

impl<T> Default for SingleFlight<T> {
    fn default() -> Self {
        Self {
            calls: Mutex::new(HashMap::new()),
        }
    }
}

/// Whether a `work` call ran the supplier itself or waited on another caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Leader,
    Follower,
}

impl<T: Clone> SingleFlight<T> {
    pub fn new() -> Self {
        Self::default()
    }

    // == Work ==
    /// Runs `supplier` unless a call for `key` is already in flight, in
    /// which case the in-flight result is shared.
    pub async fn work<F, Fut>(&self, key: &str, supplier: F) -> Result<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        self.work_with_role(key, supplier).await.0
    }

    /// Like [`work`](Self::work), also reporting which role this caller played.
    pub async fn work_with_role<F, Fut>(&self, key: &str, supplier: F) -> (Result<T>, Role)
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let tx = loop {
            let mut rx = {
                let mut calls = self.calls.lock();
                match calls.entry(key.to_owned()) {
                    Entry::Occupied(entry) => entry.get().clone(),
                    Entry::Vacant(entry) => {
                        let (tx, rx) = watch::channel(None);
                        entry.insert(rx);
                        break tx;
                    }
                }
            };

            let settled = rx.wait_for(Option::is_some).await.map(|slot| (*slot).clone());
            match settled {
                Ok(Some(result)) => return (result, Role::Follower),
                // leader went away without finishing; contend again
                _ => debug!(key, "in-flight call abandoned, retrying"),
            }
        };

        let in_flight = InFlight {
            calls: &self.calls,
            key,
        };
        let result = supplier().await;
        drop(in_flight);

        tx.send_replace(Some(result.clone()));
        (result, Role::Leader)
    }

    /// Number of keys currently being loaded.
    pub fn in_flight(&self) -> usize {
        self.calls.lock().len()
    }
}

// == In-Flight Guard ==
/// Removes the key's entry when the leader finishes or is dropped.
struct InFlight<'a, T> {
    calls: &'a Mutex<HashMap<String, Slot<T>>>,
    key: &'a str,
}

impl<T> Drop for InFlight<'_, T> {
    fn drop(&mut self) {
        self.calls.lock().remove(self.key);
    }
}
