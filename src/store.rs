//! Observable value container for propagating front-end state
//!
//! Holds the latest notification (data, error, loading flag) in a
//! `tokio::sync::watch` channel. Updates merge a patch into the current data;
//! subscribers read the latest value at any time and are flagged on change.
//! The earnings engine never touches this; it exists for the collaborators
//! that collect plan inputs and hold fetched price data.

use std::fmt::Display;
use tokio::sync::watch;

/// Types that accept partial updates
pub trait Merge {
    type Patch;

    fn merge(&mut self, patch: Self::Patch);
}

/// Snapshot seen by subscribers
#[derive(Debug, Clone, PartialEq)]
pub struct Notification<T> {
    pub data: Option<T>,
    pub error: Option<String>,
    pub loading: bool,
}

impl<T> Default for Notification<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            loading: false,
        }
    }
}

pub struct ValueStore<T> {
    tx: watch::Sender<Notification<T>>,
}

impl<T: Merge + Default + Clone> ValueStore<T> {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(Notification::default());
        Self { tx }
    }

    /// Latest notification
    pub fn get(&self) -> Notification<T> {
        self.tx.borrow().clone()
    }

    /// New receiver; it starts at the latest notification
    ///
    /// Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> watch::Receiver<Notification<T>> {
        self.tx.subscribe()
    }

    /// Merge a patch into the current data and publish it
    pub fn set(&self, patch: T::Patch) {
        self.tx.send_modify(|current| {
            let mut data = current.data.take().unwrap_or_default();
            data.merge(patch);
            current.data = Some(data);
            current.error = None;
            current.loading = false;
        });
    }

    /// Publish a loading state, then either the merged patch or the error
    pub fn try_update<E, F>(&self, produce: F)
    where
        E: Display,
        F: FnOnce() -> Result<T::Patch, E>,
    {
        let data = self.tx.borrow().data.clone();
        self.tx.send_replace(Notification {
            data,
            error: None,
            loading: true,
        });

        match produce() {
            Ok(patch) => self.set(patch),
            Err(e) => {
                let data = self.tx.borrow().data.clone();
                self.tx.send_replace(Notification {
                    data,
                    error: Some(e.to_string()),
                    loading: false,
                });
            }
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}

impl<T: Merge + Default + Clone> Default for ValueStore<T> {
    fn default() -> Self {
        Self::new()
    }
}
