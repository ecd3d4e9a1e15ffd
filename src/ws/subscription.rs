//! Per-connection subscription manager.
//!
//! Tracks which keys a WebSocket client is subscribed to and provides
//! server-side event filtering.

use std::collections::HashSet;

use crate::domain::{Key, LedgerEvent};

/// Manages the set of key subscriptions for a single WebSocket connection.
#[derive(Debug, Default)]
pub struct SubscriptionManager {
    /// Subscribed keys. If `subscribe_all` is true, this set is ignored.
    keys: HashSet<Key>,
    /// Whether the client subscribes to everything (wildcard `"*"`).
    subscribe_all: bool,
}

impl SubscriptionManager {
    /// Creates a new empty subscription manager.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds keys to the subscription set, optionally enabling the wildcard.
    pub fn subscribe(&mut self, keys: &[Key], wildcard: bool) {
        if wildcard {
            self.subscribe_all = true;
        }
        self.keys.extend(keys.iter().copied());
    }

    /// Removes keys from the subscription set, optionally dropping the
    /// wildcard.
    pub fn unsubscribe(&mut self, keys: &[Key], wildcard: bool) {
        if wildcard {
            self.subscribe_all = false;
        }
        for key in keys {
            self.keys.remove(key);
        }
    }

    /// Returns `true` if any key carried by `event` is subscribed.
    ///
    /// Events carrying no key (registry binding) only reach wildcard
    /// subscribers.
    #[must_use]
    pub fn matches(&self, event: &LedgerEvent) -> bool {
        self.subscribe_all || event.keys().iter().any(|k| self.keys.contains(k))
    }

    /// Returns the number of explicitly subscribed keys.
    #[must_use]
    pub fn count(&self) -> usize {
        self.keys.len()
    }

    /// Returns `true` if the wildcard subscription is active.
    #[must_use]
    pub fn is_subscribed_all(&self) -> bool {
        self.subscribe_all
    }
}
