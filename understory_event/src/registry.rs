// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;
use smallvec::SmallVec;

use crate::dispatcher::Listener;
use crate::event::EventType;

/// Handle returned by [`EventDispatcher::add_listener`], used for removal.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

/// Listeners captured for one delivery.
pub type Snapshot<H, K> = SmallVec<[Listener<H, K>; 4]>;

struct Entry<H, K> {
    id: ListenerId,
    listener: Listener<H, K>,
}

/// Listeners grouped by event type, each group in registration order.
pub struct EventDispatcher<H, K> {
    listeners: HashMap<EventType, Vec<Entry<H, K>>>,
    next_id: u64,
}

impl<H, K> Default for EventDispatcher<H, K> {
    fn default() -> Self {
        Self {
            listeners: HashMap::new(),
            next_id: 0,
        }
    }
}

impl<H, K> fmt::Debug for EventDispatcher<H, K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for (kind, entries) in &self.listeners {
            map.entry(&kind.as_str(), &entries.len());
        }
        map.finish()
    }
}

impl<H, K> EventDispatcher<H, K> {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for `kind`; it runs after previously registered ones.
    pub fn add_listener(&mut self, kind: EventType, listener: Listener<H, K>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners
            .entry(kind)
            .or_default()
            .push(Entry { id, listener });
        id
    }

    /// Remove a listener. Returns `false` if it was not registered for `kind`.
    pub fn remove_listener(&mut self, kind: &EventType, id: ListenerId) -> bool {
        let Some(entries) = self.listeners.get_mut(kind) else {
            return false;
        };
        let before = entries.len();
        entries.retain(|e| e.id != id);
        let removed = entries.len() != before;
        if entries.is_empty() {
            self.listeners.remove(kind);
        }
        removed
    }

    /// Whether at least one listener is registered for `kind`.
    pub fn has_listener(&self, kind: &EventType) -> bool {
        self.listeners.get(kind).is_some_and(|e| !e.is_empty())
    }

    /// Clone out the listeners for `kind`, in registration order.
    ///
    /// Deliver from the snapshot so that listeners may mutate the registry
    /// while they run.
    pub fn snapshot(&self, kind: &EventType) -> Snapshot<H, K> {
        self.listeners
            .get(kind)
            .map(|entries| entries.iter().map(|e| e.listener.clone()).collect())
            .unwrap_or_default()
    }

    /// Remove every listener.
    pub fn clear(&mut self) {
        self.listeners.clear();
    }

    /// Whether no listener is registered at all.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}
