#![forbid(unsafe_code)]

//! Per-registry listener bookkeeping.
//!
//! Each registry owns one `ListenerMap`, so two registries observing the
//! same surface never see each other's listeners.
//!
//! # Invariants
//!
//! 1. Handlers for a type run in registration order.
//! 2. Listener ids are unique for the lifetime of the map.
//! 3. [`ListenerMap::snapshot`] returns owned handles; callers invoke them
//!    after releasing any borrow of the map.
//! 4. Empty per-type lists are dropped.

use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::event::{BreakpointEvent, EventType, ListenerId};

/// A listener callback.
pub type Handler = Rc<dyn Fn(&BreakpointEvent)>;

#[derive(Default)]
pub struct ListenerMap {
    next_id: u64,
    by_type: FxHashMap<EventType, Vec<(ListenerId, Handler)>>,
}

impl ListenerMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `handler` to the list for `event_type`.
    pub fn add(&mut self, event_type: EventType, handler: Handler) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);
        self.by_type.entry(event_type).or_default().push((id, handler));
        id
    }

    /// Remove listener `id` from `event_type`. Unknown types and ids are a
    /// no-op returning `false`.
    pub fn remove(&mut self, event_type: &EventType, id: ListenerId) -> bool {
        let Some(list) = self.by_type.get_mut(event_type) else {
            return false;
        };
        let before = list.len();
        list.retain(|(lid, _)| *lid != id);
        let removed = list.len() != before;
        if list.is_empty() {
            self.by_type.remove(event_type);
        }
        removed
    }

    /// Handlers currently registered for `event_type`, in order.
    #[must_use]
    pub fn snapshot(&self, event_type: &EventType) -> Vec<(ListenerId, Handler)> {
        self.by_type
            .get(event_type)
            .map(|list| list.iter().map(|(id, h)| (*id, Rc::clone(h))).collect())
            .unwrap_or_default()
    }

    /// Number of handlers for `event_type`.
    #[must_use]
    pub fn count(&self, event_type: &EventType) -> usize {
        self.by_type.get(event_type).map_or(0, Vec::len)
    }

    /// Total handlers across all types.
    #[must_use]
    pub fn total(&self) -> usize {
        self.by_type.values().map(Vec::len).sum()
    }
}

impl std::fmt::Debug for ListenerMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerMap")
            .field("types", &self.by_type.len())
            .field("total", &self.total())
            .finish()
    }
}
