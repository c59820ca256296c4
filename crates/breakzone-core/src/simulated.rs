#![forbid(unsafe_code)]

//! In-memory [`Surface`] for tests and headless hosts.
//!
//! `SimulatedSurface` plays the role of a popup window in a browser test
//! harness: tests resize it with [`SimulatedSurface::resize_to`] and fire
//! [`SimulatedSurface::fire_load`] to stand in for the document load event.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::event::{SurfaceEvent, SurfaceEvents};
use crate::geometry::Size;
use crate::surface::{Surface, SurfaceCallback, SurfaceSubscription};

struct Entry {
    id: SurfaceSubscription,
    events: SurfaceEvents,
    callback: SurfaceCallback,
}

/// A surface whose size is set by the caller.
pub struct SimulatedSurface {
    size: Cell<Size>,
    next_id: Cell<u64>,
    subscribers: RefCell<Vec<Entry>>,
}

impl SimulatedSurface {
    /// Create a surface with the given inner size, already wrapped in `Rc`
    /// so it can be handed to registries as `Rc<dyn Surface>`.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Rc<Self> {
        Rc::new(Self {
            size: Cell::new(Size::new(width, height)),
            next_id: Cell::new(1),
            subscribers: RefCell::new(Vec::new()),
        })
    }

    /// Change the inner size and deliver a `Resize` event.
    ///
    /// The event is delivered even if the size did not change, matching
    /// hosts that report every resize request.
    pub fn resize_to(&self, width: f64, height: f64) {
        let size = Size::new(width, height);
        self.size.set(size);
        self.emit(SurfaceEvent::Resize(size));
    }

    /// Change the inner size without notifying anyone.
    pub fn set_size_silently(&self, width: f64, height: f64) {
        self.size.set(Size::new(width, height));
    }

    /// Deliver a `Load` event.
    pub fn fire_load(&self) {
        self.emit(SurfaceEvent::Load);
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.borrow().len()
    }

    fn emit(&self, event: SurfaceEvent) {
        // Snapshot first: callbacks may unsubscribe or resize re-entrantly.
        let callbacks: Vec<(SurfaceSubscription, SurfaceCallback)> = self
            .subscribers
            .borrow()
            .iter()
            .filter(|entry| event.matches(entry.events))
            .map(|entry| (entry.id, Rc::clone(&entry.callback)))
            .collect();

        for (id, cb) in callbacks {
            // Skip subscriptions removed by an earlier callback in this cycle.
            let still_live = self.subscribers.borrow().iter().any(|e| e.id == id);
            if still_live {
                cb(event);
            }
        }
    }
}

impl Surface for SimulatedSurface {
    fn inner_width(&self) -> f64 {
        self.size.get().width
    }

    fn inner_height(&self) -> f64 {
        self.size.get().height
    }

    fn size(&self) -> Size {
        self.size.get()
    }

    fn subscribe(&self, events: SurfaceEvents, callback: SurfaceCallback) -> SurfaceSubscription {
        let id = SurfaceSubscription::from_raw(self.next_id.get());
        self.next_id.set(id.raw() + 1);
        self.subscribers.borrow_mut().push(Entry {
            id,
            events,
            callback,
        });
        id
    }

    fn unsubscribe(&self, subscription: SurfaceSubscription) -> bool {
        let mut subs = self.subscribers.borrow_mut();
        let before = subs.len();
        subs.retain(|entry| entry.id != subscription);
        subs.len() != before
    }
}

impl std::fmt::Debug for SimulatedSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimulatedSurface")
            .field("size", &self.size.get())
            .field("subscribers", &self.subscriber_count())
            .finish()
    }
}
