#![forbid(unsafe_code)]

//! The breakpoint registry: named widths plus change notification.
//!
//! # Design
//!
//! [`BreakpointRegistry`] is a cheap-clone handle over shared state
//! (`Rc<RefCell<..>>`). Clones see the same breakpoints and listeners, so a
//! handler can capture a clone and query or mutate the registry while it is
//! being dispatched.
//!
//! On construction the registry subscribes to its surface for
//! `RESIZE | LOAD`. The surface callback holds only a `Weak` reference, so
//! the surface never keeps a registry alive. Dropping the last handle, or
//! calling [`BreakpointRegistry::dispose`], removes the subscription.
//!
//! # Invariants
//!
//! 1. At most one notification pair per transition: an evaluation whose
//!    breakpoint equals the stored one dispatches nothing.
//! 2. The first evaluation always transitions (the stored breakpoint starts
//!    unset).
//! 3. The generic change event is dispatched before the per-breakpoint one,
//!    and both carry the same payload.
//! 4. No `RefCell` borrow is held while handlers run.
//! 5. Listeners belong to one registry; two registries on the same surface
//!    never invoke each other's handlers.
//!
//! # Failure Modes
//!
//! | Mode | Condition | Behavior |
//! |------|-----------|----------|
//! | Invalid width | Surface reports NaN or a negative width | Evaluation is skipped, state kept |
//! | Re-entrant dispatch | Handler triggers another evaluation | Nested transition runs to completion first |
//! | Listener removed mid-dispatch | Handler removes a later listener | That listener still sees the in-flight event |

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use breakzone_core::ambient::ambient_surface;
use breakzone_core::{Orientation, Size, Surface, SurfaceCallback, SurfaceEvent, SurfaceEvents, SurfaceSubscription};
use tracing::{debug, trace, warn};

use crate::breakpoints::{BreakpointSet, MAX_BREAKPOINT, Threshold};
use crate::config::BreakpointMap;
use crate::defaults::default_breakpoints;
use crate::error::{BreakzoneError, Result};
use crate::event::{BreakpointEvent, EventType, ListenerId};
use crate::listeners::{Handler, ListenerMap};

struct RegistryState {
    breakpoints: BreakpointSet,
    last_breakpoint: Option<String>,
    surface: Rc<dyn Surface>,
    subscription: Option<SurfaceSubscription>,
    listeners: ListenerMap,
}

impl Drop for RegistryState {
    fn drop(&mut self) {
        if let Some(sub) = self.subscription.take() {
            self.surface.unsubscribe(sub);
        }
    }
}

/// Maps a surface's width to a named breakpoint and notifies listeners when
/// that breakpoint changes.
///
/// # Example
///
/// ```
/// use std::cell::RefCell;
/// use std::rc::Rc;
/// use breakzone::{BreakpointRegistry, BreakpointMap};
/// # use breakzone_core::{Surface, SurfaceCallback, SurfaceEvents, SurfaceSubscription};
/// # struct Fixed;
/// # impl Surface for Fixed {
/// #     fn inner_width(&self) -> f64 { 500.0 }
/// #     fn inner_height(&self) -> f64 { 400.0 }
/// #     fn subscribe(&self, _: SurfaceEvents, _: SurfaceCallback) -> SurfaceSubscription {
/// #         SurfaceSubscription::from_raw(1)
/// #     }
/// #     fn unsubscribe(&self, _: SurfaceSubscription) -> bool { true }
/// # }
///
/// let registry = BreakpointRegistry::builder()
///     .breakpoints(BreakpointMap::from([("small", 300.0), ("med", 600.0)]))
///     .surface(Rc::new(Fixed))
///     .build()
///     .unwrap();
///
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let log = Rc::clone(&seen);
/// registry.add_change_listener(move |ev| log.borrow_mut().push(ev.new_breakpoint.clone()));
///
/// registry.evaluate_resize();
/// assert_eq!(*seen.borrow(), vec!["med".to_string()]);
/// assert_eq!(registry.breakpoint_for_width(301.0).as_deref(), Some("med"));
/// ```
#[derive(Clone)]
pub struct BreakpointRegistry {
    inner: Rc<RefCell<RegistryState>>,
}

/// Builder for [`BreakpointRegistry`].
#[derive(Default)]
pub struct RegistryBuilder {
    breakpoints: BreakpointMap,
    defaults: Option<BreakpointMap>,
    surface: Option<Rc<dyn Surface>>,
}

impl RegistryBuilder {
    /// Initial breakpoints, merged with any given earlier.
    #[must_use]
    pub fn breakpoints(mut self, map: impl Into<BreakpointMap>) -> Self {
        for (name, width) in map.into() {
            self.breakpoints.insert(name, width);
        }
        self
    }

    /// A single initial breakpoint.
    #[must_use]
    pub fn breakpoint(mut self, name: impl Into<String>, width: f64) -> Self {
        self.breakpoints.insert(name, width);
        self
    }

    /// Defaults to apply instead of the thread's configured defaults.
    #[must_use]
    pub fn defaults(mut self, map: impl Into<BreakpointMap>) -> Self {
        self.defaults = Some(map.into());
        self
    }

    /// Surface to observe instead of the ambient one.
    #[must_use]
    pub fn surface(mut self, surface: Rc<dyn Surface>) -> Self {
        self.surface = Some(surface);
        self
    }

    /// Register `"max"`, then defaults, then initial breakpoints, and
    /// subscribe to the surface.
    pub fn build(self) -> Result<BreakpointRegistry> {
        let surface = self
            .surface
            .or_else(ambient_surface)
            .ok_or(BreakzoneError::NoSurface)?;

        let mut breakpoints = BreakpointSet::new();
        let defaults = self.defaults.unwrap_or_else(default_breakpoints);
        breakpoints.insert_all(defaults)?;
        breakpoints.insert_all(self.breakpoints)?;

        let inner = Rc::new(RefCell::new(RegistryState {
            breakpoints,
            last_breakpoint: None,
            surface: Rc::clone(&surface),
            subscription: None,
            listeners: ListenerMap::new(),
        }));

        let weak: Weak<RefCell<RegistryState>> = Rc::downgrade(&inner);
        let callback: SurfaceCallback = Rc::new(move |event: SurfaceEvent| {
            if let Some(inner) = weak.upgrade() {
                BreakpointRegistry { inner }.handle_surface_event(event);
            }
        });
        let sub = surface.subscribe(SurfaceEvents::RESIZE | SurfaceEvents::LOAD, callback);
        inner.borrow_mut().subscription = Some(sub);

        let registry = BreakpointRegistry { inner };
        debug!(
            target: "breakzone::registry",
            breakpoints = registry.inner.borrow().breakpoints.len(),
            subscription = %sub,
            "registry created"
        );
        Ok(registry)
    }
}

impl BreakpointRegistry {
    /// Start configuring a registry.
    #[must_use]
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Registry on the ambient surface with defaults only.
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Registry on `surface` with defaults only.
    pub fn with_surface(surface: Rc<dyn Surface>) -> Result<Self> {
        Self::builder().surface(surface).build()
    }

    // ── Breakpoint management ──────────────────────────────────────────

    /// Register or overwrite a single breakpoint.
    ///
    /// No event fires until the next evaluation.
    pub fn register_breakpoint(&self, name: impl Into<String>, width: f64) -> Result<()> {
        let name = name.into();
        let previous = self.inner.borrow_mut().breakpoints.insert(name.clone(), width)?;
        debug!(target: "breakzone::registry", %name, width, ?previous, "breakpoint registered");
        Ok(())
    }

    /// Register every entry of `entries`; if any is invalid, none are.
    pub fn register_breakpoints<I, K>(&self, entries: I) -> Result<usize>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let count = self.inner.borrow_mut().breakpoints.insert_all(entries)?;
        debug!(target: "breakzone::registry", count, "breakpoints registered");
        Ok(count)
    }

    /// Remove a breakpoint. Unknown names are a no-op; `"max"` is never
    /// removed. Returns whether anything was removed.
    pub fn unregister_breakpoint(&self, name: &str) -> bool {
        if name == MAX_BREAKPOINT {
            warn!(target: "breakzone::registry", "refusing to unregister the unbounded breakpoint");
            return false;
        }
        let removed = self.inner.borrow_mut().breakpoints.remove(name);
        if removed {
            debug!(target: "breakzone::registry", %name, "breakpoint unregistered");
        }
        removed
    }

    /// Whether `name` is registered.
    #[must_use]
    pub fn has_breakpoint(&self, name: &str) -> bool {
        self.inner.borrow().breakpoints.contains(name)
    }

    /// Upper width of breakpoint `name`.
    #[must_use]
    pub fn threshold_of(&self, name: &str) -> Option<Threshold> {
        self.inner.borrow().breakpoints.get(name)
    }

    /// Snapshot of the registered breakpoints.
    #[must_use]
    pub fn breakpoints(&self) -> BreakpointSet {
        self.inner.borrow().breakpoints.clone()
    }

    /// Registered thresholds, ascending; `"max"` is the trailing `+∞`.
    #[must_use]
    pub fn registered_widths(&self) -> Vec<f64> {
        self.inner.borrow().breakpoints.widths()
    }

    // ── Resolution ─────────────────────────────────────────────────────

    /// Breakpoint for `width`, or `None` if `width` is NaN, negative, or
    /// infinite.
    #[must_use]
    pub fn breakpoint_for_width(&self, width: f64) -> Option<String> {
        self.inner.borrow().breakpoints.resolve(width).map(str::to_owned)
    }

    /// Breakpoint for the surface's current width, computed live.
    #[must_use]
    pub fn active_breakpoint(&self) -> Option<String> {
        self.breakpoint_for_width(self.width())
    }

    /// Breakpoint stored by the most recent transition; `None` before the
    /// first evaluation.
    #[must_use]
    pub fn active_breakpoint_name(&self) -> Option<String> {
        self.inner.borrow().last_breakpoint.clone()
    }

    /// Whether the live active breakpoint is any of `names`.
    #[must_use]
    pub fn is_active_breakpoint(&self, names: &[&str]) -> bool {
        match self.active_breakpoint() {
            Some(current) => names.iter().any(|name| *name == current),
            None => false,
        }
    }

    // ── Surface queries ────────────────────────────────────────────────

    /// The observed surface.
    #[must_use]
    pub fn surface(&self) -> Rc<dyn Surface> {
        Rc::clone(&self.inner.borrow().surface)
    }

    /// Current surface width.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.surface().inner_width()
    }

    /// Current surface height.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.surface().inner_height()
    }

    /// Current surface size.
    #[must_use]
    pub fn size(&self) -> Size {
        self.surface().size()
    }

    /// Landscape when width ≥ height, else portrait.
    #[must_use]
    pub fn orientation(&self) -> Orientation {
        self.size().orientation()
    }

    // ── Evaluation ─────────────────────────────────────────────────────

    fn handle_surface_event(&self, event: SurfaceEvent) {
        trace!(target: "breakzone::registry", ?event, "surface event");
        self.evaluate_resize();
    }

    /// Recompute the active breakpoint and, on a transition, dispatch the
    /// change and per-breakpoint events.
    ///
    /// Runs automatically on every surface resize/load. Returns the generic
    /// change event if a transition happened.
    pub fn evaluate_resize(&self) -> Option<BreakpointEvent> {
        let width = self.width();
        let event = {
            let mut state = self.inner.borrow_mut();
            let Some(current) = state.breakpoints.resolve(width).map(str::to_owned) else {
                trace!(target: "breakzone::registry", width, "skipping evaluation for invalid width");
                return None;
            };
            if state.last_breakpoint.as_deref() == Some(current.as_str()) {
                trace!(target: "breakzone::registry", width, breakpoint = %current, "no transition");
                return None;
            }
            let old = state.last_breakpoint.replace(current.clone());
            BreakpointEvent {
                event_type: EventType::Change,
                old_breakpoint: old,
                new_breakpoint: current,
                width,
            }
        };

        debug!(
            target: "breakzone::registry",
            old = ?event.old_breakpoint,
            new = %event.new_breakpoint,
            width,
            "breakpoint transition"
        );

        self.dispatch_event(&event);
        let specific = event.retyped(EventType::breakpoint(event.new_breakpoint.clone()));
        self.dispatch_event(&specific);
        Some(event)
    }

    // ── Listeners ──────────────────────────────────────────────────────

    /// Call `handler` for every event of `event_type` dispatched by this
    /// registry.
    pub fn add_event_listener(
        &self,
        event_type: EventType,
        handler: impl Fn(&BreakpointEvent) + 'static,
    ) -> ListenerId {
        let handler: Handler = Rc::new(handler);
        self.inner.borrow_mut().listeners.add(event_type.canonical(), handler)
    }

    /// Remove a listener. Unknown types or ids are a silent no-op.
    pub fn remove_event_listener(&self, event_type: &EventType, id: ListenerId) -> bool {
        let key = event_type.clone().canonical();
        self.inner.borrow_mut().listeners.remove(&key, id)
    }

    /// Invoke every handler registered for `event.event_type`, in order.
    /// Returns how many ran.
    pub fn dispatch_event(&self, event: &BreakpointEvent) -> usize {
        let key = event.event_type.clone().canonical();
        let handlers = self.inner.borrow().listeners.snapshot(&key);
        for (_, handler) in &handlers {
            handler(event);
        }
        handlers.len()
    }

    /// Listen for every breakpoint transition.
    pub fn add_change_listener(&self, handler: impl Fn(&BreakpointEvent) + 'static) -> ListenerId {
        self.add_event_listener(EventType::Change, handler)
    }

    /// Stop a change listener.
    pub fn remove_change_listener(&self, id: ListenerId) -> bool {
        self.remove_event_listener(&EventType::Change, id)
    }

    /// Listen for transitions into breakpoint `name`.
    ///
    /// The name does not have to be registered yet.
    pub fn add_breakpoint_listener(
        &self,
        name: impl Into<String>,
        handler: impl Fn(&BreakpointEvent) + 'static,
    ) -> ListenerId {
        self.add_event_listener(EventType::breakpoint(name), handler)
    }

    /// Stop a per-breakpoint listener.
    pub fn remove_breakpoint_listener(&self, name: &str, id: ListenerId) -> bool {
        self.remove_event_listener(&EventType::breakpoint(name), id)
    }

    /// Number of handlers registered for `event_type`.
    #[must_use]
    pub fn listener_count(&self, event_type: &EventType) -> usize {
        let key = event_type.clone().canonical();
        self.inner.borrow().listeners.count(&key)
    }

    // ── Lifecycle ──────────────────────────────────────────────────────

    /// Remove this registry's surface subscription. Listeners and
    /// breakpoints are kept, and `evaluate_resize` can still be called by
    /// hand. Returns `false` if already disposed.
    pub fn dispose(&self) -> bool {
        let (surface, sub) = {
            let mut state = self.inner.borrow_mut();
            match state.subscription.take() {
                Some(sub) => (Rc::clone(&state.surface), sub),
                None => return false,
            }
        };
        surface.unsubscribe(sub);
        debug!(target: "breakzone::registry", subscription = %sub, "registry disposed");
        true
    }

    /// Whether [`dispose`](Self::dispose) has run.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.inner.borrow().subscription.is_none()
    }
}

impl fmt::Debug for BreakpointRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("BreakpointRegistry")
            .field("breakpoints", &state.breakpoints)
            .field("last_breakpoint", &state.last_breakpoint)
            .field("listeners", &state.listeners)
            .field("subscription", &state.subscription)
            .finish_non_exhaustive()
    }
}
