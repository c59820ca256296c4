#![forbid(unsafe_code)]

//! The [`Surface`] trait: a window-like object whose size can be observed.
//!
//! # Invariants
//!
//! 1. A subscription receives only the event kinds in its mask.
//! 2. Subscribers are called in subscription order.
//! 3. After `unsubscribe` returns, the callback is never called again.
//! 4. Implementations must not hold interior borrows while invoking
//!    callbacks: a callback may query the surface or (un)subscribe.
//!
//! # Failure Modes
//!
//! | Mode | Condition | Behavior |
//! |------|-----------|----------|
//! | Unknown subscription | `unsubscribe` with a stale handle | Returns `false` |
//! | Subscription leaked | Owner never unsubscribes | Callback lives as long as the surface |

use std::fmt;
use std::rc::Rc;

use crate::event::{SurfaceEvent, SurfaceEvents};
use crate::geometry::{Orientation, Size};

/// Callback invoked for each matching surface event.
pub type SurfaceCallback = Rc<dyn Fn(SurfaceEvent)>;

/// Handle identifying one subscription on one surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SurfaceSubscription(u64);

impl SurfaceSubscription {
    /// Wrap a raw id. Surfaces allocate ids; consumers only store them.
    #[must_use]
    pub const fn from_raw(id: u64) -> Self {
        Self(id)
    }

    /// The raw id.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SurfaceSubscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// A window-like object with a size and resize/load events.
///
/// Surfaces are single-threaded and shared via `Rc`; every method takes
/// `&self`, so implementations use interior mutability for their
/// subscriber lists.
pub trait Surface {
    /// Current inner width.
    fn inner_width(&self) -> f64;

    /// Current inner height.
    fn inner_height(&self) -> f64;

    /// Current inner size.
    fn size(&self) -> Size {
        Size::new(self.inner_width(), self.inner_height())
    }

    /// Current orientation. Square surfaces are landscape.
    fn orientation(&self) -> Orientation {
        self.size().orientation()
    }

    /// Register `callback` for every event whose kind is in `events`.
    fn subscribe(&self, events: SurfaceEvents, callback: SurfaceCallback) -> SurfaceSubscription;

    /// Remove a subscription. Returns `false` if it was not registered.
    fn unsubscribe(&self, subscription: SurfaceSubscription) -> bool;
}

impl fmt::Debug for dyn Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.inner_width())
            .field("height", &self.inner_height())
            .finish_non_exhaustive()
    }
}
