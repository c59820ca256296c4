#![forbid(unsafe_code)]

//! Inbound events emitted by a surface.
//!
//! A surface produces two kinds of event: `Resize` whenever its inner size
//! changes, and `Load` once its content has finished loading. Subscribers
//! select the kinds they care about with a [`SurfaceEvents`] mask.

use bitflags::bitflags;

use crate::geometry::Size;

bitflags! {
    /// Mask of surface event kinds a subscriber wants to receive.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SurfaceEvents: u8 {
        const RESIZE = 0b01;
        const LOAD = 0b10;
    }
}

/// A single event delivered to a surface subscriber.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SurfaceEvent {
    /// The surface's inner size changed. Carries the new size.
    Resize(Size),
    /// The surface's owning document finished loading.
    Load,
}

impl SurfaceEvent {
    /// The mask bit this event belongs to.
    #[must_use]
    pub const fn kind(&self) -> SurfaceEvents {
        match self {
            Self::Resize(_) => SurfaceEvents::RESIZE,
            Self::Load => SurfaceEvents::LOAD,
        }
    }

    /// Whether a subscriber listening for `mask` should see this event.
    #[must_use]
    pub fn matches(&self, mask: SurfaceEvents) -> bool {
        mask.contains(self.kind())
    }
}
