#![forbid(unsafe_code)]

//! Core: the surface abstraction that BreakZone observes.
//!
//! # Role in BreakZone
//! `breakzone-core` is the input layer. It defines what a *surface* is (a
//! window-like object with a width, a height, and resize/load events), the
//! normalized events a surface emits, and the thread-local ambient surface
//! that stands in for a browser's global `window`.
//!
//! # Primary responsibilities
//! - **Surface**: trait for anything whose size can be observed.
//! - **SurfaceEvent**: canonical inbound events (resize, load).
//! - **Geometry**: [`geometry::Size`] and [`geometry::Orientation`].
//! - **Ambient surface**: per-thread default target for new registries.
//!
//! # How it fits in the system
//! The registry (`breakzone`) subscribes to a [`surface::Surface`] and turns
//! raw size changes into named breakpoint transitions. Nothing here knows
//! about breakpoints.

pub mod ambient;
pub mod event;
pub mod geometry;
pub mod logging;
pub mod surface;

#[cfg(any(test, feature = "test-helpers"))]
pub mod simulated;

// Re-export tracing macros at crate root for ergonomic use.
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

pub use event::{SurfaceEvent, SurfaceEvents};
pub use geometry::{Orientation, Size};
pub use surface::{Surface, SurfaceCallback, SurfaceSubscription};

#[cfg(any(test, feature = "test-helpers"))]
pub use simulated::SimulatedSurface;
