#![forbid(unsafe_code)]

//! Named width breakpoints with resize-driven change notifications.
//!
//! A [`BreakpointRegistry`] watches a [`Surface`](breakzone_core::Surface),
//! maps its width onto a set of named thresholds (`"small" → 480`,
//! `"medium" → 960`, ...) and tells listeners whenever the active name
//! changes. The reserved breakpoint `"max"` covers every width above the
//! largest finite threshold.
//!
//! Breakpoint maps can be given per registry, inherited from per-thread
//! defaults ([`defaults`]), or loaded from JSON ([`config`]).

pub mod breakpoints;
pub mod config;
pub mod defaults;
pub mod error;
pub mod event;
pub mod listeners;
pub mod registry;

pub use breakpoints::{BreakpointSet, MAX_BREAKPOINT, Threshold};
pub use config::BreakpointMap;
pub use defaults::{
    default_breakpoints, init_default_breakpoints_from_env, init_default_breakpoints_with,
    push_default_breakpoints, reset_default_breakpoints, set_default_breakpoints,
    with_default_breakpoints,
};
pub use error::{BreakzoneError, Result};
pub use event::{BREAKPOINT_CHANGE_EVENT, BreakpointEvent, EventType, ListenerId};
pub use registry::{BreakpointRegistry, RegistryBuilder};
