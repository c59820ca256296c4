#![forbid(unsafe_code)]

//! Errors from registry operations.
//!
//! Only calls that would corrupt the registry fail. Lookups with bad widths
//! return `None`, and removing things that are not there is a no-op, so a
//! resize handler never has to deal with an `Err`.

use std::fmt;

/// Errors from BreakZone operations.
#[derive(Debug, Clone, PartialEq)]
pub enum BreakzoneError {
    /// A breakpoint width was negative or NaN.
    InvalidThreshold { name: String, width: f64 },
    /// A breakpoint name was empty.
    EmptyName,
    /// The name is reserved for the built-in unbounded breakpoint.
    ReservedName(String),
    /// An event type string could not be parsed.
    InvalidEventType(String),
    /// No surface was given and none is installed as ambient.
    NoSurface,
    /// Breakpoint configuration could not be read.
    Config(String),
}

impl fmt::Display for BreakzoneError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidThreshold { name, width } => {
                write!(f, "invalid width {width} for breakpoint '{name}'")
            }
            Self::EmptyName => write!(f, "breakpoint name must not be empty"),
            Self::ReservedName(name) => write!(f, "breakpoint name '{name}' is reserved"),
            Self::InvalidEventType(ty) => write!(f, "invalid event type: {ty:?}"),
            Self::NoSurface => write!(f, "no target surface given and no ambient surface installed"),
            Self::Config(msg) => write!(f, "breakpoint config error: {msg}"),
        }
    }
}

impl std::error::Error for BreakzoneError {}

impl From<serde_json::Error> for BreakzoneError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(err.to_string())
    }
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = BreakzoneError> = std::result::Result<T, E>;
