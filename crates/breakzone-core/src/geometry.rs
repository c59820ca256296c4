#![forbid(unsafe_code)]

//! Surface dimensions and orientation.

use std::fmt;

/// Inner dimensions of a surface, in CSS-style pixels.
///
/// Dimensions are `f64` because hosts report fractional sizes (zoomed
/// browsers, HiDPI scaling). No validation happens here: a misbehaving host
/// may report NaN, and consumers decide how to treat it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    /// Create a new size.
    #[must_use]
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Orientation implied by this size. Square sizes are landscape.
    #[must_use]
    pub fn orientation(self) -> Orientation {
        if self.width >= self.height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

impl From<(f64, f64)> for Size {
    fn from((width, height): (f64, f64)) -> Self {
        Self { width, height }
    }
}

/// Whether a surface is wider than it is tall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    Landscape,
    Portrait,
}

impl Orientation {
    /// Lowercase name, matching the strings hosts traditionally use.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Landscape => "landscape",
            Self::Portrait => "portrait",
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
