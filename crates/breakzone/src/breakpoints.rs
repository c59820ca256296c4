#![forbid(unsafe_code)]

//! The breakpoint set and width resolution.
//!
//! A breakpoint is a named *upper* width threshold. The active breakpoint for
//! a width is the one with the smallest threshold still ≥ that width.
//!
//! # Invariants
//!
//! 1. `"max"` is always present with an unbounded threshold, so every valid
//!    width resolves to some name.
//! 2. Stored finite thresholds are non-negative and finite. A width of `+∞`
//!    is stored as `Unbounded`, so another name can share `"max"`'s tier.
//! 3. Resolution is minimal: no other entry with a smaller threshold also
//!    covers the width.
//! 4. Ties on identical thresholds resolve to the lexicographically smallest
//!    name (entries live in a `BTreeMap`, scanned in key order, and only a
//!    strictly smaller threshold replaces the current best).
//!
//! # Failure Modes
//!
//! | Input | Behavior |
//! |-------|----------|
//! | NaN, negative, or infinite width to `resolve` | `None` |
//! | Negative or NaN threshold to `insert` | `InvalidThreshold`, set unchanged |
//! | `+∞` threshold to `insert` | Stored as `Unbounded`; ties with `"max"` go by name |
//! | `insert("max", ..)` or `remove("max")` | Refused, set unchanged |
//! | `remove` of an unknown name | `false` |

use std::collections::BTreeMap;

use crate::error::{BreakzoneError, Result};

/// Name of the built-in unbounded breakpoint.
pub const MAX_BREAKPOINT: &str = "max";

/// Upper width bound of a breakpoint.
///
/// Ordering puts every `Finite` value below `Unbounded`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub enum Threshold {
    Finite(f64),
    Unbounded,
}

impl Threshold {
    /// The threshold as a number, `+∞` for `Unbounded`.
    #[must_use]
    pub const fn as_f64(self) -> f64 {
        match self {
            Self::Finite(w) => w,
            Self::Unbounded => f64::INFINITY,
        }
    }

    /// Whether a surface of `width` falls inside this breakpoint.
    #[must_use]
    pub fn covers(self, width: f64) -> bool {
        match self {
            Self::Finite(max) => width <= max,
            Self::Unbounded => true,
        }
    }

    /// Threshold for a registration width: `+∞` is `Unbounded`.
    #[must_use]
    pub fn from_width(width: f64) -> Self {
        if width == f64::INFINITY {
            Self::Unbounded
        } else {
            Self::Finite(width)
        }
    }

    /// Whether this is the unbounded threshold.
    #[must_use]
    pub const fn is_unbounded(self) -> bool {
        matches!(self, Self::Unbounded)
    }
}

/// Whether `width` is something resolution will accept.
#[inline]
#[must_use]
pub fn is_valid_width(width: f64) -> bool {
    width.is_finite() && width >= 0.0
}

/// Whether `width` can be registered as a threshold: non-negative, not
/// NaN, possibly `+∞`.
#[inline]
#[must_use]
pub fn is_valid_threshold(width: f64) -> bool {
    width >= 0.0
}

/// Named breakpoints, always including [`MAX_BREAKPOINT`].
#[derive(Debug, Clone, PartialEq)]
pub struct BreakpointSet {
    entries: BTreeMap<String, Threshold>,
}

impl Default for BreakpointSet {
    fn default() -> Self {
        Self::new()
    }
}

impl BreakpointSet {
    /// A set holding only the unbounded `"max"` breakpoint.
    #[must_use]
    pub fn new() -> Self {
        let mut entries = BTreeMap::new();
        entries.insert(MAX_BREAKPOINT.to_owned(), Threshold::Unbounded);
        Self { entries }
    }

    /// Check that `name`/`width` could be inserted.
    pub fn validate(name: &str, width: f64) -> Result<()> {
        if name.is_empty() {
            return Err(BreakzoneError::EmptyName);
        }
        if name == MAX_BREAKPOINT {
            return Err(BreakzoneError::ReservedName(name.to_owned()));
        }
        if !is_valid_threshold(width) {
            return Err(BreakzoneError::InvalidThreshold {
                name: name.to_owned(),
                width,
            });
        }
        Ok(())
    }

    /// Store `width` under `name`, returning the previous threshold.
    pub fn insert(&mut self, name: impl Into<String>, width: f64) -> Result<Option<Threshold>> {
        let name = name.into();
        Self::validate(&name, width)?;
        Ok(self.entries.insert(name, Threshold::from_width(width)))
    }

    /// Insert every entry, or none of them if any is invalid.
    pub fn insert_all<I, K>(&mut self, entries: I) -> Result<usize>
    where
        I: IntoIterator<Item = (K, f64)>,
        K: Into<String>,
    {
        let staged: Vec<(String, f64)> = entries
            .into_iter()
            .map(|(name, width)| (name.into(), width))
            .collect();
        for (name, width) in &staged {
            Self::validate(name, *width)?;
        }
        let count = staged.len();
        for (name, width) in staged {
            self.entries.insert(name, Threshold::from_width(width));
        }
        Ok(count)
    }

    /// Remove `name`. Returns `false` if it was absent or reserved.
    pub fn remove(&mut self, name: &str) -> bool {
        if name == MAX_BREAKPOINT {
            return false;
        }
        self.entries.remove(name).is_some()
    }

    /// Threshold registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<Threshold> {
        self.entries.get(name).copied()
    }

    /// Whether `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Name of the breakpoint active at `width`, or `None` for an invalid
    /// width.
    #[must_use]
    pub fn resolve(&self, width: f64) -> Option<&str> {
        if !is_valid_width(width) {
            return None;
        }
        let mut best: Option<(&str, Threshold)> = None;
        for (name, &threshold) in &self.entries {
            if !threshold.covers(width) {
                continue;
            }
            match best {
                Some((_, current)) if threshold >= current => {}
                _ => best = Some((name.as_str(), threshold)),
            }
        }
        best.map(|(name, _)| name)
    }

    /// All thresholds in ascending order; `"max"` contributes `+∞`.
    #[must_use]
    pub fn widths(&self) -> Vec<f64> {
        let mut widths: Vec<f64> = self.entries.values().map(|t| t.as_f64()).collect();
        widths.sort_by(f64::total_cmp);
        widths
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Threshold)> {
        self.entries.iter().map(|(name, &t)| (name.as_str(), t))
    }

    /// Number of entries, `"max"` included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`: `"max"` cannot be removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
