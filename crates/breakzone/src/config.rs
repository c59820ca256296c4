#![forbid(unsafe_code)]

//! Breakpoint maps as configuration values.
//!
//! A [`BreakpointMap`] is the plain `name → width` table a host hands to a
//! registry, e.g. `{"small": 480, "medium": 960}`. It deserializes from a
//! JSON object, so the same table can live in a config file, an environment
//! variable, or a literal in code.
//!
//! Parsing does not validate; [`BreakpointMap::validate`] applies the same
//! rules as registration, and a map with any bad entry is rejected as a whole.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::breakpoints::BreakpointSet;
use crate::error::Result;

/// Environment variable holding a JSON default breakpoint map.
pub const DEFAULTS_ENV: &str = "BREAKZONE_DEFAULT_BREAKPOINTS";

/// An ordered `name → width` table.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BreakpointMap(BTreeMap<String, f64>);

impl BreakpointMap {
    /// Empty map.
    #[must_use]
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, width: f64) -> Self {
        self.0.insert(name.into(), width);
        self
    }

    /// Insert or overwrite an entry.
    pub fn insert(&mut self, name: impl Into<String>, width: f64) -> Option<f64> {
        self.0.insert(name.into(), width)
    }

    /// Width stored under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Check every entry the way registration would, without registering.
    pub fn validate(&self) -> Result<()> {
        self.iter()
            .try_for_each(|(name, width)| BreakpointSet::validate(name, width))
    }

    /// Parse a JSON object of `name: width` pairs.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize back to a JSON object.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Read a map from [`DEFAULTS_ENV`] using a custom environment lookup.
    ///
    /// Returns `Ok(None)` when the variable is unset or blank.
    pub fn from_env_with<F>(get_env: F) -> Result<Option<Self>>
    where
        F: Fn(&str) -> Option<String>,
    {
        match get_env(DEFAULTS_ENV) {
            Some(raw) if !raw.trim().is_empty() => Self::from_json(&raw).map(Some),
            _ => Ok(None),
        }
    }

    /// Read a map from the process environment.
    pub fn from_env() -> Result<Option<Self>> {
        Self::from_env_with(|key| std::env::var(key).ok())
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for BreakpointMap {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

impl<K: Into<String>, const N: usize> From<[(K, f64); N]> for BreakpointMap {
    fn from(entries: [(K, f64); N]) -> Self {
        entries.into_iter().collect()
    }
}

impl IntoIterator for BreakpointMap {
    type Item = (String, f64);
    type IntoIter = std::collections::btree_map::IntoIter<String, f64>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}
