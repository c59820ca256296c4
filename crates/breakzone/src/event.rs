#![forbid(unsafe_code)]

//! Outbound events: what a registry dispatches to its listeners.
//!
//! Two families are produced on each transition:
//!
//! - the generic change event, type `"breakpointChange"`;
//! - a per-breakpoint event, type `"<name>Breakpoint"` (e.g.
//!   `"smallBreakpoint"`), so listeners interested in one breakpoint do not
//!   have to filter the generic stream.
//!
//! Any other string is a custom type; hosts may dispatch custom events
//! through the same listener map.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{BreakzoneError, Result};

/// Type string of the generic change event.
pub const BREAKPOINT_CHANGE_EVENT: &str = "breakpointChange";

/// Suffix appended to a breakpoint name to form its event type.
pub const BREAKPOINT_EVENT_SUFFIX: &str = "Breakpoint";

/// Key in the listener map.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum EventType {
    /// `"breakpointChange"`.
    Change,
    /// `"<name>Breakpoint"`.
    Breakpoint(String),
    /// Anything else.
    ///
    /// Built directly, this variant can spell a change or breakpoint type
    /// (`Custom("smallBreakpoint")`). Registries normalize keys with
    /// [`EventType::canonical`], so such a key still reaches the matching
    /// listeners.
    Custom(String),
}

impl EventType {
    /// Event type for transitions into the breakpoint `name`.
    #[must_use]
    pub fn breakpoint(name: impl Into<String>) -> Self {
        Self::Breakpoint(name.into())
    }

    /// Parse `ty` into its canonical key. Same as `ty.parse()`.
    pub fn custom(ty: impl AsRef<str>) -> Result<Self> {
        ty.as_ref().parse()
    }

    /// Canonical form of this key: a `Custom` string spelling the change
    /// type or `"<name>Breakpoint"` becomes that variant.
    #[must_use]
    pub fn canonical(self) -> Self {
        match self {
            Self::Custom(ty) => match ty.parse() {
                Ok(parsed) => parsed,
                Err(_) => Self::Custom(ty),
            },
            other => other,
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Change => f.write_str(BREAKPOINT_CHANGE_EVENT),
            Self::Breakpoint(name) => write!(f, "{name}{BREAKPOINT_EVENT_SUFFIX}"),
            Self::Custom(ty) => f.write_str(ty),
        }
    }
}

impl FromStr for EventType {
    type Err = BreakzoneError;

    /// Parse a type string. `"smallBreakpoint"` and
    /// `EventType::breakpoint("small")` are the same key.
    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(BreakzoneError::InvalidEventType(s.to_owned()));
        }
        if s == BREAKPOINT_CHANGE_EVENT {
            return Ok(Self::Change);
        }
        match s.strip_suffix(BREAKPOINT_EVENT_SUFFIX) {
            Some(name) if !name.is_empty() => Ok(Self::Breakpoint(name.to_owned())),
            _ => Ok(Self::Custom(s.to_owned())),
        }
    }
}

impl Serialize for EventType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Payload delivered to listeners.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BreakpointEvent {
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Breakpoint before the transition; `None` on the first evaluation.
    pub old_breakpoint: Option<String>,
    /// Breakpoint after the transition.
    pub new_breakpoint: String,
    /// Surface width that triggered the transition.
    pub width: f64,
}

impl BreakpointEvent {
    /// The same payload under a different type.
    #[must_use]
    pub fn retyped(&self, event_type: EventType) -> Self {
        Self {
            event_type,
            ..self.clone()
        }
    }

    /// JSON form, e.g. for forwarding to a script host.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Handle returned when adding a listener; pass it back to remove it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub(crate) u64);

impl ListenerId {
    /// Rebuild an id from [`raw`](Self::raw).
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

impl fmt::Display for ListenerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "listener#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn display_matches_wire_names() {
        assert_eq!(EventType::Change.to_string(), "breakpointChange");
        assert_eq!(EventType::breakpoint("small").to_string(), "smallBreakpoint");
        assert_eq!(EventType::Custom("test".into()).to_string(), "test");
    }

    #[test]
    fn parse_roundtrips_known_kinds() {
        assert_eq!("breakpointChange".parse::<EventType>().unwrap(), EventType::Change);
        assert_eq!(
            "medBreakpoint".parse::<EventType>().unwrap(),
            EventType::breakpoint("med")
        );
        assert_eq!(
            "test".parse::<EventType>().unwrap(),
            EventType::Custom("test".into())
        );
    }

    #[test]
    fn bare_suffix_is_custom() {
        assert_eq!(
            "Breakpoint".parse::<EventType>().unwrap(),
            EventType::Custom("Breakpoint".into())
        );
    }

    #[test]
    fn empty_type_is_rejected() {
        assert_eq!(
            "".parse::<EventType>(),
            Err(BreakzoneError::InvalidEventType(String::new()))
        );
    }

    #[test]
    fn canonical_folds_spelled_out_custom_keys() {
        assert_eq!(
            EventType::Custom("smallBreakpoint".into()).canonical(),
            EventType::breakpoint("small")
        );
        assert_eq!(
            EventType::Custom("breakpointChange".into()).canonical(),
            EventType::Change
        );
        assert_eq!(
            EventType::Custom("test".into()).canonical(),
            EventType::Custom("test".into())
        );
        assert_eq!(
            EventType::Custom(String::new()).canonical(),
            EventType::Custom(String::new())
        );
        assert_eq!(EventType::custom("medBreakpoint").unwrap(), EventType::breakpoint("med"));
        assert!(EventType::custom("").is_err());
    }

    #[test]
    fn case_distinguishes_breakpoints() {
        assert_ne!(EventType::breakpoint("small"), EventType::breakpoint("Small"));
    }

    #[test]
    fn event_json_shape() {
        let ev = BreakpointEvent {
            event_type: EventType::Change,
            old_breakpoint: None,
            new_breakpoint: "med".into(),
            width: 500.0,
        };
        assert_eq!(
            ev.to_json().unwrap(),
            r#"{"type":"breakpointChange","oldBreakpoint":null,"newBreakpoint":"med","width":500.0}"#
        );
    }

    #[test]
    fn retyped_keeps_payload() {
        let ev = BreakpointEvent {
            event_type: EventType::Change,
            old_breakpoint: Some("small".into()),
            new_breakpoint: "med".into(),
            width: 450.0,
        };
        let specific = ev.retyped(EventType::breakpoint("med"));
        assert_eq!(specific.event_type, EventType::breakpoint("med"));
        assert_eq!(specific.old_breakpoint, ev.old_breakpoint);
        assert_eq!(specific.width, ev.width);
    }
}
