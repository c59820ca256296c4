#![forbid(unsafe_code)]

//! Default breakpoints inherited by every new registry on this thread.
//!
//! Registries built without an explicit `defaults(..)` call register the
//! table configured here after `"max"` and before their own initial
//! breakpoints, so instance values win on name collisions.
//!
//! # Invariants
//!
//! 1. **Thread isolation**: defaults set on one thread never leak into
//!    another, which keeps parallel tests independent.
//! 2. **Snapshot semantics**: a registry copies the defaults at construction.
//!    Later changes do not touch existing registries.
//! 3. **Scoped overrides nest**: [`with_default_breakpoints`] restores the
//!    previous table on exit, even on panic.
//! 4. **Validated on install**: a table with a reserved name or a bad width
//!    is rejected when set, and the current table stays in place.
//!
//! # Failure Modes
//!
//! | Mode | Condition | Behavior |
//! |------|-----------|----------|
//! | Bad table | `"max"`, empty name, or invalid width | `Err`, nothing installed |
//! | Malformed env value | `BREAKZONE_DEFAULT_BREAKPOINTS` is not a JSON object | `Config` error |
//! | Reset under a live guard | `reset_default_breakpoints` while scoped | Older guards become no-ops |

use std::cell::RefCell;

use tracing::debug;

use crate::config::BreakpointMap;
use crate::error::Result;

#[derive(Default)]
struct DefaultsState {
    base: BreakpointMap,
    scoped: Vec<BreakpointMap>,
    /// Bumped by `reset_default_breakpoints`; guards from an older
    /// generation leave the stack alone.
    generation: u64,
}

thread_local! {
    static DEFAULTS: RefCell<DefaultsState> = RefCell::new(DefaultsState::default());
}

/// The table new registries inherit.
#[must_use]
pub fn default_breakpoints() -> BreakpointMap {
    DEFAULTS.with(|state| {
        let state = state.borrow();
        state.scoped.last().unwrap_or(&state.base).clone()
    })
}

/// Replace the base default table for this thread.
///
/// Scoped tables pushed by [`with_default_breakpoints`] still take
/// precedence while active.
pub fn set_default_breakpoints(map: BreakpointMap) -> Result<()> {
    map.validate()?;
    debug!(target: "breakzone::defaults", entries = map.len(), "default breakpoints set");
    DEFAULTS.with(|state| state.borrow_mut().base = map);
    Ok(())
}

/// Empty the base table and drop any scoped overrides.
///
/// **Warning**: this bypasses active guards. They become no-ops, so a table
/// pushed after the reset is never popped by an older guard.
pub fn reset_default_breakpoints() {
    debug!(target: "breakzone::defaults", "default breakpoints reset");
    DEFAULTS.with(|state| {
        let mut state = state.borrow_mut();
        state.base = BreakpointMap::new();
        state.scoped.clear();
        state.generation += 1;
    });
}

/// Load the base table from `BREAKZONE_DEFAULT_BREAKPOINTS`.
///
/// Returns `true` if the variable was set and applied. A malformed or
/// invalid value is an error and leaves the current table untouched.
pub fn init_default_breakpoints_from_env() -> Result<bool> {
    init_default_breakpoints_with(|key| std::env::var(key).ok())
}

/// [`init_default_breakpoints_from_env`] with a custom environment lookup.
pub fn init_default_breakpoints_with<F>(get_env: F) -> Result<bool>
where
    F: Fn(&str) -> Option<String>,
{
    match BreakpointMap::from_env_with(get_env)? {
        Some(map) => {
            set_default_breakpoints(map)?;
            Ok(true)
        }
        None => Ok(false),
    }
}

/// RAII guard that pops a scoped default table when dropped.
#[must_use]
pub struct DefaultsGuard {
    generation: u64,
    _marker: std::marker::PhantomData<*const ()>,
}

impl Drop for DefaultsGuard {
    fn drop(&mut self) {
        DEFAULTS.with(|state| {
            let mut state = state.borrow_mut();
            if state.generation == self.generation {
                state.scoped.pop();
            }
        });
    }
}

/// Push a scoped default table after validating it. The previous table is
/// restored when the guard drops.
pub fn push_default_breakpoints(map: BreakpointMap) -> Result<DefaultsGuard> {
    map.validate()?;
    let generation = DEFAULTS.with(|state| {
        let mut state = state.borrow_mut();
        state.scoped.push(map);
        state.generation
    });
    Ok(DefaultsGuard {
        generation,
        _marker: std::marker::PhantomData,
    })
}

/// Run `f` with `map` as the default table.
///
/// `f` does not run if `map` is invalid.
pub fn with_default_breakpoints<F, R>(map: BreakpointMap, f: F) -> Result<R>
where
    F: FnOnce() -> R,
{
    let _guard = push_default_breakpoints(map)?;
    Ok(f())
}
