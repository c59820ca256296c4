#![forbid(unsafe_code)]

//! Thread-local ambient surface.
//!
//! A browser script can always reach the global `window`. Rust has no such
//! object, so the host installs one per thread: registries constructed
//! without an explicit surface observe whatever is installed here.
//!
//! # Invariants
//!
//! 1. **Thread isolation**: installing a surface on one thread never affects
//!    another (surfaces are `!Send` anyway).
//! 2. **Stack ordering**: [`with_ambient_surface`] nests; the innermost
//!    surface wins and the previous one is restored on exit, even on panic.
//! 3. **Snapshot semantics**: a registry captures the ambient surface at
//!    construction. Replacing it later does not retarget existing
//!    registries.
//! 4. **Base survives scopes**: [`set_ambient_surface`] only touches the
//!    base slot. Scoped surfaces keep winning while their guards live, and
//!    the base is what remains once they drop.
//!
//! # Failure Modes
//!
//! | Mode | Condition | Behavior |
//! |------|-----------|----------|
//! | Nothing installed | No call to `set_ambient_surface` | `ambient_surface()` returns `None` |
//! | Guard leaked | Guard forgotten with `mem::forget` | Scoped surface stays installed |
//! | Clear under a live guard | `clear_ambient_surface` while scoped | Older guards become no-ops |

use std::cell::RefCell;
use std::rc::Rc;

use crate::surface::Surface;

#[derive(Default)]
struct AmbientState {
    base: Option<Rc<dyn Surface>>,
    scoped: Vec<Rc<dyn Surface>>,
    /// Bumped by `clear_ambient_surface`; guards from an older generation
    /// leave the stack alone.
    generation: u64,
}

impl AmbientState {
    fn current(&self) -> Option<Rc<dyn Surface>> {
        self.scoped.last().or(self.base.as_ref()).cloned()
    }
}

thread_local! {
    static AMBIENT: RefCell<AmbientState> = RefCell::new(AmbientState::default());
}

/// Replace the base ambient surface for this thread.
///
/// Scoped surfaces pushed by [`with_ambient_surface`] still take precedence
/// while active.
pub fn set_ambient_surface(surface: Rc<dyn Surface>) {
    AMBIENT.with(|state| state.borrow_mut().base = Some(surface));
}

/// The surface new registries observe by default, if one is installed.
#[must_use]
pub fn ambient_surface() -> Option<Rc<dyn Surface>> {
    AMBIENT.with(|state| state.borrow().current())
}

/// Whether any ambient surface is installed on this thread.
#[must_use]
pub fn has_ambient_surface() -> bool {
    AMBIENT.with(|state| {
        let state = state.borrow();
        state.base.is_some() || !state.scoped.is_empty()
    })
}

/// Remove the base and every scoped surface on this thread.
///
/// **Warning**: this bypasses active guards. They become no-ops, so a
/// surface pushed after the clear is never popped by an older guard.
/// Meant for test teardown.
pub fn clear_ambient_surface() {
    AMBIENT.with(|state| {
        let mut state = state.borrow_mut();
        state.base = None;
        state.scoped.clear();
        state.generation += 1;
    });
}

/// RAII guard that uninstalls a scoped ambient surface when dropped.
#[must_use]
pub struct AmbientGuard {
    generation: u64,
    _marker: std::marker::PhantomData<*const ()>,
}

impl Drop for AmbientGuard {
    fn drop(&mut self) {
        AMBIENT.with(|state| {
            let mut state = state.borrow_mut();
            if state.generation == self.generation {
                state.scoped.pop();
            }
        });
    }
}

/// Push a scoped ambient surface. It is removed when the guard drops.
#[must_use = "the surface is uninstalled when the guard is dropped"]
pub fn push_ambient_surface(surface: Rc<dyn Surface>) -> AmbientGuard {
    let generation = AMBIENT.with(|state| {
        let mut state = state.borrow_mut();
        state.scoped.push(surface);
        state.generation
    });
    AmbientGuard {
        generation,
        _marker: std::marker::PhantomData,
    }
}

/// Run `f` with `surface` installed as the ambient surface.
pub fn with_ambient_surface<F, R>(surface: Rc<dyn Surface>, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = push_ambient_surface(surface);
    f()
}
