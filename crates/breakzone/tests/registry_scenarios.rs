//! End-to-end registry scenarios on a simulated surface.
//!
//! Each test drives a `SimulatedSurface` the way a host window would
//! (load, then a series of resizes) and asserts on what listeners observed.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use breakzone::{
    BreakpointEvent, BreakpointMap, BreakpointRegistry, BreakzoneError, EventType, ListenerId,
    MAX_BREAKPOINT, Threshold, reset_default_breakpoints, set_default_breakpoints,
    with_default_breakpoints,
};
use breakzone_core::ambient::{clear_ambient_surface, with_ambient_surface};
use breakzone_core::{Orientation, SimulatedSurface, Surface};
use pretty_assertions::assert_eq;
use tracing::{Level, info};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(Level::DEBUG)
        .try_init();
}

fn registry(surface: &Rc<SimulatedSurface>, map: BreakpointMap) -> BreakpointRegistry {
    BreakpointRegistry::builder()
        .defaults(BreakpointMap::new())
        .breakpoints(map)
        .surface(surface.clone())
        .build()
        .unwrap()
}

fn counter(registry: &BreakpointRegistry, ty: EventType) -> Rc<Cell<u32>> {
    let count = Rc::new(Cell::new(0));
    let c = Rc::clone(&count);
    registry.add_event_listener(ty, move |_| c.set(c.get() + 1));
    count
}

#[test]
fn still_page_getters_and_setters() {
    init_tracing();
    let surface = SimulatedSurface::new(1024.0, 768.0);
    let bz = registry(&surface, BreakpointMap::new());

    assert_eq!(bz.active_breakpoint().as_deref(), Some(MAX_BREAKPOINT));
    assert_eq!(bz.breakpoint_for_width(100.0).as_deref(), Some(MAX_BREAKPOINT));
    assert_eq!(bz.breakpoint_for_width(f64::NAN), None);
    assert_eq!(bz.breakpoint_for_width(-1.0), None);

    bz.register_breakpoint("small", 300.0).unwrap();
    assert!(bz.has_breakpoint("small"));
    assert_eq!(bz.threshold_of("small"), Some(Threshold::Finite(300.0)));
    assert_eq!(bz.breakpoint_for_width(300.0).as_deref(), Some("small"));
    assert_eq!(bz.breakpoint_for_width(301.0).as_deref(), Some(MAX_BREAKPOINT));

    bz.register_breakpoints([("med", 600.0), ("large", 900.0)])
        .unwrap();
    assert_eq!(bz.registered_widths(), vec![300.0, 600.0, 900.0, f64::INFINITY]);
    assert_eq!(bz.breakpoint_for_width(301.0).as_deref(), Some("med"));

    assert!(bz.unregister_breakpoint("small"));
    assert!(!bz.has_breakpoint("small"));
    assert_eq!(bz.breakpoint_for_width(250.0).as_deref(), Some("med"));
    assert!(!bz.unregister_breakpoint("small"));
    assert_eq!(bz.threshold_of("small"), None);

    assert_eq!(bz.width(), 1024.0);
    assert_eq!(bz.height(), 768.0);
    assert_eq!(surface.inner_width(), bz.surface().inner_width());
}

#[test]
fn resizing_walks_through_breakpoints() {
    init_tracing();
    let surface = SimulatedSurface::new(500.0, 500.0);
    let bz = registry(&surface, BreakpointMap::new());
    bz.register_breakpoint("small", 300.0).unwrap();
    bz.register_breakpoints(BreakpointMap::from([("med", 600.0), ("large", 900.0)]))
        .unwrap();

    surface.fire_load();
    assert_eq!(bz.active_breakpoint().as_deref(), Some("med"));
    assert_eq!(bz.active_breakpoint_name().as_deref(), Some("med"));

    let changes: Rc<RefCell<Vec<BreakpointEvent>>> = Rc::default();
    let large_hits = counter(&bz, EventType::breakpoint("large"));
    let max_hits = counter(&bz, EventType::breakpoint(MAX_BREAKPOINT));

    // The change handler removes itself, then pushes the surface into "max".
    let slot: Rc<Cell<Option<ListenerId>>> = Rc::default();
    let (log, slot_cb, handle, surf) = (
        Rc::clone(&changes),
        Rc::clone(&slot),
        bz.clone(),
        Rc::clone(&surface),
    );
    let id = bz.add_change_listener(move |ev| {
        log.borrow_mut().push(ev.clone());
        if let Some(id) = slot_cb.get() {
            handle.remove_change_listener(id);
        }
        surf.resize_to(1200.0, 500.0);
    });
    slot.set(Some(id));

    let seen_large = Rc::new(RefCell::new(None));
    let (seen, handle) = (Rc::clone(&seen_large), bz.clone());
    bz.add_breakpoint_listener("large", move |ev| {
        *seen.borrow_mut() = Some((ev.old_breakpoint.clone(), ev.new_breakpoint.clone()));
        info!(active = ?handle.active_breakpoint_name(), "large listener");
    });

    surface.resize_to(800.0, 500.0);

    let changes = changes.borrow();
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].old_breakpoint.as_deref(), Some("med"));
    assert_eq!(changes[0].new_breakpoint, "large");
    assert_eq!(changes[0].width, 800.0);

    // The nested resize already moved to "max" before the outer
    // per-breakpoint event was dispatched.
    assert_eq!(
        *seen_large.borrow(),
        Some((Some("med".to_string()), "large".to_string()))
    );
    assert_eq!(large_hits.get(), 1);
    assert_eq!(max_hits.get(), 1);
    assert_eq!(bz.active_breakpoint_name().as_deref(), Some(MAX_BREAKPOINT));
    assert_eq!(bz.listener_count(&EventType::Change), 0);
}

#[test]
fn orientation_tracks_surface_shape() {
    let surface = SimulatedSurface::new(800.0, 600.0);
    let bz = registry(&surface, BreakpointMap::new());
    let observed = Rc::new(RefCell::new(Vec::new()));

    surface.resize_to(480.0, 640.0);
    observed.borrow_mut().push(bz.orientation());
    surface.resize_to(640.0, 480.0);
    observed.borrow_mut().push(bz.orientation());
    surface.resize_to(500.0, 500.0);
    observed.borrow_mut().push(bz.orientation());

    assert_eq!(
        *observed.borrow(),
        vec![
            Orientation::Portrait,
            Orientation::Landscape,
            Orientation::Landscape
        ]
    );
}

#[test]
fn thread_defaults_apply_to_new_registries() {
    reset_default_breakpoints();
    set_default_breakpoints(BreakpointMap::from([("xxx", 123.0)])).unwrap();
    let surface = SimulatedSurface::new(800.0, 600.0);
    let bz = BreakpointRegistry::with_surface(surface.clone()).unwrap();
    assert_eq!(bz.breakpoint_for_width(100.0).as_deref(), Some("xxx"));

    // Existing registries keep their snapshot.
    reset_default_breakpoints();
    assert!(bz.has_breakpoint("xxx"));
    let fresh = BreakpointRegistry::with_surface(surface.clone()).unwrap();
    assert!(!fresh.has_breakpoint("xxx"));
}

#[test]
fn scoped_defaults_and_ambient_surface() {
    reset_default_breakpoints();
    clear_ambient_surface();
    let surface = SimulatedSurface::new(200.0, 600.0);
    let bz = with_ambient_surface(surface.clone(), || {
        with_default_breakpoints(BreakpointMap::from([("tiny", 250.0)]), || {
            BreakpointRegistry::builder()
                .breakpoint("small", 400.0)
                .build()
                .unwrap()
        })
        .unwrap()
    });
    assert_eq!(bz.active_breakpoint().as_deref(), Some("tiny"));
    assert!(bz.has_breakpoint("small"));

    assert_eq!(
        BreakpointRegistry::new().unwrap_err(),
        BreakzoneError::NoSurface
    );
}

#[test]
fn rejected_defaults_do_not_poison_later_registries() {
    reset_default_breakpoints();
    set_default_breakpoints(BreakpointMap::from([("xxx", 123.0)])).unwrap();
    assert!(set_default_breakpoints(BreakpointMap::from([("max", 2000.0)])).is_err());
    assert!(set_default_breakpoints(BreakpointMap::from([("small", -1.0)])).is_err());

    let surface = SimulatedSurface::new(800.0, 600.0);
    let bz = BreakpointRegistry::with_surface(surface.clone()).unwrap();
    assert_eq!(bz.breakpoint_for_width(100.0).as_deref(), Some("xxx"));
    reset_default_breakpoints();
}

#[test]
fn custom_events_dispatch_and_remove() {
    let surface = SimulatedSurface::new(800.0, 600.0);
    let bz = registry(&surface, BreakpointMap::new());

    assert!(!bz.remove_event_listener(&EventType::Custom("BOGUS".into()), ListenerId::from_raw(99)));
    assert!(matches!(
        "".parse::<EventType>(),
        Err(BreakzoneError::InvalidEventType(_))
    ));

    let ty: EventType = "test".parse().unwrap();
    let calls = Rc::new(Cell::new(0));
    let c = Rc::clone(&calls);
    let id = bz.add_event_listener(ty.clone(), move |_| c.set(c.get() + 1));
    let ev = BreakpointEvent {
        event_type: ty.clone(),
        old_breakpoint: None,
        new_breakpoint: String::new(),
        width: 0.0,
    };
    bz.dispatch_event(&ev);
    bz.remove_event_listener(&ty, id);
    bz.dispatch_event(&ev);
    assert_eq!(calls.get(), 1);
}

#[test]
fn registries_on_one_surface_do_not_cross_fire() {
    init_tracing();
    let surface = SimulatedSurface::new(800.0, 800.0);
    let sizes = BreakpointMap::from([("small", 300.0), ("med", 500.0), ("large", 800.0)]);
    let bz1 = registry(&surface, sizes.clone());
    let bz2 = registry(&surface, sizes);
    let bz3 = registry(&surface, BreakpointMap::new());

    let change1 = counter(&bz1, EventType::Change);
    let change2 = counter(&bz2, EventType::Change);
    let med = counter(&bz1, EventType::breakpoint("med"));
    let change3 = counter(&bz3, EventType::Change);

    surface.fire_load();
    surface.resize_to(400.0, 400.0);

    assert_eq!(change1.get(), 2);
    assert_eq!(change2.get(), 2);
    assert_eq!(change3.get(), 1);
    assert_eq!(med.get(), 1);
}

#[test]
fn unregister_then_resize_falls_through() {
    let surface = SimulatedSurface::new(250.0, 600.0);
    let bz = registry(
        &surface,
        BreakpointMap::from([("small", 300.0), ("med", 600.0)]),
    );
    surface.fire_load();
    assert_eq!(bz.active_breakpoint_name().as_deref(), Some("small"));

    let events: Rc<RefCell<Vec<(Option<String>, String)>>> = Rc::default();
    let log = Rc::clone(&events);
    bz.add_change_listener(move |ev| {
        log.borrow_mut()
            .push((ev.old_breakpoint.clone(), ev.new_breakpoint.clone()));
    });

    bz.unregister_breakpoint("small");
    assert!(events.borrow().is_empty());
    surface.resize_to(260.0, 600.0);
    assert_eq!(
        *events.borrow(),
        vec![(Some("small".to_string()), "med".to_string())]
    );
}

#[test]
fn dispose_stops_surface_driven_evaluation() {
    let surface = SimulatedSurface::new(800.0, 600.0);
    let bz = registry(&surface, BreakpointMap::from([("small", 300.0)]));
    let changes = counter(&bz, EventType::Change);

    surface.fire_load();
    assert!(bz.dispose());
    assert!(!bz.dispose());
    surface.resize_to(100.0, 600.0);

    assert_eq!(changes.get(), 1);
    assert_eq!(surface.subscriber_count(), 0);
    assert_eq!(bz.active_breakpoint_name().as_deref(), Some(MAX_BREAKPOINT));
    assert_eq!(bz.active_breakpoint().as_deref(), Some("small"));
}

#[test]
fn change_event_serializes_for_hosts() {
    let surface = SimulatedSurface::new(450.0, 600.0);
    let bz = registry(&surface, BreakpointMap::from([("med", 600.0)]));
    let ev = bz.evaluate_resize().unwrap();
    assert_eq!(
        ev.to_json().unwrap(),
        r#"{"type":"breakpointChange","oldBreakpoint":null,"newBreakpoint":"med","width":450.0}"#
    );
}
