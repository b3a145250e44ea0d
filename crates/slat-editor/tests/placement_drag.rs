//! Integration tests: placement and drag through the canvas adapter
//! (slat-editor ↔ slat-render ↔ slat-core).

use pretty_assertions::assert_eq;
use slat_core::{EditorConfig, LayerId, Orientation, Point, SlatId, snap};
use slat_editor::{DesignMutation, EditorCanvas, Modifiers};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn canvas() -> EditorCanvas {
    init_logging();
    EditorCanvas::new(EditorConfig::default(), 800.0, 600.0).unwrap()
}

fn place(c: &mut EditorCanvas, x: f64, y: f64, orientation: Orientation) -> bool {
    let layer = c.session().active_layer().unwrap();
    c.apply(DesignMutation::PlaceSlat {
        layer,
        anchor: Point::new(x, y),
        orientation,
    })
    .is_ok()
}

fn drag(c: &mut EditorCanvas, from: (f64, f64), to: (f64, f64)) -> bool {
    c.pointer_down(from.0, from.1, Modifiers::NONE);
    let moved = c.pointer_move(to.0, to.1, Modifiers::NONE);
    c.pointer_up(to.0, to.1, Modifiers::NONE);
    moved
}

fn anchor(c: &EditorCanvas, id: u64) -> Point {
    c.session().design().slat(SlatId(id)).unwrap().anchor
}

// ─── Snapping ───────────────────────────────────────────────────────────

#[test]
fn snap_lands_on_multiples_within_half_pitch() {
    for pitch in [1.0, 2.5, 10.0, 16.0] {
        for &(x, y) in &[(0.0, 0.0), (3.3, -7.9), (104.9, 95.1), (-12.5, 1234.56)] {
            let p = snap(Point::new(x, y), pitch);
            assert!(((p.x / pitch) - (p.x / pitch).round()).abs() < 1e-9);
            assert!(((p.y / pitch) - (p.y / pitch).round()).abs() < 1e-9);
            assert!((p.x - x).abs() <= pitch / 2.0 + 1e-9);
            assert!((p.y - y).abs() <= pitch / 2.0 + 1e-9);
        }
    }
}

// ─── Placement ──────────────────────────────────────────────────────────

#[test]
fn pitch_ten_length_thirty_two_scenario() {
    let mut c = canvas();
    assert!(c.pointer_down(100.0, 100.0, Modifiers::NONE));
    c.pointer_up(100.0, 100.0, Modifiers::NONE);

    let slat = c.session().design().slat(SlatId(0)).unwrap();
    assert_eq!(slat.line(10.0).p1, Point::new(100.0, 420.0));

    // Same anchor, same orientation: rejected, count unchanged.
    assert!(!place(&mut c, 100.0, 100.0, Orientation::Vertical));
    assert_eq!(c.session().design().slat_count(), 1);

    // One pitch over is clear.
    assert!(place(&mut c, 110.0, 100.0, Orientation::Vertical));
    assert_eq!(c.session().design().slat_count(), 2);
}

#[test]
fn each_placement_gets_a_unique_id() {
    let mut c = canvas();
    for i in 0..5 {
        assert!(place(&mut c, 100.0 + i as f64 * 10.0, 0.0, Orientation::Vertical));
    }
    let mut ids: Vec<SlatId> = c.session().design().slats().iter().map(|s| s.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 5);
}

#[test]
fn orientation_toggle_places_horizontal() {
    let mut c = canvas();
    c.key_down("r", Modifiers::NONE);
    assert!(c.pointer_down(0.0, 50.0, Modifiers::NONE));
    let slat = c.session().design().slat(SlatId(0)).unwrap();
    assert_eq!(slat.orientation, Orientation::Horizontal);
    assert_eq!(slat.end(10.0), Point::new(320.0, 50.0));
}

#[test]
fn crossing_is_rejected_but_other_layer_is_free() {
    let mut c = canvas();
    assert!(place(&mut c, 100.0, 100.0, Orientation::Vertical));
    assert!(!place(&mut c, 0.0, 200.0, Orientation::Horizontal));

    c.handle_layer_event(slat_editor::LayerEvent::MarkedActive(LayerId(2)))
        .unwrap();
    assert!(place(&mut c, 0.0, 200.0, Orientation::Horizontal));
}

// ─── Drag ───────────────────────────────────────────────────────────────

#[test]
fn drag_to_clear_position_moves_anchor() {
    let mut c = canvas();
    place(&mut c, 100.0, 100.0, Orientation::Vertical);
    assert!(drag(&mut c, (100.0, 150.0), (300.0, 170.0)));
    assert_eq!(anchor(&c, 0), Point::new(300.0, 120.0));
    assert!(!c.state().dragging);
}

#[test]
fn drag_onto_another_slat_keeps_last_valid_anchor() {
    let mut c = canvas();
    place(&mut c, 100.0, 100.0, Orientation::Vertical);
    place(&mut c, 200.0, 100.0, Orientation::Vertical);

    c.pointer_down(100.0, 100.0, Modifiers::NONE);
    // Clear step first, then onto slat 1.
    assert!(c.pointer_move(150.0, 100.0, Modifiers::NONE));
    assert!(!c.pointer_move(200.0, 100.0, Modifiers::NONE));
    c.pointer_up(200.0, 100.0, Modifiers::NONE);

    assert_eq!(anchor(&c, 0), Point::new(150.0, 100.0));
    assert_eq!(anchor(&c, 1), Point::new(200.0, 100.0));
}

#[test]
fn drag_along_own_footprint_is_allowed() {
    let mut c = canvas();
    place(&mut c, 100.0, 100.0, Orientation::Vertical);
    assert!(drag(&mut c, (100.0, 100.0), (100.0, 130.0)));
    assert_eq!(anchor(&c, 0), Point::new(100.0, 130.0));
}

#[test]
fn pointer_move_without_grab_does_nothing() {
    let mut c = canvas();
    place(&mut c, 100.0, 100.0, Orientation::Vertical);
    assert!(!c.pointer_move(300.0, 300.0, Modifiers::NONE));
    assert_eq!(anchor(&c, 0), Point::new(100.0, 100.0));
}
