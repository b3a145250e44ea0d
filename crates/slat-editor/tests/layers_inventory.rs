//! Integration tests: layer lifecycle, cargo markers and inventory fetch.

use pretty_assertions::assert_eq;
use slat_core::{EditorConfig, EditorError, ItemPatch, LayerId, Orientation, Point};
use slat_editor::{DesignMutation, EditorCanvas, LayerEvent, Modifiers};
use std::collections::BTreeMap;

fn canvas() -> EditorCanvas {
    let _ = env_logger::builder().is_test(true).try_init();
    EditorCanvas::new(EditorConfig::default(), 400.0, 400.0).unwrap()
}

fn place_on(c: &mut EditorCanvas, layer: LayerId, x: f64) {
    c.apply(DesignMutation::PlaceSlat {
        layer,
        anchor: Point::new(x, 0.0),
        orientation: Orientation::Vertical,
    })
    .unwrap();
}

fn drop_cargo(c: &mut EditorCanvas, item: u32, x: f64, y: f64) {
    c.select_cargo(Some(item)).unwrap();
    assert!(c.pointer_down(x, y, Modifiers::NONE));
}

// ─── Layers ─────────────────────────────────────────────────────────────

#[test]
fn removing_layer_removes_its_slats_and_group() {
    let mut c = canvas();
    place_on(&mut c, LayerId(1), 10.0);
    place_on(&mut c, LayerId(2), 10.0);
    place_on(&mut c, LayerId(2), 20.0);

    let removed = c.remove_layer(LayerId(2)).unwrap();
    assert_eq!(removed.slats.len(), 2);
    assert_eq!(c.session().design().slat_count(), 1);
    assert!(!c.groups().contains(LayerId(2)));
    assert!(!c.render_svg().contains("layer-L2"));
}

#[test]
fn last_layer_cannot_be_removed() {
    let mut c = canvas();
    c.remove_layer(LayerId(1)).unwrap();
    assert_eq!(c.session().active_layer(), Ok(LayerId(2)));
    assert_eq!(
        c.handle_layer_event(LayerEvent::Removed(LayerId(2))),
        Err(EditorError::LastLayer(LayerId(2)))
    );
    assert_eq!(c.groups().len(), 1);
}

#[test]
fn hidden_layer_renders_transparent() {
    let mut c = canvas();
    c.handle_layer_event(LayerEvent::Hidden(LayerId(1))).unwrap();
    let svg = c.render_svg();
    assert!(svg.contains("<g id=\"layer-L1\" data-layer-name=\"Layer 1\" opacity=\"0\">"));
    assert!(svg.contains("<g id=\"layer-L2\" data-layer-name=\"Layer 2\" opacity=\"1\">"));
}

#[test]
fn add_layer_shortcut_creates_named_layer() {
    let mut c = canvas();
    c.key_down("n", Modifiers::NONE);
    let state = c.state();
    assert_eq!(state.layers.len(), 3);
    assert_eq!(state.layers[2].name, "Layer 3");
    assert_eq!(state.layers[2].group.as_deref(), Some("layer-L3"));
}

// ─── Cargo and inventory ────────────────────────────────────────────────

#[test]
fn one_token_per_point_per_layer() {
    let mut c = canvas();
    c.set_mode(slat_editor::ToolKind::Cargo);
    drop_cargo(&mut c, 1, 40.0, 40.0);
    c.select_cargo(Some(2)).unwrap();
    assert!(!c.pointer_down(41.0, 39.0, Modifiers::NONE));
    assert_eq!(c.session().design().all_cargo().len(), 1);
}

#[test]
fn editing_item_restyles_markers() {
    let mut c = canvas();
    c.set_mode(slat_editor::ToolKind::Cargo);
    drop_cargo(&mut c, 1, 40.0, 40.0);
    c.update_inventory_item(
        1,
        ItemPatch {
            tag: Some("YFP".into()),
            color: Some("#FFEE00".into()),
            ..ItemPatch::default()
        },
    )
    .unwrap();
    let svg = c.render_svg();
    assert!(svg.contains(">YFP</text>"));
    assert!(svg.contains("fill=\"#FFEE00\""));
}

#[test]
fn removing_item_removes_markers() {
    let mut c = canvas();
    c.set_mode(slat_editor::ToolKind::Cargo);
    drop_cargo(&mut c, 4, 80.0, 40.0);
    drop_cargo(&mut c, 3, 40.0, 40.0);
    drop_cargo(&mut c, 3, 60.0, 40.0);
    assert_eq!(c.remove_inventory_item(3), Ok(2));
    assert_eq!(c.session().design().all_cargo().len(), 1);
    assert_eq!(c.state().selected_cargo, None);
}

#[test]
fn added_item_gets_next_id() {
    let mut c = canvas();
    let item = c.add_inventory_item("Streptavidin", "SA", "#336699").unwrap();
    assert_eq!(item.id, 6);
    assert!(matches!(
        c.add_inventory_item("Bad", "B", "blue"),
        Err(EditorError::InvalidColor(_))
    ));
}

#[test]
fn fetched_inventory_replaces_placeholder_and_prunes() {
    let mut c = canvas();
    c.set_mode(slat_editor::ToolKind::Cargo);
    drop_cargo(&mut c, 1, 40.0, 40.0);
    drop_cargo(&mut c, 5, 60.0, 40.0);

    let mut drivers = BTreeMap::new();
    drivers.insert("plate_A".to_string(), "driver_3".to_string());
    let request = c.inventory_request("/data/plates", Some(drivers));
    assert_eq!(request.path, "/data/plates");

    let response = r##"[
        {"id": 1, "name": "Green Fluorescent Protein", "tag": "GFP", "color": "#00FF00", "plate": "plate_A", "driver": "driver_3"},
        {"id": 9, "name": "Biotin", "acronym": "Bio", "color": "#123456"}
    ]"##;
    assert_eq!(c.apply_inventory_response(Some(request.seq), response), Ok(1));

    let state = c.state();
    assert_eq!(state.inventory.len(), 2);
    assert_eq!(state.inventory[0].plate.as_deref(), Some("plate_A"));
    assert_eq!(state.cargo.len(), 1);
    assert_eq!(state.cargo[0].item, 1);
}

#[test]
fn malformed_response_keeps_inventory() {
    let mut c = canvas();
    let request = c.inventory_request("/data/plates", None);
    assert!(matches!(
        c.apply_inventory_response(Some(request.seq), r#"[{"id": 1}]"#),
        Err(EditorError::ExternalFetchFailed(_))
    ));
    assert_eq!(c.session().inventory().len(), 5);
}

#[test]
fn last_response_wins() {
    let mut c = canvas();
    let first = c.inventory_request("/a", None);
    let second = c.inventory_request("/b", None);
    c.apply_inventory_response(
        Some(second.seq),
        r##"[{"id": 1, "name": "B", "tag": "B", "color": "#000"}]"##,
    )
    .unwrap();
    c.apply_inventory_response(
        Some(first.seq),
        r##"[{"id": 2, "name": "A", "tag": "A", "color": "#fff"}]"##,
    )
    .unwrap();
    let items = c.session().inventory().items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "A");
}
