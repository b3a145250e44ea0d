//! WASM bridge for Slat Draft: exposes the editor to the browser page.
//!
//! Compiled via `wasm-pack build --target web`. The page forwards pointer,
//! key and layer-list events and re-renders from `render_svg` whenever a
//! call reports a change. Structured results come back as JSON strings.

use serde_json::{Value, json};
use slat_core::config::EditorConfig;
use slat_core::id::LayerId;
use slat_core::inventory::ItemPatch;
use slat_core::model::Orientation;
use slat_editor::canvas::EditorCanvas;
use slat_editor::input::Modifiers;
use slat_editor::layers::LayerEvent;
use slat_editor::session::Session;
use slat_editor::shortcuts::ShortcutAction;
use slat_editor::tools::ToolKind;
use std::collections::BTreeMap;
use std::fmt::Display;
use wasm_bindgen::prelude::*;

/// The main WASM-facing canvas controller.
#[wasm_bindgen]
pub struct SlatCanvas {
    editor: EditorCanvas,
}

#[wasm_bindgen]
impl SlatCanvas {
    /// Create a controller for a `width × height` canvas.
    ///
    /// `config_json` may be empty. A config that does not parse or validate
    /// is logged and replaced by defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(width: f64, height: f64, config_json: &str) -> Self {
        console_error_panic_hook_setup();
        console_logger_setup();

        let session = match EditorConfig::from_json(config_json) {
            Ok(config) => Session::new(config).unwrap_or_else(|e| {
                log::warn!("invalid editor config, using defaults: {e}");
                Session::default()
            }),
            Err(e) => {
                log::warn!("invalid editor config, using defaults: {e}");
                Session::default()
            }
        };
        Self {
            editor: EditorCanvas::from_session(session, width, height),
        }
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.editor.resize(width, height);
    }

    /// Host zoom factor (screen = canvas × scale).
    pub fn set_scale(&mut self, scale: f64) {
        self.editor.set_scale(scale);
    }

    /// Snapped cursor in canvas units as `[x, y]`.
    pub fn snapped_cursor(&self, x: f64, y: f64) -> Vec<f64> {
        let p = self.editor.snapped_cursor(x, y);
        vec![p.x, p.y]
    }

    // ─── Pointer ─────────────────────────────────────────────────────────

    /// Returns true if the design changed.
    pub fn handle_pointer_down(
        &mut self,
        x: f64,
        y: f64,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        self.editor
            .pointer_down(x, y, modifiers(shift, ctrl, alt, meta))
    }

    pub fn handle_pointer_move(
        &mut self,
        x: f64,
        y: f64,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        self.editor
            .pointer_move(x, y, modifiers(shift, ctrl, alt, meta))
    }

    pub fn handle_pointer_up(
        &mut self,
        x: f64,
        y: f64,
        shift: bool,
        ctrl: bool,
        alt: bool,
        meta: bool,
    ) -> bool {
        self.editor
            .pointer_up(x, y, modifiers(shift, ctrl, alt, meta))
    }

    // ─── Modes ───────────────────────────────────────────────────────────

    /// `"slats"` or `"cargo"`. Returns false for an unknown name.
    pub fn set_mode(&mut self, name: &str) -> bool {
        match ToolKind::parse(name) {
            Some(mode) => {
                self.editor.set_mode(mode);
                true
            }
            None => {
                log::warn!("unknown draw mode `{name}`");
                false
            }
        }
    }

    pub fn get_mode(&self) -> String {
        self.editor.mode().as_str().to_string()
    }

    /// `"vertical"` or `"horizontal"`.
    pub fn set_orientation(&mut self, name: &str) -> bool {
        let orientation = match name {
            "vertical" => Orientation::Vertical,
            "horizontal" => Orientation::Horizontal,
            _ => return false,
        };
        self.editor.set_orientation(orientation);
        true
    }

    pub fn toggle_orientation(&mut self) -> String {
        self.editor.toggle_orientation().as_str().to_string()
    }

    /// Inventory item placed in cargo mode; `undefined` switches cargo mode
    /// to removing tokens.
    pub fn set_selected_cargo(&mut self, item: Option<u32>) -> bool {
        match self.editor.select_cargo(item) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("{e}");
                false
            }
        }
    }

    pub fn delete_selected(&mut self) -> bool {
        self.editor.delete_selected()
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Returns `{"changed":bool,"action":"<name>","mode":"<mode>"}`.
    pub fn handle_key(&mut self, key: &str, ctrl: bool, shift: bool, alt: bool, meta: bool) -> String {
        let (action, changed) = self
            .editor
            .key_down(key, modifiers(shift, ctrl, alt, meta));
        self.key_result(action, changed)
    }

    pub fn handle_key_up(&mut self, key: &str) -> String {
        let (action, changed) = self.editor.key_up(key);
        self.key_result(action, changed)
    }

    // ─── Layers ──────────────────────────────────────────────────────────

    /// Forward a layer-list event (`layerAdded`, `layerRemoved`,
    /// `layerShown`, `layerHidden`, `layerMarkedActive`). Returns true if
    /// the scene needs a re-render.
    pub fn handle_layer_event(&mut self, kind: &str, id: u32) -> bool {
        let Some(event) = LayerEvent::parse(kind, id) else {
            log::warn!("unknown layer event `{kind}`");
            return false;
        };
        match self.editor.handle_layer_event(event) {
            Ok(changed) => changed,
            Err(e) => {
                log::warn!("layer event `{kind}` for {id} rejected: {e}");
                false
            }
        }
    }

    /// Returns the new layer id, or `undefined` once ids run out.
    pub fn add_layer(&mut self) -> Option<u32> {
        match self.editor.add_layer() {
            Ok(id) => Some(id.0),
            Err(e) => {
                log::warn!("layer not added: {e}");
                None
            }
        }
    }

    /// Returns `{"ok":true,"slats":n,"cargo":n}` or `{"ok":false,"error":"..."}`.
    pub fn remove_layer(&mut self, id: u32) -> String {
        match self.editor.remove_layer(LayerId(id)) {
            Ok(removed) => ok(json!({
                "slats": removed.slats.len(),
                "cargo": removed.cargo.len(),
            })),
            Err(e) => error(e),
        }
    }

    // ─── Inventory ───────────────────────────────────────────────────────

    pub fn get_inventory_json(&self) -> String {
        serde_json::to_string(self.editor.session().inventory().items()).unwrap_or_else(|_| "[]".into())
    }

    /// Returns `{"ok":true,"item":{...}}` or an error object.
    pub fn add_inventory_item(&mut self, name: &str, tag: &str, color: &str) -> String {
        match self.editor.add_inventory_item(name, tag, color) {
            Ok(item) => ok(json!({ "item": item })),
            Err(e) => error(e),
        }
    }

    /// `patch_json` is `{"name"?, "tag"?, "color"?}`.
    pub fn update_inventory_item(&mut self, id: u32, patch_json: &str) -> String {
        let patch: ItemPatch = match serde_json::from_str(patch_json) {
            Ok(p) => p,
            Err(e) => return error(e),
        };
        match self.editor.update_inventory_item(id, patch) {
            Ok(item) => ok(json!({ "item": item })),
            Err(e) => error(e),
        }
    }

    /// Returns `{"ok":true,"removedMarkers":n}` or an error object.
    pub fn remove_inventory_item(&mut self, id: u32) -> String {
        match self.editor.remove_inventory_item(id) {
            Ok(n) => ok(json!({ "removedMarkers": n })),
            Err(e) => error(e),
        }
    }

    /// Build the request the page sends to the plate-scan service.
    /// `plate_drivers_json` is an optional `{plate: driver}` object.
    pub fn inventory_request(&mut self, path: &str, plate_drivers_json: &str) -> String {
        let drivers = if plate_drivers_json.trim().is_empty() {
            None
        } else {
            match serde_json::from_str::<BTreeMap<String, String>>(plate_drivers_json) {
                Ok(map) => Some(map),
                Err(e) => {
                    log::warn!("ignoring malformed plate/driver map: {e}");
                    None
                }
            }
        };
        let request = self.editor.inventory_request(path, drivers);
        serde_json::to_string(&request).unwrap_or_default()
    }

    /// Apply a service response. Returns `{"ok":true,"pruned":n}` or an
    /// error object; on error the inventory is unchanged.
    pub fn apply_inventory_response(&mut self, seq: Option<u32>, response_json: &str) -> String {
        match self
            .editor
            .apply_inventory_response(seq.map(u64::from), response_json)
        {
            Ok(pruned) => ok(json!({ "pruned": pruned })),
            Err(e) => error(e),
        }
    }

    // ─── Output ──────────────────────────────────────────────────────────

    pub fn render_svg(&self) -> String {
        self.editor.render_svg()
    }

    /// `[{"id":n,"svg":"..."}]`, one swatch per inventory item.
    pub fn render_palette(&self, size: f64) -> String {
        let swatches: Vec<Value> = self
            .editor
            .session()
            .inventory()
            .items()
            .iter()
            .map(|item| {
                json!({
                    "id": item.id,
                    "svg": slat_render::svg::render_cargo_swatch(item, size),
                })
            })
            .collect();
        Value::Array(swatches).to_string()
    }

    pub fn get_state_json(&self) -> String {
        serde_json::to_string(&self.editor.state()).unwrap_or_else(|e| error(e))
    }

    pub fn reset(&mut self) {
        self.editor.reset();
    }
}

// ─── Private helpers ─────────────────────────────────────────────────────

impl SlatCanvas {
    fn key_result(&self, action: Option<ShortcutAction>, changed: bool) -> String {
        json!({
            "changed": changed,
            "action": action.map_or("none", action_to_name),
            "mode": self.editor.mode().as_str(),
        })
        .to_string()
    }
}

fn modifiers(shift: bool, ctrl: bool, alt: bool, meta: bool) -> Modifiers {
    Modifiers {
        shift,
        ctrl,
        alt,
        meta,
    }
}

fn ok(mut fields: Value) -> String {
    if let Value::Object(map) = &mut fields {
        map.insert("ok".into(), Value::Bool(true));
    }
    fields.to_string()
}

fn error(e: impl Display) -> String {
    json!({ "ok": false, "error": e.to_string() }).to_string()
}

fn action_to_name(action: ShortcutAction) -> &'static str {
    match action {
        ShortcutAction::ModeSlats => "modeSlats",
        ShortcutAction::ModeCargo => "modeCargo",
        ShortcutAction::ToggleOrientation => "toggleOrientation",
        ShortcutAction::CycleGridStyle => "cycleGridStyle",
        ShortcutAction::PanStart => "panStart",
        ShortcutAction::PanEnd => "panEnd",
        ShortcutAction::AddLayer => "addLayer",
        ShortcutAction::DeleteSelected => "deleteSelected",
        ShortcutAction::Deselect => "deselect",
    }
}

// ─── Console plumbing ────────────────────────────────────────────────────

fn console_error_panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("Slat Draft WASM panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

/// Forwards `log` records to the browser console.
struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        #[cfg(target_arch = "wasm32")]
        {
            let msg = format!("[{}] {}", record.target(), record.args());
            match record.level() {
                log::Level::Error => web_sys::console::error_1(&msg.into()),
                log::Level::Warn => web_sys::console::warn_1(&msg.into()),
                log::Level::Info => web_sys::console::info_1(&msg.into()),
                log::Level::Debug | log::Level::Trace => web_sys::console::debug_1(&msg.into()),
            }
        }
    }

    fn flush(&self) {}
}

fn console_logger_setup() {
    // Fails only when a logger is already installed, which is fine
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(log::LevelFilter::Info);
    }
}
