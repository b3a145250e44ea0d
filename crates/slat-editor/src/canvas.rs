//! Event adapter between the host and the editing session.
//!
//! `EditorCanvas` owns the session, the tools, the layer → group mapping and
//! the inventory sync state. The wasm bridge is a thin shell around it, so
//! everything here runs and tests natively.

use crate::input::{InputEvent, Modifiers};
use crate::inventory::InventorySync;
use crate::layers::{LayerEvent, LayerGroups};
use crate::session::{Applied, DesignMutation, Session};
use crate::shortcuts::{ShortcutAction, ShortcutMap};
use crate::tools::{CargoTool, SlatTool, Tool, ToolContext, ToolKind};
use serde::Serialize;
use slat_core::config::EditorConfig;
use slat_core::error::EditorError;
use slat_core::grid::GridStyle;
use slat_core::id::{LayerId, SlatId};
use slat_core::inventory::{InventoryItem, InventoryRequest, ItemPatch};
use slat_core::model::{Cargo, Orientation, RemovedLayer, Slat};
use std::collections::BTreeMap;

pub struct EditorCanvas {
    session: Session,
    slat_tool: SlatTool,
    cargo_tool: CargoTool,
    groups: LayerGroups,
    inventory_sync: InventorySync,
    width: f64,
    height: f64,
}

/// Serializable snapshot handed to the host UI.
#[derive(Debug, Serialize)]
pub struct EditorState<'a> {
    pub mode: &'static str,
    pub orientation: Orientation,
    pub grid_style: GridStyle,
    pub active_layer: Option<LayerId>,
    pub selected_slat: Option<SlatId>,
    pub selected_cargo: Option<u32>,
    pub dragging: bool,
    pub pan: bool,
    pub scale: f64,
    pub layers: Vec<LayerState>,
    pub slats: Vec<&'a Slat>,
    pub cargo: Vec<&'a Cargo>,
    pub inventory: &'a [InventoryItem],
}

#[derive(Debug, Serialize)]
pub struct LayerState {
    pub id: LayerId,
    pub name: String,
    pub visible: bool,
    pub active: bool,
    pub group: Option<String>,
}

impl EditorCanvas {
    /// # Errors
    /// The config validation error.
    pub fn new(config: EditorConfig, width: f64, height: f64) -> Result<Self, EditorError> {
        Ok(Self::from_session(Session::new(config)?, width, height))
    }

    pub fn from_session(session: Session, width: f64, height: f64) -> Self {
        let groups = LayerGroups::from_layers(session.design().layers());
        Self {
            session,
            slat_tool: SlatTool::new(),
            cargo_tool: CargoTool,
            groups,
            inventory_sync: InventorySync::new(),
            width,
            height,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn groups(&self) -> &LayerGroups {
        &self.groups
    }

    pub fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    pub fn set_scale(&mut self, scale: f64) {
        self.session.set_scale(scale);
    }

    /// Grid intersection under a screen position, for the cursor preview.
    pub fn snapped_cursor(&self, x: f64, y: f64) -> slat_core::Point {
        self.session.snapped_cursor(x, y)
    }

    /// Clear the design and start over with fresh layers.
    pub fn reset(&mut self) {
        self.session.reset();
        self.slat_tool = SlatTool::new();
        self.groups = LayerGroups::from_layers(self.session.design().layers());
    }

    // ─── Pointer ─────────────────────────────────────────────────────────

    /// Positions are in host screen space. Returns true if the design changed.
    pub fn pointer_down(&mut self, x: f64, y: f64, modifiers: Modifiers) -> bool {
        self.dispatch_pointer(InputEvent::from_pointer_down(x, y, modifiers))
    }

    pub fn pointer_move(&mut self, x: f64, y: f64, modifiers: Modifiers) -> bool {
        self.dispatch_pointer(InputEvent::from_pointer_move(x, y, modifiers))
    }

    pub fn pointer_up(&mut self, x: f64, y: f64, modifiers: Modifiers) -> bool {
        self.dispatch_pointer(InputEvent::from_pointer_up(x, y, modifiers))
    }

    fn dispatch_pointer(&mut self, event: InputEvent) -> bool {
        let event = event.map_position(|x, y| self.session.to_canvas(x, y));
        let Ok(layer) = self.session.active_layer() else {
            return false;
        };
        let ctx = ToolContext {
            design: self.session.design(),
            config: self.session.config(),
            layer,
            orientation: self.session.orientation,
            selected_cargo: self.session.selected_cargo,
            pan_enabled: self.session.pan_enabled,
        };
        let mutations = match self.session.mode {
            ToolKind::Slat => self.slat_tool.handle(&event, &ctx),
            ToolKind::Cargo => self.cargo_tool.handle(&event, &ctx),
        };
        self.apply_mutations(mutations)
    }

    fn apply_mutations(&mut self, mutations: Vec<DesignMutation>) -> bool {
        let mut changed = false;
        for mutation in mutations {
            match self.session.apply(mutation) {
                Ok(applied) => {
                    if let Applied::SlatRemoved(slat) = &applied
                        && self.slat_tool.selected == Some(slat.id)
                    {
                        self.slat_tool.selected = None;
                    }
                    changed = true;
                }
                Err(e) => log::debug!("mutation rejected: {e}"),
            }
        }
        changed
    }

    /// Apply a mutation coming straight from the host, surfacing the error.
    ///
    /// # Errors
    /// Whatever the session rejects the mutation with.
    pub fn apply(&mut self, mutation: DesignMutation) -> Result<Applied, EditorError> {
        self.session.apply(mutation)
    }

    // ─── Modes ───────────────────────────────────────────────────────────

    pub fn mode(&self) -> ToolKind {
        self.session.mode
    }

    pub fn set_mode(&mut self, mode: ToolKind) {
        if self.session.mode != mode {
            self.slat_tool.cancel();
            self.cargo_tool.cancel();
            self.session.mode = mode;
            log::debug!("mode → {}", mode.as_str());
        }
    }

    pub fn set_orientation(&mut self, orientation: Orientation) {
        self.session.orientation = orientation;
    }

    pub fn toggle_orientation(&mut self) -> Orientation {
        self.session.orientation = self.session.orientation.toggle();
        self.session.orientation
    }

    /// Choose the inventory item the cargo tool places; `None` switches it to
    /// removing tokens.
    ///
    /// # Errors
    /// `UnknownInventoryItem`.
    pub fn select_cargo(&mut self, item: Option<u32>) -> Result<(), EditorError> {
        if let Some(id) = item
            && self.session.inventory().get(id).is_none()
        {
            return Err(EditorError::UnknownInventoryItem(id));
        }
        self.session.selected_cargo = item;
        Ok(())
    }

    pub fn selected_slat(&self) -> Option<SlatId> {
        self.slat_tool.selected
    }

    pub fn set_pan(&mut self, enabled: bool) {
        if enabled {
            self.slat_tool.cancel();
        }
        self.session.pan_enabled = enabled;
    }

    /// Remove the selected slat. Returns true if one was removed.
    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.slat_tool.selected.take() else {
            return false;
        };
        self.slat_tool.cancel();
        self.apply_mutations(vec![DesignMutation::RemoveSlat { id }])
    }

    // ─── Keyboard ────────────────────────────────────────────────────────

    /// Returns the resolved action and whether the rendered scene changed.
    pub fn key_down(&mut self, key: &str, modifiers: Modifiers) -> (Option<ShortcutAction>, bool) {
        let action = ShortcutMap::resolve(
            key,
            modifiers.ctrl,
            modifiers.shift,
            modifiers.alt,
            modifiers.meta,
        );
        let changed = action.is_some_and(|a| self.dispatch_action(a));
        (action, changed)
    }

    pub fn key_up(&mut self, key: &str) -> (Option<ShortcutAction>, bool) {
        let action = ShortcutMap::resolve_release(key);
        let changed = action.is_some_and(|a| self.dispatch_action(a));
        (action, changed)
    }

    fn dispatch_action(&mut self, action: ShortcutAction) -> bool {
        match action {
            ShortcutAction::ModeSlats => {
                self.set_mode(ToolKind::Slat);
                false
            }
            ShortcutAction::ModeCargo => {
                self.set_mode(ToolKind::Cargo);
                false
            }
            ShortcutAction::ToggleOrientation => {
                self.toggle_orientation();
                false
            }
            ShortcutAction::CycleGridStyle => {
                let next = self.session.config().grid.style.cycle();
                self.session.set_grid_style(next);
                true
            }
            ShortcutAction::AddLayer => match self.add_layer() {
                Ok(_) => true,
                Err(e) => {
                    log::warn!("layer not added: {e}");
                    false
                }
            },
            ShortcutAction::DeleteSelected => self.delete_selected(),
            ShortcutAction::Deselect => {
                self.slat_tool.cancel();
                self.slat_tool.selected = None;
                false
            }
            ShortcutAction::PanStart => {
                self.set_pan(true);
                false
            }
            ShortcutAction::PanEnd => {
                self.set_pan(false);
                false
            }
        }
    }

    // ─── Layers ──────────────────────────────────────────────────────────

    /// # Errors
    /// `LayerIdsExhausted`.
    pub fn add_layer(&mut self) -> Result<LayerId, EditorError> {
        let id = self.session.add_layer()?;
        if let Some(layer) = self.session.design().layer(id) {
            self.groups.insert(layer);
        }
        Ok(id)
    }

    /// # Errors
    /// `UnknownLayer` or `LastLayer`.
    pub fn remove_layer(&mut self, id: LayerId) -> Result<RemovedLayer, EditorError> {
        let removed = self.session.remove_layer(id)?;
        self.groups.remove(id);
        if let Some(selected) = self.slat_tool.selected
            && removed.slats.iter().any(|s| s.id == selected)
        {
            self.slat_tool.selected = None;
        }
        self.slat_tool.cancel();
        Ok(removed)
    }

    /// Apply a host layer-list event. Returns true if the scene changed.
    ///
    /// # Errors
    /// `UnknownLayer`, `LastLayer` when asked to remove the only layer, or
    /// `LayerIdsExhausted` for an added id at the top of the range.
    pub fn handle_layer_event(&mut self, event: LayerEvent) -> Result<bool, EditorError> {
        match event {
            LayerEvent::Added(id) => {
                let created = self.session.ensure_layer(id)?;
                if let Some(layer) = self.session.design().layer(id) {
                    self.groups.insert(layer);
                }
                Ok(created)
            }
            LayerEvent::Removed(id) => self.remove_layer(id).map(|_| true),
            LayerEvent::Shown(id) | LayerEvent::Hidden(id) => {
                let visible = matches!(event, LayerEvent::Shown(_));
                self.session.set_layer_visible(id, visible)?;
                self.groups.set_visible(id, visible)?;
                Ok(true)
            }
            LayerEvent::MarkedActive(id) => {
                self.session.set_active_layer(id)?;
                self.slat_tool.cancel();
                self.slat_tool.selected = None;
                Ok(false)
            }
        }
    }

    // ─── Inventory ───────────────────────────────────────────────────────

    /// # Errors
    /// `InvalidColor`.
    pub fn add_inventory_item(
        &mut self,
        name: &str,
        tag: &str,
        color: &str,
    ) -> Result<InventoryItem, EditorError> {
        self.session.add_inventory_item(name, tag, color)
    }

    /// # Errors
    /// `UnknownInventoryItem` or `InvalidColor`.
    pub fn update_inventory_item(&mut self, id: u32, patch: ItemPatch) -> Result<InventoryItem, EditorError> {
        self.session.update_inventory_item(id, patch)
    }

    /// Returns how many placed markers went with the item.
    ///
    /// # Errors
    /// `UnknownInventoryItem`.
    pub fn remove_inventory_item(&mut self, id: u32) -> Result<usize, EditorError> {
        self.session
            .remove_inventory_item(id)
            .map(|(_, markers)| markers.len())
    }

    pub fn inventory_request(
        &mut self,
        path: &str,
        plate_drivers: Option<BTreeMap<String, String>>,
    ) -> InventoryRequest {
        self.inventory_sync.request(path, plate_drivers)
    }

    /// Replace the inventory with a service response. Returns how many
    /// markers were pruned.
    ///
    /// # Errors
    /// `ExternalFetchFailed`; the current inventory is kept.
    pub fn apply_inventory_response(&mut self, seq: Option<u64>, json: &str) -> Result<usize, EditorError> {
        let items = self.inventory_sync.receive(seq, json)?;
        Ok(self.session.replace_inventory(items).len())
    }

    // ─── Output ──────────────────────────────────────────────────────────

    pub fn render_svg(&self) -> String {
        slat_render::svg::render_svg(
            self.session.design(),
            self.session.inventory(),
            self.session.config(),
            self.width,
            self.height,
        )
    }

    /// Palette swatch for one inventory item.
    pub fn render_swatch(&self, item: u32, size: f64) -> Option<String> {
        self.session
            .inventory()
            .get(item)
            .map(|i| slat_render::svg::render_cargo_swatch(i, size))
    }

    pub fn state(&self) -> EditorState<'_> {
        let design = self.session.design();
        let active = design.active_layer();
        EditorState {
            mode: self.session.mode.as_str(),
            orientation: self.session.orientation,
            grid_style: self.session.config().grid.style,
            active_layer: active,
            selected_slat: self.slat_tool.selected,
            selected_cargo: self.session.selected_cargo,
            dragging: self.slat_tool.drag.is_dragging(),
            pan: self.session.pan_enabled,
            scale: self.session.scale(),
            layers: design
                .layers()
                .into_iter()
                .map(|l| LayerState {
                    id: l.id,
                    name: l.name.clone(),
                    visible: l.visible,
                    active: Some(l.id) == active,
                    group: self.groups.get(l.id).map(|g| g.dom_id.clone()),
                })
                .collect(),
            slats: design.slats(),
            cargo: design.all_cargo(),
            inventory: self.session.inventory().items(),
        }
    }
}
