//! Editing session: the single owner of all mutable editor state.
//!
//! The session holds the design, the inventory, the id counters and the mode
//! flags (orientation, selected cargo item, pan, zoom). Tools never mutate
//! it directly: they return `DesignMutation`s and the session applies them,
//! re-validating grid alignment and collisions on the way in. A rejected
//! mutation leaves the design untouched.

use crate::tools::ToolKind;
use slat_core::config::EditorConfig;
use slat_core::error::EditorError;
use slat_core::grid::{GridStyle, require_on_grid, snap_scaled};
use slat_core::id::{CargoId, IdAllocator, LayerId, SlatId};
use slat_core::inventory::{Inventory, InventoryItem, ItemPatch};
use slat_core::model::{Cargo, Design, Layer, Orientation, RemovedLayer, Slat, slat_line};
use slat_core::Point;
use slat_render::hit::CollisionIndex;

/// A change requested by a tool (or the host) against the design.
#[derive(Debug, Clone, PartialEq)]
pub enum DesignMutation {
    PlaceSlat {
        layer: LayerId,
        anchor: Point,
        orientation: Orientation,
    },
    MoveSlat {
        id: SlatId,
        to: Point,
    },
    RemoveSlat {
        id: SlatId,
    },
    PlaceCargo {
        layer: LayerId,
        item: u32,
        position: Point,
    },
    RemoveCargo {
        id: CargoId,
    },
}

/// What an applied mutation did.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    SlatPlaced(SlatId),
    SlatMoved { id: SlatId, from: Point, to: Point },
    SlatRemoved(Slat),
    CargoPlaced(CargoId),
    CargoRemoved(Cargo),
}

pub struct Session {
    config: EditorConfig,
    design: Design,
    inventory: Inventory,
    ids: IdAllocator,

    /// Whether pointer-down places slats or cargo.
    pub mode: ToolKind,
    /// Orientation of the next placed slat.
    pub orientation: Orientation,
    /// Inventory item placed by the cargo tool.
    pub selected_cargo: Option<u32>,
    /// Set while the host pans (Shift held); placement and drag pause.
    pub pan_enabled: bool,
    /// Host zoom factor: screen = canvas × scale.
    scale: f64,
}

impl Default for Session {
    fn default() -> Self {
        Self::build(EditorConfig::default())
    }
}

impl Session {
    /// Start a session with `config.initial_layers` empty layers.
    ///
    /// # Errors
    /// Returns the validation error for an unusable config.
    pub fn new(config: EditorConfig) -> Result<Self, EditorError> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EditorConfig) -> Self {
        let mut session = Self {
            config,
            design: Design::new(),
            inventory: Inventory::placeholder(),
            ids: IdAllocator::new(),
            mode: ToolKind::Slat,
            orientation: Orientation::Vertical,
            selected_cargo: None,
            pan_enabled: false,
            scale: 1.0,
        };
        session.seed_layers();
        session
    }

    /// Drop the design and all transient state; keep the config and inventory.
    pub fn reset(&mut self) {
        self.design = Design::new();
        self.ids = IdAllocator::new();
        self.mode = ToolKind::Slat;
        self.orientation = Orientation::Vertical;
        self.selected_cargo = None;
        self.pan_enabled = false;
        self.scale = 1.0;
        self.seed_layers();
        log::info!("session reset");
    }

    fn seed_layers(&mut self) {
        // Exactly one layer must always be active, so never start empty
        for _ in 0..self.config.initial_layers.max(1) {
            if let Err(e) = self.add_layer() {
                log::warn!("stopped seeding layers: {e}");
                break;
            }
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The only setting that may change mid-session; pitch and slat length
    /// stay as validated at start.
    pub fn set_grid_style(&mut self, style: GridStyle) {
        self.config.grid.style = style;
    }

    pub fn design(&self) -> &Design {
        &self.design
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn pitch(&self) -> f64 {
        self.config.grid.pitch
    }

    // ─── Zoom ────────────────────────────────────────────────────────────

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Ignores non-positive or non-finite values.
    pub fn set_scale(&mut self, scale: f64) {
        if scale.is_finite() && scale > 0.0 {
            self.scale = scale;
        } else {
            log::warn!("ignoring zoom scale {scale}");
        }
    }

    /// Screen position → canvas position (unsnapped).
    pub fn to_canvas(&self, x: f64, y: f64) -> (f64, f64) {
        (x / self.scale, y / self.scale)
    }

    /// Grid intersection under a screen position, for cursor previews.
    pub fn snapped_cursor(&self, x: f64, y: f64) -> Point {
        snap_scaled(Point::new(x, y), self.pitch(), self.scale)
    }

    // ─── Layers ──────────────────────────────────────────────────────────

    /// Append a new layer named `Layer <n>`.
    ///
    /// # Errors
    /// `LayerIdsExhausted` when no fresh layer id is left.
    pub fn add_layer(&mut self) -> Result<LayerId, EditorError> {
        let id = self.ids.next_layer()?;
        self.design.add_layer(Layer::new(id, format!("Layer {}", id.0)));
        log::info!("layer {id} added");
        Ok(id)
    }

    /// Create layer `id` if it does not exist yet. Returns true if created.
    ///
    /// # Errors
    /// `LayerIdsExhausted` for an id the allocator cannot move past; no
    /// layer is created.
    pub fn ensure_layer(&mut self, id: LayerId) -> Result<bool, EditorError> {
        if self.design.layer(id).is_some() {
            return Ok(false);
        }
        self.ids.reserve_layer(id)?;
        self.design.add_layer(Layer::new(id, format!("Layer {}", id.0)));
        log::info!("layer {id} added by host");
        Ok(true)
    }

    /// # Errors
    /// `UnknownLayer` or `LastLayer`.
    pub fn remove_layer(&mut self, id: LayerId) -> Result<RemovedLayer, EditorError> {
        let removed = self.design.remove_layer(id)?;
        log::info!(
            "layer {id} removed with {} slats and {} cargo tokens",
            removed.slats.len(),
            removed.cargo.len()
        );
        Ok(removed)
    }

    /// # Errors
    /// `UnknownLayer`.
    pub fn set_active_layer(&mut self, id: LayerId) -> Result<(), EditorError> {
        self.design.set_active_layer(id)
    }

    /// # Errors
    /// `UnknownLayer`.
    pub fn set_layer_visible(&mut self, id: LayerId, visible: bool) -> Result<(), EditorError> {
        self.design.set_layer_visible(id, visible)
    }

    /// # Errors
    /// `NoActiveLayer` if the design has no layers.
    pub fn active_layer(&self) -> Result<LayerId, EditorError> {
        self.design.active_layer().ok_or(EditorError::NoActiveLayer)
    }

    // ─── Mutations ───────────────────────────────────────────────────────

    /// Validate and apply one mutation.
    ///
    /// # Errors
    /// `InvalidGridPosition` for off-grid coordinates, `CollisionRejected`
    /// when the target is occupied, or an `Unknown*` error for stale ids.
    pub fn apply(&mut self, mutation: DesignMutation) -> Result<Applied, EditorError> {
        let pitch = self.pitch();
        match mutation {
            DesignMutation::PlaceSlat {
                layer,
                anchor,
                orientation,
            } => {
                require_on_grid(anchor, pitch)?;
                if self.design.layer(layer).is_none() {
                    return Err(EditorError::UnknownLayer(layer));
                }
                let candidate = slat_line(anchor, orientation, self.config.slat_length, pitch);
                let index = CollisionIndex::for_layer(&self.design, layer, pitch);
                if index.segment_overlaps(candidate, None) {
                    return Err(EditorError::CollisionRejected {
                        x: anchor.x,
                        y: anchor.y,
                    });
                }
                let id = self.ids.next_slat();
                self.design.add_slat(Slat {
                    id,
                    layer,
                    orientation,
                    anchor,
                    length: self.config.slat_length,
                    style: self.config.slat_style,
                })?;
                log::debug!("slat {id} placed at ({}, {}) on {layer}", anchor.x, anchor.y);
                Ok(Applied::SlatPlaced(id))
            }
            DesignMutation::MoveSlat { id, to } => {
                require_on_grid(to, pitch)?;
                let slat = self.design.slat(id).ok_or(EditorError::UnknownSlat(id))?;
                let from = slat.anchor;
                let candidate = slat_line(to, slat.orientation, slat.length, pitch);
                let index = CollisionIndex::for_layer(&self.design, slat.layer, pitch);
                if index.segment_overlaps(candidate, Some(id)) {
                    return Err(EditorError::CollisionRejected { x: to.x, y: to.y });
                }
                if let Some(slat) = self.design.slat_mut(id) {
                    slat.anchor = to;
                }
                Ok(Applied::SlatMoved { id, from, to })
            }
            DesignMutation::RemoveSlat { id } => {
                let slat = self.design.remove_slat(id)?;
                log::debug!("slat {id} removed");
                Ok(Applied::SlatRemoved(slat))
            }
            DesignMutation::PlaceCargo {
                layer,
                item,
                position,
            } => {
                require_on_grid(position, pitch)?;
                if self.design.layer(layer).is_none() {
                    return Err(EditorError::UnknownLayer(layer));
                }
                if self.inventory.get(item).is_none() {
                    return Err(EditorError::UnknownInventoryItem(item));
                }
                if self.design.cargo_at(layer, position).is_some() {
                    return Err(EditorError::CollisionRejected {
                        x: position.x,
                        y: position.y,
                    });
                }
                let id = self.ids.next_cargo();
                self.design.add_cargo(Cargo {
                    id,
                    layer,
                    item,
                    position,
                })?;
                log::debug!("cargo {id} (item {item}) placed on {layer}");
                Ok(Applied::CargoPlaced(id))
            }
            DesignMutation::RemoveCargo { id } => Ok(Applied::CargoRemoved(self.design.remove_cargo(id)?)),
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
        self.inventory.add(name, tag, color).cloned()
    }

    /// Placed markers reference items by id, so they pick up the change on
    /// the next render.
    ///
    /// # Errors
    /// `UnknownInventoryItem` or `InvalidColor`.
    pub fn update_inventory_item(
        &mut self,
        id: u32,
        patch: ItemPatch,
    ) -> Result<InventoryItem, EditorError> {
        self.inventory.update(id, patch).cloned()
    }

    /// Remove an item together with every marker placed for it.
    ///
    /// # Errors
    /// `UnknownInventoryItem`.
    pub fn remove_inventory_item(&mut self, id: u32) -> Result<(InventoryItem, Vec<Cargo>), EditorError> {
        let item = self.inventory.remove(id)?;
        let markers = self.design.remove_cargo_for_item(id);
        if self.selected_cargo == Some(id) {
            self.selected_cargo = None;
        }
        Ok((item, markers))
    }

    /// Swap in a freshly fetched list and prune markers of vanished items.
    /// Returns the pruned markers.
    pub fn replace_inventory(&mut self, items: Vec<InventoryItem>) -> Vec<Cargo> {
        let gone = self.inventory.replace_all(items);
        let mut pruned = Vec::new();
        for id in gone {
            pruned.extend(self.design.remove_cargo_for_item(id));
            if self.selected_cargo == Some(id) {
                self.selected_cargo = None;
            }
        }
        log::info!(
            "inventory replaced: {} items, {} markers pruned",
            self.inventory.len(),
            pruned.len()
        );
        pruned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn session() -> Session {
        Session::new(EditorConfig::default()).unwrap()
    }

    fn place(s: &mut Session, x: f64, y: f64) -> Result<Applied, EditorError> {
        let layer = s.active_layer().unwrap();
        s.apply(DesignMutation::PlaceSlat {
            layer,
            anchor: Point::new(x, y),
            orientation: Orientation::Vertical,
        })
    }

    #[test]
    fn starts_with_two_layers_first_active() {
        let s = session();
        assert_eq!(s.design().layer_ids(), vec![LayerId(1), LayerId(2)]);
        assert_eq!(s.active_layer().unwrap(), LayerId(1));
        assert_eq!(s.design().layer(LayerId(2)).unwrap().name, "Layer 2");
    }

    #[test]
    fn zero_initial_layers_still_gets_one() {
        let cfg = EditorConfig {
            initial_layers: 0,
            ..EditorConfig::default()
        };
        let s = Session::new(cfg).unwrap();
        assert_eq!(s.design().layer_count(), 1);
    }

    #[test]
    fn place_assigns_fresh_ids_and_rejects_overlap() {
        let mut s = session();
        assert_eq!(place(&mut s, 100.0, 100.0), Ok(Applied::SlatPlaced(SlatId(0))));
        assert_eq!(
            place(&mut s, 100.0, 100.0),
            Err(EditorError::CollisionRejected { x: 100.0, y: 100.0 })
        );
        assert_eq!(s.design().slat_count(), 1);
        // A rejected placement does not burn an id.
        assert_eq!(place(&mut s, 110.0, 100.0), Ok(Applied::SlatPlaced(SlatId(1))));
    }

    #[test]
    fn off_grid_anchor_is_rejected() {
        let mut s = session();
        assert!(matches!(
            place(&mut s, 105.0, 100.0),
            Err(EditorError::InvalidGridPosition { .. })
        ));
    }

    #[test]
    fn move_excludes_self_and_checks_others() {
        let mut s = session();
        place(&mut s, 100.0, 100.0).unwrap();
        place(&mut s, 200.0, 100.0).unwrap();

        // Sliding along its own column only overlaps itself.
        let moved = s
            .apply(DesignMutation::MoveSlat {
                id: SlatId(0),
                to: Point::new(100.0, 110.0),
            })
            .unwrap();
        assert_eq!(
            moved,
            Applied::SlatMoved {
                id: SlatId(0),
                from: Point::new(100.0, 100.0),
                to: Point::new(100.0, 110.0)
            }
        );

        let err = s
            .apply(DesignMutation::MoveSlat {
                id: SlatId(0),
                to: Point::new(200.0, 300.0),
            })
            .unwrap_err();
        assert!(matches!(err, EditorError::CollisionRejected { .. }));
        assert_eq!(s.design().slat(SlatId(0)).unwrap().anchor, Point::new(100.0, 110.0));
    }

    #[test]
    fn other_layers_do_not_collide() {
        let mut s = session();
        place(&mut s, 100.0, 100.0).unwrap();
        s.set_active_layer(LayerId(2)).unwrap();
        assert!(place(&mut s, 100.0, 100.0).is_ok());
    }

    #[test]
    fn cargo_needs_known_item_and_free_point() {
        let mut s = session();
        let layer = s.active_layer().unwrap();
        let at = Point::new(50.0, 50.0);
        assert_eq!(
            s.apply(DesignMutation::PlaceCargo {
                layer,
                item: 99,
                position: at
            }),
            Err(EditorError::UnknownInventoryItem(99))
        );
        assert!(
            s.apply(DesignMutation::PlaceCargo {
                layer,
                item: 1,
                position: at
            })
            .is_ok()
        );
        assert!(matches!(
            s.apply(DesignMutation::PlaceCargo {
                layer,
                item: 2,
                position: at
            }),
            Err(EditorError::CollisionRejected { .. })
        ));
    }

    #[test]
    fn failed_cargo_placement_keeps_the_id() {
        let mut s = session();
        let at = Point::new(50.0, 50.0);
        assert_eq!(
            s.apply(DesignMutation::PlaceCargo {
                layer: LayerId(9),
                item: 1,
                position: at
            }),
            Err(EditorError::UnknownLayer(LayerId(9)))
        );
        assert_eq!(
            s.apply(DesignMutation::PlaceCargo {
                layer: LayerId(1),
                item: 1,
                position: at
            }),
            Ok(Applied::CargoPlaced(CargoId(0)))
        );
    }

    #[test]
    fn host_layer_at_top_of_id_range_is_refused() {
        let mut s = session();
        assert_eq!(
            s.ensure_layer(LayerId(u32::MAX)),
            Err(EditorError::LayerIdsExhausted(LayerId(u32::MAX)))
        );
        assert!(s.design().layer(LayerId(u32::MAX)).is_none());
        assert_eq!(s.ensure_layer(LayerId(u32::MAX - 1)), Ok(true));
        assert_eq!(s.ensure_layer(LayerId(u32::MAX - 1)), Ok(false));
        assert!(matches!(s.add_layer(), Err(EditorError::LayerIdsExhausted(_))));
        assert_eq!(s.design().layer_count(), 3);
    }

    #[test]
    fn grid_style_is_the_only_mutable_setting() {
        let mut s = session();
        s.set_grid_style(GridStyle::Dots);
        assert_eq!(s.config().grid.style, GridStyle::Dots);
        assert_eq!(s.pitch(), 10.0);
    }

    #[test]
    fn removing_item_removes_its_markers() {
        let mut s = session();
        let layer = s.active_layer().unwrap();
        for (i, item) in [1, 1, 2].into_iter().enumerate() {
            s.apply(DesignMutation::PlaceCargo {
                layer,
                item,
                position: Point::new(i as f64 * 10.0, 0.0),
            })
            .unwrap();
        }
        s.selected_cargo = Some(1);
        let (item, markers) = s.remove_inventory_item(1).unwrap();
        assert_eq!(item.tag, "GFP");
        assert_eq!(markers.len(), 2);
        assert_eq!(s.design().all_cargo().len(), 1);
        assert_eq!(s.selected_cargo, None);
    }

    #[test]
    fn reset_restarts_counters() {
        let mut s = session();
        place(&mut s, 0.0, 0.0).unwrap();
        s.add_layer().unwrap();
        s.reset();
        assert_eq!(s.design().slat_count(), 0);
        assert_eq!(s.design().layer_ids(), vec![LayerId(1), LayerId(2)]);
        assert_eq!(place(&mut s, 0.0, 0.0), Ok(Applied::SlatPlaced(SlatId(0))));
    }

    #[test]
    fn scale_maps_screen_to_canvas() {
        let mut s = session();
        s.set_scale(2.0);
        assert_eq!(s.to_canvas(200.0, 50.0), (100.0, 25.0));
        assert_eq!(s.snapped_cursor(205.0, 419.0), Point::new(100.0, 210.0));
        s.set_scale(-1.0);
        assert_eq!(s.scale(), 2.0);
    }
}
