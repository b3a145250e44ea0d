//! Tool system for canvas interactions.
//!
//! Each tool translates pointer events (already in canvas units) into
//! `DesignMutation`s that the session validates and applies.
//!
//! | Mode   | Pointer-down on empty grid | Pointer-down on element |
//! |--------|----------------------------|-------------------------|
//! | Slats  | place slat                 | select + start drag     |
//! | Cargo  | place token (item selected) | remove token (no item) |
//!
//! While the host is panning every tool ignores pointer-down.

use crate::drag::DragController;
use crate::input::InputEvent;
use crate::placement::request_placement;
use crate::session::DesignMutation;
use slat_core::config::EditorConfig;
use slat_core::grid::snap;
use slat_core::id::{LayerId, SlatId};
use slat_core::model::{Design, Orientation};
use slat_core::Point;
use slat_render::hit::{hit_test_cargo, hit_test_slat};

/// The draw mode determines how pointer events are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ToolKind {
    #[default]
    Slat,
    Cargo,
}

impl ToolKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ToolKind::Slat => "slats",
            ToolKind::Cargo => "cargo",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "slat" | "slats" => Some(ToolKind::Slat),
            "cargo" => Some(ToolKind::Cargo),
            _ => None,
        }
    }
}

/// Read-only view of the session a tool needs to decide what to emit.
#[derive(Debug, Clone, Copy)]
pub struct ToolContext<'a> {
    pub design: &'a Design,
    pub config: &'a EditorConfig,
    /// Active layer; new elements land here and only its slats can be grabbed.
    pub layer: LayerId,
    pub orientation: Orientation,
    pub selected_cargo: Option<u32>,
    pub pan_enabled: bool,
}

impl<'a> ToolContext<'a> {
    pub fn new(design: &'a Design, config: &'a EditorConfig, layer: LayerId) -> Self {
        Self {
            design,
            config,
            layer,
            orientation: Orientation::default(),
            selected_cargo: None,
            pan_enabled: false,
        }
    }
}

/// Trait for tools that handle input and produce mutations.
pub trait Tool {
    fn kind(&self) -> ToolKind;

    /// Handle an input event, returning zero or more mutations.
    fn handle(&mut self, event: &InputEvent, ctx: &ToolContext<'_>) -> Vec<DesignMutation>;

    /// Drop any in-progress interaction (mode switch, layer change).
    fn cancel(&mut self) {}
}

// ─── Slat Tool ───────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct SlatTool {
    pub drag: DragController,
    /// Last slat picked with the pointer; target of Delete.
    pub selected: Option<SlatId>,
}

impl SlatTool {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tool for SlatTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Slat
    }

    fn handle(&mut self, event: &InputEvent, ctx: &ToolContext<'_>) -> Vec<DesignMutation> {
        match event {
            InputEvent::PointerDown { x, y, .. } => {
                if ctx.pan_enabled {
                    return vec![];
                }
                let pointer = Point::new(*x, *y);
                let hit = hit_test_slat(
                    ctx.design,
                    ctx.layer,
                    pointer,
                    ctx.config.pitch(),
                    ctx.config.hit_distance(),
                );
                if let Some(id) = hit {
                    self.selected = Some(id);
                    self.drag.begin(id, pointer, ctx);
                    return vec![];
                }
                self.selected = None;
                request_placement(pointer, ctx).into_iter().collect()
            }
            InputEvent::PointerMove { x, y, .. } => self
                .drag
                .update(Point::new(*x, *y), ctx)
                .into_iter()
                .collect(),
            InputEvent::PointerUp { .. } => {
                self.drag.end();
                vec![]
            }
        }
    }

    fn cancel(&mut self) {
        self.drag.end();
    }
}

// ─── Cargo Tool ──────────────────────────────────────────────────────────

#[derive(Debug, Default)]
pub struct CargoTool;

impl Tool for CargoTool {
    fn kind(&self) -> ToolKind {
        ToolKind::Cargo
    }

    fn handle(&mut self, event: &InputEvent, ctx: &ToolContext<'_>) -> Vec<DesignMutation> {
        let InputEvent::PointerDown { x, y, .. } = event else {
            return vec![];
        };
        if ctx.pan_enabled {
            return vec![];
        }
        let pointer = Point::new(*x, *y);

        match ctx.selected_cargo {
            Some(item) => {
                let position = snap(pointer, ctx.config.pitch());
                if let Some(existing) = ctx.design.cargo_at(ctx.layer, position) {
                    log::debug!("cargo placement rejected: {existing} already there");
                    return vec![];
                }
                vec![DesignMutation::PlaceCargo {
                    layer: ctx.layer,
                    item,
                    position,
                }]
            }
            // With no item selected, clicking a token deletes it
            None => hit_test_cargo(ctx.design, ctx.layer, pointer, ctx.config.cargo_radius_px())
                .map(|id| DesignMutation::RemoveCargo { id })
                .into_iter()
                .collect(),
        }
    }
}
