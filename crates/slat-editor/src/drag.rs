//! Drag controller: `Idle → Dragging → Idle`.
//!
//! Pointer-down over a slat of the active layer records where on the slat it
//! was grabbed. Every pointer-move snaps `pointer - grab_offset` to the grid
//! and proposes a move only if the relocated slat would not touch any other
//! slat of its layer. A blocked move proposes nothing, so the slat stays at
//! its last valid anchor. Pointer-up returns to idle.

use crate::session::DesignMutation;
use crate::tools::ToolContext;
use slat_core::grid::snap;
use slat_core::id::SlatId;
use slat_core::model::slat_line;
use slat_core::{Point, Vec2};
use slat_render::hit::CollisionIndex;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        slat: SlatId,
        /// Pointer position minus the slat anchor at grab time.
        grab_offset: Vec2,
    },
}

#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn dragged(&self) -> Option<SlatId> {
        match self.state {
            DragState::Dragging { slat, .. } => Some(slat),
            DragState::Idle => None,
        }
    }

    /// Start dragging `slat`. Returns false (and stays idle) if the slat is
    /// not on the context's layer.
    pub fn begin(&mut self, slat: SlatId, pointer: Point, ctx: &ToolContext<'_>) -> bool {
        let Some(s) = ctx.design.slat(slat) else {
            return false;
        };
        if s.layer != ctx.layer {
            log::debug!("drag of {slat} ignored: not on active layer {}", ctx.layer);
            return false;
        }
        self.state = DragState::Dragging {
            slat,
            grab_offset: pointer - s.anchor,
        };
        true
    }

    /// Propose a move for the current pointer position.
    pub fn update(&mut self, pointer: Point, ctx: &ToolContext<'_>) -> Option<DesignMutation> {
        let DragState::Dragging { slat, grab_offset } = self.state else {
            return None;
        };
        let Some(current) = ctx.design.slat(slat) else {
            // Removed underneath us (layer deleted mid-drag)
            self.state = DragState::Idle;
            return None;
        };

        let pitch = ctx.config.pitch();
        let target = snap(pointer - grab_offset, pitch);
        if target == current.anchor {
            return None;
        }

        let candidate = slat_line(target, current.orientation, current.length, pitch);
        let index = CollisionIndex::for_layer(ctx.design, current.layer, pitch);
        if index.segment_overlaps(candidate, Some(slat)) {
            log::debug!("drag of {slat} to ({}, {}) blocked", target.x, target.y);
            return None;
        }

        Some(DesignMutation::MoveSlat {
            id: slat,
            to: target,
        })
    }

    /// Back to idle. Returns the slat that was being dragged, if any.
    pub fn end(&mut self) -> Option<SlatId> {
        let dragged = self.dragged();
        self.state = DragState::Idle;
        dragged
    }
}
