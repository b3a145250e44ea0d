//! Placement controller.
//!
//! Turns a pointer-down in slat mode into a `PlaceSlat` mutation, or into
//! nothing when the full-length candidate would touch a slat already on the
//! active layer.

use crate::session::DesignMutation;
use crate::tools::ToolContext;
use slat_core::grid::snap;
use slat_core::model::slat_line;
use slat_core::Point;
use slat_render::hit::CollisionIndex;

/// Build the mutation for placing a slat under `pointer` (canvas units).
///
/// Collisions are a silent no-op: `None` is returned and the reason is only
/// logged.
pub fn request_placement(pointer: Point, ctx: &ToolContext<'_>) -> Option<DesignMutation> {
    let pitch = ctx.config.pitch();
    let anchor = snap(pointer, pitch);
    let candidate = slat_line(anchor, ctx.orientation, ctx.config.slat_length, pitch);

    let index = CollisionIndex::for_layer(ctx.design, ctx.layer, pitch);
    if let Some(hit) = index.first_collision(candidate, None) {
        log::debug!(
            "placement at ({}, {}) rejected: touches slat {hit}",
            anchor.x,
            anchor.y
        );
        return None;
    }

    Some(DesignMutation::PlaceSlat {
        layer: ctx.layer,
        anchor,
        orientation: ctx.orientation,
    })
}
