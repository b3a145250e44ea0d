//! Collision index and hit testing: point → slat lookup.
//!
//! Slats are axis-aligned and grid-aligned, so a candidate overlaps an
//! existing slat exactly when one of its grid-pitch samples falls inside
//! that slat's bounding box. Bounding boxes are closed (edges count), which
//! also makes touching end-to-end a collision.

use kurbo::{Line, Point, Rect};
use slat_core::id::{CargoId, LayerId, SlatId};
use slat_core::model::Design;
use smallvec::SmallVec;

/// Slack for floating-point comparisons against box edges.
const EDGE_EPSILON: f64 = 1e-6;

/// A 32-cell slat samples 33 points; anything past 64 spills to the heap.
pub type Samples = SmallVec<[Point; 64]>;

fn closed_contains(rect: &Rect, p: Point) -> bool {
    p.x >= rect.x0 - EDGE_EPSILON
        && p.x <= rect.x1 + EDGE_EPSILON
        && p.y >= rect.y0 - EDGE_EPSILON
        && p.y <= rect.y1 + EDGE_EPSILON
}

/// Points along `line` every `pitch`, both ends included.
///
/// A line shorter than half a pitch yields just its start point. Without a
/// usable pitch only the two ends are sampled.
pub fn sample_points(line: Line, pitch: f64) -> Samples {
    let mut out = Samples::new();
    if !(pitch.is_finite() && pitch > 0.0) {
        out.push(line.p0);
        if line.p1 != line.p0 {
            out.push(line.p1);
        }
        return out;
    }
    let steps = ((line.p1 - line.p0).hypot() / pitch).round() as usize;
    if steps == 0 {
        out.push(line.p0);
        return out;
    }
    for i in 0..=steps {
        out.push(line.p0.lerp(line.p1, i as f64 / steps as f64));
    }
    out
}

/// Bounding boxes of the slats a candidate must not touch.
#[derive(Debug, Clone)]
pub struct CollisionIndex {
    pitch: f64,
    entries: Vec<(SlatId, Rect)>,
}

impl CollisionIndex {
    pub fn new(pitch: f64) -> Self {
        Self {
            pitch,
            entries: Vec::new(),
        }
    }

    /// Index every slat owned by `layer`.
    pub fn for_layer(design: &Design, layer: LayerId, pitch: f64) -> Self {
        let mut index = Self::new(pitch);
        for slat in design.slats_in_layer(layer) {
            index.insert(slat.id, slat.bounds(pitch));
        }
        index
    }

    pub fn insert(&mut self, id: SlatId, bounds: Rect) {
        self.entries.push((id, bounds));
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First slat (other than `exclude`) whose box contains `point`.
    pub fn slat_at(&self, point: Point, exclude: Option<SlatId>) -> Option<SlatId> {
        self.entries
            .iter()
            .filter(|(id, _)| Some(*id) != exclude)
            .find(|(_, rect)| closed_contains(rect, point))
            .map(|(id, _)| *id)
    }

    pub fn overlaps(&self, point: Point, exclude: Option<SlatId>) -> bool {
        self.slat_at(point, exclude).is_some()
    }

    /// First slat hit by any grid-pitch sample of `candidate`.
    pub fn first_collision(&self, candidate: Line, exclude: Option<SlatId>) -> Option<SlatId> {
        sample_points(candidate, self.pitch)
            .into_iter()
            .find_map(|p| self.slat_at(p, exclude))
    }

    pub fn segment_overlaps(&self, candidate: Line, exclude: Option<SlatId>) -> bool {
        self.first_collision(candidate, exclude).is_some()
    }
}

/// Topmost slat of `layer` within `tolerance` of `point`.
pub fn hit_test_slat(
    design: &Design,
    layer: LayerId,
    point: Point,
    pitch: f64,
    tolerance: f64,
) -> Option<SlatId> {
    // Last placed paints on top, so walk in reverse
    design
        .slats_in_layer(layer)
        .into_iter()
        .rev()
        .find(|s| closed_contains(&s.bounds(pitch).inflate(tolerance, tolerance), point))
        .map(|s| s.id)
}

/// Topmost cargo token of `layer` whose marker circle contains `point`.
pub fn hit_test_cargo(
    design: &Design,
    layer: LayerId,
    point: Point,
    radius: f64,
) -> Option<CargoId> {
    design
        .cargo_in_layer(layer)
        .into_iter()
        .rev()
        .find(|c| c.position.distance(point) <= radius + EDGE_EPSILON)
        .map(|c| c.id)
}
