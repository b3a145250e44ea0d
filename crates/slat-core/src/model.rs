//! Design data model.
//!
//! The design is a tree stored in a `StableDiGraph`: the root owns layers,
//! and each layer owns its slats and cargo tokens. Edges are parent→child
//! containment, so dropping a layer's subtree drops everything it owns.
//! Slat anchors are always grid intersections; the geometry helpers here
//! take the grid pitch explicitly because the model stores cell counts, not
//! canvas lengths.

use crate::error::EditorError;
use crate::id::{CargoId, ElementId, LayerId, SlatId};
use kurbo::{Line, Point, Rect, Vec2};
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

// ─── Colors ──────────────────────────────────────────────────────────────

/// RGBA color. Stored as 4 × f32 [0.0, 1.0]; serialized as a hex string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

fn hex_val(c: u8) -> Option<u8> {
    match c {
        b'0'..=b'9' => Some(c - b'0'),
        b'a'..=b'f' => Some(c - b'a' + 10),
        b'A'..=b'F' => Some(c - b'A' + 10),
        _ => None,
    }
}

impl Color {
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);

    /// Parse `#RGB`, `#RRGGBB` or `#RRGGBBAA`. The `#` is optional.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        let bytes = hex.as_bytes();
        let pair = |i: usize| -> Option<f32> {
            let v = hex_val(bytes[i])? << 4 | hex_val(bytes[i + 1])?;
            Some(f32::from(v) / 255.0)
        };

        match bytes.len() {
            3 => {
                let short = |i: usize| hex_val(bytes[i]).map(|v| f32::from(v * 17) / 255.0);
                Some(Self::rgba(short(0)?, short(1)?, short(2)?, 1.0))
            }
            6 => Some(Self::rgba(pair(0)?, pair(2)?, pair(4)?, 1.0)),
            8 => Some(Self::rgba(pair(0)?, pair(2)?, pair(4)?, pair(6)?)),
            _ => None,
        }
    }

    /// `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        let (r, g, b, a) = (c(self.r), c(self.g), c(self.b), c(self.a));
        if a == 255 {
            format!("#{r:02X}{g:02X}{b:02X}")
        } else {
            format!("#{r:02X}{g:02X}{b:02X}{a:02X}")
        }
    }

    /// # Errors
    /// `InvalidColor` when `hex` is not a recognised hex color.
    pub fn parse(hex: &str) -> Result<Self, EditorError> {
        Self::from_hex(hex).ok_or_else(|| EditorError::InvalidColor(hex.to_string()))
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Color::from_hex(&s).ok_or_else(|| serde::de::Error::custom(format!("invalid color `{s}`")))
    }
}

// ─── Slats ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

impl Orientation {
    pub fn toggle(self) -> Self {
        match self {
            Orientation::Vertical => Orientation::Horizontal,
            Orientation::Horizontal => Orientation::Vertical,
        }
    }

    /// Unit step from the anchor toward the far end.
    pub fn direction(self) -> Vec2 {
        match self {
            Orientation::Vertical => Vec2::new(0.0, 1.0),
            Orientation::Horizontal => Vec2::new(1.0, 0.0),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Orientation::Vertical => "vertical",
            Orientation::Horizontal => "horizontal",
        }
    }
}

/// The line a slat of `length` cells would occupy when anchored at `anchor`.
pub fn slat_line(anchor: Point, orientation: Orientation, length: u32, pitch: f64) -> Line {
    let end = anchor + orientation.direction() * (f64::from(length) * pitch);
    Line::new(anchor, end)
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SlatStyle {
    pub stroke: Color,
    pub width: f64,
    pub opacity: f64,
}

impl Default for SlatStyle {
    fn default() -> Self {
        Self {
            stroke: Color::rgba(7.0 / 255.0, 105.0 / 255.0, 0.0, 1.0),
            width: 3.0,
            opacity: 1.0,
        }
    }
}

/// A fixed-length, axis-aligned segment placed on the grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slat {
    pub id: SlatId,
    pub layer: LayerId,
    pub orientation: Orientation,
    /// Grid-aligned start point in canvas units.
    pub anchor: Point,
    /// Length in grid cells.
    pub length: u32,
    pub style: SlatStyle,
}

impl Slat {
    pub fn line(&self, pitch: f64) -> Line {
        slat_line(self.anchor, self.orientation, self.length, pitch)
    }

    pub fn end(&self, pitch: f64) -> Point {
        self.line(pitch).p1
    }

    /// Axis-aligned bounding box. Degenerate (zero width or height) by nature.
    pub fn bounds(&self, pitch: f64) -> Rect {
        Rect::from_points(self.anchor, self.end(pitch))
    }

    /// Element id used on the canvas, e.g. `ID-L1-N4`.
    pub fn dom_id(&self) -> String {
        format!("ID-L{}-N{}", self.layer.0, self.id.0)
    }
}

// ─── Cargo ───────────────────────────────────────────────────────────────

/// A marker tied to an inventory item, placed on a grid point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cargo {
    pub id: CargoId,
    pub layer: LayerId,
    /// Inventory item this token represents.
    pub item: u32,
    pub position: Point,
}

impl Cargo {
    pub fn dom_id(&self) -> String {
        format!("ID-L{}-C{}", self.layer.0, self.id.0)
    }
}

// ─── Layers ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
    pub id: LayerId,
    pub name: String,
    pub visible: bool,
}

impl Layer {
    pub fn new(id: LayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            visible: true,
        }
    }

    /// Id of the drawing group holding this layer's elements.
    pub fn group_id(&self) -> String {
        format!("layer-{}", self.id)
    }
}

// ─── Design graph ────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub enum DesignNode {
    Root,
    Layer(Layer),
    Slat(Slat),
    Cargo(Cargo),
}

impl DesignNode {
    pub fn element_id(&self) -> ElementId {
        match self {
            DesignNode::Root => ElementId::Root,
            DesignNode::Layer(l) => ElementId::Layer(l.id),
            DesignNode::Slat(s) => ElementId::Slat(s.id),
            DesignNode::Cargo(c) => ElementId::Cargo(c.id),
        }
    }
}

/// Everything a removed layer took with it.
#[derive(Debug, Clone)]
pub struct RemovedLayer {
    pub layer: Layer,
    pub slats: Vec<Slat>,
    pub cargo: Vec<Cargo>,
}

/// The whole design: layers in insertion order, each owning its elements.
#[derive(Debug, Clone)]
pub struct Design {
    pub graph: StableDiGraph<DesignNode, ()>,
    pub root: NodeIndex,
    id_index: HashMap<ElementId, NodeIndex>,
    active_layer: Option<LayerId>,
}

impl Default for Design {
    fn default() -> Self {
        Self::new()
    }
}

impl Design {
    #[must_use]
    pub fn new() -> Self {
        let mut graph = StableDiGraph::new();
        let root = graph.add_node(DesignNode::Root);
        let mut id_index = HashMap::new();
        id_index.insert(ElementId::Root, root);
        Self {
            graph,
            root,
            id_index,
            active_layer: None,
        }
    }

    fn insert(&mut self, parent: NodeIndex, node: DesignNode) -> NodeIndex {
        let id = node.element_id();
        let idx = self.graph.add_node(node);
        self.graph.add_edge(parent, idx, ());
        self.id_index.insert(id, idx);
        idx
    }

    fn detach(&mut self, idx: NodeIndex) -> Option<DesignNode> {
        let removed = self.graph.remove_node(idx);
        if let Some(node) = &removed {
            self.id_index.remove(&node.element_id());
        }
        removed
    }

    pub fn index_of(&self, id: ElementId) -> Option<NodeIndex> {
        self.id_index.get(&id).copied()
    }

    /// Children in insertion order.
    ///
    /// Sorted by `NodeIndex` so iteration order does not depend on how
    /// `petgraph` walks its adjacency list.
    pub fn children(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut children: Vec<NodeIndex> = self
            .graph
            .neighbors_directed(idx, petgraph::Direction::Outgoing)
            .collect();
        children.sort();
        children
    }

    // ── Layers ──

    /// Append a layer. The first layer of an empty design becomes active.
    pub fn add_layer(&mut self, layer: Layer) -> NodeIndex {
        let id = layer.id;
        let idx = self.insert(self.root, DesignNode::Layer(layer));
        if self.active_layer.is_none() {
            self.active_layer = Some(id);
        }
        idx
    }

    /// Remove a layer and everything it owns.
    ///
    /// If the active layer goes, the first remaining layer takes over.
    ///
    /// # Errors
    /// `UnknownLayer` for a missing id, `LastLayer` when it is the only one.
    pub fn remove_layer(&mut self, id: LayerId) -> Result<RemovedLayer, EditorError> {
        let idx = self
            .index_of(ElementId::Layer(id))
            .ok_or(EditorError::UnknownLayer(id))?;
        if self.layer_count() == 1 {
            return Err(EditorError::LastLayer(id));
        }

        let mut slats = Vec::new();
        let mut cargo = Vec::new();
        for child in self.children(idx) {
            match self.detach(child) {
                Some(DesignNode::Slat(s)) => slats.push(s),
                Some(DesignNode::Cargo(c)) => cargo.push(c),
                _ => {}
            }
        }
        let layer = match self.detach(idx) {
            Some(DesignNode::Layer(layer)) => layer,
            _ => return Err(EditorError::UnknownLayer(id)),
        };

        if self.active_layer == Some(id) {
            self.active_layer = self.layer_ids().first().copied();
        }
        Ok(RemovedLayer {
            layer,
            slats,
            cargo,
        })
    }

    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        match self.index_of(ElementId::Layer(id)).map(|idx| &self.graph[idx]) {
            Some(DesignNode::Layer(l)) => Some(l),
            _ => None,
        }
    }

    pub fn layer_mut(&mut self, id: LayerId) -> Option<&mut Layer> {
        let idx = self.index_of(ElementId::Layer(id))?;
        match &mut self.graph[idx] {
            DesignNode::Layer(l) => Some(l),
            _ => None,
        }
    }

    /// Layers in insertion order.
    pub fn layers(&self) -> Vec<&Layer> {
        self.children(self.root)
            .into_iter()
            .filter_map(|idx| match &self.graph[idx] {
                DesignNode::Layer(l) => Some(l),
                _ => None,
            })
            .collect()
    }

    pub fn layer_ids(&self) -> Vec<LayerId> {
        self.layers().into_iter().map(|l| l.id).collect()
    }

    pub fn layer_count(&self) -> usize {
        self.layers().len()
    }

    pub fn active_layer(&self) -> Option<LayerId> {
        self.active_layer
    }

    /// # Errors
    /// `UnknownLayer` if `id` is not in the design.
    pub fn set_active_layer(&mut self, id: LayerId) -> Result<(), EditorError> {
        if self.layer(id).is_none() {
            return Err(EditorError::UnknownLayer(id));
        }
        self.active_layer = Some(id);
        Ok(())
    }

    /// # Errors
    /// `UnknownLayer` if `id` is not in the design.
    pub fn set_layer_visible(&mut self, id: LayerId, visible: bool) -> Result<(), EditorError> {
        let layer = self.layer_mut(id).ok_or(EditorError::UnknownLayer(id))?;
        layer.visible = visible;
        Ok(())
    }

    // ── Slats ──

    /// Attach a slat to its layer. Collision is not checked here.
    ///
    /// # Errors
    /// `UnknownLayer` if the slat's layer does not exist.
    pub fn add_slat(&mut self, slat: Slat) -> Result<NodeIndex, EditorError> {
        let parent = self
            .index_of(ElementId::Layer(slat.layer))
            .ok_or(EditorError::UnknownLayer(slat.layer))?;
        Ok(self.insert(parent, DesignNode::Slat(slat)))
    }

    pub fn slat(&self, id: SlatId) -> Option<&Slat> {
        match self.index_of(ElementId::Slat(id)).map(|idx| &self.graph[idx]) {
            Some(DesignNode::Slat(s)) => Some(s),
            _ => None,
        }
    }

    pub fn slat_mut(&mut self, id: SlatId) -> Option<&mut Slat> {
        let idx = self.index_of(ElementId::Slat(id))?;
        match &mut self.graph[idx] {
            DesignNode::Slat(s) => Some(s),
            _ => None,
        }
    }

    /// # Errors
    /// `UnknownSlat` if there is no such slat.
    pub fn remove_slat(&mut self, id: SlatId) -> Result<Slat, EditorError> {
        let idx = self
            .index_of(ElementId::Slat(id))
            .ok_or(EditorError::UnknownSlat(id))?;
        match self.detach(idx) {
            Some(DesignNode::Slat(s)) => Ok(s),
            _ => Err(EditorError::UnknownSlat(id)),
        }
    }

    /// Every slat in the design, layer by layer.
    pub fn slats(&self) -> Vec<&Slat> {
        self.layer_ids()
            .into_iter()
            .flat_map(|id| self.slats_in_layer(id))
            .collect()
    }

    /// Slats owned by `layer`, in placement order.
    pub fn slats_in_layer(&self, layer: LayerId) -> Vec<&Slat> {
        let Some(idx) = self.index_of(ElementId::Layer(layer)) else {
            return Vec::new();
        };
        self.children(idx)
            .into_iter()
            .filter_map(|c| match &self.graph[c] {
                DesignNode::Slat(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    pub fn slat_count(&self) -> usize {
        self.graph
            .node_indices()
            .filter(|&idx| matches!(self.graph[idx], DesignNode::Slat(_)))
            .count()
    }

    // ── Cargo ──

    /// # Errors
    /// `UnknownLayer` if the token's layer does not exist.
    pub fn add_cargo(&mut self, cargo: Cargo) -> Result<NodeIndex, EditorError> {
        let parent = self
            .index_of(ElementId::Layer(cargo.layer))
            .ok_or(EditorError::UnknownLayer(cargo.layer))?;
        Ok(self.insert(parent, DesignNode::Cargo(cargo)))
    }

    pub fn cargo(&self, id: CargoId) -> Option<&Cargo> {
        match self.index_of(ElementId::Cargo(id)).map(|idx| &self.graph[idx]) {
            Some(DesignNode::Cargo(c)) => Some(c),
            _ => None,
        }
    }

    /// # Errors
    /// `UnknownCargo` if there is no such token.
    pub fn remove_cargo(&mut self, id: CargoId) -> Result<Cargo, EditorError> {
        let idx = self
            .index_of(ElementId::Cargo(id))
            .ok_or(EditorError::UnknownCargo(id))?;
        match self.detach(idx) {
            Some(DesignNode::Cargo(c)) => Ok(c),
            _ => Err(EditorError::UnknownCargo(id)),
        }
    }

    pub fn cargo_in_layer(&self, layer: LayerId) -> Vec<&Cargo> {
        let Some(idx) = self.index_of(ElementId::Layer(layer)) else {
            return Vec::new();
        };
        self.children(idx)
            .into_iter()
            .filter_map(|c| match &self.graph[c] {
                DesignNode::Cargo(cargo) => Some(cargo),
                _ => None,
            })
            .collect()
    }

    pub fn all_cargo(&self) -> Vec<&Cargo> {
        self.layer_ids()
            .into_iter()
            .flat_map(|id| self.cargo_in_layer(id))
            .collect()
    }

    /// Token sitting exactly on `point` in `layer`, if any.
    pub fn cargo_at(&self, layer: LayerId, point: Point) -> Option<CargoId> {
        self.cargo_in_layer(layer)
            .into_iter()
            .find(|c| (c.position - point).hypot() < 1e-6)
            .map(|c| c.id)
    }

    /// Drop every token that represents inventory item `item`.
    pub fn remove_cargo_for_item(&mut self, item: u32) -> Vec<Cargo> {
        let ids: Vec<CargoId> = self
            .all_cargo()
            .into_iter()
            .filter(|c| c.item == item)
            .map(|c| c.id)
            .collect();
        ids.into_iter()
            .filter_map(|id| self.remove_cargo(id).ok())
            .collect()
    }
}
