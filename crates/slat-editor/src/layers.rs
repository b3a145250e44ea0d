//! Layer boundary.
//!
//! The host's layer list emits `layerAdded`, `layerRemoved`, `layerShown`,
//! `layerHidden` and `layerMarkedActive` events, each carrying a layer id.
//! `LayerGroups` mirrors which drawing group belongs to which layer and the
//! opacity it should have.

use slat_core::error::EditorError;
use slat_core::id::LayerId;
use slat_core::model::Layer;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerEvent {
    Added(LayerId),
    Removed(LayerId),
    Shown(LayerId),
    Hidden(LayerId),
    MarkedActive(LayerId),
}

impl LayerEvent {
    /// Decode a host event name. Both the DOM event names and their short
    /// forms are accepted.
    pub fn parse(kind: &str, id: u32) -> Option<Self> {
        let id = LayerId(id);
        match kind {
            "layerAdded" | "added" => Some(Self::Added(id)),
            "layerRemoved" | "removed" => Some(Self::Removed(id)),
            "layerShown" | "shown" => Some(Self::Shown(id)),
            "layerHidden" | "hidden" => Some(Self::Hidden(id)),
            "layerMarkedActive" | "active" => Some(Self::MarkedActive(id)),
            _ => None,
        }
    }

    pub fn layer(&self) -> LayerId {
        match *self {
            Self::Added(id)
            | Self::Removed(id)
            | Self::Shown(id)
            | Self::Hidden(id)
            | Self::MarkedActive(id) => id,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayerGroup {
    pub dom_id: String,
    pub opacity: f64,
}

/// Layer id → drawing group.
#[derive(Debug, Clone, Default)]
pub struct LayerGroups {
    groups: BTreeMap<LayerId, LayerGroup>,
}

impl LayerGroups {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the mapping for an existing layer list.
    pub fn from_layers<'a>(layers: impl IntoIterator<Item = &'a Layer>) -> Self {
        let mut groups = Self::new();
        for layer in layers {
            groups.insert(layer);
        }
        groups
    }

    pub fn insert(&mut self, layer: &Layer) {
        self.groups.insert(
            layer.id,
            LayerGroup {
                dom_id: layer.group_id(),
                opacity: if layer.visible { 1.0 } else { 0.0 },
            },
        );
    }

    pub fn remove(&mut self, id: LayerId) -> Option<LayerGroup> {
        self.groups.remove(&id)
    }

    /// # Errors
    /// `UnknownLayer` if no group is mapped for `id`.
    pub fn set_visible(&mut self, id: LayerId, visible: bool) -> Result<(), EditorError> {
        let group = self
            .groups
            .get_mut(&id)
            .ok_or(EditorError::UnknownLayer(id))?;
        group.opacity = if visible { 1.0 } else { 0.0 };
        Ok(())
    }

    pub fn get(&self, id: LayerId) -> Option<&LayerGroup> {
        self.groups.get(&id)
    }

    pub fn contains(&self, id: LayerId) -> bool {
        self.groups.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LayerId, &LayerGroup)> {
        self.groups.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parse_event_names() {
        assert_eq!(LayerEvent::parse("layerAdded", 3), Some(LayerEvent::Added(LayerId(3))));
        assert_eq!(LayerEvent::parse("hidden", 1), Some(LayerEvent::Hidden(LayerId(1))));
        assert_eq!(
            LayerEvent::parse("layerMarkedActive", 2).map(|e| e.layer()),
            Some(LayerId(2))
        );
        assert_eq!(LayerEvent::parse("layerRenamed", 2), None);
    }

    #[test]
    fn groups_follow_visibility() {
        let mut hidden = Layer::new(LayerId(2), "Layer 2");
        hidden.visible = false;
        let mut groups = LayerGroups::from_layers([&Layer::new(LayerId(1), "Layer 1"), &hidden]);
        assert_eq!(groups.get(LayerId(1)).map(|g| g.opacity), Some(1.0));
        assert_eq!(
            groups.get(LayerId(2)),
            Some(&LayerGroup {
                dom_id: "layer-L2".into(),
                opacity: 0.0
            })
        );

        groups.set_visible(LayerId(2), true).unwrap();
        assert_eq!(groups.get(LayerId(2)).map(|g| g.opacity), Some(1.0));
        assert_eq!(
            groups.set_visible(LayerId(9), true),
            Err(EditorError::UnknownLayer(LayerId(9)))
        );
    }

    #[test]
    fn remove_drops_mapping() {
        let mut groups = LayerGroups::from_layers([&Layer::new(LayerId(1), "Layer 1")]);
        assert!(groups.remove(LayerId(1)).is_some());
        assert!(!groups.contains(LayerId(1)));
        assert!(groups.is_empty());
    }
}
