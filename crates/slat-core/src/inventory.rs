//! Inventory of cargo items and the wire format of the plate-scan service.
//!
//! The editor starts from a small placeholder list; a response from the
//! external scan service replaces it wholesale.

use crate::error::EditorError;
use crate::model::Color;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: u32,
    pub name: String,
    /// Short label drawn inside the cargo marker.
    #[serde(alias = "acronym")]
    pub tag: String,
    /// Hex color string, as edited in the inventory form.
    pub color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plate: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver: Option<String>,
}

impl InventoryItem {
    /// Parsed marker color; falls back to black for an unparseable value.
    pub fn marker_color(&self) -> Color {
        Color::from_hex(&self.color).unwrap_or(Color::BLACK)
    }
}

/// Partial edit of an item. `None` fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ItemPatch {
    pub name: Option<String>,
    #[serde(alias = "acronym")]
    pub tag: Option<String>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Inventory {
    items: Vec<InventoryItem>,
}

impl Default for Inventory {
    fn default() -> Self {
        Self::placeholder()
    }
}

impl Inventory {
    pub fn empty() -> Self {
        Self { items: Vec::new() }
    }

    /// The list shown before the scan service has answered.
    pub fn placeholder() -> Self {
        let item = |id, name: &str, tag: &str, color: &str| InventoryItem {
            id,
            name: name.to_string(),
            tag: tag.to_string(),
            color: color.to_string(),
            plate: None,
            driver: None,
        };
        Self {
            items: vec![
                item(1, "Green Fluorescent Protein", "GFP", "#00FF00"),
                item(2, "Red Fluorescent Protein", "RFP", "#FF0000"),
                item(3, "Antibody 1", "Ab1", "#0000FF"),
                item(4, "Antibody 2", "Ab2", "#FFFF00"),
                item(5, "Dummy Handle", "DH", "#FF00FF"),
            ],
        }
    }

    pub fn items(&self) -> &[InventoryItem] {
        &self.items
    }

    pub fn get(&self, id: u32) -> Option<&InventoryItem> {
        self.items.iter().find(|i| i.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Add an item with id `max + 1` (or 1 for an empty inventory).
    ///
    /// # Errors
    /// `InvalidColor` if `color` is not a hex color, `InventoryIdsExhausted`
    /// when the largest id is already `u32::MAX`.
    pub fn add(&mut self, name: &str, tag: &str, color: &str) -> Result<&InventoryItem, EditorError> {
        Color::parse(color)?;
        let id = match self.items.iter().map(|i| i.id).max() {
            Some(max) => max
                .checked_add(1)
                .ok_or(EditorError::InventoryIdsExhausted(max))?,
            None => 1,
        };
        self.items.push(InventoryItem {
            id,
            name: name.to_string(),
            tag: tag.to_string(),
            color: color.to_string(),
            plate: None,
            driver: None,
        });
        log::info!("inventory: added item {id} ({tag})");
        Ok(&self.items[self.items.len() - 1])
    }

    /// # Errors
    /// `UnknownInventoryItem` for a missing id, `InvalidColor` for a bad color.
    /// Nothing is changed when an error is returned.
    pub fn update(&mut self, id: u32, patch: ItemPatch) -> Result<&InventoryItem, EditorError> {
        if let Some(color) = &patch.color {
            Color::parse(color)?;
        }
        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or(EditorError::UnknownInventoryItem(id))?;
        if let Some(name) = patch.name {
            item.name = name;
        }
        if let Some(tag) = patch.tag {
            item.tag = tag;
        }
        if let Some(color) = patch.color {
            item.color = color;
        }
        Ok(item)
    }

    /// # Errors
    /// `UnknownInventoryItem` if there is no such item.
    pub fn remove(&mut self, id: u32) -> Result<InventoryItem, EditorError> {
        let pos = self
            .items
            .iter()
            .position(|i| i.id == id)
            .ok_or(EditorError::UnknownInventoryItem(id))?;
        log::info!("inventory: removed item {id}");
        Ok(self.items.remove(pos))
    }

    /// Replace the whole list, returning the ids that no longer exist.
    pub fn replace_all(&mut self, items: Vec<InventoryItem>) -> Vec<u32> {
        let gone = self
            .items
            .iter()
            .map(|i| i.id)
            .filter(|id| !items.iter().any(|n| n.id == *id))
            .collect();
        self.items = items;
        gone
    }
}

// ─── Scan service wire format ────────────────────────────────────────────

/// Request sent to the plate-scan service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryRequest {
    /// Sequence number, increasing per session.
    pub seq: u64,
    /// Folder the service scans for plate files.
    pub path: String,
    /// Optional plate → driver assignment.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plate_drivers: Option<BTreeMap<String, String>>,
}

/// Decode the service response: a JSON list of inventory records.
///
/// # Errors
/// `ExternalFetchFailed` for malformed JSON, an unparseable color or a
/// duplicated id.
pub fn parse_inventory_response(json: &str) -> Result<Vec<InventoryItem>, EditorError> {
    let items: Vec<InventoryItem> =
        serde_json::from_str(json).map_err(|e| EditorError::ExternalFetchFailed(e.to_string()))?;

    for (i, item) in items.iter().enumerate() {
        if Color::from_hex(&item.color).is_none() {
            return Err(EditorError::ExternalFetchFailed(format!(
                "item {} has invalid color `{}`",
                item.id, item.color
            )));
        }
        if items[..i].iter().any(|other| other.id == item.id) {
            return Err(EditorError::ExternalFetchFailed(format!(
                "duplicate item id {}",
                item.id
            )));
        }
    }
    Ok(items)
}
