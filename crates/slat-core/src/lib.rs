pub mod config;
pub mod error;
pub mod grid;
pub mod id;
pub mod inventory;
pub mod model;

pub use config::EditorConfig;
pub use error::EditorError;
pub use grid::{GridConfig, GridStyle, snap, snap_scaled};
pub use id::{CargoId, ElementId, IdAllocator, LayerId, SlatId};
pub use inventory::{Inventory, InventoryItem, InventoryRequest, ItemPatch};
pub use model::*;

// Re-export geometry and graph types so downstream crates share one version
pub use kurbo::{Line, Point, Rect, Vec2};
pub use petgraph::graph::NodeIndex;
