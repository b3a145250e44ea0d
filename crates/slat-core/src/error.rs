//! Error kinds shared by every layer of the editor.
//!
//! Controllers reject collisions silently (they simply emit no mutation);
//! these errors surface only when a mutation or an external payload reaches
//! the session directly and fails validation there.

use crate::id::{CargoId, LayerId, SlatId};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditorError {
    /// The candidate slat or cargo token overlaps an existing one.
    #[error("placement at ({x}, {y}) collides with an existing element")]
    CollisionRejected { x: f64, y: f64 },

    /// A coordinate that must sit on a grid intersection does not.
    #[error("({x}, {y}) is not on the grid (pitch {pitch})")]
    InvalidGridPosition { x: f64, y: f64, pitch: f64 },

    #[error("grid pitch must be a positive finite number, got {0}")]
    InvalidGridPitch(f64),

    #[error("slat length must be at least one grid cell")]
    InvalidSlatLength,

    /// The inventory service answered with something we cannot use.
    #[error("inventory fetch failed: {0}")]
    ExternalFetchFailed(String),

    #[error("unknown layer {0}")]
    UnknownLayer(LayerId),

    #[error("unknown slat {0}")]
    UnknownSlat(SlatId),

    #[error("unknown cargo token {0}")]
    UnknownCargo(CargoId),

    #[error("unknown inventory item {0}")]
    UnknownInventoryItem(u32),

    #[error("no active layer")]
    NoActiveLayer,

    /// Exactly one layer must stay active, so the last one cannot go.
    #[error("cannot remove the last remaining layer {0}")]
    LastLayer(LayerId),

    #[error("invalid color `{0}`")]
    InvalidColor(String),

    /// The layer counter cannot advance past this id.
    #[error("layer id {0} leaves no room for further layers")]
    LayerIdsExhausted(LayerId),

    #[error("no inventory id is left after {0}")]
    InventoryIdsExhausted(u32),
}
