use crate::error::EditorError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a layer. Displayed as `L<n>`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerId(pub u32);

/// Identifier of a placed slat. Monotonic within a session, never reused.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SlatId(pub u64);

/// Identifier of a placed cargo token.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CargoId(pub u64);

/// Any element that can live in the design graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementId {
    Root,
    Layer(LayerId),
    Slat(SlatId),
    Cargo(CargoId),
}

impl fmt::Debug for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

impl fmt::Debug for SlatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{}", self.0)
    }
}

impl fmt::Display for SlatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "N{}", self.0)
    }
}

impl fmt::Debug for CargoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

impl fmt::Display for CargoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.0)
    }
}

/// Hands out fresh identifiers for one editing session.
///
/// Counters only move forward, so an id freed by a removal is never handed
/// out again.
#[derive(Debug, Clone)]
pub struct IdAllocator {
    next_layer: u32,
    next_slat: u64,
    next_cargo: u64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl IdAllocator {
    pub fn new() -> Self {
        Self {
            next_layer: 1,
            next_slat: 0,
            next_cargo: 0,
        }
    }

    /// # Errors
    /// `LayerIdsExhausted` once the counter cannot advance any further.
    pub fn next_layer(&mut self) -> Result<LayerId, EditorError> {
        let id = LayerId(self.next_layer);
        self.next_layer = self
            .next_layer
            .checked_add(1)
            .ok_or(EditorError::LayerIdsExhausted(id))?;
        Ok(id)
    }

    pub fn next_slat(&mut self) -> SlatId {
        let id = SlatId(self.next_slat);
        self.next_slat += 1;
        id
    }

    pub fn next_cargo(&mut self) -> CargoId {
        let id = CargoId(self.next_cargo);
        self.next_cargo += 1;
        id
    }

    /// Make sure a layer id chosen elsewhere (e.g. by the host UI) is never
    /// handed out again.
    ///
    /// # Errors
    /// `LayerIdsExhausted` for an id the counter cannot move past. Nothing
    /// is reserved in that case.
    pub fn reserve_layer(&mut self, id: LayerId) -> Result<(), EditorError> {
        let after = id.0.checked_add(1).ok_or(EditorError::LayerIdsExhausted(id))?;
        self.next_layer = self.next_layer.max(after);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_monotonic() {
        let mut ids = IdAllocator::new();
        let a = ids.next_slat();
        let b = ids.next_slat();
        assert!(b > a);
        assert_eq!(ids.next_slat(), SlatId(2));
    }

    #[test]
    fn layers_start_at_one() {
        let mut ids = IdAllocator::new();
        assert_eq!(ids.next_layer(), Ok(LayerId(1)));
        assert_eq!(ids.next_layer().unwrap().to_string(), "L2");
        ids.reserve_layer(LayerId(7)).unwrap();
        assert_eq!(ids.next_layer(), Ok(LayerId(8)));
        ids.reserve_layer(LayerId(3)).unwrap();
        assert_eq!(ids.next_layer(), Ok(LayerId(9)));
    }

    #[test]
    fn layer_ids_stop_at_the_top_of_the_range() {
        let mut ids = IdAllocator::new();
        assert_eq!(
            ids.reserve_layer(LayerId(u32::MAX)),
            Err(EditorError::LayerIdsExhausted(LayerId(u32::MAX)))
        );
        assert_eq!(ids.next_layer(), Ok(LayerId(1)));

        ids.reserve_layer(LayerId(u32::MAX - 2)).unwrap();
        assert_eq!(ids.next_layer(), Ok(LayerId(u32::MAX - 1)));
        assert_eq!(
            ids.next_layer(),
            Err(EditorError::LayerIdsExhausted(LayerId(u32::MAX)))
        );
        // Stays exhausted rather than wrapping around.
        assert!(ids.next_layer().is_err());
    }

    #[test]
    fn serializes_as_plain_numbers() {
        let json = serde_json::to_string(&SlatId(7)).unwrap();
        assert_eq!(json, "7");
        let back: LayerId = serde_json::from_str("3").unwrap();
        assert_eq!(back, LayerId(3));
    }
}
