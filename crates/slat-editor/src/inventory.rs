//! Inventory boundary: requests to the plate-scan service and decoding of
//! its answers.
//!
//! Requests carry an increasing sequence number. Responses are applied in
//! arrival order, so whichever lands last wins; an answer to an older
//! request is still applied and only logged.

use slat_core::error::EditorError;
use slat_core::inventory::{InventoryItem, InventoryRequest, parse_inventory_response};
use std::collections::BTreeMap;

#[derive(Debug, Default)]
pub struct InventorySync {
    next_seq: u64,
    /// Sequence number of the most recent request sent.
    latest_sent: Option<u64>,
    /// Responses applied so far.
    received: u64,
}

impl InventorySync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the next request for folder `path`.
    pub fn request(
        &mut self,
        path: impl Into<String>,
        plate_drivers: Option<BTreeMap<String, String>>,
    ) -> InventoryRequest {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.latest_sent = Some(seq);
        let request = InventoryRequest {
            seq,
            path: path.into(),
            plate_drivers,
        };
        log::info!("inventory request #{seq} for `{}`", request.path);
        request
    }

    /// Decode a response. `seq` is the request it answers, when the host
    /// knows it.
    ///
    /// # Errors
    /// `ExternalFetchFailed` for a payload that does not decode; the caller
    /// keeps its current inventory.
    pub fn receive(&mut self, seq: Option<u64>, json: &str) -> Result<Vec<InventoryItem>, EditorError> {
        let items = parse_inventory_response(json).inspect_err(|e| log::warn!("inventory response dropped: {e}"))?;
        if let (Some(seq), Some(latest)) = (seq, self.latest_sent)
            && seq < latest
        {
            log::debug!("applying response #{seq} after request #{latest} was sent");
        }
        self.received += 1;
        Ok(items)
    }

    pub fn latest_sent(&self) -> Option<u64> {
        self.latest_sent
    }

    pub fn received(&self) -> u64 {
        self.received
    }
}
