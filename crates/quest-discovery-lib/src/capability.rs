//! Collaborator capabilities consumed by the discovery engine
//!
//! The engine never talks to the network, the map widget or storage directly.
//! It is handed implementations of these traits instead:
//!
//! - [`QuestSource`]: produces the canonical quest set (asynchronously).
//! - [`MapCapability`]: receives camera and marker commands.
//! - [`Geocoder`]: turns a free-text location search into a coordinate.

use crate::{FlyTo, LatLng, Quest, QuestId, Result};
use std::future::Future;

/// Source of the canonical quest set
pub trait QuestSource {
    /// Fetch every quest.
    ///
    /// Fails with `DataUnavailable` on transport or server errors. Implementations
    /// must only return validated records.
    fn fetch_all_quests(&self) -> impl Future<Output = Result<Vec<Quest>>> + Send;
}

/// Commands accepted by the map view
pub trait MapCapability {
    /// Center the camera on a coordinate.
    ///
    /// Every call is a distinct request, even when the target equals the previous one.
    fn fly_to(&mut self, command: &FlyTo);

    /// Highlight the marker of the selected quest, or none
    fn highlight(&mut self, id: Option<&QuestId>);
}

/// Free-text location search
pub trait Geocoder {
    /// Resolve an address or place name. Fails with `LocationNotFound` on a miss.
    fn resolve_address(&self, text: &str) -> impl Future<Output = Result<LatLng>> + Send;
}

/// Map capability that discards every command
#[derive(Clone, Copy, Debug, Default)]
pub struct NullMap;

impl MapCapability for NullMap {
    fn fly_to(&mut self, command: &FlyTo) {
        tracing::trace!("Discarding fly-to #{}", command.request_id);
    }

    fn highlight(&mut self, _id: Option<&QuestId>) {}
}
