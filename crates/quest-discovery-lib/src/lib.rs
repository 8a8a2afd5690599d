//! Quest Discovery Library - Core engine for browsing quests on a map
//!
//! This library reconciles a map viewport, a set of filter criteria and a ranked
//! result list into one consistent view state. Every input event triggers a full,
//! deterministic recomputation of the derived result set.
//!
//! # Architecture
//!
//! - **[`Quest`]**: Normalized, validated quest record
//! - **[`Viewport`]**: Visible map rectangle and the spatial filter
//! - **[`FilterCriteria`]**: Theme filter and sort measure
//! - **[`rank`]**: Stable ordering by rating or duration
//! - **[`SelectionTracker`]**: At-most-one selected quest
//! - **[`DiscoveryController`]**: State machine owning the inputs and the derived [`ResultSet`]
//!
//! # Pipeline
//!
//! canonical set → spatial filter → theme filter → ranker → selection stamping

pub mod capability;
mod catalog;
mod controller;
mod criteria;
pub mod geocode;
mod quest;
mod ranking;
mod selection;
pub mod source;
mod viewport;

// Public API exports
pub use capability::{Geocoder, MapCapability, NullMap, QuestSource};
pub use catalog::QuestCatalog;
pub use controller::{
    Config, DiscoveryController, DiscoveryEvent, DiscoveryState, FlyTo, ResultEntry, ResultSet,
};
pub use criteria::{CriteriaPatch, FilterCriteria, SortBy, ThemeFilter};
pub use quest::{LatLng, Owner, Quest, QuestId, Rating, Stop, Theme};
pub use ranking::rank;
pub use selection::SelectionTracker;
pub use viewport::{Viewport, ViewportBounds};

/// Error types for the discovery engine
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("Quest data unavailable: {0}")]
    DataUnavailable(String),

    #[error("No quest with id {0} in the loaded set")]
    InvalidSelection(QuestId),

    #[error("Event {event} is not accepted while {state}")]
    InvalidTransition {
        event: &'static str,
        state: DiscoveryState,
    },

    #[error("Invalid quest record {id}: {reason}")]
    InvalidRecord { id: String, reason: String },

    #[error("Invalid viewport: {0}")]
    InvalidViewport(String),

    #[error("Location not found: {0}")]
    LocationNotFound(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DiscoveryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_exports() {
        // Verify that all public types are accessible
        let _: fn(Config, NullMap) -> DiscoveryController<NullMap> = DiscoveryController::new;
        let _: fn() -> Config = Config::default;
    }

    #[test]
    fn test_error_messages() {
        let err = DiscoveryError::InvalidSelection(QuestId::from("q-42"));
        assert_eq!(err.to_string(), "No quest with id q-42 in the loaded set");

        let err = DiscoveryError::InvalidTransition {
            event: "quest_chosen",
            state: DiscoveryState::Loading,
        };
        assert_eq!(
            err.to_string(),
            "Event quest_chosen is not accepted while loading"
        );
    }
}
