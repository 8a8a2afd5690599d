//! DiscoveryController - State machine that owns the discovery view state
//!
//! The controller records the inputs of the view (canonical quest set, viewport,
//! criteria, selected id) and derives the result set from them. Every accepted
//! event triggers a full recomputation; nothing is patched incrementally.
//!
//! ```text
//! Uninitialized --begin_loading--> Loading --on_data_loaded--> Ready
//!                                     ^  |                       |
//!                                     +--+ on_data_unavailable   +-- on_data_loaded (refresh)
//! ```

use crate::{
    CriteriaPatch, DiscoveryError, FilterCriteria, Geocoder, LatLng, MapCapability, Quest,
    QuestCatalog, QuestId, QuestSource, Result, SelectionTracker, Viewport, rank,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Initial inputs of the discovery view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Viewport used until the map reports its visible region.
    /// Default: the full globe
    pub initial_viewport: Viewport,
    /// Criteria used until the user changes them.
    /// Default: all themes, ranked by rating
    pub initial_criteria: FilterCriteria,
}

/// Lifecycle of the controller
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryState {
    /// Nothing requested yet
    Uninitialized,
    /// Fetch dispatched, no result set yet
    Loading,
    /// Canonical set installed, results derived on every event
    Ready,
}

impl fmt::Display for DiscoveryState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uninitialized => f.write_str("uninitialized"),
            Self::Loading => f.write_str("loading"),
            Self::Ready => f.write_str("ready"),
        }
    }
}

/// One-shot camera move command
///
/// `request_id` increases with every command, so two moves to the same target
/// are still two distinct commands.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlyTo {
    pub request_id: u64,
    pub target: LatLng,
}

/// A quest in the derived result set
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ResultEntry {
    pub quest: Arc<Quest>,
    /// Transient flag stamped during recomputation
    pub selected: bool,
}

/// Filtered, ranked and selection-stamped quests shown to the user
///
/// Two result sets are equal when their entries are; the generation only
/// tells recomputations apart.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ResultSet {
    /// Increases with every recomputation
    generation: u64,
    entries: Vec<ResultEntry>,
}

impl PartialEq for ResultSet {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl ResultSet {
    #[inline]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[inline]
    pub fn entries(&self) -> &[ResultEntry] {
        &self.entries
    }

    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, ResultEntry> {
        self.entries.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids in display order
    pub fn ids(&self) -> Vec<&QuestId> {
        self.entries.iter().map(|entry| entry.quest.id()).collect()
    }

    /// The entry shown in the detail view, if any
    pub fn selected(&self) -> Option<&ResultEntry> {
        self.entries.iter().find(|entry| entry.selected)
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a ResultEntry;
    type IntoIter = std::slice::Iter<'a, ResultEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Input events understood by the controller
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum DiscoveryEvent {
    /// The fetch resolved with the canonical set
    DataLoaded { quests: Vec<Quest> },
    /// The fetch failed
    DataUnavailable { reason: String },
    /// The map reported a new visible region
    ViewportChanged { bounds: Viewport },
    /// A filter input changed
    CriteriaChanged(CriteriaPatch),
    /// A quest was clicked in the list or on the map
    QuestChosen { id: QuestId },
    /// The detail view was closed
    ExitDetailView,
    /// A location search resolved to a coordinate
    LocationFound { location: LatLng },
}

impl DiscoveryEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::DataLoaded { .. } => "data_loaded",
            Self::DataUnavailable { .. } => "data_unavailable",
            Self::ViewportChanged { .. } => "viewport_changed",
            Self::CriteriaChanged(_) => "criteria_changed",
            Self::QuestChosen { .. } => "quest_chosen",
            Self::ExitDetailView => "exit_detail_view",
            Self::LocationFound { .. } => "location_found",
        }
    }
}

/// Owner of the discovery view state
pub struct DiscoveryController<M: MapCapability> {
    config: Config,
    state: DiscoveryState,
    /// Canonical quest set (empty until Ready)
    catalog: QuestCatalog,
    viewport: Viewport,
    criteria: FilterCriteria,
    selection: SelectionTracker,
    /// Derived result set, `None` until Ready
    results: Option<ResultSet>,
    /// Fly-to slot, only occupied while a command is being delivered
    pending_fly_to: Option<FlyTo>,
    next_request_id: u64,
    generation: u64,
    map: M,
}

impl<M: MapCapability> DiscoveryController<M> {
    /// Create a controller with the given initial inputs and map capability
    pub fn new(config: Config, map: M) -> Self {
        Self {
            viewport: config.initial_viewport,
            criteria: config.initial_criteria,
            config,
            state: DiscoveryState::Uninitialized,
            catalog: QuestCatalog::default(),
            selection: SelectionTracker::new(),
            results: None,
            pending_fly_to: None,
            next_request_id: 1,
            generation: 0,
            map,
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn state(&self) -> DiscoveryState {
        self.state
    }

    #[inline]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    #[inline]
    pub fn criteria(&self) -> &FilterCriteria {
        &self.criteria
    }

    /// The canonical quest set
    #[inline]
    pub fn catalog(&self) -> &QuestCatalog {
        &self.catalog
    }

    /// Derived result set, `None` while no data has been loaded
    #[inline]
    pub fn results(&self) -> Option<&ResultSet> {
        self.results.as_ref()
    }

    /// The quest shown in the detail view, if any
    pub fn selected(&self) -> Option<&ResultEntry> {
        self.results.as_ref().and_then(ResultSet::selected)
    }

    /// Always `None` between events: fly-to commands are pulses
    #[inline]
    pub fn pending_fly_to(&self) -> Option<&FlyTo> {
        self.pending_fly_to.as_ref()
    }

    #[inline]
    pub fn map(&self) -> &M {
        &self.map
    }

    #[inline]
    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    /// Mark the fetch as dispatched
    ///
    /// A refresh requested while Ready keeps the current results visible.
    pub fn begin_loading(&mut self) {
        if self.state == DiscoveryState::Uninitialized {
            tracing::debug!("Quest fetch dispatched");
            self.state = DiscoveryState::Loading;
        } else {
            tracing::debug!("Quest fetch dispatched while {}", self.state);
        }
    }

    /// Fetch the canonical set from a source and install it
    ///
    /// On failure the controller stays in `Loading` and the error is returned.
    pub async fn load<S: QuestSource>(&mut self, source: &S) -> Result<()> {
        self.begin_loading();
        match source.fetch_all_quests().await {
            Ok(quests) => self.on_data_loaded(quests),
            Err(err) => {
                self.on_data_unavailable(&err.to_string());
                Err(err)
            }
        }
    }

    /// Install the canonical set and recompute
    pub fn on_data_loaded(&mut self, quests: Vec<Quest>) -> Result<()> {
        if self.state == DiscoveryState::Uninitialized {
            return Err(self.reject("data_loaded"));
        }

        let was_ready = self.state == DiscoveryState::Ready;
        self.catalog = QuestCatalog::from_quests(quests);
        self.state = DiscoveryState::Ready;
        tracing::info!(
            "{} {} quests",
            if was_ready { "Reloaded" } else { "Loaded" },
            self.catalog.len()
        );

        self.recompute();
        Ok(())
    }

    /// Record a failed fetch; no partial set is ever installed
    pub fn on_data_unavailable(&mut self, reason: &str) {
        tracing::warn!("Quest data unavailable while {}: {reason}", self.state);
    }

    /// Replace the viewport wholesale
    ///
    /// Accepted in every state; before the data arrives it is only stored.
    pub fn on_viewport_changed(&mut self, viewport: Viewport) {
        tracing::trace!("Viewport changed to {:?}", viewport.bounds());
        self.viewport = viewport;
        if self.state == DiscoveryState::Ready {
            self.recompute();
        }
    }

    /// Merge a partial criteria update
    ///
    /// Accepted in every state; before the data arrives it is only stored.
    pub fn on_criteria_changed(&mut self, patch: CriteriaPatch) {
        self.criteria.apply(patch);
        tracing::debug!(
            "Criteria changed to theme={} sort_by={}",
            self.criteria.theme,
            self.criteria.sort_by
        );
        if self.state == DiscoveryState::Ready {
            self.recompute();
        }
    }

    /// Select a quest and fly the map to its anchor location
    ///
    /// An id missing from the canonical set is an `InvalidSelection`: the
    /// selection is left untouched and no fly-to is issued.
    pub fn on_quest_chosen(&mut self, id: &QuestId) -> Result<()> {
        if self.state != DiscoveryState::Ready {
            return Err(self.reject("quest_chosen"));
        }

        let target = match self.catalog.get(id) {
            Some(quest) => quest.anchor_location(),
            None => {
                tracing::warn!("Ignoring selection of unknown quest {id}");
                return Err(DiscoveryError::InvalidSelection(id.clone()));
            }
        };

        self.selection.select(id.clone());
        self.recompute();
        self.pulse_fly_to(target);
        Ok(())
    }

    /// Leave the detail view
    pub fn on_exit_detail_view(&mut self) -> Result<()> {
        if self.state != DiscoveryState::Ready {
            return Err(self.reject("exit_detail_view"));
        }

        self.selection.clear();
        self.recompute();
        Ok(())
    }

    /// Fly the map to a searched location
    pub fn on_location_found(&mut self, location: LatLng) {
        self.pulse_fly_to(location);
    }

    /// Resolve a free-text search and fly to the result
    ///
    /// A failed lookup is silently ignored and issues no fly-to.
    pub async fn search_location<G: Geocoder>(
        &mut self,
        geocoder: &G,
        text: &str,
    ) -> Option<FlyTo> {
        match geocoder.resolve_address(text).await {
            Ok(location) => Some(self.pulse_fly_to(location)),
            Err(err) => {
                tracing::debug!("Location search for '{text}' ignored: {err}");
                None
            }
        }
    }

    /// Dispatch an input event
    pub fn handle(&mut self, event: DiscoveryEvent) -> Result<()> {
        tracing::trace!("Handling {} while {}", event.name(), self.state);
        match event {
            DiscoveryEvent::DataLoaded { quests } => self.on_data_loaded(quests),
            DiscoveryEvent::DataUnavailable { reason } => {
                self.on_data_unavailable(&reason);
                Err(DiscoveryError::DataUnavailable(reason))
            }
            DiscoveryEvent::ViewportChanged { bounds } => {
                self.on_viewport_changed(bounds);
                Ok(())
            }
            DiscoveryEvent::CriteriaChanged(patch) => {
                self.on_criteria_changed(patch);
                Ok(())
            }
            DiscoveryEvent::QuestChosen { id } => self.on_quest_chosen(&id),
            DiscoveryEvent::ExitDetailView => self.on_exit_detail_view(),
            DiscoveryEvent::LocationFound { location } => {
                self.on_location_found(location);
                Ok(())
            }
        }
    }

    /// Rebuild the result set from the current inputs
    ///
    /// No-op until the canonical set is installed. Running it twice without
    /// changing any input yields the same entries.
    pub fn recompute(&mut self) {
        #[cfg(feature = "profiling")]
        profiling::scope!("controller::recompute");

        if self.state != DiscoveryState::Ready {
            return;
        }

        let entries = self.derive_entries();

        // A selection that is no longer visible is dropped for good
        if self.selection.selected_id().is_some() && !entries.iter().any(|entry| entry.selected) {
            tracing::debug!("Selected quest filtered out, clearing selection");
            self.selection.clear();
        }

        self.generation += 1;
        tracing::debug!(
            "Recomputed results #{}: {} of {} quests visible",
            self.generation,
            entries.len(),
            self.catalog.len()
        );

        self.results = Some(ResultSet {
            generation: self.generation,
            entries,
        });
        self.map.highlight(self.selection.selected_id());
    }

    /// Pure pipeline: spatial filter → theme filter → ranking → selection stamping
    fn derive_entries(&self) -> Vec<ResultEntry> {
        let candidates: Vec<Arc<Quest>> = self
            .catalog
            .iter()
            .filter(|quest| self.viewport.contains_quest(quest))
            .filter(|quest| self.criteria.theme.matches(quest))
            .cloned()
            .collect();

        let selected_id = self.selection.selected_id();
        rank(candidates, self.criteria.sort_by)
            .into_iter()
            .map(|quest| ResultEntry {
                selected: SelectionTracker::is_selected(&quest, selected_id),
                quest,
            })
            .collect()
    }

    /// Deliver a fly-to as a pulse: set the slot, notify the map, clear the slot
    fn pulse_fly_to(&mut self, target: LatLng) -> FlyTo {
        let command = FlyTo {
            request_id: self.next_request_id,
            target,
        };
        self.next_request_id += 1;

        let pending = self.pending_fly_to.insert(command);
        tracing::trace!("Fly-to #{} {}", pending.request_id, pending.target);
        self.map.fly_to(pending);
        self.pending_fly_to = None;

        command
    }

    fn reject(&self, event: &'static str) -> DiscoveryError {
        tracing::warn!("Rejecting {event} while {}", self.state);
        DiscoveryError::InvalidTransition {
            event,
            state: self.state,
        }
    }
}
