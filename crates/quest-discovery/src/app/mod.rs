//! Application module
//!
//! One event loop owns the [`DiscoveryController`]. The quest fetch and the
//! scripted user actions run as separate tasks and report to the loop through
//! a channel, so events may arrive before the data does.

mod map;
mod render;
pub(crate) mod settings;

pub use map::ConsoleMap;
pub use render::View;

use crate::app::settings::Settings;
use quest_discovery_lib::geocode::Gazetteer;
use quest_discovery_lib::source::JsonFileSource;
use quest_discovery_lib::{
    DiscoveryController, DiscoveryError, DiscoveryEvent, DiscoveryState, Quest, QuestSource,
};
use serde::Deserialize;
use std::collections::VecDeque;
use std::path::PathBuf;
use tokio::sync::mpsc;

const CHANNEL_CAPACITY: usize = 64;

/// Application-level errors
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Discovery(#[from] DiscoveryError),

    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid events script: {0}")]
    Script(#[from] serde_json::Error),

    #[error("No quest data was loaded")]
    NoData,
}

/// A step of the user script
///
/// Either a location search, written as `{ "search": "Edinburgh" }`, or any
/// discovery event such as `{ "event": "quest_chosen", "id": "q-1" }`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum UserAction {
    Search { search: String },
    Discovery(DiscoveryEvent),
}

impl UserAction {
    fn name(&self) -> &'static str {
        match self {
            Self::Search { .. } => "search",
            Self::Discovery(event) => event.name(),
        }
    }

    /// Actions that are only accepted once the quests are loaded
    fn needs_data(&self) -> bool {
        matches!(
            self,
            Self::Discovery(DiscoveryEvent::QuestChosen { .. } | DiscoveryEvent::ExitDetailView)
        )
    }
}

/// Messages delivered to the event loop
enum AppMessage {
    Fetched(quest_discovery_lib::Result<Vec<Quest>>),
    Action(UserAction),
}

/// Main application structure
pub struct QuestDiscoveryApp {
    settings: Settings,
    controller: DiscoveryController<ConsoleMap>,
    gazetteer: Gazetteer,
    /// Actions waiting for the data, in arrival order
    backlog: VecDeque<UserAction>,
}

impl QuestDiscoveryApp {
    pub async fn new(settings: Settings) -> Result<Self, AppError> {
        let gazetteer = match &settings.places {
            Some(path) => {
                let gazetteer = Gazetteer::load(path).await?;
                tracing::info!("Loaded {} places from {}", gazetteer.len(), path.display());
                gazetteer
            }
            None => Gazetteer::default(),
        };

        let controller = DiscoveryController::new(settings.config(), ConsoleMap::new());
        Ok(Self {
            settings,
            controller,
            gazetteer,
            backlog: VecDeque::new(),
        })
    }

    #[inline]
    pub fn controller(&self) -> &DiscoveryController<ConsoleMap> {
        &self.controller
    }

    /// Fetch the quests and replay the user script until both are done
    pub async fn run(&mut self) -> Result<(), AppError> {
        let actions = self.script_actions().await?;
        let (tx, mut rx) = mpsc::channel(CHANNEL_CAPACITY);

        self.controller.begin_loading();
        let source = JsonFileSource::new(&self.settings.quests);
        let fetch_tx = tx.clone();
        tokio::spawn(async move {
            let result = source.fetch_all_quests().await;
            if fetch_tx.send(AppMessage::Fetched(result)).await.is_err() {
                tracing::debug!("Event loop closed before the fetch completed");
            }
        });

        tokio::spawn(async move {
            for action in actions {
                if tx.send(AppMessage::Action(action)).await.is_err() {
                    break;
                }
            }
        });

        while let Some(message) = rx.recv().await {
            match message {
                AppMessage::Fetched(Ok(quests)) => {
                    self.controller.on_data_loaded(quests)?;
                    if let Some(bbox) = self.controller.catalog().bounding_box() {
                        tracing::info!(
                            "Quests span latitude {:.3}..{:.3}, longitude {:.3}..{:.3}",
                            bbox.south,
                            bbox.north,
                            bbox.west,
                            bbox.east
                        );
                    }
                    self.drain_backlog().await;
                }
                AppMessage::Fetched(Err(err)) => {
                    self.controller.on_data_unavailable(&err.to_string());
                    return Err(err.into());
                }
                AppMessage::Action(action) => self.dispatch(action).await,
            }
        }

        if self.controller.state() != DiscoveryState::Ready {
            return Err(AppError::NoData);
        }
        Ok(())
    }

    /// Render the current view as text, or JSON with `--json`
    pub fn render(&self) -> Result<String, AppError> {
        let view = match &self.settings.owner {
            Some(owner_id) => View::profile(&self.controller, owner_id),
            None => View::of(&self.controller),
        };
        if self.settings.json {
            Ok(view.to_json()?)
        } else {
            Ok(view.to_text())
        }
    }

    /// Script file actions, then `--search`, then `--choose`
    async fn script_actions(&self) -> Result<Vec<UserAction>, AppError> {
        let mut actions = match &self.settings.events {
            Some(path) => {
                let json = tokio::fs::read_to_string(path)
                    .await
                    .map_err(|source| AppError::Read {
                        path: path.clone(),
                        source,
                    })?;
                serde_json::from_str::<Vec<UserAction>>(&json)?
            }
            None => Vec::new(),
        };

        if let Some(search) = &self.settings.search {
            actions.push(UserAction::Search {
                search: search.clone(),
            });
        }
        if let Some(id) = self.settings.chosen_quest() {
            actions.push(UserAction::Discovery(DiscoveryEvent::QuestChosen { id }));
        }

        tracing::debug!("{} scripted actions", actions.len());
        Ok(actions)
    }

    /// Apply an action now, or queue it behind the data
    async fn dispatch(&mut self, action: UserAction) {
        let ready = self.controller.state() == DiscoveryState::Ready;
        if !ready && (action.needs_data() || !self.backlog.is_empty()) {
            tracing::debug!("Deferring {} until the quests are loaded", action.name());
            self.backlog.push_back(action);
            return;
        }
        self.apply(action).await;
    }

    async fn drain_backlog(&mut self) {
        while let Some(action) = self.backlog.pop_front() {
            self.apply(action).await;
        }
    }

    async fn apply(&mut self, action: UserAction) {
        match action {
            UserAction::Search { search } => {
                self.controller
                    .search_location(&self.gazetteer, &search)
                    .await;
            }
            UserAction::Discovery(event) => {
                let name = event.name();
                if let Err(err) = self.controller.handle(event) {
                    tracing::warn!("Ignoring {name}: {err}");
                }
            }
        }
    }
}
