//! Quest Discovery - command-line front end for quest-discovery-lib
//!
//! Loads quests from a JSON file, applies the initial viewport and criteria,
//! replays scripted user events and prints the resulting list or detail view.

mod app;
mod logging;

pub use app::settings::Settings;
pub use app::{AppError, ConsoleMap, QuestDiscoveryApp, UserAction};
pub use logging::setup_logging;
