//! Text and JSON views of the controller state

use quest_discovery_lib::{
    DiscoveryController, DiscoveryState, FilterCriteria, MapCapability, Quest, QuestId, Rating,
    ResultSet, Theme, ViewportBounds,
};
use serde::Serialize;
use std::fmt::Write;

const STAR: char = '★';

/// Snapshot of what the user would see
#[derive(Debug, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum View<'a> {
    /// Data not loaded yet
    Loading,
    /// Ranked result list
    List {
        criteria: FilterCriteria,
        viewport: ViewportBounds,
        quests: Vec<ListItem<'a>>,
    },
    /// Detail view of the selected quest
    Detail { quest: QuestDetail<'a> },
    /// Quests created by one account, in load order
    Profile {
        owner_id: &'a str,
        #[serde(skip_serializing_if = "Option::is_none")]
        username: Option<&'a str>,
        quests: Vec<ListItem<'a>>,
    },
}

#[derive(Debug, Serialize)]
pub struct ListItem<'a> {
    pub id: &'a QuestId,
    pub name: &'a str,
    pub theme: Theme,
    pub rating: Rating,
    pub stars: usize,
    pub estimated_minutes: u32,
}

#[derive(Debug, Serialize)]
pub struct QuestDetail<'a> {
    pub id: &'a QuestId,
    pub name: &'a str,
    pub owner: &'a str,
    pub theme: Theme,
    pub stop_count: usize,
    pub estimated_minutes: u32,
    pub rating: Rating,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'a str>,
    pub first_stop: &'a str,
}

impl<'a> From<&'a Quest> for ListItem<'a> {
    fn from(quest: &'a Quest) -> Self {
        Self {
            id: quest.id(),
            name: quest.name(),
            theme: quest.theme(),
            rating: quest.average_rating(),
            stars: quest.average_rating().stars(),
            estimated_minutes: quest.estimated_duration_minutes(),
        }
    }
}

impl<'a> From<&'a Quest> for QuestDetail<'a> {
    fn from(quest: &'a Quest) -> Self {
        Self {
            id: quest.id(),
            name: quest.name(),
            owner: &quest.owner().username,
            theme: quest.theme(),
            stop_count: quest.stops().len(),
            estimated_minutes: quest.estimated_duration_minutes(),
            rating: quest.average_rating(),
            description: quest.description(),
            first_stop: &quest.first_stop().name,
        }
    }
}

impl<'a> View<'a> {
    pub fn of<M: MapCapability>(controller: &'a DiscoveryController<M>) -> Self {
        let results = match (controller.state(), controller.results()) {
            (DiscoveryState::Ready, Some(results)) => results,
            _ => return Self::Loading,
        };

        match results.selected() {
            Some(entry) => Self::Detail {
                quest: QuestDetail::from(entry.quest.as_ref()),
            },
            None => Self::list(controller, results),
        }
    }

    /// Profile page of an account, independent of the viewport and criteria
    pub fn profile<M: MapCapability>(
        controller: &'a DiscoveryController<M>,
        owner_id: &'a str,
    ) -> Self {
        if controller.state() != DiscoveryState::Ready {
            return Self::Loading;
        }

        let owned: Vec<&'a Quest> = controller
            .catalog()
            .owned_by(owner_id)
            .map(|quest| quest.as_ref())
            .collect();
        Self::Profile {
            owner_id,
            username: owned.first().map(|quest| quest.owner().username.as_str()),
            quests: owned.into_iter().map(ListItem::from).collect(),
        }
    }

    fn list<M: MapCapability>(
        controller: &DiscoveryController<M>,
        results: &'a ResultSet,
    ) -> Self {
        Self::List {
            criteria: *controller.criteria(),
            viewport: controller.viewport().bounds(),
            quests: results
                .iter()
                .map(|entry| ListItem::from(entry.quest.as_ref()))
                .collect(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.write_text(&mut out);
        out
    }

    fn write_text(&self, out: &mut String) -> std::fmt::Result {
        match self {
            Self::Loading => write!(out, "Loading quests..."),
            Self::List {
                criteria, quests, ..
            } if quests.is_empty() => write!(
                out,
                "No quests in this area (theme: {}, sorted by {})",
                criteria.theme, criteria.sort_by
            ),
            Self::List {
                criteria, quests, ..
            } => {
                writeln!(
                    out,
                    "{} quests (theme: {}, sorted by {})",
                    quests.len(),
                    criteria.theme,
                    criteria.sort_by
                )?;
                for (i, item) in quests.iter().enumerate() {
                    writeln!(out, "{:>3}. {}  [{}]", i + 1, item.name, item.id)?;
                    write!(
                        out,
                        "     {}  {}  {} min",
                        item.theme,
                        stars_label(item.rating),
                        item.estimated_minutes
                    )?;
                    if i + 1 < quests.len() {
                        writeln!(out)?;
                    }
                }
                Ok(())
            }
            Self::Profile {
                owner_id,
                username,
                quests,
            } => {
                write!(out, "{} ({owner_id}): ", username.unwrap_or("Unknown user"))?;
                match quests.len() {
                    0 => write!(out, "no quests"),
                    1 => write!(out, "1 quest"),
                    n => write!(out, "{n} quests"),
                }?;
                for item in quests {
                    write!(
                        out,
                        "\n  - {}  [{}]  {}  {}",
                        item.name,
                        item.id,
                        item.theme,
                        stars_label(item.rating)
                    )?;
                }
                Ok(())
            }
            Self::Detail { quest } => {
                writeln!(out, "{}", quest.name)?;
                writeln!(out, "  by {}", quest.owner)?;
                writeln!(out, "  Theme: {}", quest.theme)?;
                writeln!(out, "  Rating: {}", stars_label(quest.rating))?;
                writeln!(out, "  Stops: {}", quest.stop_count)?;
                writeln!(out, "  Estimated time: {} min", quest.estimated_minutes)?;
                write!(out, "  Starts at: {}", quest.first_stop)?;
                if let Some(description) = quest.description {
                    write!(out, "\n\n  {description}")?;
                }
                Ok(())
            }
        }
    }
}

/// One star per whole rating point, or the "Not yet rated" label
fn stars_label(rating: Rating) -> String {
    match rating {
        Rating::Rated(_) => {
            let stars: String = std::iter::repeat_n(STAR, rating.stars()).collect();
            format!("{stars} ({rating})").trim_start().to_string()
        }
        Rating::NotYetRated => rating.to_string(),
    }
}
