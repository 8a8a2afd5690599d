//! Quest record storage and validation
//!
//! This module provides the `Quest` struct, the normalized shape of a fetched quest.
//! Records are validated while they are deserialized, so a `Quest` value always has
//! at least one stop, a finite in-range anchor location and an in-range rating.

use crate::DiscoveryError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Highest average rating a quest can carry
pub const MAX_RATING: f64 = 5.0;

/// Wire label used by the backend for quests without any rating
const NOT_YET_RATED: &str = "Not yet rated";

/// Opaque quest identifier, stable across requests
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestId(String);

impl QuestId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QuestId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for QuestId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Quest categories offered by the quest editor
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Theme {
    Hike,
    Run,
    History,
    Food,
    Art,
    Nature,
    Nightlife,
    Family,
}

impl Theme {
    pub const ALL: [Theme; 8] = [
        Theme::Hike,
        Theme::Run,
        Theme::History,
        Theme::Food,
        Theme::Art,
        Theme::Nature,
        Theme::Nightlife,
        Theme::Family,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Hike => "Hike",
            Self::Run => "Run",
            Self::History => "History",
            Self::Food => "Food",
            Self::Art => "Art",
            Self::Nature => "Nature",
            Self::Nightlife => "Nightlife",
            Self::Family => "Family",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|theme| theme.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown theme '{s}'"))
    }
}

/// Average rating of a quest
///
/// Serialized as a plain number, or as the string `"Not yet rated"`.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
#[serde(try_from = "RatingRepr", into = "RatingRepr")]
pub enum Rating {
    Rated(f64),
    #[default]
    NotYetRated,
}

impl Rating {
    /// Numeric value, `None` for unrated quests
    #[inline]
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Rated(value) => Some(*value),
            Self::NotYetRated => None,
        }
    }

    /// Number of whole stars shown next to a quest in the result list
    pub fn stars(&self) -> usize {
        self.value().map_or(0, |value| value.floor() as usize)
    }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rated(value) => write!(f, "{value:.1}"),
            Self::NotYetRated => f.write_str(NOT_YET_RATED),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RatingRepr {
    Score(f64),
    Label(String),
}

impl TryFrom<RatingRepr> for Rating {
    type Error = String;

    fn try_from(repr: RatingRepr) -> Result<Self, Self::Error> {
        match repr {
            RatingRepr::Score(value) => Ok(Self::Rated(value)),
            RatingRepr::Label(label) if label.eq_ignore_ascii_case(NOT_YET_RATED) => {
                Ok(Self::NotYetRated)
            }
            RatingRepr::Label(label) => Err(format!("unrecognized rating label '{label}'")),
        }
    }
}

impl From<Rating> for RatingRepr {
    fn from(rating: Rating) -> Self {
        match rating {
            Rating::Rated(value) => Self::Score(value),
            Rating::NotYetRated => Self::Label(NOT_YET_RATED.to_string()),
        }
    }
}

/// A WGS84 coordinate in degrees
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

impl LatLng {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Check that both components are finite and within the WGS84 ranges
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Convert to a `geo::Point` (x = longitude, y = latitude)
    #[inline]
    pub fn to_point(self) -> geo::Point<f64> {
        geo::Point::new(self.longitude, self.latitude)
    }
}

impl From<geo::Point<f64>> for LatLng {
    fn from(point: geo::Point<f64>) -> Self {
        Self::new(point.y(), point.x())
    }
}

impl fmt::Display for LatLng {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.5}, {:.5})", self.latitude, self.longitude)
    }
}

/// One stop along a quest
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub name: String,
    pub location: LatLng,
}

/// The account that created a quest
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    #[serde(alias = "_id")]
    pub id: String,
    pub username: String,
}

/// Wire shape of a quest, before validation
#[derive(Clone, Debug, Serialize, Deserialize)]
struct QuestRecord {
    #[serde(alias = "_id")]
    id: QuestId,
    name: String,
    theme: Theme,
    #[serde(rename = "estTime")]
    estimated_duration_minutes: u32,
    #[serde(rename = "avgRating", default)]
    average_rating: Rating,
    stops: Vec<Stop>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    owner: Owner,
}

/// A validated quest
///
/// Only the first stop (the anchor location) is used for spatial filtering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "QuestRecord", into = "QuestRecord")]
pub struct Quest {
    id: QuestId,
    name: String,
    theme: Theme,
    estimated_duration_minutes: u32,
    average_rating: Rating,
    /// Cached location of the first stop
    anchor_location: LatLng,
    stops: Vec<Stop>,
    description: Option<String>,
    owner: Owner,
}

impl Quest {
    /// Create a new quest, validating its stops and rating
    ///
    /// # Returns
    /// The quest on success, or `InvalidRecord` if it has no stops, a malformed
    /// anchor coordinate or a rating outside `0..=5`
    pub fn new(
        id: impl Into<QuestId>,
        name: impl Into<String>,
        theme: Theme,
        estimated_duration_minutes: u32,
        average_rating: Rating,
        stops: Vec<Stop>,
        owner: Owner,
    ) -> crate::Result<Self> {
        Self::try_from(QuestRecord {
            id: id.into(),
            name: name.into(),
            theme,
            estimated_duration_minutes,
            average_rating,
            stops,
            description: None,
            owner,
        })
    }

    /// Attach a free-text description
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[inline]
    pub fn id(&self) -> &QuestId {
        &self.id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn theme(&self) -> Theme {
        self.theme
    }

    #[inline]
    pub fn estimated_duration_minutes(&self) -> u32 {
        self.estimated_duration_minutes
    }

    #[inline]
    pub fn average_rating(&self) -> Rating {
        self.average_rating
    }

    /// Location of the first stop
    #[inline]
    pub fn anchor_location(&self) -> LatLng {
        self.anchor_location
    }

    /// All stops, the first one being the anchor
    #[inline]
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    /// The first stop
    #[inline]
    pub fn first_stop(&self) -> &Stop {
        // Non-empty is checked during construction
        &self.stops[0]
    }

    #[inline]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[inline]
    pub fn owner(&self) -> &Owner {
        &self.owner
    }
}

impl TryFrom<QuestRecord> for Quest {
    type Error = DiscoveryError;

    fn try_from(record: QuestRecord) -> Result<Self, Self::Error> {
        let invalid = |reason: String| DiscoveryError::InvalidRecord {
            id: record.id.to_string(),
            reason,
        };

        let anchor_location = match record.stops.first() {
            Some(stop) => stop.location,
            None => return Err(invalid("quest has no stops".to_string())),
        };
        if !anchor_location.is_valid() {
            return Err(invalid(format!(
                "anchor location {anchor_location} is outside valid coordinates"
            )));
        }
        if let Rating::Rated(value) = record.average_rating
            && !(value.is_finite() && (0.0..=MAX_RATING).contains(&value))
        {
            return Err(invalid(format!("rating {value} is outside 0..={MAX_RATING}")));
        }

        Ok(Self {
            id: record.id,
            name: record.name,
            theme: record.theme,
            estimated_duration_minutes: record.estimated_duration_minutes,
            average_rating: record.average_rating,
            anchor_location,
            stops: record.stops,
            description: record.description,
            owner: record.owner,
        })
    }
}

impl From<Quest> for QuestRecord {
    fn from(quest: Quest) -> Self {
        Self {
            id: quest.id,
            name: quest.name,
            theme: quest.theme,
            estimated_duration_minutes: quest.estimated_duration_minutes,
            average_rating: quest.average_rating,
            stops: quest.stops,
            description: quest.description,
            owner: quest.owner,
        }
    }
}
