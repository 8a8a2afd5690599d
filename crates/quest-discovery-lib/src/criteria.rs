//! Filter and sort criteria chosen by the user

use crate::{Quest, Theme};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Theme selection, either a single theme or the "All" wildcard
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ThemeFilter {
    #[default]
    All,
    Only(Theme),
}

impl ThemeFilter {
    /// Criteria filter: check whether a quest matches the selected theme
    #[inline]
    pub fn matches(&self, quest: &Quest) -> bool {
        match self {
            Self::All => true,
            Self::Only(theme) => quest.theme() == *theme,
        }
    }
}

impl fmt::Display for ThemeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Only(theme) => theme.fmt(f),
        }
    }
}

impl FromStr for ThemeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            s.parse().map(Self::Only)
        }
    }
}

impl TryFrom<String> for ThemeFilter {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ThemeFilter> for String {
    fn from(filter: ThemeFilter) -> Self {
        filter.to_string()
    }
}

/// Measure used to rank the results
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortBy {
    /// Highest average rating first, unrated quests last
    #[default]
    Rating,
    /// Longest estimated duration first
    Time,
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rating => f.write_str("rating"),
            Self::Time => f.write_str("time"),
        }
    }
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rating" => Ok(Self::Rating),
            "time" => Ok(Self::Time),
            other => Err(format!("unknown sort measure '{other}'")),
        }
    }
}

/// Active filter criteria
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub theme: ThemeFilter,
    pub sort_by: SortBy,
}

impl FilterCriteria {
    /// Merge a partial update; fields absent from the patch keep their value
    pub fn apply(&mut self, patch: CriteriaPatch) {
        if let Some(theme) = patch.theme {
            self.theme = theme;
        }
        if let Some(sort_by) = patch.sort_by {
            self.sort_by = sort_by;
        }
    }
}

/// Partial criteria update coming from a single form input
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CriteriaPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<ThemeFilter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_by: Option<SortBy>,
}

impl CriteriaPatch {
    pub fn theme(theme: ThemeFilter) -> Self {
        Self {
            theme: Some(theme),
            sort_by: None,
        }
    }

    pub fn sort_by(sort_by: SortBy) -> Self {
        Self {
            theme: None,
            sort_by: Some(sort_by),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{LatLng, Owner, Rating, Stop};

    fn create_test_quest(theme: Theme) -> Quest {
        Quest::new(
            "q-1",
            "Test",
            theme,
            30,
            Rating::NotYetRated,
            vec![Stop {
                name: "Start".to_string(),
                location: LatLng::new(0.0, 0.0),
            }],
            Owner {
                id: "u-1".to_string(),
                username: "tester".to_string(),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_theme_filter_matches() {
        let hike = create_test_quest(Theme::Hike);

        assert!(ThemeFilter::All.matches(&hike));
        assert!(ThemeFilter::Only(Theme::Hike).matches(&hike));
        assert!(!ThemeFilter::Only(Theme::Run).matches(&hike));
    }

    #[test]
    fn test_every_theme_matches_all() {
        for theme in Theme::ALL {
            assert!(ThemeFilter::All.matches(&create_test_quest(theme)));
        }
    }

    #[test]
    fn test_default_criteria() {
        let criteria = FilterCriteria::default();
        assert_eq!(criteria.theme, ThemeFilter::All);
        assert_eq!(criteria.sort_by, SortBy::Rating);
    }

    #[test]
    fn test_apply_patch_keeps_unspecified_fields() {
        let mut criteria = FilterCriteria::default();

        criteria.apply(CriteriaPatch::theme(ThemeFilter::Only(Theme::Food)));
        assert_eq!(criteria.theme, ThemeFilter::Only(Theme::Food));
        assert_eq!(criteria.sort_by, SortBy::Rating);

        criteria.apply(CriteriaPatch::sort_by(SortBy::Time));
        assert_eq!(criteria.theme, ThemeFilter::Only(Theme::Food));
        assert_eq!(criteria.sort_by, SortBy::Time);

        criteria.apply(CriteriaPatch::default());
        assert_eq!(criteria.theme, ThemeFilter::Only(Theme::Food));
        assert_eq!(criteria.sort_by, SortBy::Time);
    }

    #[test]
    fn test_parse_filters() {
        assert_eq!("All".parse::<ThemeFilter>(), Ok(ThemeFilter::All));
        assert_eq!(
            "hike".parse::<ThemeFilter>(),
            Ok(ThemeFilter::Only(Theme::Hike))
        );
        assert!("bogus".parse::<ThemeFilter>().is_err());
        assert_eq!("TIME".parse::<SortBy>(), Ok(SortBy::Time));
        assert!("distance".parse::<SortBy>().is_err());
    }

    #[test]
    fn test_patch_deserialization() {
        let patch: CriteriaPatch = serde_json::from_str(r#"{"theme": "Run"}"#).unwrap();
        assert_eq!(patch, CriteriaPatch::theme(ThemeFilter::Only(Theme::Run)));

        let patch: CriteriaPatch = serde_json::from_str(r#"{"sort_by": "time"}"#).unwrap();
        assert_eq!(patch, CriteriaPatch::sort_by(SortBy::Time));
    }
}
