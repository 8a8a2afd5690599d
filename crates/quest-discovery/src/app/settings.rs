use clap::Parser;
use quest_discovery_lib::{
    Config, FilterCriteria, QuestId, SortBy, ThemeFilter, Viewport, ViewportBounds,
};
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
/// Quest Discovery - Browse, filter and rank quests within a map region
pub struct Settings {
    /// JSON file with the array of quest records to load
    #[clap(short, long, value_name = "FILE", default_value = "quests.json")]
    pub quests: PathBuf,

    /// JSON file with named places used by --search
    #[clap(short, long, value_name = "FILE")]
    pub places: Option<PathBuf>,

    /// JSON file with an array of user events to replay after startup
    #[clap(short, long, value_name = "FILE")]
    pub events: Option<PathBuf>,

    /// Theme to show ("All" or a single theme such as "Hike")
    #[clap(short, long, default_value = "All")]
    pub theme: ThemeFilter,

    /// Ranking measure (rating or time)
    #[clap(short, long, default_value = "rating")]
    pub sort_by: SortBy,

    /// Visible region as "south,west,north,east" in degrees (default: the whole globe)
    #[clap(short, long, value_name = "S,W,N,E", value_parser = parse_bounds, allow_hyphen_values = true)]
    pub bounds: Option<Viewport>,

    /// Open the detail view of this quest after loading
    #[clap(short, long, value_name = "ID")]
    pub choose: Option<String>,

    /// List the quests created by this account instead of the map results
    #[clap(short, long, value_name = "ID")]
    pub owner: Option<String>,

    /// Fly the map to this place after loading
    #[clap(long, value_name = "TEXT")]
    pub search: Option<String>,

    /// Print the view as JSON instead of text
    #[clap(long, default_value = "false")]
    pub json: bool,
}

impl Settings {
    /// Parse the command line, exiting with usage on error
    pub fn from_cli() -> Self {
        match parse_args::<Settings>() {
            Ok(args) => args,
            Err(e) => e.exit(),
        }
    }

    /// Initial inputs of the discovery controller
    pub fn config(&self) -> Config {
        Config {
            initial_viewport: self.bounds.unwrap_or_default(),
            initial_criteria: FilterCriteria {
                theme: self.theme,
                sort_by: self.sort_by,
            },
        }
    }

    /// Quest to open once the data is loaded
    pub fn chosen_quest(&self) -> Option<QuestId> {
        self.choose.as_deref().map(QuestId::from)
    }
}

/// Parses from the command line arguments
pub fn parse_args<T: Parser>() -> Result<T, clap::Error> {
    T::try_parse()
}

fn parse_bounds(value: &str) -> Result<Viewport, String> {
    let parts = value
        .split(',')
        .map(|part| part.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| format!("invalid coordinate: {err}"))?;

    let [south, west, north, east] = parts[..] else {
        return Err(format!("expected 4 comma-separated values, got {}", parts.len()));
    };

    Viewport::new(ViewportBounds {
        south,
        west,
        north,
        east,
    })
    .map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quest_discovery_lib::Theme;

    #[test]
    fn test_default_settings() {
        let settings = Settings::parse_from(["quest-discovery"]);
        assert_eq!(settings.quests, PathBuf::from("quests.json"));
        assert!(settings.places.is_none());
        assert!(!settings.json);
        assert_eq!(settings.config(), Config::default());
    }

    #[test]
    fn test_criteria_and_bounds() {
        let settings = Settings::parse_from([
            "quest-discovery",
            "--theme",
            "hike",
            "--sort-by",
            "time",
            "--bounds",
            "-10,-20.5,10,20.5",
            "--choose",
            "q-1",
            "--owner",
            "u-7",
        ]);

        let config = settings.config();
        assert_eq!(config.initial_criteria.theme, ThemeFilter::Only(Theme::Hike));
        assert_eq!(config.initial_criteria.sort_by, SortBy::Time);
        assert_eq!(config.initial_viewport.south(), -10.0);
        assert_eq!(config.initial_viewport.east(), 20.5);
        assert_eq!(settings.chosen_quest(), Some(QuestId::from("q-1")));
        assert_eq!(settings.owner.as_deref(), Some("u-7"));
    }

    #[test]
    fn test_invalid_arguments() {
        assert!(Settings::try_parse_from(["quest-discovery", "--theme", "Skydiving"]).is_err());
        assert!(Settings::try_parse_from(["quest-discovery", "--bounds", "1,2,3"]).is_err());
        assert!(Settings::try_parse_from(["quest-discovery", "--bounds", "10,0,-10,5"]).is_err());
        assert!(Settings::try_parse_from(["quest-discovery", "--bounds", "a,b,c,d"]).is_err());
    }
}
