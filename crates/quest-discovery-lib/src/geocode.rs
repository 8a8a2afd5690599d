//! In-memory place-name geocoder

use crate::{DiscoveryError, Geocoder, LatLng, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// A named location
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Place {
    pub name: String,
    pub location: LatLng,
}

/// Case-insensitive lookup table from place names to coordinates
///
/// An exact name match wins. Otherwise the shortest place name containing the
/// query is used, ties broken alphabetically.
#[derive(Clone, Debug, Default)]
pub struct Gazetteer {
    /// Keyed by normalized (trimmed, lowercase) name
    places: BTreeMap<String, LatLng>,
}

impl Gazetteer {
    pub fn new(places: impl IntoIterator<Item = Place>) -> Self {
        let mut gazetteer = Self::default();
        for place in places {
            if place.location.is_valid() {
                gazetteer.places.insert(normalize(&place.name), place.location);
            } else {
                tracing::warn!("Skipping place '{}' with invalid location", place.name);
            }
        }
        gazetteer
    }

    /// Parse a JSON array of `{ "name", "location": { "latitude", "longitude" } }`
    pub fn from_json(json: &str) -> Result<Self> {
        let places: Vec<Place> = serde_json::from_str(json)?;
        Ok(Self::new(places))
    }

    /// Read a JSON array of places from a file
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = tokio::fs::read_to_string(path.as_ref()).await?;
        Self::from_json(&json)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.places.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    /// Synchronous lookup behind [`Geocoder::resolve_address`]
    pub fn lookup(&self, text: &str) -> Option<LatLng> {
        let query = normalize(text);
        if query.is_empty() {
            return None;
        }

        if let Some(location) = self.places.get(&query) {
            return Some(*location);
        }

        self.places
            .iter()
            .filter(|(name, _)| name.contains(&query))
            .min_by_key(|(name, _)| name.len())
            .map(|(_, location)| *location)
    }
}

impl Geocoder for Gazetteer {
    async fn resolve_address(&self, text: &str) -> Result<LatLng> {
        self.lookup(text)
            .ok_or_else(|| DiscoveryError::LocationNotFound(text.to_string()))
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_gazetteer() -> Gazetteer {
        Gazetteer::new([
            Place {
                name: "London".to_string(),
                location: LatLng::new(51.5074, -0.1278),
            },
            Place {
                name: "London Bridge".to_string(),
                location: LatLng::new(51.5079, -0.0877),
            },
            Place {
                name: "New London".to_string(),
                location: LatLng::new(41.3557, -72.0995),
            },
            Place {
                name: "Atlantis".to_string(),
                location: LatLng::new(f64::NAN, 0.0),
            },
        ])
    }

    #[test]
    fn test_gazetteer_skips_invalid_places() {
        assert_eq!(create_test_gazetteer().len(), 3);
    }

    #[test]
    fn test_exact_match_is_case_insensitive() {
        let gazetteer = create_test_gazetteer();
        assert_eq!(
            gazetteer.lookup("  LONDON "),
            Some(LatLng::new(51.5074, -0.1278))
        );
    }

    #[test]
    fn test_partial_match_prefers_shortest_name() {
        let gazetteer = create_test_gazetteer();
        assert_eq!(
            gazetteer.lookup("bridge"),
            Some(LatLng::new(51.5079, -0.0877))
        );
        // "london" is the shortest of the three candidates
        assert_eq!(
            gazetteer.lookup("ndon"),
            Some(LatLng::new(51.5074, -0.1278))
        );
    }

    #[test]
    fn test_lookup_misses() {
        let gazetteer = create_test_gazetteer();
        assert!(gazetteer.lookup("Paris").is_none());
        assert!(gazetteer.lookup("   ").is_none());
    }

    #[test]
    fn test_from_json() {
        let gazetteer = Gazetteer::from_json(
            r#"[{ "name": "Kraków", "location": { "latitude": 50.06, "longitude": 19.94 } }]"#,
        )
        .unwrap();
        assert_eq!(gazetteer.lookup("kraków"), Some(LatLng::new(50.06, 19.94)));
    }

    #[tokio::test]
    async fn test_resolve_address() {
        let gazetteer = create_test_gazetteer();
        assert!(gazetteer.resolve_address("London").await.is_ok());
        assert!(matches!(
            gazetteer.resolve_address("Paris").await,
            Err(DiscoveryError::LocationNotFound(_))
        ));
    }
}
