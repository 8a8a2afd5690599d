//! Visible map region and the spatial filter
//!
//! A viewport is a latitude/longitude rectangle without date-line wraparound.
//! Edges are kept as reported by the map, so a zoomed-out map may report
//! longitudes beyond ±180 or latitudes beyond ±90.
//! Containment is strict: a quest anchored exactly on an edge is outside.

use crate::{DiscoveryError, LatLng, Quest, Result};
use geo::{Coord, Rect};
use serde::{Deserialize, Serialize};

/// Wire shape of a viewport, as reported by the map
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewportBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

/// Rectangular visible region, backed by a `geo::Rect` (x = longitude, y = latitude)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ViewportBounds", into = "ViewportBounds")]
pub struct Viewport {
    rect: Rect<f64>,
}

impl Viewport {
    /// The whole globe, the viewport before the map reports anything
    pub fn full_globe() -> Self {
        Self {
            rect: Rect::new(
                Coord {
                    x: -180.0,
                    y: -90.0,
                },
                Coord { x: 180.0, y: 90.0 },
            ),
        }
    }

    /// Create a viewport from its four edges
    ///
    /// Fails with `InvalidViewport` on non-finite edges, or when south > north
    /// or west > east.
    pub fn new(bounds: ViewportBounds) -> Result<Self> {
        let ViewportBounds {
            south,
            west,
            north,
            east,
        } = bounds;

        if ![south, west, north, east].iter().all(|v| v.is_finite()) {
            return Err(DiscoveryError::InvalidViewport(format!(
                "non-finite edge in {bounds:?}"
            )));
        }
        if south > north || west > east {
            return Err(DiscoveryError::InvalidViewport(format!(
                "inverted bounds {bounds:?}"
            )));
        }

        Ok(Self {
            rect: Rect::new(Coord { x: west, y: south }, Coord { x: east, y: north }),
        })
    }

    #[inline]
    pub fn south(&self) -> f64 {
        self.rect.min().y
    }

    #[inline]
    pub fn north(&self) -> f64 {
        self.rect.max().y
    }

    #[inline]
    pub fn west(&self) -> f64 {
        self.rect.min().x
    }

    #[inline]
    pub fn east(&self) -> f64 {
        self.rect.max().x
    }

    /// The underlying rectangle (x = longitude, y = latitude)
    #[inline]
    pub fn rect(&self) -> Rect<f64> {
        self.rect
    }

    pub fn bounds(&self) -> ViewportBounds {
        ViewportBounds {
            south: self.south(),
            west: self.west(),
            north: self.north(),
            east: self.east(),
        }
    }

    pub fn center(&self) -> LatLng {
        LatLng::from(geo::Point::from(self.rect.center()))
    }

    /// Check whether a coordinate lies strictly inside the viewport
    #[inline]
    pub fn contains(&self, location: &LatLng) -> bool {
        let in_lat = location.latitude > self.south() && location.latitude < self.north();
        let in_lng = location.longitude > self.west() && location.longitude < self.east();
        in_lat && in_lng
    }

    /// Spatial filter: check whether a quest's anchor location is visible
    #[inline]
    pub fn contains_quest(&self, quest: &Quest) -> bool {
        self.contains(&quest.anchor_location())
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::full_globe()
    }
}

impl TryFrom<ViewportBounds> for Viewport {
    type Error = DiscoveryError;

    fn try_from(bounds: ViewportBounds) -> Result<Self> {
        Self::new(bounds)
    }
}

impl From<Viewport> for ViewportBounds {
    fn from(viewport: Viewport) -> Self {
        viewport.bounds()
    }
}
