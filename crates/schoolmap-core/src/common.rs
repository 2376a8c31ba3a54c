// crates/schoolmap-core/src/common.rs
use serde::{Deserialize, Serialize};

/// A geographic point, serialized as `{"lat": .., "lng": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    #[inline]
    pub const fn new(lat: f64, lng: f64) -> Self {
        LatLng { lat, lng }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lng.is_finite()
    }
}

/// A lat/lng rectangle in the map library's literal form
/// (`{"south", "west", "north", "east"}`).
///
/// A rectangle whose `west` is greater than its `east` crosses the
/// antimeridian; [`LatLngBounds::contains`] accounts for that.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl LatLngBounds {
    /// Builds a rectangle from its south-west and north-east corners.
    pub fn from_corners(south_west: LatLng, north_east: LatLng) -> Self {
        LatLngBounds {
            south: south_west.lat,
            west: south_west.lng,
            north: north_east.lat,
            east: north_east.lng,
        }
    }

    #[inline]
    pub fn south_west(&self) -> LatLng {
        LatLng::new(self.south, self.west)
    }

    #[inline]
    pub fn north_east(&self) -> LatLng {
        LatLng::new(self.north, self.east)
    }

    #[inline]
    fn crosses_antimeridian(&self) -> bool {
        self.west > self.east
    }

    /// Inclusive containment test.
    pub fn contains(&self, point: LatLng) -> bool {
        if point.lat < self.south || point.lat > self.north {
            return false;
        }
        if self.crosses_antimeridian() {
            point.lng >= self.west || point.lng <= self.east
        } else {
            point.lng >= self.west && point.lng <= self.east
        }
    }

    pub fn center(&self) -> LatLng {
        let lat = (self.south + self.north) / 2.0;
        let lng = if self.crosses_antimeridian() {
            let span = (180.0 - self.west) + (self.east + 180.0);
            let mid = self.west + span / 2.0;
            if mid > 180.0 {
                mid - 360.0
            } else {
                mid
            }
        } else {
            (self.west + self.east) / 2.0
        };
        LatLng::new(lat, lng)
    }
}

/// The view a map should take to show one city.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ViewTarget {
    /// Fit the map to a rectangle (viewport or bounds).
    FitBounds(LatLngBounds),
    /// Coarse fallback: center on a point at a fixed zoom.
    CenterZoom { center: LatLng, zoom: u32 },
}

/// Simple aggregate statistics for a directory.
///
/// Returned by [`crate::Directory::stats`]; the `visible_*` counts reflect
/// the last filter or bounds pass applied to the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectoryStats {
    pub cities: usize,
    pub schools: usize,
    pub visible_cities: usize,
    pub visible_schools: usize,
}
