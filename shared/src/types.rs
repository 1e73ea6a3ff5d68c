//! Common types used across the dashboard

use serde::{Deserialize, Serialize};

use crate::models::de;

/// Geographic point in WGS84 degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Rectangular area given by its upper-left and lower-right corners
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoArea {
    pub upper_left: GeoPoint,
    pub lower_right: GeoPoint,
}

impl GeoArea {
    /// Closed ring of the rectangle, as drawn on the overview map
    pub fn ring(&self) -> [GeoPoint; 5] {
        let ul = self.upper_left;
        let lr = self.lower_right;
        [
            GeoPoint::new(ul.lat, ul.lon),
            GeoPoint::new(ul.lat, lr.lon),
            GeoPoint::new(lr.lat, lr.lon),
            GeoPoint::new(lr.lat, ul.lon),
            GeoPoint::new(ul.lat, ul.lon),
        ]
    }
}

/// Inclusive min/max range, either bound may be unknown
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct ValueRange {
    #[serde(default, deserialize_with = "de::finite_number")]
    pub min: Option<f64>,
    #[serde(default, deserialize_with = "de::finite_number")]
    pub max: Option<f64>,
}

/// Land-cover categories recorded for every site
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LandCover {
    Residential,
    Mixed,
    Green,
    Water,
}

impl LandCover {
    pub const ALL: [LandCover; 4] = [
        LandCover::Residential,
        LandCover::Mixed,
        LandCover::Green,
        LandCover::Water,
    ];

    /// Key used in `land_cover_percent` maps
    pub fn key(&self) -> &'static str {
        match self {
            LandCover::Residential => "residential",
            LandCover::Mixed => "mixed",
            LandCover::Green => "green",
            LandCover::Water => "water",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        LandCover::ALL.into_iter().find(|kind| kind.key() == key)
    }
}

impl std::fmt::Display for LandCover {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LandCover::Residential => write!(f, "Residential"),
            LandCover::Mixed => write!(f, "Mixed"),
            LandCover::Green => write!(f, "Green"),
            LandCover::Water => write!(f, "Water"),
        }
    }
}
