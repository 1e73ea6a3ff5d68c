//! Site GeoJSON handling and map framing for the overview widgets

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::EstimateResult;
use crate::models::SiteRecord;
use crate::types::{GeoArea, GeoPoint};

/// Web-Mercator latitude limit
pub const MAX_MERCATOR_LAT: f64 = 85.05112878;
pub const MAX_ZOOM: u8 = 22;
/// Zoom used when the estimate cannot be computed
pub const FALLBACK_ZOOM: u8 = 9;

pub const DEFAULT_MAP_WIDTH_PX: u32 = 700;
pub const DEFAULT_MAP_HEIGHT_PX: u32 = 900;
pub const DEFAULT_TILE_SIZE_PX: u32 = 256;

/// Framing used when the GeoJSON has no usable geometry (northern Ghana)
pub const FALLBACK_AREA: GeoArea = GeoArea {
    upper_left: GeoPoint { lat: 11.0, lon: -3.0 },
    lower_right: GeoPoint { lat: 10.0, lon: -2.0 },
};

#[derive(Debug, Clone, Default, Deserialize)]
pub struct FeatureCollection {
    #[serde(default)]
    pub features: Vec<Feature>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Feature {
    #[serde(default)]
    pub properties: Option<Map<String, Value>>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

/// Polygon geometries; anything else carries no points for framing
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Polygon {
        #[serde(default)]
        coordinates: Vec<Vec<Vec<f64>>>,
    },
    MultiPolygon {
        #[serde(default)]
        coordinates: Vec<Vec<Vec<Vec<f64>>>>,
    },
    #[serde(other)]
    Other,
}

impl Geometry {
    /// All ring positions, as `[lon, lat, ..]`
    pub fn positions(&self) -> Vec<&[f64]> {
        match self {
            Geometry::Polygon { coordinates } => coordinates
                .iter()
                .flatten()
                .map(Vec::as_slice)
                .collect(),
            Geometry::MultiPolygon { coordinates } => coordinates
                .iter()
                .flatten()
                .flatten()
                .map(Vec::as_slice)
                .collect(),
            Geometry::Other => Vec::new(),
        }
    }

    pub fn points(&self) -> Vec<GeoPoint> {
        self.positions()
            .into_iter()
            .filter_map(|position| match position {
                [lon, lat, ..] if lon.is_finite() && lat.is_finite() => {
                    Some(GeoPoint::new(*lat, *lon))
                }
                _ => None,
            })
            .collect()
    }
}

impl Feature {
    pub fn role(&self) -> Option<&str> {
        self.properties.as_ref()?.get("role")?.as_str()
    }

    pub fn points(&self) -> Vec<GeoPoint> {
        self.geometry.as_ref().map(Geometry::points).unwrap_or_default()
    }
}

impl FeatureCollection {
    pub fn from_json_str(json: &str) -> EstimateResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn with_role<'a>(&'a self, role: &'a str) -> impl Iterator<Item = &'a Feature> + 'a {
        self.features
            .iter()
            .filter(move |feature| feature.role() == Some(role))
    }

    /// Site records carried in the properties of `role == "site"` features.
    /// Features whose properties do not form a site record are skipped.
    pub fn site_records(&self) -> Vec<SiteRecord> {
        self.with_role("site")
            .filter_map(|feature| feature.properties.clone())
            .filter_map(|props| serde_json::from_value(Value::Object(props)).ok())
            .collect()
    }
}

/// Axis-aligned bounding box in degrees
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Bounds {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl Bounds {
    pub fn from_points(points: &[GeoPoint]) -> Option<Self> {
        let first = points.first()?;
        let init = Bounds {
            min_lat: first.lat,
            min_lon: first.lon,
            max_lat: first.lat,
            max_lon: first.lon,
        };
        Some(points.iter().fold(init, |b, p| Bounds {
            min_lat: b.min_lat.min(p.lat),
            min_lon: b.min_lon.min(p.lon),
            max_lat: b.max_lat.max(p.lat),
            max_lon: b.max_lon.max(p.lon),
        }))
    }

    pub fn from_area(area: &GeoArea) -> Self {
        let (a, b) = (area.upper_left, area.lower_right);
        Bounds {
            min_lat: a.lat.min(b.lat),
            min_lon: a.lon.min(b.lon),
            max_lat: a.lat.max(b.lat),
            max_lon: a.lon.max(b.lon),
        }
    }

    pub fn is_finite(&self) -> bool {
        [self.min_lat, self.min_lon, self.max_lat, self.max_lon]
            .iter()
            .all(|v| v.is_finite())
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }
}

fn mercator_y(lat_deg: f64) -> f64 {
    let lat = lat_deg.clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT);
    (PI / 4.0 + lat.to_radians() / 2.0).tan().ln()
}

/// Largest integer zoom at which `bounds` fits a map of the given pixel size
pub fn estimate_zoom(bounds: &Bounds, map_width_px: u32, map_height_px: u32, tile_size_px: u32) -> u8 {
    if !bounds.is_finite() || tile_size_px == 0 {
        return FALLBACK_ZOOM;
    }
    let tile = f64::from(tile_size_px);
    let lon_delta = (bounds.max_lon - bounds.min_lon).abs().max(1e-6);
    let lat_delta = (mercator_y(bounds.max_lat) - mercator_y(bounds.min_lat)).abs();

    let zoom_x = (f64::from(map_width_px) * 360.0 / (lon_delta * tile)).log2();
    let zoom_y = if lat_delta > 0.0 {
        (f64::from(map_height_px) * PI / (lat_delta * tile)).log2()
    } else {
        f64::from(MAX_ZOOM)
    };

    let zoom = zoom_x.min(zoom_y).floor();
    if zoom.is_nan() {
        return FALLBACK_ZOOM;
    }
    zoom.clamp(0.0, f64::from(MAX_ZOOM)) as u8
}

/// Framing of the sites map
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MapView {
    pub bounds: Bounds,
    pub center: GeoPoint,
    pub zoom: u8,
    pub site_count: usize,
}

impl MapView {
    /// Frame the site polygons, else the first boundary polygon, else the
    /// fallback area
    pub fn from_collection(collection: &FeatureCollection) -> Self {
        let site_points: Vec<GeoPoint> = collection
            .with_role("site")
            .flat_map(Feature::points)
            .collect();
        let site_count = collection.with_role("site").count();

        let bounds = Bounds::from_points(&site_points)
            .or_else(|| {
                let boundary = collection.with_role("boundary").next()?;
                Bounds::from_points(&boundary.points())
            })
            .unwrap_or_else(|| Bounds::from_area(&FALLBACK_AREA));

        MapView::framing(bounds, site_count)
    }

    pub fn framing(bounds: Bounds, site_count: usize) -> Self {
        MapView {
            bounds,
            center: bounds.center(),
            zoom: estimate_zoom(
                &bounds,
                DEFAULT_MAP_WIDTH_PX,
                DEFAULT_MAP_HEIGHT_PX,
                DEFAULT_TILE_SIZE_PX,
            ),
            site_count,
        }
    }
}
