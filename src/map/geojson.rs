//! GeoJSON Shape Loader
//! Parses a FeatureCollection of municipality (multi)polygons keyed by a name property.

use log::{debug, info, warn};
use serde::Deserialize;
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeoJsonError {
    #[error("Failed to read GeoJSON: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid GeoJSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Expected a FeatureCollection, found {0:?}")]
    NotFeatureCollection(String),
    #[error("No polygon features with a '{0}' property")]
    NoRegions(String),
}

/// `[x, y]` in the file's coordinate system.
pub type Position = [f64; 2];

/// Exterior ring plus holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub exterior: Vec<Position>,
    pub holes: Vec<Vec<Position>>,
}

impl Polygon {
    pub fn rings(&self) -> impl Iterator<Item = &Vec<Position>> {
        std::iter::once(&self.exterior).chain(self.holes.iter())
    }

    /// Absolute shoelace area of the exterior ring.
    pub fn area(&self) -> f64 {
        let ring = &self.exterior;
        let n = ring.len();
        let twice: f64 = (0..n)
            .map(|i| {
                let [x1, y1] = ring[i];
                let [x2, y2] = ring[(i + 1) % n];
                x1 * y2 - x2 * y1
            })
            .sum();
        twice.abs() / 2.0
    }
}

/// One named municipality.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub name: String,
    pub polygons: Vec<Polygon>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Bounds {
    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// Whether the box fits in longitude/latitude ranges.
    pub fn looks_geographic(&self) -> bool {
        self.min_x >= -180.0 && self.max_x <= 180.0 && self.min_y >= -90.0 && self.max_y <= 90.0
    }
}

/// All usable regions of a shape file.
#[derive(Debug, Clone, Default)]
pub struct RegionShapes {
    pub regions: Vec<Region>,
    /// Features that were skipped while parsing
    pub skipped: usize,
}

#[derive(Deserialize)]
struct RawCollection {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    features: Vec<RawFeature>,
}

#[derive(Deserialize)]
struct RawFeature {
    #[serde(default)]
    geometry: Option<RawGeometry>,
    #[serde(default)]
    properties: Option<serde_json::Map<String, Value>>,
}

#[derive(Deserialize)]
#[serde(tag = "type")]
enum RawGeometry {
    Polygon {
        coordinates: Vec<Vec<Vec<f64>>>,
    },
    MultiPolygon {
        coordinates: Vec<Vec<Vec<Vec<f64>>>>,
    },
    #[serde(other)]
    Other,
}

impl RegionShapes {
    pub fn load(path: &Path, region_key: &str) -> Result<Self, GeoJsonError> {
        info!("Reading shapes {}", path.display());
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file), region_key)
    }

    pub fn from_reader<R: Read>(reader: R, region_key: &str) -> Result<Self, GeoJsonError> {
        let raw: RawCollection = serde_json::from_reader(reader)?;
        Self::from_raw(raw, region_key)
    }

    pub fn parse_str(json: &str, region_key: &str) -> Result<Self, GeoJsonError> {
        let raw: RawCollection = serde_json::from_str(json)?;
        Self::from_raw(raw, region_key)
    }

    fn from_raw(raw: RawCollection, region_key: &str) -> Result<Self, GeoJsonError> {
        if raw.kind != "FeatureCollection" {
            return Err(GeoJsonError::NotFeatureCollection(raw.kind));
        }

        let mut shapes = RegionShapes::default();
        for (idx, feature) in raw.features.into_iter().enumerate() {
            let name = feature
                .properties
                .as_ref()
                .and_then(|props| props.get(region_key))
                .and_then(Value::as_str)
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(str::to_string);

            let Some(name) = name else {
                warn!("Skipping feature {}: no text '{}' property", idx, region_key);
                shapes.skipped += 1;
                continue;
            };

            let polygons = match feature.geometry {
                Some(RawGeometry::Polygon { coordinates }) => {
                    convert_polygon(coordinates).into_iter().collect()
                }
                Some(RawGeometry::MultiPolygon { coordinates }) => coordinates
                    .into_iter()
                    .filter_map(convert_polygon)
                    .collect(),
                Some(RawGeometry::Other) | None => Vec::new(),
            };

            if polygons.is_empty() {
                warn!("Skipping feature {} ({}): no polygon geometry", idx, name);
                shapes.skipped += 1;
                continue;
            }

            shapes.regions.push(Region { name, polygons });
        }

        if shapes.regions.is_empty() {
            return Err(GeoJsonError::NoRegions(region_key.to_string()));
        }

        debug!(
            "Parsed {} regions ({} features skipped)",
            shapes.regions.len(),
            shapes.skipped
        );
        Ok(shapes)
    }

    pub fn bounds(&self) -> Option<Bounds> {
        let mut positions = self
            .regions
            .iter()
            .flat_map(|r| r.polygons.iter())
            .flat_map(|p| p.rings())
            .flatten();

        let &[x, y] = positions.next()?;
        let init = Bounds {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        };
        Some(positions.fold(init, |b, &[x, y]| Bounds {
            min_x: b.min_x.min(x),
            min_y: b.min_y.min(y),
            max_x: b.max_x.max(x),
            max_y: b.max_y.max(y),
        }))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.regions.iter().map(|r| r.name.as_str())
    }
}

fn convert_ring(ring: Vec<Vec<f64>>) -> Option<Vec<Position>> {
    let ring: Vec<Position> = ring
        .into_iter()
        .filter_map(|pos| match pos.as_slice() {
            [x, y, ..] if x.is_finite() && y.is_finite() => Some([*x, *y]),
            _ => None,
        })
        .collect();
    (ring.len() >= 3).then_some(ring)
}

fn convert_polygon(rings: Vec<Vec<Vec<f64>>>) -> Option<Polygon> {
    let mut rings = rings.into_iter();
    let exterior = convert_ring(rings.next()?)?;
    let holes = rings.filter_map(convert_ring).collect();
    Some(Polygon { exterior, holes })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {
                "type": "Feature",
                "properties": {"statnaam": "Assen", "code": "GM0106"},
                "geometry": {"type": "Polygon", "coordinates": [
                    [[0, 0], [4, 0], [4, 4], [0, 4], [0, 0]],
                    [[1, 1], [2, 1], [2, 2], [1, 1]]
                ]}
            },
            {
                "type": "Feature",
                "properties": {"statnaam": "Texel"},
                "geometry": {"type": "MultiPolygon", "coordinates": [
                    [[[10, 10, 3.5], [12, 10, 3.5], [12, 12, 3.5], [10, 10, 3.5]]],
                    [[[20, 20], [21, 20]]]
                ]}
            },
            {
                "type": "Feature",
                "properties": {"statnaam": "Puntje"},
                "geometry": {"type": "Point", "coordinates": [5, 5]}
            },
            {
                "type": "Feature",
                "properties": {"andere": "x"},
                "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]]}
            },
            {
                "type": "Feature",
                "properties": {"statnaam": "Leeg"},
                "geometry": null
            }
        ]
    }"#;

    #[test]
    fn parses_polygons_and_multipolygons() {
        let shapes = RegionShapes::parse_str(SAMPLE, "statnaam").unwrap();
        let names: Vec<&str> = shapes.names().collect();
        assert_eq!(names, vec!["Assen", "Texel"]);
        assert_eq!(shapes.skipped, 3);

        let assen = &shapes.regions[0];
        assert_eq!(assen.polygons.len(), 1);
        assert_eq!(assen.polygons[0].holes.len(), 1);
        assert_eq!(assen.polygons[0].area(), 16.0);

        // Degenerate second part is dropped, third ordinate ignored
        let texel = &shapes.regions[1];
        assert_eq!(texel.polygons.len(), 1);
        assert_eq!(texel.polygons[0].exterior[0], [10.0, 10.0]);
    }

    #[test]
    fn non_text_names_are_skipped() {
        let json = r#"{
            "type": "FeatureCollection",
            "features": [
                {
                    "type": "Feature",
                    "properties": {"statnaam": 106},
                    "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]]}
                },
                {
                    "type": "Feature",
                    "properties": {"statnaam": "  "},
                    "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]]}
                },
                {
                    "type": "Feature",
                    "properties": {"statnaam": " Emmen "},
                    "geometry": {"type": "Polygon", "coordinates": [[[0,0],[1,0],[1,1],[0,0]]]}
                }
            ]
        }"#;
        let shapes = RegionShapes::parse_str(json, "statnaam").unwrap();
        assert_eq!(shapes.names().collect::<Vec<_>>(), vec!["Emmen"]);
        assert_eq!(shapes.skipped, 2);
    }

    #[test]
    fn bounds_cover_all_rings() {
        let shapes = RegionShapes::parse_str(SAMPLE, "statnaam").unwrap();
        let b = shapes.bounds().unwrap();
        assert_eq!((b.min_x, b.min_y, b.max_x, b.max_y), (0.0, 0.0, 12.0, 12.0));
        assert!(b.looks_geographic());
    }

    #[test]
    fn alternative_region_key() {
        let shapes = RegionShapes::parse_str(SAMPLE, "andere").unwrap();
        assert_eq!(shapes.names().collect::<Vec<_>>(), vec!["x"]);
    }

    #[test]
    fn rejects_other_documents() {
        let err = RegionShapes::parse_str(r#"{"type": "Feature", "features": []}"#, "statnaam")
            .unwrap_err();
        assert!(matches!(err, GeoJsonError::NotFeatureCollection(ref k) if k == "Feature"));

        let empty = r#"{"type": "FeatureCollection", "features": []}"#;
        let err = RegionShapes::parse_str(empty, "statnaam").unwrap_err();
        assert!(matches!(err, GeoJsonError::NoRegions(_)));

        assert!(matches!(
            RegionShapes::parse_str("not json", "statnaam"),
            Err(GeoJsonError::Json(_))
        ));
    }
}
