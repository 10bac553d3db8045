use geo::{BoundingRect, MultiPolygon, Polygon, Rect};
use geojson::GeoJson;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{IiveError, Result};
use crate::region::normalize_region_name;

/// Boundary file shipped next to the binary
pub const DEFAULT_GEOJSON: &str = "maakonnad.geojson";

/// Feature property holding the county name
pub const DEFAULT_NAME_PROPERTY: &str = "MNIMI";

/// A county boundary keyed by its canonical name
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub canonical_name: String,
    pub geometry: MultiPolygon<f64>,
}

impl Region {
    pub fn new(name: &str, geometry: MultiPolygon<f64>) -> Self {
        Self {
            canonical_name: normalize_region_name(name).to_string(),
            geometry,
        }
    }
}

/// Load county boundaries from a GeoJSON FeatureCollection
pub fn load_regions(path: &Path, name_property: &str) -> Result<Vec<Region>> {
    info!("Loading regions from {:?}", path);
    let text = fs::read_to_string(path).map_err(|e| IiveError::geometry(path, e))?;
    parse_regions(&text, name_property).map_err(|err| match err {
        IiveError::GeometryLoad { reason, .. } => IiveError::geometry(path, reason),
        other => other,
    })
}

/// Parse county boundaries from GeoJSON text.
///
/// Features that share a canonical name are merged into one multipolygon;
/// non-polygonal features are skipped. Output is sorted by name.
pub fn parse_regions(text: &str, name_property: &str) -> Result<Vec<Region>> {
    let geojson: GeoJson = text
        .parse()
        .map_err(|e| IiveError::geometry("<memory>", e))?;

    let collection = match geojson {
        GeoJson::FeatureCollection(fc) => fc,
        _ => {
            return Err(IiveError::geometry(
                "<memory>",
                "GeoJSON must be a FeatureCollection",
            ))
        }
    };

    let mut polygons: BTreeMap<String, Vec<Polygon<f64>>> = BTreeMap::new();

    for (idx, feature) in collection.features.into_iter().enumerate() {
        let name = match feature.property(name_property) {
            Some(serde_json::Value::String(s)) => normalize_region_name(s).to_string(),
            _ => {
                return Err(IiveError::geometry(
                    "<memory>",
                    format!("feature {} has no string property '{}'", idx, name_property),
                ))
            }
        };

        let Some(geometry) = feature.geometry else {
            warn!("Region '{}' has no geometry, skipping", name);
            continue;
        };

        let geometry: geo::Geometry<f64> = geometry.value.try_into().map_err(|e| {
            IiveError::geometry("<memory>", format!("region '{}': {:?}", name, e))
        })?;

        let parts = match geometry {
            geo::Geometry::Polygon(p) => vec![p],
            geo::Geometry::MultiPolygon(mp) => mp.0,
            _ => {
                warn!("Region '{}' is not polygonal, skipping", name);
                continue;
            }
        };

        polygons.entry(name).or_default().extend(parts);
    }

    let regions: Vec<Region> = polygons
        .into_iter()
        .map(|(canonical_name, parts)| Region {
            canonical_name,
            geometry: MultiPolygon::new(parts),
        })
        .collect();

    info!("Loaded {} regions", regions.len());
    Ok(regions)
}

/// Bounding box covering every given geometry
pub fn combined_bounds<'a>(
    geometries: impl IntoIterator<Item = &'a MultiPolygon<f64>>,
) -> Option<Rect<f64>> {
    geometries
        .into_iter()
        .filter_map(|g| g.bounding_rect())
        .reduce(|a, b| {
            Rect::new(
                (a.min().x.min(b.min().x), a.min().y.min(b.min().y)),
                (a.max().x.max(b.max().x), a.max().y.max(b.max().y)),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const COUNTIES: &str = r#"{
        "type": "FeatureCollection",
        "features": [
            {"type": "Feature", "properties": {"MNIMI": "Harju maakond", "MKOOD": "0037"},
             "geometry": {"type": "Polygon", "coordinates": [[[0,0],[2,0],[2,2],[0,2],[0,0]]]}},
            {"type": "Feature", "properties": {"MNIMI": "Saare maakond"},
             "geometry": {"type": "MultiPolygon", "coordinates": [
                [[[5,5],[6,5],[6,6],[5,5]]],
                [[[7,7],[8,7],[8,8],[7,7]]]
             ]}},
            {"type": "Feature", "properties": {"MNIMI": "Saare maakond"},
             "geometry": {"type": "Polygon", "coordinates": [[[9,9],[10,9],[10,10],[9,9]]]}},
            {"type": "Feature", "properties": {"MNIMI": "Pealinn"},
             "geometry": {"type": "Point", "coordinates": [1,1]}}
        ]
    }"#;

    #[test]
    fn test_parse_and_normalize() {
        let regions = parse_regions(COUNTIES, DEFAULT_NAME_PROPERTY).unwrap();
        let names: Vec<&str> = regions.iter().map(|r| r.canonical_name.as_str()).collect();
        assert_eq!(names, vec!["Harju", "Saare"]);
        assert_eq!(regions[0].geometry.0.len(), 1);
        // two features merged
        assert_eq!(regions[1].geometry.0.len(), 3);
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(COUNTIES.as_bytes()).unwrap();

        let regions = load_regions(file.path(), DEFAULT_NAME_PROPERTY).unwrap();
        assert_eq!(regions.len(), 2);
    }

    #[test]
    fn test_missing_file() {
        let err = load_regions(Path::new("/nonexistent/maakonnad.geojson"), "MNIMI").unwrap_err();
        match err {
            IiveError::GeometryLoad { path, .. } => {
                assert_eq!(path, Path::new("/nonexistent/maakonnad.geojson"))
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_corrupt_file_reports_path() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"{ not json").unwrap();

        let err = load_regions(file.path(), "MNIMI").unwrap_err();
        match err {
            IiveError::GeometryLoad { path, .. } => assert_eq!(path, file.path()),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_not_a_collection() {
        let single = r#"{"type": "Point", "coordinates": [1, 2]}"#;
        assert!(matches!(
            parse_regions(single, "MNIMI"),
            Err(IiveError::GeometryLoad { .. })
        ));
    }

    #[test]
    fn test_missing_name_property() {
        let err = parse_regions(COUNTIES, "NIMI").unwrap_err();
        assert!(err.to_string().contains("NIMI"));
    }

    #[test]
    fn test_combined_bounds() {
        let regions = parse_regions(COUNTIES, DEFAULT_NAME_PROPERTY).unwrap();
        let bounds = combined_bounds(regions.iter().map(|r| &r.geometry)).unwrap();
        assert_eq!(bounds.min().x, 0.0);
        assert_eq!(bounds.max().y, 10.0);
        assert!(combined_bounds(std::iter::empty()).is_none());
    }
}
