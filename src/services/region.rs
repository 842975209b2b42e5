// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Submitted region parsing and validation.

use geo::Polygon;
use geojson::GeoJson;

/// Minimum positions in a closed ring (triangle plus the closing point).
const MIN_RING_POSITIONS: usize = 4;

/// Validate a drawn region submitted with an analysis request.
///
/// The region must be a GeoJSON Polygon (bare geometry, Feature, or a
/// FeatureCollection whose first feature is a polygon) with a closed
/// outer ring. Nothing beyond closure is checked; self-intersection and
/// winding are the analysis worker's problem.
pub fn validate_region(geo_json: &str) -> Result<(), RegionError> {
    let parsed: GeoJson = geo_json
        .parse()
        .map_err(|e: geojson::Error| RegionError::ParseError(e.to_string()))?;

    let geometry = match parsed {
        GeoJson::Geometry(g) => g.value,
        GeoJson::Feature(f) => f.geometry.ok_or(RegionError::MissingGeometry)?.value,
        GeoJson::FeatureCollection(fc) => fc
            .features
            .into_iter()
            .next()
            .and_then(|f| f.geometry)
            .ok_or(RegionError::MissingGeometry)?
            .value,
    };

    // Closure is checked on the raw positions first so an open ring is
    // reported as such; geojson's TryInto<Polygon> silently closes rings.
    if let geojson::Value::Polygon(ref rings) = geometry {
        let outer = rings.first().ok_or(RegionError::MissingGeometry)?;
        if outer.len() < MIN_RING_POSITIONS {
            return Err(RegionError::TooFewPositions(outer.len()));
        }
        if outer.first() != outer.last() {
            return Err(RegionError::OpenRing);
        }
    } else {
        return Err(RegionError::NotAPolygon);
    }

    let _polygon: Polygon<f64> = geometry
        .try_into()
        .map_err(|e: geojson::Error| RegionError::ParseError(e.to_string()))?;

    Ok(())
}

/// Errors from region validation.
#[derive(Debug, thiserror::Error)]
pub enum RegionError {
    #[error("Failed to parse region GeoJSON: {0}")]
    ParseError(String),

    #[error("Region has no geometry")]
    MissingGeometry,

    #[error("Region geometry must be a Polygon")]
    NotAPolygon,

    #[error("Region ring has too few positions ({0}; need at least 4)")]
    TooFewPositions(usize),

    #[error("Region ring is not closed (first and last positions differ)")]
    OpenRing,
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLOSED_SQUARE: &str = r#"{
        "type": "Feature",
        "geometry": {
            "type": "Polygon",
            "coordinates": [[[-96.3, 30.6], [-96.3, 30.7], [-96.2, 30.7], [-96.3, 30.6]]]
        },
        "properties": {}
    }"#;

    #[test]
    fn test_closed_polygon_feature_is_valid() {
        assert!(validate_region(CLOSED_SQUARE).is_ok());
    }

    #[test]
    fn test_bare_polygon_geometry_is_valid() {
        let geometry = r#"{
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
        }"#;
        assert!(validate_region(geometry).is_ok());
    }

    #[test]
    fn test_open_ring_is_rejected() {
        let open = r#"{
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.5, 0.5]]]
        }"#;
        assert!(matches!(validate_region(open), Err(RegionError::OpenRing)));
    }

    #[test]
    fn test_too_few_positions_is_rejected() {
        let degenerate = r#"{
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [1.0, 0.0], [0.0, 0.0]]]
        }"#;
        assert!(matches!(
            validate_region(degenerate),
            Err(RegionError::TooFewPositions(3))
        ));
    }

    #[test]
    fn test_line_geometry_is_rejected() {
        let line = r#"{
            "type": "LineString",
            "coordinates": [[0.0, 0.0], [1.0, 1.0]]
        }"#;
        assert!(matches!(
            validate_region(line),
            Err(RegionError::NotAPolygon)
        ));
    }

    #[test]
    fn test_garbage_is_a_parse_error() {
        assert!(matches!(
            validate_region("{not geojson"),
            Err(RegionError::ParseError(_))
        ));
    }
}
