//! GeoJSON ingestion into the geometry tree.
//!
//! Parsing has partial-success semantics: a feature that fails validation is
//! skipped and reported with its category and JSON path, while the rest of
//! the collection loads. Only unreadable files, malformed JSON and an unusable
//! top-level object fail the whole document.

use std::path::Path;

use orbis_sphere::GeoCoordinate;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::error::{ErrorKind, FeatureError, GeoJsonError};
use crate::geometry::{Feature, FeatureCollection, Geometry, Line, Polygon, Ring};

type ParseResult<T> = Result<T, FeatureError>;

/// Minimum number of positions in a LineString.
pub const MIN_LINE_POSITIONS: usize = 2;

/// Minimum number of positions in a polygon ring, closing position included.
pub const MIN_RING_POSITIONS: usize = 4;

/// The outcome of loading a document.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LoadReport {
    /// Every feature that parsed successfully, in document order.
    pub collection: FeatureCollection,
    /// One entry per skipped feature.
    pub errors: Vec<FeatureError>,
}

impl LoadReport {
    /// Whether every feature loaded.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Read and parse a GeoJSON file.
pub fn load_geojson_file(path: &Path) -> Result<LoadReport, GeoJsonError> {
    let text = std::fs::read_to_string(path).map_err(GeoJsonError::Read)?;
    let report = parse_geojson(&text)?;
    info!(
        features = report.collection.len(),
        skipped = report.errors.len(),
        "Loaded GeoJSON from {}",
        path.display()
    );
    Ok(report)
}

/// Parse a FeatureCollection, a single Feature, or a bare geometry.
pub fn parse_geojson(text: &str) -> Result<LoadReport, GeoJsonError> {
    let root: Value = serde_json::from_str(text).map_err(GeoJsonError::InvalidJson)?;
    let object = as_object(&root, "$").map_err(GeoJsonError::Document)?;
    let kind = type_member(object, "$").map_err(GeoJsonError::Document)?;

    let mut report = LoadReport::default();
    match kind {
        "FeatureCollection" => {
            let features = member(object, "features", "$")
                .and_then(|v| as_array(v, "$.features"))
                .map_err(GeoJsonError::Document)?;
            for (i, value) in features.iter().enumerate() {
                let path = format!("$.features[{i}]");
                match parse_feature(value, &path) {
                    Ok(feature) => report.collection.features.push(feature),
                    Err(e) => report.errors.push(e.at_feature(i)),
                }
            }
        }
        "Feature" => match parse_feature(&root, "$") {
            Ok(feature) => report.collection.features.push(feature),
            Err(e) => report.errors.push(e.at_feature(0)),
        },
        _ => match parse_geometry(&root, "$") {
            Ok(geometry) => report.collection.features.push(Feature::new(geometry)),
            Err(e) if e.kind == ErrorKind::UnknownType && e.path == "$" => {
                return Err(GeoJsonError::Document(e));
            }
            Err(e) => report.errors.push(e.at_feature(0)),
        },
    }

    for e in &report.errors {
        warn!(kind = %e.kind, path = %e.path, "Skipping feature: {}", e.message);
    }
    Ok(report)
}

fn parse_feature(value: &Value, path: &str) -> ParseResult<Feature> {
    let object = as_object(value, path)?;
    let kind = type_member(object, path)?;
    if kind != "Feature" {
        return Err(FeatureError::new(
            ErrorKind::InvalidValue,
            format!("{path}.type"),
            format!("expected \"Feature\", found \"{kind}\""),
        ));
    }

    let geometry_path = format!("{path}.geometry");
    let geometry = match member(object, "geometry", path)? {
        // Unlocated features are legal and simply draw nothing.
        Value::Null => Geometry::GeometryCollection(Vec::new()),
        value => parse_geometry(value, &geometry_path)?,
    };

    let id = match object.get("id") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(other) => {
            return Err(type_error(
                format!("{path}.id"),
                "string or number",
                other,
            ));
        }
    };
    let name = object
        .get("properties")
        .and_then(Value::as_object)
        .and_then(|props| props.get("name"))
        .and_then(Value::as_str)
        .map(str::to_owned);

    Ok(Feature { id, name, geometry })
}

fn parse_geometry(value: &Value, path: &str) -> ParseResult<Geometry> {
    let object = as_object(value, path)?;
    let kind = type_member(object, path)?;

    if kind == "GeometryCollection" {
        let geometries_path = format!("{path}.geometries");
        let children = as_array(member(object, "geometries", path)?, &geometries_path)?;
        return children
            .iter()
            .enumerate()
            .map(|(i, child)| parse_geometry(child, &format!("{geometries_path}[{i}]")))
            .collect::<ParseResult<Vec<_>>>()
            .map(Geometry::GeometryCollection);
    }

    let coords_path = format!("{path}.coordinates");
    let coords = || member(object, "coordinates", path);
    match kind {
        "Point" => parse_position(coords()?, &coords_path).map(Geometry::Point),
        "MultiPoint" => {
            parse_list(coords()?, &coords_path, parse_position).map(Geometry::MultiPoint)
        }
        "LineString" => parse_line(coords()?, &coords_path).map(Geometry::LineString),
        "MultiLineString" => {
            parse_list(coords()?, &coords_path, parse_line).map(Geometry::MultiLineString)
        }
        "Polygon" => parse_polygon(coords()?, &coords_path).map(Geometry::Polygon),
        "MultiPolygon" => {
            parse_list(coords()?, &coords_path, parse_polygon).map(Geometry::MultiPolygon)
        }
        other => Err(FeatureError::new(
            ErrorKind::UnknownType,
            path,
            format!("unknown geometry type \"{other}\""),
        )),
    }
}

fn parse_list<T>(
    value: &Value,
    path: &str,
    parse: fn(&Value, &str) -> ParseResult<T>,
) -> ParseResult<Vec<T>> {
    as_array(value, path)?
        .iter()
        .enumerate()
        .map(|(i, item)| parse(item, &format!("{path}[{i}]")))
        .collect()
}

fn parse_position(value: &Value, path: &str) -> ParseResult<GeoCoordinate> {
    let items = as_array(value, path)?;
    if items.len() < 2 {
        return Err(FeatureError::new(
            ErrorKind::ConstraintViolation,
            path,
            format!("position needs at least 2 numbers, found {}", items.len()),
        ));
    }

    let mut numbers = [0.0; 2];
    for (i, item) in items.iter().enumerate() {
        let Some(n) = item.as_f64() else {
            return Err(type_error(format!("{path}[{i}]"), "number", item));
        };
        // Elevation and further members are validated but dropped.
        if i < 2 {
            numbers[i] = n;
        }
    }

    let [lon, lat] = numbers;
    if !(-180.0..=180.0).contains(&lon) {
        return Err(FeatureError::new(
            ErrorKind::InvalidValue,
            format!("{path}[0]"),
            format!("longitude {lon} outside [-180, 180]"),
        ));
    }
    if !(-90.0..=90.0).contains(&lat) {
        return Err(FeatureError::new(
            ErrorKind::InvalidValue,
            format!("{path}[1]"),
            format!("latitude {lat} outside [-90, 90]"),
        ));
    }
    Ok(GeoCoordinate::from_degrees(lon, lat))
}

fn parse_line(value: &Value, path: &str) -> ParseResult<Line> {
    let line = parse_list(value, path, parse_position)?;
    if line.len() < MIN_LINE_POSITIONS {
        return Err(FeatureError::new(
            ErrorKind::ConstraintViolation,
            path,
            format!(
                "LineString needs at least {MIN_LINE_POSITIONS} positions, found {}",
                line.len()
            ),
        ));
    }
    Ok(line)
}

/// Parse a linear ring and drop its duplicate closing position.
fn parse_ring(value: &Value, path: &str) -> ParseResult<Ring> {
    let mut ring = parse_list(value, path, parse_position)?;
    if ring.len() < MIN_RING_POSITIONS {
        return Err(FeatureError::new(
            ErrorKind::ConstraintViolation,
            path,
            format!(
                "ring needs at least {MIN_RING_POSITIONS} positions, found {}",
                ring.len()
            ),
        ));
    }
    if ring.first() != ring.last() {
        return Err(FeatureError::new(
            ErrorKind::ConstraintViolation,
            path,
            "ring is not closed (first and last positions differ)",
        ));
    }
    ring.pop();
    Ok(ring)
}

fn parse_polygon(value: &Value, path: &str) -> ParseResult<Polygon> {
    parse_list(value, path, parse_ring)
}

fn as_object<'a>(value: &'a Value, path: &str) -> ParseResult<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| type_error(path, "object", value))
}

fn as_array<'a>(value: &'a Value, path: &str) -> ParseResult<&'a Vec<Value>> {
    value
        .as_array()
        .ok_or_else(|| type_error(path, "array", value))
}

fn member<'a>(object: &'a Map<String, Value>, key: &str, path: &str) -> ParseResult<&'a Value> {
    object.get(key).ok_or_else(|| {
        FeatureError::new(
            ErrorKind::MissingField,
            format!("{path}.{key}"),
            format!("missing \"{key}\""),
        )
    })
}

fn type_member<'a>(object: &'a Map<String, Value>, path: &str) -> ParseResult<&'a str> {
    let value = member(object, "type", path)?;
    value
        .as_str()
        .ok_or_else(|| type_error(format!("{path}.type"), "string", value))
}

fn type_error(path: impl Into<String>, expected: &str, found: &Value) -> FeatureError {
    FeatureError::new(
        ErrorKind::InvalidType,
        path,
        format!("expected {expected}, found {}", json_type_name(found)),
    )
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f64 = 1e-9;

    fn collection(features: &[&str]) -> String {
        format!(
            r#"{{"type": "FeatureCollection", "features": [{}]}}"#,
            features.join(",")
        )
    }

    fn feature(geometry: &str) -> String {
        format!(r#"{{"type": "Feature", "properties": {{}}, "geometry": {geometry}}}"#)
    }

    const SQUARE: &str = r#"{"type": "Polygon",
        "coordinates": [[[0, 0], [10, 0], [10, 10], [0, 10], [0, 0]]]}"#;

    #[test]
    fn test_parses_all_geometry_types() {
        let text = collection(&[
            &feature(r#"{"type": "Point", "coordinates": [1, 2]}"#),
            &feature(r#"{"type": "MultiPoint", "coordinates": [[1, 2], [3, 4]]}"#),
            &feature(r#"{"type": "LineString", "coordinates": [[1, 2], [3, 4]]}"#),
            &feature(r#"{"type": "MultiLineString", "coordinates": [[[1, 2], [3, 4]]]}"#),
            &feature(SQUARE),
            &feature(
                r#"{"type": "MultiPolygon", "coordinates": [[[[0, 0], [1, 0], [1, 1], [0, 0]]]]}"#,
            ),
            &feature(&format!(
                r#"{{"type": "GeometryCollection", "geometries": [{SQUARE}]}}"#
            )),
        ]);
        let report = parse_geojson(&text).unwrap();
        assert!(report.is_clean(), "{:?}", report.errors);

        let names: Vec<_> = report
            .collection
            .features
            .iter()
            .map(|f| f.geometry.type_name())
            .collect();
        assert_eq!(
            names,
            [
                "Point",
                "MultiPoint",
                "LineString",
                "MultiLineString",
                "Polygon",
                "MultiPolygon",
                "GeometryCollection"
            ]
        );
    }

    #[test]
    fn test_degrees_converted_and_closing_position_dropped() {
        let report = parse_geojson(&feature(SQUARE)).unwrap();
        let Geometry::Polygon(rings) = &report.collection.features[0].geometry else {
            panic!("expected polygon");
        };
        assert_eq!(rings.len(), 1);
        assert_eq!(rings[0].len(), 4);
        assert!((rings[0][1].lon - 10f64.to_radians()).abs() < EPSILON);
        assert!((rings[0][2].lat - 10f64.to_radians()).abs() < EPSILON);
    }

    #[test]
    fn test_elevation_is_dropped() {
        let text = r#"{"type": "Point", "coordinates": [30, 40, 1200.5]}"#;
        let report = parse_geojson(text).unwrap();
        let Geometry::Point(p) = report.collection.features[0].geometry else {
            panic!("expected point");
        };
        assert!((p.lon_degrees() - 30.0).abs() < EPSILON);
        assert!((p.lat_degrees() - 40.0).abs() < EPSILON);
    }

    #[test]
    fn test_bad_feature_is_skipped_and_reported() {
        let text = collection(&[
            &feature(SQUARE),
            &feature(r#"{"type": "Point", "coordinates": [10, 95]}"#),
            &feature(r#"{"type": "Point", "coordinates": [10, 5]}"#),
        ]);
        let report = parse_geojson(&text).unwrap();
        assert_eq!(report.collection.len(), 2);
        assert_eq!(report.errors.len(), 1);

        let e = &report.errors[0];
        assert_eq!(e.index, Some(1));
        assert_eq!(e.kind, ErrorKind::InvalidValue);
        assert_eq!(e.path, "$.features[1].geometry.coordinates[1]");
    }

    #[test]
    fn test_error_categories_and_paths() {
        let cases = [
            (
                r#"{"type": "Feature", "properties": {}}"#.to_string(),
                ErrorKind::MissingField,
                "$.features[0].geometry",
            ),
            (
                feature(r#"{"type": "Point"}"#),
                ErrorKind::MissingField,
                "$.features[0].geometry.coordinates",
            ),
            (
                feature(r#"{"type": "Point", "coordinates": "1,2"}"#),
                ErrorKind::InvalidType,
                "$.features[0].geometry.coordinates",
            ),
            (
                feature(r#"{"type": "LineString", "coordinates": [[1, 2], [3, "x"]]}"#),
                ErrorKind::InvalidType,
                "$.features[0].geometry.coordinates[1][1]",
            ),
            (
                feature(r#"{"type": "LineString", "coordinates": [[1, 2]]}"#),
                ErrorKind::ConstraintViolation,
                "$.features[0].geometry.coordinates",
            ),
            (
                feature(r#"{"type":"Polygon","coordinates": [[[0, 0], [1, 0], [1, 1], [0, 2]]]}"#),
                ErrorKind::ConstraintViolation,
                "$.features[0].geometry.coordinates[0]",
            ),
            (
                feature(r#"{"type": "Polygon", "coordinates": [[[0, 0], [1, 0], [0, 0]]]}"#),
                ErrorKind::ConstraintViolation,
                "$.features[0].geometry.coordinates[0]",
            ),
            (
                feature(r#"{"type": "Point", "coordinates": [181, 0]}"#),
                ErrorKind::InvalidValue,
                "$.features[0].geometry.coordinates[0]",
            ),
            (
                feature(r#"{"type": "Circle", "coordinates": [0, 0]}"#),
                ErrorKind::UnknownType,
                "$.features[0].geometry",
            ),
            (
                feature(r#"{"type": "GeometryCollection", "geometries": [{"type": "Blob"}]}"#),
                ErrorKind::UnknownType,
                "$.features[0].geometry.geometries[0]",
            ),
            (
                r#"{"type": "Feature", "id": [1], "geometry": null}"#.to_string(),
                ErrorKind::InvalidType,
                "$.features[0].id",
            ),
            ("42".to_string(), ErrorKind::InvalidType, "$.features[0]"),
        ];

        for (feature_text, kind, path) in cases {
            let report = parse_geojson(&collection(&[&feature_text])).unwrap();
            assert_eq!(report.errors.len(), 1, "no error for {feature_text}");
            assert_eq!(report.errors[0].kind, kind, "wrong kind for {feature_text}");
            assert_eq!(report.errors[0].path, path, "wrong path for {feature_text}");
            assert!(report.collection.is_empty());
        }
    }

    #[test]
    fn test_malformed_json_fails_document() {
        let err = parse_geojson("{\"type\": \"FeatureCollection\", ").unwrap_err();
        assert!(matches!(err, GeoJsonError::InvalidJson(_)));
        assert_eq!(err.kind(), Some(ErrorKind::InvalidJson));
    }

    #[test]
    fn test_unusable_top_level_fails_document() {
        let err = parse_geojson(r#"{"type": "FeatureCollection"}"#).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::MissingField));

        let err = parse_geojson(r#"{"type": "Topology"}"#).unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::UnknownType));

        let err = parse_geojson("[]").unwrap_err();
        assert_eq!(err.kind(), Some(ErrorKind::InvalidType));
    }

    #[test]
    fn test_single_feature_and_metadata() {
        let text = r#"{"type": "Feature", "id": 7, "properties": {"name": "Atlantis"},
                       "geometry": {"type": "Point", "coordinates": [-30, 20]}}"#;
        let report = parse_geojson(text).unwrap();
        let feature = &report.collection.features[0];
        assert_eq!(feature.id.as_deref(), Some("7"));
        assert_eq!(feature.name.as_deref(), Some("Atlantis"));
    }

    #[test]
    fn test_null_geometry_is_empty() {
        let report = parse_geojson(r#"{"type": "Feature", "geometry": null}"#).unwrap();
        assert!(report.is_clean());
        assert_eq!(report.collection.features[0].geometry.coordinate_count(), 0);
    }

    #[test]
    fn test_invalid_bare_geometry_is_reported_not_fatal() {
        let report = parse_geojson(r#"{"type": "Point", "coordinates": [0]}"#).unwrap();
        assert_eq!(report.errors.len(), 1);
        assert_eq!(report.errors[0].kind, ErrorKind::ConstraintViolation);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("square.geojson");
        std::fs::write(&path, feature(SQUARE)).unwrap();

        let report = load_geojson_file(&path).unwrap();
        assert_eq!(report.collection.len(), 1);

        let missing = load_geojson_file(&dir.path().join("missing.geojson")).unwrap_err();
        assert!(matches!(missing, GeoJsonError::Read(_)));
        assert_eq!(missing.kind(), None);
    }
}
