//! GeoJSON text in, frame buffers out.

use orbis_geometry::parse_geojson;
use orbis_render::{Viewport, build_frame, build_frame_parallel};
use orbis_sphere::{GeoCoordinate, ProjectionKind, ViewContext};

const WORLD: &str = r#"{
  "type": "FeatureCollection",
  "features": [
    {"type": "Feature", "id": "near", "properties": {"name": "Near"},
     "geometry": {"type": "Polygon", "coordinates": [
        [[-20, -20], [20, -20], [20, 20], [-20, 20], [-20, -20]],
        [[-5, -5], [5, -5], [5, 5], [-5, 5], [-5, -5]]]}},
    {"type": "Feature", "id": "limb", "properties": {"name": "Limb"},
     "geometry": {"type": "Polygon", "coordinates": [
        [[80, -10], [100, -10], [100, 10], [80, 10], [80, -10]]]}},
    {"type": "Feature", "id": "far", "properties": {"name": "Far"},
     "geometry": {"type": "Polygon", "coordinates": [
        [[170, -10], [-170, -10], [-170, 10], [170, 10], [170, -10]]]}},
    {"type": "Feature", "id": "equator",
     "geometry": {"type": "LineString", "coordinates": [[0, 0], [60, 0], [120, 0], [180, 0]]}},
    {"type": "Feature", "id": "cities",
     "geometry": {"type": "MultiPoint", "coordinates": [[2.35, 48.85], [139.7, 35.7]]}},
    {"type": "Feature", "id": "broken",
     "geometry": {"type": "Point", "coordinates": [0, 120]}}
  ]
}"#;

#[test]
fn test_world_frame_under_orthographic() {
    let report = parse_geojson(WORLD).unwrap();
    assert_eq!(report.collection.len(), 5);
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].index, Some(5));

    let ctx = ViewContext::new(GeoCoordinate::default(), ProjectionKind::Orthographic, 1e-3);
    let (frame, stats) = build_frame(&report.collection, &ctx, &Viewport::default());

    assert_eq!(stats.features, 5);
    assert_eq!(stats.rings, 4);
    assert_eq!(stats.holes, 1);
    assert_eq!(stats.visible_rings, 2);
    assert_eq!(stats.partial_rings, 1);
    assert_eq!(stats.occluded_rings, 1);
    assert_eq!(stats.line_runs, 1);
    // Paris is on the near side, Tokyo is not.
    assert_eq!(frame.marker_count(), 1);

    let within_disc = |p: [f32; 2]| p[0].hypot(p[1]) <= 1.0 + 1e-5;
    assert!(frame.segments.iter().all(|v| within_disc(v.position)));
    assert!(frame.fan.iter().all(|v| within_disc(v.position)));
    assert_eq!(frame.segment_count(), stats.segments);
    assert_eq!(frame.triangle_count(), stats.triangles);
}

#[test]
fn test_world_frame_under_equirectangular() {
    let report = parse_geojson(WORLD).unwrap();
    let ctx = ViewContext::new(
        GeoCoordinate::default(),
        ProjectionKind::Equirectangular,
        1e-3,
    );
    let (frame, stats) = build_frame_parallel(&report.collection, &ctx, &Viewport::default(), 2);

    assert_eq!(stats.visible_rings, 4);
    assert_eq!(stats.occluded_rings, 0);
    assert_eq!(stats.hidden_points, 0);
    assert_eq!(frame.marker_count(), 2);

    let (pi, half_pi) = (std::f32::consts::PI, std::f32::consts::FRAC_PI_2);
    assert!(frame.segments.iter().all(|v| {
        v.position[0].abs() <= pi + 1e-5 && v.position[1].abs() <= half_pi + 1e-5
    }));
}
