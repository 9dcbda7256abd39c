//! Built-in sample world used when no GeoJSON file is given.

use orbis_geometry::{Feature, FeatureCollection, Geometry, Ring};
use orbis_sphere::GeoCoordinate;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

/// Spacing of graticule lines in degrees.
const GRATICULE_STEP: i32 = 30;

/// Sample points per graticule line.
const GRATICULE_SAMPLES: i32 = 12;

const CITIES: [(&str, f64, f64); 6] = [
    ("Reykjavik", -21.9, 64.1),
    ("Nairobi", 36.8, -1.3),
    ("Lima", -77.0, -12.0),
    ("Ulaanbaatar", 106.9, 47.9),
    ("Wellington", 174.8, -41.3),
    ("Honolulu", -157.9, 21.3),
];

/// A deterministic world: a graticule, `islands` random polygons (every
/// third one with a lake) and a handful of cities.
pub(crate) fn sample_world(seed: u64, islands: usize) -> FeatureCollection {
    let mut rng = Xoshiro256StarStar::seed_from_u64(seed);
    let mut features = vec![graticule()];

    for i in 0..islands {
        let lon = rng.gen_range(-180.0..180.0);
        let lat = rng.gen_range(-70.0..70.0);
        let radius = rng.gen_range(4.0..25.0);
        let mut rings = vec![island(&mut rng, lon, lat, radius)];
        if i % 3 == 0 {
            rings.push(circle(lon, lat, radius * 0.25, 12));
        }
        let mut feature = Feature::new(Geometry::Polygon(rings));
        feature.id = Some(format!("island-{i}"));
        features.push(feature);
    }

    for (name, lon, lat) in CITIES {
        let mut feature = Feature::new(Geometry::Point(GeoCoordinate::from_degrees(lon, lat)));
        feature.name = Some(name.to_string());
        features.push(feature);
    }

    FeatureCollection::new(features)
}

fn graticule() -> Feature {
    let mut lines = Vec::new();
    for lon in (-180..180).step_by(GRATICULE_STEP as usize) {
        let meridian = (0..=GRATICULE_SAMPLES)
            .map(|i| {
                let lat = -90.0 + 180.0 * f64::from(i) / f64::from(GRATICULE_SAMPLES);
                GeoCoordinate::from_degrees(f64::from(lon), lat)
            })
            .collect();
        lines.push(meridian);
    }
    for lat in (-60..=60).step_by(GRATICULE_STEP as usize) {
        let parallel = (0..=GRATICULE_SAMPLES)
            .map(|i| {
                let lon = -180.0 + 360.0 * f64::from(i) / f64::from(GRATICULE_SAMPLES);
                GeoCoordinate::from_degrees(lon, f64::from(lat))
            })
            .collect();
        lines.push(parallel);
    }

    let mut feature = Feature::new(Geometry::MultiLineString(lines));
    feature.name = Some("graticule".to_string());
    feature
}

/// An irregular star-shaped ring around (`lon`, `lat`).
fn island(rng: &mut Xoshiro256StarStar, lon: f64, lat: f64, radius: f64) -> Ring {
    let n: u32 = rng.gen_range(6..16);
    (0..n)
        .map(|i| {
            let angle = std::f64::consts::TAU * f64::from(i) / f64::from(n);
            let r = radius * rng.gen_range(0.6..1.0);
            offset(lon, lat, r * angle.cos(), r * angle.sin())
        })
        .collect()
}

fn circle(lon: f64, lat: f64, radius: f64, n: u32) -> Ring {
    (0..n)
        .map(|i| {
            let angle = std::f64::consts::TAU * f64::from(i) / f64::from(n);
            offset(lon, lat, radius * angle.cos(), radius * angle.sin())
        })
        .collect()
}

fn offset(lon: f64, lat: f64, d_lon: f64, d_lat: f64) -> GeoCoordinate {
    GeoCoordinate::from_degrees(lon + d_lon, (lat + d_lat).clamp(-90.0, 90.0))
}
