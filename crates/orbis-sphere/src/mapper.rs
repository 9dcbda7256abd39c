//! Geographic coordinates, the unit sphere, and the view rotation.
//!
//! Geographic input is converted once into [`GeoCoordinate`] (radians) and then
//! into unit vectors. The view rotation carries the chosen map centre onto the
//! view pole `(0, 0, 1)`, which turns "visible hemisphere" into a plain `z > 0`
//! test in rotated space.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use glam::{DMat3, DVec3};

/// Tolerance for the unit-length invariant on sphere points.
pub const UNIT_TOLERANCE: f64 = 1e-5;

/// A unit vector on the sphere. `|v| = 1` within [`UNIT_TOLERANCE`].
pub type SpherePoint = DVec3;

/// Longitude/latitude pair in radians.
///
/// After construction `lon` is in `(-π, π]` and `lat` is in `[-π/2, π/2]`.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct GeoCoordinate {
    /// Longitude in radians. Positive = east.
    pub lon: f64,
    /// Latitude in radians. Positive = north.
    pub lat: f64,
}

impl GeoCoordinate {
    /// Construct from radians, normalizing longitude and clamping latitude.
    #[must_use]
    pub fn new(lon: f64, lat: f64) -> Self {
        Self {
            lon: normalize_lon(lon),
            lat: lat.clamp(-FRAC_PI_2, FRAC_PI_2),
        }
    }

    /// Construct from degrees. This is the single point where input in degrees
    /// is converted to radians.
    #[must_use]
    pub fn from_degrees(lon_deg: f64, lat_deg: f64) -> Self {
        Self::new(lon_deg.to_radians(), lat_deg.to_radians())
    }

    /// Longitude in degrees.
    pub fn lon_degrees(&self) -> f64 {
        self.lon.to_degrees()
    }

    /// Latitude in degrees.
    pub fn lat_degrees(&self) -> f64 {
        self.lat.to_degrees()
    }
}

/// Wrap a longitude into `(-π, π]`.
#[must_use]
pub fn normalize_lon(lon: f64) -> f64 {
    if !lon.is_finite() {
        return 0.0;
    }
    let wrapped = (lon + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI { PI } else { wrapped }
}

/// Convert a geographic coordinate to a point on the unit sphere.
///
/// `x = cos λ · cos φ`, `y = sin λ · cos φ`, `z = sin φ`.
#[inline]
#[must_use]
pub fn geo_to_sphere(coord: GeoCoordinate) -> SpherePoint {
    let (sin_lon, cos_lon) = coord.lon.sin_cos();
    let (sin_lat, cos_lat) = coord.lat.sin_cos();
    DVec3::new(cos_lon * cos_lat, sin_lon * cos_lat, sin_lat)
}

/// Convert a sphere point back to a geographic coordinate.
///
/// `z` is clamped before `asin` so accumulated floating error never leaves
/// its domain. Longitude at the poles is arbitrary (`atan2(0, 0) = 0`).
#[inline]
#[must_use]
pub fn sphere_to_geo(point: SpherePoint) -> GeoCoordinate {
    let lon = point.y.atan2(point.x);
    let lat = point.z.clamp(-1.0, 1.0).asin();
    GeoCoordinate {
        lon: normalize_lon(lon),
        lat,
    }
}

/// Whether `point` satisfies the unit-length invariant.
#[inline]
pub fn is_unit(point: SpherePoint) -> bool {
    point.is_finite() && (point.length() - 1.0).abs() <= UNIT_TOLERANCE
}

/// Bring a drifting point back onto the sphere.
///
/// Returns `None` for zero-length or non-finite vectors, which cannot be
/// renormalized.
#[inline]
pub fn renormalize(point: DVec3) -> Option<SpherePoint> {
    point.try_normalize()
}

/// Build the rotation that carries `centre` onto the view pole `(0, 0, 1)`.
///
/// The rows are the local east, north and up unit vectors at `centre`, so the
/// result is orthonormal for every centre (poles included) and keeps north
/// pointing toward `+y` after rotation.
#[must_use]
pub fn build_view_rotation(centre: GeoCoordinate) -> DMat3 {
    let (sin_lon, cos_lon) = centre.lon.sin_cos();
    let (sin_lat, cos_lat) = centre.lat.sin_cos();

    let east = DVec3::new(-sin_lon, cos_lon, 0.0);
    let north = DVec3::new(-sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat);
    let up = DVec3::new(cos_lon * cos_lat, sin_lon * cos_lat, sin_lat);

    DMat3::from_cols(east, north, up).transpose()
}

/// Rotate every point by `matrix`.
#[must_use]
pub fn rotate(points: &[SpherePoint], matrix: &DMat3) -> Vec<SpherePoint> {
    let mut out = Vec::with_capacity(points.len());
    rotate_into(points, matrix, &mut out);
    out
}

/// Rotate every point by `matrix`, reusing `out`'s allocation.
pub fn rotate_into(points: &[SpherePoint], matrix: &DMat3, out: &mut Vec<SpherePoint>) {
    out.clear();
    out.reserve(points.len());
    out.extend(points.iter().map(|&p| *matrix * p));
}
