//! The in-memory geometry tree and its visitor.

use orbis_sphere::GeoCoordinate;

/// Ordered coordinates of a polygon boundary, implicitly closed.
pub type Ring = Vec<GeoCoordinate>;

/// Ordered coordinates of an open line.
pub type Line = Vec<GeoCoordinate>;

/// A polygon: exterior ring first, holes after it.
pub type Polygon = Vec<Ring>;

/// A geometry value. Coordinates are stored in radians; degrees are
/// converted once when the tree is built.
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    Point(GeoCoordinate),
    MultiPoint(Vec<GeoCoordinate>),
    LineString(Line),
    MultiLineString(Vec<Line>),
    Polygon(Polygon),
    MultiPolygon(Vec<Polygon>),
    GeometryCollection(Vec<Geometry>),
}

/// Role of a ring inside its polygon.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RingRole {
    /// First ring of a polygon.
    Exterior,
    /// Any following ring.
    Hole,
}

/// Receives the leaves of a [`Geometry`] tree.
///
/// Multi-geometries and collections are flattened by [`Geometry::accept`];
/// implementors only see points, lines and rings.
pub trait GeometryVisitor {
    fn visit_point(&mut self, point: GeoCoordinate);
    fn visit_line(&mut self, line: &[GeoCoordinate]);
    fn visit_ring(&mut self, ring: &[GeoCoordinate], role: RingRole);
}

impl Geometry {
    /// Walk the tree depth-first, in document order.
    pub fn accept<V: GeometryVisitor + ?Sized>(&self, visitor: &mut V) {
        match self {
            Geometry::Point(p) => visitor.visit_point(*p),
            Geometry::MultiPoint(points) => {
                for &p in points {
                    visitor.visit_point(p);
                }
            }
            Geometry::LineString(line) => visitor.visit_line(line),
            Geometry::MultiLineString(lines) => {
                for line in lines {
                    visitor.visit_line(line);
                }
            }
            Geometry::Polygon(rings) => visit_polygon(rings, visitor),
            Geometry::MultiPolygon(polygons) => {
                for rings in polygons {
                    visit_polygon(rings, visitor);
                }
            }
            Geometry::GeometryCollection(children) => {
                for child in children {
                    child.accept(visitor);
                }
            }
        }
    }

    /// The GeoJSON type name of this variant.
    pub fn type_name(&self) -> &'static str {
        match self {
            Geometry::Point(_) => "Point",
            Geometry::MultiPoint(_) => "MultiPoint",
            Geometry::LineString(_) => "LineString",
            Geometry::MultiLineString(_) => "MultiLineString",
            Geometry::Polygon(_) => "Polygon",
            Geometry::MultiPolygon(_) => "MultiPolygon",
            Geometry::GeometryCollection(_) => "GeometryCollection",
        }
    }

    /// Total number of coordinates in the tree.
    pub fn coordinate_count(&self) -> usize {
        let mut counter = CoordinateCounter(0);
        self.accept(&mut counter);
        counter.0
    }
}

fn visit_polygon<V: GeometryVisitor + ?Sized>(rings: &[Ring], visitor: &mut V) {
    for (i, ring) in rings.iter().enumerate() {
        let role = if i == 0 {
            RingRole::Exterior
        } else {
            RingRole::Hole
        };
        visitor.visit_ring(ring, role);
    }
}

struct CoordinateCounter(usize);

impl GeometryVisitor for CoordinateCounter {
    fn visit_point(&mut self, _point: GeoCoordinate) {
        self.0 += 1;
    }

    fn visit_line(&mut self, line: &[GeoCoordinate]) {
        self.0 += line.len();
    }

    fn visit_ring(&mut self, ring: &[GeoCoordinate], _role: RingRole) {
        self.0 += ring.len();
    }
}

/// A geometry with its identifying metadata.
#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    /// `id` member, numbers rendered as strings.
    pub id: Option<String>,
    /// `properties.name`, when it is a string.
    pub name: Option<String>,
    pub geometry: Geometry,
}

impl Feature {
    /// A feature with no metadata.
    pub fn new(geometry: Geometry) -> Self {
        Self {
            id: None,
            name: None,
            geometry,
        }
    }
}

/// An ordered list of features.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Visit every feature's geometry in order.
    pub fn accept<V: GeometryVisitor + ?Sized>(&self, visitor: &mut V) {
        for feature in &self.features {
            feature.geometry.accept(visitor);
        }
    }
}
