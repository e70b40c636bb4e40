//! Resolved mesh elements.

use nalgebra::Point3;

/// The element kinds a `.mail` file can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// 4-node quadrangle (`QUAD4`).
    Quad,
    /// 3-node triangle (`TRIA3`).
    Triangle,
    /// 2-node segment (`SEG2`).
    Beam,
}

impl ElementKind {
    /// All kinds, in the order they appear in the combined element list.
    pub const ALL: [ElementKind; 3] = [ElementKind::Quad, ElementKind::Triangle, ElementKind::Beam];

    /// Number of corner nodes.
    pub fn arity(self) -> usize {
        match self {
            ElementKind::Quad => 4,
            ElementKind::Triangle => 3,
            ElementKind::Beam => 2,
        }
    }

    /// Human readable name.
    pub fn name(self) -> &'static str {
        match self {
            ElementKind::Quad => "quad",
            ElementKind::Triangle => "triangle",
            ElementKind::Beam => "beam",
        }
    }
}

/// A mesh element holding owned copies of its corner points.
///
/// Elements never refer back to the node list they were resolved from.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// Quadrangle corners in file order.
    Quad([Point3<f64>; 4]),
    /// Triangle corners in file order.
    Triangle([Point3<f64>; 3]),
    /// Segment end points.
    Beam([Point3<f64>; 2]),
}

impl Element {
    /// The element kind.
    pub fn kind(&self) -> ElementKind {
        match self {
            Element::Quad(_) => ElementKind::Quad,
            Element::Triangle(_) => ElementKind::Triangle,
            Element::Beam(_) => ElementKind::Beam,
        }
    }

    /// The corner points in file order.
    pub fn points(&self) -> &[Point3<f64>] {
        match self {
            Element::Quad(p) => p,
            Element::Triangle(p) => p,
            Element::Beam(p) => p,
        }
    }

    /// Build an element from a point list, if its length is a known arity.
    pub fn from_points(points: &[Point3<f64>]) -> Option<Element> {
        match points {
            [a, b, c, d] => Some(Element::Quad([*a, *b, *c, *d])),
            [a, b, c] => Some(Element::Triangle([*a, *b, *c])),
            [a, b] => Some(Element::Beam([*a, *b])),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arity_matches_points() {
        let p = Point3::origin();
        for kind in ElementKind::ALL {
            let points = vec![p; kind.arity()];
            let element = Element::from_points(&points).unwrap();
            assert_eq!(element.kind(), kind);
            assert_eq!(element.points().len(), kind.arity());
        }
    }

    #[test]
    fn test_unknown_arity() {
        assert!(Element::from_points(&[Point3::origin()]).is_none());
        assert!(Element::from_points(&[Point3::origin(); 5]).is_none());
    }
}
