/// Point cloud and projection output containers
use nalgebra::{Point2, Point3};

/// An ordered set of 3D points loaded from a single source
///
/// Order is kept exactly as loaded so renderers can rely on adjacency.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointCloud {
    points: Vec<Point3<f64>>,
}

impl PointCloud {
    pub fn new() -> Self {
        Self { points: Vec::new() }
    }

    /// Build a cloud from planar points, promoting each with z = 1.0
    pub fn from_planar(points: impl IntoIterator<Item = Point2<f64>>) -> Self {
        Self {
            points: points
                .into_iter()
                .map(|p| Point3::new(p.x, p.y, 1.0))
                .collect(),
        }
    }

    pub fn push(&mut self, point: Point3<f64>) {
        self.points.push(point);
    }

    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

impl FromIterator<Point3<f64>> for PointCloud {
    fn from_iter<I: IntoIterator<Item = Point3<f64>>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// Output of one projection pass
///
/// `projected[i]` and `reference[i]` always belong to input point `i`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectionResult {
    /// Final (possibly distorted) screen coordinates.
    pub projected: Vec<Point2<f64>>,
    /// Undistorted projection, for models that produce one.
    pub reference: Option<Vec<Point2<f64>>>,
}

impl ProjectionResult {
    pub fn len(&self) -> usize {
        self.projected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projected.is_empty()
    }

    /// Iterate over every point a renderer would draw, projected first
    pub fn all_points(&self) -> impl Iterator<Item = &Point2<f64>> {
        self.projected
            .iter()
            .chain(self.reference.iter().flat_map(|r| r.iter()))
    }
}
