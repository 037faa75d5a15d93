/// Planar rotation helpers and homogeneous projection matrices
use nalgebra::{Matrix2, Matrix3x4, Matrix4, Point3};

/// Transform builder shared by the projection models
pub struct Transform;

impl Transform {
    /// Rotate x and y about the origin by `theta` radians, keeping z
    pub fn rotate_xy(point: &Point3<f64>, theta: f64) -> Point3<f64> {
        let (sin, cos) = theta.sin_cos();
        Point3::new(
            point.x * cos - point.y * sin,
            point.x * sin + point.y * cos,
            point.z,
        )
    }

    /// Shift x and y, keeping z
    pub fn translate_xy(point: &Point3<f64>, dx: f64, dy: f64) -> Point3<f64> {
        Point3::new(point.x + dx, point.y + dy, point.z)
    }

    /// True rotation block
    pub fn rotation_block(theta: f64) -> Matrix2<f64> {
        let (sin, cos) = theta.sin_cos();
        Matrix2::new(cos, -sin, sin, cos)
    }

    /// Linear blend between the identity (`r = 0`) and a quarter turn (`r = 1`)
    ///
    /// `r` is used directly as the matrix entries, not as an angle.
    pub fn blend_block(r: f64) -> Matrix2<f64> {
        Matrix2::new(1.0 - r, -r, r, 1.0 - r)
    }

    /// Build the 4x4 projection used by the homogeneous models
    ///
    /// The xy block goes top-left, the translation into column 3, and the
    /// third row maps z to the homogeneous divisor `depth_ratio * z + 1`.
    #[rustfmt::skip]
    pub fn projection_matrix(block: &Matrix2<f64>, dx: f64, dy: f64, depth_ratio: f64) -> Matrix4<f64> {
        Matrix4::new(
            block[(0, 0)], block[(0, 1)], 0.0, dx,
            block[(1, 0)], block[(1, 1)], 0.0, dy,
            0.0, 0.0, depth_ratio, 1.0,
            0.0, 0.0, 1.0, 0.0,
        )
    }

    /// Camera matrix projecting onto x, y, z with independent x/y scale
    #[rustfmt::skip]
    pub fn camera_matrix(scale_x: f64, scale_y: f64) -> Matrix3x4<f64> {
        Matrix3x4::new(
            scale_x, 0.0, 0.0, 0.0,
            0.0, scale_y, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
        )
    }
}
