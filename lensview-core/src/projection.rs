/// Point cloud projection for the three camera models
use nalgebra::{Matrix3x4, Matrix4, Point2, Vector2};

use crate::error::ProjectionError;
use crate::geometry::{PointCloud, ProjectionResult};
use crate::params::{FieldDistortionParams, ParameterVector, PerspectiveParams, SplitDistortionParams};
use crate::transform::Transform;

/// Fixed distortion center of the field-distortion model
pub const FIELD_CENTER: [f64; 2] = [0.5, 0.5];

/// Weight of the fourth-order field term; zero keeps the term inert
pub const FIELD_HIGHER_ORDER: f64 = 0.0;

const STAGE_DIVIDE: &str = "perspective divide";
const STAGE_FAR_PLANE: &str = "far-plane rescale";
const STAGE_NORMALIZE: &str = "homogeneous normalization";
const STAGE_DISTORT: &str = "radial distortion";

/// Stateless projection of point clouds to screen coordinates
pub struct ProjectionEngine;

impl ProjectionEngine {
    /// Project every point of `cloud` with the model selected by `params`
    ///
    /// The result is index-aligned with the cloud. Any zero divisor or
    /// non-finite coordinate aborts the pass with `NumericOverflow`.
    pub fn project(
        cloud: &PointCloud,
        params: &ParameterVector,
    ) -> Result<ProjectionResult, ProjectionError> {
        match params {
            ParameterVector::Perspective(p) => Self::project_perspective(cloud, p),
            ParameterVector::SplitDistortion(p) => Self::project_split_distortion(cloud, p),
            ParameterVector::FieldDistortion(p) => Self::project_field_distortion(cloud, p),
        }
    }

    fn project_perspective(
        cloud: &PointCloud,
        p: &PerspectiveParams,
    ) -> Result<ProjectionResult, ProjectionError> {
        let theta = p.rotation_deg.to_radians();

        let projected = cloud
            .points()
            .iter()
            .enumerate()
            .map(|(index, point)| {
                let rotated = Transform::rotate_xy(point, theta);
                let moved = Transform::translate_xy(&rotated, p.dx, p.dy);

                let depth = moved.z + p.z_near;
                if depth == 0.0 {
                    return Err(overflow(index, STAGE_DIVIDE));
                }
                let mut x = moved.x * (p.focal_length_1 / depth);
                let mut y = moved.y * (p.focal_length_2 / depth);

                // Points past the far plane are scaled down, not clipped.
                if moved.z > p.z_far {
                    if moved.z == 0.0 {
                        return Err(overflow(index, STAGE_FAR_PLANE));
                    }
                    x = x * p.z_far / moved.z;
                    y = y * p.z_far / moved.z;
                }

                let factor = 1.0 + p.k * (x * x + y * y);
                checked(index, STAGE_DISTORT, Point2::new(x * factor, y * factor))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ProjectionResult {
            projected,
            reference: None,
        })
    }

    fn project_split_distortion(
        cloud: &PointCloud,
        p: &SplitDistortionParams,
    ) -> Result<ProjectionResult, ProjectionError> {
        let projection = Transform::projection_matrix(
            &Transform::blend_block(p.blend),
            p.dx,
            p.dy,
            p.z_far / p.z_near,
        );
        let camera = Transform::camera_matrix(1.0, 1.0);
        let center = Vector2::new(p.center_x, p.center_y);
        let mask = p.k1 * p.focal_length_1 + p.k2 * p.focal_length_2;

        project_homogeneous(cloud, &camera, &projection, |reference| {
            *reference + (reference.coords - center) * mask
        })
    }

    fn project_field_distortion(
        cloud: &PointCloud,
        p: &FieldDistortionParams,
    ) -> Result<ProjectionResult, ProjectionError> {
        let projection = Transform::projection_matrix(
            &Transform::rotation_block(p.rotation_rad),
            p.dx,
            p.dy,
            p.z_far / p.z_near,
        );
        let camera = Transform::camera_matrix(p.cam_x, p.cam_y);
        let center = Vector2::new(FIELD_CENTER[0], FIELD_CENTER[1]);

        project_homogeneous(cloud, &camera, &projection, |reference| {
            let offset = reference.coords - center;
            let r = offset.component_mul(&offset);
            let f1 = r.x + r.y;
            let f2 = r.x * r.x + r.y * r.y;
            let mask = p.k1 * f1 + FIELD_HIGHER_ORDER * f2;
            *reference + offset * mask
        })
    }
}

/// Shared homogenize → `camera * projection` → normalize → distort pipeline
fn project_homogeneous<F>(
    cloud: &PointCloud,
    camera: &Matrix3x4<f64>,
    projection: &Matrix4<f64>,
    distort: F,
) -> Result<ProjectionResult, ProjectionError>
where
    F: Fn(&Point2<f64>) -> Point2<f64>,
{
    let mut projected = Vec::with_capacity(cloud.len());
    let mut reference = Vec::with_capacity(cloud.len());

    for (index, point) in cloud.points().iter().enumerate() {
        let f = camera * (projection * point.to_homogeneous());
        // A zero near plane leaves an infinite depth ratio in `projection`.
        if f.z == 0.0 || f.iter().any(|v| !v.is_finite()) {
            return Err(overflow(index, STAGE_NORMALIZE));
        }

        let undistorted = checked(index, STAGE_NORMALIZE, Point2::new(f.x / f.z, f.y / f.z))?;
        let distorted = checked(index, STAGE_DISTORT, distort(&undistorted))?;

        projected.push(distorted);
        reference.push(undistorted);
    }

    Ok(ProjectionResult {
        projected,
        reference: Some(reference),
    })
}

fn overflow(index: usize, stage: &'static str) -> ProjectionError {
    ProjectionError::NumericOverflow { index, stage }
}

fn checked(
    index: usize,
    stage: &'static str,
    point: Point2<f64>,
) -> Result<Point2<f64>, ProjectionError> {
    if point.x.is_finite() && point.y.is_finite() {
        Ok(point)
    } else {
        Err(overflow(index, stage))
    }
}
