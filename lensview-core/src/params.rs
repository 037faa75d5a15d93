/// Projection model variants, their control tables and parameter vectors
use std::f64::consts::TAU;
use std::fmt;
use std::str::FromStr;

use crate::error::ProjectionError;
use crate::loader::PointFormat;

/// Declared label, range and default of one continuous control
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlSpec {
    pub label: &'static str,
    pub min: f64,
    pub max: f64,
    pub default: f64,
}

impl ControlSpec {
    pub const fn new(label: &'static str, min: f64, max: f64, default: f64) -> Self {
        Self {
            label,
            min,
            max,
            default,
        }
    }

    /// Clamp `value` to `[min, max]`
    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }
}

const PERSPECTIVE_CONTROLS: [ControlSpec; 8] = [
    ControlSpec::new("Rotation XY", 0.0, 360.0, 0.0),
    ControlSpec::new("Z Near", 1.0, 100.0, 10.0),
    ControlSpec::new("Z Far", 100.0, 1000.0, 500.0),
    ControlSpec::new("dX", -100.0, 100.0, 0.0),
    ControlSpec::new("dY", -100.0, 100.0, 0.0),
    ControlSpec::new("Focal Length 1", 1.0, 100.0, 50.0),
    ControlSpec::new("Focal Length 2", 1.0, 100.0, 50.0),
    ControlSpec::new("Radial Distortion (K1)", -1.0, 1.0, 0.0),
];

const SPLIT_DISTORTION_CONTROLS: [ControlSpec; 11] = [
    ControlSpec::new("Rotation Blend", 0.0, 1.0, 0.0),
    ControlSpec::new("Z Near", -100.0, 100.0, -3.0),
    ControlSpec::new("Z Far", -100.0, 100.0, -10.0),
    ControlSpec::new("dX", -10.0, 10.0, 0.0),
    ControlSpec::new("dY", -10.0, 10.0, 0.0),
    ControlSpec::new("Focal Length 1", 0.0, 10.0, 1.0),
    ControlSpec::new("Focal Length 2", 0.0, 10.0, 1.0),
    ControlSpec::new("K1", -100.0, 100.0, 0.0),
    ControlSpec::new("K2", -100.0, 100.0, 0.0),
    ControlSpec::new("Center X", -10.0, 10.0, 0.5),
    ControlSpec::new("Center Y", -10.0, 10.0, 0.5),
];

const FIELD_DISTORTION_CONTROLS: [ControlSpec; 8] = [
    ControlSpec::new("Rotation (rad)", 0.0, TAU, 0.0),
    ControlSpec::new("Z Near", -100.0, 100.0, -3.0),
    ControlSpec::new("Z Far", -100.0, 100.0, -10.0),
    ControlSpec::new("dX", -10.0, 10.0, 0.0),
    ControlSpec::new("dY", -10.0, 10.0, 0.0),
    ControlSpec::new("K1", -100.0, 100.0, 0.0),
    ControlSpec::new("Camera X", -10.0, 10.0, 0.5),
    ControlSpec::new("Camera Y", -10.0, 10.0, 0.5),
];

/// Selectable projection model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Variant {
    /// Explicit perspective formula with scalar radial distortion.
    Perspective,
    /// Homogeneous camera matrix with a symmetric/asymmetric split distortion.
    SplitDistortion,
    /// Homogeneous camera matrix with field-dependent radial distortion.
    FieldDistortion,
}

impl Variant {
    pub const ALL: [Variant; 3] = [
        Variant::Perspective,
        Variant::SplitDistortion,
        Variant::FieldDistortion,
    ];

    /// Controls in declared parameter order
    pub fn controls(self) -> &'static [ControlSpec] {
        match self {
            Variant::Perspective => &PERSPECTIVE_CONTROLS,
            Variant::SplitDistortion => &SPLIT_DISTORTION_CONTROLS,
            Variant::FieldDistortion => &FIELD_DISTORTION_CONTROLS,
        }
    }

    pub fn defaults(self) -> Vec<f64> {
        self.controls().iter().map(|spec| spec.default).collect()
    }

    /// Row shape accepted when loading points for this model
    pub fn point_format(self) -> PointFormat {
        match self {
            Variant::Perspective => PointFormat::Auto,
            Variant::SplitDistortion | Variant::FieldDistortion => PointFormat::Spatial,
        }
    }

    /// Whether the model also yields an undistorted reference projection
    pub fn has_reference(self) -> bool {
        !matches!(self, Variant::Perspective)
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Variant::Perspective => "perspective",
            Variant::SplitDistortion => "split-distortion",
            Variant::FieldDistortion => "field-distortion",
        };
        f.write_str(name)
    }
}

impl FromStr for Variant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "a" | "perspective" => Ok(Variant::Perspective),
            "b" | "split-distortion" | "split" => Ok(Variant::SplitDistortion),
            "c" | "field-distortion" | "field" => Ok(Variant::FieldDistortion),
            other => Err(format!(
                "unknown variant {other:?} (expected a, b, c, perspective, split-distortion or field-distortion)"
            )),
        }
    }
}

/// Parameters of the explicit perspective model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveParams {
    /// Rotation about the z axis, in degrees.
    pub rotation_deg: f64,
    pub z_near: f64,
    pub z_far: f64,
    pub dx: f64,
    pub dy: f64,
    pub focal_length_1: f64,
    pub focal_length_2: f64,
    /// Radial distortion coefficient.
    pub k: f64,
}

/// Parameters of the split-distortion camera-matrix model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SplitDistortionParams {
    /// Blend factor used directly as rotation block entries.
    pub blend: f64,
    pub z_near: f64,
    pub z_far: f64,
    pub dx: f64,
    pub dy: f64,
    pub focal_length_1: f64,
    pub focal_length_2: f64,
    pub k1: f64,
    pub k2: f64,
    pub center_x: f64,
    pub center_y: f64,
}

/// Parameters of the field-distortion camera-matrix model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldDistortionParams {
    /// Rotation about the z axis, in radians.
    pub rotation_rad: f64,
    pub z_near: f64,
    pub z_far: f64,
    pub dx: f64,
    pub dy: f64,
    pub k1: f64,
    pub cam_x: f64,
    pub cam_y: f64,
}

/// A full parameter set tagged with the model it drives
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParameterVector {
    Perspective(PerspectiveParams),
    SplitDistortion(SplitDistortionParams),
    FieldDistortion(FieldDistortionParams),
}

impl ParameterVector {
    /// Build from values in the variant's declared control order
    pub fn from_values(variant: Variant, values: &[f64]) -> Result<Self, ProjectionError> {
        let expected = variant.controls().len();
        if values.len() != expected {
            return Err(ProjectionError::ParameterCount {
                variant,
                expected,
                found: values.len(),
            });
        }
        Ok(Self::build(variant, values))
    }

    /// Parameter vector made of every control's default
    pub fn defaults(variant: Variant) -> Self {
        Self::build(variant, &variant.defaults())
    }

    // `values` must hold exactly one entry per declared control.
    fn build(variant: Variant, values: &[f64]) -> Self {
        match variant {
            Variant::Perspective => ParameterVector::Perspective(PerspectiveParams {
                rotation_deg: values[0],
                z_near: values[1],
                z_far: values[2],
                dx: values[3],
                dy: values[4],
                focal_length_1: values[5],
                focal_length_2: values[6],
                k: values[7],
            }),
            Variant::SplitDistortion => ParameterVector::SplitDistortion(SplitDistortionParams {
                blend: values[0],
                z_near: values[1],
                z_far: values[2],
                dx: values[3],
                dy: values[4],
                focal_length_1: values[5],
                focal_length_2: values[6],
                k1: values[7],
                k2: values[8],
                center_x: values[9],
                center_y: values[10],
            }),
            Variant::FieldDistortion => ParameterVector::FieldDistortion(FieldDistortionParams {
                rotation_rad: values[0],
                z_near: values[1],
                z_far: values[2],
                dx: values[3],
                dy: values[4],
                k1: values[5],
                cam_x: values[6],
                cam_y: values[7],
            }),
        }
    }

    pub fn variant(&self) -> Variant {
        match self {
            ParameterVector::Perspective(_) => Variant::Perspective,
            ParameterVector::SplitDistortion(_) => Variant::SplitDistortion,
            ParameterVector::FieldDistortion(_) => Variant::FieldDistortion,
        }
    }
}
