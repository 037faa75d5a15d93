/// Lensview Core Library - point cloud projection and parameter dataflow
///
/// This library provides the stateless projection models, the point file
/// loader, and the debounced parameter bus that decides when a projection
/// is recomputed.

pub mod bus;
pub mod control;
pub mod error;
pub mod geometry;
pub mod loader;
pub mod params;
pub mod projection;
pub mod session;
pub mod transform;

// Re-export commonly used types
pub use bus::{ParameterBus, ParameterSnapshot, DEFAULT_QUIESCENCE};
pub use control::{Control, ControlEvent};
pub use error::{ControlError, LensviewError, LoadError, ProjectionError, Result};
pub use geometry::{PointCloud, ProjectionResult};
pub use loader::{load_points, parse_points, PointFormat};
pub use params::{ControlSpec, ParameterVector, Variant};
pub use projection::ProjectionEngine;
pub use session::Session;
pub use transform::Transform;
