/// Current point cloud and parameters, passed explicitly to the engine
use std::path::Path;

use crate::bus::ParameterSnapshot;
use crate::error::{LoadError, ProjectionError};
use crate::geometry::{PointCloud, ProjectionResult};
use crate::loader::{load_points, parse_points};
use crate::params::{ParameterVector, Variant};
use crate::projection::ProjectionEngine;

/// Projection context for one model variant
#[derive(Debug, Clone)]
pub struct Session {
    variant: Variant,
    cloud: Option<PointCloud>,
    parameters: Option<ParameterVector>,
}

impl Session {
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            cloud: None,
            parameters: None,
        }
    }

    pub fn variant(&self) -> Variant {
        self.variant
    }

    pub fn cloud(&self) -> Option<&PointCloud> {
        self.cloud.as_ref()
    }

    pub fn parameters(&self) -> Option<&ParameterVector> {
        self.parameters.as_ref()
    }

    /// Load a point file; on failure the current cloud is kept
    pub fn load(&mut self, path: impl AsRef<Path>) -> Result<usize, LoadError> {
        let cloud = load_points(path, self.variant.point_format())?;
        Ok(self.replace_cloud(cloud))
    }

    /// Parse points from text; on failure the current cloud is kept
    pub fn load_str(&mut self, text: &str) -> Result<usize, LoadError> {
        let cloud = parse_points(text, self.variant.point_format())?;
        Ok(self.replace_cloud(cloud))
    }

    /// Swap in a fully built cloud and return its size
    pub fn replace_cloud(&mut self, cloud: PointCloud) -> usize {
        let len = cloud.len();
        self.cloud = Some(cloud);
        len
    }

    /// Accept a bus emission and recompute
    pub fn apply(
        &mut self,
        snapshot: &ParameterSnapshot,
    ) -> Result<Option<ProjectionResult>, ProjectionError> {
        self.parameters = Some(ParameterVector::from_values(
            self.variant,
            snapshot.values(),
        )?);
        self.recompute()
    }

    /// Project the current cloud, or `Ok(None)` while either input is missing
    pub fn recompute(&self) -> Result<Option<ProjectionResult>, ProjectionError> {
        let (Some(cloud), Some(parameters)) = (&self.cloud, &self.parameters) else {
            log::debug!("Skipping projection: no point cloud or parameters yet");
            return Ok(None);
        };

        let result = ProjectionEngine::project(cloud, parameters)?;
        log::debug!("Projected {} points with {}", result.len(), parameters.variant());
        Ok(Some(result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::{ParameterBus, DEFAULT_QUIESCENCE};
    use nalgebra::Point2;
    use std::time::Instant;

    fn defaults(variant: Variant) -> ParameterSnapshot {
        ParameterBus::for_variant(variant, DEFAULT_QUIESCENCE).snapshot()
    }

    #[test]
    fn test_empty_state_is_noop() {
        let mut session = Session::new(Variant::Perspective);
        assert_eq!(session.recompute(), Ok(None));
        assert_eq!(session.apply(&defaults(Variant::Perspective)), Ok(None));

        let mut session = Session::new(Variant::Perspective);
        session.load_str("1 0 0\n").unwrap();
        assert_eq!(session.recompute(), Ok(None));
    }

    #[test]
    fn test_apply_projects_loaded_cloud() {
        let mut session = Session::new(Variant::Perspective);
        session.load_str("0 0 0\n1 0 0\n").unwrap();
        let result = session
            .apply(&defaults(Variant::Perspective))
            .unwrap()
            .unwrap();
        assert_eq!(
            result.projected,
            vec![Point2::new(0.0, 0.0), Point2::new(5.0, 0.0)]
        );
        assert_eq!(
            session.parameters().map(ParameterVector::variant),
            Some(Variant::Perspective)
        );
    }

    #[test]
    fn test_failed_load_keeps_previous_cloud() {
        let mut session = Session::new(Variant::SplitDistortion);
        assert_eq!(session.load_str("1 2 3\n4 5 6\n").unwrap(), 2);
        assert!(session.load_str("1 2 3\n4 5\n").is_err());
        assert!(session.load("/nonexistent/cloud.txt").is_err());
        assert_eq!(session.cloud().map(PointCloud::len), Some(2));
    }

    #[test]
    fn test_wrong_snapshot_width_is_rejected() {
        let mut session = Session::new(Variant::FieldDistortion);
        let err = session.apply(&defaults(Variant::SplitDistortion)).unwrap_err();
        assert!(matches!(err, ProjectionError::ParameterCount { .. }));
        assert!(session.parameters().is_none());
    }

    #[test]
    fn test_bus_emission_drives_recompute() {
        let mut bus = ParameterBus::for_variant(Variant::Perspective, DEFAULT_QUIESCENCE);
        let mut session = Session::new(Variant::Perspective);
        session.load_str("1 0 0\n").unwrap();

        let t0 = Instant::now();
        bus.control_mut(5).unwrap().enter(150.0, t0);
        let snapshot = bus.poll(t0 + DEFAULT_QUIESCENCE).unwrap();
        let result = session.apply(&snapshot).unwrap().unwrap();
        // focal length clamped to 100, so 1 * 100 / 10
        assert_eq!(result.projected[0], Point2::new(10.0, 0.0));
    }
}
