use std::io::Write;
use std::time::{Duration, Instant};

use approx::assert_relative_eq;
use lensview_core::{
    LoadError, ParameterBus, ProjectionError, Session, Variant, DEFAULT_QUIESCENCE,
};
use tempfile::NamedTempFile;

fn point_file(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for row in rows {
        writeln!(file, "{row}").unwrap();
    }
    file
}

#[test]
fn edits_settle_into_one_recompute() {
    let file = point_file(&["0 0 0", "1 0 0", "0 1 0"]);
    let mut session = Session::new(Variant::Perspective);
    assert_eq!(session.load(file.path()).unwrap(), 3);

    let mut bus = ParameterBus::for_variant(Variant::Perspective, DEFAULT_QUIESCENCE);
    let t0 = Instant::now();
    bus.start(t0);

    let mut results = Vec::new();
    // Drag the rotation control in small steps, faster than the window.
    for step in 0..10u64 {
        let at = t0 + Duration::from_millis(40 * step);
        bus.control_mut(0).unwrap().nudge(25, 100.0, at);
        if let Some(snapshot) = bus.poll(at) {
            results.push(session.apply(&snapshot).unwrap());
        }
    }
    assert!(results.is_empty());

    let settle = t0 + Duration::from_millis(40 * 9) + DEFAULT_QUIESCENCE;
    let snapshot = bus.poll(settle).unwrap();
    assert_eq!(snapshot.values()[0], 360.0);

    let result = session.apply(&snapshot).unwrap().unwrap();
    assert_eq!(result.len(), 3);
    // A full turn brings (1, 0, 0) back to (5, 0).
    assert_relative_eq!(result.projected[1].x, 5.0, epsilon = 1e-9);
    assert_relative_eq!(result.projected[1].y, 0.0, epsilon = 1e-9);
}

#[test]
fn planar_file_for_perspective_model() {
    let file = point_file(&["2 0", "0 -2"]);
    let mut session = Session::new(Variant::Perspective);
    session.load(file.path()).unwrap();

    let bus = ParameterBus::for_variant(Variant::Perspective, DEFAULT_QUIESCENCE);
    let result = session.apply(&bus.snapshot()).unwrap().unwrap();
    // z = 1 after promotion, so the divisor is 11.
    assert_relative_eq!(result.projected[0].x, 2.0 * 50.0 / 11.0, epsilon = 1e-12);
    assert_relative_eq!(result.projected[1].y, -2.0 * 50.0 / 11.0, epsilon = 1e-12);
}

#[test]
fn camera_models_reject_planar_rows() {
    let file = point_file(&["2 0", "0 -2"]);
    for variant in [Variant::SplitDistortion, Variant::FieldDistortion] {
        let mut session = Session::new(variant);
        let err = session.load(file.path()).unwrap_err();
        assert!(matches!(err, LoadError::Format { line: 1, .. }));
        assert!(session.cloud().is_none());
    }
}

#[test]
fn camera_models_report_both_projections() {
    let file = point_file(&["1 2 0", "-1 0.5 1"]);
    for variant in [Variant::SplitDistortion, Variant::FieldDistortion] {
        let mut session = Session::new(variant);
        session.load(file.path()).unwrap();

        let mut bus = ParameterBus::for_variant(variant, DEFAULT_QUIESCENCE);
        let t0 = Instant::now();
        // K1 sits at index 7 for the split model and 5 for the field model.
        let k1 = if variant == Variant::SplitDistortion { 7 } else { 5 };
        bus.control_mut(k1).unwrap().enter_text("0.5", t0).unwrap();
        let snapshot = bus.poll(t0 + DEFAULT_QUIESCENCE).unwrap();

        let result = session.apply(&snapshot).unwrap().unwrap();
        let reference = result.reference.as_ref().unwrap();
        assert_eq!(reference.len(), 2);
        assert_ne!(&result.projected, reference);
    }
}

#[test]
fn overflow_keeps_session_interactive() {
    let mut session = Session::new(Variant::Perspective);
    session.load_str("0 0 -10\n").unwrap();

    let bus = ParameterBus::for_variant(Variant::Perspective, DEFAULT_QUIESCENCE);
    let err = session.apply(&bus.snapshot()).unwrap_err();
    assert!(matches!(err, ProjectionError::NumericOverflow { index: 0, .. }));

    session.load_str("0 0 5\n").unwrap();
    assert!(session.recompute().unwrap().is_some());
}
