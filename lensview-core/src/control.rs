/// Continuous parameter controls
use std::sync::mpsc::Sender;
use std::time::Instant;

use crate::error::ControlError;
use crate::params::ControlSpec;

/// A value change published by one control
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlEvent {
    /// Position of the control in its parameter vector.
    pub control: usize,
    pub value: f64,
    pub at: Instant,
}

/// Single-slot mailbox for one parameter
///
/// Holds the latest value, seeded with the declared default, and pushes a
/// [`ControlEvent`] to every subscriber when the value changes.
#[derive(Debug)]
pub struct Control {
    index: usize,
    spec: ControlSpec,
    value: f64,
    subscribers: Vec<Sender<ControlEvent>>,
}

impl Control {
    pub fn new(index: usize, spec: ControlSpec) -> Self {
        Self {
            index,
            spec,
            value: spec.default,
            subscribers: Vec::new(),
        }
    }

    pub fn spec(&self) -> &ControlSpec {
        &self.spec
    }

    pub fn label(&self) -> &'static str {
        self.spec.label
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub(crate) fn attach(&mut self, sender: Sender<ControlEvent>) {
        self.subscribers.push(sender);
    }

    /// Store `value` as-is and notify subscribers
    pub fn set(&mut self, value: f64, at: Instant) {
        self.value = value;
        let event = ControlEvent {
            control: self.index,
            value,
            at,
        };
        self.subscribers.retain(|tx| tx.send(event).is_ok());
    }

    /// Manual entry: clamp to the declared range, then store
    pub fn enter(&mut self, value: f64, at: Instant) -> f64 {
        let value = self.spec.clamp(value);
        self.set(value, at);
        value
    }

    /// Parse typed text and enter it; rejected text leaves the value alone
    pub fn enter_text(&mut self, text: &str, at: Instant) -> Result<f64, ControlError> {
        let parsed = text
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| ControlError::InvalidEntry {
                label: self.spec.label,
                text: text.to_string(),
            })?;
        Ok(self.enter(parsed, at))
    }

    /// Move like a slider by `steps` increments of `span / divisions`
    pub fn nudge(&mut self, steps: i32, divisions: f64, at: Instant) -> f64 {
        let step = self.spec.span() / divisions;
        let value = self.spec.clamp(self.value + f64::from(steps) * step);
        self.set(value, at);
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc::channel;

    fn z_near() -> Control {
        Control::new(1, ControlSpec::new("Z Near", 1.0, 100.0, 10.0))
    }

    #[test]
    fn test_seeded_with_default() {
        assert_eq!(z_near().value(), 10.0);
    }

    #[test]
    fn test_entry_is_clamped() {
        let mut control = z_near();
        let now = Instant::now();
        assert_eq!(control.enter(150.0, now), 100.0);
        assert_eq!(control.value(), 100.0);
        assert_eq!(control.enter(-7.0, now), 1.0);
    }

    #[test]
    fn test_set_is_not_clamped() {
        let mut control = z_near();
        control.set(1e6, Instant::now());
        assert_eq!(control.value(), 1e6);
    }

    #[test]
    fn test_subscribers_receive_changes() {
        let mut control = z_near();
        let (tx, rx) = channel();
        control.attach(tx);
        let now = Instant::now();
        control.set(42.0, now);
        assert_eq!(
            rx.try_recv().unwrap(),
            ControlEvent {
                control: 1,
                value: 42.0,
                at: now
            }
        );
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let mut control = z_near();
        let (tx, rx) = channel();
        control.attach(tx);
        drop(rx);
        control.set(5.0, Instant::now());
        assert!(control.subscribers.is_empty());
    }

    #[test]
    fn test_invalid_text_is_rejected() {
        let mut control = z_near();
        let err = control.enter_text("ten", Instant::now()).unwrap_err();
        assert_eq!(
            err,
            ControlError::InvalidEntry {
                label: "Z Near",
                text: "ten".to_string()
            }
        );
        assert!(control.enter_text("NaN", Instant::now()).is_err());
        assert_eq!(control.value(), 10.0);
        assert_eq!(control.enter_text(" 12.5 ", Instant::now()), Ok(12.5));
    }

    #[test]
    fn test_nudge_steps_and_clamps() {
        let mut control = Control::new(0, ControlSpec::new("dX", -100.0, 100.0, 0.0));
        let now = Instant::now();
        assert_eq!(control.nudge(3, 100.0, now), 6.0);
        assert_eq!(control.nudge(-1000, 100.0, now), -100.0);
    }
}
