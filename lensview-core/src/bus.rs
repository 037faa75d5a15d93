/// Debounced combine-latest over a set of controls
use std::sync::mpsc::{channel, Receiver};
use std::time::{Duration, Instant};

use crate::control::{Control, ControlEvent};
use crate::error::ControlError;
use crate::params::{ControlSpec, Variant};

/// Quiet period required before an emission
pub const DEFAULT_QUIESCENCE: Duration = Duration::from_millis(500);

/// Latest value of every control, in declared order
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterSnapshot {
    values: Vec<f64>,
}

impl ParameterSnapshot {
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Aggregates control changes into debounced parameter snapshots
///
/// Every control change cancels any pending emission and restarts the
/// quiescence window. When the window elapses without further changes the
/// bus emits one [`ParameterSnapshot`] holding the current value of every
/// control, read at fire time.
#[derive(Debug)]
pub struct ParameterBus {
    controls: Vec<Control>,
    events: Receiver<ControlEvent>,
    window: Duration,
    deadline: Option<Instant>,
}

impl ParameterBus {
    pub fn new(specs: &[ControlSpec], window: Duration) -> Self {
        let (tx, rx) = channel();
        let controls = specs
            .iter()
            .enumerate()
            .map(|(index, spec)| {
                let mut control = Control::new(index, *spec);
                control.attach(tx.clone());
                control
            })
            .collect();

        Self {
            controls,
            events: rx,
            window,
            deadline: None,
        }
    }

    pub fn for_variant(variant: Variant, window: Duration) -> Self {
        Self::new(variant.controls(), window)
    }

    /// Arm the first emission, carrying the seeded defaults
    pub fn start(&mut self, now: Instant) {
        self.deadline = Some(now + self.window);
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn control(&self, index: usize) -> Result<&Control, ControlError> {
        self.controls
            .get(index)
            .ok_or(ControlError::UnknownControl(index))
    }

    pub fn control_mut(&mut self, index: usize) -> Result<&mut Control, ControlError> {
        self.controls
            .get_mut(index)
            .ok_or(ControlError::UnknownControl(index))
    }

    /// Shorthand for `control_mut(index)?.set(value, at)`
    pub fn set(&mut self, index: usize, value: f64, at: Instant) -> Result<(), ControlError> {
        self.control_mut(index)?.set(value, at);
        Ok(())
    }

    /// Whether an emission is waiting for its window to elapse
    ///
    /// Changes made since the last `poll` are not counted until drained.
    pub fn is_pending(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left before the pending emission fires
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(now))
    }

    /// Current values, without touching the pending state
    pub fn snapshot(&self) -> ParameterSnapshot {
        ParameterSnapshot {
            values: self.controls.iter().map(Control::value).collect(),
        }
    }

    /// Drain queued changes and emit if the window has elapsed
    pub fn poll(&mut self, now: Instant) -> Option<ParameterSnapshot> {
        while let Ok(event) = self.events.try_recv() {
            if self.deadline.is_some() {
                log::trace!("Pending emission superseded by control {}", event.control);
            }
            self.deadline = Some(event.at + self.window);
        }

        match self.deadline {
            Some(deadline) if now >= deadline => {
                self.deadline = None;
                let snapshot = self.snapshot();
                log::debug!("Emitting parameters {:?}", snapshot.values());
                Some(snapshot)
            }
            _ => None,
        }
    }
}
