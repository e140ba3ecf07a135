//! Smooth camera pans over the map.
//!
//! A pan interpolates the map centre from its current position to a
//! target over a fixed number of steps, eased with a cosine ease-in-out
//! curve. Steps are spaced `max(10, duration / steps)` milliseconds apart
//! and are driven cooperatively from the UI loop: the app polls
//! [`CameraAnimator::step_due`] each frame and asks egui to repaint when
//! the next step falls due.
//!
//! The animator is a cancellable handle: [`CameraAnimator::start`]
//! replaces any in-flight animation, so at most one pan is ever active
//! and a mode switch or new focus request never leaves orphaned steps.

use std::time::{Duration, Instant};

use crate::constants::PAN_MIN_INTERVAL_MS;
use crate::types::GeoPoint;

/// One in-flight pan: endpoints, step bookkeeping, and the next deadline.
#[derive(Debug, Clone)]
struct CameraAnimation {
    start: GeoPoint,
    target: GeoPoint,
    steps: u32,
    current_step: u32,
    interval: Duration,
    next_due: Instant,
}

impl CameraAnimation {
    /// Eased position after `i` of `steps` steps.
    fn position_at(&self, i: u32) -> GeoPoint {
        let t = f64::from(i) / f64::from(self.steps);
        let ease = (1.0 - (std::f64::consts::PI * t).cos()) / 2.0;
        GeoPoint::new(
            self.start.lat + (self.target.lat - self.start.lat) * ease,
            self.start.lon + (self.target.lon - self.start.lon) * ease,
        )
    }
}

/// Handle owning the single active camera animation, if any.
#[derive(Debug, Default)]
pub struct CameraAnimator {
    active: Option<CameraAnimation>,
}

impl CameraAnimator {
    /// Creates an idle animator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Begins a pan from `from` to `to`, cancelling any animation already
    /// in flight, and returns the position to apply immediately.
    ///
    /// With `steps <= 1` the pan degenerates to a direct jump: the target
    /// is returned and nothing is scheduled. Otherwise the returned
    /// position is the first interpolation step and the remaining
    /// `steps - 1` are delivered through [`CameraAnimator::step_due`].
    pub fn start(
        &mut self,
        from: GeoPoint,
        to: GeoPoint,
        duration_ms: u64,
        steps: u32,
        now: Instant,
    ) -> GeoPoint {
        if steps <= 1 {
            self.active = None;
            return to;
        }

        let interval =
            Duration::from_millis((duration_ms / u64::from(steps)).max(PAN_MIN_INTERVAL_MS));
        let animation = CameraAnimation {
            start: from,
            target: to,
            steps,
            current_step: 1,
            interval,
            next_due: now + interval,
        };
        let first = animation.position_at(1);
        self.active = Some(animation);
        first
    }

    /// Advances the animation if its next step has fallen due, returning
    /// the new position to apply. Returns `None` while idle or between
    /// steps. The final step lands exactly on the target and destroys the
    /// animation.
    pub fn step_due(&mut self, now: Instant) -> Option<GeoPoint> {
        let animation = self.active.as_mut()?;
        if now < animation.next_due {
            return None;
        }

        animation.current_step += 1;
        let position = animation.position_at(animation.current_step);
        let finished = animation.current_step >= animation.steps;
        animation.next_due = now + animation.interval;
        if finished {
            self.active = None;
        }
        Some(position)
    }

    /// Whether a pan is currently in flight.
    pub fn is_animating(&self) -> bool {
        self.active.is_some()
    }

    /// Time until the next step falls due, for repaint scheduling.
    pub fn time_until_next_step(&self, now: Instant) -> Option<Duration> {
        self.active
            .as_ref()
            .map(|a| a.next_due.saturating_duration_since(now))
    }

    /// Drops any in-flight animation.
    pub fn cancel(&mut self) {
        self.active = None;
    }
}
