//! Linear value ramps advanced by the frame clock.
//!
//! A ramp moves one value from `from` to `to` over a fixed duration. Instead
//! of calling back into its owner, [`TweenDriver::advance`] returns a list of
//! [`RampEvent`]s which the owner applies. A ramp emits strictly increasing
//! elapsed-time ticks, then exactly one `Complete` after a tick carrying the
//! exact end value.
//!
//! ```ignore
//! let mut tweens = TweenDriver::new();
//! tweens.schedule_ramp(id, 0.0, 1.0, Duration::from_secs(3));
//! for event in tweens.advance(clock.tick()) {
//!     match event {
//!         RampEvent::Tick { target, value } => set_progress(target, value),
//!         RampEvent::Complete { target } => dispose(target),
//!     }
//! }
//! ```

use std::time::Duration;

use crate::scene::DrawableId;

/// Handle to a scheduled ramp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RampId(u64);

/// Something that happened to a ramp during [`TweenDriver::advance`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RampEvent {
    /// The ramped value changed.
    Tick {
        /// Drawable the ramp drives.
        target: DrawableId,
        /// New value.
        value: f32,
    },
    /// The ramp reached its end value and has been removed.
    Complete {
        /// Drawable the ramp drove.
        target: DrawableId,
    },
}

/// One in-flight ramp.
#[derive(Debug, Clone)]
struct Ramp {
    id: RampId,
    target: DrawableId,
    from: f32,
    to: f32,
    duration: Duration,
    elapsed: Duration,
}

impl Ramp {
    /// Fraction of the duration elapsed, in `[0, 1]`.
    fn progress(&self) -> f32 {
        if self.duration.is_zero() || self.elapsed >= self.duration {
            return 1.0;
        }
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()) as f32
    }

    fn value(&self) -> f32 {
        let t = self.progress();
        if t >= 1.0 {
            // Land exactly on the end value, no lerp rounding
            self.to
        } else {
            self.from + (self.to - self.from) * t
        }
    }

    fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }
}

/// Owns every running ramp.
#[derive(Debug, Default)]
pub struct TweenDriver {
    ramps: Vec<Ramp>,
    next_id: u64,
}

impl TweenDriver {
    /// Create a driver with no ramps.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start ramping the value owned by `target` from `from` to `to`.
    ///
    /// The value is `from` until the first [`advance`](Self::advance).
    pub fn schedule_ramp(&mut self, target: DrawableId, from: f32, to: f32, duration: Duration) -> RampId {
        let id = RampId(self.next_id);
        self.next_id += 1;
        self.ramps.push(Ramp {
            id,
            target,
            from,
            to,
            duration,
            elapsed: Duration::ZERO,
        });
        id
    }

    /// Drop a ramp without completing it. Returns `false` if it was not running.
    pub fn cancel(&mut self, id: RampId) -> bool {
        let before = self.ramps.len();
        self.ramps.retain(|r| r.id != id);
        self.ramps.len() != before
    }

    /// Number of running ramps.
    pub fn len(&self) -> usize {
        self.ramps.len()
    }

    /// Whether no ramps are running.
    pub fn is_empty(&self) -> bool {
        self.ramps.is_empty()
    }

    /// Advance all ramps by `dt`.
    ///
    /// A zero `dt` produces no ticks, except that zero-duration ramps still
    /// complete. Finished ramps emit their final tick followed by `Complete`
    /// and are removed.
    pub fn advance(&mut self, dt: Duration) -> Vec<RampEvent> {
        let mut events = Vec::new();

        for ramp in &mut self.ramps {
            let before = ramp.elapsed;
            ramp.elapsed = ramp.elapsed.saturating_add(dt).min(ramp.duration);
            if ramp.elapsed != before || ramp.is_done() {
                events.push(RampEvent::Tick {
                    target: ramp.target,
                    value: ramp.value(),
                });
            }
            if ramp.is_done() {
                events.push(RampEvent::Complete { target: ramp.target });
            }
        }

        self.ramps.retain(|r| !r.is_done());
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::Scene;
    use glam::Vec3;

    fn target() -> DrawableId {
        Scene::new().attach(Vec3::ZERO)
    }

    fn ticks(events: &[RampEvent]) -> Vec<f32> {
        events
            .iter()
            .filter_map(|e| match e {
                RampEvent::Tick { value, .. } => Some(*value),
                RampEvent::Complete { .. } => None,
            })
            .collect()
    }

    #[test]
    fn test_ramp_is_linear() {
        let mut tweens = TweenDriver::new();
        tweens.schedule_ramp(target(), 0.0, 1.0, Duration::from_secs(2));
        let values = ticks(&tweens.advance(Duration::from_millis(500)));
        assert_eq!(values.len(), 1);
        assert!((values[0] - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_ramp_completes_exactly_once_on_end_value() {
        let mut tweens = TweenDriver::new();
        let t = target();
        let id = tweens.schedule_ramp(t, 0.0, 1.0, Duration::from_secs(3));

        let mut all = Vec::new();
        for _ in 0..40 {
            all.extend(tweens.advance(Duration::from_millis(100)));
        }

        let completes = all
            .iter()
            .filter(|e| matches!(e, RampEvent::Complete { .. }))
            .count();
        assert_eq!(completes, 1);

        let values = ticks(&all);
        assert_eq!(values.len(), 30);
        assert_eq!(*values.last().unwrap(), 1.0);
        assert!(values.windows(2).all(|w| w[1] > w[0]));
        // Complete directly follows the final tick
        assert_eq!(all.last(), Some(&RampEvent::Complete { target: t }));
        assert!(!tweens.cancel(id));
        assert!(tweens.is_empty());
    }

    #[test]
    fn test_overshoot_clamps_to_end() {
        let mut tweens = TweenDriver::new();
        tweens.schedule_ramp(target(), 2.0, 4.0, Duration::from_secs(1));
        let events = tweens.advance(Duration::from_secs(10));
        assert_eq!(ticks(&events), vec![4.0]);
        assert!(matches!(events[1], RampEvent::Complete { .. }));
    }

    #[test]
    fn test_zero_dt_is_silent() {
        let mut tweens = TweenDriver::new();
        tweens.schedule_ramp(target(), 0.0, 1.0, Duration::from_secs(1));
        assert!(tweens.advance(Duration::ZERO).is_empty());
        assert_eq!(tweens.len(), 1);
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        let mut tweens = TweenDriver::new();
        tweens.schedule_ramp(target(), 0.0, 1.0, Duration::ZERO);
        let events = tweens.advance(Duration::ZERO);
        assert_eq!(ticks(&events), vec![1.0]);
        assert!(tweens.is_empty());
    }

    #[test]
    fn test_cancel() {
        let mut tweens = TweenDriver::new();
        let t = target();
        let a = tweens.schedule_ramp(t, 0.0, 1.0, Duration::from_secs(1));
        let b = tweens.schedule_ramp(t, 0.0, 1.0, Duration::from_secs(1));
        assert!(tweens.cancel(a));
        assert!(!tweens.cancel(a));
        assert_eq!(tweens.len(), 1);
        assert!(tweens.cancel(b));
        assert!(tweens.advance(Duration::from_secs(5)).is_empty());
    }
}
