//! Time driven values.
//!
//! Two models live here. [`Animated`] eases toward a target and settles;
//! [`LoopingAngle`] spins from 0 to 360 degrees forever. Both are sampled with
//! a caller supplied `now`, nothing here reads the clock.

use palette::{Mix, Srgba};
use std::time::{Duration, Instant};

pub const PROGRESS_DURATION: Duration = Duration::from_millis(700);
pub const COLOR_DURATION: Duration = Duration::from_millis(350);
pub const ROTATION_DURATION: Duration = Duration::from_millis(1500);

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Easing {
    Linear,
    #[default]
    FastOutSlowIn,
    LinearOutSlowIn,
    FastOutLinearIn,
    CubicBezier(f64, f64, f64, f64),
}

impl Easing {
    /// Maps linear progress in `[0, 1]` to eased progress in `[0, 1]`.
    pub fn apply(self, progress: f64) -> f64 {
        let x = progress.clamp(0.0, 1.0);
        match self {
            Self::Linear => x,
            Self::FastOutSlowIn => cubic_bezier_easing(x, 0.4, 0.0, 0.2, 1.0),
            Self::LinearOutSlowIn => cubic_bezier_easing(x, 0.0, 0.0, 0.2, 1.0),
            Self::FastOutLinearIn => cubic_bezier_easing(x, 0.4, 0.0, 1.0, 1.0),
            Self::CubicBezier(x1, y1, x2, y2) => cubic_bezier_easing(x, x1, y1, x2, y2),
        }
    }
}

fn cubic_bezier(t: f64, a: f64, b: f64, c: f64, d: f64) -> f64 {
    let u = 1.0 - t;
    (u * u * u * a) + (3.0 * u * u * t * b) + (3.0 * u * t * t * c) + (t * t * t * d)
}

fn cubic_bezier_easing(x: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }

    let mut lo = 0.0;
    let mut hi = 1.0;
    // bisect for the curve parameter whose x matches
    for _ in 0..48 {
        let mid = (lo + hi) * 0.5;
        if cubic_bezier(mid, 0.0, x1, x2, 1.0) < x {
            lo = mid;
        } else {
            hi = mid;
        }
    }

    cubic_bezier((lo + hi) * 0.5, 0.0, y1, y2, 1.0).clamp(0.0, 1.0)
}

pub trait Lerp: Clone + PartialEq {
    fn lerp(&self, other: &Self, t: f64) -> Self;
}

impl Lerp for f64 {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        self + (other - self) * t
    }
}

impl Lerp for Srgba<f64> {
    fn lerp(&self, other: &Self, t: f64) -> Self {
        self.mix(*other, t)
    }
}

/// Common read side of both animation models.
pub trait Animation {
    type Value;

    fn sample(&self, now: Instant) -> Self::Value;
}

/// A value that eases toward its latest target.
#[derive(Debug, Clone)]
pub struct Animated<T> {
    from: T,
    target: T,
    started: Instant,
    duration: Duration,
    easing: Easing,
}

pub type AnimatedScalar = Animated<f64>;
pub type AnimatedColor = Animated<Srgba<f64>>;

impl<T: Lerp> Animated<T> {
    /// Starts settled at `initial`.
    pub fn new(initial: T, duration: Duration, easing: Easing, now: Instant) -> Self {
        Self {
            from: initial.clone(),
            target: initial,
            started: now,
            duration,
            easing,
        }
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    /// Points the animation at `target`, continuing from wherever the value
    /// currently is. Re-sending the current target changes nothing.
    pub fn retarget(&mut self, target: T, now: Instant) {
        if target == self.target {
            return;
        }
        self.from = self.value_at(now);
        self.target = target;
        self.started = now;
    }

    pub fn is_settled(&self, now: Instant) -> bool {
        self.from == self.target || self.fraction(now) >= 1.0
    }

    fn fraction(&self, now: Instant) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.started);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    fn value_at(&self, now: Instant) -> T {
        let eased = self.easing.apply(self.fraction(now));
        if eased >= 1.0 {
            self.target.clone()
        } else {
            self.from.lerp(&self.target, eased)
        }
    }
}

impl<T: Lerp> Animation for Animated<T> {
    type Value = T;

    fn sample(&self, now: Instant) -> T {
        self.value_at(now)
    }
}

/// Degrees in `[0, 360)`, restarting from zero every `duration`.
#[derive(Debug, Clone, Copy)]
pub struct LoopingAngle {
    started: Instant,
    duration: Duration,
}

impl LoopingAngle {
    pub fn new(duration: Duration, now: Instant) -> Self {
        Self {
            started: now,
            duration,
        }
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Animation for LoopingAngle {
    type Value = f64;

    fn sample(&self, now: Instant) -> f64 {
        let duration = self.duration.as_nanos();
        if duration == 0 {
            return 0.0;
        }
        let elapsed = now.saturating_duration_since(self.started).as_nanos();
        let cycle = (elapsed % duration) as f64 / duration as f64;
        360.0 * cycle
    }
}
