// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timing policies: pick easing, duration and curve for a pair of rectangles.

use core::time::Duration;

use kurbo::Rect;

use crate::curve::Curve;
use crate::easing::Easing;
use crate::geometry::top_left_distance;

/// Shortest duration the [`Policy::Direct`] policy produces, in milliseconds.
pub const DIRECT_MIN_MILLIS: f64 = 150.0;
/// Shortest duration the [`Policy::Gravity`] policy produces, in milliseconds.
pub const GRAVITY_MIN_MILLIS: f64 = 170.0;
/// Longest duration the [`Policy::Gravity`] policy produces, in milliseconds.
pub const GRAVITY_MAX_MILLIS: f64 = 400.0;

/// Easing, duration and curve for one transition run.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionParams {
    /// Easing applied to the progress timeline.
    pub easing: Easing,
    /// Length of the progress timeline.
    pub duration: Duration,
    /// Path followed by the moving element.
    pub curve: Curve,
}

/// Chooses transition parameters from the start and end rectangles.
///
/// Each method receives the caller's default and may return it unchanged.
pub trait TransitionPolicy {
    /// Chooses the easing function.
    fn easing(&self, start: Rect, end: Rect, default: Easing) -> Easing;

    /// Chooses the duration.
    fn duration(&self, start: Rect, end: Rect, default: Duration) -> Duration;

    /// Chooses the motion curve.
    fn curve(&self, start: Rect, end: Rect, default: Curve) -> Curve;

    /// Resolves all three parameters at once.
    fn resolve(&self, start: Rect, end: Rect, defaults: TransitionParams) -> TransitionParams {
        TransitionParams {
            easing: self.easing(start, end, defaults.easing),
            duration: self.duration(start, end, defaults.duration),
            curve: self.curve(start, end, defaults.curve),
        }
    }
}

/// The built-in policies.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Policy {
    /// Returns every default unchanged.
    Basic,
    /// Straight, snappy motion.
    ///
    /// Duration is the top-left travel distance in milliseconds, but at
    /// least [`DIRECT_MIN_MILLIS`]; easing is [`Easing::STANDARD`]; the curve
    /// is the caller's default.
    Direct,
    /// A thrown arc.
    ///
    /// Duration is the top-left travel distance plus half the smaller height,
    /// in milliseconds, clamped to
    /// [`GRAVITY_MIN_MILLIS`]..=[`GRAVITY_MAX_MILLIS`]; easing is linear since
    /// the arc itself reads as deceleration; the curve is [`Curve::GRAVITY`].
    #[default]
    Gravity,
}

impl TransitionPolicy for Policy {
    fn easing(&self, _start: Rect, _end: Rect, default: Easing) -> Easing {
        match self {
            Self::Basic => default,
            Self::Direct => Easing::STANDARD,
            Self::Gravity => Easing::Linear,
        }
    }

    fn duration(&self, start: Rect, end: Rect, default: Duration) -> Duration {
        match self {
            Self::Basic => default,
            Self::Direct => millis(top_left_distance(start, end).max(DIRECT_MIN_MILLIS)),
            Self::Gravity => {
                let length =
                    top_left_distance(start, end) + start.height().min(end.height()) / 2.0;
                millis(length.clamp(GRAVITY_MIN_MILLIS, GRAVITY_MAX_MILLIS))
            }
        }
    }

    fn curve(&self, _start: Rect, _end: Rect, default: Curve) -> Curve {
        match self {
            Self::Basic | Self::Direct => default,
            Self::Gravity => Curve::GRAVITY,
        }
    }
}

fn millis(ms: f64) -> Duration {
    if !ms.is_finite() || ms <= 0.0 {
        return Duration::ZERO;
    }
    #[expect(
        clippy::cast_possible_truncation,
        reason = "policy durations are at most a few seconds"
    )]
    let nanos = libm::round(ms * 1_000_000.0) as u64;
    Duration::from_nanos(nanos)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: f64, y: f64, w: f64, h: f64) -> Rect {
        Rect::from_origin_size((x, y), (w, h))
    }

    fn defaults() -> TransitionParams {
        TransitionParams {
            easing: Easing::CircularInOut,
            duration: Duration::from_millis(1234),
            curve: Curve::Linear,
        }
    }

    #[test]
    fn basic_passes_defaults_through() {
        let start = rect(0.0, 0.0, 10.0, 10.0);
        let end = rect(500.0, 500.0, 10.0, 10.0);
        assert_eq!(Policy::Basic.resolve(start, end, defaults()), defaults());
    }

    #[test]
    fn direct_duration_has_a_floor() {
        let start = rect(0.0, 0.0, 10.0, 10.0);
        let near = rect(30.0, 40.0, 10.0, 10.0);
        let far = rect(300.0, 400.0, 10.0, 10.0);
        let params = Policy::Direct.resolve(start, near, defaults());
        assert_eq!(params.duration, Duration::from_millis(150));
        assert_eq!(params.easing, Easing::STANDARD);
        assert_eq!(params.curve, Curve::Linear);
        assert_eq!(
            Policy::Direct.duration(start, far, Duration::ZERO),
            Duration::from_millis(500)
        );
    }

    #[test]
    fn gravity_duration_is_clamped() {
        let start = rect(0.0, 0.0, 10.0, 20.0);
        let params = Policy::Gravity.resolve(start, start, defaults());
        assert_eq!(params.duration, Duration::from_millis(170));
        assert_eq!(params.easing, Easing::Linear);
        assert_eq!(params.curve, Curve::GRAVITY);

        // 200 of travel plus half of the smaller height (10).
        let mid = rect(120.0, 160.0, 10.0, 40.0);
        assert_eq!(
            Policy::Gravity.duration(start, mid, Duration::ZERO),
            Duration::from_millis(210)
        );

        let far = rect(3000.0, 4000.0, 10.0, 20.0);
        assert_eq!(
            Policy::Gravity.duration(start, far, Duration::ZERO),
            Duration::from_millis(400)
        );
    }

    #[test]
    fn duration_never_decreases_with_distance() {
        let start = rect(0.0, 0.0, 40.0, 40.0);
        for policy in [Policy::Direct, Policy::Gravity] {
            let mut previous = Duration::ZERO;
            for step in 0..200 {
                let d = f64::from(step) * 5.0;
                let end = rect(d * 0.6, d * 0.8, 40.0, 40.0);
                let duration = policy.duration(start, end, Duration::ZERO);
                assert!(duration >= previous, "{policy:?} at {d}");
                previous = duration;
            }
        }
        let gravity = |x, y| Policy::Gravity.duration(start, rect(x, y, 40.0, 40.0), Duration::ZERO);
        assert_eq!(gravity(600.0, 800.0), gravity(6000.0, 8000.0));
    }

    #[test]
    fn policies_are_selectable_through_the_trait() {
        let policies: [&dyn TransitionPolicy; 3] =
            [&Policy::Basic, &Policy::Direct, &Policy::Gravity];
        let start = rect(0.0, 0.0, 10.0, 10.0);
        for policy in policies {
            let params = policy.resolve(start, start, defaults());
            assert!(params.duration >= Duration::from_millis(150));
        }
    }
}
