// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Easing functions mapping linear time to eased progress.

use kurbo::{CubicBez, ParamCurve};

use crate::geometry::clamp_progress;

/// Number of bisection steps used to invert the x(t) of a cubic spline.
const SPLINE_ITERATIONS: usize = 48;

/// An easing function over `[0, 1]`.
///
/// Every variant maps `0` to exactly `0` and `1` to exactly `1`; inputs
/// outside the unit interval are clamped first.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Easing {
    /// Identity.
    #[default]
    Linear,
    /// CSS-style cubic Bézier timing function through `(0, 0)`,
    /// `(x1, y1)`, `(x2, y2)` and `(1, 1)`.
    ///
    /// The x coordinates are clamped into `[0, 1]` so the curve stays a
    /// function of time.
    CubicBezier {
        /// First control point, x.
        x1: f64,
        /// First control point, y.
        y1: f64,
        /// Second control point, x.
        x2: f64,
        /// Second control point, y.
        y2: f64,
    },
    /// Circular ease in, then out.
    CircularInOut,
    /// Quintic ease in, then out.
    QuinticInOut,
    /// Exponential ease in, then out.
    ExponentialInOut,
}

impl Easing {
    /// A fast-out, slow-in spline: `cubic-bezier(0.1, 0.9, 0.2, 1)`.
    pub const STANDARD: Self = Self::CubicBezier {
        x1: 0.1,
        y1: 0.9,
        x2: 0.2,
        y2: 1.0,
    };

    /// Applies the easing to linear time `t`.
    #[must_use]
    pub fn ease(&self, t: f64) -> f64 {
        let t = clamp_progress(t);
        if t == 0.0 || t == 1.0 {
            return t;
        }
        match *self {
            Self::Linear => t,
            Self::CubicBezier { x1, y1, x2, y2 } => spline(x1, y1, x2, y2, t),
            Self::CircularInOut => {
                if t < 0.5 {
                    0.5 * (1.0 - libm::sqrt(1.0 - 4.0 * t * t))
                } else {
                    0.5 * (libm::sqrt(-(2.0 * t - 3.0) * (2.0 * t - 1.0)) + 1.0)
                }
            }
            Self::QuinticInOut => {
                if t < 0.5 {
                    16.0 * libm::pow(t, 5.0)
                } else {
                    0.5 * libm::pow(2.0 * t - 2.0, 5.0) + 1.0
                }
            }
            Self::ExponentialInOut => {
                if t < 0.5 {
                    0.5 * libm::exp2(20.0 * t - 10.0)
                } else {
                    -0.5 * libm::exp2(-20.0 * t + 10.0) + 1.0
                }
            }
        }
    }
}

fn spline(x1: f64, y1: f64, x2: f64, y2: f64, t: f64) -> f64 {
    let curve = CubicBez::new(
        (0.0, 0.0),
        (x1.clamp(0.0, 1.0), y1),
        (x2.clamp(0.0, 1.0), y2),
        (1.0, 1.0),
    );
    // x(s) is monotone once the x control points are inside [0, 1].
    let (mut lo, mut hi) = (0.0, 1.0);
    for _ in 0..SPLINE_ITERATIONS {
        let mid = 0.5 * (lo + hi);
        if curve.eval(mid).x < t {
            lo = mid;
        } else {
            hi = mid;
        }
    }
    curve.eval(0.5 * (lo + hi)).y
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [Easing; 6] = [
        Easing::Linear,
        Easing::STANDARD,
        Easing::CubicBezier {
            x1: 0.42,
            y1: 0.0,
            x2: 0.58,
            y2: 1.0,
        },
        Easing::CircularInOut,
        Easing::QuinticInOut,
        Easing::ExponentialInOut,
    ];

    #[test]
    fn endpoints_are_exact() {
        for easing in ALL {
            assert_eq!(easing.ease(0.0), 0.0, "{easing:?}");
            assert_eq!(easing.ease(1.0), 1.0, "{easing:?}");
            assert_eq!(easing.ease(-1.0), 0.0, "{easing:?}");
            assert_eq!(easing.ease(2.0), 1.0, "{easing:?}");
        }
    }

    #[test]
    fn monotone_non_decreasing() {
        for easing in ALL {
            let mut previous = 0.0;
            for i in 1..=100 {
                let value = easing.ease(f64::from(i) / 100.0);
                assert!(value + 1e-9 >= previous, "{easing:?} at {i}");
                previous = value;
            }
        }
    }

    #[test]
    fn symmetric_in_out_curves_pass_through_half() {
        for easing in [
            Easing::Linear,
            Easing::CircularInOut,
            Easing::QuinticInOut,
            Easing::ExponentialInOut,
        ] {
            assert!((easing.ease(0.5) - 0.5).abs() < 1e-9, "{easing:?}");
        }
        let ease_in_out = Easing::CubicBezier {
            x1: 0.42,
            y1: 0.0,
            x2: 0.58,
            y2: 1.0,
        };
        assert!((ease_in_out.ease(0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn standard_spline_front_loads_progress() {
        assert!(Easing::STANDARD.ease(0.2) > 0.7);
        assert!(Easing::STANDARD.ease(0.5) < 1.0);
    }

    #[test]
    fn linear_spline_is_identity() {
        let linear = Easing::CubicBezier {
            x1: 0.0,
            y1: 0.0,
            x2: 1.0,
            y2: 1.0,
        };
        for i in 1..10 {
            let t = f64::from(i) / 10.0;
            assert!((linear.ease(t) - t).abs() < 1e-6);
        }
    }
}
