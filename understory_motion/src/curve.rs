// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Motion curves: where an element sits between its start and end rectangles.

use kurbo::{ParamCurve, Point, QuadBez, Rect, Size};

use crate::geometry::{clamp_progress, lerp, perpendicular_right};

/// Maps a pair of rectangles and a progress value to a position.
///
/// Implementations must be pure and satisfy
/// `position(start, end, 0.0) == start.origin()` and
/// `position(start, end, 1.0) == end.origin()`. Progress outside `[0, 1]` is
/// clamped before use.
pub trait MotionCurve {
    /// Returns the top-left position of the moving element at `progress`.
    fn position(&self, start: Rect, end: Rect, progress: f64) -> Point;

    /// Returns the full frame rectangle at `progress`.
    ///
    /// The size is interpolated linearly between the two rectangles and the
    /// origin follows [`MotionCurve::position`].
    fn frame(&self, start: Rect, end: Rect, progress: f64) -> Rect {
        let t = clamp_progress(progress);
        let size = Size::new(
            lerp(start.width(), end.width(), t),
            lerp(start.height(), end.height(), t),
        );
        Rect::from_origin_size(self.position(start, end, t), size)
    }
}

/// The built-in motion curves.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Curve {
    /// Straight line between the two positions.
    #[default]
    Linear,
    /// Downward-sagging quadratic arc; see [`GravityArc`].
    GravityArc(GravityArc),
}

impl Curve {
    /// A gravity arc with no parallel offset.
    pub const GRAVITY: Self = Self::GravityArc(GravityArc::new());
}

impl MotionCurve for Curve {
    fn position(&self, start: Rect, end: Rect, progress: f64) -> Point {
        match self {
            Self::Linear => start.origin().lerp(end.origin(), clamp_progress(progress)),
            Self::GravityArc(arc) => arc.position(start, end, progress),
        }
    }
}

/// A quadratic arc that dips below both rectangles, like a thrown object.
///
/// The control point sits horizontally halfway between the two rectangles'
/// top-left corners (not their centers) and vertically at the lower of the
/// two bottom edges, pushed down by half the smaller height.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GravityArc {
    /// Constant perpendicular displacement applied along the whole path.
    pub parallel: f64,
}

impl GravityArc {
    /// Creates an arc without parallel offset.
    #[must_use]
    pub const fn new() -> Self {
        Self { parallel: 0.0 }
    }

    /// Creates an arc displaced by `parallel` perpendicular to its tangent.
    #[must_use]
    pub const fn with_parallel(parallel: f64) -> Self {
        Self { parallel }
    }

    /// Builds the concrete Bézier for a pair of rectangles.
    #[must_use]
    pub fn arc(&self, start: Rect, end: Rect) -> QuadraticArc {
        let control = Point::new(
            (end.x0 - start.x0) * 0.5 + start.x0,
            start.y1.max(end.y1) + start.height().min(end.height()) / 2.0,
        );
        QuadraticArc {
            start: start.origin(),
            control,
            end: end.origin(),
            parallel: self.parallel,
        }
    }
}

impl MotionCurve for GravityArc {
    fn position(&self, start: Rect, end: Rect, progress: f64) -> Point {
        self.arc(start, end).eval(clamp_progress(progress))
    }
}

/// A quadratic Bézier with an optional constant perpendicular offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct QuadraticArc {
    /// Point at `t = 0`.
    pub start: Point,
    /// Control point.
    pub control: Point,
    /// Point at `t = 1`.
    pub end: Point,
    /// Distance to displace each point to the right of the local tangent.
    pub parallel: f64,
}

impl QuadraticArc {
    /// Evaluates the arc at `t`, which is clamped into `[0, 1]`.
    #[must_use]
    pub fn eval(&self, t: f64) -> Point {
        let t = clamp_progress(t);
        let on_curve = QuadBez::new(self.start, self.control, self.end).eval(t);
        if self.parallel == 0.0 {
            return on_curve;
        }

        let tangent = if t == 0.0 {
            self.control - self.start
        } else {
            on_curve - self.start.lerp(self.control, t)
        };
        let len = tangent.hypot();
        if len == 0.0 || !len.is_finite() {
            return on_curve;
        }
        on_curve + perpendicular_right(tangent / len) * self.parallel
    }

    /// Approximates the arc length by summing chords of `precision`-sized steps.
    ///
    /// Intended for diagnostics. A non-positive or NaN `precision` yields `0`.
    #[must_use]
    pub fn length(&self, precision: f64) -> f64 {
        if precision.is_nan() || precision <= 0.0 {
            return 0.0;
        }
        let mut length = 0.0;
        let mut t = 0.0;
        let mut previous = self.eval(0.0);
        while t < 1.0 {
            t = (t + precision).min(1.0);
            let next = self.eval(t);
            length += (next - previous).hypot();
            previous = next;
        }
        length
    }
}
