// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Small geometry helpers shared by curves, classifiers and policies.

use kurbo::{Insets, Point, Rect, Vec2};

/// Expands `rect` outward by the per-edge amounts in `margin`.
///
/// Negative insets shrink the corresponding edge.
#[must_use]
pub fn inflate(rect: Rect, margin: Insets) -> Rect {
    Rect::new(
        rect.x0 - margin.x0,
        rect.y0 - margin.y0,
        rect.x1 + margin.x1,
        rect.y1 + margin.y1,
    )
}

/// Rotates `v` a quarter turn so that `(x, y)` becomes `(y, -x)`.
#[must_use]
pub fn perpendicular_right(v: Vec2) -> Vec2 {
    Vec2::new(v.y, -v.x)
}

/// Clamps `progress` into `[0, 1]`. NaN is treated as `0`.
#[must_use]
pub fn clamp_progress(progress: f64) -> f64 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}

/// Euclidean distance between the top-left corners of two rectangles.
#[must_use]
pub fn top_left_distance(start: Rect, end: Rect) -> f64 {
    (start.origin() - end.origin()).hypot()
}

/// Linear interpolation between two scalars.
#[must_use]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    (to - from) * t + from
}

/// Returns `true` when two points are equal up to a small absolute tolerance.
#[must_use]
pub fn nearly_equal(a: Point, b: Point) -> bool {
    const TOLERANCE: f64 = 1e-9;
    (a.x - b.x).abs() < TOLERANCE && (a.y - b.y).abs() < TOLERANCE
}
