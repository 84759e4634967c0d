// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Absolute bounds of elements in the coordinate space of their root surface.

use kurbo::{Point, Rect};
use understory_motion::geometry::inflate;

use crate::platform::Platform;

/// Resolves the element's bounds in root-surface coordinates.
///
/// The top-left and bottom-right corners of the element's local bounding
/// rectangle are translated separately, so any translation or scale between
/// the element and its root is honored. Returns `None` while the element is
/// not attached to a positioned root.
pub fn try_absolute_bounds<P: Platform>(platform: &P, element: &P::Element) -> Option<Rect> {
    let size = platform.render_size(element);
    let top_left = platform.translate_to_root(element, Point::ZERO)?;
    let bottom_right =
        platform.translate_to_root(element, Point::new(size.width, size.height))?;
    Some(Rect::from_points(top_left, bottom_right))
}

/// Like [`try_absolute_bounds`], but yields [`Rect::ZERO`] when unresolved.
///
/// An empty result means "not resolvable yet", not an error.
pub fn absolute_bounds<P: Platform>(platform: &P, element: &P::Element) -> Rect {
    try_absolute_bounds(platform, element).unwrap_or(Rect::ZERO)
}

/// Absolute bounds grown by the element's layout margin.
pub fn effective_bounds<P: Platform>(platform: &P, element: &P::Element) -> Rect {
    inflate(absolute_bounds(platform, element), platform.margin(element))
}
