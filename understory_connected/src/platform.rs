// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The narrow interface a UI framework implements to host connected transitions.

use alloc::rc::Rc;
use core::cell::Cell;
use core::fmt;
use core::future::Future;
use core::hash::Hash;
use core::time::Duration;

use kurbo::{Insets, Point, Rect, Size};
use understory_motion::Easing;
use understory_motion::geometry::clamp_progress;

use crate::overlay::OverlayLayer;

/// Services a UI framework provides to the transition engine.
///
/// All methods are called on the UI thread. Methods take `&self` because
/// several transition hosts drive their timelines concurrently; implementors
/// are expected to use interior mutability for their own bookkeeping.
///
/// The engine never lays out or renders anything itself. It asks the
/// platform to measure, arrange and rasterize elements, and it composites
/// the resulting snapshots through an [`OverlayLayer`] the platform draws
/// above its regular content.
pub trait Platform: 'static {
    /// Handle to an element of the UI tree.
    type Element: Clone + PartialEq + fmt::Debug + 'static;
    /// Rasterized, immutable image of an element.
    type Snapshot: 'static;
    /// Top-level window or surface an element is attached to.
    type Surface: Clone + Eq + Hash + fmt::Debug + 'static;

    /// Size of the element's local bounding rectangle.
    fn render_size(&self, element: &Self::Element) -> Size;

    /// Translates a point in the element's local space into the space of its
    /// root surface, or `None` when the element is not attached to a
    /// positioned root.
    fn translate_to_root(&self, element: &Self::Element, point: Point) -> Option<Point>;

    /// Layout margin around the element.
    fn margin(&self, element: &Self::Element) -> Insets;

    /// Surface the element is currently attached to, if any.
    fn surface(&self, element: &Self::Element) -> Option<Self::Surface>;

    /// Rectangle passed to the element's most recent arrange, if any.
    fn arranged_rect(&self, element: &Self::Element) -> Option<Rect>;

    /// Measures the element with unbounded available space and returns its
    /// desired size.
    fn measure(&self, element: &Self::Element) -> Size;

    /// Arranges the element into `rect`.
    fn arrange(&self, element: &Self::Element, rect: Rect);

    /// Marks the element's arrangement as stale so the next layout pass
    /// arranges it again.
    fn invalidate_arrange(&self, element: &Self::Element);

    /// Rasterizes the element at `size`.
    fn render_snapshot(&self, element: &Self::Element, size: Size) -> Self::Snapshot;

    /// Releases a snapshot produced by [`Platform::render_snapshot`].
    fn release_snapshot(&self, snapshot: Self::Snapshot);

    /// Current opacity of the element.
    fn opacity(&self, element: &Self::Element) -> f64;

    /// Sets the opacity of the element.
    fn set_opacity(&self, element: &Self::Element, opacity: f64);

    /// Overlay layer drawn above the content of `surface`, if the surface
    /// has one.
    fn overlay(&self, surface: &Self::Surface) -> Option<Rc<OverlayLayer<Self::Snapshot>>>;

    /// Runs a timeline, writing eased values to `progress` as time passes.
    ///
    /// The platform waits `timeline.delay`, then sweeps linear time from `0`
    /// to `1` over `timeline.duration`, storing `timeline.easing.ease(t)`
    /// into `progress`. The returned future resolves once `1` was written.
    fn run_timeline(&self, timeline: Timeline, progress: &Progress) -> impl Future<Output = ()>;

    /// Resolves once after the next layout pass completes.
    fn next_layout_pass(&self) -> impl Future<Output = ()>;
}

/// Timing of a single progress sweep.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Timeline {
    /// Length of the sweep.
    pub duration: Duration,
    /// Wait before the sweep starts.
    pub delay: Duration,
    /// Easing applied to linear time.
    pub easing: Easing,
}

/// Normalized animation progress shared between a host and its timeline.
///
/// Values are clamped into `[0, 1]` on write.
#[derive(Debug, Default)]
pub struct Progress(Cell<f64>);

impl Progress {
    /// Creates progress at `0`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current progress.
    #[must_use]
    pub fn get(&self) -> f64 {
        self.0.get()
    }

    /// Stores `value`, clamped into `[0, 1]`.
    pub fn set(&self, value: f64) {
        self.0.set(clamp_progress(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_is_clamped_on_write() {
        let progress = Progress::new();
        assert_eq!(progress.get(), 0.0);
        progress.set(0.4);
        assert_eq!(progress.get(), 0.4);
        progress.set(1.5);
        assert_eq!(progress.get(), 1.0);
        progress.set(-2.0);
        assert_eq!(progress.get(), 0.0);
        progress.set(f64::NAN);
        assert_eq!(progress.get(), 0.0);
    }
}
