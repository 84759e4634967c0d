// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transition hosts: the overlay visuals that fly snapshots between rectangles.
//!
//! A [`TransitionHost`] carries the primary element from its source rectangle
//! to its destination, crossfading the source snapshot away. A
//! [`SatelliteHost`] fades a coordinated element in along a path inferred
//! from the primary's motion. Neither host ever moves the real element; while
//! a host's stand-in is drawn, the element it stands in for is hidden and its
//! opacity is restored afterwards. A connected animation hides every element
//! of a run up front and restores them once all of its hosts have left the
//! overlay.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::fmt;

use kurbo::Rect;
use smallvec::SmallVec;
use understory_motion::geometry::inflate;
use understory_motion::{Curve, MotionCurve, MotionDirection, RelativeLocation, TransitionPolicy};

use crate::bounds::try_absolute_bounds;
use crate::overlay::{Layer, OverlayVisual};
use crate::platform::{Platform, Progress, Timeline};
use crate::snapshot::CapturedSnapshot;

/// Overlay visual for the primary element of a connected transition.
pub struct TransitionHost<P: Platform> {
    platform: Rc<P>,
    element: P::Element,
    source: CapturedSnapshot<P>,
    destination: CapturedSnapshot<P>,
    source_rect: Rect,
    destination_rect: Rect,
    direction: MotionDirection,
    curve: Curve,
    progress: Progress,
}

impl<P: Platform> TransitionHost<P> {
    /// Creates a host flying `source` from `source_rect` onto `element`,
    /// which currently occupies `destination_rect`.
    ///
    /// Captures a snapshot of `element` at its natural size.
    pub fn new(
        platform: &Rc<P>,
        source: CapturedSnapshot<P>,
        source_rect: Rect,
        element: &P::Element,
        destination_rect: Rect,
        curve: Curve,
    ) -> Self {
        let destination = CapturedSnapshot::capture(platform, element);
        Self {
            platform: Rc::clone(platform),
            element: element.clone(),
            source,
            destination,
            source_rect,
            destination_rect,
            direction: MotionDirection::between(source_rect, destination_rect),
            curve,
            progress: Progress::new(),
        }
    }

    /// Where the transition starts, in root-surface coordinates.
    #[must_use]
    pub fn source_rect(&self) -> Rect {
        self.source_rect
    }

    /// Where the transition ends, in root-surface coordinates.
    #[must_use]
    pub fn destination_rect(&self) -> Rect {
        self.destination_rect
    }

    /// General direction of travel.
    #[must_use]
    pub fn direction(&self) -> MotionDirection {
        self.direction
    }

    /// Curve the frame follows.
    #[must_use]
    pub fn curve(&self) -> Curve {
        self.curve
    }

    /// Rectangle drawn at the current progress.
    #[must_use]
    pub fn frame_rect(&self) -> Rect {
        self.curve
            .frame(self.source_rect, self.destination_rect, self.progress.get())
    }

    /// Drives progress from `0` to `1` while hiding the destination element.
    pub async fn run(&self, timeline: Timeline) {
        let mut hidden = HiddenElements::new(self.platform.as_ref());
        hidden.hide(&self.element);
        self.animate(timeline).await;
    }

    /// The element this host stands in for.
    #[must_use]
    pub fn element(&self) -> &P::Element {
        &self.element
    }

    /// Drives progress from `0` to `1`, leaving opacity to the caller.
    pub(crate) async fn animate(&self, timeline: Timeline) {
        self.platform.run_timeline(timeline, &self.progress).await;
    }
}

impl<P: Platform> OverlayVisual<P::Snapshot> for TransitionHost<P> {
    fn layers(&self) -> SmallVec<[Layer<'_, P::Snapshot>; 2]> {
        let rect = self.frame_rect();
        let progress = self.progress.get();
        let mut layers = SmallVec::new();
        if let Some(snapshot) = self.source.image() {
            layers.push(Layer {
                snapshot,
                rect,
                opacity: 1.0 - progress,
            });
        }
        if let Some(snapshot) = self.destination.image() {
            layers.push(Layer {
                snapshot,
                rect,
                opacity: 1.0,
            });
        }
        layers
    }

    fn progress(&self) -> f64 {
        self.progress.get()
    }
}

impl<P: Platform> fmt::Debug for TransitionHost<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransitionHost")
            .field("element", &self.element)
            .field("source_rect", &self.source_rect)
            .field("destination_rect", &self.destination_rect)
            .field("direction", &self.direction)
            .field("curve", &self.curve)
            .field("progress", &self.progress.get())
            .finish_non_exhaustive()
    }
}

/// Overlay visual for a coordinated element that fades in alongside the
/// primary transition.
pub struct SatelliteHost<P: Platform> {
    platform: Rc<P>,
    element: P::Element,
    destination: CapturedSnapshot<P>,
    location: RelativeLocation,
    source_rect: Rect,
    destination_rect: Rect,
    curve: Curve,
    progress: Progress,
}

impl<P: Platform> SatelliteHost<P> {
    /// Creates a host for `element`, inferring its start from the primary
    /// transition's rectangles.
    ///
    /// The curve is chosen by `policy` for the inferred pair of rectangles.
    /// Returns `None` when `element` is not attached to a surface yet, since
    /// there is nowhere to fly it to.
    pub fn new(
        platform: &Rc<P>,
        element: &P::Element,
        primary_source: Rect,
        primary_destination: Rect,
        policy: &impl TransitionPolicy,
        default_curve: Curve,
    ) -> Option<Self> {
        let bounds = try_absolute_bounds(platform.as_ref(), element)?;
        let (location, start) = infer_satellite_source(primary_source, primary_destination, bounds);
        let margin = platform.margin(element);
        let source_rect = inflate(start, margin);
        let destination_rect = inflate(bounds, margin);
        let destination = CapturedSnapshot::capture(platform, element);
        Some(Self {
            platform: Rc::clone(platform),
            element: element.clone(),
            destination,
            location,
            source_rect,
            destination_rect,
            curve: policy.curve(source_rect, destination_rect, default_curve),
            progress: Progress::new(),
        })
    }

    /// The coordinated element this host stands in for.
    #[must_use]
    pub fn element(&self) -> &P::Element {
        &self.element
    }

    /// Where the satellite sits relative to the primary destination.
    #[must_use]
    pub fn location(&self) -> RelativeLocation {
        self.location
    }

    /// Inferred start rectangle, in root-surface coordinates.
    #[must_use]
    pub fn source_rect(&self) -> Rect {
        self.source_rect
    }

    /// Final rectangle, in root-surface coordinates.
    #[must_use]
    pub fn destination_rect(&self) -> Rect {
        self.destination_rect
    }

    /// Rectangle drawn at the current progress.
    #[must_use]
    pub fn frame_rect(&self) -> Rect {
        self.curve
            .frame(self.source_rect, self.destination_rect, self.progress.get())
    }

    /// Drives progress from `0` to `1` while hiding the satellite element.
    pub async fn run(&self, timeline: Timeline) {
        let mut hidden = HiddenElements::new(self.platform.as_ref());
        hidden.hide(&self.element);
        self.animate(timeline).await;
    }

    /// Drives progress from `0` to `1`, leaving opacity to the caller.
    pub(crate) async fn animate(&self, timeline: Timeline) {
        self.platform.run_timeline(timeline, &self.progress).await;
    }
}

impl<P: Platform> OverlayVisual<P::Snapshot> for SatelliteHost<P> {
    fn layers(&self) -> SmallVec<[Layer<'_, P::Snapshot>; 2]> {
        let mut layers = SmallVec::new();
        if let Some(snapshot) = self.destination.image() {
            layers.push(Layer {
                snapshot,
                rect: self.frame_rect(),
                opacity: self.progress.get(),
            });
        }
        layers
    }

    fn progress(&self) -> f64 {
        self.progress.get()
    }
}

impl<P: Platform> fmt::Debug for SatelliteHost<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SatelliteHost")
            .field("element", &self.element)
            .field("location", &self.location)
            .field("source_rect", &self.source_rect)
            .field("destination_rect", &self.destination_rect)
            .field("curve", &self.curve)
            .field("progress", &self.progress.get())
            .finish_non_exhaustive()
    }
}

/// Infers where a satellite starts from the primary transition's motion.
///
/// The satellite keeps its offset from the primary: its start is the primary
/// source translated by the satellite's offset from the primary destination.
/// A satellite [`Below`] the primary destination keeps its gap to the
/// primary's bottom edge instead of its top edge, and one to the [`Right`]
/// keeps its gap to the right edge, so satellites of a resized primary stay
/// flush with it. Returns the classified location and the start rectangle,
/// which has the satellite's size.
///
/// [`Below`]: RelativeLocation::Below
/// [`Right`]: RelativeLocation::Right
#[must_use]
pub fn infer_satellite_source(
    primary_source: Rect,
    primary_destination: Rect,
    satellite: Rect,
) -> (RelativeLocation, Rect) {
    let location = RelativeLocation::classify(primary_destination, satellite);
    let mut origin =
        primary_source.origin() + (satellite.origin() - primary_destination.origin());
    match location {
        RelativeLocation::Below => {
            origin.y = primary_source.y1 + (satellite.y0 - primary_destination.y1);
        }
        RelativeLocation::Right => {
            origin.x = primary_source.x1 + (satellite.x0 - primary_destination.x1);
        }
        RelativeLocation::Above | RelativeLocation::Left => {}
    }
    (location, Rect::from_origin_size(origin, satellite.size()))
}

/// Hides elements while their overlay stand-ins are drawn.
///
/// Each distinct element's opacity is recorded the first time it is hidden;
/// dropping the guard restores those values, newest first.
pub(crate) struct HiddenElements<'a, P: Platform> {
    platform: &'a P,
    stored: Vec<(P::Element, f64)>,
}

impl<'a, P: Platform> HiddenElements<'a, P> {
    pub(crate) fn new(platform: &'a P) -> Self {
        Self {
            platform,
            stored: Vec::new(),
        }
    }

    /// Sets `element` to zero opacity. Hiding it again is a no-op.
    pub(crate) fn hide(&mut self, element: &P::Element) {
        if self.stored.iter().any(|(hidden, _)| hidden == element) {
            return;
        }
        self.stored.push((element.clone(), self.platform.opacity(element)));
        self.platform.set_opacity(element, 0.0);
    }
}

impl<P: Platform> Drop for HiddenElements<'_, P> {
    fn drop(&mut self) {
        for (element, opacity) in self.stored.drain(..).rev() {
            self.platform.set_opacity(&element, opacity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PRIMARY_SOURCE: Rect = Rect::new(10.0, 20.0, 110.0, 70.0);
    const PRIMARY_DESTINATION: Rect = Rect::new(200.0, 300.0, 400.0, 400.0);

    #[test]
    fn satellite_below_keeps_gap_to_bottom_edge() {
        // 20px under a destination that is twice as tall as the source.
        let satellite = Rect::new(210.0, 420.0, 260.0, 440.0);
        let (location, start) =
            infer_satellite_source(PRIMARY_SOURCE, PRIMARY_DESTINATION, satellite);
        assert_eq!(location, RelativeLocation::Below);
        assert_eq!(start, Rect::new(20.0, 90.0, 70.0, 110.0));
    }

    #[test]
    fn satellite_right_keeps_gap_to_right_edge() {
        let satellite = Rect::new(410.0, 320.0, 450.0, 380.0);
        let (location, start) =
            infer_satellite_source(PRIMARY_SOURCE, PRIMARY_DESTINATION, satellite);
        assert_eq!(location, RelativeLocation::Right);
        assert_eq!(start, Rect::new(120.0, 40.0, 160.0, 100.0));
    }

    #[test]
    fn satellite_above_and_left_keep_plain_offset() {
        let above = Rect::new(220.0, 250.0, 300.0, 290.0);
        let (location, start) = infer_satellite_source(PRIMARY_SOURCE, PRIMARY_DESTINATION, above);
        assert_eq!(location, RelativeLocation::Above);
        assert_eq!(start, Rect::new(30.0, -30.0, 110.0, 10.0));

        let left = Rect::new(100.0, 320.0, 180.0, 380.0);
        let (location, start) = infer_satellite_source(PRIMARY_SOURCE, PRIMARY_DESTINATION, left);
        assert_eq!(location, RelativeLocation::Left);
        assert_eq!(start, Rect::new(-90.0, 40.0, -10.0, 100.0));
    }

    #[test]
    fn unmoved_primary_leaves_satellite_in_place() {
        let satellite = Rect::new(210.0, 420.0, 260.0, 440.0);
        let (_, start) =
            infer_satellite_source(PRIMARY_DESTINATION, PRIMARY_DESTINATION, satellite);
        assert_eq!(start, satellite);
    }
}
