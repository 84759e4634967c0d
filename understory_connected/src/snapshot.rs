// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Owned snapshots and the capture cycle that produces them.

use alloc::rc::Rc;
use core::fmt;

use kurbo::{Point, Rect, Size};

use crate::platform::Platform;

/// A rendered image of an element, released back to the platform on drop.
///
/// Every snapshot the engine captures is owned by exactly one
/// `CapturedSnapshot`, so it is released exactly once whichever way the
/// owning transition ends.
pub struct CapturedSnapshot<P: Platform> {
    platform: Rc<P>,
    image: Option<P::Snapshot>,
    size: Size,
}

impl<P: Platform> CapturedSnapshot<P> {
    /// Captures `element` at its natural size.
    ///
    /// The element is measured with unbounded space, arranged at its desired
    /// size and rendered. Afterwards its previous arrangement is restored, or
    /// its arrangement is invalidated when it had none, so the live layout is
    /// left as it was.
    pub fn capture(platform: &Rc<P>, element: &P::Element) -> Self {
        let _restore = RestoreArrange {
            platform: platform.as_ref(),
            element,
            previous: platform.arranged_rect(element),
        };
        let size = platform.measure(element);
        platform.arrange(element, Rect::from_origin_size(Point::ZERO, size));
        let image = platform.render_snapshot(element, size);
        Self {
            platform: Rc::clone(platform),
            image: Some(image),
            size,
        }
    }

    /// The platform image.
    #[must_use]
    pub fn image(&self) -> Option<&P::Snapshot> {
        self.image.as_ref()
    }

    /// Size the element was rendered at.
    #[must_use]
    pub fn size(&self) -> Size {
        self.size
    }
}

impl<P: Platform> Drop for CapturedSnapshot<P> {
    fn drop(&mut self) {
        if let Some(image) = self.image.take() {
            self.platform.release_snapshot(image);
        }
    }
}

impl<P: Platform> fmt::Debug for CapturedSnapshot<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CapturedSnapshot")
            .field("size", &self.size)
            .field("live", &self.image.is_some())
            .finish_non_exhaustive()
    }
}

struct RestoreArrange<'a, P: Platform> {
    platform: &'a P,
    element: &'a P::Element,
    previous: Option<Rect>,
}

impl<P: Platform> Drop for RestoreArrange<'_, P> {
    fn drop(&mut self) {
        match self.previous {
            Some(rect) => self.platform.arrange(self.element, rect),
            None => self.platform.invalidate_arrange(self.element),
        }
    }
}
