// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Placement and direction classifiers for pairs of rectangles.

use core::f64::consts::PI;

use kurbo::Rect;

use crate::geometry::nearly_equal;

/// Which side of a reference rectangle a subject rectangle sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RelativeLocation {
    /// Subject is above the reference.
    Above,
    /// Subject is below the reference.
    Below,
    /// Subject is left of the reference.
    Left,
    /// Subject is right of the reference.
    Right,
}

impl RelativeLocation {
    /// Location reported when the two centers coincide.
    pub const FALLBACK: Self = Self::Below;

    /// Classifies `subject` relative to `reference`.
    ///
    /// The angle from the reference center to the subject center is compared
    /// against the angles of the reference's diagonals, which split the plane
    /// into four sectors: Right, Below, Left and Above in clockwise (Y-down)
    /// order.
    ///
    /// An angle lying exactly on a diagonal belongs to the sector that begins
    /// at that diagonal when sweeping clockwise, so the bottom-right diagonal
    /// is Below, the bottom-left one is Left, the top-left one is Above and
    /// the top-right one is Right.
    ///
    /// Coinciding centers have no direction and yield [`Self::FALLBACK`];
    /// use [`Self::try_classify`] to observe that case.
    ///
    /// ```rust
    /// use kurbo::Rect;
    /// use understory_motion::RelativeLocation;
    ///
    /// let reference = Rect::from_origin_size((50.0, 50.0), (150.0, 100.0));
    /// let subject = Rect::from_origin_size((374.0, 70.0), (60.0, 60.0));
    /// assert_eq!(RelativeLocation::classify(reference, subject), RelativeLocation::Right);
    /// assert_eq!(RelativeLocation::classify(subject, reference), RelativeLocation::Left);
    /// ```
    #[must_use]
    pub fn classify(reference: Rect, subject: Rect) -> Self {
        Self::try_classify(reference, subject).unwrap_or(Self::FALLBACK)
    }

    /// Like [`Self::classify`], but returns `None` when the centers coincide.
    #[must_use]
    pub fn try_classify(reference: Rect, subject: Rect) -> Option<Self> {
        let offset = subject.center() - reference.center();
        if offset.x == 0.0 && offset.y == 0.0 {
            return None;
        }

        let down_right = reference.size().to_vec2().atan2();
        let up_right = -down_right;
        let down_left = PI - down_right;
        let up_left = -down_left;

        let angle = offset.atan2();
        let location = if up_right <= angle && angle < down_right {
            Self::Right
        } else if down_right <= angle && angle < down_left {
            Self::Below
        } else if up_left <= angle && angle < up_right {
            Self::Above
        } else {
            Self::Left
        };
        Some(location)
    }

    /// Returns the location on the opposite side.
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Above => Self::Below,
            Self::Below => Self::Above,
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

bitflags::bitflags! {
    /// Coarse direction of travel between two rectangles.
    ///
    /// A non-empty value always has exactly one horizontal and one vertical
    /// flag. The empty value means the centers (nearly) coincide.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct MotionDirection: u8 {
        /// Travelling toward smaller y.
        const UP    = 0b0001;
        /// Travelling toward larger y.
        const DOWN  = 0b0010;
        /// Travelling toward smaller x.
        const LEFT  = 0b0100;
        /// Travelling toward larger x.
        const RIGHT = 0b1000;

        /// Up and to the left.
        const UP_LEFT = Self::UP.bits() | Self::LEFT.bits();
        /// Up and to the right.
        const UP_RIGHT = Self::UP.bits() | Self::RIGHT.bits();
        /// Down and to the right.
        const DOWN_RIGHT = Self::DOWN.bits() | Self::RIGHT.bits();
        /// Down and to the left.
        const DOWN_LEFT = Self::DOWN.bits() | Self::LEFT.bits();
    }
}

impl MotionDirection {
    /// Direction from the center of `source` to the center of `destination`.
    ///
    /// Ties on an axis resolve to `LEFT` / `UP`.
    #[must_use]
    pub fn between(source: Rect, destination: Rect) -> Self {
        let from = source.center();
        let to = destination.center();
        if nearly_equal(from, to) {
            return Self::empty();
        }
        let horizontal = if from.x < to.x { Self::RIGHT } else { Self::LEFT };
        let vertical = if from.y < to.y { Self::DOWN } else { Self::UP };
        horizontal | vertical
    }
}
