// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_motion --heading-base-level=0

//! Understory Motion: the pure math behind connected UI transitions.
//!
//! A connected transition flies an element from where it used to be (the
//! *source* rectangle) to where it is now (the *destination* rectangle). This
//! crate contains everything about that flight that can be expressed as a
//! pure function of two rectangles and a progress scalar:
//!
//! - [`MotionCurve`] / [`Curve`]: where the element is at a given progress.
//!   [`Curve::Linear`] moves in a straight line, [`Curve::GravityArc`] sags
//!   downward mid-flight along a quadratic Bézier ([`QuadraticArc`]).
//! - [`Easing`]: maps linear time to eased progress.
//! - [`RelativeLocation`]: which side of a reference rectangle another
//!   rectangle sits on, by comparing angles against the reference diagonals.
//! - [`MotionDirection`]: the coarse direction of travel between two
//!   rectangles.
//! - [`TransitionPolicy`] / [`Policy`]: picks easing, duration and curve for
//!   a particular pair of rectangles.
//!
//! It does **not** own any element tree, renderer or clock. The
//! `understory_connected` crate builds the orchestration on top of it.
//!
//! ## Minimal example
//!
//! ```rust
//! use core::time::Duration;
//! use kurbo::Rect;
//! use understory_motion::{Curve, Easing, MotionCurve, Policy, TransitionParams, TransitionPolicy};
//!
//! let start = Rect::from_origin_size((20.0, 20.0), (100.0, 60.0));
//! let end = Rect::from_origin_size((300.0, 400.0), (200.0, 120.0));
//!
//! let defaults = TransitionParams {
//!     easing: Easing::STANDARD,
//!     duration: Duration::from_millis(300),
//!     curve: Curve::Linear,
//! };
//! let params = Policy::Gravity.resolve(start, end, defaults);
//! assert_eq!(params.easing, Easing::Linear);
//! assert_eq!(params.duration, Duration::from_millis(400));
//!
//! // Halfway through, the element is somewhere below the straight line.
//! let mid = params.curve.frame(start, end, 0.5);
//! let straight = Curve::Linear.frame(start, end, 0.5);
//! assert!(mid.y0 > straight.y0);
//! assert_eq!(mid.size(), straight.size());
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod curve;
mod easing;
pub mod geometry;
mod location;
mod policy;

pub use curve::{Curve, GravityArc, MotionCurve, QuadraticArc};
pub use easing::Easing;
pub use location::{MotionDirection, RelativeLocation};
pub use policy::{
    DIRECT_MIN_MILLIS, GRAVITY_MAX_MILLIS, GRAVITY_MIN_MILLIS, Policy, TransitionParams,
    TransitionPolicy,
};
