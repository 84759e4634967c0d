// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_connected --heading-base-level=0

//! Understory Connected: connected transitions between two places in a UI.
//!
//! A connected transition makes an element appear to fly from where it was
//! on one screen to where it is on the next. Before navigating, the caller
//! *prepares* the transition under a key, which records the source's
//! absolute bounds and a snapshot of how it looks. After navigating, the
//! caller *starts* it with the destination element, and the engine draws an
//! interpolated stand-in on an overlay above the new content until it lands.
//!
//! - [`ConnectedAnimationService`]: per-surface registry of pending
//!   transitions, at most one per key. [`ServiceDirectory`] hands out one
//!   service per surface and tears it down when the surface closes.
//! - [`ConnectedAnimation`]: one prepared transition. [`try_start`] runs it,
//!   [`cancel`] drops it.
//! - [`TransitionHost`] / [`SatelliteHost`]: the overlay visuals. The primary
//!   host crossfades the source snapshot into the destination snapshot while
//!   following the active [`Curve`]; satellite hosts fade coordinated
//!   elements in from positions inferred with [`infer_satellite_source`].
//! - [`Platform`]: everything the engine needs from a UI framework. Bounds,
//!   snapshots, layout, opacity, the [`OverlayLayer`] and the animation clock
//!   all come from here; the engine never touches a real element's position.
//!
//! Timing comes from `understory_motion`: the animation's [`Policy`]
//! chooses easing, duration and curve from the source and destination
//! rectangles, starting from the service's [`AnimationConfig`].
//!
//! Every snapshot the engine captures is released exactly once, and every
//! visual it inserts into an overlay is removed again, whether the
//! transition completes, is cancelled, fails or its future is dropped.
//!
//! ## Minimal example
//!
//! Satellites keep their offset from the primary element:
//!
//! ```rust
//! use kurbo::Rect;
//! use understory_connected::{RelativeLocation, infer_satellite_source};
//!
//! let primary_source = Rect::new(10.0, 20.0, 110.0, 70.0);
//! let primary_destination = Rect::new(200.0, 300.0, 400.0, 400.0);
//! // A caption 20px under the destination.
//! let caption = Rect::new(210.0, 420.0, 260.0, 440.0);
//!
//! let (location, start) = infer_satellite_source(primary_source, primary_destination, caption);
//! assert_eq!(location, RelativeLocation::Below);
//! // It starts 20px under the source instead.
//! assert_eq!(start.y0, primary_source.y1 + 20.0);
//! ```
//!
//! Driving a real transition needs a [`Platform`] implementation; the
//! integration tests contain a headless one.
//!
//! This crate is `no_std` and uses `alloc`. Logging goes through `tracing`;
//! install a subscriber to see lifecycle events.
//!
//! [`try_start`]: ConnectedAnimation::try_start
//! [`cancel`]: ConnectedAnimation::cancel

#![no_std]

extern crate alloc;

mod animation;
mod bounds;
mod error;
mod host;
mod overlay;
mod platform;
mod service;
mod snapshot;

pub use animation::{AnimationState, ConnectedAnimation};
pub use bounds::{absolute_bounds, effective_bounds, try_absolute_bounds};
pub use error::AnimationError;
pub use host::{SatelliteHost, TransitionHost, infer_satellite_source};
pub use overlay::{Layer, OverlayId, OverlayLayer, OverlayVisual};
pub use platform::{Platform, Progress, Timeline};
pub use service::{AnimationConfig, ConnectedAnimationService, ServiceDirectory};
pub use snapshot::CapturedSnapshot;

pub use understory_motion::{Curve, Easing, MotionDirection, Policy, RelativeLocation};
