// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by the transition engine.

use alloc::string::String;
use core::fmt;

/// Error returned by registry and orchestration calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnimationError {
    /// A required argument was empty or unusable; names the argument.
    InvalidArgument(&'static str),
    /// A transition is already pending for this key.
    DuplicateKey(String),
    /// The destination is not attached to a surface with an overlay layer,
    /// so there is nowhere to draw the transition.
    NoOverlaySurface,
}

impl fmt::Display for AnimationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument(name) => write!(f, "invalid argument `{name}`"),
            Self::DuplicateKey(key) => write!(
                f,
                "key {key:?} is already prepared for animation and should not be prepared repeatedly"
            ),
            Self::NoOverlaySurface => f.write_str(
                "the element is not connected to a visible surface and no overlay can host the animation",
            ),
        }
    }
}

impl core::error::Error for AnimationError {}
