// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A single prepared connected animation and its lifecycle.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;
use core::time::Duration;

use futures::future::{join, join_all};
use kurbo::Rect;
use understory_motion::{Policy, TransitionParams, TransitionPolicy};

use crate::bounds::{effective_bounds, try_absolute_bounds};
use crate::error::AnimationError;
use crate::host::{HiddenElements, SatelliteHost, TransitionHost};
use crate::overlay::{OverlayLease, OverlayVisual};
use crate::platform::{Platform, Timeline};
use crate::snapshot::CapturedSnapshot;

/// Where a [`ConnectedAnimation`] is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AnimationState {
    /// The source was captured; waiting for a destination.
    Prepared,
    /// Hosts are in the overlay and their timelines are running.
    Running,
    /// The animation ran, or could not run, and has released its resources.
    Completed,
    /// The animation was cancelled before it started.
    Cancelled,
}

impl AnimationState {
    /// Returns `true` once the animation has completed or was cancelled.
    #[must_use]
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

type CompletionHook = Box<dyn FnOnce(&str)>;

/// A captured source element waiting to fly into its destination.
///
/// Created by [`ConnectedAnimationService::prepare_to_animate`], which
/// records the source's bounds and a snapshot of its appearance. The caller
/// then navigates and, once the destination element exists, calls
/// [`try_start`](Self::try_start) to run the transition, or
/// [`cancel`](Self::cancel) to drop it.
///
/// Completion fires exactly once per animation, whichever way it ends, and
/// removes the animation's key from its service.
///
/// [`ConnectedAnimationService::prepare_to_animate`]: crate::ConnectedAnimationService::prepare_to_animate
pub struct ConnectedAnimation<P: Platform> {
    key: String,
    platform: Rc<P>,
    source: P::Element,
    source_rect: Rect,
    snapshot: RefCell<Option<CapturedSnapshot<P>>>,
    policy: Cell<Policy>,
    defaults: TransitionParams,
    state: Cell<AnimationState>,
    on_complete: RefCell<Option<CompletionHook>>,
}

impl<P: Platform> ConnectedAnimation<P> {
    /// Captures `source` for a later transition.
    pub(crate) fn prepare(
        key: String,
        platform: &Rc<P>,
        source: &P::Element,
        policy: Policy,
        defaults: TransitionParams,
    ) -> Self {
        let source_rect = effective_bounds(platform.as_ref(), source);
        let snapshot = CapturedSnapshot::capture(platform, source);
        Self {
            key,
            platform: Rc::clone(platform),
            source: source.clone(),
            source_rect,
            snapshot: RefCell::new(Some(snapshot)),
            policy: Cell::new(policy),
            defaults,
            state: Cell::new(AnimationState::Prepared),
            on_complete: RefCell::new(None),
        }
    }

    pub(crate) fn set_on_complete(&self, hook: CompletionHook) {
        *self.on_complete.borrow_mut() = Some(hook);
    }

    /// Key the animation was prepared under.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The element the animation was prepared from.
    #[must_use]
    pub fn source(&self) -> &P::Element {
        &self.source
    }

    /// Source bounds captured at prepare time, including the source margin.
    #[must_use]
    pub fn source_rect(&self) -> Rect {
        self.source_rect
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> AnimationState {
        self.state.get()
    }

    /// Policy used to time the transition.
    #[must_use]
    pub fn policy(&self) -> Policy {
        self.policy.get()
    }

    /// Replaces the policy. Only affects a transition that has not started.
    pub fn set_policy(&self, policy: Policy) {
        self.policy.set(policy);
    }

    /// Defaults handed to the policy.
    #[must_use]
    pub fn defaults(&self) -> TransitionParams {
        self.defaults
    }

    /// Runs the transition from the prepared source into `destination`.
    ///
    /// `coordinated` elements are satellites: they fade in alongside the
    /// primary along paths inferred from its motion. Repeats, the destination
    /// itself and elements not attached to a surface are skipped.
    ///
    /// Returns `Ok(false)` without touching any overlay when `destination`
    /// is the prepared source or when the animation is no longer
    /// [`Prepared`](AnimationState::Prepared). If the destination is not yet
    /// attached, waits for one layout pass; if it is still not attached, or
    /// its surface has no overlay, the animation completes and
    /// [`AnimationError::NoOverlaySurface`] is returned.
    ///
    /// Otherwise the destination and satellites are hidden, every host is
    /// inserted into the destination's overlay and all timelines run
    /// concurrently. Hosts are removed, the hidden elements get their
    /// opacity back and completion fires only after every timeline has
    /// finished. Dropping the returned
    /// future early removes the hosts and completes the animation as well.
    pub async fn try_start(
        &self,
        destination: &P::Element,
        coordinated: &[P::Element],
    ) -> Result<bool, AnimationError> {
        if *destination == self.source {
            tracing::debug!(key = %self.key, "destination is the prepared source");
            return Ok(false);
        }
        let state = self.state.get();
        if state != AnimationState::Prepared {
            tracing::debug!(key = %self.key, ?state, "animation is not startable");
            return Ok(false);
        }

        self.state.set(AnimationState::Running);
        let _completion = Completion { animation: self };
        let source = self.snapshot.borrow_mut().take();
        let Some(source) = source else {
            return Ok(false);
        };

        let platform = self.platform.as_ref();
        if try_absolute_bounds(platform, destination).is_none() {
            tracing::trace!(key = %self.key, "waiting for the destination to be attached");
            platform.next_layout_pass().await;
        }
        let overlay = try_absolute_bounds(platform, destination)
            .and_then(|_| platform.surface(destination))
            .and_then(|surface| platform.overlay(&surface));
        let Some(overlay) = overlay else {
            tracing::warn!(key = %self.key, "no overlay surface for the destination");
            return Err(AnimationError::NoOverlaySurface);
        };

        let policy = self.policy.get();
        let destination_rect = effective_bounds(platform, destination);
        let params = policy.resolve(self.source_rect, destination_rect, self.defaults);
        let primary = Rc::new(TransitionHost::new(
            &self.platform,
            source,
            self.source_rect,
            destination,
            destination_rect,
            params.curve,
        ));
        let mut satellites: Vec<Rc<SatelliteHost<P>>> = Vec::with_capacity(coordinated.len());
        for element in coordinated {
            let repeated = *element == *destination
                || satellites.iter().any(|satellite| satellite.element() == element);
            if repeated {
                tracing::debug!(
                    key = %self.key,
                    ?element,
                    "skipping repeated coordinated element"
                );
                continue;
            }
            let satellite = SatelliteHost::new(
                &self.platform,
                element,
                self.source_rect,
                destination_rect,
                &policy,
                self.defaults.curve,
            );
            match satellite {
                Some(satellite) => satellites.push(Rc::new(satellite)),
                None => tracing::debug!(
                    key = %self.key,
                    ?element,
                    "coordinated element is not attached"
                ),
            }
        }

        let mut hidden = HiddenElements::new(platform);
        hidden.hide(destination);
        for satellite in &satellites {
            hidden.hide(satellite.element());
        }
        let mut lease = OverlayLease::new(&overlay);
        let visual: Rc<dyn OverlayVisual<P::Snapshot>> = primary.clone();
        lease.insert(visual);
        for satellite in &satellites {
            let visual: Rc<dyn OverlayVisual<P::Snapshot>> = satellite.clone();
            lease.insert(visual);
        }

        let timeline = Timeline {
            duration: params.duration,
            delay: Duration::ZERO,
            easing: params.easing,
        };
        tracing::debug!(
            key = %self.key,
            duration_ms = params.duration.as_secs_f64() * 1000.0,
            satellites = satellites.len(),
            direction = ?primary.direction(),
            "starting connected animation"
        );
        join(
            primary.animate(timeline),
            join_all(satellites.iter().map(|satellite| satellite.animate(timeline))),
        )
        .await;

        drop(lease);
        drop(hidden);
        drop(satellites);
        drop(primary);
        tracing::debug!(key = %self.key, "connected animation finished");
        Ok(true)
    }

    /// Drops the prepared transition without animating.
    ///
    /// Releases the source snapshot and fires completion. Has no effect once
    /// the animation is running or finished; a running animation always
    /// runs to its end.
    pub fn cancel(&self) {
        match self.state.get() {
            AnimationState::Prepared => {
                tracing::debug!(key = %self.key, "connected animation cancelled");
                self.finish(AnimationState::Cancelled);
            }
            AnimationState::Running => {
                tracing::debug!(key = %self.key, "cannot cancel a running animation");
            }
            AnimationState::Completed | AnimationState::Cancelled => {}
        }
    }

    fn finish(&self, state: AnimationState) {
        self.state.set(state);
        drop(self.snapshot.borrow_mut().take());
        let hook = self.on_complete.borrow_mut().take();
        if let Some(hook) = hook {
            hook(&self.key);
        }
    }
}

impl<P: Platform> fmt::Debug for ConnectedAnimation<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectedAnimation")
            .field("key", &self.key)
            .field("source", &self.source)
            .field("source_rect", &self.source_rect)
            .field("policy", &self.policy.get())
            .field("state", &self.state.get())
            .finish_non_exhaustive()
    }
}

/// Completes a started animation on every exit path.
struct Completion<'a, P: Platform> {
    animation: &'a ConnectedAnimation<P>,
}

impl<P: Platform> Drop for Completion<'_, P> {
    fn drop(&mut self) {
        self.animation.finish(AnimationState::Completed);
    }
}
