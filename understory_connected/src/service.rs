// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-surface registries of pending connected animations.

use alloc::boxed::Box;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;
use core::time::Duration;

use hashbrown::HashMap;
use understory_motion::{Curve, Easing, Policy, TransitionParams};

use crate::animation::ConnectedAnimation;
use crate::error::AnimationError;
use crate::platform::Platform;

/// Defaults applied to animations prepared by a service.
///
/// Each animation copies the configuration when it is prepared; later
/// changes only affect animations prepared afterwards.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AnimationConfig {
    /// Duration handed to the policy as its default.
    pub duration: Duration,
    /// Easing handed to the policy as its default.
    pub easing: Easing,
    /// Curve handed to the policy as its default.
    pub curve: Curve,
    /// Policy new animations start with.
    pub policy: Policy,
}

impl AnimationConfig {
    /// The policy defaults this configuration describes.
    #[must_use]
    pub fn defaults(&self) -> TransitionParams {
        TransitionParams {
            easing: self.easing,
            duration: self.duration,
            curve: self.curve,
        }
    }
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(300),
            easing: Easing::STANDARD,
            curve: Curve::Linear,
            policy: Policy::Gravity,
        }
    }
}

type Pending<P> = HashMap<String, Rc<ConnectedAnimation<P>>>;

/// Registry of pending connected animations for one surface.
///
/// At most one animation is pending per key. An animation leaves the
/// registry only through its own completion, so a key becomes available
/// again once its animation has run, failed or been cancelled.
pub struct ConnectedAnimationService<P: Platform> {
    platform: Rc<P>,
    pending: Rc<RefCell<Pending<P>>>,
    config: Cell<AnimationConfig>,
}

impl<P: Platform> ConnectedAnimationService<P> {
    /// Creates an empty service with the default configuration.
    pub fn new(platform: Rc<P>) -> Self {
        Self::with_config(platform, AnimationConfig::default())
    }

    /// Creates an empty service with `config`.
    pub fn with_config(platform: Rc<P>, config: AnimationConfig) -> Self {
        Self {
            platform,
            pending: Rc::new(RefCell::new(HashMap::new())),
            config: Cell::new(config),
        }
    }

    /// Current configuration.
    #[must_use]
    pub fn config(&self) -> AnimationConfig {
        self.config.get()
    }

    /// Replaces the configuration for animations prepared from now on.
    pub fn set_config(&self, config: AnimationConfig) {
        self.config.set(config);
    }

    /// Captures `source` and registers a pending animation under `key`.
    ///
    /// Fails with [`AnimationError::InvalidArgument`] for an empty key and
    /// with [`AnimationError::DuplicateKey`] while an animation is already
    /// pending under `key`; the pending animation is left untouched.
    pub fn prepare_to_animate(
        &self,
        key: &str,
        source: &P::Element,
    ) -> Result<Rc<ConnectedAnimation<P>>, AnimationError> {
        if key.is_empty() {
            return Err(AnimationError::InvalidArgument("key"));
        }
        if self.pending.borrow().contains_key(key) {
            tracing::warn!(key, "animation is already prepared");
            return Err(AnimationError::DuplicateKey(key.into()));
        }

        let config = self.config.get();
        let animation = Rc::new(ConnectedAnimation::prepare(
            key.into(),
            &self.platform,
            source,
            config.policy,
            config.defaults(),
        ));
        let pending = Rc::downgrade(&self.pending);
        animation.set_on_complete(Box::new(move |key: &str| {
            if let Some(pending) = pending.upgrade() {
                pending.borrow_mut().remove(key);
            }
        }));
        self.pending
            .borrow_mut()
            .insert(key.into(), Rc::clone(&animation));
        tracing::debug!(key, source_rect = ?animation.source_rect(), "prepared animation");
        Ok(animation)
    }

    /// The pending animation for `key`, if any.
    #[must_use]
    pub fn animation(&self, key: &str) -> Option<Rc<ConnectedAnimation<P>>> {
        self.pending.borrow().get(key).cloned()
    }

    /// Returns `true` if an animation is pending under `key`.
    #[must_use]
    pub fn is_pending(&self, key: &str) -> bool {
        self.pending.borrow().contains_key(key)
    }

    /// Number of pending animations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    /// Returns `true` if no animation is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }

    /// Cancels every animation that has not started yet.
    ///
    /// Running animations are left to finish on their own.
    pub fn cancel_all(&self) {
        let animations: Vec<_> = self.pending.borrow().values().cloned().collect();
        for animation in animations {
            animation.cancel();
        }
    }
}

impl<P: Platform> fmt::Debug for ConnectedAnimationService<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pending = self.pending.borrow();
        let mut keys: Vec<&str> = pending.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("ConnectedAnimationService")
            .field("pending", &keys)
            .field("config", &self.config.get())
            .finish_non_exhaustive()
    }
}

/// One [`ConnectedAnimationService`] per surface, created on first use.
///
/// The directory is the context object a framework keeps next to its
/// surfaces: it hands out the service for whichever surface a view is
/// attached to and tears that service down when the surface closes.
pub struct ServiceDirectory<P: Platform> {
    platform: Rc<P>,
    config: AnimationConfig,
    services: RefCell<HashMap<P::Surface, Rc<ConnectedAnimationService<P>>>>,
}

impl<P: Platform> ServiceDirectory<P> {
    /// Creates an empty directory whose services use the default
    /// configuration.
    pub fn new(platform: Rc<P>) -> Self {
        Self::with_config(platform, AnimationConfig::default())
    }

    /// Creates an empty directory whose services start with `config`.
    pub fn with_config(platform: Rc<P>, config: AnimationConfig) -> Self {
        Self {
            platform,
            config,
            services: RefCell::new(HashMap::new()),
        }
    }

    /// The service of the surface `view` is attached to.
    ///
    /// Creates the service on first access. Fails with
    /// [`AnimationError::InvalidArgument`] when `view` is not attached to a
    /// surface.
    pub fn for_view(
        &self,
        view: &P::Element,
    ) -> Result<Rc<ConnectedAnimationService<P>>, AnimationError> {
        let surface = self
            .platform
            .surface(view)
            .ok_or(AnimationError::InvalidArgument("view"))?;
        Ok(self.for_surface(surface))
    }

    /// The service of `surface`, created on first access.
    pub fn for_surface(&self, surface: P::Surface) -> Rc<ConnectedAnimationService<P>> {
        let mut services = self.services.borrow_mut();
        let service = services.entry(surface).or_insert_with_key(|surface| {
            tracing::trace!(?surface, "creating connected animation service");
            Rc::new(ConnectedAnimationService::with_config(
                Rc::clone(&self.platform),
                self.config,
            ))
        });
        Rc::clone(service)
    }

    /// Returns `true` if `surface` currently has a service.
    #[must_use]
    pub fn contains(&self, surface: &P::Surface) -> bool {
        self.services.borrow().contains_key(surface)
    }

    /// Number of surfaces with a service.
    #[must_use]
    pub fn len(&self) -> usize {
        self.services.borrow().len()
    }

    /// Returns `true` if no surface has a service.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.services.borrow().is_empty()
    }

    /// Tears down the service of a closing surface.
    ///
    /// Cancels every animation still pending there. Returns `false` if the
    /// surface never had a service.
    pub fn close_surface(&self, surface: &P::Surface) -> bool {
        let service = self.services.borrow_mut().remove(surface);
        match service {
            Some(service) => {
                service.cancel_all();
                true
            }
            None => false,
        }
    }
}

impl<P: Platform> fmt::Debug for ServiceDirectory<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceDirectory")
            .field("surfaces", &self.len())
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
