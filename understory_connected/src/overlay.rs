// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The overlay layer that hosts transition visuals above regular content.

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::{Cell, RefCell};
use core::fmt;

use kurbo::Rect;
use smallvec::SmallVec;

/// One snapshot draw in an overlay frame.
#[derive(Debug)]
pub struct Layer<'a, S> {
    /// Image to draw, stretched to fill `rect`.
    pub snapshot: &'a S,
    /// Target rectangle in root-surface coordinates.
    pub rect: Rect,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
}

/// Something the overlay can draw: a list of snapshot layers per frame.
pub trait OverlayVisual<S> {
    /// Layers for the current frame, bottom to top.
    fn layers(&self) -> SmallVec<[Layer<'_, S>; 2]>;

    /// Current progress of the visual's transition.
    fn progress(&self) -> f64;
}

/// Identifier of a visual inserted into an [`OverlayLayer`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct OverlayId(u64);

/// Ordered, non-hit-testable collection of transition visuals.
///
/// One layer exists per surface; the platform owns it and draws every layer
/// of every visual after its regular content. The engine only ever inserts
/// and removes visuals, and only removes what it inserted itself.
pub struct OverlayLayer<S> {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(OverlayId, Rc<dyn OverlayVisual<S>>)>>,
}

impl<S> OverlayLayer<S> {
    /// Creates an empty layer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(0),
            entries: RefCell::new(Vec::new()),
        }
    }

    /// Appends `visual` on top of the existing visuals.
    pub fn insert(&self, visual: Rc<dyn OverlayVisual<S>>) -> OverlayId {
        let id = OverlayId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.entries.borrow_mut().push((id, visual));
        id
    }

    /// Removes the visual with `id`. Returns `false` if it was not present.
    pub fn remove(&self, id: OverlayId) -> bool {
        let mut entries = self.entries.borrow_mut();
        match entries.iter().position(|(entry, _)| *entry == id) {
            Some(index) => {
                entries.remove(index);
                true
            }
            None => false,
        }
    }

    /// Returns `true` if `id` is currently in the layer.
    #[must_use]
    pub fn contains(&self, id: OverlayId) -> bool {
        self.entries.borrow().iter().any(|(entry, _)| *entry == id)
    }

    /// Number of visuals in the layer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Returns `true` if the layer holds no visuals.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Progress of each visual, bottom to top.
    #[must_use]
    pub fn progress(&self) -> Vec<f64> {
        self.entries
            .borrow()
            .iter()
            .map(|(_, visual)| visual.progress())
            .collect()
    }

    /// Calls `f` for every layer of every visual, bottom to top.
    ///
    /// `f` must not insert into or remove from this overlay.
    pub fn for_each_layer(&self, mut f: impl FnMut(Layer<'_, S>)) {
        for (_, visual) in self.entries.borrow().iter() {
            for layer in visual.layers() {
                f(layer);
            }
        }
    }
}

impl<S> Default for OverlayLayer<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S> fmt::Debug for OverlayLayer<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OverlayLayer")
            .field("len", &self.len())
            .field("next_id", &self.next_id.get())
            .finish_non_exhaustive()
    }
}

/// Visuals one transition run inserted into a layer; removed on drop.
pub(crate) struct OverlayLease<'a, S> {
    layer: &'a OverlayLayer<S>,
    ids: SmallVec<[OverlayId; 4]>,
}

impl<'a, S> OverlayLease<'a, S> {
    pub(crate) fn new(layer: &'a OverlayLayer<S>) -> Self {
        Self {
            layer,
            ids: SmallVec::new(),
        }
    }

    pub(crate) fn insert(&mut self, visual: Rc<dyn OverlayVisual<S>>) {
        self.ids.push(self.layer.insert(visual));
    }
}

impl<S> Drop for OverlayLease<'_, S> {
    fn drop(&mut self) {
        for id in self.ids.drain(..) {
            self.layer.remove(id);
        }
    }
}
