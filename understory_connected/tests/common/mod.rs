// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A headless platform for driving connected animations in tests.
//!
//! Elements are plain ids with absolute bounds. Timelines advance in a fixed
//! number of steps, yielding to the executor between steps so concurrent
//! hosts interleave, and every step records what the overlays would draw.

#![allow(
    missing_docs,
    reason = "Integration-test helper module; not part of the public API."
)]
#![allow(
    dead_code,
    reason = "Each integration test binary uses a different subset of the helpers."
)]

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll};

use kurbo::{Insets, Point, Rect, Size};
use understory_connected::{OverlayLayer, Platform, Progress, Timeline};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct El(pub(crate) u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Window(pub(crate) u32);

#[derive(Debug)]
pub(crate) struct Snap {
    pub(crate) id: u64,
    pub(crate) element: El,
    pub(crate) size: Size,
}

/// One drawn layer, as seen by a timeline step.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Drawn {
    pub(crate) element: El,
    pub(crate) rect: Rect,
    pub(crate) opacity: f64,
}

/// What a window's overlay showed at one timeline step.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Frame {
    /// Index of the timeline that took the step, in start order.
    pub(crate) timeline: usize,
    pub(crate) progress: f64,
    pub(crate) visuals: usize,
    pub(crate) layers: Vec<Drawn>,
    /// Elements at zero opacity, by id.
    pub(crate) hidden: Vec<El>,
}

#[derive(Debug)]
struct Node {
    window: Option<Window>,
    bounds: Rect,
    margin: Insets,
    desired: Size,
    arranged: Option<Rect>,
    opacity: f64,
}

#[derive(Debug, Default)]
struct State {
    nodes: HashMap<El, Node>,
    overlays: HashMap<Window, Rc<OverlayLayer<Snap>>>,
    attach_on_layout: Vec<(El, Window)>,
    next_snapshot: u64,
    live: HashSet<u64>,
    captures: usize,
    releases: usize,
    double_releases: usize,
    layout_passes: usize,
    timelines: Vec<Timeline>,
    frames: Vec<Frame>,
}

#[derive(Debug)]
pub(crate) struct TestPlatform {
    state: RefCell<State>,
    /// Steps taken by the first timeline; each later timeline takes two more.
    steps: u32,
}

impl TestPlatform {
    pub(crate) fn new() -> Rc<Self> {
        Self::with_steps(4)
    }

    pub(crate) fn with_steps(steps: u32) -> Rc<Self> {
        Rc::new(Self {
            state: RefCell::new(State::default()),
            steps,
        })
    }

    /// Adds a window with an overlay layer.
    pub(crate) fn add_window(&self, window: Window) {
        self.state
            .borrow_mut()
            .overlays
            .insert(window, Rc::new(OverlayLayer::new()));
    }

    /// Adds an element at `bounds`, attached to `window` when given.
    pub(crate) fn add(&self, element: El, window: Option<Window>, bounds: Rect) {
        self.state.borrow_mut().nodes.insert(
            element,
            Node {
                window,
                bounds,
                margin: Insets::ZERO,
                desired: bounds.size(),
                arranged: Some(bounds),
                opacity: 1.0,
            },
        );
    }

    pub(crate) fn set_margin(&self, element: El, margin: Insets) {
        self.with_node(element, |node| node.margin = margin);
    }

    pub(crate) fn set_desired(&self, element: El, desired: Size) {
        self.with_node(element, |node| node.desired = desired);
    }

    pub(crate) fn set_element_opacity(&self, element: El, opacity: f64) {
        self.with_node(element, |node| node.opacity = opacity);
    }

    /// Attaches `element` to `window` during the next layout pass.
    pub(crate) fn attach_on_next_layout(&self, element: El, window: Window) {
        self.state
            .borrow_mut()
            .attach_on_layout
            .push((element, window));
    }

    pub(crate) fn overlay_of(&self, window: Window) -> Rc<OverlayLayer<Snap>> {
        Rc::clone(&self.state.borrow().overlays[&window])
    }

    pub(crate) fn element_opacity(&self, element: El) -> f64 {
        self.state.borrow().nodes[&element].opacity
    }

    pub(crate) fn arranged(&self, element: El) -> Option<Rect> {
        self.state.borrow().nodes[&element].arranged
    }

    pub(crate) fn captures(&self) -> usize {
        self.state.borrow().captures
    }

    pub(crate) fn releases(&self) -> usize {
        self.state.borrow().releases
    }

    pub(crate) fn live_snapshots(&self) -> usize {
        self.state.borrow().live.len()
    }

    pub(crate) fn double_releases(&self) -> usize {
        self.state.borrow().double_releases
    }

    pub(crate) fn layout_passes(&self) -> usize {
        self.state.borrow().layout_passes
    }

    pub(crate) fn timelines(&self) -> Vec<Timeline> {
        self.state.borrow().timelines.clone()
    }

    pub(crate) fn frames(&self) -> Vec<Frame> {
        self.state.borrow().frames.clone()
    }

    fn with_node(&self, element: El, f: impl FnOnce(&mut Node)) {
        let mut state = self.state.borrow_mut();
        let node = state
            .nodes
            .get_mut(&element)
            .expect("element should have been added");
        f(node);
    }

    fn node<R>(&self, element: &El, f: impl FnOnce(&Node) -> R) -> R {
        f(&self.state.borrow().nodes[element])
    }

    fn record_frame(&self, timeline: usize, progress: f64) {
        let overlays: Vec<_> = self.state.borrow().overlays.values().cloned().collect();
        let mut visuals = 0;
        let mut layers = Vec::new();
        for overlay in overlays {
            visuals += overlay.len();
            overlay.for_each_layer(|layer| {
                layers.push(Drawn {
                    element: layer.snapshot.element,
                    rect: layer.rect,
                    opacity: layer.opacity,
                });
            });
        }
        let mut state = self.state.borrow_mut();
        let mut hidden: Vec<El> = state
            .nodes
            .iter()
            .filter(|(_, node)| node.opacity == 0.0)
            .map(|(element, _)| *element)
            .collect();
        hidden.sort_by_key(|element| element.0);
        state.frames.push(Frame {
            timeline,
            progress,
            visuals,
            layers,
            hidden,
        });
    }

    fn layout_pass(&self) {
        let mut state = self.state.borrow_mut();
        state.layout_passes += 1;
        let attach = std::mem::take(&mut state.attach_on_layout);
        for (element, window) in attach {
            if let Some(node) = state.nodes.get_mut(&element) {
                node.window = Some(window);
            }
        }
    }
}

impl Platform for TestPlatform {
    type Element = El;
    type Snapshot = Snap;
    type Surface = Window;

    fn render_size(&self, element: &El) -> Size {
        self.node(element, |node| node.bounds.size())
    }

    fn translate_to_root(&self, element: &El, point: Point) -> Option<Point> {
        self.node(element, |node| {
            node.window?;
            Some(node.bounds.origin() + point.to_vec2())
        })
    }

    fn margin(&self, element: &El) -> Insets {
        self.node(element, |node| node.margin)
    }

    fn surface(&self, element: &El) -> Option<Window> {
        self.node(element, |node| node.window)
    }

    fn arranged_rect(&self, element: &El) -> Option<Rect> {
        self.node(element, |node| node.arranged)
    }

    fn measure(&self, element: &El) -> Size {
        self.node(element, |node| node.desired)
    }

    fn arrange(&self, element: &El, rect: Rect) {
        self.with_node(*element, |node| node.arranged = Some(rect));
    }

    fn invalidate_arrange(&self, element: &El) {
        self.with_node(*element, |node| node.arranged = None);
    }

    fn render_snapshot(&self, element: &El, size: Size) -> Snap {
        let mut state = self.state.borrow_mut();
        let id = state.next_snapshot;
        state.next_snapshot += 1;
        state.captures += 1;
        state.live.insert(id);
        Snap {
            id,
            element: *element,
            size,
        }
    }

    fn release_snapshot(&self, snapshot: Snap) {
        let mut state = self.state.borrow_mut();
        state.releases += 1;
        if !state.live.remove(&snapshot.id) {
            state.double_releases += 1;
        }
    }

    fn opacity(&self, element: &El) -> f64 {
        self.node(element, |node| node.opacity)
    }

    fn set_opacity(&self, element: &El, opacity: f64) {
        self.with_node(*element, |node| node.opacity = opacity);
    }

    fn overlay(&self, surface: &Window) -> Option<Rc<OverlayLayer<Snap>>> {
        self.state.borrow().overlays.get(surface).cloned()
    }

    fn run_timeline(&self, timeline: Timeline, progress: &Progress) -> impl Future<Output = ()> {
        let index = {
            let mut state = self.state.borrow_mut();
            state.timelines.push(timeline);
            state.timelines.len() - 1
        };
        let steps = self.steps + 2 * u32::try_from(index).unwrap();
        async move {
            for step in 1..=steps {
                YieldNow::default().await;
                let t = f64::from(step) / f64::from(steps);
                progress.set(timeline.easing.ease(t));
                self.record_frame(index, progress.get());
            }
        }
    }

    fn next_layout_pass(&self) -> impl Future<Output = ()> {
        async move {
            YieldNow::default().await;
            self.layout_pass();
        }
    }
}

/// Returns `Pending` once, so other futures in a join get polled.
#[derive(Debug, Default)]
pub(crate) struct YieldNow(bool);

impl Future for YieldNow {
    type Output = ();

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        if self.0 {
            Poll::Ready(())
        } else {
            self.0 = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}
