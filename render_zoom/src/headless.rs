// Copyright 2025 the Render Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Headless reference host: an in-memory [`ViewTree`] and [`Presenter`].
//!
//! [`HeadlessHost`] keeps views in a flat arena keyed by [`ViewId`]. It does
//! not animate anything: model values change immediately and the host
//! records presentation calls in [`HeadlessHost::calls`], which makes it
//! suitable for tests, demos and as a template for real adapters.
//!
//! Unknown ids are tolerated: queries return neutral values and mutations are
//! ignored.
//!
//! ```
//! use kurbo::Rect;
//! use render_zoom::headless::HeadlessHost;
//! use render_zoom::ViewTree;
//!
//! let mut host = HeadlessHost::new(Rect::new(0.0, 0.0, 400.0, 800.0));
//! let card = host.add_view(None, Rect::new(20.0, 40.0, 120.0, 140.0));
//! let badge = host.add_view(Some(card), Rect::new(10.0, 10.0, 30.0, 30.0));
//!
//! assert_eq!(host.window_frame(badge), Rect::new(30.0, 50.0, 50.0, 70.0));
//! ```

use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::{Affine, Point, Rect, Size};

use crate::gesture::GestureKind;
use crate::host::{Presenter, ViewTree};

/// Identifier of a view in a [`HeadlessHost`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ViewId(u32);

/// Presentation call recorded by a [`HeadlessHost`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum PresenterCall {
    /// [`Presenter::present`] created this destination root.
    Present(ViewId),
    /// [`Presenter::dismiss`] was asked to dismiss this root.
    Dismiss(ViewId),
    /// [`Presenter::complete_transition`] with its `finished` flag.
    Complete(bool),
    /// [`Presenter::did_dismiss`].
    DidDismiss,
}

#[derive(Clone, Debug)]
struct Node {
    parent: Option<ViewId>,
    children: Vec<ViewId>,
    center: Point,
    size: Size,
    transform: Affine,
    hidden: bool,
    alpha: f64,
    clips: bool,
    tag: Option<i64>,
    snapshot_of: Option<ViewId>,
    gestures: Vec<GestureKind>,
}

impl Node {
    fn new(frame: Rect) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            center: frame.center(),
            size: frame.size(),
            transform: Affine::IDENTITY,
            hidden: false,
            alpha: 1.0,
            clips: true,
            tag: None,
            snapshot_of: None,
            gestures: Vec::new(),
        }
    }

    fn frame(&self) -> Rect {
        let local = Rect::from_center_size(Point::ORIGIN, self.size);
        (Affine::translate(self.center.to_vec2()) * self.transform).transform_rect_bbox(local)
    }
}

/// In-memory view tree and presenter.
#[derive(Clone, Debug)]
pub struct HeadlessHost {
    nodes: HashMap<ViewId, Node>,
    next_id: u32,
    window: Rect,
    root: ViewId,
    calls: Vec<PresenterCall>,
    snapshots: usize,
}

impl HeadlessHost {
    /// Creates an empty host whose window covers `window`.
    #[must_use]
    pub fn new(window: Rect) -> Self {
        let root = ViewId(0);
        let mut nodes = HashMap::new();
        nodes.insert(root, Node::new(window));
        Self {
            nodes,
            next_id: 1,
            window,
            root,
            calls: Vec::new(),
            snapshots: 0,
        }
    }

    /// The window's root view. Views are on screen when attached below it.
    #[must_use]
    pub fn root(&self) -> ViewId {
        self.root
    }

    fn insert(&mut self, node: Node) -> ViewId {
        let id = ViewId(self.next_id);
        self.next_id += 1;
        self.nodes.insert(id, node);
        id
    }

    /// Adds a view covering `frame` in `parent`'s coordinates.
    pub fn add_view(&mut self, parent: Option<ViewId>, frame: Rect) -> ViewId {
        let id = self.insert(Node::new(frame));
        if let Some(parent) = parent {
            self.add_subview(parent, id);
        }
        id
    }

    /// Whether `view` exists.
    #[must_use]
    pub fn contains(&self, view: ViewId) -> bool {
        self.nodes.contains_key(&view)
    }

    /// Parent of `view`, if attached.
    #[must_use]
    pub fn parent(&self, view: ViewId) -> Option<ViewId> {
        self.nodes.get(&view).and_then(|n| n.parent)
    }

    /// Children of `view` in insertion order.
    #[must_use]
    pub fn children(&self, view: ViewId) -> &[ViewId] {
        self.nodes
            .get(&view)
            .map_or(&[][..], |n| n.children.as_slice())
    }

    /// Opacity of `view`.
    #[must_use]
    pub fn alpha(&self, view: ViewId) -> f64 {
        self.nodes.get(&view).map_or(1.0, |n| n.alpha)
    }

    /// Whether `view` clips its subviews.
    #[must_use]
    pub fn clips_to_bounds(&self, view: ViewId) -> bool {
        self.nodes.get(&view).is_some_and(|n| n.clips)
    }

    /// The view `view` was snapshotted from, if it is a snapshot.
    #[must_use]
    pub fn snapshot_source(&self, view: ViewId) -> Option<ViewId> {
        self.nodes.get(&view).and_then(|n| n.snapshot_of)
    }

    /// Number of snapshots taken so far.
    #[must_use]
    pub fn snapshot_count(&self) -> usize {
        self.snapshots
    }

    /// Recognizers attached to `view`.
    #[must_use]
    pub fn gestures(&self, view: ViewId) -> &[GestureKind] {
        self.nodes
            .get(&view)
            .map_or(&[][..], |n| n.gestures.as_slice())
    }

    /// Views that currently carry recognizers.
    #[must_use]
    pub fn listening_views(&self) -> Vec<ViewId> {
        let mut views: Vec<ViewId> = self
            .nodes
            .iter()
            .filter(|(_, n)| !n.gestures.is_empty())
            .map(|(id, _)| *id)
            .collect();
        views.sort_unstable();
        views
    }

    /// Presentation calls in the order they were made.
    #[must_use]
    pub fn calls(&self) -> &[PresenterCall] {
        &self.calls
    }

    /// Whether `view` is attached below [`root`](Self::root) with no hidden
    /// view on the way.
    #[must_use]
    pub fn is_visible(&self, view: ViewId) -> bool {
        let mut current = view;
        loop {
            match self.nodes.get(&current) {
                Some(n) if !n.hidden => {
                    if current == self.root {
                        return true;
                    }
                    match n.parent {
                        Some(parent) => current = parent,
                        None => return false,
                    }
                }
                _ => return false,
            }
        }
    }

    fn detach(&mut self, view: ViewId) {
        let Some(parent) = self.nodes.get_mut(&view).and_then(|n| n.parent.take()) else {
            return;
        };
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.retain(|c| *c != view);
        }
    }
}

impl ViewTree for HeadlessHost {
    type View = ViewId;

    fn window_bounds(&self) -> Rect {
        self.window
    }

    fn frame(&self, view: ViewId) -> Rect {
        self.nodes.get(&view).map_or(Rect::ZERO, Node::frame)
    }

    fn window_frame(&self, view: ViewId) -> Rect {
        let mut frame = self.frame(view);
        let mut parent = self.parent(view);
        while let Some(id) = parent {
            frame = frame + self.frame(id).origin().to_vec2();
            parent = self.parent(id);
        }
        frame
    }

    fn set_frame(&mut self, view: ViewId, frame: Rect) {
        if let Some(n) = self.nodes.get_mut(&view) {
            n.center = frame.center();
            n.size = frame.size();
        }
    }

    fn center(&self, view: ViewId) -> Point {
        self.nodes.get(&view).map_or(Point::ORIGIN, |n| n.center)
    }

    fn set_center(&mut self, view: ViewId, center: Point) {
        if let Some(n) = self.nodes.get_mut(&view) {
            n.center = center;
        }
    }

    fn transform(&self, view: ViewId) -> Affine {
        self.nodes
            .get(&view)
            .map_or(Affine::IDENTITY, |n| n.transform)
    }

    fn set_transform(&mut self, view: ViewId, transform: Affine) {
        if let Some(n) = self.nodes.get_mut(&view) {
            n.transform = transform;
        }
    }

    fn is_hidden(&self, view: ViewId) -> bool {
        self.nodes.get(&view).is_some_and(|n| n.hidden)
    }

    fn set_hidden(&mut self, view: ViewId, hidden: bool) {
        if let Some(n) = self.nodes.get_mut(&view) {
            n.hidden = hidden;
        }
    }

    fn set_alpha(&mut self, view: ViewId, alpha: f64) {
        if let Some(n) = self.nodes.get_mut(&view) {
            n.alpha = alpha;
        }
    }

    fn tag(&self, view: ViewId) -> Option<i64> {
        self.nodes.get(&view).and_then(|n| n.tag)
    }

    fn set_tag(&mut self, view: ViewId, tag: Option<i64>) {
        if let Some(n) = self.nodes.get_mut(&view) {
            n.tag = tag;
        }
    }

    fn snapshot(&mut self, view: ViewId, _after_screen_updates: bool) -> ViewId {
        let size = self.nodes.get(&view).map_or(Size::ZERO, |n| n.size);
        let mut node = Node::new(Rect::from_origin_size(Point::ORIGIN, size));
        node.snapshot_of = Some(view);
        self.snapshots += 1;
        self.insert(node)
    }

    fn create_container(&mut self, frame: Rect) -> ViewId {
        self.insert(Node::new(frame))
    }

    fn set_clips_to_bounds(&mut self, view: ViewId, clips: bool) {
        if let Some(n) = self.nodes.get_mut(&view) {
            n.clips = clips;
        }
    }

    fn add_subview(&mut self, parent: ViewId, child: ViewId) {
        if parent == child || !self.contains(parent) || !self.contains(child) {
            return;
        }
        self.detach(child);
        if let Some(n) = self.nodes.get_mut(&child) {
            n.parent = Some(parent);
        }
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.children.push(child);
        }
    }

    fn remove_from_parent(&mut self, view: ViewId) {
        self.detach(view);
    }

    fn discard(&mut self, view: ViewId) {
        if view == self.root {
            return;
        }
        self.detach(view);
        let mut stack = alloc::vec![view];
        while let Some(id) = stack.pop() {
            if let Some(node) = self.nodes.remove(&id) {
                stack.extend(node.children);
            }
        }
    }

    fn attach_gestures(&mut self, view: ViewId, gestures: &[GestureKind]) {
        if let Some(n) = self.nodes.get_mut(&view) {
            n.gestures.extend_from_slice(gestures);
        }
    }

    fn detach_gestures(&mut self, view: ViewId) {
        if let Some(n) = self.nodes.get_mut(&view) {
            n.gestures.clear();
        }
    }
}

impl Presenter for HeadlessHost {
    fn present(&mut self) -> ViewId {
        let root = self.create_container(self.window);
        self.calls.push(PresenterCall::Present(root));
        root
    }

    fn dismiss(&mut self, root: ViewId) {
        self.calls.push(PresenterCall::Dismiss(root));
    }

    fn complete_transition(&mut self, finished: bool) {
        self.calls.push(PresenterCall::Complete(finished));
    }

    fn did_dismiss(&mut self) {
        self.calls.push(PresenterCall::DidDismiss);
    }
}
