// Copyright 2025 the Render Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry and scale model for one zoom direction.
//!
//! A [`RenderState`] names the views taking part in a zoom:
//!
//! - the *initial* view, hidden while the transition runs;
//! - the *zoomed-out* (baseline) view whose size is the scale divisor;
//! - the *listening* view that carries the gesture recognizers;
//! - the *transition* view, a bitmap replica that gestures transform.
//!
//! The replica is produced lazily by [`RenderState::transition_view`] and
//! cached; a state never snapshots twice. Flipping direction does not mutate
//! a state: [`RenderState::zoom_out`] builds a new one that shares the replica.
//!
//! ## Dominant axis
//!
//! Scale is measured along a single axis. When the initial view is wider,
//! relative to its height, than the destination is, the destination bounds the
//! zoom horizontally and widths drive the ratio; otherwise heights do.

use kurbo::{Rect, Size};

use crate::gesture::LISTENER_GESTURES;
use crate::host::ViewTree;

/// Tag stored on replica containers so they are never wrapped again.
pub const REPLICA_TAG: i64 = 439;

/// Which way a render state zooms.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum ZoomDirection {
    /// From the source view towards the destination.
    #[default]
    ZoomIn,
    /// From the destination back to the source view.
    ZoomOut,
}

/// Axis along which scale ratios are measured.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Axis {
    /// Widths drive the ratio.
    Horizontal,
    /// Heights drive the ratio.
    Vertical,
}

impl Axis {
    /// Extent of `size` along this axis.
    #[must_use]
    pub fn extent(self, size: Size) -> f64 {
        match self {
            Self::Horizontal => size.width,
            Self::Vertical => size.height,
        }
    }

    /// The other axis.
    #[must_use]
    pub fn cross(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

/// Where the zoomed-in replica ends up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FinalTarget<V> {
    /// A fixed frame in window coordinates.
    Frame(Rect),
    /// The current window frame of a destination view.
    View(V),
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Replica<V> {
    /// Not converted yet; holds the view to convert.
    Pending(V),
    /// A caller-provided replica container, reused as is.
    Ready(V),
    /// A container created by [`convert_for_transition`]; ours to discard.
    Created(V),
}

/// Views and geometry for one zoom direction.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderState<V> {
    initial_view: V,
    zoomed_out_view: V,
    listening_view: V,
    replica: Replica<V>,
    final_target: FinalTarget<V>,
    direction: ZoomDirection,
    min_extent: f64,
}

impl<V: Copy + Eq> RenderState<V> {
    /// Creates a state.
    ///
    /// `transition_view` is converted into a replica on first use.
    /// `min_extent` replaces zero extents in ratios.
    pub fn new(
        initial_view: V,
        listening_view: V,
        transition_view: V,
        base_view: V,
        final_target: FinalTarget<V>,
        direction: ZoomDirection,
        min_extent: f64,
    ) -> Self {
        Self {
            initial_view,
            zoomed_out_view: base_view,
            listening_view,
            replica: Replica::Pending(transition_view),
            final_target,
            direction,
            min_extent,
        }
    }

    /// Builds the zoom-out counterpart of a zoom-in state.
    ///
    /// The result shares the replica, initial view, baseline and final target
    /// of `self` and listens on `listening_view`. A state that already zooms
    /// out is returned unchanged.
    #[must_use]
    pub fn zoom_out(self, listening_view: V) -> Self {
        if self.direction != ZoomDirection::ZoomIn {
            return self;
        }
        Self {
            listening_view,
            direction: ZoomDirection::ZoomOut,
            ..self
        }
    }

    /// Current direction.
    #[must_use]
    pub fn direction(&self) -> ZoomDirection {
        self.direction
    }

    pub(crate) fn set_direction(&mut self, direction: ZoomDirection) {
        self.direction = direction;
    }

    /// The source view hidden during the transition.
    #[must_use]
    pub fn initial_view(&self) -> V {
        self.initial_view
    }

    /// The view whose size is the scale baseline.
    #[must_use]
    pub fn zoomed_out_view(&self) -> V {
        self.zoomed_out_view
    }

    /// The view carrying gesture recognizers.
    #[must_use]
    pub fn listening_view(&self) -> V {
        self.listening_view
    }

    /// Destination of the zoom-in.
    #[must_use]
    pub fn final_target(&self) -> FinalTarget<V> {
        self.final_target
    }

    /// The replica if it has been created.
    #[must_use]
    pub fn replica(&self) -> Option<V> {
        match self.replica {
            Replica::Ready(view) | Replica::Created(view) => Some(view),
            Replica::Pending(_) => None,
        }
    }

    /// The replica if this state created it rather than reusing a tagged
    /// container.
    pub(crate) fn created_replica(&self) -> Option<V> {
        match self.replica {
            Replica::Created(view) => Some(view),
            Replica::Pending(_) | Replica::Ready(_) => None,
        }
    }

    /// Returns the replica, converting the transition view on first call.
    pub fn transition_view<T>(&mut self, tree: &mut T) -> V
    where
        T: ViewTree<View = V> + ?Sized,
    {
        match self.replica {
            Replica::Ready(view) | Replica::Created(view) => view,
            Replica::Pending(source) => {
                let view = convert_for_transition(tree, source);
                self.replica = if view == source {
                    Replica::Ready(view)
                } else {
                    Replica::Created(view)
                };
                view
            }
        }
    }

    /// The view geometry is currently read from: the replica once it exists,
    /// the unconverted transition view before that.
    fn measured_view(&self) -> V {
        match self.replica {
            Replica::Pending(view) | Replica::Ready(view) | Replica::Created(view) => view,
        }
    }

    /// Final frame in window coordinates.
    pub fn final_frame<T>(&self, tree: &T) -> Rect
    where
        T: ViewTree<View = V> + ?Sized,
    {
        match self.final_target {
            FinalTarget::Frame(frame) => frame,
            FinalTarget::View(view) => tree.window_frame(view),
        }
    }

    /// Whether the initial view is wider, relative to its height, than the
    /// destination.
    pub fn is_landscape<T>(&self, tree: &T) -> bool
    where
        T: ViewTree<View = V> + ?Sized,
    {
        let initial = tree.frame(self.initial_view).size();
        let target = self.final_frame(tree).size();
        let initial_ratio = initial.width / self.floor(initial.height);
        let target_ratio = target.width / self.floor(target.height);
        initial_ratio > target_ratio
    }

    /// Axis that drives scale ratios.
    pub fn axis<T>(&self, tree: &T) -> Axis
    where
        T: ViewTree<View = V> + ?Sized,
    {
        if self.is_landscape(tree) {
            Axis::Horizontal
        } else {
            Axis::Vertical
        }
    }

    /// Size the current direction zooms towards.
    pub fn to_size<T>(&self, tree: &T) -> Size
    where
        T: ViewTree<View = V> + ?Sized,
    {
        match self.direction {
            ZoomDirection::ZoomIn => self.final_frame(tree).size(),
            ZoomDirection::ZoomOut => tree.frame(self.zoomed_out_view).size(),
        }
    }

    /// Current replica extent over baseline extent along the dominant axis.
    pub fn scale<T>(&self, tree: &T) -> f64
    where
        T: ViewTree<View = V> + ?Sized,
    {
        let axis = self.axis(tree);
        let current = axis.extent(tree.frame(self.measured_view()).size());
        current / self.baseline_extent(tree, axis)
    }

    /// Scale at which the current direction is complete.
    pub fn final_scale<T>(&self, tree: &T) -> f64
    where
        T: ViewTree<View = V> + ?Sized,
    {
        let axis = self.axis(tree);
        axis.extent(self.to_size(tree)) / self.baseline_extent(tree, axis)
    }

    fn baseline_extent<T>(&self, tree: &T, axis: Axis) -> f64
    where
        T: ViewTree<View = V> + ?Sized,
    {
        self.floor(axis.extent(tree.frame(self.zoomed_out_view).size()))
    }

    fn floor(&self, extent: f64) -> f64 {
        if extent == 0.0 { self.min_extent } else { extent }
    }

    /// Materializes the replica and hides the initial view.
    pub fn starts_zoom_in<T>(&mut self, tree: &mut T)
    where
        T: ViewTree<View = V> + ?Sized,
    {
        self.transition_view(tree);
        tree.set_hidden(self.initial_view, true);
    }

    /// Detaches the recognizers once a zoom-in has finished.
    pub fn ends_zoom_in<T>(&self, tree: &mut T)
    where
        T: ViewTree<View = V> + ?Sized,
    {
        self.remove_listeners(tree);
    }

    /// Detaches the recognizers and shows the initial view again.
    pub fn ends_zoom_out<T>(&self, tree: &mut T)
    where
        T: ViewTree<View = V> + ?Sized,
    {
        self.remove_listeners(tree);
        tree.set_hidden(self.initial_view, false);
    }

    /// Removes every recognizer from the listening view.
    pub fn remove_listeners<T>(&self, tree: &mut T)
    where
        T: ViewTree<View = V> + ?Sized,
    {
        tree.detach_gestures(self.listening_view);
    }

    /// Detaches recognizers from the listening view, then attaches the
    /// pinch/rotation/pan set.
    pub fn listen<T>(&self, tree: &mut T)
    where
        T: ViewTree<View = V> + ?Sized,
    {
        self.remove_listeners(tree);
        tree.attach_gestures(self.listening_view, &LISTENER_GESTURES);
    }
}

/// Returns a replica container for `view`.
///
/// A container already tagged with [`REPLICA_TAG`] is moved to its window
/// frame and reused. Anything else is snapshotted without a redraw, wrapped in
/// a fresh unclipped container at the view's window frame, and tagged.
pub fn convert_for_transition<T: ViewTree + ?Sized>(tree: &mut T, view: T::View) -> T::View {
    if tree.tag(view) == Some(REPLICA_TAG) {
        let frame = tree.window_frame(view);
        tree.set_frame(view, frame);
        return view;
    }
    let frame = tree.window_frame(view);
    let snapshot = tree.snapshot(view, false);
    let container = tree.create_container(frame);
    tree.set_clips_to_bounds(container, false);
    tree.set_frame(snapshot, Rect::from_origin_size((0.0, 0.0), frame.size()));
    tree.add_subview(container, snapshot);
    tree.set_tag(container, Some(REPLICA_TAG));
    container
}
