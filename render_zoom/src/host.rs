// Copyright 2025 the Render Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Host seams: the view tree and the modal presenter a session drives.
//!
//! The crate never owns views. Hosts hand out cheap `Copy` handles and
//! implement [`ViewTree`] over their own retained tree; a session only stores
//! those handles, so dropping a view on the host side never leaves a dangling
//! owner here. [`Presenter`] adds the modal present/dismiss half.
//!
//! ## Geometry conventions
//!
//! - A view has an untransformed size, a `center` in its parent's coordinate
//!   space and an [`Affine`] applied about that center.
//! - [`ViewTree::frame`] is the axis-aligned bounding box of the transformed
//!   view in its parent's coordinates.
//! - [`ViewTree::set_frame`] sets the center and untransformed size so that
//!   the view covers `frame` under an identity transform. Callers reset the
//!   transform first when they need the frame to be exact.

use core::fmt::Debug;

use kurbo::{Affine, Point, Rect};

use crate::gesture::GestureKind;

/// Retained view operations needed by the zoom transition.
pub trait ViewTree {
    /// Handle identifying a view in the host's tree.
    type View: Copy + Eq + Debug;

    /// Bounds of the window (or screen) the transition runs in.
    fn window_bounds(&self) -> Rect;

    /// Bounding box of `view` in its parent's coordinates.
    fn frame(&self, view: Self::View) -> Rect;

    /// Bounding box of `view` in window coordinates.
    fn window_frame(&self, view: Self::View) -> Rect;

    /// Places `view` so that it covers `frame` under an identity transform.
    fn set_frame(&mut self, view: Self::View, frame: Rect);

    /// Center of `view` in its parent's coordinates.
    fn center(&self, view: Self::View) -> Point;

    /// Moves the center of `view`.
    fn set_center(&mut self, view: Self::View, center: Point);

    /// Transform applied about the center of `view`.
    fn transform(&self, view: Self::View) -> Affine;

    /// Replaces the transform of `view`.
    fn set_transform(&mut self, view: Self::View, transform: Affine);

    /// Whether `view` is hidden.
    fn is_hidden(&self, view: Self::View) -> bool;

    /// Hides or shows `view`.
    fn set_hidden(&mut self, view: Self::View, hidden: bool);

    /// Sets the opacity of `view`.
    fn set_alpha(&mut self, view: Self::View, alpha: f64);

    /// Integer tag stored on `view`, if any.
    fn tag(&self, view: Self::View) -> Option<i64>;

    /// Stores or clears the integer tag on `view`.
    fn set_tag(&mut self, view: Self::View, tag: Option<i64>);

    /// Captures the current contents of `view` into a new, detached,
    /// bitmap-backed view of the same size.
    ///
    /// When `after_screen_updates` is `false` the host must not force a
    /// redraw before capturing.
    fn snapshot(&mut self, view: Self::View, after_screen_updates: bool) -> Self::View;

    /// Creates an empty, detached container view covering `frame`.
    fn create_container(&mut self, frame: Rect) -> Self::View;

    /// Whether `view` clips its subviews.
    fn set_clips_to_bounds(&mut self, view: Self::View, clips: bool);

    /// Appends `child` to `parent`, detaching it from any previous parent.
    ///
    /// Like most retained trees the child keeps its parent-relative frame.
    fn add_subview(&mut self, parent: Self::View, child: Self::View);

    /// Detaches `view` from its parent. No-op for detached views.
    fn remove_from_parent(&mut self, view: Self::View);

    /// Detaches `view` for good. The session calls this for views it created
    /// and will not use again; hosts that own view storage free the subtree.
    fn discard(&mut self, view: Self::View) {
        self.remove_from_parent(view);
    }

    /// Attaches gesture recognizers for `gestures` to `view`.
    ///
    /// All recognizers attached through this call recognize simultaneously.
    fn attach_gestures(&mut self, view: Self::View, gestures: &[GestureKind]);

    /// Removes every gesture recognizer attached to `view`.
    fn detach_gestures(&mut self, view: Self::View);
}

/// Modal presentation half of the host.
///
/// A session calls [`present`](Self::present) when a zoom-in pinch begins and
/// [`dismiss`](Self::dismiss) when a zoom-out pinch begins or the destination
/// is dismissed programmatically. The host then starts its transition
/// machinery and calls
/// [`ZoomSession::animate_transition`](crate::ZoomSession::animate_transition)
/// with a [`TransitionContext`].
pub trait Presenter: ViewTree {
    /// Creates the destination screen's root view and begins presenting it
    /// over the current context.
    fn present(&mut self) -> Self::View;

    /// Begins dismissing the destination screen rooted at `root`.
    fn dismiss(&mut self, root: Self::View);

    /// Ends the host transition; `finished` is `false` when it was cancelled.
    fn complete_transition(&mut self, finished: bool);

    /// Called once the destination has been torn down after a dismissal.
    fn did_dismiss(&mut self) {}
}

/// What the host hands to a session when its transition starts animating.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TransitionContext<V> {
    /// View that hosts the transition; assumed to sit at the window origin.
    pub container: V,
    /// Final frame of the destination root.
    pub final_frame: Rect,
}

impl<V> TransitionContext<V> {
    /// Creates a context for `container` with the destination's final frame.
    pub fn new(container: V, final_frame: Rect) -> Self {
        Self {
            container,
            final_frame,
        }
    }
}

/// Moves `view` under `parent` while keeping its on-screen position.
pub(crate) fn reparent_in_place<T: ViewTree + ?Sized>(tree: &mut T, parent: T::View, view: T::View) {
    let before = tree.window_frame(view).origin();
    tree.add_subview(parent, view);
    let after = tree.window_frame(view).origin();
    let center = tree.center(view);
    tree.set_center(view, center + (before - after));
}
