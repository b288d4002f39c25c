// Copyright 2025 the Render Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Render Zoom: headless pinch-to-zoom view transitions.
//!
//! A source view is pinched, rotated and panned until it morphs into a
//! full-window destination screen, and pinched back down to dismiss it. This
//! crate holds the part of that interaction with real logic:
//!
//! - [`RenderState`]: the geometry and scale model. It measures the replica
//!   against a baseline view along an orientation-aware axis and knows the
//!   scale at which a zoom is complete.
//! - [`gesture`]: pinch/rotation/pan increments to transforms, and scale to a
//!   normalized progress, completion decision and release velocity.
//! - [`ZoomSession`]: the present/dismiss state machine that feeds a percent
//!   driver, commits or cancels on release and sequences the animation stages.
//! - [`layout`]: the destination scroll container geometry.
//!
//! It does **not** own a view hierarchy, a renderer or an animation clock.
//! Hosts implement [`ViewTree`] and [`Presenter`] over their toolkit, forward
//! recognizer callbacks to the session, run each returned [`AnimationStage`]
//! and report back through [`ZoomSession::complete_stage`]. The
//! [`headless`] module provides an in-memory host.
//!
//! ## Example
//!
//! ```rust
//! use kurbo::Rect;
//! use render_zoom::headless::HeadlessHost;
//! use render_zoom::{
//!     AnimationStage, GestureState, Phase, PinchGesture, TransitionContext, ViewTree,
//!     ZoomConfig, ZoomSession,
//! };
//!
//! let mut host = HeadlessHost::new(Rect::new(0.0, 0.0, 400.0, 400.0));
//! let photo = host.add_view(Some(host.root()), Rect::new(150.0, 150.0, 250.0, 250.0));
//!
//! let mut session = ZoomSession::new(ZoomConfig::default());
//! session.zoom_in_view(&mut host, photo).unwrap();
//!
//! // Pinch open past the 1.3x threshold.
//! session.handle_pinch(&mut host, &mut PinchGesture::new(GestureState::Began, 1.0));
//! let cx = TransitionContext::new(host.root(), host.window_bounds());
//! session.animate_transition(&mut host, cx).unwrap();
//! session.handle_pinch(&mut host, &mut PinchGesture::new(GestureState::Changed, 1.5));
//! session.handle_pinch(&mut host, &mut PinchGesture::new(GestureState::Ended, 1.0));
//!
//! // The host animates each stage, then reports completion.
//! let settle = session.complete_stage(&mut host).unwrap();
//! assert!(matches!(settle, Some(AnimationStage::Settle { .. })));
//! assert_eq!(session.complete_stage(&mut host).unwrap(), None);
//! assert_eq!(session.phase(), Phase::Presented);
//! ```
//!
//! ## Features
//!
//! - `std` (default): build Kurbo with `std`.
//! - `libm`: build Kurbo with `libm` for `no_std` targets.
//! - `tracing` (default): emit `tracing` events for phase changes and gesture
//!   updates.
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod config;
mod error;
mod host;
mod renders;
mod session;

pub mod driver;
pub mod gesture;
pub mod headless;
pub mod layout;

pub use config::ZoomConfig;
pub use error::ZoomError;
pub use gesture::{
    GestureKind, GestureOutcome, GestureState, PanGesture, PinchGesture, RotationGesture,
};
pub use host::{Presenter, TransitionContext, ViewTree};
pub use renders::{
    Axis, FinalTarget, REPLICA_TAG, RenderState, ZoomDirection, convert_for_transition,
};
pub use session::{AnimationStage, Destination, Phase, Transit, ZoomInRequest, ZoomSession};
