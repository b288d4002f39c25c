// Copyright 2025 the Render Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Gesture interpretation: incremental pinch/rotate/pan deltas to transforms
//! and a normalized completion progress.
//!
//! Recognizers report *incremental* values. Every `apply_*` helper folds the
//! increment into the replica and then resets it to neutral (scale `1`,
//! rotation `0`, translation zero) so the next callback does not compound
//! the same delta twice.
//!
//! The threshold policy:
//!
//! | Direction | Completes when | Progress |
//! |---|---|---|
//! | zoom in | `scale > zoom_in_threshold` | `min(scale - 1, 1)` |
//! | zoom out | `scale < zoom_out_threshold` | `min(1 / scale, 1)` |
//!
//! ```
//! use render_zoom::gesture::{normalized_velocity, zoom_in_progress};
//! use render_zoom::ZoomConfig;
//!
//! assert_eq!(zoom_in_progress(2.5), 1.0);
//!
//! let config = ZoomConfig::default();
//! // 10 / (2.0 - 1.5) = 20, which is inside the clamp.
//! assert_eq!(normalized_velocity(10.0, 2.0, 1.5, &config), 20.0);
//! // Slow releases keep their raw velocity.
//! assert_eq!(normalized_velocity(2.0, 2.0, 1.5, &config), 2.0);
//! ```

use kurbo::{Affine, Vec2};

use crate::config::ZoomConfig;
use crate::host::ViewTree;
use crate::renders::ZoomDirection;

/// Recognizer kinds a session attaches to its listening view.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum GestureKind {
    /// Two-finger pinch reporting an incremental scale factor.
    Pinch,
    /// Two-finger rotation reporting an incremental angle in radians.
    Rotation,
    /// Pan reporting an incremental translation.
    Pan {
        /// Touches required before the pan recognizes.
        min_touches: u8,
    },
}

/// The recognizers attached by every listen pass.
pub const LISTENER_GESTURES: [GestureKind; 3] = [
    GestureKind::Pinch,
    GestureKind::Rotation,
    GestureKind::Pan { min_touches: 2 },
];

/// Recognizer state as delivered with each callback.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum GestureState {
    /// Not yet recognized.
    #[default]
    Possible,
    /// First callback of a recognized gesture.
    Began,
    /// The gesture moved.
    Changed,
    /// The touches lifted normally.
    Ended,
    /// The system cancelled the gesture.
    Cancelled,
    /// The gesture failed to recognize.
    Failed,
}

/// Pinch callback payload.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinchGesture {
    /// Recognizer state.
    pub state: GestureState,
    /// Scale factor accumulated since the last reset.
    pub scale: f64,
    /// Scale velocity in scale factor per second.
    pub velocity: f64,
}

impl PinchGesture {
    /// A pinch payload in `state` with the given incremental scale.
    #[must_use]
    pub fn new(state: GestureState, scale: f64) -> Self {
        Self {
            state,
            scale,
            velocity: 0.0,
        }
    }

    /// Sets the release velocity.
    #[must_use]
    pub fn with_velocity(mut self, velocity: f64) -> Self {
        self.velocity = velocity;
        self
    }
}

/// Rotation callback payload.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationGesture {
    /// Recognizer state.
    pub state: GestureState,
    /// Rotation in radians accumulated since the last reset.
    pub rotation: f64,
}

/// Pan callback payload.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanGesture {
    /// Recognizer state.
    pub state: GestureState,
    /// Translation accumulated since the last reset.
    pub translation: Vec2,
}

/// What a gesture callback did to the session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GestureOutcome {
    /// Nothing happened: no armed state, wrong phase or irrelevant state.
    Ignored,
    /// A present or dismiss transition was started.
    Started {
        /// `true` for zoom-in, `false` for zoom-out.
        presenting: bool,
    },
    /// The replica moved and the driver progress was updated.
    Progressed {
        /// Progress fed to the percent driver.
        progress: f64,
        /// Whether a release right now would commit.
        should_complete: bool,
    },
    /// A rotation or pan increment was applied to the replica.
    Transformed,
    /// The pinch was released and the transition decided.
    Released {
        /// `true` if the transition commits.
        committed: bool,
        /// Initial velocity for the settling spring.
        velocity: f64,
    },
}

/// Zoom-in progress for `scale`: `scale - 1`, capped at `1` from `2×` on.
///
/// Scales below `1` report `0`.
#[must_use]
pub fn zoom_in_progress(scale: f64) -> f64 {
    let progress = if scale < 2.0 { scale - 1.0 } else { 1.0 };
    progress.max(0.0)
}

/// Zoom-out progress for `scale`: `1 / scale`, capped at `1`.
#[must_use]
pub fn zoom_out_progress(scale: f64) -> f64 {
    if scale <= 0.0 {
        return 1.0;
    }
    (1.0 / scale).min(1.0)
}

/// Progress for `scale` in `direction`.
#[must_use]
pub fn progress_for(direction: ZoomDirection, scale: f64) -> f64 {
    match direction {
        ZoomDirection::ZoomIn => zoom_in_progress(scale),
        ZoomDirection::ZoomOut => zoom_out_progress(scale),
    }
}

/// Completion threshold for `direction`.
#[must_use]
pub fn completion_threshold(direction: ZoomDirection, config: &ZoomConfig) -> f64 {
    match direction {
        ZoomDirection::ZoomIn => config.zoom_in_threshold,
        ZoomDirection::ZoomOut => config.zoom_out_threshold,
    }
}

/// Whether releasing at `scale` commits the transition. Boundaries are excluded.
#[must_use]
pub fn should_complete(direction: ZoomDirection, scale: f64, config: &ZoomConfig) -> bool {
    let threshold = completion_threshold(direction, config);
    match direction {
        ZoomDirection::ZoomIn => scale > threshold,
        ZoomDirection::ZoomOut => scale < threshold,
    }
}

/// Normalizes a pinch release velocity against the scale still to travel.
///
/// `velocity / (final_scale - scale)`, with `min_velocity_delta` substituted
/// for a vanishing delta, clamped to `±|velocity_clamp|`. Releases slower than
/// `raw_velocity_below` return `velocity` unchanged. Non-finite results are 0.
#[must_use]
pub fn normalized_velocity(velocity: f64, final_scale: f64, scale: f64, config: &ZoomConfig) -> f64 {
    if !velocity.is_finite() {
        return 0.0;
    }
    if velocity.abs() < config.raw_velocity_below {
        return velocity;
    }
    let delta = final_scale - scale;
    let delta = if delta.abs() < f64::EPSILON {
        config.min_velocity_delta
    } else {
        delta
    };
    let normalized = velocity / delta;
    if !normalized.is_finite() {
        return 0.0;
    }
    let limit = config.velocity_clamp.abs();
    if limit.is_nan() {
        return normalized;
    }
    normalized.clamp(-limit, limit)
}

/// Folds the pinch increment into `view`'s transform and resets it to `1`.
pub fn apply_pinch<T: ViewTree + ?Sized>(tree: &mut T, view: T::View, pinch: &mut PinchGesture) {
    let transform = tree.transform(view) * Affine::scale(pinch.scale);
    tree.set_transform(view, transform);
    pinch.scale = 1.0;
}

/// Folds the rotation increment into `view`'s transform and resets it to `0`.
pub fn apply_rotation<T: ViewTree + ?Sized>(
    tree: &mut T,
    view: T::View,
    rotation: &mut RotationGesture,
) {
    let transform = tree.transform(view) * Affine::rotate(rotation.rotation);
    tree.set_transform(view, transform);
    rotation.rotation = 0.0;
}

/// Moves `view`'s center by the pan increment and resets it to zero.
pub fn apply_pan<T: ViewTree + ?Sized>(tree: &mut T, view: T::View, pan: &mut PanGesture) {
    let center = tree.center(view);
    tree.set_center(view, center + pan.translation);
    pan.translation = Vec2::ZERO;
}
