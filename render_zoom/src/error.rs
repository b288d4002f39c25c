// Copyright 2025 the Render Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use thiserror::Error;

/// Lifecycle misuse reported by [`ZoomSession`](crate::ZoomSession).
///
/// Gesture handlers never return these; they report
/// [`GestureOutcome::Ignored`](crate::GestureOutcome::Ignored) instead.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum ZoomError {
    /// A transition is running, or an animation stage is still pending.
    #[error("a zoom transition is already in flight")]
    TransitionInFlight,
    /// No zoom-in has been armed on this session.
    #[error("the session has not been armed with a zoom-in")]
    NotArmed,
    /// The operation needs the destination to be presented.
    #[error("the destination is not presented")]
    NotPresented,
    /// The operation needs a running present or dismiss transition.
    #[error("no present or dismiss transition is running")]
    NoTransition,
    /// No animation stage is waiting for completion.
    #[error("no animation stage is pending")]
    NoPendingStage,
    /// The gesture driving the transition has not been released yet.
    #[error("the interactive transition has not been finished or cancelled")]
    Undecided,
}
