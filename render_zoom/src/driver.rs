// Copyright 2025 the Render Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Percent driver: gesture-fed progress that is later finished or cancelled.
//!
//! The driver mirrors the usual "percent driven interactive transition"
//! contract. While undecided, [`PercentDriver::update`] scrubs the transition
//! to a fraction in `[0, 1]`. Releasing the gesture calls either
//! [`PercentDriver::finish`] or [`PercentDriver::cancel`]; once decided, the
//! driver ignores further updates and the decision is read back by the
//! animation completion that follows.
//!
//! ```
//! use render_zoom::driver::{DriverOutcome, PercentDriver};
//!
//! let mut driver = PercentDriver::new();
//! driver.update(0.4);
//! driver.update(1.7);
//! assert_eq!(driver.progress(), 1.0);
//!
//! driver.cancel();
//! driver.update(0.2);
//! assert_eq!(driver.outcome(), Some(DriverOutcome::Cancelled));
//! assert_eq!(driver.progress(), 1.0);
//! ```

/// How an interactive transition was released.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DriverOutcome {
    /// The transition runs to completion.
    Finished,
    /// The transition reverts to where it started.
    Cancelled,
}

/// Fraction-complete tracker for an interactive transition.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PercentDriver {
    progress: f64,
    outcome: Option<DriverOutcome>,
}

impl PercentDriver {
    /// Creates an undecided driver at zero progress.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a driver that is already finished, for non-interactive runs.
    #[must_use]
    pub fn finished() -> Self {
        Self {
            progress: 1.0,
            outcome: Some(DriverOutcome::Finished),
        }
    }

    /// Moves the transition to `progress`, clamped into `[0, 1]`.
    ///
    /// Ignored once the driver has been finished or cancelled, and for NaN.
    pub fn update(&mut self, progress: f64) {
        if self.outcome.is_some() || progress.is_nan() {
            return;
        }
        self.progress = progress.clamp(0.0, 1.0);
    }

    /// Commits the transition.
    pub fn finish(&mut self) {
        if self.outcome.is_none() {
            self.outcome = Some(DriverOutcome::Finished);
        }
    }

    /// Reverts the transition.
    pub fn cancel(&mut self) {
        if self.outcome.is_none() {
            self.outcome = Some(DriverOutcome::Cancelled);
        }
    }

    /// Last progress value accepted by [`update`](Self::update).
    #[must_use]
    pub fn progress(&self) -> f64 {
        self.progress
    }

    /// The release decision, if one was made.
    #[must_use]
    pub fn outcome(&self) -> Option<DriverOutcome> {
        self.outcome
    }

    /// Returns `true` once [`cancel`](Self::cancel) has been called.
    #[must_use]
    pub fn was_cancelled(&self) -> bool {
        self.outcome == Some(DriverOutcome::Cancelled)
    }
}
