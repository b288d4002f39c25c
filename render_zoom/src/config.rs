// Copyright 2025 the Render Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tunable constants for a [`ZoomSession`](crate::ZoomSession).

/// Thresholds, durations and layout margins used by a zoom session.
///
/// All fields are public so hosts can tweak a single value without going
/// through a builder; the `with_*` helpers exist for chained construction.
///
/// ```
/// use render_zoom::ZoomConfig;
///
/// let config = ZoomConfig::default().with_thresholds(1.5, 1.8);
/// assert_eq!(config.zoom_in_threshold, 1.5);
/// assert_eq!(config.bounce_margin, 30.0);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomConfig {
    /// A zoom-in release commits when the scale is strictly above this.
    pub zoom_in_threshold: f64,
    /// A zoom-out release commits when the scale is strictly below this.
    pub zoom_out_threshold: f64,
    /// Extent substituted for a zero-sized baseline when computing ratios.
    pub min_extent: f64,
    /// Denominator substituted when the remaining scale delta is zero.
    pub min_velocity_delta: f64,
    /// Symmetric clamp applied to normalized exit velocities.
    pub velocity_clamp: f64,
    /// Raw velocities with a magnitude below this are used unnormalized.
    pub raw_velocity_below: f64,
    /// Transition duration in seconds while gesture driven.
    pub interactive_duration: f64,
    /// Transition duration in seconds for programmatic dismissal.
    pub scripted_duration: f64,
    /// Duration of the spring that settles the replica into the destination.
    pub settle_duration: f64,
    /// Damping ratio of the settle spring.
    pub settle_damping: f64,
    /// Duration of the final snap back over the source view.
    pub restore_duration: f64,
    /// Opacity the destination backdrop fades to while presenting.
    pub backdrop_alpha: f64,
    /// Extra scrollable room on the axis perpendicular to the zoom axis.
    pub bounce_margin: f64,
    /// Leading inset of the replica inside the render container.
    pub content_inset: f64,
}

impl Default for ZoomConfig {
    fn default() -> Self {
        Self {
            zoom_in_threshold: 1.3,
            zoom_out_threshold: 1.9,
            min_extent: 0.1,
            min_velocity_delta: 0.1,
            velocity_clamp: 20.0,
            raw_velocity_below: 3.0,
            interactive_duration: 0.7,
            scripted_duration: 0.5,
            settle_duration: 0.2,
            settle_damping: 1.0,
            restore_duration: 0.2,
            backdrop_alpha: 0.8,
            bounce_margin: 30.0,
            content_inset: 15.0,
        }
    }
}

impl ZoomConfig {
    /// Sets the zoom-in and zoom-out completion thresholds.
    #[must_use]
    pub fn with_thresholds(mut self, zoom_in: f64, zoom_out: f64) -> Self {
        self.zoom_in_threshold = zoom_in;
        self.zoom_out_threshold = zoom_out;
        self
    }

    /// Sets the interactive and scripted transition durations.
    #[must_use]
    pub fn with_durations(mut self, interactive: f64, scripted: f64) -> Self {
        self.interactive_duration = interactive;
        self.scripted_duration = scripted;
        self
    }

    /// Sets the bounce margin and content inset of the render container.
    #[must_use]
    pub fn with_container_margins(mut self, bounce_margin: f64, content_inset: f64) -> Self {
        self.bounce_margin = bounce_margin;
        self.content_inset = content_inset;
        self
    }

    /// Sets the backdrop opacity reached when the destination is presented.
    #[must_use]
    pub fn with_backdrop_alpha(mut self, alpha: f64) -> Self {
        self.backdrop_alpha = alpha;
        self
    }
}
