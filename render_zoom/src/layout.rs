// Copyright 2025 the Render Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Destination scroll container layout.
//!
//! The zoomed-in replica lives in a scroll container inside the destination
//! screen. The container spans the screen along the cross axis and is as
//! long as the content along the dominant axis, centered on screen. Its
//! content gets [`ZoomConfig::bounce_margin`] of extra room on the cross axis
//! so it can rubber-band, and the initial offset centers the content inside
//! that room.
//!
//! ```
//! use kurbo::{Point, Rect, Size};
//! use render_zoom::layout::ContainerLayout;
//! use render_zoom::{Axis, ZoomConfig};
//!
//! let screen = Size::new(320.0, 640.0);
//! let content = Size::new(320.0, 200.0);
//! let layout = ContainerLayout::compute(screen, content, Axis::Vertical, &ZoomConfig::default());
//!
//! assert_eq!(layout.frame, Rect::new(0.0, 220.0, 320.0, 420.0));
//! assert_eq!(layout.content_size, Size::new(350.0, 200.0));
//! assert_eq!(layout.content_offset, Point::new(15.0, 0.0));
//! ```

use kurbo::{Point, Rect, Size};

use crate::config::ZoomConfig;
use crate::renders::Axis;

/// Frame, content size and initial offset of the render container.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContainerLayout {
    /// Container frame in screen coordinates.
    pub frame: Rect,
    /// Scrollable content size.
    pub content_size: Size,
    /// Initial scroll offset.
    pub content_offset: Point,
    /// Axis the zoom is measured along.
    pub axis: Axis,
}

impl ContainerLayout {
    /// Lays out a container for `content` on a `screen` sized window.
    #[must_use]
    pub fn compute(screen: Size, content: Size, axis: Axis, config: &ZoomConfig) -> Self {
        let margin = config.bounce_margin;
        match axis {
            Axis::Vertical => {
                let frame = Rect::from_origin_size(
                    (0.0, screen.height / 2.0 - content.height / 2.0),
                    (screen.width, content.height),
                );
                let content_size = Size::new(content.width + margin, content.height);
                let offset = content_size.width / 2.0 - frame.width() / 2.0;
                Self {
                    frame,
                    content_size,
                    content_offset: Point::new(offset, 0.0),
                    axis,
                }
            }
            Axis::Horizontal => {
                let frame = Rect::from_origin_size(
                    (screen.width / 2.0 - content.width / 2.0, 0.0),
                    (content.width, screen.height),
                );
                let content_size = Size::new(content.width, content.height + margin);
                let offset = content_size.height / 2.0 - frame.height() / 2.0;
                Self {
                    frame,
                    content_size,
                    content_offset: Point::new(0.0, offset),
                    axis,
                }
            }
        }
    }

    /// Origin of the settled replica inside the container.
    ///
    /// The replica sits `inset` in from the leading edge of the cross axis
    /// and is centered along the dominant axis, where `inner` scaled by
    /// `scale` is compared against `outer`. The centering offset is truncated
    /// to whole points.
    #[must_use]
    pub fn render_origin(&self, inner: Size, outer: Size, scale: f64, inset: f64) -> Point {
        let along = centered_offset(
            self.axis.extent(outer),
            self.axis.extent(inner) * scale,
        );
        match self.axis {
            Axis::Vertical => Point::new(inset, along),
            Axis::Horizontal => Point::new(along, inset),
        }
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "offsets snap to whole points"
)]
fn centered_offset(outer: f64, inner: f64) -> f64 {
    (((outer - inner) / 2.0) as i64) as f64
}
