// Copyright 2025 the Render Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared helpers for the Render Zoom demos.
//!
//! Run a demo with `RUST_LOG=render_zoom=trace` to see the session's events:
//! - `cargo run -p render_zoom_demos --example pinch_to_present`

use kurbo::Rect;
use render_zoom::headless::{HeadlessHost, ViewId};
use render_zoom::{AnimationStage, TransitionContext, ViewTree, ZoomSession};
use tracing_subscriber::EnvFilter;

/// Installs a `fmt` subscriber filtered by `RUST_LOG`, defaulting to `debug`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// A phone-sized window with one photo tile attached to the root.
pub fn photo_scene() -> (HeadlessHost, ViewId) {
    let mut host = HeadlessHost::new(Rect::new(0.0, 0.0, 375.0, 667.0));
    let feed = host.add_view(Some(host.root()), Rect::new(0.0, 64.0, 375.0, 667.0));
    let photo = host.add_view(Some(feed), Rect::new(20.0, 100.0, 180.0, 220.0));
    (host, photo)
}

/// Starts the host transition and returns its first stage.
pub fn start_transition(host: &mut HeadlessHost, session: &mut ZoomSession<ViewId>) -> Option<AnimationStage> {
    let cx = TransitionContext::new(host.root(), host.window_bounds());
    match session.animate_transition(host, cx) {
        Ok(stage) => Some(stage),
        Err(err) => {
            tracing::warn!(%err, "transition did not start");
            None
        }
    }
}

/// Completes stages until the session rests, logging each one.
pub fn run_stages(host: &mut HeadlessHost, session: &mut ZoomSession<ViewId>, first: Option<AnimationStage>) {
    let mut stage = first;
    while let Some(current) = stage {
        tracing::info!(?current, "animating");
        stage = match session.complete_stage(host) {
            Ok(next) => next,
            Err(err) => {
                tracing::warn!(%err, "stage could not complete");
                None
            }
        };
    }
}
