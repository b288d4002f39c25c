// Copyright 2025 the Render Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pinch a photo open, then pinch it closed again.
//!
//! Run:
//! - `cargo run -p render_zoom_demos --example pinch_to_present`

use render_zoom::{GestureState, PinchGesture, ViewTree, ZoomConfig, ZoomSession};
use render_zoom_demos::{init_tracing, photo_scene, run_stages, start_transition};

fn main() {
    init_tracing();
    let (mut host, photo) = photo_scene();
    let mut session = ZoomSession::new(ZoomConfig::default());
    if let Err(err) = session.zoom_in_view(&mut host, photo) {
        tracing::error!(%err, "could not arm the photo");
        return;
    }

    // Pinch open in small increments, like a recognizer would report them.
    session.handle_pinch(&mut host, &mut PinchGesture::new(GestureState::Began, 1.0));
    let first = start_transition(&mut host, &mut session);
    for _ in 0..6 {
        let outcome =
            session.handle_pinch(&mut host, &mut PinchGesture::new(GestureState::Changed, 1.08));
        tracing::info!(?outcome, "pinch");
    }
    let released = session.handle_pinch(
        &mut host,
        &mut PinchGesture::new(GestureState::Ended, 1.0).with_velocity(4.0),
    );
    tracing::info!(?released, "released");
    run_stages(&mut host, &mut session, first);
    tracing::info!(phase = ?session.phase(), "zoomed in");

    // Now pinch the presented replica closed.
    session.handle_pinch(&mut host, &mut PinchGesture::new(GestureState::Began, 1.0));
    let first = start_transition(&mut host, &mut session);
    session.handle_pinch(&mut host, &mut PinchGesture::new(GestureState::Changed, 0.3));
    session.handle_pinch(&mut host, &mut PinchGesture::new(GestureState::Ended, 1.0));
    run_stages(&mut host, &mut session, first);

    tracing::info!(
        phase = ?session.phase(),
        photo_hidden = host.is_hidden(photo),
        "zoomed out"
    );
}
