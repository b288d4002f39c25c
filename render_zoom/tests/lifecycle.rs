// Copyright 2025 the Render Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! End-to-end zoom sessions driven through the headless host.
//!
//! Every test arms a 100×100 source view in the middle of a 400×400 window, so
//! the destination is four times the baseline and heights drive the scale.

use kurbo::{Rect, Vec2};
use render_zoom::gesture::LISTENER_GESTURES;
use render_zoom::headless::{HeadlessHost, PresenterCall, ViewId};
use render_zoom::{
    AnimationStage, GestureOutcome, GestureState, PanGesture, Phase, PinchGesture,
    TransitionContext, ViewTree, ZoomConfig, ZoomDirection, ZoomSession,
};

struct Scene {
    host: HeadlessHost,
    session: ZoomSession<ViewId>,
    source: ViewId,
}

impl Scene {
    fn new() -> Self {
        let mut host = HeadlessHost::new(Rect::new(0.0, 0.0, 400.0, 400.0));
        let source = host.add_view(Some(host.root()), Rect::new(150.0, 150.0, 250.0, 250.0));
        let mut session = ZoomSession::new(ZoomConfig::default());
        session.zoom_in_view(&mut host, source).unwrap();
        Self {
            host,
            session,
            source,
        }
    }

    fn pinch(&mut self, state: GestureState, scale: f64, velocity: f64) -> GestureOutcome {
        let mut pinch = PinchGesture::new(state, scale).with_velocity(velocity);
        let outcome = self.session.handle_pinch(&mut self.host, &mut pinch);
        if state == GestureState::Changed && outcome != GestureOutcome::Ignored {
            assert_eq!(pinch.scale, 1.0, "pinch increment is consumed");
        }
        outcome
    }

    fn animate(&mut self) -> AnimationStage {
        let cx = TransitionContext::new(self.host.root(), self.host.window_bounds());
        self.session.animate_transition(&mut self.host, cx).unwrap()
    }

    fn complete(&mut self) -> Option<AnimationStage> {
        self.session.complete_stage(&mut self.host).unwrap()
    }

    fn replica(&self) -> ViewId {
        self.session.renders().unwrap().replica().unwrap()
    }

    fn root(&self) -> ViewId {
        self.session.destination().unwrap().root
    }

    /// Pinches the source open to 1.4× and lets every stage finish.
    fn present(&mut self) {
        self.pinch(GestureState::Began, 1.0, 0.0);
        self.animate();
        self.pinch(GestureState::Changed, 1.4, 0.0);
        self.pinch(GestureState::Ended, 1.0, 0.0);
        while self.complete().is_some() {}
        assert_eq!(self.session.phase(), Phase::Presented);
    }
}

#[test]
fn arming_attaches_recognizers_to_source() {
    let scene = Scene::new();
    assert_eq!(scene.host.gestures(scene.source), &LISTENER_GESTURES);
    assert_eq!(scene.session.listening_view(), Some(scene.source));
    assert_eq!(scene.session.phase(), Phase::Idle);
    assert!(scene.session.is_presenting());
}

#[test]
fn pinch_past_threshold_commits_zoom_in() {
    let mut scene = Scene::new();

    assert_eq!(
        scene.pinch(GestureState::Began, 1.0, 0.0),
        GestureOutcome::Started { presenting: true }
    );
    let stage = scene.animate();
    assert_eq!(
        stage,
        AnimationStage::RevealBackdrop {
            duration: 0.7,
            alpha: 0.8
        }
    );
    assert!(scene.session.is_transitioning());

    let GestureOutcome::Progressed {
        progress,
        should_complete,
    } = scene.pinch(GestureState::Changed, 1.4, 0.0)
    else {
        panic!("pinch should progress the transition");
    };
    assert!((progress - 0.4).abs() < 1e-9);
    assert!(should_complete);

    let GestureOutcome::Released {
        committed,
        velocity,
    } = scene.pinch(GestureState::Ended, 1.0, 5.0)
    else {
        panic!("release should decide the transition");
    };
    assert!(committed);
    // 5 / (4.0 - 1.4)
    assert!((velocity - 5.0 / 2.6).abs() < 1e-9);

    let Some(AnimationStage::Settle {
        frame,
        velocity: spring,
        ..
    }) = scene.complete()
    else {
        panic!("a committed zoom-in settles into the destination");
    };
    assert_eq!(frame, Rect::new(0.0, 0.0, 400.0, 400.0));
    assert!((spring - velocity).abs() < 1e-12);
    assert_eq!(scene.session.phase(), Phase::Presented);
    assert!(scene.host.gestures(scene.source).is_empty());

    assert_eq!(scene.complete(), None);

    let replica = scene.replica();
    let destination = *scene.session.destination().unwrap();
    assert!(scene.host.is_visible(destination.root));
    assert!(scene.host.is_hidden(scene.source));
    assert_eq!(scene.host.parent(replica), Some(destination.render_container));
    assert_eq!(scene.host.frame(replica), Rect::new(15.0, 0.0, 415.0, 400.0));
    assert_eq!(scene.host.listening_views(), vec![replica]);
    assert_eq!(scene.host.gestures(replica), &LISTENER_GESTURES);
    assert_eq!(
        scene.session.renders().unwrap().direction(),
        ZoomDirection::ZoomOut
    );
    assert_eq!(
        scene.host.calls(),
        &[
            PresenterCall::Present(destination.root),
            PresenterCall::Complete(true)
        ]
    );
}

#[test]
fn pinch_below_threshold_cancels_zoom_in() {
    let mut scene = Scene::new();
    scene.pinch(GestureState::Began, 1.0, 0.0);
    scene.animate();
    let root = scene.root();

    let GestureOutcome::Progressed {
        progress,
        should_complete,
    } = scene.pinch(GestureState::Changed, 1.2, 0.0)
    else {
        panic!("pinch should progress the transition");
    };
    assert!((progress - 0.2).abs() < 1e-9);
    assert!(!should_complete);
    assert!(matches!(
        scene.pinch(GestureState::Ended, 1.0, 0.0),
        GestureOutcome::Released {
            committed: false,
            ..
        }
    ));
    assert_eq!(scene.complete(), None);

    assert_eq!(scene.session.phase(), Phase::Idle);
    assert!(scene.session.destination().is_none());
    assert!(!scene.host.is_visible(root));
    assert!(scene.host.is_visible(scene.source));
    assert_eq!(scene.host.listening_views(), vec![scene.source]);
    assert_eq!(
        scene.host.calls(),
        &[PresenterCall::Present(root), PresenterCall::Complete(false)]
    );
}

#[test]
fn cancelled_recognizer_reverts_even_past_threshold() {
    let mut scene = Scene::new();
    scene.pinch(GestureState::Began, 1.0, 0.0);
    scene.animate();
    scene.pinch(GestureState::Changed, 1.8, 0.0);
    assert!(matches!(
        scene.pinch(GestureState::Cancelled, 1.0, 0.0),
        GestureOutcome::Released {
            committed: false,
            ..
        }
    ));
    assert_eq!(scene.complete(), None);
    assert_eq!(scene.session.phase(), Phase::Idle);
}

#[test]
fn second_attempt_reuses_the_replica() {
    let mut scene = Scene::new();
    scene.pinch(GestureState::Began, 1.0, 0.0);
    scene.animate();
    scene.pinch(GestureState::Changed, 1.1, 0.0);
    scene.pinch(GestureState::Ended, 1.0, 0.0);
    scene.complete();
    let first = scene.replica();
    assert_eq!(scene.host.frame(first), Rect::new(150.0, 150.0, 250.0, 250.0));

    scene.present();
    assert_eq!(scene.replica(), first);
    assert_eq!(scene.host.snapshot_count(), 1);
}

#[test]
fn pan_moves_replica_only_while_animating() {
    let mut scene = Scene::new();
    scene.pinch(GestureState::Began, 1.0, 0.0);
    let mut pan = PanGesture {
        state: GestureState::Changed,
        translation: Vec2::new(10.0, -5.0),
    };
    assert_eq!(
        scene.session.handle_pan(&mut scene.host, &mut pan),
        GestureOutcome::Ignored
    );

    scene.animate();
    let replica = scene.replica();
    let before = scene.host.center(replica);
    assert_eq!(
        scene.session.handle_pan(&mut scene.host, &mut pan),
        GestureOutcome::Transformed
    );
    assert_eq!(scene.host.center(replica), before + Vec2::new(10.0, -5.0));
    assert_eq!(pan.translation, Vec2::ZERO);
}

#[test]
fn pinch_in_commits_zoom_out() {
    let mut scene = Scene::new();
    scene.present();
    let root = scene.root();

    assert_eq!(
        scene.pinch(GestureState::Began, 1.0, 0.0),
        GestureOutcome::Started { presenting: false }
    );
    assert!(!scene.session.is_presenting());
    assert_eq!(scene.session.completion_threshold(), 1.9);
    assert!(matches!(
        scene.animate(),
        AnimationStage::Retreat { duration, .. } if duration == 0.7
    ));

    // 400 * 0.4 = 160 over a 100 baseline.
    let GestureOutcome::Progressed {
        progress,
        should_complete,
    } = scene.pinch(GestureState::Changed, 0.4, 0.0)
    else {
        panic!("pinch should progress the dismissal");
    };
    assert!((progress - 1.0 / 1.6).abs() < 1e-9);
    assert!(should_complete);
    scene.pinch(GestureState::Ended, 1.0, 0.0);

    assert_eq!(
        scene.complete(),
        Some(AnimationStage::Restore {
            duration: 0.2,
            frame: Rect::new(150.0, 150.0, 250.0, 250.0)
        })
    );
    assert_eq!(scene.complete(), None);

    assert_eq!(scene.session.phase(), Phase::Idle);
    assert!(scene.session.destination().is_none());
    assert!(!scene.host.is_visible(root));
    assert!(scene.host.is_visible(scene.source));
    assert_eq!(scene.host.listening_views(), vec![scene.source]);
    let renders = scene.session.renders().unwrap();
    assert_eq!(renders.direction(), ZoomDirection::ZoomIn);
    assert_eq!(renders.replica(), None, "next zoom-in starts fresh");
    assert!(
        scene
            .host
            .calls()
            .ends_with(&[PresenterCall::Complete(true), PresenterCall::DidDismiss])
    );
}

#[test]
fn torn_down_views_leave_the_host() {
    let mut scene = Scene::new();
    let mut destinations = Vec::new();
    for _ in 0..3 {
        scene.pinch(GestureState::Began, 1.0, 0.0);
        scene.animate();
        destinations.push(*scene.session.destination().unwrap());
        scene.pinch(GestureState::Changed, 1.1, 0.0);
        scene.pinch(GestureState::Ended, 1.0, 0.0);
        assert_eq!(scene.complete(), None);
    }
    for destination in &destinations {
        assert!(!scene.host.contains(destination.root));
        assert!(!scene.host.contains(destination.backdrop));
        assert!(!scene.host.contains(destination.render_container));
    }
    let replica = scene.replica();
    assert!(scene.host.contains(replica), "kept for the next attempt");

    scene.present();
    scene.session.dismiss(&mut scene.host).unwrap();
    scene.animate();
    while scene.complete().is_some() {}
    assert_eq!(scene.session.phase(), Phase::Idle);
    assert!(!scene.host.contains(replica));
    assert!(scene.host.contains(scene.source));
    assert_eq!(scene.host.children(scene.host.root()), &[scene.source]);
}

#[test]
fn weak_pinch_in_keeps_destination() {
    let mut scene = Scene::new();
    scene.present();
    let replica = scene.replica();
    let root = scene.root();

    scene.pinch(GestureState::Began, 1.0, 0.0);
    scene.animate();
    // 400 * 0.8 = 320, still above 1.9.
    scene.pinch(GestureState::Changed, 0.8, 0.0);
    scene.pinch(GestureState::Ended, 1.0, 0.0);

    assert!(matches!(
        scene.complete(),
        Some(AnimationStage::Settle { velocity, .. }) if velocity == 0.0
    ));
    assert_eq!(scene.session.phase(), Phase::Presented);
    assert_eq!(scene.complete(), None);

    assert!(scene.host.is_visible(root));
    assert_eq!(scene.host.alpha(root), 1.0);
    assert!(scene.host.is_hidden(scene.source));
    assert_eq!(scene.replica(), replica);
    assert_eq!(scene.host.listening_views(), vec![replica]);
    assert_eq!(
        scene.session.renders().unwrap().direction(),
        ZoomDirection::ZoomOut
    );
    assert_eq!(scene.host.calls().last(), Some(&PresenterCall::Complete(false)));
}

#[test]
fn programmatic_dismiss_runs_scripted() {
    let mut scene = Scene::new();
    scene.present();
    let root = scene.root();

    scene.session.dismiss(&mut scene.host).unwrap();
    assert_eq!(scene.host.calls().last(), Some(&PresenterCall::Dismiss(root)));
    assert!(!scene.session.is_interactive());
    assert!(!scene.session.is_interactive_dismissal());
    assert_eq!(scene.session.transition_duration(), 0.5);

    assert_eq!(
        scene.animate(),
        AnimationStage::Retreat {
            duration: 0.5,
            frame: Rect::new(150.0, 150.0, 250.0, 250.0)
        }
    );
    // Gestures do not steer a scripted dismissal.
    assert_eq!(
        scene.pinch(GestureState::Changed, 2.0, 0.0),
        GestureOutcome::Ignored
    );
    assert!(matches!(
        scene.complete(),
        Some(AnimationStage::Restore { .. })
    ));
    assert_eq!(scene.complete(), None);
    assert_eq!(scene.session.phase(), Phase::Idle);
    assert!(scene.host.is_visible(scene.source));
}

#[test]
fn landscape_source_measures_widths() {
    let mut host = HeadlessHost::new(Rect::new(0.0, 0.0, 400.0, 400.0));
    let source = host.add_view(Some(host.root()), Rect::new(100.0, 180.0, 300.0, 220.0));
    let mut session = ZoomSession::new(ZoomConfig::default());
    session.zoom_in_view(&mut host, source).unwrap();

    session.handle_pinch(&mut host, &mut PinchGesture::new(GestureState::Began, 1.0));
    let destination = *session.destination().unwrap();
    // Container spans the window height and is centered horizontally.
    assert_eq!(destination.layout.frame, Rect::new(0.0, 0.0, 400.0, 400.0));
    assert_eq!(destination.layout.content_size.height, 430.0);

    let outcome =
        session.handle_pinch(&mut host, &mut PinchGesture::new(GestureState::Changed, 1.35));
    let GestureOutcome::Progressed {
        progress,
        should_complete,
    } = outcome
    else {
        panic!("pinch should progress the transition");
    };
    assert!((progress - 0.35).abs() < 1e-9);
    assert!(should_complete);
    let renders = session.renders().unwrap();
    assert!((renders.scale(&host) - 1.35).abs() < 1e-9);
    assert!((renders.final_scale(&host) - 2.0).abs() < 1e-9);
}
