// Copyright 2025 the Render Zoom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The zoom transition state machine.
//!
//! ## Phases
//!
//! ```text
//! Idle ──pinch began──▶ Presenting ──finish──▶ Presented ──pinch began──▶ Dismissing ──finish──▶ Idle
//!   ▲                        │ cancel              ▲                           │ cancel
//!   └────────────────────────┘                     └───────────────────────────┘
//! ```
//!
//! [`Phase::Presenting`] and [`Phase::Dismissing`] carry a [`Transit`]: the
//! percent driver, whether the transition is gesture driven, whether the host
//! has started animating it and whether a release would commit.
//!
//! ## Driving a session
//!
//! 1. Arm it with [`ZoomSession::zoom_in`]; recognizers are attached to the
//!    listening view.
//! 2. Forward recognizer callbacks to [`ZoomSession::handle_pinch`],
//!    [`ZoomSession::handle_rotation`] and [`ZoomSession::handle_pan`].
//! 3. When the host's presentation machinery starts the transition, call
//!    [`ZoomSession::animate_transition`]. It returns the first
//!    [`AnimationStage`] to run.
//! 4. Each time the host finishes animating a stage, call
//!    [`ZoomSession::complete_stage`]. It applies the commit or cancel branch
//!    and returns the next stage, if any.
//!
//! Stages are the only suspension points. Model values are written when a
//! stage is issued; the host animates its presentation towards them.

use kurbo::{Affine, Rect};

use crate::config::ZoomConfig;
use crate::driver::PercentDriver;
use crate::error::ZoomError;
use crate::gesture::{
    self, GestureOutcome, GestureState, PanGesture, PinchGesture, RotationGesture,
};
use crate::host::{Presenter, TransitionContext, ViewTree, reparent_in_place};
use crate::layout::ContainerLayout;
use crate::renders::{FinalTarget, RenderState, ZoomDirection};

/// How a zoom-in is set up.
///
/// ```
/// use kurbo::Rect;
/// use render_zoom::ZoomInRequest;
///
/// let request = ZoomInRequest::new(7_u32)
///     .with_listening_view(8)
///     .with_final_frame(Rect::new(0.0, 0.0, 320.0, 480.0));
/// assert_eq!(request.from_view, 7);
/// assert_eq!(request.transition_view, 7);
/// assert_eq!(request.listening_view, 8);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomInRequest<V> {
    /// Source view, hidden while zoomed.
    pub from_view: V,
    /// Baseline for scale ratios when it differs from `from_view`.
    pub actual_frame_view: Option<V>,
    /// View receiving the gesture recognizers.
    pub listening_view: V,
    /// View converted into the transformed replica.
    pub transition_view: V,
    /// Destination; the window bounds when `None`.
    pub final_target: Option<FinalTarget<V>>,
}

impl<V: Copy> ZoomInRequest<V> {
    /// A request that uses `view` for every role and zooms to the window.
    pub fn new(view: V) -> Self {
        Self {
            from_view: view,
            actual_frame_view: None,
            listening_view: view,
            transition_view: view,
            final_target: None,
        }
    }

    /// Uses `view` as the scale baseline.
    #[must_use]
    pub fn with_actual_frame_view(mut self, view: V) -> Self {
        self.actual_frame_view = Some(view);
        self
    }

    /// Attaches recognizers to `view`.
    #[must_use]
    pub fn with_listening_view(mut self, view: V) -> Self {
        self.listening_view = view;
        self
    }

    /// Replicates `view` instead of the source view.
    #[must_use]
    pub fn with_transition_view(mut self, view: V) -> Self {
        self.transition_view = view;
        self
    }

    /// Zooms into a fixed window frame.
    #[must_use]
    pub fn with_final_frame(mut self, frame: Rect) -> Self {
        self.final_target = Some(FinalTarget::Frame(frame));
        self
    }

    /// Zooms into the window frame of `view`.
    #[must_use]
    pub fn with_final_view(mut self, view: V) -> Self {
        self.final_target = Some(FinalTarget::View(view));
        self
    }
}

/// A running present or dismiss transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transit {
    /// Gesture driven, as opposed to a programmatic dismissal.
    pub interactive: bool,
    /// The host has started animating; rotation and pan apply only then.
    pub animating: bool,
    /// Whether a release at the current scale commits.
    pub should_complete: bool,
    /// Progress and release decision.
    pub driver: PercentDriver,
}

impl Transit {
    fn interactive() -> Self {
        Self {
            interactive: true,
            animating: false,
            should_complete: false,
            driver: PercentDriver::new(),
        }
    }

    fn scripted() -> Self {
        Self {
            interactive: false,
            animating: false,
            should_complete: true,
            driver: PercentDriver::finished(),
        }
    }
}

/// Where a session is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Phase {
    /// Nothing presented; armed if a zoom-in was requested.
    #[default]
    Idle,
    /// The destination is being presented.
    Presenting(Transit),
    /// The destination is up.
    Presented,
    /// The destination is being dismissed.
    Dismissing(Transit),
}

/// Animation the host runs before calling [`ZoomSession::complete_stage`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AnimationStage {
    /// Fade the destination backdrop in, scrubbed by the percent driver.
    RevealBackdrop {
        /// Seconds.
        duration: f64,
        /// Backdrop opacity to reach.
        alpha: f64,
    },
    /// Spring the replica into the destination.
    Settle {
        /// Seconds.
        duration: f64,
        /// Spring damping ratio.
        damping: f64,
        /// Initial spring velocity from the pinch release.
        velocity: f64,
        /// Replica frame to reach, in transition container coordinates.
        frame: Rect,
    },
    /// Move the replica towards `frame` while fading the destination out,
    /// scrubbed by the percent driver.
    Retreat {
        /// Seconds.
        duration: f64,
        /// Replica frame to reach, in transition container coordinates.
        frame: Rect,
    },
    /// Snap the replica back over the source view.
    Restore {
        /// Seconds.
        duration: f64,
        /// Source frame in window coordinates.
        frame: Rect,
    },
}

/// The presented screen, owned by the session only while it is up.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Destination<V> {
    /// Root view returned by [`Presenter::present`].
    pub root: V,
    /// Full-window backdrop faded in behind the replica.
    pub backdrop: V,
    /// Scroll container the replica settles into.
    pub render_container: V,
    /// Geometry of `render_container`.
    pub layout: ContainerLayout,
    /// Spring velocity recorded at the last pinch release.
    pub gesture_velocity: f64,
}

/// Interactive zoom transition between a source view and a destination screen.
#[derive(Clone, Debug)]
pub struct ZoomSession<V> {
    config: ZoomConfig,
    phase: Phase,
    renders: Option<RenderState<V>>,
    request: Option<ZoomInRequest<V>>,
    destination: Option<Destination<V>>,
    listening: Option<V>,
    pending: Option<AnimationStage>,
}

impl<V: Copy + Eq + core::fmt::Debug> ZoomSession<V> {
    /// Creates an unarmed session.
    #[must_use]
    pub fn new(config: ZoomConfig) -> Self {
        Self {
            config,
            phase: Phase::Idle,
            renders: None,
            request: None,
            destination: None,
            listening: None,
            pending: None,
        }
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &ZoomConfig {
        &self.config
    }

    /// Current phase.
    #[must_use]
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current render state, if armed.
    #[must_use]
    pub fn renders(&self) -> Option<&RenderState<V>> {
        self.renders.as_ref()
    }

    /// The presented screen, if any.
    #[must_use]
    pub fn destination(&self) -> Option<&Destination<V>> {
        self.destination.as_ref()
    }

    /// View currently carrying the recognizers.
    #[must_use]
    pub fn listening_view(&self) -> Option<V> {
        self.listening
    }

    /// Stage the host is animating, if any.
    #[must_use]
    pub fn pending_stage(&self) -> Option<AnimationStage> {
        self.pending
    }

    /// `true` while the next (or current) transition zooms in.
    #[must_use]
    pub fn is_presenting(&self) -> bool {
        matches!(self.phase, Phase::Idle | Phase::Presenting(_))
    }

    fn transit(&self) -> Option<&Transit> {
        match &self.phase {
            Phase::Presenting(t) | Phase::Dismissing(t) => Some(t),
            Phase::Idle | Phase::Presented => None,
        }
    }

    /// Whether gesture updates drive the running transition. Outside a
    /// transition, sessions are interactive.
    #[must_use]
    pub fn is_interactive(&self) -> bool {
        self.transit().is_none_or(|t| t.interactive)
    }

    /// Whether the host is animating a transition.
    #[must_use]
    pub fn is_transitioning(&self) -> bool {
        self.transit().is_some_and(|t| t.animating)
    }

    /// Whether releasing now would commit the running transition.
    #[must_use]
    pub fn should_complete(&self) -> bool {
        self.transit().is_some_and(|t| t.should_complete)
    }

    /// Progress of the running transition's driver.
    #[must_use]
    pub fn progress(&self) -> Option<f64> {
        self.transit().map(|t| t.driver.progress())
    }

    /// Threshold for the current direction.
    #[must_use]
    pub fn completion_threshold(&self) -> f64 {
        let direction = if self.is_presenting() {
            ZoomDirection::ZoomIn
        } else {
            ZoomDirection::ZoomOut
        };
        gesture::completion_threshold(direction, &self.config)
    }

    /// Duration of the present/dismiss transition.
    #[must_use]
    pub fn transition_duration(&self) -> f64 {
        if self.is_interactive() {
            self.config.interactive_duration
        } else {
            self.config.scripted_duration
        }
    }

    /// Whether the host should drive a dismissal through this session's
    /// percent driver rather than run it on its own.
    #[must_use]
    pub fn is_interactive_dismissal(&self) -> bool {
        match self.phase {
            Phase::Dismissing(t) => t.interactive,
            _ => true,
        }
    }

    /// Arms a zoom-in and attaches recognizers to its listening view.
    ///
    /// Fails with [`ZoomError::TransitionInFlight`] unless the session is idle.
    pub fn zoom_in<T>(&mut self, tree: &mut T, request: ZoomInRequest<V>) -> Result<(), ZoomError>
    where
        T: ViewTree<View = V> + ?Sized,
    {
        if self.phase != Phase::Idle || self.pending.is_some() {
            return Err(ZoomError::TransitionInFlight);
        }
        let final_target = request
            .final_target
            .unwrap_or_else(|| FinalTarget::Frame(tree.window_bounds()));
        self.renders = Some(RenderState::new(
            request.from_view,
            request.listening_view,
            request.transition_view,
            request.actual_frame_view.unwrap_or(request.from_view),
            final_target,
            ZoomDirection::ZoomIn,
            self.config.min_extent,
        ));
        self.request = Some(request);
        #[cfg(feature = "tracing")]
        tracing::debug!(view = ?request.from_view, "armed zoom-in");
        self.listen(tree);
        Ok(())
    }

    /// Arms a zoom-in that uses `view` for every role.
    pub fn zoom_in_view<T>(&mut self, tree: &mut T, view: V) -> Result<(), ZoomError>
    where
        T: ViewTree<View = V> + ?Sized,
    {
        self.zoom_in(tree, ZoomInRequest::new(view))
    }

    /// Switches to zoom-out and moves the recognizers to `listening_view`.
    ///
    /// The session calls this itself once the replica settled into the
    /// destination; hosts only need it to listen on a different view.
    pub fn zoom_out<T>(&mut self, tree: &mut T, listening_view: V) -> Result<(), ZoomError>
    where
        T: ViewTree<View = V> + ?Sized,
    {
        if self.phase != Phase::Presented {
            return Err(ZoomError::NotPresented);
        }
        let renders = self.renders.take().ok_or(ZoomError::NotArmed)?;
        self.renders = Some(renders.zoom_out(listening_view));
        #[cfg(feature = "tracing")]
        tracing::debug!(view = ?listening_view, "armed zoom-out");
        self.listen(tree);
        Ok(())
    }

    /// Starts a non-interactive dismissal of the presented destination.
    ///
    /// Fails with [`ZoomError::NotPresented`] outside [`Phase::Presented`] and
    /// with [`ZoomError::TransitionInFlight`] while a stage is still pending.
    pub fn dismiss<H>(&mut self, host: &mut H) -> Result<(), ZoomError>
    where
        H: Presenter<View = V> + ?Sized,
    {
        if self.phase != Phase::Presented {
            return Err(ZoomError::NotPresented);
        }
        if self.pending.is_some() {
            return Err(ZoomError::TransitionInFlight);
        }
        let root = self.destination.ok_or(ZoomError::NotPresented)?.root;
        if let Some(renders) = self.renders.as_mut() {
            renders.set_direction(ZoomDirection::ZoomOut);
        }
        self.phase = Phase::Dismissing(Transit::scripted());
        #[cfg(feature = "tracing")]
        tracing::debug!("dismissing programmatically");
        host.dismiss(root);
        Ok(())
    }

    /// Detaches recognizers from the previous and current listening views,
    /// then attaches them to the current one.
    fn listen<T>(&mut self, tree: &mut T)
    where
        T: ViewTree<View = V> + ?Sized,
    {
        let Some(renders) = self.renders.as_ref() else {
            return;
        };
        let target = renders.listening_view();
        if let Some(previous) = self.listening.take() {
            if previous != target {
                tree.detach_gestures(previous);
            }
        }
        renders.listen(tree);
        self.listening = Some(target);
    }

    /// Handles a pinch callback. May present or dismiss through `host`.
    pub fn handle_pinch<H>(&mut self, host: &mut H, pinch: &mut PinchGesture) -> GestureOutcome
    where
        H: Presenter<View = V> + ?Sized,
    {
        if self.renders.is_none() {
            return GestureOutcome::Ignored;
        }
        match pinch.state {
            GestureState::Began => self.pinch_began(host),
            GestureState::Changed => self.pinch_changed(host, pinch),
            GestureState::Ended | GestureState::Cancelled => self.pinch_released(host, pinch),
            GestureState::Possible | GestureState::Failed => GestureOutcome::Ignored,
        }
    }

    fn pinch_began<H>(&mut self, host: &mut H) -> GestureOutcome
    where
        H: Presenter<View = V> + ?Sized,
    {
        if self.pending.is_some() {
            return GestureOutcome::Ignored;
        }
        match self.phase {
            Phase::Idle => {
                let Some(renders) = self.renders.as_mut() else {
                    return GestureOutcome::Ignored;
                };
                renders.starts_zoom_in(host);
                let root = host.present();
                let destination = build_destination(host, renders, root, &self.config);
                self.destination = Some(destination);
                self.phase = Phase::Presenting(Transit::interactive());
                #[cfg(feature = "tracing")]
                tracing::debug!(root = ?root, "presenting destination");
                GestureOutcome::Started { presenting: true }
            }
            Phase::Presented => {
                let Some(destination) = self.destination else {
                    return GestureOutcome::Ignored;
                };
                self.phase = Phase::Dismissing(Transit::interactive());
                #[cfg(feature = "tracing")]
                tracing::debug!(root = ?destination.root, "dismissing destination");
                host.dismiss(destination.root);
                GestureOutcome::Started { presenting: false }
            }
            Phase::Presenting(_) | Phase::Dismissing(_) => GestureOutcome::Ignored,
        }
    }

    fn pinch_changed<T>(&mut self, tree: &mut T, pinch: &mut PinchGesture) -> GestureOutcome
    where
        T: ViewTree<View = V> + ?Sized,
    {
        let config = self.config;
        let (Some(renders), Some(transit)) = (self.renders.as_mut(), phase_transit(&mut self.phase))
        else {
            return GestureOutcome::Ignored;
        };
        if transit.driver.outcome().is_some() {
            return GestureOutcome::Ignored;
        }
        let replica = renders.transition_view(tree);
        gesture::apply_pinch(tree, replica, pinch);

        let scale = renders.scale(&*tree);
        let direction = renders.direction();
        let progress = gesture::progress_for(direction, scale);
        transit.should_complete = gesture::should_complete(direction, scale, &config);
        transit.driver.update(progress);
        #[cfg(feature = "tracing")]
        tracing::trace!(scale, progress, should_complete = transit.should_complete, "pinch");
        GestureOutcome::Progressed {
            progress: transit.driver.progress(),
            should_complete: transit.should_complete,
        }
    }

    fn pinch_released<T>(&mut self, tree: &mut T, pinch: &PinchGesture) -> GestureOutcome
    where
        T: ViewTree<View = V> + ?Sized,
    {
        let config = self.config;
        let (Some(renders), Some(transit)) = (self.renders.as_ref(), phase_transit(&mut self.phase))
        else {
            return GestureOutcome::Ignored;
        };
        if transit.driver.outcome().is_some() {
            return GestureOutcome::Ignored;
        }
        let committed = transit.should_complete && pinch.state != GestureState::Cancelled;
        if committed {
            transit.driver.finish();
        } else {
            transit.driver.cancel();
        }

        let velocity = gesture::normalized_velocity(
            pinch.velocity,
            renders.final_scale(&*tree),
            renders.scale(&*tree),
            &config,
        );
        if let Some(destination) = self.destination.as_mut() {
            destination.gesture_velocity = velocity;
        }
        #[cfg(feature = "tracing")]
        {
            if committed {
                tracing::debug!(velocity, "finish");
            } else {
                tracing::debug!(velocity, "cancel");
            }
        }
        GestureOutcome::Released {
            committed,
            velocity,
        }
    }

    /// Handles a rotation callback. Applies only while an interactive
    /// transition is animating.
    pub fn handle_rotation<T>(&mut self, tree: &mut T, rotation: &mut RotationGesture) -> GestureOutcome
    where
        T: ViewTree<View = V> + ?Sized,
    {
        if rotation.state != GestureState::Changed {
            return GestureOutcome::Ignored;
        }
        let Some(replica) = self.gesture_target() else {
            return GestureOutcome::Ignored;
        };
        gesture::apply_rotation(tree, replica, rotation);
        GestureOutcome::Transformed
    }

    /// Handles a two-finger pan callback. Applies only while an interactive
    /// transition is animating.
    pub fn handle_pan<T>(&mut self, tree: &mut T, pan: &mut PanGesture) -> GestureOutcome
    where
        T: ViewTree<View = V> + ?Sized,
    {
        if pan.state != GestureState::Changed {
            return GestureOutcome::Ignored;
        }
        let Some(replica) = self.gesture_target() else {
            return GestureOutcome::Ignored;
        };
        gesture::apply_pan(tree, replica, pan);
        GestureOutcome::Transformed
    }

    fn gesture_target(&self) -> Option<V> {
        let transit = self.transit()?;
        if !(transit.interactive && transit.animating) {
            return None;
        }
        self.renders.as_ref()?.replica()
    }

    /// Starts animating the running transition inside `cx.container`.
    ///
    /// Hides the source, lays out the destination, moves the replica into
    /// the container and returns the first stage.
    pub fn animate_transition<H>(
        &mut self,
        host: &mut H,
        cx: TransitionContext<V>,
    ) -> Result<AnimationStage, ZoomError>
    where
        H: Presenter<View = V> + ?Sized,
    {
        if self.pending.is_some() {
            return Err(ZoomError::TransitionInFlight);
        }
        let duration = self.transition_duration();
        let presenting = self.is_presenting();
        let config = self.config;
        let (Some(renders), Some(destination), Some(transit)) = (
            self.renders.as_mut(),
            self.destination.as_ref(),
            phase_transit(&mut self.phase),
        ) else {
            return Err(ZoomError::NoTransition);
        };
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("animate_transition", presenting, duration).entered();

        transit.animating = true;
        host.set_hidden(renders.initial_view(), true);
        host.set_frame(destination.root, cx.final_frame);
        if presenting {
            host.add_subview(cx.container, destination.root);
        }
        let replica = renders.transition_view(host);
        reparent_in_place(host, cx.container, replica);

        let stage = if presenting {
            host.set_alpha(destination.backdrop, 0.0);
            host.set_alpha(destination.backdrop, config.backdrop_alpha);
            AnimationStage::RevealBackdrop {
                duration,
                alpha: config.backdrop_alpha,
            }
        } else {
            let frame = if transit.interactive {
                host.frame(replica)
            } else {
                let frame = host.window_frame(renders.zoomed_out_view());
                host.set_transform(replica, Affine::IDENTITY);
                host.set_frame(replica, frame);
                frame
            };
            host.set_alpha(destination.root, 0.0);
            AnimationStage::Retreat { duration, frame }
        };
        self.pending = Some(stage);
        Ok(stage)
    }

    /// Reports that the host finished animating the pending stage.
    ///
    /// Returns the next stage to animate, or `None` when the session reached
    /// a resting phase.
    pub fn complete_stage<H>(&mut self, host: &mut H) -> Result<Option<AnimationStage>, ZoomError>
    where
        H: Presenter<View = V> + ?Sized,
    {
        let stage = self.pending.ok_or(ZoomError::NoPendingStage)?;
        if matches!(
            stage,
            AnimationStage::RevealBackdrop { .. } | AnimationStage::Retreat { .. }
        ) && self.transit().is_some_and(|t| t.driver.outcome().is_none())
        {
            return Err(ZoomError::Undecided);
        }
        self.pending = None;
        let next = match stage {
            AnimationStage::RevealBackdrop { .. } => self.finish_reveal(host),
            AnimationStage::Settle { .. } => self.finish_settle(host),
            AnimationStage::Retreat { .. } => self.finish_retreat(host),
            AnimationStage::Restore { .. } => self.finish_restore(host),
        };
        self.pending = next;
        Ok(next)
    }

    fn finish_reveal<H>(&mut self, host: &mut H) -> Option<AnimationStage>
    where
        H: Presenter<View = V> + ?Sized,
    {
        let cancelled = self.transit().is_some_and(|t| t.driver.was_cancelled());
        let renders = self.renders.as_mut()?;
        if cancelled {
            // Back to the armed source view.
            let replica = renders.transition_view(host);
            let source_frame = host.window_frame(renders.zoomed_out_view());
            host.remove_from_parent(replica);
            host.set_transform(replica, Affine::IDENTITY);
            host.set_frame(replica, source_frame);
            if let Some(destination) = self.destination.take() {
                host.discard(destination.root);
            }
            renders.ends_zoom_out(host);
            self.listening = None;
            self.phase = Phase::Idle;
            #[cfg(feature = "tracing")]
            tracing::debug!("zoom-in cancelled");
            host.complete_transition(false);
            self.listen(host);
            return None;
        }

        renders.ends_zoom_in(host);
        self.listening = None;
        self.phase = Phase::Presented;
        #[cfg(feature = "tracing")]
        tracing::debug!("zoom-in committed");
        host.complete_transition(true);
        let velocity = self.destination.map_or(0.0, |d| d.gesture_velocity);
        Some(self.issue_settle(host, velocity))
    }

    /// Springs the replica to the final frame.
    fn issue_settle<H>(&mut self, host: &mut H, velocity: f64) -> AnimationStage
    where
        H: Presenter<View = V> + ?Sized,
    {
        let (frame, replica) = match self.renders.as_mut() {
            Some(renders) => (
                renders.final_frame(&*host),
                Some(renders.transition_view(host)),
            ),
            None => (host.window_bounds(), None),
        };
        if let Some(replica) = replica {
            host.set_transform(replica, Affine::IDENTITY);
            host.set_frame(replica, frame);
        }
        AnimationStage::Settle {
            duration: self.config.settle_duration,
            damping: self.config.settle_damping,
            velocity,
            frame,
        }
    }

    fn finish_settle<H>(&mut self, host: &mut H) -> Option<AnimationStage>
    where
        H: Presenter<View = V> + ?Sized,
    {
        let destination = self.destination?;
        let renders = self.renders.as_mut()?;
        let replica = renders.transition_view(host);
        let final_frame = renders.final_frame(&*host);
        let origin = destination.layout.render_origin(
            host.frame(renders.initial_view()).size(),
            final_frame.size(),
            renders.final_scale(&*host),
            self.config.content_inset,
        );
        host.set_transform(replica, Affine::IDENTITY);
        host.add_subview(destination.render_container, replica);
        host.set_frame(replica, Rect::from_origin_size(origin, final_frame.size()));
        let rearmed = self.zoom_out(host, replica);
        debug_assert!(rearmed.is_ok(), "zoom-out re-arm failed: {rearmed:?}");
        None
    }

    fn finish_retreat<H>(&mut self, host: &mut H) -> Option<AnimationStage>
    where
        H: Presenter<View = V> + ?Sized,
    {
        let cancelled = self.transit().is_some_and(|t| t.driver.was_cancelled());
        if cancelled {
            let renders = self.renders.as_mut()?;
            renders.ends_zoom_in(host);
            renders.set_direction(ZoomDirection::ZoomIn);
            self.listening = None;
            if let Some(destination) = self.destination {
                host.set_alpha(destination.root, 1.0);
            }
            self.phase = Phase::Presented;
            #[cfg(feature = "tracing")]
            tracing::debug!("zoom-out cancelled");
            host.complete_transition(false);
            return Some(self.issue_settle(host, 0.0));
        }

        let renders = self.renders.as_mut()?;
        let replica = renders.transition_view(host);
        let frame = host.window_frame(renders.zoomed_out_view());
        host.set_transform(replica, Affine::IDENTITY);
        host.set_frame(replica, frame);
        Some(AnimationStage::Restore {
            duration: self.config.restore_duration,
            frame,
        })
    }

    fn finish_restore<H>(&mut self, host: &mut H) -> Option<AnimationStage>
    where
        H: Presenter<View = V> + ?Sized,
    {
        if let Some(destination) = self.destination.take() {
            host.discard(destination.root);
        }
        if let Some(renders) = self.renders.take() {
            if let Some(replica) = renders.created_replica() {
                host.discard(replica);
            } else if let Some(replica) = renders.replica() {
                host.remove_from_parent(replica);
            }
            renders.ends_zoom_out(host);
        }
        self.listening = None;
        self.phase = Phase::Idle;
        #[cfg(feature = "tracing")]
        tracing::debug!("zoom-out committed");
        host.complete_transition(true);
        host.did_dismiss();

        // Fresh state for the next zoom-in.
        if let Some(request) = self.request {
            let rearmed = self.zoom_in(host, request);
            debug_assert!(rearmed.is_ok(), "zoom-in re-arm failed: {rearmed:?}");
        }
        None
    }
}

fn phase_transit(phase: &mut Phase) -> Option<&mut Transit> {
    match phase {
        Phase::Presenting(t) | Phase::Dismissing(t) => Some(t),
        Phase::Idle | Phase::Presented => None,
    }
}

/// Creates the destination's backdrop and render container under `root`.
fn build_destination<H, V>(
    host: &mut H,
    renders: &RenderState<V>,
    root: V,
    config: &ZoomConfig,
) -> Destination<V>
where
    H: Presenter<View = V> + ?Sized,
    V: Copy + Eq,
{
    let window = host.window_bounds();
    let final_frame = renders.final_frame(&*host);
    let layout = ContainerLayout::compute(
        window.size(),
        final_frame.size(),
        renders.axis(&*host),
        config,
    );

    let backdrop = host.create_container(Rect::from_origin_size((0.0, 0.0), window.size()));
    host.add_subview(root, backdrop);

    let render_container = host.create_container(layout.frame);
    host.set_clips_to_bounds(render_container, false);
    host.add_subview(root, render_container);

    Destination {
        root,
        backdrop,
        render_container,
        layout,
        gesture_velocity: 0.0,
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use kurbo::Rect;
    #[cfg(feature = "tracing")]
    use std::{
        format,
        string::{String, ToString},
    };

    use super::*;
    use crate::headless::{HeadlessHost, PresenterCall, ViewId};

    fn armed() -> (HeadlessHost, ZoomSession<ViewId>, ViewId) {
        let mut host = HeadlessHost::new(Rect::new(0.0, 0.0, 400.0, 400.0));
        let source = host.add_view(Some(host.root()), Rect::new(150.0, 150.0, 250.0, 250.0));
        let mut session = ZoomSession::new(ZoomConfig::default());
        session.zoom_in_view(&mut host, source).unwrap();
        (host, session, source)
    }

    fn pinch(
        session: &mut ZoomSession<ViewId>,
        host: &mut HeadlessHost,
        state: GestureState,
        scale: f64,
    ) -> GestureOutcome {
        session.handle_pinch(host, &mut PinchGesture::new(state, scale))
    }

    #[test]
    fn unarmed_session_ignores_gestures() {
        let mut host = HeadlessHost::new(Rect::new(0.0, 0.0, 400.0, 400.0));
        let mut session = ZoomSession::<ViewId>::new(ZoomConfig::default());
        assert_eq!(
            pinch(&mut session, &mut host, GestureState::Began, 1.0),
            GestureOutcome::Ignored
        );
        assert!(host.calls().is_empty());
    }

    #[test]
    fn zoom_in_refused_mid_transition() {
        let (mut host, mut session, source) = armed();
        pinch(&mut session, &mut host, GestureState::Began, 1.0);
        assert_eq!(
            session.zoom_in_view(&mut host, source),
            Err(ZoomError::TransitionInFlight)
        );
    }

    #[test]
    fn pinch_began_presents_and_hides_source() {
        let (mut host, mut session, source) = armed();
        let outcome = pinch(&mut session, &mut host, GestureState::Began, 1.0);
        assert_eq!(outcome, GestureOutcome::Started { presenting: true });
        assert!(host.is_hidden(source));
        assert!(matches!(host.calls(), [PresenterCall::Present(_)]));
        assert!(session.is_presenting());
        assert!(session.is_interactive());
        assert!(!session.is_transitioning());
        assert_eq!(session.completion_threshold(), 1.3);
        assert_eq!(session.transition_duration(), 0.7);
    }

    #[test]
    fn rotation_waits_for_animation() {
        let (mut host, mut session, _) = armed();
        pinch(&mut session, &mut host, GestureState::Began, 1.0);
        let mut rotation = RotationGesture {
            state: GestureState::Changed,
            rotation: 0.3,
        };
        assert_eq!(
            session.handle_rotation(&mut host, &mut rotation),
            GestureOutcome::Ignored
        );
        assert_eq!(rotation.rotation, 0.3, "untouched while not animating");

        let cx = TransitionContext::new(host.root(), host.window_bounds());
        session.animate_transition(&mut host, cx).unwrap();
        assert!(session.is_transitioning());
        assert_eq!(
            session.handle_rotation(&mut host, &mut rotation),
            GestureOutcome::Transformed
        );
        assert_eq!(rotation.rotation, 0.0);
        let replica = session.renders().unwrap().replica().unwrap();
        assert_eq!(host.transform(replica), Affine::rotate(0.3));
    }

    #[test]
    fn animate_needs_a_running_transition() {
        let (mut host, mut session, _) = armed();
        let cx = TransitionContext::new(host.root(), host.window_bounds());
        assert_eq!(
            session.animate_transition(&mut host, cx),
            Err(ZoomError::NoTransition)
        );
        assert_eq!(session.pending_stage(), None);
    }

    #[test]
    fn animate_twice_is_refused() {
        let (mut host, mut session, _) = armed();
        pinch(&mut session, &mut host, GestureState::Began, 1.0);
        let cx = TransitionContext::new(host.root(), host.window_bounds());
        let first = session.animate_transition(&mut host, cx).unwrap();
        assert_eq!(
            session.animate_transition(&mut host, cx),
            Err(ZoomError::TransitionInFlight)
        );
        assert_eq!(session.pending_stage(), Some(first));
    }

    #[test]
    fn undecided_stage_cannot_complete() {
        let (mut host, mut session, _) = armed();
        pinch(&mut session, &mut host, GestureState::Began, 1.0);
        let cx = TransitionContext::new(host.root(), host.window_bounds());
        session.animate_transition(&mut host, cx).unwrap();
        assert_eq!(session.complete_stage(&mut host), Err(ZoomError::Undecided));
    }

    #[test]
    fn complete_without_stage_is_an_error() {
        let (mut host, mut session, _) = armed();
        assert_eq!(session.complete_stage(&mut host), Err(ZoomError::NoPendingStage));
    }

    #[test]
    fn dismiss_requires_presented_destination() {
        let (mut host, mut session, _) = armed();
        assert_eq!(session.dismiss(&mut host), Err(ZoomError::NotPresented));
    }

    #[test]
    fn dismiss_waits_for_settle() {
        let (mut host, mut session, _) = armed();
        pinch(&mut session, &mut host, GestureState::Began, 1.0);
        let cx = TransitionContext::new(host.root(), host.window_bounds());
        session.animate_transition(&mut host, cx).unwrap();
        pinch(&mut session, &mut host, GestureState::Changed, 1.5);
        pinch(&mut session, &mut host, GestureState::Ended, 1.0);
        let settle = session.complete_stage(&mut host).unwrap();
        assert!(matches!(settle, Some(AnimationStage::Settle { .. })));
        assert_eq!(session.phase(), Phase::Presented);

        assert_eq!(session.dismiss(&mut host), Err(ZoomError::TransitionInFlight));

        assert_eq!(session.complete_stage(&mut host), Ok(None));
        assert_eq!(session.dismiss(&mut host), Ok(()));
        assert!(matches!(session.phase(), Phase::Dismissing(t) if !t.interactive));
    }

    #[test]
    fn zoom_out_requires_presented_destination() {
        let (mut host, mut session, source) = armed();
        assert_eq!(
            session.zoom_out(&mut host, source),
            Err(ZoomError::NotPresented)
        );
    }

    #[cfg(feature = "tracing")]
    #[tracing_test::traced_test]
    #[test]
    fn release_decision_is_logged() {
        let (mut host, mut session, _) = armed();
        pinch(&mut session, &mut host, GestureState::Began, 1.0);
        pinch(&mut session, &mut host, GestureState::Changed, 1.2);
        pinch(&mut session, &mut host, GestureState::Ended, 1.0);
        assert!(logs_contain("cancel"));
        assert!(!logs_contain("finish"));
    }
}
