//! The pinch area: input adapters in front of one shared recognizer.
//!
//! DESIGN
//! ======
//! Touch, mouse and wheel events all drive the same [`Recognizer`], so only
//! one source may own a gesture at a time. Mutual exclusion comes from the
//! adapters' guards, not from locking:
//! - mouse events are refused while any touch contact is live, and
//!   synthesized mouse/wheel events are always refused;
//! - a wheel tick joins a running gesture (touch or mouse) as a scale step
//!   centered on the wheel position, and only starts its own gesture when no
//!   touch contact is live.
//!
//! Every handler returns a [`Response`]; `accepted == false` tells the host to
//! propagate the event to whatever sits underneath the area.

#[cfg(test)]
#[path = "area_test.rs"]
mod area_test;

use std::rc::Rc;

use tracing::{debug, trace};

use crate::config::PinchConfig;
use crate::consts::{MAX_WHEEL_STEP, WHEEL_UNITS_PER_TURN};
use crate::frame::aggregate;
use crate::geometry::{Identity, Point, SceneMapping};
use crate::input::{MouseInput, PointerId, TouchPhase, TouchPoint, WheelInput};
use crate::recognizer::{Recognizer, Signal, Topology};
use crate::velocity::{Clock, SystemClock};

/// Result of feeding one input event to the area.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Response {
    /// The area consumed the event.
    pub accepted: bool,
    /// Signals emitted while handling the event, in order.
    pub signals: Vec<Signal>,
}

impl Response {
    /// Not consumed; nothing happened.
    #[must_use]
    pub fn ignored() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn accepted(signals: Vec<Signal>) -> Self {
        Self { accepted: true, signals }
    }
}

/// Scale step for one wheel tick: rotation as a fraction of a full turn,
/// scaled by `wheel_factor` and clamped to ±100%.
#[must_use]
pub fn wheel_step(wheel_factor: f64, angle_delta_y: i32) -> f64 {
    (wheel_factor * f64::from(angle_delta_y) / WHEEL_UNITS_PER_TURN).clamp(-MAX_WHEEL_STEP, MAX_WHEEL_STEP)
}

/// Turns touch, mouse and wheel input into pinch signals.
pub struct PinchArea<C: Clock = SystemClock> {
    recognizer: Recognizer<C>,
    /// Live touch contacts, in arrival order.
    touch_ids: Vec<PointerId>,
    /// The area's own local ⇄ scene mapping.
    item: Rc<dyn SceneMapping>,
    wheel_factor: f64,
    enabled: bool,
    visible: bool,
}

impl PinchArea<SystemClock> {
    #[must_use]
    pub fn new(config: PinchConfig) -> Self {
        Self::with_clock(config, SystemClock::default())
    }
}

impl Default for PinchArea<SystemClock> {
    fn default() -> Self {
        Self::new(PinchConfig::default())
    }
}

impl<C: Clock> PinchArea<C> {
    /// An area reading time from `clock`, with local space equal to scene space.
    pub fn with_clock(config: PinchConfig, clock: C) -> Self {
        let item: Rc<dyn SceneMapping> = Rc::new(Identity);
        Self {
            recognizer: Recognizer::new(clock)
                .with_start_threshold(config.start_threshold)
                .with_target(Rc::clone(&item)),
            touch_ids: Vec::new(),
            item,
            wheel_factor: config.wheel_factor,
            enabled: true,
            visible: true,
        }
    }

    // --- Configuration ---

    #[must_use]
    pub fn wheel_factor(&self) -> f64 {
        self.wheel_factor
    }

    /// Change the wheel sensitivity. Emits `WheelFactorChanged` on change.
    ///
    /// Non-finite factors are rejected and leave the current one in place.
    #[allow(clippy::float_cmp)]
    pub fn set_wheel_factor(&mut self, wheel_factor: f64) -> Option<Signal> {
        if !wheel_factor.is_finite() {
            debug!(wheel_factor, "rejected non-finite wheel factor");
            return None;
        }
        if self.wheel_factor == wheel_factor {
            return None;
        }
        self.wheel_factor = wheel_factor;
        debug!(wheel_factor, "wheel factor changed");
        Some(Signal::WheelFactorChanged { wheel_factor })
    }

    #[must_use]
    pub fn start_threshold(&self) -> f64 {
        self.recognizer.start_threshold()
    }

    pub fn set_start_threshold(&mut self, threshold: f64) {
        self.recognizer.set_start_threshold(threshold);
    }

    /// Replace the area's own local ⇄ scene mapping (e.g. after it moved).
    ///
    /// If the area is its own target, the target follows.
    pub fn set_item_mapping(&mut self, item: Rc<dyn SceneMapping>) {
        let target_is_item = Rc::ptr_eq(self.recognizer.target(), &self.item);
        self.item = item;
        if target_is_item {
            self.recognizer.set_target(Rc::clone(&self.item));
        }
    }

    /// Report positional accessors in `target`'s local coordinates.
    pub fn set_target(&mut self, target: Rc<dyn SceneMapping>) -> Option<Signal> {
        if !self.recognizer.set_target(target) {
            return None;
        }
        debug!("target changed");
        Some(Signal::TargetChanged)
    }

    /// Report positional accessors in the area's own coordinates again.
    pub fn reset_target(&mut self) -> Option<Signal> {
        self.set_target(Rc::clone(&self.item))
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Enable or disable the area. Disabling finishes a running gesture.
    pub fn set_enabled(&mut self, enabled: bool) -> Vec<Signal> {
        self.enabled = enabled;
        self.finish_if_inert()
    }

    /// Show or hide the area. Hiding finishes a running gesture.
    pub fn set_visible(&mut self, visible: bool) -> Vec<Signal> {
        self.visible = visible;
        self.finish_if_inert()
    }

    fn is_interactive(&self) -> bool {
        self.enabled && self.visible
    }

    fn finish_if_inert(&mut self) -> Vec<Signal> {
        if self.is_interactive() {
            return Vec::new();
        }
        self.force_finish()
    }

    // --- Lifecycle ---

    /// The platform cancelled the touch sequence; every contact is gone.
    pub fn cancel_touch(&mut self) -> Vec<Signal> {
        trace!(live = self.touch_ids.len(), "touch cancelled");
        self.force_finish()
    }

    /// Detach the area. A running gesture is finished so every start stays
    /// paired with a finish.
    pub fn shutdown(&mut self) -> Vec<Signal> {
        self.force_finish()
    }

    fn force_finish(&mut self) -> Vec<Signal> {
        self.touch_ids.clear();
        let mut signals = Vec::new();
        self.recognizer.finish(&mut signals);
        signals
    }

    // --- Touch ---

    /// Handle one multi-touch event listing the contacts it reports.
    pub fn touch_event(&mut self, points: &[TouchPoint]) -> Response {
        if !self.is_interactive() {
            return Response::ignored();
        }

        let mut topology = Topology::default();
        for point in points {
            match point.phase {
                TouchPhase::Released => topology.removed |= self.forget_touch(point.id),
                TouchPhase::Pressed | TouchPhase::Moved | TouchPhase::Stationary => {
                    if !self.touch_ids.contains(&point.id) {
                        self.touch_ids.push(point.id);
                        topology.added = true;
                    }
                    topology.moved |= point.phase == TouchPhase::Moved;
                }
            }
        }

        if !topology.moved && !topology.changed() {
            trace!(points = points.len(), "skipped touch event without changes");
            return Response::ignored();
        }

        let positions: Vec<Point> = points.iter().filter(|p| p.is_live()).map(|p| p.position).collect();
        let frame = aggregate(&positions);
        let signals = self.recognizer.process_frame(frame, topology);
        Response { accepted: frame.is_some(), signals }
    }

    /// Drop a contact from the live set. Returns whether it was tracked.
    fn forget_touch(&mut self, id: PointerId) -> bool {
        match self.touch_ids.iter().position(|&live| live == id) {
            Some(index) => {
                self.touch_ids.remove(index);
                true
            }
            None => false,
        }
    }

    // --- Mouse ---

    fn mouse_allowed(&self, input: &MouseInput) -> bool {
        if input.synthesized || !self.touch_ids.is_empty() {
            trace!(synthesized = input.synthesized, live = self.touch_ids.len(), "mouse event refused");
            return false;
        }
        true
    }

    /// Start a single-pointer gesture at the press position.
    pub fn mouse_press(&mut self, input: &MouseInput) -> Response {
        if !self.is_interactive() || !self.mouse_allowed(input) || self.recognizer.is_active() {
            return Response::ignored();
        }
        let mut signals = Vec::new();
        self.recognizer.begin_at(input.position, &mut signals);
        Response::accepted(signals)
    }

    /// Drag the running mouse gesture.
    pub fn mouse_move(&mut self, input: &MouseInput) -> Response {
        if !self.is_interactive() || !self.mouse_allowed(input) || !self.recognizer.is_active() {
            return Response::ignored();
        }
        let mut signals = Vec::new();
        self.recognizer.move_to(input.position, &mut signals);
        Response::accepted(signals)
    }

    /// Finish the running mouse gesture.
    pub fn mouse_release(&mut self, input: &MouseInput) -> Response {
        if !self.is_interactive() || !self.mouse_allowed(input) {
            return Response::ignored();
        }
        let mut signals = Vec::new();
        self.recognizer.finish(&mut signals);
        Response::accepted(signals)
    }

    // --- Wheel ---

    /// Apply one wheel tick as a scale step.
    ///
    /// The tick's position becomes the gesture center. While idle the tick is
    /// a complete gesture of its own (`Started`, `Updated`, `Finished`);
    /// during a running gesture it moves the center, scales the diameter and
    /// emits `Updated`.
    pub fn wheel_event(&mut self, input: &WheelInput) -> Response {
        if !self.is_interactive() || input.synthesized {
            return Response::ignored();
        }
        let standalone = !self.recognizer.is_active();
        if standalone && !self.touch_ids.is_empty() {
            trace!(live = self.touch_ids.len(), "wheel refused while touch is pending");
            return Response::ignored();
        }

        let step = wheel_step(self.wheel_factor, input.angle_delta_y);
        let center = self.item.map_to_scene(input.position);
        let mut signals = Vec::new();
        if standalone {
            self.recognizer.begin_at(center, &mut signals);
        } else {
            self.recognizer.set_center(center);
        }
        self.recognizer.scale_diameter(1.0 + step);
        self.recognizer.sample_velocity();
        self.recognizer.update(&mut signals);
        if standalone {
            self.recognizer.finish(&mut signals);
        }
        Response::accepted(signals)
    }

    // --- Queries ---

    #[must_use]
    pub fn recognizer(&self) -> &Recognizer<C> {
        &self.recognizer
    }

    /// Number of touch contacts currently down.
    #[must_use]
    pub fn live_touch_count(&self) -> usize {
        self.touch_ids.len()
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.recognizer.is_active()
    }

    #[must_use]
    pub fn center(&self) -> Point {
        self.recognizer.center()
    }

    #[must_use]
    pub fn previous_center(&self) -> Point {
        self.recognizer.previous_center()
    }

    #[must_use]
    pub fn relative_movement(&self) -> Point {
        self.recognizer.relative_movement()
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.recognizer.scale()
    }

    #[must_use]
    pub fn relative_scale(&self) -> f64 {
        self.recognizer.relative_scale()
    }

    #[must_use]
    pub fn diameter(&self) -> f64 {
        self.recognizer.diameter()
    }

    #[must_use]
    pub fn cumulative_velocity(&self) -> Point {
        self.recognizer.cumulative_velocity()
    }

    #[must_use]
    pub fn msecs_since_velocity_update(&self) -> Option<u64> {
        self.recognizer.msecs_since_velocity_update()
    }
}
