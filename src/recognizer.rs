//! The gesture state machine.
//!
//! DESIGN
//! ======
//! `Recognizer` owns every piece of gesture state: whether a gesture is
//! running, the current center/diameter, the baselines for relative and
//! absolute scale, and the velocity estimator. Input adapters never touch
//! these fields directly; they call the transition methods here and collect
//! the resulting [`Signal`]s.
//!
//! Positions are kept in scene space. The target mapping is applied only when
//! a value is read, so changing the target mid-gesture is safe.
//!
//! Invariants:
//! - `Started` and `Finished` alternate strictly, `Updated` only between them.
//! - `initial_diameter` and `previous_diameter` are always `> 0`.
//! - `initial_diameter` is only written when a gesture starts.

#[cfg(test)]
#[path = "recognizer_test.rs"]
mod recognizer_test;

use std::rc::Rc;

use serde::Serialize;
use tracing::{debug, trace};

use crate::consts::{NOMINAL_DIAMETER, START_THRESHOLD};
use crate::frame::GestureFrame;
use crate::geometry::{Identity, Point, SceneMapping};
use crate::velocity::{Clock, VelocityEstimator};

/// Lifecycle notification of a gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PinchEvent {
    Started,
    Updated,
    Finished,
}

/// Every accessor of the recognizer, captured at the moment a signal fired.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PinchSnapshot {
    pub active: bool,
    /// Center in target coordinates.
    pub center: Point,
    /// Center committed by the previous update, in target coordinates.
    pub previous_center: Point,
    pub relative_movement: Point,
    /// Diameter relative to the diameter at start.
    pub scale: f64,
    /// Diameter relative to the previous update.
    pub relative_scale: f64,
    pub diameter: f64,
    /// Smoothed velocity in target units per second.
    pub velocity: Point,
    pub msecs_since_velocity_update: Option<u64>,
}

/// Output of the gesture component.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "signal", rename_all = "snake_case")]
pub enum Signal {
    PinchStarted(PinchSnapshot),
    PinchUpdated(PinchSnapshot),
    PinchFinished(PinchSnapshot),
    WheelFactorChanged { wheel_factor: f64 },
    TargetChanged,
}

impl Signal {
    /// The gesture lifecycle event, if this is a pinch signal.
    #[must_use]
    pub fn pinch_event(&self) -> Option<PinchEvent> {
        match self {
            Self::PinchStarted(_) => Some(PinchEvent::Started),
            Self::PinchUpdated(_) => Some(PinchEvent::Updated),
            Self::PinchFinished(_) => Some(PinchEvent::Finished),
            Self::WheelFactorChanged { .. } | Self::TargetChanged => None,
        }
    }

    /// The accessor values captured when a pinch signal fired.
    #[must_use]
    pub fn snapshot(&self) -> Option<&PinchSnapshot> {
        match self {
            Self::PinchStarted(s) | Self::PinchUpdated(s) | Self::PinchFinished(s) => Some(s),
            Self::WheelFactorChanged { .. } | Self::TargetChanged => None,
        }
    }
}

/// How the set of live contacts changed in one event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Topology {
    /// A contact joined the live set.
    pub added: bool,
    /// A contact left the live set.
    pub removed: bool,
    /// At least one live contact reported motion.
    pub moved: bool,
}

impl Topology {
    /// Whether live set membership changed.
    #[must_use]
    pub fn changed(self) -> bool {
        self.added || self.removed
    }
}

/// Replace a missing spread with the nominal diameter.
fn nonzero(diameter: f64) -> f64 {
    if diameter > 0.0 { diameter } else { NOMINAL_DIAMETER }
}

/// Live diameter for a frame. A lone contact has no spread and drags at the
/// nominal diameter; two or more contacts report their spread as measured,
/// even when it is zero.
fn frame_diameter(frame: &GestureFrame) -> f64 {
    if frame.live_count < 2 { NOMINAL_DIAMETER } else { frame.diameter }
}

/// Gesture state machine: `Idle` ⇄ `Active`.
pub struct Recognizer<C: Clock> {
    active: bool,
    center: Point,
    diameter: f64,
    initial_diameter: f64,
    previous_center: Point,
    previous_diameter: f64,
    velocity: VelocityEstimator<C>,
    target: Rc<dyn SceneMapping>,
    start_threshold: f64,
}

impl<C: Clock> Recognizer<C> {
    /// An idle recognizer reporting in scene coordinates.
    pub fn new(clock: C) -> Self {
        Self {
            active: false,
            center: Point::ZERO,
            diameter: NOMINAL_DIAMETER,
            initial_diameter: NOMINAL_DIAMETER,
            previous_center: Point::ZERO,
            previous_diameter: NOMINAL_DIAMETER,
            velocity: VelocityEstimator::new(clock),
            target: Rc::new(Identity),
            start_threshold: START_THRESHOLD,
        }
    }

    #[must_use]
    pub fn with_start_threshold(mut self, threshold: f64) -> Self {
        self.start_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_target(mut self, target: Rc<dyn SceneMapping>) -> Self {
        self.target = target;
        self
    }

    // --- Configuration ---

    #[must_use]
    pub fn start_threshold(&self) -> f64 {
        self.start_threshold
    }

    pub fn set_start_threshold(&mut self, threshold: f64) {
        self.start_threshold = threshold;
    }

    #[must_use]
    pub fn target(&self) -> &Rc<dyn SceneMapping> {
        &self.target
    }

    /// Replace the mapping used by the positional accessors. Returns whether
    /// the target actually changed.
    pub fn set_target(&mut self, target: Rc<dyn SceneMapping>) -> bool {
        if Rc::ptr_eq(&self.target, &target) {
            return false;
        }
        self.target = target;
        true
    }

    // --- Queries ---

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn center(&self) -> Point {
        self.target.map_from_scene(self.center)
    }

    #[must_use]
    pub fn previous_center(&self) -> Point {
        self.target.map_from_scene(self.previous_center)
    }

    #[must_use]
    pub fn relative_movement(&self) -> Point {
        self.center() - self.previous_center()
    }

    /// Center in scene coordinates, before target mapping.
    #[must_use]
    pub fn scene_center(&self) -> Point {
        self.center
    }

    #[must_use]
    pub fn scale(&self) -> f64 {
        self.diameter / self.initial_diameter
    }

    #[must_use]
    pub fn relative_scale(&self) -> f64 {
        self.diameter / self.previous_diameter
    }

    #[must_use]
    pub fn diameter(&self) -> f64 {
        self.diameter
    }

    #[must_use]
    pub fn initial_diameter(&self) -> f64 {
        self.initial_diameter
    }

    #[must_use]
    pub fn previous_diameter(&self) -> f64 {
        self.previous_diameter
    }

    #[must_use]
    pub fn cumulative_velocity(&self) -> Point {
        self.velocity.velocity()
    }

    #[must_use]
    pub fn msecs_since_velocity_update(&self) -> Option<u64> {
        self.velocity.msecs_since_update()
    }

    #[must_use]
    pub fn snapshot(&self) -> PinchSnapshot {
        PinchSnapshot {
            active: self.active,
            center: self.center(),
            previous_center: self.previous_center(),
            relative_movement: self.relative_movement(),
            scale: self.scale(),
            relative_scale: self.relative_scale(),
            diameter: self.diameter,
            velocity: self.cumulative_velocity(),
            msecs_since_velocity_update: self.msecs_since_velocity_update(),
        }
    }

    // --- Multi-contact frames ---

    /// Feed the frame computed for one touch event.
    ///
    /// `None` means no contact is left and finishes a running gesture.
    pub fn process_frame(&mut self, frame: Option<GestureFrame>, topology: Topology) -> Vec<Signal> {
        let mut out = Vec::new();
        let Some(frame) = frame else {
            self.finish(&mut out);
            return out;
        };

        let diameter = frame_diameter(&frame);
        let starting =
            !self.active && (frame.live_count < 2 || frame.diameter > self.start_threshold);

        if starting || topology.changed() {
            self.previous_center = frame.center;
            self.previous_diameter = nonzero(diameter);
        }
        if starting {
            self.initial_diameter = nonzero(diameter);
        }

        self.center = frame.center;
        self.diameter = diameter;

        if starting {
            self.start(&mut out);
        } else if self.active {
            self.sample_velocity();
        } else {
            trace!(live = frame.live_count, diameter = frame.diameter, "below start threshold");
        }

        if self.active && (starting || topology.moved) {
            self.update(&mut out);
        }
        out
    }

    // --- Single-pointer gestures ---

    /// Start a gesture with no measurable spread at `center` (scene space).
    ///
    /// Does nothing if a gesture is already running.
    pub fn begin_at(&mut self, center: Point, out: &mut Vec<Signal>) {
        if self.active {
            return;
        }
        self.center = center;
        self.previous_center = center;
        self.diameter = NOMINAL_DIAMETER;
        self.previous_diameter = NOMINAL_DIAMETER;
        self.initial_diameter = NOMINAL_DIAMETER;
        self.start(out);
    }

    /// Move the center of a running single-pointer gesture.
    pub fn move_to(&mut self, center: Point, out: &mut Vec<Signal>) {
        if !self.active {
            return;
        }
        self.center = center;
        self.sample_velocity();
        self.update(out);
    }

    /// Move the center (scene space) without sampling or emitting anything.
    pub fn set_center(&mut self, center: Point) {
        self.center = center;
    }

    /// Multiply the current diameter by `factor`, without committing it.
    pub fn scale_diameter(&mut self, factor: f64) {
        self.diameter *= factor;
    }

    // --- Transitions ---

    fn start(&mut self, out: &mut Vec<Signal>) {
        self.velocity.reset();
        self.active = true;
        debug!(diameter = self.diameter, x = self.center.x, y = self.center.y, "pinch started");
        out.push(Signal::PinchStarted(self.snapshot()));
    }

    /// Emit `Updated` and commit the current frame as the new baseline.
    pub fn update(&mut self, out: &mut Vec<Signal>) {
        if !self.active {
            return;
        }
        trace!(scale = self.scale(), relative_scale = self.relative_scale(), "pinch updated");
        out.push(Signal::PinchUpdated(self.snapshot()));
        self.previous_center = self.center;
        self.previous_diameter = nonzero(self.diameter);
    }

    /// Emit `Finished` if a gesture is running and return to idle.
    pub fn finish(&mut self, out: &mut Vec<Signal>) {
        if !self.active {
            return;
        }
        debug!(scale = self.scale(), "pinch finished");
        out.push(Signal::PinchFinished(self.snapshot()));
        self.active = false;
        self.velocity.stop();
    }

    /// Fold the movement since the last committed frame into the velocity.
    pub fn sample_velocity(&mut self) {
        let delta = self.relative_movement();
        self.velocity.sample_since_last(delta);
    }
}
