//! Input model: touch contacts, mouse and wheel events.
//!
//! These are the raw events the adapters in [`crate::area`] consume. Touch and
//! mouse positions are in scene coordinates; wheel positions are local to the
//! receiving component, as delivered by most windowing systems.

#[cfg(test)]
#[path = "input_test.rs"]
mod input_test;

use serde::{Deserialize, Serialize};

use crate::geometry::Point;

/// Platform identifier of a touch contact, stable from press to release.
pub type PointerId = i64;

/// State of one touch contact within an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TouchPhase {
    /// The contact went down in this event.
    Pressed,
    /// The contact moved since the previous event.
    Moved,
    /// The contact is down but did not move.
    Stationary,
    /// The contact lifted in this event.
    Released,
}

/// One contact reported by a touch event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub id: PointerId,
    pub phase: TouchPhase,
    /// Scene-space position.
    pub position: Point,
}

impl TouchPoint {
    #[must_use]
    pub fn new(id: PointerId, phase: TouchPhase, x: f64, y: f64) -> Self {
        Self { id, phase, position: Point::new(x, y) }
    }

    #[must_use]
    pub fn pressed(id: PointerId, x: f64, y: f64) -> Self {
        Self::new(id, TouchPhase::Pressed, x, y)
    }

    #[must_use]
    pub fn moved(id: PointerId, x: f64, y: f64) -> Self {
        Self::new(id, TouchPhase::Moved, x, y)
    }

    #[must_use]
    pub fn stationary(id: PointerId, x: f64, y: f64) -> Self {
        Self::new(id, TouchPhase::Stationary, x, y)
    }

    #[must_use]
    pub fn released(id: PointerId, x: f64, y: f64) -> Self {
        Self::new(id, TouchPhase::Released, x, y)
    }

    /// Whether the contact is still down after this event.
    #[must_use]
    pub fn is_live(&self) -> bool {
        self.phase != TouchPhase::Released
    }
}

/// A mouse press, move or release.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MouseInput {
    /// Scene-space position.
    pub position: Point,
    /// The platform generated this event from another source (typically touch).
    #[serde(default)]
    pub synthesized: bool,
}

impl MouseInput {
    #[must_use]
    pub fn at(x: f64, y: f64) -> Self {
        Self { position: Point::new(x, y), synthesized: false }
    }

    #[must_use]
    pub fn synthesized_at(x: f64, y: f64) -> Self {
        Self { position: Point::new(x, y), synthesized: true }
    }
}

/// A scroll wheel tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WheelInput {
    /// Position local to the receiving component.
    pub position: Point,
    /// Vertical rotation in eighths of a degree (120 = one standard notch).
    pub angle_delta_y: i32,
    #[serde(default)]
    pub synthesized: bool,
}

impl WheelInput {
    #[must_use]
    pub fn at(x: f64, y: f64, angle_delta_y: i32) -> Self {
        Self { position: Point::new(x, y), angle_delta_y, synthesized: false }
    }
}
