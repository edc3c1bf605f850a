//! Aggregate geometry of the live contacts for a single input event.
//!
//! A frame is rebuilt from scratch on every event. Nothing here is retained
//! between events; the recognizer owns all baselines.

#[cfg(test)]
#[path = "frame_test.rs"]
mod frame_test;

use serde::Serialize;

use crate::geometry::Point;

/// Center, spread and contact count of the live contacts in one event.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GestureFrame {
    /// Arithmetic mean of the live positions (scene space).
    pub center: Point,
    /// Spread of the contacts around `center`. Always `>= 0`.
    pub diameter: f64,
    /// Number of live contacts the frame was computed from. Always `>= 1`.
    pub live_count: usize,
}

/// Compute the frame for a set of live positions.
///
/// Returns `None` for an empty set: there is no center to speak of and the
/// caller treats that as "all contacts lifted".
///
/// The diameter is the length of `2 · Σ|pᵢ − center| / n`, where the absolute
/// value is taken per axis.
#[must_use]
pub fn aggregate(positions: &[Point]) -> Option<GestureFrame> {
    if positions.is_empty() {
        return None;
    }

    #[allow(clippy::cast_precision_loss)]
    let count = positions.len() as f64;

    let mut center = Point::ZERO;
    for &p in positions {
        center += p;
    }
    let center = center / count;

    let mut spread = Point::ZERO;
    for &p in positions {
        spread += (p - center).abs();
    }
    let spread = spread * 2.0 / count;

    Some(GestureFrame { center, diameter: spread.length(), live_count: positions.len() })
}
