//! Shared numeric constants for the gesture core.

// ── Recognition ─────────────────────────────────────────────────

/// Spread distance (scene units) two or more contacts must exceed before a
/// multi-finger gesture starts.
pub const START_THRESHOLD: f64 = 30.0;

/// Stand-in diameter for gestures with no measurable spread (single pointer,
/// mouse, wheel). Keeps `scale` and `relative_scale` finite.
pub const NOMINAL_DIAMETER: f64 = 1.0;

// ── Wheel ───────────────────────────────────────────────────────

/// Wheel angle units per full rotation (eighths of a degree × 360).
pub const WHEEL_UNITS_PER_TURN: f64 = 8.0 * 360.0;

/// Default wheel sensitivity multiplier.
pub const DEFAULT_WHEEL_FACTOR: f64 = 1.0;

/// Largest per-tick scale change produced by the wheel, in either direction.
pub const MAX_WHEEL_STEP: f64 = 1.0;

// ── Velocity ────────────────────────────────────────────────────

/// Weight applied to the previous velocity on each new sample.
pub const VELOCITY_DECAY: f64 = 0.5;

/// Milliseconds per second, for per-second velocity.
pub const MS_PER_SEC: f64 = 1000.0;
