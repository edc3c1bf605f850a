//! Pinch and drag gesture recognition over touch, mouse and wheel input.
//!
//! A host UI feeds raw input events into a [`PinchArea`]. The area tracks the
//! live touch contacts, reduces them to a center and a spread diameter, and
//! runs a single gesture state machine that emits `Started`, `Updated` and
//! `Finished` signals carrying scale factors and a smoothed velocity. Mouse
//! drags and wheel ticks are folded into the same lifecycle. Rendering,
//! hit-testing and layout belong to the host.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`area`] | Input adapters and the owning [`PinchArea`] component |
//! | [`recognizer`] | Gesture state machine, signals and snapshots |
//! | [`frame`] | Center/diameter aggregation over live contacts |
//! | [`velocity`] | Clocks, elapsed timer and velocity smoothing |
//! | [`geometry`] | Points and scene → local coordinate mappings |
//! | [`input`] | Touch, mouse and wheel event types |
//! | [`config`] | Runtime configuration from defaults, JSON or environment |
//! | [`script`] | JSON-lines input scripts and deterministic replay |
//! | [`consts`] | Shared numeric constants (thresholds, wheel units) |

pub mod area;
pub mod config;
pub mod consts;
pub mod frame;
pub mod geometry;
pub mod input;
pub mod recognizer;
pub mod script;
pub mod velocity;

pub use area::{PinchArea, Response};
pub use config::{ConfigError, PinchConfig};
pub use geometry::{Identity, Point, SceneMapping, Viewport};
pub use recognizer::{PinchEvent, PinchSnapshot, Signal};
