//! Recorded input scripts and deterministic replay.
//!
//! A script is JSON lines, one input event per line, tagged by `type`:
//!
//! ```text
//! {"type": "touch", "at_ms": 0, "points": [{"id": 1, "phase": "pressed", "position": {"x": -25, "y": 0}}]}
//! {"type": "wheel", "at_ms": 40, "position": {"x": 0, "y": 0}, "angle_delta_y": 120}
//! ```
//!
//! `at_ms` is optional and drives a [`ManualClock`], so velocities come out
//! the same on every run. Blank lines and lines starting with `#` are skipped.

#[cfg(test)]
#[path = "script_test.rs"]
mod script_test;

use std::io::BufRead;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::area::PinchArea;
use crate::input::{MouseInput, TouchPoint, WheelInput};
use crate::recognizer::{PinchEvent, Signal};
use crate::velocity::ManualClock;

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("failed to read script: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
    #[error("line {line}: time went backwards ({at_ms} ms after {now_ms} ms)")]
    TimeWentBackwards { line: usize, at_ms: u64, now_ms: u64 },
}

/// One input event as recorded in a script.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    Touch { points: Vec<TouchPoint> },
    TouchCancel,
    MousePress(MouseInput),
    MouseMove(MouseInput),
    MouseRelease(MouseInput),
    Wheel(WheelInput),
    SetEnabled { enabled: bool },
    SetVisible { visible: bool },
    SetWheelFactor { wheel_factor: f64 },
    Shutdown,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
struct Timing {
    #[serde(default)]
    at_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScriptLine {
    /// 1-based line number in the source.
    pub line: usize,
    pub at_ms: Option<u64>,
    pub event: InputEvent,
}

/// A signal produced during replay, with where and when it happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayRecord {
    /// Script line that caused the signal; `None` for the final shutdown.
    pub line: Option<usize>,
    pub at_ms: u64,
    pub signal: Signal,
}

/// Signal totals for a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SignalCounts {
    pub started: usize,
    pub updated: usize,
    pub finished: usize,
    pub other: usize,
}

impl SignalCounts {
    #[must_use]
    pub fn from_records(records: &[ReplayRecord]) -> Self {
        let mut counts = Self::default();
        for record in records {
            match record.signal.pinch_event() {
                Some(PinchEvent::Started) => counts.started += 1,
                Some(PinchEvent::Updated) => counts.updated += 1,
                Some(PinchEvent::Finished) => counts.finished += 1,
                None => counts.other += 1,
            }
        }
        counts
    }
}

/// Parse a whole script.
pub fn parse_script(reader: impl BufRead) -> Result<Vec<ScriptLine>, ScriptError> {
    let mut script = Vec::new();
    for (index, raw) in reader.lines().enumerate() {
        let raw = raw?;
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let line = index + 1;
        script.push(parse_line(line, trimmed)?);
    }
    Ok(script)
}

fn parse_line(line: usize, text: &str) -> Result<ScriptLine, ScriptError> {
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|source| ScriptError::Parse { line, source })?;
    let timing: Timing =
        serde_json::from_value(value.clone()).map_err(|source| ScriptError::Parse { line, source })?;
    let event: InputEvent = serde_json::from_value(value).map_err(|source| ScriptError::Parse { line, source })?;
    Ok(ScriptLine { line, at_ms: timing.at_ms, event })
}

/// Feed one event to the area and collect what it emitted.
pub fn apply(area: &mut PinchArea<ManualClock>, event: &InputEvent) -> Vec<Signal> {
    match event {
        InputEvent::Touch { points } => area.touch_event(points).signals,
        InputEvent::TouchCancel => area.cancel_touch(),
        InputEvent::MousePress(input) => area.mouse_press(input).signals,
        InputEvent::MouseMove(input) => area.mouse_move(input).signals,
        InputEvent::MouseRelease(input) => area.mouse_release(input).signals,
        InputEvent::Wheel(input) => area.wheel_event(input).signals,
        InputEvent::SetEnabled { enabled } => area.set_enabled(*enabled),
        InputEvent::SetVisible { visible } => area.set_visible(*visible),
        InputEvent::SetWheelFactor { wheel_factor } => area.set_wheel_factor(*wheel_factor).into_iter().collect(),
        InputEvent::Shutdown => area.shutdown(),
    }
}

/// Replay a script in order, then shut the area down so a gesture left
/// running by the script still gets its finish.
///
/// `clock` must be the clock `area` was built with.
pub fn replay(
    area: &mut PinchArea<ManualClock>,
    clock: &ManualClock,
    script: &[ScriptLine],
) -> Result<Vec<ReplayRecord>, ScriptError> {
    let mut records = Vec::new();
    for entry in script {
        if let Some(at_ms) = entry.at_ms {
            let now_ms = clock.now_ms();
            if at_ms < now_ms {
                return Err(ScriptError::TimeWentBackwards { line: entry.line, at_ms, now_ms });
            }
            clock.set_ms(at_ms);
        }
        let signals = apply(area, &entry.event);
        debug!(line = entry.line, signals = signals.len(), "replayed");
        let at_ms = clock.now_ms();
        records.extend(signals.into_iter().map(|signal| ReplayRecord { line: Some(entry.line), at_ms, signal }));
    }

    let at_ms = clock.now_ms();
    records.extend(area.shutdown().into_iter().map(|signal| ReplayRecord { line: None, at_ms, signal }));
    Ok(records)
}
