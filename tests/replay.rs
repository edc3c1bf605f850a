//! End-to-end scenarios through the public API.
#![allow(clippy::float_cmp)]

use std::fs::File;
use std::io::BufReader;
use std::rc::Rc;

use multipinch::input::{MouseInput, TouchPoint, WheelInput};
use multipinch::script::{self, SignalCounts};
use multipinch::velocity::ManualClock;
use multipinch::{PinchArea, PinchConfig, PinchEvent, Point, Signal, Viewport};

fn area() -> (PinchArea<ManualClock>, ManualClock) {
    let clock = ManualClock::new();
    (PinchArea::with_clock(PinchConfig::default(), clock.clone()), clock)
}

fn kinds(signals: &[Signal]) -> Vec<PinchEvent> {
    signals.iter().filter_map(Signal::pinch_event).collect()
}

/// Every start is followed by exactly one finish before the next start, and
/// updates only happen in between.
fn assert_paired(events: &[PinchEvent]) {
    let mut active = false;
    for (i, event) in events.iter().enumerate() {
        match event {
            PinchEvent::Started => {
                assert!(!active, "nested start at {i}: {events:?}");
                active = true;
            }
            PinchEvent::Updated => assert!(active, "update outside a gesture at {i}: {events:?}"),
            PinchEvent::Finished => {
                assert!(active, "finish without start at {i}: {events:?}");
                active = false;
            }
        }
    }
    assert!(!active, "unfinished gesture: {events:?}");
}

#[test]
fn demo_script_replays_cleanly() {
    let file = File::open("demos/pinch.jsonl").unwrap();
    let lines = script::parse_script(BufReader::new(file)).unwrap();
    let (mut area, clock) = area();
    let records = script::replay(&mut area, &clock, &lines).unwrap();

    let events: Vec<_> = records.iter().filter_map(|r| r.signal.pinch_event()).collect();
    assert_paired(&events);
    assert_eq!(SignalCounts::from_records(&records), SignalCounts { started: 2, updated: 4, finished: 2, other: 0 });

    // The wheel tick rides on top of the pinch: 80 → 88 over an initial 50.
    let absorbed = records
        .iter()
        .find(|r| r.line == Some(4))
        .and_then(|r| r.signal.snapshot())
        .unwrap();
    assert!((absorbed.scale - 1.76).abs() < 1e-9);
    assert!((absorbed.relative_scale - 1.1).abs() < 1e-9);
}

#[test]
fn mixed_sources_never_double_start() {
    let (mut area, clock) = area();
    let mut all = Vec::new();

    all.extend(area.mouse_press(&MouseInput::at(0.0, 0.0)).signals);
    clock.advance(10);
    // Touch arrives while the mouse drives: the touch path takes over the
    // running gesture rather than starting a second one.
    all.extend(area.touch_event(&[TouchPoint::pressed(1, 0.0, 0.0), TouchPoint::pressed(2, 60.0, 0.0)]).signals);
    all.extend(area.mouse_press(&MouseInput::at(5.0, 5.0)).signals);
    all.extend(area.wheel_event(&WheelInput::at(0.0, 0.0, 120)).signals);
    clock.advance(10);
    all.extend(area.touch_event(&[TouchPoint::moved(1, -10.0, 0.0), TouchPoint::moved(2, 70.0, 0.0)]).signals);
    all.extend(area.touch_event(&[TouchPoint::released(1, -10.0, 0.0), TouchPoint::released(2, 70.0, 0.0)]).signals);
    all.extend(area.mouse_release(&MouseInput::at(0.0, 0.0)).signals);
    all.extend(area.wheel_event(&WheelInput::at(0.0, 0.0, -120)).signals);
    all.extend(area.shutdown());

    assert_paired(&kinds(&all));
}

#[test]
fn consumer_reads_target_space_values() {
    let (mut area, clock) = area();
    area.set_target(Rc::new(Viewport { pan_x: 0.0, pan_y: 0.0, zoom: 0.5 }));

    let response = area.touch_event(&[TouchPoint::pressed(1, 10.0, 0.0)]);
    assert_eq!(kinds(&response.signals), vec![PinchEvent::Started, PinchEvent::Updated]);
    assert_eq!(area.center(), Point::new(20.0, 0.0));

    clock.advance(100);
    let response = area.touch_event(&[TouchPoint::moved(1, 20.0, 0.0)]);
    let update = response.signals[0].snapshot().unwrap();
    assert_eq!(update.relative_movement, Point::new(20.0, 0.0));
    assert_eq!(update.velocity, Point::new(200.0, 0.0));
}

#[test]
fn isolated_wheel_tick_matches_clamped_step() {
    let config = PinchConfig { wheel_factor: 10.0, ..PinchConfig::default() };
    let mut area = PinchArea::with_clock(config, ManualClock::new());

    let response = area.wheel_event(&WheelInput::at(0.0, 0.0, 144));
    assert_eq!(kinds(&response.signals), vec![PinchEvent::Started, PinchEvent::Updated, PinchEvent::Finished]);
    let update = response.signals[1].snapshot().unwrap();
    assert!((update.scale - 1.5).abs() < 1e-9, "10 × 144 / 2880 = 0.5, plus one");

    let response = area.wheel_event(&WheelInput::at(0.0, 0.0, 5760));
    let update = response.signals[1].snapshot().unwrap();
    assert_eq!(update.scale, 2.0, "step is clamped to +100%");
}
