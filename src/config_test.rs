#![allow(clippy::float_cmp)]

use super::*;

/// # Safety
/// Env-mutating tests share one lock so they never observe each other.
unsafe fn clear_pinch_env() {
    unsafe {
        std::env::remove_var(WHEEL_FACTOR_VAR);
        std::env::remove_var(START_THRESHOLD_VAR);
    }
}

static ENV_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

fn env_guard() -> std::sync::MutexGuard<'static, ()> {
    ENV_LOCK.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

#[test]
fn default_values() {
    let cfg = PinchConfig::default();
    assert_eq!(cfg.wheel_factor, 1.0);
    assert_eq!(cfg.start_threshold, 30.0);
    assert!(cfg.validate().is_ok());
}

#[test]
fn from_env_defaults_when_unset() {
    let _guard = env_guard();
    unsafe { clear_pinch_env() };

    let cfg = PinchConfig::from_env().unwrap();
    assert_eq!(cfg, PinchConfig::default());
}

#[test]
fn from_env_parses_overrides() {
    let _guard = env_guard();
    unsafe {
        clear_pinch_env();
        std::env::set_var(WHEEL_FACTOR_VAR, "2.5");
        std::env::set_var(START_THRESHOLD_VAR, " 12 ");
    }

    let cfg = PinchConfig::from_env().unwrap();
    assert_eq!(cfg.wheel_factor, 2.5);
    assert_eq!(cfg.start_threshold, 12.0);

    unsafe { clear_pinch_env() };
}

#[test]
fn from_env_rejects_garbage() {
    let _guard = env_guard();
    unsafe {
        clear_pinch_env();
        std::env::set_var(WHEEL_FACTOR_VAR, "fast");
    }

    let err = PinchConfig::from_env().unwrap_err();
    assert_eq!(err, ConfigError::InvalidNumber { var: WHEEL_FACTOR_VAR, value: "fast".into() });
    assert!(err.to_string().contains("PINCH_WHEEL_FACTOR"));

    unsafe { clear_pinch_env() };
}

#[test]
fn from_env_rejects_non_finite() {
    let _guard = env_guard();
    unsafe {
        clear_pinch_env();
        std::env::set_var(START_THRESHOLD_VAR, "inf");
    }

    let err = PinchConfig::from_env().unwrap_err();
    assert!(matches!(err, ConfigError::InvalidNumber { var: START_THRESHOLD_VAR, .. }));

    unsafe { clear_pinch_env() };
}

#[test]
fn from_env_rejects_negative_threshold() {
    let _guard = env_guard();
    unsafe {
        clear_pinch_env();
        std::env::set_var(START_THRESHOLD_VAR, "-1");
    }

    let err = PinchConfig::from_env().unwrap_err();
    assert_eq!(err, ConfigError::OutOfRange { field: "start_threshold", value: -1.0 });

    unsafe { clear_pinch_env() };
}

#[test]
fn validate_rejects_nan_wheel_factor() {
    let cfg = PinchConfig { wheel_factor: f64::NAN, ..PinchConfig::default() };
    assert!(matches!(cfg.validate(), Err(ConfigError::OutOfRange { field: "wheel_factor", .. })));
}

#[test]
fn negative_wheel_factor_is_allowed() {
    // Inverts the scroll direction.
    let cfg = PinchConfig { wheel_factor: -1.0, ..PinchConfig::default() };
    assert!(cfg.validate().is_ok());
}

#[test]
fn deserialize_fills_missing_fields() {
    let cfg: PinchConfig = serde_json::from_str(r#"{ "wheel_factor": 3.0 }"#).unwrap();
    assert_eq!(cfg.wheel_factor, 3.0);
    assert_eq!(cfg.start_threshold, 30.0);
}
