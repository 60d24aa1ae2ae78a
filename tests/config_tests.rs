use serial_test::serial;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use bitacora::config::Config;
use bitacora::data::MarkerOrder;
use bitacora::errors::AppError;

const VARS: &[&str] = &[
    "BITACORA_OUTPUT_DIR",
    "BITACORA_TIMEZONE",
    "BITACORA_WEATHER_TIMEOUT_SECS",
    "BITACORA_MARKER_ORDER",
    "BITACORA_MAX_TASKS",
    "TT_USER",
    "HOME",
];

// Runs `test` with `vars` set, restoring the original environment afterwards
fn with_env<F: FnOnce()>(vars: &[(&str, &str)], test: F) {
    let original: Vec<(&str, Option<String>)> =
        VARS.iter().map(|key| (*key, env::var(key).ok())).collect();
    for key in VARS {
        env::remove_var(key);
    }
    for (key, value) in vars {
        env::set_var(key, value);
    }

    test();

    for (key, value) in original {
        match value {
            Some(val) => env::set_var(key, val),
            None => env::remove_var(key),
        }
    }
}

#[test]
#[serial]
fn test_config_load_with_environment_vars() {
    with_env(
        &[
            ("BITACORA_OUTPUT_DIR", "/tmp/prints"),
            ("BITACORA_TIMEZONE", "Europe/Madrid"),
            ("BITACORA_WEATHER_TIMEOUT_SECS", "3"),
            ("BITACORA_MARKER_ORDER", "!^"),
            ("TT_USER", "me@example.com"),
        ],
        || {
            let config = Config::load().unwrap();
            assert_eq!(config.output_dir, PathBuf::from("/tmp/prints"));
            assert_eq!(config.timezone, chrono_tz::Europe::Madrid);
            assert_eq!(config.weather.timeout, Duration::from_secs(3));
            assert_eq!(config.format.marker_order, MarkerOrder::ImportantFirst);
            assert_eq!(config.ticktick.username.as_deref(), Some("me@example.com"));
            assert!(config.validate().is_ok());
        },
    );
}

#[test]
#[serial]
fn test_config_expands_home() {
    with_env(
        &[("HOME", "/home/planner"), ("BITACORA_OUTPUT_DIR", "~/prints")],
        || {
            let config = Config::load().unwrap();
            assert_eq!(config.output_dir, PathBuf::from("/home/planner/prints"));
        },
    );
}

#[test]
#[serial]
fn test_config_zero_list_size_fails_validation() {
    with_env(&[("BITACORA_MAX_TASKS", "0")], || {
        let config = Config::load().unwrap();
        match config.validate() {
            Err(AppError::Config(message)) => assert!(message.contains("greater than zero")),
            _ => panic!("Expected Config error for a zero task list size"),
        }
    });
}

#[test]
#[serial]
fn test_config_bad_marker_order() {
    with_env(&[("BITACORA_MARKER_ORDER", "^^")], || {
        assert!(matches!(Config::load(), Err(AppError::Config(_))));
    });
}
