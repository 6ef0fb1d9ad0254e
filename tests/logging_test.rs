// ABOUTME: Tests for logging configuration and subscriber installation
// ABOUTME: Covers environment parsing and installing the pretty-format subscriber
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use cycle_exposure::logging::{LogFormat, LoggingConfig};
use serial_test::serial;
use std::env;

#[test]
#[serial]
fn test_logging_config_from_env() {
    env::set_var("RUST_LOG", "debug");
    env::set_var("LOG_FORMAT", "pretty");
    env::set_var("LOG_INCLUDE_LOCATION", "1");

    let config = LoggingConfig::from_env();
    assert_eq!(config.level, "debug");
    assert_eq!(config.format, LogFormat::Pretty);
    assert!(config.include_location);
    assert!(!config.include_spans);

    env::remove_var("RUST_LOG");
    env::remove_var("LOG_FORMAT");
    env::remove_var("LOG_INCLUDE_LOCATION");
}

#[test]
fn test_default_logging_config() {
    let config = LoggingConfig::default();
    assert_eq!(config.level, "info");
    assert_eq!(config.format, LogFormat::Compact);
    assert_eq!(config.service_name, "cycle-exposure");
}

// The only test in this binary that installs the global subscriber
#[test]
#[serial]
fn test_pretty_subscriber_installs_once() {
    let config = LoggingConfig {
        format: LogFormat::Pretty,
        include_location: true,
        include_thread: true,
        include_spans: true,
        ..LoggingConfig::default()
    }
    .with_level("debug");

    config.init().unwrap();
    tracing::debug!(edges = 3, "pretty subscriber active");

    // A second global subscriber is refused
    let error = LoggingConfig::default().init().unwrap_err();
    assert!(error.message.contains("failed to install subscriber"));
}
