// ABOUTME: Configuration error types for scenario and profile validation
// ABOUTME: Defines error variants for invalid ranges, missing fields, and parse failures
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! Configuration error types for scenario and profile validation.

use crate::errors::{AppError, ErrorCode};
use serde_json::{json, Value};
use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Value outside acceptable range (e.g., efficiency not in (0, 1])
    #[error("Invalid range: {0}")]
    InvalidRange(&'static str),

    /// Required configuration field is missing
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// Failed to parse configuration value
    #[error("Parse error: {0}")]
    Parse(String),

    /// A subject profile failed validation
    #[error("Invalid profile for subject '{subject}': {reason}")]
    InvalidProfile {
        /// Subject identifier
        subject: String,
        /// What was wrong
        reason: String,
    },

    /// Profile set is empty or lacks a referenced subject
    #[error("Unknown subject: {0}")]
    UnknownSubject(String),
}

impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        let (code, subject) = match &error {
            ConfigError::MissingField(_) => (ErrorCode::ConfigMissing, None),
            ConfigError::UnknownSubject(subject) => {
                (ErrorCode::ResourceNotFound, Some(subject))
            }
            ConfigError::InvalidProfile { subject, .. } => {
                (ErrorCode::ConfigInvalid, Some(subject))
            }
            ConfigError::InvalidRange(_) | ConfigError::Parse(_) => {
                (ErrorCode::ConfigInvalid, None)
            }
        };
        let details = subject.map_or(Value::Null, |subject| json!({ "subject": subject }));
        Self::new(code, error.to_string())
            .with_details(details)
            .with_source(error)
    }
}
