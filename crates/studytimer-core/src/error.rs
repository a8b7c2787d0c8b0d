//! Core error types for studytimer-core.
//!
//! Countdown operations never fail; they degrade to status messages.
//! These errors cover the ambient surfaces: configuration files and the
//! best-effort platform effects (sound, notifications).

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for studytimer-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// No home or config directory could be determined
    #[error("Could not determine a configuration directory")]
    NoDataDir,
}

/// Failures of the best-effort completion effects.
///
/// These are logged and swallowed by the caller, never propagated into
/// the timer flow.
#[derive(Error, Debug)]
pub enum EffectError {
    /// The platform has no audio output available
    #[error("Audio output not supported: {0}")]
    AudioUnavailable(String),

    /// The platform notification service rejected the request
    #[error("Notification failed: {0}")]
    NotificationFailed(String),

    /// IO failure while emitting the effect
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
