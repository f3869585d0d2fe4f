//! Unified error types for tanu-bot.
//!
//! Skill failures never show up here: the dispatcher contains them. These
//! errors cover the front end itself (configuration, input, bundled skill
//! assets) and can all be converted into [`BotError`].

use std::fmt;

// ============================================================================
// Main Error Type
// ============================================================================

/// The main error type for tanu-bot operations.
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    /// Configuration error.
    #[error("config: {0}")]
    Config(#[from] ConfigError),

    /// Input front-end error.
    #[error("input: {0}")]
    Input(#[from] InputError),

    /// IO error.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error.
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic internal error.
    #[error("{0}")]
    Internal(String),
}

impl BotError {
    /// Create a config error from a string.
    #[inline]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(ConfigError::Invalid(msg.into()))
    }
}

/// Result type alias for tanu-bot operations.
pub type Result<T> = std::result::Result<T, BotError>;

// ============================================================================
// Configuration Errors
// ============================================================================

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error.
    #[error("parse: {0}")]
    Parse(#[from] serde_json::Error),

    /// Invalid value.
    #[error("invalid: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Create an invalid value error.
    #[inline]
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}

/// Result type for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// ============================================================================
// Input Errors
// ============================================================================

/// Error type for the interactive input loop.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    /// Reading from the input source failed.
    #[error("read failed: {0}")]
    Read(String),

    /// Writing the prompt or an echo failed.
    #[error("write failed: {0}")]
    Write(String),
}

impl InputError {
    /// Create a read error.
    #[inline]
    pub fn read(err: impl fmt::Display) -> Self {
        Self::Read(err.to_string())
    }

    /// Create a write error.
    #[inline]
    pub fn write(err: impl fmt::Display) -> Self {
        Self::Write(err.to_string())
    }
}

/// Result type for input operations.
pub type InputResult<T> = std::result::Result<T, InputError>;

// ============================================================================
// Error Context Extension
// ============================================================================

/// Extension trait for adding context to errors.
pub trait ErrorContext<T> {
    /// Add context to an error.
    ///
    /// # Errors
    ///
    /// Returns the original error wrapped with `msg`.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    ///
    /// # Errors
    ///
    /// Returns the original error wrapped with the closure's message.
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<BotError>> ErrorContext<T> for std::result::Result<T, E> {
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            BotError::Internal(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let err = e.into();
            BotError::Internal(format!("{}: {}", f(), err))
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
