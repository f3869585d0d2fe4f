//! Error and diagnostic types for the dispatch core.
//!
//! Every failure that originates in skill code is converted into one of these
//! values at the point of interaction. None of them ever escapes the loader or
//! the router as a `Result::Err`; they are logged and recorded instead.

use std::fmt;

/// Error raised by skill code: a factory that cannot build its skill, or a
/// handler that fails while serving an utterance.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct SkillError {
    message: String,
}

impl SkillError {
    /// Create a skill error with a message.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Create an error for settings a factory could not accept.
    #[must_use]
    pub fn invalid_settings(msg: impl fmt::Display) -> Self {
        Self::new(format!("invalid settings: {msg}"))
    }

    /// Create an error from a caught panic payload.
    #[must_use]
    pub fn panicked(payload: &(dyn std::any::Any + Send)) -> Self {
        let detail = payload
            .downcast_ref::<&str>()
            .map(|s| (*s).to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic payload".to_string());
        Self::new(format!("panicked: {detail}"))
    }

    /// The error message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<String> for SkillError {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SkillError {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<std::io::Error> for SkillError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<serde_json::Error> for SkillError {
    fn from(err: serde_json::Error) -> Self {
        Self::invalid_settings(err)
    }
}

/// Result type returned by skill factories and handlers.
pub type SkillResult<T> = Result<T, SkillError>;

/// Why a plugin unit was not turned into a registered skill.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LoadError {
    /// The unit could not be read or parsed.
    #[error("failed to load {unit}: {reason}")]
    Plugin {
        /// Unit name.
        unit: String,
        /// Underlying cause.
        reason: String,
    },

    /// The unit names a factory that is not registered.
    #[error("{unit} has no factory named '{factory}', not a skill")]
    MissingFactory {
        /// Unit name.
        unit: String,
        /// Requested factory name.
        factory: String,
    },

    /// The factory failed while building the skill.
    #[error("factory '{factory}' failed in {unit}: {source}")]
    Factory {
        /// Unit name.
        unit: String,
        /// Factory name.
        factory: String,
        /// Error raised by the factory.
        source: SkillError,
    },

    /// The built skill does not satisfy the capability contract.
    #[error("skill {unit} violates the skill contract: {reason}")]
    Contract {
        /// Unit name.
        unit: String,
        /// What is missing.
        reason: String,
    },
}

impl LoadError {
    /// Create a plugin load error.
    #[must_use]
    pub fn plugin(unit: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::Plugin {
            unit: unit.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a contract violation.
    #[must_use]
    pub fn contract(unit: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Contract {
            unit: unit.into(),
            reason: reason.into(),
        }
    }

    /// Name of the unit this error belongs to.
    #[must_use]
    pub fn unit(&self) -> &str {
        match self {
            Self::Plugin { unit, .. }
            | Self::MissingFactory { unit, .. }
            | Self::Factory { unit, .. }
            | Self::Contract { unit, .. } => unit,
        }
    }
}

/// One diagnostic line produced by the loader or the router.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum Diagnostic {
    /// The configured plugin directory does not exist.
    DirectoryMissing {
        /// The configured path.
        path: String,
    },
    /// A plugin unit was skipped.
    Load(LoadError),
    /// A matched handler failed.
    HandlerFailed {
        /// Skill that failed.
        skill: String,
        /// Failure reason.
        reason: String,
    },
    /// No trigger phrase matched the input.
    NoMatch {
        /// The input as received.
        input: String,
    },
}

impl Diagnostic {
    /// Whether this is a "no handler found" diagnostic.
    #[must_use]
    pub const fn is_no_match(&self) -> bool {
        matches!(self, Self::NoMatch { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirectoryMissing { path } => {
                write!(f, "[Warning] skills directory not found: {path}")
            }
            Self::Load(err @ (LoadError::Plugin { .. } | LoadError::Factory { .. })) => {
                write!(f, "[Error] {err}")
            }
            Self::Load(err) => write!(f, "[Warning] {err}"),
            Self::HandlerFailed { skill, reason } => {
                write!(f, "[Error] skill handler '{skill}' failed: {reason}")
            }
            Self::NoMatch { input } => write!(f, "[No skill handler found for]: {input}"),
        }
    }
}

impl From<LoadError> for Diagnostic {
    fn from(err: LoadError) -> Self {
        Self::Load(err)
    }
}
