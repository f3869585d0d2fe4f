//! The skill capability contract.
//!
//! A skill declares the trigger phrases it answers to and a handler that
//! receives the full utterance. The trait replaces runtime attribute checks:
//! a type that does not provide both members does not compile. The one
//! property the compiler cannot check, a non-empty phrase list, is validated
//! by the loader.

use crate::error::SkillResult;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of dispatching one utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum HandlerResult {
    /// A skill handled the input, optionally producing a value.
    Handled(Option<String>),
    /// No skill handled the input.
    NotHandled,
    /// The matched skill failed.
    Failed(String),
}

impl HandlerResult {
    /// Handled with a value.
    #[must_use]
    pub fn handled(value: impl Into<String>) -> Self {
        Self::Handled(Some(value.into()))
    }

    /// Handled without a value.
    #[must_use]
    pub const fn done() -> Self {
        Self::Handled(None)
    }

    /// Whether a skill handled the input.
    #[must_use]
    pub const fn is_handled(&self) -> bool {
        matches!(self, Self::Handled(_))
    }

    /// Whether the matched skill failed.
    #[must_use]
    pub const fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }

    /// The value produced by a handling skill, if any.
    #[must_use]
    pub fn value(&self) -> Option<&str> {
        match self {
            Self::Handled(value) => value.as_deref(),
            _ => None,
        }
    }
}

impl fmt::Display for HandlerResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Handled(Some(value)) => write!(f, "{value}"),
            Self::Handled(None) => write!(f, "handled"),
            Self::NotHandled => write!(f, "not handled"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// A plugin that answers to a set of trigger phrases.
///
/// Skills are shared across threads by the routing table and must guard any
/// resource they touch (microphone, network, child processes) themselves.
///
/// # Example
///
/// ```rust,ignore
/// struct Greeter {
///     phrases: Vec<String>,
/// }
///
/// impl Skill for Greeter {
///     fn name(&self) -> &str {
///         "greeter"
///     }
///
///     fn intent_phrases(&self) -> &[String] {
///         &self.phrases
///     }
///
///     fn handle_intent(&self, text: &str) -> SkillResult<HandlerResult> {
///         Ok(HandlerResult::handled(format!("Hello! You said: {text}")))
///     }
/// }
/// ```
pub trait Skill: Send + Sync {
    /// Human-readable skill name used in logs and reports.
    fn name(&self) -> &str;

    /// Trigger phrases, in declaration order. Case does not matter; the
    /// loader lowercases them before registration.
    fn intent_phrases(&self) -> &[String];

    /// Handle an utterance whose lowercased form contains one of this
    /// skill's phrases. `text` is the original, case-preserved input.
    ///
    /// # Errors
    ///
    /// Returns an error when the skill accepted the request but could not
    /// carry it out. The router reports it as [`HandlerResult::Failed`].
    fn handle_intent(&self, text: &str) -> SkillResult<HandlerResult>;
}

impl fmt::Debug for dyn Skill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Skill")
            .field("name", &self.name())
            .field("phrases", &self.intent_phrases().len())
            .finish()
    }
}

/// Owned trait object for skills built by factories.
pub type BoxedSkill = Box<dyn Skill>;
