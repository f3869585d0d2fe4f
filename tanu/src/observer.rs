//! Dispatch observers.
//!
//! The router's return value is the only business result of a dispatch.
//! Anything that wants to see results or diagnostics (a console echo, a
//! speech synthesizer, a test recorder) attaches a [`DispatchObserver`].

use crate::error::Diagnostic;
use crate::skill::HandlerResult;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

/// Receives dispatch results and router diagnostics.
///
/// Both methods default to no-ops. Observers are called synchronously on
/// the dispatching thread and must not block for long.
pub trait DispatchObserver: Send + Sync {
    /// Called once per dispatch with the original input and its result.
    fn on_result(&self, input: &str, result: &HandlerResult) {
        let _ = (input, result);
    }

    /// Called for every diagnostic the router emits.
    fn on_diagnostic(&self, diagnostic: &Diagnostic) {
        let _ = diagnostic;
    }
}

impl fmt::Debug for dyn DispatchObserver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("DispatchObserver")
    }
}

/// Shared observer handle.
pub type SharedObserver = Arc<dyn DispatchObserver>;

/// Observer that keeps everything it sees. Useful in tests and for
/// front ends that render a history.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    results: Mutex<Vec<(String, HandlerResult)>>,
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl RecordingObserver {
    /// Create an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Results seen so far.
    #[must_use]
    pub fn results(&self) -> Vec<(String, HandlerResult)> {
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Diagnostics seen so far.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of "no handler found" diagnostics seen so far.
    #[must_use]
    pub fn no_match_count(&self) -> usize {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|d| d.is_no_match())
            .count()
    }
}

impl DispatchObserver for RecordingObserver {
    fn on_result(&self, input: &str, result: &HandlerResult) {
        self.results
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((input.to_string(), result.clone()));
    }

    fn on_diagnostic(&self, diagnostic: &Diagnostic) {
        self.diagnostics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(diagnostic.clone());
    }
}
