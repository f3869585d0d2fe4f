//! Intent routing: one utterance in, at most one skill invocation out.

use crate::error::{Diagnostic, SkillError};
use crate::observer::SharedObserver;
use crate::routing::{Route, RoutingTable, normalize};
use crate::skill::HandlerResult;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, warn};

/// Routes utterances to skills by substring matching.
///
/// Matching is case-insensitive containment of a trigger phrase in the
/// input. The first route in table order wins; there is no scoring and no
/// word-boundary check, so a short phrase registered early can pre-empt a
/// longer one.
#[derive(Debug, Clone, Default)]
pub struct IntentRouter {
    table: RoutingTable,
    observers: Vec<SharedObserver>,
}

impl IntentRouter {
    /// Create a router over a finished table.
    #[must_use]
    pub fn new(table: RoutingTable) -> Self {
        Self {
            table,
            observers: Vec::new(),
        }
    }

    /// Attach an observer.
    #[must_use]
    pub fn with_observer(mut self, observer: SharedObserver) -> Self {
        self.observers.push(observer);
        self
    }

    /// The routing table.
    #[must_use]
    pub const fn table(&self) -> &RoutingTable {
        &self.table
    }

    /// Find the route an utterance would take, without invoking it.
    #[must_use]
    pub fn resolve(&self, text: &str) -> Option<&Route> {
        if text.trim().is_empty() {
            return None;
        }
        self.table.find(&normalize(text))
    }

    /// Dispatch one utterance.
    ///
    /// Empty input returns [`HandlerResult::NotHandled`] without touching
    /// anything. Handler errors and panics come back as
    /// [`HandlerResult::Failed`]; they never unwind into the caller.
    pub fn dispatch(&self, text: &str) -> HandlerResult {
        if text.trim().is_empty() {
            return HandlerResult::NotHandled;
        }

        let result = match self.table.find(&normalize(text)) {
            Some(route) => self.invoke(route, text),
            None => {
                self.emit(&Diagnostic::NoMatch {
                    input: text.to_string(),
                });
                HandlerResult::NotHandled
            }
        };

        for observer in &self.observers {
            observer.on_result(text, &result);
        }
        result
    }

    fn invoke(&self, route: &Route, text: &str) -> HandlerResult {
        let skill = route.skill();
        debug!(phrase = route.phrase(), skill = route.skill_name(), "dispatching");

        let outcome = panic::catch_unwind(AssertUnwindSafe(|| skill.handle_intent(text)))
            .unwrap_or_else(|payload| Err(SkillError::panicked(payload.as_ref())));

        match outcome {
            Ok(result) => {
                if let HandlerResult::Failed(reason) = &result {
                    self.emit(&Diagnostic::HandlerFailed {
                        skill: route.skill_name().to_string(),
                        reason: reason.clone(),
                    });
                }
                result
            }
            Err(err) => {
                let reason = err.to_string();
                self.emit(&Diagnostic::HandlerFailed {
                    skill: route.skill_name().to_string(),
                    reason: reason.clone(),
                });
                HandlerResult::Failed(reason)
            }
        }
    }

    fn emit(&self, diagnostic: &Diagnostic) {
        if matches!(diagnostic, Diagnostic::HandlerFailed { .. }) {
            error!("{diagnostic}");
        } else {
            warn!("{diagnostic}");
        }
        for observer in &self.observers {
            observer.on_diagnostic(diagnostic);
        }
    }
}
