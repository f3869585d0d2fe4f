//! Console echo of skill results.

use std::io::{self, Write};
use tanu::observer::DispatchObserver;
use tanu::HandlerResult;

/// Prints the value of every `Handled(Some(..))` result to stdout.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleEcho;

impl ConsoleEcho {
    /// The line printed for a result, if any.
    #[must_use]
    pub fn render(result: &HandlerResult) -> Option<String> {
        match result {
            HandlerResult::Handled(Some(value)) => Some(value.clone()),
            _ => None,
        }
    }
}

impl DispatchObserver for ConsoleEcho {
    #[allow(clippy::print_stdout)] // echo intentionally prints to stdout
    fn on_result(&self, _input: &str, result: &HandlerResult) {
        if let Some(line) = Self::render(result) {
            println!("{line}");
            let _ = io::stdout().flush();
        }
    }
}
