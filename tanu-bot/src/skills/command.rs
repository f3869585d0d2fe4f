//! Fully declarative skill: run a program when a phrase matches.
//!
//! ```json
//! {
//!   "factory": "command",
//!   "settings": {
//!     "phrases": ["take a note"],
//!     "program": "notify-send",
//!     "args": ["Note", "{text}"],
//!     "reply": "Noted"
//!   }
//! }
//! ```

use super::launcher::Launcher;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tanu::{BoxedSkill, HandlerResult, Skill, SkillError, SkillResult};

/// Factory name.
pub const FACTORY: &str = "command";

/// Placeholder replaced by the original utterance in arguments.
pub const TEXT_PLACEHOLDER: &str = "{text}";

#[derive(Debug, Deserialize)]
struct Settings {
    #[serde(default)]
    name: Option<String>,
    phrases: Vec<String>,
    program: String,
    #[serde(default)]
    args: Vec<String>,
    #[serde(default)]
    reply: Option<String>,
}

/// Runs a configured program with the utterance substituted into its args.
#[derive(Debug)]
pub struct CommandSkill {
    name: String,
    phrases: Vec<String>,
    program: String,
    args: Vec<String>,
    reply: Option<String>,
    launcher: Arc<dyn Launcher>,
}

impl CommandSkill {
    /// Build from manifest settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `phrases` or `program` is missing or `program`
    /// is blank.
    pub fn from_settings(settings: &Value, launcher: Arc<dyn Launcher>) -> SkillResult<BoxedSkill> {
        let settings: Settings = serde_json::from_value(settings.clone())?;
        if settings.program.trim().is_empty() {
            return Err(SkillError::invalid_settings("program must not be blank"));
        }

        Ok(Box::new(Self {
            name: settings.name.unwrap_or_else(|| FACTORY.to_string()),
            phrases: settings.phrases,
            program: settings.program,
            args: settings.args,
            reply: settings.reply,
            launcher,
        }))
    }

    fn render_args(&self, text: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.replace(TEXT_PLACEHOLDER, text))
            .collect()
    }
}

impl Skill for CommandSkill {
    fn name(&self) -> &str {
        &self.name
    }

    fn intent_phrases(&self) -> &[String] {
        &self.phrases
    }

    fn handle_intent(&self, text: &str) -> SkillResult<HandlerResult> {
        self.launcher.spawn(&self.program, &self.render_args(text))?;
        Ok(HandlerResult::Handled(self.reply.clone()))
    }
}
