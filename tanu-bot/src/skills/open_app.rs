//! Launch desktop applications by name.

use super::launcher::Launcher;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use tanu::{BoxedSkill, HandlerResult, Skill, SkillResult};
use tracing::debug;

/// Factory name.
pub const FACTORY: &str = "open_app";

const DEFAULT_PHRASES: [&str; 11] = [
    "open notepad",
    "open calculator",
    "launch paint",
    "open chrome",
    "open edge",
    "open firefox",
    "open whatsapp",
    "launch spotify",
    "open word",
    "open excel",
    "open powerpoint",
];

#[cfg(target_os = "windows")]
const DEFAULT_APPS: [(&str, &str); 8] = [
    ("notepad", "notepad.exe"),
    ("calculator", "calc.exe"),
    ("paint", "mspaint.exe"),
    ("chrome", "chrome.exe"),
    ("edge", "msedge.exe"),
    ("firefox", "firefox.exe"),
    ("word", "winword.exe"),
    ("excel", "excel.exe"),
];

#[cfg(not(target_os = "windows"))]
const DEFAULT_APPS: [(&str, &str); 6] = [
    ("notepad", "gedit"),
    ("calculator", "gnome-calculator"),
    ("paint", "kolourpaint"),
    ("chrome", "google-chrome"),
    ("firefox", "firefox"),
    ("spotify", "spotify"),
];

/// One launchable application.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppEntry {
    /// Name looked for in the utterance (lowercase).
    pub name: String,
    /// Program to start.
    pub program: String,
    /// Extra arguments.
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
struct Settings {
    #[serde(default)]
    phrases: Option<Vec<String>>,
    #[serde(default)]
    apps: Option<Vec<AppEntry>>,
}

/// Opens the first configured app whose name appears in the utterance.
#[derive(Debug)]
pub struct OpenAppSkill {
    phrases: Vec<String>,
    apps: Vec<AppEntry>,
    launcher: Arc<dyn Launcher>,
}

impl OpenAppSkill {
    /// Build from manifest settings. `null` settings use the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the settings do not deserialize.
    pub fn from_settings(settings: &Value, launcher: Arc<dyn Launcher>) -> SkillResult<BoxedSkill> {
        let settings: Settings = if settings.is_null() {
            Settings::default()
        } else {
            serde_json::from_value(settings.clone())?
        };

        let phrases = settings
            .phrases
            .unwrap_or_else(|| DEFAULT_PHRASES.iter().map(ToString::to_string).collect());
        let apps = settings.apps.unwrap_or_else(|| {
            DEFAULT_APPS
                .iter()
                .map(|(name, program)| AppEntry {
                    name: (*name).to_string(),
                    program: (*program).to_string(),
                    args: Vec::new(),
                })
                .collect()
        });

        Ok(Box::new(Self {
            phrases,
            apps,
            launcher,
        }))
    }
}

impl Skill for OpenAppSkill {
    fn name(&self) -> &str {
        FACTORY
    }

    fn intent_phrases(&self) -> &[String] {
        &self.phrases
    }

    fn handle_intent(&self, text: &str) -> SkillResult<HandlerResult> {
        let text = text.to_lowercase();
        let Some(app) = self
            .apps
            .iter()
            .find(|app| text.contains(&app.name.to_lowercase()))
        else {
            debug!("app not found");
            return Ok(HandlerResult::NotHandled);
        };

        self.launcher.spawn(&app.program, &app.args)?;
        Ok(HandlerResult::handled(format!("Opened {}", title_case(&app.name))))
    }
}

fn title_case(name: &str) -> String {
    let mut chars = name.chars();
    chars.next().map_or_else(String::new, |first| {
        first.to_uppercase().chain(chars).collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::launcher::testing::RecordingLauncher;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let launcher = Arc::new(RecordingLauncher::default());
        let skill = OpenAppSkill::from_settings(&Value::Null, launcher).unwrap();
        assert_eq!(skill.intent_phrases().len(), DEFAULT_PHRASES.len());
    }

    #[test]
    fn test_opens_first_matching_app() {
        let launcher = Arc::new(RecordingLauncher::default());
        let skill = OpenAppSkill::from_settings(
            &json!({
                "apps": [
                    { "name": "notepad", "program": "gedit" },
                    {
                        "name": "calculator",
                        "program": "gnome-calculator",
                        "args": ["--mode", "basic"]
                    }
                ]
            }),
            Arc::clone(&launcher) as Arc<dyn Launcher>,
        )
        .unwrap();

        let result = skill.handle_intent("Open Calculator please").unwrap();
        assert_eq!(result, HandlerResult::handled("Opened Calculator"));
        assert_eq!(
            launcher.spawned(),
            [(
                "gnome-calculator".to_string(),
                vec!["--mode".to_string(), "basic".to_string()]
            )]
        );
    }

    #[test]
    fn test_unknown_app_is_not_handled() {
        let launcher = Arc::new(RecordingLauncher::default());
        let skill =
            OpenAppSkill::from_settings(&Value::Null, Arc::clone(&launcher) as Arc<dyn Launcher>)
                .unwrap();
        assert_eq!(
            skill.handle_intent("open the pod bay doors").unwrap(),
            HandlerResult::NotHandled
        );
        assert!(launcher.spawned().is_empty());
    }

    #[test]
    fn test_spawn_failure_is_an_error() {
        let skill = OpenAppSkill::from_settings(
            &json!({ "apps": [{ "name": "ghost", "program": "missing-program" }] }),
            Arc::new(RecordingLauncher::default()),
        )
        .unwrap();
        assert!(skill.handle_intent("open ghost").is_err());
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("notepad"), "Notepad");
        assert_eq!(title_case(""), "");
    }
}
