//! Google, Wikipedia, weather and directions lookups in the browser.

use super::launcher::Launcher;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use std::sync::{Arc, OnceLock};
use tanu::{BoxedSkill, HandlerResult, Skill, SkillResult};
use tracing::debug;

/// Factory name.
pub const FACTORY: &str = "web_search";

const DEFAULT_PHRASES: [&str; 5] = ["search", "google", "wikipedia", "weather", "directions"];

const GOOGLE_URL: &str = "https://www.google.com/search?q=";
const WIKIPEDIA_URL: &str = "https://en.wikipedia.org/wiki/";

struct SearchPatterns {
    search: Regex,
    wikipedia: Regex,
}

impl SearchPatterns {
    fn new() -> Self {
        Self {
            search: Regex::new(r"^(?:search|google)(?: for)? (.+)").expect("valid regex"),
            wikipedia: Regex::new(r"wikipedia(?: for| about)? (.+)").expect("valid regex"),
        }
    }

    fn get() -> &'static Self {
        static PATTERNS: OnceLock<SearchPatterns> = OnceLock::new();
        PATTERNS.get_or_init(Self::new)
    }
}

/// What a search utterance asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Lookup {
    Google(String),
    Wikipedia(String),
}

impl Lookup {
    fn parse(text: &str) -> Option<Self> {
        let text = text.trim().to_lowercase();
        let patterns = SearchPatterns::get();

        if let Some(caps) = patterns.search.captures(&text) {
            return Some(Self::Google(caps[1].trim().to_string()));
        }
        if let Some(caps) = patterns.wikipedia.captures(&text) {
            return Some(Self::Wikipedia(caps[1].trim().to_string()));
        }
        if text.contains("weather") || text.contains("directions") {
            return Some(Self::Google(text));
        }
        None
    }

    fn url(&self) -> String {
        match self {
            Self::Google(query) => format!("{GOOGLE_URL}{}", urlencoding::encode(query)),
            Self::Wikipedia(topic) => {
                format!("{WIKIPEDIA_URL}{}", urlencoding::encode(&topic.replace(' ', "_")))
            }
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Google(query) => format!("Google search for: {query}"),
            Self::Wikipedia(topic) => format!("Wikipedia for: {topic}"),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct Settings {
    #[serde(default)]
    phrases: Option<Vec<String>>,
}

/// Opens search results for "search ...", "google ...", "wikipedia ..." and
/// weather or directions requests.
#[derive(Debug)]
pub struct WebSearchSkill {
    phrases: Vec<String>,
    launcher: Arc<dyn Launcher>,
}

impl WebSearchSkill {
    /// Build from manifest settings.
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
        Ok(Box::new(Self { phrases, launcher }))
    }
}

impl Skill for WebSearchSkill {
    fn name(&self) -> &str {
        FACTORY
    }

    fn intent_phrases(&self) -> &[String] {
        &self.phrases
    }

    fn handle_intent(&self, text: &str) -> SkillResult<HandlerResult> {
        let Some(lookup) = Lookup::parse(text) else {
            debug!("no search query found");
            return Ok(HandlerResult::NotHandled);
        };
        self.launcher.open_url(&lookup.url())?;
        Ok(HandlerResult::handled(lookup.describe()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::launcher::testing::RecordingLauncher;

    #[test]
    fn test_parse() {
        assert_eq!(
            Lookup::parse("Search for rust lifetimes"),
            Some(Lookup::Google("rust lifetimes".into()))
        );
        assert_eq!(
            Lookup::parse("google borrow checker"),
            Some(Lookup::Google("borrow checker".into()))
        );
        assert_eq!(
            Lookup::parse("tell me wikipedia about Alan Turing"),
            Some(Lookup::Wikipedia("alan turing".into()))
        );
        assert_eq!(
            Lookup::parse("weather in Paris"),
            Some(Lookup::Google("weather in paris".into()))
        );
        assert_eq!(Lookup::parse("research"), None);
    }

    #[test]
    fn test_urls() {
        assert_eq!(
            Lookup::Google("rust & c".into()).url(),
            "https://www.google.com/search?q=rust%20%26%20c"
        );
        assert_eq!(
            Lookup::Wikipedia("alan turing".into()).url(),
            "https://en.wikipedia.org/wiki/alan_turing"
        );
    }

    #[test]
    fn test_handle_opens_browser() {
        let launcher = Arc::new(RecordingLauncher::default());
        let skill =
            WebSearchSkill::from_settings(&Value::Null, Arc::clone(&launcher) as Arc<dyn Launcher>)
                .unwrap();

        let result = skill.handle_intent("search for tanu").unwrap();
        assert_eq!(result, HandlerResult::handled("Google search for: tanu"));
        assert_eq!(launcher.urls(), ["https://www.google.com/search?q=tanu"]);

        assert_eq!(
            skill.handle_intent("researching").unwrap(),
            HandlerResult::NotHandled
        );
    }
}
